/// Router Module Index
///
/// Splits routing by access level so that authentication is applied at the module
/// boundary (via Axum layers) rather than remembered per handler.

/// Routes accessible to anyone (health checks).
pub mod public;

/// The People resource. Every route requires an authenticated caller plus one of
/// the route's permitted roles.
pub mod people;

/// Mount point of the People resource.
pub const PEOPLE_PATH: &str = "/api/People";
