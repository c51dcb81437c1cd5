use crate::{
    AppState,
    auth::{ADMIN_ROLES, READ_ROLES, WRITE_ROLES, require_roles},
    handlers,
    routes::PEOPLE_PATH,
};
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

/// People Router Module
///
/// Each method carries its own role gate, so `GET` and `DELETE` on the same path can
/// demand different roles. The gates read the `AuthUser` left in the request
/// extensions by the authentication layer that `create_router` wraps around this router.
///
/// | Route                    | Roles                       |
/// |--------------------------|-----------------------------|
/// | GET    /api/People       | Admin, Contributor, Reader  |
/// | POST   /api/People       | Admin, Contributor          |
/// | GET    /api/People/{id}  | Admin, Contributor, Reader  |
/// | PUT    /api/People/{id}  | Admin, Contributor          |
/// | DELETE /api/People/{id}  | Admin                       |
pub fn people_routes() -> Router<AppState> {
    let item_path = format!("{}/{{id}}", PEOPLE_PATH);

    Router::new()
        .route(
            PEOPLE_PATH,
            get(handlers::list_people)
                .route_layer(middleware::from_fn_with_state(READ_ROLES, require_roles))
                .merge(
                    post(handlers::create_person)
                        .route_layer(middleware::from_fn_with_state(WRITE_ROLES, require_roles)),
                ),
        )
        .route(
            &item_path,
            get(handlers::get_person)
                .route_layer(middleware::from_fn_with_state(READ_ROLES, require_roles))
                .merge(
                    put(handlers::update_person)
                        .route_layer(middleware::from_fn_with_state(WRITE_ROLES, require_roles)),
                )
                .merge(
                    delete(handlers::delete_person)
                        .route_layer(middleware::from_fn_with_state(ADMIN_ROLES, require_roles)),
                ),
        )
}
