use std::{fmt, str::FromStr};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::ApiError,
};

/// Role
///
/// A caller capability label. Carried in the `roles` claim of the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum Role {
    Admin,
    Contributor,
    Reader,
}

/// Anyone allowed to read the People resource.
pub const READ_ROLES: &[Role] = &[Role::Admin, Role::Contributor, Role::Reader];
/// Anyone allowed to create or replace people.
pub const WRITE_ROLES: &[Role] = &[Role::Admin, Role::Contributor];
/// Delete is reserved for administrators.
pub const ADMIN_ROLES: &[Role] = &[Role::Admin];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [Role::Admin, Role::Contributor, Role::Reader]
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Contributor => "Contributor",
            Role::Reader => "Reader",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims
///
/// Payload expected inside the HS256 bearer token. Tokens are issued elsewhere;
/// this service only validates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the caller's identifier.
    pub sub: Uuid,
    /// Roles granted to the caller. A token without the claim grants nothing.
    /// Names are matched case-insensitively and unknown ones are dropped.
    #[serde(default, deserialize_with = "lenient_roles")]
    pub roles: Vec<Role>,
    /// Expiration time. Always validated.
    pub exp: usize,
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        self.roles.iter().any(|role| allowed.contains(role))
    }
}

/// Keeps the names that are roles, skipping the rest.
fn known_roles<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Role> {
    names
        .into_iter()
        .filter(|name| !name.trim().is_empty())
        .filter_map(|name| match name.parse() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::debug!("ignoring role: {}", e);
                None
            }
        })
        .collect()
}

/// Parses a comma-separated role list, skipping names that are not roles.
fn parse_roles(raw: &str) -> Vec<Role> {
    known_roles(raw.split(','))
}

fn lenient_roles<'de, D>(deserializer: D) -> Result<Vec<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    Ok(known_roles(names.iter().map(String::as_str)))
}

/// AuthUser Extractor Implementation
///
/// 1. Local Bypass: in `Env::Local`, the `x-user-id` / `x-user-roles` headers stand in for a token.
/// 2. Token Extraction: standard `Authorization: Bearer <jwt>`.
/// 3. Token Validation: signature and expiry against `AppConfig::jwt_secret`.
///
/// Rejection: `ApiError::Unauthorized` (401) on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            let user_id = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .and_then(|id| Uuid::parse_str(id).ok());

            if let Some(id) = user_id {
                let roles = parts
                    .headers
                    .get("x-user-roles")
                    .and_then(|value| value.to_str().ok())
                    .map(parse_roles)
                    .unwrap_or_default();
                tracing::debug!(user_id = %id, ?roles, "local auth bypass");
                return Ok(AuthUser { id, roles });
            }
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("rejected expired token"),
                other => tracing::debug!("rejected token: {:?}", other),
            }
            ApiError::Unauthorized
        })?;

        Ok(AuthUser {
            id: token_data.claims.sub,
            roles: token_data.claims.roles,
        })
    }
}

/// require_roles
///
/// Role gate middleware, layered per route with `middleware::from_fn_with_state(ROLES, require_roles)`.
/// Must run inside the authentication middleware, which stores the `AuthUser` in the
/// request extensions. Callers holding none of the permitted roles get 403.
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(ApiError::Unauthorized)?;

    if !user.has_any_role(allowed) {
        tracing::warn!(
            user_id = %user.id,
            method = %request.method(),
            uri = %request.uri(),
            "caller lacks a permitted role"
        );
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}
