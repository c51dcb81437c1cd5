use std::env;

use crate::error::ConfigError;

/// Fallback signing secret for local development. Never accepted in production.
const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// shared immutably through `AppState` (pulled into extractors via `FromRef`).
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the local auth bypass and log format.
    pub env: Env,
    // Which backing store the People entity set lives in.
    pub store: StoreKind,
    // Postgres connection string. Only required when `store` is `StoreKind::Postgres`.
    pub db_url: Option<String>,
    pub db_max_connections: u32,
    // Secret key used to validate incoming HS256 bearer tokens.
    pub jwt_secret: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (header bypass, pretty logs) and the hardened production setup.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// StoreKind
///
/// Selects the `Repository` implementation wired up by `main`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl Env {
    /// Reads `APP_ENV` alone. Anything but `production` is local. Never fails, so the
    /// log format is known before the rest of the configuration is validated.
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        }
    }
}

impl Default for AppConfig {
    /// Safe, non-failing values used for test state scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            store: StoreKind::Memory,
            db_url: None,
            db_max_connections: 5,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables and fails fast: a missing
    /// production secret or an unparseable value is an error, never a silent default.
    pub fn load() -> Result<Self, ConfigError> {
        let env = Env::from_env();

        let store = match env::var("DATA_STORE") {
            Err(_) => StoreKind::Postgres,
            Ok(value) => match value.to_ascii_lowercase().as_str() {
                "postgres" => StoreKind::Postgres,
                "memory" => StoreKind::Memory,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "DATA_STORE",
                        value,
                    });
                }
            },
        };

        let db_url = env::var("DATABASE_URL").ok();
        if store == StoreKind::Postgres && db_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Err(_) => 5,
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                value,
            })?,
        };

        // The production secret is mandatory and must be explicitly set.
        let jwt_secret = match (env, env::var("JWT_SECRET")) {
            (_, Ok(secret)) => secret,
            (Env::Production, Err(_)) => return Err(ConfigError::Missing("JWT_SECRET")),
            (Env::Local, Err(_)) => LOCAL_JWT_SECRET.to_string(),
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            env,
            store,
            db_url,
            db_max_connections,
            jwt_secret,
            bind_addr,
        })
    }
}
