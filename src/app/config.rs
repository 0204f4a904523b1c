use std::{net::SocketAddr, time::Duration};

use crate::{auth::jwt::JwtConfig, error::AppError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.jwt = JwtConfig::from_env(config.jwt.secret.clone());
        Ok(config)
    }

    /// Token issuer, audience and leeway keep their defaults here and are
    /// filled in by [`JwtConfig::from_env`].
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Internal("DATABASE_URL missing".to_string()))?;
        let secret = lookup("JWT_SECRET")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Internal("JWT_SECRET missing".to_string()))?;

        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 20u32)?;
        let min_connections = parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 5u32)?;
        let acquire_timeout_secs = parse_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", 15u64)?;
        if min_connections > max_connections {
            return Err(AppError::Internal(
                "DATABASE_MIN_CONNECTIONS exceeds DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|err| AppError::Internal(format!("BIND_ADDR invalid: {}", err)))?;
        let cors_origin = lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());

        Ok(Self {
            database: DatabaseConfig {
                url,
                max_connections,
                min_connections,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            },
            bind_addr,
            cors_origin,
            jwt: JwtConfig::new(secret),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Internal(format!("{} is not a valid number", key))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::AppConfig;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/board"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.min_connections, 5);
        assert_eq!(config.database.acquire_timeout.as_secs(), 15);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.cors_origin, "http://localhost:5173");
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(AppConfig::from_lookup(lookup(&[("JWT_SECRET", "secret")])).is_err());
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let result = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/board"),
            ("JWT_SECRET", "secret"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn overrides_are_read() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/board"),
            ("JWT_SECRET", "secret"),
            ("DATABASE_MAX_CONNECTIONS", "8"),
            ("DATABASE_MIN_CONNECTIONS", "2"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("CORS_ORIGIN", "https://boards.example.com"),
        ]))
        .unwrap();
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.cors_origin, "https://boards.example.com");
    }
}
