use std::env;

use thiserror::Error;

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 604_800;
pub const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingSecret,

    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub environment: Environment,
    pub frontend_url: Option<String>,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Reads `.env` (when present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => 5000,
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(value) => match value.parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "BCRYPT_COST",
                        value,
                    })
                }
            },
            None => DEFAULT_BCRYPT_COST,
        };

        let token_ttl_secs = lookup("JWT_EXPIRATION_IN_SECONDS")
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);

        let environment = lookup("APP_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .map(|value| Environment::parse(&value))
            .unwrap_or(Environment::Production);

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "chat.db".to_string()),
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            jwt_secret,
            token_ttl_secs,
            environment,
            frontend_url: lookup("FRONTEND_URL").filter(|url| !url.is_empty()),
            bcrypt_cost,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn secret_is_required() {
        assert_eq!(config_from(&[]).unwrap_err(), ConfigError::MissingSecret);
        assert_eq!(
            config_from(&[("JWT_SECRET", "")]).unwrap_err(),
            ConfigError::MissingSecret
        );
    }

    #[test]
    fn defaults_apply() {
        let config = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_url, "chat.db");
        assert_eq!(config.bcrypt_cost, DEFAULT_BCRYPT_COST);
        assert!(config.is_production());
        assert!(config.frontend_url.is_none());
    }

    #[test]
    fn bad_expiry_falls_back_to_default() {
        let config = config_from(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION_IN_SECONDS", "soon"),
        ])
        .unwrap();
        assert_eq!(config.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);

        let config = config_from(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRATION_IN_SECONDS", "3600"),
        ])
        .unwrap();
        assert_eq!(config.token_ttl_secs, 3600);
    }

    #[test]
    fn environment_falls_back_to_node_env() {
        let config = config_from(&[("JWT_SECRET", "s3cret"), ("NODE_ENV", "development")]).unwrap();
        assert_eq!(config.environment, Environment::Development);

        let config = config_from(&[
            ("JWT_SECRET", "s3cret"),
            ("APP_ENV", "production"),
            ("NODE_ENV", "development"),
        ])
        .unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = config_from(&[("JWT_SECRET", "s3cret"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }
}
