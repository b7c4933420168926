// Validation of a fully resolved configuration
use crate::error::{ConfigError, Result};
use crate::settings::{AppConfig, StoreBackend};

/// Minimum number of bytes accepted for the token signing secret
pub const MIN_JWT_SECRET_LEN: usize = 16;

/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_TTL_HOURS: i64 = 8760;

pub trait ConfigValidator {
    fn validate(&self, config: &AppConfig) -> Result<()>;
}

/// Rules every deployment must satisfy before the server starts
#[derive(Debug, Default, Clone, Copy)]
pub struct StartupValidator;

impl ConfigValidator for StartupValidator {
    fn validate(&self, config: &AppConfig) -> Result<()> {
        if config.server.port == 0 {
            return Err(ConfigError::validation("server.port", "must be non-zero"));
        }

        if config.database.backend == StoreBackend::Postgres {
            match config.database.url.as_deref() {
                Some(url) if !url.trim().is_empty() => {}
                _ => {
                    return Err(ConfigError::validation(
                        "database.url",
                        "required when backend is postgres",
                    ))
                }
            }
            if config.database.max_connections == 0 {
                return Err(ConfigError::validation(
                    "database.max_connections",
                    "must be at least 1",
                ));
            }
        }

        if config.identity.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::validation(
                "identity.jwt_secret",
                format!("must be at least {MIN_JWT_SECRET_LEN} bytes"),
            ));
        }

        if config.identity.token_ttl_hours <= 0 {
            return Err(ConfigError::validation(
                "identity.token_ttl_hours",
                "must be positive",
            ));
        }
        if config.identity.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::validation(
                "identity.token_ttl_hours",
                format!("must be at most {MAX_TOKEN_TTL_HOURS}"),
            ));
        }

        if config.identity.password_min_length == 0 {
            return Err(ConfigError::validation(
                "identity.password_min_length",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_ttl_bounds() {
        let mut config = AppConfig::default();
        config.identity.token_ttl_hours = MAX_TOKEN_TTL_HOURS;
        assert!(StartupValidator.validate(&config).is_ok());

        config.identity.token_ttl_hours = MAX_TOKEN_TTL_HOURS + 1;
        let err = StartupValidator.validate(&config).unwrap_err();
        assert!(err.to_string().contains("token_ttl_hours"));

        config.identity.token_ttl_hours = 0;
        assert!(StartupValidator.validate(&config).is_err());
    }
}
