use crate::validation::{ConfigValidator, StartupValidator};
use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};

/// Which persistence backend the server wires in at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub run_migrations: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: None,
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_min_length: usize,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            // Development default; `StartupValidator` still accepts it, deployments override it
            jwt_secret: "foodlog-development-secret".to_string(),
            token_ttl_hours: 24,
            password_min_length: 1,
        }
    }
}

/// Complete application configuration, resolved once at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub identity: IdentitySettings,
    pub logging: LoggerConfig,
}

impl AppConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Run the startup rules against this configuration
    pub fn validate(&self) -> crate::Result<()> {
        StartupValidator.validate(self)
    }
}
