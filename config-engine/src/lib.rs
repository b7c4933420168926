//! Configuration management for FoodLog Engine
//!
//! Configuration is resolved exactly once, in the server binary, from:
//! - built-in defaults
//! - an optional TOML file
//! - `FOODLOG_`-prefixed environment variables, using `__` between sections
//!   (`FOODLOG_DATABASE__BACKEND=postgres`, `FOODLOG_IDENTITY__JWT_SECRET=...`)
//!
//! Later sources override earlier ones. Nothing below the binary reads the
//! environment.
//!
//! # Example
//!
//! ```rust
//! use config_engine::{ConfigLoader, StoreBackend};
//!
//! let config = ConfigLoader::new()
//!     .without_env()
//!     .load_from_str("[server]\nport = 8080\n")
//!     .unwrap();
//! assert_eq!(config.server.port, 8080);
//! assert_eq!(config.database.backend, StoreBackend::Memory);
//! ```

pub mod error;
pub mod settings;
pub mod validation;

pub use error::*;
pub use settings::*;
pub use validation::{ConfigValidator, StartupValidator};

use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_PREFIX: &str = "FOODLOG";

/// Builder that layers configuration sources and validates the result
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    use_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            use_env: true,
        }
    }

    /// Read an optional TOML file; a missing file is not an error
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    pub fn load(&self) -> Result<AppConfig> {
        let mut builder = Config::builder();
        if let Some(path) = &self.file {
            debug!(path = %path.display(), "Reading configuration file");
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
        if self.use_env {
            builder = builder.add_source(Self::environment());
        }
        Self::finish(builder.build()?)
    }

    /// Load from an in-memory TOML document layered under the environment
    pub fn load_from_str(&self, toml: &str) -> Result<AppConfig> {
        let mut builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        if self.use_env {
            builder = builder.add_source(Self::environment());
        }
        Self::finish(builder.build()?)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(raw: Config) -> Result<AppConfig> {
        let config: AppConfig = raw.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
