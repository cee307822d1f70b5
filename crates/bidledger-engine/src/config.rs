//! Runtime settings
//!
//! Precedence, lowest first: built-in defaults, `bidledger.toml` in the
//! working directory, `BIDLEDGER_*` environment variables. A `.env` file is
//! loaded into the environment before anything else.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bidledger_core::logging_facility::Profile;
use bidledger_core_types::RequestContext;
use bidledger_store::errors::Result as StoreResult;
use bidledger_store::{db, migrations};
use config::{Config, Environment, File};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE: &str = "bidledger.toml";
pub const ENV_PREFIX: &str = "BIDLEDGER";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to read .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("Failed to encode configuration: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Failed to write configuration: {0}")]
    Write(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// SQLite database file
    pub database_path: PathBuf,
    pub log_profile: Profile,
    /// How long a writer waits for the write lock
    pub busy_timeout_ms: u64,
    /// Budget for a whole request, turned into its deadline
    pub request_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("bidledger.db"),
            log_profile: Profile::Development,
            busy_timeout_ms: 5000,
            request_timeout_ms: 10000,
        }
    }
}

impl Settings {
    /// Load `.env`, then resolve settings from the default sources.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_env_file()?;
        Self::load_from(Path::new(CONFIG_FILE), ENV_PREFIX)
    }

    /// Resolve settings from `file` (if it exists) and variables under `env_prefix`.
    pub fn load_from(file: &Path, env_prefix: &str) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default(
                "database_path",
                defaults.database_path.to_string_lossy().into_owned(),
            )?
            .set_default("log_profile", "development")?
            .set_default("busy_timeout_ms", defaults.busy_timeout_ms)?
            .set_default("request_timeout_ms", defaults.request_timeout_ms)?;

        if file.exists() {
            builder = builder.add_source(File::from(file));
        }

        builder = builder.add_source(Environment::with_prefix(env_prefix).try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn load_env_file() -> Result<(), ConfigError> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::debug!("loaded environment from .env");
        }
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Open and configure a connection without touching the schema.
    pub fn connect(&self) -> StoreResult<Connection> {
        let conn = db::open(&self.database_path)?;
        db::configure(&conn, self.busy_timeout())?;
        Ok(conn)
    }

    /// Open a connection and bring the schema up to date.
    pub fn open_store(&self) -> StoreResult<Connection> {
        let mut conn = self.connect()?;
        migrations::apply_migrations(&mut conn)?;
        Ok(conn)
    }

    /// Fresh request context whose deadline is `request_timeout_ms` from now
    pub fn request_context(&self) -> RequestContext {
        RequestContext::new().with_timeout(self.request_timeout())
    }
}
