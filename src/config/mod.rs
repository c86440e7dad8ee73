//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `CAPITAL_GAME` prefix
//! and nested values use double underscores as separators. Every section has
//! defaults, so an empty environment is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use capital_game::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Snapshot at {}", config.store.snapshot_path.display());
//! ```

mod error;
mod game;
mod logging;
mod store;

pub use error::{ConfigError, ValidationError};
pub use game::GameConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use store::StoreConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Game rules (fund speed, green carry, stock synthesis)
    #[serde(default)]
    pub game: GameConfig,

    /// Tracing filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Snapshot file location
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CAPITAL_GAME` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CAPITAL_GAME__GAME__DEFAULT_FUND_SPEED=12.5` -> `game.default_fund_speed = 12.5`
    /// - `CAPITAL_GAME__LOGGING__FORMAT=json` -> `logging.format = json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAPITAL_GAME")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.game.validate()?;
        self.logging.validate()?;
        self.store.validate()?;
        Ok(())
    }
}
