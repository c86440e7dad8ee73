//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Logging setup failed: {0}")]
    LoggingInit(String),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Fund speed must be finite and non-negative")]
    InvalidFundSpeed,

    #[error("Green carry amount must be finite and non-negative")]
    InvalidGreenCarryAmount,

    #[error("Initial stock price must be finite")]
    InvalidInitialStockPrice,

    #[error("Stock income scale must be finite and positive")]
    InvalidIncomeScale,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogFilter(String),

    #[error("Snapshot path must not be empty")]
    EmptySnapshotPath,
}
