//! Core error types for aligner-core.
//!
//! Derivation queries never fail; errors only come from building a schedule
//! and from loading or editing the on-disk configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for aligner-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine where the configuration lives
    #[error("Cannot locate configuration directory: {0}")]
    NoDataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Schedule validation errors.
///
/// Raised once, when a [`crate::Schedule`] is constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A schedule needs at least one stage
    #[error("total_stages must be greater than zero")]
    NoStages,

    /// A stage must last at least one day
    #[error("stage_duration_days must be greater than zero")]
    ZeroStageDuration,

    /// Anchor stage lies outside the sequence
    #[error("anchor_stage_index {index} is outside 1..={total}")]
    AnchorOutOfRange { index: u32, total: u32 },

    /// Sequence start or end cannot be represented as a date
    #[error("schedule dates overflow the supported calendar range")]
    DateOutOfRange,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
