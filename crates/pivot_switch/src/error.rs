//! Error types for pivot_switch

use pivot_core::{ViewError, ViewId, VisibilityError};
use thiserror::Error;

/// Errors that can occur while switching children
#[derive(Error, Debug)]
pub enum SwitchError {
    /// The requested child is already displayed (or being switched in)
    #[error("view {0:?} is already the container's child")]
    AlreadyDisplayed(ViewId),

    /// The container was dropped while a transition still referenced it
    #[error("switch container no longer exists")]
    Detached,

    /// View tree mutation failed
    #[error("view tree error: {0}")]
    View(#[from] ViewError),

    /// Visibility bookkeeping failed
    #[error("visibility error: {0}")]
    Visibility(#[from] VisibilityError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while loading a [`SwitchConfig`](crate::config::SwitchConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Unrecognized animation name
    #[error("unknown animation kind: {0:?}")]
    UnknownAnimation(String),

    /// Durations must be finite and non-negative
    #[error("invalid transition duration: {0}")]
    InvalidDuration(f64),
}

/// Result type for pivot_switch operations
pub type Result<T> = std::result::Result<T, SwitchError>;
