//! Error types for scrollfire

use thiserror::Error;

/// Errors returned by the scrollfire public API
///
/// Scans never produce errors; an element that cannot be measured is
/// skipped instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrollfireError {
    /// An action or runtime config is missing a required field or is out of range
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// `add_action`/`remove_action` was called before `init`
    #[error("Scrollfire has not been initialized, call Scrollfire::init() first")]
    Uninitialized,
}

impl ScrollfireError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result type for scrollfire operations
pub type Result<T> = std::result::Result<T, ScrollfireError>;
