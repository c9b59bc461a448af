//! Error types used by the dispatcher and its configuration.
//!
//! This module defines two enums:
//!
//! - [`DispatchError`] — failures of the non-blocking and initialization entry points.
//! - [`ConfigError`] — invalid configuration values.
//!
//! Note that a subscriber that went away is **not** an error anywhere in this crate:
//! a delivery to a closed subscription is swallowed and only shows up in
//! [`StatsSnapshot::departed`](crate::StatsSnapshot::departed).

use thiserror::Error;

/// # Errors produced by dispatcher entry points.
///
/// The awaiting API (`subscribe`, `announce`, `signal`) never returns these;
/// they surface only from `try_*` methods and from [`init`](crate::init).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The control task has stopped (shutdown requested or all handles dropped).
    #[error("dispatcher closed")]
    Closed,

    /// The inbound queue is full (retry later or use the awaiting `announce`).
    #[error("dispatcher queue full")]
    Full,

    /// The process-wide default dispatcher was already constructed.
    #[error("default dispatcher already initialized")]
    AlreadyInitialized,

    /// The dedicated runtime for the default dispatcher could not be started.
    #[error("failed to start dispatcher runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tagbus::DispatchError;
    ///
    /// assert_eq!(DispatchError::Full.as_label(), "dispatch_queue_full");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Closed => "dispatch_closed",
            DispatchError::Full => "dispatch_queue_full",
            DispatchError::AlreadyInitialized => "dispatch_already_initialized",
            DispatchError::Runtime(_) => "dispatch_runtime",
        }
    }

    /// Indicates whether retrying the same call may succeed.
    ///
    /// Only [`DispatchError::Full`] is transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DispatchError::Full)
    }
}

/// # Errors produced while building a configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Verbosity level outside `0..=3`.
    #[error("invalid verbosity level {level} (expected 0..=3)")]
    InvalidVerbosity {
        /// The rejected level.
        level: u8,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidVerbosity { .. } => "config_invalid_verbosity",
        }
    }
}
