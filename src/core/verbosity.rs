//! # Diagnostic verbosity.
//!
//! [`Verbosity`] decides which dispatcher activity is reported through `tracing`.
//! It is purely observational; correctness never depends on it.
//!
//! | Level | Variant         | Reports                                   |
//! |-------|-----------------|-------------------------------------------|
//! | 0     | `Silent`        | nothing (default)                         |
//! | 1     | `Occurrences`   | every announced event                     |
//! | 2     | `Subscriptions` | + every registered subscription           |
//! | 3     | `Dispatches`    | + every delivery attempt and its outcome  |
//!
//! Levels are cumulative. The records still pass through the installed
//! `tracing` subscriber, which applies its own level filter on top.

use crate::error::ConfigError;

/// How much dispatcher activity to log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent = 0,
    /// Log event occurrences.
    Occurrences = 1,
    /// Also log subscriptions.
    Subscriptions = 2,
    /// Also log every dispatch attempt.
    Dispatches = 3,
}

impl Verbosity {
    /// Numeric level (`0..=3`).
    #[inline]
    pub fn level(self) -> u8 {
        self as u8
    }

    #[inline]
    pub(crate) fn occurrences(self) -> bool {
        self >= Verbosity::Occurrences
    }

    #[inline]
    pub(crate) fn subscriptions(self) -> bool {
        self >= Verbosity::Subscriptions
    }

    #[inline]
    pub(crate) fn dispatches(self) -> bool {
        self >= Verbosity::Dispatches
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = ConfigError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Verbosity::Silent),
            1 => Ok(Verbosity::Occurrences),
            2 => Ok(Verbosity::Subscriptions),
            3 => Ok(Verbosity::Dispatches),
            level => Err(ConfigError::InvalidVerbosity { level }),
        }
    }
}
