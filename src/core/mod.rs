//! Dispatcher core: control loop, delivery and configuration.
//!
//! The public API from this module is [`Dispatcher`], its [`DispatcherConfig`],
//! [`Verbosity`] and [`StatsSnapshot`].
//!
//! Internal modules:
//! - [`control`]: the single task owning the live listener set;
//! - [`listener`]: dispatcher-side half of a subscription and one delivery attempt;
//! - [`dispatcher`]: cloneable handle that feeds the control loop;
//! - [`stats`]: shared delivery counters;
//! - [`config`], [`verbosity`]: settings.

mod config;
mod control;
mod dispatcher;
mod listener;
mod stats;
mod verbosity;

pub use config::DispatcherConfig;
pub use dispatcher::Dispatcher;
pub use stats::StatsSnapshot;
pub use verbosity::Verbosity;
