//! Caller-facing surface over a dispatcher.
//!
//! ## Contents
//! - [`Notifier`] trait with `listen` / `announce` / `signal`, implemented by
//!   [`Dispatcher`](crate::Dispatcher); depend on it to swap in another instance in tests
//! - `global` (feature `global`): the process-wide default dispatcher and free
//!   functions delegating to it

mod notifier;

#[cfg(feature = "global")]
mod global;

pub use notifier::Notifier;

#[cfg(feature = "global")]
pub use global::{announce, default_dispatcher, init, listen, signal, try_default};
