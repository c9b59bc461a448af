//! Event data model and the consumer-side subscription handle.
//!
//! ## Contents
//! - [`Event`], [`Payload`] tagged event value and the type-erased payload alias
//! - [`Subscription`] receive-only handle returned by `subscribe`
//!
//! The dispatcher-side half of a subscription lives in `core::listener`.

mod event;
mod subscription;

pub use event::{Event, Payload};
pub use subscription::Subscription;
