//! # tagbus
//!
//! **tagbus** is an in-process publish/subscribe notification library for Rust.
//!
//! Producers announce tagged [`Event`]s; consumers subscribe by tag **prefix** and
//! receive matching events asynchronously. A slow or departed subscriber never
//! delays matching or delivery for anyone else.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   producer A        producer B          consumer X           consumer Y
//!       │                 │                   │                    │
//!   announce(ev)      signal(tag)       subscribe("job.")     subscribe("")
//!       │                 │                   │                    │
//!       ▼                 ▼                   ▼                    ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  Dispatcher (cloneable handle)                                        │
//! │  - announcements queue (bounded, DispatcherConfig::queue_capacity)    │
//! │  - commands queue      (subscribe + ack, count)                       │
//! └──────────────────────────────────┬────────────────────────────────────┘
//!                                    ▼
//!                        ┌────────────────────────┐
//!                        │      ControlLoop       │  one task per dispatcher,
//!                        │  Vec<Listener> (owned) │  sole owner of the live set
//!                        └───┬────────┬────────┬──┘
//!                 prefix match│        │        │
//!                            ▼        ▼        ▼
//!                       try_send  try_send  try_send ──(full)──► spawned send().await
//!                            │        │        │
//!                            ▼        ▼        ▼
//!                      Subscription Subscription ...   (consumer-owned, close to leave)
//! ```
//!
//! ### Delivery rules
//! - A subscription receives an event iff the event tag starts with its prefix
//!   (literal, case-sensitive; `""` matches everything), exactly once.
//! - Events are matched in the order one dispatcher receives them, against the
//!   subscriptions live at that moment. There is no ordering across subscribers.
//! - A subscription sees every event announced after `subscribe` returns, and
//!   none whose `announce` returned before `subscribe` was called.
//! - A `subscribe` racing with an `announce` from another task may or may not see that event.
//! - Closing (or dropping) a [`Subscription`] is the only way to unsubscribe; the
//!   dispatcher notices lazily and never reports it as an error.
//!
//! ## Features
//! | Area              | Description                                                 | Key types / functions                      |
//! |-------------------|-------------------------------------------------------------|--------------------------------------------|
//! | **Dispatching**   | Isolated dispatcher instances with prefix fan-out.          | [`Dispatcher`], [`Subscription`]           |
//! | **Events**        | Immutable tag + payload values, typed or type-erased.       | [`Event`], [`Payload`]                     |
//! | **Facade**        | Trait seam for dependency passing.                          | [`Notifier`]                               |
//! | **Configuration** | Queue sizes, in-flight bound, pruning, verbosity.           | [`DispatcherConfig`], [`Verbosity`]        |
//! | **Observability** | `tracing` diagnostics gated by verbosity, delivery counters.| [`StatsSnapshot`]                          |
//! | **Errors**        | Typed errors for the non-blocking and init entry points.    | [`DispatchError`], [`ConfigError`]         |
//!
//! ## Optional features
//! - `global` (default): the process-wide default dispatcher: [`init`],
//!   [`default_dispatcher`], and the free functions [`listen`], [`announce`], [`signal`].
//!
//! ## Example
//! ```rust
//! use tagbus::{Dispatcher, DispatcherConfig, Event, Verbosity};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let cfg = DispatcherConfig::default().with_verbosity(Verbosity::Occurrences);
//!     let bus: Dispatcher<&'static str> = Dispatcher::new(cfg);
//!
//!     let mut uploads = bus.subscribe("upload.").await;
//!
//!     bus.announce(Event::new("upload.done", "report.pdf")).await;
//!     bus.signal("download.done").await;
//!
//!     let ev = uploads.recv().await.unwrap();
//!     assert_eq!(ev.tag(), "upload.done");
//!     assert_eq!(ev.data(), Some(&"report.pdf"));
//!
//!     // Done listening: just close the handle.
//!     uploads.close();
//!     bus.signal("upload.done").await;
//! }
//! ```

mod core;
mod error;
mod events;
mod facade;

// ---- Public re-exports ----

pub use crate::core::{Dispatcher, DispatcherConfig, StatsSnapshot, Verbosity};
pub use error::{ConfigError, DispatchError};
pub use events::{Event, Payload, Subscription};
pub use facade::Notifier;

// Process-wide default dispatcher.
// Enabled by default; disable with `default-features = false`.
#[cfg(feature = "global")]
pub use facade::{announce, default_dispatcher, init, listen, signal, try_default};
