//! # Tagged events announced through a dispatcher.
//!
//! An [`Event`] is an immutable pair of a **tag** and an optional opaque **payload**.
//! Subscribers select events by tag prefix; the payload is never inspected by the
//! dispatcher and is handed to every matching subscriber as a clone.
//!
//! ## Payload typing
//! - Explicit dispatchers are generic: `Dispatcher<MyPayload>` carries `Event<MyPayload>`.
//! - The process-wide default dispatcher carries [`Payload`] (`Arc<dyn Any + Send + Sync>`),
//!   so unrelated producers can share it. Use [`Event::with_any`] and
//!   [`Event::downcast_ref`] there.
//!
//! Payloads are cloned once per matching subscriber; wrap large payloads in an `Arc`.
//!
//! ## Example
//! ```rust
//! use tagbus::Event;
//!
//! let ev = Event::new("job.done", 42u32);
//! assert_eq!(ev.tag(), "job.done");
//! assert_eq!(ev.data(), Some(&42));
//!
//! let sig: Event<u32> = Event::signal("job.started");
//! assert!(sig.data().is_none());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased payload used by the process-wide default dispatcher.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// A single occurrence of something in the host system.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Event<T = Payload> {
    tag: Arc<str>,
    data: Option<T>,
}

impl<T> Event<T> {
    /// Creates an event carrying `data`.
    pub fn new(tag: impl Into<Arc<str>>, data: T) -> Self {
        Self {
            tag: tag.into(),
            data: Some(data),
        }
    }

    /// Creates a tag-only event (no payload).
    pub fn signal(tag: impl Into<Arc<str>>) -> Self {
        Self {
            tag: tag.into(),
            data: None,
        }
    }

    /// Event tag; subscriptions match against its prefix.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Payload, if any.
    #[inline]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Consumes the event and returns the payload.
    #[inline]
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Returns `true` if the tag starts with `prefix` (literal, case-sensitive).
    ///
    /// The empty prefix matches every tag.
    #[inline]
    pub fn matches(&self, prefix: &str) -> bool {
        self.tag.starts_with(prefix)
    }
}

impl Event<Payload> {
    /// Creates a type-erased event for the default dispatcher.
    pub fn with_any<V: Any + Send + Sync>(tag: impl Into<Arc<str>>, value: V) -> Self {
        Self::new(tag, Arc::new(value) as Payload)
    }

    /// Returns the payload as `V` if it holds one.
    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.data.as_deref().and_then(|any| any.downcast_ref::<V>())
    }
}

impl<T: fmt::Debug> fmt::Display for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => write!(f, "<Event {} with data {:?}>", self.tag, data),
            None => write!(f, "<Event {} with data none>", self.tag),
        }
    }
}
