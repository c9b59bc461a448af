//! # Dispatcher-side half of a subscription.
//!
//! A [`Listener`] pairs an immutable prefix with the sending half of the
//! subscriber's channel. It is owned by the control task and never shared.
//!
//! ## Delivery
//! ```text
//! deliver(event)
//!     │
//!     ├─ tag lacks prefix ───────────► Skipped
//!     ├─ try_send ok ────────────────► Delivered      (fast path)
//!     ├─ try_send closed ────────────► Departed       (consumer left; not an error)
//!     └─ try_send full
//!          ├─ in-flight limit hit ───► Dropped
//!          └─ spawn(send.await) ─────► Pending        (slow path; own task)
//! ```
//!
//! The slow path never blocks the caller: a subscriber that stops draining
//! stalls only its own spawned deliveries.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};

use super::stats::DispatchStats;
use super::verbosity::Verbosity;
use crate::events::Event;

/// Result of one delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    /// Tag did not match the prefix.
    Skipped,
    /// Event placed into the subscriber's buffer.
    Delivered,
    /// Buffer full; a spawned task is waiting for room.
    Pending,
    /// Subscriber closed its handle.
    Departed,
    /// Buffer full and the in-flight limit was reached.
    Dropped,
}

/// Registered interest of one subscriber.
pub(crate) struct Listener<T> {
    prefix: Arc<str>,
    sink: mpsc::Sender<Event<T>>,
    in_flight: Option<Arc<Semaphore>>,
}

impl<T> Listener<T>
where
    T: Clone + Send + 'static,
{
    pub(crate) fn new(
        prefix: Arc<str>,
        sink: mpsc::Sender<Event<T>>,
        in_flight_limit: Option<usize>,
    ) -> Self {
        Self {
            prefix,
            sink,
            in_flight: in_flight_limit.map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    #[inline]
    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` once the consumer has closed or dropped its handle.
    #[inline]
    pub(crate) fn is_departed(&self) -> bool {
        self.sink.is_closed()
    }

    /// Attempts to hand `event` to this subscriber.
    ///
    /// Must be called from within a tokio runtime (the slow path spawns).
    #[must_use]
    pub(crate) fn deliver(
        &self,
        event: &Event<T>,
        stats: &Arc<DispatchStats>,
        verbosity: Verbosity,
    ) -> Delivery {
        if !event.matches(&self.prefix) {
            stats.on_skipped();
            return Delivery::Skipped;
        }
        if verbosity.dispatches() {
            tracing::debug!(
                target: "tagbus",
                tag = event.tag(),
                prefix = %self.prefix,
                "event dispatched to listener"
            );
        }

        let ev = match self.sink.try_send(event.clone()) {
            Ok(()) => {
                stats.on_delivered();
                return Delivery::Delivered;
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                stats.on_departed();
                if verbosity.dispatches() {
                    tracing::debug!(
                        target: "tagbus",
                        tag = event.tag(),
                        prefix = %self.prefix,
                        "listener departed; event discarded"
                    );
                }
                return Delivery::Departed;
            }
            Err(mpsc::error::TrySendError::Full(ev)) => ev,
        };

        let permit = match &self.in_flight {
            None => None,
            Some(sem) => match Arc::clone(sem).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    stats.on_dropped();
                    tracing::warn!(
                        target: "tagbus",
                        tag = event.tag(),
                        prefix = %self.prefix,
                        "listener saturated; event dropped"
                    );
                    return Delivery::Dropped;
                }
            },
        };

        let sink = self.sink.clone();
        let stats = Arc::clone(stats);
        tokio::spawn(async move {
            let _permit = permit;
            match sink.send(ev).await {
                Ok(()) => stats.on_delivered(),
                Err(_) => stats.on_departed(),
            }
        });
        Delivery::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn listener(
        prefix: &str,
        cap: usize,
        limit: Option<usize>,
    ) -> (Listener<u32>, mpsc::Receiver<Event<u32>>) {
        let (tx, rx) = mpsc::channel(cap);
        (Listener::new(Arc::from(prefix), tx, limit), rx)
    }

    #[tokio::test]
    async fn test_deliver_to_present_listener() {
        let stats = Arc::new(DispatchStats::default());
        let (l, mut rx) = listener(".", 1, None);
        let ev = Event::signal(".");

        assert_eq!(l.deliver(&ev, &stats, Verbosity::Dispatches), Delivery::Delivered);
        assert_eq!(rx.recv().await, Some(ev));
        assert_eq!(stats.snapshot().delivered, 1);
    }

    #[tokio::test]
    async fn test_deliver_to_departed_listener() {
        let stats = Arc::new(DispatchStats::default());
        let (l, mut rx) = listener(".", 1, None);
        rx.close();

        assert!(l.is_departed());
        assert_eq!(
            l.deliver(&Event::signal("."), &stats, Verbosity::Dispatches),
            Delivery::Departed
        );
        assert_eq!(stats.snapshot().departed, 1);
    }

    #[tokio::test]
    async fn test_non_matching_event_is_not_sent() {
        let stats = Arc::new(DispatchStats::default());
        let (l, rx) = listener("nomatch", 1, None);

        assert_eq!(
            l.deliver(&Event::signal("."), &stats, Verbosity::Silent),
            Delivery::Skipped
        );
        assert!(rx.is_empty());
        assert_eq!(l.prefix(), "nomatch");
        assert_eq!(stats.snapshot().skipped, 1);
    }

    #[tokio::test]
    async fn test_full_buffer_takes_slow_path() {
        let stats = Arc::new(DispatchStats::default());
        let (l, mut rx) = listener("", 1, None);

        assert_eq!(l.deliver(&Event::new("a", 1), &stats, Verbosity::Silent), Delivery::Delivered);
        assert_eq!(l.deliver(&Event::new("b", 2), &stats, Verbosity::Silent), Delivery::Pending);

        assert_eq!(rx.recv().await, Some(Event::new("a", 1)));
        let second = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("slow path delivery");
        assert_eq!(second, Some(Event::new("b", 2)));
    }

    #[tokio::test]
    async fn test_slow_path_to_departing_listener() {
        let stats = Arc::new(DispatchStats::default());
        let (l, mut rx) = listener("", 1, None);

        assert_eq!(l.deliver(&Event::new("a", 1), &stats, Verbosity::Silent), Delivery::Delivered);
        assert_eq!(l.deliver(&Event::new("b", 2), &stats, Verbosity::Silent), Delivery::Pending);
        rx.close();

        tokio::time::timeout(Duration::from_secs(1), async {
            while stats.snapshot().departed == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("pending delivery should observe the close");
    }

    #[tokio::test]
    async fn test_in_flight_limit_drops_excess() {
        let stats = Arc::new(DispatchStats::default());
        let (l, _rx) = listener("", 1, Some(1));

        assert_eq!(l.deliver(&Event::new("a", 1), &stats, Verbosity::Silent), Delivery::Delivered);
        assert_eq!(l.deliver(&Event::new("b", 2), &stats, Verbosity::Silent), Delivery::Pending);
        assert_eq!(l.deliver(&Event::new("c", 3), &stats, Verbosity::Silent), Delivery::Dropped);
        assert_eq!(stats.snapshot().dropped, 1);
    }
}
