//! # Dispatcher: handle to one control loop.
//!
//! [`Dispatcher`] is a cheap, cloneable handle. Creating one spawns a
//! [`ControlLoop`](super::control) task; every clone talks to that same task.
//! Independent `Dispatcher::new` calls produce fully isolated instances.
//!
//! ## Suspension points
//! - `subscribe` waits until the listener is part of the live set.
//! - `announce` waits until the event is in the inbound queue (not until delivery).
//! - `Subscription::recv` waits for the next matching event.
//!
//! ## Lifecycle
//! ```text
//! Dispatcher::new(cfg) ──► spawn ControlLoop::run()
//!        │
//!        ├─ clone() ... clone()          (all share one control loop)
//!        │
//!        ├─ shutdown()                   → loop exits now, subscriptions end
//!        └─ last handle dropped          → loop drains queues, exits, subscriptions end
//! ```
//!
//! ## Example
//! ```rust
//! use tagbus::{Dispatcher, DispatcherConfig, Event};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus: Dispatcher<u32> = Dispatcher::new(DispatcherConfig::default());
//!
//!     let mut jobs = bus.subscribe("job.").await;
//!     bus.announce(Event::new("job.done", 7)).await;
//!     bus.signal("other.thing").await;
//!
//!     let ev = jobs.recv().await.unwrap();
//!     assert_eq!(ev.tag(), "job.done");
//!     assert_eq!(ev.data(), Some(&7));
//! }
//! ```

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::config::DispatcherConfig;
use super::control::{Command, ControlLoop};
use super::listener::Listener;
use super::stats::{DispatchStats, StatsSnapshot};
use crate::error::DispatchError;
use crate::events::{Event, Payload, Subscription};

struct Inner<T> {
    commands: mpsc::Sender<Command<T>>,
    announcements: mpsc::Sender<Event<T>>,
    token: CancellationToken,
    stats: Arc<DispatchStats>,
    cfg: DispatcherConfig,
}

/// Tag-prefix event dispatcher.
pub struct Dispatcher<T = Payload> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("cfg", &self.inner.cfg)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<T> Dispatcher<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a dispatcher whose control loop runs on the current tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime, like [`tokio::spawn`].
    pub fn new(cfg: DispatcherConfig) -> Self {
        Self::spawn_on(cfg, &Handle::current())
    }

    /// Creates a dispatcher whose control loop runs on the given runtime.
    pub fn spawn_on(cfg: DispatcherConfig, runtime: &Handle) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(cfg.queue_capacity_clamped());
        let (ann_tx, ann_rx) = mpsc::channel(cfg.queue_capacity_clamped());
        let token = CancellationToken::new();
        let stats = Arc::new(DispatchStats::default());

        let control = ControlLoop::new(
            cmd_rx,
            ann_rx,
            token.clone(),
            Arc::clone(&stats),
            cfg.verbosity,
            cfg.prune_departed,
        );
        runtime.spawn(control.run());

        Self {
            inner: Arc::new(Inner {
                commands: cmd_tx,
                announcements: ann_tx,
                token,
                stats,
                cfg,
            }),
        }
    }

    /// Registers interest in every future event whose tag starts with `prefix`.
    ///
    /// The empty prefix matches all events. Returns once the subscription is live:
    /// any event this task announces afterwards is matched against it, and none
    /// it announced before is.
    ///
    /// On a stopped dispatcher the returned subscription is already ended
    /// (`recv` yields `None`).
    pub async fn subscribe(&self, prefix: impl Into<Arc<str>>) -> Subscription<T> {
        let prefix: Arc<str> = prefix.into();
        let (tx, rx) = mpsc::channel(self.inner.cfg.subscription_capacity_clamped());
        let listener = Listener::new(Arc::clone(&prefix), tx, self.inner.cfg.in_flight_limit());
        let (ack, acked) = oneshot::channel();

        if self
            .inner
            .commands
            .send(Command::Subscribe { listener, ack })
            .await
            .is_ok()
        {
            // A dropped ack means the loop stopped; the subscription then just ends.
            let _ = acked.await;
        } else {
            tracing::debug!(
                target: "tagbus",
                prefix = %prefix,
                "dispatcher closed; subscription ended"
            );
        }
        Subscription::new(prefix, rx)
    }

    /// Submits `event` for matching against all live subscriptions.
    ///
    /// Returns once the event is queued; delivery continues asynchronously.
    /// Subscribers that went away are skipped silently, and an announcement on
    /// a stopped dispatcher is discarded.
    pub async fn announce(&self, event: Event<T>) {
        if self.inner.token.is_cancelled() {
            return;
        }
        if let Err(mpsc::error::SendError(event)) = self.inner.announcements.send(event).await {
            tracing::debug!(
                target: "tagbus",
                tag = event.tag(),
                "dispatcher closed; announcement discarded"
            );
        }
    }

    /// Announces a tag-only event.
    pub async fn signal(&self, tag: impl Into<Arc<str>>) {
        self.announce(Event::signal(tag)).await;
    }

    /// Submits `event` without waiting for queue capacity.
    ///
    /// # Errors
    /// - [`DispatchError::Full`] if the inbound queue is full
    /// - [`DispatchError::Closed`] if the dispatcher has stopped
    pub fn try_announce(&self, event: Event<T>) -> Result<(), DispatchError> {
        if self.inner.token.is_cancelled() {
            return Err(DispatchError::Closed);
        }
        self.inner
            .announcements
            .try_send(event)
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DispatchError::Full,
                mpsc::error::TrySendError::Closed(_) => DispatchError::Closed,
            })
    }

    /// Number of live subscriptions, as seen by the control loop.
    ///
    /// With pruning enabled, departed subscriptions are removed first.
    /// Returns `0` for a stopped dispatcher.
    pub async fn subscriber_count(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        if self
            .inner
            .commands
            .send(Command::Count { reply })
            .await
            .is_err()
        {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}

impl<T> Dispatcher<T> {
    /// Current counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Configuration this dispatcher was created with.
    pub fn config(&self) -> &DispatcherConfig {
        &self.inner.cfg
    }

    /// Stops the control loop.
    ///
    /// Open subscriptions end once their buffered events are drained. Later
    /// `announce` calls are discarded and `try_announce` reports `Closed`.
    /// Affects every clone of this handle.
    pub fn shutdown(&self) {
        self.inner.token.cancel();
    }

    /// Returns `true` after `shutdown` or once the control loop has exited.
    pub fn is_closed(&self) -> bool {
        self.inner.token.is_cancelled() || self.inner.announcements.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const QUIET: Duration = Duration::from_millis(25);

    fn dispatcher<T: Clone + Send + 'static>() -> Dispatcher<T> {
        Dispatcher::new(DispatcherConfig::default())
    }

    async fn recv<T>(sub: &mut Subscription<T>) -> Option<Event<T>> {
        tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("timed out waiting for event")
    }

    async fn assert_quiet<T: std::fmt::Debug>(sub: &mut Subscription<T>) {
        let got = tokio::time::timeout(QUIET, sub.recv()).await;
        assert!(got.is_err(), "unexpected delivery: {got:?}");
    }

    #[tokio::test]
    async fn test_equal_tag_is_delivered_once() {
        let bus = dispatcher::<()>();
        let mut sub = bus.subscribe(".").await;

        bus.announce(Event::signal(".")).await;

        assert_eq!(recv(&mut sub).await, Some(Event::signal(".")));
        assert_quiet(&mut sub).await;
    }

    async fn earlier_announce_is_not_seen(rounds: usize) {
        for _ in 0..rounds {
            let bus = dispatcher::<()>();
            bus.signal("early").await;
            let mut sub = bus.subscribe("").await;
            bus.signal("late").await;

            assert_eq!(recv(&mut sub).await, Some(Event::signal("late")));
            assert_quiet(&mut sub).await;
        }
    }

    #[tokio::test]
    async fn test_subscribe_ignores_earlier_announces() {
        earlier_announce_is_not_seen(50).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_subscribe_ignores_earlier_announces_multi_thread() {
        earlier_announce_is_not_seen(50).await;
    }

    #[tokio::test]
    async fn test_non_matching_tag_is_not_delivered() {
        let bus = dispatcher::<()>();
        let mut sub = bus.subscribe("nomatch").await;

        bus.announce(Event::signal(".")).await;

        assert_quiet(&mut sub).await;
    }

    #[tokio::test]
    async fn test_prefix_scenario() {
        let bus = dispatcher::<()>();
        let mut sub = bus.subscribe("a.").await;

        bus.announce(Event::signal("a.b")).await;
        bus.announce(Event::signal("x.y")).await;

        assert_eq!(recv(&mut sub).await, Some(Event::signal("a.b")));
        assert_quiet(&mut sub).await;
    }

    #[tokio::test]
    async fn test_empty_prefix_receives_everything() {
        let bus = dispatcher::<i32>();
        let mut sub = bus.subscribe("").await;

        bus.announce(Event::new("anything", 42)).await;

        assert_eq!(recv(&mut sub).await, Some(Event::new("anything", 42)));
    }

    #[tokio::test]
    async fn test_matching_is_case_sensitive_and_literal() {
        let bus = dispatcher::<()>();
        let mut sub = bus.subscribe("Job.*").await;

        bus.signal("job.done").await;
        bus.signal("Job.done").await;

        assert_quiet(&mut sub).await;
    }

    #[tokio::test]
    async fn test_every_matching_subscriber_receives() {
        let bus = dispatcher::<u8>();
        let mut narrow = bus.subscribe("a.b").await;
        let mut wide = bus.subscribe("a").await;
        let mut other = bus.subscribe("b").await;

        bus.announce(Event::new("a.b.c", 1)).await;

        assert_eq!(recv(&mut narrow).await, Some(Event::new("a.b.c", 1)));
        assert_eq!(recv(&mut wide).await, Some(Event::new("a.b.c", 1)));
        assert_quiet(&mut other).await;
    }

    #[tokio::test]
    async fn test_close_then_announce_does_not_disturb_others() {
        let bus = dispatcher::<()>();
        let mut closed = bus.subscribe("x").await;
        let mut open = bus.subscribe("x").await;
        closed.close();

        bus.announce(Event::signal("x")).await;

        assert_eq!(recv(&mut open).await, Some(Event::signal("x")));
        assert_eq!(closed.recv().await, None);
    }

    #[tokio::test]
    async fn test_dropped_subscription_is_pruned() {
        let bus = dispatcher::<()>();
        let dropped = bus.subscribe("x").await;
        let _kept = bus.subscribe("x").await;
        assert_eq!(bus.subscriber_count().await, 2);

        drop(dropped);
        bus.signal("x").await;

        assert_eq!(bus.subscriber_count().await, 1);
        assert_eq!(bus.stats().pruned, 1);
    }

    #[tokio::test]
    async fn test_instances_are_isolated() {
        let a = dispatcher::<()>();
        let b = dispatcher::<()>();
        let mut on_a = a.subscribe("").await;
        let mut on_b = b.subscribe("").await;

        a.signal("from.a").await;
        b.signal("from.b").await;

        assert_eq!(recv(&mut on_a).await, Some(Event::signal("from.a")));
        assert_eq!(recv(&mut on_b).await, Some(Event::signal("from.b")));
        assert_quiet(&mut on_a).await;
        assert_quiet(&mut on_b).await;
    }

    #[tokio::test]
    async fn test_clones_share_one_control_loop() {
        let bus = dispatcher::<()>();
        let other = bus.clone();
        let mut sub = bus.subscribe("t").await;

        other.signal("t.1").await;

        assert_eq!(recv(&mut sub).await, Some(Event::signal("t.1")));
        assert_eq!(other.subscriber_count().await, 1);
    }

    #[tokio::test]
    async fn test_slow_subscriber_does_not_block_others() {
        let cfg = DispatcherConfig {
            subscription_capacity: 1,
            ..DispatcherConfig::default()
        };
        let bus: Dispatcher<u32> = Dispatcher::new(cfg);
        let mut stalled = bus.subscribe("").await;
        let mut active = bus.subscribe("").await;

        for i in 0..10 {
            bus.announce(Event::new("n", i)).await;
            assert_eq!(recv(&mut active).await, Some(Event::new("n", i)));
        }

        // The stalled subscriber still gets everything once it drains.
        let mut seen = Vec::new();
        for _ in 0..10 {
            let ev = recv(&mut stalled).await.unwrap();
            seen.push(*ev.data().unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_in_flight_limit_drops_for_stalled_subscriber() {
        let cfg = DispatcherConfig {
            subscription_capacity: 1,
            max_in_flight: 1,
            ..DispatcherConfig::default()
        };
        let bus: Dispatcher<u32> = Dispatcher::new(cfg);
        let _stalled = bus.subscribe("").await;

        for i in 0..5 {
            bus.announce(Event::new("n", i)).await;
        }
        tokio::time::timeout(Duration::from_secs(1), async {
            while bus.stats().announced < 5 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        let stats = bus.stats();
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.dropped, 3);
    }

    #[tokio::test]
    async fn test_shutdown_ends_subscriptions_and_rejects_announces() {
        let bus = dispatcher::<()>();
        let mut sub = bus.subscribe("").await;

        bus.shutdown();
        assert!(bus.is_closed());
        assert_eq!(recv(&mut sub).await, None);

        // Awaiting API stays silent after shutdown.
        bus.signal("late").await;
        assert_eq!(bus.subscriber_count().await, 0);
        assert!(matches!(
            bus.try_announce(Event::signal("late")),
            Err(DispatchError::Closed)
        ));

        let mut late = bus.subscribe("").await;
        assert_eq!(recv(&mut late).await, None);
    }

    #[tokio::test]
    async fn test_dropping_last_handle_ends_subscriptions() {
        let bus = dispatcher::<()>();
        let mut sub = bus.subscribe("").await;
        bus.signal("bye").await;
        drop(bus);

        assert_eq!(recv(&mut sub).await, Some(Event::signal("bye")));
        assert_eq!(recv(&mut sub).await, None);
    }

    #[tokio::test]
    async fn test_try_announce_reports_closed() {
        let bus = dispatcher::<()>();
        bus.shutdown();

        let err = bus.try_announce(Event::signal("x")).unwrap_err();
        assert!(matches!(err, DispatchError::Closed), "got {err:?}");
    }

    #[test]
    fn test_try_announce_reports_full_queue() {
        // A runtime that is never driven: the control loop never drains the queue.
        let idle = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let cfg = DispatcherConfig {
            queue_capacity: 1,
            ..DispatcherConfig::default()
        };
        let bus: Dispatcher<()> = Dispatcher::spawn_on(cfg, idle.handle());

        bus.try_announce(Event::signal("first")).unwrap();
        let err = bus.try_announce(Event::signal("second")).unwrap_err();
        assert!(matches!(err, DispatchError::Full));
        assert!(err.is_retryable());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_announcers() {
        let bus = dispatcher::<usize>();
        let mut sub = bus.subscribe("load.").await;

        let mut joins = Vec::new();
        for worker in 0..4 {
            let bus = bus.clone();
            joins.push(tokio::spawn(async move {
                for i in 0..25 {
                    bus.announce(Event::new(format!("load.{worker}"), i)).await;
                    bus.signal("noise").await;
                }
            }));
        }
        for j in joins {
            j.await.unwrap();
        }

        for _ in 0..100 {
            let ev = recv(&mut sub).await.unwrap();
            assert!(ev.tag().starts_with("load."));
        }
        assert_quiet(&mut sub).await;
    }
}
