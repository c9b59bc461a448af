//! # Control loop: the single owner of the live subscription set.
//!
//! One [`ControlLoop`] runs per dispatcher as its own tokio task. It is the only
//! code that touches the listener list, so no locks are involved.
//!
//! ## Architecture
//! ```text
//! Dispatcher::subscribe ──► [commands] ──┐
//! Dispatcher::subscriber_count ──────────┤
//!                                        ├──► ControlLoop::run()
//! Dispatcher::announce ──► [announcements]┘        │
//!                                                  ├─ Subscribe → append listener, ack
//!                                                  ├─ Count     → prune, reply len
//!                                                  └─ Event     → prune, fan out:
//!                                                        ┌──────────┼──────────┐
//!                                                        ▼          ▼          ▼
//!                                                   listener 1  listener 2  listener N
//!                                                   (try_send or spawned send per listener)
//! ```
//!
//! ## Rules
//! - **Serialized matching**: events are matched in the order the loop receives
//!   them, against the listeners live at that moment.
//! - **Never blocks on delivery**: the loop only awaits its inbound queues.
//! - **Announcements first**: queued announcements are drained before the next
//!   command, so a listener never sees an event whose `announce` returned before
//!   its `subscribe` was issued.
//! - **Registration races**: a `subscribe` from one task and an `announce` from
//!   another may be received in either order; the new listener may or may not see
//!   that event.
//! - **Exit**: on cancellation, or once every `Dispatcher` handle is gone and both
//!   queues are drained. Dropping the listeners ends every open subscription.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::listener::{Delivery, Listener};
use super::stats::DispatchStats;
use super::verbosity::Verbosity;
use crate::events::Event;

/// Requests other than announcements.
pub(crate) enum Command<T> {
    /// Register a listener; `ack` fires once it is part of the live set.
    Subscribe {
        listener: Listener<T>,
        ack: oneshot::Sender<()>,
    },
    /// Report the number of live listeners.
    Count { reply: oneshot::Sender<usize> },
}

/// Why the control loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitReason {
    /// `Dispatcher::shutdown` was called.
    Cancelled,
    /// All handles dropped and queues drained.
    Detached,
}

/// State owned by one dispatcher's control task.
pub(crate) struct ControlLoop<T> {
    listeners: Vec<Listener<T>>,
    commands: mpsc::Receiver<Command<T>>,
    announcements: mpsc::Receiver<Event<T>>,
    token: CancellationToken,
    stats: Arc<DispatchStats>,
    verbosity: Verbosity,
    prune_departed: bool,
}

impl<T> ControlLoop<T>
where
    T: Clone + Send + 'static,
{
    pub(crate) fn new(
        commands: mpsc::Receiver<Command<T>>,
        announcements: mpsc::Receiver<Event<T>>,
        token: CancellationToken,
        stats: Arc<DispatchStats>,
        verbosity: Verbosity,
        prune_departed: bool,
    ) -> Self {
        Self {
            listeners: Vec::new(),
            commands,
            announcements,
            token,
            stats,
            verbosity,
            prune_departed,
        }
    }

    /// Runs until cancelled or detached.
    pub(crate) async fn run(mut self) -> ExitReason {
        tracing::debug!(target: "tagbus", "dispatcher control loop started");

        let mut commands_open = true;
        let mut announcements_open = true;

        let reason = loop {
            if !commands_open && !announcements_open {
                break ExitReason::Detached;
            }
            tokio::select! {
                biased;

                _ = self.token.cancelled() => break ExitReason::Cancelled,
                event = self.announcements.recv(), if announcements_open => match event {
                    Some(event) => self.handle_announcement(event),
                    None => announcements_open = false,
                },
                cmd = self.commands.recv(), if commands_open => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => commands_open = false,
                },
            }
        };

        tracing::debug!(
            target: "tagbus",
            reason = ?reason,
            listeners = self.listeners.len(),
            "dispatcher control loop stopped"
        );
        reason
    }

    fn handle_command(&mut self, cmd: Command<T>) {
        match cmd {
            Command::Subscribe { listener, ack } => {
                if self.verbosity.subscriptions() {
                    tracing::debug!(
                        target: "tagbus",
                        prefix = listener.prefix(),
                        "listener registered interest in prefix"
                    );
                }
                self.listeners.push(listener);
                let _ = ack.send(());
            }
            Command::Count { reply } => {
                if self.prune_departed {
                    self.prune();
                }
                let _ = reply.send(self.listeners.len());
            }
        }
    }

    fn handle_announcement(&mut self, event: Event<T>) {
        self.stats.on_announced();
        if self.verbosity.occurrences() {
            tracing::debug!(
                target: "tagbus",
                tag = event.tag(),
                has_data = event.data().is_some(),
                listeners = self.listeners.len(),
                "event occurred"
            );
        }

        if self.prune_departed {
            self.prune();
        }
        let mut matched = 0usize;
        for listener in &self.listeners {
            match listener.deliver(&event, &self.stats, self.verbosity) {
                Delivery::Delivered | Delivery::Pending => matched += 1,
                Delivery::Skipped | Delivery::Departed | Delivery::Dropped => {}
            }
        }
        if matched == 0 && self.verbosity.dispatches() {
            tracing::debug!(target: "tagbus", tag = event.tag(), "event reached no listener");
        }
    }

    /// Drops listeners whose consumer closed the handle.
    fn prune(&mut self) {
        let before = self.listeners.len();
        self.listeners.retain(|l| !l.is_departed());

        let removed = before - self.listeners.len();
        if removed > 0 {
            self.stats.on_pruned(removed);
            if self.verbosity.subscriptions() {
                tracing::debug!(
                    target: "tagbus",
                    removed,
                    remaining = self.listeners.len(),
                    "departed listeners pruned"
                );
            }
        }
    }
}
