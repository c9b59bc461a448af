//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`] centralized settings for one dispatcher instance.
//!
//! ## Sentinel values
//! - `max_in_flight = 0` → unbounded slow-path deliveries per subscription
//! - capacities of `0` are clamped to `1` (tokio channels need room for one item)

use super::verbosity::Verbosity;

/// Settings for one [`Dispatcher`](crate::Dispatcher).
///
/// ## Field semantics
/// - `queue_capacity`: inbound announce/subscribe queue size (min 1)
/// - `subscription_capacity`: per-subscription buffered events (min 1)
/// - `verbosity`: diagnostic logging level
/// - `max_in_flight`: per-subscription cap on waiting deliveries (`0` = unbounded)
/// - `prune_departed`: drop closed subscriptions before each fan-out round
///
/// ## Notes
/// All fields are public. Prefer the helper accessors to avoid sprinkling
/// sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Capacity of the control task's inbound queues.
    ///
    /// `announce` waits while the queue is full; `try_announce` fails with
    /// [`DispatchError::Full`](crate::DispatchError::Full).
    pub queue_capacity: usize,

    /// Number of events a subscription buffers before deliveries to it take the
    /// slow path (a spawned task waiting for room).
    pub subscription_capacity: usize,

    /// Diagnostic verbosity.
    pub verbosity: Verbosity,

    /// Maximum number of slow-path deliveries waiting on one subscription.
    ///
    /// - `0` = unbounded (a stalled subscriber accumulates waiting deliveries)
    /// - `n > 0` = once `n` deliveries wait, further events for that subscriber are dropped
    pub max_in_flight: usize,

    /// Remove subscriptions whose consumer has closed the handle.
    ///
    /// When `false`, departed subscriptions stay in the live set and every
    /// matching event is still attempted (and discarded) for them.
    pub prune_departed: bool,
}

impl DispatcherConfig {
    /// Inbound queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }

    /// Subscription buffer capacity clamped to a minimum of 1.
    #[inline]
    pub fn subscription_capacity_clamped(&self) -> usize {
        self.subscription_capacity.max(1)
    }

    /// Returns the in-flight limit as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(n)` → at most `n` waiting deliveries per subscription
    #[inline]
    pub fn in_flight_limit(&self) -> Option<usize> {
        if self.max_in_flight == 0 {
            None
        } else {
            Some(self.max_in_flight)
        }
    }

    /// Returns a copy with the given verbosity.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `queue_capacity = 1024`
    /// - `subscription_capacity = 64`
    /// - `verbosity = Silent`
    /// - `max_in_flight = 0` (unbounded)
    /// - `prune_departed = true`
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            subscription_capacity: 64,
            verbosity: Verbosity::Silent,
            max_in_flight: 0,
            prune_departed: true,
        }
    }
}
