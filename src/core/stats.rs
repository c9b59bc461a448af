//! # Dispatch counters.
//!
//! [`DispatchStats`] is shared between the control task and its delivery tasks;
//! all counters are relaxed atomics. Read them through [`StatsSnapshot`].

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters of one dispatcher.
#[derive(Debug, Default)]
pub(crate) struct DispatchStats {
    announced: AtomicU64,
    delivered: AtomicU64,
    skipped: AtomicU64,
    departed: AtomicU64,
    dropped: AtomicU64,
    pruned: AtomicU64,
}

impl DispatchStats {
    #[inline]
    pub(crate) fn on_announced(&self) {
        self.announced.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn on_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn on_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn on_departed(&self) {
        self.departed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn on_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn on_pruned(&self, n: usize) {
        self.pruned.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            announced: self.announced.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            departed: self.departed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            pruned: self.pruned.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a dispatcher's counters.
///
/// Counters are updated by concurrent tasks, so a snapshot taken while
/// deliveries are in flight may lag behind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Events accepted by the control task.
    pub announced: u64,
    /// Copies placed into a subscriber's buffer.
    pub delivered: u64,
    /// Subscription checks that did not match the tag.
    pub skipped: u64,
    /// Deliveries abandoned because the subscriber had closed its handle.
    pub departed: u64,
    /// Deliveries dropped because the in-flight limit was reached.
    pub dropped: u64,
    /// Departed subscriptions removed from the live set.
    pub pruned: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = DispatchStats::default();
        stats.on_announced();
        stats.on_delivered();
        stats.on_delivered();
        stats.on_skipped();
        stats.on_departed();
        stats.on_dropped();
        stats.on_pruned(3);

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                announced: 1,
                delivered: 2,
                skipped: 1,
                departed: 1,
                dropped: 1,
                pruned: 3,
            }
        );
    }
}
