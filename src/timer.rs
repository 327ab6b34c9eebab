//! Single-shot deferred timer handle.
//!
//! [`DeferredTimer`] holds at most one outstanding deadline. Scheduling
//! replaces (cancels) the previous deadline, cancelling is always safe, and
//! a deadline fires at most once. Nothing runs on its own: the owner asks
//! [`DeferredTimer::fire_if_due`] whether the deadline has passed.

use std::time::{Duration, Instant};

/// Identifies one scheduled deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    id: TimerId,
    deadline: Instant,
}

#[derive(Debug, Default)]
pub struct DeferredTimer {
    pending: Option<Pending>,
    next_id: u64,
}

impl DeferredTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a deadline, cancelling any outstanding one first.
    pub fn schedule(&mut self, deadline: Instant) -> TimerId {
        self.cancel();
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending = Some(Pending { id, deadline });
        id
    }

    /// Cancel the outstanding deadline, if any.
    ///
    /// Returns true if something was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_id(&self) -> Option<TimerId> {
        self.pending.map(|p| p.id)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// Time left until the deadline, saturating at zero.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline().map(|d| d.saturating_duration_since(now))
    }

    /// Consume the deadline if it has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<TimerId> {
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                Some(p.id)
            }
            _ => None,
        }
    }
}
