//! Deferred callbacks for a single dialog
//!
//! Timers are fire-and-forget: there is no cancellation, every deferred
//! action re-invokes an idempotent dialog operation.

use std::time::Duration;
use tokio::time::Instant;

/// Action to run once a timer is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Undelayed hide, scheduled by `hide_after`
    Hide,
    /// Drop the initial hidden marker after the dialog was attached
    Reveal,
    /// Detach after the hide transition has run
    Remove,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due: Instant,
    seq: u64,
    action: Deferred,
}

/// Pending deferred actions ordered by due time, then scheduling order
#[derive(Debug, Default)]
pub struct Timers {
    entries: Vec<Entry>,
    seq: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run `delay` after `base`
    pub fn schedule(&mut self, base: Instant, delay: Duration, action: Deferred) {
        self.entries.push(Entry {
            due: base + delay,
            seq: self.seq,
            action,
        });
        self.seq += 1;
    }

    /// Pop the earliest entry due at or before `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, Deferred)> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= now)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(index, _)| index)?;
        let entry = self.entries.remove(index);
        Some((entry.due, entry.action))
    }

    /// Earliest due time, if anything is pending
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
