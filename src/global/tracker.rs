//! Live-consumer counts per style identity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::identity::StyleId;

/// A tracker shared between every binder that uses it.
pub type SharedTracker = Arc<Mutex<ReferenceTracker>>;

static GLOBAL_TRACKER: Lazy<SharedTracker> = Lazy::new(ReferenceTracker::shared);

/// Result of releasing one reference to an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Other consumers still reference the identity
    Remaining(usize),
    /// This was the last reference; the rules may be removed
    Unreferenced,
    /// The count was already zero (a duplicate teardown); nothing to do
    AlreadyUnreferenced,
}

/// Counts how many mounted consumers reference each style identity.
///
/// Entries are created on first mount and never dropped, so a count can
/// linger at zero. The process-wide instance from [`global`](Self::global)
/// outlives any descriptor, which lets counts survive a style being
/// rebuilt from the same template (as happens on live reload).
#[derive(Debug, Default)]
pub struct ReferenceTracker {
    counts: HashMap<StyleId, usize>,
}

impl ReferenceTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tracker ready to be shared.
    pub fn shared() -> SharedTracker {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Returns the process-wide tracker.
    pub fn global() -> SharedTracker {
        Arc::clone(&GLOBAL_TRACKER)
    }

    /// Records one more consumer of `id`, returning the new count.
    pub fn acquire(&mut self, id: &StyleId) -> usize {
        let count = self.counts.entry(id.clone()).or_insert(0);
        *count += 1;
        *count
    }

    /// Records one fewer consumer of `id`. Never goes below zero.
    pub fn release(&mut self, id: &StyleId) -> Release {
        match self.counts.get_mut(id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                Release::Remaining(*count)
            }
            Some(count) if *count == 1 => {
                *count = 0;
                Release::Unreferenced
            }
            _ => Release::AlreadyUnreferenced,
        }
    }

    /// Returns the current count for `id` (zero if never seen).
    pub fn count(&self, id: &StyleId) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Returns true if at least one consumer references `id`.
    pub fn is_referenced(&self, id: &StyleId) -> bool {
        self.count(id) > 0
    }

    /// Returns every identity with a nonzero count.
    pub fn referenced(&self) -> impl Iterator<Item = &StyleId> {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(id, _)| id)
    }
}
