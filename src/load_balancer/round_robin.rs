//! Round-robin worker selection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::load_balancer::{worker::Worker, Selection, Selector};

/// Shared rotation cursor.
///
/// The stored value always stays in `[0, len)` for the `len` it was last
/// advanced with. Reading the candidate index and advancing it happen in one
/// atomic read-modify-write; nothing else runs under it.
#[derive(Debug, Default)]
pub struct Cursor {
    next: AtomicUsize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current (normalized) position and advance by one, mod `len`.
    pub fn advance(&self, len: usize) -> usize {
        debug_assert!(len > 0);
        let previous = match self.next.fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| {
            Some((c % len + 1) % len)
        }) {
            Ok(c) | Err(c) => c,
        };
        previous % len
    }

    /// The next candidate index without advancing.
    pub fn position(&self, len: usize) -> usize {
        self.next.load(Ordering::Acquire) % len
    }
}

/// Round-robin selector.
///
/// One call is one attempt: a dead worker at the cursor yields
/// [`Selection::Skipped`] and the caller decides whether to try again.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: Cursor,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

impl Selector for RoundRobin {
    fn select(&self, _path: &str, workers: &[Arc<Worker>]) -> Selection {
        if workers.is_empty() || !workers.iter().any(|w| w.is_alive()) {
            return Selection::Unavailable;
        }

        let index = self.cursor.advance(workers.len());
        let candidate = &workers[index];
        if candidate.is_alive() {
            Selection::Selected(candidate.clone())
        } else {
            Selection::Skipped
        }
    }
}
