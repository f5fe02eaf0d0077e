// ── Capped newest-first log ──
//
// Backing storage for the audit trail, alert inbox and pending scans.
// Inserts go to the front; anything past capacity falls off the back.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct CappedLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> CappedLog<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, evicting the oldest entries beyond capacity.
    pub fn push(&mut self, entry: T) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Remove and return the first (newest) entry matching `pred`.
    pub fn take_first(&mut self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let idx = self.entries.iter().position(pred)?;
        self.entries.remove(idx)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T: Clone> CappedLog<T> {
    /// Owned copy of every entry, newest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}
