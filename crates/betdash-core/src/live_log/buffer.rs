// ── Bounded log buffer ──
//
// FIFO eviction once the buffer holds `capacity` entries. Every append gets a
// sequence number so readers can pick up only what is new.

use std::collections::VecDeque;

/// Maximum number of entries kept by the live-log store.
pub const LOG_CAPACITY: usize = 1000;

/// Ordered log lines, oldest first, never longer than its capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBuffer {
    entries: VecDeque<String>,
    capacity: usize,
    /// Entries ever appended, including evicted and cleared ones.
    appended: u64,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    /// A buffer holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(LOG_CAPACITY)),
            capacity,
            appended: 0,
        }
    }

    /// Append an entry, evicting the oldest if the buffer is full.
    pub fn push(&mut self, entry: impl Into<String>) {
        while self.entries.len() >= self.capacity {
            let _ = self.entries.pop_front();
        }
        self.entries.push_back(entry.into());
        self.appended += 1;
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

    pub fn first(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    /// Sequence number of the newest entry (0 before the first append).
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Retained entries with a sequence number greater than `seen`.
    pub fn entries_after(&self, seen: u64) -> impl Iterator<Item = &str> {
        let unseen = self.appended.saturating_sub(seen);
        let take = usize::try_from(unseen).map_or(self.entries.len(), |n| n.min(self.entries.len()));
        self.entries
            .iter()
            .skip(self.entries.len() - take)
            .map(String::as_str)
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ── LogCursor ────────────────────────────────────────────────────────

/// Remembers how far a reader has consumed a [`LogBuffer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCursor {
    seen: u64,
}

impl LogCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries appended since the last call, still present in the buffer.
    pub fn take_new(&mut self, buffer: &LogBuffer) -> Vec<String> {
        let fresh = buffer.entries_after(self.seen).map(str::to_owned).collect();
        self.seen = buffer.appended();
        fresh
    }
}
