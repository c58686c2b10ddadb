//! Capacity-bounded FIFO of trend snapshots.

use std::collections::VecDeque;

use super::types::HistoryEntry;

/// Default number of entries kept for the trend chart.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Append-only ring of the most recent [`HistoryEntry`] values.
///
/// Once full, each new entry evicts the oldest one.
///
/// # Examples
///
/// ```
/// use dc_sim::sim::history::HistoryRing;
/// use dc_sim::sim::types::HistoryEntry;
///
/// let mut ring = HistoryRing::new(2);
/// for t in 0..3 {
///     ring.record(HistoryEntry {
///         time: t.to_string(),
///         power: 3200.0,
///         temperature: 24.8,
///         utilization: 72.0,
///     });
/// }
/// let times: Vec<_> = ring.iter().map(|e| e.time.as_str()).collect();
/// assert_eq!(times, ["1", "2"]);
/// ```
#[derive(Debug, Clone)]
pub struct HistoryRing {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryRing {
    /// Creates an empty ring holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `entry` at the tail, dropping from the head past capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Empties the ring.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Ordered copy of the entries, oldest first.
    pub fn contents(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Iterates entries oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> + '_ {
        self.entries.iter()
    }

    /// Most recently recorded entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been recorded since the last reset.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
