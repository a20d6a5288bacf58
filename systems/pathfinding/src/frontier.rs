//! Priority frontier ordered by combined `f` with a fixed tie-break.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use hex_treasure_core::CellCoord;

/// Ordering key of a frontier entry: `(f, column, row)`, smallest first.
///
/// `f` is compared with [`f64::total_cmp`] so the ordering is total.
#[derive(Clone, Copy, Debug)]
pub struct FrontierKey {
    /// Combined `f` the cell was pushed with.
    pub f: f64,
    /// Cell the entry refers to.
    pub cell: CellCoord,
}

impl PartialEq for FrontierKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierKey {}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then(self.cell.column().cmp(&other.cell.column()))
            .then(self.cell.row().cmp(&other.cell.row()))
    }
}

/// Min-ordered open list. Stale entries are left in place and skipped by the
/// caller once their cell is closed.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<FrontierKey>>,
}

impl Frontier {
    /// Creates an empty frontier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `cell` with priority `f`.
    pub fn push(&mut self, cell: CellCoord, f: f64) {
        self.heap.push(Reverse(FrontierKey { f, cell }));
    }

    /// Removes the entry with the lowest key.
    pub fn pop(&mut self) -> Option<FrontierKey> {
        self.heap.pop().map(|Reverse(key)| key)
    }
}
