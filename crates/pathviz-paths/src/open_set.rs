//! The A* frontier: a min-heap keyed by `(f, insertion order)`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Sentinel score meaning "not reached yet" (+infinity).
pub const UNREACHABLE: i32 = i32::MAX;

// ---------------------------------------------------------------------------
// Per-cell search bookkeeping
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) g: i32,
    pub(crate) f: i32,
    /// Predecessor index, `usize::MAX` when the node has none.
    pub(crate) parent: usize,
    /// Mirrors membership in the open set.
    pub(crate) open: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: UNREACHABLE,
            f: UNREACHABLE,
            parent: usize::MAX,
            open: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A heap entry. Cells have no natural order, so equal `f` scores are
/// broken by `seq`, which grows by one per push and is never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Entry {
    pub(crate) f: i32,
    pub(crate) seq: u64,
    pub(crate) idx: usize,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.f
            .cmp(&other.f)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// OpenSet
// ---------------------------------------------------------------------------

/// Frontier ordered ascending by `(f, seq)`: lowest estimate first, FIFO
/// among equal estimates.
#[derive(Debug, Default)]
pub(crate) struct OpenSet {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl OpenSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Push `idx` with score `f`, assigning it the next sequence number.
    pub(crate) fn push(&mut self, idx: usize, f: i32) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { f, seq, idx }));
        seq
    }

    pub(crate) fn pop(&mut self) -> Option<Entry> {
        self.heap.pop().map(|Reverse(e)| e)
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_score_first() {
        let mut open = OpenSet::new();
        open.push(10, 5);
        open.push(11, 3);
        open.push(12, 4);
        assert_eq!(open.pop().map(|e| e.idx), Some(11));
        assert_eq!(open.pop().map(|e| e.idx), Some(12));
        assert_eq!(open.pop().map(|e| e.idx), Some(10));
        assert!(open.pop().is_none());
    }

    #[test]
    fn equal_scores_are_fifo() {
        let mut open = OpenSet::new();
        for idx in [7, 3, 9, 1] {
            open.push(idx, 2);
        }
        let order: Vec<usize> = std::iter::from_fn(|| open.pop()).map(|e| e.idx).collect();
        assert_eq!(order, vec![7, 3, 9, 1]);
    }

    #[test]
    fn sequence_numbers_are_never_reused() {
        let mut open = OpenSet::new();
        assert_eq!(open.push(0, 1), 0);
        open.pop();
        assert_eq!(open.push(0, 1), 1);
        assert_eq!(open.push(1, 1), 2);
        assert_eq!(open.len(), 2);
    }

    #[test]
    fn fresh_node_is_unreached() {
        let n = Node::default();
        assert_eq!(n.g, UNREACHABLE);
        assert_eq!(n.f, UNREACHABLE);
        assert!(!n.open);
    }
}
