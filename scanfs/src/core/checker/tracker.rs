// SPDX-License-Identifier: MIT

//! Visited-cluster set for FAT tree walks.
//!
//! One bit per cluster number. The set covers the whole cluster number space
//! (`0..count`) so that sentinel values can be recorded without special cases.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::vec::Vec;

/// Records every cluster referenced by the directory tree during a check.
///
/// Grows monotonically: nothing is ever unmarked.
///
/// # Example
/// ```
/// use scanfs::core::checker::VisitedClusters;
///
/// let mut visited = VisitedClusters::new(4096);
/// visited.mark(5);
/// assert!(visited.is_marked(5));
/// assert!(!visited.is_marked(6));
/// ```
#[derive(Debug, Clone)]
pub struct VisitedClusters {
    words: Vec<u64>,
    count: usize,
}

impl VisitedClusters {
    /// Creates an empty set able to hold cluster numbers `0..count`.
    pub fn new(count: usize) -> Self {
        Self {
            words: vec![0u64; count.div_ceil(64)],
            count,
        }
    }

    /// Records `cluster`. Recording twice is harmless; out of range values are ignored.
    #[inline]
    pub fn mark(&mut self, cluster: u16) {
        let idx = cluster as usize;
        if idx < self.count {
            self.words[idx / 64] |= 1 << (idx % 64);
        }
    }

    /// Records every cluster of `chain`.
    pub fn mark_all(&mut self, chain: &[u16]) {
        for &c in chain {
            self.mark(c);
        }
    }

    #[inline]
    pub fn is_marked(&self, cluster: u16) -> bool {
        let idx = cluster as usize;
        idx < self.count && self.words[idx / 64] & (1 << (idx % 64)) != 0
    }

    /// Number of distinct clusters recorded so far.
    pub fn marked(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Size of the tracked cluster number space.
    pub fn capacity(&self) -> usize {
        self.count
    }

    /// Unmarked cluster numbers in `range`, ascending.
    pub fn unmarked(&self, range: core::ops::Range<u16>) -> impl Iterator<Item = u16> + '_ {
        range.filter(move |&c| !self.is_marked(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_mark() {
        let mut visited = VisitedClusters::new(4096);

        visited.mark(5);
        assert!(visited.is_marked(5));
        assert!(!visited.is_marked(4));
        assert!(!visited.is_marked(6));
    }

    #[test]
    fn test_mark_twice_counts_once() {
        let mut visited = VisitedClusters::new(64);
        visited.mark(10);
        visited.mark(10);
        assert_eq!(visited.marked(), 1);
    }

    #[test]
    fn test_sentinels_are_recordable() {
        let mut visited = VisitedClusters::new(4096);
        visited.mark(0);
        visited.mark(0xFFF);
        assert!(visited.is_marked(0));
        assert!(visited.is_marked(0xFFF));
    }

    #[test]
    fn test_word_boundaries() {
        let mut visited = VisitedClusters::new(130);
        visited.mark_all(&[63, 64, 128, 129]);
        assert!(visited.is_marked(63) && visited.is_marked(64));
        assert!(!visited.is_marked(65));
        assert!(visited.is_marked(129));
        assert_eq!(visited.marked(), 4);
    }

    #[test]
    fn test_out_of_range() {
        let mut visited = VisitedClusters::new(10);
        visited.mark(100);
        assert!(!visited.is_marked(100));
        assert_eq!(visited.marked(), 0);
    }

    #[test]
    fn test_mark_all_and_unmarked_scan() {
        let mut visited = VisitedClusters::new(32);
        visited.mark_all(&[2, 3, 5]);

        let unmarked: Vec<u16> = visited.unmarked(2..8).collect();
        assert_eq!(unmarked, vec![4, 6, 7]);

        let sampled: Vec<u16> = visited.unmarked(2..8).take(2).collect();
        assert_eq!(sampled, vec![4, 6]);
        assert_eq!(visited.capacity(), 32);
    }
}
