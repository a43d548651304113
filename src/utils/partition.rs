/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::ops::Range;

/// A split of the nodes `0..n` into contiguous ranges, one per worker.
///
/// All parts but possibly the last one have the same length,
/// ⌈*n* / *k*⌉, where *k* is the requested number of parts. If *n* is
/// smaller than *k*, fewer parts are created, so that no part is empty
/// (unless *n* is zero, in which case there are no parts at all).
///
/// The parallel solvers assign part *i* to worker *i*: this is what makes
/// every slot of the rank vector written by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    n: usize,
    part_len: usize,
    num_parts: usize,
}

impl Partition {
    /// Splits `0..n` in at most `parts` contiguous ranges.
    ///
    /// # Panics
    ///
    /// Panics if `parts` is zero.
    pub fn new(n: usize, parts: usize) -> Self {
        assert!(parts > 0, "The number of parts must be positive");
        let part_len = n.div_ceil(parts).max(1);
        Self {
            n,
            part_len,
            num_parts: n.div_ceil(part_len),
        }
    }

    /// Returns the number of elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns true if there are no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns the number of (nonempty) parts.
    #[inline(always)]
    pub fn num_parts(&self) -> usize {
        self.num_parts
    }

    /// Returns the length of all parts except possibly the last one.
    ///
    /// This is the chunk size to pass to methods such as
    /// [`par_chunks_mut`](rayon::slice::ParallelSliceMut::par_chunks_mut) to
    /// obtain exactly the parts of this partition.
    #[inline(always)]
    pub fn part_len(&self) -> usize {
        self.part_len
    }

    /// Returns the range of the given part.
    ///
    /// # Panics
    ///
    /// Panics if `part` is not smaller than [`num_parts`](Self::num_parts).
    #[inline(always)]
    pub fn range(&self, part: usize) -> Range<usize> {
        assert!(
            part < self.num_parts,
            "Part {part} does not exist (there are {} parts)",
            self.num_parts
        );
        let start = part * self.part_len;
        start..(start + self.part_len).min(self.n)
    }

    /// Returns an iterator on the ranges of all parts, in order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.num_parts).map(|part| self.range(part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover() {
        for n in 0..50 {
            for parts in 1..10 {
                let p = Partition::new(n, parts);
                assert!(p.num_parts() <= parts);
                let mut next = 0;
                for r in p.ranges() {
                    assert_eq!(r.start, next);
                    assert!(!r.is_empty());
                    next = r.end;
                }
                assert_eq!(next, n);
            }
        }
    }

    #[test]
    fn test_fewer_nodes_than_parts() {
        let p = Partition::new(3, 8);
        assert_eq!(p.num_parts(), 3);
        assert_eq!(p.range(2), 2..3);
        assert_eq!(Partition::new(0, 4).num_parts(), 0);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range() {
        Partition::new(10, 2).range(2);
    }
}
