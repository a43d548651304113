/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Distances between rank vectors.
//!
//! The solvers use a [`Norm`] of the difference between successive
//! approximations as stopping criterion, and callers use it to measure how
//! far the result of a parallel solver is from the sequential reference.
//!
//! Every norm is computed in three steps: a [partial value](Norm::partial)
//! on a pair of corresponding chunks, a [combination](Norm::combine) of
//! partial values, which is commutative and associative (sum for 𝓁₀, 𝓁₁ and
//! 𝓁₂, maximum for 𝓁∞), and a [finishing step](Norm::finish), which is the
//! square root for 𝓁₂ and the identity otherwise. Thus, norms can be computed
//! [in parallel](Norm::par_distance) on any [`Partition`].

use super::reduce::Accumulation;
use crate::utils::Partition;
use kahan::KahanSum;
use std::fmt::Display;

/// Differences whose absolute value does not exceed this threshold are
/// ignored by the [𝓁₀ norm](Norm::L0).
pub const L0_EPSILON: f64 = f64::EPSILON;

/// The norm used to measure the distance between two vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Norm {
    /// The number of positions in which the two vectors differ by more than
    /// [`L0_EPSILON`].
    L0,
    /// The sum of the absolute differences.
    #[default]
    L1,
    /// The Euclidean norm of the difference.
    L2,
    /// The maximum absolute difference.
    LInf,
}

impl Norm {
    /// All the norms.
    pub const ALL: [Norm; 4] = [Norm::L0, Norm::L1, Norm::L2, Norm::LInf];

    /// Returns the partial value of the norm on a pair of chunks.
    ///
    /// # Panics
    ///
    /// Panics if the chunks have different lengths.
    pub fn partial(&self, a: &[f64], b: &[f64]) -> f64 {
        assert_eq!(
            a.len(),
            b.len(),
            "Vectors of different length ({} != {})",
            a.len(),
            b.len()
        );
        let diffs = a.iter().zip(b).map(|(x, y)| (x - y).abs());
        match self {
            Norm::L0 => diffs.filter(|&d| d > L0_EPSILON).count() as f64,
            Norm::L1 => diffs.fold(KahanSum::<f64>::new(), |sum, d| sum + d).sum(),
            Norm::L2 => diffs.fold(KahanSum::<f64>::new(), |sum, d| sum + d * d).sum(),
            Norm::LInf => diffs.fold(0.0, f64::max),
        }
    }

    /// Adds the absolute difference `diff` of a single position to a partial
    /// value.
    ///
    /// This is a streaming version of [`partial`](Self::partial) for callers
    /// that see differences one at a time, without compensated summation.
    #[inline(always)]
    pub fn accumulate(&self, partial: f64, diff: f64) -> f64 {
        match self {
            Norm::L0 => partial + (diff > L0_EPSILON) as u8 as f64,
            Norm::L1 => partial + diff,
            Norm::L2 => partial + diff * diff,
            Norm::LInf => partial.max(diff),
        }
    }

    /// Combines two partial values.
    #[inline(always)]
    pub fn combine(&self, x: f64, y: f64) -> f64 {
        match self {
            Norm::LInf => x.max(y),
            _ => x + y,
        }
    }

    /// Turns a fully combined partial value into the value of the norm.
    #[inline(always)]
    pub fn finish(&self, x: f64) -> f64 {
        match self {
            Norm::L2 => x.sqrt(),
            _ => x,
        }
    }

    /// Returns the distance between two vectors.
    ///
    /// # Panics
    ///
    /// Panics if the vectors have different lengths.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self.finish(self.partial(a, b))
    }

    /// Returns the distance between two vectors, computing partial values on
    /// each part of `partition` in parallel on the current Rayon thread pool,
    /// and combining them using the accumulation policy `A`.
    ///
    /// # Panics
    ///
    /// Panics if the vectors have different lengths, or if their length is
    /// different from that of the partition.
    pub fn par_distance<A: Accumulation>(
        &self,
        a: &[f64],
        b: &[f64],
        partition: &Partition,
    ) -> f64 {
        assert_eq!(
            a.len(),
            b.len(),
            "Vectors of different length ({} != {})",
            a.len(),
            b.len()
        );
        assert_eq!(a.len(), partition.len());
        self.finish(A::reduce(
            partition.num_parts(),
            0.0,
            |part| {
                let range = partition.range(part);
                self.partial(&a[range.clone()], &b[range])
            },
            |x, y| self.combine(x, y),
        ))
    }
}

impl Display for Norm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Norm::L0 => f.write_str("L0"),
            Norm::L1 => f.write_str("L1"),
            Norm::L2 => f.write_str("L2"),
            Norm::LInf => f.write_str("Li"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::reduce::{Ordered, Unordered};
    use super::*;

    const A: [f64; 5] = [0.1, 0.2, 0.3, 0.25, 0.15];
    const B: [f64; 5] = [0.2, 0.2, 0.1, 0.25, 0.25];

    #[test]
    fn test_values() {
        assert_eq!(Norm::L0.distance(&A, &B), 3.0);
        assert!((Norm::L1.distance(&A, &B) - 0.4).abs() < 1E-15);
        assert!((Norm::L2.distance(&A, &B) - 0.06f64.sqrt()).abs() < 1E-15);
        assert!((Norm::LInf.distance(&A, &B) - 0.2).abs() < 1E-15);
    }

    #[test]
    fn test_identity_and_symmetry() {
        for norm in Norm::ALL {
            assert_eq!(norm.distance(&A, &A), 0.0);
            assert_eq!(norm.distance(&A, &B), norm.distance(&B, &A));
            assert!(norm.distance(&A, &B) > 0.0);
        }
    }

    #[test]
    fn test_l0_ignores_negligible_differences() {
        let a = [1.0, 0.5];
        let b = [1.0 + f64::EPSILON / 2.0, 0.5];
        assert_eq!(Norm::L0.distance(&a, &b), 0.0);
    }

    #[test]
    fn test_parallel() {
        let a = (0..1000).map(|i| (i as f64).sin()).collect::<Vec<_>>();
        let b = (0..1000).map(|i| (i as f64).cos()).collect::<Vec<_>>();
        for parts in [1, 3, 8] {
            let partition = Partition::new(a.len(), parts);
            for norm in Norm::ALL {
                let seq = norm.distance(&a, &b);
                let ord = norm.par_distance::<Ordered>(&a, &b, &partition);
                let unord = norm.par_distance::<Unordered>(&a, &b, &partition);
                assert!((seq - ord).abs() <= 1E-12 * seq.max(1.0), "{norm}");
                assert!((seq - unord).abs() <= 1E-12 * seq.max(1.0), "{norm}");
            }
        }
    }

    #[test]
    fn test_accumulate() {
        for norm in Norm::ALL {
            let streamed = A
                .iter()
                .zip(B.iter())
                .fold(0.0, |acc, (x, y)| norm.accumulate(acc, (x - y).abs()));
            assert!((norm.finish(streamed) - norm.distance(&A, &B)).abs() < 1E-15);
        }
    }

    #[test]
    fn test_empty() {
        let partition = Partition::new(0, 4);
        for norm in Norm::ALL {
            assert_eq!(norm.distance(&[], &[]), 0.0);
            assert_eq!(norm.par_distance::<Ordered>(&[], &[], &partition), 0.0);
        }
    }

    #[test]
    #[should_panic(expected = "different length")]
    fn test_mismatched_lengths() {
        Norm::L1.distance(&A, &B[1..]);
    }
}
