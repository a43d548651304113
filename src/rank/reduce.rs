/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Ordered and unordered reductions of per-partition values.
//!
//! Parallel solvers compute scalar aggregates (norms, dangling mass) by
//! letting each worker compute a partial value on its part of a
//! [`Partition`](crate::utils::Partition), and then combining the partial
//! values. Floating-point addition is not associative, so the combination
//! order matters for the last bits of the result:
//!
//! - [`Ordered`] combines partial values in part order, which makes the
//!   result bit-reproducible across runs (for a fixed number of parts);
//! - [`Unordered`] combines partial values in the order in which workers
//!   finish, by atomically updating a shared accumulator.

use atomic_float::AtomicF64;
use rayon::prelude::*;
use std::sync::atomic::Ordering;

/// A policy for combining per-partition values computed in parallel.
///
/// The policy is a type parameter of the
/// [synchronized solver](crate::rank::Synchronized), so the choice costs
/// nothing at run time.
pub trait Accumulation: Send + Sync + 'static {
    /// A short name for logs and labels.
    const NAME: &'static str;

    /// Computes `partial(0)`, …, `partial(num_parts − 1)` in parallel on the
    /// current Rayon thread pool, and combines them with `combine`, starting
    /// from `identity`.
    ///
    /// `combine` must be commutative and associative up to rounding.
    fn reduce(
        num_parts: usize,
        identity: f64,
        partial: impl Fn(usize) -> f64 + Sync + Send,
        combine: impl Fn(f64, f64) -> f64 + Sync + Send,
    ) -> f64;
}

/// Combines partial values in part order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ordered;

/// Combines partial values in completion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unordered;

impl Accumulation for Ordered {
    const NAME: &'static str = "ordered";

    fn reduce(
        num_parts: usize,
        identity: f64,
        partial: impl Fn(usize) -> f64 + Sync + Send,
        combine: impl Fn(f64, f64) -> f64 + Sync + Send,
    ) -> f64 {
        // collect() preserves the order of indexed iterators
        (0..num_parts)
            .into_par_iter()
            .map(partial)
            .collect::<Vec<_>>()
            .into_iter()
            .fold(identity, combine)
    }
}

impl Accumulation for Unordered {
    const NAME: &'static str = "unordered";

    fn reduce(
        num_parts: usize,
        identity: f64,
        partial: impl Fn(usize) -> f64 + Sync + Send,
        combine: impl Fn(f64, f64) -> f64 + Sync + Send,
    ) -> f64 {
        let acc = AtomicF64::new(identity);
        (0..num_parts).into_par_iter().for_each(|part| {
            let value = partial(part);
            // The closure never returns None, so the update cannot fail
            let _ = acc.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(combine(current, value))
            });
        });
        acc.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_result_on_exact_sums() {
        let partial = |i: usize| i as f64;
        let add = |a: f64, b: f64| a + b;
        assert_eq!(Ordered::reduce(100, 0.0, partial, add), 4950.0);
        assert_eq!(Unordered::reduce(100, 0.0, partial, add), 4950.0);
        assert_eq!(Ordered::reduce(0, 0.0, partial, add), 0.0);
        assert_eq!(Unordered::reduce(100, 0.0, partial, f64::max), 99.0);
    }

    #[test]
    fn test_ordered_is_reproducible() {
        let partial = |i: usize| 1.0 / (i as f64 + 1.0) * if i % 2 == 0 { 1E10 } else { 1E-10 };
        let add = |a: f64, b: f64| a + b;
        let first = Ordered::reduce(1000, 0.0, partial, add);
        for _ in 0..10 {
            assert_eq!(Ordered::reduce(1000, 0.0, partial, add).to_bits(), first.to_bits());
        }
        let sequential = (0..1000).map(partial).fold(0.0, add);
        assert_eq!(first.to_bits(), sequential.to_bits());
    }
}
