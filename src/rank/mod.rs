/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank solvers.
//!
//! All solvers compute PageRank by the power method, iterating
//!
//! > *xᵥ*⁽*ᵗ* ⁺ ¹⁾ = (1 − α) / *n* + α ∑_(*u* → *v*) *xᵤ*⁽*ᵗ*⁾ / *d*⁺(*u*)
//!
//! where α is the damping factor and *d*⁺(*u*) is the outdegree of *u*.
//! Since we need to enumerate the _predecessors_ of a node, solvers work on
//! the transpose of the graph, in which every predecessor is annotated with
//! its outdegree (see [`PredecessorGraph`]).
//!
//! If dead-end handling is enabled, the rank of dead ends is redistributed
//! uniformly, that is, α / *n* times the sum of the rank of dead ends is
//! added to the teleportation term. Otherwise, the graph must not contain
//! dead ends (the usual way to ensure this is
//! [adding self-loops](crate::transform::patch_dead_ends)).
//!
//! The computation starts from a caller-supplied vector (warm start) or from
//! the uniform vector, and stops when the chosen [`Norm`] of the difference
//! between two successive approximations is at most the tolerance, or when
//! the maximum number of iterations is reached. The result is normalized so
//! that it sums to one.
//!
//! There are three solvers, all implementing [`Solver`]:
//!
//! - [`Sequential`] is the single-threaded reference;
//! - [`Synchronized`] distributes each iteration among the threads of a pool,
//!   with a barrier between iterations; it comes in an [`Ordered`] variant,
//!   in which reductions are bit-reproducible, and in an [`Unordered`] one;
//! - [`BarrierFree`] lets the threads of a pool update the rank vector in
//!   place without ever waiting for each other; it comes in a [`FullError`]
//!   variant, which checks convergence on the whole vector, and in a
//!   [`PartialError`] one, which estimates it from the updates of each
//!   thread.
//!
//! [`Strategy`] selects one of the variants at run time.
//!
//! # Examples
//!
//! ```
//! use pagerank_par::prelude::*;
//!
//! // A directed 4-cycle plus a node pointing to all other nodes
//! let mut g = VecGraph::from_arcs(5, [(0, 1), (1, 2), (2, 3), (3, 0), (4, 0), (4, 1), (4, 2), (4, 3)]);
//! patch_dead_ends(&mut g);
//! let transpose = transpose_with_degree(&g);
//!
//! let options = Options { tolerance: 1E-10, ..Default::default() };
//! let reference = Sequential.solve(&transpose, None, &options);
//! let par = Synchronized::<Ordered>::new(2)?.solve(&transpose, None, &options);
//!
//! assert!(Norm::L1.distance(&reference.ranks, &par.ranks) < 1E-6);
//! assert!((reference.ranks.iter().sum::<f64>() - 1.0).abs() < 1E-12);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::traits::PredecessorGraph;
use crate::utils::Partition;
use dsi_progress_logger::prelude::*;
use kahan::KahanSum;
use std::time::Instant;

mod barrier_free;
pub use barrier_free::*;

mod norm;
pub use norm::*;

mod options;
pub use options::*;

pub mod preds;

mod reduce;
pub use reduce::*;

mod seq;
pub use seq::*;

mod strategy;
pub use strategy::*;

mod sync;
pub use sync::*;

/// The common interface of PageRank solvers.
pub trait Solver {
    /// Computes PageRank on a graph given as its transpose, starting from
    /// `init`, if provided, or from the uniform vector.
    ///
    /// # Panics
    ///
    /// Panics if the [options do not satisfy their preconditions](Options::check),
    /// if `init` has not exactly one entry per node, or if the graph contains
    /// dead ends and [dead-end handling](Options::handle_dead_ends) is
    /// disabled.
    fn solve<G: PredecessorGraph + Sync>(
        &self,
        transpose: &G,
        init: Option<&[f64]>,
        options: &Options,
    ) -> RankResult {
        self.solve_with_logging(transpose, init, options, no_logging![])
    }

    /// Like [`solve`](Self::solve), but logs iterations on the provided
    /// [`ProgressLog`], whose options are preserved.
    fn solve_with_logging<G: PredecessorGraph + Sync>(
        &self,
        transpose: &G,
        init: Option<&[f64]>,
        options: &Options,
        pl: &mut impl ProgressLog,
    ) -> RankResult;
}

/// The outcome of a single run: final approximation, iterations, error.
type Run = (Box<[f64]>, usize, f64);

/// Checks preconditions, computes the initial vector and the dead ends, and
/// performs the runs required by the options, timing each run.
///
/// Returns the result of the last run, normalized.
fn repeat_runs<G: PredecessorGraph>(
    name: &str,
    transpose: &G,
    init: Option<&[f64]>,
    options: &Options,
    mut run: impl FnMut(&[f64], &[usize]) -> Run,
) -> RankResult {
    options.check();
    let n = transpose.num_nodes();
    if let Some(init) = init {
        assert_eq!(
            init.len(),
            n,
            "The initial vector has {} entries, but the graph has {n} nodes",
            init.len()
        );
    }
    if n == 0 {
        return RankResult::empty();
    }

    let dangling = transpose.dangling_nodes();
    assert!(
        options.handle_dead_ends || dangling.is_empty(),
        "The graph has {} dead ends: add self-loops or enable dead-end handling",
        dangling.len()
    );

    log::info!("Solver: {name}");
    log::info!("Damping: {}", options.damping);
    log::info!("Stopping criterion: {}", preds::stopping_criterion(options));
    log::info!(
        "{} nodes, {} arcs, {} dead ends{}",
        n,
        transpose.num_arcs(),
        dangling.len(),
        if options.handle_dead_ends {
            " (handled)"
        } else {
            ""
        }
    );

    let initial = match init {
        Some(init) => init.to_vec().into_boxed_slice(),
        None => vec![1.0 / n as f64; n].into_boxed_slice(),
    };

    let mut timed_run = |i: usize| {
        let start = Instant::now();
        let (ranks, iterations, error) = run(&initial, &dangling);
        let elapsed = start.elapsed();
        log::debug!(
            "Run {}/{}: {} iterations, error {:e}, {:?}",
            i + 1,
            options.repeat,
            iterations,
            error,
            elapsed
        );
        (ranks, iterations, error, elapsed)
    };
    let mut last = timed_run(0);
    for i in 1..options.repeat {
        last = timed_run(i);
    }
    let (mut ranks, iterations, error, elapsed) = last;
    normalize(&mut ranks);

    let converged = error <= options.tolerance;
    if converged {
        log::info!("Converged after {iterations} iterations (error {error:e}, {elapsed:?})");
    } else {
        log::warn!("Stopped after {iterations} iterations without converging (error {error:e})");
    }

    RankResult {
        ranks,
        iterations,
        elapsed,
        error,
        converged,
    }
}

/// Returns the teleportation term, including the redistributed rank of dead
/// ends.
#[inline(always)]
fn teleport(n: usize, options: &Options, dangling_mass: f64) -> f64 {
    let inv_n = 1.0 / n as f64;
    if options.handle_dead_ends {
        (1.0 - options.damping) * inv_n + options.damping * dangling_mass * inv_n
    } else {
        (1.0 - options.damping) * inv_n
    }
}

/// Computes the new rank of `node`, reading current ranks through `rank`.
#[inline(always)]
fn new_rank<G: PredecessorGraph>(
    transpose: &G,
    node: usize,
    damping: f64,
    teleport: f64,
    rank: impl Fn(usize) -> f64,
) -> f64 {
    let mut sigma = 0.0;
    for (pred, outdegree) in transpose.predecessors(node) {
        sigma += rank(pred) / outdegree as f64;
    }
    teleport + damping * sigma
}

/// Returns the sum of the ranks of the given nodes.
#[inline(always)]
fn mass_of(nodes: &[usize], rank: impl Fn(usize) -> f64) -> f64 {
    nodes
        .iter()
        .fold(KahanSum::<f64>::new(), |sum, &node| sum + rank(node))
        .sum()
}

/// Scales `ranks` so that it sums to one.
fn normalize(ranks: &mut [f64]) {
    let sum = ranks
        .iter()
        .fold(KahanSum::<f64>::new(), |sum, &x| sum + x)
        .sum();
    if sum > 0.0 {
        ranks.iter_mut().for_each(|x| *x /= sum);
    }
}

/// Splits the sorted list of dead ends into one slice per part.
fn split_by_part<'a>(dangling: &'a [usize], partition: &Partition) -> Vec<&'a [usize]> {
    partition
        .ranges()
        .map(|range| {
            let start = dangling.partition_point(|&node| node < range.start);
            let end = dangling.partition_point(|&node| node < range.end);
            &dangling[start..end]
        })
        .collect()
}
