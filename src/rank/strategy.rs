/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{
    BarrierFree, FullError, Options, Ordered, PartialError, RankResult, Sequential, Solver,
    Synchronized, Unordered,
};
use crate::traits::PredecessorGraph;
use anyhow::Result;
use dsi_progress_logger::prelude::*;
use std::fmt::Display;

/// A solver variant, chosen at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// [`Sequential`].
    Sequential,
    /// [`Synchronized`] with [`Ordered`] reductions.
    SynchronizedOrdered,
    /// [`Synchronized`] with [`Unordered`] reductions.
    SynchronizedUnordered,
    /// [`BarrierFree`] with [`FullError`] checks.
    BarrierFreeFull,
    /// [`BarrierFree`] with [`PartialError`] checks.
    BarrierFreePartial,
}

impl Strategy {
    /// All the strategies, sequential first.
    pub const ALL: [Strategy; 5] = [
        Strategy::Sequential,
        Strategy::SynchronizedOrdered,
        Strategy::SynchronizedUnordered,
        Strategy::BarrierFreeFull,
        Strategy::BarrierFreePartial,
    ];

    /// Returns whether the strategy uses more than one thread.
    pub fn is_parallel(&self) -> bool {
        *self != Strategy::Sequential
    }

    /// Runs the solver of this strategy, building a thread pool with the
    /// given number of threads if needed.
    ///
    /// # Errors
    ///
    /// Fails if the thread pool cannot be created.
    pub fn solve<G: PredecessorGraph + Sync>(
        &self,
        num_threads: usize,
        transpose: &G,
        init: Option<&[f64]>,
        options: &Options,
        pl: &mut impl ProgressLog,
    ) -> Result<RankResult> {
        Ok(match self {
            Strategy::Sequential => Sequential.solve_with_logging(transpose, init, options, pl),
            Strategy::SynchronizedOrdered => Synchronized::<Ordered>::new(num_threads)?
                .solve_with_logging(transpose, init, options, pl),
            Strategy::SynchronizedUnordered => Synchronized::<Unordered>::new(num_threads)?
                .solve_with_logging(transpose, init, options, pl),
            Strategy::BarrierFreeFull => BarrierFree::<FullError>::new(num_threads)?
                .solve_with_logging(transpose, init, options, pl),
            Strategy::BarrierFreePartial => BarrierFree::<PartialError>::new(num_threads)?
                .solve_with_logging(transpose, init, options, pl),
        })
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Strategy::Sequential => "sequential",
            Strategy::SynchronizedOrdered => "synchronized-ordered",
            Strategy::SynchronizedUnordered => "synchronized-unordered",
            Strategy::BarrierFreeFull => "barrier-free-full",
            Strategy::BarrierFreePartial => "barrier-free-partial",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::Norm;
    use super::*;
    use crate::graphs::VecGraph;
    use crate::transform::{patch_dead_ends, transpose_with_degree};

    #[test]
    fn test_all_strategies() -> Result<()> {
        let mut g = VecGraph::from_arcs(
            5,
            [(0, 1), (1, 2), (2, 3), (3, 0), (4, 0), (4, 1), (4, 2), (4, 3)],
        );
        patch_dead_ends(&mut g);
        let transpose = transpose_with_degree(&g);
        let options = Options::default();
        let reference = Strategy::Sequential.solve(1, &transpose, None, &options, no_logging![])?;
        for strategy in Strategy::ALL {
            let res = strategy.solve(3, &transpose, None, &options, no_logging![])?;
            assert!(res.converged, "{strategy}");
            assert!(Norm::L1.distance(&reference.ranks, &res.ranks) < 1E-6, "{strategy}");
        }
        Ok(())
    }
}
