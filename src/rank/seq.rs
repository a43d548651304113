/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::preds::{stopping_criterion, PredParams};
use super::{mass_of, new_rank, repeat_runs, teleport, Options, RankResult, Solver};
use crate::traits::PredecessorGraph;
use dsi_progress_logger::prelude::*;
use predicates::Predicate;

/// The single-threaded PageRank solver.
///
/// Each iteration computes a new approximation from the previous one into a
/// separate buffer (Jacobi iteration), so the result is deterministic and
/// serves as a reference for the parallel solvers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Solver for Sequential {
    fn solve_with_logging<G: PredecessorGraph + Sync>(
        &self,
        transpose: &G,
        init: Option<&[f64]>,
        options: &Options,
        pl: &mut impl ProgressLog,
    ) -> RankResult {
        let predicate = stopping_criterion(options);
        let n = transpose.num_nodes();

        repeat_runs("sequential", transpose, init, options, |initial, dangling| {
            let mut curr = initial.to_vec().into_boxed_slice();
            let mut next = vec![0.0; n].into_boxed_slice();
            let mut iteration = 0;

            pl.item_name("iteration");
            pl.expected_updates(Some(options.max_iterations));
            pl.start("Computing PageRank...");

            loop {
                let c0 = teleport(n, options, mass_of(dangling, |node| curr[node]));
                for (node, rank) in next.iter_mut().enumerate() {
                    *rank = new_rank(transpose, node, options.damping, c0, |pred| curr[pred]);
                }
                let error = options.norm.distance(&next, &curr);
                std::mem::swap(&mut curr, &mut next);
                iteration += 1;
                pl.light_update();
                log::debug!("Iteration {iteration}: error {error:e}");

                if predicate.eval(&PredParams { iteration, error }) {
                    pl.done();
                    return (curr, iteration, error);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::VecGraph;
    use crate::transform::transpose_with_degree;

    #[test]
    fn test_self_loop() {
        let g = VecGraph::from_arcs(1, [(0, 0)]);
        let res = Sequential.solve(&transpose_with_degree(&g), None, &Options::default());
        assert_eq!(res.iterations, 1);
        assert_eq!(&*res.ranks, &[1.0]);
        assert!(res.converged);
        assert_eq!(res.error, 0.0);
    }

    #[test]
    fn test_cycle_is_uniform() {
        let g = VecGraph::from_arcs(3, [(0, 1), (1, 2), (2, 0)]);
        let res = Sequential.solve(&transpose_with_degree(&g), None, &Options::default());
        for &r in res.ranks.iter() {
            assert!((r - 1.0 / 3.0).abs() < 1E-12);
        }
    }

    #[test]
    fn test_star() {
        // Leaves point to the center, which points back to the leaves
        let mut g = VecGraph::empty(4);
        for leaf in 1..4 {
            g.add_arc(leaf, 0);
            g.add_arc(0, leaf);
        }
        let res = Sequential.solve(&transpose_with_degree(&g), None, &Options::default());
        assert!(res.converged);
        // x₀ = 0.15 / 4 + 0.85 (1 − x₀), so x₀ = (0.0375 + 0.85) / 1.85
        let center = (0.0375 + 0.85) / 1.85;
        assert!((res.ranks[0] - center).abs() < 1E-9);
        for leaf in 1..4 {
            assert!((res.ranks[leaf] - (1.0 - center) / 3.0).abs() < 1E-9);
        }
    }

    #[test]
    fn test_max_iterations() {
        let g = VecGraph::from_arcs(3, [(0, 1), (1, 2), (2, 0), (0, 2)]);
        let options = Options {
            tolerance: 0.0,
            max_iterations: 7,
            ..Default::default()
        };
        let res = Sequential.solve(&transpose_with_degree(&g), None, &options);
        assert_eq!(res.iterations, 7);
        assert!(!res.converged);
    }

    #[test]
    fn test_empty() {
        let g = VecGraph::empty(0);
        let res = Sequential.solve(&transpose_with_degree(&g), None, &Options::default());
        assert!(res.ranks.is_empty());
        assert_eq!(res.iterations, 0);
    }

    #[test]
    #[should_panic(expected = "dead ends")]
    fn test_dead_ends_without_handling() {
        let g = VecGraph::from_arcs(2, [(0, 1)]);
        Sequential.solve(&transpose_with_degree(&g), None, &Options::default());
    }

    #[test]
    #[should_panic(expected = "initial vector")]
    fn test_wrong_init() {
        let g = VecGraph::from_arcs(2, [(0, 1), (1, 0)]);
        Sequential.solve(&transpose_with_degree(&g), Some(&[1.0][..]), &Options::default());
    }
}
