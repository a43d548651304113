/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::preds::{stopping_criterion, PredParams};
use super::{
    mass_of, new_rank, repeat_runs, split_by_part, teleport, Accumulation, Options, RankResult,
    Solver, Unordered,
};
use crate::traits::PredecessorGraph;
use crate::utils::{worker_rng, Partition};
use anyhow::{Context, Result};
use dsi_progress_logger::prelude::*;
use predicates::Predicate;
use rayon::prelude::*;
use std::marker::PhantomData;

/// A parallel PageRank solver with a barrier between iterations.
///
/// Nodes are split into one contiguous part per thread. At each iteration,
/// the threads of the pool compute the new approximation of their part,
/// reading only the previous approximation, and then compute their share of
/// the error; the next iteration starts only when all threads are done, so
/// the sequence of approximations is the same as that of the
/// [sequential solver](super::Sequential), up to the rounding of reductions.
///
/// The type parameter `A` chooses how per-part values are
/// [combined](Accumulation): [`Ordered`](super::Ordered) gives
/// bit-reproducible results for a fixed number of threads, whereas
/// [`Unordered`] combines values as soon as they are available.
///
/// With [random pauses](Options::sleep), every iteration lasts as long as
/// its slowest worker.
pub struct Synchronized<A: Accumulation = Unordered> {
    thread_pool: rayon::ThreadPool,
    _marker: PhantomData<A>,
}

impl<A: Accumulation> Synchronized<A> {
    /// Creates a new solver using a dedicated pool with the given number of
    /// threads; zero selects Rayon's default.
    pub fn new(num_threads: usize) -> Result<Self> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .context("Could not create thread pool")?;
        Ok(Self {
            thread_pool,
            _marker: PhantomData,
        })
    }

    /// Returns the number of threads of the pool.
    pub fn num_threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }
}

impl<A: Accumulation> core::fmt::Debug for Synchronized<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Synchronized")
            .field("accumulation", &A::NAME)
            .field("num_threads", &self.num_threads())
            .finish()
    }
}

impl<A: Accumulation> Solver for Synchronized<A> {
    fn solve_with_logging<G: PredecessorGraph + Sync>(
        &self,
        transpose: &G,
        init: Option<&[f64]>,
        options: &Options,
        pl: &mut impl ProgressLog,
    ) -> RankResult {
        let predicate = stopping_criterion(options);
        let n = transpose.num_nodes();
        let partition = Partition::new(n, self.num_threads());
        let name = format!("synchronized-{} ({} threads)", A::NAME, self.num_threads());

        repeat_runs(&name, transpose, init, options, |initial, dangling| {
            let dangling = split_by_part(dangling, &partition);
            let seed = options.sleep.map_or(0, |sleep| sleep.seed);
            let mut rngs = (0..partition.num_parts())
                .map(|part| worker_rng(seed, part))
                .collect::<Vec<_>>();
            let mut curr = initial.to_vec().into_boxed_slice();
            let mut next = vec![0.0; n].into_boxed_slice();
            let mut iteration = 0;

            pl.item_name("iteration");
            pl.expected_updates(Some(options.max_iterations));
            pl.start(format!(
                "Computing PageRank ({} parts of {} nodes)...",
                partition.num_parts(),
                partition.part_len()
            ));

            loop {
                let error = self.thread_pool.install(|| {
                    let mass = A::reduce(
                        partition.num_parts(),
                        0.0,
                        |part| mass_of(dangling[part], |node| curr[node]),
                        |x, y| x + y,
                    );
                    let c0 = teleport(n, options, mass);

                    next.par_chunks_mut(partition.part_len())
                        .zip(rngs.par_iter_mut())
                        .enumerate()
                        .for_each(|(part, (chunk, rng))| {
                            if let Some(sleep) = &options.sleep {
                                sleep.maybe_sleep(rng);
                            }
                            let start = partition.range(part).start;
                            for (i, rank) in chunk.iter_mut().enumerate() {
                                *rank = new_rank(transpose, start + i, options.damping, c0, |pred| {
                                    curr[pred]
                                });
                            }
                        });

                    options.norm.par_distance::<A>(&next, &curr, &partition)
                });
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
    use super::super::{Norm, Ordered, Sequential};
    use super::*;
    use crate::graphs::VecGraph;
    use crate::transform::{patch_dead_ends, transpose_with_degree};
    use crate::utils::RandomSleep;
    use std::time::Duration;

    fn graph() -> VecGraph {
        let mut g = VecGraph::empty(50);
        for u in 0..50 {
            g.add_arc(u, (u * 7 + 3) % 50);
            g.add_arc(u, (u * 13 + 1) % 50);
            if u % 5 == 0 {
                g.add_arc(u, (u + 1) % 50);
            }
        }
        g
    }

    #[test]
    fn test_agrees_with_sequential() -> Result<()> {
        let transpose = transpose_with_degree(&graph());
        let options = Options::default();
        let reference = Sequential.solve(&transpose, None, &options);
        for threads in [1, 2, 3, 8] {
            let ordered = Synchronized::<Ordered>::new(threads)?.solve(&transpose, None, &options);
            let unordered =
                Synchronized::<Unordered>::new(threads)?.solve(&transpose, None, &options);
            assert!(Norm::L1.distance(&reference.ranks, &ordered.ranks) < 1E-9);
            assert!(Norm::L1.distance(&reference.ranks, &unordered.ranks) < 1E-9);
            assert!(ordered.converged && unordered.converged);
        }
        Ok(())
    }

    #[test]
    fn test_ordered_is_reproducible() -> Result<()> {
        let mut g = graph();
        g.add_node(50);
        let transpose = transpose_with_degree(&g);
        let options = Options {
            handle_dead_ends: true,
            ..Default::default()
        };
        let solver = Synchronized::<Ordered>::new(4)?;
        let first = solver.solve(&transpose, None, &options);
        for _ in 0..5 {
            let res = solver.solve(&transpose, None, &options);
            assert_eq!(res.iterations, first.iterations);
            assert_eq!(res.ranks, first.ranks);
        }
        Ok(())
    }

    #[test]
    fn test_with_stragglers() -> Result<()> {
        let transpose = transpose_with_degree(&graph());
        let reference = Sequential.solve(&transpose, None, &Options::default());
        let options = Options {
            sleep: Some(RandomSleep::new(Duration::from_micros(200), 0.3, 7)),
            ..Default::default()
        };
        let res = Synchronized::<Ordered>::new(4)?.solve(&transpose, None, &options);
        // Pauses change the timing, not the sequence of approximations
        let quiet = Synchronized::<Ordered>::new(4)?.solve(&transpose, None, &Options::default());
        assert_eq!(res.ranks, quiet.ranks);
        assert_eq!(res.iterations, quiet.iterations);
        assert!(Norm::L1.distance(&reference.ranks, &res.ranks) < 1E-9);
        Ok(())
    }

    #[test]
    fn test_more_threads_than_nodes() -> Result<()> {
        let mut g = VecGraph::from_arcs(3, [(0, 1), (1, 2)]);
        patch_dead_ends(&mut g);
        let transpose = transpose_with_degree(&g);
        let options = Options::default();
        let reference = Sequential.solve(&transpose, None, &options);
        let res = Synchronized::<Unordered>::new(8)?.solve(&transpose, None, &options);
        assert!(Norm::L1.distance(&reference.ranks, &res.ranks) < 1E-9);
        Ok(())
    }
}
