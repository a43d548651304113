/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::preds::{stopping_criterion, PredParams};
use super::{mass_of, new_rank, repeat_runs, split_by_part, teleport, Options, RankResult, Solver};
use crate::traits::PredecessorGraph;
use crate::utils::{worker_rng, Partition, RelaxedSlice};
use anyhow::{Context, Result};
use atomic_float::AtomicF64;
use crossbeam_utils::CachePadded;
use dsi_progress_logger::prelude::*;
use predicates::Predicate;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// How the [barrier-free solver](BarrierFree) estimates the error.
pub trait ErrorCheck: Send + Sync + 'static {
    /// A short name for logs and labels.
    const NAME: &'static str;
    /// Whether the error is computed on the whole vector.
    const FULL: bool;
}

/// Computes the error on the whole rank vector, comparing it with a
/// snapshot taken at the previous check.
///
/// The check is performed by a single thread while the others keep on
/// updating the vector, so the error is measured on a vector that is not a
/// consistent state of the computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullError;

/// Estimates the error by combining the norms of the updates performed by
/// each thread during its last sweep.
///
/// No thread ever looks at the whole vector, so a check costs time
/// proportional to the number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialError;

impl ErrorCheck for FullError {
    const NAME: &'static str = "full";
    const FULL: bool = true;
}

impl ErrorCheck for PartialError {
    const NAME: &'static str = "partial";
    const FULL: bool = false;
}

/// A parallel PageRank solver in which threads never wait for each other.
///
/// Nodes are split into one contiguous part per thread, and each thread
/// sweeps repeatedly over its part, updating ranks in place and reading the
/// latest values written by any thread (chaotic iteration, which reduces to
/// Gauss–Seidel with one thread). The rank vector is shared as a
/// [`RelaxedSlice`], so each rank is written by exactly one thread and reads
/// may see stale values, but never torn ones.
///
/// Threads count their sweeps: a _pass_ is completed when every thread has
/// completed one more sweep. The first thread that observes the completion of
/// a pass checks convergence on behalf of everybody, as specified by the
/// type parameter `E` (see [`FullError`] and [`PartialError`]), and raises a
/// stop flag that every thread checks at the beginning of each sweep. The
/// number of iterations reported is the number of passes at which the
/// computation was stopped; threads may complete one more sweep before
/// noticing the flag.
///
/// Dead-end mass is published by each thread for its part after each sweep,
/// and read by the other threads when they start a new sweep: the
/// redistribution is thus only approximately synchronized.
///
/// [Random pauses](Options::sleep) before sweeps slow down single workers
/// without stopping the others.
pub struct BarrierFree<E: ErrorCheck = FullError> {
    thread_pool: rayon::ThreadPool,
    _marker: PhantomData<E>,
}

impl<E: ErrorCheck> BarrierFree<E> {
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

impl<E: ErrorCheck> core::fmt::Debug for BarrierFree<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BarrierFree")
            .field("error_check", &E::NAME)
            .field("num_threads", &self.num_threads())
            .finish()
    }
}

impl<E: ErrorCheck> Solver for BarrierFree<E> {
    fn solve_with_logging<G: PredecessorGraph + Sync>(
        &self,
        transpose: &G,
        init: Option<&[f64]>,
        options: &Options,
        pl: &mut impl ProgressLog,
    ) -> RankResult {
        let predicate = stopping_criterion(options);
        let n = transpose.num_nodes();
        let norm = options.norm;
        let partition = Partition::new(n, self.num_threads());
        let num_parts = partition.num_parts();
        let name = format!("barrier-free-{} ({} threads)", E::NAME, self.num_threads());

        repeat_runs(&name, transpose, init, options, |initial, dangling| {
            let dangling = split_by_part(dangling, &partition);
            let ranks = RelaxedSlice::from_slice(initial);
            let masses = dangling
                .iter()
                .map(|nodes| CachePadded::new(AtomicF64::new(mass_of(nodes, |node| initial[node]))))
                .collect::<Box<[_]>>();
            let errors = (0..num_parts)
                .map(|_| CachePadded::new(AtomicF64::new(f64::INFINITY)))
                .collect::<Box<[_]>>();
            let sweeps = (0..num_parts)
                .map(|_| CachePadded::new(AtomicUsize::new(0)))
                .collect::<Box<[_]>>();
            let checked_pass = AtomicUsize::new(0);
            let last_error = AtomicF64::new(f64::INFINITY);
            let stop = AtomicBool::new(false);
            let outcome = Mutex::new(None::<(usize, f64)>);
            let snapshot = Mutex::new(if E::FULL {
                initial.to_vec()
            } else {
                Vec::new()
            });

            pl.item_name("pass");
            pl.expected_updates(Some(options.max_iterations));
            pl.start(format!(
                "Computing PageRank ({} parts of {} nodes)...",
                num_parts,
                partition.part_len()
            ));

            // Returns the error at the given pass, or None if the check
            // could not be performed
            let check = |pass: usize| -> Option<f64> {
                if E::FULL {
                    let mut snapshot = snapshot.try_lock().ok()?;
                    let mut partial = 0.0;
                    for (node, old) in snapshot.iter_mut().enumerate() {
                        let rank = ranks.get(node);
                        partial = norm.accumulate(partial, (rank - *old).abs());
                        *old = rank;
                    }
                    Some(norm.finish(partial))
                } else {
                    let partial = errors
                        .iter()
                        .fold(0.0, |acc, e| norm.combine(acc, e.load(Ordering::Relaxed)));
                    log::trace!("Pass {pass}: combined {num_parts} partial errors");
                    Some(norm.finish(partial))
                }
            };

            self.thread_pool.broadcast(|ctx| {
                let part = ctx.index();
                if part >= num_parts {
                    return;
                }
                let range = partition.range(part);
                let mut rng = worker_rng(options.sleep.map_or(0, |sleep| sleep.seed), part);

                while !stop.load(Ordering::Acquire) {
                    if let Some(sleep) = &options.sleep {
                        if sleep.maybe_sleep(&mut rng) {
                            log::trace!("Worker {part} paused");
                        }
                    }
                    let mass = masses
                        .iter()
                        .fold(0.0, |acc, m| acc + m.load(Ordering::Relaxed));
                    let c0 = teleport(n, options, mass);

                    let mut part_error = 0.0;
                    for node in range.clone() {
                        let rank = new_rank(transpose, node, options.damping, c0, |pred| {
                            ranks.get(pred)
                        });
                        if !E::FULL {
                            part_error = norm.accumulate(part_error, (rank - ranks.get(node)).abs());
                        }
                        ranks.set(node, rank);
                    }

                    masses[part].store(
                        mass_of(dangling[part], |node| ranks.get(node)),
                        Ordering::Relaxed,
                    );
                    if !E::FULL {
                        errors[part].store(part_error, Ordering::Relaxed);
                    }
                    sweeps[part].fetch_add(1, Ordering::SeqCst);

                    // The thread whose sweep completes a pass sees exactly
                    // that pass as the minimum; this needs a total order on
                    // increments and loads
                    let pass = sweeps
                        .iter()
                        .map(|s| s.load(Ordering::SeqCst))
                        .min()
                        .unwrap_or(0);
                    if checked_pass.fetch_max(pass, Ordering::AcqRel) >= pass {
                        continue;
                    }

                    let error = match check(pass) {
                        Some(error) => {
                            last_error.store(error, Ordering::Relaxed);
                            error
                        }
                        None => last_error.load(Ordering::Relaxed),
                    };
                    log::debug!("Pass {pass}: error {error:e}");

                    if predicate.eval(&PredParams {
                        iteration: pass,
                        error,
                    }) {
                        // Coordinators of different passes may overlap
                        if let Ok(mut outcome) = outcome.lock() {
                            if outcome.map_or(true, |(stop_pass, _)| pass < stop_pass) {
                                *outcome = Some((pass, error));
                            }
                        }
                        stop.store(true, Ordering::Release);
                    }
                }
            });

            // Every run stops through the predicate, which always holds
            // eventually because of the iteration ceiling
            let (passes, error) = outcome.into_inner().ok().flatten().unwrap_or((
                checked_pass.load(Ordering::Relaxed),
                last_error.load(Ordering::Relaxed),
            ));
            pl.update_with_count(passes);
            pl.done();

            (ranks.into_boxed_slice(), passes, error)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Norm, Sequential};
    use super::*;
    use crate::graphs::VecGraph;
    use crate::transform::{patch_dead_ends, transpose_with_degree};
    use crate::utils::RandomSleep;
    use std::time::Duration;

    fn graph() -> VecGraph {
        let mut g = VecGraph::empty(100);
        for u in 0..100 {
            g.add_arc(u, (u * 17 + 5) % 100);
            g.add_arc(u, (u * 3 + 1) % 100);
            g.add_arc(u, (u + 1) % 100);
        }
        g
    }

    #[test]
    fn test_single_thread() -> Result<()> {
        let transpose = transpose_with_degree(&graph());
        let options = Options::default();
        let reference = Sequential.solve(&transpose, None, &options);
        let full = BarrierFree::<FullError>::new(1)?.solve(&transpose, None, &options);
        let partial = BarrierFree::<PartialError>::new(1)?.solve(&transpose, None, &options);
        assert!(full.converged && partial.converged);
        assert!(Norm::L1.distance(&reference.ranks, &full.ranks) < 1E-6);
        assert!(Norm::L1.distance(&reference.ranks, &partial.ranks) < 1E-6);
        Ok(())
    }

    #[test]
    fn test_agrees_with_sequential() -> Result<()> {
        let transpose = transpose_with_degree(&graph());
        let options = Options::default();
        let reference = Sequential.solve(&transpose, None, &options);
        for threads in [2, 4, 7] {
            for res in [
                BarrierFree::<FullError>::new(threads)?.solve(&transpose, None, &options),
                BarrierFree::<PartialError>::new(threads)?.solve(&transpose, None, &options),
            ] {
                assert!(res.converged);
                assert!(Norm::L1.distance(&reference.ranks, &res.ranks) < 1E-6);
                assert!((res.ranks.iter().sum::<f64>() - 1.0).abs() < 1E-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_with_stragglers() -> Result<()> {
        let transpose = transpose_with_degree(&graph());
        let reference = Sequential.solve(&transpose, None, &Options::default());
        for probability in [0.2, 1.0] {
            let options = Options {
                sleep: Some(RandomSleep::new(Duration::from_micros(100), probability, 3)),
                ..Default::default()
            };
            for res in [
                BarrierFree::<FullError>::new(4)?.solve(&transpose, None, &options),
                BarrierFree::<PartialError>::new(4)?.solve(&transpose, None, &options),
            ] {
                assert!(res.converged);
                assert!(Norm::L1.distance(&reference.ranks, &res.ranks) < 1E-6);
            }
        }
        Ok(())
    }

    #[test]
    fn test_iteration_ceiling() -> Result<()> {
        let transpose = transpose_with_degree(&graph());
        let options = Options {
            tolerance: 0.0,
            max_iterations: 10,
            ..Default::default()
        };
        for res in [
            BarrierFree::<FullError>::new(3)?.solve(&transpose, None, &options),
            BarrierFree::<PartialError>::new(3)?.solve(&transpose, None, &options),
        ] {
            assert_eq!(res.iterations, 10);
            assert!(!res.converged);
        }
        Ok(())
    }

    #[test]
    fn test_dead_ends() -> Result<()> {
        let mut g = graph();
        g.add_node(100);
        g.add_node(101);
        g.add_arc(100, 0);
        let transpose = transpose_with_degree(&g);
        let options = Options {
            handle_dead_ends: true,
            ..Default::default()
        };
        let reference = Sequential.solve(&transpose, None, &options);
        let res = BarrierFree::<PartialError>::new(4)?.solve(&transpose, None, &options);
        assert!(Norm::L1.distance(&reference.ranks, &res.ranks) < 1E-6);

        let mut patched = g.clone();
        patch_dead_ends(&mut patched);
        let res = BarrierFree::<FullError>::new(4)?.solve(
            &transpose_with_degree(&patched),
            None,
            &Options::default(),
        );
        assert!((res.ranks.iter().sum::<f64>() - 1.0).abs() < 1E-12);
        Ok(())
    }
}
