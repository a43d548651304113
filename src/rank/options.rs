/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::norm::Norm;
use crate::utils::RandomSleep;
use std::time::Duration;

/// The configuration of a PageRank computation.
///
/// Options are a plain value: build them with a struct literal, possibly
/// completing them with `..Default::default()`, and pass them to a solver.
///
/// ```
/// use pagerank_par::rank::{Norm, Options};
///
/// let options = Options {
///     norm: Norm::L2,
///     tolerance: 1E-8,
///     ..Default::default()
/// };
/// assert_eq!(options.damping, 0.85);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    /// How many times the whole computation is repeated; only the timing of
    /// the last run is reported.
    pub repeat: usize,
    /// Whether to redistribute uniformly the rank of dead ends. If false,
    /// the graph must have no dead ends.
    pub handle_dead_ends: bool,
    /// The damping factor, in the open interval (0 . . 1).
    pub damping: f64,
    /// The norm of the difference between successive approximations used
    /// as stopping criterion.
    pub norm: Norm,
    /// The computation stops when the norm of the difference between
    /// successive approximations is at most this value.
    pub tolerance: f64,
    /// The computation stops anyway after this number of iterations.
    pub max_iterations: usize,
    /// Random pauses of the workers of parallel solvers; the sequential
    /// solver ignores this option.
    pub sleep: Option<RandomSleep>,
}

impl Options {
    pub const DEFAULT_DAMPING: f64 = 0.85;
    pub const DEFAULT_TOLERANCE: f64 = 1E-10;
    pub const DEFAULT_MAX_ITERATIONS: usize = 500;

    /// Checks the preconditions of the options.
    ///
    /// # Panics
    ///
    /// Panics if the damping factor is not in (0 . . 1), if the tolerance is
    /// NaN or negative, if the number of repetitions or the maximum number
    /// of iterations is zero, or if the sleep probability is not in
    /// [0 . . 1].
    pub fn check(&self) {
        assert!(
            self.damping > 0.0 && self.damping < 1.0,
            "The damping factor must be in (0 . . 1), got {}",
            self.damping
        );
        assert!(
            self.tolerance >= 0.0,
            "The tolerance must be nonnegative, got {}",
            self.tolerance
        );
        assert!(self.repeat > 0, "The number of repetitions must be positive");
        assert!(
            self.max_iterations > 0,
            "The maximum number of iterations must be positive"
        );
        if let Some(sleep) = &self.sleep {
            sleep.check();
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            repeat: 1,
            handle_dead_ends: false,
            damping: Self::DEFAULT_DAMPING,
            norm: Norm::default(),
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            sleep: None,
        }
    }
}

/// The result of a PageRank computation.
#[derive(Debug, Clone, PartialEq)]
pub struct RankResult {
    /// The rank vector, normalized so that it sums to one.
    pub ranks: Box<[f64]>,
    /// The number of iterations (passes, for the barrier-free solver) of the
    /// last run.
    pub iterations: usize,
    /// The time spent by the last run.
    pub elapsed: Duration,
    /// The norm of the difference between the last two approximations (an
    /// estimate, for the barrier-free solver with partial error).
    pub error: f64,
    /// Whether the tolerance was met; if false, the computation was stopped
    /// by the maximum number of iterations.
    pub converged: bool,
}

impl RankResult {
    /// An empty result, as returned for graphs without nodes.
    pub(crate) fn empty() -> Self {
        Self {
            ranks: Box::new([]),
            iterations: 0,
            elapsed: Duration::ZERO,
            error: 0.0,
            converged: true,
        }
    }

    /// Returns the elapsed time of the last run in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}
