/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Predicates implementing stopping conditions.
//!
//! Solvers evaluate a [predicate](Predicate) after each iteration: it
//! evaluates to true if the computation should be stopped. The
//! [stopping criterion](stopping_criterion) of a solver is built from its
//! [`Options`], combining [`Tolerance`] and [`MaxIter`] with the `or` method
//! provided by [`PredicateBooleanExt`].
//!
//! # Examples
//! ```
//! use predicates::prelude::*;
//! use pagerank_par::rank::Norm;
//! use pagerank_par::rank::preds::{MaxIter, PredParams, Tolerance};
//!
//! let predicate = Tolerance::new(Norm::L1, 1E-6).or(MaxIter::from(100));
//! assert!(predicate.eval(&PredParams { iteration: 3, error: 1E-7 }));
//! assert!(predicate.eval(&PredParams { iteration: 100, error: 1.0 }));
//! assert!(!predicate.eval(&PredParams { iteration: 3, error: 1.0 }));
//! ```

use super::{Norm, Options};
use predicates::prelude::*;
use predicates::reflection::PredicateReflection;
use std::fmt::Display;

/// This structure is passed to stopping predicates to provide the
/// information that is needed to evaluate them.
#[derive(Debug, Clone, Copy)]
pub struct PredParams {
    /// The number of iterations completed.
    pub iteration: usize,
    /// The norm of the difference between the last two approximations.
    pub error: f64,
}

/// Stops after at most the provided number of iterations.
#[derive(Debug, Clone)]
pub struct MaxIter {
    max_iter: usize,
}

impl From<usize> for MaxIter {
    fn from(max_iter: usize) -> Self {
        MaxIter { max_iter }
    }
}

impl Display for MaxIter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("(max iter: {})", self.max_iter))
    }
}

impl PredicateReflection for MaxIter {}

impl Predicate<PredParams> for MaxIter {
    fn eval(&self, pred_params: &PredParams) -> bool {
        pred_params.iteration >= self.max_iter
    }
}

/// Stops when the norm of the difference between successive approximations
/// is at most a given threshold.
#[derive(Debug, Clone)]
pub struct Tolerance {
    norm: Norm,
    threshold: f64,
}

impl Tolerance {
    /// Creates a new tolerance predicate.
    ///
    /// The norm is used only for display purposes: the error is computed by
    /// the solver.
    pub fn new(norm: Norm, threshold: f64) -> Self {
        Self { norm, threshold }
    }
}

impl Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("({} norm: {:e})", self.norm, self.threshold))
    }
}

impl PredicateReflection for Tolerance {}

impl Predicate<PredParams> for Tolerance {
    fn eval(&self, pred_params: &PredParams) -> bool {
        pred_params.error <= self.threshold
    }
}

/// Returns the stopping criterion described by the given options.
pub fn stopping_criterion(options: &Options) -> impl Predicate<PredParams> + Display {
    Tolerance::new(options.norm, options.tolerance).or(MaxIter::from(options.max_iterations))
}
