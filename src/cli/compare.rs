/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{check_dead_ends, CliNorm, CliStrategy, GlobalArgs, GraphArgs, SolverArgs};
use crate::graphs::random::*;
use crate::graphs::VecGraph;
use crate::rank::{Norm, RankResult, Strategy};
use crate::transform::transpose_with_degree;
use anyhow::{ensure, Result};
use clap::Parser;
use dsi_progress_logger::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(
    name = "compare",
    about = "Compares the parallel PageRank solvers with the sequential one over a range of tolerances.",
    long_about = None
)]
pub struct CliArgs {
    #[clap(flatten)]
    pub graph: GraphArgs,

    #[clap(flatten)]
    pub solver: SolverArgs,

    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [CliNorm::L1, CliNorm::L2, CliNorm::LInf])]
    /// The norms used for the stopping criterion.
    pub norms: Vec<CliNorm>,

    #[arg(long, default_value_t = 1E-10)]
    /// Tolerances go from 1E-3 down to this value, dividing by 1000 each time.
    pub min_tolerance: f64,

    #[arg(short, long, value_enum, value_delimiter = ',')]
    /// The parallel strategies to compare (default: all).
    pub strategies: Vec<CliStrategy>,

    #[arg(long, default_value_t = 0)]
    /// Add this number of random arcs before ranking.
    pub add_arcs: usize,

    #[arg(long, default_value_t = 0)]
    /// Remove this number of random arcs before ranking.
    pub remove_arcs: usize,

    #[arg(long)]
    /// Choose endpoints of random mutations with probability proportional to
    /// their outdegree.
    pub by_degree: bool,

    #[arg(long, default_value_t = 0)]
    /// The seed of the pseudorandom generator for mutations.
    pub seed: u64,
}

/// Returns the tolerances 1E-3, 1E-6, … down to `min_tolerance`.
fn tolerances(min_tolerance: f64) -> Vec<f64> {
    let mut result = vec![];
    let mut tolerance = 1E-3;
    // Slack for the rounding of repeated divisions
    while tolerance >= min_tolerance * (1.0 - 1E-9) {
        result.push(tolerance);
        tolerance /= 1000.0;
    }
    result
}

/// Formats a line of the comparison table.
fn format_result(
    result: &RankResult,
    error: f64,
    label: impl std::fmt::Display,
    norm: Norm,
    tolerance: f64,
) -> String {
    format!(
        "[{:09.3} ms; {:03} iters.] [{:.4e} err.] {} {{tol_norm: {}, tolerance: {:.0e}}}",
        result.elapsed_ms(),
        result.iterations,
        error,
        label,
        norm,
        tolerance
    )
}

/// Applies the random mutations requested on the command line.
fn mutate(graph: &mut VecGraph, args: &CliArgs) {
    if args.add_arcs == 0 && args.remove_arcs == 0 {
        return;
    }
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let span = graph.num_nodes().max(1);
    let (mut added, mut removed) = (0, 0);
    for _ in 0..args.add_arcs {
        let new = if args.by_degree && graph.num_nodes() > 0 {
            add_random_arc_by_degree(graph, &mut rng)
        } else {
            add_random_arc(graph, &mut rng, span)
        };
        added += new as usize;
    }
    for _ in 0..args.remove_arcs {
        let gone = if args.by_degree {
            remove_random_arc_by_degree(graph, &mut rng)
        } else {
            remove_random_arc(graph, &mut rng)
        };
        removed += gone as usize;
    }
    log::info!(
        "Added {added} and removed {removed} random arcs{}",
        if args.by_degree { " (by degree)" } else { "" }
    );
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    ensure!(
        args.min_tolerance > 0.0 && args.min_tolerance <= 1E-3,
        "The minimum tolerance must be in (0 . . 1E-3], got {}",
        args.min_tolerance
    );

    let mut pl = progress_logger![display_memory = true];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let mut graph = args.graph.read()?;
    mutate(&mut graph, &args);
    args.graph.add_self_loops(&mut graph);
    check_dead_ends(&graph, args.solver.dead_ends)?;
    let transpose = transpose_with_degree(&graph);
    println!(
        "Loaded graph {} [{} nodes, {} arcs]",
        args.graph.graph.display(),
        graph.num_nodes(),
        graph.num_arcs()
    );
    drop(graph);

    let strategies: Vec<Strategy> = if args.strategies.is_empty() {
        Strategy::ALL
            .into_iter()
            .filter(Strategy::is_parallel)
            .collect()
    } else {
        args.strategies.iter().map(|&s| Strategy::from(s)).collect()
    };
    let num_threads = args.solver.num_threads.num_threads;

    for &norm in &args.norms {
        let norm = Norm::from(norm);
        for tolerance in tolerances(args.min_tolerance) {
            let options = args.solver.options(norm, tolerance)?;
            let reference =
                Strategy::Sequential.solve(num_threads, &transpose, None, &options, &mut pl)?;
            println!(
                "{}",
                format_result(&reference, 0.0, Strategy::Sequential, norm, tolerance)
            );
            for &strategy in &strategies {
                let result = strategy.solve(num_threads, &transpose, None, &options, &mut pl)?;
                let error = Norm::L1.distance(&reference.ranks, &result.ranks);
                let label = format!("{strategy} [{num_threads} threads]");
                println!("{}", format_result(&result, error, label, norm, tolerance));
                if !result.converged {
                    log::warn!(
                        "{strategy} did not converge within {} iterations",
                        options.max_iterations
                    );
                }
            }
        }
    }

    Ok(())
}
