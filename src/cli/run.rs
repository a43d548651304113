/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{
    check_dead_ends, CliNorm, CliStrategy, FloatVectorFormat, GlobalArgs, GraphArgs, SolverArgs,
};
use crate::rank::{Norm, Options, Strategy};
use crate::transform::transpose_with_degree;
use anyhow::{ensure, Result};
use clap::Parser;
use dsi_progress_logger::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "run",
    about = "Computes PageRank with a single solver and stores the rank vector.",
    long_about = None
)]
pub struct CliArgs {
    #[clap(flatten)]
    pub graph: GraphArgs,

    #[clap(flatten)]
    pub solver: SolverArgs,

    #[arg(short, long, value_enum, default_value_t = CliStrategy::BarrierFreePartial)]
    /// The solver to use.
    pub strategy: CliStrategy,

    #[arg(long, value_enum, default_value_t = CliNorm::L1)]
    /// The norm used for the stopping criterion.
    pub norm: CliNorm,

    #[arg(short, long, default_value_t = Options::DEFAULT_TOLERANCE)]
    /// The computation stops when the norm of the difference between
    /// successive approximations is at most this value.
    pub tolerance: f64,

    #[arg(long)]
    /// A vector to start from instead of the uniform one (warm start).
    pub init: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Ascii)]
    /// The input format for the initial vector.
    pub init_fmt: FloatVectorFormat,

    #[arg(short, long)]
    /// Where to store the rank vector.
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FloatVectorFormat::Ascii)]
    /// The output format for the rank vector.
    pub fmt: FloatVectorFormat,

    #[arg(long)]
    /// Decimal digits for text output formats.
    pub precision: Option<usize>,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let options = args.solver.options(Norm::from(args.norm), args.tolerance)?;

    let mut pl = progress_logger![display_memory = true];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let graph = args.graph.load()?;
    let transpose = transpose_with_degree(&graph);

    let init = args
        .init
        .as_ref()
        .map(|path| args.init_fmt.load(path))
        .transpose()?;
    if let Some(init) = &init {
        ensure!(
            init.len() == graph.num_nodes(),
            "The initial vector has {} entries, but the graph has {} nodes",
            init.len(),
            graph.num_nodes()
        );
    }
    check_dead_ends(&graph, options.handle_dead_ends)?;
    drop(graph);

    let strategy = Strategy::from(args.strategy);
    let result = strategy.solve(
        args.solver.num_threads.num_threads,
        &transpose,
        init.as_deref(),
        &options,
        &mut pl,
    )?;

    log::info!(
        "{strategy}: {} iteration(s) in {:.3} ms, error {:e}{}",
        result.iterations,
        result.elapsed_ms(),
        result.error,
        if result.converged {
            ""
        } else {
            " (not converged)"
        }
    );

    match &args.output {
        Some(output) => args.fmt.store(output, &result.ranks, args.precision)?,
        None => {
            for rank in result.ranks.iter() {
                match args.precision {
                    Some(precision) => println!("{rank:.precision$}"),
                    None => println!("{rank}"),
                }
            }
        }
    }

    Ok(())
}
