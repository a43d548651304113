/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Command-line interface structs, functions, and methods.
//!
//! Each command is implemented as a submodule with a `CliArgs` struct and a
//! `main` function.

use crate::graphs::VecGraph;
use crate::rank::{Norm, Options, Strategy};
use crate::transform::add_self_loops;
use crate::utils::mtx::load_mtx;
use crate::utils::RandomSleep;
use anyhow::{anyhow, bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};
use jiff::SpanRound;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

pub mod compare;
pub mod run;

/// Parses the number of threads from a string.
///
/// This function is meant to be used with `#[arg(...,  value_parser =
/// num_threads_parser)]`.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "Number of threads must be greater than 0");
    Ok(num_threads)
}

/// Shared CLI arguments for commands that specify a number of threads.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = rayon::current_num_threads().max(1), value_parser = num_threads_parser)]
    /// The number of threads to use.
    pub num_threads: usize,
}

/// Which nodes get a self-loop before ranking.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfLoops {
    /// Add a self-loop to every node.
    #[default]
    All,
    /// Add a self-loop only to nodes without successors.
    DeadEnds,
    /// Leave the graph unchanged.
    None,
}

/// The norm used for the stopping criterion.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliNorm {
    /// Number of entries that changed.
    L0,
    /// Sum of absolute differences.
    L1,
    /// Euclidean distance.
    L2,
    /// Maximum absolute difference.
    #[value(name = "li", alias = "linf")]
    LInf,
}

impl From<CliNorm> for Norm {
    fn from(norm: CliNorm) -> Self {
        match norm {
            CliNorm::L0 => Norm::L0,
            CliNorm::L1 => Norm::L1,
            CliNorm::L2 => Norm::L2,
            CliNorm::LInf => Norm::LInf,
        }
    }
}

/// The solver variant.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliStrategy {
    /// Single-threaded power iteration.
    Sequential,
    /// Parallel iterations with a barrier and reproducible reductions.
    SynchronizedOrdered,
    /// Parallel iterations with a barrier and reductions in completion order.
    SynchronizedUnordered,
    /// No barriers; convergence checked on the whole vector.
    BarrierFreeFull,
    /// No barriers; convergence estimated from the updates of each thread.
    BarrierFreePartial,
}

impl From<CliStrategy> for Strategy {
    fn from(strategy: CliStrategy) -> Self {
        match strategy {
            CliStrategy::Sequential => Strategy::Sequential,
            CliStrategy::SynchronizedOrdered => Strategy::SynchronizedOrdered,
            CliStrategy::SynchronizedUnordered => Strategy::SynchronizedUnordered,
            CliStrategy::BarrierFreeFull => Strategy::BarrierFreeFull,
            CliStrategy::BarrierFreePartial => Strategy::BarrierFreePartial,
        }
    }
}

/// Shared CLI arguments for loading and preparing a graph.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// The graph, in Matrix Market coordinate format.
    pub graph: PathBuf,

    #[arg(long, value_enum, default_value_t = SelfLoops::All)]
    /// Which nodes get a self-loop before ranking.
    pub self_loops: SelfLoops,
}

impl GraphArgs {
    /// Loads the graph as it is stored.
    pub fn read(&self) -> Result<VecGraph> {
        load_mtx(&self.graph)
            .with_context(|| format!("Could not load graph from {}", self.graph.display()))
    }

    /// Adds the requested self-loops.
    pub fn add_self_loops(&self, graph: &mut VecGraph) {
        match self.self_loops {
            SelfLoops::All => {
                add_self_loops(graph, |_, _| true);
            }
            SelfLoops::DeadEnds => {
                add_self_loops(graph, |g, node| g.outdegree(node) == 0);
            }
            SelfLoops::None => {}
        }
    }

    /// Loads the graph and adds the requested self-loops.
    pub fn load(&self) -> Result<VecGraph> {
        let mut graph = self.read()?;
        self.add_self_loops(&mut graph);
        Ok(graph)
    }
}

/// Fails if the graph has dead ends and they are not handled.
pub fn check_dead_ends(graph: &VecGraph, handle_dead_ends: bool) -> Result<()> {
    if !handle_dead_ends {
        let dead_ends = (0..graph.num_nodes())
            .filter(|&node| graph.outdegree(node) == 0)
            .count();
        ensure!(
            dead_ends == 0,
            "The graph has {dead_ends} dead ends: use --dead-ends or --self-loops"
        );
    }
    Ok(())
}

/// Shared CLI arguments for the configuration of solvers.
#[derive(Args, Debug)]
pub struct SolverArgs {
    #[arg(short = 'a', long, default_value_t = Options::DEFAULT_DAMPING)]
    /// The damping factor (must be in the interval (0 . . 1)).
    pub damping: f64,

    #[arg(long, default_value_t = Options::DEFAULT_MAX_ITERATIONS)]
    /// Maximum number of iterations.
    pub max_iter: usize,

    #[arg(short, long, default_value_t = 1)]
    /// How many times each computation is repeated; the timing of the last
    /// run is reported.
    pub repeat: usize,

    #[arg(long)]
    /// Redistribute uniformly the rank of nodes without successors.
    pub dead_ends: bool,

    #[arg(long, value_parser = parse_duration)]
    /// Let the workers of parallel solvers pause for this long before a
    /// sweep, with probability given by --sleep-probability (same syntax as
    /// --log-interval).
    pub sleep: Option<Duration>,

    #[arg(long, default_value_t = 0.1)]
    /// The probability that a worker pauses before a sweep.
    pub sleep_probability: f64,

    #[arg(long, default_value_t = 0)]
    /// The seed of the pseudorandom generators deciding the pauses.
    pub sleep_seed: u64,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,
}

impl SolverArgs {
    /// Returns solver options with the given norm and tolerance.
    pub fn options(&self, norm: Norm, tolerance: f64) -> Result<Options> {
        ensure!(
            self.damping > 0.0 && self.damping < 1.0,
            "The damping factor must be in (0 . . 1), got {}",
            self.damping
        );
        ensure!(
            tolerance >= 0.0,
            "The tolerance must be nonnegative, got {}",
            tolerance
        );
        ensure!(self.repeat > 0, "The number of repetitions must be positive");
        ensure!(
            self.max_iter > 0,
            "The maximum number of iterations must be positive"
        );
        ensure!(
            (0.0..=1.0).contains(&self.sleep_probability),
            "The sleep probability must be in [0 . . 1], got {}",
            self.sleep_probability
        );
        Ok(Options {
            repeat: self.repeat,
            handle_dead_ends: self.dead_ends,
            damping: self.damping,
            norm,
            tolerance,
            max_iterations: self.max_iter,
            sleep: self.sleep.map(|duration| RandomSleep {
                duration,
                probability: self.sleep_probability,
                seed: self.sleep_seed,
            }),
        })
    }
}

/// How to store vectors of floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FloatVectorFormat {
    /// ASCII format, one float per line.
    Ascii,
    /// A JSON Array.
    Json,
}

impl FloatVectorFormat {
    /// Stores float values in the specified `path` using the format defined by
    /// `self`.
    ///
    /// `precision` will be used to truncate the float values to the specified
    /// number of decimal digits. If `None`, the shortest representation that
    /// reads back to the same value is used.
    pub fn store(
        &self,
        path: impl AsRef<Path>,
        values: &[f64],
        precision: Option<usize>,
    ) -> Result<()> {
        create_parent_dir(&path)?;
        let path_display = path.as_ref().display();
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Could not create vector at {}", path_display))?;
        let mut file = BufWriter::new(file);

        match self {
            FloatVectorFormat::Ascii => {
                log::info!("Storing in ASCII format at {}", path_display);
                for word in values.iter() {
                    match precision {
                        None => writeln!(file, "{word}"),
                        Some(precision) => writeln!(file, "{word:.precision$}"),
                    }
                    .with_context(|| format!("Could not write vector to {}", path_display))?;
                }
            }
            FloatVectorFormat::Json => {
                log::info!("Storing in JSON format at {}", path_display);
                match precision {
                    None => serde_json::to_writer(&mut file, values)
                        .with_context(|| format!("Could not write vector to {}", path_display))?,
                    Some(precision) => {
                        let words = values
                            .iter()
                            .map(|word| format!("{word:.precision$}"))
                            .collect::<Vec<_>>();
                        write!(file, "[{}]", words.join(", "))
                            .with_context(|| format!("Could not write vector to {}", path_display))?;
                    }
                }
            }
        }

        file.flush()
            .with_context(|| format!("Could not write vector to {}", path_display))?;
        Ok(())
    }

    /// Loads float values from the specified `path` using the format defined
    /// by `self`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<f64>> {
        let path = path.as_ref();
        let path_display = path.display();
        let file =
            std::fs::File::open(path).with_context(|| format!("Could not open {}", path_display))?;
        let reader = BufReader::new(file);

        match self {
            FloatVectorFormat::Ascii => {
                log::info!("Loading ASCII format from {}", path_display);
                reader
                    .lines()
                    .enumerate()
                    .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
                    .map(|(i, line)| {
                        let line = line.with_context(|| {
                            format!("Error reading line {} of {}", i + 1, path_display)
                        })?;
                        line.trim().parse::<f64>().map_err(|e| {
                            anyhow!("Error parsing line {} of {}: {}", i + 1, path_display, e)
                        })
                    })
                    .collect()
            }
            FloatVectorFormat::Json => {
                log::info!("Loading JSON format from {}", path_display);
                serde_json::from_reader(reader)
                    .with_context(|| format!("Could not parse JSON vector from {}", path_display))
            }
        }
    }
}

/// Creates all parent directories of the given file path.
pub fn create_parent_dir(file_path: impl AsRef<Path>) -> Result<()> {
    // ensure that the dst directory exists
    if let Some(parent_dir) = file_path.as_ref().parent() {
        std::fs::create_dir_all(parent_dir).with_context(|| {
            format!(
                "Failed to create the directory {:?}",
                parent_dir.to_string_lossy()
            )
        })?;
    }
    Ok(())
}

/// Parse a duration from a string.
/// For compatibility with Java, if no suffix is given, it is assumed to be in milliseconds.
/// You can use suffixes, the available ones are:
/// - `s` for seconds
/// - `m` for minutes
/// - `h` for hours
/// - `d` for days
///
/// Example: `1d2h3m4s567` this is parsed as: 1 day, 2 hours, 3 minutes, 4 seconds, and 567 milliseconds.
fn parse_duration(value: &str) -> Result<Duration> {
    if value.is_empty() {
        bail!("Empty duration string, if you want every 0 milliseconds use `0`.");
    }
    let mut duration = Duration::from_secs(0);
    let mut acc = String::new();
    for c in value.chars() {
        if c.is_ascii_digit() {
            acc.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            let dur = acc.parse::<u64>()?;
            match c {
                's' => duration += Duration::from_secs(dur),
                'm' => duration += Duration::from_secs(dur * 60),
                'h' => duration += Duration::from_secs(dur * 60 * 60),
                'd' => duration += Duration::from_secs(dur * 60 * 60 * 24),
                _ => return Err(anyhow!("Invalid duration suffix: {}", c)),
            }
            acc.clear();
        }
    }
    if !acc.is_empty() {
        let dur = acc.parse::<u64>()?;
        duration += Duration::from_millis(dur);
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps with elapsed time since initialization.
pub fn init_envlogger() -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);
    let span_round = SpanRound::new()
        .largest(jiff::Unit::Day)
        .smallest(jiff::Unit::Millisecond)
        .days_are_24_hours();

    builder.format(move |buf, record| {
        let Ok(ts) = jiff::Timestamp::try_from(SystemTime::now()) else {
            return Err(std::io::Error::other("Failed to get timestamp"));
        };
        let style = buf.default_level_style(record.level());
        let elapsed = start.elapsed();
        let span = jiff::Span::new()
            .seconds(elapsed.as_secs() as i64)
            .milliseconds(elapsed.subsec_millis() as i64);
        let span = span.round(span_round).map_err(std::io::Error::other)?;
        writeln!(
            buf,
            "{} {} {style}{}{style:#} [{:?}] {} - {}",
            ts.strftime("%F %T%.3f"),
            printer.span_to_string(&span),
            record.level(),
            std::thread::current().id(),
            record.target(),
            record.args()
        )
    });
    builder.try_init()?;
    Ok(())
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress. Default is 10s. You can use the suffixes "s"
    /// for seconds, "m" for minutes, "h" for hours, and "d" for days. If no
    /// suffix is provided it is assumed to be in milliseconds.
    /// Example: "1d2h3m4s567" is parsed as 1 day + 2 hours + 3 minutes + 4
    /// seconds + 567 milliseconds = 93784567 milliseconds.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    #[clap(name = "compare")]
    Compare(compare::CliArgs),
    #[clap(name = "run")]
    Run(run::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "pagerank-par", version)]
/// Computes PageRank with sequential, synchronized, and barrier-free
/// parallel solvers.
///
/// Noteworthy environment variables:
///
/// - RUST_LOG: configuration for env_logger, e.g., `info` to see the
///   configuration and outcome of each run, `debug` to see every iteration.
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::Compare(args) => {
            compare::main(cli.args, args)?;
        }
        SubCommands::Run(args) => {
            run::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Pretty prints seconds in a humanly readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    let mut result = String::new();
    let mut elapsed_seconds = elapsed as u64;
    let days = elapsed_seconds / (60 * 60 * 24);
    elapsed_seconds %= 60 * 60 * 24;
    let hours = elapsed_seconds / (60 * 60);
    elapsed_seconds %= 60 * 60;
    let minutes = elapsed_seconds / 60;

    for (value, unit) in [(days, "day"), (hours, "hour"), (minutes, "minute")] {
        match value {
            0 => {}
            1 => result.push_str(&format!("1 {unit} ")),
            _ => result.push_str(&format!("{value} {unit}s ")),
        }
    }

    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}
