// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI tool to run an iterative SAXPY on worker threads.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use saxpy::{
    reference, AccumulationStrategy, CpuPinningPolicy, Saxpy, SaxpyConfig, SaxpyData, ThreadCount,
    DEFAULT_LEN, DEFAULT_MAX_ITERS, DEFAULT_NUM_THREADS, DEFAULT_SEED,
};

/// Maximum relative error tolerated by `--verify`.
const TOLERANCE: f64 = 1e-9;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = SaxpyConfig {
        len: cli.vector_size,
        seed: cli.seed,
        num_threads: if cli.available_parallelism {
            ThreadCount::AvailableParallelism
        } else {
            ThreadCount::try_from(cli.num_threads)?
        },
        max_iters: cli.max_iters,
        accumulation: match cli.accumulation {
            AccumulationCli::Atomic => AccumulationStrategy::Atomic,
            AccumulationCli::Ordered => AccumulationStrategy::Ordered,
        },
        cpu_pinning: match cli.cpu_pinning {
            CpuPinningCli::No => CpuPinningPolicy::No,
            CpuPinningCli::IfSupported => CpuPinningPolicy::IfSupported,
            CpuPinningCli::Always => CpuPinningPolicy::Always,
        },
    };

    let saxpy = Saxpy::new(&config).context("failed to initialize the vectors")?;
    println!(
        "p = {}, seed = {}, n_threads = {}, max_iters = {}",
        config.len,
        config.seed,
        saxpy.num_threads(),
        config.max_iters
    );

    let output = saxpy.run().context("the parallel run failed")?;

    for report in &output.reports {
        log::info!(
            "Thread {}: {:?}, rounds = {}, last Y = {:?}, last round sum = {}",
            report.id,
            report.range,
            report.rounds,
            report.last_value,
            report.last_sum
        );
    }

    println!(
        "Execution time: {:.6} ms",
        output.elapsed.as_secs_f64() * 1000.0
    );
    println!("Last 3 values of Y: {}", format_tail(&output.y));
    println!("Last 3 values of Y_avgs: {}", format_tail(&output.means));

    if cli.verify {
        // The initial values only depend on the seed, so they can be drawn again.
        let (x, y0, a) = SaxpyData::random(config.len, config.seed)?.into_parts();

        let expected_y = reference::closed_form(&x, &y0, a, config.max_iters);
        let y_error = reference::max_relative_error(&output.y, &expected_y);

        let mut y = y0;
        let expected_means = reference::sequential(&x, &mut y, a, config.max_iters);
        let means_error = reference::max_relative_error(&output.means, &expected_means);

        println!("Max relative error: Y = {y_error:e}, Y_avgs = {means_error:e}");
        if y_error > TOLERANCE || means_error > TOLERANCE {
            bail!("verification failed: relative error above {TOLERANCE:e}");
        }
        println!("Verification passed");
    }

    Ok(())
}

/// Formats the last (up to) 3 values of a slice.
fn format_tail(values: &[f64]) -> String {
    let start = values.len().saturating_sub(3);
    values[start..]
        .iter()
        .map(|v| format!("{v:.6}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// CLI tool to run an iterative SAXPY on worker threads.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(version)]
struct Cli {
    /// Number of elements in the X and Y vectors.
    #[arg(short = 'p', long, default_value_t = DEFAULT_LEN)]
    vector_size: usize,

    /// Seed of the random initialization.
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Number of worker threads.
    #[arg(short, long, default_value_t = DEFAULT_NUM_THREADS.get())]
    num_threads: usize,

    /// Spawn as many worker threads as the available parallelism, ignoring
    /// `--num-threads`.
    #[arg(long, default_value_t = false)]
    available_parallelism: bool,

    /// Number of rounds.
    #[arg(short = 'i', long, default_value_t = DEFAULT_MAX_ITERS)]
    max_iters: usize,

    /// Strategy to merge the per-round sums of the workers.
    #[arg(long, value_enum, default_value_t = AccumulationCli::Atomic)]
    accumulation: AccumulationCli,

    /// Policy to pin worker threads to CPUs.
    #[arg(long, value_enum, default_value_t = CpuPinningCli::No)]
    cpu_pinning: CpuPinningCli,

    /// Check the results against a sequential computation.
    #[arg(long, default_value_t = false)]
    verify: bool,
}

/// Strategy to merge the per-round sums of the workers.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
enum AccumulationCli {
    /// Workers add their sums into shared atomic slots.
    Atomic,
    /// Sums are merged in worker order after the workers finish.
    Ordered,
}

/// Policy to pin worker threads to CPUs.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
enum CpuPinningCli {
    /// Don't pin worker threads.
    No,
    /// Pin worker threads if the platform supports it.
    IfSupported,
    /// Pin worker threads, failing otherwise.
    Always,
}
