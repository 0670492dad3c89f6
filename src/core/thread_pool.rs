// Copyright 2024-2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Coordinator of a SAXPY run: one thread per partition, spawned once and
//! joined once.

use super::range::PartitionFactory;
use super::sync::SharedAccumulator;
use super::util::try_with_capacity;
use super::vectors::SaxpyData;
use super::worker::{Worker, WorkerReport};
use crate::config::SaxpyConfig;
use crate::error::Error;
use crate::macros::{log_debug, log_error, log_warn};
// Platforms that support `libc::sched_setaffinity()`.
#[cfg(all(
    not(miri),
    any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "linux"
    )
))]
use nix::{
    sched::{sched_setaffinity, CpuSet},
    unistd::Pid,
};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Number of worker threads to spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadCount {
    /// Spawn the number of threads returned by
    /// [`std::thread::available_parallelism()`].
    AvailableParallelism,
    /// Spawn the given number of threads.
    Count(NonZeroUsize),
}

impl ThreadCount {
    /// Resolves the number of threads to spawn.
    ///
    /// Falls back to a single thread if the available parallelism can't be
    /// determined.
    pub fn count(self) -> NonZeroUsize {
        match self {
            ThreadCount::AvailableParallelism => {
                std::thread::available_parallelism().unwrap_or_else(|_e| {
                    log_warn!("Getting the available parallelism failed, using one thread: {_e}");
                    NonZeroUsize::MIN
                })
            }
            ThreadCount::Count(count) => count,
        }
    }
}

impl TryFrom<usize> for ThreadCount {
    type Error = Error;

    fn try_from(thread_count: usize) -> Result<Self, Self::Error> {
        let count = NonZeroUsize::try_from(thread_count)
            .map_err(|_| Error::invalid("num_threads", "must be positive"))?;
        Ok(ThreadCount::Count(count))
    }
}

/// Strategy to merge the per-round sums of the workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccumulationStrategy {
    /// Each worker adds its sum into the shared accumulator at the end of
    /// every round. The order of the additions depends on thread scheduling,
    /// so the means may differ in the last bits between runs.
    #[default]
    Atomic,
    /// Each worker keeps its sums locally, and the coordinator adds them in
    /// worker order once all the workers are joined. The means are then
    /// reproducible bit for bit for a given number of threads.
    Ordered,
}

/// Policy to pin worker threads to CPUs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CpuPinningPolicy {
    /// Don't pin worker threads to CPUs.
    #[default]
    No,
    /// Pin worker thread `i` to CPU `i`, if CPU pinning is supported and
    /// implemented on this platform.
    IfSupported,
    /// Pin worker thread `i` to CPU `i`. If this fails, the run fails with
    /// [`Error::CpuPinning`].
    Always,
}

/// Results of a SAXPY run.
#[derive(Clone, Debug, PartialEq)]
pub struct SaxpyOutput {
    /// The X vector, unchanged.
    pub x: Vec<f64>,
    /// The Y vector after all the rounds.
    pub y: Vec<f64>,
    /// The scalar multiplier.
    pub a: f64,
    /// Mean of Y after each round.
    pub means: Vec<f64>,
    /// Wall-clock duration of the parallel phase, from spawning the workers
    /// until the means are computed.
    pub elapsed: Duration,
    /// Diagnostics of each worker, in worker order.
    pub reports: Vec<WorkerReport>,
}

/// A SAXPY run, ready to be executed.
///
/// ```
/// # use saxpy::{Saxpy, SaxpyConfig, ThreadCount};
/// let config = SaxpyConfig {
///     len: 1000,
///     num_threads: ThreadCount::try_from(4).unwrap(),
///     max_iters: 10,
///     ..SaxpyConfig::default()
/// };
/// let output = Saxpy::new(&config).unwrap().run().unwrap();
/// assert_eq!(output.y.len(), 1000);
/// assert_eq!(output.means.len(), 10);
/// ```
#[derive(Debug)]
pub struct Saxpy {
    /// Operands, allocated once for the whole run.
    data: SaxpyData,
    /// Number of worker threads.
    num_threads: NonZeroUsize,
    /// Number of rounds.
    max_iters: usize,
    /// Strategy to merge the per-round sums.
    accumulation: AccumulationStrategy,
    /// Policy to pin worker threads to CPUs.
    cpu_pinning: CpuPinningPolicy,
}

impl Saxpy {
    /// Validates the configuration and fills the vectors with random values
    /// derived from the configured seed.
    pub fn new(config: &SaxpyConfig) -> Result<Self, Error> {
        config.validate()?;
        let data = SaxpyData::random(config.len, config.seed)?;
        Self::with_data(config, data)
    }

    /// Validates the configuration and uses the given vectors. The seed of
    /// the configuration is ignored.
    pub fn with_data(config: &SaxpyConfig, data: SaxpyData) -> Result<Self, Error> {
        config.validate()?;
        if data.len() != config.len {
            return Err(Error::invalid(
                "len",
                format!(
                    "is {} but the vectors have {} elements",
                    config.len,
                    data.len()
                ),
            ));
        }
        Ok(Self {
            data,
            num_threads: config.num_threads.count(),
            max_iters: config.max_iters,
            accumulation: config.accumulation,
            cpu_pinning: config.cpu_pinning,
        })
    }

    /// The operands of this run.
    pub fn data(&self) -> &SaxpyData {
        &self.data
    }

    /// Returns the number of worker threads that this run spawns.
    pub fn num_threads(&self) -> NonZeroUsize {
        self.num_threads
    }

    /// Runs all the rounds on the worker threads, and returns the updated Y
    /// vector together with the mean of Y after each round.
    pub fn run(self) -> Result<SaxpyOutput, Error> {
        let Saxpy {
            data,
            num_threads,
            max_iters,
            accumulation,
            cpu_pinning,
        } = self;
        let len = data.len();
        let (x, mut y, a) = data.into_parts();

        let factory = PartitionFactory::new(len, num_threads.get())?;
        let accumulator = SharedAccumulator::new(max_iters)?;
        let mut rows = Vec::with_capacity(factory.num_threads());
        for _ in 0..factory.num_threads() {
            rows.push(match accumulation {
                AccumulationStrategy::Atomic => Vec::new(),
                AccumulationStrategy::Ordered => try_with_capacity("per-worker sums", max_iters)?,
            });
        }

        let start = Instant::now();
        let results = std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(factory.num_threads());
            let parts = factory.ranges().zip(factory.split_mut(&mut y)).zip(rows);
            for (id, ((range, y_part), mut row)) in parts.enumerate() {
                let worker = Worker::new(id, range.clone(), &x[range], y_part, a, max_iters);
                let accumulator = &accumulator;
                let handle = std::thread::Builder::new()
                    .name(format!("saxpy-worker-{id}"))
                    .spawn_scoped(scope, move || -> Result<(WorkerReport, Vec<f64>), Error> {
                        pin_current_thread(id, cpu_pinning)?;
                        let report = match accumulation {
                            AccumulationStrategy::Atomic => {
                                let mut sink = accumulator;
                                worker.run(&mut sink)
                            }
                            AccumulationStrategy::Ordered => worker.run(&mut row),
                        };
                        Ok((report, row))
                    })
                    .map_err(|source| {
                        log_error!("[main thread] Failed to spawn thread #{id}: {source}");
                        Error::ThreadSpawn { id, source }
                    })?;
                handles.push(handle);
            }
            log_debug!("[main thread] Spawned {} threads", handles.len());

            // Join every thread before looking at the results, so that a failure doesn't
            // leave other panics unobserved.
            let results = handles
                .into_iter()
                .enumerate()
                .map(|(id, handle)| match handle.join() {
                    Ok(result) => {
                        log_debug!("[main thread] Thread {id} joined");
                        result
                    }
                    Err(_) => {
                        log_error!("[main thread] Thread {id} panicked");
                        Err(Error::WorkerPanicked { id })
                    }
                })
                .collect::<Vec<_>>();
            log_debug!("[main thread] Joined threads.");
            results.into_iter().collect::<Result<Vec<_>, Error>>()
        })?;

        let mut reports = Vec::with_capacity(results.len());
        for (report, row) in results {
            for (round, sum) in row.into_iter().enumerate() {
                accumulator.add(round, sum);
            }
            reports.push(report);
        }
        let means = accumulator.into_means(len);
        let elapsed = start.elapsed();

        Ok(SaxpyOutput {
            x,
            y,
            a,
            means,
            elapsed,
            reports,
        })
    }
}

/// Pins the current thread to CPU `id` according to the given policy.
#[cfg(all(
    not(miri),
    any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "linux"
    )
))]
fn pin_current_thread(id: usize, policy: CpuPinningPolicy) -> Result<(), Error> {
    let pin = || -> nix::Result<()> {
        let mut cpu_set = CpuSet::new();
        cpu_set.set(id)?;
        sched_setaffinity(Pid::from_raw(0), &cpu_set)
    };
    match policy {
        CpuPinningPolicy::No => (),
        CpuPinningPolicy::IfSupported => match pin() {
            Ok(()) => log_debug!("Pinned thread #{id} to CPU #{id}"),
            Err(_e) => log_warn!("Failed to set CPU affinity for thread #{id}: {_e}"),
        },
        CpuPinningPolicy::Always => {
            pin().map_err(|e| Error::CpuPinning {
                id,
                reason: e.to_string(),
            })?;
            log_debug!("Pinned thread #{id} to CPU #{id}");
        }
    }
    Ok(())
}

/// Pins the current thread to CPU `id` according to the given policy.
#[cfg(any(
    miri,
    not(any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "linux"
    ))
))]
fn pin_current_thread(id: usize, policy: CpuPinningPolicy) -> Result<(), Error> {
    match policy {
        CpuPinningPolicy::No => Ok(()),
        CpuPinningPolicy::IfSupported => {
            log_warn!("Pinning threads to CPUs is not implemented on this platform.");
            Ok(())
        }
        CpuPinningPolicy::Always => Err(Error::CpuPinning {
            id,
            reason: "not implemented on this platform".to_owned(),
        }),
    }
}
