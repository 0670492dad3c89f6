// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parameters of a SAXPY run.

use crate::core::{AccumulationStrategy, CpuPinningPolicy, ThreadCount};
use crate::error::Error;
use std::num::NonZeroUsize;

/// Default number of elements in X and Y.
pub const DEFAULT_LEN: usize = 10_000_000;
/// Default seed of the random initialization.
pub const DEFAULT_SEED: u64 = 1;
/// Default number of worker threads.
pub const DEFAULT_NUM_THREADS: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(n) => n,
    None => unreachable!(),
};
/// Default number of rounds.
pub const DEFAULT_MAX_ITERS: usize = 1000;

/// Parameters of a SAXPY run.
///
/// ```
/// # use saxpy::{AccumulationStrategy, SaxpyConfig, ThreadCount};
/// let config = SaxpyConfig {
///     len: 100,
///     accumulation: AccumulationStrategy::Ordered,
///     ..SaxpyConfig::default()
/// };
/// assert!(config.validate().is_ok());
///
/// let config = SaxpyConfig {
///     max_iters: 0,
///     ..config
/// };
/// assert!(config.validate().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaxpyConfig {
    /// Number of elements in X and Y.
    pub len: usize,
    /// Seed of the random initialization of X, Y and a.
    pub seed: u64,
    /// Number of worker threads.
    pub num_threads: ThreadCount,
    /// Number of rounds.
    pub max_iters: usize,
    /// Strategy to merge the per-round sums of the workers.
    pub accumulation: AccumulationStrategy,
    /// Policy to pin worker threads to CPUs.
    pub cpu_pinning: CpuPinningPolicy,
}

impl Default for SaxpyConfig {
    fn default() -> Self {
        Self {
            len: DEFAULT_LEN,
            seed: DEFAULT_SEED,
            num_threads: ThreadCount::Count(DEFAULT_NUM_THREADS),
            max_iters: DEFAULT_MAX_ITERS,
            accumulation: AccumulationStrategy::default(),
            cpu_pinning: CpuPinningPolicy::default(),
        }
    }
}

impl SaxpyConfig {
    /// Checks that the vector length and the number of rounds are positive.
    /// The number of threads is positive by construction.
    pub fn validate(&self) -> Result<(), Error> {
        if self.len == 0 {
            return Err(Error::invalid("len", "must be positive"));
        }
        if self.max_iters == 0 {
            return Err(Error::invalid("max_iters", "must be positive"));
        }
        Ok(())
    }
}
