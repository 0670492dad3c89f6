// Copyright 2024-2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![doc = include_str!("../README.md")]
#![forbid(missing_docs, unsafe_code)]

mod config;
mod core;
mod error;
mod macros;
pub mod reference;

pub use crate::config::{
    SaxpyConfig, DEFAULT_LEN, DEFAULT_MAX_ITERS, DEFAULT_NUM_THREADS, DEFAULT_SEED,
};
pub use crate::core::{
    partition, AccumulationStrategy, CpuPinningPolicy, PartitionFactory, RoundSink, Saxpy,
    SaxpyData, SaxpyOutput, SharedAccumulator, ThreadCount, Worker, WorkerReport,
};
pub use crate::error::{Error, ErrorKind};

/// Validates the configuration, initializes the vectors from the seed and
/// runs all the rounds on the worker threads.
pub fn run(config: &SaxpyConfig) -> Result<SaxpyOutput, Error> {
    Saxpy::new(config)?.run()
}
