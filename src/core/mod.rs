// Copyright 2024-2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Core engine: partitioning, worker threads and the shared accumulator.

mod range;
mod sync;
mod thread_pool;
mod util;
mod vectors;
mod worker;

pub use range::{partition, PartitionFactory};
pub use sync::SharedAccumulator;
pub use thread_pool::{AccumulationStrategy, CpuPinningPolicy, Saxpy, SaxpyOutput, ThreadCount};
pub use vectors::SaxpyData;
pub use worker::{RoundSink, Worker, WorkerReport};
