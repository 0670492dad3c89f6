// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The loop run by each worker thread.

use super::sync::SharedAccumulator;
#[cfg(feature = "log_parallelism")]
use crate::macros::log_trace;
use crate::macros::log_debug;
use std::ops::Range;

/// Destination of the per-round sums computed by a worker.
pub trait RoundSink {
    /// Records the sum of the worker's part of Y after the given round.
    fn contribute(&mut self, round: usize, sum: f64);
}

/// Adds each sum into the shared accumulator as soon as it's computed.
impl RoundSink for &SharedAccumulator {
    fn contribute(&mut self, round: usize, sum: f64) {
        self.add(round, sum);
    }
}

/// Records the sums locally, in round order, to be merged after the workers
/// are joined.
impl RoundSink for Vec<f64> {
    fn contribute(&mut self, round: usize, sum: f64) {
        debug_assert_eq!(round, self.len());
        self.push(sum);
    }
}

/// Diagnostics returned by a worker once it has completed all its rounds.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkerReport {
    /// Worker index.
    pub id: usize,
    /// Range of indices of Y owned by this worker.
    pub range: Range<usize>,
    /// Number of completed rounds.
    pub rounds: usize,
    /// Last value written to Y, or [`None`] if the range is empty.
    pub last_value: Option<f64>,
    /// Sum contributed for the last round.
    pub last_sum: f64,
}

/// Context owned by a worker thread.
pub struct Worker<'a> {
    /// Worker index.
    id: usize,
    /// Range of indices that this worker owns.
    range: Range<usize>,
    /// Part of X matching the range.
    x: &'a [f64],
    /// Part of Y matching the range, exclusively borrowed by this worker.
    y: &'a mut [f64],
    /// Scalar multiplier.
    a: f64,
    /// Number of rounds to run.
    max_iters: usize,
}

impl<'a> Worker<'a> {
    /// Creates a worker updating `y` (the indices `range` of Y) from `x` (the
    /// same indices of X).
    pub fn new(
        id: usize,
        range: Range<usize>,
        x: &'a [f64],
        y: &'a mut [f64],
        a: f64,
        max_iters: usize,
    ) -> Self {
        assert_eq!(x.len(), range.len(), "X slice doesn't match range {range:?}");
        assert_eq!(y.len(), range.len(), "Y slice doesn't match range {range:?}");
        Self {
            id,
            range,
            x,
            y,
            a,
            max_iters,
        }
    }

    /// Main function run by this worker.
    ///
    /// Each round updates every owned element as `y = y + a * x`, then hands
    /// the sum of the updated elements to the `sink`. A worker with an empty
    /// range still runs all the rounds and contributes zeros.
    pub fn run(self, sink: &mut impl RoundSink) -> WorkerReport {
        log_debug!(
            "[thread {}] Processing range {:?} for {} rounds",
            self.id,
            self.range,
            self.max_iters
        );

        let a = self.a;
        let mut last_sum = 0.0;
        for round in 0..self.max_iters {
            let mut sum = 0.0;
            for (y, x) in self.y.iter_mut().zip(self.x) {
                *y += a * *x;
                sum += *y;
            }
            #[cfg(feature = "log_parallelism")]
            log_trace!("[thread {}, round {round}] Local sum = {sum}", self.id);
            sink.contribute(round, sum);
            last_sum = sum;
        }

        let report = WorkerReport {
            id: self.id,
            range: self.range,
            rounds: self.max_iters,
            last_value: self.y.last().copied(),
            last_sum,
        };
        log_debug!("[thread {}] Finished: {report:?}", report.id);
        report
    }
}
