// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Synchronization primitives

use super::util::try_with_capacity;
use crate::error::Error;
#[cfg(feature = "log_parallelism")]
use crate::macros::log_info;
use atomic_float::AtomicF64;
use crossbeam_utils::CachePadded;
#[cfg(feature = "log_parallelism")]
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// Per-round sums of the output vector, shared by all the worker threads.
///
/// Each slot is updated independently and sits on its own cache line, so that
/// workers finishing different rounds at the same time don't contend with
/// each other.
#[derive(Debug)]
pub struct SharedAccumulator {
    /// One running sum per round.
    slots: Box<[CachePadded<AtomicF64>]>,
    /// Number of contributions received over all slots.
    #[cfg(feature = "log_parallelism")]
    contributions: CachePadded<AtomicU64>,
}

impl SharedAccumulator {
    /// Creates an accumulator of `len` slots, all set to zero.
    pub fn new(len: usize) -> Result<Self, Error> {
        let mut slots = try_with_capacity("accumulator", len)?;
        slots.extend((0..len).map(|_| CachePadded::new(AtomicF64::new(0.0))));
        Ok(Self {
            slots: slots.into_boxed_slice(),
            #[cfg(feature = "log_parallelism")]
            contributions: CachePadded::new(AtomicU64::new(0)),
        })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether this accumulator has no slot at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Atomically adds `delta` to the slot at `index`.
    ///
    /// Concurrent calls on the same slot are all applied: after all calls
    /// return, the slot holds the sum of all the deltas (up to floating-point
    /// rounding, which depends on the order in which they were applied).
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn add(&self, index: usize, delta: f64) {
        // Slots are only read after the worker threads are joined.
        self.slots[index].fetch_add(delta, Ordering::Relaxed);
        #[cfg(feature = "log_parallelism")]
        self.contributions.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the current value of the slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn load(&self, index: usize) -> f64 {
        self.slots[index].load(Ordering::Relaxed)
    }

    /// Consumes the accumulator and divides each slot by `divisor`.
    pub fn into_means(self, divisor: usize) -> Vec<f64> {
        #[cfg(feature = "log_parallelism")]
        self.print_statistics();

        let divisor = divisor as f64;
        self.slots
            .into_vec()
            .into_iter()
            .map(|slot| slot.into_inner().into_inner() / divisor)
            .collect()
    }

    /// Logs accumulator statistics.
    #[cfg(feature = "log_parallelism")]
    fn print_statistics(&self) {
        log_info!(
            "Accumulator statistics: {} slots, {} contributions",
            self.slots.len(),
            self.contributions.load(Ordering::Relaxed)
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_accumulator_starts_at_zero() {
        let accumulator = SharedAccumulator::new(5).unwrap();
        assert_eq!(accumulator.len(), 5);
        assert!(!accumulator.is_empty());
        assert!((0..5).all(|i| accumulator.load(i) == 0.0));
    }

    #[test]
    fn test_accumulator_add() {
        let accumulator = SharedAccumulator::new(3).unwrap();
        accumulator.add(0, 1.5);
        accumulator.add(0, 2.5);
        accumulator.add(2, -1.0);
        assert_eq!(accumulator.load(0), 4.0);
        assert_eq!(accumulator.load(1), 0.0);
        assert_eq!(accumulator.load(2), -1.0);
    }

    #[test]
    fn test_accumulator_into_means() {
        let accumulator = SharedAccumulator::new(2).unwrap();
        accumulator.add(0, 10.0);
        accumulator.add(1, 30.0);
        assert_eq!(accumulator.into_means(4), vec![2.5, 7.5]);
    }

    #[test]
    fn test_accumulator_empty() {
        let accumulator = SharedAccumulator::new(0).unwrap();
        assert!(accumulator.is_empty());
        assert!(accumulator.into_means(1).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_accumulator_add_out_of_bounds() {
        SharedAccumulator::new(2).unwrap().add(2, 1.0);
    }

    #[test]
    fn test_accumulator_no_lost_updates() {
        const NUM_THREADS: usize = 8;
        #[cfg(not(miri))]
        const NUM_ADDS: usize = 10_000;
        #[cfg(miri)]
        const NUM_ADDS: usize = 100;

        let accumulator = SharedAccumulator::new(4).unwrap();
        std::thread::scope(|s| {
            for _ in 0..NUM_THREADS {
                s.spawn(|| {
                    for i in 0..NUM_ADDS {
                        // Every thread hits the same slots in the same order, to maximize
                        // contention.
                        accumulator.add(i % 4, 1.0);
                    }
                });
            }
        });

        // Small integers are represented exactly, so the sums must be exact.
        let expected = (NUM_THREADS * NUM_ADDS / 4) as f64;
        for i in 0..4 {
            assert_eq!(accumulator.load(i), expected);
        }
    }

    #[test]
    fn test_accumulator_negative_and_fractional_deltas() {
        let accumulator = SharedAccumulator::new(1).unwrap();
        accumulator.add(0, 0.25);
        accumulator.add(0, -1.5);
        accumulator.add(0, 0.125);
        assert_eq!(accumulator.load(0), -1.125);
        assert_eq!(accumulator.into_means(3), vec![-0.375]);
    }

    #[cfg(feature = "log_parallelism")]
    #[test]
    fn test_accumulator_counts_contributions() {
        let accumulator = SharedAccumulator::new(3).unwrap();
        for i in 0..7 {
            accumulator.add(i % 3, 1.0);
        }
        assert_eq!(accumulator.contributions.load(Ordering::Relaxed), 7);
    }
}
