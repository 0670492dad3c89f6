// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fixed partitioning of an index range among worker threads.

use crate::error::Error;
use std::num::NonZeroUsize;
use std::ops::Range;

/// Returns the half-open range of indices owned by worker `index` when
/// `num_elements` items are split among `num_threads` workers.
///
/// Boundaries are `index * num_elements / num_threads` and
/// `(index + 1) * num_elements / num_threads`, rounded down. Consecutive
/// workers therefore share their boundary, so the ranges of all workers cover
/// `0..num_elements` exactly once. When there are more workers than elements,
/// some of the ranges are empty.
///
/// ```
/// assert_eq!(saxpy::partition(100, 7, 3).unwrap(), 42..57);
/// assert_eq!(saxpy::partition(1, 10, 0).unwrap(), 0..0);
/// assert_eq!(saxpy::partition(1, 10, 9).unwrap(), 0..1);
/// assert!(saxpy::partition(0, 4, 0).is_err());
/// ```
pub fn partition(
    num_elements: usize,
    num_threads: usize,
    index: usize,
) -> Result<Range<usize>, Error> {
    let factory = PartitionFactory::new(num_elements, num_threads)?;
    if index >= factory.num_threads() {
        return Err(Error::invalid(
            "index",
            format!("must be below the number of threads ({num_threads}), got {index}"),
        ));
    }
    Ok(factory.range(index))
}

/// A factory that hands out a fixed range to each worker thread.
///
/// The ranges never change for the lifetime of the factory, which is what
/// allows each worker to own its part of the output for a whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionFactory {
    /// Total number of elements to split.
    num_elements: NonZeroUsize,
    /// Number of workers.
    num_threads: NonZeroUsize,
}

impl PartitionFactory {
    /// Creates a factory splitting `num_elements` items among `num_threads`
    /// workers.
    ///
    /// Fails if either count is zero.
    pub fn new(num_elements: usize, num_threads: usize) -> Result<Self, Error> {
        let num_elements = NonZeroUsize::new(num_elements)
            .ok_or_else(|| Error::invalid("num_elements", "must be positive"))?;
        let num_threads = NonZeroUsize::new(num_threads)
            .ok_or_else(|| Error::invalid("num_threads", "must be positive"))?;
        Ok(Self {
            num_elements,
            num_threads,
        })
    }

    /// Total number of elements covered by the ranges.
    pub fn num_elements(&self) -> usize {
        self.num_elements.get()
    }

    /// Number of ranges handed out.
    pub fn num_threads(&self) -> usize {
        self.num_threads.get()
    }

    /// Returns the range for the given worker.
    ///
    /// # Panics
    ///
    /// Panics if `thread_id` isn't below [`num_threads()`](Self::num_threads).
    pub fn range(&self, thread_id: usize) -> Range<usize> {
        assert!(
            thread_id < self.num_threads(),
            "thread id {thread_id} out of range for {} threads",
            self.num_threads
        );
        self.boundary(thread_id)..self.boundary(thread_id + 1)
    }

    /// Returns the ranges of all the workers, in order.
    pub fn ranges(&self) -> impl ExactSizeIterator<Item = Range<usize>> + '_ {
        (0..self.num_threads()).map(|id| self.range(id))
    }

    /// Splits `slice` into one mutable sub-slice per worker, following the
    /// ranges returned by [`range()`](Self::range).
    ///
    /// # Panics
    ///
    /// Panics if the slice length doesn't match
    /// [`num_elements()`](Self::num_elements).
    pub fn split_mut<'a, T>(&self, slice: &'a mut [T]) -> Vec<&'a mut [T]> {
        assert_eq!(
            slice.len(),
            self.num_elements(),
            "cannot split a slice of {} elements into partitions of {} elements",
            slice.len(),
            self.num_elements
        );
        let mut rest = slice;
        let mut parts = Vec::with_capacity(self.num_threads());
        for range in self.ranges() {
            let (part, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            parts.push(part);
            rest = tail;
        }
        debug_assert!(rest.is_empty());
        parts
    }

    /// Lower bound of the range of worker `thread_id`, which is also the
    /// upper bound of worker `thread_id - 1`.
    fn boundary(&self, thread_id: usize) -> usize {
        // The intermediate product can exceed `usize` for large inputs, but the
        // quotient never exceeds `num_elements`.
        let bound = (thread_id as u128 * self.num_elements.get() as u128)
            / self.num_threads.get() as u128;
        bound as usize
    }
}
