// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Input vectors of a SAXPY run.

use super::util::try_with_capacity;
use crate::error::Error;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// The operands of `Y = a * X + Y`.
///
/// Both vectors are allocated once and have the same non-zero length.
#[derive(Clone, Debug, PartialEq)]
pub struct SaxpyData {
    x: Vec<f64>,
    y: Vec<f64>,
    a: f64,
}

impl SaxpyData {
    /// Creates vectors of `len` elements filled with uniform values in
    /// `[0, 1)`, and a scalar in the same interval.
    ///
    /// The values only depend on `len` and `seed`. Elements of X and Y are
    /// drawn alternately, and the scalar is drawn last.
    pub fn random(len: usize, seed: u64) -> Result<Self, Error> {
        if len == 0 {
            return Err(Error::invalid("len", "must be positive"));
        }
        let mut x = try_with_capacity("vector X", len)?;
        let mut y = try_with_capacity("vector Y", len)?;

        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        for _ in 0..len {
            x.push(rng.random::<f64>());
            y.push(rng.random::<f64>());
        }
        let a = rng.random::<f64>();

        Ok(Self { x, y, a })
    }

    /// Wraps existing vectors.
    ///
    /// Fails if the vectors are empty or have different lengths.
    pub fn new(x: Vec<f64>, y: Vec<f64>, a: f64) -> Result<Self, Error> {
        if x.is_empty() {
            return Err(Error::invalid("len", "must be positive"));
        }
        if x.len() != y.len() {
            return Err(Error::invalid(
                "y",
                format!("has {} elements but X has {}", y.len(), x.len()),
            ));
        }
        Ok(Self { x, y, a })
    }

    /// Number of elements in each vector.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// The X vector.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// The Y vector.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// The scalar multiplier.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Returns `(x, y, a)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, f64) {
        (self.x, self.y, self.a)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_random_is_deterministic() {
        let first = SaxpyData::random(1000, 42).unwrap();
        let second = SaxpyData::random(1000, 42).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_depends_on_seed() {
        let first = SaxpyData::random(100, 1).unwrap();
        let second = SaxpyData::random(100, 2).unwrap();
        assert_ne!(first.x(), second.x());
        assert_ne!(first.y(), second.y());
    }

    #[test]
    fn test_random_prefix_is_stable() {
        // Growing the vectors doesn't change the first values, as X and Y are drawn
        // alternately from the same stream.
        let short = SaxpyData::random(10, 7).unwrap();
        let long = SaxpyData::random(20, 7).unwrap();
        assert_eq!(short.x(), &long.x()[..10]);
        assert_eq!(short.y(), &long.y()[..10]);
    }

    #[test]
    fn test_random_values_in_unit_interval() {
        let data = SaxpyData::random(10_000, 3).unwrap();
        assert_eq!(data.len(), 10_000);
        assert!(data
            .x()
            .iter()
            .chain(data.y())
            .all(|v| (0.0..1.0).contains(v)));
        assert!((0.0..1.0).contains(&data.a()));
    }

    #[test]
    fn test_random_rejects_empty() {
        let error = SaxpyData::random(0, 1).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
    }

    #[test]
    fn test_new() {
        let data = SaxpyData::new(vec![1.0, 2.0], vec![3.0, 4.0], 0.5).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.into_parts(), (vec![1.0, 2.0], vec![3.0, 4.0], 0.5));
    }

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        let error = SaxpyData::new(vec![1.0, 2.0], vec![3.0], 0.5).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
        assert_eq!(
            error.to_string(),
            "invalid configuration: `y` has 1 elements but X has 2"
        );
    }

    #[test]
    fn test_new_rejects_empty() {
        let error = SaxpyData::new(vec![], vec![], 0.5).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidConfiguration);
    }
}
