// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Single-threaded versions of the computation, to check the results of a
//! parallel run.

/// Runs `max_iters` rounds of `y = y + a * x` on a single thread, and returns
/// the mean of Y after each round.
///
/// For a given input, Y ends up bit-for-bit identical to the output of a
/// parallel run, since each element goes through the same operations. The
/// means may differ in the last bits, as the per-round sums are added in a
/// different order.
///
/// # Panics
///
/// Panics if `x` and `y` have different lengths.
pub fn sequential(x: &[f64], y: &mut [f64], a: f64, max_iters: usize) -> Vec<f64> {
    assert_eq!(x.len(), y.len());
    let len = y.len() as f64;
    (0..max_iters)
        .map(|_| {
            let mut sum = 0.0;
            for (y, x) in y.iter_mut().zip(x) {
                *y += a * *x;
                sum += *y;
            }
            sum / len
        })
        .collect()
}

/// Returns the value of Y after `max_iters` rounds, computed directly as
/// `y0 + a * x * max_iters`.
///
/// This only matches the iterated computation up to floating-point rounding.
///
/// # Panics
///
/// Panics if `x` and `y0` have different lengths.
pub fn closed_form(x: &[f64], y0: &[f64], a: f64, max_iters: usize) -> Vec<f64> {
    assert_eq!(x.len(), y0.len());
    let iters = max_iters as f64;
    x.iter().zip(y0).map(|(x, y0)| y0 + a * x * iters).collect()
}

/// Returns the largest difference between two slices, relative to the
/// magnitude of the compared values (or absolute for values below 1).
///
/// # Panics
///
/// Panics if the slices have different lengths.
pub fn max_relative_error(actual: &[f64], expected: &[f64]) -> f64 {
    assert_eq!(actual.len(), expected.len());
    actual
        .iter()
        .zip(expected)
        .map(|(actual, expected)| (actual - expected).abs() / expected.abs().max(1.0))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sequential() {
        let x = [1.0, 2.0];
        let mut y = [0.0, 0.0];
        let means = sequential(&x, &mut y, 1.0, 3);
        assert_eq!(y, [3.0, 6.0]);
        assert_eq!(means, vec![1.5, 3.0, 4.5]);
    }

    #[test]
    fn test_closed_form() {
        let y = closed_form(&[1.0, 2.0], &[0.5, 0.25], 0.5, 4);
        assert_eq!(y, vec![2.5, 4.25]);
    }

    #[test]
    fn test_sequential_matches_closed_form() {
        let x = (0..100).map(|i| i as f64 / 100.0).collect::<Vec<_>>();
        let y0 = (0..100).map(|i| 1.0 - i as f64 / 100.0).collect::<Vec<_>>();
        let mut y = y0.clone();
        sequential(&x, &mut y, 0.3, 50);
        assert!(max_relative_error(&y, &closed_form(&x, &y0, 0.3, 50)) < 1e-12);
    }

    #[test]
    fn test_max_relative_error() {
        assert_eq!(max_relative_error(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
        assert_eq!(max_relative_error(&[0.5], &[0.25]), 0.25);
        assert_eq!(max_relative_error(&[110.0, 1.0], &[100.0, 1.0]), 0.1);
        assert_eq!(max_relative_error(&[], &[]), 0.0);
    }
}
