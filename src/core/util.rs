// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Allocation helpers.

use crate::error::Error;

/// Allocates an empty vector with room for exactly `len` elements, reporting
/// allocation failures instead of aborting the process.
pub fn try_with_capacity<T>(what: &'static str, len: usize) -> Result<Vec<T>, Error> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(len)
        .map_err(|source| Error::Allocation { what, len, source })?;
    Ok(vec)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_try_with_capacity() {
        let vec = try_with_capacity::<f64>("buffer", 1000).unwrap();
        assert!(vec.is_empty());
        assert!(vec.capacity() >= 1000);
    }

    #[test]
    fn test_try_with_capacity_too_large() {
        let error = try_with_capacity::<f64>("buffer", usize::MAX).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ResourceExhaustion);
        assert_eq!(
            error.to_string(),
            format!("failed to allocate buffer of {} elements", usize::MAX)
        );
    }
}
