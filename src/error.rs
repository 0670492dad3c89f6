// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors reported by a SAXPY run.

use std::collections::TryReserveError;
use thiserror::Error;

/// An error that aborts a SAXPY run.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter was rejected before anything was allocated.
    #[error("invalid configuration: `{parameter}` {reason}")]
    InvalidConfiguration {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// Allocating one of the vectors failed.
    #[error("failed to allocate {what} of {len} elements")]
    Allocation {
        /// Which buffer was being allocated.
        what: &'static str,
        /// Requested number of elements.
        len: usize,
        /// Underlying allocation error.
        #[source]
        source: TryReserveError,
    },
    /// The platform refused to create a worker thread.
    #[error("failed to spawn worker thread #{id}")]
    ThreadSpawn {
        /// Index of the worker that couldn't be spawned.
        id: usize,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// A worker thread panicked before finishing all its rounds.
    #[error("worker thread #{id} panicked")]
    WorkerPanicked {
        /// Index of the worker that panicked.
        id: usize,
    },
    /// A worker thread couldn't be pinned to its CPU although pinning was
    /// required.
    #[error("failed to pin worker thread #{id} to a CPU: {reason}")]
    CpuPinning {
        /// Index of the worker that couldn't be pinned.
        id: usize,
        /// Description of the failure.
        reason: String,
    },
}

/// Broad classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The run was rejected up front.
    InvalidConfiguration,
    /// Memory or threads couldn't be obtained from the platform.
    ResourceExhaustion,
    /// A worker failed during the parallel phase.
    WorkerFailure,
}

impl Error {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            Error::Allocation { .. } | Error::ThreadSpawn { .. } => ErrorKind::ResourceExhaustion,
            Error::WorkerPanicked { .. } | Error::CpuPinning { .. } => ErrorKind::WorkerFailure,
        }
    }
}
