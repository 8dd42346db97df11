use std::io;

use thiserror::Error;

use crate::buffer::PixelFormat;

/// Which side of a resize a buffer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRole {
    Source,
    Destination,
}

impl std::fmt::Display for BufferRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Destination => "destination",
        })
    }
}

/// Broad classes of failure, used by callers that only care about
/// whether a retry could make sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The inputs were wrong. Nothing was written.
    InputValidation,
    /// A lock, allocation or thread could not be obtained.
    ResourceAcquisition,
    /// The filter and geometry did not yield usable weight tables.
    SamplerConstruction,
    /// At least one split failed. The destination is indeterminate.
    PartialSplit,
}

#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("pixel formats differ: source is {src:?}, destination is {dst:?}")]
    FormatMismatch { src: PixelFormat, dst: PixelFormat },

    #[error("invalid {role} buffer: {reason}")]
    InvalidGeometry {
        role: BufferRole,
        reason: &'static str,
    },

    #[error(
        "destination is {actual_width}x{actual_height} but the job was built for {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("batch has {sources} sources but {destinations} destinations")]
    BatchLengthMismatch { sources: usize, destinations: usize },

    #[error("split {index} does not exist, job has {count} splits")]
    UnknownSplit { index: usize, count: usize },

    #[error("failed to lock {0} pixels")]
    LockFailed(BufferRole),

    #[error("failed to allocate {0}")]
    Allocation(&'static str),

    #[error("failed to spawn a thread for split {index}")]
    SpawnFailed {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("cannot build {axis} sampler at coordinate {coordinate}: {reason}")]
    SamplerConstruction {
        axis: &'static str,
        coordinate: usize,
        reason: &'static str,
    },

    #[error("split {0} panicked")]
    SplitPanicked(usize),

    #[error("{failed} of {total} splits failed, first failure: {first}")]
    PartialFailure {
        failed: usize,
        total: usize,
        #[source]
        first: Box<ResizeError>,
    },
}

impl ResizeError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FormatMismatch { .. }
            | Self::InvalidGeometry { .. }
            | Self::DimensionMismatch { .. }
            | Self::BatchLengthMismatch { .. }
            | Self::UnknownSplit { .. } => ErrorKind::InputValidation,
            Self::LockFailed(_) | Self::Allocation(_) | Self::SpawnFailed { .. } => {
                ErrorKind::ResourceAcquisition
            }
            Self::SamplerConstruction { .. } => ErrorKind::SamplerConstruction,
            Self::SplitPanicked(_) | Self::PartialFailure { .. } => ErrorKind::PartialSplit,
        }
    }
}
