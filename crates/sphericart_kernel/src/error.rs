//! Kernel adapter errors.

use sphericart_core::types::{ComputeMode, HarmonicsError, Precision};
use thiserror::Error;

/// Errors raised while decoding or dispatching a custom call.
///
/// None of these cross the C ABI: the raw entry points log them and return.
///
/// # Examples
/// ```
/// use sphericart_kernel::KernelError;
///
/// let err = KernelError::NegativeDegree(-1);
/// assert_eq!(err.to_string(), "maximum degree must be non-negative, got -1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// `l_max` input was negative.
    #[error("maximum degree must be non-negative, got {0}")]
    NegativeDegree(i32),

    /// `n_samples` input was negative.
    #[error("sample count must be non-negative, got {0}")]
    NegativeSampleCount(i32),

    /// A required pointer was null.
    #[error("null pointer passed for {0}")]
    NullPointer(&'static str),

    /// Output buffers do not match the requested compute mode.
    #[error("kernel computes {expected} but {actual} outputs were supplied")]
    OutputModeMismatch {
        /// Mode of the kernel
        expected: ComputeMode,
        /// Mode implied by the supplied buffers
        actual: ComputeMode,
    },

    /// Element type does not match the kernel precision.
    #[error("kernel expects {expected} buffers, got {actual}")]
    PrecisionMismatch {
        /// Precision of the kernel
        expected: Precision,
        /// Precision of the supplied buffers
        actual: Precision,
    },

    /// A size does not fit in the `int32` slot of the calling convention.
    #[error("{0} does not fit in a 32-bit custom-call argument")]
    ArgumentOverflow(&'static str),

    /// No registered kernel has this name.
    #[error("unknown custom-call target: {0}")]
    UnknownTarget(String),

    /// The calculator rejected the buffers.
    #[error(transparent)]
    Harmonics(#[from] HarmonicsError),
}
