//! Error types for structured error handling.
//!
//! This module provides:
//! - `HarmonicsError`: Errors from calculator buffer validation
//! - `ParseError`: Errors from parsing precision / mode names
//! - `BufferKind`: Names the buffer an error refers to

use std::fmt;
use thiserror::Error;

/// Identifies one of the buffers taking part in a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Flat `[n_samples, 3]` input coordinates.
    Coordinates,
    /// Harmonic values, `[n_samples, n_harmonics]`.
    Values,
    /// Cartesian gradients, `[n_samples, 3, n_harmonics]`.
    Gradients,
    /// Cartesian second derivatives, `[n_samples, 3, 3, n_harmonics]`.
    Hessians,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Coordinates => write!(f, "coordinates"),
            BufferKind::Values => write!(f, "values"),
            BufferKind::Gradients => write!(f, "gradients"),
            BufferKind::Hessians => write!(f, "hessians"),
        }
    }
}

/// Calculator errors.
///
/// # Examples
/// ```
/// use sphericart_core::types::{BufferKind, HarmonicsError};
///
/// let err = HarmonicsError::LengthMismatch {
///     buffer: BufferKind::Values,
///     expected: 9,
///     actual: 4,
/// };
/// assert_eq!(format!("{}", err), "values buffer has length 4, expected 9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarmonicsError {
    /// The coordinate buffer does not hold whole `(x, y, z)` triples.
    #[error("coordinate buffer length {0} is not a multiple of 3")]
    RaggedCoordinates(usize),

    /// A buffer length disagrees with the derived layout.
    #[error("{buffer} buffer has length {actual}, expected {expected}")]
    LengthMismatch {
        /// Buffer that failed the check
        buffer: BufferKind,
        /// Length implied by `(l_max, n_samples)`
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// The derived lengths do not fit in `usize`.
    #[error("output layout overflows for l_max={l_max}, n_samples={n_samples}")]
    LayoutOverflow {
        /// Maximum degree
        l_max: usize,
        /// Number of samples
        n_samples: usize,
    },
}

/// Failure to parse a textual name into one of the tag enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseError {
    /// What was being parsed ("precision", "compute mode", ...)
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl ParseError {
    /// Creates a parse error for `kind`.
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
