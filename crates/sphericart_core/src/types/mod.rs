//! Value types shared by the calculator and the kernel adapter.
//!
//! This module provides:
//! - [`Precision`]: floating-point width of a kernel (f32 / f64)
//! - [`ComputeMode`]: which outputs a kernel produces
//! - [`OutputLayout`]: derived buffer lengths and index arithmetic
//! - [`HarmonicsError`], [`ParseError`], [`BufferKind`]: error types

pub mod error;
pub mod layout;
pub mod mode;
pub mod precision;

pub use error::{BufferKind, HarmonicsError, ParseError};
pub use layout::OutputLayout;
pub use mode::ComputeMode;
pub use precision::Precision;
