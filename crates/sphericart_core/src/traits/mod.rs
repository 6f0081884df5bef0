//! Core traits for kernel scalars and harmonics calculators.
//!
//! This module defines:
//! - [`KernelFloat`]: the element types a kernel can be instantiated with
//! - [`HarmonicsCalculator`]: the calculator contract consumed by the kernel adapter
//!
//! Both traits are used through static dispatch only; kernels are
//! monomorphised per `(precision, calculator)` pair.

use num_traits::Float;

use crate::types::{HarmonicsError, Precision};

/// Floating-point element type of a kernel.
///
/// Implemented for `f32` and `f64` only.
///
/// # Examples
/// ```
/// use sphericart_core::traits::KernelFloat;
/// use sphericart_core::types::Precision;
///
/// fn precision_of<T: KernelFloat>() -> Precision {
///     T::PRECISION
/// }
///
/// assert_eq!(precision_of::<f32>(), Precision::F32);
/// assert_eq!(<f64 as KernelFloat>::from_f64(0.5), 0.5);
/// ```
pub trait KernelFloat: Float + Send + Sync + std::fmt::Debug + Default + 'static {
    /// Precision tag of this type.
    const PRECISION: Precision;

    /// Converts an `f64` constant into this type (rounding for `f32`).
    fn from_f64(value: f64) -> Self;

    /// Converts a small integer into this type.
    #[inline]
    fn from_usize(value: usize) -> Self {
        Self::from_f64(value as f64)
    }
}

impl KernelFloat for f32 {
    const PRECISION: Precision = Precision::F32;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl KernelFloat for f64 {
    const PRECISION: Precision = Precision::F64;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Calculator contract for real spherical harmonics.
///
/// A calculator is built from `(l_max, normalized)` and evaluates batches of
/// Cartesian points laid out as `[n_samples, 3]`. Output slices must have
/// exactly the lengths given by [`OutputLayout`](crate::types::OutputLayout)
/// for `(l_max, n_samples)`; implementations return
/// [`HarmonicsError::LengthMismatch`] otherwise.
///
/// The kernel adapter constructs a fresh calculator for every call and drops
/// it on return.
pub trait HarmonicsCalculator<T: KernelFloat>: Sized {
    /// Creates a calculator for degrees `0..=l_max`.
    fn new(l_max: usize, normalized: bool) -> Self;

    /// Writes harmonic values into `sph`.
    fn compute_array(&self, xyz: &[T], sph: &mut [T]) -> Result<(), HarmonicsError>;

    /// Writes values into `sph` and Cartesian gradients into `dsph`.
    fn compute_array_with_gradients(
        &self,
        xyz: &[T],
        sph: &mut [T],
        dsph: &mut [T],
    ) -> Result<(), HarmonicsError>;

    /// Writes values, gradients and second derivatives.
    fn compute_array_with_hessians(
        &self,
        xyz: &[T],
        sph: &mut [T],
        dsph: &mut [T],
        ddsph: &mut [T],
    ) -> Result<(), HarmonicsError>;
}
