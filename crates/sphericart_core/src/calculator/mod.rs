//! Native calculator for real spherical harmonics.
//!
//! This module provides:
//! - [`SphericalHarmonics<T>`]: batch and single-sample evaluation of values,
//!   Cartesian gradients and Cartesian second derivatives
//! - [`ParallelPolicy`]: when a batch is split across the rayon pool
//!
//! # Output layout
//!
//! For `n_lm = (l_max + 1)²`:
//!
//! | Buffer | Shape | Element `[i, ..., lm]` at |
//! |--------|-------|---------------------------|
//! | `sph` | `[n, n_lm]` | `i·n_lm + lm` |
//! | `dsph` | `[n, 3, n_lm]` | `(3i + α)·n_lm + lm` |
//! | `ddsph` | `[n, 3, 3, n_lm]` | `((3i + α)·3 + β)·n_lm + lm` |

mod config;
mod jet;
mod prefactors;

pub use config::ParallelPolicy;

use rayon::prelude::*;

use crate::traits::{HarmonicsCalculator, KernelFloat};
use crate::types::{BufferKind, HarmonicsError, OutputLayout};
use jet::{SampleEvaluator, SampleOutput, Scratch};
use prefactors::Prefactors;

/// Real spherical harmonics calculator for degrees `0..=l_max`.
///
/// Holds only `(l_max, normalized)` and the recurrence constants derived from
/// them; it is cheap to build and safe to share between threads.
///
/// # Examples
///
/// ```rust
/// use sphericart_core::calculator::SphericalHarmonics;
///
/// let calculator = SphericalHarmonics::<f64>::new(1, false);
/// let mut sph = [0.0; 4];
/// calculator.compute_sample([1.0, 2.0, 3.0], &mut sph).unwrap();
///
/// // l = 1 solid harmonics are proportional to (y, z, x)
/// let c = (3.0 / (4.0 * std::f64::consts::PI)).sqrt();
/// assert!((sph[1] - 2.0 * c).abs() < 1e-12);
/// assert!((sph[2] - 3.0 * c).abs() < 1e-12);
/// assert!((sph[3] - 1.0 * c).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SphericalHarmonics<T> {
    l_max: usize,
    normalized: bool,
    prefactors: Prefactors<T>,
    parallel: ParallelPolicy,
}

impl<T: KernelFloat> SphericalHarmonics<T> {
    /// Creates a calculator for degrees `0..=l_max`.
    ///
    /// With `normalized = true` the inputs are projected on the unit sphere
    /// before evaluation; otherwise regular solid harmonics are returned.
    pub fn new(l_max: usize, normalized: bool) -> Self {
        Self {
            l_max,
            normalized,
            prefactors: Prefactors::new(l_max),
            parallel: ParallelPolicy::default(),
        }
    }

    /// Replaces the parallelisation policy.
    pub fn with_parallel_policy(mut self, policy: ParallelPolicy) -> Self {
        self.parallel = policy;
        self
    }

    /// Maximum degree.
    #[inline]
    pub fn l_max(&self) -> usize {
        self.l_max
    }

    /// Whether inputs are normalised to unit length.
    #[inline]
    pub fn normalized(&self) -> bool {
        self.normalized
    }

    /// Harmonics per sample, `(l_max + 1)²`.
    #[inline]
    pub fn n_harmonics(&self) -> usize {
        (self.l_max + 1) * (self.l_max + 1)
    }

    /// Active parallelisation policy.
    pub fn parallel_policy(&self) -> ParallelPolicy {
        self.parallel
    }

    /// Computes harmonic values for a batch of points.
    ///
    /// # Errors
    ///
    /// Returns [`HarmonicsError`] if `xyz` is not a whole number of triples or
    /// `sph` does not hold exactly `n_harmonics · n_samples` elements.
    pub fn compute_array(&self, xyz: &[T], sph: &mut [T]) -> Result<(), HarmonicsError> {
        let layout = self.layout_for(xyz)?;
        layout.check(BufferKind::Values, sph.len())?;

        let n_lm = self.n_harmonics();
        let evaluator = self.evaluator(0);
        if self.parallel.should_split(layout.n_samples()) {
            sph.par_chunks_mut(n_lm)
                .zip(xyz.par_chunks_exact(3))
                .for_each_init(
                    || Scratch::new(self.l_max),
                    |scratch, (sph, point)| {
                        evaluator.evaluate(point, scratch, SampleOutput::values(sph))
                    },
                );
        } else {
            let mut scratch = Scratch::new(self.l_max);
            for (sph, point) in sph.chunks_mut(n_lm).zip(xyz.chunks_exact(3)) {
                evaluator.evaluate(point, &mut scratch, SampleOutput::values(sph));
            }
        }
        Ok(())
    }

    /// Computes values and Cartesian gradients for a batch of points.
    ///
    /// # Errors
    ///
    /// Returns [`HarmonicsError`] on any buffer length mismatch.
    pub fn compute_array_with_gradients(
        &self,
        xyz: &[T],
        sph: &mut [T],
        dsph: &mut [T],
    ) -> Result<(), HarmonicsError> {
        let layout = self.layout_for(xyz)?;
        layout.check(BufferKind::Values, sph.len())?;
        layout.check(BufferKind::Gradients, dsph.len())?;

        let n_lm = self.n_harmonics();
        let evaluator = self.evaluator(1);
        if self.parallel.should_split(layout.n_samples()) {
            sph.par_chunks_mut(n_lm)
                .zip(dsph.par_chunks_mut(3 * n_lm))
                .zip(xyz.par_chunks_exact(3))
                .for_each_init(
                    || Scratch::new(self.l_max),
                    |scratch, ((sph, dsph), point)| {
                        evaluator.evaluate(point, scratch, SampleOutput::gradients(sph, dsph))
                    },
                );
        } else {
            let mut scratch = Scratch::new(self.l_max);
            for ((sph, dsph), point) in sph
                .chunks_mut(n_lm)
                .zip(dsph.chunks_mut(3 * n_lm))
                .zip(xyz.chunks_exact(3))
            {
                evaluator.evaluate(point, &mut scratch, SampleOutput::gradients(sph, dsph));
            }
        }
        Ok(())
    }

    /// Computes values, gradients and second derivatives for a batch of points.
    ///
    /// # Errors
    ///
    /// Returns [`HarmonicsError`] on any buffer length mismatch.
    pub fn compute_array_with_hessians(
        &self,
        xyz: &[T],
        sph: &mut [T],
        dsph: &mut [T],
        ddsph: &mut [T],
    ) -> Result<(), HarmonicsError> {
        let layout = self.layout_for(xyz)?;
        layout.check(BufferKind::Values, sph.len())?;
        layout.check(BufferKind::Gradients, dsph.len())?;
        layout.check(BufferKind::Hessians, ddsph.len())?;

        let n_lm = self.n_harmonics();
        let evaluator = self.evaluator(2);
        if self.parallel.should_split(layout.n_samples()) {
            sph.par_chunks_mut(n_lm)
                .zip(dsph.par_chunks_mut(3 * n_lm))
                .zip(ddsph.par_chunks_mut(9 * n_lm))
                .zip(xyz.par_chunks_exact(3))
                .for_each_init(
                    || Scratch::new(self.l_max),
                    |scratch, (((sph, dsph), ddsph), point)| {
                        evaluator.evaluate(point, scratch, SampleOutput { sph, dsph, ddsph })
                    },
                );
        } else {
            let mut scratch = Scratch::new(self.l_max);
            for (((sph, dsph), ddsph), point) in sph
                .chunks_mut(n_lm)
                .zip(dsph.chunks_mut(3 * n_lm))
                .zip(ddsph.chunks_mut(9 * n_lm))
                .zip(xyz.chunks_exact(3))
            {
                evaluator.evaluate(point, &mut scratch, SampleOutput { sph, dsph, ddsph });
            }
        }
        Ok(())
    }

    /// Computes harmonic values for a single point.
    pub fn compute_sample(&self, xyz: [T; 3], sph: &mut [T]) -> Result<(), HarmonicsError> {
        self.compute_array(&xyz, sph)
    }

    /// Computes values and gradients for a single point.
    pub fn compute_sample_with_gradients(
        &self,
        xyz: [T; 3],
        sph: &mut [T],
        dsph: &mut [T],
    ) -> Result<(), HarmonicsError> {
        self.compute_array_with_gradients(&xyz, sph, dsph)
    }

    /// Computes values, gradients and second derivatives for a single point.
    pub fn compute_sample_with_hessians(
        &self,
        xyz: [T; 3],
        sph: &mut [T],
        dsph: &mut [T],
        ddsph: &mut [T],
    ) -> Result<(), HarmonicsError> {
        self.compute_array_with_hessians(&xyz, sph, dsph, ddsph)
    }

    fn layout_for(&self, xyz: &[T]) -> Result<OutputLayout, HarmonicsError> {
        if xyz.len() % 3 != 0 {
            return Err(HarmonicsError::RaggedCoordinates(xyz.len()));
        }
        OutputLayout::try_new(self.l_max, xyz.len() / 3)
    }

    fn evaluator(&self, order: usize) -> SampleEvaluator<'_, T> {
        SampleEvaluator {
            l_max: self.l_max,
            normalized: self.normalized,
            order,
            prefactors: &self.prefactors,
        }
    }
}

impl<T: KernelFloat> HarmonicsCalculator<T> for SphericalHarmonics<T> {
    fn new(l_max: usize, normalized: bool) -> Self {
        SphericalHarmonics::new(l_max, normalized)
    }

    fn compute_array(&self, xyz: &[T], sph: &mut [T]) -> Result<(), HarmonicsError> {
        SphericalHarmonics::compute_array(self, xyz, sph)
    }

    fn compute_array_with_gradients(
        &self,
        xyz: &[T],
        sph: &mut [T],
        dsph: &mut [T],
    ) -> Result<(), HarmonicsError> {
        SphericalHarmonics::compute_array_with_gradients(self, xyz, sph, dsph)
    }

    fn compute_array_with_hessians(
        &self,
        xyz: &[T],
        sph: &mut [T],
        dsph: &mut [T],
        ddsph: &mut [T],
    ) -> Result<(), HarmonicsError> {
        SphericalHarmonics::compute_array_with_hessians(self, xyz, sph, dsph, ddsph)
    }
}
