//! Buffer length arithmetic for one calculation.
//!
//! Every buffer size is a pure function of `(l_max, n_samples)`:
//!
//! ```text
//! n_harmonics    = (l_max + 1)²
//! coordinates    = 3 · n_samples
//! values         = n_harmonics · n_samples
//! gradients      = 3 · values
//! hessians       = 9 · values
//! ```
//!
//! Within each buffer the sample index is the slowest axis, the harmonic
//! index `l² + l + m` the fastest.

use super::error::{BufferKind, HarmonicsError};
use super::mode::ComputeMode;

/// Derived lengths for a calculation with `l_max` and `n_samples`.
///
/// # Examples
/// ```
/// use sphericart_core::types::OutputLayout;
///
/// let layout = OutputLayout::new(3, 10);
/// assert_eq!(layout.n_harmonics(), 16);
/// assert_eq!(layout.values_len(), 160);
/// assert_eq!(layout.gradients_len(), 480);
/// assert_eq!(layout.hessians_len(), 1440);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputLayout {
    l_max: usize,
    n_samples: usize,
}

impl OutputLayout {
    /// Creates a layout without overflow checks.
    ///
    /// Use [`OutputLayout::try_new`] for sizes coming from untrusted input.
    #[inline]
    pub const fn new(l_max: usize, n_samples: usize) -> Self {
        Self { l_max, n_samples }
    }

    /// Creates a layout, failing if the largest derived length overflows.
    pub fn try_new(l_max: usize, n_samples: usize) -> Result<Self, HarmonicsError> {
        let overflow = HarmonicsError::LayoutOverflow { l_max, n_samples };
        l_max
            .checked_add(1)
            .and_then(|d| d.checked_mul(d))
            .and_then(|n| n.checked_mul(n_samples))
            .and_then(|n| n.checked_mul(9))
            .and(n_samples.checked_mul(3))
            .ok_or(overflow)?;
        Ok(Self { l_max, n_samples })
    }

    /// Maximum spherical-harmonic degree.
    #[inline]
    pub fn l_max(&self) -> usize {
        self.l_max
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Harmonics per sample, `(l_max + 1)²`.
    #[inline]
    pub fn n_harmonics(&self) -> usize {
        (self.l_max + 1) * (self.l_max + 1)
    }

    /// Length of the coordinate buffer.
    #[inline]
    pub fn coordinates_len(&self) -> usize {
        self.n_samples * 3
    }

    /// Length of the values buffer.
    #[inline]
    pub fn values_len(&self) -> usize {
        self.n_harmonics() * self.n_samples
    }

    /// Length of the gradients buffer.
    #[inline]
    pub fn gradients_len(&self) -> usize {
        self.values_len() * 3
    }

    /// Length of the second-derivatives buffer.
    #[inline]
    pub fn hessians_len(&self) -> usize {
        self.values_len() * 9
    }

    /// Length of `buffer` under this layout.
    pub fn len_of(&self, buffer: BufferKind) -> usize {
        match buffer {
            BufferKind::Coordinates => self.coordinates_len(),
            BufferKind::Values => self.values_len(),
            BufferKind::Gradients => self.gradients_len(),
            BufferKind::Hessians => self.hessians_len(),
        }
    }

    /// Total number of output elements written in `mode`.
    pub fn output_elements(&self, mode: ComputeMode) -> usize {
        mode.outputs().iter().map(|&b| self.len_of(b)).sum()
    }

    /// Checks that `actual` is the expected length of `buffer`.
    #[inline]
    pub fn check(&self, buffer: BufferKind, actual: usize) -> Result<(), HarmonicsError> {
        let expected = self.len_of(buffer);
        if expected == actual {
            Ok(())
        } else {
            Err(HarmonicsError::LengthMismatch {
                buffer,
                expected,
                actual,
            })
        }
    }

    /// Harmonic index of degree `l` and order `m` (`-l <= m <= l`).
    #[inline]
    pub fn harmonic_index(l: usize, m: isize) -> usize {
        debug_assert!(m.unsigned_abs() <= l);
        (l * l + l).wrapping_add_signed(m)
    }

    /// Position of `values[sample, lm]`.
    #[inline]
    pub fn value_index(&self, sample: usize, lm: usize) -> usize {
        sample * self.n_harmonics() + lm
    }

    /// Position of `gradients[sample, axis, lm]`.
    #[inline]
    pub fn gradient_index(&self, sample: usize, axis: usize, lm: usize) -> usize {
        (sample * 3 + axis) * self.n_harmonics() + lm
    }

    /// Position of `hessians[sample, row, col, lm]`.
    #[inline]
    pub fn hessian_index(&self, sample: usize, row: usize, col: usize, lm: usize) -> usize {
        ((sample * 3 + row) * 3 + col) * self.n_harmonics() + lm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_degree_zero_single_sample() {
        let layout = OutputLayout::new(0, 1);
        assert_eq!(layout.values_len(), 1);
        assert_eq!(layout.gradients_len(), 3);
        assert_eq!(layout.hessians_len(), 9);
    }

    #[test]
    fn test_zero_samples_gives_empty_buffers() {
        let layout = OutputLayout::new(5, 0);
        for buffer in [
            BufferKind::Coordinates,
            BufferKind::Values,
            BufferKind::Gradients,
            BufferKind::Hessians,
        ] {
            assert_eq!(layout.len_of(buffer), 0);
        }
    }

    #[test]
    fn test_harmonic_index_ordering() {
        assert_eq!(OutputLayout::harmonic_index(0, 0), 0);
        assert_eq!(OutputLayout::harmonic_index(1, -1), 1);
        assert_eq!(OutputLayout::harmonic_index(1, 0), 2);
        assert_eq!(OutputLayout::harmonic_index(1, 1), 3);
        assert_eq!(OutputLayout::harmonic_index(3, 3), 15);
    }

    #[test]
    fn test_last_indices_fit_buffers() {
        let layout = OutputLayout::new(2, 4);
        let last = layout.n_harmonics() - 1;
        assert_eq!(layout.value_index(3, last), layout.values_len() - 1);
        assert_eq!(
            layout.gradient_index(3, 2, last),
            layout.gradients_len() - 1
        );
        assert_eq!(
            layout.hessian_index(3, 2, 2, last),
            layout.hessians_len() - 1
        );
    }

    #[test]
    fn test_check_reports_mismatch() {
        let layout = OutputLayout::new(1, 2);
        assert!(layout.check(BufferKind::Values, 8).is_ok());
        assert_eq!(
            layout.check(BufferKind::Gradients, 8),
            Err(HarmonicsError::LengthMismatch {
                buffer: BufferKind::Gradients,
                expected: 24,
                actual: 8,
            })
        );
    }

    #[test]
    fn test_try_new_detects_overflow() {
        assert!(OutputLayout::try_new(usize::MAX, 1).is_err());
        assert!(OutputLayout::try_new(1 << 20, 1 << 30).is_err());
        assert!(OutputLayout::try_new(10, 1000).is_ok());
    }

    #[test]
    fn test_output_elements_per_mode() {
        let layout = OutputLayout::new(1, 1);
        assert_eq!(layout.output_elements(ComputeMode::Values), 4);
        assert_eq!(layout.output_elements(ComputeMode::Gradients), 16);
        assert_eq!(layout.output_elements(ComputeMode::Hessians), 52);
    }

    proptest! {
        #[test]
        fn test_derivative_lengths_are_multiples(l_max in 0usize..64, n_samples in 0usize..4096) {
            let layout = OutputLayout::new(l_max, n_samples);
            prop_assert_eq!(layout.values_len(), (l_max + 1) * (l_max + 1) * n_samples);
            prop_assert_eq!(layout.gradients_len(), 3 * layout.values_len());
            prop_assert_eq!(layout.hessians_len(), 9 * layout.values_len());
        }
    }
}
