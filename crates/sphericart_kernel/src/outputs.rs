//! Output buffers of one custom call.

use std::ffi::c_void;

use sphericart_core::types::{BufferKind, ComputeMode, OutputLayout};

use crate::descriptor::raw_slice_mut;
use crate::error::KernelError;

/// Mutable output slices, one variant per compute mode.
///
/// The variant fixes which computation runs, so a call can never write a
/// buffer it was not given.
#[derive(Debug)]
pub enum OutputBuffers<'a, T> {
    /// Values only.
    Values {
        /// `[n_samples, n_harmonics]`
        sph: &'a mut [T],
    },
    /// Values and gradients.
    Gradients {
        /// `[n_samples, n_harmonics]`
        sph: &'a mut [T],
        /// `[n_samples, 3, n_harmonics]`
        dsph: &'a mut [T],
    },
    /// Values, gradients and second derivatives.
    Hessians {
        /// `[n_samples, n_harmonics]`
        sph: &'a mut [T],
        /// `[n_samples, 3, n_harmonics]`
        dsph: &'a mut [T],
        /// `[n_samples, 3, 3, n_harmonics]`
        ddsph: &'a mut [T],
    },
}

impl<'a, T> OutputBuffers<'a, T> {
    /// Compute mode implied by the variant.
    pub fn mode(&self) -> ComputeMode {
        match self {
            OutputBuffers::Values { .. } => ComputeMode::Values,
            OutputBuffers::Gradients { .. } => ComputeMode::Gradients,
            OutputBuffers::Hessians { .. } => ComputeMode::Hessians,
        }
    }

    /// Checks every buffer against `layout`.
    pub fn check(&self, layout: &OutputLayout) -> Result<(), KernelError> {
        match self {
            OutputBuffers::Values { sph } => {
                layout.check(BufferKind::Values, sph.len())?;
            }
            OutputBuffers::Gradients { sph, dsph } => {
                layout.check(BufferKind::Values, sph.len())?;
                layout.check(BufferKind::Gradients, dsph.len())?;
            }
            OutputBuffers::Hessians { sph, dsph, ddsph } => {
                layout.check(BufferKind::Values, sph.len())?;
                layout.check(BufferKind::Gradients, dsph.len())?;
                layout.check(BufferKind::Hessians, ddsph.len())?;
            }
        }
        Ok(())
    }

    /// Reinterprets the raw `out` argument of a custom call.
    ///
    /// For [`ComputeMode::Values`] `out` is the values buffer itself; for the
    /// other modes it points to a list of `mode.n_outputs()` buffer pointers
    /// ordered values, gradients, hessians.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::NullPointer`] for a null list or a null,
    /// non-empty buffer.
    ///
    /// # Safety
    ///
    /// Every non-null pointer must be aligned and valid for writes of the
    /// lengths `layout` derives, with no other live reference for `'a`.
    pub unsafe fn from_raw(
        mode: ComputeMode,
        out: *mut c_void,
        layout: &OutputLayout,
    ) -> Result<Self, KernelError> {
        if mode == ComputeMode::Values {
            let sph = raw_slice_mut(out, layout.values_len(), "values output")?;
            return Ok(OutputBuffers::Values { sph });
        }

        if out.is_null() {
            return Err(KernelError::NullPointer("output list"));
        }
        let list = out.cast::<*mut c_void>().cast_const();
        let list = std::slice::from_raw_parts(list, mode.n_outputs());
        let sph = raw_slice_mut(list[0], layout.values_len(), "values output")?;
        let dsph = raw_slice_mut(list[1], layout.gradients_len(), "gradients output")?;
        if mode == ComputeMode::Gradients {
            return Ok(OutputBuffers::Gradients { sph, dsph });
        }
        let ddsph = raw_slice_mut(list[2], layout.hessians_len(), "hessians output")?;
        Ok(OutputBuffers::Hessians { sph, dsph, ddsph })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphericart_core::types::HarmonicsError;

    #[test]
    fn test_mode_follows_variant() {
        let mut a = [0.0f64; 4];
        let mut b = [0.0f64; 12];
        let outputs = OutputBuffers::Values { sph: &mut a };
        assert_eq!(outputs.mode(), ComputeMode::Values);
        let outputs = OutputBuffers::Gradients {
            sph: &mut a,
            dsph: &mut b,
        };
        assert_eq!(outputs.mode(), ComputeMode::Gradients);
    }

    #[test]
    fn test_check_names_the_wrong_buffer() {
        let layout = OutputLayout::new(1, 1);
        let mut sph = [0.0f32; 4];
        let mut dsph = [0.0f32; 11];
        let outputs = OutputBuffers::Gradients {
            sph: &mut sph,
            dsph: &mut dsph,
        };
        assert_eq!(
            outputs.check(&layout),
            Err(KernelError::Harmonics(HarmonicsError::LengthMismatch {
                buffer: BufferKind::Gradients,
                expected: 12,
                actual: 11,
            }))
        );
    }

    #[test]
    fn test_from_raw_multi_output_list() {
        let layout = OutputLayout::new(1, 2);
        let mut sph = vec![0.0f64; layout.values_len()];
        let mut dsph = vec![0.0f64; layout.gradients_len()];
        let mut ddsph = vec![0.0f64; layout.hessians_len()];
        let mut list: [*mut c_void; 3] = [
            sph.as_mut_ptr().cast(),
            dsph.as_mut_ptr().cast(),
            ddsph.as_mut_ptr().cast(),
        ];

        let out = list.as_mut_ptr().cast();
        let result = unsafe { OutputBuffers::<f64>::from_raw(ComputeMode::Hessians, out, &layout) };
        let outputs = result.unwrap();
        assert!(outputs.check(&layout).is_ok());
        if let OutputBuffers::Hessians { ddsph, .. } = outputs {
            ddsph[71] = 1.0;
        }
        assert_eq!(ddsph[71], 1.0);
    }

    #[test]
    fn test_from_raw_rejects_null_list() {
        let layout = OutputLayout::new(0, 1);
        let (mode, out) = (ComputeMode::Gradients, std::ptr::null_mut());
        let result = unsafe { OutputBuffers::<f32>::from_raw(mode, out, &layout) };
        assert_eq!(result.unwrap_err(), KernelError::NullPointer("output list"));
    }
}
