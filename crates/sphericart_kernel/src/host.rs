//! Host-side invocation of the raw entry points.
//!
//! [`invoke`] lays out arguments exactly as the XLA runtime does (four input
//! pointers, a bare output pointer or a pointer list) and calls the
//! registered `extern "C"` handler. It is used by the CLI and by tests to
//! exercise the real calling convention from safe code.

use std::ffi::c_void;

use sphericart_core::traits::KernelFloat;
use sphericart_core::types::BufferKind;

use crate::descriptor::{CallDescriptor, N_INPUTS};
use crate::error::KernelError;
use crate::outputs::OutputBuffers;
use crate::registry::KernelTarget;

/// Calls `target` through its raw handler.
///
/// All arguments are validated first, so the handler never takes its
/// logging error path.
///
/// # Errors
///
/// Returns an error if the precision or mode of `target` does not match the
/// buffers, if a buffer length is inconsistent with the descriptor, or if a
/// size does not fit the `int32` argument slots.
///
/// # Examples
///
/// ```rust
/// use sphericart_kernel::host::invoke;
/// use sphericart_kernel::{CallDescriptor, KernelTarget, OutputBuffers};
///
/// let xyz = [1.0f32, 1.0, 1.0];
/// let call = CallDescriptor::new(&xyz, 2, true).unwrap();
/// let layout = call.layout();
/// let mut sph = vec![0.0f32; layout.values_len()];
/// let mut dsph = vec![0.0f32; layout.gradients_len()];
///
/// invoke(
///     KernelTarget::DsphF32,
///     &call,
///     OutputBuffers::Gradients { sph: &mut sph, dsph: &mut dsph },
/// )
/// .unwrap();
/// assert!((sph[0] - 0.2820948).abs() < 1e-6);
/// ```
pub fn invoke<T: KernelFloat>(
    target: KernelTarget,
    call: &CallDescriptor<'_, T>,
    outputs: OutputBuffers<'_, T>,
) -> Result<(), KernelError> {
    if target.precision() != T::PRECISION {
        return Err(KernelError::PrecisionMismatch {
            expected: target.precision(),
            actual: T::PRECISION,
        });
    }
    if target.mode() != outputs.mode() {
        return Err(KernelError::OutputModeMismatch {
            expected: target.mode(),
            actual: outputs.mode(),
        });
    }

    let layout = call.layout();
    layout.check(BufferKind::Coordinates, call.xyz.len())?;
    outputs.check(&layout)?;

    let l_max = i32::try_from(call.l_max).map_err(|_| KernelError::ArgumentOverflow("l_max"))?;
    let n_samples =
        i32::try_from(call.n_samples).map_err(|_| KernelError::ArgumentOverflow("n_samples"))?;
    let normalized = call.normalized;
    let inputs: [*const c_void; N_INPUTS] = [
        call.xyz.as_ptr().cast(),
        (&l_max as *const i32).cast(),
        (&normalized as *const bool).cast(),
        (&n_samples as *const i32).cast(),
    ];

    let handler = target.handler();
    // SAFETY: every pointer below comes from a live slice or local whose
    // length was checked against the layout derived from the same scalars.
    match outputs {
        OutputBuffers::Values { sph } => unsafe {
            handler(sph.as_mut_ptr().cast(), inputs.as_ptr())
        },
        OutputBuffers::Gradients { sph, dsph } => {
            let mut list: [*mut c_void; 2] =
                [sph.as_mut_ptr().cast(), dsph.as_mut_ptr().cast()];
            unsafe { handler(list.as_mut_ptr().cast(), inputs.as_ptr()) }
        }
        OutputBuffers::Hessians { sph, dsph, ddsph } => {
            let mut list: [*mut c_void; 3] = [
                sph.as_mut_ptr().cast(),
                dsph.as_mut_ptr().cast(),
                ddsph.as_mut_ptr().cast(),
            ];
            unsafe { handler(list.as_mut_ptr().cast(), inputs.as_ptr()) }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphericart_core::types::{ComputeMode, Precision};

    #[test]
    fn test_precision_mismatch_is_rejected() {
        let xyz = [1.0f64, 0.0, 0.0];
        let call = CallDescriptor::new(&xyz, 0, false).unwrap();
        let mut sph = [0.0f64; 1];
        let outputs = OutputBuffers::Values { sph: &mut sph };
        assert_eq!(
            invoke(KernelTarget::SphF32, &call, outputs),
            Err(KernelError::PrecisionMismatch {
                expected: Precision::F32,
                actual: Precision::F64,
            })
        );
    }

    #[test]
    fn test_mode_mismatch_is_rejected() {
        let xyz = [1.0f64, 0.0, 0.0];
        let call = CallDescriptor::new(&xyz, 0, false).unwrap();
        let mut sph = [0.0f64; 1];
        let outputs = OutputBuffers::Values { sph: &mut sph };
        assert_eq!(
            invoke(KernelTarget::DdsphF64, &call, outputs),
            Err(KernelError::OutputModeMismatch {
                expected: ComputeMode::Hessians,
                actual: ComputeMode::Values,
            })
        );
    }

    #[test]
    fn test_inconsistent_descriptor_is_rejected() {
        let xyz = [1.0f64, 0.0, 0.0];
        let call = CallDescriptor {
            xyz: &xyz,
            l_max: 0,
            normalized: false,
            n_samples: 2,
        };
        let mut sph = [0.0f64; 2];
        let outputs = OutputBuffers::Values { sph: &mut sph };
        let result = invoke(KernelTarget::SphF64, &call, outputs);
        assert!(matches!(result, Err(KernelError::Harmonics(_))));
        assert_eq!(sph, [0.0, 0.0]);
    }
}
