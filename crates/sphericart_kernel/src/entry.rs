//! `extern "C"` entry points with the XLA CPU custom-call signature.
//!
//! Each entry point is a monomorphisation of [`custom_call`] for one
//! `(mode, precision)` pair backed by [`SphericalHarmonics`].

use std::ffi::c_void;

use sphericart_core::calculator::SphericalHarmonics;
use sphericart_core::traits::{HarmonicsCalculator, KernelFloat};
use sphericart_core::types::ComputeMode;

use crate::descriptor::CallDescriptor;
use crate::error::KernelError;
use crate::execute::execute;
use crate::outputs::OutputBuffers;

/// XLA CPU custom-call signature: `void (void* out, const void** in)`.
pub type CustomCallFn = unsafe extern "C" fn(out: *mut c_void, inputs: *const *const c_void);

/// Decodes the raw arguments and runs one call, returning any error.
///
/// # Safety
///
/// `inputs` and `out` must follow the calling convention of the crate root
/// for `mode` and `T`; see [`CallDescriptor::from_raw`] and
/// [`OutputBuffers::from_raw`].
pub unsafe fn try_custom_call<T, C>(
    mode: ComputeMode,
    out: *mut c_void,
    inputs: *const *const c_void,
) -> Result<(), KernelError>
where
    T: KernelFloat,
    C: HarmonicsCalculator<T>,
{
    let call = CallDescriptor::<T>::from_raw(inputs)?;
    let outputs = OutputBuffers::from_raw(mode, out, &call.layout())?;
    tracing::trace!(
        mode = %mode,
        precision = %T::PRECISION,
        l_max = call.l_max,
        normalized = call.normalized,
        n_samples = call.n_samples,
        "custom call"
    );
    execute::<T, C>(&call, outputs)
}

/// Runs one call, logging instead of returning errors.
///
/// The C ABI has no status channel, so a rejected call is reported at
/// `error` level and leaves the outputs untouched.
///
/// # Safety
///
/// Same contract as [`try_custom_call`].
pub unsafe fn custom_call<T, C>(mode: ComputeMode, out: *mut c_void, inputs: *const *const c_void)
where
    T: KernelFloat,
    C: HarmonicsCalculator<T>,
{
    if let Err(err) = try_custom_call::<T, C>(mode, out, inputs) {
        tracing::error!(
            mode = %mode,
            precision = %T::PRECISION,
            error = %err,
            "rejected custom call"
        );
    }
}

/// Values only.
///
/// # Safety
///
/// `out` is the values buffer; `inputs` follows the four-slot convention.
pub unsafe extern "C" fn cpu_sph<T: KernelFloat>(out: *mut c_void, inputs: *const *const c_void) {
    custom_call::<T, SphericalHarmonics<T>>(ComputeMode::Values, out, inputs)
}

/// Values and gradients.
///
/// # Safety
///
/// `out` points to `[values, gradients]`; `inputs` follows the four-slot convention.
pub unsafe extern "C" fn cpu_sph_with_gradients<T: KernelFloat>(
    out: *mut c_void,
    inputs: *const *const c_void,
) {
    custom_call::<T, SphericalHarmonics<T>>(ComputeMode::Gradients, out, inputs)
}

/// Values, gradients and second derivatives.
///
/// # Safety
///
/// `out` points to `[values, gradients, hessians]`; `inputs` follows the
/// four-slot convention.
pub unsafe extern "C" fn cpu_sph_with_hessians<T: KernelFloat>(
    out: *mut c_void,
    inputs: *const *const c_void,
) {
    custom_call::<T, SphericalHarmonics<T>>(ComputeMode::Hessians, out, inputs)
}
