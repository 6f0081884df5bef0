//! Safe execution of one call against any calculator.

use sphericart_core::traits::{HarmonicsCalculator, KernelFloat};
use sphericart_core::types::BufferKind;

use crate::descriptor::CallDescriptor;
use crate::error::KernelError;
use crate::outputs::OutputBuffers;

/// Runs one call: builds a calculator from the descriptor and fills `outputs`.
///
/// The calculator lives for this call only. The variant of `outputs`
/// selects the computation. An empty batch returns before a calculator is
/// built, whatever the degree.
///
/// # Errors
///
/// Returns [`KernelError::Harmonics`] if the coordinates or any output length
/// differs from the layout derived from `(l_max, n_samples)`; nothing is
/// written in that case.
///
/// # Examples
///
/// ```rust
/// use sphericart_core::SphericalHarmonics;
/// use sphericart_kernel::{execute, CallDescriptor, OutputBuffers};
///
/// let xyz = [0.0f64, 0.0, 2.0];
/// let call = CallDescriptor::new(&xyz, 1, true).unwrap();
/// let mut sph = vec![0.0; call.layout().values_len()];
///
/// let outputs = OutputBuffers::Values { sph: &mut sph };
/// execute::<f64, SphericalHarmonics<f64>>(&call, outputs).unwrap();
/// assert!((sph[0] - 0.28209479177387814).abs() < 1e-12);
/// ```
pub fn execute<T, C>(
    call: &CallDescriptor<'_, T>,
    outputs: OutputBuffers<'_, T>,
) -> Result<(), KernelError>
where
    T: KernelFloat,
    C: HarmonicsCalculator<T>,
{
    let layout = call.layout();
    layout.check(BufferKind::Coordinates, call.xyz.len())?;
    outputs.check(&layout)?;
    if layout.n_samples() == 0 {
        return Ok(());
    }

    let calculator = C::new(call.l_max, call.normalized);
    match outputs {
        OutputBuffers::Values { sph } => calculator.compute_array(call.xyz, sph)?,
        OutputBuffers::Gradients { sph, dsph } => {
            calculator.compute_array_with_gradients(call.xyz, sph, dsph)?
        }
        OutputBuffers::Hessians { sph, dsph, ddsph } => {
            calculator.compute_array_with_hessians(call.xyz, sph, dsph, ddsph)?
        }
    }
    Ok(())
}
