//! Integration tests for module exports.
//!
//! Verify that public modules and types are exported and usable via
//! absolute paths, the way the kernel adapter consumes them.

use sphericart_core::calculator::{ParallelPolicy, SphericalHarmonics};
use sphericart_core::traits::{HarmonicsCalculator, KernelFloat};
use sphericart_core::types::{BufferKind, ComputeMode, HarmonicsError, OutputLayout, Precision};

/// Generic code over the calculator seam compiles and runs for both precisions.
#[test]
fn test_calculator_seam_is_generic() {
    fn run<T: KernelFloat, C: HarmonicsCalculator<T>>(xyz: &[T]) -> Vec<T> {
        let layout = OutputLayout::new(2, xyz.len() / 3);
        let calc = C::new(layout.l_max(), true);
        let mut sph = vec![T::zero(); layout.values_len()];
        calc.compute_array(xyz, &mut sph).unwrap();
        sph
    }

    let sph64 = run::<f64, SphericalHarmonics<f64>>(&[0.0, 0.0, 1.0]);
    let sph32 = run::<f32, SphericalHarmonics<f32>>(&[0.0, 0.0, 1.0]);
    assert_eq!(sph64.len(), 9);
    assert_eq!(sph32.len(), 9);
    assert!((sph64[2] - sph32[2] as f64).abs() < 1e-6);
}

/// Crate-root re-exports point at the same items as the module paths.
#[test]
fn test_root_reexports() {
    let calc: sphericart_core::SphericalHarmonics<f64> =
        SphericalHarmonics::new(1, false).with_parallel_policy(ParallelPolicy::sequential());
    assert_eq!(calc.parallel_policy(), ParallelPolicy::sequential());

    let err: sphericart_core::HarmonicsError = HarmonicsError::RaggedCoordinates(2);
    assert!(err.to_string().contains("multiple of 3"));

    assert_eq!(<f32 as KernelFloat>::PRECISION, Precision::F32);
    assert_eq!(ComputeMode::Gradients.outputs()[1], BufferKind::Gradients);
}
