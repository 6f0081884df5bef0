//! Checks what the entry points hand to a calculator.
//!
//! A recording calculator replaces the real one, so these tests observe the
//! arguments and buffer lengths forwarded from the raw calling convention.

use std::cell::RefCell;
use std::ffi::c_void;

use sphericart_core::traits::{HarmonicsCalculator, KernelFloat};
use sphericart_core::types::{ComputeMode, HarmonicsError};
use sphericart_kernel::{try_custom_call, KernelError};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Recorded {
    l_max: usize,
    normalized: bool,
    lengths: Vec<usize>,
}

thread_local! {
    static CALLS: RefCell<Vec<Recorded>> = const { RefCell::new(Vec::new()) };
}

fn take_calls() -> Vec<Recorded> {
    CALLS.with(|calls| calls.borrow_mut().drain(..).collect())
}

/// Writes the constant `1` everywhere and records what it was given.
struct RecordingCalculator {
    l_max: usize,
    normalized: bool,
}

impl RecordingCalculator {
    fn record<T: KernelFloat>(&self, buffers: &mut [&mut [T]], xyz_len: usize) {
        let mut lengths = vec![xyz_len];
        for buffer in buffers.iter_mut() {
            lengths.push(buffer.len());
            buffer.fill(T::one());
        }
        CALLS.with(|calls| {
            calls.borrow_mut().push(Recorded {
                l_max: self.l_max,
                normalized: self.normalized,
                lengths,
            })
        });
    }
}

impl<T: KernelFloat> HarmonicsCalculator<T> for RecordingCalculator {
    fn new(l_max: usize, normalized: bool) -> Self {
        Self { l_max, normalized }
    }

    fn compute_array(&self, xyz: &[T], sph: &mut [T]) -> Result<(), HarmonicsError> {
        self.record(&mut [sph], xyz.len());
        Ok(())
    }

    fn compute_array_with_gradients(
        &self,
        xyz: &[T],
        sph: &mut [T],
        dsph: &mut [T],
    ) -> Result<(), HarmonicsError> {
        self.record(&mut [sph, dsph], xyz.len());
        Ok(())
    }

    fn compute_array_with_hessians(
        &self,
        xyz: &[T],
        sph: &mut [T],
        dsph: &mut [T],
        ddsph: &mut [T],
    ) -> Result<(), HarmonicsError> {
        self.record(&mut [sph, dsph, ddsph], xyz.len());
        Ok(())
    }
}

fn inputs<T>(xyz: &[T], l_max: &i32, normalized: &u8, n_samples: &i32) -> [*const c_void; 4] {
    [
        xyz.as_ptr().cast(),
        (l_max as *const i32).cast(),
        (normalized as *const u8).cast(),
        (n_samples as *const i32).cast(),
    ]
}

/// Runs the recording calculator behind the raw calling convention.
unsafe fn forward<T: KernelFloat>(
    mode: ComputeMode,
    out: *mut c_void,
    slots: &[*const c_void; 4],
) -> Result<(), KernelError> {
    try_custom_call::<T, RecordingCalculator>(mode, out, slots.as_ptr())
}

#[test]
fn test_values_call_forwards_sizes() {
    let xyz = [0.5f32; 9];
    let mut sph = vec![0.0f32; 16 * 3];
    let slots = inputs(&xyz, &3, &1, &3);

    let out = sph.as_mut_ptr().cast();
    let result = unsafe { forward::<f32>(ComputeMode::Values, out, &slots) };
    result.unwrap();

    assert_eq!(
        take_calls(),
        vec![Recorded {
            l_max: 3,
            normalized: true,
            lengths: vec![9, 48],
        }]
    );
    assert!(sph.iter().all(|&v| v == 1.0));
}

#[test]
fn test_gradient_call_forwards_output_list() {
    let xyz = [0.5f64; 6];
    let mut sph = vec![0.0f64; 9 * 2];
    let mut dsph = vec![0.0f64; 9 * 2 * 3];
    let mut list: [*mut c_void; 2] = [sph.as_mut_ptr().cast(), dsph.as_mut_ptr().cast()];
    let slots = inputs(&xyz, &2, &0, &2);

    let out = list.as_mut_ptr().cast();
    let result = unsafe { forward::<f64>(ComputeMode::Gradients, out, &slots) };
    result.unwrap();

    assert_eq!(
        take_calls(),
        vec![Recorded {
            l_max: 2,
            normalized: false,
            lengths: vec![6, 18, 54],
        }]
    );
    assert!(dsph.iter().all(|&v| v == 1.0));
}

#[test]
fn test_hessian_call_forwards_output_list() {
    let xyz = [0.5f64; 3];
    let mut sph = vec![0.0f64; 4];
    let mut dsph = vec![0.0f64; 12];
    let mut ddsph = vec![0.0f64; 36];
    let mut list: [*mut c_void; 3] = [
        sph.as_mut_ptr().cast(),
        dsph.as_mut_ptr().cast(),
        ddsph.as_mut_ptr().cast(),
    ];
    let slots = inputs(&xyz, &1, &255, &1);

    let out = list.as_mut_ptr().cast();
    let result = unsafe { forward::<f64>(ComputeMode::Hessians, out, &slots) };
    result.unwrap();

    assert_eq!(
        take_calls(),
        vec![Recorded {
            l_max: 1,
            normalized: true,
            lengths: vec![3, 4, 12, 36],
        }]
    );
    assert!(ddsph.iter().all(|&v| v == 1.0));
}

#[test]
fn test_calculator_is_built_per_call() {
    let xyz = [0.5f32; 3];
    let mut sph = vec![0.0f32; 25];
    for l_max in [0i32, 4] {
        let slots = inputs(&xyz, &l_max, &0, &1);
        let out = sph.as_mut_ptr().cast();
        let result = unsafe { forward::<f32>(ComputeMode::Values, out, &slots) };
        result.unwrap();
    }

    let degrees: Vec<usize> = take_calls().into_iter().map(|call| call.l_max).collect();
    assert_eq!(degrees, vec![0, 4]);
}

#[test]
fn test_negative_arguments_never_reach_calculator() {
    let xyz = [0.5f64; 3];
    let mut sph = vec![0.0f64; 4];
    let slots = inputs(&xyz, &-1, &0, &1);

    let out = sph.as_mut_ptr().cast();
    let result = unsafe { forward::<f64>(ComputeMode::Values, out, &slots) };

    assert!(result.is_err());
    assert!(take_calls().is_empty());
    assert!(sph.iter().all(|&v| v == 0.0));
}
