//! Typed view of the positional custom-call inputs.
//!
//! The host passes four opaque pointers, in order:
//!
//! | Slot | Type | Meaning |
//! |------|------|---------|
//! | 0 | `T[3 · n_samples]` | Cartesian coordinates |
//! | 1 | `int32` | maximum degree `l_max` |
//! | 2 | `bool` | normalise inputs to the unit sphere |
//! | 3 | `int32` | number of samples |

use std::ffi::c_void;

use sphericart_core::traits::KernelFloat;
use sphericart_core::types::{HarmonicsError, OutputLayout};

use crate::error::KernelError;

/// Number of input pointers in the calling convention.
pub const N_INPUTS: usize = 4;

/// Input slot of the coordinate array.
pub const XYZ_SLOT: usize = 0;
/// Input slot of `l_max`.
pub const L_MAX_SLOT: usize = 1;
/// Input slot of the normalisation flag.
pub const NORMALIZED_SLOT: usize = 2;
/// Input slot of the sample count.
pub const N_SAMPLES_SLOT: usize = 3;

/// Validated arguments of one custom call.
///
/// # Examples
/// ```
/// use sphericart_kernel::CallDescriptor;
///
/// let xyz = [1.0f64, 0.0, 0.0, 0.0, 1.0, 0.0];
/// let call = CallDescriptor::new(&xyz, 3, true).unwrap();
/// assert_eq!(call.n_samples, 2);
/// assert_eq!(call.layout().values_len(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallDescriptor<'a, T> {
    /// Flat `[n_samples, 3]` coordinates.
    pub xyz: &'a [T],
    /// Maximum degree.
    pub l_max: usize,
    /// Whether inputs are projected on the unit sphere.
    pub normalized: bool,
    /// Number of samples.
    pub n_samples: usize,
}

impl<'a, T: KernelFloat> CallDescriptor<'a, T> {
    /// Builds a descriptor, deriving `n_samples` from the coordinate length.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::Harmonics`] if `xyz` is not a whole number of
    /// triples or the derived lengths overflow.
    pub fn new(xyz: &'a [T], l_max: usize, normalized: bool) -> Result<Self, KernelError> {
        if xyz.len() % 3 != 0 {
            return Err(HarmonicsError::RaggedCoordinates(xyz.len()).into());
        }
        let n_samples = xyz.len() / 3;
        OutputLayout::try_new(l_max, n_samples)?;
        Ok(Self {
            xyz,
            l_max,
            normalized,
            n_samples,
        })
    }

    /// Derived buffer lengths.
    #[inline]
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(self.l_max, self.n_samples)
    }

    /// Decodes the raw input list of a custom call.
    ///
    /// The boolean slot is read as a byte and compared against zero, so any
    /// non-zero byte means `true`.
    ///
    /// # Errors
    ///
    /// Negative `l_max` or `n_samples`, null pointers, and sizes whose derived
    /// lengths overflow are rejected.
    ///
    /// # Safety
    ///
    /// `inputs` must be null or point to [`N_INPUTS`] pointers; every non-null
    /// scalar pointer must be readable, and the coordinate pointer must be
    /// valid for `3 · n_samples` reads of `T` for the lifetime `'a`.
    pub unsafe fn from_raw(inputs: *const *const c_void) -> Result<Self, KernelError> {
        if inputs.is_null() {
            return Err(KernelError::NullPointer("input list"));
        }
        let slots = std::slice::from_raw_parts(inputs, N_INPUTS);

        let l_max = read_scalar::<i32>(slots[L_MAX_SLOT], "l_max")?;
        let normalized = read_scalar::<u8>(slots[NORMALIZED_SLOT], "normalized")? != 0;
        let n_samples = read_scalar::<i32>(slots[N_SAMPLES_SLOT], "n_samples")?;

        if l_max < 0 {
            return Err(KernelError::NegativeDegree(l_max));
        }
        if n_samples < 0 {
            return Err(KernelError::NegativeSampleCount(n_samples));
        }
        let layout = OutputLayout::try_new(l_max as usize, n_samples as usize)?;

        let xyz = raw_slice::<T>(slots[XYZ_SLOT], layout.coordinates_len(), "xyz")?;
        Ok(Self {
            xyz,
            l_max: layout.l_max(),
            normalized,
            n_samples: layout.n_samples(),
        })
    }
}

/// Reads one scalar input.
///
/// # Safety
///
/// `ptr` must be null or valid for one read of `S`.
unsafe fn read_scalar<S: Copy>(ptr: *const c_void, name: &'static str) -> Result<S, KernelError> {
    if ptr.is_null() {
        return Err(KernelError::NullPointer(name));
    }
    Ok(ptr.cast::<S>().read_unaligned())
}

/// Reinterprets an input buffer as a slice; empty buffers may be null.
///
/// # Safety
///
/// For `len > 0`, `ptr` must be aligned and valid for `len` reads of `T`.
pub(crate) unsafe fn raw_slice<'a, T>(
    ptr: *const c_void,
    len: usize,
    name: &'static str,
) -> Result<&'a [T], KernelError> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(KernelError::NullPointer(name));
    }
    Ok(std::slice::from_raw_parts(ptr.cast::<T>(), len))
}

/// Mutable counterpart of [`raw_slice`].
///
/// # Safety
///
/// For `len > 0`, `ptr` must be aligned, valid for `len` writes of `T`, and
/// not aliased by any other live reference for `'a`.
pub(crate) unsafe fn raw_slice_mut<'a, T>(
    ptr: *mut c_void,
    len: usize,
    name: &'static str,
) -> Result<&'a mut [T], KernelError> {
    if len == 0 {
        return Ok(&mut []);
    }
    if ptr.is_null() {
        return Err(KernelError::NullPointer(name));
    }
    Ok(std::slice::from_raw_parts_mut(ptr.cast::<T>(), len))
}
