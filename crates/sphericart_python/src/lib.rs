//! # sphericart_jax_cpu: Python Registration Module
//!
//! ## Layer 3 (Service) Role
//!
//! Builds the `sphericart_jax_cpu` extension module. Its single function,
//! `registrations()`, returns a `dict` mapping each custom-call target name
//! to a `PyCapsule` wrapping the raw entry point, which is the shape
//! `jax.ffi.register_ffi_target` (and the older
//! `xla_client.register_custom_call_target`) expect:
//!
//! ```python
//! import jax
//! import sphericart_jax_cpu
//!
//! for name, target in sphericart_jax_cpu.registrations().items():
//!     jax.ffi.register_ffi_target(name, target, platform="cpu", api_version=0)
//! ```

use std::ffi::{c_void, CStr};

use pyo3::prelude::*;
use pyo3::types::PyDict;
use sphericart_kernel::CustomCallFn;

/// Capsule name XLA checks before trusting a custom-call pointer.
const CAPSULE_NAME: &CStr = c"xla._CUSTOM_CALL_TARGET";

/// Wraps a handler in a capsule whose pointer is the function address itself.
fn capsule(py: Python<'_>, handler: CustomCallFn) -> PyResult<Bound<'_, PyAny>> {
    // SAFETY: the pointer is a static function and the name a static C
    // string, so neither needs a destructor.
    unsafe {
        let raw = pyo3::ffi::PyCapsule_New(handler as *mut c_void, CAPSULE_NAME.as_ptr(), None);
        Bound::from_owned_ptr_or_err(py, raw)
    }
}

/// Returns `{target_name: PyCapsule}` for all six CPU targets.
#[pyfunction]
fn registrations(py: Python<'_>) -> PyResult<Bound<'_, PyDict>> {
    let dict = PyDict::new_bound(py);
    for (name, handler) in sphericart_kernel::registrations() {
        dict.set_item(name, capsule(py, handler)?)?;
    }
    Ok(dict)
}

#[pymodule]
fn sphericart_jax_cpu(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(registrations, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
