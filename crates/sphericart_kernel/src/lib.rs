//! # sphericart_kernel: XLA CPU Custom Calls for Spherical Harmonics
//!
//! ## Layer 2 (Kernel) Role
//!
//! This crate exposes six CPU entry points (three compute modes × two
//! precisions) with the XLA custom-call calling convention:
//!
//! ```text
//! void kernel(void* out, const void** in)
//! ```
//!
//! - `in` points to four input pointers: coordinates `[n, 3]`, `int32 l_max`,
//!   `bool normalized`, `int32 n_samples`
//! - `out` is the values buffer for single-output kernels, or a pointer to
//!   the list `[values, gradients, hessians]` (prefix per mode) otherwise
//!
//! Raw arguments are decoded into a typed [`CallDescriptor`] and
//! [`OutputBuffers`] before a calculator, built fresh for every call, is
//! run through [`execute`].
//!
//! ## Registry
//!
//! [`KernelTarget`] enumerates the six entry points; [`registrations`]
//! returns the name → handler map handed to the host runtime.
//!
//! ```rust
//! use sphericart_kernel::{registrations, KernelTarget};
//!
//! let targets = registrations();
//! assert_eq!(targets.len(), 6);
//! assert!(targets.contains_key("cpu_dsph_f32"));
//! assert_eq!(KernelTarget::ALL.len(), 6);
//! ```
//!
//! [`host::invoke`] drives a handler from safe code with the same pointer
//! layout the runtime uses.
//!
//! ## Safety
//!
//! The raw entry points trust the host for pointer validity and buffer
//! sizes, exactly like any XLA custom call. Decoding rejects negative
//! sizes and null pointers; rejected calls are logged through `tracing`
//! and leave every output untouched.

#![warn(missing_docs)]

pub mod descriptor;
pub mod entry;
pub mod error;
pub mod execute;
pub mod host;
pub mod outputs;
pub mod registry;

pub use descriptor::CallDescriptor;
pub use entry::{custom_call, try_custom_call, CustomCallFn};
pub use error::KernelError;
pub use execute::execute;
pub use host::invoke;
pub use outputs::OutputBuffers;
pub use registry::{registrations, KernelTarget};
