//! # sphericart_core: Real Spherical Harmonics Foundation
//!
//! ## Layer 1 (Foundation) Role
//!
//! sphericart_core is the bottom layer of the workspace, providing:
//! - Precision and compute-mode tags (`types::precision`, `types::mode`)
//! - Output buffer length arithmetic (`types::layout`)
//! - Error types: `HarmonicsError`, `ParseError` (`types::error`)
//! - The calculator seam consumed by the kernel adapter (`traits`)
//! - A native calculator for real spherical harmonics with gradients and
//!   second derivatives (`calculator`)
//!
//! ## Conventions
//!
//! Harmonics are real, without the Condon-Shortley phase, and stored per
//! sample at index `l² + l + m`. With `normalized = false` the calculator
//! returns regular solid harmonics `r^l Y_l^m`; with `normalized = true` it
//! returns `Y_l^m` evaluated on the unit sphere.
//!
//! ## Usage Examples
//!
//! ```rust
//! use sphericart_core::calculator::SphericalHarmonics;
//! use sphericart_core::types::OutputLayout;
//!
//! let calculator = SphericalHarmonics::<f64>::new(2, true);
//! let xyz = [0.0, 0.0, 1.0, 1.0, 0.0, 0.0];
//! let layout = OutputLayout::new(2, 2);
//! let mut sph = vec![0.0; layout.values_len()];
//!
//! calculator.compute_array(&xyz, &mut sph).unwrap();
//! assert!((sph[0] - 0.28209479177387814).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `Precision`, `ComputeMode`, `OutputLayout`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod calculator;
pub mod traits;
pub mod types;

pub use calculator::SphericalHarmonics;
pub use traits::{HarmonicsCalculator, KernelFloat};
pub use types::{BufferKind, ComputeMode, HarmonicsError, OutputLayout, ParseError, Precision};
