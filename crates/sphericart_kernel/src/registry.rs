//! Static registry of the six custom-call targets.
//!
//! | Target | Mode | Precision |
//! |--------|------|-----------|
//! | `cpu_sph_f32` / `cpu_sph_f64` | values | f32 / f64 |
//! | `cpu_dsph_f32` / `cpu_dsph_f64` | values + gradients | f32 / f64 |
//! | `cpu_ddsph_f32` / `cpu_ddsph_f64` | values + gradients + hessians | f32 / f64 |

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use sphericart_core::types::{ComputeMode, Precision};

use crate::entry::{cpu_sph, cpu_sph_with_gradients, cpu_sph_with_hessians, CustomCallFn};
use crate::error::KernelError;

/// One registered custom-call target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KernelTarget {
    /// Values, single precision.
    SphF32,
    /// Values, double precision.
    SphF64,
    /// Values and gradients, single precision.
    DsphF32,
    /// Values and gradients, double precision.
    DsphF64,
    /// Values, gradients and hessians, single precision.
    DdsphF32,
    /// Values, gradients and hessians, double precision.
    DdsphF64,
}

impl KernelTarget {
    /// Every target, in registration order.
    pub const ALL: [KernelTarget; 6] = [
        KernelTarget::SphF32,
        KernelTarget::SphF64,
        KernelTarget::DsphF32,
        KernelTarget::DsphF64,
        KernelTarget::DdsphF32,
        KernelTarget::DdsphF64,
    ];

    /// Target for a `(mode, precision)` pair.
    pub const fn new(mode: ComputeMode, precision: Precision) -> Self {
        match (mode, precision) {
            (ComputeMode::Values, Precision::F32) => KernelTarget::SphF32,
            (ComputeMode::Values, Precision::F64) => KernelTarget::SphF64,
            (ComputeMode::Gradients, Precision::F32) => KernelTarget::DsphF32,
            (ComputeMode::Gradients, Precision::F64) => KernelTarget::DsphF64,
            (ComputeMode::Hessians, Precision::F32) => KernelTarget::DdsphF32,
            (ComputeMode::Hessians, Precision::F64) => KernelTarget::DdsphF64,
        }
    }

    /// Registration name.
    pub const fn name(self) -> &'static str {
        match self {
            KernelTarget::SphF32 => "cpu_sph_f32",
            KernelTarget::SphF64 => "cpu_sph_f64",
            KernelTarget::DsphF32 => "cpu_dsph_f32",
            KernelTarget::DsphF64 => "cpu_dsph_f64",
            KernelTarget::DdsphF32 => "cpu_ddsph_f32",
            KernelTarget::DdsphF64 => "cpu_ddsph_f64",
        }
    }

    /// Compute mode.
    pub const fn mode(self) -> ComputeMode {
        match self {
            KernelTarget::SphF32 | KernelTarget::SphF64 => ComputeMode::Values,
            KernelTarget::DsphF32 | KernelTarget::DsphF64 => ComputeMode::Gradients,
            KernelTarget::DdsphF32 | KernelTarget::DdsphF64 => ComputeMode::Hessians,
        }
    }

    /// Element precision.
    pub const fn precision(self) -> Precision {
        match self {
            KernelTarget::SphF32 | KernelTarget::DsphF32 | KernelTarget::DdsphF32 => Precision::F32,
            KernelTarget::SphF64 | KernelTarget::DsphF64 | KernelTarget::DdsphF64 => Precision::F64,
        }
    }

    /// Entry point implementing this target.
    pub fn handler(self) -> CustomCallFn {
        match self {
            KernelTarget::SphF32 => cpu_sph::<f32> as CustomCallFn,
            KernelTarget::SphF64 => cpu_sph::<f64> as CustomCallFn,
            KernelTarget::DsphF32 => cpu_sph_with_gradients::<f32> as CustomCallFn,
            KernelTarget::DsphF64 => cpu_sph_with_gradients::<f64> as CustomCallFn,
            KernelTarget::DdsphF32 => cpu_sph_with_hessians::<f32> as CustomCallFn,
            KernelTarget::DdsphF64 => cpu_sph_with_hessians::<f64> as CustomCallFn,
        }
    }
}

impl fmt::Display for KernelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for KernelTarget {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KernelTarget::ALL
            .into_iter()
            .find(|target| target.name() == s)
            .ok_or_else(|| KernelError::UnknownTarget(s.to_string()))
    }
}

/// Name → handler map handed to the host runtime.
///
/// Built from [`KernelTarget::ALL`], so it always holds exactly six entries.
pub fn registrations() -> BTreeMap<&'static str, CustomCallFn> {
    KernelTarget::ALL
        .into_iter()
        .map(|target| (target.name(), target.handler()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_inverts_mode_and_precision() {
        for target in KernelTarget::ALL {
            assert_eq!(KernelTarget::new(target.mode(), target.precision()), target);
        }
    }

    #[test]
    fn test_names_follow_prefix_and_suffix() {
        for target in KernelTarget::ALL {
            let expected = format!(
                "cpu_{}_{}",
                target.mode().prefix(),
                target.precision().suffix()
            );
            assert_eq!(target.name(), expected);
        }
    }

    #[test]
    fn test_from_str_roundtrip() {
        for target in KernelTarget::ALL {
            assert_eq!(target.to_string().parse::<KernelTarget>().unwrap(), target);
        }
        assert_eq!(
            "cpu_sph_f16".parse::<KernelTarget>(),
            Err(KernelError::UnknownTarget("cpu_sph_f16".to_string()))
        );
    }
}
