//! Compute modes: which outputs a kernel writes.

use std::fmt;
use std::str::FromStr;

use super::error::{BufferKind, ParseError};

/// Output set produced by one kernel call.
///
/// Each mode writes a prefix of `[values, gradients, hessians]`:
///
/// | Mode | Outputs | Registration prefix |
/// |------|---------|---------------------|
/// | `Values` | values | `sph` |
/// | `Gradients` | values, gradients | `dsph` |
/// | `Hessians` | values, gradients, hessians | `ddsph` |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ComputeMode {
    /// Harmonic values only.
    #[default]
    Values,
    /// Values and first derivatives.
    Gradients,
    /// Values, first and second derivatives.
    Hessians,
}

impl ComputeMode {
    /// All modes in increasing derivative order.
    pub const ALL: [ComputeMode; 3] = [
        ComputeMode::Values,
        ComputeMode::Gradients,
        ComputeMode::Hessians,
    ];

    /// Highest derivative order computed (0, 1 or 2).
    #[inline]
    pub fn derivative_order(&self) -> usize {
        match self {
            ComputeMode::Values => 0,
            ComputeMode::Gradients => 1,
            ComputeMode::Hessians => 2,
        }
    }

    /// Number of output buffers the mode writes.
    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.derivative_order() + 1
    }

    /// Output buffers in the order the host passes them.
    pub fn outputs(&self) -> &'static [BufferKind] {
        const ORDER: [BufferKind; 3] = [
            BufferKind::Values,
            BufferKind::Gradients,
            BufferKind::Hessians,
        ];
        &ORDER[..self.n_outputs()]
    }

    /// Prefix used in registration names.
    #[inline]
    pub fn prefix(&self) -> &'static str {
        match self {
            ComputeMode::Values => "sph",
            ComputeMode::Gradients => "dsph",
            ComputeMode::Hessians => "ddsph",
        }
    }
}

impl fmt::Display for ComputeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeMode::Values => write!(f, "values"),
            ComputeMode::Gradients => write!(f, "gradients"),
            ComputeMode::Hessians => write!(f, "hessians"),
        }
    }
}

impl FromStr for ComputeMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "values" | "sph" => Ok(ComputeMode::Values),
            "gradients" | "dsph" => Ok(ComputeMode::Gradients),
            "hessians" | "ddsph" => Ok(ComputeMode::Hessians),
            _ => Err(ParseError::new("compute mode", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_are_prefixes() {
        assert_eq!(ComputeMode::Values.outputs(), &[BufferKind::Values]);
        assert_eq!(
            ComputeMode::Hessians.outputs(),
            &[
                BufferKind::Values,
                BufferKind::Gradients,
                BufferKind::Hessians
            ]
        );
        for mode in ComputeMode::ALL {
            assert_eq!(mode.outputs().len(), mode.n_outputs());
        }
    }

    #[test]
    fn test_parse_accepts_prefix_names() {
        assert_eq!(
            "dsph".parse::<ComputeMode>().unwrap(),
            ComputeMode::Gradients
        );
        assert_eq!(
            "Hessians".parse::<ComputeMode>().unwrap(),
            ComputeMode::Hessians
        );
        assert!("laplacian".parse::<ComputeMode>().is_err());
    }
}
