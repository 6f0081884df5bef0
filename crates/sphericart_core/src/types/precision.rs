//! Floating-point precision tags.

use std::fmt;
use std::str::FromStr;

use super::error::ParseError;

/// Floating-point precision of a kernel.
///
/// # Examples
/// ```
/// use sphericart_core::types::Precision;
///
/// let p: Precision = "f32".parse().unwrap();
/// assert_eq!(p, Precision::F32);
/// assert_eq!(p.size_in_bytes(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Precision {
    /// IEEE-754 single precision (`f32`).
    F32,
    /// IEEE-754 double precision (`f64`).
    #[default]
    F64,
}

impl Precision {
    /// Both supported precisions, single first.
    pub const ALL: [Precision; 2] = [Precision::F32, Precision::F64];

    /// Suffix used in registration names (`"f32"` / `"f64"`).
    #[inline]
    pub fn suffix(&self) -> &'static str {
        match self {
            Precision::F32 => "f32",
            Precision::F64 => "f64",
        }
    }

    /// Width of one element in bytes.
    #[inline]
    pub fn size_in_bytes(&self) -> usize {
        match self {
            Precision::F32 => std::mem::size_of::<f32>(),
            Precision::F64 => std::mem::size_of::<f64>(),
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

impl FromStr for Precision {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f32" | "float32" | "single" => Ok(Precision::F32),
            "f64" | "float64" | "double" => Ok(Precision::F64),
            _ => Err(ParseError::new("precision", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("F32".parse::<Precision>().unwrap(), Precision::F32);
        assert_eq!("double".parse::<Precision>().unwrap(), Precision::F64);
        assert!("f16".parse::<Precision>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_suffix() {
        for p in Precision::ALL {
            assert_eq!(p.to_string().parse::<Precision>().unwrap(), p);
        }
    }
}
