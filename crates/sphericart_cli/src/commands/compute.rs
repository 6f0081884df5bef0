//! Compute command implementation
//!
//! Evaluates harmonics for a list of points through the registered raw
//! entry point of the requested target.

use std::io::Write;
use std::str::FromStr;

use serde::Serialize;
use sphericart_core::traits::KernelFloat;
use sphericart_core::types::{ComputeMode, OutputLayout, Precision};
use sphericart_kernel::host::invoke;
use sphericart_kernel::{CallDescriptor, KernelTarget, OutputBuffers};
use tracing::info;

use crate::config::CliConfig;
use crate::{CliError, Result};

/// Outputs of one evaluation, widened to `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub target: KernelTarget,
    pub normalized: bool,
    pub layout: OutputLayout,
    pub values: Vec<f64>,
    pub gradients: Vec<f64>,
    pub hessians: Vec<f64>,
}

/// JSON view with one nested array per sample.
#[derive(Debug, Serialize)]
struct Report<'a> {
    target: &'static str,
    mode: ComputeMode,
    precision: Precision,
    normalized: bool,
    layout: OutputLayout,
    values: Vec<&'a [f64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gradients: Option<Vec<Vec<&'a [f64]>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hessians: Option<Vec<Vec<Vec<&'a [f64]>>>>,
}

/// Run the compute command
pub fn run(config: &CliConfig, xyz: &str, mode: &str, format: &str) -> Result<()> {
    let mode = ComputeMode::from_str(mode).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    if !matches!(format, "json" | "table") {
        return Err(CliError::InvalidArgument(format!(
            "Unknown format: {}. Supported: json, table",
            format
        )));
    }
    let points = parse_points(xyz)?;
    let target = KernelTarget::new(mode, config.precision);

    info!(
        kernel = %target,
        l_max = config.l_max,
        normalized = config.normalized,
        n_samples = points.len() / 3,
        "Evaluating harmonics"
    );

    let evaluation = evaluate_points(target, &points, config.l_max, config.normalized)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        "json" => render_json(&evaluation, &mut out)?,
        _ => render_table(&evaluation, &mut out)?,
    }
    Ok(())
}

/// Parses `"x,y,z;x,y,z;..."` into flat coordinates.
pub fn parse_points(input: &str) -> Result<Vec<f64>> {
    let mut xyz = Vec::new();
    for point in input.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let coords: Vec<&str> = point.split(',').map(str::trim).collect();
        if coords.len() != 3 {
            return Err(CliError::InvalidArgument(format!(
                "Point '{}' must have exactly three coordinates",
                point
            )));
        }
        for coord in coords {
            let value: f64 = coord
                .parse()
                .map_err(|_| CliError::InvalidArgument(format!("Invalid coordinate: {}", coord)))?;
            xyz.push(value);
        }
    }
    Ok(xyz)
}

/// Evaluates `target` at `xyz`, converting to the target precision.
pub fn evaluate_points(
    target: KernelTarget,
    xyz: &[f64],
    l_max: usize,
    normalized: bool,
) -> Result<Evaluation> {
    match target.precision() {
        Precision::F32 => {
            let narrowed: Vec<f32> = xyz.iter().map(|&v| v as f32).collect();
            evaluate(target, &narrowed, l_max, normalized)
        }
        Precision::F64 => evaluate(target, xyz, l_max, normalized),
    }
}

fn evaluate<T>(
    target: KernelTarget,
    xyz: &[T],
    l_max: usize,
    normalized: bool,
) -> Result<Evaluation>
where
    T: KernelFloat + Into<f64>,
{
    let call = CallDescriptor::new(xyz, l_max, normalized)?;
    let layout = call.layout();
    let mode = target.mode();

    let gradients_len = match mode {
        ComputeMode::Values => 0,
        _ => layout.gradients_len(),
    };
    let hessians_len = match mode {
        ComputeMode::Hessians => layout.hessians_len(),
        _ => 0,
    };
    let mut sph = vec![T::zero(); layout.values_len()];
    let mut dsph = vec![T::zero(); gradients_len];
    let mut ddsph = vec![T::zero(); hessians_len];

    let outputs = match mode {
        ComputeMode::Values => OutputBuffers::Values { sph: &mut sph },
        ComputeMode::Gradients => OutputBuffers::Gradients {
            sph: &mut sph,
            dsph: &mut dsph,
        },
        ComputeMode::Hessians => OutputBuffers::Hessians {
            sph: &mut sph,
            dsph: &mut dsph,
            ddsph: &mut ddsph,
        },
    };
    invoke(target, &call, outputs)?;

    let widen = |buffer: Vec<T>| -> Vec<f64> { buffer.into_iter().map(Into::into).collect() };
    Ok(Evaluation {
        target,
        normalized,
        layout,
        values: widen(sph),
        gradients: widen(dsph),
        hessians: widen(ddsph),
    })
}

fn chunk(buffer: &[f64], size: usize) -> Vec<&[f64]> {
    if size == 0 {
        return Vec::new();
    }
    buffer.chunks(size).collect()
}

/// Writes the evaluation as pretty-printed JSON.
pub fn render_json<W: Write>(evaluation: &Evaluation, out: &mut W) -> Result<()> {
    let n_lm = evaluation.layout.n_harmonics();
    let mode = evaluation.target.mode();
    let values = chunk(&evaluation.values, n_lm);
    let gradients = (mode != ComputeMode::Values).then(|| {
        chunk(&evaluation.gradients, 3 * n_lm)
            .into_iter()
            .map(|sample| chunk(sample, n_lm))
            .collect()
    });
    let hessians = (mode == ComputeMode::Hessians).then(|| {
        chunk(&evaluation.hessians, 9 * n_lm)
            .into_iter()
            .map(|sample| {
                chunk(sample, 3 * n_lm)
                    .into_iter()
                    .map(|row| chunk(row, n_lm))
                    .collect()
            })
            .collect()
    });

    let report = Report {
        target: evaluation.target.name(),
        mode,
        precision: evaluation.target.precision(),
        normalized: evaluation.normalized,
        layout: evaluation.layout,
        values,
        gradients,
        hessians,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// Writes one row per `(sample, l, m)`.
///
/// Second derivatives are shown as the six unique entries of the
/// symmetric matrix.
pub fn render_table<W: Write>(evaluation: &Evaluation, out: &mut W) -> Result<()> {
    let layout = evaluation.layout;
    let mode = evaluation.target.mode();

    write!(out, "{:>6} {:>4} {:>5} {:>14}", "sample", "l", "m", "Y")?;
    if mode != ComputeMode::Values {
        write!(out, " {:>14} {:>14} {:>14}", "d/dx", "d/dy", "d/dz")?;
    }
    if mode == ComputeMode::Hessians {
        for name in ["xx", "xy", "xz", "yy", "yz", "zz"] {
            write!(out, " {:>14}", format!("d2/d{}", name))?;
        }
    }
    writeln!(out)?;

    for sample in 0..layout.n_samples() {
        for l in 0..=layout.l_max() {
            let l_signed = l as isize;
            for m in -l_signed..=l_signed {
                let lm = OutputLayout::harmonic_index(l, m);
                write!(
                    out,
                    "{:>6} {:>4} {:>5} {:>14.6e}",
                    sample,
                    l,
                    m,
                    evaluation.values[layout.value_index(sample, lm)]
                )?;
                if mode != ComputeMode::Values {
                    for axis in 0..3 {
                        write!(
                            out,
                            " {:>14.6e}",
                            evaluation.gradients[layout.gradient_index(sample, axis, lm)]
                        )?;
                    }
                }
                if mode == ComputeMode::Hessians {
                    for (row, col) in [(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)] {
                        write!(
                            out,
                            " {:>14.6e}",
                            evaluation.hessians[layout.hessian_index(sample, row, col, lm)]
                        )?;
                    }
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const Y00: f64 = 0.28209479177387814;

    #[test]
    fn test_parse_points() {
        let xyz = parse_points("1, 0, 0; 0,2,0.5;").unwrap();
        assert_eq!(xyz, vec![1.0, 0.0, 0.0, 0.0, 2.0, 0.5]);
        assert!(parse_points("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_points_rejects_malformed_input() {
        assert!(matches!(
            parse_points("1,2"),
            Err(CliError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_points("1,2,x"),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_evaluate_degree_zero() {
        for precision in Precision::ALL {
            let target = KernelTarget::new(ComputeMode::Gradients, precision);
            let evaluation = evaluate_points(target, &[0.3, -0.4, 1.2], 0, true).unwrap();
            assert_relative_eq!(evaluation.values[0], Y00, epsilon = 1e-6);
            assert!(evaluation.gradients.iter().all(|&g| g == 0.0));
            assert!(evaluation.hessians.is_empty());
        }
    }

    #[test]
    fn test_json_nests_per_sample() {
        let target = KernelTarget::new(ComputeMode::Hessians, Precision::F64);
        let xyz = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let evaluation = evaluate_points(target, &xyz, 1, false).unwrap();
        let mut buffer = Vec::new();
        render_json(&evaluation, &mut buffer).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["target"], "cpu_ddsph_f64");
        assert_eq!(json["values"].as_array().unwrap().len(), 2);
        assert_eq!(json["values"][0].as_array().unwrap().len(), 4);
        assert_eq!(json["gradients"][1].as_array().unwrap().len(), 3);
        assert_eq!(json["hessians"][0][2].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_json_omits_unrequested_outputs() {
        let target = KernelTarget::new(ComputeMode::Values, Precision::F32);
        let evaluation = evaluate_points(target, &[1.0, 1.0, 1.0], 2, true).unwrap();
        let mut buffer = Vec::new();
        render_json(&evaluation, &mut buffer).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert!(json.get("gradients").is_none());
        assert!(json.get("hessians").is_none());
    }

    #[test]
    fn test_table_has_one_row_per_harmonic() {
        let target = KernelTarget::new(ComputeMode::Values, Precision::F64);
        let evaluation = evaluate_points(target, &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0], 2, true).unwrap();
        let mut buffer = Vec::new();
        render_table(&evaluation, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 1 + 2 * 9);
    }
}
