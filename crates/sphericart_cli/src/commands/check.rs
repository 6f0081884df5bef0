//! Check command implementation
//!
//! Self-check of every registered target:
//! - degree zero must yield the constant `1/(2√π)` with zero derivatives
//! - at the configured degree, the raw entry point must reproduce the
//!   calculator called directly

use sphericart_core::types::{ComputeMode, Precision};
use sphericart_core::SphericalHarmonics;
use sphericart_kernel::KernelTarget;
use tracing::{info, warn};

use super::compute::evaluate_points;
use crate::config::CliConfig;
use crate::{CliError, Result};

/// `Y_0^0`
const Y00: f64 = 0.28209479177387814;

const CHECK_POINTS: [f64; 12] = [
    1.0, 0.0, 0.0, 0.3, -0.7, 1.9, -2.5, 0.4, -0.1, 0.0, 0.0, 0.0,
];

fn tolerance(precision: Precision) -> f64 {
    match precision {
        Precision::F32 => 1e-4,
        Precision::F64 => 1e-12,
    }
}

/// Run the check command
pub fn run(config: &CliConfig) -> Result<()> {
    println!("Sphericart System Check");
    println!("=======================");

    let mut failures = Vec::new();
    for target in KernelTarget::ALL {
        match check_target(target, config.l_max) {
            Ok(()) => println!("  ✓ {}", target),
            Err(err) => {
                warn!(kernel = %target, error = %err, "Self-check failed");
                println!("  ✗ {}: {}", target, err);
                failures.push(target.name());
            }
        }
    }

    if failures.is_empty() {
        info!("All targets passed");
        println!(
            "\nAll {} targets passed (l_max = {})",
            KernelTarget::ALL.len(),
            config.l_max
        );
        Ok(())
    } else {
        Err(CliError::CheckFailed(failures.join(", ")))
    }
}

/// Checks one target at degree zero and at `l_max`.
pub fn check_target(target: KernelTarget, l_max: usize) -> Result<()> {
    let tol = tolerance(target.precision());

    for normalized in [false, true] {
        let evaluation = evaluate_points(target, &CHECK_POINTS, 0, normalized)?;
        if let Some(value) = evaluation.values.iter().find(|v| (*v - Y00).abs() > tol) {
            return Err(CliError::CheckFailed(format!(
                "degree zero value {} differs from {}",
                value, Y00
            )));
        }
        let derivatives = evaluation.gradients.iter().chain(&evaluation.hessians);
        if let Some(value) = derivatives.into_iter().find(|v| **v != 0.0) {
            return Err(CliError::CheckFailed(format!(
                "degree zero derivative {} is not zero",
                value
            )));
        }
    }

    // f32 targets are compared against the f64 calculator
    let evaluation = evaluate_points(target, &CHECK_POINTS, l_max, true)?;
    let calc = SphericalHarmonics::<f64>::new(l_max, true);
    let layout = evaluation.layout;
    let mut sph = vec![0.0; layout.values_len()];
    let mut dsph = vec![0.0; layout.gradients_len()];
    let mut ddsph = vec![0.0; layout.hessians_len()];
    calc.compute_array_with_hessians(&CHECK_POINTS, &mut sph, &mut dsph, &mut ddsph)
        .map_err(sphericart_kernel::KernelError::from)?;

    let mut pairs: Vec<(&[f64], &[f64])> = vec![(&evaluation.values, &sph)];
    if target.mode() != ComputeMode::Values {
        pairs.push((&evaluation.gradients, &dsph));
    }
    if target.mode() == ComputeMode::Hessians {
        pairs.push((&evaluation.hessians, &ddsph));
    }
    for (actual, expected) in pairs {
        for (a, e) in actual.iter().zip(expected) {
            if (a - e).abs() > tol * (1.0 + e.abs()) {
                return Err(CliError::CheckFailed(format!(
                    "entry point returned {} where the calculator gives {}",
                    a, e
                )));
            }
        }
    }
    Ok(())
}
