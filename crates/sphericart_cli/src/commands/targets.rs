//! Targets command implementation
//!
//! Lists the registered custom-call targets.

use std::io::Write;

use serde::Serialize;
use sphericart_core::types::{ComputeMode, Precision};
use sphericart_kernel::{registrations, KernelTarget};

use crate::{CliError, Result};

/// One row of the listing.
#[derive(Debug, Serialize)]
struct TargetInfo {
    name: &'static str,
    mode: ComputeMode,
    precision: Precision,
    outputs: usize,
}

impl From<KernelTarget> for TargetInfo {
    fn from(target: KernelTarget) -> Self {
        Self {
            name: target.name(),
            mode: target.mode(),
            precision: target.precision(),
            outputs: target.mode().n_outputs(),
        }
    }
}

/// Run the targets command
pub fn run(format: &str) -> Result<()> {
    let stdout = std::io::stdout();
    render(format, &mut stdout.lock())
}

fn render<W: Write>(format: &str, out: &mut W) -> Result<()> {
    let rows: Vec<TargetInfo> = registrations()
        .keys()
        .filter_map(|name| name.parse::<KernelTarget>().ok())
        .map(TargetInfo::from)
        .collect();

    match format {
        "json" => {
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
        "table" => {
            writeln!(
                out,
                "{:<16} {:<10} {:<9} {:>7}",
                "name", "mode", "precision", "outputs"
            )?;
            for row in &rows {
                writeln!(
                    out,
                    "{:<16} {:<10} {:<9} {:>7}",
                    row.name,
                    row.mode.to_string(),
                    row.precision.to_string(),
                    row.outputs
                )?;
            }
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, table",
                other
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_target() {
        let mut buffer = Vec::new();
        render("table", &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().count(), 7);
        for target in KernelTarget::ALL {
            assert!(text.contains(target.name()));
        }
    }

    #[test]
    fn test_json_rows() {
        let mut buffer = Vec::new();
        render("json", &mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let rows = json.as_array().unwrap();

        assert_eq!(rows.len(), 6);
        let ddsph = rows
            .iter()
            .find(|row| row["name"] == "cpu_ddsph_f32")
            .unwrap();
        assert_eq!(ddsph["mode"], "hessians");
        assert_eq!(ddsph["precision"], "f32");
        assert_eq!(ddsph["outputs"], 3);
    }

    #[test]
    fn test_unknown_format() {
        let mut buffer = Vec::new();
        assert!(matches!(
            render("csv", &mut buffer),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
