//! Sphericart CLI - Command Line Operations for the XLA Custom Calls
//!
//! Operational entry point for the spherical-harmonics kernels.
//!
//! # Commands
//!
//! - `sphericart targets` - List the registered custom-call targets
//! - `sphericart compute --xyz "x,y,z;..."` - Evaluate harmonics through a raw entry point
//! - `sphericart check` - Self-check every target
//!
//! # Configuration
//!
//! Defaults < `sphericart.toml` < `SPHERICART_*` environment variables < flags.
//! `RUST_LOG` takes precedence over the configured log level.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use config::{build_config, CliArgs};

/// Real spherical harmonics through XLA CPU custom calls
#[derive(Parser)]
#[command(name = "sphericart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (defaults to sphericart.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered custom-call targets
    Targets {
        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Evaluate harmonics for a list of points
    Compute {
        /// Points as "x,y,z;x,y,z;..."
        #[arg(long, allow_hyphen_values = true)]
        xyz: String,

        /// Maximum degree
        #[arg(short, long)]
        l_max: Option<usize>,

        /// Project points on the unit sphere
        #[arg(short, long)]
        normalized: bool,

        /// Compute mode (values, gradients, hessians)
        #[arg(short, long, default_value = "values")]
        mode: String,

        /// Precision (f32, f64)
        #[arg(short, long)]
        precision: Option<String>,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Check every target against reference values
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut args = CliArgs {
        config_file: cli.config.clone(),
        ..Default::default()
    };
    if let Commands::Compute {
        l_max,
        normalized,
        precision,
        ..
    } = &cli.command
    {
        args.l_max = *l_max;
        args.normalized = *normalized;
        args.precision = precision.clone();
    }
    let config = build_config(&args)?;

    let fallback = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_filter_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Targets { format } => commands::targets::run(&format),
        Commands::Compute {
            xyz,
            mode,
            format,
            ..
        } => commands::compute::run(&config, &xyz, &mode, &format),
        Commands::Check => commands::check::run(&config),
    }
}
