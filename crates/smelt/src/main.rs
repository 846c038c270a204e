// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Smelt - plan class-file transformations over archives.
//!
//! This is the binary entry point for the Smelt engine.

mod check;
mod output;
mod plan;
mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Smelt - plan class-file transformations over archives.
#[derive(Parser, Debug)]
#[command(name = "smelt", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the standard lookup hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the configuration and the declared plugins.
    Check,
    /// List the entries of a tar archive with their type resolution.
    Scan {
        /// Path to the tar archive.
        archive: PathBuf,
    },
    /// Run the declared plugins over a tar archive and report the outcome.
    Plan {
        /// Path to the tar archive.
        archive: PathBuf,
        /// Write an archive with the planned entries replaced.
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Run only this declared plugin; repeat to run several, in order.
        #[arg(long = "plugin", value_name = "NAME")]
        plugins: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => smelt_config::load_and_validate_path(path),
        None => smelt_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            smelt_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);
    let use_color = output::use_color(cli.plain);

    let result = match cli.command {
        Commands::Check => check::run_check(&config, use_color),
        Commands::Scan { archive } => scan::run_scan(&config, &archive, use_color),
        Commands::Plan {
            archive,
            output,
            plugins,
        } => plan::run_plan(&config, &archive, &plugins, output.as_deref(), use_color).map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("{}", output::failure(&format!("smelt: {e}"), use_color));
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber; `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!(
            "smelt={log_level},smelt_engine={log_level},smelt_plugin={log_level},warn"
        )));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
