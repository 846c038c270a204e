// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `smelt check` command implementation.
//!
//! Configuration errors are reported before any subcommand runs; this
//! command additionally builds the planning engine, which instantiates
//! every enabled plugin and compiles its matcher.

use smelt_config::SmeltConfig;
use smelt_core::SmeltError;
use smelt_plugin::PluginStatus;

use crate::output;
use crate::plan::{build_engine, registry_from_config};

/// Run the `smelt check` command.
pub fn run_check(config: &SmeltConfig, color: bool) -> Result<(), SmeltError> {
    let engine = build_engine(config, &[])?;

    println!("{} configuration is valid", output::success("✓", color));
    println!(
        "  target {} with the {} entry point",
        engine.class_file_version(),
        config.engine.entry_point
    );

    let registry = registry_from_config(config);
    if registry.is_empty() {
        println!("  {}", output::warning("no plugins declared", color));
    }
    for entry in registry.list_all() {
        let status = entry.status.to_string();
        let status = match entry.status {
            PluginStatus::NotConfigured => output::warning(&status, color),
            _ => output::muted(&status, color),
        };
        println!("  {:<24} {} {}", entry.manifest.name, entry.manifest.version, status);
    }
    Ok(())
}
