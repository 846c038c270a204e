// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `smelt plan` command implementation.
//!
//! Declared plugins are matcher-only: instead of rewriting bytecode they
//! annotate a [`PlanBuilder`], whose made artifact is a JSON document listing
//! the contributions every matching plugin would make to the type.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use smelt_config::{EntryPointKind, PluginDeclaration, SmeltConfig};
use smelt_core::{
    Builder, ClassFileLocator, ClassFileVersion, DynamicType, EntryPoint, LoadedInitializer,
    Plugin, SmeltError, TypeDescriptor,
};
use smelt_engine::{
    ArchiveLedger, CachedTypePool, ClassFileTypePool, CompoundListener, Disposition, Engine,
    ForArchive, PluginFailureRecord, RunReport, SummaryListener, TracingListener,
};
use smelt_plugin::{
    load_plugin_manifest, ElementMatcher, ForElementMatcher, PluginFactory, PluginManifest,
    PluginRegistry, PluginStatus,
};
use tracing::{info, warn};

use crate::output;

/// One plugin's contribution to a planned type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanContribution {
    pub plugin: String,
    pub description: String,
}

/// The serialized form of a planned type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub target: String,
    pub class_file_version: String,
    pub entry_point: EntryPointKind,
    pub contributions: Vec<PlanContribution>,
    pub live_initializers: Vec<String>,
}

/// Builder accumulating plan contributions for one type.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    target: TypeDescriptor,
    version: ClassFileVersion,
    entry_point: EntryPointKind,
    contributions: Vec<PlanContribution>,
    live_initializers: Vec<String>,
}

impl PlanBuilder {
    pub fn new(target: TypeDescriptor, version: ClassFileVersion, entry_point: EntryPointKind) -> Self {
        Self {
            target,
            version,
            entry_point,
            contributions: Vec::new(),
            live_initializers: Vec::new(),
        }
    }

    pub fn contribute(mut self, plugin: &str, description: &str) -> Self {
        self.contributions.push(PlanContribution {
            plugin: plugin.to_string(),
            description: description.to_string(),
        });
        self
    }

    /// Marks the type as needing a load-time initializer from `plugin`.
    pub fn with_live_initializer(mut self, plugin: &str) -> Self {
        self.live_initializers.push(plugin.to_string());
        self
    }

    pub fn plan(&self) -> Plan {
        Plan {
            target: self.target.name().to_string(),
            class_file_version: self.version.to_string(),
            entry_point: self.entry_point,
            contributions: self.contributions.clone(),
            live_initializers: self.live_initializers.clone(),
        }
    }
}

impl Builder for PlanBuilder {
    fn make(self) -> Result<DynamicType, SmeltError> {
        let bytes = serde_json::to_vec_pretty(&self.plan()).map_err(|e| SmeltError::Make {
            type_name: self.target.name().to_string(),
            message: e.to_string(),
        })?;
        let mut artifact = DynamicType::new(self.target.clone(), bytes);
        for (index, plugin) in self.live_initializers.iter().enumerate() {
            let initializer_type =
                TypeDescriptor::new(format!("{}$SmeltInitializer{index}", self.target));
            artifact = artifact.with_initializer(
                initializer_type,
                LoadedInitializer::live(format!("initializer registered by {plugin}")),
            );
        }
        Ok(artifact)
    }
}

/// Seeds a [`PlanBuilder`] with the configured entry-point strategy.
#[derive(Debug, Clone, Copy)]
pub struct PlanEntryPoint {
    kind: EntryPointKind,
}

impl PlanEntryPoint {
    pub fn new(kind: EntryPointKind) -> Self {
        Self { kind }
    }
}

impl EntryPoint<PlanBuilder> for PlanEntryPoint {
    fn transform(
        &self,
        target: &TypeDescriptor,
        version: ClassFileVersion,
        _locator: &dyn ClassFileLocator,
    ) -> Result<PlanBuilder, SmeltError> {
        Ok(PlanBuilder::new(target.clone(), version, self.kind))
    }
}

/// Creates matcher-only plugins from manifests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredPluginFactory;

impl PluginFactory<PlanBuilder> for DeclaredPluginFactory {
    fn create(&self, manifest: &PluginManifest) -> Result<Arc<dyn Plugin<PlanBuilder>>, SmeltError> {
        let matcher = ElementMatcher::from_config(&manifest.matcher)?;
        let name = manifest.name.clone();
        let description = if manifest.description.is_empty() {
            format!("{} v{}", manifest.name, manifest.version)
        } else {
            manifest.description.clone()
        };
        let live = manifest.live_initializer;
        Ok(Arc::new(ForElementMatcher::new(
            manifest.name.clone(),
            matcher,
            move |builder: PlanBuilder, _: &TypeDescriptor| {
                let builder = builder.contribute(&name, &description);
                Ok(if live {
                    builder.with_live_initializer(&name)
                } else {
                    builder
                })
            },
        )))
    }
}

/// Registers every `[[plugins]]` declaration, keeping declaration order.
///
/// A declaration whose manifest cannot be loaded is registered as
/// [`PluginStatus::NotConfigured`] and never assembled.
pub fn registry_from_config(config: &SmeltConfig) -> PluginRegistry<PlanBuilder> {
    let factory: Arc<dyn PluginFactory<PlanBuilder>> = Arc::new(DeclaredPluginFactory);
    let mut registry = PluginRegistry::new();
    for declaration in &config.plugins {
        let (manifest, status) = match declared_manifest(declaration) {
            Ok(manifest) if declaration.enabled => (manifest, PluginStatus::Enabled),
            Ok(manifest) => (manifest, PluginStatus::Disabled),
            Err(err) => {
                warn!(plugin = %declaration.name, error = %err, "plugin manifest unusable");
                (PluginManifest::from(declaration), PluginStatus::NotConfigured)
            }
        };
        registry.register_with_status(manifest, Some(Arc::clone(&factory)), status);
    }
    registry
}

fn declared_manifest(declaration: &PluginDeclaration) -> Result<PluginManifest, SmeltError> {
    let Some(path) = &declaration.manifest else {
        return Ok(PluginManifest::from(declaration));
    };
    let manifest = load_plugin_manifest(path)?;
    if manifest.name != declaration.name {
        return Err(SmeltError::Config(format!(
            "manifest {} declares plugin `{}`, expected `{}`",
            path.display(),
            manifest.name,
            declaration.name
        )));
    }
    Ok(manifest)
}

/// Builds the planning engine described by `config`.
///
/// With an empty `selected` list every enabled plugin runs in declaration
/// order; otherwise only the named plugins run, in the order given.
pub fn build_engine(
    config: &SmeltConfig,
    selected: &[String],
) -> Result<Engine<PlanBuilder>, SmeltError> {
    let registry = registry_from_config(config);
    let plugins = if selected.is_empty() {
        registry.assemble_all()?
    } else {
        registry.assemble(selected)?
    };
    let type_pool = CachedTypePool::new(
        ClassFileTypePool::new().with_skip_prefixes(config.source.skip_prefixes.iter().cloned()),
    );
    Engine::from_config(&config.engine)?
        .entry_point(PlanEntryPoint::new(config.engine.entry_point))
        .type_pool(type_pool)
        .plugins(plugins.into_plugins())
        .build()
}

/// Outcome of a planning run.
#[derive(Debug)]
pub struct PlanOutcome {
    pub report: RunReport,
    pub failures: Vec<PluginFailureRecord>,
    pub ledger: ArchiveLedger,
}

/// Run the engine over `archive` without printing anything.
pub fn plan_archive(
    config: &SmeltConfig,
    archive: &Path,
    selected: &[String],
) -> Result<PlanOutcome, SmeltError> {
    let engine = build_engine(config, selected)?;
    let source = ForArchive::open(archive)?;
    let ledger = source.ledger();

    let summary = SummaryListener::new();
    let listener = CompoundListener::new()
        .with(&TracingListener)
        .with(&summary);
    let report = engine.apply_with_listener(source, &listener)?;

    Ok(PlanOutcome {
        report,
        failures: summary.plugin_failures(),
        ledger,
    })
}

/// Run the `smelt plan` command.
pub fn run_plan(
    config: &SmeltConfig,
    archive: &Path,
    selected: &[String],
    output_path: Option<&Path>,
    color: bool,
) -> Result<RunReport, SmeltError> {
    let outcome = plan_archive(config, archive, selected)?;

    println!(
        "{}",
        output::heading(&format!("Plan for {}", archive.display()), color)
    );
    for entry in outcome.ledger.entries() {
        if let Disposition::Replaced(artifact) = &entry.disposition {
            println!(
                "  {} {}",
                output::success("✓", color),
                artifact.descriptor()
            );
        }
    }
    for failure in &outcome.failures {
        println!(
            "  {} {}: {}",
            output::failure("✗", color),
            failure.target,
            failure.message
        );
    }

    let report = outcome.report;
    let summary = report.to_string();
    let summary = if report.has_failures() {
        output::warning(&summary, color)
    } else {
        output::success(&summary, color)
    };
    println!("\n{summary}");

    if let Some(path) = output_path {
        let file = File::create(path)
            .map_err(|e| SmeltError::io(format!("creating {}", path.display()), e))?;
        outcome.ledger.write_to(file)?;
        info!(path = %path.display(), "plan archive written");
        println!("{}", output::muted(&format!("wrote {}", path.display()), color));
    }

    Ok(report)
}
