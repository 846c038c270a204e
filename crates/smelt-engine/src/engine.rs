// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plugin-application engine.
//!
//! For every element of a source the engine resolves a descriptor, folds the
//! matching plugins over a fresh builder, and either commits the made
//! artifact or retains the element. Exactly one outcome is reported per
//! element, in source order.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;
use smelt_config::EngineConfig;
use smelt_core::{
    Builder, ClassFileLocator, ClassFileVersion, DynamicType, Element, EntryPoint, Listener,
    NoOpLocator, Outcome, Plugin, PluginError, Resolution, SmeltError, Source, TypeDescriptor,
    TypePool, NO_OP_LISTENER,
};
use smelt_plugin::Compound;
use tracing::{debug, error, info, warn};

/// What happens when a plugin fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report the failure, skip the artifact, and keep going.
    Continue,
    /// Abort the run on the first failure.
    FailFast {
        /// Whether the listener sees the failure before the run aborts.
        notify_listener: bool,
    },
}

/// Whether made artifacts may carry live load-time initializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitializerPolicy {
    /// Live initializers are left for the caller to run.
    Permit,
    /// A live initializer aborts the run.
    Reject,
}

/// Outcome tallies for one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Elements replaced with a made artifact.
    pub transformed: usize,
    /// Resolved elements no plugin matched.
    pub ignored: usize,
    /// Elements with at least one plugin failure.
    pub failed: usize,
    /// Elements the type pool could not describe.
    pub unresolved: usize,
}

impl RunReport {
    /// Counts one element outcome.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.transformed += 1,
            Outcome::Ignored => self.ignored += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Unresolved => self.unresolved += 1,
        }
    }

    /// Number of elements processed.
    pub fn total(&self) -> usize {
        self.transformed + self.ignored + self.failed + self.unresolved
    }

    /// Whether any element failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} transformed, {} ignored, {} failed, {} unresolved",
            self.transformed, self.ignored, self.failed, self.unresolved
        )
    }
}

/// Applies an ordered plugin sequence to every element of a source.
///
/// Immutable once built; one engine can run over any number of sources.
pub struct Engine<B: Builder> {
    class_file_version: ClassFileVersion,
    entry_point: Arc<dyn EntryPoint<B>>,
    type_pool: Arc<dyn TypePool>,
    locator: Arc<dyn ClassFileLocator>,
    plugins: Compound<B>,
    failure_policy: FailurePolicy,
    initializer_policy: InitializerPolicy,
}

impl<B: Builder> fmt::Debug for Engine<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("class_file_version", &self.class_file_version)
            .field("plugins", &self.plugins)
            .field("failure_policy", &self.failure_policy)
            .field("initializer_policy", &self.initializer_policy)
            .finish_non_exhaustive()
    }
}

impl<B: Builder> Engine<B> {
    pub fn builder() -> EngineBuilder<B> {
        EngineBuilder::new()
    }

    /// A builder with the version and policies taken from `config`.
    pub fn from_config(config: &EngineConfig) -> Result<EngineBuilder<B>, SmeltError> {
        EngineBuilder::new().configure(config)
    }

    pub fn plugins(&self) -> &Compound<B> {
        &self.plugins
    }

    pub fn class_file_version(&self) -> ClassFileVersion {
        self.class_file_version
    }

    /// Runs over `source` without observing outcomes.
    pub fn apply<S: Source>(&self, source: S) -> Result<RunReport, SmeltError> {
        self.apply_with_listener(source, &NO_OP_LISTENER)
    }

    /// Runs over `source`, reporting each outcome to `listener`.
    ///
    /// The source is closed on every path. On error, elements after the
    /// failing one are left untouched.
    pub fn apply_with_listener<S: Source>(
        &self,
        source: S,
        listener: &dyn Listener,
    ) -> Result<RunReport, SmeltError> {
        info!(
            plugins = self.plugins.len(),
            version = %self.class_file_version,
            "engine.run.start"
        );
        let mut guard = SourceGuard::new(source);
        match self.run(&mut guard, listener) {
            Ok(report) => {
                guard.close()?;
                info!(
                    transformed = report.transformed,
                    ignored = report.ignored,
                    failed = report.failed,
                    unresolved = report.unresolved,
                    "engine.run.complete"
                );
                Ok(report)
            }
            Err(e) => {
                error!(error = %e, "engine.run.aborted");
                Err(e)
            }
        }
    }

    fn run<S: Source>(
        &self,
        guard: &mut SourceGuard<S>,
        listener: &dyn Listener,
    ) -> Result<RunReport, SmeltError> {
        let mut report = RunReport::default();
        while let Some(next) = guard.next_element() {
            let outcome = self.process(next?, listener)?;
            report.record(outcome);
        }
        Ok(report)
    }

    fn process<E: Element>(&self, element: E, listener: &dyn Listener) -> Result<Outcome, SmeltError> {
        let descriptor = match self.type_pool.describe(element.name()) {
            Resolution::Resolved(descriptor) => descriptor,
            Resolution::Unresolved => {
                debug!(element = %element.name(), outcome = %Outcome::Unresolved, "element processed");
                listener.on_unresolved(element.name());
                element.retain();
                return Ok(Outcome::Unresolved);
            }
        };

        let mut builder =
            self.entry_point
                .transform(&descriptor, self.class_file_version, self.locator.as_ref())?;
        let mut transformed = false;
        let mut failed = false;

        for plugin in self.plugins.plugins() {
            match self.apply_plugin(plugin.as_ref(), &builder, &descriptor) {
                Ok(Some(next)) => {
                    builder = next;
                    transformed = true;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        target_type = %descriptor,
                        plugin = %plugin.name(),
                        error = %err,
                        "plugin failed"
                    );
                    match self.failure_policy {
                        FailurePolicy::FailFast { notify_listener } => {
                            if notify_listener {
                                listener.on_plugin_failure(&descriptor, &err);
                            }
                            return Err(SmeltError::Plugin {
                                type_name: descriptor.name().to_string(),
                                source: err,
                            });
                        }
                        FailurePolicy::Continue => {
                            listener.on_plugin_failure(&descriptor, &err);
                            failed = true;
                        }
                    }
                }
            }
        }

        if failed {
            debug!(target_type = %descriptor, outcome = %Outcome::Failed, "element processed");
            listener.on_failure(&descriptor);
            element.retain();
            return Ok(Outcome::Failed);
        }
        if !transformed {
            debug!(target_type = %descriptor, outcome = %Outcome::Ignored, "element processed");
            listener.on_ignore(&descriptor);
            element.retain();
            return Ok(Outcome::Ignored);
        }

        let artifact = builder.make()?;
        self.check_initializers(&artifact)?;
        element.replace(artifact)?;
        info!(target_type = %descriptor, outcome = %Outcome::Success, "element processed");
        listener.on_success(&descriptor);
        Ok(Outcome::Success)
    }

    /// Matches and applies one plugin on a copy of `builder`.
    ///
    /// Returns `None` when the plugin does not match. Panics in either call
    /// are reported as [`PluginError::Panicked`].
    fn apply_plugin(
        &self,
        plugin: &dyn Plugin<B>,
        builder: &B,
        descriptor: &TypeDescriptor,
    ) -> Result<Option<B>, PluginError> {
        if !contained(plugin.name(), || Ok(plugin.matches(descriptor)))? {
            return Ok(None);
        }
        let candidate = builder.clone();
        contained(plugin.name(), || {
            plugin.apply(candidate, descriptor, self.locator.as_ref())
        })
        .map(Some)
    }

    fn check_initializers(&self, artifact: &DynamicType) -> Result<(), SmeltError> {
        for (target, initializer) in artifact.loaded_initializers() {
            if !initializer.is_alive() {
                continue;
            }
            match self.initializer_policy {
                InitializerPolicy::Reject => {
                    return Err(SmeltError::LiveInitializer {
                        type_name: target.name().to_string(),
                        initializer: initializer.description().to_string(),
                    });
                }
                InitializerPolicy::Permit => {
                    debug!(target_type = %target, initializer = %initializer.description(), "live initializer permitted");
                }
            }
        }
        Ok(())
    }
}

fn contained<T>(
    plugin: &str,
    call: impl FnOnce() -> Result<T, PluginError>,
) -> Result<T, PluginError> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => Err(PluginError::Panicked {
            plugin: plugin.to_string(),
            message: panic_message(&*payload),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Owns the source for one run and closes it exactly once.
///
/// `close` propagates errors; a guard dropped on an abort or a panic closes
/// the source and only logs a failure.
struct SourceGuard<S: Source> {
    source: S,
    closed: bool,
}

impl<S: Source> SourceGuard<S> {
    fn new(source: S) -> Self {
        Self {
            source,
            closed: false,
        }
    }

    fn next_element(&mut self) -> Option<Result<S::Element, SmeltError>> {
        self.source.next_element()
    }

    fn close(mut self) -> Result<(), SmeltError> {
        self.closed = true;
        self.source.close()
    }
}

impl<S: Source> Drop for SourceGuard<S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.source.close() {
            warn!(error = %e, "failed to close source after aborted run");
        }
    }
}

/// Configuration surface for [`Engine`].
///
/// Every setting except the locator is required.
pub struct EngineBuilder<B: Builder> {
    class_file_version: Option<ClassFileVersion>,
    entry_point: Option<Arc<dyn EntryPoint<B>>>,
    type_pool: Option<Arc<dyn TypePool>>,
    locator: Arc<dyn ClassFileLocator>,
    plugins: Option<Vec<Arc<dyn Plugin<B>>>>,
    failure_policy: Option<FailurePolicy>,
    initializer_policy: Option<InitializerPolicy>,
}

impl<B: Builder> EngineBuilder<B> {
    pub fn new() -> Self {
        Self {
            class_file_version: None,
            entry_point: None,
            type_pool: None,
            locator: Arc::new(NoOpLocator),
            plugins: None,
            failure_policy: None,
            initializer_policy: None,
        }
    }

    pub fn class_file_version(mut self, version: ClassFileVersion) -> Self {
        self.class_file_version = Some(version);
        self
    }

    pub fn entry_point(mut self, entry_point: impl EntryPoint<B> + 'static) -> Self {
        self.entry_point = Some(Arc::new(entry_point));
        self
    }

    pub fn type_pool(mut self, type_pool: impl TypePool + 'static) -> Self {
        self.type_pool = Some(Arc::new(type_pool));
        self
    }

    pub fn locator(mut self, locator: impl ClassFileLocator + 'static) -> Self {
        self.locator = Arc::new(locator);
        self
    }

    /// Sets the plugin sequence, replacing any previous one.
    pub fn plugins<I>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Plugin<B>>>,
    {
        self.plugins = Some(plugins.into_iter().collect());
        self
    }

    /// Appends one plugin to the sequence.
    pub fn plugin(mut self, plugin: Arc<dyn Plugin<B>>) -> Self {
        self.plugins.get_or_insert_with(Vec::new).push(plugin);
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    pub fn initializer_policy(mut self, policy: InitializerPolicy) -> Self {
        self.initializer_policy = Some(policy);
        self
    }

    /// Applies the version and policies of an `[engine]` section.
    pub fn configure(self, config: &EngineConfig) -> Result<Self, SmeltError> {
        let version: ClassFileVersion = config.class_file_version.parse()?;
        let failure_policy = if config.fail_fast {
            FailurePolicy::FailFast {
                notify_listener: config.notify_on_abort,
            }
        } else {
            FailurePolicy::Continue
        };
        let initializer_policy = if config.fail_on_live_initializer {
            InitializerPolicy::Reject
        } else {
            InitializerPolicy::Permit
        };
        Ok(self
            .class_file_version(version)
            .failure_policy(failure_policy)
            .initializer_policy(initializer_policy))
    }

    /// Validates the configuration and flattens the plugin sequence.
    pub fn build(self) -> Result<Engine<B>, SmeltError> {
        let class_file_version = self
            .class_file_version
            .ok_or_else(|| missing("class file version"))?;
        let entry_point = self.entry_point.ok_or_else(|| missing("entry point"))?;
        let type_pool = self.type_pool.ok_or_else(|| missing("type pool"))?;
        let plugins = self.plugins.ok_or_else(|| missing("plugins"))?;
        let failure_policy = self.failure_policy.ok_or_else(|| missing("failure policy"))?;
        let initializer_policy = self
            .initializer_policy
            .ok_or_else(|| missing("initializer policy"))?;

        Ok(Engine {
            class_file_version,
            entry_point,
            type_pool,
            locator: self.locator,
            plugins: Compound::new(plugins),
            failure_policy,
            initializer_policy,
        })
    }
}

impl<B: Builder> Default for EngineBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(item: &str) -> SmeltError {
    SmeltError::Config(format!("engine {item} is not configured"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smelt_test_utils::{MockPlugin, MockSource, RecordingBuilder, StaticTypePool};
    use tracing_test::traced_test;

    fn complete() -> EngineBuilder<RecordingBuilder> {
        Engine::builder()
            .class_file_version(ClassFileVersion::JAVA_V17)
            .entry_point(RecordingBuilder::entry_point)
            .type_pool(StaticTypePool::new(&["Foo"]))
            .plugins([Arc::new(MockPlugin::matching_all("p")) as Arc<dyn Plugin<RecordingBuilder>>])
            .failure_policy(FailurePolicy::Continue)
            .initializer_policy(InitializerPolicy::Reject)
    }

    #[test]
    fn build_names_first_missing_item() {
        let err = EngineBuilder::<RecordingBuilder>::new().build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: engine class file version is not configured"
        );

        let err = Engine::<RecordingBuilder>::builder()
            .class_file_version(ClassFileVersion::JAVA_V8)
            .entry_point(RecordingBuilder::entry_point)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("type pool"));
    }

    #[test]
    fn empty_plugin_list_is_configured() {
        let engine = complete()
            .plugins(Vec::<Arc<dyn Plugin<RecordingBuilder>>>::new())
            .build()
            .unwrap();
        assert!(engine.plugins().is_empty());
    }

    #[test]
    fn configure_maps_engine_section() {
        let config = EngineConfig {
            class_file_version: "1.8".into(),
            fail_fast: true,
            notify_on_abort: false,
            fail_on_live_initializer: false,
            ..EngineConfig::default()
        };
        let builder = EngineBuilder::<RecordingBuilder>::new().configure(&config).unwrap();
        assert_eq!(builder.class_file_version, Some(ClassFileVersion::JAVA_V8));
        assert_eq!(
            builder.failure_policy,
            Some(FailurePolicy::FailFast {
                notify_listener: false
            })
        );
        assert_eq!(builder.initializer_policy, Some(InitializerPolicy::Permit));
    }

    #[test]
    fn configure_rejects_bad_version() {
        let config = EngineConfig {
            class_file_version: "seventeen".into(),
            ..EngineConfig::default()
        };
        assert!(Engine::<RecordingBuilder>::from_config(&config).is_err());
    }

    #[test]
    fn report_tallies_outcomes() {
        let mut report = RunReport::default();
        report.record(Outcome::Success);
        report.record(Outcome::Failed);
        report.record(Outcome::Unresolved);
        assert_eq!(report.total(), 3);
        assert!(report.has_failures());
        assert_eq!(
            report.to_string(),
            "1 transformed, 0 ignored, 1 failed, 1 unresolved"
        );
    }

    #[test]
    fn panic_payloads_become_messages() {
        let err = contained::<()>("p", || panic!("boom")).unwrap_err();
        assert_eq!(err.to_string(), "plugin `p` panicked: boom");

        let err = contained::<()>("p", || panic!("{} {}", "formatted", 1)).unwrap_err();
        assert_eq!(err.to_string(), "plugin `p` panicked: formatted 1");
    }

    #[test]
    fn guard_closes_once_when_dropped() {
        let source = MockSource::new(&["Foo"]);
        let log = source.log();
        drop(SourceGuard::new(source));
        assert_eq!(MockSource::read(&log).close_count, 1);

        let source = MockSource::new(&["Foo"]);
        let log = source.log();
        SourceGuard::new(source).close().unwrap();
        assert_eq!(MockSource::read(&log).close_count, 1);
    }

    #[test]
    #[traced_test]
    fn run_lifecycle_is_logged() {
        let engine = complete().build().unwrap();
        engine.apply(MockSource::new(&["Foo", "Bar"])).unwrap();
        assert!(logs_contain("engine.run.start"));
        assert!(logs_contain("outcome=success"));
        assert!(logs_contain("outcome=unresolved"));
        assert!(logs_contain("engine.run.complete"));
    }

    #[test]
    #[traced_test]
    fn aborted_run_is_logged() {
        let engine = complete()
            .plugins([Arc::new(MockPlugin::matching_all("broken").failing("nope"))
                as Arc<dyn Plugin<RecordingBuilder>>])
            .failure_policy(FailurePolicy::FailFast {
                notify_listener: true,
            })
            .build()
            .unwrap();
        assert!(engine.apply(MockSource::new(&["Foo"])).is_err());
        assert!(logs_contain("plugin failed"));
        assert!(logs_contain("engine.run.aborted"));
        assert!(!logs_contain("engine.run.complete"));
    }
}
