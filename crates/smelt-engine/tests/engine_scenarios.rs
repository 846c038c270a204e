// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end engine behavior over mock collaborators.

use std::sync::Arc;

use proptest::prelude::*;
use smelt_core::{ClassFileVersion, Plugin, SmeltError};
use smelt_engine::{Engine, EngineBuilder, FailurePolicy, InitializerPolicy, SummaryListener};
use smelt_plugin::{Compound, NoOp};
use smelt_test_utils::{
    ListenerEvent, MockBehavior, MockPlugin, MockSource, RecordingBuilder, RecordingListener,
    StaticTypePool,
};

type DynPlugin = Arc<dyn Plugin<RecordingBuilder>>;

fn engine(known: &[&str], plugins: Vec<DynPlugin>) -> EngineBuilder<RecordingBuilder> {
    Engine::builder()
        .class_file_version(ClassFileVersion::JAVA_V17)
        .entry_point(RecordingBuilder::entry_point)
        .type_pool(StaticTypePool::new(known))
        .plugins(plugins)
        .failure_policy(FailurePolicy::Continue)
        .initializer_policy(InitializerPolicy::Reject)
}

fn dyn_plugin(plugin: &Arc<MockPlugin>) -> DynPlugin {
    Arc::clone(plugin) as DynPlugin
}

#[test]
fn foo_bar_baz_qux() {
    let p1 = Arc::new(MockPlugin::matching("P1", &["Foo", "Qux"]));
    let p2 = Arc::new(MockPlugin::matching("P2", &["Qux"]).failing("cannot weave"));
    let engine = engine(&["Foo", "Baz", "Qux"], vec![dyn_plugin(&p1), dyn_plugin(&p2)])
        .build()
        .unwrap();

    let source = MockSource::new(&["Foo", "Bar", "Baz", "Qux"]);
    let log = source.log();
    let listener = RecordingListener::new();
    let report = engine.apply_with_listener(source, &listener).unwrap();

    assert_eq!(
        listener.events(),
        [
            ListenerEvent::Success("Foo".into()),
            ListenerEvent::Unresolved("Bar".into()),
            ListenerEvent::Ignored("Baz".into()),
            ListenerEvent::PluginFailure {
                target: "Qux".into(),
                plugin: Some("P2".into())
            },
            ListenerEvent::Failure("Qux".into()),
        ]
    );
    assert_eq!((report.transformed, report.unresolved, report.ignored, report.failed), (1, 1, 1, 1));

    let log = MockSource::read(&log);
    assert_eq!(log.replaced_names(), ["Foo"]);
    assert_eq!(log.retained, ["Bar", "Baz", "Qux"]);
    assert_eq!(log.close_count, 1);
    let foo = log.replacement("Foo").unwrap();
    assert_eq!(RecordingBuilder::contributions(foo), ["P1"]);
    assert_eq!(p1.applications(), 2);
    assert_eq!(p2.applications(), 1);
}

#[test]
fn contributions_follow_registration_order_through_nesting() {
    let a = Arc::new(MockPlugin::matching_all("A"));
    let b = Arc::new(MockPlugin::matching_all("B"));
    let c = Arc::new(MockPlugin::matching_all("C"));
    let nested: DynPlugin = Arc::new(Compound::new([dyn_plugin(&a), dyn_plugin(&b)]));
    let engine = engine(&["Foo"], vec![nested, Arc::new(NoOp) as DynPlugin, dyn_plugin(&c)])
        .build()
        .unwrap();
    assert_eq!(engine.plugins().len(), 3);

    let source = MockSource::new(&["Foo"]);
    let log = source.log();
    engine.apply(source).unwrap();

    let log = MockSource::read(&log);
    let artifact = log.replacement("Foo").unwrap();
    assert_eq!(RecordingBuilder::contributions(artifact), ["A", "B", "C"]);
}

#[test]
fn no_matching_plugin_ignores_without_replace() {
    let plugin = Arc::new(MockPlugin::matching("P", &["Other"]));
    let engine = engine(&["Foo"], vec![dyn_plugin(&plugin)]).build().unwrap();

    let source = MockSource::new(&["Foo"]);
    let log = source.log();
    let report = engine.apply(source).unwrap();

    assert_eq!(report.ignored, 1);
    assert_eq!(plugin.applications(), 0);
    let log = MockSource::read(&log);
    assert!(log.replaced.is_empty());
    assert_eq!(log.retained, ["Foo"]);
}

#[test]
fn empty_plugin_list_ignores_everything() {
    let engine = engine(&["Foo", "Bar"], Vec::new()).build().unwrap();
    let report = engine.apply(MockSource::new(&["Foo", "Bar"])).unwrap();
    assert_eq!(report.ignored, 2);
}

#[test]
fn continue_policy_attempts_later_plugins_and_elements() {
    let first = Arc::new(MockPlugin::matching_all("first"));
    let broken = Arc::new(MockPlugin::matching_all("broken").failing("nope"));
    let last = Arc::new(MockPlugin::matching_all("last"));
    let engine = engine(
        &["A", "B"],
        vec![dyn_plugin(&first), dyn_plugin(&broken), dyn_plugin(&last)],
    )
    .build()
    .unwrap();

    let source = MockSource::new(&["A", "B"]);
    let log = source.log();
    let listener = RecordingListener::new();
    let report = engine.apply_with_listener(source, &listener).unwrap();

    assert_eq!(report.failed, 2);
    assert_eq!(last.applications(), 2);
    let failures = listener
        .events()
        .into_iter()
        .filter(|e| matches!(e, ListenerEvent::Failure(_)))
        .count();
    assert_eq!(failures, 2);
    assert!(MockSource::read(&log).replaced.is_empty());
}

#[test]
fn each_failing_plugin_is_reported_once() {
    let one = Arc::new(MockPlugin::matching_all("one").failing("x"));
    let two = Arc::new(MockPlugin::matching_all("two").failing("y"));
    let engine = engine(&["Foo"], vec![dyn_plugin(&one), dyn_plugin(&two)])
        .build()
        .unwrap();

    let listener = RecordingListener::new();
    engine
        .apply_with_listener(MockSource::new(&["Foo"]), &listener)
        .unwrap();
    assert_eq!(
        listener.events(),
        [
            ListenerEvent::PluginFailure {
                target: "Foo".into(),
                plugin: Some("one".into())
            },
            ListenerEvent::PluginFailure {
                target: "Foo".into(),
                plugin: Some("two".into())
            },
            ListenerEvent::Failure("Foo".into()),
        ]
    );
}

#[test]
fn fail_fast_aborts_and_closes_source() {
    let broken = Arc::new(MockPlugin::matching("broken", &["B"]).failing("nope"));
    let engine = engine(&["A", "B", "C"], vec![dyn_plugin(&broken)])
        .failure_policy(FailurePolicy::FailFast {
            notify_listener: true,
        })
        .build()
        .unwrap();

    let source = MockSource::new(&["A", "B", "C"]);
    let log = source.log();
    let listener = RecordingListener::new();
    let err = engine.apply_with_listener(source, &listener).unwrap_err();

    match err {
        SmeltError::Plugin { type_name, source } => {
            assert_eq!(type_name, "B");
            assert_eq!(source.plugin(), Some("broken"));
        }
        other => panic!("expected plugin error, got {other:?}"),
    }
    assert_eq!(
        listener.events(),
        [
            ListenerEvent::Ignored("A".into()),
            ListenerEvent::PluginFailure {
                target: "B".into(),
                plugin: Some("broken".into())
            },
        ]
    );
    let log = MockSource::read(&log);
    assert_eq!(log.yielded, ["A", "B"]);
    assert_eq!(log.close_count, 1);
}

#[test]
fn fail_fast_without_notification_stays_silent() {
    let broken = Arc::new(MockPlugin::matching_all("broken").failing("nope"));
    let engine = engine(&["A"], vec![dyn_plugin(&broken)])
        .failure_policy(FailurePolicy::FailFast {
            notify_listener: false,
        })
        .build()
        .unwrap();

    let listener = RecordingListener::new();
    assert!(engine
        .apply_with_listener(MockSource::new(&["A"]), &listener)
        .is_err());
    assert!(listener.events().is_empty());
}

#[test]
fn panicking_plugin_is_contained() {
    let panicky = Arc::new(MockPlugin::matching_all("panicky").panicking("kaboom"));
    let engine = engine(&["A", "B"], vec![dyn_plugin(&panicky)]).build().unwrap();

    let source = MockSource::new(&["A", "B"]);
    let log = source.log();
    let summary = SummaryListener::new();
    let report = engine.apply_with_listener(source, &summary).unwrap();

    assert_eq!(report.failed, 2);
    let failures = summary.plugin_failures();
    assert_eq!(failures.len(), 2);
    assert!(failures[0].message.contains("panicked: kaboom"));
    assert_eq!(MockSource::read(&log).close_count, 1);
}

#[test]
fn live_initializer_is_rejected_before_replace() {
    let live = Arc::new(
        MockPlugin::matching_all("live")
            .with_behavior(MockBehavior::LiveInitializer("agent hook".into())),
    );
    let engine = engine(&["Foo", "Bar"], vec![dyn_plugin(&live)]).build().unwrap();

    let source = MockSource::new(&["Foo", "Bar"]);
    let log = source.log();
    let err = engine.apply(source).unwrap_err();

    match err {
        SmeltError::LiveInitializer {
            type_name,
            initializer,
        } => {
            assert_eq!(type_name, "Foo$Initializer0");
            assert_eq!(initializer, "agent hook");
        }
        other => panic!("expected live initializer error, got {other:?}"),
    }
    let log = MockSource::read(&log);
    assert!(log.replaced.is_empty());
    assert_eq!(log.yielded, ["Foo"]);
    assert_eq!(log.close_count, 1);
}

#[test]
fn live_initializer_is_committed_when_permitted() {
    let live = Arc::new(
        MockPlugin::matching_all("live")
            .with_behavior(MockBehavior::LiveInitializer("agent hook".into())),
    );
    let engine = engine(&["Foo"], vec![dyn_plugin(&live)])
        .initializer_policy(InitializerPolicy::Permit)
        .build()
        .unwrap();

    let source = MockSource::new(&["Foo"]);
    let log = source.log();
    assert_eq!(engine.apply(source).unwrap().transformed, 1);
    let log = MockSource::read(&log);
    assert!(log.replacement("Foo").unwrap().live_initializer().is_some());
}

#[test]
fn make_failure_aborts_run() {
    let entry = |target: &smelt_core::TypeDescriptor, version: ClassFileVersion| {
        RecordingBuilder::new(target.clone(), version).failing_make("unsupported constant")
    };
    let engine = Engine::builder()
        .class_file_version(ClassFileVersion::JAVA_V8)
        .entry_point(entry)
        .type_pool(StaticTypePool::new(&["Foo"]))
        .plugins([Arc::new(MockPlugin::matching_all("p")) as DynPlugin])
        .failure_policy(FailurePolicy::Continue)
        .initializer_policy(InitializerPolicy::Reject)
        .build()
        .unwrap();

    let source = MockSource::new(&["Foo"]);
    let log = source.log();
    let err = engine.apply(source).unwrap_err();
    assert!(matches!(err, SmeltError::Make { .. }));
    assert_eq!(MockSource::read(&log).close_count, 1);
}

#[test]
fn replace_failure_aborts_run() {
    let engine = engine(&["A", "B"], vec![Arc::new(MockPlugin::matching_all("p")) as DynPlugin])
        .build()
        .unwrap();

    let source = MockSource::new(&["A", "B"]).failing_replace("A");
    let log = source.log();
    let err = engine.apply(source).unwrap_err();
    assert!(matches!(err, SmeltError::Io { .. }));
    let log = MockSource::read(&log);
    assert_eq!(log.yielded, ["A"]);
    assert_eq!(log.close_count, 1);
}

#[test]
fn malformed_element_aborts_run() {
    let engine = engine(&["A", "B"], Vec::new()).build().unwrap();
    let source = MockSource::new(&["A", "B"]).broken_at("B");
    let log = source.log();
    let err = engine.apply(source).unwrap_err();
    assert!(matches!(err, SmeltError::Source(_)));
    assert_eq!(MockSource::read(&log).close_count, 1);
}

#[test]
fn close_failure_after_run_is_reported() {
    let engine = engine(&["A"], Vec::new()).build().unwrap();
    let source = MockSource::new(&["A"]).failing_close();
    let log = source.log();
    assert!(matches!(engine.apply(source), Err(SmeltError::Io { .. })));
    assert_eq!(MockSource::read(&log).close_count, 1);
}

#[test]
fn engine_is_reusable_across_sources() {
    let engine = engine(&["A"], vec![Arc::new(MockPlugin::matching_all("p")) as DynPlugin])
        .build()
        .unwrap();
    assert_eq!(engine.apply(MockSource::new(&["A"])).unwrap().transformed, 1);
    assert_eq!(engine.apply(MockSource::new(&["A"])).unwrap().transformed, 1);
}

fn scenario() -> impl Strategy<Value = (Vec<String>, Vec<String>, Vec<(Vec<String>, bool)>)> {
    let names = prop::collection::vec("[A-F]", 0..8);
    let known = prop::collection::vec("[A-F]", 0..6);
    let plugins = prop::collection::vec((prop::collection::vec("[A-F]", 0..4), any::<bool>()), 0..4);
    (names, known, plugins)
}

proptest! {
    #[test]
    fn every_element_has_exactly_one_outcome((names, known, plugins) in scenario()) {
        let known: Vec<&str> = known.iter().map(String::as_str).collect();
        let plugins: Vec<DynPlugin> = plugins
            .iter()
            .enumerate()
            .map(|(i, (targets, fails))| {
                let targets: Vec<&str> = targets.iter().map(String::as_str).collect();
                let plugin = MockPlugin::matching(&format!("p{i}"), &targets);
                let plugin = if *fails { plugin.failing("scripted") } else { plugin };
                Arc::new(plugin) as DynPlugin
            })
            .collect();
        let engine = engine(&known, plugins).build().unwrap();

        let element_names: Vec<&str> = names.iter().map(String::as_str).collect();
        let source = MockSource::new(&element_names);
        let log = source.log();
        let listener = RecordingListener::new();
        let report = engine.apply_with_listener(source, &listener).unwrap();

        let outcomes = listener
            .events()
            .into_iter()
            .filter(|e| !matches!(e, ListenerEvent::PluginFailure { .. }))
            .count();
        prop_assert_eq!(report.total(), names.len());
        prop_assert_eq!(outcomes, names.len());

        let log = MockSource::read(&log);
        prop_assert_eq!(log.retained.len() + log.replaced.len(), names.len());
        prop_assert_eq!(log.replaced.len(), report.transformed);
        prop_assert_eq!(log.close_count, 1);
    }
}
