use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use initflow::{
    configure, configure_with, ActionRegistry, InitializerError, InitializerPipeline,
    ManifestLoader, PipelineOptions,
};

/// A minimal key/value application handle, standing in for whatever object
/// the caller is configuring.
#[derive(Debug, Default)]
struct TestApp {
    values: Mutex<HashMap<String, i64>>,
}

impl TestApp {
    fn set(&self, key: &str, value: i64) {
        self.values.lock().unwrap().insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<i64> {
        self.values.lock().unwrap().get(key).copied()
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// The actions the happy fixtures reference by name.
fn happy_registry() -> ActionRegistry<TestApp> {
    let mut registry = ActionRegistry::new();
    for (key, field, value) in [
        ("set-one", "one", 1),
        ("set-two", "two", 2),
        ("set-three", "three", 3),
        ("set-four", "four", 4),
        ("set-unnamed", "unnamed", 0),
    ] {
        registry.register_fn(key, move |app: Arc<TestApp>| async move {
            app.set(field, value);
            Ok(())
        });
    }
    registry
}

fn happy_pipeline() -> InitializerPipeline<TestApp> {
    InitializerPipeline::with_registry(PipelineOptions::new(fixture("happy")), happy_registry())
}

#[tokio::test]
async fn can_get_initializers() {
    let initializers = happy_pipeline().get_initializers().await.unwrap();
    assert_eq!(initializers.len(), 5);
}

#[tokio::test]
async fn can_sort_initializers() {
    let pipeline = happy_pipeline();
    let initializers = pipeline.get_initializers().await.unwrap();
    let sorted = pipeline.sort_initializers(initializers).unwrap();

    assert_eq!(sorted.len(), 4);

    // Batch 0 holds both no-dependency records: "one" and the unnamed one.
    let first: HashSet<_> = sorted[0].iter().map(|i| i.name().to_string()).collect();
    assert_eq!(first, HashSet::from(["one".to_string(), String::new()]));

    assert_eq!(sorted[1][0].name(), "two");
    assert_eq!(sorted[2][0].name(), "three");
    assert_eq!(sorted[3][0].name(), "four");
}

#[tokio::test]
async fn can_run_initializers() {
    let pipeline = happy_pipeline();
    let initializers = pipeline.get_initializers().await.unwrap();
    let sorted = pipeline.sort_initializers(initializers).unwrap();

    let app = Arc::new(TestApp::default());
    pipeline
        .run_initializers(&sorted, Arc::clone(&app))
        .await
        .unwrap();

    assert_eq!(app.get("unnamed"), Some(0));
    assert_eq!(app.get("one"), Some(1));
    assert_eq!(app.get("two"), Some(2));
    assert_eq!(app.get("three"), Some(3));
    assert_eq!(app.get("four"), Some(4));
    assert_eq!(app.get("five"), None);
}

#[tokio::test]
async fn can_configure_an_app() {
    let app = Arc::new(TestApp::default());
    let app = configure(
        app,
        ManifestLoader::new(happy_registry()),
        PipelineOptions::new(fixture("happy")),
    )
    .await
    .unwrap();

    assert_eq!(app.get("one"), Some(1));
    assert_eq!(app.get("four"), Some(4));
    assert_eq!(app.get("five"), None);
}

#[tokio::test]
async fn completion_hook_fires_exactly_once_on_success() {
    let calls = AtomicUsize::new(0);
    let app = Arc::new(TestApp::default());

    let result = configure_with(
        app,
        ManifestLoader::new(happy_registry()),
        PipelineOptions::new(fixture("happy")),
        |outcome| {
            calls.fetch_add(1, Ordering::SeqCst);
            assert!(outcome.is_ok());
        },
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn completion_hook_fires_exactly_once_on_failure() {
    let calls = AtomicUsize::new(0);
    let app = Arc::new(TestApp::default());

    // No actions registered, so the fixtures resolve to no configure action.
    let result = configure_with(
        app,
        ManifestLoader::new(ActionRegistry::new()),
        PipelineOptions::new(fixture("missing")),
        |outcome| {
            calls.fetch_add(1, Ordering::SeqCst);
            assert!(outcome.is_err());
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(InitializerError::MissingConfigure { .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn record_without_action_fails_naming_its_file() {
    let pipeline = InitializerPipeline::with_registry(
        PipelineOptions::new(fixture("missing")),
        ActionRegistry::new(),
    );

    let app = Arc::new(TestApp::default());
    let err = pipeline.configure_app(Arc::clone(&app)).await.unwrap_err();

    match err {
        InitializerError::MissingConfigure { file } => assert_eq!(file, "no-action.toml"),
        other => panic!("expected MissingConfigure, got {other:?}"),
    }
}

#[tokio::test]
async fn failing_action_surfaces_through_the_whole_pipeline() {
    let mut registry = happy_registry();
    // Shadow "set-two" with a failing action; batches 0 ran, 2+ must not.
    registry.register_fn("set-two", |_app: Arc<TestApp>| async {
        Err("boom".into())
    });

    let app = Arc::new(TestApp::default());
    let err = configure(
        Arc::clone(&app),
        ManifestLoader::new(registry),
        PipelineOptions::new(fixture("happy")),
    )
    .await
    .unwrap_err();

    match err {
        InitializerError::Configure { initializer, source } => {
            assert_eq!(initializer, "two");
            assert_eq!(source.to_string(), "boom");
        }
        other => panic!("expected Configure, got {other:?}"),
    }

    // Only the batch before the failure mutated the app.
    assert_eq!(app.get("one"), Some(1));
    assert_eq!(app.get("unnamed"), Some(0));
    assert_eq!(app.get("three"), None);
    assert_eq!(app.get("four"), None);
}

#[tokio::test]
async fn nonexistent_directory_configures_nothing() {
    let app = Arc::new(TestApp::default());
    let app = configure(
        app,
        ManifestLoader::new(happy_registry()),
        PipelineOptions::new(fixture("does-not-exist")),
    )
    .await
    .unwrap();

    assert!(app.values.lock().unwrap().is_empty());
}

#[test]
fn options_default_to_initializers_directory_and_toml_manifests() {
    let options = PipelineOptions::default();
    assert_eq!(options.directory, PathBuf::from("initializers"));
    assert_eq!(options.file_match, "**/*.toml");
}

#[tokio::test]
async fn file_match_narrows_discovery() {
    let pipeline = InitializerPipeline::with_registry(
        PipelineOptions::new(fixture("happy")).file_match("one.toml"),
        happy_registry(),
    );

    let initializers = pipeline.get_initializers().await.unwrap();
    assert_eq!(initializers.len(), 1);
    assert_eq!(initializers[0].name(), "one");
}
