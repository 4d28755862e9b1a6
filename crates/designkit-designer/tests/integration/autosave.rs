use std::sync::Arc;
use std::time::Duration;

use designkit_core::{AppEvent, EventBus, EventCategory, EventFilter, PersistenceError, SaveEvent};
use designkit_designer::{
    ApiOperation, AutoSaveConfig, AutoSaveHandle, AutoSaveScheduler, CanvasDefaults, CanvasElement,
    CanvasSettings, Customizations, DesignerCommand, DesignerState, DocumentApi, DocumentDraft,
    DocumentSaver, EditorStore, ElementPatch, InMemoryDocumentApi, SessionConfig, ShapeContent,
    ShapeKind,
};
use parking_lot::Mutex;
use tokio::time::sleep;

const INTERVAL: Duration = Duration::from_millis(1000);

fn config() -> SessionConfig {
    SessionConfig::new(CanvasSettings::from(CanvasDefaults::banner()), 100)
}

/// A store hydrated from a document that already exists in `api`.
async fn saved_session(api: &InMemoryDocumentApi) -> Arc<EditorStore> {
    let draft = DocumentDraft::new(
        "Banner",
        Customizations::new(CanvasSettings::from(CanvasDefaults::banner()), Vec::new()),
    );
    let doc = api.create_document(draft).await.unwrap();
    EditorStore::new(
        DesignerState::from_document(doc, config()),
        Arc::new(EventBus::new()),
    )
}

fn add(store: &EditorStore, id: &str) {
    store.dispatch(DesignerCommand::AddElement(CanvasElement::shape(
        id,
        0.0,
        0.0,
        10.0,
        10.0,
        ShapeContent::new(ShapeKind::Rectangle, "#000000"),
    )));
}

fn nudge(store: &EditorStore, id: &str, x: f64) {
    store.dispatch(DesignerCommand::update(id, ElementPatch::position(x, 0.0)));
}

fn spawn(store: &Arc<EditorStore>, api: &Arc<InMemoryDocumentApi>) -> AutoSaveHandle {
    let saver = Arc::new(DocumentSaver::new(store.clone(), api.clone()));
    AutoSaveScheduler::spawn(
        saver,
        AutoSaveConfig {
            enabled: true,
            interval: INTERVAL,
        },
    )
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_edits_saves_once() {
    let api = Arc::new(InMemoryDocumentApi::new());
    let store = saved_session(&api).await;
    let _handle = spawn(&store, &api);

    add(&store, "s1");
    for step in 1..=4 {
        sleep(Duration::from_millis(400)).await;
        nudge(&store, "s1", step as f64 * 10.0);
    }
    // 1.6s since the first edit, 0 since the last
    assert_eq!(api.calls(ApiOperation::Update), 0);
    assert!(store.is_dirty());

    let issued = chrono::Utc::now();
    sleep(Duration::from_millis(1100)).await;
    assert_eq!(api.calls(ApiOperation::Update), 1);
    assert!(!store.is_dirty());
    let last_saved = store.read(|s| s.last_saved()).unwrap();
    assert!(last_saved >= issued);
    assert!(last_saved <= chrono::Utc::now());

    let id = store.read(|s| s.document_id().map(str::to_string)).unwrap();
    let stored = api.get(&id).unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.customizations.elements[0].x, 40.0);
    assert_eq!(store.read(|s| s.document_version()), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_clean_session_never_saves() {
    let api = Arc::new(InMemoryDocumentApi::new());
    let store = saved_session(&api).await;
    let _handle = spawn(&store, &api);

    // Preview toggles are not edits
    store.dispatch(DesignerCommand::SetPreviewMode(true));
    sleep(Duration::from_secs(10)).await;
    assert_eq!(api.calls(ApiOperation::Update), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_save_waits_for_next_edit() {
    let api = Arc::new(InMemoryDocumentApi::new());
    let store = saved_session(&api).await;
    let failures = Arc::new(Mutex::new(0usize));
    let sink = failures.clone();
    store.events().subscribe(
        EventFilter::Categories(vec![EventCategory::Save]),
        move |event| {
            if let AppEvent::Save(SaveEvent::Failed { .. }) = event {
                *sink.lock() += 1;
            }
        },
    );
    api.fail(
        ApiOperation::Update,
        PersistenceError::RequestFailed {
            reason: "offline".to_string(),
        },
    );
    let _handle = spawn(&store, &api);

    add(&store, "s1");
    sleep(Duration::from_millis(1100)).await;
    assert_eq!(api.calls(ApiOperation::Update), 1);
    assert_eq!(*failures.lock(), 1);
    assert!(store.is_dirty());

    // No retry loop while nothing changes
    sleep(Duration::from_secs(30)).await;
    assert_eq!(api.calls(ApiOperation::Update), 1);

    api.clear_failure(ApiOperation::Update);
    nudge(&store, "s1", 5.0);
    sleep(Duration::from_millis(1100)).await;
    assert_eq!(api.calls(ApiOperation::Update), 2);
    assert!(!store.is_dirty());
}

#[tokio::test(start_paused = true)]
async fn test_edit_during_save_stays_dirty() {
    let api = Arc::new(InMemoryDocumentApi::new().with_latency(Duration::from_millis(300)));
    let store = saved_session(&api).await;
    let _handle = spawn(&store, &api);

    add(&store, "s1");
    // Save starts at 1000ms and answers at 1300ms
    sleep(Duration::from_millis(1100)).await;
    assert_eq!(api.calls(ApiOperation::Update), 1);
    nudge(&store, "s1", 25.0);

    sleep(Duration::from_millis(300)).await;
    assert!(store.is_dirty());
    assert_eq!(store.read(|s| s.document_version()), Some(2));

    // The newer edit goes out on the next quiet interval
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(api.calls(ApiOperation::Update), 2);
    assert!(!store.is_dirty());
    let id = store.read(|s| s.document_id().map(str::to_string)).unwrap();
    assert_eq!(api.get(&id).unwrap().customizations.elements[0].x, 25.0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_timer() {
    let api = Arc::new(InMemoryDocumentApi::new());
    let store = saved_session(&api).await;
    let mut handle = spawn(&store, &api);
    assert!(handle.is_running());

    add(&store, "s1");
    handle.shutdown();
    sleep(Duration::from_secs(5)).await;
    assert_eq!(api.calls(ApiOperation::Update), 0);
    assert!(!handle.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_disabled_scheduler_does_nothing() {
    let api = Arc::new(InMemoryDocumentApi::new());
    let store = saved_session(&api).await;
    let saver = Arc::new(DocumentSaver::new(store.clone(), api.clone()));
    let handle = AutoSaveScheduler::spawn(
        saver,
        AutoSaveConfig {
            enabled: false,
            interval: INTERVAL,
        },
    );
    assert!(!handle.is_running());

    add(&store, "s1");
    sleep(Duration::from_secs(5)).await;
    assert_eq!(api.calls(ApiOperation::Update), 0);
}
