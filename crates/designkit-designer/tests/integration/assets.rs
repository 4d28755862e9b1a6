use std::sync::Arc;
use std::time::Duration;

use designkit_core::{AppEvent, AssetError, AssetEvent, EventBus, EventCategory, EventFilter};
use designkit_designer::{
    ApiOperation, ArtworkMeta, AssetStatus, AssetStatusRegistry, AssetUploader, CanvasDefaults,
    CanvasElement, CanvasSettings, DesignerCommand, DesignerState, EditorStore, ImageContent,
    InMemoryDocumentApi, SessionConfig, TextContent,
};
use parking_lot::Mutex;

fn store() -> Arc<EditorStore> {
    let mut state = DesignerState::new(SessionConfig::new(
        CanvasSettings::from(CanvasDefaults::banner()),
        100,
    ));
    state.dispatch(DesignerCommand::AddElement(CanvasElement::image(
        "img1",
        20.0,
        5.0,
        40.0,
        40.0,
        ImageContent::default(),
    )));
    state.dispatch(DesignerCommand::AddElement(CanvasElement::text(
        "t1",
        100.0,
        5.0,
        100.0,
        20.0,
        TextContent::new("Caption"),
    )));
    EditorStore::new(state, Arc::new(EventBus::new()))
}

fn record_assets(store: &EditorStore) -> Arc<Mutex<Vec<AssetEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.events().subscribe(
        EventFilter::Categories(vec![EventCategory::Asset]),
        move |event| {
            if let AppEvent::Asset(e) = event {
                sink.lock().push(e);
            }
        },
    );
    seen
}

fn png_meta() -> ArtworkMeta {
    ArtworkMeta::new("logo.png", "image/png")
}

#[tokio::test]
async fn test_upload_attaches_media() {
    let store = store();
    let api = Arc::new(InMemoryDocumentApi::new());
    let seen = record_assets(&store);
    let uploader = AssetUploader::new(store.clone(), api.clone());

    let registry = AssetStatusRegistry::new();
    assert_eq!(
        store.read(|s| registry.status_of(s.element("img1").unwrap())),
        AssetStatus::Pending
    );

    let uploaded = uploader
        .upload_for_element("img1", vec![1, 2, 3], png_meta())
        .await
        .unwrap();

    let element = store.read(|s| s.element("img1").cloned()).unwrap();
    assert_eq!(element.media_id.as_deref(), Some(uploaded.media_id.as_str()));
    assert_eq!(element.url.as_deref(), Some(uploaded.url.as_str()));
    assert_eq!(registry.status_of(&element), AssetStatus::Loaded);
    assert_eq!(api.media(&uploaded.media_id), Some(vec![1, 2, 3]));
    assert!(store.is_dirty());
    assert!(matches!(
        seen.lock().as_slice(),
        [AssetEvent::Attached { element_id, .. }] if element_id == "img1"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_upload_after_delete_is_discarded() {
    let store = store();
    let api = Arc::new(InMemoryDocumentApi::new().with_latency(Duration::from_millis(500)));
    let seen = record_assets(&store);
    let uploader = AssetUploader::new(store.clone(), api.clone());

    let pending = tokio::spawn({
        let uploader = Arc::new(uploader);
        async move {
            uploader
                .upload_for_element("img1", vec![9; 16], png_meta())
                .await
        }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(store.dispatch(DesignerCommand::delete("img1")));
    let revision = store.revision();

    let err = pending.await.unwrap().unwrap_err();
    assert_eq!(
        err,
        AssetError::ElementGone {
            element_id: "img1".to_string()
        }
    );
    // Nothing was written back
    assert_eq!(store.revision(), revision);
    assert!(store.read(|s| s.element("img1").is_none()));
    assert!(matches!(
        seen.lock().as_slice(),
        [AssetEvent::Discarded { element_id }] if element_id == "img1"
    ));
    assert_eq!(api.calls(ApiOperation::Upload), 1);
}

#[tokio::test]
async fn test_upload_rejections() {
    let store = store();
    let api = Arc::new(InMemoryDocumentApi::new());
    let uploader = AssetUploader::new(store.clone(), api.clone());

    assert_eq!(
        uploader
            .upload_for_element("img1", Vec::new(), png_meta())
            .await
            .unwrap_err(),
        AssetError::EmptyPayload
    );
    assert!(matches!(
        uploader
            .upload_for_element("t1", vec![1], png_meta())
            .await
            .unwrap_err(),
        AssetError::NotAnImage { .. }
    ));
    assert!(matches!(
        uploader
            .upload_for_element("nope", vec![1], png_meta())
            .await
            .unwrap_err(),
        AssetError::ElementGone { .. }
    ));
    assert_eq!(api.calls(ApiOperation::Upload), 0);
}

#[test]
fn test_failed_media_reported_once() {
    let bus = Arc::new(EventBus::new());
    let count = Arc::new(Mutex::new(0usize));
    let sink = count.clone();
    bus.subscribe(EventFilter::Categories(vec![EventCategory::Asset]), move |_| {
        *sink.lock() += 1;
    });
    let registry = AssetStatusRegistry::with_events(bus);

    let element = CanvasElement::image("i", 0.0, 0.0, 5.0, 5.0, ImageContent::default())
        .with_media("m", "https://cdn.example/missing.png");
    assert_eq!(registry.status_of(&element), AssetStatus::Loaded);

    assert!(registry.mark_failed("https://cdn.example/missing.png"));
    assert!(!registry.mark_failed("https://cdn.example/missing.png"));
    assert_eq!(registry.status_of(&element), AssetStatus::Failed);
    assert_eq!(*count.lock(), 1);

    registry.mark_loaded("https://cdn.example/missing.png");
    assert_eq!(registry.status_of(&element), AssetStatus::Loaded);
}
