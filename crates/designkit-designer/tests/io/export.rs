use std::sync::Arc;

use designkit_core::{AppEvent, EventBus, EventCategory, EventFilter, ExportError, ExportEvent};
use designkit_designer::{
    CanvasDefaults, CanvasElement, CanvasSettings, DesignerCommand, DesignerState,
    DocumentSaver, EditorStore, ExportFormat, ExportOptions, ExportResult, Exporter,
    InMemoryDocumentApi, PreviewScale, PreviewScales, RemoteExport, SessionConfig, ShapeContent,
    ShapeKind,
};
use parking_lot::Mutex;

fn store_with_shape() -> Arc<EditorStore> {
    let mut state = DesignerState::new(SessionConfig::new(
        CanvasSettings::from(CanvasDefaults::banner()),
        100,
    ));
    state.dispatch(DesignerCommand::AddElement(CanvasElement::shape(
        "s1",
        10.0,
        10.0,
        30.0,
        30.0,
        ShapeContent::new(ShapeKind::Circle, "#ff0000"),
    )));
    EditorStore::new(state, Arc::new(EventBus::new()))
}

fn record_exports(store: &EditorStore) -> Arc<Mutex<Vec<ExportEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.events().subscribe(
        EventFilter::Categories(vec![EventCategory::Export]),
        move |event| {
            if let AppEvent::Export(e) = event {
                sink.lock().push(e);
            }
        },
    );
    seen
}

#[tokio::test]
async fn test_svg_export() {
    let store = store_with_shape();
    let exporter = Exporter::new(store.clone(), PreviewScales::STANDARD);
    let seen = record_exports(&store);

    let result = exporter
        .export(&ExportOptions::new(ExportFormat::Svg).with_dpi(96.0))
        .await
        .unwrap();
    let ExportResult::Local(out) = result else {
        panic!("expected local output");
    };
    let svg = String::from_utf8(out.bytes.clone()).unwrap();
    assert!(svg.contains(r#"<g id="s1""#));
    assert!(svg.contains("<ellipse"));
    assert_eq!(out.mime, "image/svg+xml");
    assert_eq!(out.file_name("banner"), "banner.svg");

    let events = seen.lock();
    assert!(matches!(
        events.as_slice(),
        [ExportEvent::Completed { format, .. }] if format == "SVG"
    ));
}

#[tokio::test]
async fn test_png_export_at_dpi() {
    let store = store_with_shape();
    let exporter = Exporter::new(store, PreviewScales::STANDARD);

    let result = exporter
        .export(&ExportOptions::new(ExportFormat::Png).with_dpi(150.0))
        .await
        .unwrap();
    let ExportResult::Local(out) = result else {
        panic!("expected local output");
    };
    let decoded = image::load_from_memory(&out.bytes).unwrap();
    let layout = exporter.layout(PreviewScale::Dpi(150.0));
    assert_eq!(
        (decoded.width(), decoded.height()),
        layout.pixel_size().unwrap()
    );
    assert!(out.to_data_url().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_pdf_needs_collaborator() {
    let store = store_with_shape();
    let exporter = Exporter::new(store.clone(), PreviewScales::STANDARD);
    let seen = record_exports(&store);

    let err = exporter
        .export(&ExportOptions::new(ExportFormat::Pdf))
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::UnsupportedFormat { .. }));
    assert!(matches!(
        seen.lock().as_slice(),
        [ExportEvent::Failed { .. }]
    ));
}

#[tokio::test]
async fn test_pdf_through_collaborator() {
    let store = store_with_shape();
    let api = Arc::new(InMemoryDocumentApi::new());
    let exporter = Exporter::new(store.clone(), PreviewScales::STANDARD).with_api(api.clone());

    // Unsaved designs have nothing to export remotely
    let err = exporter
        .export(&ExportOptions::new(ExportFormat::Pdf))
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::RemoteFailed { .. }));

    let saver = DocumentSaver::new(store.clone(), api.clone());
    saver.save_now("Banner").await.unwrap();
    let id = store.read(|s| s.document_id().map(str::to_string)).unwrap();

    let result = exporter
        .export(&ExportOptions::new(ExportFormat::Pdf))
        .await
        .unwrap();
    assert_eq!(
        result,
        ExportResult::Remote(RemoteExport::Url(format!("memory://exports/{id}.pdf")))
    );
}

#[test]
fn test_print_preview_layout_diverges() {
    let store = store_with_shape();
    let exporter = Exporter::new(store, PreviewScales::HALF_PRINT_PREVIEW);
    let editor = exporter.layout(PreviewScale::Editor);
    let preview = exporter.print_preview();
    assert!((preview.width - editor.width / 2.0).abs() < 1e-9);
    assert_eq!(preview.items[0].width, editor.items[0].width / 2.0);
}
