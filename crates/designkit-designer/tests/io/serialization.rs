use designkit_designer::{
    CanvasDefaults, CanvasElement, CanvasSettings, CanvasSettingsPatch, DesignFile,
    DesignerCommand, DesignerState, ImageContent, ImageFit, SessionConfig, ShapeContent,
    ShapeKind, TextContent, FILE_FORMAT_VERSION,
};
use serde_json::json;
use tempfile::TempDir;

fn session() -> DesignerState {
    DesignerState::new(SessionConfig::new(
        CanvasSettings::from(CanvasDefaults::banner()),
        100,
    ))
}

fn populated() -> DesignerState {
    let mut s = session();
    s.dispatch(DesignerCommand::AddElement(
        CanvasElement::text("t1", 10.0, 10.0, 200.0, 30.0, TextContent::new("Hello"))
            .with_rotation(370.0),
    ));
    s.dispatch(DesignerCommand::AddElement(
        CanvasElement::image(
            "i1",
            300.0,
            0.0,
            50.0,
            50.0,
            ImageContent {
                fit: ImageFit::Contain,
                alt: Some("logo".to_string()),
            },
        )
        .with_media("m-1", "https://cdn.example/logo.png"),
    ));
    s.dispatch(DesignerCommand::AddElement(CanvasElement::shape(
        "s1",
        400.0,
        5.0,
        40.0,
        40.0,
        ShapeContent::new(ShapeKind::Triangle, "#123456"),
    )));
    s.dispatch(DesignerCommand::UpdateCanvasSettings(CanvasSettingsPatch {
        background_color: Some("#fafafa".to_string()),
        show_grid: Some(true),
        zoom: Some(3.0),
        ..Default::default()
    }));
    s
}

#[test]
fn test_save_and_load_design_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("banner.json");

    let original = populated();
    original.save_to_file(&path).unwrap();

    let mut loaded = session();
    loaded.load_from_file(&path).unwrap();

    assert_eq!(loaded.elements(), original.elements());
    assert_eq!(loaded.canvas().background_color, "#fafafa");
    assert!(loaded.canvas().show_grid);
    // Zoom is editor state and stays with the session
    assert_eq!(loaded.canvas().zoom, 1.0);
    assert!(loaded.is_dirty());
    assert!(!loaded.can_undo());
    assert_eq!(loaded.selected_id(), None);
    assert_eq!(loaded.element("t1").unwrap().rotation, 370.0);
}

#[test]
fn test_file_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("banner.json");
    populated().save_to_file(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["version"], FILE_FORMAT_VERSION);
    assert_eq!(value["customizations"]["width"], 190.0);
    assert_eq!(value["customizations"]["backgroundColor"], "#fafafa");
    assert_eq!(value["customizations"]["showGrid"], true);
    assert!(value["customizations"].get("zoom").is_none());

    let elements = value["customizations"]["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[1]["type"], "image");
    assert_eq!(elements[1]["mediaId"], "m-1");
    assert_eq!(elements[2]["shapeType"], "triangle");
}

#[test]
fn test_unknown_properties_survive() {
    let raw = json!({
        "version": "1.0",
        "metadata": {
            "name": "legacy",
            "created": "2024-01-01T00:00:00Z",
            "modified": "2024-01-02T00:00:00Z"
        },
        "customizations": {
            "width": 100.0,
            "height": 50.0,
            "elements": [{
                "id": "t1",
                "type": "text",
                "x": 1.0, "y": 2.0, "width": 30.0, "height": 10.0,
                "content": "Hi",
                "fontWeight": "bold",
                "properties": { "shadow": { "blur": 4 } }
            }]
        }
    });
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.json");
    std::fs::write(&path, raw.to_string()).unwrap();

    let file = DesignFile::load_from_file(&path).unwrap();
    let element = &file.customizations.elements[0];
    assert_eq!(element.as_text().unwrap().font_weight, 700);
    assert_eq!(element.properties.extra["shadow"]["blur"], 4);
    assert_eq!(file.customizations.canvas.background_color, "#ffffff");

    let out = dir.path().join("out.json");
    file.save_to_file(&out).unwrap();
    let again = DesignFile::load_from_file(&out).unwrap();
    assert_eq!(again, file);
}

#[test]
fn test_load_errors_leave_state_untouched() {
    let dir = TempDir::new().unwrap();
    let mut s = populated();
    let before = s.clone();

    assert!(s.load_from_file(dir.path().join("missing.json")).is_err());

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    let err = s.load_from_file(&bad).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse design file"));
    assert_eq!(s, before);
}
