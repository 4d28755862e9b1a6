use designkit_designer::{
    reduce, CanvasDefaults, CanvasElement, CanvasSettings, CanvasSettingsPatch, DesignerCommand,
    DesignerError, DesignerState, ElementPatch, SessionConfig, ShapeContent, ShapeKind,
    TextContent,
};
use designkit_core::{mm_to_px, normalize_rotation};

fn banner() -> DesignerState {
    DesignerState::new(SessionConfig::new(
        CanvasSettings::from(CanvasDefaults::banner()),
        100,
    ))
}

fn text1() -> CanvasElement {
    CanvasElement::text("text1", 10.0, 10.0, 120.0, 30.0, TextContent::new("Hello"))
}

fn shape1() -> CanvasElement {
    CanvasElement::shape(
        "shape1",
        200.0,
        5.0,
        40.0,
        40.0,
        ShapeContent::new(ShapeKind::Circle, "#ff8800"),
    )
}

fn ids(state: &DesignerState) -> Vec<&str> {
    state.elements().iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn test_banner_pixel_width() {
    let s = banner();
    let (w, h) = s.canvas().size_px(designkit_core::PX_PER_MM);
    assert!((w - 718.11).abs() < 0.01);
    assert!((w - mm_to_px(190.0)).abs() < 1e-9);
    assert!((h - 56.69).abs() < 0.01);
}

#[test]
fn test_undo_scenario() {
    let mut s = banner();
    s.dispatch(DesignerCommand::AddElement(text1()));
    s.dispatch(DesignerCommand::AddElement(shape1()));
    s.dispatch(DesignerCommand::delete("text1"));
    assert_eq!(ids(&s), vec!["shape1"]);

    assert!(s.dispatch(DesignerCommand::Undo));
    assert_eq!(ids(&s), vec!["text1", "shape1"]);

    assert!(s.dispatch(DesignerCommand::Undo));
    assert_eq!(ids(&s), vec!["text1"]);

    // The first add is undoable too
    assert!(s.dispatch(DesignerCommand::Undo));
    assert!(s.elements().is_empty());
    assert!(!s.can_undo());

    let before = s.clone();
    assert!(!s.dispatch(DesignerCommand::Undo));
    assert_eq!(s, before);
    assert_eq!(
        s.try_apply(DesignerCommand::Undo),
        Err(DesignerError::NothingToUndo)
    );
}

#[test]
fn test_update_unknown_id_is_noop() {
    let mut s = banner();
    s.dispatch(DesignerCommand::AddElement(text1()));
    s.dispatch(DesignerCommand::select("text1"));
    let before = s.clone();

    let applied = s.dispatch(DesignerCommand::update(
        "missing",
        ElementPatch::position(1.0, 1.0),
    ));
    assert!(!applied);
    assert_eq!(s.elements(), before.elements());
    assert_eq!(s.selected_id(), Some("text1"));
    assert_eq!(s.history().undo_depth(), before.history().undo_depth());
    assert_eq!(s.revision(), before.revision());
}

#[test]
fn test_update_merges_into_selection() {
    let mut s = banner();
    s.dispatch(DesignerCommand::AddElement(text1()));
    s.dispatch(DesignerCommand::update(
        "text1",
        ElementPatch::new().with_content("Bye").with_color("#ff0000"),
    ));
    let selected = s.selected_element().unwrap();
    let text = selected.as_text().unwrap();
    assert_eq!(text.content, "Bye");
    assert_eq!(text.color, "#ff0000");
    // Updates are not structural
    assert_eq!(s.history().undo_depth(), 1);
}

#[test]
fn test_rotation_stored_as_given() {
    let mut s = banner();
    let t1 = CanvasElement::text("t1", 100.0, 100.0, 200.0, 40.0, TextContent::new("Spin"))
        .with_rotation(370.0);
    s.dispatch(DesignerCommand::AddElement(t1));

    let stored = s.element("t1").unwrap();
    assert_eq!(stored.rotation, 370.0);
    assert_eq!(normalize_rotation(stored.rotation), 10.0);

    let json = serde_json::to_value(stored).unwrap();
    assert_eq!(json["type"], "text");
    assert_eq!(json["rotation"], 370.0);
}

#[test]
fn test_canvas_settings_not_in_history() {
    let mut s = banner();
    s.dispatch(DesignerCommand::AddElement(text1()));
    s.dispatch(DesignerCommand::UpdateCanvasSettings(
        CanvasSettingsPatch::background("#000000"),
    ));
    assert_eq!(s.canvas().background_color, "#000000");

    s.dispatch(DesignerCommand::Undo);
    assert!(s.elements().is_empty());
    assert_eq!(s.canvas().background_color, "#000000");
}

#[test]
fn test_z_index_assignment_and_reorder() {
    let mut s = banner();
    s.dispatch(DesignerCommand::AddElement(text1()));
    s.dispatch(DesignerCommand::AddElement(shape1()));
    assert_eq!(s.element("text1").unwrap().z_index, Some(0));
    assert_eq!(s.element("shape1").unwrap().z_index, Some(1));

    s.dispatch(DesignerCommand::BringToFront("text1".to_string()));
    assert_eq!(s.element("text1").unwrap().z_index, Some(2));
    assert_eq!(s.history().undo_depth(), 3);

    // Already on top
    s.dispatch(DesignerCommand::BringToFront("text1".to_string()));
    assert_eq!(s.element("text1").unwrap().z_index, Some(2));
    assert_eq!(s.history().undo_depth(), 3);
}

#[test]
fn test_duplicate_selects_copy() {
    let mut s = banner();
    s.dispatch(DesignerCommand::AddElement(shape1()));
    s.dispatch(DesignerCommand::DuplicateElement {
        id: "shape1".to_string(),
        new_id: "shape2".to_string(),
        offset: (10.0, 10.0),
    });
    let copy = s.element("shape2").unwrap();
    assert_eq!((copy.x, copy.y), (210.0, 15.0));
    assert_eq!(s.selected_id(), Some("shape2"));

    assert_eq!(
        s.try_apply(DesignerCommand::AddElement(shape1())),
        Err(DesignerError::DuplicateId("shape1".to_string()))
    );
}

#[test]
fn test_reduce_matches_dispatch() {
    let commands = vec![
        DesignerCommand::AddElement(text1()),
        DesignerCommand::AddElement(shape1()),
        DesignerCommand::update("shape1", ElementPatch::position(5.0, 5.0)),
        DesignerCommand::SendToBack("shape1".to_string()),
        DesignerCommand::Undo,
        DesignerCommand::Redo,
    ];
    let mut in_place = banner();
    let mut pure = banner();
    for cmd in commands {
        in_place.dispatch(cmd.clone());
        pure = reduce(&pure, cmd);
    }
    assert_eq!(in_place, pure);
}

#[test]
fn test_replace_all_clears_stale_selection() {
    let mut s = banner();
    s.dispatch(DesignerCommand::AddElement(text1()));
    assert_eq!(s.selected_id(), Some("text1"));
    s.dispatch(DesignerCommand::ReplaceAllElements(vec![shape1()]));
    assert_eq!(s.selected_id(), None);
    assert_eq!(ids(&s), vec!["shape1"]);

    s.dispatch(DesignerCommand::Undo);
    assert_eq!(ids(&s), vec!["text1"]);
}
