use designkit_designer::{
    paint_order, CanvasDefaults, CanvasElement, CanvasSettings, CanvasSettingsPatch,
    DesignerCommand, DesignerState, NodeContent, PreviewScales, RenderContext, Renderer,
    SessionConfig, ShapeContent, ShapeKind, TextContent,
};
use proptest::prelude::*;

fn banner() -> DesignerState {
    DesignerState::new(SessionConfig::new(
        CanvasSettings::from(CanvasDefaults::banner()),
        100,
    ))
}

fn rect(id: String, z: Option<i32>) -> CanvasElement {
    let e = CanvasElement::shape(
        id,
        0.0,
        0.0,
        10.0,
        10.0,
        ShapeContent::new(ShapeKind::Rectangle, "#000000"),
    );
    match z {
        Some(z) => e.with_z_index(z),
        None => e,
    }
}

proptest! {
    #[test]
    fn prop_paint_order_is_stable_sort(zs in prop::collection::vec(prop::option::of(-5i32..5), 0..30)) {
        let elements: Vec<CanvasElement> = zs
            .iter()
            .enumerate()
            .map(|(i, z)| rect(format!("e{i}"), *z))
            .collect();
        let order = paint_order(&elements);

        prop_assert_eq!(order.len(), elements.len());
        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let za = elements[a].effective_z_index(a);
            let zb = elements[b].effective_z_index(b);
            prop_assert!(za < zb || (za == zb && a < b));
        }
    }
}

#[test]
fn test_editor_and_print_preview_sizes() {
    let mut s = banner();
    s.dispatch(DesignerCommand::AddElement(CanvasElement::text(
        "t1",
        100.0,
        10.0,
        200.0,
        30.0,
        TextContent::new("Preview"),
    )));
    let scales = PreviewScales::HALF_PRINT_PREVIEW;

    let editor = Renderer::static_preview().render(&s, &RenderContext::editor(&s, &scales));
    let preview = Renderer::static_preview().render(&s, &RenderContext::print_preview(&scales));

    assert!((editor.width - 718.11).abs() < 0.01);
    assert!((preview.width - editor.width / 2.0).abs() < 1e-9);

    let e = editor.node("t1").unwrap();
    let p = preview.node("t1").unwrap();
    assert_eq!(p.frame.x, e.frame.x / 2.0);
    match (&e.content, &p.content) {
        (
            NodeContent::Text { font_size_px: a, .. },
            NodeContent::Text { font_size_px: b, .. },
        ) => assert!((a / 2.0 - b).abs() < 1e-9),
        _ => panic!("expected text nodes"),
    }
}

#[test]
fn test_static_renderer_has_no_handles() {
    let mut s = banner();
    s.dispatch(DesignerCommand::AddElement(rect("r1".to_string(), None)));
    assert_eq!(s.selected_id(), Some("r1"));

    let ctx = RenderContext::editor(&s, &PreviewScales::STANDARD);
    let still = Renderer::static_preview().render(&s, &ctx);
    let live = Renderer::interactive().render(&s, &ctx);
    assert!(still.handles.is_empty());
    assert_eq!(live.handles.len(), 4);
    assert!(Renderer::static_preview()
        .strategy()
        .pointer_down(&still, 5.0, 5.0)
        .is_none());
}

#[test]
fn test_drag_gesture_round_trip() {
    let mut s = banner();
    s.dispatch(DesignerCommand::AddElement(rect("r1".to_string(), None)));
    let renderer = Renderer::interactive();
    let ctx = RenderContext::editor(&s, &PreviewScales::STANDARD);

    let cmd = renderer
        .strategy()
        .finish_move(&s, &ctx, "r1", 40.4, 12.6)
        .unwrap();
    assert!(s.dispatch(cmd));
    let moved = s.element("r1").unwrap();
    assert_eq!((moved.x, moved.y), (40.0, 13.0));

    // The moved element is what the next projection hit-tests
    let tree = renderer.render(&s, &ctx);
    assert_eq!(tree.hit_test(45.0, 18.0).unwrap().element_id, "r1");
    assert_eq!(
        renderer.strategy().pointer_down(&tree, 1.0, 1.0),
        Some(DesignerCommand::SelectElement(None))
    );
}

#[test]
fn test_preview_mode_hides_overlays() {
    let mut s = banner();
    s.dispatch(DesignerCommand::UpdateCanvasSettings(CanvasSettingsPatch {
        show_grid: Some(true),
        show_safe_zone: Some(true),
        show_bleed: Some(true),
        ..Default::default()
    }));
    let ctx = RenderContext::editor(&s, &PreviewScales::STANDARD);
    let tree = Renderer::interactive().render(&s, &ctx);
    assert_eq!(tree.overlays.len(), 3);

    s.dispatch(DesignerCommand::SetPreviewMode(true));
    let tree = Renderer::interactive().render(&s, &ctx);
    assert!(tree.preview);
    assert!(tree.overlays.is_empty());
}
