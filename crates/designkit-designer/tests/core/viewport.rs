use designkit_core::PX_PER_MM;
use designkit_designer::{
    CanvasDefaults, CanvasElement, CanvasSettings, DesignerState, InteractionStrategy,
    InteractiveStrategy, RenderContext, SessionConfig, ShapeContent, ShapeKind, Viewport,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_screen_canvas_round_trip(
        zoom in 0.1f64..50.0,
        pan_x in -1000.0f64..1000.0,
        pan_y in -1000.0f64..1000.0,
        x in -500.0f64..5000.0,
        y in -500.0f64..5000.0,
    ) {
        let mut vp = Viewport::new(PX_PER_MM);
        vp.set_zoom(zoom);
        vp.set_pan(pan_x, pan_y);
        let (sx, sy) = vp.canvas_to_screen(x, y);
        let (cx, cy) = vp.screen_to_canvas(sx, sy);
        prop_assert!((cx - x).abs() < 1e-6);
        prop_assert!((cy - y).abs() < 1e-6);
    }
}

#[test]
fn test_screen_drag_becomes_canvas_move() {
    let mut state = DesignerState::new(SessionConfig::new(
        CanvasSettings::from(CanvasDefaults::banner()),
        100,
    ));
    state.dispatch(designkit_designer::DesignerCommand::AddElement(
        CanvasElement::shape(
            "s1",
            100.0,
            10.0,
            20.0,
            20.0,
            ShapeContent::new(ShapeKind::RoundedRectangle, "#00ff00"),
        ),
    ));

    let mut vp = Viewport::new(PX_PER_MM);
    vp.fit_canvas(state.canvas(), 1436.22, 300.0, 0.0);
    assert!((vp.zoom() - 2.0).abs() < 1e-3);

    // 60 screen px at 2x is 30 canvas px
    let (dx, dy) = vp.screen_delta_to_canvas(60.0, 10.0);
    let element = state.element("s1").unwrap();
    let ctx = RenderContext::new(vp.px_per_mm());
    let cmd = InteractiveStrategy
        .finish_move(&state, &ctx, "s1", element.x + dx, element.y + dy)
        .unwrap();
    assert!(state.dispatch(cmd));

    let moved = state.element("s1").unwrap();
    assert_eq!((moved.x, moved.y), (130.0, 15.0));
}

#[test]
fn test_mm_conversions_match_units() {
    let vp = Viewport::new(PX_PER_MM);
    assert!((vp.mm_to_canvas(190.0) - designkit_core::mm_to_px(190.0)).abs() < 1e-9);
    assert!((vp.canvas_to_mm(vp.mm_to_canvas(15.0)) - 15.0).abs() < 1e-9);
}
