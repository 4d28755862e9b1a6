use designkit_designer::{
    CanvasDefaults, CanvasElement, CanvasSettings, DesignerCommand, DesignerState, ElementPatch,
    History, SessionConfig, ShapeContent, ShapeKind,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add,
    Delete(usize),
    Move(usize, f64),
    Front(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Add),
        1 => (0usize..8).prop_map(Op::Delete),
        2 => (0usize..8, 0.0f64..500.0).prop_map(|(i, x)| Op::Move(i, x)),
        1 => (0usize..8).prop_map(Op::Front),
    ]
}

fn state(depth: usize) -> DesignerState {
    DesignerState::new(SessionConfig::new(
        CanvasSettings::from(CanvasDefaults::screen()),
        depth,
    ))
}

fn shape(id: String) -> CanvasElement {
    CanvasElement::shape(
        id,
        0.0,
        0.0,
        10.0,
        10.0,
        ShapeContent::new(ShapeKind::Rectangle, "#000000"),
    )
}

/// Applies `ops`, returning how many of them were structural and recorded history.
fn run(s: &mut DesignerState, ops: &[Op]) -> usize {
    let mut structural = 0;
    for (n, op) in ops.iter().enumerate() {
        let ids: Vec<String> = s.elements().iter().map(|e| e.id.clone()).collect();
        let before = s.history().undo_depth();
        match op {
            Op::Add => {
                s.dispatch(DesignerCommand::AddElement(shape(format!("e{n}"))));
            }
            Op::Delete(i) if !ids.is_empty() => {
                s.dispatch(DesignerCommand::delete(ids[i % ids.len()].clone()));
            }
            Op::Move(i, x) if !ids.is_empty() => {
                s.dispatch(DesignerCommand::update(
                    ids[i % ids.len()].clone(),
                    ElementPatch::position(*x, 0.0),
                ));
            }
            Op::Front(i) if !ids.is_empty() => {
                s.dispatch(DesignerCommand::BringToFront(ids[i % ids.len()].clone()));
            }
            _ => {}
        }
        if s.history().undo_depth() > before {
            structural += 1;
        }
    }
    structural
}

proptest! {
    #[test]
    fn prop_past_tracks_structural_ops(ops in prop::collection::vec(op(), 0..40)) {
        let mut s = state(1000);
        let structural = run(&mut s, &ops);
        prop_assert_eq!(s.history().undo_depth(), structural);
        prop_assert_eq!(s.history().redo_depth(), 0);
    }

    #[test]
    fn prop_undo_then_redo_restores(ops in prop::collection::vec(op(), 1..30)) {
        let mut s = state(1000);
        run(&mut s, &ops);
        let elements = s.elements().to_vec();

        if s.dispatch(DesignerCommand::Undo) {
            prop_assert!(s.can_redo());
            prop_assert!(s.dispatch(DesignerCommand::Redo));
            prop_assert_eq!(s.elements(), elements.as_slice());
        } else {
            prop_assert!(!s.can_redo());
        }
    }

    #[test]
    fn prop_undo_all_reaches_empty(ops in prop::collection::vec(op(), 0..30)) {
        let mut s = state(1000);
        run(&mut s, &ops);
        while s.dispatch(DesignerCommand::Undo) {}
        prop_assert!(s.elements().is_empty());
        prop_assert!(!s.can_undo());
    }

    #[test]
    fn prop_depth_is_bounded(depth in 1usize..6, adds in 0usize..20) {
        let mut s = state(depth);
        for n in 0..adds {
            s.dispatch(DesignerCommand::AddElement(shape(format!("e{n}"))));
        }
        prop_assert_eq!(s.history().undo_depth(), adds.min(depth));
    }
}

#[test]
fn test_new_edit_clears_redo() {
    let mut history = History::new(10);
    history.record(vec![]);
    let restored = history.undo(vec![shape("a".to_string())]);
    assert_eq!(restored, Some(vec![]));
    assert!(history.can_redo());

    history.record(vec![]);
    assert!(!history.can_redo());
    assert_eq!(history.undo_depth(), 1);
}

#[test]
fn test_zero_depth_keeps_one() {
    let mut history = History::new(0);
    history.record(vec![]);
    history.record(vec![shape("a".to_string())]);
    assert_eq!(history.max_depth(), 1);
    assert_eq!(history.past(), &[vec![shape("a".to_string())]]);
}
