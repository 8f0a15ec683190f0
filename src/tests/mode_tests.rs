//! Tests for tool switching, sketch cancellation and the one-tool invariant.

use super::*;
use crate::message::{DraftMessage, FeatureMessage, ListMessage, ToolMessage};
use crate::mode::{DrawKind, InteractionMode, MeasureKind, Tool};
use crate::surface::{GestureEvent, Key};

/// Listener count each mounted tool binds while idle.
fn expected_listeners(tool: Tool) -> usize {
    match tool {
        Tool::Select | Tool::Draw(_) | Tool::Modify => 1,
        Tool::Measure(_) => 2,
    }
}

fn assert_consistent(h: &Harness) {
    let app = &h.app;
    let selection = app.selection();
    let expected = Tool::for_state(app.mode(), selection.is_editing());

    assert_eq!(app.surface().mounted_tool(), Some(expected), "mounted tool");
    if selection.is_editing() {
        assert!(selection.selected().is_some(), "editing without a selection");
    }
    if !app.mode().is_none() {
        assert!(selection.selected().is_none(), "selection while drawing or measuring");
    }
    if app.surface().active_sketch().is_none() {
        assert_eq!(
            app.surface().listeners().len(),
            expected_listeners(expected),
            "stale listeners for {}",
            expected
        );
    }
}

#[test]
fn test_random_action_sequences_keep_invariants() {
    let mut h = Harness::new();
    // Small LCG so the sequence is reproducible.
    let mut seed: u64 = 0x5eed;
    let mut next = move |n: u64| {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) % n
    };

    for step in 0..400 {
        match next(12) {
            0 => h.send(ToolMessage::Draw(DrawKind::Point)),
            1 => h.send(ToolMessage::Draw(DrawKind::Line)),
            2 => h.send(ToolMessage::Draw(DrawKind::Polygon)),
            3 => h.send(ToolMessage::Measure(MeasureKind::Length)),
            4 => h.send(ToolMessage::Measure(MeasureKind::Area)),
            5 => h.send(ToolMessage::Stop),
            6 => h.send(ListMessage::Clicked(id(next(3) as i64 + 1))),
            7 => h.send(FeatureMessage::Edit),
            8 => h.send(FeatureMessage::CloseDetails),
            9 => h.send(MapMessage::Key(Key::Escape)),
            10 => {
                let x = next(8) as f64;
                h.click(at(27.0 + x, 38.0 + x / 2.0));
            }
            _ => h.send(DraftMessage::Cancel),
        }
        assert_consistent(&h);
        assert!(
            h.app.mode().draw_kind().is_none() || h.app.mode().measure_kind().is_none(),
            "draw and measure both active at step {}",
            step
        );
    }
}

#[test]
fn test_exactly_one_tool_mounted_per_state() {
    let mut h = Harness::new();
    assert_eq!(h.app.surface().mounted_tool(), Some(Tool::Select));
    assert_consistent(&h);

    for kind in DrawKind::all() {
        h.send(ToolMessage::Draw(*kind));
        assert_eq!(h.app.surface().mounted_tool(), Some(Tool::Draw(*kind)));
        assert_consistent(&h);
    }

    h.send(ToolMessage::Measure(MeasureKind::Area));
    assert_eq!(h.app.surface().listeners().count(GestureEvent::DrawStart), 1);
    assert_consistent(&h);

    h.send(ListMessage::Clicked(id(1)));
    h.send(FeatureMessage::Edit);
    assert_eq!(h.app.surface().mounted_tool(), Some(Tool::Modify));
    assert_consistent(&h);
}

#[test]
fn test_draw_tool_clears_selection_and_editing() {
    let mut h = Harness::new();
    h.send(ListMessage::Clicked(id(3)));
    h.send(FeatureMessage::Edit);
    assert!(h.app.selection().is_editing());

    h.send(ToolMessage::Draw(DrawKind::Line));

    assert_eq!(h.app.mode(), InteractionMode::Draw(DrawKind::Line));
    assert!(h.app.selection().selected().is_none());
    assert!(!h.app.selection().is_editing());
    assert_eq!(h.app.surface().selected(), None);
}

#[test]
fn test_measure_tool_toggles() {
    let mut h = Harness::new();

    h.send(ToolMessage::Measure(MeasureKind::Length));
    assert_eq!(h.app.mode(), InteractionMode::Measure(MeasureKind::Length));

    h.send(ToolMessage::Measure(MeasureKind::Area));
    assert_eq!(h.app.mode(), InteractionMode::Measure(MeasureKind::Area));

    h.send(ToolMessage::Measure(MeasureKind::Area));
    assert_eq!(h.app.mode(), InteractionMode::None);
    assert_eq!(h.app.surface().mounted_tool(), Some(Tool::Select));
}

#[test]
fn test_measure_replaces_draw() {
    let mut h = Harness::new();
    h.send(ToolMessage::Draw(DrawKind::Point));
    h.send(ToolMessage::Measure(MeasureKind::Length));

    assert_eq!(h.app.mode().draw_kind(), None);
    assert_eq!(h.app.mode().measure_kind(), Some(MeasureKind::Length));
}

#[test]
fn test_stop_returns_to_select() {
    let mut h = Harness::new();
    h.send(ToolMessage::Draw(DrawKind::Polygon));
    h.click(at(30.0, 38.0));

    h.send(ToolMessage::Stop);

    assert_eq!(h.app.mode(), InteractionMode::None);
    assert_eq!(h.app.surface().mounted_tool(), Some(Tool::Select));
    assert!(h.app.surface().active_sketch().is_none());
    assert_eq!(h.app.surface().listeners().len(), 1);
}

#[test]
fn test_escape_cancels_only_the_gesture() {
    let mut h = Harness::new();
    h.send(ToolMessage::Draw(DrawKind::Line));
    h.click(at(30.0, 38.0));
    h.click(at(31.0, 38.0));
    assert!(h.app.surface().active_sketch().is_some());

    h.send(MapMessage::Key(Key::Escape));

    assert!(h.app.surface().active_sketch().is_none());
    assert_eq!(h.app.mode(), InteractionMode::Draw(DrawKind::Line));
    assert_eq!(
        h.app.surface().mounted_tool(),
        Some(Tool::Draw(DrawKind::Line))
    );

    // A new shape can be started straight away.
    h.click(at(30.0, 37.0));
    h.double_click(at(31.0, 37.0));
    assert!(h.app.draft().is_some());
}

#[test]
fn test_switching_polygon_to_measure_discards_sketch() {
    let mut h = Harness::new();
    h.send(ToolMessage::Draw(DrawKind::Polygon));
    h.click(at(30.0, 38.0));
    h.click(at(31.0, 38.0));
    h.click(at(31.0, 39.0));
    assert!(h.app.surface().active_sketch().is_some());

    h.send(ToolMessage::Measure(MeasureKind::Length));

    assert!(h.app.surface().active_sketch().is_none());
    assert!(h.app.draft().is_none());
    assert!(h.app.surface().draft().is_none());
    assert!(h.app.surface().sketch_layer().is_empty());
    assert!(h.api_calls_after_load().is_empty());
    assert_eq!(h.app.store().len(), 3);
}

#[test]
fn test_draw_completion_keeps_tool_mounted() {
    let mut h = Harness::new();
    h.send(ToolMessage::Draw(DrawKind::Point));
    h.click(at(30.0, 38.0));

    let draft = h.app.draft().expect("draft pending");
    assert!(draft.wkt.starts_with("POINT("));
    assert_eq!(h.app.mode(), InteractionMode::Draw(DrawKind::Point));
    assert_eq!(
        h.app.surface().mounted_tool(),
        Some(Tool::Draw(DrawKind::Point))
    );
}

#[test]
fn test_canvas_ignored_while_draft_pending() {
    let mut h = Harness::new();
    h.send(ToolMessage::Draw(DrawKind::Point));
    h.click(at(30.0, 38.0));
    let first = h.app.draft().cloned();

    h.click(at(33.0, 38.0));

    assert_eq!(h.app.draft().cloned(), first);
}

#[test]
fn test_escape_dismisses_pending_draft() {
    let mut h = Harness::new();
    h.send(ToolMessage::Draw(DrawKind::Point));
    h.click(at(30.0, 38.0));
    assert!(h.app.surface().draft().is_some());

    h.send(MapMessage::Key(Key::Escape));

    assert!(h.app.draft().is_none());
    assert!(h.app.surface().draft().is_none());
    assert_eq!(h.app.mode(), InteractionMode::Draw(DrawKind::Point));
}

#[test]
fn test_other_tool_discards_pending_draft() {
    let mut h = Harness::new();
    h.send(ToolMessage::Draw(DrawKind::Line));
    h.click(at(30.0, 38.0));
    h.double_click(at(31.0, 38.0));
    assert!(h.app.draft().is_some());

    h.send(ToolMessage::Draw(DrawKind::Polygon));

    assert!(h.app.draft().is_none());
    assert!(h.app.surface().draft().is_none());
}

#[test]
fn test_edit_requires_selection() {
    let mut h = Harness::new();
    h.send(FeatureMessage::Edit);
    assert!(!h.app.selection().is_editing());
    assert_eq!(h.app.surface().mounted_tool(), Some(Tool::Select));

    h.send(ListMessage::Clicked(id(2)));
    h.send(FeatureMessage::Edit);
    assert!(h.app.selection().is_editing());

    h.send(FeatureMessage::FinishEdit);
    assert!(!h.app.selection().is_editing());
    assert_eq!(h.app.selection().selected(), Some(&id(2)));
    assert_eq!(h.app.surface().mounted_tool(), Some(Tool::Select));
}

#[test]
fn test_measurement_is_reported_and_pinned() {
    let mut h = Harness::new();
    h.send(ToolMessage::Measure(MeasureKind::Length));
    h.click(at(30.0, 38.0));
    assert_eq!(h.app.surface().tooltip().text, "Click to start measuring");

    h.double_click(at(30.1, 38.0));

    let measurement = h.app.last_measurement().expect("measurement");
    assert!(measurement.text.ends_with("km"));
    assert_eq!(h.app.surface().tooltip().text, measurement.text);
    assert_eq!(h.app.surface().sketch_layer().len(), 1);
    assert!(h.app.draft().is_none());
    assert!(h.api_calls_after_load().is_empty());

    // Leaving the tool clears the finished sketch.
    h.send(ToolMessage::Stop);
    assert!(h.app.surface().sketch_layer().is_empty());
    assert!(!h.app.surface().tooltip().visible);
}
