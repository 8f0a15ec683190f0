use super::*;
use crate::mode::{DrawKind, MeasureKind};

const STEP: f64 = 100_000.0;

fn surface() -> MapSurface {
    MapSurface::new(&AppConfig::default())
}

fn click(s: &mut MapSurface, x: f64, y: f64) -> Vec<SurfaceEvent> {
    s.handle_pointer(PointerEvent::click(x, y))
}

fn point_feature(id: i64, x: f64, y: f64) -> Feature {
    Feature::new(FeatureId::Number(id), format!("f{}", id), Geometry::point(x, y))
}

#[test]
fn test_mount_is_idempotent() {
    let mut s = surface();
    s.mount(Tool::Select);
    s.mount(Tool::Select);

    assert_eq!(s.mounted_tool(), Some(Tool::Select));
    assert_eq!(s.listeners().len(), 1);
}

#[test]
fn test_switching_tools_releases_previous_listeners() {
    let mut s = surface();
    s.mount(Tool::Measure(MeasureKind::Length));
    assert_eq!(s.listeners().len(), 2);

    s.mount(Tool::Draw(DrawKind::Polygon));
    assert_eq!(s.listeners().len(), 1);
    assert_eq!(s.listeners().count(GestureEvent::DrawStart), 0);

    s.mount(Tool::Modify);
    assert_eq!(s.listeners().len(), 1);
    assert_eq!(s.listeners().count(GestureEvent::ModifyEnd), 1);
}

#[test]
fn test_point_completes_on_first_click() {
    let mut s = surface();
    s.mount(Tool::Draw(DrawKind::Point));

    let events = click(&mut s, 0.0, 0.0);
    assert_eq!(events.len(), 1);
    match &events[0] {
        SurfaceEvent::DrawCompleted(draft) => {
            assert_eq!(draft.geometry_type(), GeometryType::Point);
            assert!(draft.wkt.starts_with("POINT("));
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(s.draft().is_some());
    // The tool stays mounted for the next shape.
    assert_eq!(s.mounted_tool(), Some(Tool::Draw(DrawKind::Point)));
}

#[test]
fn test_line_completes_on_double_click() {
    let mut s = surface();
    s.mount(Tool::Draw(DrawKind::Line));

    assert!(click(&mut s, 0.0, 0.0).is_empty());
    // Browsers deliver click, click, dblclick for a double click.
    assert!(click(&mut s, STEP, 0.0).is_empty());
    assert!(click(&mut s, STEP, 0.0).is_empty());
    let events = s.handle_pointer(PointerEvent::double_click(STEP, 0.0));

    assert_eq!(events.len(), 1);
    let SurfaceEvent::DrawCompleted(draft) = &events[0] else {
        panic!("expected a draft");
    };
    assert_eq!(draft.geometry.editable_vertices().len(), 2);
    assert!(s.active_sketch().is_none());
}

#[test]
fn test_line_needs_two_vertices() {
    let mut s = surface();
    s.mount(Tool::Draw(DrawKind::Line));

    click(&mut s, 0.0, 0.0);
    let events = s.handle_pointer(PointerEvent::double_click(0.0, 0.0));

    assert!(events.is_empty());
    assert!(s.active_sketch().is_some());
}

#[test]
fn test_polygon_closes_on_first_vertex() {
    let mut s = surface();
    s.mount(Tool::Draw(DrawKind::Polygon));

    click(&mut s, 0.0, 0.0);
    click(&mut s, STEP, 0.0);
    click(&mut s, STEP, STEP);
    let events = click(&mut s, 10.0, 10.0);

    assert_eq!(events.len(), 1);
    let SurfaceEvent::DrawCompleted(draft) = &events[0] else {
        panic!("expected a draft");
    };
    assert_eq!(draft.geometry_type(), GeometryType::Polygon);
    assert_eq!(draft.geometry.editable_vertices().len(), 3);
    assert!(draft.wkt.starts_with("POLYGON(("));
}

#[test]
fn test_escape_cancels_sketch_but_keeps_tool() {
    let mut s = surface();
    s.mount(Tool::Draw(DrawKind::Polygon));
    click(&mut s, 0.0, 0.0);
    click(&mut s, STEP, 0.0);

    let events = s.handle_key(Key::Escape);
    assert_eq!(events, vec![SurfaceEvent::SketchCancelled]);
    assert!(s.active_sketch().is_none());
    assert_eq!(s.mounted_tool(), Some(Tool::Draw(DrawKind::Polygon)));

    // Nothing left to cancel.
    assert!(s.handle_key(Key::Escape).is_empty());
}

#[test]
fn test_measure_tooltip_follows_sketch() {
    let mut s = surface();
    s.mount(Tool::Measure(MeasureKind::Length));

    click(&mut s, 0.0, 0.0);
    assert!(s.tooltip().visible);
    assert_eq!(s.tooltip().text, "Click to start measuring");
    assert_eq!(s.listeners().count(GestureEvent::SketchChange), 1);

    s.handle_pointer(PointerEvent::moved(STEP, 0.0));
    assert!(s.tooltip().text.ends_with("km"));
    assert_eq!(s.tooltip().position, Some(Coord { x: STEP, y: 0.0 }));
    assert_eq!(s.tooltip().state, TooltipState::Live);

    click(&mut s, STEP, 0.0);
    let events = s.handle_pointer(PointerEvent::double_click(STEP, 0.0));

    assert!(matches!(events[..], [SurfaceEvent::MeasurementCompleted(_)]));
    assert_eq!(s.tooltip().state, TooltipState::Static);
    assert_eq!(s.tooltip().offset, (0.0, -7.0));
    assert_eq!(s.listeners().count(GestureEvent::SketchChange), 0);
    assert_eq!(s.sketch_layer().len(), 1);
}

#[test]
fn test_successive_measurements_do_not_duplicate_callbacks() {
    let mut s = surface();

    // Remount a few times to shake out stale listeners.
    for _ in 0..3 {
        s.mount(Tool::Measure(MeasureKind::Area));
        s.mount(Tool::Select);
    }
    s.mount(Tool::Measure(MeasureKind::Area));

    for round in 0..3 {
        let before = s.tooltip().updates;
        let base = round as f64 * 10.0 * STEP;

        click(&mut s, base, 0.0);
        s.handle_pointer(PointerEvent::moved(base + STEP, 0.0));
        click(&mut s, base + STEP, 0.0);
        s.handle_pointer(PointerEvent::moved(base + STEP, STEP));
        click(&mut s, base + STEP, STEP);
        let events = click(&mut s, base, 0.0);

        assert_eq!(events.len(), 1, "round {}", round);
        // Two moves and two vertex placements, one callback each.
        assert_eq!(s.tooltip().updates - before, 4, "round {}", round);
        assert_eq!(s.listeners().count(GestureEvent::SketchChange), 0);
        // Each new sketch clears the previous measurement.
        assert_eq!(s.sketch_layer().len(), 1);
    }
}

#[test]
fn test_unmounting_measure_clears_overlay() {
    let mut s = surface();
    s.mount(Tool::Measure(MeasureKind::Length));
    click(&mut s, 0.0, 0.0);
    s.handle_pointer(PointerEvent::moved(STEP, 0.0));

    s.mount(Tool::Select);

    assert!(!s.tooltip().visible);
    assert!(s.active_sketch().is_none());
    assert!(s.sketch_layer().is_empty());
    assert_eq!(s.listeners().len(), 1);
}

#[test]
fn test_select_picks_top_most_feature() {
    let mut s = surface();
    let a = point_feature(1, 0.0, 0.0);
    let b = point_feature(2, 0.0, 0.0);
    s.render(&[&a, &b], None, None);
    s.mount(Tool::Select);

    let events = click(&mut s, 100.0, 100.0);
    assert_eq!(
        events,
        vec![SurfaceEvent::SelectionChanged(Some(FeatureId::Number(2)))]
    );
}

#[test]
fn test_select_empty_click_deselects() {
    let mut s = surface();
    let a = point_feature(1, 0.0, 0.0);
    s.render(&[&a], None, None);
    s.mount(Tool::Select);
    s.sync_selection(Some(FeatureId::Number(1)));

    let events = click(&mut s, 50.0 * STEP, 50.0 * STEP);
    assert_eq!(events, vec![SurfaceEvent::SelectionChanged(None)]);

    // Clicking the already selected feature reports nothing new.
    let events = click(&mut s, 0.0, 0.0);
    assert!(events.is_empty());
}

#[test]
fn test_polygon_hit_by_containment() {
    let mut s = surface();
    let field = Feature::new(
        FeatureId::Number(5),
        "Field",
        Geometry::polygon(vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0 * STEP, y: 0.0 },
            Coord { x: 10.0 * STEP, y: 10.0 * STEP },
        ]),
    );
    s.render(&[&field], None, None);

    let tolerance = 8.0 * s.view().resolution();
    assert_eq!(
        s.hit_test(Coord { x: 8.0 * STEP, y: 2.0 * STEP }, tolerance),
        Some(FeatureId::Number(5))
    );
    assert_eq!(s.hit_test(Coord { x: 0.0, y: 9.0 * STEP }, tolerance), None);
}

#[test]
fn test_modify_drag_reports_new_wkt() {
    let mut s = surface();
    let road = Feature::new(
        FeatureId::Number(3),
        "Road",
        Geometry::line_string(vec![Coord { x: 0.0, y: 0.0 }, Coord { x: STEP, y: 0.0 }]),
    );
    s.render(&[&road], Some(&road.id), None);
    s.sync_selection(Some(road.id.clone()));
    s.mount(Tool::Modify);

    s.handle_pointer(PointerEvent::new(PointerKind::DragStart, STEP, 10.0));
    s.handle_pointer(PointerEvent::new(PointerKind::Drag, STEP, STEP));
    let events = s.handle_pointer(PointerEvent::new(PointerKind::DragEnd, 2.0 * STEP, STEP));

    assert_eq!(events.len(), 1);
    let SurfaceEvent::FeatureModified { id, wkt } = &events[0] else {
        panic!("expected a modification");
    };
    assert_eq!(id, &road.id);
    let decoded = GeometryCodec::new().to_rendering(wkt).unwrap();
    assert!(decoded.approx_eq(
        &Geometry::line_string(vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 2.0 * STEP, y: STEP }]),
        1e-6
    ));

    let drawn = s.rendered(&road.id).unwrap();
    assert_eq!(
        drawn.geometry.last_vertex(),
        Some(Coord { x: 2.0 * STEP, y: STEP })
    );
}

#[test]
fn test_modify_ignores_unselected_features() {
    let mut s = surface();
    let road = point_feature(3, 0.0, 0.0);
    s.render(&[&road], None, None);
    s.mount(Tool::Modify);

    s.handle_pointer(PointerEvent::new(PointerKind::DragStart, 0.0, 0.0));
    let events = s.handle_pointer(PointerEvent::new(PointerKind::DragEnd, STEP, 0.0));
    assert!(events.is_empty());
}

#[test]
fn test_restyle_keeps_geometry() {
    let mut s = surface();
    let road = point_feature(3, 0.0, 0.0);
    s.render(&[&road], None, None);

    s.restyle(None, Some(&road.id));
    let drawn = s.rendered(&road.id).unwrap();
    assert_eq!(drawn.style.highlight, style::Highlight::Hovered);
    assert_eq!(drawn.geometry, road.geometry);
}

#[test]
fn test_cursor_follows_draw_tool() {
    let mut s = surface();
    assert_eq!(s.cursor(), Cursor::Default);

    s.mount(Tool::Draw(DrawKind::Line));
    assert_eq!(s.cursor(), Cursor::Crosshair);

    s.mount(Tool::Select);
    assert_eq!(s.cursor(), Cursor::Default);
}

#[test]
fn test_frame_queues_fit_request() {
    let mut s = surface();
    s.frame(Extent::new(0.0, 0.0, 10.0, 10.0));

    let requests = s.take_camera_requests();
    assert_eq!(requests.len(), 1);
    match &requests[0] {
        CameraRequest::Fit {
            padding,
            max_zoom,
            duration_ms,
            target,
            ..
        } => {
            assert_eq!(*padding, 150.0);
            assert_eq!(*max_zoom, 15.0);
            assert_eq!(*duration_ms, 1000);
            assert_eq!(target.zoom, 15.0);
        }
        other => panic!("unexpected request {:?}", other),
    }
    assert!(s.camera_requests().is_empty());
}

#[test]
fn test_go_to_animates_to_location() {
    let mut s = surface();
    s.go_to(0.0, 0.0);

    let requests = s.take_camera_requests();
    assert_eq!(requests.len(), 1);
    let CameraRequest::Animate {
        target,
        duration_ms,
    } = &requests[0]
    else {
        panic!("expected an animation");
    };
    assert_eq!(*duration_ms, 1500);
    assert_eq!(target.zoom, 14.0);
    assert!(target.center.x.abs() < 1e-6 && target.center.y.abs() < 1e-6);
}

#[test]
fn test_close_releases_everything() {
    let mut s = surface();
    s.mount(Tool::Measure(MeasureKind::Length));
    click(&mut s, 0.0, 0.0);
    assert_eq!(s.listeners().len(), 3);

    s.close();
    assert!(s.is_closed());
    assert!(s.listeners().is_empty());
    assert_eq!(s.mounted_tool(), None);
    assert!(!s.tooltip().visible);

    // A closed surface ignores further commands.
    s.mount(Tool::Select);
    assert_eq!(s.mounted_tool(), None);
    assert!(click(&mut s, 0.0, 0.0).is_empty());
    s.close();
}

#[test]
fn test_snapshot_serializes() {
    let mut s = surface();
    let a = point_feature(1, 0.0, 0.0);
    s.render(&[&a], None, None);
    s.mount(Tool::Select);

    let json = serde_json::to_value(s.snapshot()).unwrap();
    assert_eq!(json["features"].as_array().unwrap().len(), 1);
    assert_eq!(json["cursor"], "default");
    assert_eq!(json["features"][0]["style"]["highlight"], "normal");
}
