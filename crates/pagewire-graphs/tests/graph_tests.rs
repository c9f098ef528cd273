//! Integration tests for chart rendering against a recording canvas

use pagewire_graphs::charts::pie::slice_angles;
use pagewire_graphs::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn canvas() -> RecordingCanvas {
    RecordingCanvas::new(400.0, 300.0)
}

#[rstest]
#[case(GraphType::Bar)]
#[case(GraphType::Line)]
#[case(GraphType::Pie)]
#[case(GraphType::Donut)]
fn test_every_type_clears_and_paints_background(#[case] graph_type: GraphType) {
    let mut canvas = canvas();
    create_graph(&mut canvas, &GraphOptions::new(graph_type, vec![1.0, 2.0])).unwrap();

    assert_eq!(
        canvas.calls[0],
        DrawCall::ClearRect {
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: 300.0
        }
    );
    assert_eq!(canvas.calls[1], DrawCall::FillStyle(DEFAULT_BACKGROUND.to_string()));
}

#[test]
fn test_bar_chart_draws_one_rect_per_value() {
    let mut canvas = canvas();
    let options = GraphOptions::new(GraphType::Bar, vec![1.0, 2.0, 3.0]).colors(["red"]);
    create_graph(&mut canvas, &options).unwrap();

    // background plus three bars
    assert_eq!(canvas.filled_rects().len(), 4);
    let fills = canvas
        .calls
        .iter()
        .filter(|c| **c == DrawCall::FillStyle("red".to_string()))
        .count();
    assert_eq!(fills, 3);
}

#[test]
fn test_title_is_drawn_first() {
    let mut canvas = canvas();
    let options = GraphOptions::new(GraphType::Line, vec![1.0]).title("Sales");
    create_graph(&mut canvas, &options).unwrap();
    assert_eq!(canvas.texts(), vec!["Sales"]);
    assert!(canvas.calls.contains(&DrawCall::Font("24px Arial".to_string())));
}

#[test]
fn test_pie_draws_one_arc_per_slice() {
    let mut canvas = canvas();
    create_graph(&mut canvas, &GraphOptions::new(GraphType::Pie, vec![1.0, 3.0])).unwrap();
    assert_eq!(canvas.arcs(), slice_angles(&[1.0, 3.0]));
}

#[test]
fn test_donut_punches_a_hole() {
    let mut canvas = canvas();
    let options = GraphOptions::new(GraphType::Donut, vec![1.0, 3.0]).background("#222222");
    create_graph(&mut canvas, &options).unwrap();

    let arcs = canvas.arcs();
    assert_eq!(arcs.len(), 3);
    assert_eq!(arcs[2], (0.0, std::f64::consts::TAU));
    assert!(canvas.calls.contains(&DrawCall::FillStyle("#222222".to_string())));
}

#[test]
fn test_invalid_options_draw_nothing() {
    let mut canvas = canvas();
    let err = create_graph(&mut canvas, &GraphOptions::new(GraphType::Pie, vec![])).unwrap_err();
    assert_eq!(err, GraphError::NoData);
    assert!(canvas.calls.is_empty());
}

#[test]
fn test_zero_sized_canvas_fails() {
    let mut canvas = RecordingCanvas::new(0.0, 100.0);
    let err = create_graph(&mut canvas, &GraphOptions::new(GraphType::Bar, vec![1.0])).unwrap_err();
    assert!(matches!(err, GraphError::CanvasTooSmall { .. }));
}

#[test]
fn test_tooltip_over_bar() {
    let mut canvas = canvas();
    let options = GraphOptions::new(GraphType::Bar, vec![4.0, 8.0]).labels(["a", "b"]);
    let rects = charts::bar::bar_rects(&options, 400.0, 300.0);
    let (x, y) = rects[1].center();

    let shown = show_tooltip(&mut canvas, &options, x, y).unwrap();
    assert_eq!(shown, Some(1));
    assert_eq!(canvas.texts().last().copied(), Some("b: 8"));
}

#[test]
fn test_tooltip_misses_outside_values() {
    let mut canvas = canvas();
    let options = GraphOptions::new(GraphType::Donut, vec![1.0, 1.0]);
    let (cx, cy, _) = charts::pie::pie_geometry(&options, 400.0, 300.0);

    assert_eq!(show_tooltip(&mut canvas, &options, cx, cy).unwrap(), None);
    assert!(canvas.texts().is_empty());
}

#[test]
fn test_pie_hit_test_by_angle() {
    let options = GraphOptions::new(GraphType::Pie, vec![1.0, 1.0]);
    let (cx, cy, radius) = charts::pie::pie_geometry(&options, 400.0, 300.0);

    // first slice runs clockwise from twelve o'clock to six, i.e. the right half
    assert_eq!(hit_test(&options, 400.0, 300.0, cx + radius / 2.0, cy), Some(0));
    assert_eq!(hit_test(&options, 400.0, 300.0, cx - radius / 2.0, cy), Some(1));
    assert_eq!(hit_test(&options, 400.0, 300.0, cx + radius * 2.0, cy), None);
}

#[test]
fn test_tooltip_text() {
    let options = GraphOptions::new(GraphType::Bar, vec![1.5]);
    assert_eq!(tooltip_text(&options, 0), Some("1.5".to_string()));
    assert_eq!(tooltip_text(&options, 1), None);
}
