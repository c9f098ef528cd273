use std::f64::consts::TAU;

use crate::layout::{plot_area, ValueScale};
use crate::{Canvas2d, GraphOptions};

/// Radius of the dot drawn on every point, also the hit-test radius
pub const POINT_RADIUS: f64 = 4.0;
const LINE_WIDTH: f64 = 2.0;

/// Canvas position of every value, spaced evenly across the plot
pub fn line_points(options: &GraphOptions, width: f64, height: f64) -> Vec<(f64, f64)> {
    let plot = plot_area(width, height, options.has_title(), options.show_labels);
    let scale = ValueScale::for_values(&options.values);
    let slot = plot.width / options.values.len().max(1) as f64;

    options
        .values
        .iter()
        .enumerate()
        .map(|(i, value)| (plot.x + slot * (i as f64 + 0.5), scale.y(*value, &plot)))
        .collect()
}

/// Index of the point within reach of `(x, y)`
pub fn point_at(options: &GraphOptions, width: f64, height: f64, x: f64, y: f64) -> Option<usize> {
    let reach = POINT_RADIUS * 2.0;
    line_points(options, width, height)
        .iter()
        .position(|(px, py)| (px - x).hypot(py - y) <= reach)
}

pub fn draw<C: Canvas2d + ?Sized>(canvas: &mut C, options: &GraphOptions) {
    let (width, height) = (canvas.width(), canvas.height());
    let points = line_points(options, width, height);
    let Some(((first_x, first_y), rest)) = points.split_first().map(|(f, r)| (*f, r)) else {
        return;
    };

    canvas.set_stroke_style(options.color(0));
    canvas.set_line_width(LINE_WIDTH);
    canvas.begin_path();
    canvas.move_to(first_x, first_y);
    for (x, y) in rest {
        canvas.line_to(*x, *y);
    }
    canvas.stroke();

    for (i, (x, y)) in points.iter().enumerate() {
        canvas.set_fill_style(options.color(i));
        canvas.begin_path();
        canvas.arc(*x, *y, POINT_RADIUS, 0.0, TAU);
        canvas.fill();
    }

    if options.show_labels {
        let plot = plot_area(width, height, options.has_title(), true);
        let label_y = plot.y + plot.height + (height - plot.y - plot.height) / 2.0;
        canvas.set_fill_style("#000000");
        canvas.set_text_align("center");
        canvas.set_text_baseline("middle");
        for (i, (x, _)) in points.iter().enumerate() {
            if let Some(label) = options.label(i) {
                canvas.fill_text(label, *x, label_y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphType;

    #[test]
    fn test_points_rise_with_values() {
        let options = GraphOptions::new(GraphType::Line, vec![1.0, 3.0, 2.0]);
        let points = line_points(&options, 300.0, 300.0);
        assert!(points[1].1 < points[2].1);
        assert!(points[2].1 < points[0].1);
        assert!(points[0].0 < points[1].0 && points[1].0 < points[2].0);
    }

    #[test]
    fn test_point_at() {
        let options = GraphOptions::new(GraphType::Line, vec![1.0, 3.0]);
        let (x, y) = line_points(&options, 300.0, 300.0)[1];
        assert_eq!(point_at(&options, 300.0, 300.0, x + 1.0, y - 1.0), Some(1));
        assert_eq!(point_at(&options, 300.0, 300.0, 0.0, 0.0), None);
    }
}
