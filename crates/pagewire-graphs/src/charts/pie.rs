use std::f64::consts::{FRAC_PI_2, TAU};

use crate::layout::plot_area;
use crate::{Canvas2d, GraphOptions};

/// Inner radius of a donut relative to its outer radius
pub const DONUT_HOLE: f64 = 0.5;

/// Center and outer radius of the pie
pub fn pie_geometry(options: &GraphOptions, width: f64, height: f64) -> (f64, f64, f64) {
    let plot = plot_area(width, height, options.has_title(), false);
    let (cx, cy) = plot.center();
    let radius = plot.width.min(plot.height) / 2.0 * 0.9;
    (cx, cy, radius)
}

/// Start and end angle of every slice, clockwise from twelve o'clock
pub fn slice_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = -FRAC_PI_2;
    values
        .iter()
        .map(|value| {
            let end = start + TAU * value / total;
            let slice = (start, end);
            start = end;
            slice
        })
        .collect()
}

/// Index of the slice under `(x, y)`; donut holes hit nothing
pub fn slice_at(
    options: &GraphOptions,
    width: f64,
    height: f64,
    x: f64,
    y: f64,
    donut: bool,
) -> Option<usize> {
    let (cx, cy, radius) = pie_geometry(options, width, height);
    let distance = (x - cx).hypot(y - cy);
    if distance > radius || (donut && distance < radius * DONUT_HOLE) {
        return None;
    }

    // Normalize into the same [-π/2, 3π/2) window the slices use
    let mut angle = (y - cy).atan2(x - cx);
    if angle < -FRAC_PI_2 {
        angle += TAU;
    }
    slice_angles(&options.values)
        .iter()
        .position(|(start, end)| angle >= *start && angle < *end)
}

pub fn draw<C: Canvas2d + ?Sized>(canvas: &mut C, options: &GraphOptions, donut: bool) {
    let (cx, cy, radius) = pie_geometry(options, canvas.width(), canvas.height());
    let slices = slice_angles(&options.values);

    for (i, (start, end)) in slices.iter().enumerate() {
        canvas.set_fill_style(options.color(i));
        canvas.begin_path();
        canvas.move_to(cx, cy);
        canvas.arc(cx, cy, radius, *start, *end);
        canvas.close_path();
        canvas.fill();
    }

    if donut {
        canvas.set_fill_style(options.background_color());
        canvas.begin_path();
        canvas.arc(cx, cy, radius * DONUT_HOLE, 0.0, TAU);
        canvas.fill();
    }

    if options.show_labels {
        // Labels sit in the middle of the visible ring
        let label_radius = if donut {
            radius * (1.0 + DONUT_HOLE) / 2.0
        } else {
            radius * 0.65
        };
        canvas.set_fill_style("#ffffff");
        canvas.set_text_align("center");
        canvas.set_text_baseline("middle");
        for (i, (start, end)) in slices.iter().enumerate() {
            if let Some(label) = options.label(i) {
                let mid = (start + end) / 2.0;
                canvas.fill_text(
                    label,
                    cx + label_radius * mid.cos(),
                    cy + label_radius * mid.sin(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_cover_full_circle() {
        let slices = slice_angles(&[1.0, 1.0, 2.0]);
        assert_eq!(slices.len(), 3);
        assert!((slices[0].0 + FRAC_PI_2).abs() < 1e-9);
        assert!((slices[2].1 - (TAU - FRAC_PI_2)).abs() < 1e-9);
        assert!((slices[2].1 - slices[2].0 - TAU / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_has_no_slices() {
        assert!(slice_angles(&[0.0, 0.0]).is_empty());
    }
}
