use crate::layout::{plot_area, Rect, ValueScale};
use crate::{Canvas2d, GraphOptions};

/// Share of each slot taken by the bar itself
const BAR_FILL: f64 = 0.7;

/// Rectangles of every bar, in value order
pub fn bar_rects(options: &GraphOptions, width: f64, height: f64) -> Vec<Rect> {
    let plot = plot_area(width, height, options.has_title(), options.show_labels);
    let scale = ValueScale::for_values(&options.values);
    let slot = plot.width / options.values.len().max(1) as f64;
    let bar_width = slot * BAR_FILL;
    let baseline = scale.y(0.0, &plot);

    options
        .values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let x = plot.x + slot * i as f64 + (slot - bar_width) / 2.0;
            let top = scale.y(*value, &plot);
            Rect::new(x, top.min(baseline), bar_width, (baseline - top).abs())
        })
        .collect()
}

/// Index of the bar under `(x, y)`
pub fn bar_at(options: &GraphOptions, width: f64, height: f64, x: f64, y: f64) -> Option<usize> {
    bar_rects(options, width, height)
        .iter()
        .position(|rect| rect.contains(x, y))
}

pub fn draw<C: Canvas2d + ?Sized>(canvas: &mut C, options: &GraphOptions) {
    let (width, height) = (canvas.width(), canvas.height());
    let rects = bar_rects(options, width, height);

    for (i, rect) in rects.iter().enumerate() {
        canvas.set_fill_style(options.color(i));
        canvas.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    if options.show_labels {
        let plot = plot_area(width, height, options.has_title(), true);
        let label_y = plot.y + plot.height + (height - plot.y - plot.height) / 2.0;
        canvas.set_fill_style("#000000");
        canvas.set_text_align("center");
        canvas.set_text_baseline("middle");
        for (i, rect) in rects.iter().enumerate() {
            if let Some(label) = options.label(i) {
                canvas.fill_text(label, rect.x + rect.width / 2.0, label_y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphType;

    #[test]
    fn test_taller_value_gives_taller_bar() {
        let options = GraphOptions::new(GraphType::Bar, vec![1.0, 2.0]);
        let rects = bar_rects(&options, 400.0, 200.0);
        assert_eq!(rects.len(), 2);
        assert!(rects[1].height > rects[0].height);
        assert!((rects[1].height - 2.0 * rects[0].height).abs() < 1e-9);
        assert!(rects[0].x < rects[1].x);
    }

    #[test]
    fn test_negative_bars_hang_below_baseline() {
        let options = GraphOptions::new(GraphType::Bar, vec![2.0, -2.0]);
        let rects = bar_rects(&options, 400.0, 200.0);
        assert!((rects[0].y + rects[0].height - rects[1].y).abs() < 1e-9);
    }

    #[test]
    fn test_bar_at() {
        let options = GraphOptions::new(GraphType::Bar, vec![1.0, 1.0]);
        let rects = bar_rects(&options, 400.0, 200.0);
        let (cx, cy) = rects[1].center();
        assert_eq!(bar_at(&options, 400.0, 200.0, cx, cy), Some(1));
        assert_eq!(bar_at(&options, 400.0, 200.0, 0.0, 0.0), None);
    }
}
