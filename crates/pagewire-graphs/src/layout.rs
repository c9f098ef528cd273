//! Geometry shared by every chart type: margins, value scaling, the title
//! and tooltips.

use crate::Canvas2d;

const TITLE_COLOR: &str = "#000000";
const TOOLTIP_BACKGROUND: &str = "rgba(0, 0, 0, 0.8)";
const TOOLTIP_COLOR: &str = "#ffffff";
const TOOLTIP_MAX_FONT: f64 = 40.0;

/// Axis-aligned rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Height reserved above the plot; larger when a title is drawn
pub fn top_margin(height: f64, has_title: bool) -> f64 {
    if has_title {
        height / 10.0
    } else {
        height / 20.0
    }
}

/// The area values are plotted into
pub fn plot_area(width: f64, height: f64, has_title: bool, has_labels: bool) -> Rect {
    let top = top_margin(height, has_title);
    let side = width / 20.0;
    let bottom = if has_labels { height / 10.0 } else { height / 20.0 };
    Rect::new(side, top, width - 2.0 * side, height - top - bottom)
}

/// Smallest value, `None` for an empty slice
pub fn min_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Largest value, `None` for an empty slice
pub fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Maps values onto the vertical extent of a plot
///
/// The range always includes zero so bars grow from a baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
}

impl ValueScale {
    pub fn for_values(values: &[f64]) -> Self {
        Self {
            min: min_value(values).unwrap_or(0.0).min(0.0),
            max: max_value(values).unwrap_or(0.0).max(0.0),
        }
    }

    fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            1.0
        } else {
            range
        }
    }

    /// Canvas y coordinate of `value` inside `plot`
    pub fn y(&self, value: f64, plot: &Rect) -> f64 {
        plot.y + plot.height * (self.max - value) / self.range()
    }
}

/// Draws the centered title into the top margin
pub fn write_title<C: Canvas2d + ?Sized>(canvas: &mut C, title: &str, width: f64, top_margin: f64) {
    if title.is_empty() {
        return;
    }
    let size = top_margin - top_margin / 5.0;
    canvas.set_fill_style(TITLE_COLOR);
    canvas.set_font(&format!("{}px Arial", size.round() as i64));
    canvas.set_text_align("center");
    canvas.set_text_baseline("middle");
    canvas.fill_text(title, width / 2.0, top_margin / 2.0);
}

/// Where a tooltip anchored at `(x, y)` is drawn, kept inside the canvas
pub fn tooltip_rect(width: f64, height: f64, x: f64, y: f64) -> Rect {
    let tooltip_width = width / 4.0;
    let tooltip_height = height / 10.0;
    let tx = (x - tooltip_width / 2.0).clamp(0.0, (width - tooltip_width).max(0.0));
    let ty = (y - tooltip_height * 2.0).clamp(0.0, (height - tooltip_height).max(0.0));
    Rect::new(tx, ty, tooltip_width, tooltip_height)
}

/// Font size that fits `text` into a tooltip of the given width
pub fn tooltip_font_size(tooltip_width: f64, text: &str) -> f64 {
    let chars = text.chars().count() as f64;
    if chars == 0.0 || TOOLTIP_MAX_FONT * chars <= tooltip_width {
        TOOLTIP_MAX_FONT
    } else {
        (tooltip_width / chars).floor()
    }
}

/// Draws a dark tooltip box with centered text near `(x, y)`
pub fn draw_tooltip<C: Canvas2d + ?Sized>(canvas: &mut C, x: f64, y: f64, text: &str) -> Rect {
    let rect = tooltip_rect(canvas.width(), canvas.height(), x, y);
    let font_size = tooltip_font_size(rect.width, text);
    let (cx, cy) = rect.center();

    canvas.begin_path();
    canvas.set_fill_style(TOOLTIP_BACKGROUND);
    canvas.fill_rect(rect.x, rect.y, rect.width, rect.height);
    canvas.set_fill_style(TOOLTIP_COLOR);
    canvas.set_font(&format!("{}px Arial", font_size as i64));
    canvas.set_text_align("center");
    canvas.set_text_baseline("middle");
    canvas.fill_text(text, cx, cy);
    rect
}
