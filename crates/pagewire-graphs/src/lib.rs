//! # Pagewire Graphs
//!
//! Small charts drawn through the [`Canvas2d`] trait:
//! - Bar charts, negative values hang below the baseline
//! - Line charts with a dot per value
//! - Pie and donut charts
//!
//! Every chart has pure geometry functions next to its drawing code, which
//! [`hit_test`] reuses to find the value under the pointer.
//!
//! ## Example
//!
//! ```
//! use pagewire_graphs::{create_graph, GraphOptions, GraphType, RecordingCanvas};
//!
//! let mut canvas = RecordingCanvas::new(400.0, 300.0);
//! let options = GraphOptions::new(GraphType::Bar, vec![3.0, 5.0, 2.0])
//!     .title("Visitors")
//!     .labels(["Mon", "Tue", "Wed"]);
//!
//! create_graph(&mut canvas, &options).unwrap();
//! assert_eq!(canvas.texts(), vec!["Visitors", "Mon", "Tue", "Wed"]);
//! ```

mod canvas;
pub mod charts;
mod error;
pub mod layout;
mod options;

use tracing::debug;

pub use canvas::{Canvas2d, DrawCall, RecordingCanvas};
pub use error::GraphError;
pub use layout::{draw_tooltip, max_value, min_value, Rect};
pub use options::{GraphOptions, GraphType, DEFAULT_BACKGROUND, DEFAULT_COLORS};

/// Validates `options`, clears the canvas and draws the graph
pub fn create_graph<C: Canvas2d + ?Sized>(
    canvas: &mut C,
    options: &GraphOptions,
) -> Result<(), GraphError> {
    options.validate()?;

    let (width, height) = (canvas.width(), canvas.height());
    if width <= 0.0 || height <= 0.0 {
        return Err(GraphError::CanvasTooSmall { width, height });
    }

    debug!(graph_type = ?options.graph_type, values = options.values.len(), "drawing graph");

    canvas.clear_rect(0.0, 0.0, width, height);
    canvas.set_fill_style(options.background_color());
    canvas.fill_rect(0.0, 0.0, width, height);

    if let Some(title) = options.title.as_deref() {
        layout::write_title(canvas, title, width, layout::top_margin(height, true));
    }

    match options.graph_type {
        GraphType::Bar => charts::bar::draw(canvas, options),
        GraphType::Line => charts::line::draw(canvas, options),
        GraphType::Pie => charts::pie::draw(canvas, options, false),
        GraphType::Donut => charts::pie::draw(canvas, options, true),
    }
    Ok(())
}

/// Index of the value drawn at `(x, y)` on a canvas of the given size
pub fn hit_test(options: &GraphOptions, width: f64, height: f64, x: f64, y: f64) -> Option<usize> {
    match options.graph_type {
        GraphType::Bar => charts::bar::bar_at(options, width, height, x, y),
        GraphType::Line => charts::line::point_at(options, width, height, x, y),
        GraphType::Pie => charts::pie::slice_at(options, width, height, x, y, false),
        GraphType::Donut => charts::pie::slice_at(options, width, height, x, y, true),
    }
}

/// Text shown in the tooltip of the `index`th value
pub fn tooltip_text(options: &GraphOptions, index: usize) -> Option<String> {
    let value = options.values.get(index)?;
    Some(match options.label(index) {
        Some(label) => format!("{}: {}", label, value),
        None => value.to_string(),
    })
}

/// Redraws the graph with a tooltip for the value under `(x, y)`
///
/// Returns the index of the value shown, or `None` (after a plain redraw)
/// when the pointer is not over any value.
pub fn show_tooltip<C: Canvas2d + ?Sized>(
    canvas: &mut C,
    options: &GraphOptions,
    x: f64,
    y: f64,
) -> Result<Option<usize>, GraphError> {
    create_graph(canvas, options)?;

    let hit = hit_test(options, canvas.width(), canvas.height(), x, y);
    if let Some(text) = hit.and_then(|index| tooltip_text(options, index)) {
        draw_tooltip(canvas, x, y, &text);
    }
    Ok(hit)
}
