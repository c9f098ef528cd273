//! One module per chart type. Each exposes its pure geometry alongside the
//! drawing function so hit testing uses the exact shapes that were drawn.

pub mod bar;
pub mod line;
pub mod pie;
