//! Raster output: the canvas-like context, the repaint loop and the chart surface.

/// Surface configuration.
pub mod config;
/// Canvas-style drawing context over `vello_cpu`.
pub mod context;
/// Presented frames.
pub mod frame;
/// Polygon helper.
pub mod painter;
/// Per-surface repaint scheduler.
pub mod render_loop;
/// The chart surface and the `Chart` contract.
pub mod surface;
pub(crate) mod text;
