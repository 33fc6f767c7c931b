//! Shared value types: errors, colors, frame rates and number formatting.

/// Colors and CSS-style color parsing.
pub mod color;
/// Canvas, frame-rate and pixel primitives.
pub mod core;
/// Error taxonomy.
pub mod error;
/// Interpolation and number formatting helpers.
pub mod math;
