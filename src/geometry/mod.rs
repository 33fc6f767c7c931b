//! Scales and shape generators consumed by chart paint functions.

/// Annular sectors and arc path helpers.
pub mod arc;
/// Region outlines in planar coordinates.
pub mod outline;
/// Pie layout over a dataset.
pub mod pie;
/// Band, point, linear and ordinal scales.
pub mod scale;
