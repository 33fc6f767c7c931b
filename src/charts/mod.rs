//! Concrete charts built on [`crate::ChartSurface`].
//!
//! Every chart binds through [`crate::Stage`] and paints only from attribute snapshots.

/// Loose JSON dataset parsing.
pub mod datasets;
/// Folded ribbon labels.
pub mod folded_labels;
/// Category pie with an outer detail ring.
pub mod nested_pie;
/// Outline map with orbiting annotation circles.
pub mod orbit_map;
/// Angular fan with detached inner sectors.
pub mod radial_fan;
/// Ring and bar hybrid.
pub mod ring_bars;

pub use datasets::{Pair, Triple};
pub use folded_labels::{FoldedLabels, FoldedLabelsOptions};
pub use nested_pie::{NestedPie, NestedPieOptions};
pub use orbit_map::{OrbitMap, OrbitMapOptions};
pub use radial_fan::{RadialFan, RadialFanOptions};
pub use ring_bars::{RingBars, RingBarsOptions};

use crate::{
    foundation::error::ChartResult,
    scene::{attrs::Attrs, shape::Scene},
};

/// Attribute snapshots of the live shapes of `group`, in join order.
pub(crate) fn snapshots(scene: &Scene, group: &str) -> ChartResult<Vec<Attrs>> {
    scene.live_in(group).map(|s| s.read_all()).collect()
}
