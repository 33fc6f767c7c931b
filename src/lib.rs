//! motionchart draws animated data charts into a CPU raster surface.
//!
//! A chart is a [`Chart`] implementation driven by a [`ChartSurface`]:
//!
//! - [`ChartSurface::render`] binds a dataset (enter/update/exit join against keyed shape
//!   groups), starts attribute timelines and paints once, synchronously.
//! - [`ChartSurface::tick`] is the display-refresh callback. While any timeline runs, each
//!   tick samples the timelines and repaints the whole frame from the shapes' attributes.
//! - [`ChartSurface::run_until_idle`] drives an animation offline on a [`ManualClock`].
//!
//! Painting goes through [`RasterContext`], a canvas-like immediate-mode API over `vello_cpu`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Timelines, easing and clocks.
pub mod animation;
/// Concrete charts.
pub mod charts;
/// Value types shared across the crate.
pub mod foundation;
/// Scales and shape generators.
pub mod geometry;
/// Raster context, repaint loop and chart surface.
pub mod render;
/// Shapes, attributes and the data join.
pub mod scene;

pub use crate::animation::animator::Animator;
pub use crate::animation::clock::{Clock, ManualClock, SystemClock};
pub use crate::animation::ease::Ease;
pub use crate::animation::timeline::{Timeline, TimelineId, TimelineState, Track, Transition};
pub use crate::charts::{
    FoldedLabels, FoldedLabelsOptions, NestedPie, NestedPieOptions, OrbitMap, OrbitMapOptions,
    Pair, RadialFan, RadialFanOptions, RingBars, RingBarsOptions, Triple,
};
pub use crate::foundation::color::Color;
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, Point, Rect, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{ChartError, ChartResult};
pub use crate::foundation::math::format_grouped;
pub use crate::render::config::SurfaceConfig;
pub use crate::render::context::{
    LineCap, LinearGradient, Paint, RasterContext, TextAlign, TextBaseline,
};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::painter::{Painter, PolygonOpts};
pub use crate::render::render_loop::{RenderLoop, Ticker};
pub use crate::render::surface::{Chart, ChartSurface, SurfaceStats};
pub use crate::scene::attrs::{AttrStore, AttrValue, Attrs};
pub use crate::scene::join::Join;
pub use crate::scene::shape::{RemovedShape, Scene, ShapeGroup, ShapeId, ShapeInstance, ShapeState};
pub use crate::scene::stage::Stage;
