use std::f64::consts::{FRAC_PI_2, TAU};

use kurbo::PathEl;

use crate::foundation::core::{BezPath, Point, Vec2};

const EPSILON: f64 = 1e-12;
const ARC_TOLERANCE: f64 = 0.05;

/// Point at `radius` and `angle`, where angles run clockwise from 12 o'clock.
pub fn polar(radius: f64, angle: f64) -> Point {
    Point::new(radius * (angle - FRAC_PI_2).cos(), radius * (angle - FRAC_PI_2).sin())
}

/// Sweep of a canvas `arc(start, end, anticlockwise)` call, signed (positive is clockwise).
pub fn canvas_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    if !anticlockwise {
        let d = end - start;
        if d >= TAU {
            TAU
        } else {
            d.rem_euclid(TAU)
        }
    } else {
        let d = start - end;
        if d >= TAU {
            -TAU
        } else {
            -d.rem_euclid(TAU)
        }
    }
}

/// Append a canvas-style arc (angles from the +x axis) to `out`.
///
/// The arc's start point is joined with a `LineTo` when `connect` is set, otherwise it begins
/// a new subpath. Negative or non-finite radii append nothing.
pub fn canvas_arc_elements(
    out: &mut Vec<PathEl>,
    connect: bool,
    center: Point,
    radius: f64,
    start: f64,
    end: f64,
    anticlockwise: bool,
) {
    if !radius.is_finite() || radius < 0.0 || !start.is_finite() || !end.is_finite() {
        return;
    }
    let p0 = center + Vec2::new(radius * start.cos(), radius * start.sin());
    out.push(if connect {
        PathEl::LineTo(p0)
    } else {
        PathEl::MoveTo(p0)
    });

    let sweep = canvas_sweep(start, end, anticlockwise);
    if sweep.abs() < EPSILON || radius < EPSILON {
        return;
    }
    let arc = kurbo::Arc {
        center,
        radii: Vec2::new(radius, radius),
        start_angle: start,
        sweep_angle: sweep,
        x_rotation: 0.0,
    };
    out.extend(arc.append_iter(ARC_TOLERANCE));
}

/// Annular sector with angles measured clockwise from 12 o'clock, centered at the
/// origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArcShape {
    /// Inner radius; zero yields a pie wedge.
    pub inner_radius: f64,
    /// Outer radius.
    pub outer_radius: f64,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
}

impl ArcShape {
    /// Sector between `start_angle` and `end_angle`.
    pub fn new(inner_radius: f64, outer_radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
            start_angle,
            end_angle,
        }
    }

    /// Closed outline of the sector.
    pub fn path(&self) -> BezPath {
        let (mut r0, mut r1) = (self.inner_radius, self.outer_radius);
        if r1 < r0 {
            std::mem::swap(&mut r0, &mut r1);
        }
        let a0 = self.start_angle - FRAC_PI_2;
        let a1 = self.end_angle - FRAC_PI_2;
        let da = (a1 - a0).abs();
        let cw = a1 > a0;
        let origin = Point::ORIGIN;

        let mut els = Vec::new();
        if !(r1 > EPSILON) {
            els.push(PathEl::MoveTo(origin));
        } else if da > TAU - EPSILON {
            canvas_arc_elements(&mut els, false, origin, r1, a0, a1, !cw);
            if r0 > EPSILON {
                canvas_arc_elements(&mut els, false, origin, r0, a1, a0, cw);
            }
        } else {
            canvas_arc_elements(&mut els, false, origin, r1, a0, a1, !cw);
            if r0 > EPSILON {
                canvas_arc_elements(&mut els, true, origin, r0, a1, a0, cw);
            } else {
                els.push(PathEl::LineTo(origin));
            }
        }
        els.push(PathEl::ClosePath);
        BezPath::from_vec(els)
    }

    /// Midpoint of the sector's centerline.
    pub fn centroid(&self) -> Point {
        let r = (self.inner_radius + self.outer_radius) / 2.0;
        let a = (self.start_angle + self.end_angle) / 2.0;
        polar(r, a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/arc.rs"]
mod tests;
