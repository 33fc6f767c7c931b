use crate::{
    foundation::{
        core::Point,
        error::{ChartError, ChartResult},
    },
    render::context::RasterContext,
};

/// Options for [`Painter::draw_polygon`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolygonOpts {
    /// Close the path back to the first vertex.
    pub close: bool,
    /// Fill with the current fill paint.
    pub fill: bool,
    /// Stroke with the current stroke paint.
    pub stroke: bool,
}

impl Default for PolygonOpts {
    fn default() -> Self {
        Self {
            close: true,
            fill: true,
            stroke: false,
        }
    }
}

impl PolygonOpts {
    /// Stroke only, leaving the path open.
    pub fn outline() -> Self {
        Self {
            close: false,
            fill: false,
            stroke: true,
        }
    }
}

/// Stateless helper turning vertex lists into painted paths.
///
/// The painter never touches paint state; callers set colors and line widths (and
/// save/restore around them) themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct Painter;

impl Painter {
    /// Build one path through `points` and fill and/or stroke it per `opts`.
    ///
    /// An empty vertex list is a caller bug and fails with [`ChartError::Precondition`].
    pub fn draw_polygon(
        ctx: &mut RasterContext,
        points: &[Point],
        opts: PolygonOpts,
    ) -> ChartResult<()> {
        let Some((first, rest)) = points.split_first() else {
            return Err(ChartError::precondition(
                "draw_polygon needs at least one vertex",
            ));
        };
        ctx.begin_path();
        ctx.move_to(first.x, first.y);
        for p in rest {
            ctx.line_to(p.x, p.y);
        }
        if opts.close {
            ctx.close_path();
        }
        if opts.fill {
            ctx.fill();
        }
        if opts.stroke {
            ctx.stroke();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/painter.rs"]
mod tests;
