use crate::{
    foundation::{
        color::Color,
        core::{Affine, BezPath, Canvas, Point, Rect},
        error::{ChartError, ChartResult},
    },
    geometry::arc::canvas_arc_elements,
    render::{frame::FrameRGBA, text::Typesetter},
};

/// Linear gradient in user space, as created by `createLinearGradient` on a 2D canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    /// Start of the gradient axis.
    pub start: Point,
    /// End of the gradient axis.
    pub end: Point,
    /// Color stops sorted by offset in `[0, 1]`.
    pub stops: Vec<(f64, Color)>,
}

impl LinearGradient {
    /// Gradient along `start -> end` with no stops.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Add a stop; offsets are clamped to `[0, 1]` and kept sorted.
    pub fn add_stop(mut self, offset: f64, color: Color) -> Self {
        let offset = if offset.is_finite() {
            offset.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let at = self.stops.partition_point(|(o, _)| *o <= offset);
        self.stops.insert(at, (offset, color));
        self
    }
}

/// Fill or stroke paint.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Solid color.
    Solid(Color),
    /// Linear gradient.
    Linear(LinearGradient),
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Self::Solid(c)
    }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self {
        Self::Linear(g)
    }
}

/// Line cap style for strokes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Flat cap ending at the endpoint.
    #[default]
    Butt,
    /// Semicircular cap.
    Round,
    /// Square cap extending half the line width.
    Square,
}

/// Horizontal text anchor relative to the drawing point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Text starts at the point.
    #[default]
    Start,
    /// Text is centered on the point.
    Center,
    /// Text ends at the point.
    End,
}

/// Vertical text anchor relative to the drawing point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    /// Top of the em box.
    Top,
    /// Middle of the em box.
    Middle,
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Bottom of the em box.
    Bottom,
}

#[derive(Clone, Debug)]
struct DrawState {
    transform: Affine,
    fill: Paint,
    stroke: Paint,
    line_width: f64,
    line_cap: LineCap,
    line_dash: Vec<f64>,
    global_alpha: f64,
    font_size: f64,
    text_align: TextAlign,
    text_baseline: TextBaseline,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            fill: Paint::Solid(Color::BLACK),
            stroke: Paint::Solid(Color::BLACK),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_dash: Vec::new(),
            global_alpha: 1.0,
            font_size: 10.0,
            text_align: TextAlign::Start,
            text_baseline: TextBaseline::Alphabetic,
        }
    }
}

/// Immediate-mode 2D raster context backed by `vello_cpu`.
///
/// Drawing goes to a back buffer between [`RasterContext::begin_frame`] and
/// [`RasterContext::present`]; [`RasterContext::frame`] only ever returns the last presented
/// frame, so observers never see a partially drawn image.
///
/// Path coordinates are mapped through the transform that is current when they are added,
/// like a browser canvas.
pub struct RasterContext {
    canvas: Canvas,
    width_u16: u16,
    height_u16: u16,
    ctx: vello_cpu::RenderContext,
    front: vello_cpu::Pixmap,
    state: DrawState,
    stack: Vec<DrawState>,
    path: BezPath,
    has_current_point: bool,
    typesetter: Typesetter,
    warned_missing_font: bool,
}

impl RasterContext {
    /// Create a context for `canvas`; the presented frame starts fully transparent.
    pub fn new(canvas: Canvas) -> ChartResult<Self> {
        let width_u16: u16 = canvas
            .width
            .try_into()
            .map_err(|_| ChartError::validation("canvas width exceeds u16"))?;
        let height_u16: u16 = canvas
            .height
            .try_into()
            .map_err(|_| ChartError::validation("canvas height exceeds u16"))?;
        if width_u16 == 0 || height_u16 == 0 {
            return Err(ChartError::validation("canvas width/height must be non-zero"));
        }

        Ok(Self {
            canvas,
            width_u16,
            height_u16,
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
            front: vello_cpu::Pixmap::new(width_u16, height_u16),
            state: DrawState::default(),
            stack: Vec::new(),
            path: BezPath::new(),
            has_current_point: false,
            typesetter: Typesetter::new(),
            warned_missing_font: false,
        })
    }

    /// Canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Register a font used by all text operations.
    pub fn load_font(&mut self, font_bytes: Vec<u8>) -> ChartResult<String> {
        self.typesetter.load_font(font_bytes)
    }

    /// Whether text can be drawn.
    pub fn has_font(&self) -> bool {
        self.typesetter.has_font()
    }

    /// Start a new frame: back buffer cleared to transparent, state and path reset.
    pub fn begin_frame(&mut self) {
        self.ctx = vello_cpu::RenderContext::new(self.width_u16, self.height_u16);
        self.state = DrawState::default();
        self.stack.clear();
        self.begin_path();
    }

    /// Rasterize the back buffer and make it the presented frame.
    pub fn present(&mut self) {
        self.ctx.flush();
        clear_pixmap(&mut self.front, [0, 0, 0, 0]);
        self.ctx.render_to_pixmap(&mut self.front);
    }

    /// Copy of the last presented frame (premultiplied RGBA8).
    pub fn frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.front.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    /// Push the drawing state.
    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Pop the drawing state; an unbalanced restore is ignored.
    pub fn restore(&mut self) {
        if let Some(s) = self.stack.pop() {
            self.state = s;
        }
    }

    /// Current transform.
    pub fn current_transform(&self) -> Affine {
        self.state.transform
    }

    /// Replace the current transform.
    pub fn set_transform(&mut self, transform: Affine) {
        self.state.transform = transform;
    }

    /// Post-multiply a translation.
    pub fn translate(&mut self, x: f64, y: f64) {
        self.state.transform *= Affine::translate((x, y));
    }

    /// Post-multiply a rotation (radians, clockwise on screen).
    pub fn rotate(&mut self, radians: f64) {
        self.state.transform *= Affine::rotate(radians);
    }

    /// Post-multiply a scale.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform *= Affine::scale_non_uniform(sx, sy);
    }

    /// Set the fill paint.
    pub fn set_fill_style(&mut self, paint: impl Into<Paint>) {
        self.state.fill = paint.into();
    }

    /// Set the stroke paint.
    pub fn set_stroke_style(&mut self, paint: impl Into<Paint>) {
        self.state.stroke = paint.into();
    }

    /// Set the line width; non-positive or non-finite widths are ignored.
    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    /// Set the line cap.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    /// Set the dash pattern; an empty pattern draws solid lines.
    ///
    /// Patterns containing negative or non-finite entries are ignored, and odd-length patterns
    /// are repeated once.
    pub fn set_line_dash(&mut self, pattern: &[f64]) {
        if pattern.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return;
        }
        let mut dash = pattern.to_vec();
        if dash.len() % 2 == 1 {
            dash.extend_from_slice(pattern);
        }
        self.state.line_dash = dash;
    }

    /// Set the global alpha in `[0, 1]`.
    pub fn set_global_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() {
            self.state.global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    /// Set the font size in pixels.
    pub fn set_font_size(&mut self, size_px: f64) {
        if size_px.is_finite() && size_px > 0.0 {
            self.state.font_size = size_px;
        }
    }

    /// Current font size in pixels.
    pub fn font_size(&self) -> f64 {
        self.state.font_size
    }

    /// Set the horizontal text anchor.
    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    /// Set the vertical text anchor.
    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    /// Discard the current path.
    pub fn begin_path(&mut self) {
        self.path = BezPath::new();
        self.has_current_point = false;
    }

    /// Start a new subpath.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(self.state.transform * Point::new(x, y));
        self.has_current_point = true;
    }

    /// Line from the current point; acts as `move_to` on an empty path.
    pub fn line_to(&mut self, x: f64, y: f64) {
        let p = self.state.transform * Point::new(x, y);
        if self.has_current_point {
            self.path.line_to(p);
        } else {
            self.path.move_to(p);
            self.has_current_point = true;
        }
    }

    /// Quadratic Bézier from the current point.
    pub fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        if !self.has_current_point {
            self.move_to(cx, cy);
        }
        let t = self.state.transform;
        self.path
            .quad_to(t * Point::new(cx, cy), t * Point::new(x, y));
    }

    /// Cubic Bézier from the current point.
    pub fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        if !self.has_current_point {
            self.move_to(c1x, c1y);
        }
        let t = self.state.transform;
        self.path.curve_to(
            t * Point::new(c1x, c1y),
            t * Point::new(c2x, c2y),
            t * Point::new(x, y),
        );
    }

    /// Circular arc with canvas semantics: angles in radians from the +x axis, clockwise on
    /// screen unless `anticlockwise`. Connects from the current point with a line.
    pub fn arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64, anticlockwise: bool) {
        let mut user = Vec::new();
        canvas_arc_elements(
            &mut user,
            self.has_current_point,
            Point::new(cx, cy),
            radius,
            start,
            end,
            anticlockwise,
        );
        self.append_user_elements(&user);
    }

    /// Closed rectangle subpath.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close_path();
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) {
        if self.has_current_point {
            self.path.close_path();
        }
    }

    /// Append a user-space path (mapped through the current transform).
    pub fn append_path(&mut self, path: &BezPath) {
        self.append_user_elements(path.elements());
    }

    fn append_user_elements(&mut self, user: &[kurbo::PathEl]) {
        let t = self.state.transform;
        for el in user {
            let el = t * *el;
            match el {
                kurbo::PathEl::MoveTo(p) => self.path.move_to(p),
                kurbo::PathEl::LineTo(p) if !self.has_current_point => self.path.move_to(p),
                kurbo::PathEl::LineTo(p) => self.path.line_to(p),
                kurbo::PathEl::QuadTo(a, b) => self.path.quad_to(a, b),
                kurbo::PathEl::CurveTo(a, b, c) => self.path.curve_to(a, b, c),
                kurbo::PathEl::ClosePath => self.path.close_path(),
            }
            self.has_current_point = true;
        }
    }

    /// Fill the current path (nonzero winding) with the fill paint.
    pub fn fill(&mut self) {
        let path = self.path.clone();
        let paint = self.state.fill.clone();
        self.draw(&path, &paint, None);
    }

    /// Stroke the current path with the stroke paint, line width, cap and dash.
    pub fn stroke(&mut self) {
        let path = self.path.clone();
        let paint = self.state.stroke.clone();
        let stroke = self.cpu_stroke();
        self.draw(&path, &paint, Some(stroke));
    }

    /// Fill a rectangle without touching the current path.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        use kurbo::Shape as _;

        let device = self.state.transform * Rect::new(x, y, x + w, y + h).to_path(0.1);
        let paint = self.state.fill.clone();
        self.draw(&device, &paint, None);
    }

    /// Width of `text` at the current font size.
    pub fn measure_text(&mut self, text: &str) -> f64 {
        self.typesetter.measure(text, self.state.font_size)
    }

    /// Draw `text` anchored at `(x, y)` using the current align/baseline and fill paint.
    ///
    /// Without a loaded font this draws nothing.
    pub fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        if !self.typesetter.has_font() {
            if !self.warned_missing_font {
                tracing::warn!("no font loaded; text is not drawn");
                self.warned_missing_font = true;
            }
            return;
        }
        let Some(shaped) = self.typesetter.shape(text, self.state.font_size) else {
            return;
        };
        let Some(font) = self.typesetter.font_data().cloned() else {
            return;
        };

        let dx = match self.state.text_align {
            TextAlign::Start => 0.0,
            TextAlign::Center => -shaped.width / 2.0,
            TextAlign::End => -shaped.width,
        };
        let dy = match self.state.text_baseline {
            TextBaseline::Top => -(shaped.baseline - shaped.ascent),
            TextBaseline::Middle => -(shaped.baseline - (shaped.ascent - shaped.descent) / 2.0),
            TextBaseline::Alphabetic => -shaped.baseline,
            TextBaseline::Bottom => -(shaped.baseline + shaped.descent),
        };

        let fill = self.state.fill.clone();
        let alpha = self.state.global_alpha;
        if !self.apply_paint(&fill, alpha) {
            return;
        }
        let transform = self.state.transform * Affine::translate((x + dx, y + dy));
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    fn cpu_stroke(&self) -> vello_cpu::kurbo::Stroke {
        let cap = match self.state.line_cap {
            LineCap::Butt => vello_cpu::kurbo::Cap::Butt,
            LineCap::Round => vello_cpu::kurbo::Cap::Round,
            LineCap::Square => vello_cpu::kurbo::Cap::Square,
        };
        let stroke = vello_cpu::kurbo::Stroke::new(self.state.line_width).with_caps(cap);
        if self.state.line_dash.iter().any(|d| *d > 0.0) {
            stroke.with_dashes(0.0, self.state.line_dash.iter().copied())
        } else {
            stroke
        }
    }

    // Paths are stored in device space; drawing maps them back into user space so strokes
    // and gradients follow the current transform.
    fn draw(&mut self, device: &BezPath, paint: &Paint, stroke: Option<vello_cpu::kurbo::Stroke>) {
        if device.elements().is_empty() {
            return;
        }
        let transform = self.state.transform;
        if transform.determinant().abs() < 1e-12 {
            return;
        }
        let alpha = self.state.global_alpha;
        if !self.apply_paint(paint, alpha) {
            return;
        }
        let user = transform.inverse() * device.clone();
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        match stroke {
            Some(s) => {
                self.ctx.set_stroke(s);
                self.ctx.stroke_path(&bezpath_to_cpu(&user));
            }
            None => self.ctx.fill_path(&bezpath_to_cpu(&user)),
        }
    }

    // Returns false when the paint would draw nothing.
    fn apply_paint(&mut self, paint: &Paint, alpha: f64) -> bool {
        if alpha <= 0.0 {
            return false;
        }
        match paint {
            Paint::Solid(c) => {
                self.ctx.set_paint(color_to_cpu(*c, alpha));
                true
            }
            Paint::Linear(g) => match g.stops.as_slice() {
                [] => false,
                [(_, only)] => {
                    self.ctx.set_paint(color_to_cpu(*only, alpha));
                    true
                }
                stops => {
                    let stops: Vec<vello_cpu::peniko::ColorStop> = stops
                        .iter()
                        .map(|(o, c)| vello_cpu::peniko::ColorStop {
                            offset: *o as f32,
                            color: color_to_cpu(*c, alpha).into(),
                        })
                        .collect();
                    let gradient = vello_cpu::peniko::Gradient::new_linear(
                        point_to_cpu(g.start),
                        point_to_cpu(g.end),
                    )
                    .with_stops(stops.as_slice());
                    self.ctx.set_paint(gradient);
                    true
                }
            },
        }
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn color_to_cpu(c: Color, alpha: f64) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    let a = ((f64::from(a) * alpha).round()).clamp(0.0, 255.0) as u8;
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
