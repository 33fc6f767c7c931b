use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::Deserialize;

use crate::{
    animation::ease::Ease,
    charts::{
        datasets::{finite_only, Pair},
        snapshots,
    },
    foundation::{color::Color, error::ChartResult, math::format_grouped},
    geometry::{
        arc::ArcShape,
        scale::{extent, LinearScale, OrdinalScale, PointScale},
    },
    render::{
        context::{RasterContext, TextAlign, TextBaseline},
        surface::Chart,
    },
    scene::{shape::Scene, stage::Stage},
};

const GROUP: &str = "rings";

/// Options for [`RingBars`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingBarsOptions {
    /// Space kept free around the chart.
    pub padding: f64,
    /// Smallest radius of the hollow center.
    pub min_center_radius: f64,
    /// Angle where every ring starts.
    pub start_radian: f64,
    /// Angle where every ring ends.
    pub end_radian: f64,
    /// Ring colors, assigned per label.
    pub colors: Vec<Color>,
    /// Appended to each formatted value.
    pub value_suffix: String,
}

impl Default for RingBarsOptions {
    fn default() -> Self {
        Self {
            padding: 10.0,
            min_center_radius: 10.0,
            start_radian: 1.5 * PI,
            end_radian: 0.5 * PI,
            colors: vec![
                Color::rgb8(0xcd, 0xbd, 0x13),
                Color::rgb8(0x00, 0x4c, 0xd7),
                Color::rgb8(0xb6, 0x27, 0xd0),
                Color::rgb8(0x46, 0x82, 0xb4),
                Color::rgb8(0xff, 0xc0, 0xcb),
            ],
            value_suffix: "户".to_string(),
        }
    }
}

/// Concentric half rings that straighten into horizontal bars, one per label, with leader
/// lines to value labels.
///
/// Data: `(label, value)`, drawn in ascending value order. The first half of the animation
/// (linear) lays out the rings and labels; a chained second half grows the bars.
#[derive(Clone, Debug)]
pub struct RingBars {
    options: RingBarsOptions,
    color: OrdinalScale<Color>,
}

impl RingBars {
    /// Chart with `options`.
    pub fn new(options: RingBarsOptions) -> Self {
        let color = OrdinalScale::new(options.colors.clone());
        Self { options, color }
    }

    /// Chart options.
    pub fn options(&self) -> &RingBarsOptions {
        &self.options
    }
}

impl Default for RingBars {
    fn default() -> Self {
        Self::new(RingBarsOptions::default())
    }
}

/// Ring geometry for `n` items on a canvas of `width` x `height`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RingLayout {
    pub(crate) big_r: f64,
    pub(crate) ring: f64,
    pub(crate) center: f64,
    pub(crate) head: f64,
    pub(crate) top: f64,
}

impl RingLayout {
    pub(crate) fn new(options: &RingBarsOptions, width: f64, height: f64, n: usize) -> Self {
        let p = options.padding;
        let big_r = (height * 1.2 - 2.0 * p) / 4.0;
        let mut ring = big_r / (n as f64 + 1.0);
        let mut center = ring;
        if center < options.min_center_radius {
            center = options.min_center_radius;
            ring = (big_r - center) / (n.max(1) as f64);
        }
        let w = width - 2.0 * p;
        Self {
            big_r,
            ring,
            center,
            head: (1.2 * center).min(w / 4.0),
            top: (1.2 * big_r).min(w / 2.0),
        }
    }
}

impl Chart for RingBars {
    type Datum = Pair;

    fn bind_data(&mut self, data: &[Pair], stage: &mut Stage<'_>) -> ChartResult<()> {
        let mut data = finite_only("ring_bars", data, |d| d.1);
        data.sort_by(|a, b| a.1.total_cmp(&b.1));

        let canvas = stage.canvas();
        let (start_radian, end_radian) = (self.options.start_radian, self.options.end_radian);
        let layout = RingLayout::new(
            &self.options,
            f64::from(canvas.width),
            f64::from(canvas.height),
            data.len(),
        );
        let domain = extent(data.iter().map(|d| d.1)).unwrap_or((0.0, 0.0));
        let height_scale = LinearScale::new(domain, (layout.head, layout.top));
        let text_scale = PointScale::new()
            .domain(data.iter().map(|d| d.0.as_str()))
            .range(layout.head * 1.2, layout.top);

        let half = stage.default_duration() / 2;
        let join = stage.join(GROUP, &data, |d| d.0.clone());
        let mut rings = stage.transition().duration(half).ease(Ease::Linear);
        let mut bars = stage.transition().duration(half).ease(Ease::InOutCubic);
        for &id in join.bound() {
            let Some(i) = stage.scene().shape(id).map(|s| s.datum_index()) else {
                continue;
            };
            let (label, value) = data[i];
            if join.is_entered(id) {
                stage.write(id, "startAngle", start_radian);
                stage.write(id, "endAngle", start_radian);
                stage.write(id, "height", 0.0);
            }
            let fill = self.color.get(label).unwrap_or(Color::BLACK);
            stage.write(id, "label", label.as_str());
            stage.write(id, "fillStyle", fill);
            stage.write(id, "width", layout.ring);
            stage.write(id, "R", layout.big_r);

            let inner = i as f64 * layout.ring + layout.center;
            rings = rings
                .attr(id, "innerRadius", inner)
                .attr(id, "outerRadius", inner + layout.ring)
                .attr(id, "value", *value)
                .attr(id, "endAngle", end_radian)
                .attr(id, "textY", text_scale.get(label).unwrap_or(layout.top))
                .attr(id, "textX", 1.5 * layout.big_r + i as f64 * layout.ring);
            bars = bars.attr(id, "height", height_scale.apply(*value));
        }
        if !rings.is_empty() {
            let first = stage.start(rings);
            stage.start_after(first, bars)?;
        }
        Ok(())
    }

    fn paint_shapes(&self, scene: &Scene, ctx: &mut RasterContext) -> ChartResult<()> {
        let canvas = ctx.canvas();
        ctx.translate(f64::from(canvas.width) / 4.0, f64::from(canvas.height) / 2.0);

        for attrs in snapshots(scene, GROUP)? {
            let inner = attrs.num("innerRadius")?;
            let outer = attrs.num("outerRadius")?;
            let band = attrs.num("width")?;
            let bar = attrs.num("height")?;
            let big_r = attrs.num("R")?;
            let (tx, ty) = (attrs.num("textX")?, attrs.num("textY")?);
            ctx.set_fill_style(attrs.color("fillStyle")?);

            ctx.save();
            ctx.rotate(FRAC_PI_2);
            ctx.begin_path();
            ctx.append_path(
                &ArcShape::new(
                    inner,
                    outer,
                    attrs.num("startAngle")?,
                    attrs.num("endAngle")?,
                )
                .path(),
            );
            ctx.fill();
            ctx.restore();

            ctx.begin_path();
            ctx.rect(0.0, inner, bar, band);
            ctx.fill();

            let font_size = band / 5.0 * 4.0;
            let py = (inner + outer) / 2.0;
            let value = format_grouped(attrs.num("value")?);

            ctx.save();
            ctx.set_font_size(font_size);
            ctx.set_text_align(TextAlign::End);
            ctx.set_text_baseline(TextBaseline::Bottom);
            ctx.translate(tx, ty);
            ctx.set_fill_style(Color::WHITE);
            let value_width = ctx.measure_text(&value);
            ctx.fill_text(&attrs.text("label")?, tx + value_width * 1.5, 0.0);
            ctx.set_font_size(font_size * 1.5);
            ctx.fill_text(&format!("{value}{}", self.options.value_suffix), tx, 0.0);
            ctx.restore();

            let line_y = ty - font_size;
            ctx.save();
            ctx.set_stroke_style(Color::WHITE);
            ctx.set_fill_style(Color::WHITE);
            ctx.set_line_width(0.5);
            ctx.begin_path();
            ctx.move_to(tx, line_y);
            ctx.line_to(tx - 1.5 * big_r, line_y);
            ctx.line_to(0.0, py);
            ctx.stroke();
            ctx.begin_path();
            ctx.arc(0.0, py, band / 10.0, 0.0, TAU, false);
            ctx.fill();
            ctx.restore();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/charts/ring_bars.rs"]
mod tests;
