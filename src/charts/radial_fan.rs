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
        scale::{BandScale, OrdinalScale},
    },
    render::{
        context::{RasterContext, TextAlign, TextBaseline},
        surface::Chart,
    },
    scene::{shape::Scene, stage::Stage},
};

const GROUP: &str = "fans";

/// Options for [`RadialFan`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RadialFanOptions {
    /// Angle where the fan starts (radians from +x, clockwise on screen).
    pub start_radian: f64,
    /// Angle where the fan ends.
    pub end_radian: f64,
    /// Space kept free around the fan.
    pub padding: f64,
    /// Wedge colors, assigned per label.
    pub colors: Vec<Color>,
}

impl Default for RadialFanOptions {
    fn default() -> Self {
        Self {
            start_radian: PI,
            end_radian: TAU,
            padding: 40.0,
            colors: vec![
                Color::rgb8(0xf2, 0x65, 0x22),
                Color::rgb8(0xf7, 0x94, 0x1e),
                Color::rgb8(0xf9, 0xd1, 0x32),
                Color::rgb8(0x70, 0x9c, 0x34),
                Color::rgb8(0x00, 0x6c, 0xae),
            ],
        }
    }
}

/// Half-disc fan: one band per label, a detached inner sector, a rounded outer outline, the
/// label along the rim and the value inside the band.
///
/// Data: `(label, value)`. Entering wedges start collapsed at the fan's start angle with
/// value 0; `startAngle`, `endAngle`, `fanRd` and `value` animate.
#[derive(Clone, Debug)]
pub struct RadialFan {
    options: RadialFanOptions,
    color: OrdinalScale<Color>,
}

impl RadialFan {
    /// Chart with `options`.
    pub fn new(options: RadialFanOptions) -> Self {
        let color = OrdinalScale::new(options.colors.clone());
        Self { options, color }
    }

    /// Chart options.
    pub fn options(&self) -> &RadialFanOptions {
        &self.options
    }
}

impl Default for RadialFan {
    fn default() -> Self {
        Self::new(RadialFanOptions::default())
    }
}

impl Chart for RadialFan {
    type Datum = Pair;

    fn bind_data(&mut self, data: &[Pair], stage: &mut Stage<'_>) -> ChartResult<()> {
        let data = finite_only("radial_fan", data, |d| d.1);
        let start = self.options.start_radian;
        let band = BandScale::new()
            .domain(data.iter().map(|d| d.0.as_str()))
            .range(start, self.options.end_radian);
        let fan_rd = band.bandwidth();

        let join = stage.join(GROUP, &data, |d| d.0.clone());
        let mut t = stage.transition().ease(Ease::InOutCubic);
        for &id in join.bound() {
            let Some(index) = stage.scene().shape(id).map(|s| s.datum_index()) else {
                continue;
            };
            let (label, value) = data[index];
            let Some(a0) = band.get(label) else {
                continue;
            };
            if join.is_entered(id) {
                stage.write(id, "startAngle", start);
                stage.write(id, "endAngle", start);
                stage.write(id, "fanRd", 0.0);
                stage.write(id, "value", 0.0);
            }
            stage.write(id, "label", label.as_str());
            let fill = self.color.get(label).unwrap_or(Color::BLACK);
            t = t
                .attr(id, "startAngle", a0)
                .attr(id, "endAngle", a0 + fan_rd)
                .attr(id, "fanRd", fan_rd)
                .attr(id, "value", *value)
                .attr(id, "fillStyle", fill);
        }
        if !t.is_empty() {
            stage.start(t);
        }
        Ok(())
    }

    fn paint_shapes(&self, scene: &Scene, ctx: &mut RasterContext) -> ChartResult<()> {
        let items = snapshots(scene, GROUP)?;
        let canvas = ctx.canvas();
        let (width, height) = (f64::from(canvas.width), f64::from(canvas.height));
        let p = self.options.padding;

        let big_r = ((width - 2.0 * p) / 2.0).min(height - 2.0 * p) * 0.7;
        if big_r.is_nan() || big_r <= 0.0 {
            return Ok(());
        }
        let r = big_r / 16.0;
        let inner_r = 6.0 * r;
        let outer_start = inner_r + 1.5 * r;
        let corner_r = r;
        let corner_rd = (corner_r / big_r).asin() * 2.0;

        ctx.translate(width / 2.0, height - 2.0 * p);

        let last = items.len().saturating_sub(1);
        for (i, attrs) in items.iter().enumerate() {
            let fill = attrs.color("fillStyle")?;
            let a0 = attrs.num("startAngle")?;
            let a1 = attrs.num("endAngle")?;
            let fan_rd = attrs.num("fanRd")?;
            let mid = (a0 + a1) / 2.0;
            ctx.set_fill_style(fill);
            ctx.set_stroke_style(fill);
            ctx.set_line_width(r * 0.6);

            // Inner sector, pushed out along its bisector.
            ctx.save();
            ctx.rotate(mid);
            ctx.translate(r, 0.0);
            ctx.rotate(-mid);
            ctx.rotate(FRAC_PI_2);
            ctx.begin_path();
            ctx.append_path(&ArcShape::new(0.0, inner_r, a0, a1).path());
            ctx.fill();
            ctx.restore();

            // Outer outline with a rounded corner.
            ctx.save();
            ctx.rotate(a0);
            ctx.begin_path();
            ctx.move_to(outer_start, 0.0);
            ctx.line_to(big_r - corner_r, 0.0);
            ctx.arc(big_r - corner_r, corner_r, corner_r, -FRAC_PI_2, 0.0, false);
            if fan_rd - corner_rd / 2.0 > corner_rd {
                ctx.arc(0.0, 0.0, big_r, corner_rd, fan_rd - corner_rd / 2.0, false);
            }
            ctx.stroke();
            if i == last {
                ctx.rotate(fan_rd);
                ctx.begin_path();
                ctx.move_to(outer_start, 0.0);
                ctx.line_to(big_r - corner_r, 0.0);
                ctx.stroke();
            }
            ctx.restore();

            ctx.save();
            ctx.set_text_align(TextAlign::Center);
            ctx.set_font_size(r * 4.0 / 3.0);
            ctx.rotate(mid);
            ctx.translate(big_r + corner_r, 0.0);
            ctx.rotate(FRAC_PI_2);
            ctx.fill_text(&attrs.text("label")?, 0.0, 0.0);
            ctx.restore();

            let c = ArcShape::new(outer_start, big_r, a0, a1).centroid();
            ctx.save();
            ctx.set_fill_style(Color::WHITE);
            ctx.set_text_align(TextAlign::Center);
            ctx.set_text_baseline(TextBaseline::Middle);
            ctx.set_font_size(r * 5.0 / 4.0);
            ctx.rotate(FRAC_PI_2);
            ctx.translate(c.x, c.y);
            ctx.rotate(-FRAC_PI_2);
            ctx.fill_text(&format_grouped(attrs.num("value")?), 0.0, 0.0);
            ctx.restore();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/charts/radial_fan.rs"]
mod tests;
