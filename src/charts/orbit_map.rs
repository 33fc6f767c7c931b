use std::f64::consts::{PI, TAU};

use serde::Deserialize;

use crate::{
    animation::ease::Ease,
    charts::{
        datasets::{finite_only, Pair},
        snapshots,
    },
    foundation::{color::Color, error::ChartResult},
    geometry::{outline::Outline, scale::OrdinalScale},
    render::{
        context::{LineCap, RasterContext, TextAlign, TextBaseline},
        surface::Chart,
    },
    scene::{shape::Scene, stage::Stage},
};

const MAP: &str = "map";
const CIRCLES: &str = "circles";
const DECORATIONS: &str = "decorations";

/// Options for [`OrbitMap`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrbitMapOptions {
    /// Space kept free around the chart.
    pub padding: f64,
    /// Region drawn at the center; accepts rings, GeoJSON polygons or features.
    pub outline: Outline,
    /// Region fill.
    pub map_fill: Color,
    /// Region edge.
    pub map_edge: Color,
    /// Annotation circle fill.
    pub circle_fill: Color,
    /// Leader lines and annotation text.
    pub line_color: Color,
    /// Decorative arcs around the region.
    pub decoration_color: Color,
}

impl Default for OrbitMapOptions {
    fn default() -> Self {
        Self {
            padding: 10.0,
            outline: Outline::default(),
            map_fill: Color::rgb8(0x0d, 0x58, 0x82),
            map_edge: Color::rgb8(0x1c, 0x1c, 0x1c),
            circle_fill: Color::rgb8(0x0d, 0x58, 0x82),
            line_color: Color::WHITE,
            decoration_color: Color::rgb8(0x0d, 0x58, 0x82),
        }
    }
}

// (start, end) in sixteenths of a half turn, and whether the arc is dashed.
const DECORATION_ARCS: [(f64, f64, bool); 7] = [
    (1.0, 2.0, false),
    (3.5, 6.0, false),
    (9.0, 14.0, true),
    (17.0, 23.0, false),
    (25.0, 30.0, true),
    (3.0, 10.0, false),
    (24.0, 28.0, false),
];

/// A region outline that zooms in on first render, with annotation circles swinging out to
/// their orbit positions and a ring of decorative arcs closing around the center.
///
/// Data: `(label, value)`; up to three items get distinct orbit slots, later ones reuse them.
#[derive(Clone, Debug, Default)]
pub struct OrbitMap {
    options: OrbitMapOptions,
}

impl OrbitMap {
    /// Chart with `options`.
    pub fn new(options: OrbitMapOptions) -> Self {
        Self { options }
    }

    /// Chart options.
    pub fn options(&self) -> &OrbitMapOptions {
        &self.options
    }
}

impl Chart for OrbitMap {
    type Datum = Pair;

    fn bind_data(&mut self, data: &[Pair], stage: &mut Stage<'_>) -> ChartResult<()> {
        let data = finite_only("orbit_map", data, |d| d.1);
        let canvas = stage.canvas();
        let p = self.options.padding;
        let big_r = ((f64::from(canvas.width) - 2.0 * p) / 4.0)
            .min((f64::from(canvas.height) - 2.0 * p) / 3.0)
            .max(0.0);
        let distance = 1.5 * big_r;

        let map = stage.join(MAP, &[()], |_| MAP.to_string());
        for &id in map.entered() {
            stage.write(id, "R", big_r * 10.0);
        }
        let mut zoom = stage.transition().ease(Ease::InOutCubic);
        for &id in map.bound() {
            zoom = zoom.attr(id, "R", big_r / 1.2);
        }
        stage.start(zoom);

        let mut angle = OrdinalScale::new(vec![PI, PI / 4.0 * 7.0, PI / 4.7]);
        let mut dist = OrdinalScale::new(vec![distance, 0.9 * distance, 0.95 * distance]);
        let mut line_dist = OrdinalScale::new(vec![distance / 6.0, distance / 3.0, distance / 2.5]);
        let mut radius = OrdinalScale::new(vec![big_r / 2.0, big_r * 0.9 / 2.0, big_r / 2.0]);

        let circles = stage.join(CIRCLES, &data, |d| d.0.clone());
        let mut orbit = stage.transition().ease(Ease::InOutCubic);
        for &id in circles.bound() {
            let Some(index) = stage.scene().shape(id).map(|s| s.datum_index()) else {
                continue;
            };
            let (label, value) = data[index];
            if circles.is_entered(id) {
                stage.write(id, "angle", 0.0);
                stage.write(id, "distance", 0.0);
                stage.write(id, "lineDistance", 0.0);
            }
            stage.write(id, "label", label.as_str());
            stage.write(id, "value", *value);
            stage.write(id, "R", radius.get(label).unwrap_or(0.0));
            stage.write(id, "fillStyle", self.options.circle_fill);
            orbit = orbit
                .attr(id, "angle", angle.get(label).unwrap_or(0.0))
                .attr(id, "distance", dist.get(label).unwrap_or(0.0))
                .attr(id, "lineDistance", line_dist.get(label).unwrap_or(0.0));
        }
        if !orbit.is_empty() {
            stage.start(orbit);
        }

        let center_r = big_r / 2.0;
        let dash = center_r / 15.0;
        let arcs: Vec<(usize, (f64, f64, bool))> =
            DECORATION_ARCS.iter().copied().enumerate().collect();
        let decorations = stage.join(DECORATIONS, &arcs, |d| d.0.to_string());
        let mut close = stage.transition().ease(Ease::InOutCubic);
        for &id in decorations.bound() {
            let Some(index) = stage.scene().shape(id).map(|s| s.datum_index()) else {
                continue;
            };
            let (i, (a0, a1, dashed)) = arcs[index];
            if decorations.is_entered(id) {
                stage.write(id, "startAngle", 0.0);
                stage.write(id, "endAngle", TAU);
            }
            stage.write(id, "R", if i > 4 { center_r } else { 1.2 * center_r });
            stage.write(id, "strokeStyle", self.options.decoration_color);
            stage.write(id, "dashed", dashed);
            stage.write(id, "lineWidth", dash);
            close = close
                .attr(id, "startAngle", PI / 16.0 * a0)
                .attr(id, "endAngle", PI / 16.0 * a1);
        }
        stage.start(close);
        Ok(())
    }

    fn paint_shapes(&self, scene: &Scene, ctx: &mut RasterContext) -> ChartResult<()> {
        let canvas = ctx.canvas();
        let o = &self.options;
        ctx.translate(f64::from(canvas.width) / 2.0, f64::from(canvas.height) / 2.0);

        if let Some(map) = snapshots(scene, MAP)?.first() {
            let r = map.num("R")?;
            let bounds = o.outline.bounds();
            let scale = (r / bounds.width()).min(r / bounds.height()) / 1.1;
            if scale.is_finite() && scale > 0.0 {
                let c = bounds.center();
                ctx.save();
                ctx.set_fill_style(o.map_fill);
                ctx.set_stroke_style(o.map_edge);
                ctx.set_line_width(0.1 / scale);
                // Outline data has y pointing up.
                ctx.scale(scale, -scale);
                ctx.translate(-c.x, -c.y);
                ctx.begin_path();
                ctx.append_path(&o.outline.to_path());
                ctx.fill();
                ctx.stroke();
                ctx.restore();
            }
        }

        for attrs in snapshots(scene, CIRCLES)? {
            let r = attrs.num("R")?;
            let angle = attrs.num("angle")?;
            let distance = attrs.num("distance")?;
            let line_distance = attrs.num("lineDistance")?;
            let (cx, cy) = (distance * angle.cos(), distance * angle.sin());

            ctx.save();
            ctx.set_stroke_style(o.line_color);
            ctx.begin_path();
            ctx.move_to(line_distance * angle.cos(), line_distance * angle.sin());
            ctx.line_to(cx, cy);
            ctx.stroke();
            ctx.restore();

            ctx.save();
            ctx.set_fill_style(attrs.color("fillStyle")?);
            ctx.translate(cx, cy);
            ctx.begin_path();
            ctx.arc(0.0, 0.0, r, 0.0, TAU, false);
            ctx.fill();
            ctx.set_fill_style(o.line_color);
            ctx.set_font_size(r / 3.0);
            ctx.set_text_align(TextAlign::Center);
            ctx.set_text_baseline(TextBaseline::Bottom);
            ctx.fill_text(&attrs.text("label")?, 0.0, 0.0);
            ctx.set_text_baseline(TextBaseline::Top);
            ctx.fill_text(&attrs.text("value")?, 0.0, 0.0);
            ctx.restore();
        }

        for attrs in snapshots(scene, DECORATIONS)? {
            let width = attrs.num("lineWidth")?;
            ctx.save();
            ctx.set_line_cap(LineCap::Round);
            if attrs.num("dashed")? != 0.0 {
                ctx.set_line_dash(&[width, width * 2.0]);
            }
            ctx.set_stroke_style(attrs.color("strokeStyle")?);
            ctx.set_line_width(width);
            ctx.begin_path();
            ctx.arc(
                0.0,
                0.0,
                attrs.num("R")?,
                attrs.num("startAngle")?,
                attrs.num("endAngle")?,
                false,
            );
            ctx.stroke();
            ctx.restore();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/charts/orbit_map.rs"]
mod tests;
