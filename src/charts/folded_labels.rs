use serde::Deserialize;

use crate::{
    charts::{datasets::{finite_only, Pair}, snapshots},
    foundation::{
        color::Color,
        core::Point,
        error::ChartResult,
        math::format_grouped,
    },
    geometry::scale::{BandScale, OrdinalScale},
    render::{
        context::{LinearGradient, RasterContext, TextAlign, TextBaseline},
        painter::{Painter, PolygonOpts},
        surface::Chart,
    },
    scene::{shape::Scene, stage::Stage},
};

const GROUP: &str = "labels";

/// Options for [`FoldedLabels`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoldedLabelsOptions {
    /// Band inner padding (fraction of a step).
    pub padding_inner: f64,
    /// Band outer padding (fraction of a step).
    pub padding_outer: f64,
    /// Space kept free above the first band.
    pub head_height: f64,
    /// Ribbon colors, assigned per label in first-seen order.
    pub colors: Vec<Color>,
    /// Appended to each formatted value.
    pub value_suffix: String,
}

impl Default for FoldedLabelsOptions {
    fn default() -> Self {
        Self {
            padding_inner: 0.12,
            padding_outer: 0.12,
            head_height: 15.0,
            colors: vec![
                Color::rgb8(0x56, 0xc6, 0xff),
                Color::rgb8(0x5c, 0x2c, 0xb9),
                Color::rgb8(0x46, 0x82, 0xb4),
            ],
            value_suffix: "户".to_string(),
        }
    }
}

/// A stack of labeled ribbons, each folding from a wide title band into a narrower value tab.
///
/// Data: `(label, value)`. Nothing animates; every bind writes `label`, `value` and
/// `fillStyle` directly.
#[derive(Clone, Debug)]
pub struct FoldedLabels {
    options: FoldedLabelsOptions,
    color: OrdinalScale<Color>,
}

impl FoldedLabels {
    /// Chart with `options`.
    pub fn new(options: FoldedLabelsOptions) -> Self {
        let color = OrdinalScale::new(options.colors.clone());
        Self { options, color }
    }

    /// Chart options.
    pub fn options(&self) -> &FoldedLabelsOptions {
        &self.options
    }
}

impl Default for FoldedLabels {
    fn default() -> Self {
        Self::new(FoldedLabelsOptions::default())
    }
}

fn shade() -> LinearGradient {
    LinearGradient::new(Point::ZERO, Point::new(1.0, 0.0))
        .add_stop(0.0, Color::rgba(0.0, 0.0, 0.0, 0.2))
        .add_stop(2.0 / 6.0, Color::rgba(0.0, 0.0, 0.0, 0.01))
        .add_stop(2.0 / 6.0 + 0.001, Color::rgba(0.0, 0.0, 0.0, 0.4))
        .add_stop(3.0 / 6.0, Color::rgba(0.0, 0.0, 0.0, 0.3))
        .add_stop(3.0 / 6.0 + 0.001, Color::rgba(0.0, 0.0, 0.0, 0.4))
        .add_stop(0.9, Color::rgba(0.0, 0.0, 0.0, 0.0))
}

impl Chart for FoldedLabels {
    type Datum = Pair;

    fn bind_data(&mut self, data: &[Pair], stage: &mut Stage<'_>) -> ChartResult<()> {
        let data = finite_only("folded_labels", data, |d| d.1);
        let join = stage.join(GROUP, &data, |d| d.0.clone());
        for &id in join.bound() {
            let Some(index) = stage.scene().shape(id).map(|s| s.datum_index()) else {
                continue;
            };
            let (label, value) = data[index];
            let fill = self.color.get(label).unwrap_or(Color::BLACK);
            stage.write(id, "label", label.as_str());
            stage.write(id, "value", *value);
            stage.write(id, "fillStyle", fill);
        }
        Ok(())
    }

    fn paint_shapes(&self, scene: &Scene, ctx: &mut RasterContext) -> ChartResult<()> {
        let items = snapshots(scene, GROUP)?;
        if items.is_empty() {
            return Ok(());
        }
        let labels = items
            .iter()
            .map(|a| a.text("label"))
            .collect::<ChartResult<Vec<_>>>()?;

        let o = &self.options;
        let canvas = ctx.canvas();
        let (width, height) = (f64::from(canvas.width), f64::from(canvas.height));

        let band = BandScale::new()
            .domain(labels.iter())
            .range(o.head_height, height)
            .padding_inner(o.padding_inner)
            .padding_outer(o.padding_outer);
        let h = band.bandwidth() * 2.0 / 3.0;
        let band2 = BandScale::new()
            .domain(labels.iter())
            .range(o.head_height + h / 3.0, height - h / 8.0)
            .padding_inner(o.padding_inner)
            .padding_outer(o.padding_outer);
        let h2 = band2.bandwidth() * 2.0 / 3.0;

        let x = o.padding_outer * h;
        let w = width - x;
        let s = (width - 2.0 * x) / 6.0;
        let mut gradient = shade();
        gradient.start = Point::new(x, 0.0);
        gradient.end = Point::new(w, 0.0);

        ctx.set_font_size(h / 4.0);
        ctx.set_text_baseline(TextBaseline::Middle);

        for (attrs, label) in items.iter().zip(&labels) {
            let (Some(y), Some(y2)) = (band.get(label), band2.get(label)) else {
                continue;
            };
            ctx.set_fill_style(attrs.color("fillStyle")?);
            Painter::draw_polygon(
                ctx,
                &[
                    Point::new(x, y),
                    Point::new(x + 2.0 * s, y),
                    Point::new(x + 3.0 * s, y2),
                    Point::new(w - h2 / 3.0, y2),
                    Point::new(w, y2 + h2 / 2.0),
                    Point::new(w - h2 / 3.0, y2 + h2),
                    Point::new(x + 3.0 * s, y2 + h2),
                    Point::new(x + 2.0 * s, y + h),
                    Point::new(x, y + h),
                ],
                PolygonOpts::default(),
            )?;
            ctx.set_fill_style(gradient.clone());
            ctx.fill();

            ctx.set_fill_style(Color::WHITE);
            ctx.set_text_align(TextAlign::Center);
            ctx.fill_text(label, x + s, y + h / 2.0);
            ctx.set_text_align(TextAlign::Start);
            let value = format!("{}{}", format_grouped(attrs.num("value")?), o.value_suffix);
            ctx.fill_text(&value, x + 3.4 * s, y2 + h2 / 2.0);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/charts/folded_labels.rs"]
mod tests;
