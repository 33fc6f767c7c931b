use serde::Deserialize;

use crate::{
    animation::ease::Ease,
    charts::{
        datasets::{finite_only, Triple},
        snapshots,
    },
    foundation::{
        color::Color,
        error::ChartResult,
        math::{format_plain, round_to},
    },
    geometry::{
        arc::ArcShape,
        pie::{PieLayout, PieSlice},
        scale::OrdinalScale,
    },
    render::{
        context::{RasterContext, TextAlign, TextBaseline},
        surface::Chart,
    },
    scene::{attrs::Attrs, join::Join, shape::Scene, stage::Stage},
};

const OUTER: &str = "outer";
const INNER: &str = "inner";

/// Options for [`NestedPie`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NestedPieOptions {
    /// Space kept free around the pie.
    pub padding: f64,
    /// Wedge colors, assigned per category.
    pub colors: Vec<Color>,
    /// Category totals are summed from `value / divisor`, each rounded to two decimals.
    pub divisor: f64,
    /// Appended to inner wedge titles.
    pub unit_suffix: String,
}

impl Default for NestedPieOptions {
    fn default() -> Self {
        Self {
            padding: 10.0,
            colors: vec![
                Color::rgb8(0x37, 0x91, 0xd0),
                Color::rgb8(0x3d, 0xd5, 0xae),
                Color::rgb8(0x46, 0x82, 0xb4),
            ],
            divisor: 10_000.0,
            unit_suffix: "(亿)".to_string(),
        }
    }
}

/// Pie of per-category totals inside a ring of the individual items.
///
/// Data: `(name, value, category)`. Outer wedges are keyed by name and laid out grouped by
/// category; inner wedges are keyed by category. Entering wedges grow from their start angle.
#[derive(Clone, Debug)]
pub struct NestedPie {
    options: NestedPieOptions,
    color: OrdinalScale<Color>,
}

impl NestedPie {
    /// Chart with `options`.
    pub fn new(options: NestedPieOptions) -> Self {
        let color = OrdinalScale::new(options.colors.clone());
        Self { options, color }
    }

    /// Chart options.
    pub fn options(&self) -> &NestedPieOptions {
        &self.options
    }

    /// Per-category totals in first-seen order.
    pub fn category_totals(&self, data: &[Triple]) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = Vec::new();
        for (_, value, category) in data {
            let part = round_to(value / self.options.divisor, 2);
            match totals.iter_mut().find(|(c, _)| c == category) {
                Some((_, sum)) => *sum += part,
                None => totals.push((category.clone(), part)),
            }
        }
        totals
    }

    fn bind_ring(
        &mut self,
        stage: &mut Stage<'_>,
        join: &Join,
        slices: &[PieSlice],
        label: impl Fn(usize) -> String,
        category: impl Fn(usize) -> String,
    ) {
        let mut t = stage.transition().ease(Ease::InOutCubic);
        for &id in join.bound() {
            let Some(index) = stage.scene().shape(id).map(|s| s.datum_index()) else {
                continue;
            };
            let Some(slice) = slices.get(index) else {
                continue;
            };
            if join.is_entered(id) {
                stage.write(id, "startAngle", slice.start_angle);
                stage.write(id, "endAngle", slice.start_angle);
            }
            stage.write(id, "label", label(index));
            stage.write(id, "value", slice.value);
            let fill = self.color.get(&category(index)).unwrap_or(Color::BLACK);
            t = t
                .attr(id, "fillStyle", fill)
                .attr(id, "startAngle", slice.start_angle)
                .attr(id, "endAngle", slice.end_angle);
        }
        if !t.is_empty() {
            stage.start(t);
        }
    }
}

impl Default for NestedPie {
    fn default() -> Self {
        Self::new(NestedPieOptions::default())
    }
}

fn wedge(ctx: &mut RasterContext, attrs: &Attrs, inner: f64, outer: f64) -> ChartResult<ArcShape> {
    let shape = ArcShape::new(
        inner,
        outer,
        attrs.num("startAngle")?,
        attrs.num("endAngle")?,
    );
    ctx.save();
    ctx.set_fill_style(attrs.color("fillStyle")?);
    ctx.set_line_width(0.5);
    ctx.begin_path();
    ctx.append_path(&shape.path());
    ctx.fill();
    ctx.stroke();
    ctx.restore();
    Ok(shape)
}

impl Chart for NestedPie {
    type Datum = Triple;

    fn bind_data(&mut self, data: &[Triple], stage: &mut Stage<'_>) -> ChartResult<()> {
        let items: Vec<Triple> = finite_only("nested_pie", data, |d| d.1)
            .into_iter()
            .cloned()
            .collect();

        let outer = PieLayout::new().layout_by(&items, |d| d.1, |a, b| a.2.cmp(&b.2));
        let totals = self.category_totals(&items);
        let inner = PieLayout::new().layout_by(&totals, |d| d.1, |a, b| a.0.cmp(&b.0));

        let join = stage.join(OUTER, &items, |d| d.0.clone());
        self.bind_ring(
            stage,
            &join,
            &outer,
            |i| items[i].0.clone(),
            |i| items[i].2.clone(),
        );

        let join = stage.join(INNER, &totals, |d| d.0.clone());
        self.bind_ring(
            stage,
            &join,
            &inner,
            |i| totals[i].0.clone(),
            |i| totals[i].0.clone(),
        );
        Ok(())
    }

    fn paint_shapes(&self, scene: &Scene, ctx: &mut RasterContext) -> ChartResult<()> {
        let canvas = ctx.canvas();
        let (width, height) = (f64::from(canvas.width), f64::from(canvas.height));
        let p = self.options.padding;

        let big_r = (width - 2.0 * p).min(height - 2.0 * p) / 2.5;
        let r = big_r / 3.0;
        let inner_end = 2.5 * r;
        let outer_start = 4.0 * r;
        let font_size = r / 3.0;

        ctx.translate(width / 2.0, height / 2.0);
        ctx.set_stroke_style(Color::WHITE);

        for attrs in snapshots(scene, OUTER)? {
            let shape = wedge(ctx, &attrs, outer_start, big_r)?;
            let mid = ArcShape::new(big_r, big_r + r, shape.start_angle, shape.end_angle).centroid();
            let edge = ArcShape::new(big_r, big_r, shape.start_angle, shape.end_angle).centroid();

            let (align, tx) = if mid.x > 0.0 {
                (TextAlign::Start, mid.x + r / 2.0)
            } else {
                (TextAlign::End, mid.x - r / 2.0)
            };
            ctx.save();
            ctx.set_text_align(align);
            ctx.set_text_baseline(TextBaseline::Middle);
            ctx.set_fill_style(Color::WHITE);
            ctx.set_font_size(font_size);
            ctx.fill_text(&attrs.text("label")?, tx, mid.y);
            ctx.restore();

            ctx.save();
            ctx.begin_path();
            ctx.move_to(tx, mid.y);
            ctx.line_to(mid.x, mid.y);
            ctx.line_to(edge.x, edge.y);
            ctx.stroke();
            ctx.restore();
        }

        for attrs in snapshots(scene, INNER)? {
            let shape = wedge(ctx, &attrs, 0.0, inner_end)?;
            let c = shape.centroid();

            ctx.save();
            ctx.set_fill_style(Color::WHITE);
            ctx.set_text_align(TextAlign::Center);
            ctx.set_text_baseline(TextBaseline::Middle);
            ctx.set_font_size(font_size);
            ctx.translate(c.x, c.y);
            let title = format!("{}{}", attrs.text("label")?, self.options.unit_suffix);
            ctx.fill_text(&title, 20.0, 0.0);
            ctx.fill_text(&format_plain(round_to(attrs.num("value")?, 2)), 0.0, font_size);
            ctx.restore();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/charts/nested_pie.rs"]
mod tests;
