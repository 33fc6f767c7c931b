use crate::foundation::error::{ChartError, ChartResult};

/// Shaped text ready to be drawn, plus the metrics needed for alignment.
pub(crate) struct ShapedText {
    pub(crate) layout: parley::Layout<()>,
    pub(crate) width: f64,
    pub(crate) ascent: f64,
    pub(crate) descent: f64,
    pub(crate) baseline: f64,
}

struct LoadedFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

/// Stateful helper for shaping text with Parley from a single registered font.
///
/// Without a font every layout request returns `None` and measurements fall back to a
/// fixed-advance estimate.
pub struct Typesetter {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    font: Option<LoadedFont>,
}

impl Default for Typesetter {
    fn default() -> Self {
        Self::new()
    }
}

impl Typesetter {
    /// Advance used per character when no font is loaded, in ems.
    pub const FALLBACK_ADVANCE_EM: f64 = 0.6;

    /// Construct a typesetter with fresh Parley contexts and no font.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            font: None,
        }
    }

    /// Register font bytes and use their first family for all text.
    pub fn load_font(&mut self, font_bytes: Vec<u8>) -> ChartResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ChartError::render("no font families registered from font bytes"))?;

        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ChartError::render("registered font family has no name"))?
            .to_string();

        let data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        tracing::debug!(family = %family, "loaded chart font");
        self.font = Some(LoadedFont {
            family: family.clone(),
            data,
        });
        Ok(family)
    }

    /// Whether a font has been loaded.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub(crate) fn font_data(&self) -> Option<&vello_cpu::peniko::FontData> {
        self.font.as_ref().map(|f| &f.data)
    }

    pub(crate) fn shape(&mut self, text: &str, size_px: f64) -> Option<ShapedText> {
        let family = self.font.as_ref()?.family.clone();
        if text.is_empty() || !size_px.is_finite() || size_px <= 0.0 {
            return None;
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let (ascent, descent, baseline) = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                (
                    f64::from(m.ascent),
                    f64::from(m.descent),
                    f64::from(m.baseline),
                )
            })
            .unwrap_or((size_px * 0.8, size_px * 0.2, size_px * 0.8));

        Some(ShapedText {
            width: f64::from(layout.width()),
            layout,
            ascent,
            descent,
            baseline,
        })
    }

    /// Advance width of `text` at `size_px`.
    pub fn measure(&mut self, text: &str, size_px: f64) -> f64 {
        match self.shape(text, size_px) {
            Some(shaped) => shaped.width,
            None => Self::FALLBACK_ADVANCE_EM * size_px * (text.chars().count() as f64),
        }
    }
}
