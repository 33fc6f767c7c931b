use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::{
    color::Color,
    error::{ChartError, ChartResult},
    math::format_plain,
};

/// Attribute value: numeric or string.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// Numeric value; the only kind that interpolates.
    Num(f64),
    /// String value (labels, color keys); switches atomically.
    Str(String),
}

impl AttrValue {
    /// Numeric payload, if numeric.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(v) => Some(*v),
            Self::Str(_) => None,
        }
    }

    /// String payload, if a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Num(_) => None,
            Self::Str(s) => Some(s),
        }
    }

    /// Value as seen by readers: strings that parse as a finite number read back as numbers.
    ///
    /// A label such as `"123"` therefore reads back numeric. Surrounding whitespace is ignored
    /// and empty strings stay strings.
    pub fn coerced(&self) -> AttrValue {
        match self {
            Self::Num(v) => Self::Num(*v),
            Self::Str(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && !s.trim().is_empty() => Self::Num(v),
                _ => Self::Str(s.clone()),
            },
        }
    }

    /// Text rendering of the value (numbers without a trailing `.0`).
    pub fn to_text(&self) -> String {
        match self {
            Self::Num(v) => format_plain(*v),
            Self::Str(s) => s.clone(),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Num(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        Self::Num(f64::from(v))
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Num(if v { 1.0 } else { 0.0 })
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Color> for AttrValue {
    fn from(c: Color) -> Self {
        Self::Str(c.to_hex())
    }
}

/// Per-shape attribute storage: a declared-name set plus current values.
///
/// Nothing is registered up front; writing a name declares it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttrStore {
    declared: BTreeSet<String>,
    values: BTreeMap<String, AttrValue>,
}

impl AttrStore {
    /// Empty store with nothing declared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` (if new) and set its value.
    pub fn declare_and_write(&mut self, name: &str, value: impl Into<AttrValue>) {
        if !self.declared.contains(name) {
            self.declared.insert(name.to_string());
        }
        self.values.insert(name.to_string(), value.into());
    }

    /// Whether anything was ever declared.
    pub fn is_declared(&self) -> bool {
        !self.declared.is_empty()
    }

    /// Declared attribute names, sorted.
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.declared.iter().map(String::as_str)
    }

    /// Raw stored value, without coercion.
    pub fn raw(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    /// Every declared attribute with its coerced current value.
    ///
    /// Fails with a precondition error if nothing was ever declared on this store.
    pub fn read_all(&self) -> ChartResult<Attrs> {
        if self.declared.is_empty() {
            return Err(ChartError::precondition(
                "attributes read before any were declared",
            ));
        }
        let values = self
            .declared
            .iter()
            .filter_map(|name| {
                self.values
                    .get(name)
                    .map(|v| (name.clone(), v.coerced()))
            })
            .collect();
        Ok(Attrs { values })
    }
}

/// Snapshot of a shape's attributes returned by [`AttrStore::read_all`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrs {
    values: BTreeMap<String, AttrValue>,
}

impl Attrs {
    /// Value of `name`, if declared.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    /// Numeric value of `name`.
    pub fn num(&self, name: &str) -> ChartResult<f64> {
        match self.values.get(name) {
            Some(AttrValue::Num(v)) => Ok(*v),
            Some(AttrValue::Str(s)) => Err(ChartError::malformed(format!(
                "attribute '{name}' is not numeric: {s:?}"
            ))),
            None => Err(ChartError::precondition(format!(
                "attribute '{name}' was never declared"
            ))),
        }
    }

    /// Numeric value of `name`, or `default` when missing or not numeric.
    pub fn num_or(&self, name: &str, default: f64) -> f64 {
        self.num(name).unwrap_or(default)
    }

    /// Text of `name`; numeric values are formatted back.
    pub fn text(&self, name: &str) -> ChartResult<String> {
        self.values
            .get(name)
            .map(AttrValue::to_text)
            .ok_or_else(|| ChartError::precondition(format!("attribute '{name}' was never declared")))
    }

    /// Color stored under `name`.
    pub fn color(&self, name: &str) -> ChartResult<Color> {
        match self.values.get(name) {
            Some(AttrValue::Str(s)) => Color::parse(s),
            Some(AttrValue::Num(v)) => Err(ChartError::malformed(format!(
                "attribute '{name}' holds a number ({v}), not a color"
            ))),
            None => Err(ChartError::precondition(format!(
                "attribute '{name}' was never declared"
            ))),
        }
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/attrs.rs"]
mod tests;
