use serde_json::Value;

use crate::foundation::error::{ChartError, ChartResult};

/// `(label, value)` item used by most charts.
pub type Pair = (String, f64);

/// `(name, value, category)` item used by [`crate::charts::NestedPie`].
pub type Triple = (String, f64, String);

/// Parse one `["label", value]` or `{"label": .., "value": ..}` item.
///
/// Labels may be strings or numbers; values may be numbers or numeric strings.
pub fn parse_pair(item: &Value) -> ChartResult<Pair> {
    match item {
        Value::Array(parts) => match parts.as_slice() {
            [label, value, ..] => Ok((label_of(label)?, number_of(value)?)),
            _ => Err(ChartError::malformed(format!(
                "expected [label, value], got {item}"
            ))),
        },
        Value::Object(map) => {
            let label = map
                .get("label")
                .or_else(|| map.get("name"))
                .ok_or_else(|| ChartError::malformed(format!("missing label in {item}")))?;
            let value = map
                .get("value")
                .ok_or_else(|| ChartError::malformed(format!("missing value in {item}")))?;
            Ok((label_of(label)?, number_of(value)?))
        }
        other => Err(ChartError::malformed(format!(
            "expected [label, value], got {other}"
        ))),
    }
}

/// Parse one `["name", value, "category"]` or `{"name", "value", "category"}` item.
pub fn parse_triple(item: &Value) -> ChartResult<Triple> {
    match item {
        Value::Array(parts) => match parts.as_slice() {
            [name, value, category, ..] => {
                Ok((label_of(name)?, number_of(value)?, label_of(category)?))
            }
            _ => Err(ChartError::malformed(format!(
                "expected [name, value, category], got {item}"
            ))),
        },
        Value::Object(map) => {
            let field = |k: &str| {
                map.get(k)
                    .ok_or_else(|| ChartError::malformed(format!("missing {k} in {item}")))
            };
            let name = map
                .get("name")
                .or_else(|| map.get("label"))
                .ok_or_else(|| ChartError::malformed(format!("missing name in {item}")))?;
            Ok((
                label_of(name)?,
                number_of(field("value")?)?,
                label_of(field("category")?)?,
            ))
        }
        other => Err(ChartError::malformed(format!(
            "expected [name, value, category], got {other}"
        ))),
    }
}

/// Parse a JSON array of pairs, logging and skipping malformed items.
pub fn pairs(value: &Value) -> ChartResult<Vec<Pair>> {
    collect(value, parse_pair)
}

/// Parse a JSON array of triples, logging and skipping malformed items.
pub fn triples(value: &Value) -> ChartResult<Vec<Triple>> {
    collect(value, parse_triple)
}

/// Parse JSON text into a [`Value`].
pub fn from_json_str(text: &str) -> ChartResult<Value> {
    serde_json::from_str(text).map_err(|e| ChartError::serde(format!("dataset json: {e}")))
}

fn collect<T>(value: &Value, parse: impl Fn(&Value) -> ChartResult<T>) -> ChartResult<Vec<T>> {
    let Value::Array(items) = value else {
        return Err(ChartError::malformed("dataset must be a JSON array"));
    };
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match parse(item) {
            Ok(v) => out.push(v),
            Err(err) => tracing::warn!(index, %err, "skipping dataset item"),
        }
    }
    Ok(out)
}

fn label_of(v: &Value) -> ChartResult<String> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ChartError::malformed(format!("label must be text, got {other}"))),
    }
}

fn number_of(v: &Value) -> ChartResult<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(ChartError::malformed(format!("value must be a finite number, got {v}"))),
    }
}

/// Keep the items whose numeric fields are finite, warning about the rest.
pub(crate) fn finite_only<'a, T>(
    chart: &'static str,
    data: &'a [T],
    value: impl Fn(&T) -> f64,
) -> Vec<&'a T> {
    data.iter()
        .enumerate()
        .filter_map(|(index, d)| {
            if value(d).is_finite() {
                Some(d)
            } else {
                let err = ChartError::malformed("value is not finite");
                tracing::warn!(chart, index, %err, "skipping item");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/charts/datasets.rs"]
mod tests;
