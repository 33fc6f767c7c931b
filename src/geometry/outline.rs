use serde::{Deserialize, Deserializer};

use crate::foundation::{
    core::{BezPath, Point, Rect},
    error::{ChartError, ChartResult},
};

/// Planar region outline made of closed polygon rings, in un-projected data coordinates
/// (y grows upwards).
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    rings: Vec<Vec<Point>>,
}

// A tall, irregular region used when no outline is configured.
const BUILTIN_RING: &[(f64, f64)] = &[
    (110.6, 39.6),
    (111.2, 39.4),
    (111.0, 38.7),
    (110.5, 38.0),
    (110.4, 37.3),
    (110.6, 36.6),
    (110.4, 35.8),
    (110.2, 35.1),
    (110.6, 34.6),
    (110.9, 34.0),
    (110.6, 33.3),
    (111.0, 32.7),
    (110.2, 32.6),
    (109.4, 32.0),
    (108.6, 32.2),
    (107.4, 32.5),
    (106.3, 32.8),
    (105.6, 32.7),
    (106.0, 33.4),
    (106.5, 34.2),
    (106.6, 35.1),
    (107.3, 35.9),
    (107.6, 36.7),
    (108.3, 37.1),
    (107.9, 37.7),
    (108.8, 38.2),
    (109.6, 38.9),
    (110.1, 39.4),
];

impl Default for Outline {
    fn default() -> Self {
        Self {
            rings: vec![
                BUILTIN_RING
                    .iter()
                    .map(|&(x, y)| Point::new(x, y))
                    .collect(),
            ],
        }
    }
}

impl Outline {
    /// Outline from explicit rings; rings with fewer than three points are dropped.
    pub fn from_rings(rings: Vec<Vec<Point>>) -> ChartResult<Self> {
        let rings: Vec<Vec<Point>> = rings
            .into_iter()
            .filter(|r| r.len() >= 3 && r.iter().all(|p| p.x.is_finite() && p.y.is_finite()))
            .collect();
        if rings.is_empty() {
            return Err(ChartError::validation("outline has no usable polygon ring"));
        }
        Ok(Self { rings })
    }

    /// Parse an outline from JSON: a bare `[[[x, y], ...], ...]` ring list, or a GeoJSON
    /// `Polygon`, `MultiPolygon`, `Feature` or `FeatureCollection`.
    pub fn from_json_value(value: &serde_json::Value) -> ChartResult<Self> {
        let mut rings = Vec::new();
        collect_rings(value, &mut rings)?;
        Self::from_rings(rings)
    }

    /// Polygon rings.
    pub fn rings(&self) -> &[Vec<Point>] {
        &self.rings
    }

    /// Bounding box of all rings.
    pub fn bounds(&self) -> Rect {
        let mut it = self.rings.iter().flatten();
        let Some(first) = it.next() else {
            return Rect::ZERO;
        };
        it.fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
    }

    /// Closed path of every ring, in data coordinates.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for ring in &self.rings {
            let mut pts = ring.iter();
            if let Some(p0) = pts.next() {
                path.move_to(*p0);
                for p in pts {
                    path.line_to(*p);
                }
                path.close_path();
            }
        }
        path
    }
}

impl<'de> Deserialize<'de> for Outline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json_value(&value).map_err(serde::de::Error::custom)
    }
}

fn collect_rings(value: &serde_json::Value, out: &mut Vec<Vec<Point>>) -> ChartResult<()> {
    use serde_json::Value;

    match value {
        Value::Array(rings) => {
            for ring in rings {
                out.push(parse_ring(ring)?);
            }
            Ok(())
        }
        Value::Object(obj) => match obj.get("type").and_then(Value::as_str) {
            Some("Polygon") => {
                let coords = obj
                    .get("coordinates")
                    .ok_or_else(|| ChartError::serde("Polygon without coordinates"))?;
                collect_rings(coords, out)
            }
            Some("MultiPolygon") => {
                let polys = obj
                    .get("coordinates")
                    .and_then(Value::as_array)
                    .ok_or_else(|| ChartError::serde("MultiPolygon without coordinates"))?;
                for poly in polys {
                    collect_rings(poly, out)?;
                }
                Ok(())
            }
            Some("Feature") => {
                let geometry = obj
                    .get("geometry")
                    .ok_or_else(|| ChartError::serde("Feature without geometry"))?;
                collect_rings(geometry, out)
            }
            Some("FeatureCollection") => {
                let features = obj
                    .get("features")
                    .and_then(Value::as_array)
                    .ok_or_else(|| ChartError::serde("FeatureCollection without features"))?;
                for f in features {
                    collect_rings(f, out)?;
                }
                Ok(())
            }
            other => Err(ChartError::serde(format!(
                "unsupported outline object type {other:?}"
            ))),
        },
        _ => Err(ChartError::serde("outline must be an array or a GeoJSON object")),
    }
}

fn parse_ring(value: &serde_json::Value) -> ChartResult<Vec<Point>> {
    let items = value
        .as_array()
        .ok_or_else(|| ChartError::serde("outline ring must be an array of points"))?;
    items
        .iter()
        .map(|p| match p.as_array().map(Vec::as_slice) {
            Some([x, y, ..]) => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => Ok(Point::new(x, y)),
                _ => Err(ChartError::serde("outline point coordinates must be numbers")),
            },
            _ => Err(ChartError::serde("outline point must be [x, y]")),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/outline.rs"]
mod tests;
