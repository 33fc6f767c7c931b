//! Scales mapping data values to pixel or angle ranges.
//!
//! Semantics follow the usual band/point/linear/ordinal scale family used by charting
//! libraries: band positions are computed eagerly on every domain or range change.

use std::collections::HashMap;

/// Band scale: divides a continuous range into uniform bands, one per domain key.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    step: f64,
    bandwidth: f64,
    positions: Vec<f64>,
}

impl Default for BandScale {
    fn default() -> Self {
        Self::new()
    }
}

impl BandScale {
    /// Empty domain over `[0, 1]`, no padding, centered.
    pub fn new() -> Self {
        let mut s = Self {
            domain: Vec::new(),
            index: HashMap::new(),
            range: (0.0, 1.0),
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            step: 0.0,
            bandwidth: 0.0,
            positions: Vec::new(),
        };
        s.rescale();
        s
    }

    /// Set the ordered domain; repeated keys keep their first position.
    pub fn domain<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain.clear();
        self.index.clear();
        for k in keys {
            let k = k.into();
            if !self.index.contains_key(&k) {
                self.index.insert(k.clone(), self.domain.len());
                self.domain.push(k);
            }
        }
        self.rescale();
        self
    }

    /// Set the output range.
    pub fn range(mut self, start: f64, stop: f64) -> Self {
        self.range = (start, stop);
        self.rescale();
        self
    }

    /// Inner padding as a fraction of the step, clamped to `[0, 1]`.
    pub fn padding_inner(mut self, p: f64) -> Self {
        self.padding_inner = p.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    /// Outer padding as a fraction of the step.
    pub fn padding_outer(mut self, p: f64) -> Self {
        self.padding_outer = p.max(0.0);
        self.rescale();
        self
    }

    /// Distribution of outer space, in `[0, 1]`.
    pub fn align(mut self, a: f64) -> Self {
        self.align = a.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let reverse = r1 < r0;
        let (mut start, stop) = if reverse { (r1, r0) } else { (r0, r1) };
        self.step = (stop - start) / (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        start += (stop - start - self.step * (n - self.padding_inner)) * self.align;
        self.bandwidth = self.step * (1.0 - self.padding_inner);
        self.positions = (0..self.domain.len())
            .map(|i| start + self.step * i as f64)
            .collect();
        if reverse {
            self.positions.reverse();
        }
    }

    /// Start of the band for `key`, or `None` if the key is not in the domain.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.index.get(key).map(|&i| self.positions[i])
    }

    /// Width of each band.
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of keys in the domain.
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    /// Whether the domain is empty.
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }
}

/// Point scale: a band scale with zero-width bands.
#[derive(Clone, Debug, PartialEq)]
pub struct PointScale(BandScale);

impl Default for PointScale {
    fn default() -> Self {
        Self::new()
    }
}

impl PointScale {
    /// Empty domain over `[0, 1]`.
    pub fn new() -> Self {
        Self(BandScale::new().padding_inner(1.0))
    }

    /// Set the ordered domain.
    pub fn domain<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(self.0.domain(keys))
    }

    /// Set the output range.
    pub fn range(self, start: f64, stop: f64) -> Self {
        Self(self.0.range(start, stop))
    }

    /// Outer padding as a fraction of the step.
    pub fn padding(self, p: f64) -> Self {
        Self(self.0.padding_outer(p))
    }

    /// Position of `key`.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key)
    }

    /// Distance between adjacent points.
    pub fn step(&self) -> f64 {
        self.0.step()
    }
}

/// Linear map from a numeric domain to a numeric range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Scale mapping `domain` onto `range`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map `x`; a degenerate domain maps everything to the middle of the range.
    pub fn apply(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 || !span.is_finite() {
            0.5
        } else {
            (x - d0) / span
        };
        r0 + t * (r1 - r0)
    }
}

/// Ordinal scale with an implicit domain: unseen keys are appended and the range cycles.
#[derive(Clone, Debug, PartialEq)]
pub struct OrdinalScale<T> {
    index: HashMap<String, usize>,
    range: Vec<T>,
}

impl<T: Clone> OrdinalScale<T> {
    /// Scale over `range`.
    pub fn new(range: Vec<T>) -> Self {
        Self {
            index: HashMap::new(),
            range,
        }
    }

    /// Value for `key`, extending the domain when `key` is new. `None` for an empty range.
    pub fn get(&mut self, key: &str) -> Option<T> {
        if self.range.is_empty() {
            return None;
        }
        let next = self.index.len();
        let i = *self.index.entry(key.to_string()).or_insert(next);
        self.range.get(i % self.range.len()).cloned()
    }
}

/// Minimum and maximum of the finite values, or `None` when there are none.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/scale.rs"]
mod tests;
