use std::{cmp::Ordering, f64::consts::TAU};

/// One slice produced by [`PieLayout`], reported in input order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieSlice {
    /// Index of the input item.
    pub index: usize,
    /// Value the slice was sized from.
    pub value: f64,
    /// Start angle (clockwise from 12 o'clock).
    pub start_angle: f64,
    /// End angle.
    pub end_angle: f64,
}

/// Pie layout: assigns contiguous angular spans proportional to values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieLayout {
    start_angle: f64,
    end_angle: f64,
}

impl Default for PieLayout {
    fn default() -> Self {
        Self {
            start_angle: 0.0,
            end_angle: TAU,
        }
    }
}

impl PieLayout {
    /// Full-circle layout starting at 12 o'clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Angular range covered by the slices.
    pub fn angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    /// Lay out `items`, visiting them in `order` to assign angles. Output stays in input order.
    ///
    /// Non-finite or negative values count as zero; a zero total yields zero-width slices.
    pub fn layout_by<T>(
        &self,
        items: &[T],
        value: impl Fn(&T) -> f64,
        mut order: impl FnMut(&T, &T) -> Ordering,
    ) -> Vec<PieSlice> {
        let values: Vec<f64> = items
            .iter()
            .map(|item| {
                let v = value(item);
                if v.is_finite() && v > 0.0 { v } else { 0.0 }
            })
            .collect();
        let sum: f64 = values.iter().sum();
        let span = self.end_angle - self.start_angle;
        let k = if sum > 0.0 { span / sum } else { 0.0 };

        let mut visit: Vec<usize> = (0..items.len()).collect();
        visit.sort_by(|&a, &b| order(&items[a], &items[b]));

        let mut slices = vec![
            PieSlice {
                index: 0,
                value: 0.0,
                start_angle: self.start_angle,
                end_angle: self.start_angle,
            };
            items.len()
        ];
        let mut angle = self.start_angle;
        for i in visit {
            let end = angle + values[i] * k;
            slices[i] = PieSlice {
                index: i,
                value: values[i],
                start_angle: angle,
                end_angle: end,
            };
            angle = end;
        }
        slices
    }

    /// Lay out `items` in input order.
    pub fn layout<T>(&self, items: &[T], value: impl Fn(&T) -> f64) -> Vec<PieSlice> {
        self.layout_by(items, value, |_, _| Ordering::Equal)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/pie.rs"]
mod tests;
