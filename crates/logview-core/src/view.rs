// File: crates/logview-core/src/view.rs
// Summary: Visible data-space rectangle of a chart and helpers for pan/zoom.

use serde::{Deserialize, Serialize};

use crate::axis::AxisSet;
use crate::types::DataPoint;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self { x_min, x_max, y_min, y_max }
    }

    /// Copy the axes selected by `axes` from `other`, leaving the rest as is.
    pub fn merge_axes(&self, other: &Viewport, axes: AxisSet) -> Viewport {
        let mut v = *self;
        if axes.has_x() {
            v.x_min = other.x_min;
            v.x_max = other.x_max;
        }
        if axes.has_y() {
            v.y_min = other.y_min;
            v.y_max = other.y_max;
        }
        v
    }

    /// Translate by a data-space delta on the selected axes.
    pub fn pan_by(&mut self, dx: f64, dy: f64, axes: AxisSet) {
        if axes.has_x() {
            self.x_min += dx;
            self.x_max += dx;
        }
        if axes.has_y() {
            self.y_min += dy;
            self.y_max += dy;
        }
    }

    /// Scale the selected axes by `factor` (< 1 zooms in) keeping `anchor`
    /// at the same relative position.
    pub fn zoom_at(&mut self, anchor: DataPoint, factor: f64, axes: AxisSet) {
        let factor = factor.clamp(0.01, 100.0);
        if axes.has_x() {
            let (lo, hi) = zoom_range(self.x_min, self.x_max, anchor.x, factor);
            self.x_min = lo;
            self.x_max = hi;
        }
        if axes.has_y() {
            let (lo, hi) = zoom_range(self.y_min, self.y_max, anchor.y, factor);
            self.y_min = lo;
            self.y_max = hi;
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x_min.is_finite() && self.x_max.is_finite() && self.y_min.is_finite() && self.y_max.is_finite()
    }
}

fn zoom_range(min: f64, max: f64, anchor: f64, factor: f64) -> (f64, f64) {
    let span = max - min;
    if span.abs() < 1e-12 {
        return (min, max);
    }
    let r = (anchor - min) / span;
    let n = span * factor;
    let lo = anchor - r * n;
    (lo, lo + n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_keeps_anchor_fraction() {
        let mut v = Viewport::new(0.0, 10.0, 100.0, 200.0);
        v.zoom_at(DataPoint::new(5.0, 125.0), 0.5, AxisSet::Y);
        assert_eq!((v.x_min, v.x_max), (0.0, 10.0));
        assert!((v.y_min - 112.5).abs() < 1e-9);
        assert!((v.y_max - 162.5).abs() < 1e-9);
    }

    #[test]
    fn merge_only_selected_axis() {
        let a = Viewport::new(0.0, 1.0, 0.0, 1.0);
        let b = Viewport::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(a.merge_axes(&b, AxisSet::Y), Viewport::new(0.0, 1.0, 7.0, 8.0));
        assert_eq!(a.merge_axes(&b, AxisSet::X), Viewport::new(5.0, 6.0, 0.0, 1.0));
    }
}
