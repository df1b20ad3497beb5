// File: crates/logview-core/src/scale.rs
// Summary: Pixel <-> data transforms for one axis (linear or log10, optionally inverted).

use crate::axis::{Axis, ScaleKind};

/// Maps an axis range onto a pixel interval.
///
/// `near_px` is where `min` lands and `far_px` where `max` lands; a vertical
/// axis drawn bottom-up passes `(bottom, top)`, an inverted one `(top, bottom)`.
#[derive(Clone, Copy, Debug)]
pub struct AxisScale {
    pub near_px: f32,
    pub far_px: f32,
    pub min: f64,
    pub max: f64,
    pub log: bool,
    // cached log endpoints when log is true
    log_min: f64,
    log_max: f64,
}

impl AxisScale {
    pub fn new(near_px: f32, far_px: f32, min: f64, max: f64, kind: ScaleKind) -> Self {
        match kind {
            ScaleKind::Linear => {
                let max = if (max - min).abs() < 1e-12 { min + 1.0 } else { max };
                Self { near_px, far_px, min, max, log: false, log_min: 0.0, log_max: 0.0 }
            }
            ScaleKind::Log10 => {
                let eps = 1e-12;
                let min = if min <= eps { eps } else { min };
                let max = if max <= min { min * 10.0 } else { max };
                Self { near_px, far_px, min, max, log: true, log_min: min.log10(), log_max: max.log10() }
            }
        }
    }

    /// Horizontal scale over `[left, right]`; inverted axes run right-to-left.
    pub fn horizontal(axis: &Axis, left: f32, right: f32) -> Self {
        if axis.inverted {
            Self::new(right, left, axis.min, axis.max, axis.kind)
        } else {
            Self::new(left, right, axis.min, axis.max, axis.kind)
        }
    }

    /// Vertical scale over `[top, bottom]`; inverted axes grow downward.
    pub fn vertical(axis: &Axis, top: f32, bottom: f32) -> Self {
        if axis.inverted {
            Self::new(top, bottom, axis.min, axis.max, axis.kind)
        } else {
            Self::new(bottom, top, axis.min, axis.max, axis.kind)
        }
    }

    #[inline]
    fn fraction(&self, v: f64) -> f64 {
        if self.log {
            let span = (self.log_max - self.log_min).max(1e-12);
            (v.max(1e-12).log10() - self.log_min) / span
        } else {
            (v - self.min) / (self.max - self.min)
        }
    }

    #[inline]
    pub fn to_px(&self, v: f64) -> f32 {
        self.near_px + (self.fraction(v) as f32) * (self.far_px - self.near_px)
    }

    #[inline]
    pub fn from_px(&self, px: f32) -> f64 {
        let extent = self.far_px - self.near_px;
        let t = if extent.abs() < f32::EPSILON { 0.0 } else { ((px - self.near_px) / extent) as f64 };
        if self.log {
            10f64.powf(self.log_min + t * (self.log_max - self.log_min))
        } else {
            self.min + t * (self.max - self.min)
        }
    }
}
