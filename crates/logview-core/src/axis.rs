// File: crates/logview-core/src/axis.rs
// Summary: Axis model (range, scale kind, inversion) and the bounds policies feeding it.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    Linear,
    Log10,
}

/// Resolved axis as handed to a renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub kind: ScaleKind,
    /// Larger values drawn towards the top/left when false; well-log depth
    /// axes set this so depth increases downward.
    pub inverted: bool,
}

impl Axis {
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max, kind: ScaleKind::Linear, inverted: false }
    }

    pub fn with_kind(mut self, kind: ScaleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn span(&self) -> f64 { self.max - self.min }
}

/// How an axis obtains its range.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BoundsPolicy {
    /// Fit the data (with a small margin).
    #[default]
    Auto,
    /// User-chosen bounds, never rescaled by data.
    Fixed { min: f64, max: f64 },
}

impl BoundsPolicy {
    /// Resolve bounds from the data extent. Degenerate or missing extents fall
    /// back to a unit range so a renderer never sees `min == max`.
    pub fn resolve(&self, data: Option<(f64, f64)>, kind: ScaleKind) -> (f64, f64) {
        match *self {
            BoundsPolicy::Fixed { min, max } => sanitize(min.min(max), min.max(max), kind),
            BoundsPolicy::Auto => match data {
                Some((lo, hi)) => {
                    let (lo, hi) = sanitize(lo, hi, kind);
                    match kind {
                        ScaleKind::Linear => {
                            let m = (hi - lo) * 0.02;
                            (lo - m, hi + m)
                        }
                        ScaleKind::Log10 => (lo, hi),
                    }
                }
                None => sanitize(0.0, 1.0, kind),
            },
        }
    }
}

fn sanitize(lo: f64, hi: f64, kind: ScaleKind) -> (f64, f64) {
    match kind {
        ScaleKind::Linear => {
            if !lo.is_finite() || !hi.is_finite() { return (0.0, 1.0); }
            if (hi - lo).abs() < 1e-9 { (lo - 0.5, hi + 0.5) } else { (lo, hi) }
        }
        ScaleKind::Log10 => {
            // Log axes need a strictly positive range.
            let eps = 1e-12;
            let lo = if lo.is_finite() && lo > eps { lo } else { eps };
            let hi = if hi.is_finite() && hi > lo { hi } else { lo * 10.0 };
            (lo, hi)
        }
    }
}

/// Set of screen axes: used both for which axes a chart syncs and which
/// axes local zoom/pan gestures act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSet {
    X,
    Y,
    #[default]
    Both,
}

impl AxisSet {
    pub fn has_x(&self) -> bool { matches!(self, AxisSet::X | AxisSet::Both) }
    pub fn has_y(&self) -> bool { matches!(self, AxisSet::Y | AxisSet::Both) }

    /// Axes present in both sets; `None` when they share none.
    pub fn intersect(&self, other: AxisSet) -> Option<AxisSet> {
        match (self.has_x() && other.has_x(), self.has_y() && other.has_y()) {
            (true, true) => Some(AxisSet::Both),
            (true, false) => Some(AxisSet::X),
            (false, true) => Some(AxisSet::Y),
            (false, false) => None,
        }
    }
}
