// File: crates/logview-core/src/series.rs
// Summary: Depth-indexed curve model: raw samples, gap-free segments and segmented series.
// Notes:
// - Gaps are the absence of a segment over a depth interval; a segment never
//   carries a null or non-finite value.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChartError, Result};

/// One raw sample as returned by the data layer. `value == None` is a null.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub depth: f64,
    pub value: Option<f64>,
}

impl Sample {
    pub const fn new(depth: f64, value: Option<f64>) -> Self {
        Self { depth, value }
    }
}

/// Closed depth interval `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    pub min: f64,
    pub max: f64,
}

impl DepthRange {
    /// Build a range, swapping the bounds if given in reverse order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b { Self { min: a, max: b } } else { Self { min: b, max: a } }
    }

    pub fn span(&self) -> f64 { self.max - self.min }

    pub fn contains(&self, depth: f64) -> bool {
        depth >= self.min && depth <= self.max
    }

    pub fn union(&self, other: &DepthRange) -> DepthRange {
        DepthRange { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    pub fn intersects(&self, other: &DepthRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Union of all ranges, `None` when the iterator is empty.
    pub fn union_all<'a>(ranges: impl IntoIterator<Item = &'a DepthRange>) -> Option<DepthRange> {
        ranges.into_iter().fold(None, |acc: Option<DepthRange>, r| match acc {
            Some(a) => Some(a.union(r)),
            None => Some(*r),
        })
    }
}

/// Contiguous run of valid samples.
/// Contract: `depths.len() == values.len() >= 1`, depths strictly increasing,
/// every value finite.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    depths: Vec<f64>,
    values: Vec<f64>,
}

impl Segment {
    /// Construct a segment enforcing its invariants.
    pub fn try_new(depths: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if depths.len() != values.len() {
            return Err(ChartError::SegmentLengthMismatch { depths: depths.len(), values: values.len() });
        }
        if depths.is_empty() {
            return Err(ChartError::EmptySegment);
        }
        for (i, (&d, &v)) in depths.iter().zip(values.iter()).enumerate() {
            if !d.is_finite() || !v.is_finite() {
                return Err(ChartError::NonFiniteSample { index: i });
            }
            if i > 0 && d <= depths[i - 1] {
                return Err(ChartError::NonMonotonicDepth { index: i });
            }
        }
        Ok(Self { depths, values })
    }

    pub fn depth_start(&self) -> f64 { self.depths[0] }
    pub fn depth_end(&self) -> f64 { self.depths[self.depths.len() - 1] }
    pub fn depths(&self) -> &[f64] { &self.depths }
    pub fn values(&self) -> &[f64] { &self.values }
    pub fn len(&self) -> usize { self.depths.len() }
    pub fn is_empty(&self) -> bool { self.depths.is_empty() }

    pub fn depth_range(&self) -> DepthRange {
        DepthRange { min: self.depth_start(), max: self.depth_end() }
    }

    /// Sub-segment covering `window`, widened by one sample on each side so a
    /// line drawn from it reaches the window edges. `None` when the segment
    /// does not intersect the window.
    pub fn clip(&self, window: &DepthRange) -> Option<Segment> {
        if !self.depth_range().intersects(window) {
            return None;
        }
        let start = self.depths.partition_point(|&d| d < window.min).saturating_sub(1);
        let end = (self.depths.partition_point(|&d| d <= window.max) + 1).min(self.depths.len());
        if start == 0 && end == self.depths.len() {
            return Some(self.clone());
        }
        Some(Segment {
            depths: self.depths[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }

    /// Value at exactly `depth` (within `tolerance`), by binary search.
    pub fn value_at(&self, depth: f64, tolerance: f64) -> Option<f64> {
        let i = self.depths.partition_point(|&d| d < depth - tolerance);
        match self.depths.get(i) {
            Some(&d) if (d - depth).abs() <= tolerance => Some(self.values[i]),
            _ => None,
        }
    }
}

/// A curve split into gap-free segments. Treated as immutable input by the
/// rendering pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentedSeries {
    pub curve_id: String,
    pub mnemonic: String,
    pub unit: String,
    segments: Vec<Segment>,
    total_points: usize,
    depth_range: Option<DepthRange>,
}

impl SegmentedSeries {
    /// Assemble a series from already-built segments. Segments must be in
    /// ascending depth order and must not overlap.
    pub fn from_segments(
        curve_id: impl Into<String>,
        mnemonic: impl Into<String>,
        unit: impl Into<String>,
        segments: Vec<Segment>,
    ) -> Result<Self> {
        for (i, pair) in segments.windows(2).enumerate() {
            if pair[1].depth_start() <= pair[0].depth_end() {
                return Err(ChartError::NonMonotonicDepth { index: i + 1 });
            }
        }
        Ok(Self::assemble(curve_id.into(), mnemonic.into(), unit.into(), segments))
    }

    /// Split raw samples into segments at every null or non-finite value.
    /// Samples whose depth does not strictly increase are dropped.
    pub fn from_samples(
        curve_id: impl Into<String>,
        mnemonic: impl Into<String>,
        unit: impl Into<String>,
        samples: &[Sample],
    ) -> Self {
        let curve_id = curve_id.into();
        let mut segments = Vec::new();
        let mut depths = Vec::new();
        let mut values = Vec::new();
        let mut last_depth = f64::NEG_INFINITY;
        let mut dropped = 0usize;

        for s in samples {
            if !s.depth.is_finite() || s.depth <= last_depth {
                dropped += 1;
                continue;
            }
            last_depth = s.depth;
            match s.value {
                Some(v) if v.is_finite() => {
                    depths.push(s.depth);
                    values.push(v);
                }
                _ => {
                    if !depths.is_empty() {
                        segments.push(Segment {
                            depths: std::mem::take(&mut depths),
                            values: std::mem::take(&mut values),
                        });
                    }
                }
            }
        }
        if !depths.is_empty() {
            segments.push(Segment { depths, values });
        }
        if dropped > 0 {
            warn!(curve = %curve_id, dropped, "dropped samples with non-increasing or non-finite depth");
        }
        Self::assemble(curve_id, mnemonic.into(), unit.into(), segments)
    }

    fn assemble(curve_id: String, mnemonic: String, unit: String, segments: Vec<Segment>) -> Self {
        let total_points = segments.iter().map(Segment::len).sum();
        let depth_range = match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => Some(DepthRange { min: first.depth_start(), max: last.depth_end() }),
            _ => None,
        };
        Self { curve_id, mnemonic, unit, segments, total_points, depth_range }
    }

    pub fn segments(&self) -> &[Segment] { &self.segments }
    pub fn total_points(&self) -> usize { self.total_points }
    /// `None` for a series with no valid samples at all.
    pub fn depth_range(&self) -> Option<DepthRange> { self.depth_range }
    pub fn segment_lengths(&self) -> Vec<usize> {
        self.segments.iter().map(Segment::len).collect()
    }

    /// Min/max over all values, `None` when empty.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for seg in &self.segments {
            for &v in seg.values() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        if lo.is_finite() && hi.is_finite() { Some((lo, hi)) } else { None }
    }

    /// Value at `depth` if some segment has a sample there.
    pub fn value_at(&self, depth: f64, tolerance: f64) -> Option<f64> {
        let i = self.segments.partition_point(|s| s.depth_end() < depth - tolerance);
        self.segments.get(i).and_then(|s| s.value_at(depth, tolerance))
    }
}
