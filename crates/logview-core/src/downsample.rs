// File: crates/logview-core/src/downsample.rs
// Summary: Largest-Triangle-Three-Buckets point reduction, applied per gap-free segment.

use tracing::debug;

use crate::allocate::allocate_budget;
use crate::series::{Segment, SegmentedSeries};

/// Largest-Triangle-Three-Buckets downsampling.
/// Returns `min(n, target)` points in their original order; the first and
/// last input points are always kept. Pairs with a non-finite coordinate are
/// dropped before sampling.
pub fn lttb(xs: &[f64], ys: &[f64], target: usize) -> Vec<(f64, f64)> {
    let n = xs.len().min(ys.len());
    if (0..n).all(|i| xs[i].is_finite() && ys[i].is_finite()) {
        return lttb_indices(&xs[..n], &ys[..n], target)
            .into_iter()
            .map(|i| (xs[i], ys[i]))
            .collect();
    }
    let (fx, fy): (Vec<f64>, Vec<f64>) = xs[..n]
        .iter()
        .zip(&ys[..n])
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .unzip();
    debug!(dropped = n - fx.len(), "filtered non-finite points before lttb");
    lttb_indices(&fx, &fy, target).into_iter().map(|i| (fx[i], fy[i])).collect()
}

/// Index-returning LTTB. Callers that carry extra per-point data (e.g. a color
/// dimension) use the indices to keep it aligned with the selected points.
/// Inputs are expected to be finite; see [`lttb`] for the filtering variant.
pub fn lttb_indices(xs: &[f64], ys: &[f64], target: usize) -> Vec<usize> {
    let n = xs.len().min(ys.len());
    if target == 0 || n == 0 { return Vec::new(); }
    if n <= target { return (0..n).collect(); }
    if target == 1 { return vec![0]; }
    if target == 2 { return vec![0, n - 1]; }

    let buckets = target - 2;
    let every = (n - 2) as f64 / buckets as f64;
    let mut sampled = Vec::with_capacity(target);
    sampled.push(0);

    // a: index of the previously selected point
    let mut a = 0usize;
    for i in 0..buckets {
        // Centroid of the next bucket (the last iteration uses the final point).
        let avg_start = ((((i + 1) as f64) * every).floor() as usize + 1).min(n - 1);
        let avg_end = ((((i + 2) as f64) * every).floor() as usize + 1).clamp(avg_start + 1, n);
        let count = (avg_end - avg_start) as f64;
        let mut avg_x = 0.0f64;
        let mut avg_y = 0.0f64;
        for k in avg_start..avg_end {
            avg_x += xs[k];
            avg_y += ys[k];
        }
        avg_x /= count;
        avg_y /= count;

        // Current bucket never reaches the forced last point.
        let start = ((i as f64) * every).floor() as usize + 1;
        let end = ((((i + 1) as f64) * every).floor() as usize + 1).clamp(start + 1, n - 1);

        let (ax, ay) = (xs[a], ys[a]);
        let mut max_area = -1.0f64;
        let mut max_idx = start;
        for k in start..end {
            // Doubled triangle area; strict `>` keeps the first maximal candidate.
            let area = ((ax - avg_x) * (ys[k] - ay) - (ax - xs[k]) * (avg_y - ay)).abs();
            if area > max_area {
                max_area = area;
                max_idx = k;
            }
        }
        sampled.push(max_idx);
        a = max_idx;
    }

    sampled.push(n - 1);
    sampled
}

/// Downsample one segment in (depth, value) space. Segments shorter than two
/// points pass through unchanged.
pub fn downsample_segment(segment: &Segment, target: usize) -> Vec<(f64, f64)> {
    if segment.len() < 2 {
        return segment.depths().iter().copied().zip(segment.values().iter().copied()).collect();
    }
    lttb(segment.depths(), segment.values(), target)
}

/// Split `budget` across the series' segments and downsample each one on its
/// own. The result holds one point run per segment, so gaps stay gaps.
pub fn downsample_series(series: &SegmentedSeries, budget: usize) -> Vec<Vec<(f64, f64)>> {
    let segments = series.segments();
    let lengths: Vec<usize> = segments.iter().map(Segment::len).collect();
    let targets = allocate_budget(&lengths, budget);
    segments
        .iter()
        .zip(targets)
        .map(|(seg, target)| downsample_segment(seg, target))
        .collect()
}
