// File: crates/logview-core/src/overlay.rs
// Summary: Depth-to-pixel overlays drawn above tracks, independent of any renderer.
// Notes:
// - Pixel offsets are relative to the top of a track's plot area.

use serde::{Deserialize, Serialize};

use crate::series::DepthRange;

/// Offset of `depth` below the plot top for a track `track_height` pixels tall.
/// `None` for a degenerate range.
pub fn depth_to_pixel(depth: f64, range: &DepthRange, track_height: f32) -> Option<f32> {
    let span = range.span();
    if !(span > 0.0) || !depth.is_finite() {
        return None;
    }
    Some(((depth - range.min) / span * track_height as f64) as f32)
}

pub fn pixel_to_depth(y_px: f32, range: &DepthRange, track_height: f32) -> f64 {
    if track_height <= 0.0 {
        return range.min;
    }
    range.min + (y_px as f64 / track_height as f64) * range.span()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayKind {
    Crosshair,
    WellTop,
}

/// One horizontal line spanning a track (or the whole panel).
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayLine {
    pub kind: OverlayKind,
    pub depth: f64,
    pub y_px: f32,
    pub label: Option<String>,
}

/// A named marker depth in a well.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WellTop {
    pub name: String,
    pub depth: f64,
}

impl WellTop {
    pub fn new(name: impl Into<String>, depth: f64) -> Self {
        Self { name: name.into(), depth }
    }
}

/// Overlay computed from the visible depth range, never from renderer state.
pub trait DepthOverlay {
    fn id(&self) -> &'static str;
    fn lines(&self, range: &DepthRange, track_height: f32) -> Vec<OverlayLine>;
}

/// Shared horizontal cursor line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Crosshair {
    pub depth: Option<f64>,
}

impl Crosshair {
    pub fn new(depth: Option<f64>) -> Self { Self { depth } }
}

impl DepthOverlay for Crosshair {
    fn id(&self) -> &'static str { "crosshair" }

    fn lines(&self, range: &DepthRange, track_height: f32) -> Vec<OverlayLine> {
        let Some(depth) = self.depth.filter(|d| range.contains(*d)) else {
            return Vec::new();
        };
        depth_to_pixel(depth, range, track_height)
            .map(|y_px| OverlayLine { kind: OverlayKind::Crosshair, depth, y_px, label: None })
            .into_iter()
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WellTops {
    pub tops: Vec<WellTop>,
}

impl DepthOverlay for WellTops {
    fn id(&self) -> &'static str { "well_tops" }

    fn lines(&self, range: &DepthRange, track_height: f32) -> Vec<OverlayLine> {
        self.tops
            .iter()
            .filter(|t| range.contains(t.depth))
            .filter_map(|t| {
                let y_px = depth_to_pixel(t.depth, range, track_height)?;
                Some(OverlayLine { kind: OverlayKind::WellTop, depth: t.depth, y_px, label: Some(t.name.clone()) })
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RulerTick {
    pub depth: f64,
    pub y_px: f32,
}

/// `count` evenly spaced ticks from the top to the bottom of `range`.
pub fn ruler_ticks(range: &DepthRange, track_height: f32, count: usize) -> Vec<RulerTick> {
    linspace(range.min, range.max, count)
        .into_iter()
        .filter_map(|depth| Some(RulerTick { depth, y_px: depth_to_pixel(depth, range, track_height)? }))
        .collect()
}

fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps as f64 - 1.0);
            (0..steps).map(|i| start + step * i as f64).collect()
        }
    }
}
