// File: crates/logview-core/src/config.rs
// Summary: User-facing presentation settings (style, axes, sampling, scheduling), serde-loadable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::axis::{AxisSet, BoundsPolicy};
use crate::error::Result;

/// How depth/value map onto screen axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// x = independent curve (or depth), y = dependent curve/value.
    Standard,
    /// x = value, y = depth, depth increasing downward.
    #[default]
    WellLog,
    /// As `Standard`, plus a third curve mapped to point color.
    CrossplotWithColor,
}

/// RGBA color, 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self(r, g, b, 255) }

    /// Linear blend; `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, other: &Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2), mix(self.3, other.3))
    }
}

/// Track palette, cycled by curve index.
pub const CURVE_PALETTE: [Rgba; 8] = [
    Rgba::rgb(64, 160, 255),
    Rgba::rgb(40, 200, 120),
    Rgba::rgb(220, 80, 80),
    Rgba::rgb(255, 165, 0),
    Rgba::rgb(160, 90, 220),
    Rgba::rgb(0, 190, 190),
    Rgba::rgb(200, 160, 40),
    Rgba::rgb(240, 120, 180),
];

pub fn color_for_index(index: usize) -> Rgba {
    CURVE_PALETTE[index % CURVE_PALETTE.len()]
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub color: Rgba,
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self { color: CURVE_PALETTE[0], width: 1.5 }
    }
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueAxisConfig {
    /// Axis title; the curve mnemonic and unit are used when unset.
    pub label: Option<String>,
    pub bounds: BoundsPolicy,
    pub log_scale: bool,
}

/// Continuous color mapping for the third crossplot dimension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorMapConfig {
    /// Gradient stops, low to high.
    pub palette: Vec<Rgba>,
    pub bounds: BoundsPolicy,
}

impl Default for ColorMapConfig {
    fn default() -> Self {
        Self {
            palette: vec![Rgba::rgb(49, 54, 149), Rgba::rgb(116, 173, 209), Rgba::rgb(254, 224, 144), Rgba::rgb(215, 48, 39)],
            bounds: BoundsPolicy::Auto,
        }
    }
}

impl ColorMapConfig {
    /// Color for `t` in `[0, 1]` along the gradient.
    pub fn color_at(&self, t: f64) -> Rgba {
        gradient_at(&self.palette, t)
    }
}

/// Piecewise-linear gradient lookup; `t` is clamped to `[0, 1]`.
pub fn gradient_at(palette: &[Rgba], t: f64) -> Rgba {
    match palette.len() {
        0 => CURVE_PALETTE[0],
        1 => palette[0],
        n => {
            let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
            let pos = t * (n - 1) as f64;
            let i = (pos.floor() as usize).min(n - 2);
            palette[i].lerp(&palette[i + 1], pos - i as f64)
        }
    }
}

/// Converts measured container width into a point budget.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub points_per_pixel: f64,
    pub min_budget: usize,
    pub max_budget: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self { points_per_pixel: 2.0, min_budget: 64, max_budget: 20_000 }
    }
}

impl SamplingConfig {
    /// Budget for a container `width_px` wide; wider containers get more points.
    pub fn budget_for_width(&self, width_px: f32) -> usize {
        let raw = (width_px.max(0.0) as f64 * self.points_per_pixel).round() as usize;
        raw.clamp(self.min_budget, self.max_budget.max(self.min_budget))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub resize_debounce_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { resize_debounce_ms: 100 }
    }
}

impl SchedulerConfig {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

/// Per-chart presentation choices. Opaque to the sync layer; consumed by
/// [`crate::binding::RenderBinding`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub orientation: Orientation,
    pub line: LineStyle,
    /// Draw crossplots as points rather than a connected line.
    pub scatter: bool,
    pub value_axis: ValueAxisConfig,
    /// Independent axis for crossplots (x curve); ignored by depth tracks.
    pub x_axis: ValueAxisConfig,
    pub depth_label: String,
    pub color_map: ColorMapConfig,
    pub sampling: SamplingConfig,
    pub scheduler: SchedulerConfig,
    /// Axes that local zoom/pan gestures act on.
    pub interactive_axes: AxisSet,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::WellLog,
            line: LineStyle::default(),
            scatter: false,
            value_axis: ValueAxisConfig::default(),
            x_axis: ValueAxisConfig::default(),
            depth_label: "Depth".to_string(),
            color_map: ColorMapConfig::default(),
            sampling: SamplingConfig::default(),
            scheduler: SchedulerConfig::default(),
            interactive_axes: AxisSet::Both,
        }
    }
}

impl PresentationConfig {
    pub fn well_log() -> Self {
        Self { orientation: Orientation::WellLog, interactive_axes: AxisSet::Y, ..Self::default() }
    }

    pub fn crossplot(with_color: bool) -> Self {
        Self {
            orientation: if with_color { Orientation::CrossplotWithColor } else { Orientation::Standard },
            scatter: true,
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
