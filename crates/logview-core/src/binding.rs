// File: crates/logview-core/src/binding.rs
// Summary: Maps curves + presentation config onto a complete renderer option set.
// Notes:
// - Depth tracks downsample per segment under one width-derived budget shared by
//   all curves of the chart, so every gap in the input is a break between series.
// - Axis resolution order for each screen axis: interactive zoom, then an
//   external depth pin (depth axis only), then the configured bounds policy.

use std::borrow::Cow;

use tracing::debug;

use crate::allocate::allocate_budget;
use crate::axis::{Axis, AxisSet, BoundsPolicy, ScaleKind};
use crate::config::{color_for_index, LineStyle, Orientation, PresentationConfig, ValueAxisConfig};
use crate::downsample::{downsample_segment, lttb_indices};
use crate::renderer::{ChartOptions, ColorOverlay, SeriesKind, SeriesOption};
use crate::series::{DepthRange, Segment, SegmentedSeries};
use crate::types::DataPoint;
use crate::view::Viewport;

/// Depth tolerance used when joining curves sample-by-sample.
pub const JOIN_TOLERANCE: f64 = 1e-6;

/// What a chart shows.
#[derive(Clone, Debug, Default)]
pub enum BindingData {
    #[default]
    Empty,
    /// Depth-indexed curves sharing one value axis.
    Curves(Vec<SegmentedSeries>),
    /// Curve-vs-curve, optionally with a third curve mapped to color.
    Crossplot {
        x: SegmentedSeries,
        y: SegmentedSeries,
        color: Option<SegmentedSeries>,
    },
}

impl BindingData {
    /// Union of all curves' depth coverage.
    pub fn depth_range(&self) -> Option<DepthRange> {
        match self {
            BindingData::Empty => None,
            BindingData::Curves(curves) => {
                let ranges: Vec<DepthRange> = curves.iter().filter_map(|c| c.depth_range()).collect();
                DepthRange::union_all(&ranges)
            }
            BindingData::Crossplot { x, y, .. } => {
                let ranges: Vec<DepthRange> = [x.depth_range(), y.depth_range()].into_iter().flatten().collect();
                DepthRange::union_all(&ranges)
            }
        }
    }
}

/// Per-chart decision of how data maps to screen axes.
#[derive(Clone, Debug, Default)]
pub struct RenderBinding {
    config: PresentationConfig,
    data: BindingData,
    pinned_depth: Option<DepthRange>,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
}

impl RenderBinding {
    pub fn new(config: PresentationConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn with_data(mut self, data: BindingData) -> Self {
        self.data = data;
        self
    }

    pub fn config(&self) -> &PresentationConfig { &self.config }
    pub fn data(&self) -> &BindingData { &self.data }
    pub fn pinned_depth(&self) -> Option<DepthRange> { self.pinned_depth }
    /// Interactive override of the horizontal axis, if any.
    pub fn x_range(&self) -> Option<(f64, f64)> { self.x_range }
    pub fn y_range(&self) -> Option<(f64, f64)> { self.y_range }

    pub fn set_config(&mut self, config: PresentationConfig) {
        self.config = config;
    }

    pub fn set_data(&mut self, data: BindingData) {
        self.data = data;
    }

    /// Orientation actually used for the current data. Depth curves cannot be
    /// color-mapped and crossplots have no depth axis; both fall back to
    /// `Standard`.
    pub fn orientation(&self) -> Orientation {
        match (&self.data, self.config.orientation) {
            (BindingData::Curves(_), Orientation::CrossplotWithColor) => Orientation::Standard,
            (BindingData::Crossplot { .. }, Orientation::WellLog) => Orientation::Standard,
            (_, o) => o,
        }
    }

    /// Screen axis carrying depth, if the chart has one.
    pub fn depth_axis(&self) -> Option<AxisSet> {
        match (&self.data, self.orientation()) {
            (BindingData::Crossplot { .. }, _) => None,
            (_, Orientation::WellLog) => Some(AxisSet::Y),
            _ => Some(AxisSet::X),
        }
    }

    /// Pin the depth axis from outside (shared-depth groups). A pin replaces
    /// any interactive zoom on the depth axis.
    pub fn pin_depth(&mut self, range: Option<DepthRange>) {
        self.pinned_depth = range;
        match self.depth_axis() {
            Some(AxisSet::Y) => self.y_range = None,
            Some(_) => self.x_range = None,
            None => {}
        }
    }

    /// Override the selected axes with the given viewport (zoom/pan result or
    /// a synced update from another chart).
    pub fn set_viewport(&mut self, viewport: &Viewport, axes: AxisSet) {
        if axes.has_x() {
            self.x_range = Some((viewport.x_min, viewport.x_max));
        }
        if axes.has_y() {
            self.y_range = Some((viewport.y_min, viewport.y_max));
        }
    }

    pub fn clear_viewport(&mut self) {
        self.x_range = None;
        self.y_range = None;
    }

    pub fn has_zoom(&self) -> bool {
        self.x_range.is_some() || self.y_range.is_some()
    }

    /// Build the full option set for a container `width_px` wide.
    pub fn build(&self, width_px: f32) -> ChartOptions {
        let budget = self.config.sampling.budget_for_width(width_px);
        match &self.data {
            BindingData::Empty => self.build_curves(&[], budget),
            BindingData::Curves(curves) => self.build_curves(curves, budget),
            BindingData::Crossplot { x, y, color } => self.build_crossplot(x, y, color.as_ref(), budget),
        }
    }

    fn depth_override(&self) -> Option<(f64, f64)> {
        match self.depth_axis() {
            Some(AxisSet::Y) => self.y_range,
            Some(_) => self.x_range,
            None => None,
        }
    }

    fn value_override(&self) -> Option<(f64, f64)> {
        match self.depth_axis() {
            Some(AxisSet::Y) => self.x_range,
            Some(_) => self.y_range,
            None => None,
        }
    }

    fn build_curves(&self, curves: &[SegmentedSeries], budget: usize) -> ChartOptions {
        let well_log = self.orientation() == Orientation::WellLog;

        // Depth window: zoom, then pin, then the data itself.
        let window = self
            .depth_override()
            .map(|(a, b)| DepthRange::new(a, b))
            .or(self.pinned_depth);
        let depth_bounds = window
            .or_else(|| self.data.depth_range())
            .map(|r| BoundsPolicy::Fixed { min: r.min, max: r.max }.resolve(None, ScaleKind::Linear))
            .unwrap_or((0.0, 1.0));

        let visible: Vec<Cow<'_, [Segment]>> = curves
            .iter()
            .map(|curve| match window {
                Some(w) => Cow::Owned(curve.segments().iter().filter_map(|s| s.clip(&w)).collect()),
                None => Cow::Borrowed(curve.segments()),
            })
            .collect();

        // One budget per chart, shared by every segment of every curve.
        let lengths: Vec<usize> = visible.iter().flat_map(|segs| segs.iter().map(Segment::len)).collect();
        let mut targets = allocate_budget(&lengths, budget).into_iter();

        let mut series = Vec::new();
        let mut value_lo = f64::INFINITY;
        let mut value_hi = f64::NEG_INFINITY;
        for (ci, (curve, segments)) in curves.iter().zip(&visible).enumerate() {
            let style = if ci == 0 {
                self.config.line
            } else {
                LineStyle { color: color_for_index(ci), ..self.config.line }
            };
            let kind = if self.config.scatter { SeriesKind::Scatter } else { SeriesKind::Line };
            for (k, seg) in segments.iter().enumerate() {
                for &v in seg.values() {
                    value_lo = value_lo.min(v);
                    value_hi = value_hi.max(v);
                }
                let target = targets.next().unwrap_or(0);
                let points = downsample_segment(seg, target)
                    .into_iter()
                    .map(|(depth, value)| if well_log { DataPoint::new(value, depth) } else { DataPoint::new(depth, value) })
                    .collect();
                series.push(SeriesOption {
                    name: format!("{}#{}", curve.mnemonic, k),
                    kind,
                    points,
                    style,
                    color_values: None,
                });
            }
        }

        let value_cfg = &self.config.value_axis;
        let value_kind = if value_cfg.log_scale { ScaleKind::Log10 } else { ScaleKind::Linear };
        let data_extent = if value_lo <= value_hi { Some((value_lo, value_hi)) } else { None };
        let (vmin, vmax) = match self.value_override() {
            Some((a, b)) => BoundsPolicy::Fixed { min: a, max: b }.resolve(None, value_kind),
            None => value_cfg.bounds.resolve(data_extent, value_kind),
        };
        let value_axis = Axis::new(value_label(value_cfg, curves.first()), vmin, vmax).with_kind(value_kind);
        let depth_axis = Axis::new(self.config.depth_label.clone(), depth_bounds.0, depth_bounds.1);

        let (x_axis, y_axis) = if well_log {
            (value_axis, depth_axis.inverted(true))
        } else {
            (depth_axis, value_axis)
        };
        ChartOptions {
            title: curves.first().map(|c| c.mnemonic.clone()).unwrap_or_default(),
            x_axis,
            y_axis,
            series,
            color_overlay: None,
        }
    }

    fn build_crossplot(
        &self,
        x: &SegmentedSeries,
        y: &SegmentedSeries,
        color: Option<&SegmentedSeries>,
        budget: usize,
    ) -> ChartOptions {
        let with_color = self.orientation() == Orientation::CrossplotWithColor && color.is_some();
        let joined = join_curves(x, y, if with_color { color } else { None }, self.pinned_depth);

        let target = allocate_budget(&[joined.xs.len()], budget).first().copied().unwrap_or(0);
        let picked = lttb_indices(&joined.xs, &joined.ys, target);
        let points: Vec<DataPoint> = picked.iter().map(|&i| DataPoint::new(joined.xs[i], joined.ys[i])).collect();
        let color_values: Option<Vec<f64>> = if with_color {
            Some(picked.iter().map(|&i| joined.cs[i]).collect())
        } else {
            None
        };
        debug!(joined = joined.xs.len(), drawn = points.len(), "crossplot joined");

        let x_cfg = &self.config.x_axis;
        let y_cfg = &self.config.value_axis;
        let x_axis = resolve_value_axis(x_cfg, x, extent(&joined.xs), self.x_range);
        let y_axis = resolve_value_axis(y_cfg, y, extent(&joined.ys), self.y_range);

        let color_overlay = match (with_color, color) {
            (true, Some(c)) => {
                let (min, max) = self.config.color_map.bounds.resolve(extent(&joined.cs), ScaleKind::Linear);
                Some(ColorOverlay {
                    label: axis_title(&c.mnemonic, &c.unit),
                    min,
                    max,
                    palette: self.config.color_map.palette.clone(),
                })
            }
            _ => None,
        };

        let kind = if self.config.scatter { SeriesKind::Scatter } else { SeriesKind::Line };
        ChartOptions {
            title: format!("{} vs {}", y.mnemonic, x.mnemonic),
            x_axis,
            y_axis,
            series: vec![SeriesOption {
                name: format!("{}/{}", y.mnemonic, x.mnemonic),
                kind,
                points,
                style: self.config.line,
                color_values,
            }],
            color_overlay,
        }
    }
}

/// Curves sampled at the same depths.
#[derive(Debug, Default)]
struct Joined {
    xs: Vec<f64>,
    ys: Vec<f64>,
    cs: Vec<f64>,
}

fn join_curves(
    x: &SegmentedSeries,
    y: &SegmentedSeries,
    color: Option<&SegmentedSeries>,
    window: Option<DepthRange>,
) -> Joined {
    let mut out = Joined::default();
    for seg in x.segments() {
        for (&d, &xv) in seg.depths().iter().zip(seg.values()) {
            if window.is_some_and(|w| !w.contains(d)) {
                continue;
            }
            let Some(yv) = y.value_at(d, JOIN_TOLERANCE) else { continue };
            let cv = match color {
                Some(c) => match c.value_at(d, JOIN_TOLERANCE) {
                    Some(v) => v,
                    None => continue,
                },
                None => 0.0,
            };
            out.xs.push(xv);
            out.ys.push(yv);
            out.cs.push(cv);
        }
    }
    out
}

fn extent(values: &[f64]) -> Option<(f64, f64)> {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo <= hi { Some((lo, hi)) } else { None }
}

fn resolve_value_axis(
    cfg: &ValueAxisConfig,
    curve: &SegmentedSeries,
    data: Option<(f64, f64)>,
    zoom: Option<(f64, f64)>,
) -> Axis {
    let kind = if cfg.log_scale { ScaleKind::Log10 } else { ScaleKind::Linear };
    let (min, max) = match zoom {
        Some((a, b)) => BoundsPolicy::Fixed { min: a, max: b }.resolve(None, kind),
        None => cfg.bounds.resolve(data, kind),
    };
    Axis::new(value_label(cfg, Some(curve)), min, max).with_kind(kind)
}

fn value_label(cfg: &ValueAxisConfig, curve: Option<&SegmentedSeries>) -> String {
    match (&cfg.label, curve) {
        (Some(label), _) => label.clone(),
        (None, Some(c)) => axis_title(&c.mnemonic, &c.unit),
        (None, None) => String::new(),
    }
}

fn axis_title(mnemonic: &str, unit: &str) -> String {
    if unit.is_empty() { mnemonic.to_string() } else { format!("{mnemonic} ({unit})") }
}
