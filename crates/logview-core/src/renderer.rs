// File: crates/logview-core/src/renderer.rs
// Summary: Renderer-agnostic option model and the adapter seam concrete backends implement.

use std::cell::RefCell;
use std::rc::Rc;

use crate::axis::Axis;
use crate::config::{gradient_at, LineStyle, Rgba};
use crate::error::Result;
use crate::types::{ContainerSize, DataPoint, PixelPoint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesKind {
    Line,
    Scatter,
}

/// One drawable run of points in screen-axis order. A gapped curve becomes
/// several of these; a renderer must never connect two of them.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesOption {
    pub name: String,
    pub kind: SeriesKind,
    pub points: Vec<DataPoint>,
    pub style: LineStyle,
    /// Per-point color-dimension values, aligned with `points`.
    pub color_values: Option<Vec<f64>>,
}

/// Continuous color scale for a crossplot's third dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorOverlay {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub palette: Vec<Rgba>,
}

impl ColorOverlay {
    /// Gradient color for a color-dimension value.
    pub fn color_for(&self, value: f64) -> Rgba {
        let span = self.max - self.min;
        let t = if span.abs() < 1e-12 { 0.5 } else { (value - self.min) / span };
        gradient_at(&self.palette, t)
    }
}

/// The complete option set for one chart. Always applied as a whole.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<SeriesOption>,
    /// Present only for color-mapped crossplots.
    pub color_overlay: Option<ColorOverlay>,
}

impl ChartOptions {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Opaque handle to a chart instance living inside a renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RendererHandle(pub u64);

/// Minimal capability set required from a rendering backend.
pub trait RendererAdapter {
    fn init(&mut self, size: ContainerSize, options: &ChartOptions) -> Result<RendererHandle>;
    /// Replace the handle's whole option set.
    fn set_option(&mut self, handle: RendererHandle, options: &ChartOptions) -> Result<()>;
    fn resize(&mut self, handle: RendererHandle, size: ContainerSize) -> Result<()>;
    /// Draw (or clear, with `None`) the axis pointer at a data position.
    fn show_cursor(&mut self, handle: RendererHandle, position: Option<DataPoint>) -> Result<()>;
    fn dispose(&mut self, handle: RendererHandle);
}

pub type SharedRenderer = Rc<RefCell<dyn RendererAdapter>>;

/// Local interaction on a chart, in container pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Mouse-wheel style zoom; `factor < 1` zooms in.
    Zoom { at: PixelPoint, factor: f64 },
    /// Drag by a pixel delta.
    Pan { dx: f32, dy: f32 },
    /// Drop any zoom and return to configured bounds.
    Reset,
}

/// Raw interaction a renderer reports for one of its charts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RendererEvent {
    PointerMove(PixelPoint),
    PointerLeave,
    Gesture(Gesture),
}
