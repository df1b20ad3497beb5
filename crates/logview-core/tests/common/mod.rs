// File: crates/logview-core/tests/common/mod.rs
// Purpose: Shared fixtures: a recording renderer, a spy chart surface and gapped curves.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use logview_core::axis::AxisSet;
use logview_core::error::ChartError;
use logview_core::{
    ChartOptions, ChartSurface, ContainerSize, DataPoint, Gesture, PixelPoint, RendererAdapter, RendererHandle,
    Result, Sample, SegmentedSeries, SharedRenderer, Viewport,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Init(u64, ContainerSize),
    SetOption(u64),
    Resize(u64, ContainerSize),
    Cursor(u64, Option<DataPoint>),
    Dispose(u64),
}

/// Renderer that keeps the last option set per handle and logs every call.
#[derive(Default)]
pub struct RecordingRenderer {
    next: u64,
    pub live: HashMap<u64, ChartOptions>,
    pub calls: Vec<Call>,
}

impl RecordingRenderer {
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl RendererAdapter for RecordingRenderer {
    fn init(&mut self, size: ContainerSize, options: &ChartOptions) -> Result<RendererHandle> {
        self.next += 1;
        self.live.insert(self.next, options.clone());
        self.calls.push(Call::Init(self.next, size));
        Ok(RendererHandle(self.next))
    }

    fn set_option(&mut self, handle: RendererHandle, options: &ChartOptions) -> Result<()> {
        let slot = self.live.get_mut(&handle.0).ok_or(ChartError::UnknownHandle(handle.0))?;
        *slot = options.clone();
        self.calls.push(Call::SetOption(handle.0));
        Ok(())
    }

    fn resize(&mut self, handle: RendererHandle, size: ContainerSize) -> Result<()> {
        if !self.live.contains_key(&handle.0) {
            return Err(ChartError::UnknownHandle(handle.0));
        }
        self.calls.push(Call::Resize(handle.0, size));
        Ok(())
    }

    fn show_cursor(&mut self, handle: RendererHandle, position: Option<DataPoint>) -> Result<()> {
        if !self.live.contains_key(&handle.0) {
            return Err(ChartError::UnknownHandle(handle.0));
        }
        self.calls.push(Call::Cursor(handle.0, position));
        Ok(())
    }

    fn dispose(&mut self, handle: RendererHandle) {
        self.live.remove(&handle.0);
        self.calls.push(Call::Dispose(handle.0));
    }
}

pub fn recording() -> (Rc<RefCell<RecordingRenderer>>, SharedRenderer) {
    let rec = Rc::new(RefCell::new(RecordingRenderer::default()));
    let shared: SharedRenderer = rec.clone();
    (rec, shared)
}

/// Chart surface that records what the registry asks of it.
pub struct SpySurface {
    pub viewport: Viewport,
    pub cursors: Vec<Option<DataPoint>>,
    pub applied: Vec<(Viewport, AxisSet)>,
    pub gestures: Vec<Gesture>,
}

impl SpySurface {
    pub fn new(viewport: Viewport) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self { viewport, cursors: Vec::new(), applied: Vec::new(), gestures: Vec::new() }))
    }
}

impl ChartSurface for SpySurface {
    fn pixel_to_data(&self, px: PixelPoint) -> Option<DataPoint> {
        // 1 px == 1 data unit
        Some(DataPoint::new(px.x as f64, px.y as f64))
    }

    fn viewport(&self) -> Viewport { self.viewport }

    fn apply_gesture(&mut self, gesture: Gesture) {
        self.gestures.push(gesture);
        match gesture {
            Gesture::Zoom { at, factor } => {
                self.viewport.zoom_at(DataPoint::new(at.x as f64, at.y as f64), factor, AxisSet::Both)
            }
            Gesture::Pan { dx, dy } => self.viewport.pan_by(-dx as f64, -dy as f64, AxisSet::Both),
            Gesture::Reset => {}
        }
    }

    fn show_cursor(&mut self, position: Option<DataPoint>) {
        self.cursors.push(position);
    }

    fn apply_viewport(&mut self, viewport: &Viewport, axes: AxisSet) {
        self.applied.push((*viewport, axes));
        self.viewport = self.viewport.merge_axes(viewport, axes);
    }
}

/// Samples of a smooth curve with nulls over `gaps` (half-open depth intervals).
pub fn samples_with_gaps(start: f64, step: f64, n: usize, gaps: &[(f64, f64)]) -> Vec<Sample> {
    (0..n)
        .map(|i| {
            let depth = start + step * i as f64;
            let in_gap = gaps.iter().any(|&(a, b)| depth >= a && depth < b);
            let value = (!in_gap).then(|| 60.0 + 40.0 * (i as f64 * 0.013).sin() + (i % 7) as f64);
            Sample::new(depth, value)
        })
        .collect()
}

/// Gamma-ray style curve, 1000..2300 m at 0.1 m, null over two intervals:
/// segments cover [1000, 1500), [1600, 1680) and [1800, 2300).
pub fn gapped_gr(curve_id: &str) -> SegmentedSeries {
    let samples = samples_with_gaps(1000.0, 0.1, 13_000, &[(1499.95, 1599.95), (1679.95, 1799.95)]);
    SegmentedSeries::from_samples(curve_id, "GR", "gAPI", &samples)
}

/// Continuous curve without gaps.
pub fn plain_curve(curve_id: &str, mnemonic: &str, start: f64, end: f64, step: f64) -> SegmentedSeries {
    let n = ((end - start) / step).round() as usize + 1;
    SegmentedSeries::from_samples(curve_id, mnemonic, "", &samples_with_gaps(start, step, n, &[]))
}

/// Bulk-density style curve around 2.4 g/cc, no gaps.
pub fn density_curve(curve_id: &str, start: f64, end: f64, step: f64) -> SegmentedSeries {
    let n = ((end - start) / step).round() as usize + 1;
    let samples: Vec<Sample> = (0..n)
        .map(|i| Sample::new(start + step * i as f64, Some(2.4 + 0.15 * (i as f64 * 0.02).cos())))
        .collect();
    SegmentedSeries::from_samples(curve_id, "RHOB", "g/cc", &samples)
}
