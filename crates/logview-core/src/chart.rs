// File: crates/logview-core/src/chart.rs
// Summary: One chart instance: render binding + renderer handle + frame scheduling.
// Notes:
// - Teardown order is fixed: unregister from the link registry, then dispose
//   the renderer handle. The registry never sees a disposed handle.

use std::time::Instant;

use tracing::{debug, warn};

use crate::axis::{Axis, AxisSet};
use crate::binding::{BindingData, RenderBinding};
use crate::config::PresentationConfig;
use crate::error::Result;
use crate::registry::{ChartSurface, LinkGroupRegistry};
use crate::renderer::{ChartOptions, Gesture, RendererHandle, SharedRenderer};
use crate::scale::AxisScale;
use crate::scheduler::{FrameAction, RenderReason, RenderScheduler};
use crate::series::DepthRange;
use crate::types::{ChartId, ContainerSize, DataPoint, Insets, PixelPoint, PlotRect};
use crate::view::Viewport;

pub struct ChartView {
    id: ChartId,
    binding: RenderBinding,
    renderer: SharedRenderer,
    handle: Option<RendererHandle>,
    scheduler: RenderScheduler,
    insets: Insets,
    options: Option<ChartOptions>,
    // binding changed since `options` was built
    dirty: bool,
    cursor: Option<DataPoint>,
}

impl ChartView {
    /// Create a chart; nothing is built until the first `frame` with a
    /// non-empty container.
    pub fn new(id: impl Into<ChartId>, binding: RenderBinding, renderer: SharedRenderer, size: ContainerSize) -> Self {
        let debounce = binding.config().scheduler.resize_debounce();
        let mut scheduler = RenderScheduler::new(size, debounce);
        scheduler.request(RenderReason::Data);
        Self {
            id: id.into(),
            binding,
            renderer,
            handle: None,
            scheduler,
            insets: Insets::default(),
            options: None,
            dirty: true,
            cursor: None,
        }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn binding(&self) -> &RenderBinding { &self.binding }
    pub fn handle(&self) -> Option<RendererHandle> { self.handle }
    /// Last option set handed to the renderer.
    pub fn options(&self) -> Option<&ChartOptions> { self.options.as_ref() }
    /// Cursor position mirrored from another chart of the group.
    pub fn cursor(&self) -> Option<DataPoint> { self.cursor }
    pub fn size(&self) -> ContainerSize { self.scheduler.size() }
    pub fn is_pending(&self) -> bool { self.scheduler.is_pending() || !self.scheduler.is_built() }
    pub fn is_disposed(&self) -> bool { self.scheduler.is_closed() }

    pub fn set_insets(&mut self, insets: Insets) {
        self.insets = insets;
    }

    pub fn set_data(&mut self, data: BindingData) {
        self.binding.set_data(data);
        self.invalidate(RenderReason::Data);
    }

    pub fn set_config(&mut self, config: PresentationConfig) {
        if *self.binding.config() == config {
            return;
        }
        self.scheduler.set_debounce(config.scheduler.resize_debounce());
        self.binding.set_config(config);
        self.invalidate(RenderReason::Config);
    }

    /// Pin (or unpin) the depth axis from a shared-depth group.
    pub fn pin_depth(&mut self, range: Option<DepthRange>) {
        if self.binding.pinned_depth() == range && !self.binding.has_zoom() {
            return;
        }
        self.binding.pin_depth(range);
        self.invalidate(RenderReason::DepthPin);
    }

    pub fn container_resized(&mut self, size: ContainerSize, now: Instant) {
        self.scheduler.container_resized(size, now);
    }

    /// Run this frame's scheduled work. Returns whether the renderer received
    /// a new option set.
    pub fn frame(&mut self, now: Instant) -> Result<bool> {
        match self.scheduler.poll(now) {
            None => Ok(false),
            Some(FrameAction::Build { size, token }) => {
                let options = self.binding.build(size.width);
                let handle = match self.renderer.borrow_mut().init(size, &options) {
                    Ok(h) => h,
                    Err(e) => {
                        self.scheduler.reset();
                        return Err(e);
                    }
                };
                debug!(chart = %self.id, seq = token.seq, points = options.point_count(), "chart built");
                self.handle = Some(handle);
                self.options = Some(options);
                self.dirty = false;
                Ok(true)
            }
            Some(FrameAction::Rebuild { token, resize }) => {
                let Some(handle) = self.handle else { return Ok(false) };
                if let Some(size) = resize {
                    self.renderer.borrow_mut().resize(handle, size)?;
                }
                let options = self.binding.build(self.scheduler.size().width);
                self.renderer.borrow_mut().set_option(handle, &options)?;
                debug!(chart = %self.id, seq = token.seq, reason = ?token.reason, points = options.point_count(), "chart rebuilt");
                self.options = Some(options);
                self.dirty = false;
                Ok(true)
            }
        }
    }

    /// Leave the link group, then release the renderer handle. A disposed
    /// chart never builds again.
    pub fn dispose(&mut self, registry: &mut LinkGroupRegistry) {
        registry.unregister_chart(&self.id);
        if let Some(handle) = self.handle.take() {
            self.renderer.borrow_mut().dispose(handle);
        }
        self.scheduler.close();
        self.options = None;
        self.cursor = None;
        debug!(chart = %self.id, "chart disposed");
    }

    fn invalidate(&mut self, reason: RenderReason) {
        self.dirty = true;
        self.scheduler.request(reason);
    }

    fn resolved_axes(&self) -> (Axis, Axis) {
        match (&self.options, self.dirty) {
            (Some(o), false) => (o.x_axis.clone(), o.y_axis.clone()),
            _ => {
                let o = self.binding.build(self.scheduler.size().width);
                (o.x_axis, o.y_axis)
            }
        }
    }

    fn plot_rect(&self) -> PlotRect {
        PlotRect::from_container(self.scheduler.size(), &self.insets)
    }

    fn scales(&self) -> (PlotRect, AxisScale, AxisScale) {
        let rect = self.plot_rect();
        let (x, y) = self.resolved_axes();
        (rect, AxisScale::horizontal(&x, rect.left, rect.right), AxisScale::vertical(&y, rect.top, rect.bottom))
    }
}

impl ChartSurface for ChartView {
    fn pixel_to_data(&self, px: PixelPoint) -> Option<DataPoint> {
        if !self.scheduler.size().is_renderable() {
            return None;
        }
        let (rect, sx, sy) = self.scales();
        if !rect.contains(px) {
            return None;
        }
        Some(DataPoint::new(sx.from_px(px.x), sy.from_px(px.y)))
    }

    fn viewport(&self) -> Viewport {
        let (x, y) = self.resolved_axes();
        Viewport::new(x.min, x.max, y.min, y.max)
    }

    fn apply_gesture(&mut self, gesture: Gesture) {
        let axes = self.binding.config().interactive_axes;
        match gesture {
            Gesture::Zoom { at, factor } => {
                let mut vp = self.viewport();
                let anchor = self.pixel_to_data(at).unwrap_or(DataPoint::new(
                    (vp.x_min + vp.x_max) * 0.5,
                    (vp.y_min + vp.y_max) * 0.5,
                ));
                vp.zoom_at(anchor, factor, axes);
                self.binding.set_viewport(&vp, axes);
            }
            Gesture::Pan { dx, dy } => {
                let (rect, sx, sy) = self.scales();
                // Content follows the pointer, so the window moves the other way.
                let (x0, x1) = (sx.from_px(rect.left - dx), sx.from_px(rect.right - dx));
                let (y0, y1) = (sy.from_px(rect.top - dy), sy.from_px(rect.bottom - dy));
                let vp = Viewport::new(x0.min(x1), x0.max(x1), y0.min(y1), y0.max(y1));
                self.binding.set_viewport(&vp, axes);
            }
            Gesture::Reset => self.binding.clear_viewport(),
        }
        self.invalidate(RenderReason::Viewport);
    }

    fn show_cursor(&mut self, position: Option<DataPoint>) {
        self.cursor = position;
        if let Some(handle) = self.handle {
            if let Err(e) = self.renderer.borrow_mut().show_cursor(handle, position) {
                warn!(chart = %self.id, error = %e, "cursor update failed");
            }
        }
    }

    fn apply_viewport(&mut self, viewport: &Viewport, axes: AxisSet) {
        if !viewport.is_finite() {
            return;
        }
        self.binding.set_viewport(viewport, axes);
        self.invalidate(RenderReason::Viewport);
    }
}
