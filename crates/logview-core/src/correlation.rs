// File: crates/logview-core/src/correlation.rs
// Summary: Correlation panel: wells x curves as depth tracks in one link group,
//          a shared depth range, a shared crosshair and well-top overlays.
// Notes:
// - Tracks sync depth (y) only; every track keeps its own value scale.
// - Listener callbacks only record state; tracks are re-pinned in `frame`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::binding::{BindingData, RenderBinding};
use crate::chart::ChartView;
use crate::config::{Orientation, PresentationConfig};
use crate::overlay::{ruler_ticks, Crosshair, DepthOverlay, OverlayLine, RulerTick, WellTop, WellTops};
use crate::registry::{LinkGroupRegistry, SharedSurface, Subscription, SyncOptions};
use crate::renderer::{RendererHandle, SharedRenderer};
use crate::series::DepthRange;
use crate::source::DataSource;
use crate::types::{ChartId, ContainerSize, GroupId, Insets};

/// Width reserved at the left of the panel for the shared depth ruler.
pub const RULER_WIDTH: f32 = 64.0;
/// Plot margins of every track; raster backends drawing panels must use the same.
pub const TRACK_INSETS: Insets = Insets::new(8, 8, 8, 8);

/// One curve track to show for a well.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveSpec {
    pub curve_id: String,
    pub config: PresentationConfig,
}

impl CurveSpec {
    pub fn new(curve_id: impl Into<String>) -> Self {
        Self { curve_id: curve_id.into(), config: PresentationConfig::well_log() }
    }

    /// Tracks always lay depth out vertically; any other orientation is
    /// replaced when the track is added.
    pub fn with_config(mut self, config: PresentationConfig) -> Self {
        self.config = config;
        self
    }
}

/// Panel tracks sync depth on the y axis, so they must be well-log charts.
fn track_config(well_id: &str, curve: &CurveSpec) -> PresentationConfig {
    let mut config = curve.config.clone();
    if config.orientation != Orientation::WellLog {
        warn!(well = well_id, curve = %curve.curve_id, orientation = ?config.orientation, "track forced to well-log orientation");
        config.orientation = Orientation::WellLog;
    }
    config
}

#[derive(Clone, Debug, PartialEq)]
pub struct WellSpec {
    pub id: String,
    pub name: String,
    pub curves: Vec<CurveSpec>,
    pub tops: Vec<WellTop>,
}

impl WellSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), curves: Vec::new(), tops: Vec::new() }
    }

    pub fn curve(mut self, curve: CurveSpec) -> Self {
        self.curves.push(curve);
        self
    }

    pub fn top(mut self, name: impl Into<String>, depth: f64) -> Self {
        self.tops.push(WellTop::new(name, depth));
        self
    }
}

struct Track {
    curve_id: String,
    view: Rc<RefCell<ChartView>>,
    depth_range: Option<DepthRange>,
}

struct WellColumn {
    id: String,
    name: String,
    tops: WellTops,
    tracks: Vec<Track>,
}

#[derive(Debug, Default)]
struct PanelState {
    // Zoomed/panned depth window; `None` falls back to the effective range.
    visible: Option<DepthRange>,
    cursor_depth: Option<f64>,
    dirty: bool,
}

/// Overlay lines of one well column.
#[derive(Clone, Debug, PartialEq)]
pub struct WellOverlay {
    pub well_id: String,
    pub name: String,
    pub x_offset: f32,
    pub width: f32,
    pub tops: Vec<OverlayLine>,
}

/// Everything drawn above the tracks for the current visible range.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelOverlay {
    pub range: DepthRange,
    /// Spans every track.
    pub crosshair: Option<OverlayLine>,
    pub wells: Vec<WellOverlay>,
}

/// Placement of one track inside the composed panel.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackSlot {
    pub chart_id: ChartId,
    pub well_id: String,
    pub curve_id: String,
    pub handle: Option<RendererHandle>,
    pub x_offset: f32,
}

pub struct CorrelationPanel {
    group_id: GroupId,
    renderer: SharedRenderer,
    wells: Vec<WellColumn>,
    user_range: Option<DepthRange>,
    state: Rc<RefCell<PanelState>>,
    subscriptions: Vec<Subscription>,
    track_width: f32,
    track_height: f32,
    insets: Insets,
}

impl CorrelationPanel {
    /// `track_height` is the plot-area height of every track; overlay pixel
    /// offsets are measured from the plot top.
    pub fn new(
        group_id: impl Into<GroupId>,
        registry: &LinkGroupRegistry,
        renderer: SharedRenderer,
        track_width: f32,
        track_height: f32,
    ) -> Self {
        let group_id = group_id.into();
        let state = Rc::new(RefCell::new(PanelState::default()));

        let viewport_sub = {
            let state = Rc::clone(&state);
            let gid = group_id.clone();
            registry.on_viewport(move |e| {
                if e.group_id != gid {
                    return;
                }
                let mut s = state.borrow_mut();
                if e.reset {
                    s.visible = None;
                } else if e.viewport.is_finite() {
                    s.visible = Some(DepthRange::new(e.viewport.y_min, e.viewport.y_max));
                } else {
                    return;
                }
                s.dirty = true;
            })
        };
        let cursor_sub = {
            let state = Rc::clone(&state);
            let gid = group_id.clone();
            registry.on_cursor(move |e| {
                if e.group_id == gid {
                    state.borrow_mut().cursor_depth = e.position.map(|p| p.y);
                }
            })
        };

        Self {
            group_id,
            renderer,
            wells: Vec::new(),
            user_range: None,
            state,
            subscriptions: vec![viewport_sub, cursor_sub],
            track_width,
            track_height,
            insets: TRACK_INSETS,
        }
    }

    pub fn group_id(&self) -> &str { &self.group_id }
    pub fn track_width(&self) -> f32 { self.track_width }
    pub fn track_height(&self) -> f32 { self.track_height }
    pub fn insets(&self) -> Insets { self.insets }
    pub fn well_ids(&self) -> Vec<String> { self.wells.iter().map(|w| w.id.clone()).collect() }
    pub fn track_count(&self) -> usize { self.wells.iter().map(|w| w.tracks.len()).sum() }
    pub fn cursor_depth(&self) -> Option<f64> { self.state.borrow().cursor_depth }

    fn track_container(&self) -> ContainerSize {
        ContainerSize::new(
            self.track_width,
            self.track_height + self.insets.vsum() as f32,
        )
    }

    fn chart_id(&self, well_id: &str, curve_id: &str) -> ChartId {
        format!("{}/{}/{}", self.group_id, well_id, curve_id)
    }

    /// Load every curve of `well` and add one track per curve. Curves that
    /// fail to load are skipped. Re-adding a well id replaces it.
    pub fn add_well(&mut self, well: WellSpec, source: &dyn DataSource, registry: &mut LinkGroupRegistry) -> usize {
        self.remove_well(&well.id, registry);

        let mut tracks = Vec::with_capacity(well.curves.len());
        for curve in &well.curves {
            let series = match source.load_segmented_series(&curve.curve_id) {
                Ok(s) => s,
                Err(e) => {
                    warn!(well = %well.id, curve = %curve.curve_id, error = %e, "curve skipped");
                    continue;
                }
            };
            let depth_range = series.depth_range();
            let chart_id = self.chart_id(&well.id, &curve.curve_id);
            let binding = RenderBinding::new(track_config(&well.id, curve)).with_data(BindingData::Curves(vec![series]));
            let mut view = ChartView::new(chart_id.clone(), binding, Rc::clone(&self.renderer), self.track_container());
            view.set_insets(self.insets);
            let view = Rc::new(RefCell::new(view));
            let surface: SharedSurface = view.clone();
            registry.register_chart(&chart_id, surface, &self.group_id, SyncOptions::depth_track());
            tracks.push(Track { curve_id: curve.curve_id.clone(), view, depth_range });
        }

        let added = tracks.len();
        debug!(group = %self.group_id, well = %well.id, tracks = added, "well added");
        self.wells.push(WellColumn { id: well.id, name: well.name, tops: WellTops { tops: well.tops }, tracks });
        self.state.borrow_mut().dirty = true;
        added
    }

    /// Dispose and unregister every track of the well.
    pub fn remove_well(&mut self, well_id: &str, registry: &mut LinkGroupRegistry) -> bool {
        let Some(pos) = self.wells.iter().position(|w| w.id == well_id) else {
            return false;
        };
        let column = self.wells.remove(pos);
        for track in &column.tracks {
            track.view.borrow_mut().dispose(registry);
        }
        self.state.borrow_mut().dirty = true;
        true
    }

    /// Pin the panel's depth range (`None` returns to the data extent).
    /// Any zoom is discarded.
    pub fn set_depth_range(&mut self, range: Option<DepthRange>) {
        self.user_range = range;
        let mut s = self.state.borrow_mut();
        s.visible = None;
        s.dirty = true;
    }

    /// Drop the zoomed window and show the effective range again.
    pub fn reset_zoom(&mut self) {
        let mut s = self.state.borrow_mut();
        s.visible = None;
        s.dirty = true;
    }

    pub fn set_track_height(&mut self, track_height: f32, now: Instant) {
        self.track_height = track_height.max(0.0);
        let size = self.track_container();
        for track in self.tracks() {
            track.view.borrow_mut().container_resized(size, now);
        }
    }

    /// User pin, or the union of the depth extents of all loaded tracks.
    pub fn effective_range(&self) -> Option<DepthRange> {
        self.user_range
            .or_else(|| DepthRange::union_all(self.tracks().filter_map(|t| t.depth_range.as_ref())))
    }

    /// Depth window currently shown by every track.
    pub fn visible_range(&self) -> Option<DepthRange> {
        self.state.borrow().visible.or_else(|| self.effective_range())
    }

    /// Re-pin tracks if the shared range moved, then run each track's
    /// scheduled work. Returns how many tracks pushed new options.
    pub fn frame(&mut self, now: Instant) -> usize {
        let dirty = std::mem::take(&mut self.state.borrow_mut().dirty);
        if dirty {
            let range = self.visible_range();
            debug!(group = %self.group_id, ?range, "re-pinning tracks");
            for track in self.tracks() {
                track.view.borrow_mut().pin_depth(range);
            }
        }
        let mut rendered = 0;
        for track in self.tracks() {
            let mut view = track.view.borrow_mut();
            match view.frame(now) {
                Ok(true) => rendered += 1,
                Ok(false) => {}
                Err(e) => warn!(chart = %view.id(), error = %e, "track render failed"),
            }
        }
        rendered
    }

    pub fn overlay(&self) -> Option<PanelOverlay> {
        let range = self.visible_range()?;
        let crosshair = Crosshair::new(self.cursor_depth()).lines(&range, self.track_height).into_iter().next();
        let mut x = RULER_WIDTH;
        let wells = self
            .wells
            .iter()
            .map(|w| {
                let width = self.track_width * w.tracks.len() as f32;
                let overlay = WellOverlay {
                    well_id: w.id.clone(),
                    name: w.name.clone(),
                    x_offset: x,
                    width,
                    tops: w.tops.lines(&range, self.track_height),
                };
                x += width;
                overlay
            })
            .collect();
        Some(PanelOverlay { range, crosshair, wells })
    }

    /// `count` ruler ticks over the visible range.
    pub fn depth_ruler(&self, count: usize) -> Vec<RulerTick> {
        self.visible_range()
            .map(|r| ruler_ticks(&r, self.track_height, count))
            .unwrap_or_default()
    }

    /// Track placement left to right, after the ruler.
    pub fn layout(&self) -> Vec<TrackSlot> {
        let mut x = RULER_WIDTH;
        let mut slots = Vec::with_capacity(self.track_count());
        for w in &self.wells {
            for t in &w.tracks {
                let view = t.view.borrow();
                slots.push(TrackSlot {
                    chart_id: view.id().to_string(),
                    well_id: w.id.clone(),
                    curve_id: t.curve_id.clone(),
                    handle: view.handle(),
                    x_offset: x,
                });
                x += self.track_width;
            }
        }
        slots
    }

    /// Full panel size: ruler plus every track.
    pub fn size(&self) -> ContainerSize {
        let height = self.track_container().height;
        ContainerSize::new(RULER_WIDTH + self.track_width * self.track_count() as f32, height)
    }

    pub fn chart(&self, chart_id: &str) -> Option<Rc<RefCell<ChartView>>> {
        self.tracks().find(|t| t.view.borrow().id() == chart_id).map(|t| Rc::clone(&t.view))
    }

    /// Detach listeners, then unregister and dispose every track.
    pub fn dispose(&mut self, registry: &mut LinkGroupRegistry) {
        for sub in self.subscriptions.drain(..) {
            sub.unsubscribe();
        }
        for column in std::mem::take(&mut self.wells) {
            for track in &column.tracks {
                track.view.borrow_mut().dispose(registry);
            }
        }
        debug!(group = %self.group_id, "panel disposed");
    }

    fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.wells.iter().flat_map(|w| w.tracks.iter())
    }
}
