// File: crates/logview-core/src/registry.rs
// Summary: Link groups of chart instances sharing cursor and viewport state.
// Notes:
// - The registry is a plain value owned by the host: no globals, one per test.
// - Sync flags are read from the membership at dispatch time, never captured.
// - The source chart of an event is never updated by its own event.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::axis::AxisSet;
use crate::renderer::{Gesture, RendererEvent};
use crate::types::{ChartId, DataPoint, GroupId, PixelPoint};
use crate::view::Viewport;

/// What the registry needs from a chart instance.
pub trait ChartSurface {
    /// Data-space position under a container pixel, `None` outside the plot.
    fn pixel_to_data(&self, px: PixelPoint) -> Option<DataPoint>;
    /// Currently visible data bounds.
    fn viewport(&self) -> Viewport;
    /// Apply a local zoom/pan.
    fn apply_gesture(&mut self, gesture: Gesture);
    /// Show another chart's cursor (or hide it with `None`).
    fn show_cursor(&mut self, position: Option<DataPoint>);
    /// Adopt the selected axes of another chart's viewport.
    fn apply_viewport(&mut self, viewport: &Viewport, axes: AxisSet);
}

pub type SharedSurface = Rc<RefCell<dyn ChartSurface>>;

/// Sync flags of one chart within its group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncOptions {
    pub sync_cursor: bool,
    pub sync_viewport: bool,
    pub sync_axis: AxisSet,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { sync_cursor: true, sync_viewport: true, sync_axis: AxisSet::Both }
    }
}

impl SyncOptions {
    /// Depth tracks: share cursor and depth (y) only.
    pub fn depth_track() -> Self {
        Self { sync_cursor: true, sync_viewport: true, sync_axis: AxisSet::Y }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartMembership {
    pub chart_id: ChartId,
    pub group_id: GroupId,
    pub sync_cursor: bool,
    pub sync_viewport: bool,
    pub sync_axis: AxisSet,
}

struct Member {
    membership: ChartMembership,
    surface: SharedSurface,
}

#[derive(Default)]
struct LinkGroup {
    // Registration order kept so fan-out is deterministic.
    members: Vec<Member>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CursorEvent {
    pub group_id: GroupId,
    pub source_chart_id: ChartId,
    /// `None` when the pointer left the chart area.
    pub position: Option<DataPoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewportEvent {
    pub group_id: GroupId,
    pub source_chart_id: ChartId,
    pub viewport: Viewport,
    /// The source dropped its zoom; listeners holding a shared window
    /// should fall back to their full range.
    pub reset: bool,
}

type Callback<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Listeners<E> {
    next_id: u64,
    entries: Vec<(u64, Callback<E>)>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self { next_id: 0, entries: Vec::new() }
    }
}

trait Detach {
    fn detach(&mut self, id: u64);
}

impl<E> Detach for Listeners<E> {
    fn detach(&mut self, id: u64) {
        self.entries.retain(|(i, _)| *i != id);
    }
}

/// Handle returned by [`LinkGroupRegistry::on_cursor`] / [`LinkGroupRegistry::on_viewport`].
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    bus: Weak<RefCell<dyn Detach>>,
}

impl Subscription {
    /// Detach the callback. Safe to call after the registry is gone.
    pub fn unsubscribe(self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.borrow_mut().detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

fn subscribe<E: 'static>(bus: &Rc<RefCell<Listeners<E>>>, callback: impl FnMut(&E) + 'static) -> Subscription {
    let id = {
        let mut l = bus.borrow_mut();
        let id = l.next_id;
        l.next_id += 1;
        let cb: Callback<E> = Rc::new(RefCell::new(callback));
        l.entries.push((id, cb));
        id
    };
    let as_detach: Rc<RefCell<dyn Detach>> = bus.clone();
    Subscription { id, bus: Rc::downgrade(&as_detach) }
}

fn emit<E>(bus: &Rc<RefCell<Listeners<E>>>, event: &E) {
    // Snapshot so callbacks may (un)subscribe while we iterate.
    let snapshot: Vec<Callback<E>> = bus.borrow().entries.iter().map(|(_, cb)| cb.clone()).collect();
    for cb in snapshot {
        match cb.try_borrow_mut() {
            Ok(mut f) => (&mut *f)(event),
            Err(_) => trace!("listener busy, skipping re-entrant event"),
        }
    }
}

/// Owns every link group and the cursor/viewport event bus.
pub struct LinkGroupRegistry {
    groups: HashMap<GroupId, LinkGroup>,
    chart_groups: HashMap<ChartId, GroupId>,
    cursor_bus: Rc<RefCell<Listeners<CursorEvent>>>,
    viewport_bus: Rc<RefCell<Listeners<ViewportEvent>>>,
}

impl Default for LinkGroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkGroupRegistry {
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
            chart_groups: HashMap::new(),
            cursor_bus: Rc::new(RefCell::new(Listeners::default())),
            viewport_bus: Rc::new(RefCell::new(Listeners::default())),
        }
    }

    /// Add `chart_id` to `group_id`, replacing any membership it already has
    /// (in this or another group).
    pub fn register_chart(&mut self, chart_id: &str, surface: SharedSurface, group_id: &str, sync: SyncOptions) {
        self.unregister_chart(chart_id);
        let membership = ChartMembership {
            chart_id: chart_id.to_string(),
            group_id: group_id.to_string(),
            sync_cursor: sync.sync_cursor,
            sync_viewport: sync.sync_viewport,
            sync_axis: sync.sync_axis,
        };
        debug!(chart = chart_id, group = group_id, ?sync, "chart registered");
        self.groups.entry(group_id.to_string()).or_default().members.push(Member { membership, surface });
        self.chart_groups.insert(chart_id.to_string(), group_id.to_string());
    }

    /// Remove a chart's membership; no-op for unknown charts. Empty groups
    /// are discarded.
    pub fn unregister_chart(&mut self, chart_id: &str) -> Option<ChartMembership> {
        let group_id = self.chart_groups.remove(chart_id)?;
        let group = self.groups.get_mut(&group_id)?;
        let pos = group.members.iter().position(|m| m.membership.chart_id == chart_id)?;
        let removed = group.members.remove(pos);
        if group.members.is_empty() {
            self.groups.remove(&group_id);
            debug!(group = %group_id, "link group emptied and dropped");
        }
        debug!(chart = chart_id, group = %group_id, "chart unregistered");
        Some(removed.membership)
    }

    /// Change sync flags without touching group membership.
    pub fn update_sync(&mut self, chart_id: &str, sync: SyncOptions) -> bool {
        let Some(group_id) = self.chart_groups.get(chart_id) else { return false };
        let Some(group) = self.groups.get_mut(group_id) else { return false };
        match group.members.iter_mut().find(|m| m.membership.chart_id == chart_id) {
            Some(m) => {
                m.membership.sync_cursor = sync.sync_cursor;
                m.membership.sync_viewport = sync.sync_viewport;
                m.membership.sync_axis = sync.sync_axis;
                true
            }
            None => false,
        }
    }

    pub fn membership(&self, chart_id: &str) -> Option<&ChartMembership> {
        let group_id = self.chart_groups.get(chart_id)?;
        self.groups
            .get(group_id)?
            .members
            .iter()
            .map(|m| &m.membership)
            .find(|m| m.chart_id == chart_id)
    }

    pub fn group_members(&self, group_id: &str) -> Vec<ChartId> {
        self.groups
            .get(group_id)
            .map(|g| g.members.iter().map(|m| m.membership.chart_id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn has_group(&self, group_id: &str) -> bool {
        self.groups.contains_key(group_id)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn on_cursor(&self, callback: impl FnMut(&CursorEvent) + 'static) -> Subscription {
        subscribe(&self.cursor_bus, callback)
    }

    pub fn on_viewport(&self, callback: impl FnMut(&ViewportEvent) + 'static) -> Subscription {
        subscribe(&self.viewport_bus, callback)
    }

    fn surface_of(&self, chart_id: &str) -> Option<(ChartMembership, SharedSurface)> {
        let group_id = self.chart_groups.get(chart_id)?;
        self.groups
            .get(group_id)?
            .members
            .iter()
            .find(|m| m.membership.chart_id == chart_id)
            .map(|m| (m.membership.clone(), m.surface.clone()))
    }

    /// Entry point for raw renderer interaction on a registered chart.
    /// Pointer moves become cursor events; gestures are applied to the source
    /// chart and the resulting visible bounds become a viewport event.
    pub fn handle_renderer_event(&mut self, chart_id: &str, event: RendererEvent) {
        let Some((membership, surface)) = self.surface_of(chart_id) else {
            trace!(chart = chart_id, "event from unregistered chart dropped");
            return;
        };
        match event {
            RendererEvent::PointerMove(px) => {
                let position = surface.borrow().pixel_to_data(px);
                self.dispatch_cursor(&CursorEvent {
                    group_id: membership.group_id,
                    source_chart_id: membership.chart_id,
                    position,
                });
            }
            RendererEvent::PointerLeave => {
                self.dispatch_cursor(&CursorEvent {
                    group_id: membership.group_id,
                    source_chart_id: membership.chart_id,
                    position: None,
                });
            }
            RendererEvent::Gesture(gesture) => {
                let reset = matches!(gesture, Gesture::Reset);
                let viewport = {
                    let mut s = surface.borrow_mut();
                    s.apply_gesture(gesture);
                    s.viewport()
                };
                self.dispatch_viewport(&ViewportEvent {
                    group_id: membership.group_id,
                    source_chart_id: membership.chart_id,
                    viewport,
                    reset,
                });
            }
        }
    }

    /// Fan a cursor event out to every other cursor-synced member, then to
    /// subscribers. Unknown groups are dropped silently.
    pub fn dispatch_cursor(&mut self, event: &CursorEvent) {
        let Some(group) = self.groups.get(&event.group_id) else {
            debug!(group = %event.group_id, "cursor event for unknown group dropped");
            return;
        };
        for m in &group.members {
            if m.membership.chart_id == event.source_chart_id || !m.membership.sync_cursor {
                continue;
            }
            match m.surface.try_borrow_mut() {
                Ok(mut s) => s.show_cursor(event.position),
                Err(_) => trace!(chart = %m.membership.chart_id, "member busy, cursor skipped"),
            }
        }
        emit(&self.cursor_bus, event);
    }

    /// Fan a viewport event out to every other viewport-synced member,
    /// restricted to the axes both the source and the member sync, then to
    /// subscribers.
    pub fn dispatch_viewport(&mut self, event: &ViewportEvent) {
        let Some(group) = self.groups.get(&event.group_id) else {
            debug!(group = %event.group_id, "viewport event for unknown group dropped");
            return;
        };
        // A source outside the group (or already gone) restricts nothing.
        let source_axes = group
            .members
            .iter()
            .find(|m| m.membership.chart_id == event.source_chart_id)
            .map(|m| m.membership.sync_axis)
            .unwrap_or(AxisSet::Both);
        for m in &group.members {
            if m.membership.chart_id == event.source_chart_id || !m.membership.sync_viewport {
                continue;
            }
            let Some(axes) = m.membership.sync_axis.intersect(source_axes) else { continue };
            match m.surface.try_borrow_mut() {
                Ok(mut s) => s.apply_viewport(&event.viewport, axes),
                Err(_) => trace!(chart = %m.membership.chart_id, "member busy, viewport skipped"),
            }
        }
        emit(&self.viewport_bus, event);
    }
}
