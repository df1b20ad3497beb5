// File: crates/logview-core/tests/registry.rs
// Purpose: Link-group membership, broadcast rules, axis-restricted sync and subscriptions.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::SpySurface;
use logview_core::{
    AxisSet, CursorEvent, DataPoint, Gesture, LinkGroupRegistry, PixelPoint, RendererEvent, SyncOptions, Viewport,
    ViewportEvent,
};

fn vp() -> Viewport {
    Viewport::new(0.0, 100.0, 1000.0, 2000.0)
}

fn cursor_from(source: &str, group: &str, x: f64, y: f64) -> CursorEvent {
    CursorEvent { group_id: group.into(), source_chart_id: source.into(), position: Some(DataPoint::new(x, y)) }
}

#[test]
fn cursor_broadcast_skips_source_and_unsynced_members() {
    let mut reg = LinkGroupRegistry::new();
    let (a, b, c, d) = (SpySurface::new(vp()), SpySurface::new(vp()), SpySurface::new(vp()), SpySurface::new(vp()));
    reg.register_chart("A", a.clone(), "g", SyncOptions::default());
    reg.register_chart("B", b.clone(), "g", SyncOptions::default());
    reg.register_chart("C", c.clone(), "g", SyncOptions::default());
    reg.register_chart("D", d.clone(), "g", SyncOptions { sync_cursor: false, ..SyncOptions::default() });

    reg.dispatch_cursor(&cursor_from("A", "g", 42.0, 1500.0));

    let expected = vec![Some(DataPoint::new(42.0, 1500.0))];
    assert!(a.borrow().cursors.is_empty(), "source must not receive its own event");
    assert_eq!(b.borrow().cursors, expected);
    assert_eq!(c.borrow().cursors, expected);
    assert!(d.borrow().cursors.is_empty());
}

#[test]
fn viewport_sync_respects_axis_restriction() {
    let mut reg = LinkGroupRegistry::new();
    let src = SpySurface::new(vp());
    let depth_track = SpySurface::new(vp());
    let free = SpySurface::new(vp());
    reg.register_chart("src", src.clone(), "g", SyncOptions::depth_track());
    reg.register_chart("track", depth_track.clone(), "g", SyncOptions::depth_track());
    reg.register_chart("free", free.clone(), "g", SyncOptions::default());

    // Only x changed on the source.
    let moved = Viewport::new(10.0, 20.0, 1000.0, 2000.0);
    reg.dispatch_viewport(&ViewportEvent { group_id: "g".into(), source_chart_id: "src".into(), viewport: moved, reset: false });

    for spy in [&depth_track, &free] {
        let s = spy.borrow();
        assert_eq!((s.viewport.x_min, s.viewport.x_max), (0.0, 100.0), "x must not sync");
        assert_eq!(s.applied.last().map(|(_, axes)| *axes), Some(AxisSet::Y));
    }

    let zoomed = Viewport::new(10.0, 20.0, 1200.0, 1300.0);
    reg.dispatch_viewport(&ViewportEvent { group_id: "g".into(), source_chart_id: "src".into(), viewport: zoomed, reset: false });
    let t = depth_track.borrow();
    assert_eq!((t.viewport.y_min, t.viewport.y_max), (1200.0, 1300.0));
    assert_eq!((t.viewport.x_min, t.viewport.x_max), (0.0, 100.0));
}

#[test]
fn viewport_sync_off_ignores_viewport_events() {
    let mut reg = LinkGroupRegistry::new();
    let a = SpySurface::new(vp());
    let b = SpySurface::new(vp());
    reg.register_chart("A", a.clone(), "g", SyncOptions::default());
    reg.register_chart("B", b.clone(), "g", SyncOptions { sync_viewport: false, ..SyncOptions::default() });
    let v = Viewport::new(1.0, 2.0, 3.0, 4.0);
    reg.dispatch_viewport(&ViewportEvent { group_id: "g".into(), source_chart_id: "A".into(), viewport: v, reset: false });
    assert!(b.borrow().applied.is_empty());
    assert!(a.borrow().applied.is_empty());
}

#[test]
fn unregistered_chart_receives_nothing() {
    let mut reg = LinkGroupRegistry::new();
    let a = SpySurface::new(vp());
    let b = SpySurface::new(vp());
    reg.register_chart("A", a.clone(), "g", SyncOptions::default());
    reg.register_chart("B", b.clone(), "g", SyncOptions::default());

    let removed = reg.unregister_chart("B").expect("B was registered");
    assert_eq!(removed.group_id, "g");
    assert!(reg.unregister_chart("B").is_none(), "second unregister is a no-op");

    reg.dispatch_cursor(&cursor_from("A", "g", 1.0, 1.0));
    reg.dispatch_viewport(&ViewportEvent { group_id: "g".into(), source_chart_id: "A".into(), viewport: vp(), reset: false });
    assert!(b.borrow().cursors.is_empty());
    assert!(b.borrow().applied.is_empty());
}

#[test]
fn re_registration_moves_chart_between_groups() {
    let mut reg = LinkGroupRegistry::new();
    let a = SpySurface::new(vp());
    let b = SpySurface::new(vp());
    reg.register_chart("A", a.clone(), "g1", SyncOptions::default());
    reg.register_chart("B", b.clone(), "g1", SyncOptions::default());
    reg.register_chart("B", b.clone(), "g2", SyncOptions::default());

    assert_eq!(reg.group_members("g1"), vec!["A".to_string()]);
    assert_eq!(reg.group_members("g2"), vec!["B".to_string()]);
    assert_eq!(reg.membership("B").map(|m| m.group_id.as_str()), Some("g2"));

    reg.dispatch_cursor(&cursor_from("A", "g1", 1.0, 1.0));
    assert!(b.borrow().cursors.is_empty());

    reg.unregister_chart("A");
    assert!(!reg.has_group("g1"), "empty group is discarded");
    assert_eq!(reg.group_count(), 1);
}

#[test]
fn events_for_unknown_group_are_dropped() {
    let mut reg = LinkGroupRegistry::new();
    let hits = Rc::new(RefCell::new(0));
    let h = hits.clone();
    let _sub = reg.on_cursor(move |_| *h.borrow_mut() += 1);
    reg.dispatch_cursor(&cursor_from("ghost", "gone", 0.0, 0.0));
    assert_eq!(*hits.borrow(), 0);
}

#[test]
fn sync_flags_are_read_at_dispatch_time() {
    let mut reg = LinkGroupRegistry::new();
    let a = SpySurface::new(vp());
    let b = SpySurface::new(vp());
    reg.register_chart("A", a.clone(), "g", SyncOptions::default());
    reg.register_chart("B", b.clone(), "g", SyncOptions::default());

    assert!(reg.update_sync("B", SyncOptions { sync_cursor: false, ..SyncOptions::default() }));
    reg.dispatch_cursor(&cursor_from("A", "g", 1.0, 1.0));
    assert!(b.borrow().cursors.is_empty());

    assert!(reg.update_sync("B", SyncOptions::default()));
    reg.dispatch_cursor(&cursor_from("A", "g", 2.0, 2.0));
    assert_eq!(b.borrow().cursors.len(), 1);
}

#[test]
fn subscribers_see_events_until_unsubscribed() {
    let mut reg = LinkGroupRegistry::new();
    let a = SpySurface::new(vp());
    reg.register_chart("A", a.clone(), "g", SyncOptions::default());

    let seen = Rc::new(RefCell::new(Vec::new()));
    let other = Rc::new(RefCell::new(0));
    let s1 = {
        let seen = seen.clone();
        reg.on_cursor(move |e| seen.borrow_mut().push(e.position))
    };
    let _s2 = {
        let other = other.clone();
        reg.on_cursor(move |_| *other.borrow_mut() += 1)
    };

    reg.dispatch_cursor(&cursor_from("A", "g", 5.0, 6.0));
    s1.unsubscribe();
    reg.dispatch_cursor(&CursorEvent { group_id: "g".into(), source_chart_id: "A".into(), position: None });

    assert_eq!(*seen.borrow(), vec![Some(DataPoint::new(5.0, 6.0))]);
    assert_eq!(*other.borrow(), 2, "independent subscribers keep receiving");
}

#[test]
fn pointer_move_is_translated_and_published() {
    let mut reg = LinkGroupRegistry::new();
    let a = SpySurface::new(vp());
    let b = SpySurface::new(vp());
    reg.register_chart("A", a.clone(), "g", SyncOptions::default());
    reg.register_chart("B", b.clone(), "g", SyncOptions::default());

    let events = Rc::new(RefCell::new(Vec::new()));
    let _sub = {
        let events = events.clone();
        reg.on_cursor(move |e: &CursorEvent| events.borrow_mut().push(e.clone()))
    };

    reg.handle_renderer_event("A", RendererEvent::PointerMove(PixelPoint::new(12.0, 1400.0)));
    reg.handle_renderer_event("A", RendererEvent::PointerLeave);

    assert_eq!(b.borrow().cursors, vec![Some(DataPoint::new(12.0, 1400.0)), None]);
    let events = events.borrow();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].source_chart_id, "A");
    assert_eq!(events[0].group_id, "g");
}

#[test]
fn gesture_is_applied_locally_then_broadcast() {
    let mut reg = LinkGroupRegistry::new();
    let a = SpySurface::new(vp());
    let b = SpySurface::new(vp());
    reg.register_chart("A", a.clone(), "g", SyncOptions::depth_track());
    reg.register_chart("B", b.clone(), "g", SyncOptions::depth_track());

    reg.handle_renderer_event("A", RendererEvent::Gesture(Gesture::Pan { dx: 0.0, dy: -100.0 }));

    assert_eq!(a.borrow().gestures.len(), 1);
    assert!(a.borrow().applied.is_empty());
    let bv = b.borrow().viewport;
    assert_eq!((bv.y_min, bv.y_max), (1100.0, 2100.0));
    assert_eq!((bv.x_min, bv.x_max), (0.0, 100.0));
}

#[test]
fn busy_member_is_skipped_without_panicking() {
    let mut reg = LinkGroupRegistry::new();
    let a = SpySurface::new(vp());
    let b = SpySurface::new(vp());
    reg.register_chart("A", a.clone(), "g", SyncOptions::default());
    reg.register_chart("B", b.clone(), "g", SyncOptions::default());

    let held = b.borrow_mut();
    reg.dispatch_cursor(&cursor_from("A", "g", 1.0, 1.0));
    drop(held);
    assert!(b.borrow().cursors.is_empty());

    reg.dispatch_cursor(&cursor_from("A", "g", 2.0, 2.0));
    assert_eq!(b.borrow().cursors, vec![Some(DataPoint::new(2.0, 2.0))]);
}
