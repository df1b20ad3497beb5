// File: crates/logview-core/tests/chart_view.rs
// Purpose: Chart lifecycle against a recording renderer: deferred build, coalescing, resize, teardown.

mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use common::{recording, Call};
use logview_core::{
    BindingData, ChartSurface, ChartView, ContainerSize, DepthRange, Gesture, LinkGroupRegistry, PixelPoint,
    PresentationConfig, RenderBinding, RendererEvent, SyncOptions,
};

fn gr_binding() -> RenderBinding {
    RenderBinding::new(PresentationConfig::well_log()).with_data(BindingData::Curves(vec![common::gapped_gr("gr")]))
}

#[test]
fn zero_sized_container_defers_build_until_resize() {
    let (rec, renderer) = recording();
    let t0 = Instant::now();
    let mut chart = ChartView::new("c1", gr_binding(), renderer, ContainerSize::new(0.0, 0.0));

    assert!(chart.is_pending());
    assert!(!chart.frame(t0).unwrap());
    assert!(rec.borrow().calls.is_empty(), "no renderer call before the container has a size");

    chart.container_resized(ContainerSize::new(300.0, 800.0), t0);
    assert!(chart.frame(t0).unwrap());
    assert!(!chart.frame(t0).unwrap(), "deferred build runs exactly once");
    assert_eq!(rec.borrow().calls, vec![Call::Init(1, ContainerSize::new(300.0, 800.0))]);
    assert!(chart.handle().is_some());
    assert!(!chart.is_pending());
}

#[test]
fn rapid_requests_collapse_into_one_rebuild() {
    let (rec, renderer) = recording();
    let t0 = Instant::now();
    let mut chart = ChartView::new("c1", gr_binding(), renderer, ContainerSize::new(300.0, 800.0));
    chart.frame(t0).unwrap();

    chart.pin_depth(Some(DepthRange::new(1100.0, 1200.0)));
    chart.set_data(BindingData::Curves(vec![common::plain_curve("gr", "GR", 1100.0, 1400.0, 0.5)]));
    chart.pin_depth(Some(DepthRange::new(1150.0, 1250.0)));
    assert!(chart.frame(t0).unwrap());
    assert!(!chart.frame(t0).unwrap());

    let r = rec.borrow();
    assert_eq!(r.count(|c| matches!(c, Call::SetOption(_))), 1);
    let y = &r.live[&1].y_axis;
    assert_eq!((y.min, y.max), (1150.0, 1250.0), "latest state wins");
}

#[test]
fn resize_is_debounced_then_fully_rebuilt() {
    let (rec, renderer) = recording();
    let t0 = Instant::now();
    let ms = Duration::from_millis;
    let mut chart = ChartView::new("c1", gr_binding(), renderer, ContainerSize::new(200.0, 800.0));
    chart.frame(t0).unwrap();
    let narrow = rec.borrow().live[&1].point_count();

    chart.container_resized(ContainerSize::new(400.0, 800.0), t0);
    chart.container_resized(ContainerSize::new(900.0, 800.0), t0 + ms(40));
    assert!(!chart.frame(t0 + ms(100)).unwrap());
    assert!(chart.frame(t0 + ms(141)).unwrap());

    let r = rec.borrow();
    assert_eq!(r.count(|c| matches!(c, Call::Resize(1, s) if s.width == 900.0)), 1);
    assert_eq!(r.count(|c| matches!(c, Call::Resize(..))), 1);
    assert!(r.live[&1].point_count() > narrow, "wider container gets a larger budget");
}

#[test]
fn unchanged_config_does_not_rebuild() {
    let (rec, renderer) = recording();
    let t0 = Instant::now();
    let mut chart = ChartView::new("c1", gr_binding(), renderer, ContainerSize::new(300.0, 800.0));
    chart.frame(t0).unwrap();
    chart.set_config(PresentationConfig::well_log());
    assert!(!chart.frame(t0).unwrap());

    let mut cfg = PresentationConfig::well_log();
    cfg.line.width = 3.0;
    chart.set_config(cfg);
    assert!(chart.frame(t0).unwrap());
    assert_eq!(rec.borrow().live[&1].series[0].style.width, 3.0);
}

#[test]
fn pixel_translation_follows_well_log_axes() {
    let (_rec, renderer) = recording();
    let t0 = Instant::now();
    let mut chart = ChartView::new("c1", gr_binding(), renderer, ContainerSize::new(300.0, 832.0));
    chart.pin_depth(Some(DepthRange::new(1000.0, 1400.0)));
    chart.frame(t0).unwrap();

    // Default insets: top 24, bottom 32 -> plot rows 24..800
    let top = chart.pixel_to_data(PixelPoint::new(150.0, 24.0)).unwrap();
    let bottom = chart.pixel_to_data(PixelPoint::new(150.0, 800.0)).unwrap();
    assert!((top.y - 1000.0).abs() < 1e-6, "shallow end at the top, got {}", top.y);
    assert!((bottom.y - 1400.0).abs() < 1e-6);
    assert!(chart.pixel_to_data(PixelPoint::new(150.0, 5.0)).is_none(), "outside the plot");
}

#[test]
fn zoom_gesture_only_touches_interactive_axes() {
    let (_rec, renderer) = recording();
    let t0 = Instant::now();
    let mut chart = ChartView::new("c1", gr_binding(), renderer, ContainerSize::new(300.0, 800.0));
    chart.frame(t0).unwrap();
    let before = chart.viewport();

    chart.apply_gesture(Gesture::Zoom { at: PixelPoint::new(150.0, 400.0), factor: 0.5 });
    let after = chart.viewport();
    assert!(chart.binding().x_range().is_none(), "value axis is not interactive on a depth track");
    assert!(chart.binding().y_range().is_some());
    assert!((after.y_max - after.y_min) < (before.y_max - before.y_min) * 0.51);

    chart.apply_gesture(Gesture::Reset);
    let reset = chart.viewport();
    assert_eq!((reset.y_min, reset.y_max), (before.y_min, before.y_max));
}

#[test]
fn dispose_unregisters_before_releasing_handle() {
    let (rec, renderer) = recording();
    let t0 = Instant::now();
    let mut reg = LinkGroupRegistry::new();
    let a = Rc::new(RefCell::new(ChartView::new("a", gr_binding(), renderer.clone(), ContainerSize::new(300.0, 800.0))));
    let b = Rc::new(RefCell::new(ChartView::new("b", gr_binding(), renderer, ContainerSize::new(300.0, 800.0))));
    reg.register_chart("a", a.clone(), "well", SyncOptions::depth_track());
    reg.register_chart("b", b.clone(), "well", SyncOptions::depth_track());
    a.borrow_mut().frame(t0).unwrap();
    b.borrow_mut().frame(t0).unwrap();

    b.borrow_mut().dispose(&mut reg);
    assert!(reg.membership("b").is_none());
    assert_eq!(rec.borrow().count(|c| matches!(c, Call::Dispose(2))), 1);

    let before = rec.borrow().calls.len();
    reg.handle_renderer_event("a", RendererEvent::PointerMove(PixelPoint::new(100.0, 300.0)));
    // The disposed chart's handle is never touched again.
    assert_eq!(rec.borrow().calls.len(), before);
    assert!(b.borrow().cursor().is_none());

    // Later frames, data and resizes never bring the disposed chart back.
    let mut chart = b.borrow_mut();
    assert!(chart.is_disposed());
    chart.set_data(BindingData::Curves(vec![common::gapped_gr("gr")]));
    chart.container_resized(ContainerSize::new(400.0, 800.0), t0);
    assert!(!chart.frame(t0 + Duration::from_secs(1)).unwrap());
    assert!(chart.handle().is_none());
    assert_eq!(rec.borrow().count(|c| matches!(c, Call::Init(..))), 2);
}

#[test]
fn cursor_from_group_reaches_renderer() {
    let (rec, renderer) = recording();
    let t0 = Instant::now();
    let mut reg = LinkGroupRegistry::new();
    let a = Rc::new(RefCell::new(ChartView::new("a", gr_binding(), renderer.clone(), ContainerSize::new(300.0, 800.0))));
    let b = Rc::new(RefCell::new(ChartView::new("b", gr_binding(), renderer, ContainerSize::new(300.0, 800.0))));
    reg.register_chart("a", a.clone(), "well", SyncOptions::depth_track());
    reg.register_chart("b", b.clone(), "well", SyncOptions::depth_track());
    a.borrow_mut().frame(t0).unwrap();
    b.borrow_mut().frame(t0).unwrap();

    reg.handle_renderer_event("a", RendererEvent::PointerMove(PixelPoint::new(100.0, 300.0)));
    let shown = b.borrow().cursor().expect("b mirrors a's cursor");
    assert!(shown.y > 1000.0 && shown.y < 2300.0);
    assert!(a.borrow().cursor().is_none());
    assert_eq!(rec.borrow().count(|c| matches!(c, Call::Cursor(2, Some(_)))), 1);
}
