// Host-side tests for the virtual scroll surface.

use scroll_core::{ScrollState, ScrollSurface};
use std::cell::RefCell;
use std::rc::Rc;

fn recording_surface(content: f32, viewport: f32) -> (ScrollSurface, Rc<RefCell<Vec<f32>>>) {
    let applied = Rc::new(RefCell::new(Vec::new()));
    let sink_log = applied.clone();
    let surface = ScrollSurface::new(content, viewport, move |offset: f32| {
        sink_log.borrow_mut().push(offset);
    });
    (surface, applied)
}

#[test]
fn construction_applies_initial_transform() {
    let (surface, applied) = recording_surface(3000.0, 1000.0);
    assert_eq!(surface.offset(), 0.0);
    assert_eq!(surface.state().max_offset, 2000.0);
    assert_eq!(*applied.borrow(), vec![0.0]);
}

#[test]
fn set_offset_clamps_to_range() {
    let (mut surface, _) = recording_surface(3000.0, 1000.0);
    assert!(surface.set_offset(5000.0));
    assert_eq!(surface.offset(), 2000.0);
    assert!(surface.set_offset(-40.0));
    assert_eq!(surface.offset(), 0.0);
}

#[test]
fn content_shorter_than_viewport_cannot_scroll() {
    let (mut surface, _) = recording_surface(600.0, 1000.0);
    assert_eq!(surface.state().max_offset, 0.0);
    assert!(!surface.scroll_by(250.0));
    assert_eq!(surface.offset(), 0.0);
}

#[test]
fn same_value_does_not_notify_twice() {
    let (mut surface, applied) = recording_surface(3000.0, 1000.0);
    let hits = Rc::new(RefCell::new(0));
    let h = hits.clone();
    surface.subscribe(move |_| *h.borrow_mut() += 1);

    assert!(surface.set_offset(400.0));
    assert!(!surface.set_offset(400.0));
    // Clamped to the same value as well.
    surface.set_offset(2000.0);
    assert!(!surface.set_offset(9000.0));

    assert_eq!(*hits.borrow(), 2);
    assert_eq!(*applied.borrow(), vec![0.0, 400.0, 2000.0]);
}

#[test]
fn nan_offset_is_ignored() {
    let (mut surface, _) = recording_surface(3000.0, 1000.0);
    surface.set_offset(300.0);
    assert!(!surface.set_offset(f32::NAN));
    assert_eq!(surface.offset(), 300.0);
}

#[test]
fn transform_is_applied_before_subscribers_run() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let sink_order = order.clone();
    let mut surface = ScrollSurface::new(3000.0, 1000.0, move |_: f32| {
        sink_order.borrow_mut().push("sink");
    });
    let sub_order = order.clone();
    surface.subscribe(move |_| sub_order.borrow_mut().push("subscriber"));
    order.borrow_mut().clear();

    surface.scroll_by(10.0);
    assert_eq!(*order.borrow(), vec!["sink", "subscriber"]);
}

#[test]
fn subscribers_see_committed_state() {
    let (mut surface, _) = recording_surface(3000.0, 1000.0);
    let seen: Rc<RefCell<Option<ScrollState>>> = Rc::new(RefCell::new(None));
    let s = seen.clone();
    surface.subscribe(move |state| *s.borrow_mut() = Some(*state));
    surface.set_offset(750.0);
    let state = seen.borrow().expect("notified");
    assert_eq!(state.virtual_offset, 750.0);
    assert_eq!(state.viewport_extent, 1000.0);
}

#[test]
fn unsubscribe_stops_notifications() {
    let (mut surface, _) = recording_surface(3000.0, 1000.0);
    let hits = Rc::new(RefCell::new(0));
    let h = hits.clone();
    let id = surface.subscribe(move |_| *h.borrow_mut() += 1);
    surface.set_offset(10.0);
    assert!(surface.unsubscribe(id));
    assert!(!surface.unsubscribe(id));
    surface.set_offset(20.0);
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn resize_reclamps_offset_and_notifies() {
    let (mut surface, applied) = recording_surface(3000.0, 1000.0);
    surface.set_offset(1800.0);
    assert!(surface.resize(2000.0, 1000.0));
    assert_eq!(surface.offset(), 1000.0);
    assert_eq!(applied.borrow().last().copied(), Some(1000.0));
    // Same geometry again is a no-op.
    assert!(!surface.resize(2000.0, 1000.0));
}

#[test]
fn destroyed_surface_is_inert() {
    let (mut surface, applied) = recording_surface(3000.0, 1000.0);
    let hits = Rc::new(RefCell::new(0));
    let h = hits.clone();
    surface.subscribe(move |_| *h.borrow_mut() += 1);
    surface.destroy();
    surface.destroy();

    assert!(surface.is_destroyed());
    assert!(!surface.set_offset(500.0));
    assert!(!surface.resize(9000.0, 100.0));
    assert_eq!(surface.offset(), 0.0);
    assert_eq!(*hits.borrow(), 0);
    assert_eq!(applied.borrow().len(), 1);
}
