// Host-side tests for trigger regions and the progress driver.

use scroll_core::{anchor_offset, ProgressDriver};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn driver_at(offset: f32) -> (ProgressDriver, Rc<Cell<f32>>) {
    let cell = Rc::new(Cell::new(offset));
    (ProgressDriver::new(cell.clone()), cell)
}

fn recorder() -> (Rc<RefCell<Vec<f32>>>, impl FnMut(f32) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let l = log.clone();
    (log, move |p| l.borrow_mut().push(p))
}

#[test]
fn registration_computes_progress_eagerly() {
    let (mut driver, _) = driver_at(500.0);
    let handle = driver.register_region(0.0, 1000.0);
    assert_eq!(handle.progress(), 0.5);

    let (log, cb) = recorder();
    assert!(driver.on_update(handle.id(), cb));
    assert_eq!(*log.borrow(), vec![0.5]);
}

#[test]
fn progress_is_clamped_outside_region() {
    let (mut driver, offset) = driver_at(0.0);
    let handle = driver.register_region(1000.0, 2000.0);
    assert_eq!(handle.progress(), 0.0);
    offset.set(5000.0);
    assert_eq!(handle.progress(), 1.0);
    offset.set(1250.0);
    assert!((handle.progress() - 0.25).abs() < 1e-6);
}

#[test]
fn degenerate_region_reads_as_passed() {
    let (mut driver, offset) = driver_at(0.0);
    let zero = driver.register_region(400.0, 400.0);
    let inverted = driver.register_region(900.0, 100.0);
    let unmeasured = driver.register_region(0.0, f32::NAN);
    for p in [zero.progress(), inverted.progress(), unmeasured.progress()] {
        assert_eq!(p, 1.0);
    }
    offset.set(f32::MAX);
    assert_eq!(zero.progress(), 1.0);
    assert!(zero.region().is_degenerate());
}

#[test]
fn dispatch_only_reports_changes() {
    let (mut driver, offset) = driver_at(0.0);
    let handle = driver.register_region(0.0, 100.0);
    let (log, cb) = recorder();
    driver.on_update(handle.id(), cb);

    driver.dispatch();
    offset.set(50.0);
    driver.dispatch();
    driver.dispatch();
    offset.set(500.0);
    driver.dispatch();
    offset.set(800.0);
    driver.dispatch();

    assert_eq!(*log.borrow(), vec![0.0, 0.5, 1.0]);
}

#[test]
fn stale_regions_wait_for_relayout() {
    let (mut driver, offset) = driver_at(0.0);
    let handle = driver.register_region(0.0, 100.0);
    let (log, cb) = recorder();
    driver.on_update(handle.id(), cb);

    driver.invalidate();
    assert!(driver.is_stale(handle.id()));
    offset.set(50.0);
    driver.dispatch();
    assert_eq!(*log.borrow(), vec![0.0]);

    assert!(driver.relayout(handle.id(), 0.0, 200.0));
    assert!(!driver.is_stale(handle.id()));
    assert_eq!(*log.borrow(), vec![0.0, 0.25]);
    assert_eq!(handle.region().end_offset, 200.0);

    // Relayout with identical geometry is safe to repeat.
    driver.relayout(handle.id(), 0.0, 200.0);
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn unregister_and_clear_drop_callbacks() {
    let (mut driver, offset) = driver_at(0.0);
    let a = driver.register_region(0.0, 100.0);
    let b = driver.register_region(0.0, 200.0);
    let (log_b, cb_b) = recorder();
    driver.on_update(b.id(), cb_b);

    assert!(driver.unregister(a.id()));
    assert!(!driver.unregister(a.id()));
    assert!(!driver.on_update(a.id(), |_| {}));
    assert_eq!(driver.len(), 1);

    offset.set(100.0);
    driver.dispatch();
    assert_eq!(*log_b.borrow(), vec![0.0, 0.5]);

    driver.clear();
    assert!(driver.is_empty());
    offset.set(200.0);
    driver.dispatch();
    assert_eq!(log_b.borrow().len(), 2);
}

#[test]
fn anchor_offset_places_element_in_viewport() {
    // Element 3000px down, viewport 1000px: its top reaches 85% of the
    // viewport once 2150px have been scrolled.
    assert_eq!(anchor_offset(3000.0, 1000.0, 0.85), 2150.0);
    assert_eq!(anchor_offset(3000.0, 1000.0, 0.0), 3000.0);
}
