use crate::dom::ListenerGuard;
use scroll_core::{wheel_delta_px, BusHandle, InputBus, InputEvent, TouchTracker};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

fn first_touch_y(ev: &web::TouchEvent) -> Option<f32> {
    ev.touches().get(0).map(|t| t.client_y() as f32)
}

/// One native listener per input kind on the scroller, all feeding the bus.
/// Listeners are non-passive so a dampened or virtualised delta can cancel
/// the browser's own scroll.
pub fn wire_scroller_input(
    root: &web::HtmlElement,
    bus: &BusHandle,
) -> anyhow::Result<Vec<ListenerGuard>> {
    let target: &web::EventTarget = root.as_ref();
    let mut guards = Vec::with_capacity(4);

    let bus_wheel = bus.clone();
    guards.push(ListenerGuard::new(target, "wheel", false, move |e| {
        let Some(we) = e.dyn_ref::<web::WheelEvent>() else {
            return;
        };
        let (_, page_px) = crate::dom::viewport_size();
        let delta = wheel_delta_px(we.delta_y() as f32, we.delta_mode(), page_px);
        let mut ev = InputEvent::wheel(delta);
        InputBus::dispatch(&bus_wheel, &mut ev);
        if ev.is_default_prevented() {
            we.prevent_default();
        }
    })?);

    let tracker = Rc::new(RefCell::new(TouchTracker::default()));

    let tracker_start = tracker.clone();
    guards.push(ListenerGuard::new(target, "touchstart", true, move |e| {
        if let Some(y) = e.dyn_ref::<web::TouchEvent>().and_then(first_touch_y) {
            tracker_start.borrow_mut().begin(y);
        }
    })?);

    let tracker_move = tracker.clone();
    let bus_touch = bus.clone();
    guards.push(ListenerGuard::new(target, "touchmove", false, move |e| {
        let Some(te) = e.dyn_ref::<web::TouchEvent>() else {
            return;
        };
        let Some(y) = first_touch_y(te) else {
            return;
        };
        let Some(delta) = tracker_move.borrow_mut().track(y) else {
            return;
        };
        let mut ev = InputEvent::touch(delta);
        InputBus::dispatch(&bus_touch, &mut ev);
        if ev.is_default_prevented() {
            te.prevent_default();
        }
    })?);

    let tracker_end = tracker;
    guards.push(ListenerGuard::new(target, "touchend", true, move |_| {
        tracker_end.borrow_mut().end();
    })?);

    log::info!("[input] wired {} scroller listeners", guards.len());
    Ok(guards)
}
