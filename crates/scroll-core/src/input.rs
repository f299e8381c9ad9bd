//! Raw input routing.
//!
//! The host feeds every wheel and touch-move delta into one [`InputBus`].
//! Listeners run capture-phase first, then bubble-phase, in registration
//! order. Dispatch works on a snapshot, so a listener may add or remove
//! listeners (including itself) while running; removed listeners are skipped.

use crate::constants::WHEEL_LINE_PX;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Wheel,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    /// Vertical delta in pixels; positive scrolls the content forward.
    pub delta: f32,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl InputEvent {
    pub fn new(kind: InputKind, delta: f32) -> Self {
        Self {
            kind,
            delta,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn wheel(delta: f32) -> Self {
        Self::new(InputKind::Wheel, delta)
    }

    pub fn touch(delta: f32) -> Self {
        Self::new(InputKind::Touch, delta)
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Capture,
    Bubble,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Handler = Rc<RefCell<dyn FnMut(&mut InputEvent)>>;

pub type BusHandle = Rc<RefCell<InputBus>>;

#[derive(Default)]
pub struct InputBus {
    listeners: Vec<(ListenerId, Phase, Handler)>,
    next_id: u32,
    closed: bool,
}

impl InputBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_handle(self) -> BusHandle {
        Rc::new(RefCell::new(self))
    }

    /// Register a listener. A closed bus hands back an id but keeps nothing.
    pub fn listen(
        &mut self,
        phase: Phase,
        handler: impl FnMut(&mut InputEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        if !self.closed {
            let handler: Handler = Rc::new(RefCell::new(handler));
            self.listeners.push((id, phase, handler));
        }
        id
    }

    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        before != self.listeners.len()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|(lid, _, _)| *lid == id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Drop every listener and refuse new ones.
    pub fn close(&mut self) {
        self.closed = true;
        self.listeners.clear();
    }

    /// Deliver `ev`. The bus is not borrowed while listeners run.
    pub fn dispatch(bus: &RefCell<InputBus>, ev: &mut InputEvent) {
        let snapshot: SmallVec<[(ListenerId, Handler); 4]> = {
            let b = bus.borrow();
            let mut ordered: SmallVec<[(ListenerId, Handler); 4]> = SmallVec::new();
            for phase in [Phase::Capture, Phase::Bubble] {
                ordered.extend(
                    b.listeners
                        .iter()
                        .filter(|(_, p, _)| *p == phase)
                        .map(|(id, _, h)| (*id, h.clone())),
                );
            }
            ordered
        };
        for (id, handler) in snapshot {
            if ev.is_propagation_stopped() {
                break;
            }
            if !bus.borrow().contains(id) {
                continue;
            }
            // A listener that re-enters dispatch does not see its own event.
            if let Ok(mut h) = handler.try_borrow_mut() {
                (&mut *h)(ev);
            }
        }
    }
}

/// Turns successive touch positions into scroll deltas.
#[derive(Clone, Copy, Debug, Default)]
pub struct TouchTracker {
    last_y: Option<f32>,
}

impl TouchTracker {
    pub fn begin(&mut self, y: f32) {
        self.last_y = Some(y);
    }

    /// Delta since the previous position; dragging up scrolls forward.
    pub fn track(&mut self, y: f32) -> Option<f32> {
        let last = self.last_y.replace(y)?;
        Some(last - y)
    }

    pub fn end(&mut self) {
        self.last_y = None;
    }
}

/// Normalise a wheel delta reported in pixels (0), lines (1) or pages (2).
pub fn wheel_delta_px(delta: f32, delta_mode: u32, page_px: f32) -> f32 {
    match delta_mode {
        1 => delta * WHEEL_LINE_PX,
        2 => delta * page_px,
        _ => delta,
    }
}
