use crate::config::DampenerConfig;
use crate::input::{BusHandle, InputBus, ListenerId, Phase};
use crate::surface::{ScrollSurface, SurfaceHandle};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub struct VelocityDampener {
    surface: Weak<RefCell<ScrollSurface>>,
    bus: Weak<RefCell<InputBus>>,
    listener: Option<ListenerId>,
    config: Option<DampenerConfig>,
}

impl VelocityDampener {
    pub fn new(surface: &SurfaceHandle, bus: &BusHandle) -> Self {
        Self {
            surface: Rc::downgrade(surface),
            bus: Rc::downgrade(bus),
            listener: None,
            config: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    /// Scale in effect while attached.
    pub fn config(&self) -> Option<DampenerConfig> {
        self.config
    }

    /// Install the rewrite listener. Attaching twice keeps the first
    /// listener and returns `false`.
    pub fn attach(&mut self, config: DampenerConfig) -> bool {
        if self.listener.is_some() {
            return false;
        }
        let Some(bus) = self.bus.upgrade() else {
            return false;
        };
        let surface = self.surface.clone();
        let Ok(mut bus) = bus.try_borrow_mut() else {
            log::warn!("[dampener] input bus busy; attach skipped");
            return false;
        };
        if bus.is_closed() {
            return false;
        }
        let id = bus.listen(Phase::Capture, move |ev| {
            ev.prevent_default();
            ev.stop_propagation();
            let Some(surface) = surface.upgrade() else {
                return;
            };
            // Bind first so the borrow ends before `surface` is dropped.
            let scrolled = match surface.try_borrow_mut() {
                Ok(mut s) => s.scroll_by(config.apply(ev.delta)),
                Err(_) => false,
            };
            if !scrolled {
                log::trace!("[dampener] delta {:.1} produced no movement", ev.delta);
            }
        });
        self.listener = Some(id);
        self.config = Some(config);
        log::info!("[dampener] attached scale={:.2}", config.scale_factor());
        true
    }

    /// Remove the listener. Detaching when nothing is attached is a no-op.
    pub fn detach(&mut self) -> bool {
        let Some(id) = self.listener.take() else {
            return false;
        };
        self.config = None;
        if let Some(bus) = self.bus.upgrade() {
            if let Ok(mut bus) = bus.try_borrow_mut() {
                bus.unlisten(id);
            }
        }
        log::info!("[dampener] detached");
        true
    }
}

impl Drop for VelocityDampener {
    fn drop(&mut self) {
        self.detach();
    }
}
