//! Stage: one virtual scroll surface and the sections choreographed on it.
//!
//! Data flows one way: input bus -> (dampener) -> surface -> progress driver
//! -> pin controllers, which attach and detach dampeners on their
//! transitions. Visual output is pulled with [`Stage::frame`] and is a pure
//! function of the current offset.

use crate::config::DampenerConfig;
use crate::dampener::VelocityDampener;
use crate::input::{BusHandle, InputBus, InputEvent, Phase};
use crate::pin::{pin_translation, PinController, PinTransition};
use crate::progress::{ProgressDriver, ProgressHandle};
use crate::reveal::Reveal;
use crate::scene::{SceneFrame, SceneSequencer, VisualState};
use crate::slider::{PanelFrame, PanelSlider, WipeStack};
use crate::surface::{ScrollState, ScrollSurface, SubscriberId, SurfaceHandle, TransformSink};
use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SectionId(usize);

impl SectionId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub enum Choreography {
    Scenes(SceneSequencer),
    Slider(PanelSlider),
    Wipe(WipeStack),
    Reveal(Reveal),
}

#[derive(Clone, Debug, PartialEq)]
pub enum VisualFrame {
    Scenes(SmallVec<[SceneFrame; 8]>),
    Panels(SmallVec<[PanelFrame; 8]>),
    Wipe(SmallVec<[f32; 8]>),
    Reveal(VisualState),
}

impl Choreography {
    pub fn sample(&self, progress: f32) -> VisualFrame {
        match self {
            Choreography::Scenes(s) => VisualFrame::Scenes(s.frame(progress)),
            Choreography::Slider(s) => VisualFrame::Panels(s.frame(progress)),
            Choreography::Wipe(w) => VisualFrame::Wipe(w.frame(progress)),
            Choreography::Reveal(r) => VisualFrame::Reveal(r.state(progress)),
        }
    }

    /// Scroll distance this choreography wants when pinned.
    pub fn natural_span(&self, geometry: &SurfaceGeometry) -> Option<f32> {
        match self {
            Choreography::Scenes(s) => Some(geometry.viewport_height * s.len() as f32),
            Choreography::Slider(s) => {
                Some(geometry.viewport_width * s.panel_count().saturating_sub(1) as f32)
            }
            Choreography::Wipe(w) => Some(geometry.viewport_height * w.panel_count() as f32),
            Choreography::Reveal(_) => None,
        }
    }
}

/// Largest pinned scroll distance any of `choreographies` asks for.
pub fn natural_span(choreographies: &[Choreography], geometry: &SurfaceGeometry) -> Option<f32> {
    choreographies
        .iter()
        .filter_map(|c| c.natural_span(geometry))
        .reduce(f32::max)
}

#[derive(Clone, Debug)]
pub struct SectionSpec {
    pub anchor: String,
    pub pinned: bool,
    pub dampen: Option<DampenerConfig>,
    pub choreographies: Vec<Choreography>,
}

impl SectionSpec {
    pub fn new(anchor: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
            pinned: false,
            dampen: None,
            choreographies: Vec::new(),
        }
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    /// Slow input down while pinned. Implies [`pinned`](Self::pinned).
    pub fn dampened(mut self, config: DampenerConfig) -> Self {
        self.pinned = true;
        self.dampen = Some(config);
        self
    }

    pub fn with(mut self, choreography: Choreography) -> Self {
        self.choreographies.push(choreography);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceGeometry {
    pub content_extent: f32,
    pub viewport_height: f32,
    pub viewport_width: f32,
}

/// Everything the rendering layer needs for one section this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionFrame {
    pub id: SectionId,
    pub progress: f32,
    pub pinned: bool,
    pub pin_offset: f32,
    pub visuals: SmallVec<[VisualFrame; 2]>,
}

struct Section {
    anchor: String,
    handle: ProgressHandle,
    pin: Option<Rc<RefCell<PinController>>>,
    dampener: Option<Rc<RefCell<VelocityDampener>>>,
    choreographies: Vec<Choreography>,
}

pub struct Stage {
    surface: SurfaceHandle,
    bus: BusHandle,
    driver: Rc<RefCell<ProgressDriver>>,
    sections: Vec<Section>,
    anchors: FnvHashMap<String, SectionId>,
    destroyed: bool,
}

impl Stage {
    pub fn new(geometry: SurfaceGeometry, sink: impl TransformSink + 'static) -> Self {
        let surface = ScrollSurface::new(geometry.content_extent, geometry.viewport_height, sink)
            .into_handle();
        let bus = InputBus::new().into_handle();
        let driver = Rc::new(RefCell::new(ProgressDriver::new(
            surface.borrow().offset_cell(),
        )));

        let driver_sub = driver.clone();
        surface
            .borrow_mut()
            .subscribe(move |_| match driver_sub.try_borrow_mut() {
                Ok(mut d) => d.dispatch(),
                Err(_) => log::warn!("[stage] progress driver busy; dispatch deferred"),
            });

        // Plain 1:1 virtual scrolling for anything a dampener did not take.
        let surface_weak = Rc::downgrade(&surface);
        bus.borrow_mut().listen(Phase::Bubble, move |ev| {
            ev.prevent_default();
            if let Some(surface) = surface_weak.upgrade() {
                if let Ok(mut s) = surface.try_borrow_mut() {
                    s.scroll_by(ev.delta);
                }
            }
        });

        log::info!(
            "[stage] mounted content={:.0} viewport={:.0}x{:.0}",
            geometry.content_extent,
            geometry.viewport_width,
            geometry.viewport_height
        );
        Self {
            surface,
            bus,
            driver,
            sections: Vec::new(),
            anchors: FnvHashMap::default(),
            destroyed: false,
        }
    }

    pub fn surface(&self) -> &SurfaceHandle {
        &self.surface
    }

    pub fn bus(&self) -> &BusHandle {
        &self.bus
    }

    pub fn offset(&self) -> f32 {
        self.surface.borrow().offset()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.surface.borrow().state()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Forward a change listener to the surface.
    pub fn subscribe(&self, on_change: impl FnMut(&ScrollState) + 'static) -> SubscriberId {
        self.surface.borrow_mut().subscribe(on_change)
    }

    pub fn add_section(
        &mut self,
        spec: SectionSpec,
        start_offset: f32,
        end_offset: f32,
    ) -> SectionId {
        let id = SectionId(self.sections.len());
        let handle = self
            .driver
            .borrow_mut()
            .register_region(start_offset, end_offset);
        let pin = spec
            .pinned
            .then(|| Rc::new(RefCell::new(PinController::new())));
        let dampener = match (&pin, spec.dampen) {
            (Some(_), Some(_)) => Some(Rc::new(RefCell::new(VelocityDampener::new(
                &self.surface,
                &self.bus,
            )))),
            _ => None,
        };

        if let Some(pin) = &pin {
            let pin = pin.clone();
            let dampener = dampener.clone();
            let dampen = spec.dampen;
            let anchor = spec.anchor.clone();
            self.driver
                .borrow_mut()
                .on_update(handle.id(), move |p| {
                    let Some(transition) = pin.borrow_mut().update(p) else {
                        return;
                    };
                    log::info!("[stage] section `{}` {:?}", anchor, transition);
                    let Some(d) = &dampener else {
                        return;
                    };
                    match (transition, dampen) {
                        (PinTransition::Entered(_), Some(cfg)) => {
                            d.borrow_mut().attach(cfg);
                        }
                        (PinTransition::Left(_), _) => {
                            d.borrow_mut().detach();
                        }
                        _ => {}
                    }
                });
        }

        if self.anchors.insert(spec.anchor.clone(), id).is_some() {
            log::warn!("[stage] anchor `{}` registered twice; latest wins", spec.anchor);
        }
        self.sections.push(Section {
            anchor: spec.anchor,
            handle,
            pin,
            dampener,
            choreographies: spec.choreographies,
        });
        id
    }

    pub fn section_id(&self, anchor: &str) -> Option<SectionId> {
        self.anchors.get(anchor).copied()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn anchor(&self, id: SectionId) -> Option<&str> {
        self.sections.get(id.0).map(|s| s.anchor.as_str())
    }

    pub fn progress(&self, id: SectionId) -> Option<f32> {
        self.sections.get(id.0).map(|s| s.handle.progress())
    }

    pub fn is_pinned(&self, id: SectionId) -> bool {
        self.sections
            .get(id.0)
            .and_then(|s| s.pin.as_ref())
            .map(|p| p.borrow().is_pinned())
            .unwrap_or(false)
    }

    pub fn is_dampened(&self, id: SectionId) -> bool {
        self.sections
            .get(id.0)
            .and_then(|s| s.dampener.as_ref())
            .map(|d| d.borrow().is_attached())
            .unwrap_or(false)
    }

    pub fn natural_span(&self, id: SectionId, geometry: &SurfaceGeometry) -> Option<f32> {
        natural_span(&self.sections.get(id.0)?.choreographies, geometry)
    }

    /// Programmatic scroll. Visual state is correct immediately.
    pub fn scroll_to(&self, offset: f32) -> bool {
        match self.surface.try_borrow_mut() {
            Ok(mut s) => s.set_offset(offset),
            Err(_) => false,
        }
    }

    pub fn dispatch_input(&self, ev: &mut InputEvent) {
        InputBus::dispatch(&self.bus, ev);
    }

    /// Re-measure after resize or reflow. Every region is invalidated first;
    /// anchors `measure` cannot place collapse to a degenerate region, which
    /// reads as already passed. Safe to call redundantly.
    pub fn relayout(
        &mut self,
        geometry: SurfaceGeometry,
        measure: impl Fn(&str) -> Option<(f32, f32)>,
    ) {
        if self.destroyed {
            return;
        }
        self.driver.borrow_mut().invalidate();
        for section in &mut self.sections {
            for c in &mut section.choreographies {
                if let Choreography::Slider(s) = c {
                    s.set_unit_width(geometry.viewport_width);
                }
            }
        }
        self.surface
            .borrow_mut()
            .resize(geometry.content_extent, geometry.viewport_height);
        for section in &self.sections {
            let (start, end) = measure(&section.anchor).unwrap_or_else(|| {
                log::warn!("[stage] anchor `{}` not measurable", section.anchor);
                let s = section.handle.region().start_offset;
                (s, s)
            });
            self.driver
                .borrow_mut()
                .relayout(section.handle.id(), start, end);
        }
    }

    pub fn frame(&self) -> SmallVec<[SectionFrame; 8]> {
        let offset = self.offset();
        self.sections
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let progress = s.handle.progress();
                SectionFrame {
                    id: SectionId(i),
                    progress,
                    pinned: s.pin.as_ref().is_some_and(|p| p.borrow().is_pinned()),
                    pin_offset: if s.pin.is_some() {
                        pin_translation(offset, &s.handle.region())
                    } else {
                        0.0
                    },
                    visuals: s.choreographies.iter().map(|c| c.sample(progress)).collect(),
                }
            })
            .collect()
    }

    /// Tear everything down: dampeners detach, regions and subscribers are
    /// discarded, and the input bus drops every listener. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for section in &self.sections {
            if let Some(d) = &section.dampener {
                d.borrow_mut().detach();
            }
            if let Some(p) = &section.pin {
                p.borrow_mut().reset();
            }
        }
        self.driver.borrow_mut().clear();
        self.surface.borrow_mut().destroy();
        self.bus.borrow_mut().close();
        log::info!("[stage] destroyed {} sections", self.sections.len());
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.destroy();
    }
}
