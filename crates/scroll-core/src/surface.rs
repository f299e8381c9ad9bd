//! Virtual scroll surface.
//!
//! The surface owns the single virtual offset for the page. Native scrolling
//! is replaced by a transform on the content container; every committed
//! offset change pushes that transform synchronously before subscribers are
//! notified, so the visual position never lags the logical one.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Snapshot of the surface handed to subscribers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollState {
    pub virtual_offset: f32,
    pub max_offset: f32,
    pub viewport_extent: f32,
}

/// Receives the content container's translation on every offset change.
pub trait TransformSink {
    fn apply(&mut self, offset: f32);
}

impl<F: FnMut(f32)> TransformSink for F {
    fn apply(&mut self, offset: f32) {
        self(offset)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u32);

type Subscriber = Box<dyn FnMut(&ScrollState)>;

pub type SurfaceHandle = Rc<RefCell<ScrollSurface>>;

pub struct ScrollSurface {
    offset: Rc<Cell<f32>>,
    max_offset: f32,
    viewport_extent: f32,
    content_extent: f32,
    sink: Option<Box<dyn TransformSink>>,
    subscribers: SmallVec<[(SubscriberId, Subscriber); 4]>,
    next_id: u32,
}

impl ScrollSurface {
    pub fn new(
        content_extent: f32,
        viewport_extent: f32,
        sink: impl TransformSink + 'static,
    ) -> Self {
        let mut surface = Self {
            offset: Rc::new(Cell::new(0.0)),
            max_offset: max_offset_for(content_extent, viewport_extent),
            viewport_extent: viewport_extent.max(0.0),
            content_extent: content_extent.max(0.0),
            sink: Some(Box::new(sink)),
            subscribers: SmallVec::new(),
            next_id: 0,
        };
        if let Some(sink) = surface.sink.as_mut() {
            sink.apply(0.0);
        }
        surface
    }

    pub fn into_handle(self) -> SurfaceHandle {
        Rc::new(RefCell::new(self))
    }

    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset.get()
    }

    /// Read-only view of the live offset for downstream readers.
    pub fn offset_cell(&self) -> Rc<Cell<f32>> {
        self.offset.clone()
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            virtual_offset: self.offset.get(),
            max_offset: self.max_offset,
            viewport_extent: self.viewport_extent,
        }
    }

    pub fn content_extent(&self) -> f32 {
        self.content_extent
    }

    pub fn is_destroyed(&self) -> bool {
        self.sink.is_none()
    }

    /// Clamp to `[0, max_offset]` and commit. Returns whether the offset
    /// moved; setting the current value again notifies nobody.
    pub fn set_offset(&mut self, value: f32) -> bool {
        if self.is_destroyed() || value.is_nan() {
            return false;
        }
        let next = value.clamp(0.0, self.max_offset);
        if next == self.offset.get() {
            return false;
        }
        self.offset.set(next);
        self.commit();
        true
    }

    pub fn scroll_by(&mut self, delta: f32) -> bool {
        let current = self.offset.get();
        self.set_offset(current + delta)
    }

    pub fn subscribe(&mut self, on_change: impl FnMut(&ScrollState) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        if !self.is_destroyed() {
            self.subscribers.push((id, Box::new(on_change)));
        }
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Re-measure after a viewport resize or content reflow. The offset is
    /// re-clamped; subscribers hear about any change to the state.
    pub fn resize(&mut self, content_extent: f32, viewport_extent: f32) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let before = self.state();
        self.content_extent = content_extent.max(0.0);
        self.viewport_extent = viewport_extent.max(0.0);
        self.max_offset = max_offset_for(content_extent, viewport_extent);
        self.offset.set(self.offset.get().clamp(0.0, self.max_offset));
        if before == self.state() {
            return false;
        }
        log::debug!(
            "[surface] resized: max_offset={:.1} viewport={:.1}",
            self.max_offset,
            self.viewport_extent
        );
        self.commit();
        true
    }

    /// Drop the sink and every subscriber. Later calls are inert.
    pub fn destroy(&mut self) {
        if self.sink.take().is_some() {
            log::info!("[surface] destroyed with {} subscribers", self.subscribers.len());
        }
        self.subscribers.clear();
    }

    fn commit(&mut self) {
        let state = self.state();
        if let Some(sink) = self.sink.as_mut() {
            sink.apply(state.virtual_offset);
        }
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&state);
        }
    }
}

#[inline]
fn max_offset_for(content_extent: f32, viewport_extent: f32) -> f32 {
    let max = content_extent - viewport_extent;
    if max.is_finite() {
        max.max(0.0)
    } else {
        0.0
    }
}
