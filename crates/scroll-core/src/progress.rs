//! Trigger regions and the progress driver.
//!
//! A region is a span of virtual scroll units. Its progress is always
//! re-derived from the live offset; the driver only remembers the last value
//! it dispatched so it can skip callbacks when nothing moved.

use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerRegion {
    pub id: RegionId,
    pub start_offset: f32,
    pub end_offset: f32,
}

impl TriggerRegion {
    #[inline]
    pub fn span(&self) -> f32 {
        self.end_offset - self.start_offset
    }

    /// Zero, negative or unmeasured extent.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let span = self.span();
        !span.is_finite() || span <= 0.0
    }

    /// Normalised position of `offset` in this region. Degenerate regions
    /// count as already passed.
    pub fn progress_at(&self, offset: f32) -> f32 {
        if self.is_degenerate() {
            return 1.0;
        }
        let p = (offset - self.start_offset) / self.span();
        if p.is_nan() {
            return 0.0;
        }
        p.clamp(0.0, 1.0)
    }
}

/// Scroll offset at which an element whose layout top is `element_top`
/// reaches `viewport_frac` of the way down the viewport ("top 85%").
#[inline]
pub fn anchor_offset(element_top: f32, viewport_extent: f32, viewport_frac: f32) -> f32 {
    element_top - viewport_extent * viewport_frac
}

/// Reader for one registered region.
#[derive(Clone, Debug)]
pub struct ProgressHandle {
    region: Rc<Cell<TriggerRegion>>,
    offset: Rc<Cell<f32>>,
}

impl ProgressHandle {
    pub fn id(&self) -> RegionId {
        self.region.get().id
    }

    pub fn region(&self) -> TriggerRegion {
        self.region.get()
    }

    pub fn progress(&self) -> f32 {
        self.region.get().progress_at(self.offset.get())
    }
}

type UpdateFn = Box<dyn FnMut(f32)>;

struct RegionEntry {
    region: Rc<Cell<TriggerRegion>>,
    stale: bool,
    last: Option<f32>,
    listeners: SmallVec<[UpdateFn; 2]>,
}

pub struct ProgressDriver {
    offset: Rc<Cell<f32>>,
    entries: Vec<RegionEntry>,
    index: FnvHashMap<RegionId, usize>,
    next_id: u32,
}

impl ProgressDriver {
    pub fn new(offset: Rc<Cell<f32>>) -> Self {
        Self {
            offset,
            entries: Vec::new(),
            index: FnvHashMap::default(),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a span. Progress is computed immediately so a region that is
    /// already in view starts with its real value.
    pub fn register_region(&mut self, start_offset: f32, end_offset: f32) -> ProgressHandle {
        let id = RegionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let region = TriggerRegion {
            id,
            start_offset,
            end_offset,
        };
        if region.is_degenerate() {
            log::warn!(
                "[progress] region {:?} registered with degenerate extent [{}, {}]",
                id,
                start_offset,
                end_offset
            );
        }
        let cell = Rc::new(Cell::new(region));
        self.index.insert(id, self.entries.len());
        self.entries.push(RegionEntry {
            region: cell.clone(),
            stale: false,
            last: Some(region.progress_at(self.offset.get())),
            listeners: SmallVec::new(),
        });
        ProgressHandle {
            region: cell,
            offset: self.offset.clone(),
        }
    }

    /// Add an update callback. It runs once right away with the current
    /// progress, then on every dispatched change.
    pub fn on_update(&mut self, id: RegionId, mut cb: impl FnMut(f32) + 'static) -> bool {
        let offset = self.offset.get();
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        let p = entry.region.get().progress_at(offset);
        entry.last = Some(p);
        cb(p);
        entry.listeners.push(Box::new(cb));
        true
    }

    /// Recompute every live region against the current offset.
    pub fn dispatch(&mut self) {
        let offset = self.offset.get();
        for entry in self.entries.iter_mut().filter(|e| !e.stale) {
            Self::recompute(entry, offset);
        }
    }

    /// Mark every region as needing a fresh measurement. Stale regions stop
    /// dispatching until [`relayout`](Self::relayout) supplies new geometry.
    pub fn invalidate(&mut self) {
        for entry in &mut self.entries {
            entry.stale = true;
        }
    }

    pub fn is_stale(&self, id: RegionId) -> bool {
        self.index
            .get(&id)
            .map(|&i| self.entries[i].stale)
            .unwrap_or(false)
    }

    pub fn relayout(&mut self, id: RegionId, start_offset: f32, end_offset: f32) -> bool {
        let offset = self.offset.get();
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        entry.region.set(TriggerRegion {
            id,
            start_offset,
            end_offset,
        });
        entry.stale = false;
        Self::recompute(entry, offset);
        true
    }

    pub fn unregister(&mut self, id: RegionId) -> bool {
        let Some(i) = self.index.remove(&id) else {
            return false;
        };
        self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        true
    }

    /// Discard all regions and their callbacks.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn entry_mut(&mut self, id: RegionId) -> Option<&mut RegionEntry> {
        let i = *self.index.get(&id)?;
        self.entries.get_mut(i)
    }

    fn recompute(entry: &mut RegionEntry, offset: f32) {
        let p = entry.region.get().progress_at(offset);
        if entry.last.map(f32::to_bits) == Some(p.to_bits()) {
            return;
        }
        entry.last = Some(p);
        for listener in entry.listeners.iter_mut() {
            listener(p);
        }
    }
}
