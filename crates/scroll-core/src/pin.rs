use crate::progress::TriggerRegion;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinState {
    #[default]
    Unpinned,
    Pinned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinTransition {
    Entered(Direction),
    Left(Direction),
}

/// Pinned while progress is strictly inside `(0, 1)`.
#[derive(Clone, Debug, Default)]
pub struct PinController {
    state: PinState,
    last_progress: Option<f32>,
}

impl PinController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PinState {
        self.state
    }

    pub fn is_pinned(&self) -> bool {
        self.state == PinState::Pinned
    }

    pub fn update(&mut self, progress: f32) -> Option<PinTransition> {
        if progress.is_nan() {
            return None;
        }
        let prev = self.last_progress.replace(progress);
        let inside = progress > 0.0 && progress < 1.0;
        match (self.state, inside) {
            (PinState::Unpinned, true) => {
                self.state = PinState::Pinned;
                let dir = match prev {
                    Some(p) if p > progress => Direction::Backward,
                    _ => Direction::Forward,
                };
                log::debug!("[pin] entered {:?} at {:.3}", dir, progress);
                Some(PinTransition::Entered(dir))
            }
            (PinState::Pinned, false) => {
                self.state = PinState::Unpinned;
                let dir = if progress >= 1.0 {
                    Direction::Forward
                } else {
                    Direction::Backward
                };
                log::debug!("[pin] left {:?} at {:.3}", dir, progress);
                Some(PinTransition::Left(dir))
            }
            _ => None,
        }
    }

    /// Force the unpinned state, e.g. on teardown.
    pub fn reset(&mut self) -> Option<PinTransition> {
        self.last_progress = None;
        if self.state == PinState::Pinned {
            self.state = PinState::Unpinned;
            Some(PinTransition::Left(Direction::Backward))
        } else {
            None
        }
    }
}

/// Extra translation that keeps a pinned section fixed in the viewport.
///
/// Zero before the region, tracks the offset inside it, and stays at the
/// region's span afterwards so following content flows after the pin.
#[inline]
pub fn pin_translation(offset: f32, region: &TriggerRegion) -> f32 {
    if region.is_degenerate() || offset.is_nan() {
        return 0.0;
    }
    (offset - region.start_offset).clamp(0.0, region.span())
}
