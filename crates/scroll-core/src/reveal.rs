use crate::constants::{REVEAL_FADE_UP, REVEAL_SLIDE_X};
use crate::easing::Easing;
use crate::scene::{ColorToken, VisualState};
use glam::Vec2;

#[derive(Clone, Debug, PartialEq)]
pub struct Reveal {
    from: Vec2,
    easing: Easing,
    color: ColorToken,
}

impl Reveal {
    pub fn new(from: Vec2, easing: Easing, color: ColorToken) -> Self {
        Self {
            from,
            easing,
            color,
        }
    }

    /// Card `index` of a list: even cards come from the left, odd from the
    /// right, both rising from below.
    pub fn alternating(index: usize, color: ColorToken) -> Self {
        let side = if index % 2 == 0 { -1.0 } else { 1.0 };
        Self::new(
            Vec2::new(side * REVEAL_SLIDE_X, REVEAL_FADE_UP),
            Easing::QuadOut,
            color,
        )
    }

    pub fn state(&self, progress: f32) -> VisualState {
        let e = self.easing.apply(progress);
        VisualState {
            opacity: e,
            translate: self.from * (1.0 - e),
            color: self.color.clone(),
        }
    }
}
