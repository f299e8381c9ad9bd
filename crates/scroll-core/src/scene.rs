//! Scene sequencer.
//!
//! Scenes tile the whole progress range `[0, 1]` in order. Each interior boundary owns a
//! crossfade window of `crossfade_width` centred on it; outside those windows
//! exactly one scene is settled. The first scene's entry and the last scene's
//! exit are open edges: nothing fades there.
//!
//! All output is a pure function of progress.

use crate::constants::SCENE_RISE;
use crate::easing::Easing;
use crate::error::ConfigError;
use glam::Vec2;
use smallvec::SmallVec;
use std::rc::Rc;

const BOUNDARY_EPSILON: f32 = 1e-5;

/// Opaque colour reference resolved by the rendering layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColorToken(Rc<str>);

impl ColorToken {
    pub fn new(token: &str) -> Self {
        Self(Rc::from(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColorToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenePhase {
    Upcoming,
    Entering,
    Settled,
    Exiting,
    Passed,
}

/// Render tuple for one element. `translate` is in the element's own units:
/// scenes use fractions of their height, reveals use pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualState {
    pub opacity: f32,
    pub translate: Vec2,
    pub color: ColorToken,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneSpec {
    pub entry: f32,
    pub exit: f32,
    pub color: ColorToken,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneFrame {
    pub order: usize,
    pub phase: ScenePhase,
    pub visual: VisualState,
}

#[derive(Clone, Debug)]
pub struct SceneSequencer {
    scenes: Vec<SceneSpec>,
    half_width: f32,
    rise: f32,
    easing: Easing,
}

impl SceneSequencer {
    pub fn new(
        scenes: Vec<SceneSpec>,
        crossfade_width: f32,
        easing: Easing,
    ) -> Result<Self, ConfigError> {
        if scenes.is_empty() {
            return Err(ConfigError::NoScenes);
        }
        for (i, s) in scenes.iter().enumerate() {
            if !(s.entry >= 0.0 && s.exit <= 1.0 && s.entry < s.exit) {
                return Err(ConfigError::SceneWindow {
                    index: i,
                    entry: s.entry,
                    exit: s.exit,
                });
            }
            if i > 0 {
                let prev = &scenes[i - 1];
                if (prev.exit - s.entry).abs() > BOUNDARY_EPSILON {
                    return Err(ConfigError::SceneGap {
                        index: i,
                        entry: s.entry,
                        prev: i - 1,
                        prev_exit: prev.exit,
                    });
                }
            }
        }
        let (entry, exit) = (scenes[0].entry, scenes[scenes.len() - 1].exit);
        if entry.abs() > BOUNDARY_EPSILON || (1.0 - exit).abs() > BOUNDARY_EPSILON {
            return Err(ConfigError::SceneCoverage { entry, exit });
        }
        if !(crossfade_width.is_finite() && crossfade_width >= 0.0) {
            return Err(ConfigError::CrossfadeTooWide {
                width: crossfade_width,
                shortest: 0.0,
            });
        }
        let shortest = scenes
            .iter()
            .map(|s| s.exit - s.entry)
            .fold(f32::INFINITY, f32::min);
        if scenes.len() > 1 && crossfade_width > 0.0 && crossfade_width >= shortest {
            return Err(ConfigError::CrossfadeTooWide {
                width: crossfade_width,
                shortest,
            });
        }
        Ok(Self {
            scenes,
            half_width: crossfade_width * 0.5,
            rise: SCENE_RISE,
            easing,
        })
    }

    /// Scenes with evenly spaced boundaries across `[0, 1]`.
    pub fn evenly(
        colors: impl IntoIterator<Item = ColorToken>,
        crossfade_width: f32,
        easing: Easing,
    ) -> Result<Self, ConfigError> {
        let colors: Vec<ColorToken> = colors.into_iter().collect();
        let n = colors.len() as f32;
        let scenes = colors
            .into_iter()
            .enumerate()
            .map(|(i, color)| SceneSpec {
                entry: i as f32 / n,
                exit: if i as f32 + 1.0 >= n {
                    1.0
                } else {
                    (i as f32 + 1.0) / n
                },
                color,
            })
            .collect();
        Self::new(scenes, crossfade_width, easing)
    }

    pub fn with_rise(mut self, rise: f32) -> Self {
        self.rise = rise;
        self
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn scenes(&self) -> &[SceneSpec] {
        &self.scenes
    }

    /// Raw (un-eased) position inside the crossfade window around
    /// `boundary`: 0 before it, 1 after it, 0.5 exactly on a hard cut.
    fn blend(&self, p: f32, boundary: f32) -> f32 {
        if self.half_width == 0.0 {
            return if p < boundary {
                0.0
            } else if p > boundary {
                1.0
            } else {
                0.5
            };
        }
        ((p - (boundary - self.half_width)) / (2.0 * self.half_width)).clamp(0.0, 1.0)
    }

    fn entry_blend(&self, i: usize, p: f32) -> f32 {
        if i == 0 {
            1.0
        } else {
            self.blend(p, self.scenes[i].entry)
        }
    }

    fn exit_blend(&self, i: usize, p: f32) -> f32 {
        if i + 1 == self.scenes.len() {
            0.0
        } else {
            self.blend(p, self.scenes[i].exit)
        }
    }

    /// Unknown indices read as [`ScenePhase::Upcoming`].
    pub fn phase(&self, i: usize, progress: f32) -> ScenePhase {
        if i >= self.scenes.len() {
            return ScenePhase::Upcoming;
        }
        let p = sanitize(progress);
        let t_in = self.entry_blend(i, p);
        let t_out = self.exit_blend(i, p);
        if t_in <= 0.0 {
            ScenePhase::Upcoming
        } else if t_in < 1.0 {
            ScenePhase::Entering
        } else if t_out >= 1.0 {
            ScenePhase::Passed
        } else if t_out > 0.0 {
            ScenePhase::Exiting
        } else {
            ScenePhase::Settled
        }
    }

    /// Unknown indices are fully transparent with an empty colour.
    pub fn visual_state(&self, i: usize, progress: f32) -> VisualState {
        let Some(scene) = self.scenes.get(i) else {
            return VisualState {
                opacity: 0.0,
                translate: Vec2::ZERO,
                color: ColorToken::new(""),
            };
        };
        let p = sanitize(progress);
        let e_in = self.easing.apply(self.entry_blend(i, p));
        let e_out = self.easing.apply(self.exit_blend(i, p));
        VisualState {
            opacity: e_in * (1.0 - e_out),
            translate: Vec2::new(0.0, self.rise * (1.0 - e_in) - self.rise * e_out),
            color: scene.color.clone(),
        }
    }

    pub fn frame(&self, progress: f32) -> SmallVec<[SceneFrame; 8]> {
        (0..self.scenes.len())
            .map(|i| SceneFrame {
                order: i,
                phase: self.phase(i, progress),
                visual: self.visual_state(i, progress),
            })
            .collect()
    }

    /// The scene resting at full opacity, if progress is outside every
    /// crossfade window.
    pub fn settled(&self, progress: f32) -> Option<usize> {
        (0..self.scenes.len()).find(|&i| self.phase(i, progress) == ScenePhase::Settled)
    }
}

#[inline]
fn sanitize(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}
