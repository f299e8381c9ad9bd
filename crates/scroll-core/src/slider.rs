//! Horizontal panel slider.
//!
//! Where a panel sits is one linear function of the section's progress.
//! How visible it is comes from the panel's own transit window: the progress
//! range during which it covers the viewport centre. Both are recomputed from
//! progress alone.

use crate::constants::PANEL_MIN_SCALE;
use crate::error::ConfigError;
use glam::Vec2;
use smallvec::SmallVec;
use std::str::FromStr;

/// Strip translation for `progress` across `panel_count` panels.
#[inline]
pub fn compute_translation(progress: f32, panel_count: usize, unit_width: f32) -> f32 {
    if panel_count == 0 || progress.is_nan() {
        return 0.0;
    }
    -(progress.clamp(0.0, 1.0) * (panel_count - 1) as f32 * unit_width)
}

/// Progress range during which panel `index` is the centred panel.
///
/// Panel `i` is dead centre at `i / (n - 1)`; its window spans half a panel
/// step either side, so the first and last windows reach outside `[0, 1]`.
pub fn transit_window(index: usize, panel_count: usize) -> (f32, f32) {
    if panel_count <= 1 {
        return (0.0, 1.0);
    }
    let step = 1.0 / (panel_count - 1) as f32;
    let centre = index as f32 * step;
    (centre - 0.5 * step, centre + 0.5 * step)
}

/// Sub-range of a panel's transit over which it fades, as fractions of that
/// transit. Opacity rises from `enter` to the midpoint and falls to `exit`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeWindow {
    enter: f32,
    exit: f32,
}

impl Default for FadeWindow {
    fn default() -> Self {
        Self {
            enter: 0.0,
            exit: 1.0,
        }
    }
}

impl FadeWindow {
    pub fn new(enter: f32, exit: f32) -> Result<Self, ConfigError> {
        if (0.0..0.5).contains(&enter) && exit > 0.5 && exit <= 1.0 {
            Ok(Self { enter, exit })
        } else {
            Err(ConfigError::FadeWindow { enter, exit })
        }
    }

    pub fn sample(&self, local: f32) -> f32 {
        if local.is_nan() {
            return 0.0;
        }
        let v = if local <= 0.5 {
            (local - self.enter) / (0.5 - self.enter)
        } else {
            (self.exit - local) / (self.exit - 0.5)
        };
        v.clamp(0.0, 1.0)
    }
}

impl FromStr for FadeWindow {
    type Err = ConfigError;

    /// `"enter,exit"`, e.g. `"0.1,0.9"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ConfigError::Attribute {
            key: "fade".to_string(),
            value: s.to_string(),
        };
        let (a, b) = s.split_once(',').ok_or_else(bad)?;
        let enter = a.trim().parse::<f32>().map_err(|_| bad())?;
        let exit = b.trim().parse::<f32>().map_err(|_| bad())?;
        Self::new(enter, exit)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanelSpec {
    pub fade: FadeWindow,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelFrame {
    pub index: usize,
    pub translate: Vec2,
    pub opacity: f32,
    pub scale: f32,
    /// Position inside the panel's transit window, `[0, 1]`.
    pub local: f32,
}

#[derive(Clone, Debug)]
pub struct PanelSlider {
    panels: Vec<PanelSpec>,
    unit_width: f32,
    min_scale: f32,
}

impl PanelSlider {
    pub fn new(panels: Vec<PanelSpec>, unit_width: f32) -> Self {
        Self {
            panels,
            unit_width,
            min_scale: PANEL_MIN_SCALE,
        }
    }

    pub fn uniform(panel_count: usize, unit_width: f32) -> Self {
        Self::new(vec![PanelSpec::default(); panel_count], unit_width)
    }

    pub fn with_min_scale(mut self, min_scale: f32) -> Self {
        self.min_scale = min_scale.clamp(0.0, 1.0);
        self
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn unit_width(&self) -> f32 {
        self.unit_width
    }

    /// Panel width follows the viewport width; call on relayout.
    pub fn set_unit_width(&mut self, unit_width: f32) {
        self.unit_width = unit_width;
    }

    /// Scroll distance needed to slide the whole strip across.
    pub fn scroll_span(&self) -> f32 {
        self.unit_width * self.panels.len().saturating_sub(1) as f32
    }

    pub fn translation(&self, progress: f32) -> f32 {
        compute_translation(progress, self.panels.len(), self.unit_width)
    }

    pub fn local_fraction(&self, index: usize, progress: f32) -> f32 {
        if self.panels.len() <= 1 {
            return 0.5;
        }
        let (start, end) = transit_window(index, self.panels.len());
        ((progress - start) / (end - start)).clamp(0.0, 1.0)
    }

    /// A lone panel never transits, so it stays fully visible.
    pub fn fade(&self, index: usize, progress: f32) -> f32 {
        if self.panels.len() <= 1 {
            return 1.0;
        }
        let Some(panel) = self.panels.get(index) else {
            return 0.0;
        };
        panel.fade.sample(self.local_fraction(index, progress))
    }

    pub fn frame(&self, progress: f32) -> SmallVec<[PanelFrame; 8]> {
        let x = self.translation(progress);
        (0..self.panels.len())
            .map(|i| {
                let opacity = self.fade(i, progress);
                PanelFrame {
                    index: i,
                    translate: Vec2::new(x, 0.0),
                    opacity,
                    scale: self.min_scale + (1.0 - self.min_scale) * opacity,
                    local: self.local_fraction(i, progress),
                }
            })
            .collect()
    }
}

/// Stacked panels wiped away one after another while their section is
/// pinned. Every panel but the last collapses from full height to zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WipeStack {
    panel_count: usize,
}

impl WipeStack {
    pub fn new(panel_count: usize) -> Self {
        Self { panel_count }
    }

    pub fn panel_count(&self) -> usize {
        self.panel_count
    }

    /// Progress window `[(i + 0.5) / n, (i + 1.5) / n]` for panel `i`.
    pub fn wipe_window(&self, index: usize) -> Option<(f32, f32)> {
        if index + 1 >= self.panel_count {
            return None;
        }
        let n = self.panel_count as f32;
        Some(((index as f32 + 0.5) / n, (index as f32 + 1.5) / n))
    }

    /// Remaining visible height of panel `i`, `1` untouched to `0` gone.
    pub fn remaining_height(&self, index: usize, progress: f32) -> f32 {
        let Some((start, end)) = self.wipe_window(index) else {
            return 1.0;
        };
        if progress.is_nan() {
            return 1.0;
        }
        1.0 - ((progress - start) / (end - start)).clamp(0.0, 1.0)
    }

    pub fn frame(&self, progress: f32) -> SmallVec<[f32; 8]> {
        (0..self.panel_count)
            .map(|i| self.remaining_height(i, progress))
            .collect()
    }
}
