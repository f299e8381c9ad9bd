//! Tunable configuration with defaults and `data-*` attribute overrides.

use crate::constants::{
    DEEP_DAMPEN_SCALE, DEFAULT_CROSSFADE_WIDTH, DEFAULT_DAMPEN_SCALE, PANEL_MIN_SCALE, RESIZE_DEBOUNCE,
    SCRUB_SMOOTHING_SEC,
};
use crate::easing::Easing;
use crate::error::ConfigError;
use std::str::FromStr;
use std::time::Duration;

/// Scale applied to raw wheel/touch deltas while a pinned section is active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DampenerConfig {
    scale_factor: f32,
}

impl DampenerConfig {
    pub fn new(scale_factor: f32) -> Result<Self, ConfigError> {
        if scale_factor > 0.0 && scale_factor <= 1.0 {
            Ok(Self { scale_factor })
        } else {
            Err(ConfigError::ScaleFactor(scale_factor))
        }
    }

    #[inline]
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    #[inline]
    pub fn apply(&self, raw_delta: f32) -> f32 {
        raw_delta * self.scale_factor
    }
}

impl Default for DampenerConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_DAMPEN_SCALE,
        }
    }
}

impl FromStr for DampenerConfig {
    type Err = ConfigError;

    /// A scale factor, or `deep` for the heaviest preset.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("deep") {
            return Self::new(DEEP_DAMPEN_SCALE);
        }
        let v = s.trim().parse::<f32>().map_err(|_| ConfigError::Attribute {
            key: "dampen".to_string(),
            value: s.to_string(),
        })?;
        Self::new(v)
    }
}

/// Page-wide tuning for a [`Stage`](crate::Stage) and its front-end.
#[derive(Clone, Debug, PartialEq)]
pub struct StageConfig {
    pub dampen: DampenerConfig,
    pub crossfade_width: f32,
    pub easing: Easing,
    pub scrub_smoothing_sec: f32,
    pub resize_debounce: Duration,
    pub panel_min_scale: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            dampen: DampenerConfig::default(),
            crossfade_width: DEFAULT_CROSSFADE_WIDTH,
            easing: Easing::Linear,
            scrub_smoothing_sec: SCRUB_SMOOTHING_SEC,
            resize_debounce: RESIZE_DEBOUNCE,
            panel_min_scale: PANEL_MIN_SCALE,
        }
    }
}

impl StageConfig {
    /// Apply one override. Keys match the `data-*` attribute names without
    /// the prefix.
    pub fn apply_attribute(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let bad = || ConfigError::Attribute {
            key: key.to_string(),
            value: value.to_string(),
        };
        let number = || {
            value
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(bad)
        };
        match key {
            "dampen" => self.dampen = value.parse()?,
            "crossfade" => self.crossfade_width = number()?,
            "ease" => self.easing = value.parse()?,
            "scrub" => self.scrub_smoothing_sec = number()?,
            "debounce" => self.resize_debounce = Duration::from_millis(number()? as u64),
            "panel-min-scale" => {
                let v = number()?;
                if v > 1.0 {
                    return Err(bad());
                }
                self.panel_min_scale = v;
            }
            _ => return Err(bad()),
        }
        Ok(())
    }

    /// Build from attribute pairs. Bad values are logged and skipped; the
    /// default stays in place.
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut cfg = Self::default();
        for (key, value) in attrs {
            if let Err(e) = cfg.apply_attribute(key, value) {
                log::warn!("[config] ignoring override: {}", e);
            }
        }
        cfg
    }
}
