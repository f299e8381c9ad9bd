use thiserror::Error;

/// Validation failures for content and tuning handed to the core.
///
/// These are only produced while building configuration values. Nothing on
/// the per-frame path returns an error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("scale factor {0} is outside (0, 1]")]
    ScaleFactor(f32),
    #[error("scene set is empty")]
    NoScenes,
    #[error("scene {index} window [{entry}, {exit}] is empty or outside [0, 1]")]
    SceneWindow { index: usize, entry: f32, exit: f32 },
    #[error("scene {index} enters at {entry} but scene {prev} exits at {prev_exit}")]
    SceneGap {
        index: usize,
        entry: f32,
        prev: usize,
        prev_exit: f32,
    },
    #[error("scenes cover [{entry}, {exit}] instead of [0, 1]")]
    SceneCoverage { entry: f32, exit: f32 },
    #[error("crossfade width {width} must be narrower than the shortest scene ({shortest})")]
    CrossfadeTooWide { width: f32, shortest: f32 },
    #[error("fade window [{enter}, {exit}] must satisfy 0 <= enter < 0.5 < exit <= 1")]
    FadeWindow { enter: f32, exit: f32 },
    #[error("bezier control points {0:?} do not describe a monotonic curve")]
    Bezier([f32; 4]),
    #[error("invalid value {value:?} for `{key}`")]
    Attribute { key: String, value: String },
}
