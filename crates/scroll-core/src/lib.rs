pub mod config;
pub mod constants;
pub mod dampener;
pub mod easing;
pub mod error;
pub mod input;
pub mod pin;
pub mod progress;
pub mod reveal;
pub mod scene;
pub mod slider;
pub mod smoothing;
pub mod stage;
pub mod surface;

pub use config::*;
pub use dampener::VelocityDampener;
pub use easing::{CubicBezier, Easing};
pub use error::ConfigError;
pub use input::*;
pub use pin::*;
pub use progress::*;
pub use reveal::Reveal;
pub use scene::*;
pub use slider::*;
pub use smoothing::*;
pub use stage::*;
pub use surface::*;

pub use glam::Vec2;
