use std::time::Duration;

// Shared choreography tuning constants used by the core and the web frontend.

// Dampening
pub const DEFAULT_DAMPEN_SCALE: f32 = 0.3; // panel stack: slow everything by ~70%
pub const DEEP_DAMPEN_SCALE: f32 = 0.1; // heavier slow-motion for long pinned strips

// Scene sequencing (progress units)
pub const DEFAULT_CROSSFADE_WIDTH: f32 = 0.1;
pub const SCENE_RISE: f32 = 0.5; // entering scenes slide up from +50% of their height

// Panels
pub const PANEL_MIN_SCALE: f32 = 0.9;

// Reveal (card entrance)
pub const REVEAL_SLIDE_X: f32 = 120.0; // px, alternating side per card
pub const REVEAL_FADE_UP: f32 = 50.0; // px

// Timing
pub const SCRUB_SMOOTHING_SEC: f32 = 0.3;
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

// Wheel normalisation
pub const WHEEL_LINE_PX: f32 = 16.0;

// Default ease-out curve control points (x1, y1, x2, y2)
pub const EASE_OUT_CONTROL: [f32; 4] = [0.28, 0.8, 0.33, 1.0];
