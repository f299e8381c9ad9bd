// DOM contract and viewport-relative tuning for the browser front-end.
// Kept free of imports so host tests can `include!` it.

// Scroller: fixed viewport element and the content it translates
pub const SCROLL_ROOT_ID: &str = "scroll-root";
pub const SCROLL_CONTENT_ID: &str = "scroll-content";

// Section discovery
pub const SECTION_SELECTOR: &str = "[data-choreo]";
pub const SCENE_SELECTOR: &str = "[data-scene]";
pub const PANEL_SELECTOR: &str = "[data-panel]";
pub const STRIP_SELECTOR: &str = "[data-strip]";
pub const WIPE_SELECTOR: &str = "[data-wipe]";

// Section attributes
pub const ATTR_CHOREO: &str = "data-choreo";
pub const ATTR_PIN: &str = "data-pin";
pub const ATTR_DAMPEN: &str = "data-dampen";
pub const ATTR_PIN_SPAN: &str = "data-pin-span";
pub const ATTR_COLOR: &str = "data-color";
pub const ATTR_FADE: &str = "data-fade";
pub const ATTR_PINNED_STATE: &str = "data-pinned";
pub const ATTR_PHASE: &str = "data-phase";

// Page-wide overrides are read from these attributes on the scroll root
pub const STAGE_ATTRS: [&str; 6] = [
    "dampen",
    "crossfade",
    "ease",
    "scrub",
    "debounce",
    "panel-min-scale",
];

// Reveal anchoring (fraction of viewport height from the top)
pub const REVEAL_START_FRAC: f32 = 0.85; // card top at 85% of the viewport
pub const REVEAL_END_FRAC: f32 = 0.65; // fully revealed by 65%

// Custom property carrying the dominant scene colour
pub const SCENE_COLOR_VAR: &str = "--scene-color";

// Snap the smoothed strip when it is within this many px of its target
pub const STRIP_SNAP_PX: f32 = 0.5;

// Upper bound on a single frame step fed to followers (seconds)
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
