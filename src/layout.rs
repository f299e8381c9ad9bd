// Pure parsing of the section markup. No web-sys here so host tests can
// `include!` this file.

use scroll_core::anchor_offset;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChoreoKind {
    Scenes,
    Slider,
    Wipe,
    Reveal,
}

impl ChoreoKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scenes" => Some(Self::Scenes),
            "slider" => Some(Self::Slider),
            "wipe" => Some(Self::Wipe),
            "reveal" => Some(Self::Reveal),
            _ => None,
        }
    }
}

/// `data-pin-span`: `"2400"`, `"2400px"` or `"300vh"`. Anything else, or a
/// non-positive length, is `None` and the natural span is used instead.
pub fn parse_span(value: &str, viewport_height: f32) -> Option<f32> {
    let v = value.trim();
    let px = if let Some(n) = v.strip_suffix("vh") {
        n.trim().parse::<f32>().ok()? * viewport_height / 100.0
    } else {
        v.strip_suffix("px").unwrap_or(v).trim().parse::<f32>().ok()?
    };
    (px.is_finite() && px > 0.0).then_some(px)
}

/// `data-dampen` on a pinned section: present but empty means "use the page
/// default", otherwise a scale factor.
pub fn dampen_override(value: &str) -> Option<&str> {
    let v = value.trim();
    (!v.is_empty()).then_some(v)
}

/// Where a section lives on the virtual axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub start: f32,
    pub end: f32,
}

/// Pinned sections start when their top meets the viewport top and last
/// for `span` of scrolling.
pub fn pinned_placement(top: f32, span: f32) -> Placement {
    Placement {
        start: top,
        end: top + span.max(0.0),
    }
}

/// Anchored sections run from "top reaches `start_frac` of the viewport" to
/// "top reaches `end_frac`".
pub fn anchored_placement(
    top: f32,
    viewport_height: f32,
    start_frac: f32,
    end_frac: f32,
) -> Placement {
    Placement {
        start: anchor_offset(top, viewport_height, start_frac),
        end: anchor_offset(top, viewport_height, end_frac),
    }
}

/// Unpinned, non-anchored sections scrub while they cross the viewport.
pub fn crossing_placement(top: f32, height: f32, viewport_height: f32) -> Placement {
    Placement {
        start: top - viewport_height,
        end: top + height,
    }
}

pub fn translate_css(x: f32, y: f32) -> String {
    format!("translate3d({:.2}px, {:.2}px, 0)", x, y)
}
