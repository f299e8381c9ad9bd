use crate::constants::*;
use crate::dom::{clear_style, set_style};
use crate::layout::{translate_css, ChoreoKind};
use glam::Vec2;
use scroll_core::{Follower, ScenePhase, SectionFrame, SectionId, VisualFrame};
use web_sys as web;

pub enum Nodes {
    Scenes(Vec<web::HtmlElement>),
    Slider {
        strip: Option<web::HtmlElement>,
        panels: Vec<web::HtmlElement>,
        follower: Follower,
    },
    Wipe(Vec<web::HtmlElement>),
    Reveal,
}

/// DOM handles for one mounted section.
pub struct SectionView {
    pub id: SectionId,
    pub kind: ChoreoKind,
    pub root: web::HtmlElement,
    pub nodes: Nodes,
    pub pinned: bool,
    pub span_attr: Option<String>,
    /// Translation currently applied to `root`; layout reads subtract it.
    pub applied: Vec2,
}

fn phase_name(phase: ScenePhase) -> &'static str {
    match phase {
        ScenePhase::Upcoming => "upcoming",
        ScenePhase::Entering => "entering",
        ScenePhase::Settled => "settled",
        ScenePhase::Exiting => "exiting",
        ScenePhase::Passed => "passed",
    }
}

impl SectionView {
    /// Write one frame to the DOM. Returns true while a smoothed value is
    /// still catching up and another frame is wanted.
    pub fn apply(&mut self, frame: &SectionFrame, viewport_height: f32, dt_sec: f32) -> bool {
        let mut root_shift = Vec2::new(0.0, frame.pin_offset);
        let mut catching_up = false;

        for visual in &frame.visuals {
            match (visual, &mut self.nodes) {
                (VisualFrame::Scenes(scenes), Nodes::Scenes(els)) => {
                    let mut dominant: Option<(f32, &str)> = None;
                    for (f, el) in scenes.iter().zip(els.iter()) {
                        let v = &f.visual;
                        set_style(el, "opacity", &format!("{:.3}", v.opacity));
                        set_style(
                            el,
                            "transform",
                            &translate_css(0.0, v.translate.y * viewport_height),
                        );
                        _ = el.set_attribute(ATTR_PHASE, phase_name(f.phase));
                        if dominant.map_or(true, |(o, _)| v.opacity > o) {
                            dominant = Some((v.opacity, v.color.as_str()));
                        }
                    }
                    if let Some((_, color)) = dominant.filter(|(_, c)| !c.is_empty()) {
                        set_style(&self.root, SCENE_COLOR_VAR, color);
                    }
                }
                (
                    VisualFrame::Panels(panels),
                    Nodes::Slider {
                        strip,
                        panels: els,
                        follower,
                    },
                ) => {
                    let target = panels.first().map_or(0.0, |p| p.translate.x);
                    follower.set_target(target);
                    let mut x = follower.step(dt_sec);
                    if (target - x).abs() < STRIP_SNAP_PX {
                        follower.snap(target);
                        x = target;
                    }
                    catching_up |= !follower.is_settled();
                    if let Some(strip) = strip {
                        set_style(strip, "transform", &translate_css(x, 0.0));
                    }
                    for (p, el) in panels.iter().zip(els.iter()) {
                        set_style(el, "opacity", &format!("{:.3}", p.opacity));
                        set_style(el, "transform", &format!("scale({:.4})", p.scale));
                    }
                }
                (VisualFrame::Wipe(heights), Nodes::Wipe(els)) => {
                    for (h, el) in heights.iter().zip(els.iter()) {
                        set_style(el, "height", &format!("{:.3}%", h * 100.0));
                    }
                }
                (VisualFrame::Reveal(state), Nodes::Reveal) => {
                    set_style(&self.root, "opacity", &format!("{:.3}", state.opacity));
                    root_shift += state.translate;
                }
                _ => log::trace!("[render] {:?} frame has no matching nodes", self.kind),
            }
        }

        if self.pinned {
            if frame.pinned {
                _ = self.root.set_attribute(ATTR_PINNED_STATE, "");
            } else {
                _ = self.root.remove_attribute(ATTR_PINNED_STATE);
            }
        }
        if root_shift != self.applied {
            set_style(&self.root, "transform", &translate_css(root_shift.x, root_shift.y));
            self.applied = root_shift;
        }
        catching_up
    }

    /// Undo everything `apply` and pin spacing wrote.
    pub fn reset(&mut self) {
        for prop in ["transform", "opacity", "margin-bottom", SCENE_COLOR_VAR] {
            clear_style(&self.root, prop);
        }
        _ = self.root.remove_attribute(ATTR_PINNED_STATE);
        let children: Vec<&web::HtmlElement> = match &self.nodes {
            Nodes::Scenes(els) | Nodes::Wipe(els) => els.iter().collect(),
            Nodes::Slider { strip, panels, .. } => strip.iter().chain(panels.iter()).collect(),
            Nodes::Reveal => Vec::new(),
        };
        for el in children {
            for prop in ["transform", "opacity", "height"] {
                clear_style(el, prop);
            }
            _ = el.remove_attribute(ATTR_PHASE);
        }
        self.applied = Vec2::ZERO;
    }
}
