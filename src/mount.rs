use crate::constants::*;
use crate::dom::{self, ListenerGuard, SizeObserver};
use crate::frame::FrameLoop;
use crate::layout::{self, ChoreoKind, Placement};
use crate::render::{Nodes, SectionView};
use glam::Vec2;
use instant::Instant;
use scroll_core::{
    natural_span, Choreography, ColorToken, DampenerConfig, Debouncer, FadeWindow, Follower,
    FrameGate, PanelSlider, PanelSpec, Reveal, SceneSequencer, SectionId, SectionSpec, Stage,
    StageConfig, SurfaceGeometry, WipeStack,
};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

pub struct App {
    stage: Stage,
    root: web::HtmlElement,
    content: web::HtmlElement,
    views: Vec<SectionView>,
    geometry: SurfaceGeometry,
    gate: Rc<RefCell<FrameGate>>,
    resize: Rc<RefCell<Debouncer>>,
    catching_up: bool,
    last_instant: Instant,
    listeners: Vec<ListenerGuard>,
    content_observer: Option<SizeObserver>,
    pub frame_loop: Option<FrameLoop>,
}

fn measure_geometry(root: &web::HtmlElement, content: &web::HtmlElement) -> SurfaceGeometry {
    let (win_w, win_h) = dom::viewport_size();
    let w = root.client_width() as f32;
    let h = root.client_height() as f32;
    SurfaceGeometry {
        content_extent: content.scroll_height() as f32,
        viewport_height: if h > 0.0 { h } else { win_h },
        viewport_width: if w > 0.0 { w } else { win_w },
    }
}

fn read_stage_config(root: &web::HtmlElement) -> StageConfig {
    let values: Vec<(&str, String)> = STAGE_ATTRS
        .iter()
        .filter_map(|k| root.get_attribute(&format!("data-{}", k)).map(|v| (*k, v)))
        .collect();
    StageConfig::from_attributes(values.iter().map(|(k, v)| (*k, v.as_str())))
}

fn color_of(el: &web::Element) -> ColorToken {
    ColorToken::from(el.get_attribute(ATTR_COLOR).unwrap_or_default().as_str())
}

/// Markup of one `[data-choreo]` element, before it joins the stage.
struct Plan {
    view: SectionView,
    spec: SectionSpec,
}

fn plan_section(
    el: web::HtmlElement,
    index: usize,
    reveal_index: &mut usize,
    config: &StageConfig,
    geometry: &SurfaceGeometry,
) -> anyhow::Result<Plan> {
    let raw = el.get_attribute(ATTR_CHOREO).unwrap_or_default();
    let kind = ChoreoKind::parse(&raw)
        .ok_or_else(|| anyhow::anyhow!("unknown {}=\"{}\"", ATTR_CHOREO, raw))?;
    let anchor = match el.id() {
        id if !id.is_empty() => id,
        _ => format!("section-{}", index),
    };

    let (choreo, nodes) = match kind {
        ChoreoKind::Scenes => {
            let scenes = dom::query_all(&el, SCENE_SELECTOR);
            let seq = SceneSequencer::evenly(
                scenes.iter().map(|s| color_of(s)),
                config.crossfade_width,
                config.easing,
            )?;
            (Choreography::Scenes(seq), Nodes::Scenes(scenes))
        }
        ChoreoKind::Slider => {
            let panels = dom::query_all(&el, PANEL_SELECTOR);
            let specs = panels
                .iter()
                .map(|p| {
                    let fade = match p.get_attribute(ATTR_FADE) {
                        Some(v) => v.parse::<FadeWindow>().unwrap_or_else(|e| {
                            log::warn!("[mount] {}: {}", anchor, e);
                            FadeWindow::default()
                        }),
                        None => FadeWindow::default(),
                    };
                    PanelSpec { fade }
                })
                .collect();
            let slider = PanelSlider::new(specs, geometry.viewport_width)
                .with_min_scale(config.panel_min_scale);
            let mut follower = Follower::new(config.scrub_smoothing_sec);
            follower.snap(0.0);
            (
                Choreography::Slider(slider),
                Nodes::Slider {
                    strip: dom::query_one(&el, STRIP_SELECTOR),
                    panels,
                    follower,
                },
            )
        }
        ChoreoKind::Wipe => {
            let layers = dom::query_all(&el, WIPE_SELECTOR);
            (
                Choreography::Wipe(WipeStack::new(layers.len())),
                Nodes::Wipe(layers),
            )
        }
        ChoreoKind::Reveal => {
            let reveal = Reveal::alternating(*reveal_index, color_of(&el));
            *reveal_index += 1;
            (Choreography::Reveal(reveal), Nodes::Reveal)
        }
    };

    let mut spec = SectionSpec::new(anchor.clone()).with(choreo);
    let pinned = el.has_attribute(ATTR_PIN) || el.has_attribute(ATTR_DAMPEN);
    if let Some(v) = el.get_attribute(ATTR_DAMPEN) {
        let cfg = match layout::dampen_override(&v) {
            Some(s) => s.parse::<DampenerConfig>().unwrap_or_else(|e| {
                log::warn!("[mount] {}: {}", anchor, e);
                config.dampen
            }),
            None => config.dampen,
        };
        spec = spec.dampened(cfg);
    } else if pinned {
        spec = spec.pinned();
    }

    let span_attr = el.get_attribute(ATTR_PIN_SPAN);
    Ok(Plan {
        view: SectionView {
            id: SectionId::default(),
            kind,
            root: el,
            nodes,
            pinned,
            span_attr,
            applied: Vec2::ZERO,
        },
        spec,
    })
}

/// Reserve the pinned scroll distance below the section so later content
/// flows after the pin. Returns the span.
fn apply_pin_spacing(view: &SectionView, natural: Option<f32>, geometry: &SurfaceGeometry) -> f32 {
    let span = view
        .span_attr
        .as_deref()
        .and_then(|v| layout::parse_span(v, geometry.viewport_height))
        .or(natural)
        .unwrap_or(geometry.viewport_height);
    dom::set_style(&view.root, "margin-bottom", &format!("{:.0}px", span));
    span
}

fn place(
    view: &SectionView,
    content: &web::HtmlElement,
    geometry: &SurfaceGeometry,
    span: Option<f32>,
) -> Placement {
    let top = dom::offset_within(&view.root, content) - view.applied.y;
    match (view.kind, span) {
        (_, Some(span)) => layout::pinned_placement(top, span),
        (ChoreoKind::Reveal, None) => layout::anchored_placement(
            top,
            geometry.viewport_height,
            REVEAL_START_FRAC,
            REVEAL_END_FRAC,
        ),
        (_, None) => layout::crossing_placement(
            top,
            view.root.offset_height() as f32,
            geometry.viewport_height,
        ),
    }
}

impl App {
    pub fn mount() -> anyhow::Result<Self> {
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let root = dom::element_by_id(&document, SCROLL_ROOT_ID)?;
        let content = dom::element_by_id(&document, SCROLL_CONTENT_ID)?;
        let config = read_stage_config(&root);
        let mut geometry = measure_geometry(&root, &content);

        let mut plans = Vec::new();
        let mut reveal_index = 0;
        for (i, el) in dom::query_all(&content, SECTION_SELECTOR)
            .into_iter()
            .enumerate()
        {
            match plan_section(el, i, &mut reveal_index, &config, &geometry) {
                Ok(plan) => plans.push(plan),
                Err(e) => log::warn!("[mount] skipping section {}: {}", i, e),
            }
        }

        // Spacing changes layout below each pin, so it goes in before any
        // position is read.
        let spans: Vec<Option<f32>> = plans
            .iter()
            .map(|p| {
                let natural = natural_span(&p.spec.choreographies, &geometry);
                p.view
                    .pinned
                    .then(|| apply_pin_spacing(&p.view, natural, &geometry))
            })
            .collect();
        geometry.content_extent = content.scroll_height() as f32;

        let content_sink = content.clone();
        let mut stage = Stage::new(geometry, move |offset: f32| {
            dom::set_style(&content_sink, "transform", &layout::translate_css(0.0, -offset));
        });

        let mut views = Vec::with_capacity(plans.len());
        for (Plan { mut view, spec }, span) in plans.into_iter().zip(spans) {
            let Placement { start, end } = place(&view, &content, &geometry, span);
            view.id = stage.add_section(spec, start, end);
            views.push(view);
        }

        let gate = Rc::new(RefCell::new(FrameGate::default()));
        let gate_sub = gate.clone();
        stage.subscribe(move |_| {
            if let Ok(mut g) = gate_sub.try_borrow_mut() {
                g.mark();
            }
        });
        gate.borrow_mut().mark();

        let mut listeners = crate::input::wire_scroller_input(&root, stage.bus())?;
        let resize = Rc::new(RefCell::new(Debouncer::new(config.resize_debounce)));
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let resize_poke = resize.clone();
        listeners.push(ListenerGuard::new(window.as_ref(), "resize", true, move |_| {
            resize_poke.borrow_mut().poke(Instant::now());
        })?);

        // Content reflow (late images, fonts, toggled markup) changes the
        // scroll range without a window resize.
        let reflow_poke = resize.clone();
        let content_observer = match SizeObserver::new(&content, move || {
            if let Ok(mut d) = reflow_poke.try_borrow_mut() {
                d.poke(Instant::now());
            }
        }) {
            Ok(observer) => Some(observer),
            Err(e) => {
                log::warn!("[mount] content reflow not observed: {:?}", e);
                None
            }
        };

        log::info!("[mount] {} sections on stage", views.len());
        Ok(Self {
            stage,
            root,
            content,
            views,
            geometry,
            gate,
            resize,
            catching_up: false,
            last_instant: Instant::now(),
            listeners,
            content_observer,
            frame_loop: None,
        })
    }

    /// Re-measure everything and hand the new regions to the stage.
    pub fn relayout(&mut self) {
        let mut geometry = measure_geometry(&self.root, &self.content);
        let spans: Vec<Option<f32>> = self
            .views
            .iter()
            .map(|v| {
                v.pinned.then(|| {
                    apply_pin_spacing(v, self.stage.natural_span(v.id, &geometry), &geometry)
                })
            })
            .collect();
        geometry.content_extent = self.content.scroll_height() as f32;

        let placements: Vec<(String, Placement)> = self
            .views
            .iter()
            .zip(spans)
            .filter_map(|(v, span)| {
                let anchor = self.stage.anchor(v.id)?.to_string();
                Some((anchor, place(v, &self.content, &geometry, span)))
            })
            .collect();
        self.stage.relayout(geometry, |anchor| {
            placements
                .iter()
                .find(|(a, _)| a == anchor)
                .map(|(_, p)| (p.start, p.end))
        });
        self.geometry = geometry;
        self.gate.borrow_mut().mark();
        log::debug!(
            "[mount] relayout {:.0}x{:.0} content={:.0}",
            geometry.viewport_width,
            geometry.viewport_height,
            geometry.content_extent
        );
    }

    pub fn tick(&mut self, now: Instant) {
        let dt_sec = if now >= self.last_instant {
            (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DT_SEC)
        } else {
            0.0
        };
        self.last_instant = now;

        if self.resize.borrow_mut().fire_if_due(now) {
            self.relayout();
        }
        let dirty = self.gate.borrow_mut().take();
        if !dirty && !self.catching_up {
            return;
        }
        let frames = self.stage.frame();
        let mut catching_up = false;
        for (view, frame) in self.views.iter_mut().zip(frames.iter()) {
            catching_up |= view.apply(frame, self.geometry.viewport_height, dt_sec);
        }
        self.catching_up = catching_up;
    }

    pub fn scroll_to(&self, offset: f32) -> bool {
        self.stage.scroll_to(offset)
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(mut lp) = self.frame_loop.take() {
            lp.stop();
        }
        self.listeners.clear();
        self.content_observer = None;
        self.stage.destroy();
        for view in &mut self.views {
            view.reset();
        }
        dom::clear_style(&self.content, "transform");
        log::info!("[mount] unmounted");
    }
}
