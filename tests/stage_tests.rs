// Host-side tests for the assembled stage: surface, regions, pins and
// dampeners working together.

use scroll_core::{
    Choreography, ColorToken, DampenerConfig, Easing, InputEvent, PanelSlider, Reveal,
    SceneSequencer, SectionSpec, Stage, SurfaceGeometry, VisualFrame, WipeStack,
};
use std::cell::RefCell;
use std::rc::Rc;

const GEOMETRY: SurfaceGeometry = SurfaceGeometry {
    content_extent: 6000.0,
    viewport_height: 1000.0,
    viewport_width: 1600.0,
};

fn scenes() -> Choreography {
    let colors = ["night", "dawn", "noon"].map(ColorToken::from);
    Choreography::Scenes(SceneSequencer::evenly(colors, 0.1, Easing::Linear).expect("valid"))
}

/// Stage with one dampened, pinned section over `[1000, 3000]`.
fn dampened_stage(scale: f32) -> (Stage, Rc<RefCell<Vec<f32>>>) {
    let applied = Rc::new(RefCell::new(Vec::new()));
    let sink = applied.clone();
    let mut stage = Stage::new(GEOMETRY, move |offset: f32| sink.borrow_mut().push(offset));
    let config = DampenerConfig::new(scale).expect("valid scale");
    stage.add_section(
        SectionSpec::new("panels")
            .dampened(config)
            .with(Choreography::Slider(PanelSlider::uniform(3, 1600.0))),
        1000.0,
        3000.0,
    );
    (stage, applied)
}

fn wheel(stage: &Stage, delta: f32) -> InputEvent {
    let mut ev = InputEvent::wheel(delta);
    stage.dispatch_input(&mut ev);
    ev
}

#[test]
fn unpinned_wheel_scrolls_one_to_one() {
    let (stage, applied) = dampened_stage(0.3);
    let ev = wheel(&stage, 120.0);
    assert!(ev.is_default_prevented());
    assert_eq!(stage.offset(), 120.0);
    assert_eq!(applied.borrow().last().copied(), Some(120.0));
}

#[test]
fn pinned_wheel_delta_is_scaled() {
    let (stage, _) = dampened_stage(0.3);
    let id = stage.section_id("panels").expect("registered");
    stage.scroll_to(1500.0);
    assert!(stage.is_pinned(id));
    assert!(stage.is_dampened(id));

    wheel(&stage, 100.0);
    assert!((stage.offset() - 1530.0).abs() < 1e-4);
}

#[test]
fn deep_dampening_is_configurable() {
    let (stage, _) = dampened_stage(0.1);
    stage.scroll_to(2000.0);
    wheel(&stage, 100.0);
    assert!((stage.offset() - 2010.0).abs() < 1e-4);
}

#[test]
fn leaving_the_pin_restores_full_speed() {
    let (stage, _) = dampened_stage(0.5);
    let id = stage.section_id("panels").expect("registered");
    stage.scroll_to(2990.0);
    // 2990 + 50 crosses the region end and releases the pin.
    wheel(&stage, 100.0);
    assert_eq!(stage.offset(), 3040.0);
    assert!(!stage.is_pinned(id));
    assert!(!stage.is_dampened(id));

    wheel(&stage, 100.0);
    assert_eq!(stage.offset(), 3140.0);
}

#[test]
fn scrolling_back_into_region_pins_again() {
    let (stage, _) = dampened_stage(0.3);
    let id = stage.section_id("panels").expect("registered");
    stage.scroll_to(4000.0);
    assert!(!stage.is_pinned(id));
    stage.scroll_to(2500.0);
    assert!(stage.is_pinned(id));
    assert!(stage.is_dampened(id));
    stage.scroll_to(0.0);
    assert!(!stage.is_dampened(id));
}

#[test]
fn jump_across_region_never_attaches() {
    let (stage, _) = dampened_stage(0.3);
    let id = stage.section_id("panels").expect("registered");
    stage.scroll_to(5000.0);
    assert!(!stage.is_dampened(id));
    wheel(&stage, -100.0);
    assert_eq!(stage.offset(), 4900.0);
}

#[test]
fn destroy_while_pinned_leaves_no_listeners() {
    let (mut stage, applied) = dampened_stage(0.3);
    stage.scroll_to(1500.0);
    let writes = applied.borrow().len();

    stage.destroy();
    assert_eq!(stage.bus().borrow().listener_count(), 0);

    let ev = wheel(&stage, 100.0);
    assert!(!ev.is_default_prevented());
    assert_eq!(stage.offset(), 1500.0);
    assert!(!stage.scroll_to(200.0));
    assert_eq!(applied.borrow().len(), writes);

    // Second destroy is harmless.
    stage.destroy();
    assert!(stage.is_destroyed());
}

#[test]
fn dropping_stage_tears_down_bus() {
    let (stage, _) = dampened_stage(0.3);
    stage.scroll_to(1500.0);
    let bus = stage.bus().clone();
    assert!(bus.borrow().listener_count() >= 2);
    drop(stage);
    assert_eq!(bus.borrow().listener_count(), 0);
    assert!(bus.borrow().is_closed());
}

#[test]
fn frame_reports_pin_offset_and_visuals() {
    let (stage, _) = dampened_stage(0.3);
    stage.scroll_to(2000.0);
    let frames = stage.frame();
    assert_eq!(frames.len(), 1);
    let f = &frames[0];
    assert_eq!(f.progress, 0.5);
    assert!(f.pinned);
    assert_eq!(f.pin_offset, 1000.0);
    match &f.visuals[0] {
        VisualFrame::Panels(panels) => {
            assert_eq!(panels.len(), 3);
            assert_eq!(panels[1].translate.x, -1600.0);
        }
        other => panic!("unexpected visual {other:?}"),
    }
}

#[test]
fn forward_then_back_restores_frame() {
    let mut stage = Stage::new(GEOMETRY, |_: f32| {});
    stage.add_section(SectionSpec::new("intro").pinned().with(scenes()), 0.0, 3000.0);
    stage.add_section(
        SectionSpec::new("card").with(Choreography::Reveal(Reveal::alternating(
            0,
            ColorToken::from("card"),
        ))),
        3150.0,
        3350.0,
    );
    stage.scroll_to(700.0);
    let before = stage.frame();
    for offset in [1200.0, 2600.0, 3300.0, 4800.0, 3100.0, 1900.0] {
        stage.scroll_to(offset);
    }
    stage.scroll_to(700.0);
    assert_eq!(stage.frame(), before);
}

#[test]
fn section_already_in_view_starts_with_real_progress() {
    let mut stage = Stage::new(GEOMETRY, |_: f32| {});
    stage.scroll_to(1500.0);
    let id = stage.add_section(
        SectionSpec::new("late").dampened(DampenerConfig::default()),
        1000.0,
        2000.0,
    );
    assert_eq!(stage.progress(id), Some(0.5));
    assert!(stage.is_pinned(id));
    assert!(stage.is_dampened(id));
}

#[test]
fn relayout_moves_regions_and_reclamps() {
    let (mut stage, _) = dampened_stage(0.3);
    let id = stage.section_id("panels").expect("registered");
    stage.scroll_to(4500.0);

    let smaller = SurfaceGeometry {
        content_extent: 4000.0,
        viewport_height: 800.0,
        viewport_width: 1200.0,
    };
    stage.relayout(smaller, |anchor| (anchor == "panels").then_some((2000.0, 4000.0)));
    assert_eq!(stage.offset(), 3200.0);
    assert!((stage.progress(id).unwrap_or_default() - 0.6).abs() < 1e-6);
    assert!(stage.is_pinned(id));
    match &stage.frame()[0].visuals[0] {
        VisualFrame::Panels(panels) => assert_eq!(panels[0].translate.x, -0.6 * 2.0 * 1200.0),
        other => panic!("unexpected visual {other:?}"),
    }

    // Identical relayout is idempotent.
    let before = stage.frame();
    stage.relayout(smaller, |anchor| (anchor == "panels").then_some((2000.0, 4000.0)));
    assert_eq!(stage.frame(), before);
}

#[test]
fn content_growth_extends_scroll_range() {
    let (mut stage, _) = dampened_stage(0.3);
    let id = stage.section_id("panels").expect("registered");
    assert!(stage.scroll_to(8000.0));
    assert_eq!(stage.offset(), 5000.0);

    // Late content pushes the page to 9000px and the section down by 3000.
    let taller = SurfaceGeometry {
        content_extent: 9000.0,
        ..GEOMETRY
    };
    stage.relayout(taller, |anchor| (anchor == "panels").then_some((4000.0, 6000.0)));
    assert_eq!(stage.scroll_state().max_offset, 8000.0);
    assert!(stage.scroll_to(8000.0));
    assert_eq!(stage.offset(), 8000.0);

    stage.scroll_to(2000.0);
    assert!(!stage.is_pinned(id));
    stage.scroll_to(5000.0);
    assert_eq!(stage.progress(id), Some(0.5));
    assert!(stage.is_dampened(id));
}

#[test]
fn unmeasurable_anchor_reads_as_passed() {
    let (mut stage, _) = dampened_stage(0.3);
    let id = stage.section_id("panels").expect("registered");
    stage.scroll_to(1500.0);
    assert!(stage.is_dampened(id));
    stage.relayout(GEOMETRY, |_| None);
    assert_eq!(stage.progress(id), Some(1.0));
    assert!(!stage.is_pinned(id));
    assert!(!stage.is_dampened(id));
}

#[test]
fn natural_spans_follow_geometry() {
    let mut stage = Stage::new(GEOMETRY, |_: f32| {});
    let a = stage.add_section(SectionSpec::new("scenes").pinned().with(scenes()), 0.0, 1.0);
    let b = stage.add_section(
        SectionSpec::new("slider").with(Choreography::Slider(PanelSlider::uniform(4, 1.0))),
        0.0,
        1.0,
    );
    let c = stage.add_section(
        SectionSpec::new("wipe").with(Choreography::Wipe(WipeStack::new(3))),
        0.0,
        1.0,
    );
    assert_eq!(stage.natural_span(a, &GEOMETRY), Some(3000.0));
    assert_eq!(stage.natural_span(b, &GEOMETRY), Some(4800.0));
    assert_eq!(stage.natural_span(c, &GEOMETRY), Some(3000.0));
    assert_eq!(stage.section_count(), 3);
    assert_eq!(stage.anchor(c), Some("wipe"));
}
