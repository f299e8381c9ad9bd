// Host-side tests for the panel slider, wipe stack and reveal.

use scroll_core::{
    compute_translation, transit_window, ColorToken, ConfigError, FadeWindow, PanelSlider,
    PanelSpec, Reveal, WipeStack,
};

#[test]
fn translation_spans_all_but_one_panel() {
    for n in 1..=8 {
        assert_eq!(compute_translation(0.0, n, 1280.0), 0.0);
        let end = compute_translation(1.0, n, 1280.0);
        assert_eq!(end, -((n - 1) as f32) * 1280.0, "n = {n}");
    }
    assert_eq!(compute_translation(0.5, 5, 100.0), -200.0);
}

#[test]
fn translation_ignores_bad_input() {
    assert_eq!(compute_translation(0.5, 0, 100.0), 0.0);
    assert_eq!(compute_translation(f32::NAN, 4, 100.0), 0.0);
    assert_eq!(compute_translation(3.0, 4, 100.0), -300.0);
}

#[test]
fn transit_windows_are_centred_on_each_panel() {
    let (a, b) = transit_window(0, 5);
    assert_eq!((a, b), (-0.125, 0.125));
    let (a, b) = transit_window(2, 5);
    assert!((a - 0.375).abs() < 1e-6 && (b - 0.625).abs() < 1e-6);
    assert_eq!(transit_window(0, 1), (0.0, 1.0));
}

#[test]
fn fade_peaks_mid_transit() {
    let slider = PanelSlider::uniform(5, 1000.0);
    // Panel 2 is centred at progress 0.5.
    assert!((slider.fade(2, 0.5) - 1.0).abs() < 1e-6);
    assert_eq!(slider.fade(2, 0.375), 0.0);
    assert!((slider.fade(2, 0.4375) - 0.5).abs() < 1e-5);
    assert!((slider.fade(2, 0.5625) - 0.5).abs() < 1e-5);
    assert_eq!(slider.fade(2, 0.9), 0.0);
}

#[test]
fn fade_is_symmetric() {
    let slider = PanelSlider::uniform(4, 1000.0);
    let (start, end) = transit_window(1, 4);
    for step in 0..=20 {
        let t = step as f32 / 20.0;
        let fwd = slider.fade(1, start + (end - start) * t);
        let back = slider.fade(1, end - (end - start) * t);
        assert!((fwd - back).abs() < 1e-4, "asymmetric at {t}");
    }
}

#[test]
fn lone_panel_stays_visible() {
    let slider = PanelSlider::uniform(1, 800.0);
    for p in [0.0, 0.5, 1.0] {
        assert_eq!(slider.fade(0, p), 1.0);
        assert_eq!(slider.translation(p), 0.0);
    }
    assert_eq!(slider.scroll_span(), 0.0);
}

#[test]
fn frame_is_pure_in_progress() {
    let slider = PanelSlider::uniform(5, 1000.0);
    let jumped = slider.frame(0.75);
    // Walking there frame by frame lands on the same state.
    let mut walked = slider.frame(0.0);
    for step in 1..=75 {
        walked = slider.frame(step as f32 / 100.0);
    }
    assert_eq!(jumped, walked);
    assert_eq!(jumped[3].translate.x, -3000.0);
    assert!((jumped[3].opacity - 1.0).abs() < 1e-5);
    assert!((jumped[3].scale - 1.0).abs() < 1e-5);
}

#[test]
fn hidden_panels_shrink_to_min_scale() {
    let slider = PanelSlider::uniform(3, 1000.0).with_min_scale(0.9);
    let frame = slider.frame(0.0);
    assert_eq!(frame[2].opacity, 0.0);
    assert!((frame[2].scale - 0.9).abs() < 1e-6);
}

#[test]
fn unit_width_follows_viewport() {
    let mut slider = PanelSlider::uniform(4, 1000.0);
    assert_eq!(slider.scroll_span(), 3000.0);
    slider.set_unit_width(1200.0);
    assert_eq!(slider.scroll_span(), 3600.0);
    assert_eq!(slider.translation(1.0), -3600.0);
}

#[test]
fn custom_fade_window_narrows_visibility() {
    let fade = FadeWindow::new(0.25, 0.75).expect("valid window");
    assert_eq!(fade.sample(0.2), 0.0);
    assert_eq!(fade.sample(0.5), 1.0);
    assert_eq!(fade.sample(0.8), 0.0);
    assert!((fade.sample(0.375) - 0.5).abs() < 1e-6);

    let slider = PanelSlider::new(vec![PanelSpec { fade }; 3], 500.0);
    assert_eq!(slider.fade(1, 0.3), 0.0);
    assert_eq!(slider.fade(1, 0.5), 1.0);
}

#[test]
fn fade_window_validation() {
    assert!(matches!(
        FadeWindow::new(0.6, 0.9),
        Err(ConfigError::FadeWindow { .. })
    ));
    assert!(FadeWindow::new(0.0, 1.0).is_ok());
    assert_eq!("0.1, 0.9".parse::<FadeWindow>(), FadeWindow::new(0.1, 0.9));
    assert!("0.1".parse::<FadeWindow>().is_err());
}

#[test]
fn wipe_collapses_panels_in_order() {
    let wipe = WipeStack::new(4);
    assert_eq!(wipe.wipe_window(0), Some((0.125, 0.375)));
    assert_eq!(wipe.wipe_window(3), None);

    assert_eq!(wipe.frame(0.0).as_slice(), &[1.0, 1.0, 1.0, 1.0]);
    assert_eq!(wipe.remaining_height(0, 0.25), 0.5);
    assert_eq!(wipe.remaining_height(0, 0.5), 0.0);
    assert_eq!(wipe.remaining_height(1, 0.5), 0.5);
    // The last panel is never wiped.
    assert_eq!(wipe.frame(1.0).as_slice(), &[0.0, 0.0, 0.0, 1.0]);
}

#[test]
fn reveal_slides_in_from_alternating_sides() {
    let left = Reveal::alternating(0, ColorToken::from("card"));
    let right = Reveal::alternating(1, ColorToken::from("card"));

    let start = left.state(0.0);
    assert_eq!(start.opacity, 0.0);
    assert_eq!((start.translate.x, start.translate.y), (-120.0, 50.0));
    assert_eq!(right.state(0.0).translate.x, 120.0);

    let done = right.state(1.0);
    assert_eq!(done.opacity, 1.0);
    assert_eq!((done.translate.x, done.translate.y), (0.0, 0.0));

    // Quad-out: three quarters of the way there at half progress.
    let mid = left.state(0.5);
    assert_eq!(mid.opacity, 0.75);
    assert_eq!(mid.translate.x, -30.0);
}
