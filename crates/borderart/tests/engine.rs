use std::time::Duration;

use borderart::recording::{RecordingPlatform, RegionSpec};
use borderart::{
    pick_start, Engine, EngineSettings, FrameOutcome, Instant, LogicalSize, PhysicalSize, Region,
    Rgb, Style, StylePhase, Theme,
};

const STEP_MS: u64 = 40;

fn settings(style: Style) -> EngineSettings {
    EngineSettings {
        initial_style: Some(style),
        initial_color: Some(0),
        ..EngineSettings::default()
    }
}

fn start_engine(regions: Vec<RegionSpec>, style: Style) -> (Engine<RecordingPlatform>, Instant) {
    let now = Instant::now();
    let settings = settings(style);
    let start = pick_start(&settings, 1);
    let mut engine = Engine::new(RecordingPlatform::new(regions), settings, start, now);
    engine.init(now);
    (engine, now)
}

fn show_all(engine: &mut Engine<RecordingPlatform>) {
    let ids: Vec<_> = engine.surfaces().iter().map(|surface| surface.id()).collect();
    for id in ids {
        engine.set_surface_visible(id, true);
    }
}

fn at(base: Instant, millis: u64) -> Instant {
    base + Duration::from_millis(millis)
}

/// Ticks every `STEP_MS` in `[from, to)` and returns outcome and opacity.
fn run(
    engine: &mut Engine<RecordingPlatform>,
    base: Instant,
    from: u64,
    to: u64,
) -> Vec<(FrameOutcome, f32)> {
    (from..to)
        .step_by(STEP_MS as usize)
        .map(|millis| {
            let outcome = engine.tick(at(base, millis));
            (outcome, engine.opacity())
        })
        .collect()
}

/// Lets the first-load fade-in finish; returns the next free tick time.
fn settle(engine: &mut Engine<RecordingPlatform>, base: Instant) -> u64 {
    run(engine, base, 0, 280);
    assert_eq!(engine.style_phase(), StylePhase::Idle);
    280
}

#[test]
fn three_surfaces_are_built_observed_and_revealed_once() {
    let (mut engine, base) = start_engine(RegionSpec::page(1), Style::Stratus);
    assert_eq!(engine.surfaces().len(), 3);
    let ids: Vec<_> = engine.surfaces().iter().map(|surface| surface.id()).collect();
    assert_eq!(engine.platform().observed, ids);

    show_all(&mut engine);
    assert_eq!(engine.tick(base), FrameOutcome::Rendered { drawn: 3 });
    run(&mut engine, base, STEP_MS, 5 * STEP_MS);

    for log in engine.platform().context_logs() {
        assert_eq!(log.reveals, 1, "{} revealed more than once", log.region);
    }
    assert_eq!(engine.platform().content_ready, 1);
    assert!(engine.is_revealed());
}

#[test]
fn init_is_idempotent() {
    let (mut engine, base) = start_engine(RegionSpec::page(2), Style::Silk);
    engine.init(at(base, 10));
    assert_eq!(engine.surfaces().len(), 4);
    assert_eq!(engine.platform().observed.len(), 4);
    assert_eq!(engine.platform().frames_requested, 1);
    assert_eq!(engine.platform().style_activations, vec![Style::Silk]);
}

#[test]
fn first_frame_starts_fully_faded_out() {
    let (mut engine, base) = start_engine(RegionSpec::page(0), Style::Aurora);
    show_all(&mut engine);
    engine.tick(base);
    assert_eq!(engine.opacity(), 0.0);
    settle(&mut engine, base);
    assert_eq!(engine.opacity(), 1.0);
}

#[test]
fn style_switch_fades_out_swaps_and_fades_in() {
    let (mut engine, base) = start_engine(RegionSpec::page(1), Style::Stratus);
    show_all(&mut engine);
    let t = settle(&mut engine, base);

    engine.switch_style(Style::Marble, at(base, t));
    let opacities: Vec<f32> = run(&mut engine, base, t, t + 600)
        .into_iter()
        .map(|(_, opacity)| opacity)
        .collect();

    assert!(opacities.iter().all(|o| (0.0..=1.0).contains(o)));
    let bottom = opacities
        .iter()
        .position(|o| *o == 0.0)
        .expect("fade reaches zero");
    assert!(opacities[..=bottom].windows(2).all(|w| w[1] <= w[0]));
    assert!(opacities[bottom..].windows(2).all(|w| w[1] >= w[0]));
    assert_eq!(*opacities.last().expect("frames"), 1.0);

    assert_eq!(engine.active_style(), Style::Marble);
    let marble = engine.registry().fragment(Style::Marble).to_string();
    for surface in engine.surfaces() {
        assert_eq!(surface.style(), Style::Marble);
    }
    for log in engine.platform().context_logs() {
        assert_eq!(log.drawn_fragment.as_deref(), Some(marble.as_str()));
        assert_eq!(log.released, 1);
    }
    assert_eq!(
        engine.platform().style_activations.last(),
        Some(&Style::Marble)
    );
}

#[test]
fn rapid_switches_rebuild_once_to_last_style() {
    let (mut engine, base) = start_engine(RegionSpec::page(1), Style::Stratus);
    show_all(&mut engine);
    let t = settle(&mut engine, base);
    let compiled_before = engine.platform().total_compiled();

    engine.switch_style(Style::Smoke, at(base, t));
    run(&mut engine, base, t, t + STEP_MS);
    engine.switch_style(Style::Voronoi, at(base, t + 60));
    run(&mut engine, base, t + STEP_MS, t + 800);

    assert_eq!(engine.platform().total_compiled() - compiled_before, 3);
    assert_eq!(engine.active_style(), Style::Voronoi);
    let activations = &engine.platform().style_activations;
    assert!(!activations.contains(&Style::Smoke));
    assert_eq!(activations.last(), Some(&Style::Voronoi));
}

#[test]
fn switching_to_active_style_does_nothing() {
    let (mut engine, base) = start_engine(RegionSpec::page(1), Style::Stratus);
    show_all(&mut engine);
    let t = settle(&mut engine, base);
    engine.switch_style(Style::Stratus, at(base, t));
    assert_eq!(engine.style_phase(), StylePhase::Idle);
    run(&mut engine, base, t, t + 400);
    assert_eq!(engine.platform().total_compiled(), 3);
}

#[test]
fn unknown_style_name_is_an_error_not_a_panic() {
    let (mut engine, base) = start_engine(RegionSpec::page(0), Style::Stratus);
    assert!(engine.switch_style_named("plasma", base).is_err());
    assert_eq!(engine.style_phase(), StylePhase::FadingIn);
}

#[test]
fn changing_to_settled_color_is_a_noop() {
    let (mut engine, base) = start_engine(RegionSpec::page(1), Style::Stratus);
    show_all(&mut engine);
    let t = settle(&mut engine, base);
    let selections = engine.platform().color_selections.len();

    let color = engine.displayed_color();
    assert!(!engine.change_color(color, at(base, t)));
    assert!(!engine.color_in_flight());
    assert_eq!(engine.platform().color_selections.len(), selections);
}

#[test]
fn color_change_interpolates_between_endpoints() {
    let (mut engine, base) = start_engine(RegionSpec::page(1), Style::Stratus);
    show_all(&mut engine);
    let t = settle(&mut engine, base);
    let from = engine.displayed_color();
    let to = Rgb::from_bytes([85, 239, 196]);

    assert!(engine.change_color(to, at(base, t)));
    // Pickers update before the fade has produced a single frame.
    assert_eq!(
        engine.platform().color_selections.last(),
        Some(&(to, Some(5)))
    );

    engine.tick(at(base, t));
    assert_eq!(engine.displayed_color(), from);
    assert_eq!(engine.selected_color(), to);
    engine.tick(at(base, t + 100));
    let mid = engine.displayed_color();
    assert!(mid != from && mid != to);
    engine.tick(at(base, t + 200));
    assert_eq!(engine.displayed_color(), to);
    assert!(!engine.color_in_flight());

    for log in engine.platform().context_logs() {
        let last = log.frames.last().expect("frames");
        assert_eq!(last.base_color, to.as_uniform());
    }
}

#[test]
fn link_colors_are_pushed_only_when_they_change() {
    let (mut engine, base) = start_engine(RegionSpec::page(1), Style::Stratus);
    show_all(&mut engine);
    let t = settle(&mut engine, base);
    assert_eq!(engine.platform().link_pushes.len(), 1);

    engine
        .change_color_named("Sapphire", at(base, t))
        .expect("palette color");
    run(&mut engine, base, t, t + 400);
    let pushes = engine.platform().link_pushes.len();
    assert!(pushes > 1);

    run(&mut engine, base, t + 400, t + 800);
    assert_eq!(engine.platform().link_pushes.len(), pushes);
}

#[test]
fn empty_visible_set_draws_nothing_but_keeps_scheduling() {
    let (mut engine, base) = start_engine(RegionSpec::page(2), Style::Stratus);
    let outcomes = run(&mut engine, base, 0, 10 * STEP_MS);
    assert!(outcomes
        .iter()
        .all(|(outcome, _)| *outcome == FrameOutcome::NothingVisible));
    assert_eq!(engine.platform().total_draws(), 0);
    assert_eq!(engine.platform().frames_requested, 11);
    assert!(!engine.is_revealed());
}

#[test]
fn hidden_page_skips_work() {
    let (mut engine, base) = start_engine(RegionSpec::page(1), Style::Stratus);
    show_all(&mut engine);
    engine.set_page_visible(false);
    assert_eq!(engine.tick(base), FrameOutcome::Hidden);
    assert_eq!(engine.platform().total_draws(), 0);

    engine.set_page_visible(true);
    assert_eq!(
        engine.tick(at(base, STEP_MS)),
        FrameOutcome::Rendered { drawn: 3 }
    );
}

#[test]
fn only_visible_surfaces_are_drawn() {
    let (mut engine, base) = start_engine(RegionSpec::page(2), Style::Stratus);
    let top = engine.surfaces()[0].id();
    engine.set_surface_visible(top, true);
    assert_eq!(engine.tick(base), FrameOutcome::Rendered { drawn: 1 });
    assert_eq!(engine.platform().context_log(Region::Top).expect("top").draws, 1);
    assert_eq!(
        engine
            .platform()
            .context_log(Region::Edge(1))
            .expect("edge")
            .draws,
        0
    );
}

#[test]
fn second_tick_inside_interval_is_throttled() {
    let (mut engine, base) = start_engine(RegionSpec::page(1), Style::Stratus);
    show_all(&mut engine);
    assert_eq!(engine.tick(base), FrameOutcome::Rendered { drawn: 3 });
    assert_eq!(engine.tick(at(base, 10)), FrameOutcome::Throttled);
    for log in engine.platform().context_logs() {
        assert_eq!(log.frames.len(), 1);
        assert_eq!(log.draws, 1);
    }
    assert_eq!(
        engine.tick(at(base, 33)),
        FrameOutcome::Rendered { drawn: 3 }
    );
}

#[test]
fn uniforms_match_across_surfaces_within_a_tick() {
    let (mut engine, base) = start_engine(RegionSpec::page(2), Style::Stratus);
    show_all(&mut engine);
    engine.tick(base);
    engine.tick(at(base, 120));
    let logs = engine.platform().context_logs();
    let first = logs[0].frames.last().copied().expect("frame");
    assert!(logs.iter().all(|log| log.frames.last() == Some(&first)));
    assert!((first.time - 0.12).abs() < 1e-4);
}

#[test]
fn resize_applies_once_per_signal() {
    let regions = RegionSpec::page(0);
    let now = Instant::now();
    let settings = settings(Style::Stratus);
    let start = pick_start(&settings, 1);
    let mut platform = RecordingPlatform::new(regions);
    platform.device_pixel_ratio = 2.0;
    let mut engine = Engine::new(platform, settings, start, now);
    engine.init(now);
    show_all(&mut engine);

    engine.tick(now);
    engine.tick(at(now, STEP_MS));
    let top = engine.platform().context_log(Region::Top).expect("top");
    assert_eq!(top.resizes, vec![PhysicalSize::new(2560, 16)]);

    engine
        .platform_mut()
        .set_logical_size(Region::Top, LogicalSize::new(1000.0, 10.0));
    engine.request_resize();
    engine.request_resize();
    engine.tick(at(now, 2 * STEP_MS));
    engine.tick(at(now, 3 * STEP_MS));
    let top = engine.platform().context_log(Region::Top).expect("top");
    assert_eq!(
        top.resizes,
        vec![PhysicalSize::new(2560, 16), PhysicalSize::new(2000, 20)]
    );
    let surface = engine
        .surfaces()
        .iter()
        .find(|surface| surface.region() == Region::Top)
        .expect("top surface");
    assert_eq!(surface.backing_size(), Some(PhysicalSize::new(2000, 20)));
    assert!(!surface.needs_resize());
}

#[test]
fn device_pixel_ratio_change_triggers_resize() {
    let (mut engine, base) = start_engine(RegionSpec::page(1), Style::Stratus);
    show_all(&mut engine);
    engine.tick(base);
    engine.platform_mut().device_pixel_ratio = 1.5;
    engine.tick(at(base, STEP_MS));
    let edge = engine.platform().context_log(Region::Edge(0)).expect("edge");
    assert_eq!(
        edge.resizes,
        vec![PhysicalSize::new(6, 420), PhysicalSize::new(9, 630)]
    );
}

#[test]
fn failed_compile_skips_only_that_region() {
    let mut regions = RegionSpec::page(1);
    regions[1].fail_compile = true;
    let (mut engine, base) = start_engine(regions, Style::Stratus);
    assert_eq!(engine.surfaces().len(), 2);
    assert_eq!(engine.platform().observed.len(), 2);
    show_all(&mut engine);
    assert_eq!(engine.tick(base), FrameOutcome::Rendered { drawn: 2 });
}

#[test]
fn missing_context_skips_region() {
    let mut regions = RegionSpec::page(1);
    regions[2].gpu_available = false;
    let (engine, _) = start_engine(regions, Style::Stratus);
    let regions: Vec<_> = engine.surfaces().iter().map(|s| s.region()).collect();
    assert_eq!(regions, vec![Region::Top, Region::Bottom]);
}

#[test]
fn no_regions_still_schedules_frames() {
    let (mut engine, base) = start_engine(Vec::new(), Style::Stratus);
    assert!(engine.surfaces().is_empty());
    assert_eq!(engine.tick(base), FrameOutcome::NothingVisible);
    assert_eq!(engine.platform().frames_requested, 2);
}

#[test]
fn rebuild_replaces_surfaces_and_observers() {
    let (mut engine, base) = start_engine(RegionSpec::page(1), Style::Stratus);
    show_all(&mut engine);
    engine.tick(base);
    let old: Vec<_> = engine.surfaces().iter().map(|s| s.id()).collect();

    engine.rebuild_surfaces();
    assert_eq!(engine.platform().disconnects, 2);
    assert!(engine.visible().is_empty());
    let new: Vec<_> = engine.surfaces().iter().map(|s| s.id()).collect();
    assert_eq!(new.len(), 3);
    assert!(new.iter().all(|id| !old.contains(id)));
    assert_eq!(engine.platform().observed.len(), 6);

    show_all(&mut engine);
    engine.tick(at(base, STEP_MS));
    assert_eq!(engine.platform().content_ready, 1);
    assert!(engine
        .platform()
        .context_logs()
        .iter()
        .all(|log| log.reveals == 1));
}

#[test]
fn stored_theme_is_applied_and_reaches_shaders() {
    let now = Instant::now();
    let settings = settings(Style::Stratus);
    let start = pick_start(&settings, 1);
    let mut platform = RecordingPlatform::new(RegionSpec::page(0));
    platform.persisted_theme = Some(Theme::Dark);
    let mut engine = Engine::new(platform, settings, start, now);
    engine.init(now);
    show_all(&mut engine);

    assert_eq!(engine.platform().applied_themes, vec![Theme::Dark]);
    engine.tick(now);
    let top = engine.platform().context_log(Region::Top).expect("top");
    assert_eq!(top.frames.last().map(|f| f.is_dark), Some(1.0));

    engine.switch_theme(Theme::Light);
    assert_eq!(engine.platform().persisted_theme, Some(Theme::Light));
    engine.tick(at(now, STEP_MS));
    let top = engine.platform().context_log(Region::Top).expect("top");
    assert_eq!(top.frames.last().map(|f| f.is_dark), Some(0.0));
}

#[test]
fn auto_theme_follows_host_preference() {
    let now = Instant::now();
    let settings = settings(Style::Stratus);
    let start = pick_start(&settings, 1);
    let mut platform = RecordingPlatform::new(RegionSpec::page(0));
    platform.prefers_dark = true;
    let mut engine = Engine::new(platform, settings, start, now);
    engine.init(now);
    assert_eq!(engine.theme(), Theme::Auto);
    assert!(engine.is_dark());
}

#[test]
fn color_scheme_change_restyles_chrome_only_under_auto() {
    let (mut engine, now) = start_engine(RegionSpec::page(0), Style::Stratus);
    assert_eq!(engine.platform().chrome_dark, vec![false]);
    let activations = engine.platform().style_activations.len();

    engine.platform_mut().prefers_dark = true;
    assert!(engine.color_scheme_changed());
    assert_eq!(engine.platform().applied_themes, vec![Theme::Auto, Theme::Auto]);
    assert_eq!(engine.platform().chrome_dark, vec![false, true]);
    assert_eq!(engine.platform().style_activations.len(), activations + 1);

    show_all(&mut engine);
    engine.tick(now);
    let top = engine.platform().context_log(Region::Top).expect("top");
    assert_eq!(top.frames.last().map(|f| f.is_dark), Some(1.0));

    engine.switch_theme(Theme::Light);
    let themes = engine.platform().applied_themes.len();
    let activations = engine.platform().style_activations.len();
    engine.platform_mut().prefers_dark = false;
    assert!(!engine.color_scheme_changed());
    engine.platform_mut().prefers_dark = true;
    assert!(!engine.color_scheme_changed());
    assert_eq!(engine.platform().applied_themes.len(), themes);
    assert_eq!(engine.platform().style_activations.len(), activations);
    assert!(!engine.is_dark());
}
