use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use borderart::recording::{RecordingPlatform, RegionSpec};
use borderart::{
    pick_start, Engine, EngineSettings, FrameOutcome, Instant, Rgb, StylePhase, SurfaceId,
};
use serde::Serialize;

use crate::cli::{ColorArg, SimulateArgs};

/// One simulated tick, as printed by `artctl simulate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u32,
    pub at_ms: u64,
    pub outcome: &'static str,
    pub drawn: usize,
    pub style: &'static str,
    pub phase: &'static str,
    pub opacity: f32,
    pub color: [u8; 3],
}

pub fn resolve_color(settings: &EngineSettings, color: &ColorArg) -> Result<Rgb> {
    match color {
        ColorArg::Rgb(bytes) => Ok(Rgb::from_bytes(*bytes)),
        ColorArg::Named(name) => settings
            .find_color(name)
            .map(|(_, entry)| Rgb::from_bytes(entry.color))
            .ok_or_else(|| anyhow!("unknown palette color '{name}'")),
    }
}

/// Drives the engine against a recording host where every surface is in view.
pub fn simulate(settings: EngineSettings, seed: u64, args: &SimulateArgs) -> Result<Vec<FrameRecord>> {
    let mut color_events = Vec::with_capacity(args.change_color.len());
    for event in &args.change_color {
        color_events.push((event.frame, resolve_color(&settings, &event.color)?));
    }

    let start = pick_start(&settings, seed);
    let origin = Instant::now();
    let platform = RecordingPlatform::new(RegionSpec::page(args.edges));
    let mut engine = Engine::new(platform, settings, start, origin);
    engine.init(origin);

    let ids: Vec<SurfaceId> = engine.surfaces().iter().map(|surface| surface.id()).collect();
    for id in ids {
        engine.set_surface_visible(id, true);
    }
    tracing::debug!(
        surfaces = engine.surfaces().len(),
        style = %engine.active_style(),
        "simulation started"
    );

    let step = Duration::from_millis(args.step_ms);
    let mut records = Vec::with_capacity(args.frames as usize);
    for frame in 0..args.frames {
        let elapsed = step
            .checked_mul(frame)
            .ok_or_else(|| anyhow!("frame {frame} overflows the simulated clock"))?;
        let now = origin
            .checked_add(elapsed)
            .ok_or_else(|| anyhow!("frame {frame} overflows the simulated clock"))?;
        let at_ms = u64::try_from(elapsed.as_millis())
            .with_context(|| format!("frame {frame} overflows the simulated clock"))?;

        for event in args.switch_style.iter().filter(|event| event.frame == frame) {
            engine.switch_style(event.style, now);
        }
        for (_, color) in color_events.iter().filter(|(at, _)| *at == frame) {
            engine.change_color(*color, now);
        }

        let outcome = engine.tick(now);
        let (outcome, drawn) = match outcome {
            FrameOutcome::Hidden => ("hidden", 0),
            FrameOutcome::NothingVisible => ("nothing-visible", 0),
            FrameOutcome::Throttled => ("throttled", 0),
            FrameOutcome::Rendered { drawn } => ("rendered", drawn),
        };
        records.push(FrameRecord {
            frame,
            at_ms,
            outcome,
            drawn,
            style: engine.active_style().key(),
            phase: phase_name(engine.style_phase()),
            opacity: engine.opacity(),
            color: engine.displayed_color().to_bytes(),
        });
    }
    Ok(records)
}

fn phase_name(phase: StylePhase) -> &'static str {
    match phase {
        StylePhase::Idle => "idle",
        StylePhase::FadingOut { .. } => "fading-out",
        StylePhase::FadingIn => "fading-in",
    }
}

pub fn write_records(out: &mut dyn Write, records: &[FrameRecord], json: bool) -> Result<()> {
    for record in records {
        if json {
            let line = serde_json::to_string(record).context("failed to encode frame record")?;
            writeln!(out, "{line}")?;
        } else {
            let [r, g, b] = record.color;
            writeln!(
                out,
                "{:>4} {:>6}ms {:<15} drawn={} style={} phase={} opacity={:.3} color={r},{g},{b}",
                record.frame,
                record.at_ms,
                record.outcome,
                record.drawn,
                record.style,
                record.phase,
                record.opacity,
            )?;
        }
    }
    Ok(())
}
