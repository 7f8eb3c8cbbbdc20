use std::time::Duration;

use artconfig::CurveSetting;

use crate::Instant;

/// Easing shape applied to fade progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossfadeCurve {
    #[default]
    Linear,
    Smoothstep,
    EaseInOut,
}

impl CrossfadeCurve {
    /// Maps linear progress to eased progress; both ends stay pinned to 0 and 1.
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            CrossfadeCurve::Linear => t,
            CrossfadeCurve::Smoothstep => t * t * (3.0 - 2.0 * t),
            CrossfadeCurve::EaseInOut if t < 0.5 => 2.0 * t * t,
            CrossfadeCurve::EaseInOut => 1.0 - 2.0 * (1.0 - t) * (1.0 - t),
        }
    }
}

impl From<CurveSetting> for CrossfadeCurve {
    fn from(setting: CurveSetting) -> Self {
        match setting {
            CurveSetting::Linear => Self::Linear,
            CurveSetting::Smoothstep => Self::Smoothstep,
            CurveSetting::EaseInOut => Self::EaseInOut,
        }
    }
}

/// One fade, anchored at the instant it started.
#[derive(Debug, Clone, Copy)]
pub struct FadeEnvelope {
    started: Instant,
    length: Duration,
    curve: CrossfadeCurve,
}

impl FadeEnvelope {
    /// A zero-length fade yields `None`, which [`envelope_mix`] reports as done.
    pub fn new(length: Duration, curve: CrossfadeCurve, now: Instant) -> Option<Self> {
        (!length.is_zero()).then_some(Self {
            started: now,
            length,
            curve,
        })
    }

    /// Uneased progress in [0, 1]. Clocks that step backwards read as 0.
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.length.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Eased weight of the incoming side and whether the fade has run out.
    pub fn weight(&self, now: Instant) -> (f32, bool) {
        let progress = self.progress(now);
        (self.curve.sample(progress), progress >= 1.0)
    }
}

pub(crate) fn envelope_mix(envelope: Option<&FadeEnvelope>, now: Instant) -> (f32, bool) {
    envelope.map_or((1.0, true), |envelope| envelope.weight(now))
}
