use std::time::Duration;

use crate::style::Style;
use crate::timeline::{envelope_mix, CrossfadeCurve, FadeEnvelope};
use crate::types::Rgb;
use crate::Instant;

/// Phase of the style crossfade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylePhase {
    Idle,
    /// Fading to zero; programs switch to `pending` once opacity reaches 0.
    FadingOut { pending: Style },
    FadingIn,
}

/// What a style request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleRequest {
    /// Already active with nothing pending.
    Unchanged,
    /// A fade-out was already running; only its destination changed.
    Redirected { previous: Style },
    /// A new fade-out started.
    Started,
}

/// Result of advancing the style crossfade by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleStep {
    pub opacity: f32,
    /// Set on the tick the fade-out completed; every surface must switch to
    /// this style before drawing.
    pub swap: Option<Style>,
}

/// Software crossfade that hides shader program swaps.
///
/// At most one fade runs at a time. Requests made while fading out overwrite
/// the pending style without restarting the timer, so rapid switches collapse
/// into a single program swap to the last requested style.
#[derive(Debug, Clone)]
pub struct StyleTransition {
    active: Style,
    phase: StylePhase,
    envelope: Option<FadeEnvelope>,
    duration: Duration,
    curve: CrossfadeCurve,
    opacity: f32,
}

impl StyleTransition {
    /// Starts with `active` fading in from zero opacity.
    pub fn new(active: Style, duration: Duration, curve: CrossfadeCurve, now: Instant) -> Self {
        Self {
            active,
            phase: StylePhase::FadingIn,
            envelope: FadeEnvelope::new(duration, curve, now),
            duration,
            curve,
            opacity: 0.0,
        }
    }

    /// Starts fully shown with no fade running.
    pub fn settled(active: Style, duration: Duration, curve: CrossfadeCurve) -> Self {
        Self {
            active,
            phase: StylePhase::Idle,
            envelope: None,
            duration,
            curve,
            opacity: 1.0,
        }
    }

    /// Style whose programs are currently linked.
    pub fn active(&self) -> Style {
        self.active
    }

    pub fn phase(&self) -> StylePhase {
        self.phase
    }

    pub fn pending(&self) -> Option<Style> {
        match self.phase {
            StylePhase::FadingOut { pending } => Some(pending),
            _ => None,
        }
    }

    /// Opacity computed by the most recent [`StyleTransition::advance`].
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn request(&mut self, style: Style, now: Instant) -> StyleRequest {
        match self.phase {
            StylePhase::FadingOut { pending } => {
                self.phase = StylePhase::FadingOut { pending: style };
                StyleRequest::Redirected { previous: pending }
            }
            _ if style == self.active => StyleRequest::Unchanged,
            _ => {
                self.phase = StylePhase::FadingOut { pending: style };
                self.envelope = FadeEnvelope::new(self.duration, self.curve, now);
                StyleRequest::Started
            }
        }
    }

    pub fn advance(&mut self, now: Instant) -> StyleStep {
        let mut swap = None;
        match self.phase {
            StylePhase::Idle => self.opacity = 1.0,
            StylePhase::FadingIn => {
                let (mix, finished) = envelope_mix(self.envelope.as_ref(), now);
                self.opacity = mix;
                if finished {
                    self.phase = StylePhase::Idle;
                    self.envelope = None;
                }
            }
            StylePhase::FadingOut { pending } => {
                let (mix, finished) = envelope_mix(self.envelope.as_ref(), now);
                if finished {
                    self.active = pending;
                    self.phase = StylePhase::FadingIn;
                    self.envelope = FadeEnvelope::new(self.duration, self.curve, now);
                    self.opacity = 0.0;
                    swap = Some(pending);
                } else {
                    self.opacity = 1.0 - mix;
                }
            }
        }
        StyleStep {
            opacity: self.opacity.clamp(0.0, 1.0),
            swap,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ColorFade {
    from: Rgb,
    to: Rgb,
    envelope: Option<FadeEnvelope>,
}

/// Eased interpolation of the base color.
///
/// A change while a fade is in flight restarts from the color the last tick
/// displayed, so redirecting never jumps.
#[derive(Debug, Clone)]
pub struct ColorTransition {
    selected: Rgb,
    displayed: Rgb,
    fade: Option<ColorFade>,
    duration: Duration,
    curve: CrossfadeCurve,
}

impl ColorTransition {
    pub fn new(color: Rgb, duration: Duration, curve: CrossfadeCurve) -> Self {
        Self {
            selected: color,
            displayed: color,
            fade: None,
            duration,
            curve,
        }
    }

    /// Most recently requested color.
    pub fn selected(&self) -> Rgb {
        self.selected
    }

    /// Color produced by the most recent [`ColorTransition::advance`].
    pub fn displayed(&self) -> Rgb {
        self.displayed
    }

    pub fn in_flight(&self) -> bool {
        self.fade.is_some()
    }

    /// Starts a fade toward `color`. Returns `false` when `color` is already
    /// settled on screen.
    pub fn change(&mut self, color: Rgb, now: Instant) -> bool {
        if self.fade.is_none() && color == self.displayed {
            return false;
        }
        self.fade = Some(ColorFade {
            from: self.displayed,
            to: color,
            envelope: FadeEnvelope::new(self.duration, self.curve, now),
        });
        self.selected = color;
        true
    }

    pub fn advance(&mut self, now: Instant) -> Rgb {
        if let Some(fade) = self.fade {
            let (mix, finished) = envelope_mix(fade.envelope.as_ref(), now);
            if finished {
                self.displayed = fade.to;
                self.fade = None;
            } else {
                self.displayed = fade.from.lerp(fade.to, mix);
            }
        }
        self.displayed
    }
}
