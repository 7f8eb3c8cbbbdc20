use std::time::Duration;

use crate::Instant;

/// Minimum-interval gate for executed frames.
///
/// Frame callbacks arrive at display rate; only those at least `min_interval`
/// after the previous executed frame are allowed through. Skipped callbacks do
/// not move the reference point, so a 60 Hz display settles at every second
/// callback for a 33 ms interval.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    min_interval: Duration,
    last_frame: Option<Instant>,
}

impl FrameThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_frame: None,
        }
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match self.last_frame {
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
            None => true,
        }
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_always_ready() {
        let throttle = FrameThrottle::new(Duration::from_millis(33));
        assert!(throttle.ready_for_frame(Instant::now()));
    }

    #[test]
    fn frames_inside_interval_are_held_back() {
        let start = Instant::now();
        let mut throttle = FrameThrottle::new(Duration::from_millis(33));
        throttle.mark_rendered(start);
        assert!(!throttle.ready_for_frame(start + Duration::from_millis(16)));
        assert!(!throttle.ready_for_frame(start + Duration::from_millis(32)));
        assert!(throttle.ready_for_frame(start + Duration::from_millis(33)));
    }

    #[test]
    fn skipped_callbacks_keep_the_reference_point() {
        let start = Instant::now();
        let mut throttle = FrameThrottle::new(Duration::from_millis(33));
        throttle.mark_rendered(start);
        for ms in [16, 32] {
            assert!(!throttle.ready_for_frame(start + Duration::from_millis(ms)));
        }
        assert!(throttle.ready_for_frame(start + Duration::from_millis(48)));
        throttle.mark_rendered(start + Duration::from_millis(48));
        assert!(!throttle.ready_for_frame(start + Duration::from_millis(64)));
        assert!(!throttle.ready_for_frame(start));
    }
}
