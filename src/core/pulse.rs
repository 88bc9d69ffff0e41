//! One-shot timed effects (the "like" heart pulse).
//!
//! The timer is plain data owned by whatever shows the effect.  It expires on
//! the first `tick` past its duration, a new `trigger` supersedes it, and
//! `cancel` (or dropping the owner) disposes of it; nothing is scheduled
//! anywhere else that could fire after teardown.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PulseTimer {
    duration: Duration,
    started: Option<Instant>,
}

impl PulseTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started: None,
        }
    }

    /// Start (or restart) the pulse at `now`.
    pub fn trigger(&mut self, now: Instant) {
        self.started = Some(now);
    }

    pub fn cancel(&mut self) {
        self.started = None;
    }

    pub fn is_active(&self) -> bool {
        self.started.is_some()
    }

    /// Clear the pulse once its duration has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(start) = self.started {
            if now.saturating_duration_since(start) >= self.duration {
                self.started = None;
            }
        }
    }

    /// Normalised progress in `[0, 1)`, or `None` when idle or expired.
    pub fn progress(&self, now: Instant) -> Option<f32> {
        let start = self.started?;
        let elapsed = now.saturating_duration_since(start);
        if elapsed >= self.duration || self.duration.is_zero() {
            return None;
        }
        Some(elapsed.as_secs_f32() / self.duration.as_secs_f32())
    }
}

/// Scale and opacity of the pulse overlay at `progress` ∈ [0, 1].
///
/// Pops from 0 to a 1.2 peak over the first 30%, then fades out while
/// shrinking back to 1.
pub fn pulse_envelope(progress: f32) -> (f32, f32) {
    let p = progress.clamp(0.0, 1.0);
    const PEAK_AT: f32 = 0.3;
    if p < PEAK_AT {
        let t = p / PEAK_AT;
        let ease = 1.0 - (1.0 - t) * (1.0 - t);
        (1.2 * ease, ease)
    } else {
        let t = (p - PEAK_AT) / (1.0 - PEAK_AT);
        (1.2 - 0.2 * t, 1.0 - t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_duration() {
        let t0 = Instant::now();
        let mut pulse = PulseTimer::new(Duration::from_millis(800));
        pulse.trigger(t0);

        pulse.tick(t0 + Duration::from_millis(400));
        assert!(pulse.is_active());
        let p = pulse.progress(t0 + Duration::from_millis(400)).unwrap();
        assert!((p - 0.5).abs() < 1e-3);

        pulse.tick(t0 + Duration::from_millis(800));
        assert!(!pulse.is_active());
        assert_eq!(pulse.progress(t0 + Duration::from_millis(800)), None);
    }

    #[test]
    fn retrigger_supersedes() {
        let t0 = Instant::now();
        let mut pulse = PulseTimer::new(Duration::from_millis(800));
        pulse.trigger(t0);
        pulse.trigger(t0 + Duration::from_millis(600));
        pulse.tick(t0 + Duration::from_millis(1000));
        assert!(pulse.is_active());
    }

    #[test]
    fn cancel_disposes() {
        let t0 = Instant::now();
        let mut pulse = PulseTimer::new(Duration::from_millis(800));
        pulse.trigger(t0);
        pulse.cancel();
        assert_eq!(pulse.progress(t0), None);
    }

    #[test]
    fn envelope_shape() {
        assert_eq!(pulse_envelope(0.0), (0.0, 0.0));
        let (peak_scale, peak_alpha) = pulse_envelope(0.3);
        assert!((peak_scale - 1.2).abs() < 1e-5);
        assert!((peak_alpha - 1.0).abs() < 1e-5);
        let (end_scale, end_alpha) = pulse_envelope(1.0);
        assert!((end_scale - 1.0).abs() < 1e-5);
        assert!(end_alpha.abs() < 1e-5);
    }
}
