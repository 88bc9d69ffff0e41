//! Frame-rate independent exponential damping.
//!
//! Every animated value in the deck converges toward its target with
//! `current += (target - current) * (1 - e^(-rate * dt))`.  Because `dt` enters
//! through the exponent, two 8 ms ticks land exactly where one 16 ms tick
//! does, so motion looks the same at 30 Hz and 144 Hz.

/// Upper bound for a single frame delta, in seconds.  A terminal that stalls
/// (suspended, resized, scrolled back) would otherwise jump every animation
/// straight to its target on the next frame.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Move `current` toward `target` by the fraction of the gap that decays in
/// `dt` seconds at `rate` (1/s).
///
/// Never overshoots and never reaches the target in finite time (up to float
/// resolution).  Non-positive `rate` or `dt` leaves `current` untouched.
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return current;
    }
    let alpha = 1.0 - (-rate * dt).exp();
    current + (target - current) * alpha
}

/// A scalar that chases a target with [`damp`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Damped {
    pub value: f32,
    pub target: f32,
    /// Convergence rate in 1/s.  Higher settles faster.
    pub rate: f32,
}

impl Damped {
    pub fn new(value: f32, rate: f32) -> Self {
        Self {
            value,
            target: value,
            rate,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.value = damp(self.value, self.target, self.rate, dt);
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_without_overshoot() {
        let target = 10.0;
        let mut current = 0.0_f32;
        let mut last_gap = (target - current).abs();
        for _ in 0..120 {
            current = damp(current, target, 3.0, 1.0 / 60.0);
            let gap = (target - current).abs();
            assert!(gap < last_gap, "gap must shrink every tick");
            assert!(current < target, "must never overshoot");
            last_gap = gap;
        }
    }

    #[test]
    fn converges_from_above_too() {
        let mut current = 5.0_f32;
        for _ in 0..60 {
            let next = damp(current, -2.0, 4.0, 1.0 / 30.0);
            assert!(next < current);
            assert!(next > -2.0);
            current = next;
        }
    }

    #[test]
    fn frame_rate_independent() {
        let one_big = damp(0.0, 1.0, 3.0, 0.032);
        let two_small = damp(damp(0.0, 1.0, 3.0, 0.016), 1.0, 3.0, 0.016);
        assert!((one_big - two_small).abs() < 1e-5);
    }

    #[test]
    fn zero_dt_or_rate_is_a_noop() {
        assert_eq!(damp(1.5, 9.0, 3.0, 0.0), 1.5);
        assert_eq!(damp(1.5, 9.0, 0.0, 0.5), 1.5);
        assert_eq!(damp(1.5, 9.0, 3.0, -0.1), 1.5);
    }

    #[test]
    fn damped_scalar_settles() {
        let mut d = Damped::new(0.0, 15.0);
        d.set_target(0.6);
        for _ in 0..120 {
            d.tick(1.0 / 60.0);
        }
        assert!((d.target - d.value).abs() <= 1e-3);
        assert!(d.value <= 0.6);
    }
}
