// tween.rs - timed, eased transitions driven by the frame clock

use glam::Vec3;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadraticInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Transition {
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl Transition {
    pub fn new(start: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            start,
            duration,
            easing,
        }
    }

    /// Raw progress in 0..=1.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn eased(&self, now: Instant) -> f32 {
        self.easing.apply(self.progress(now))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// A Vec3 moving from `from` to `to` along a transition.
#[derive(Debug, Clone, Copy)]
pub struct Vec3Tween {
    pub from: Vec3,
    pub to: Vec3,
    pub transition: Transition,
}

impl Vec3Tween {
    pub fn sample(&self, now: Instant) -> Vec3 {
        self.from.lerp(self.to, self.transition.eased(now))
    }
}
