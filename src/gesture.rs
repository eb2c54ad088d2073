// gesture.rs - interaction modes, the drag threshold and the auto-rotate timer

use glam::Vec2;
use std::time::{Duration, Instant};

/// Keys the gallery reacts to, already decoded from the platform key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
    Random,
    ResetCamera,
    ToggleAutoRotate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    Mouse,
    Touch(u64),
}

/// What a plain drag does to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitAction {
    Rotate,
    Pan,
}

/// Horizontal drag stepping: one step per threshold crossing, and never two
/// steps in a row in the same direction within one drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTracker {
    reference_x: f32,
    last_direction: i8,
    threshold: f32,
}

impl DragTracker {
    pub fn begin(x: f32, threshold: f32) -> Self {
        Self {
            reference_x: x,
            last_direction: 0,
            threshold,
        }
    }

    /// Feeds the pointer x; returns the step sign (+1 / -1) when one fires.
    /// Dragging right yields -1, dragging left +1.
    pub fn update(&mut self, x: f32) -> Option<f32> {
        let dx = x - self.reference_x;
        if dx.abs() <= self.threshold {
            return None;
        }
        let direction: i8 = if dx > 0.0 { -1 } else { 1 };
        if direction == self.last_direction {
            return None;
        }
        self.last_direction = direction;
        self.reference_x = x;
        Some(direction as f32)
    }

    #[cfg(test)]
    pub fn reference_x(&self) -> f32 {
        self.reference_x
    }
}

/// Fixed-interval timer polled from the frame loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoRotateTimer {
    next_fire: Instant,
    interval: Duration,
}

impl AutoRotateTimer {
    pub fn start(now: Instant, interval: Duration) -> Self {
        Self {
            next_fire: now + interval,
            interval,
        }
    }

    /// Fires at most once per poll. Intervals missed while the loop was
    /// stalled are dropped and the next one is measured from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.interval.is_zero() || now < self.next_fire {
            return false;
        }
        self.next_fire = now + self.interval;
        true
    }
}

/// Exactly one of these is active at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionMode {
    Idle,
    /// Standard orbit controls driven by a plain drag.
    OrbitDrag {
        action: OrbitAction,
        press: Vec2,
        last: Vec2,
    },
    /// Shift-drag or single-touch drag: steps the ring, mouse drags also pan
    /// the camera. Orbit controls are off meanwhile.
    ShiftPan {
        source: DragSource,
        drag: DragTracker,
        last: Vec2,
    },
    AutoRotate(AutoRotateTimer),
}

impl InteractionMode {
    pub fn is_auto_rotate(&self) -> bool {
        matches!(self, InteractionMode::AutoRotate(_))
    }

    pub fn is_shift_pan(&self) -> bool {
        matches!(self, InteractionMode::ShiftPan { .. })
    }

    /// A pointer or touch is held down.
    pub fn is_dragging(&self) -> bool {
        matches!(self, InteractionMode::OrbitDrag { .. } | InteractionMode::ShiftPan { .. })
    }

    pub fn orbit_controls_enabled(&self) -> bool {
        !self.is_shift_pan()
    }
}

impl Default for InteractionMode {
    fn default() -> Self {
        InteractionMode::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        let mut drag = DragTracker::begin(100.0, 50.0);
        assert_eq!(drag.update(149.0), None);
        assert_eq!(drag.update(150.0), None);
        assert_eq!(drag.update(151.0), Some(-1.0));
        assert_eq!(drag.reference_x(), 151.0);
    }

    #[test]
    fn same_direction_does_not_refire() {
        let mut drag = DragTracker::begin(0.0, 50.0);
        assert_eq!(drag.update(51.0), Some(-1.0));
        assert_eq!(drag.update(102.0), None);
        assert_eq!(drag.update(300.0), None);
        // reference stayed at the last firing point
        assert_eq!(drag.reference_x(), 51.0);
    }

    #[test]
    fn reversal_fires_once_per_crossing() {
        let mut drag = DragTracker::begin(0.0, 50.0);
        assert_eq!(drag.update(51.0), Some(-1.0));
        assert_eq!(drag.update(20.0), None);
        assert_eq!(drag.update(0.0), Some(1.0));
        assert_eq!(drag.update(-60.0), None);
        assert_eq!(drag.update(51.0), Some(-1.0));
    }

    #[test]
    fn leftward_drag_steps_positive() {
        let mut drag = DragTracker::begin(500.0, 50.0);
        assert_eq!(drag.update(449.0), Some(1.0));
    }

    #[test]
    fn timer_fires_once_per_interval() {
        let t0 = Instant::now();
        let mut timer = AutoRotateTimer::start(t0, Duration::from_millis(3000));
        assert!(!timer.poll(t0 + Duration::from_millis(2999)));
        assert!(timer.poll(t0 + Duration::from_millis(3000)));
        assert!(!timer.poll(t0 + Duration::from_millis(3001)));
        assert!(timer.poll(t0 + Duration::from_millis(6000)));
    }

    #[test]
    fn stalled_timer_does_not_replay_missed_intervals() {
        let t0 = Instant::now();
        let mut timer = AutoRotateTimer::start(t0, Duration::from_millis(3000));
        let resumed = t0 + Duration::from_secs(300);
        assert!(timer.poll(resumed));
        assert!(!timer.poll(resumed + Duration::from_millis(16)));
        assert!(!timer.poll(resumed + Duration::from_millis(2999)));
        assert!(timer.poll(resumed + Duration::from_millis(3000)));
    }

    #[test]
    fn zero_interval_never_fires() {
        let t0 = Instant::now();
        let mut timer = AutoRotateTimer::start(t0, Duration::ZERO);
        assert!(!timer.poll(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn orbit_controls_off_only_in_shift_pan() {
        assert!(InteractionMode::Idle.orbit_controls_enabled());
        let pan = InteractionMode::ShiftPan {
            source: DragSource::Mouse,
            drag: DragTracker::begin(0.0, 50.0),
            last: Vec2::ZERO,
        };
        assert!(!pan.orbit_controls_enabled());
        assert!(pan.is_shift_pan());
    }
}
