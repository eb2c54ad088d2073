// rotation.rs - ring rotation state and the active-index projection
//
// `target` is where the ring should end up; every gesture writes it. `current`
// is what is drawn and only `tick` moves it. Neither is wrapped to [0, 2pi):
// the angle is normalized only when looking up which entry faces the viewer.

use std::f32::consts::TAU;

/// Wraps any angle into [0, 2pi).
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// One slot's worth of rotation, `None` for an empty ring.
pub fn angular_step(count: usize) -> Option<f32> {
    if count == 0 {
        None
    } else {
        Some(TAU / count as f32)
    }
}

/// Which of `count` entries faces the viewer at ring angle `angle`.
pub fn active_index(angle: f32, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let slot = (normalize_angle(angle) / TAU * count as f32).round() as usize;
    Some(slot % count)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    current: f32,
    target: f32,
    damping: f32,
    settle_epsilon: f32,
}

impl RotationState {
    pub fn new(damping: f32, settle_epsilon: f32) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            damping,
            settle_epsilon,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn apply_delta(&mut self, delta: f32) {
        self.target += delta;
    }

    pub fn set_target(&mut self, angle: f32) {
        self.target = angle;
    }

    /// One frame of damped approach. Returns true when `current` moved by
    /// more than the settle epsilon, so the displayed entry may have changed.
    pub fn tick(&mut self) -> bool {
        let previous = self.current;
        self.current += (self.target - self.current) * self.damping;
        (self.current - previous).abs() > self.settle_epsilon
    }

    pub fn active_index(&self, count: usize) -> Option<usize> {
        active_index(self.current, count)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(0.05, 0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn settle(state: &mut RotationState) {
        for _ in 0..2000 {
            state.tick();
        }
    }

    #[test]
    fn normalize_wraps_both_directions() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-4);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!(normalize_angle(-1e-9) < TAU);
    }

    #[test]
    fn active_index_of_every_slot_angle() {
        for count in 1..=12usize {
            for k in -30i32..=30 {
                let angle = TAU * k as f32 / count as f32;
                let expected = k.rem_euclid(count as i32) as usize;
                assert_eq!(
                    active_index(normalize_angle(angle), count),
                    Some(expected),
                    "count={count} k={k}"
                );
            }
        }
    }

    #[test]
    fn empty_ring_has_no_step_or_index() {
        assert_eq!(angular_step(0), None);
        assert_eq!(active_index(1.0, 0), None);
        assert_eq!(RotationState::default().active_index(0), None);
    }

    #[test]
    fn tick_is_idempotent_at_fixed_point() {
        let mut state = RotationState::default();
        state.set_target(0.0);
        assert!(!state.tick());
        assert_eq!(state.current(), 0.0);

        state.apply_delta(1.0);
        settle(&mut state);
        let settled = state.current();
        for _ in 0..10 {
            state.tick();
            assert_eq!(state.current(), settled);
        }
    }

    #[test]
    fn tick_moves_five_percent_of_the_gap() {
        let mut state = RotationState::default();
        state.apply_delta(1.0);
        assert!(state.tick());
        assert!((state.current() - 0.05).abs() < 1e-6);
        assert_eq!(state.target(), 1.0);
    }

    #[test]
    fn small_moves_do_not_report_change() {
        let mut state = RotationState::default();
        state.apply_delta(0.1);
        // 0.1 * 0.05 = 0.005 < epsilon
        assert!(!state.tick());
    }

    #[test]
    fn inverse_deltas_restore_target() {
        for count in 1..=9 {
            let step = angular_step(count).unwrap();
            let mut state = RotationState::default();
            state.set_target(0.7);
            state.apply_delta(step);
            state.apply_delta(-step);
            assert!((state.target() - 0.7).abs() < 1e-6);
        }
    }

    #[test]
    fn two_steps_right_of_six_settle_on_entry_four() {
        let step = angular_step(6).unwrap();
        let mut state = RotationState::default();
        state.apply_delta(-step);
        state.apply_delta(-step);
        assert!((state.target() + 2.0 * PI / 3.0).abs() < 1e-5);
        settle(&mut state);
        assert_eq!(state.active_index(6), Some(4));
    }
}
