// camera.rs - perspective camera and damped orbit controls

use crate::config::GalleryConfig;
use crate::picking::{pointer_to_ndc, Ray};
use crate::tween::{Easing, Transition, Vec3Tween};
use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, fov_degrees: f32, aspect: f32) -> Self {
        Self {
            position,
            target,
            fov_y: fov_degrees.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// World ray under a window point.
    pub fn ray_through(&self, pointer: Vec2, viewport: Vec2) -> Option<Ray> {
        let ndc = pointer_to_ndc(pointer, viewport)?;
        Some(Ray::from_ndc(ndc, self.view_projection().inverse()))
    }
}

/// Orbit around `camera.target` with inertia, like the usual web orbit
/// controls: drags accumulate a spherical delta, every update applies a
/// damped share of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitController {
    damping: f32,
    min_distance: f32,
    max_distance: f32,
    max_polar: f32,
    theta_delta: f32,
    phi_delta: f32,
}

const MIN_POLAR: f32 = 1e-4;

impl OrbitController {
    pub fn from_config(cfg: &GalleryConfig) -> Self {
        Self {
            damping: cfg.orbit_damping,
            min_distance: cfg.orbit_min_distance,
            max_distance: cfg.orbit_max_distance,
            max_polar: cfg.orbit_max_polar,
            theta_delta: 0.0,
            phi_delta: 0.0,
        }
    }

    /// Pointer moved by `delta` pixels while orbiting.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.theta_delta -= TAU * delta.x / viewport_height;
        self.phi_delta -= TAU * delta.y / viewport_height;
    }

    /// Screen-space pan: camera and target slide together.
    pub fn pan(&self, camera: &mut Camera, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let offset = camera.position - camera.target;
        let visible_half_height = offset.length() * (camera.fov_y / 2.0).tan();
        let per_pixel = 2.0 * visible_half_height / viewport_height;

        let view = camera.view();
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        let shift = -right * delta.x * per_pixel + up * delta.y * per_pixel;
        camera.position += shift;
        camera.target += shift;
    }

    pub fn stop(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
    }

    /// One frame: apply the damped share of the pending rotation and clamp.
    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += self.theta_delta * self.damping;
        phi += self.phi_delta * self.damping;
        self.theta_delta *= 1.0 - self.damping;
        self.phi_delta *= 1.0 - self.damping;

        let phi = phi.clamp(MIN_POLAR, self.max_polar.max(MIN_POLAR));
        let radius = radius.clamp(self.min_distance, self.max_distance);
        theta %= TAU;

        camera.position = camera.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }
}

/// Eased return of the camera to its home pose.
#[derive(Debug, Clone, Copy)]
pub struct CameraReset {
    position: Vec3Tween,
    target: Vec3Tween,
}

impl CameraReset {
    pub fn begin(camera: &Camera, home: Vec3, look_at: Vec3, now: Instant, duration: Duration) -> Self {
        let transition = Transition::new(now, duration, Easing::QuadraticInOut);
        Self {
            position: Vec3Tween {
                from: camera.position,
                to: home,
                transition,
            },
            target: Vec3Tween {
                from: camera.target,
                to: look_at,
                transition,
            },
        }
    }

    /// Moves the camera; returns true once the reset is complete.
    pub fn apply(&self, camera: &mut Camera, now: Instant) -> bool {
        camera.position = self.position.sample(now);
        camera.target = self.target.sample(now);
        self.position.transition.is_finished(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 1.0, 4.0), Vec3::ZERO, 60.0, 16.0 / 9.0)
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = home_camera();
        let ray = cam.ray_through(Vec2::new(640.0, 360.0), Vec2::new(1280.0, 720.0)).unwrap();
        let expected = (cam.target - cam.position).normalize();
        assert!((ray.direction - expected).length() < 1e-3);
    }

    #[test]
    fn update_without_input_keeps_pose() {
        let mut cam = home_camera();
        let mut orbit = OrbitController::from_config(&GalleryConfig::default());
        orbit.update(&mut cam);
        assert!((cam.position - Vec3::new(0.0, 1.0, 4.0)).length() < 1e-4);
    }

    #[test]
    fn rotation_is_damped_over_frames() {
        let mut cam = home_camera();
        let mut orbit = OrbitController::from_config(&GalleryConfig::default());
        orbit.rotate(Vec2::new(-72.0, 0.0), 720.0);
        orbit.update(&mut cam);
        let first = cam.position;
        for _ in 0..500 {
            orbit.update(&mut cam);
        }
        // total swing is 2*pi*72/720 = 0.2*pi around y
        let theta = cam.position.x.atan2(cam.position.z);
        assert!((theta - 0.2 * std::f32::consts::PI).abs() < 1e-3);
        assert!(first.x < cam.position.x);
        // distance preserved
        assert!((cam.position.length() - 17f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn distance_and_polar_are_clamped() {
        let mut cam = Camera::new(Vec3::new(0.0, 0.5, 40.0), Vec3::ZERO, 60.0, 1.0);
        let mut orbit = OrbitController::from_config(&GalleryConfig::default());
        orbit.update(&mut cam);
        assert!((cam.position.length() - 20.0).abs() < 1e-3);

        let mut below = Camera::new(Vec3::new(0.0, -2.0, 4.0), Vec3::ZERO, 60.0, 1.0);
        orbit.update(&mut below);
        assert!(below.position.y.abs() < 1e-3);
    }

    #[test]
    fn pan_moves_camera_and_target_together() {
        let mut cam = home_camera();
        let orbit = OrbitController::from_config(&GalleryConfig::default());
        let before = cam.position - cam.target;
        orbit.pan(&mut cam, Vec2::new(100.0, 0.0), 720.0);
        assert!(cam.target.x < 0.0);
        assert!(((cam.position - cam.target) - before).length() < 1e-5);
    }

    #[test]
    fn reset_lands_on_home() {
        let mut cam = Camera::new(Vec3::new(5.0, 3.0, 8.0), Vec3::new(1.0, 0.0, 0.0), 60.0, 1.0);
        let t0 = Instant::now();
        let reset = CameraReset::begin(&cam, Vec3::new(0.0, 1.0, 4.0), Vec3::ZERO, t0, Duration::from_millis(1000));
        assert!(!reset.apply(&mut cam, t0 + Duration::from_millis(500)));
        assert!(reset.apply(&mut cam, t0 + Duration::from_millis(1000)));
        assert_eq!(cam.position, Vec3::new(0.0, 1.0, 4.0));
        assert_eq!(cam.target, Vec3::ZERO);
    }
}
