// lights.rs - scene lighting rig packed for the shader
//
// Everything here is plain data so the uniform layout can be checked without
// a GPU. Colors are linear RGB; `w` of a color carries the intensity.

use crate::camera::Camera;
use crate::config::hex_to_rgb;
use crate::layout::RingLayout;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::FRAC_PI_6;

pub const MAX_SPOTS: usize = 16;

pub const FOG_NEAR: f32 = 10.0;
pub const FOG_FAR: f32 = 50.0;
pub const EXPOSURE: f32 = 1.2;

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct PointLightRaw {
    pub position: [f32; 4],
    /// rgb, intensity
    pub color: [f32; 4],
    /// range, unused x3
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SpotLightRaw {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub color: [f32; 4],
    /// range, cos(outer), cos(inner), unused
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// fog near, fog far, exposure, unused
    pub fog: [f32; 4],
    pub ambient: [f32; 4],
    pub sky: [f32; 4],
    pub ground: [f32; 4],
    pub sun_direction: [f32; 4],
    pub sun_color: [f32; 4],
    pub points: [PointLightRaw; 2],
    pub spots: [SpotLightRaw; MAX_SPOTS],
    /// spot count, unused x3
    pub counts: [u32; 4],
}

fn color(hex: u32, intensity: f32) -> [f32; 4] {
    let [r, g, b] = hex_to_rgb(hex);
    [r, g, b, intensity]
}

/// HSL to RGB, every component in 0..1.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |mut t: f32| {
        t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
}

/// The colored point light circling the room; `time` in seconds.
pub fn wandering_light(time: f32) -> PointLightRaw {
    let hue = ((time * 0.2).sin() + 1.0) / 2.0;
    let [r, g, b] = hsl_to_rgb(hue, 0.5, 0.7);
    PointLightRaw {
        position: [time.sin() * 5.0, 3.0, time.cos() * 5.0, 1.0],
        color: [r, g, b, 0.7],
        params: [10.0, 0.0, 0.0, 0.0],
    }
}

fn spot(position: Vec3, target: Vec3, hex: u32, intensity: f32, range: f32, angle: f32, penumbra: f32) -> SpotLightRaw {
    let direction = (target - position).normalize_or_zero();
    let outer = angle.cos();
    let inner = (angle * (1.0 - penumbra)).cos();
    SpotLightRaw {
        position: position.extend(1.0).to_array(),
        direction: direction.extend(0.0).to_array(),
        color: color(hex, intensity),
        params: [range, outer, inner, 0.0],
    }
}

impl SceneUniform {
    pub fn build(camera: &Camera, layout: &RingLayout, ring_rotation: f32, time: f32) -> Self {
        let mut spots = [SpotLightRaw::default(); MAX_SPOTS];
        spots[0] = spot(
            Vec3::new(0.0, 8.0, 0.0),
            Vec3::new(0.0, 0.0, -4.0),
            0xffffff,
            1.2,
            15.0,
            FRAC_PI_6,
            0.5,
        );
        let mut count = 1;
        for slot in 0..layout.len() {
            if count == MAX_SPOTS {
                break;
            }
            if let Some((s, position, target)) = layout.spotlight_world(slot, ring_rotation) {
                spots[count] = spot(position, target, s.color, s.intensity, s.range, s.angle, s.penumbra);
                count += 1;
            }
        }

        let fill = PointLightRaw {
            position: [7.0, 4.0, 4.0, 1.0],
            color: color(0xffffff, 0.7),
            params: [20.0, 0.0, 0.0, 0.0],
        };

        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            fog: [FOG_NEAR, FOG_FAR, EXPOSURE, 0.0],
            ambient: color(0x404040, 1.0),
            sky: color(0xffffff, 0.4),
            ground: color(0x222233, 0.4),
            sun_direction: Vec3::new(5.0, 10.0, 5.0).normalize().extend(0.0).to_array(),
            sun_color: color(0xffffff, 0.8),
            points: [wandering_light(time), fill],
            spots,
            counts: [count as u32, 0, 0, 0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 1.0, 4.0), Vec3::ZERO, 60.0, 1.0)
    }

    #[test]
    fn uniform_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<SceneUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<SpotLightRaw>(), 64);
        assert_eq!(std::mem::size_of::<PointLightRaw>(), 48);
    }

    #[test]
    fn hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-6 && red[1].abs() < 1e-6 && red[2].abs() < 1e-6);
        let gray = hsl_to_rgb(0.3, 0.0, 0.25);
        assert_eq!(gray, [0.25, 0.25, 0.25]);
    }

    #[test]
    fn wandering_light_stays_on_its_circle() {
        for t in [0.0, 1.3, 7.9] {
            let p = wandering_light(t).position;
            assert!(((p[0] * p[0] + p[2] * p[2]).sqrt() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn one_spot_per_slot_plus_overhead() {
        let layout = RingLayout::build(6, 4.0);
        let scene = SceneUniform::build(&camera(), &layout, 0.0, 0.0);
        assert_eq!(scene.counts[0], 7);
        // slot 0 spotlight points from above the camera side down to its frame
        let s = scene.spots[1];
        assert!((s.position[2] - (-1.0)).abs() < 1e-5);
        assert!(s.direction[1] < 0.0 && s.direction[2] < 0.0);
        assert!(s.params[2] > s.params[1]);
    }

    #[test]
    fn spot_count_is_capped() {
        let layout = RingLayout::build(40, 4.0);
        let scene = SceneUniform::build(&camera(), &layout, 0.0, 0.0);
        assert_eq!(scene.counts[0] as usize, MAX_SPOTS);
    }
}
