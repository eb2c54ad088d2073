// picking.rs - ray casting against the ring's tagged surfaces

use crate::layout::{RingLayout, SurfaceId, SurfacePose, SurfaceRole};
use glam::{Mat4, Vec2, Vec3};

/// A ray in world space; `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray through a normalized-device point for a 0..1 depth range projection.
    pub fn from_ndc(ndc: Vec2, inv_view_proj: Mat4) -> Self {
        let near = inv_view_proj.project_point3(ndc.extend(0.0));
        let far = inv_view_proj.project_point3(ndc.extend(1.0));
        Self::new(near, far - near)
    }
}

/// Window pixel (origin top-left) to NDC (y up). `None` for an empty viewport.
pub fn pointer_to_ndc(pointer: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        pointer.x / viewport.x * 2.0 - 1.0,
        -(pointer.y / viewport.y) * 2.0 + 1.0,
    ))
}

/// Entry distance of `ray` into the unit cube mapped by `model`, if it hits.
///
/// The ray is carried into the cube's local frame; because the mapping is
/// affine the hit parameter is the same in both frames.
pub fn intersect_box(ray: &Ray, model: Mat4) -> Option<f32> {
    let inv = model.inverse();
    if !inv.is_finite() {
        return None;
    }
    let origin = inv.transform_point3(ray.origin);
    let dir = inv.transform_vector3(ray.direction);

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < 1e-12 {
            if !(-0.5..=0.5).contains(&o) {
                return None;
            }
            continue;
        }
        let t1 = (-0.5 - o) / d;
        let t2 = (0.5 - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        return None;
    }
    Some(t_min.max(0.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub surface: SurfaceId,
    pub slot: usize,
    pub role: SurfaceRole,
    pub distance: f32,
}

/// Nearest hit among `candidates`, each placed by the ring angle and its pose.
pub fn pick_nearest(
    ray: &Ray,
    layout: &RingLayout,
    candidates: &[SurfaceId],
    ring_rotation: f32,
    pose_of: impl Fn(SurfaceId) -> SurfacePose,
) -> Option<Hit> {
    candidates
        .iter()
        .filter_map(|&id| {
            let surface = layout.surface(id)?;
            let model = layout.surface_model(id, ring_rotation, pose_of(id));
            intersect_box(ray, model).map(|distance| Hit {
                surface: id,
                slot: surface.slot,
                role: surface.role,
                distance,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ControlSide;

    fn forward_ray(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 0.0), Vec3::NEG_Z)
    }

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.direction, Vec3::X);
    }

    #[test]
    fn ndc_corners() {
        let vp = Vec2::new(800.0, 600.0);
        assert_eq!(pointer_to_ndc(Vec2::ZERO, vp), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(pointer_to_ndc(vp, vp), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(pointer_to_ndc(vp / 2.0, vp), Some(Vec2::ZERO));
        assert_eq!(pointer_to_ndc(Vec2::ZERO, Vec2::ZERO), None);
    }

    #[test]
    fn box_hit_and_miss() {
        let model = Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0)) * Mat4::from_scale(Vec3::new(2.0, 2.0, 0.1));
        let t = intersect_box(&forward_ray(0.0, 0.0), model).unwrap();
        assert!((t - 3.95).abs() < 1e-5);
        assert!(intersect_box(&forward_ray(1.5, 0.0), model).is_none());
        // pointing away
        let back = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(intersect_box(&back, model).is_none());
    }

    #[test]
    fn origin_inside_box_hits_at_zero() {
        let t = intersect_box(&forward_ray(0.0, 0.0), Mat4::IDENTITY).unwrap();
        assert_eq!(t, 0.0);
    }

    #[test]
    fn nearest_border_is_the_front_one() {
        let layout = RingLayout::build(6, 4.0);
        let hit = pick_nearest(&forward_ray(0.0, 0.0), &layout, layout.borders(), 0.0, |_| {
            SurfacePose::REST
        })
        .unwrap();
        assert_eq!(hit.slot, 0);
        assert_eq!(hit.role, SurfaceRole::Border);
    }

    #[test]
    fn ring_rotation_changes_which_slot_is_hit() {
        let layout = RingLayout::build(6, 4.0);
        let step = std::f32::consts::TAU / 6.0;
        let hit = pick_nearest(&forward_ray(0.0, 0.0), &layout, layout.borders(), 2.0 * step, |_| {
            SurfacePose::REST
        })
        .unwrap();
        assert_eq!(hit.slot, 2);
    }

    #[test]
    fn controls_only_pick_controls() {
        let layout = RingLayout::build(6, 4.0);
        let hit = pick_nearest(&forward_ray(2.9, 0.0), &layout, layout.controls(), 0.0, |_| {
            SurfacePose::REST
        })
        .unwrap();
        assert_eq!(hit.role, SurfaceRole::Control(ControlSide::Right));
        assert_eq!(hit.slot, 0);

        // frame center is not a control
        assert!(pick_nearest(&forward_ray(0.0, 0.0), &layout, layout.controls(), 0.0, |_| {
            SurfacePose::REST
        })
        .is_none());
    }

    #[test]
    fn ray_from_ndc_center_looks_down_the_view_axis() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(60f32.to_radians(), 1.5, 0.1, 1000.0);
        let ray = Ray::from_ndc(Vec2::ZERO, (proj * view).inverse());
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-3);
        assert!((ray.origin.z - 3.9).abs() < 1e-2);
    }
}
