// layout.rs - ring slots and their tagged surfaces
//
// Every pickable surface is created here with an explicit role, so hit tests
// filter on `SurfaceRole` instead of guessing from box dimensions.
//
// Slot-local space: the slot's frame hangs at z = -radius facing +z (towards
// the ring axis). A slot's world yaw is its angular offset minus the ring
// rotation, so at ring angle 2*pi*i/N slot i is the one in front of the camera.

use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_6, TAU};

pub const BORDER_SIZE: Vec3 = Vec3::new(3.2, 3.2, 0.01);
pub const ARTWORK_SIZE: Vec3 = Vec3::new(3.0 - 0.04, 3.0 - 0.04, 0.008);
pub const CONTROL_SIZE: Vec3 = Vec3::new(0.3, 0.3, 0.01);

const ARTWORK_INSET: f32 = 0.03;
const CONTROL_INSET: f32 = 0.1;
const CONTROL_X: f32 = 2.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSide {
    Left,
    Right,
}

impl ControlSide {
    /// Sign of the rotation step this control applies.
    pub fn direction(self) -> f32 {
        match self {
            ControlSide::Left => 1.0,
            ControlSide::Right => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    Border,
    Artwork,
    Control(ControlSide),
}

pub type SurfaceId = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub slot: usize,
    pub role: SurfaceRole,
    /// Box center in slot-local space.
    pub center: Vec3,
    pub size: Vec3,
}

/// Scale and forward nudge applied on top of a surface's resting placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePose {
    pub scale: f32,
    pub forward: f32,
}

impl SurfacePose {
    pub const REST: SurfacePose = SurfacePose {
        scale: 1.0,
        forward: 0.0,
    };
}

impl Default for SurfacePose {
    fn default() -> Self {
        Self::REST
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spotlight {
    pub position: Vec3,
    pub target: Vec3,
    pub color: u32,
    pub intensity: f32,
    pub range: f32,
    pub angle: f32,
    pub penumbra: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingSlot {
    pub index: usize,
    pub angle: f32,
    pub border: SurfaceId,
    pub artwork: SurfaceId,
    pub left: SurfaceId,
    pub right: SurfaceId,
    pub spotlight: Spotlight,
}

#[derive(Debug, Clone, Default)]
pub struct RingLayout {
    slots: Vec<RingSlot>,
    surfaces: Vec<Surface>,
    controls: Vec<SurfaceId>,
    borders: Vec<SurfaceId>,
}

impl RingLayout {
    pub fn build(count: usize, radius: f32) -> Self {
        let mut layout = RingLayout::default();

        for index in 0..count {
            let angle = TAU * index as f32 / count as f32;

            let border = layout.push(index, SurfaceRole::Border, Vec3::new(0.0, 0.0, -radius), BORDER_SIZE);
            let artwork = layout.push(
                index,
                SurfaceRole::Artwork,
                Vec3::new(0.0, 0.0, -radius + ARTWORK_INSET),
                ARTWORK_SIZE,
            );
            let left = layout.push(
                index,
                SurfaceRole::Control(ControlSide::Left),
                Vec3::new(-CONTROL_X, 0.0, -radius + CONTROL_INSET),
                CONTROL_SIZE,
            );
            let right = layout.push(
                index,
                SurfaceRole::Control(ControlSide::Right),
                Vec3::new(CONTROL_X, 0.0, -radius + CONTROL_INSET),
                CONTROL_SIZE,
            );

            layout.borders.push(border);
            layout.controls.push(left);
            layout.controls.push(right);

            layout.slots.push(RingSlot {
                index,
                angle,
                border,
                artwork,
                left,
                right,
                spotlight: Spotlight {
                    position: Vec3::new(0.0, 4.0, -radius + 3.0),
                    target: Vec3::new(0.0, 0.0, -radius),
                    color: 0xffffff,
                    intensity: 2.5,
                    range: 12.0,
                    angle: FRAC_PI_6,
                    penumbra: 0.2,
                },
            });
        }

        layout
    }

    fn push(&mut self, slot: usize, role: SurfaceRole, center: Vec3, size: Vec3) -> SurfaceId {
        self.surfaces.push(Surface {
            slot,
            role,
            center,
            size,
        });
        self.surfaces.len() - 1
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[cfg(test)]
    pub fn slots(&self) -> &[RingSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&RingSlot> {
        self.slots.get(index)
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id)
    }

    /// All left/right controls, cached at build time.
    pub fn controls(&self) -> &[SurfaceId] {
        &self.controls
    }

    pub fn borders(&self) -> &[SurfaceId] {
        &self.borders
    }

    /// Slot-to-world rotation for a ring turned by `ring_rotation`.
    pub fn slot_transform(&self, slot: usize, ring_rotation: f32) -> Mat4 {
        let angle = self.slot(slot).map(|s| s.angle).unwrap_or(0.0);
        Mat4::from_rotation_y(angle - ring_rotation)
    }

    /// Maps the unit cube (-0.5..0.5) to the surface's world box.
    pub fn surface_model(&self, id: SurfaceId, ring_rotation: f32, pose: SurfacePose) -> Mat4 {
        let Some(surface) = self.surfaces.get(id) else {
            return Mat4::IDENTITY;
        };
        let center = surface.center + Vec3::Z * pose.forward;
        self.slot_transform(surface.slot, ring_rotation)
            * Mat4::from_translation(center)
            * Mat4::from_scale(surface.size * pose.scale)
    }

    /// Spotlight position and target in world space.
    pub fn spotlight_world(&self, slot: usize, ring_rotation: f32) -> Option<(Spotlight, Vec3, Vec3)> {
        let s = self.slot(slot)?;
        let m = self.slot_transform(slot, ring_rotation);
        Some((
            s.spotlight,
            m.transform_point3(s.spotlight.position),
            m.transform_point3(s.spotlight.target),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_four_tagged_surfaces_per_slot() {
        let layout = RingLayout::build(6, 4.0);
        assert_eq!(layout.len(), 6);
        assert_eq!(layout.surfaces().len(), 24);
        assert_eq!(layout.controls().len(), 12);
        assert_eq!(layout.borders().len(), 6);

        for slot in layout.slots() {
            assert_eq!(layout.surface(slot.border).unwrap().role, SurfaceRole::Border);
            assert_eq!(layout.surface(slot.artwork).unwrap().role, SurfaceRole::Artwork);
            assert_eq!(
                layout.surface(slot.left).unwrap().role,
                SurfaceRole::Control(ControlSide::Left)
            );
            assert_eq!(
                layout.surface(slot.right).unwrap().role,
                SurfaceRole::Control(ControlSide::Right)
            );
            for id in [slot.border, slot.artwork, slot.left, slot.right] {
                assert_eq!(layout.surface(id).unwrap().slot, slot.index);
            }
        }
    }

    #[test]
    fn slots_are_evenly_spaced() {
        let layout = RingLayout::build(4, 4.0);
        let angles: Vec<f32> = layout.slots().iter().map(|s| s.angle).collect();
        for (i, a) in angles.iter().enumerate() {
            assert!((a - TAU * i as f32 / 4.0).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_ring_has_nothing() {
        let layout = RingLayout::build(0, 4.0);
        assert!(layout.is_empty());
        assert!(layout.surfaces().is_empty());
        assert!(layout.controls().is_empty());
    }

    #[test]
    fn first_frame_faces_the_axis_at_rest() {
        let layout = RingLayout::build(6, 4.0);
        let slot = &layout.slots()[0];
        let m = layout.surface_model(slot.border, 0.0, SurfacePose::REST);
        let center = m.transform_point3(Vec3::ZERO);
        assert!((center - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-5);
    }

    #[test]
    fn quarter_turn_moves_frame_around_the_axis() {
        let layout = RingLayout::build(4, 4.0);
        let slot = &layout.slots()[1];
        // slot 1 of 4 sits at pi/2; a ring angle of pi/2 brings it to the front
        let m = layout.surface_model(slot.border, TAU / 4.0, SurfacePose::REST);
        let center = m.transform_point3(Vec3::ZERO);
        assert!((center - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-4);
    }

    #[test]
    fn pose_pushes_artwork_forward_and_scales() {
        let layout = RingLayout::build(1, 4.0);
        let art = layout.slots()[0].artwork;
        let pose = SurfacePose {
            scale: 1.04,
            forward: 0.04,
        };
        let m = layout.surface_model(art, 0.0, pose);
        let center = m.transform_point3(Vec3::ZERO);
        assert!((center.z - (-4.0 + 0.03 + 0.04)).abs() < 1e-5);
        let corner = m.transform_point3(Vec3::new(0.5, 0.0, 0.0));
        assert!((corner.x - ARTWORK_SIZE.x * 1.04 / 2.0).abs() < 1e-5);
    }

    #[test]
    fn left_control_sits_left_of_its_frame() {
        let layout = RingLayout::build(6, 4.0);
        let slot = &layout.slots()[0];
        let left = layout.surface_model(slot.left, 0.0, SurfacePose::REST).transform_point3(Vec3::ZERO);
        let right = layout.surface_model(slot.right, 0.0, SurfacePose::REST).transform_point3(Vec3::ZERO);
        assert!(left.x < 0.0 && right.x > 0.0);
    }

    #[test]
    fn spotlight_turns_with_the_ring() {
        let layout = RingLayout::build(2, 4.0);
        let (_, pos, target) = layout.spotlight_world(1, 0.0).unwrap();
        // slot 1 of 2 sits behind the axis
        assert!((pos - Vec3::new(0.0, 4.0, 1.0)).length() < 1e-4);
        assert!((target - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-4);
    }
}
