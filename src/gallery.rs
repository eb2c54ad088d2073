// gallery.rs - the navigation state object
//
// Owns the ring rotation, the interaction mode, hover highlight and camera.
// Event handlers and the per-frame `frame` call are the only mutators; the
// renderer and overlay read from here.

use crate::camera::{Camera, CameraReset, OrbitController};
use crate::catalog::Catalog;
use crate::config::GalleryConfig;
use crate::gesture::{
    AutoRotateTimer, DragSource, DragTracker, InteractionMode, NavKey, OrbitAction, PointerButton,
};
use crate::hover::{HighlightState, HoverStyle, SlotVisual, Tooltip};
use crate::layout::{ControlSide, RingLayout, SurfacePose, SurfaceRole};
use crate::picking::{pick_nearest, Ray};
use crate::presentation::Presentation;
use crate::rotation::{angular_step, RotationState};
use glam::{Vec2, Vec3};
use log::{debug, trace};
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

pub struct Gallery {
    config: GalleryConfig,
    catalog: Catalog,
    layout: RingLayout,
    rotation: RotationState,
    mode: InteractionMode,
    highlight: HighlightState,
    hover_style: HoverStyle,
    visuals: Vec<SlotVisual>,
    presentation: Presentation,
    camera: Camera,
    orbit: OrbitController,
    camera_reset: Option<CameraReset>,
    viewport: Vec2,
    last_frame: Option<Instant>,
}

impl Gallery {
    pub fn new(catalog: Catalog, config: GalleryConfig, viewport: Vec2) -> Self {
        let layout = RingLayout::build(catalog.len(), config.ring_radius);
        let visuals = vec![SlotVisual::resting(config.border_color); layout.len()];
        let aspect = if viewport.y > 0.0 { viewport.x / viewport.y } else { 1.0 };
        let camera = Camera::new(
            Vec3::from(config.camera_home),
            Vec3::from(config.camera_look_at),
            config.fov_degrees,
            aspect,
        );

        let rotation = RotationState::new(config.damping, config.settle_epsilon);
        let mut presentation = Presentation::new(config.text_transition());
        presentation.show(rotation.active_index(catalog.len()), &catalog);

        Self {
            hover_style: HoverStyle::from_config(&config),
            orbit: OrbitController::from_config(&config),
            rotation,
            mode: InteractionMode::Idle,
            highlight: HighlightState::default(),
            visuals,
            presentation,
            camera,
            camera_reset: None,
            viewport,
            last_frame: None,
            layout,
            catalog,
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn layout(&self) -> &RingLayout {
        &self.layout
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    #[cfg(test)]
    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn visuals(&self) -> &[SlotVisual] {
        &self.visuals
    }

    #[cfg(test)]
    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        self.highlight.tooltip()
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn auto_rotate_enabled(&self) -> bool {
        self.mode.is_auto_rotate()
    }

    #[cfg(test)]
    pub fn artwork_pose(&self, slot: usize) -> SurfacePose {
        self.visuals
            .get(slot)
            .map(|v| v.artwork_pose)
            .unwrap_or(SurfacePose::REST)
    }

    // ---- gestures -------------------------------------------------------

    fn step(&self) -> Option<f32> {
        angular_step(self.catalog.len())
    }

    fn rotate_by_steps(&mut self, steps: f32) {
        if let Some(step) = self.step() {
            self.rotation.apply_delta(steps * step);
            self.refresh_presentation();
        }
    }

    fn refresh_presentation(&mut self) {
        let index = self.rotation.active_index(self.catalog.len());
        self.presentation.show(index, &self.catalog);
    }

    /// Every user gesture stops auto-rotate before doing its own thing.
    pub fn cancel_auto_rotate(&mut self) {
        if self.mode.is_auto_rotate() {
            debug!("auto-rotate cancelled by user input");
            self.mode = InteractionMode::Idle;
        }
    }

    /// Turning auto-rotate on is refused while a drag holds the pointer.
    pub fn set_auto_rotate(&mut self, enabled: bool, now: Instant) {
        if enabled == self.mode.is_auto_rotate() {
            return;
        }
        if enabled && self.mode.is_dragging() {
            debug!("auto-rotate toggle ignored during drag");
            return;
        }
        self.mode = if enabled {
            InteractionMode::AutoRotate(AutoRotateTimer::start(now, self.config.auto_rotate_interval()))
        } else {
            InteractionMode::Idle
        };
        debug!("auto-rotate {}", if enabled { "on" } else { "off" });
    }

    pub fn key(&mut self, key: NavKey, now: Instant) {
        if key == NavKey::ToggleAutoRotate {
            let enabled = self.mode.is_auto_rotate();
            self.set_auto_rotate(!enabled, now);
            return;
        }

        self.cancel_auto_rotate();
        match key {
            NavKey::Left => self.rotate_by_steps(1.0),
            NavKey::Right => self.rotate_by_steps(-1.0),
            NavKey::Random => {
                self.rotation.set_target(rand::random::<f32>() * TAU);
                self.refresh_presentation();
            }
            NavKey::ResetCamera => {
                self.orbit.stop();
                self.camera_reset = Some(CameraReset::begin(
                    &self.camera,
                    Vec3::from(self.config.camera_home),
                    Vec3::from(self.config.camera_look_at),
                    now,
                    self.config.camera_reset(),
                ));
            }
            NavKey::ToggleAutoRotate => {}
        }
        debug!("key {:?} -> target {:.3}", key, self.rotation.target());
    }

    /// `delta_y` in pixels, positive when scrolling down.
    pub fn wheel(&mut self, delta_y: f32) {
        self.cancel_auto_rotate();
        self.rotation.apply_delta(delta_y * self.config.wheel_factor);
        self.refresh_presentation();
    }

    pub fn pointer_down(&mut self, button: PointerButton, pos: Vec2, shift: bool) {
        self.cancel_auto_rotate();
        self.mode = match (button, shift) {
            (PointerButton::Primary, true) => InteractionMode::ShiftPan {
                source: DragSource::Mouse,
                drag: DragTracker::begin(pos.x, self.config.drag_threshold_px),
                last: pos,
            },
            (PointerButton::Primary, false) => InteractionMode::OrbitDrag {
                action: OrbitAction::Rotate,
                press: pos,
                last: pos,
            },
            (PointerButton::Secondary, _) => InteractionMode::OrbitDrag {
                action: OrbitAction::Pan,
                press: pos,
                last: pos,
            },
        };
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        match self.mode {
            InteractionMode::ShiftPan {
                source: DragSource::Mouse,
                mut drag,
                last,
            } => {
                if let Some(sign) = drag.update(pos.x) {
                    self.rotate_by_steps(sign);
                }
                let delta = pos - last;
                self.camera.position.x -= delta.x * self.config.pan_speed;
                self.camera.position.y += delta.y * self.config.pan_speed;
                self.mode = InteractionMode::ShiftPan {
                    source: DragSource::Mouse,
                    drag,
                    last: pos,
                };
            }
            InteractionMode::OrbitDrag { action, press, last } => {
                let delta = pos - last;
                match action {
                    OrbitAction::Rotate => self.orbit.rotate(delta, self.viewport.y),
                    OrbitAction::Pan => self.orbit.pan(&mut self.camera, delta, self.viewport.y),
                }
                self.mode = InteractionMode::OrbitDrag { action, press, last: pos };
            }
            _ => {}
        }

        self.hover(pos);
    }

    /// Ends a drag. A primary release that barely moved counts as a click;
    /// returns the control it activated, if any.
    pub fn pointer_up(&mut self, button: PointerButton, pos: Vec2, now: Instant) -> Option<(usize, ControlSide)> {
        let clicked = match (self.mode, button) {
            (
                InteractionMode::OrbitDrag {
                    action: OrbitAction::Rotate,
                    press,
                    ..
                },
                PointerButton::Primary,
            ) => press.distance(pos) < self.config.click_slop_px,
            _ => false,
        };

        match self.mode {
            InteractionMode::ShiftPan {
                source: DragSource::Mouse,
                ..
            }
            | InteractionMode::OrbitDrag { .. } => self.mode = InteractionMode::Idle,
            _ => {}
        }

        if clicked {
            self.click(pos, now)
        } else {
            None
        }
    }

    pub fn touch_start(&mut self, id: u64, pos: Vec2) {
        self.cancel_auto_rotate();
        if self.mode.is_shift_pan() {
            // single touch only
            return;
        }
        self.mode = InteractionMode::ShiftPan {
            source: DragSource::Touch(id),
            drag: DragTracker::begin(pos.x, self.config.drag_threshold_px),
            last: pos,
        };
    }

    pub fn touch_moved(&mut self, id: u64, pos: Vec2) {
        if let InteractionMode::ShiftPan {
            source: DragSource::Touch(active),
            mut drag,
            ..
        } = self.mode
        {
            if active != id {
                return;
            }
            if let Some(sign) = drag.update(pos.x) {
                self.rotate_by_steps(sign);
            }
            self.mode = InteractionMode::ShiftPan {
                source: DragSource::Touch(active),
                drag,
                last: pos,
            };
        }
    }

    pub fn touch_end(&mut self, id: u64) {
        if let InteractionMode::ShiftPan {
            source: DragSource::Touch(active),
            ..
        } = self.mode
        {
            if active == id {
                self.mode = InteractionMode::Idle;
            }
        }
    }

    /// Click on a navigation control. Suppressed while a drag is active.
    pub fn click(&mut self, pos: Vec2, now: Instant) -> Option<(usize, ControlSide)> {
        if self.mode.is_shift_pan() {
            return None;
        }
        let ray = self.ray_at(pos)?;
        let hit = pick_nearest(&ray, &self.layout, self.layout.controls(), self.rotation.current(), |_| {
            SurfacePose::REST
        })?;
        let SurfaceRole::Control(side) = hit.role else {
            return None;
        };

        self.cancel_auto_rotate();
        self.rotate_by_steps(side.direction());
        self.presentation.begin_fade(now, self.config.title_fade());
        debug!("control {:?} on slot {} -> target {:.3}", side, hit.slot, self.rotation.target());
        Some((hit.slot, side))
    }

    fn ray_at(&self, pos: Vec2) -> Option<Ray> {
        self.camera.ray_through(pos, self.viewport)
    }

    /// Hover hit test against the frame borders.
    pub fn hover(&mut self, pos: Vec2) {
        let hit = self.ray_at(pos).and_then(|ray| {
            pick_nearest(&ray, &self.layout, self.layout.borders(), self.rotation.current(), |_| {
                SurfacePose::REST
            })
        });
        let slot = hit.map(|h| h.slot);
        if slot != self.highlight.highlighted_slot() {
            trace!("hover slot {:?}", slot);
        }
        self.highlight.update(slot, pos, &mut self.visuals, &self.hover_style);
    }

    /// Pointer left the window.
    pub fn pointer_left(&mut self) {
        self.highlight.clear(&mut self.visuals);
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.camera.set_viewport(viewport.x, viewport.y);
    }

    // ---- per frame ------------------------------------------------------

    pub fn frame(&mut self, now: Instant) {
        let dt = self
            .last_frame
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);

        if let InteractionMode::AutoRotate(mut timer) = self.mode {
            let fired = timer.poll(now);
            self.mode = InteractionMode::AutoRotate(timer);
            if fired {
                self.rotate_by_steps(-1.0);
            }
        }

        // the ring holds still under a stepping drag and catches up on release
        if !self.mode.is_shift_pan() && self.rotation.tick() {
            self.refresh_presentation();
        }

        let settled = self.rotation.active_index(self.catalog.len());
        self.presentation.update(now, dt, settled, &self.catalog);

        if self.mode.orbit_controls_enabled() {
            self.orbit.update(&mut self.camera);
        }
        if let Some(reset) = self.camera_reset {
            if reset.apply(&mut self.camera, now) {
                self.camera_reset = None;
            }
        }
    }
}
