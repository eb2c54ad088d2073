// hover.rs - border highlight, artwork pop and tooltip bookkeeping
//
// Holds at most one highlighted border and one popped artwork. Any change of
// target restores the previous one to what it was before it was touched.

use crate::config::GalleryConfig;
use crate::layout::SurfacePose;
use glam::Vec2;

/// Mutable visual properties of one slot's border and artwork.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotVisual {
    pub border_color: u32,
    pub artwork_pose: SurfacePose,
    pub artwork_emissive: u32,
}

impl SlotVisual {
    pub fn resting(border_color: u32) -> Self {
        Self {
            border_color,
            artwork_pose: SurfacePose::REST,
            artwork_emissive: 0x000000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverStyle {
    pub highlight_color: u32,
    pub pop_scale: f32,
    pub pop_forward: f32,
    pub pop_emissive: u32,
    pub tooltip_offset: f32,
}

impl HoverStyle {
    pub fn from_config(cfg: &GalleryConfig) -> Self {
        Self {
            highlight_color: cfg.highlight_color,
            pop_scale: cfg.pop_scale,
            pop_forward: cfg.pop_forward,
            pop_emissive: cfg.pop_emissive,
            tooltip_offset: cfg.tooltip_offset_px,
        }
    }
}

impl Default for HoverStyle {
    fn default() -> Self {
        Self::from_config(&GalleryConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tooltip {
    pub slot: usize,
    /// Top-left corner in window points.
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Highlight {
    slot: usize,
    original_color: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightState {
    highlight: Option<Highlight>,
    popped: Option<usize>,
    tooltip: Option<Tooltip>,
}

impl HighlightState {
    pub fn highlighted_slot(&self) -> Option<usize> {
        self.highlight.map(|h| h.slot)
    }

    pub fn popped_slot(&self) -> Option<usize> {
        self.popped
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        self.tooltip
    }

    /// Applies the result of one pointer-move hit test.
    pub fn update(&mut self, hit_slot: Option<usize>, pointer: Vec2, visuals: &mut [SlotVisual], style: &HoverStyle) {
        let Some(slot) = hit_slot.filter(|&s| s < visuals.len()) else {
            self.clear(visuals);
            return;
        };

        if self.highlighted_slot() != Some(slot) {
            self.restore_border(visuals);
            self.highlight = Some(Highlight {
                slot,
                original_color: visuals[slot].border_color,
            });
            visuals[slot].border_color = style.highlight_color;
        }

        self.tooltip = Some(Tooltip {
            slot,
            position: pointer + Vec2::splat(style.tooltip_offset),
        });

        if self.popped != Some(slot) {
            self.restore_artwork(visuals);
            let v = &mut visuals[slot];
            v.artwork_pose = SurfacePose {
                scale: style.pop_scale,
                forward: style.pop_forward,
            };
            v.artwork_emissive = style.pop_emissive;
            self.popped = Some(slot);
        }
    }

    /// Drops every highlight and hides the tooltip.
    pub fn clear(&mut self, visuals: &mut [SlotVisual]) {
        self.restore_border(visuals);
        self.restore_artwork(visuals);
        self.tooltip = None;
    }

    fn restore_border(&mut self, visuals: &mut [SlotVisual]) {
        if let Some(h) = self.highlight.take() {
            if let Some(v) = visuals.get_mut(h.slot) {
                v.border_color = h.original_color;
            }
        }
    }

    fn restore_artwork(&mut self, visuals: &mut [SlotVisual]) {
        if let Some(slot) = self.popped.take() {
            if let Some(v) = visuals.get_mut(slot) {
                v.artwork_pose = SurfacePose::REST;
                v.artwork_emissive = 0x000000;
            }
        }
    }
}
