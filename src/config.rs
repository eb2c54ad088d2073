// config.rs - tunables, command line and asset lookup
//
// Every constant the gallery reacts with lives in `GalleryConfig`. The values
// default to the tuned numbers below; `assets/gallery.json` may override any
// subset of them.

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ring_gallery", version, about = "A ring of framed artworks you can spin")]
pub struct Args {
    /// UI language code (en, zh-Hans, ja, fr)
    #[arg(long)]
    pub lang: Option<String>,

    /// Catalog JSON file (array of {image, title, artist})
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Tunables JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Start with auto-rotate enabled
    #[arg(long)]
    pub auto_rotate: bool,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub ring_radius: f32,

    // rotation
    pub damping: f32,
    pub settle_epsilon: f32,

    // gestures
    pub drag_threshold_px: f32,
    pub wheel_factor: f32,
    pub click_slop_px: f32,
    pub pan_speed: f32,
    pub auto_rotate_interval_ms: u64,

    // transitions
    pub title_fade_ms: u64,
    pub text_transition_ms: u64,
    pub camera_reset_ms: u64,

    // camera / orbit
    pub camera_home: [f32; 3],
    pub camera_look_at: [f32; 3],
    pub fov_degrees: f32,
    pub orbit_damping: f32,
    pub orbit_min_distance: f32,
    pub orbit_max_distance: f32,
    pub orbit_max_polar: f32,

    // hover
    pub tooltip_offset_px: f32,
    pub border_color: u32,
    pub highlight_color: u32,
    pub pop_scale: f32,
    pub pop_forward: f32,
    pub pop_emissive: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            ring_radius: 4.0,
            damping: 0.05,
            settle_epsilon: 0.01,
            drag_threshold_px: 50.0,
            wheel_factor: 0.0001,
            click_slop_px: 5.0,
            pan_speed: 0.01,
            auto_rotate_interval_ms: 3000,
            title_fade_ms: 1500,
            text_transition_ms: 500,
            camera_reset_ms: 1000,
            camera_home: [0.0, 1.0, 4.0],
            camera_look_at: [0.0, 0.0, 0.0],
            fov_degrees: 60.0,
            orbit_damping: 0.05,
            orbit_min_distance: 3.0,
            orbit_max_distance: 20.0,
            orbit_max_polar: std::f32::consts::FRAC_PI_2,
            tooltip_offset_px: 18.0,
            border_color: 0x888888,
            highlight_color: 0xffff00,
            pop_scale: 1.04,
            pop_forward: 0.04,
            pop_emissive: 0x333300,
        }
    }
}

impl GalleryConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Explicit path first, then `assets/gallery.json`; anything unreadable
    /// falls back to the defaults with a warning.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => find_asset(Path::new("gallery.json")),
        };

        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(cfg) => {
                log::info!(
                    "{}",
                    crate::i18n::tr_with("log.config_loaded", &[("path", path.display().to_string())])
                );
                cfg
            }
            Err(e) => {
                log::warn!(
                    "{}",
                    crate::i18n::tr_with("error.config", &[("err", e.to_string())])
                );
                Self::default()
            }
        }
    }

    pub fn auto_rotate_interval(&self) -> Duration {
        Duration::from_millis(self.auto_rotate_interval_ms)
    }

    pub fn title_fade(&self) -> Duration {
        Duration::from_millis(self.title_fade_ms)
    }

    pub fn text_transition(&self) -> Duration {
        Duration::from_millis(self.text_transition_ms)
    }

    pub fn camera_reset(&self) -> Duration {
        Duration::from_millis(self.camera_reset_ms)
    }
}

/// `0xRRGGBB` to linear-ish float rgb in 0..1 (no gamma handling).
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Look up a file under `assets/` by searching:
/// 1) <exe_dir>/assets/<rel>
/// 2) ./assets/<rel>  (dev working dir)
pub fn find_asset(rel: &Path) -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("assets").join(rel);
            if p.exists() {
                return Some(p);
            }
        }
    }

    let p = PathBuf::from("assets").join(rel);
    if p.exists() {
        return Some(p);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuned_values() {
        let cfg = GalleryConfig::default();
        assert_eq!(cfg.damping, 0.05);
        assert_eq!(cfg.drag_threshold_px, 50.0);
        assert_eq!(cfg.auto_rotate_interval(), Duration::from_millis(3000));
        assert_eq!(cfg.title_fade(), Duration::from_millis(1500));
        assert_eq!(cfg.camera_home, [0.0, 1.0, 4.0]);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = GalleryConfig::from_json_str(r#"{ "ring_radius": 6.5, "drag_threshold_px": 30 }"#)
            .unwrap();
        assert_eq!(cfg.ring_radius, 6.5);
        assert_eq!(cfg.drag_threshold_px, 30.0);
        assert_eq!(cfg.wheel_factor, 0.0001);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            GalleryConfig::from_json_str("{ ring_radius: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GalleryConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn hex_colors_split_into_channels() {
        assert_eq!(hex_to_rgb(0xffff00), [1.0, 1.0, 0.0]);
        let gray = hex_to_rgb(0x888888);
        assert!((gray[0] - 136.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn args_parse_flags() {
        let args = Args::parse_from(["ring_gallery", "--lang", "fr", "--auto-rotate"]);
        assert_eq!(args.lang.as_deref(), Some("fr"));
        assert!(args.auto_rotate);
        assert!(args.catalog.is_none());
    }
}
