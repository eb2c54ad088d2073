// textures.rs - decoding artwork and arrow images off the render thread
//
// Each image is decoded on its own thread and handed back over an mpsc
// channel; the renderer drains the channel once per frame and keeps showing
// the placeholder for anything that has not arrived or failed.

use crate::config::find_asset;
use crate::layout::ControlSide;
use image::io::Reader as ImageReader;
use image::{GenericImageView, Rgba, RgbaImage};
use log::{info, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Which GPU texture a decoded image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Artwork(usize),
    Arrow(ControlSide),
}

#[derive(Debug)]
pub struct LoadedImage {
    pub slot: TextureSlot,
    pub result: Result<RgbaImage, TextureError>,
}

pub fn decode_image(path: &Path) -> Result<RgbaImage, TextureError> {
    let file = File::open(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let img = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)
        .and_then(|mut r| {
            r.no_limits();
            r.decode()
        })
        .map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let (w, h) = img.dimensions();
    info!(
        "{}",
        crate::i18n::tr_with(
            "log.image_loaded_size",
            &[
                ("path", path.display().to_string()),
                ("w", w.to_string()),
                ("h", h.to_string())
            ]
        )
    );
    Ok(img.to_rgba8())
}

/// Decodes `path` on a background thread and sends the result to `tx`.
pub fn start_load_image(path: PathBuf, slot: TextureSlot, tx: Sender<LoadedImage>) {
    thread::spawn(move || {
        let result = decode_image(&path);
        if tx.send(LoadedImage { slot, result }).is_err() {
            warn!("{}", crate::i18n::tr("error.send_to_main_failed"));
        }
    });
}

/// Resolves a catalog image reference. Absolute or existing paths are used
/// as given, otherwise `assets/images/<name>` and then `assets/<name>`.
pub fn resolve_image_path(name: &str) -> PathBuf {
    let direct = PathBuf::from(name);
    if direct.is_absolute() || direct.exists() {
        return direct;
    }
    find_asset(&Path::new("images").join(name))
        .or_else(|| find_asset(&direct))
        .unwrap_or(direct)
}

pub fn arrow_file_name(side: ControlSide) -> &'static str {
    match side {
        ControlSide::Left => "left.png",
        ControlSide::Right => "right.png",
    }
}

/// Gray checkerboard shown until an artwork arrives.
pub fn placeholder(size: u32, cells: u32) -> RgbaImage {
    let cell = (size / cells.max(1)).max(1);
    RgbaImage::from_fn(size, size, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgba([96, 96, 96, 255])
        } else {
            Rgba([160, 160, 160, 255])
        }
    })
}

/// White triangle on a transparent background pointing towards `side`.
pub fn arrow_image(side: ControlSide, size: u32) -> RgbaImage {
    let s = size.max(1) as f32;
    RgbaImage::from_fn(size, size, |x, y| {
        let mut u = (x as f32 + 0.5) / s;
        let v = (y as f32 + 0.5) / s;
        if side == ControlSide::Right {
            u = 1.0 - u;
        }
        // tip at u = 0.2, base at u = 0.75
        let inside = (0.2..=0.75).contains(&u) && (v - 0.5).abs() <= (u - 0.2) / 0.55 * 0.3;
        if inside {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([255, 255, 255, 0])
        }
    })
}

/// Downscales `img` so neither side exceeds `max_dimension`.
pub fn fit_to_limit(img: RgbaImage, max_dimension: u32) -> RgbaImage {
    let (src_w, src_h) = img.dimensions();
    if src_w <= max_dimension && src_h <= max_dimension {
        return img;
    }
    let scale = max_dimension as f32 / src_w.max(src_h) as f32;
    let new_w = ((src_w as f32 * scale) as u32).clamp(1, max_dimension);
    let new_h = ((src_h as f32 * scale) as u32).clamp(1, max_dimension);
    warn!(
        "{}",
        crate::i18n::tr_with(
            "gpu.image_too_large_scaled",
            &[
                ("src_w", src_w.to_string()),
                ("src_h", src_h.to_string()),
                ("max", max_dimension.to_string()),
                ("new_w", new_w.to_string()),
                ("new_h", new_h.to_string())
            ]
        )
    );
    image::imageops::resize(&img, new_w, new_h, image::imageops::FilterType::Lanczos3)
}
