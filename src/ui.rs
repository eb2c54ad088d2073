// ui.rs - egui overlay: title/artist caption, auto-rotate toggle, tooltip, status

use crate::gallery::Gallery;
use crate::i18n::{tr, tr_with};
use log::{info, warn};
use std::path::{Path, PathBuf};

pub const LANGUAGES: [(&str, &str); 4] = [
    ("en", "English"),
    ("zh-Hans", "简体中文"),
    ("ja", "日本語"),
    ("fr", "Français"),
];

/// Overlay state owned by the event loop.
#[derive(Debug, Clone)]
pub struct UiState {
    pub show_fps: bool,
    pub fps: f32,
    pub current_lang: String,
}

impl UiState {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            show_fps: false,
            fps: 0.0,
            current_lang: lang.into(),
        }
    }
}

/// What the user asked for through the overlay this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiActions {
    pub toggle_auto_rotate: bool,
    pub language: Option<String>,
}

pub fn auto_rotate_label(enabled: bool) -> String {
    if enabled {
        tr("ui.auto_rotate_on")
    } else {
        tr("ui.auto_rotate_off")
    }
}

fn faded(color: egui::Color32, opacity: f32) -> egui::Color32 {
    let a = (opacity.clamp(0.0, 1.0) * color.a() as f32).round() as u8;
    egui::Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), a)
}

pub fn draw_overlay(ctx: &egui::Context, gallery: &Gallery, state: &mut UiState) -> UiActions {
    let mut actions = UiActions::default();

    // caption
    let presentation = gallery.presentation();
    let opacity = presentation.opacity();
    if opacity > 0.0 && !presentation.title().is_empty() {
        egui::Area::new("caption")
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -48.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(presentation.title())
                            .size(30.0)
                            .strong()
                            .color(faded(egui::Color32::WHITE, opacity)),
                    );
                    ui.label(
                        egui::RichText::new(presentation.artist())
                            .size(18.0)
                            .italics()
                            .color(faded(egui::Color32::from_gray(200), opacity)),
                    );
                });
            });
    }

    // controls
    egui::Area::new("controls")
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                egui::ComboBox::from_id_source("language")
                    .selected_text(
                        LANGUAGES
                            .iter()
                            .find(|(code, _)| *code == state.current_lang)
                            .map(|(_, name)| *name)
                            .unwrap_or("Language"),
                    )
                    .show_ui(ui, |ui| {
                        for (code, name) in LANGUAGES {
                            if ui
                                .selectable_label(state.current_lang == code, name)
                                .clicked()
                                && state.current_lang != code
                            {
                                state.current_lang = code.to_string();
                                actions.language = Some(code.to_string());
                            }
                        }
                    });

                if ui
                    .button(auto_rotate_label(gallery.auto_rotate_enabled()))
                    .clicked()
                {
                    actions.toggle_auto_rotate = true;
                }
            });
        });

    // tooltip
    if let Some(tip) = gallery.tooltip() {
        if let Some(entry) = gallery.catalog().get(tip.slot) {
            egui::Area::new("artwork_tooltip")
                .order(egui::Order::Tooltip)
                .fixed_pos(egui::pos2(tip.position.x, tip.position.y))
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::popup(&ctx.style()).show(ui, |ui| {
                        ui.label(egui::RichText::new(&entry.title).strong());
                        ui.label(egui::RichText::new(&entry.artist).italics());
                    });
                });
        }
    }

    // status
    if state.show_fps {
        egui::Area::new("status")
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(tr_with("status.fps", &[("fps", format!("{:.1}", state.fps))]))
                        .color(egui::Color32::GREEN),
                );
            });
    }

    actions
}

// ---- fonts ---------------------------------------------------------------

/// Fonts with CJK coverage, checked in order. ab_glyph handles .ttc poorly,
/// so plain .ttf/.otf come first; a .ttc that fails to parse is skipped.
fn system_font_candidates() -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    if cfg!(windows) {
        let dir = PathBuf::from(r"C:\Windows\Fonts");
        for f in ["msyh.ttf", "simhei.ttf", "Deng.ttf", "meiryo.ttf", "yumin.ttf", "meiryo.ttc", "arial.ttf"] {
            out.push(dir.join(f));
        }
    } else if cfg!(target_os = "macos") {
        for f in [
            "/Library/Fonts/NotoSansSC-Regular.otf",
            "/Library/Fonts/NotoSansJP-Regular.otf",
            "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
            "/System/Library/Fonts/PingFang.ttc",
            "/System/Library/Fonts/Hiragino Sans GB.ttc",
        ] {
            out.push(PathBuf::from(f));
        }
    } else if cfg!(unix) {
        for f in [
            "/usr/share/fonts/opentype/noto/NotoSansSC-Regular.otf",
            "/usr/share/fonts/truetype/noto/NotoSansSC-Regular.ttf",
            "/usr/share/fonts/opentype/noto/NotoSansJP-Regular.otf",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
        ] {
            out.push(PathBuf::from(f));
        }
        if let Ok(home) = std::env::var("HOME") {
            let home = PathBuf::from(home);
            for f in [".local/share/fonts/NotoSansSC-Regular.otf", ".fonts/NotoSansSC-Regular.otf"] {
                out.push(home.join(f));
            }
        }
    }
    out
}

fn font_candidates() -> Vec<PathBuf> {
    let mut out = system_font_candidates();
    for f in ["NotoSansSC-Regular.otf", "NotoSansSC-Regular.ttf", "NotoSansJP-Regular.otf", "NotoSansCJK-Regular.ttc"] {
        if let Some(p) = crate::config::find_asset(&Path::new("fonts").join(f)) {
            out.push(p);
        }
    }
    out
}

fn load_font(path: &Path) -> Option<Vec<u8>> {
    let bytes = std::fs::read(path).ok()?;
    ab_glyph::FontArc::try_from_vec(bytes.clone()).ok()?;
    Some(bytes)
}

/// Installs the first usable CJK-capable font in front of egui's defaults.
pub fn setup_fonts(ctx: &egui::Context) {
    let Some((path, bytes)) = font_candidates()
        .into_iter()
        .find_map(|p| load_font(&p).map(|b| (p, b)))
    else {
        warn!("{}", tr("font.not_found"));
        return;
    };
    info!("{}", tr_with("font.using", &[("path", path.display().to_string())]));

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("ui".to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        if let Some(list) = fonts.families.get_mut(&family) {
            // after the default Latin font, so titles keep its look
            list.insert(1.min(list.len()), "ui".to_owned());
        }
    }
    ctx.set_fonts(fonts);
}
