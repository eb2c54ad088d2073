// main.rs - window, event loop, and the wiring between input, gallery and renderer

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // no console window in release builds

mod camera;
mod catalog;
mod config;
mod gallery;
mod gesture;
mod hover;
mod i18n;
mod layout;
mod lights;
mod mesh;
mod picking;
mod presentation;
mod renderer;
mod rotation;
mod textures;
mod tween;
mod ui;

use anyhow::{Context, Result};
use catalog::Catalog;
use clap::Parser;
use config::{find_asset, Args, GalleryConfig};
use gallery::Gallery;
use gesture::{NavKey, PointerButton};
use glam::Vec2;
use layout::ControlSide;
use log::{debug, error, info};
use renderer::Renderer;
use std::path::Path;
use std::sync::mpsc::{channel, Sender};
use std::sync::Arc;
use std::time::Instant;
use textures::{arrow_file_name, resolve_image_path, start_load_image, LoadedImage, TextureSlot};
use ui::{UiActions, UiState};

use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, WindowBuilder},
};

fn nav_key(key: VirtualKeyCode) -> Option<NavKey> {
    match key {
        VirtualKeyCode::Left => Some(NavKey::Left),
        VirtualKeyCode::Right => Some(NavKey::Right),
        VirtualKeyCode::R => Some(NavKey::Random),
        VirtualKeyCode::Space => Some(NavKey::ResetCamera),
        VirtualKeyCode::A => Some(NavKey::ToggleAutoRotate),
        _ => None,
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

/// Wheel delta in browser convention: logical pixels, positive when scrolling down.
fn wheel_delta_y(delta: MouseScrollDelta, scale_factor: f64) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * 100.0,
        MouseScrollDelta::PixelDelta(pos) => -(pos.y / scale_factor) as f32,
    }
}

fn to_logical(position: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let p = position.to_logical::<f64>(scale_factor);
    Vec2::new(p.x as f32, p.y as f32)
}

/// Starts background decodes for every artwork and any arrow image on disk.
fn request_textures(catalog: &Catalog, tx: &Sender<LoadedImage>) {
    for (i, entry) in catalog.entries().iter().enumerate() {
        let path = resolve_image_path(&entry.image);
        info!(
            "{}",
            i18n::tr_with("log.loading_image", &[("path", path.display().to_string())])
        );
        start_load_image(path, TextureSlot::Artwork(i), tx.clone());
    }
    for side in [ControlSide::Left, ControlSide::Right] {
        // procedural arrows stay when no file is shipped
        if let Some(path) = find_asset(&Path::new("images").join(arrow_file_name(side))) {
            start_load_image(path, TextureSlot::Arrow(side), tx.clone());
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let lang = i18n::resolve_lang(args.lang.as_deref());
    i18n::init(lang.clone());

    let config = GalleryConfig::load_or_default(args.config.as_deref());
    let catalog = Catalog::load_or_builtin(args.catalog.as_deref());

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(i18n::tr("app.title"))
            .with_inner_size(LogicalSize::new(1280, 720))
            .build(&event_loop)
            .context("failed to create window")?,
    );

    let mut scale_factor = window.scale_factor();
    let logical = window.inner_size().to_logical::<f32>(scale_factor);
    let mut gallery = Gallery::new(catalog, config, Vec2::new(logical.width, logical.height));
    let mut renderer =
        pollster::block_on(Renderer::new(window.clone(), gallery.layout())).context("failed to initialise renderer")?;

    if args.auto_rotate {
        gallery.set_auto_rotate(true, Instant::now());
    }

    let (tx, rx) = channel();
    request_textures(gallery.catalog(), &tx);

    let mut ui_state = UiState::new(lang);
    let mut modifiers = ModifiersState::empty();
    let mut cursor = Vec2::ZERO;
    let mut fullscreen = false;

    // FPS
    let started = Instant::now();
    let mut fps_window_start = Instant::now();
    let mut frame_count = 0u32;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => {
                // egui sees everything first; releases still reach the gallery so drags end
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                let is_release = matches!(
                    event,
                    WindowEvent::MouseInput {
                        state: ElementState::Released,
                        ..
                    } | WindowEvent::CursorLeft { .. }
                        | WindowEvent::Resized(_)
                        | WindowEvent::ScaleFactorChanged { .. }
                        | WindowEvent::ModifiersChanged(_)
                );
                if response.consumed && !is_release {
                    return;
                }

                let now = Instant::now();
                match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        let l = new_size.to_logical::<f32>(scale_factor);
                        gallery.resize(Vec2::new(l.width, l.height));
                    }

                    WindowEvent::ScaleFactorChanged {
                        scale_factor: factor,
                        new_inner_size,
                    } => {
                        scale_factor = factor;
                        renderer.resize(*new_inner_size);
                        let l = new_inner_size.to_logical::<f32>(scale_factor);
                        gallery.resize(Vec2::new(l.width, l.height));
                    }

                    WindowEvent::ModifiersChanged(state) => {
                        modifiers = state;
                    }

                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state != ElementState::Pressed {
                            return;
                        }
                        let key = input.virtual_keycode;
                        if key != Some(VirtualKeyCode::A) {
                            gallery.cancel_auto_rotate();
                        }
                        match key {
                            Some(VirtualKeyCode::F11) => {
                                fullscreen = !fullscreen;
                                if fullscreen {
                                    window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                                } else {
                                    window.set_fullscreen(None);
                                }
                            }
                            Some(VirtualKeyCode::F3) => {
                                ui_state.show_fps = !ui_state.show_fps;
                            }
                            Some(code) => {
                                if let Some(nav) = nav_key(code) {
                                    gallery.key(nav, now);
                                }
                            }
                            None => {}
                        }
                    }

                    WindowEvent::MouseInput { state, button, .. } => {
                        let Some(button) = pointer_button(button) else {
                            gallery.cancel_auto_rotate();
                            return;
                        };
                        match state {
                            ElementState::Pressed => gallery.pointer_down(button, cursor, modifiers.shift()),
                            ElementState::Released => {
                                if let Some((slot, side)) = gallery.pointer_up(button, cursor, now) {
                                    debug!("control {:?} clicked on slot {}", side, slot);
                                }
                            }
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = to_logical(position, scale_factor);
                        gallery.pointer_moved(cursor);
                    }

                    WindowEvent::CursorLeft { .. } => {
                        gallery.pointer_left();
                    }

                    WindowEvent::MouseWheel { delta, .. } => {
                        gallery.wheel(wheel_delta_y(delta, scale_factor));
                    }

                    WindowEvent::Touch(touch) => {
                        let pos = to_logical(touch.location, scale_factor);
                        match touch.phase {
                            TouchPhase::Started => gallery.touch_start(touch.id, pos),
                            TouchPhase::Moved => gallery.touch_moved(touch.id, pos),
                            TouchPhase::Ended | TouchPhase::Cancelled => gallery.touch_end(touch.id),
                        }
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                let now = Instant::now();

                while let Ok(loaded) = rx.try_recv() {
                    renderer.upload_image(loaded);
                }

                frame_count += 1;
                let elapsed = now.duration_since(fps_window_start).as_secs_f32();
                if elapsed >= 1.0 {
                    ui_state.fps = frame_count as f32 / elapsed;
                    frame_count = 0;
                    fps_window_start = now;
                }

                gallery.frame(now);
                renderer.update(&gallery, now.duration_since(started).as_secs_f32());

                let mut actions = UiActions::default();
                let render_result = renderer.render_with_ui(&window, |ctx| {
                    actions = ui::draw_overlay(ctx, &gallery, &mut ui_state);
                });

                if actions.toggle_auto_rotate {
                    let enabled = gallery.auto_rotate_enabled();
                    gallery.set_auto_rotate(!enabled, now);
                }
                if let Some(lang) = actions.language {
                    i18n::init(lang);
                    window.set_title(&i18n::tr("app.title"));
                }

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => *control_flow = ControlFlow::Exit,
                    Err(e) => error!("{}", i18n::tr_with("error.render", &[("err", format!("{:?}", e))])),
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            _ => {}
        }
    });
}
