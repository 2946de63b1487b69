use std::path::PathBuf;

use async_std::channel::Receiver;
use async_std::task;

use skulpin::rafx::api::RafxExtents2D;
use skulpin::skia_safe;
use skulpin::winit;

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::assetto::{SessionInfo, Update};
use crate::config::Config;
use crate::export;
use crate::host::{Align, Canvas, Color, HostError, Point, Rect, Size, WindowHost, WindowId};
use crate::metrics::WheelPos;
use crate::options::Capability;
use crate::panel::{toggle_option, EnginePanel, Panel, WheelPanel};

const HIDE_KEY: char = 'H';
const SHOW_ALL_KEY: char = 'A';

fn key_char(key: VirtualKeyCode) -> Option<char> {
    use VirtualKeyCode::*;
    let key = match key {
        Key1 => '1',
        Key2 => '2',
        Key3 => '3',
        Key4 => '4',
        Key5 => '5',
        Key6 => '6',
        Key7 => '7',
        Key8 => '8',
        Key9 => '9',
        L => 'L',
        P => 'P',
        H => HIDE_KEY,
        A => SHOW_ALL_KEY,
        _ => return None,
    };
    Some(key)
}

fn skia_rect(rect: Rect) -> skia_safe::Rect {
    skia_safe::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}

fn paint(color: Color) -> skia_safe::Paint {
    let mut paint = skia_safe::Paint::new(skia_safe::Color4f::new(color.r, color.g, color.b, color.a), None);
    paint.set_anti_alias(true);
    paint
}

/// Adapts a skia canvas for the duration of one frame.
pub struct SkiaCanvas<'a> {
    canvas: &'a mut skia_safe::Canvas,
}

impl<'a> SkiaCanvas<'a> {
    pub fn new(canvas: &'a mut skia_safe::Canvas) -> SkiaCanvas<'a> {
        SkiaCanvas { canvas }
    }
}

impl Canvas for SkiaCanvas<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.canvas.draw_rect(skia_rect(rect), &paint(color));
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        let mut paint = paint(color);
        paint.set_style(skia_safe::paint::Style::Stroke);
        paint.set_stroke_width(width);
        self.canvas.draw_rect(skia_rect(rect), &paint);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.canvas
            .draw_circle(skia_safe::Point::new(center.x, center.y), radius, &paint(color));
    }

    fn draw_text(&mut self, text: &str, origin: Point, size: f32, align: Align, color: Color) {
        let paint = paint(color);
        let mut font = skia_safe::Font::new(skia_safe::Typeface::default(), Some(size));
        font.set_subpixel(true);

        let (width, _) = font.measure_str(text, Some(&paint));
        let x = match align {
            Align::Left => origin.x,
            Align::Center => origin.x - width / 2.0,
            Align::Right => origin.x - width,
        };
        self.canvas
            .draw_str(text, skia_safe::Point::new(x, origin.y), &font, &paint);
    }

    fn clear(&mut self, rect: Rect) {
        let mut paint = skia_safe::Paint::default();
        paint.set_blend_mode(skia_safe::BlendMode::Clear);
        self.canvas.draw_rect(skia_rect(rect), &paint);
    }
}

struct Surface {
    window: Window,
    renderer: skulpin::Renderer,
    background_opacity: f32,
}

/// Real windows backed by winit, each with its own skulpin renderer.
pub struct WinitHost {
    event_loop: Option<EventLoop<()>>,
    surfaces: Vec<Surface>,
}

impl WinitHost {
    pub fn new() -> WinitHost {
        WinitHost {
            event_loop: Some(EventLoop::<()>::with_user_event()),
            surfaces: Vec::new(),
        }
    }

    fn lookup(&self, id: winit::window::WindowId) -> Option<WindowId> {
        self.surfaces.iter().position(|surface| surface.window.id() == id)
    }

    fn with_window(&mut self, window: WindowId, apply: impl FnOnce(&mut Surface)) {
        match self.surfaces.get_mut(window) {
            Some(surface) => apply(surface),
            None => warn!("Ignoring call for unknown window {}", window),
        }
    }

    fn request_redraw(&self) {
        for surface in &self.surfaces {
            surface.window.request_redraw();
        }
    }

    fn drag(&self, window: WindowId) {
        if let Some(surface) = self.surfaces.get(window) {
            if let Err(err) = surface.window.drag_window() {
                warn!("Failed to drag window {}: {}", window, err);
            }
        }
    }

    fn draw(&mut self, window: WindowId, panel: &dyn Panel) -> Result<(), String> {
        let surface = self
            .surfaces
            .get_mut(window)
            .ok_or_else(|| HostError::UnknownWindow(window).to_string())?;

        let window_size = surface.window.inner_size();
        let window_extents = RafxExtents2D {
            width: window_size.width,
            height: window_size.height,
        };
        let scale_factor = surface.window.scale_factor();
        let alpha = (surface.background_opacity.clamp(0.0, 1.0) * 255.0) as u8;

        surface
            .renderer
            .draw(window_extents, scale_factor, |canvas, _coordinate_system_helper| {
                canvas.clear(skia_safe::Color::from_argb(alpha, 0, 0, 0));
                panel.draw(&mut SkiaCanvas::new(canvas));
            })
            .map_err(|err| format!("{:?}", err))
    }
}

impl WindowHost for WinitHost {
    fn create_window(&mut self, title: &str) -> Result<WindowId, HostError> {
        let event_loop = self
            .event_loop
            .as_ref()
            .ok_or_else(|| HostError::WindowUnavailable(title.to_string()))?;

        let window = WindowBuilder::new()
            .with_title(title)
            .with_decorations(false)
            .with_always_on_top(true)
            .with_transparent(true)
            .with_resizable(false)
            .build(event_loop)
            .map_err(|err| HostError::WindowUnavailable(format!("{}: {}", title, err)))?;

        let window_size = window.inner_size();
        let window_extents = RafxExtents2D {
            width: window_size.width,
            height: window_size.height,
        };
        let renderer = skulpin::RendererBuilder::new()
            .coordinate_system(skulpin::CoordinateSystem::Physical)
            .build(&window, window_extents)
            .map_err(|err| HostError::WindowUnavailable(format!("{}: {:?}", title, err)))?;

        self.surfaces.push(Surface {
            window,
            renderer,
            background_opacity: 1.0,
        });
        Ok(self.surfaces.len() - 1)
    }

    fn set_position(&mut self, window: WindowId, position: (i32, i32)) {
        self.with_window(window, |surface| {
            surface
                .window
                .set_outer_position(PhysicalPosition::new(position.0, position.1))
        });
    }

    fn position(&self, window: WindowId) -> Result<(i32, i32), HostError> {
        let surface = self.surfaces.get(window).ok_or(HostError::UnknownWindow(window))?;
        let position = surface
            .window
            .outer_position()
            .map_err(|err| HostError::WindowUnavailable(err.to_string()))?;
        Ok((position.x, position.y))
    }

    fn set_size(&mut self, window: WindowId, size: Size) {
        let size = PhysicalSize::new(size.width.round() as u32, size.height.round() as u32);
        self.with_window(window, |surface| surface.window.set_inner_size(size));
    }

    fn set_background_opacity(&mut self, window: WindowId, opacity: f32) {
        self.with_window(window, |surface| surface.background_opacity = opacity);
    }

    fn set_border(&mut self, window: WindowId, visible: bool) {
        self.with_window(window, |surface| surface.window.set_decorations(visible));
    }

    fn set_title(&mut self, window: WindowId, title: &str) {
        self.with_window(window, |surface| surface.window.set_title(title));
    }

    fn set_visible(&mut self, window: WindowId, visible: bool) {
        self.with_window(window, |surface| surface.window.set_visible(visible));
    }
}

struct Panels {
    engine: EnginePanel,
    wheels: Vec<WheelPanel>,
}

impl Panels {
    fn iter(&self) -> impl Iterator<Item = &dyn Panel> {
        std::iter::once(&self.engine as &dyn Panel).chain(self.wheels.iter().map(|panel| panel as &dyn Panel))
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut dyn Panel> {
        std::iter::once(&mut self.engine as &mut dyn Panel)
            .chain(self.wheels.iter_mut().map(|panel| panel as &mut dyn Panel))
    }
}

pub struct Overlays {
    host: WinitHost,
    panels: Panels,
    config: Config,
    config_path: PathBuf,
    export_dir: PathBuf,
    session: Option<SessionInfo>,
    state_receiver: Receiver<Update>,
}

impl Overlays {
    pub fn new(
        config: Config,
        config_path: PathBuf,
        export_dir: PathBuf,
        state_receiver: Receiver<Update>,
    ) -> Result<Overlays, HostError> {
        let mut host = WinitHost::new();

        let engine = EnginePanel::new(&config, &mut host)?;
        let wheels = WheelPos::ALL
            .iter()
            .map(|wheel| WheelPanel::new(*wheel, &config, &mut host))
            .collect::<Result<Vec<_>, _>>()?;
        let mut panels = Panels { engine, wheels };

        // A fresh config has every window switched off, which would leave nothing on screen.
        if !panels.iter().any(|panel| panel.is_active()) {
            info!("No active windows configured, showing all of them");
            for panel in panels.iter_mut() {
                panel.set_active(&mut host, true);
            }
        }

        Ok(Overlays {
            host,
            panels,
            config,
            config_path,
            export_dir,
            session: None,
            state_receiver,
        })
    }

    fn drain_updates(&mut self) {
        while let Ok(update) = self.state_receiver.try_recv() {
            match update {
                Update::Session(session) => {
                    info!("New session: {} at {}", session.car_model, session.track);
                    self.session = Some(session);
                }
                Update::Telemetry(snapshot) => {
                    for panel in self.panels.iter_mut() {
                        panel.update(&snapshot);
                    }
                }
            }
        }
    }

    fn cycle_resolution(&mut self) {
        let resolution = self.config.size().next();
        info!("Switching overlay size to {}", resolution);
        self.config.set_size(resolution);
        for panel in self.panels.iter_mut() {
            panel.resize(&mut self.host, resolution);
        }
    }

    fn on_key(&mut self, window: WindowId, key: char) {
        match key {
            HIDE_KEY => {
                // Keep at least one window around to receive the show-all key.
                if self.panels.iter().filter(|panel| panel.is_active()).count() <= 1 {
                    info!("Not hiding the last visible window");
                    return;
                }
                if let Some(panel) = self.panels.iter_mut().find(|panel| panel.window_id() == window) {
                    info!("Hiding {} window", panel.id());
                    panel.set_active(&mut self.host, false);
                }
            }
            SHOW_ALL_KEY => {
                for panel in self.panels.iter_mut() {
                    panel.set_active(&mut self.host, true);
                }
            }
            key => {
                if let Some(capability) = Capability::from_hotkey(key) {
                    let enabled = toggle_option(&mut self.config, self.panels.iter_mut(), capability);
                    info!("{} {}", capability, if enabled { "enabled" } else { "disabled" });
                }
            }
        }
    }

    fn shutdown(&mut self) {
        for panel in self.panels.iter() {
            match self.host.position(panel.window_id()) {
                Ok(position) => self.config.set_window_position(panel.id(), position),
                Err(err) => warn!("Keeping old position for {}: {}", panel.id(), err),
            }
            self.config.set_window_active(panel.id(), panel.is_active());
        }
        if let Err(err) = self.config.save(&self.config_path) {
            error!("Failed to save config {}: {}", self.config_path.display(), err);
        }

        for panel in self.panels.wheels.iter().filter(|panel| panel.has_data_logged()) {
            let log = export::wheel_log(panel.wheel(), self.session.as_ref(), panel.data_log());
            match task::block_on(export::write_log(&self.export_dir, panel.wheel(), &log)) {
                Ok(path) => info!("Wrote {} samples to {}", log.records.len(), path.display()),
                Err(err) => error!("Failed to export {} log: {}", panel.wheel(), err),
            }
        }
    }

    pub fn start_event_loop(mut self) {
        let event_loop = match self.host.event_loop.take() {
            Some(event_loop) => event_loop,
            None => {
                error!("Event loop already started");
                return;
            }
        };

        event_loop.run(move |event, _window_target, control_flow| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                self.shutdown();
                *control_flow = ControlFlow::Exit;
            }

            Event::MainEventsCleared => {
                self.drain_updates();
                self.host.request_redraw();
            }

            Event::RedrawRequested(window_id) => {
                let window = match self.host.lookup(window_id) {
                    Some(window) => window,
                    None => {
                        error!("Unknown window with id {:?}", window_id);
                        return;
                    }
                };
                if let Some(panel) = self.panels.iter().find(|panel| panel.window_id() == window) {
                    if let Err(err) = self.host.draw(window, panel) {
                        error!("Error during draw: {}", err);
                        *control_flow = ControlFlow::Exit;
                    }
                }
            }

            Event::WindowEvent {
                window_id,
                event:
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button,
                        ..
                    },
            } => {
                let window = match self.host.lookup(window_id) {
                    Some(window) => window,
                    None => return,
                };
                match button {
                    MouseButton::Left => self.host.drag(window),
                    MouseButton::Right if window == self.panels.engine.window_id() => self.cycle_resolution(),
                    _ => {}
                }
            }

            Event::WindowEvent {
                window_id,
                event:
                    WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                state: ElementState::Pressed,
                                virtual_keycode: Some(key),
                                ..
                            },
                        ..
                    },
            } => {
                if let (Some(window), Some(key)) = (self.host.lookup(window_id), key_char(key)) {
                    self.on_key(window, key);
                }
            }

            _ => {}
        });
    }
}
