//! The narrow interface between panels and whatever owns the windows.
//!
//! Panels create and place their window through [`WindowHost`] and render
//! through [`Canvas`]; nothing else in the crate talks to a windowing or
//! drawing API.

pub mod headless;

use thiserror::Error;

pub type WindowId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Point {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Size {
        Size { width, height }
    }

    pub fn scaled(self, multiplier: f32) -> Size {
        Size::new(self.width * multiplier, self.height * multiplier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect { x, y, width, height }
    }

    pub fn scaled(self, multiplier: f32) -> Rect {
        Rect::new(
            self.x * multiplier,
            self.y * multiplier,
            self.width * multiplier,
            self.height * multiplier,
        )
    }

    /// Reflects the rect horizontally inside a container of `width`.
    pub fn mirrored(self, width: f32) -> Rect {
        Rect::new(width - self.x - self.width, self.y, self.width, self.height)
    }

    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The bottom `fraction` of the rect, as used by vertical bar gauges.
    pub fn bottom_fraction(self, fraction: f32) -> Rect {
        let height = self.height * fraction;
        Rect::new(self.x, self.y + self.height - height, self.width, height)
    }

    pub fn left_fraction(self, fraction: f32) -> Rect {
        Rect::new(self.x, self.y, self.width * fraction, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |from: f32, to: f32| from * (1.0 - t) + to * t;
        Color::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Drawing primitives for one window. Coordinates are window-local pixels.
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);
    /// `origin` is the baseline anchor; `align` decides which end of the text it is.
    fn draw_text(&mut self, text: &str, origin: Point, size: f32, align: Align, color: Color);
    /// Erases everything previously drawn inside `rect`.
    fn clear(&mut self, rect: Rect);
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("window host cannot create window {0}")]
    WindowUnavailable(String),
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),
}

pub trait WindowHost {
    fn create_window(&mut self, title: &str) -> Result<WindowId, HostError>;
    fn set_position(&mut self, window: WindowId, position: (i32, i32));
    fn position(&self, window: WindowId) -> Result<(i32, i32), HostError>;
    fn set_size(&mut self, window: WindowId, size: Size);
    fn set_background_opacity(&mut self, window: WindowId, opacity: f32);
    fn set_border(&mut self, window: WindowId, visible: bool);
    fn set_title(&mut self, window: WindowId, title: &str);
    fn set_visible(&mut self, window: WindowId, visible: bool);
}
