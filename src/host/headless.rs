//! A host without a display. Windows are plain records and every draw call is
//! kept in order, which is enough to run panels with no rendering backend.

use crate::host::{Align, Canvas, Color, HostError, Point, Rect, Size, WindowHost, WindowId};

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessWindow {
    pub title: String,
    pub position: (i32, i32),
    pub size: Size,
    pub background_opacity: f32,
    pub border: bool,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct HeadlessHost {
    windows: Vec<HeadlessWindow>,
}

impl HeadlessHost {
    pub fn new() -> HeadlessHost {
        HeadlessHost::default()
    }

    pub fn window(&self, window: WindowId) -> Option<&HeadlessWindow> {
        self.windows.get(window)
    }

    pub fn windows(&self) -> &[HeadlessWindow] {
        &self.windows
    }

    fn with_window(&mut self, window: WindowId, apply: impl FnOnce(&mut HeadlessWindow)) {
        match self.windows.get_mut(window) {
            Some(state) => apply(state),
            None => warn!("Ignoring call for unknown window {}", window),
        }
    }
}

impl WindowHost for HeadlessHost {
    fn create_window(&mut self, title: &str) -> Result<WindowId, HostError> {
        self.windows.push(HeadlessWindow {
            title: title.to_string(),
            position: (0, 0),
            size: Size::default(),
            background_opacity: 1.0,
            border: true,
            visible: true,
        });
        Ok(self.windows.len() - 1)
    }

    fn set_position(&mut self, window: WindowId, position: (i32, i32)) {
        self.with_window(window, |state| state.position = position);
    }

    fn position(&self, window: WindowId) -> Result<(i32, i32), HostError> {
        self.windows
            .get(window)
            .map(|state| state.position)
            .ok_or(HostError::UnknownWindow(window))
    }

    fn set_size(&mut self, window: WindowId, size: Size) {
        self.with_window(window, |state| state.size = size);
    }

    fn set_background_opacity(&mut self, window: WindowId, opacity: f32) {
        self.with_window(window, |state| state.background_opacity = opacity);
    }

    fn set_border(&mut self, window: WindowId, visible: bool) {
        self.with_window(window, |state| state.border = visible);
    }

    fn set_title(&mut self, window: WindowId, title: &str) {
        self.with_window(window, |state| state.title = title.to_string());
    }

    fn set_visible(&mut self, window: WindowId, visible: bool) {
        self.with_window(window, |state| state.visible = visible);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    FillRect(Rect, Color),
    StrokeRect(Rect, f32, Color),
    FillCircle(Point, f32, Color),
    Text(String, Point, f32, Align, Color),
    Clear(Rect),
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> RecordingCanvas {
        RecordingCanvas::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text(text, ..) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clears(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Clear(rect) => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        self.calls.push(DrawCall::StrokeRect(rect, width, color));
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.calls.push(DrawCall::FillCircle(center, radius, color));
    }

    fn draw_text(&mut self, text: &str, origin: Point, size: f32, align: Align, color: Color) {
        self.calls
            .push(DrawCall::Text(text.to_string(), origin, size, align, color));
    }

    fn clear(&mut self, rect: Rect) {
        self.calls.push(DrawCall::Clear(rect));
    }
}
