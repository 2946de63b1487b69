pub mod engine;
pub mod wheel;

use crate::host::{Align, Canvas, Color, Point, Rect};
use crate::options::Resolution;

pub use engine::{RpmPower, SizeLabel};
pub use wheel::{WheelComponent, WheelGauge};

/// A gauge inside a panel window.
pub trait Component {
    type Sample;

    /// Called once per tick with the freshly sampled values.
    fn update(&mut self, sample: &Self::Sample);
    fn draw(&self, sample: &Self::Sample, canvas: &mut dyn Canvas);
    fn resize(&mut self, resolution: Resolution);
    /// Erases the gauge's whole footprint.
    fn clear(&self, canvas: &mut dyn Canvas);
}

/// Where a gauge sits in its window. The base rect is laid out at multiplier
/// 1.0; the current bounds always derive from it, so resizing never accumulates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    base: Rect,
    multiplier: f32,
    mirrored: bool,
}

impl Frame {
    pub fn new(base: Rect, resolution: Resolution) -> Frame {
        Frame {
            base,
            multiplier: resolution.multiplier(),
            mirrored: false,
        }
    }

    /// Same gauge reflected inside a window of `window_width`.
    pub fn mirrored(base: Rect, window_width: f32, resolution: Resolution) -> Frame {
        Frame {
            base: base.mirrored(window_width),
            multiplier: resolution.multiplier(),
            mirrored: true,
        }
    }

    pub fn resize(&mut self, resolution: Resolution) {
        self.multiplier = resolution.multiplier();
    }

    pub fn bounds(&self) -> Rect {
        self.base.scaled(self.multiplier)
    }

    pub fn scale(&self, value: f32) -> f32 {
        value * self.multiplier
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Anchor for a line of text `baseline` pixels below the top of the frame,
    /// hugging the outer edge.
    pub fn text_anchor(&self, baseline: f32) -> (Point, Align) {
        let bounds = self.bounds();
        let y = bounds.y + self.scale(baseline);
        if self.mirrored {
            (Point::new(bounds.x + bounds.width, y), Align::Right)
        } else {
            (Point::new(bounds.x, y), Align::Left)
        }
    }
}

/// Clamps a gauge fraction to [0, 1]; anything non-finite reads as empty.
pub fn unit_fraction(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

const COLD: Color = Color::rgba(0.2, 0.4, 1.0, 1.0);
const OPTIMAL: Color = Color::rgba(0.2, 0.9, 0.3, 1.0);
const HOT: Color = Color::rgba(1.0, 0.2, 0.1, 1.0);
const COLD_CELSIUS: f32 = 50.0;
const OPTIMAL_CELSIUS: f32 = 80.0;
const HOT_CELSIUS: f32 = 110.0;

pub fn temperature_color(celsius: f32) -> Color {
    if !celsius.is_finite() {
        return Color::WHITE;
    }
    if celsius < OPTIMAL_CELSIUS {
        COLD.lerp(OPTIMAL, (celsius - COLD_CELSIUS) / (OPTIMAL_CELSIUS - COLD_CELSIUS))
    } else {
        OPTIMAL.lerp(HOT, (celsius - OPTIMAL_CELSIUS) / (HOT_CELSIUS - OPTIMAL_CELSIUS))
    }
}
