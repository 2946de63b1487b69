use crate::components::{unit_fraction, Component, Frame};
use crate::host::{Align, Canvas, Color, Point, Rect};
use crate::metrics::EngineSample;
use crate::options::Resolution;

pub const WINDOW_WIDTH: f32 = 512.0;
pub const WINDOW_HEIGHT: f32 = 85.0;

const AREA: Rect = Rect { x: 8.0, y: 8.0, width: 496.0, height: 69.0 };
const BAR_HEIGHT: f32 = 24.0;
/// Past this share of the max rpm the bar turns to the shift colour.
const SHIFT_RATIO: f32 = 0.9;

const BAR_BACKGROUND: Color = Color::rgba(0.1, 0.1, 0.1, 0.6);
const BAR: Color = Color::rgba(0.2, 0.9, 0.3, 0.9);
const SHIFT: Color = Color::rgba(1.0, 0.2, 0.1, 0.9);
const PEAK_MARKER: Color = Color::rgba(1.0, 1.0, 1.0, 0.8);

/// RPM bar with the session's peak rpm and the engine's rated figures.
#[derive(Debug, Clone, PartialEq)]
pub struct RpmPower {
    frame: Frame,
    peak_rpm: i32,
}

impl RpmPower {
    pub fn new(resolution: Resolution) -> RpmPower {
        RpmPower {
            frame: Frame::new(AREA, resolution),
            peak_rpm: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.frame.bounds()
    }

    fn ratio(rpm: i32, max_rpm: i32) -> f32 {
        if max_rpm > 0 {
            unit_fraction(rpm as f32 / max_rpm as f32)
        } else {
            0.0
        }
    }
}

impl Component for RpmPower {
    type Sample = EngineSample;

    fn update(&mut self, sample: &EngineSample) {
        self.peak_rpm = self.peak_rpm.max(sample.rpm);
    }

    fn draw(&self, sample: &EngineSample, canvas: &mut dyn Canvas) {
        let bounds = self.frame.bounds();
        let bar = Rect::new(bounds.x, bounds.y, bounds.width, self.frame.scale(BAR_HEIGHT));
        let ratio = RpmPower::ratio(sample.rpm, sample.max_rpm);

        canvas.fill_rect(bar, BAR_BACKGROUND);
        canvas.fill_rect(
            bar.left_fraction(ratio),
            if ratio >= SHIFT_RATIO { SHIFT } else { BAR },
        );

        let peak = RpmPower::ratio(self.peak_rpm, sample.max_rpm);
        if peak > 0.0 {
            let marker = self.frame.scale(3.0);
            canvas.fill_rect(
                Rect::new(bar.x + bar.width * peak - marker, bar.y, marker, bar.height),
                PEAK_MARKER,
            );
        }

        let baseline = bounds.y + bounds.height - self.frame.scale(8.0);
        let size = self.frame.scale(24.0);
        canvas.draw_text(
            &format!("{} / {} rpm", sample.rpm, sample.max_rpm),
            Point::new(bounds.x, baseline),
            size,
            Align::Left,
            Color::WHITE,
        );
        canvas.draw_text(
            &format!("{:.0} W  {:.0} Nm", sample.max_power, sample.max_torque),
            Point::new(bounds.x + bounds.width, baseline),
            size,
            Align::Right,
            Color::WHITE,
        );
    }

    fn resize(&mut self, resolution: Resolution) {
        self.frame.resize(resolution);
    }

    fn clear(&self, canvas: &mut dyn Canvas) {
        canvas.clear(self.frame.bounds());
    }
}

/// Name of the current size preset, drawn over the middle of the rpm bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeLabel {
    frame: Frame,
    resolution: Resolution,
}

impl SizeLabel {
    pub fn new(resolution: Resolution) -> SizeLabel {
        SizeLabel {
            frame: Frame::new(Rect::new(AREA.x, AREA.y, AREA.width, BAR_HEIGHT), resolution),
            resolution,
        }
    }

    pub fn resize(&mut self, resolution: Resolution) {
        self.frame.resize(resolution);
        self.resolution = resolution;
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let bounds = self.frame.bounds();
        canvas.draw_text(
            self.resolution.name(),
            Point::new(bounds.center().x, bounds.y + self.frame.scale(18.0)),
            self.frame.scale(16.0),
            Align::Center,
            Color::WHITE,
        );
    }
}
