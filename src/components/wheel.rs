use crate::components::{temperature_color, unit_fraction, Component, Frame};
use crate::host::{Align, Canvas, Color, Point, Rect};
use crate::metrics::{WheelPos, WheelSample, DIRT_SCALE};
use crate::options::{Capability, Resolution};

/// Width of a wheel window at multiplier 1.0. Right wheels mirror the layout
/// so that the text column always faces away from the car.
pub const WINDOW_WIDTH: f32 = 512.0;
pub const WINDOW_HEIGHT: f32 = 271.0;

const TIRE: Rect = Rect { x: 176.0, y: 24.0, width: 128.0, height: 200.0 };
const SUSPENSION: Rect = Rect { x: 320.0, y: 24.0, width: 16.0, height: 200.0 };
const CAMBER: Rect = Rect { x: 16.0, y: 24.0, width: 144.0, height: 40.0 };
const HEIGHT: Rect = Rect { x: 16.0, y: 80.0, width: 144.0, height: 40.0 };
const PRESSURE: Rect = Rect { x: 16.0, y: 136.0, width: 144.0, height: 40.0 };
const WEAR: Rect = Rect { x: 16.0, y: 192.0, width: 144.0, height: 32.0 };
const LOAD_RADIUS: f32 = 56.0;

const TEXT_SIZE: f32 = 24.0;
const SMALL_TEXT_SIZE: f32 = 14.0;
const GAUGE_BACKGROUND: Color = Color::rgba(0.1, 0.1, 0.1, 0.6);
const GAUGE_FILL: Color = Color::rgba(0.9, 0.9, 0.9, 0.9);
const TIRE_OUTLINE: Color = Color::rgba(0.15, 0.15, 0.15, 1.0);
const DIRT: Color = Color::rgba(0.45, 0.3, 0.15, 0.6);
const LOAD: Color = Color::rgba(1.0, 1.0, 1.0, 0.45);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelGauge {
    Temps,
    Dirt,
    Tire,
    Camber,
    Suspension,
    Height,
    Pressure,
    Wear,
    Load,
}

impl WheelGauge {
    /// Render order. Load overlaps the tire gauges and has to come last.
    pub const ORDER: [WheelGauge; 9] = [
        WheelGauge::Temps,
        WheelGauge::Dirt,
        WheelGauge::Tire,
        WheelGauge::Camber,
        WheelGauge::Suspension,
        WheelGauge::Height,
        WheelGauge::Pressure,
        WheelGauge::Wear,
        WheelGauge::Load,
    ];

    pub fn capability(self) -> Capability {
        match self {
            WheelGauge::Temps => Capability::Temps,
            WheelGauge::Dirt => Capability::Dirt,
            WheelGauge::Tire => Capability::Tire,
            WheelGauge::Camber => Capability::Camber,
            WheelGauge::Suspension => Capability::Suspension,
            WheelGauge::Height => Capability::Height,
            WheelGauge::Pressure => Capability::Pressure,
            WheelGauge::Wear => Capability::Wear,
            WheelGauge::Load => Capability::Load,
        }
    }

    fn base(self) -> Rect {
        match self {
            WheelGauge::Temps | WheelGauge::Dirt | WheelGauge::Tire => TIRE,
            WheelGauge::Camber => CAMBER,
            WheelGauge::Suspension => SUSPENSION,
            WheelGauge::Height => HEIGHT,
            WheelGauge::Pressure => PRESSURE,
            WheelGauge::Wear => WEAR,
            WheelGauge::Load => {
                let center = TIRE.center();
                Rect::new(
                    center.x - LOAD_RADIUS,
                    center.y - LOAD_RADIUS,
                    LOAD_RADIUS * 2.0,
                    LOAD_RADIUS * 2.0,
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelComponent {
    gauge: WheelGauge,
    frame: Frame,
    /// Highest load seen this session, the full-scale value of the load gauge.
    peak_load: f32,
}

impl WheelComponent {
    pub fn new(gauge: WheelGauge, wheel: WheelPos, resolution: Resolution) -> WheelComponent {
        let frame = if wheel.is_left() {
            Frame::new(gauge.base(), resolution)
        } else {
            Frame::mirrored(gauge.base(), WINDOW_WIDTH, resolution)
        };
        WheelComponent {
            gauge,
            frame,
            peak_load: 0.0,
        }
    }

    pub fn gauge(&self) -> WheelGauge {
        self.gauge
    }

    pub fn bounds(&self) -> Rect {
        self.frame.bounds()
    }

    fn draw_value(&self, text: &str, canvas: &mut dyn Canvas) {
        let (origin, align) = self.frame.text_anchor(28.0);
        canvas.draw_text(text, origin, self.frame.scale(TEXT_SIZE), align, Color::WHITE);
    }

    fn draw_temps(&self, sample: &WheelSample, canvas: &mut dyn Canvas) {
        let bounds = self.frame.bounds();
        let third = bounds.width / 3.0;
        // Left to right across the window: the outer shoulder faces away from the car.
        let mut temps = [sample.tire_temp_outer, sample.tire_temp_middle, sample.tire_temp_inner];
        if self.frame.is_mirrored() {
            temps.reverse();
        }
        for (column, temp) in temps.iter().enumerate() {
            let rect = Rect::new(bounds.x + third * column as f32, bounds.y, third, bounds.height);
            canvas.fill_rect(rect, temperature_color(*temp));
            canvas.draw_text(
                &format!("{:.0}", temp),
                Point::new(rect.center().x, rect.y + rect.height - self.frame.scale(8.0)),
                self.frame.scale(SMALL_TEXT_SIZE),
                Align::Center,
                Color::BLACK,
            );
        }
    }

    fn draw_tire(&self, sample: &WheelSample, canvas: &mut dyn Canvas) {
        let bounds = self.frame.bounds();
        canvas.stroke_rect(bounds, self.frame.scale(6.0), TIRE_OUTLINE);
        canvas.draw_text(
            &format!("{:.0}°C", sample.tire_temp_core),
            Point::new(bounds.center().x, bounds.y + self.frame.scale(24.0)),
            self.frame.scale(SMALL_TEXT_SIZE),
            Align::Center,
            temperature_color(sample.tire_temp_core),
        );
    }

    fn draw_bar(&self, fill: Rect, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.frame.bounds(), GAUGE_BACKGROUND);
        canvas.fill_rect(fill, GAUGE_FILL);
    }

    fn draw_load(&self, sample: &WheelSample, canvas: &mut dyn Canvas) {
        let bounds = self.frame.bounds();
        let fraction = if self.peak_load > 0.0 {
            unit_fraction(sample.tire_load_kgf_units / self.peak_load)
        } else {
            0.0
        };
        canvas.fill_circle(bounds.center(), bounds.width / 2.0 * fraction, LOAD);
    }
}

impl Component for WheelComponent {
    type Sample = WheelSample;

    fn update(&mut self, sample: &WheelSample) {
        if self.gauge == WheelGauge::Load
            && sample.tire_load_kgf_units.is_finite()
            && sample.tire_load_kgf_units > self.peak_load
        {
            self.peak_load = sample.tire_load_kgf_units;
        }
    }

    fn draw(&self, sample: &WheelSample, canvas: &mut dyn Canvas) {
        match self.gauge {
            WheelGauge::Temps => self.draw_temps(sample, canvas),
            WheelGauge::Dirt => {
                let coverage = unit_fraction(sample.tire_dirt_level / DIRT_SCALE);
                canvas.fill_rect(self.frame.bounds().bottom_fraction(coverage), DIRT);
            }
            WheelGauge::Tire => self.draw_tire(sample, canvas),
            WheelGauge::Camber => {
                self.draw_value(&format!("{:.2}°", sample.camber_rad.to_degrees()), canvas)
            }
            WheelGauge::Suspension => {
                let fill = self
                    .frame
                    .bounds()
                    .bottom_fraction(unit_fraction(sample.suspension_ratio()));
                self.draw_bar(fill, canvas);
            }
            WheelGauge::Height => self.draw_value(&format!("{:.1} mm", sample.ride_height_mm), canvas),
            WheelGauge::Pressure => self.draw_value(&format!("{:.1} psi", sample.tire_pressure), canvas),
            WheelGauge::Wear => {
                let wear = unit_fraction(sample.tire_wear_fraction);
                let bounds = self.frame.bounds();
                let fill = if self.frame.is_mirrored() {
                    let width = bounds.width * wear;
                    Rect::new(bounds.x + bounds.width - width, bounds.y, width, bounds.height)
                } else {
                    bounds.left_fraction(wear)
                };
                self.draw_bar(fill, canvas);
                let (origin, align) = self.frame.text_anchor(24.0);
                canvas.draw_text(
                    &format!("{:.1}%", wear * 100.0),
                    origin,
                    self.frame.scale(SMALL_TEXT_SIZE),
                    align,
                    Color::BLACK,
                );
            }
            WheelGauge::Load => self.draw_load(sample, canvas),
        }
    }

    fn resize(&mut self, resolution: Resolution) {
        self.frame.resize(resolution);
    }

    fn clear(&self, canvas: &mut dyn Canvas) {
        canvas.clear(self.frame.bounds());
    }
}
