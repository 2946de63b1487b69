//! Per-tick samples and the conversions that produce them from a [`Snapshot`].

use std::fmt;
use std::str::FromStr;

use crate::assetto::Snapshot;

/// Standard gravity, m/s².
pub const GRAVITY: f32 = 9.80665;
/// Wheel load is displayed in units of 5 kgf.
pub const LOAD_UNIT_KGF: f32 = 5.0;
/// Raw dirt level is scaled onto a 0..4 display range.
pub const DIRT_SCALE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WheelPos {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

impl WheelPos {
    pub const ALL: [WheelPos; 4] = [
        WheelPos::FrontLeft,
        WheelPos::FrontRight,
        WheelPos::RearLeft,
        WheelPos::RearRight,
    ];

    pub fn index(self) -> usize {
        match self {
            WheelPos::FrontLeft => 0,
            WheelPos::FrontRight => 1,
            WheelPos::RearLeft => 2,
            WheelPos::RearRight => 3,
        }
    }

    pub fn is_left(self) -> bool {
        matches!(self, WheelPos::FrontLeft | WheelPos::RearLeft)
    }

    pub fn axle(self) -> usize {
        self.index() / 2
    }

    /// Index of the other wheel on the same axle.
    pub fn mate(self) -> usize {
        if self.is_left() {
            self.index() + 1
        } else {
            self.index() - 1
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WheelPos::FrontLeft => "FL",
            WheelPos::FrontRight => "FR",
            WheelPos::RearLeft => "RL",
            WheelPos::RearRight => "RR",
        }
    }
}

impl fmt::Display for WheelPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WheelPos {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        WheelPos::ALL
            .iter()
            .copied()
            .find(|wheel| wheel.name() == name)
            .ok_or_else(|| format!("Unknown wheel {}", name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelSample {
    pub camber_rad: f32,
    pub ride_height_mm: f32,
    pub suspension_travel: f32,
    pub suspension_max_travel: f32,
    pub tire_dirt_level: f32,
    pub tire_load_kgf_units: f32,
    pub tire_pressure: f32,
    pub tire_temp_inner: f32,
    pub tire_temp_middle: f32,
    pub tire_temp_outer: f32,
    pub tire_temp_core: f32,
    pub tire_wear_fraction: f32,
    pub timestamp: i32,
}

impl Default for WheelSample {
    fn default() -> Self {
        WheelSample {
            camber_rad: 0.0,
            ride_height_mm: 0.0,
            suspension_travel: 0.0,
            suspension_max_travel: 1.0,
            tire_dirt_level: 0.0,
            tire_load_kgf_units: 0.0,
            tire_pressure: 0.0,
            tire_temp_inner: 0.0,
            tire_temp_middle: 0.0,
            tire_temp_outer: 0.0,
            tire_temp_core: 0.0,
            tire_wear_fraction: 0.0,
            timestamp: 0,
        }
    }
}

impl WheelSample {
    /// Overwrites every field with this tick's values for `wheel`.
    ///
    /// Nothing is validated here: whatever the simulator wrote is converted and
    /// passed on, and the gauges clamp what they draw.
    pub fn update(&mut self, wheel: WheelPos, snapshot: &Snapshot) {
        let physics = &snapshot.physics;
        let index = wheel.index();

        self.camber_rad = physics.camber_rad[index];

        // Without a configured max travel, assume the wheel sits at mid travel.
        self.suspension_travel = physics.suspension_travel[index];
        let max_travel = snapshot.statics.suspension_max_travel[index];
        self.suspension_max_travel = if max_travel > 0.0 {
            max_travel
        } else {
            self.suspension_travel * 2.0
        };

        // Ride height is measured at the axle center, shift it by half the
        // travel difference to the other wheel of the axle.
        let travel_diff = self.suspension_travel - physics.suspension_travel[wheel.mate()];
        self.ride_height_mm = physics.ride_height[wheel.axle()] * 1000.0;
        self.ride_height_mm -= (travel_diff / 2.0) * 1000.0;

        self.tire_dirt_level = physics.tyre_dirty_level[index] * DIRT_SCALE;
        self.tire_load_kgf_units = physics.wheel_load[index] / (LOAD_UNIT_KGF * GRAVITY);
        self.tire_pressure = physics.wheels_pressure[index];
        self.tire_temp_core = physics.tyre_core_temperature[index];
        self.tire_temp_inner = physics.tyre_temp_i[index];
        self.tire_temp_middle = physics.tyre_temp_m[index];
        self.tire_temp_outer = physics.tyre_temp_o[index];
        self.tire_wear_fraction = physics.tyre_wear[index] / 100.0;

        self.timestamp = snapshot.graphics.i_current_time;
    }

    /// Suspension travel as a fraction of the max travel.
    pub fn suspension_ratio(&self) -> f32 {
        self.suspension_travel / self.suspension_max_travel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineSample {
    pub rpm: i32,
    pub max_rpm: i32,
    pub max_power: f32,
    pub max_torque: f32,
}

impl EngineSample {
    pub fn update(&mut self, snapshot: &Snapshot) {
        self.max_power = snapshot.statics.max_power;
        self.max_rpm = snapshot.statics.max_rpm;
        self.max_torque = snapshot.statics.max_torque;
        self.rpm = snapshot.physics.rpms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.physics.camber_rad = [-0.052, -0.048, -0.021, -0.019];
        snapshot.physics.suspension_travel = [0.05, 0.03, 0.04, 0.04];
        snapshot.physics.ride_height = [0.100, 0.120];
        snapshot.physics.tyre_dirty_level = [0.0, 0.25, 0.5, 1.0];
        snapshot.physics.wheel_load = [980.665, 4903.325, 0.0, 2451.6625];
        snapshot.physics.wheels_pressure = [27.5, 27.8, 26.1, 26.4];
        snapshot.physics.tyre_core_temperature = [81.0, 82.0, 79.0, 78.5];
        snapshot.physics.tyre_temp_i = [90.0, 91.0, 85.0, 86.0];
        snapshot.physics.tyre_temp_m = [88.0, 89.0, 84.0, 83.0];
        snapshot.physics.tyre_temp_o = [84.0, 85.0, 80.0, 81.0];
        snapshot.physics.tyre_wear = [100.0, 97.5, 50.0, 0.0];
        snapshot.statics.suspension_max_travel = [0.11, 0.11, 0.0, -1.0];
        snapshot.graphics.i_current_time = 73_410;
        snapshot
    }

    fn sample(wheel: WheelPos, snapshot: &Snapshot) -> WheelSample {
        let mut sample = WheelSample::default();
        sample.update(wheel, snapshot);
        sample
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn wheel_identity() {
        assert_eq!(WheelPos::FrontLeft.mate(), 1);
        assert_eq!(WheelPos::FrontRight.mate(), 0);
        assert_eq!(WheelPos::RearLeft.mate(), 3);
        assert_eq!(WheelPos::RearRight.mate(), 2);
        assert_eq!(WheelPos::RearLeft.axle(), 1);
        assert!(!WheelPos::RearRight.is_left());
        assert_eq!("RL".parse::<WheelPos>(), Ok(WheelPos::RearLeft));
        assert!("XX".parse::<WheelPos>().is_err());
    }

    #[test]
    fn max_travel_uses_static_value_when_positive() {
        let snapshot = snapshot();
        for wheel in WheelPos::ALL {
            let sample = sample(wheel, &snapshot);
            let configured = snapshot.statics.suspension_max_travel[wheel.index()];
            if configured > 0.0 {
                assert_eq!(sample.suspension_max_travel, configured);
            } else {
                assert_eq!(sample.suspension_max_travel, 2.0 * sample.suspension_travel);
                assert_close(sample.suspension_ratio(), 0.5);
            }
        }
    }

    #[test]
    fn ride_height_is_corrected_by_half_the_travel_difference() {
        let snapshot = snapshot();
        assert_close(sample(WheelPos::FrontLeft, &snapshot).ride_height_mm, 90.0);
        assert_close(sample(WheelPos::FrontRight, &snapshot).ride_height_mm, 110.0);
        assert_close(sample(WheelPos::RearLeft, &snapshot).ride_height_mm, 120.0);
    }

    #[test]
    fn load_is_expressed_in_five_kgf_units() {
        let snapshot = snapshot();
        assert_close(sample(WheelPos::FrontLeft, &snapshot).tire_load_kgf_units, 20.0);
        assert_close(sample(WheelPos::FrontRight, &snapshot).tire_load_kgf_units, 100.0);
        assert_close(sample(WheelPos::RearRight, &snapshot).tire_load_kgf_units, 50.0);
    }

    #[test]
    fn wear_and_dirt_scaling() {
        let snapshot = snapshot();
        let expected_wear = [1.0, 0.975, 0.5, 0.0];
        let expected_dirt = [0.0, 1.0, 2.0, 4.0];
        for wheel in WheelPos::ALL {
            let sample = sample(wheel, &snapshot);
            assert_close(sample.tire_wear_fraction, expected_wear[wheel.index()]);
            assert_close(sample.tire_dirt_level, expected_dirt[wheel.index()]);
        }
    }

    #[test]
    fn direct_reads_are_copied() {
        let snapshot = snapshot();
        let sample = sample(WheelPos::FrontRight, &snapshot);
        assert_eq!(sample.camber_rad, -0.048);
        assert_eq!(sample.tire_pressure, 27.8);
        assert_eq!(sample.tire_temp_inner, 91.0);
        assert_eq!(sample.tire_temp_middle, 89.0);
        assert_eq!(sample.tire_temp_outer, 85.0);
        assert_eq!(sample.tire_temp_core, 82.0);
        assert_eq!(sample.timestamp, 73_410);
    }

    #[test]
    fn engine_fields_are_copied_verbatim() {
        let mut snapshot = snapshot();
        snapshot.physics.rpms = 6420;
        snapshot.statics.max_rpm = 7800;
        snapshot.statics.max_power = 412.5;
        snapshot.statics.max_torque = 530.0;

        let mut engine = EngineSample::default();
        engine.update(&snapshot);
        assert_eq!(
            engine,
            EngineSample {
                rpm: 6420,
                max_rpm: 7800,
                max_power: 412.5,
                max_torque: 530.0,
            }
        );
    }
}
