//! Raw page layouts of the simulator's shared memory.
//!
//! Only the leading part of each page is declared: everything up to the last
//! field this crate reads. The mapped views are larger than these structs, so
//! reading a prefix is always in bounds.

use crate::assetto::{Graphics, Physics, SessionInfo, Snapshot, Statics};

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPhysics {
    pub packet_id: i32,
    pub gas: f32,
    pub brake: f32,
    pub fuel: f32,
    pub gear: i32,
    pub rpms: i32,
    pub steer_angle: f32,
    pub speed_kmh: f32,
    pub velocity: [f32; 3],
    pub acc_g: [f32; 3],
    pub wheel_slip: [f32; 4],
    pub wheel_load: [f32; 4],
    pub wheels_pressure: [f32; 4],
    pub wheel_angular_speed: [f32; 4],
    pub tyre_wear: [f32; 4],
    pub tyre_dirty_level: [f32; 4],
    pub tyre_core_temperature: [f32; 4],
    pub camber_rad: [f32; 4],
    pub suspension_travel: [f32; 4],
    pub drs: f32,
    pub tc: f32,
    pub heading: f32,
    pub pitch: f32,
    pub roll: f32,
    pub cg_height: f32,
    pub car_damage: [f32; 5],
    pub number_of_tyres_out: i32,
    pub pit_limiter_on: i32,
    pub abs: f32,
    pub kers_charge: f32,
    pub kers_input: f32,
    pub auto_shifter_on: i32,
    pub ride_height: [f32; 2],
    pub turbo_boost: f32,
    pub ballast: f32,
    pub air_density: f32,
    pub air_temp: f32,
    pub road_temp: f32,
    pub local_angular_vel: [f32; 3],
    pub final_ff: f32,
    pub performance_meter: f32,
    pub engine_brake: i32,
    pub ers_recovery_level: i32,
    pub ers_power_level: i32,
    pub ers_heat_charging: i32,
    pub ers_is_charging: i32,
    pub kers_current_kj: f32,
    pub drs_available: i32,
    pub drs_enabled: i32,
    pub brake_temp: [f32; 4],
    pub clutch: f32,
    pub tyre_temp_i: [f32; 4],
    pub tyre_temp_m: [f32; 4],
    pub tyre_temp_o: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RawGraphics {
    pub packet_id: i32,
    pub status: i32,
    pub session: i32,
    pub current_time: [u16; 15],
    pub last_time: [u16; 15],
    pub best_time: [u16; 15],
    pub split: [u16; 15],
    pub completed_laps: i32,
    pub position: i32,
    pub i_current_time: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawStatic {
    pub sm_version: [u16; 15],
    pub ac_version: [u16; 15],
    pub number_of_sessions: i32,
    pub num_cars: i32,
    pub car_model: [u16; 33],
    pub track: [u16; 33],
    pub player_name: [u16; 33],
    pub player_surname: [u16; 33],
    pub player_nick: [u16; 33],
    pub sector_count: i32,
    pub max_torque: f32,
    pub max_power: f32,
    pub max_rpm: i32,
    pub max_fuel: f32,
    pub suspension_max_travel: [f32; 4],
    pub tyre_radius: [f32; 4],
    pub max_turbo_boost: f32,
    pub deprecated_1: f32,
    pub deprecated_2: f32,
    pub penalties_enabled: i32,
    pub aid_fuel_rate: f32,
    pub aid_tire_rate: f32,
    pub aid_mechanical_damage: f32,
    pub aid_allow_tyre_blankets: i32,
    pub aid_stability: f32,
    pub aid_auto_clutch: i32,
    pub aid_auto_blip: i32,
    pub has_drs: i32,
    pub has_ers: i32,
    pub has_kers: i32,
    pub kers_max_j: f32,
    pub engine_brake_settings_count: i32,
    pub ers_power_controller_count: i32,
    pub track_spline_length: f32,
    pub track_configuration: [u16; 33],
}

// [u16; 33] has no Default impl.
impl Default for RawStatic {
    fn default() -> Self {
        RawStatic {
            sm_version: [0; 15],
            ac_version: [0; 15],
            number_of_sessions: 0,
            num_cars: 0,
            car_model: [0; 33],
            track: [0; 33],
            player_name: [0; 33],
            player_surname: [0; 33],
            player_nick: [0; 33],
            sector_count: 0,
            max_torque: 0.0,
            max_power: 0.0,
            max_rpm: 0,
            max_fuel: 0.0,
            suspension_max_travel: [0.0; 4],
            tyre_radius: [0.0; 4],
            max_turbo_boost: 0.0,
            deprecated_1: 0.0,
            deprecated_2: 0.0,
            penalties_enabled: 0,
            aid_fuel_rate: 0.0,
            aid_tire_rate: 0.0,
            aid_mechanical_damage: 0.0,
            aid_allow_tyre_blankets: 0,
            aid_stability: 0.0,
            aid_auto_clutch: 0,
            aid_auto_blip: 0,
            has_drs: 0,
            has_ers: 0,
            has_kers: 0,
            kers_max_j: 0.0,
            engine_brake_settings_count: 0,
            ers_power_controller_count: 0,
            track_spline_length: 0.0,
            track_configuration: [0; 33],
        }
    }
}

/// Decodes a NUL-terminated UTF-16 string field.
pub fn read_string(chars: &[u16]) -> String {
    let len = chars.iter().position(|&c| c == 0).unwrap_or(chars.len());
    String::from_utf16_lossy(&chars[..len])
}

impl From<&RawPhysics> for Physics {
    fn from(raw: &RawPhysics) -> Self {
        Physics {
            packet_id: raw.packet_id,
            rpms: raw.rpms,
            wheel_load: raw.wheel_load,
            wheels_pressure: raw.wheels_pressure,
            tyre_wear: raw.tyre_wear,
            tyre_dirty_level: raw.tyre_dirty_level,
            tyre_core_temperature: raw.tyre_core_temperature,
            camber_rad: raw.camber_rad,
            suspension_travel: raw.suspension_travel,
            ride_height: raw.ride_height,
            tyre_temp_i: raw.tyre_temp_i,
            tyre_temp_m: raw.tyre_temp_m,
            tyre_temp_o: raw.tyre_temp_o,
        }
    }
}

impl From<&RawGraphics> for Graphics {
    fn from(raw: &RawGraphics) -> Self {
        Graphics {
            packet_id: raw.packet_id,
            status: raw.status.into(),
            i_current_time: raw.i_current_time,
        }
    }
}

impl From<&RawStatic> for Statics {
    fn from(raw: &RawStatic) -> Self {
        Statics {
            max_torque: raw.max_torque,
            max_power: raw.max_power,
            max_rpm: raw.max_rpm,
            suspension_max_travel: raw.suspension_max_travel,
        }
    }
}

impl From<&RawStatic> for SessionInfo {
    fn from(raw: &RawStatic) -> Self {
        SessionInfo {
            car_model: read_string(&raw.car_model),
            track: read_string(&raw.track),
            track_configuration: read_string(&raw.track_configuration),
        }
    }
}

pub fn snapshot(physics: &RawPhysics, graphics: &RawGraphics, statics: &RawStatic) -> Snapshot {
    Snapshot {
        physics: physics.into(),
        graphics: graphics.into(),
        statics: statics.into(),
    }
}
