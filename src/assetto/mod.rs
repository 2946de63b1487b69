pub mod data_producer;
pub mod layout;
#[cfg(windows)]
pub mod shared_memory;

/// One value per wheel, indexed FL, FR, RL, RR.
pub type PerWheel = [f32; 4];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Physics {
    pub packet_id: i32,
    pub rpms: i32,
    pub wheel_load: PerWheel,
    pub wheels_pressure: PerWheel,
    pub tyre_wear: PerWheel,
    pub tyre_dirty_level: PerWheel,
    pub tyre_core_temperature: PerWheel,
    pub camber_rad: PerWheel,
    pub suspension_travel: PerWheel,
    /// Front and rear axle, in meters.
    pub ride_height: [f32; 2],
    pub tyre_temp_i: PerWheel,
    pub tyre_temp_m: PerWheel,
    pub tyre_temp_o: PerWheel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Graphics {
    pub packet_id: i32,
    pub status: Status,
    pub i_current_time: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Statics {
    pub max_torque: f32,
    pub max_power: f32,
    pub max_rpm: i32,
    pub suspension_max_travel: PerWheel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Off,
    Replay,
    Live,
    Pause,
}

impl From<i32> for Status {
    fn from(raw: i32) -> Self {
        match raw {
            1 => Status::Replay,
            2 => Status::Live,
            3 => Status::Pause,
            _ => Status::Off,
        }
    }
}

/// Everything the panels read during one tick. Shared read-only by all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Snapshot {
    pub physics: Physics,
    pub graphics: Graphics,
    pub statics: Statics,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionInfo {
    pub car_model: String,
    pub track: String,
    pub track_configuration: String,
}

#[derive(Debug, Clone)]
pub enum Update {
    Session(SessionInfo),
    Telemetry(Snapshot),
}
