//! Session log export: one protobuf `WheelLog` per wheel that logged data.

use std::path::{Path, PathBuf};

use async_std::fs;
use prost::Message;

use crate::assetto::SessionInfo;
use crate::metrics::{WheelPos, WheelSample};

pub const LOG_DIR_ENV: &str = "LIVE_TELEMETRY_LOG_DIR";

#[derive(Clone, PartialEq, Message)]
pub struct WheelRecord {
    #[prost(int32, tag = "1")]
    pub timestamp: i32,
    #[prost(float, tag = "2")]
    pub camber_rad: f32,
    #[prost(float, tag = "3")]
    pub ride_height_mm: f32,
    #[prost(float, tag = "4")]
    pub suspension_travel: f32,
    #[prost(float, tag = "5")]
    pub suspension_max_travel: f32,
    #[prost(float, tag = "6")]
    pub tire_dirt_level: f32,
    #[prost(float, tag = "7")]
    pub tire_load_kgf_units: f32,
    #[prost(float, tag = "8")]
    pub tire_pressure: f32,
    #[prost(float, tag = "9")]
    pub tire_temp_inner: f32,
    #[prost(float, tag = "10")]
    pub tire_temp_middle: f32,
    #[prost(float, tag = "11")]
    pub tire_temp_outer: f32,
    #[prost(float, tag = "12")]
    pub tire_temp_core: f32,
    #[prost(float, tag = "13")]
    pub tire_wear_fraction: f32,
}

#[derive(Clone, PartialEq, Message)]
pub struct WheelLog {
    #[prost(string, tag = "1")]
    pub wheel: String,
    #[prost(string, tag = "2")]
    pub car_model: String,
    #[prost(string, tag = "3")]
    pub track: String,
    #[prost(message, repeated, tag = "4")]
    pub records: Vec<WheelRecord>,
}

impl From<&WheelSample> for WheelRecord {
    fn from(sample: &WheelSample) -> Self {
        WheelRecord {
            timestamp: sample.timestamp,
            camber_rad: sample.camber_rad,
            ride_height_mm: sample.ride_height_mm,
            suspension_travel: sample.suspension_travel,
            suspension_max_travel: sample.suspension_max_travel,
            tire_dirt_level: sample.tire_dirt_level,
            tire_load_kgf_units: sample.tire_load_kgf_units,
            tire_pressure: sample.tire_pressure,
            tire_temp_inner: sample.tire_temp_inner,
            tire_temp_middle: sample.tire_temp_middle,
            tire_temp_outer: sample.tire_temp_outer,
            tire_temp_core: sample.tire_temp_core,
            tire_wear_fraction: sample.tire_wear_fraction,
        }
    }
}

pub fn wheel_log(wheel: WheelPos, session: Option<&SessionInfo>, samples: &[WheelSample]) -> WheelLog {
    WheelLog {
        wheel: wheel.name().to_string(),
        car_model: session.map(|s| s.car_model.clone()).unwrap_or_default(),
        track: session.map(|s| s.track.clone()).unwrap_or_default(),
        records: samples.iter().map(WheelRecord::from).collect(),
    }
}

/// Where logs are written unless `LIVE_TELEMETRY_LOG_DIR` says otherwise.
pub fn default_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::document_dir()
        .map(|dir| dir.join("live-telemetry"))
        .unwrap_or_else(|| PathBuf::from("live-telemetry-logs"))
}

pub fn log_file_name(wheel: WheelPos) -> String {
    format!("live_telemetry_{}.pb", wheel.name())
}

/// Writes the log length-delimited into `dir`, creating it if needed.
pub async fn write_log(dir: &Path, wheel: WheelPos, log: &WheelLog) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let path = dir.join(log_file_name(wheel));
    fs::write(&path, log.encode_length_delimited_to_vec()).await?;
    Ok(path)
}
