#[macro_use] extern crate log;

pub mod assetto;
pub mod components;
pub mod config;
pub mod export;
pub mod host;
pub mod metrics;
pub mod options;
#[cfg(feature = "overlay")]
pub mod overlay;
pub mod panel;
