#[macro_use] extern crate log;

#[cfg(windows)]
use windows::{
    Win32::System::Threading::*,
};

use async_std::channel::Sender;
use async_std::task;

use live_telemetry::assetto::data_producer::SyntheticTask;
use live_telemetry::assetto::Update;
use live_telemetry::config::{Config, ScreenSize};
use live_telemetry::export;
use live_telemetry::overlay::Overlays;

const SYNTHETIC_ENV: &str = "LIVE_TELEMETRY_SYNTHETIC";

#[cfg(windows)]
fn spawn_producer(sender: Sender<Update>) {
    if std::env::var_os(SYNTHETIC_ENV).is_some() {
        info!("Using synthetic telemetry");
        task::spawn(SyntheticTask::new(sender).execute());
    } else {
        let data_producer = live_telemetry::assetto::data_producer::SharedMemoryTask::new(sender);
        task::spawn(async {
            data_producer.execute().await
        });
    }
}

#[cfg(not(windows))]
fn spawn_producer(sender: Sender<Update>) {
    info!("No simulator on this platform ({} implied), using synthetic telemetry", SYNTHETIC_ENV);
    task::spawn(SyntheticTask::new(sender).execute());
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    #[cfg(windows)]
    unsafe {
        SetPriorityClass(GetCurrentProcess(), HIGH_PRIORITY_CLASS);
    }

    let config_path = Config::default_path();
    let config = Config::load_or_default(&config_path, env!("CARGO_PKG_VERSION"), ScreenSize::detect);
    info!("Loaded config from {}", config_path.display());

    let (sender, receiver) = async_std::channel::unbounded();
    spawn_producer(sender);

    match Overlays::new(config, config_path, export::default_dir(), receiver) {
        Ok(overlays) => overlays.start_event_loop(),
        Err(err) => error!("Failed to open overlay windows: {}", err),
    }
}
