use async_std::task;
use pretty_assertions::assert_eq;

use live_telemetry::assetto::data_producer::synthetic_snapshot;
use live_telemetry::assetto::{SessionInfo, Snapshot};
use live_telemetry::config::{Config, ScreenSize};
use live_telemetry::export::{self, WheelLog};
use live_telemetry::host::headless::{HeadlessHost, RecordingCanvas};
use live_telemetry::host::WindowHost;
use live_telemetry::metrics::WheelPos;
use live_telemetry::options::{Capability, PanelId, Resolution};
use live_telemetry::panel::{EnginePanel, Panel, WheelPanel};
use prost::Message;

struct Overlay {
    host: HeadlessHost,
    engine: EnginePanel,
    wheels: Vec<WheelPanel>,
}

impl Overlay {
    fn open(config: &Config) -> Overlay {
        let mut host = HeadlessHost::new();
        let engine = EnginePanel::new(config, &mut host).unwrap();
        let wheels = WheelPos::ALL
            .iter()
            .map(|wheel| WheelPanel::new(*wheel, config, &mut host).unwrap())
            .collect();
        Overlay { host, engine, wheels }
    }

    fn panels_mut(&mut self) -> Vec<&mut dyn Panel> {
        let mut panels: Vec<&mut dyn Panel> = vec![&mut self.engine];
        panels.extend(self.wheels.iter_mut().map(|panel| panel as &mut dyn Panel));
        panels
    }

    fn tick(&mut self, snapshot: &Snapshot) {
        for panel in self.panels_mut() {
            panel.update(snapshot);
        }
    }
}

fn config() -> Config {
    let mut config = Config::defaults("1.0.0", ScreenSize { width: 1920, height: 1080 });
    for id in PanelId::ALL {
        config.set_window_active(id, true);
    }
    config
}

fn pressure_snapshot() -> Snapshot {
    let mut snapshot = synthetic_snapshot(1);
    snapshot.physics.wheels_pressure = [26.0, 27.0, 28.0, 29.0];
    snapshot
}

#[test]
fn one_snapshot_feeds_every_panel() {
    let mut overlay = Overlay::open(&config());
    assert_eq!(overlay.host.windows().len(), 5);

    overlay.tick(&pressure_snapshot());

    for (panel, expected) in overlay.wheels.iter().zip(["26.0 psi", "27.0 psi", "28.0 psi", "29.0 psi"]) {
        let mut canvas = RecordingCanvas::new();
        panel.draw(&mut canvas);
        assert!(
            canvas.texts().contains(&expected),
            "{} drew {:?}",
            panel.wheel(),
            canvas.texts()
        );
    }

    let mut canvas = RecordingCanvas::new();
    overlay.engine.draw(&mut canvas);
    assert_eq!(canvas.texts()[1], "330000 W  420 Nm");
}

#[test]
fn default_windows_follow_the_screen() {
    let overlay = Overlay::open(&config());
    let positions: Vec<(i32, i32)> = overlay
        .host
        .windows()
        .iter()
        .map(|window| window.position)
        .collect();
    assert_eq!(
        positions,
        vec![(780, 869), (10, 80), (1550, 80), (10, 837), (1550, 837)]
    );
}

#[test]
fn resize_applies_to_every_window() {
    let mut overlay = Overlay::open(&config());
    let mut host = std::mem::take(&mut overlay.host);
    for panel in overlay.panels_mut() {
        panel.resize(&mut host, Resolution::Qhd);
    }

    let sizes: Vec<(f32, f32)> = host
        .windows()
        .iter()
        .map(|window| (window.size.width, window.size.height))
        .collect();
    assert_eq!(
        sizes,
        vec![(512.0, 85.0), (512.0, 271.0), (512.0, 271.0), (512.0, 271.0), (512.0, 271.0)]
    );
}

#[test]
fn session_logs_survive_config_and_export_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");

    let mut config = config();
    config.set_option(Capability::Logging, true);
    config.save(&config_path).unwrap();

    let config = Config::load(&config_path, "1.0.0").unwrap();
    assert!(config.bool_option(Capability::Logging));

    let mut overlay = Overlay::open(&config);
    for tick in 1..=50 {
        overlay.tick(&synthetic_snapshot(tick));
    }
    overlay.host.set_position(overlay.wheels[0].window_id(), (42, 43));
    assert_eq!(overlay.wheels[0].position(&overlay.host), Ok((42, 43)));

    let session = SessionInfo {
        car_model: "synthetic".to_string(),
        track: "test_track".to_string(),
        track_configuration: String::new(),
    };
    let rear_right = &overlay.wheels[3];
    assert_eq!(rear_right.data_log().len(), 50);

    let log = export::wheel_log(rear_right.wheel(), Some(&session), rear_right.data_log());
    let path = task::block_on(export::write_log(dir.path(), rear_right.wheel(), &log)).unwrap();

    let decoded = WheelLog::decode_length_delimited(std::fs::read(path).unwrap().as_slice()).unwrap();
    assert_eq!(decoded, log);
    assert_eq!(decoded.wheel, "RR");
    assert_eq!(decoded.records.first().map(|record| record.timestamp), Some(16));
}
