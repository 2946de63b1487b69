//! Persisted options and window placement.
//!
//! The file is YAML:
//!
//! ```yaml
//! version: 1.0.0
//! options:
//!   Camber: true
//!   Size: FHD
//! windows:
//!   FL: false
//! positions:
//!   FL: [10, 80]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use yaml_rust::yaml::Hash;
use yaml_rust::{Yaml, YamlEmitter, YamlLoader};

use crate::metrics::WheelPos;
use crate::options::{Capability, PanelId, Resolution};

pub const CONFIG_ENV: &str = "LIVE_TELEMETRY_CONFIG";

const SIZE_KEY: &str = "Size";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    Yaml(String),
    #[error("config file version {found} does not match {expected}")]
    VersionMismatch { found: String, expected: String },
    #[error("config file has no {0}")]
    Missing(String),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        ScreenSize {
            width: 1280,
            height: 720,
        }
    }
}

impl ScreenSize {
    /// Reads the simulator's own video settings, falling back to 1280x720.
    pub fn detect() -> ScreenSize {
        let detected = ScreenSize::video_ini_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|text| ScreenSize::parse_video_ini(&text));
        match detected {
            Some(size) => size,
            None => {
                warn!("Could not get 'cfg/video.ini' video options, using default 1280x720 resolution.");
                ScreenSize::default()
            }
        }
    }

    pub fn video_ini_path() -> Option<PathBuf> {
        dirs::document_dir().map(|docs| docs.join("Assetto Corsa").join("cfg").join("video.ini"))
    }

    /// Picks WIDTH and HEIGHT out of the `[VIDEO]` section.
    pub fn parse_video_ini(text: &str) -> Option<ScreenSize> {
        let mut in_video = false;
        let mut width = None;
        let mut height = None;
        for line in text.lines().map(str::trim) {
            if line.starts_with('[') {
                in_video = line.eq_ignore_ascii_case("[VIDEO]");
                continue;
            }
            if !in_video {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                match key.trim().to_ascii_uppercase().as_str() {
                    "WIDTH" => width = value.trim().parse().ok(),
                    "HEIGHT" => height = value.trim().parse().ok(),
                    _ => {}
                }
            }
        }
        Some(ScreenSize {
            width: width?,
            height: height?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub active: bool,
    pub position: (i32, i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    version: String,
    options: BTreeMap<Capability, bool>,
    size: Resolution,
    windows: BTreeMap<PanelId, WindowConfig>,
}

impl Config {
    /// A fresh configuration with every window placed for `screen`.
    pub fn defaults(version: &str, screen: ScreenSize) -> Config {
        let (w, h) = (screen.width, screen.height);
        let position = |id: PanelId| match id {
            PanelId::Engine => ((w - 360).div_euclid(2), h - 51 - 160),
            PanelId::Wheel(WheelPos::FrontLeft) => (10, 80),
            PanelId::Wheel(WheelPos::FrontRight) => (w - 360 - 10, 80),
            PanelId::Wheel(WheelPos::RearLeft) => (10, h - 163 - 80),
            PanelId::Wheel(WheelPos::RearRight) => (w - 360 - 10, h - 163 - 80),
        };

        Config {
            version: version.to_string(),
            options: Capability::ALL
                .iter()
                .map(|capability| (*capability, capability.default_enabled()))
                .collect(),
            size: Resolution::default(),
            windows: PanelId::ALL
                .iter()
                .map(|id| {
                    (
                        *id,
                        WindowConfig {
                            active: false,
                            position: position(*id),
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|dir| dir.join("live-telemetry").join("config.yaml"))
            .unwrap_or_else(|| PathBuf::from("live-telemetry.yaml"))
    }

    pub fn load(path: &Path, expected_version: &str) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(path)?;
        Config::parse(&text, expected_version)
    }

    /// Loads `path`, or writes and returns fresh defaults when the file is
    /// missing, outdated or malformed.
    pub fn load_or_default(path: &Path, version: &str, screen: impl FnOnce() -> ScreenSize) -> Config {
        match Config::load(path, version) {
            Ok(config) => config,
            Err(err) => {
                warn!("{}, creating new config file {}", err, path.display());
                let config = Config::defaults(version, screen());
                if let Err(err) = config.save(path) {
                    error!("Failed to write config file {}: {}", path.display(), err);
                }
                config
            }
        }
    }

    pub fn parse(text: &str, expected_version: &str) -> Result<Config, ConfigError> {
        let docs = YamlLoader::load_from_str(text).map_err(|err| ConfigError::Yaml(err.to_string()))?;
        let doc = docs
            .first()
            .ok_or_else(|| ConfigError::Missing("document".to_string()))?;

        let version = doc["version"]
            .as_str()
            .ok_or_else(|| ConfigError::Missing("version".to_string()))?;
        if version != expected_version {
            return Err(ConfigError::VersionMismatch {
                found: version.to_string(),
                expected: expected_version.to_string(),
            });
        }

        let options_doc = &doc["options"];
        let mut options = BTreeMap::new();
        for capability in Capability::ALL {
            options.insert(capability, bool_value(&options_doc[capability.name()], capability.name())?);
        }

        let size = options_doc[SIZE_KEY]
            .as_str()
            .ok_or_else(|| ConfigError::Missing(SIZE_KEY.to_string()))?;
        let size = size.parse().map_err(|_| ConfigError::Invalid {
            key: SIZE_KEY.to_string(),
            value: size.to_string(),
        })?;

        let mut windows = BTreeMap::new();
        for id in PanelId::ALL {
            let active = bool_value(&doc["windows"][id.name()], id.name())?;
            let position = position_value(&doc["positions"][id.name()], id.name())?;
            windows.insert(id, WindowConfig { active, position });
        }

        Ok(Config {
            version: version.to_string(),
            options,
            size,
            windows,
        })
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        let mut options = Hash::new();
        for (capability, enabled) in &self.options {
            options.insert(key(capability.name()), Yaml::Boolean(*enabled));
        }
        options.insert(key(SIZE_KEY), key(self.size.name()));

        let mut windows = Hash::new();
        let mut positions = Hash::new();
        for (id, window) in &self.windows {
            windows.insert(key(id.name()), Yaml::Boolean(window.active));
            positions.insert(
                key(id.name()),
                Yaml::Array(vec![
                    Yaml::Integer(window.position.0 as i64),
                    Yaml::Integer(window.position.1 as i64),
                ]),
            );
        }

        let mut root = Hash::new();
        root.insert(key("version"), key(&self.version));
        root.insert(key("options"), Yaml::Hash(options));
        root.insert(key("windows"), Yaml::Hash(windows));
        root.insert(key("positions"), Yaml::Hash(positions));

        let mut out = String::new();
        YamlEmitter::new(&mut out)
            .dump(&Yaml::Hash(root))
            .map_err(|err| ConfigError::Yaml(format!("{:?}", err)))?;
        out.push('\n');
        Ok(out)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    pub fn bool_option(&self, capability: Capability) -> bool {
        self.options.get(&capability).copied().unwrap_or(false)
    }

    pub fn set_option(&mut self, capability: Capability, enabled: bool) {
        self.options.insert(capability, enabled);
    }

    pub fn size(&self) -> Resolution {
        self.size
    }

    pub fn set_size(&mut self, size: Resolution) {
        self.size = size;
    }

    pub fn is_window_active(&self, id: PanelId) -> bool {
        self.windows.get(&id).map(|window| window.active).unwrap_or(false)
    }

    pub fn set_window_active(&mut self, id: PanelId, active: bool) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.active = active;
        }
    }

    pub fn window_position(&self, id: PanelId) -> (i32, i32) {
        self.windows.get(&id).map(|window| window.position).unwrap_or((0, 0))
    }

    pub fn set_window_position(&mut self, id: PanelId, position: (i32, i32)) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.position = position;
        }
    }
}

fn key(text: &str) -> Yaml {
    Yaml::String(text.to_string())
}

fn bool_value(value: &Yaml, name: &str) -> Result<bool, ConfigError> {
    match value {
        Yaml::Boolean(flag) => Ok(*flag),
        Yaml::BadValue => Err(ConfigError::Missing(name.to_string())),
        other => Err(ConfigError::Invalid {
            key: name.to_string(),
            value: format!("{:?}", other),
        }),
    }
}

fn position_value(value: &Yaml, name: &str) -> Result<(i32, i32), ConfigError> {
    let invalid = || ConfigError::Invalid {
        key: name.to_string(),
        value: format!("{:?}", value),
    };
    match value {
        Yaml::BadValue => Err(ConfigError::Missing(format!("position of {}", name))),
        Yaml::Array(items) => match items.as_slice() {
            [x, y] => {
                let coordinate = |value: &Yaml| {
                    value
                        .as_i64()
                        .and_then(|value| i32::try_from(value).ok())
                        .ok_or_else(invalid)
                };
                Ok((coordinate(x)?, coordinate(y)?))
            }
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VERSION: &str = "1.0.0";

    #[test]
    fn defaults_follow_the_screen_size() {
        let config = Config::defaults(VERSION, ScreenSize { width: 1920, height: 1080 });
        assert_eq!(config.window_position(PanelId::Engine), (780, 869));
        assert_eq!(config.window_position(PanelId::Wheel(WheelPos::FrontLeft)), (10, 80));
        assert_eq!(config.window_position(PanelId::Wheel(WheelPos::FrontRight)), (1550, 80));
        assert_eq!(config.window_position(PanelId::Wheel(WheelPos::RearLeft)), (10, 837));
        assert_eq!(config.window_position(PanelId::Wheel(WheelPos::RearRight)), (1550, 837));

        assert!(config.bool_option(Capability::Camber));
        assert!(config.bool_option(Capability::RpmPower));
        assert!(!config.bool_option(Capability::Logging));
        assert_eq!(config.size(), Resolution::Fhd);
        assert!(PanelId::ALL.iter().all(|id| !config.is_window_active(*id)));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::defaults(VERSION, ScreenSize::default());
        config.set_option(Capability::Logging, true);
        config.set_option(Capability::Dirt, false);
        config.set_size(Resolution::Uhd);
        config.set_window_active(PanelId::Wheel(WheelPos::RearRight), true);
        config.set_window_position(PanelId::Engine, (-40, 312));
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path, VERSION).unwrap(), config);
    }

    #[test]
    fn version_mismatch_is_reported() {
        let yaml = Config::defaults("0.9.0", ScreenSize::default()).to_yaml().unwrap();
        match Config::parse(&yaml, VERSION) {
            Err(ConfigError::VersionMismatch { found, expected }) => {
                assert_eq!(found, "0.9.0");
                assert_eq!(expected, VERSION);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn missing_and_invalid_values_are_errors() {
        let yaml = Config::defaults(VERSION, ScreenSize::default()).to_yaml().unwrap();

        let without_wear = yaml.replace("Wear: true", "");
        assert!(matches!(
            Config::parse(&without_wear, VERSION),
            Err(ConfigError::Missing(name)) if name == "Wear"
        ));

        let bad_size = yaml.replace("Size: FHD", "Size: 8K");
        assert!(matches!(
            Config::parse(&bad_size, VERSION),
            Err(ConfigError::Invalid { key, .. }) if key == "Size"
        ));

        assert!(matches!(Config::parse("options: [", VERSION), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn positions_outside_the_i32_range_are_rejected() {
        let position = |x: i64, y: i64| Yaml::Array(vec![Yaml::Integer(x), Yaml::Integer(y)]);

        assert_eq!(position_value(&position(-40, 312), "EN").unwrap(), (-40, 312));
        assert!(matches!(
            position_value(&position(5_000_000_000, 80), "FL"),
            Err(ConfigError::Invalid { key, .. }) if key == "FL"
        ));
        assert!(matches!(
            position_value(&position(10, i64::from(i32::MIN) - 1), "RR"),
            Err(ConfigError::Invalid { key, .. }) if key == "RR"
        ));
    }

    #[test]
    fn load_or_default_regenerates_a_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "version: 0.1.0\n").unwrap();

        let screen = ScreenSize { width: 2560, height: 1440 };
        let config = Config::load_or_default(&path, VERSION, || screen);
        assert_eq!(config, Config::defaults(VERSION, screen));
        assert_eq!(Config::load(&path, VERSION).unwrap(), config);
    }

    #[test]
    fn reads_the_video_section_only() {
        let ini = "[CAMERA]\nWIDTH=1\n\n[VIDEO]\nFULLSCREEN=1\nWIDTH=2560\nHEIGHT = 1440\n[EFFECTS]\nHEIGHT=3\n";
        assert_eq!(
            ScreenSize::parse_video_ini(ini),
            Some(ScreenSize { width: 2560, height: 1440 })
        );
        assert_eq!(ScreenSize::parse_video_ini("[VIDEO]\nWIDTH=800\n"), None);
    }
}
