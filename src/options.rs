use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::metrics::WheelPos;

/// A toggleable panel feature. Every gauge has one, plus `Logging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    Camber,
    Dirt,
    Height,
    Load,
    Logging,
    Pressure,
    RpmPower,
    Suspension,
    Temps,
    Tire,
    Wear,
}

impl Capability {
    pub const ALL: [Capability; 11] = [
        Capability::Camber,
        Capability::Dirt,
        Capability::Height,
        Capability::Load,
        Capability::Logging,
        Capability::Pressure,
        Capability::RpmPower,
        Capability::Suspension,
        Capability::Temps,
        Capability::Tire,
        Capability::Wear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Capability::Camber => "Camber",
            Capability::Dirt => "Dirt",
            Capability::Height => "Height",
            Capability::Load => "Load",
            Capability::Logging => "Logging",
            Capability::Pressure => "Pressure",
            Capability::RpmPower => "RPMPower",
            Capability::Suspension => "Suspension",
            Capability::Temps => "Temps",
            Capability::Tire => "Tire",
            Capability::Wear => "Wear",
        }
    }

    /// Value used when the configuration is created from scratch.
    pub fn default_enabled(self) -> bool {
        self != Capability::Logging
    }

    /// Overlay key that toggles this option. Gauges are numbered in the order
    /// the wheel windows draw them.
    pub fn hotkey(self) -> char {
        match self {
            Capability::Temps => '1',
            Capability::Dirt => '2',
            Capability::Tire => '3',
            Capability::Camber => '4',
            Capability::Suspension => '5',
            Capability::Height => '6',
            Capability::Pressure => '7',
            Capability::Wear => '8',
            Capability::Load => '9',
            Capability::Logging => 'L',
            Capability::RpmPower => 'P',
        }
    }

    pub fn from_hotkey(key: char) -> Option<Capability> {
        let key = key.to_ascii_uppercase();
        Capability::ALL.iter().copied().find(|capability| capability.hotkey() == key)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .iter()
            .copied()
            .find(|capability| capability.name() == name)
            .ok_or_else(|| format!("Unknown option {}", name))
    }
}

/// Display-size presets. Every window and gauge is laid out at 1.0 and scaled by
/// the preset's multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Hd,
    Fhd,
    Qhd,
    Uhd,
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Fhd
    }
}

impl Resolution {
    pub const ALL: [Resolution; 4] = [Resolution::Hd, Resolution::Fhd, Resolution::Qhd, Resolution::Uhd];

    pub fn multiplier(self) -> f32 {
        match self {
            Resolution::Hd => 0.5,
            Resolution::Fhd => 0.75,
            Resolution::Qhd => 1.0,
            Resolution::Uhd => 1.5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Resolution::Hd => "HD",
            Resolution::Fhd => "FHD",
            Resolution::Qhd => "QHD",
            Resolution::Uhd => "UHD",
        }
    }

    /// The following preset, wrapping around after the largest one.
    pub fn next(self) -> Resolution {
        let position = Resolution::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Resolution::ALL[(position + 1) % Resolution::ALL.len()]
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .iter()
            .copied()
            .find(|resolution| resolution.name() == name)
            .ok_or_else(|| format!("Unknown size {}", name))
    }
}

/// Identifies a panel window in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    Engine,
    Wheel(WheelPos),
}

impl PanelId {
    pub const ALL: [PanelId; 5] = [
        PanelId::Engine,
        PanelId::Wheel(WheelPos::FrontLeft),
        PanelId::Wheel(WheelPos::FrontRight),
        PanelId::Wheel(WheelPos::RearLeft),
        PanelId::Wheel(WheelPos::RearRight),
    ];

    pub fn name(self) -> &'static str {
        match self {
            PanelId::Engine => "EN",
            PanelId::Wheel(wheel) => wheel.name(),
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PanelId {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name == "EN" {
            return Ok(PanelId::Engine);
        }
        name.parse().map(PanelId::Wheel)
    }
}

/// Per-panel feature flags. The set of keys is fixed when the panel is built;
/// only their values change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    flags: BTreeMap<Capability, bool>,
}

impl OptionSet {
    pub fn new(flags: impl IntoIterator<Item = (Capability, bool)>) -> OptionSet {
        OptionSet {
            flags: flags.into_iter().collect(),
        }
    }

    pub fn get(&self, capability: Capability) -> bool {
        self.flags.get(&capability).copied().unwrap_or(false)
    }

    /// Updates an existing flag. Returns `false` for a key this set was not
    /// built with.
    pub fn set(&mut self, capability: Capability, value: bool) -> bool {
        match self.flags.get_mut(&capability) {
            Some(flag) => {
                *flag = value;
                true
            }
            None => false,
        }
    }
}
