//! Travel modes and per-mode vehicle capacities.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode: {0}")]
pub struct UnknownMode(pub String);

/// How a leg is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Walk,
    Bicycle,
    Car,
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
}

impl Mode {
    /// All modes, in planner order.
    pub const ALL: [Mode; 11] = [
        Mode::Walk,
        Mode::Bicycle,
        Mode::Car,
        Mode::Tram,
        Mode::Subway,
        Mode::Rail,
        Mode::Bus,
        Mode::Ferry,
        Mode::CableCar,
        Mode::Gondola,
        Mode::Funicular,
    ];

    /// Returns true for modes that run on a scheduled vehicle.
    pub fn is_transit(self) -> bool {
        !matches!(self, Mode::Walk | Mode::Bicycle | Mode::Car)
    }

    /// Returns the planner's name for this mode (e.g. `"BUS"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Walk => "WALK",
            Mode::Bicycle => "BICYCLE",
            Mode::Car => "CAR",
            Mode::Tram => "TRAM",
            Mode::Subway => "SUBWAY",
            Mode::Rail => "RAIL",
            Mode::Bus => "BUS",
            Mode::Ferry => "FERRY",
            Mode::CableCar => "CABLE_CAR",
            Mode::Gondola => "GONDOLA",
            Mode::Funicular => "FUNICULAR",
        }
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Passengers a single vehicle of each transit mode can take.
///
/// Modes without an entry have capacity zero, so an itinerary that uses
/// one cannot carry any part of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeCapacities {
    by_mode: HashMap<Mode, u32>,
}

impl ModeCapacities {
    /// Create an empty table (every mode has capacity zero).
    pub fn empty() -> Self {
        Self {
            by_mode: HashMap::new(),
        }
    }

    /// Set the capacity for a mode.
    pub fn with(mut self, mode: Mode, capacity: u32) -> Self {
        self.by_mode.insert(mode, capacity);
        self
    }

    /// Returns the capacity of one vehicle of `mode`.
    pub fn get(&self, mode: Mode) -> u32 {
        self.by_mode.get(&mode).copied().unwrap_or(0)
    }
}

impl Default for ModeCapacities {
    fn default() -> Self {
        Self::empty()
            .with(Mode::Bus, 40)
            .with(Mode::Tram, 80)
            .with(Mode::Subway, 80)
            .with(Mode::Rail, 80)
            .with(Mode::Ferry, 100)
            .with(Mode::CableCar, 20)
            .with(Mode::Gondola, 20)
            .with(Mode::Funicular, 20)
    }
}
