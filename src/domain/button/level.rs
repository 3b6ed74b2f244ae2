//! Electrical levels and how they map onto press/release.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical level read from an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    High,
    Low,
}

impl Level {
    /// Parses the contents of a sysfs `value` file ("0" or "1").
    pub fn from_sysfs(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Level::High),
            "0" => Some(Level::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::High => "HIGH",
            Level::Low => "LOW",
        };
        write!(f, "{}", s)
    }
}

/// What a debounced transition means for the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ButtonEventKind {
    Pressed,
    Released,
}

impl fmt::Display for ButtonEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ButtonEventKind::Pressed => "PRESSED",
            ButtonEventKind::Released => "RELEASED",
        };
        write!(f, "{}", s)
    }
}

/// Wiring polarity of the buttons.
///
/// Pull-down wiring (button shorts the pin to 3.3V) is active-high;
/// pull-up wiring (button shorts to ground) is active-low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    #[default]
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// Maps a level to the event kind it represents under this polarity.
    pub fn kind_for(&self, level: Level) -> ButtonEventKind {
        match (self, level) {
            (Polarity::ActiveHigh, Level::High) | (Polarity::ActiveLow, Level::Low) => {
                ButtonEventKind::Pressed
            }
            _ => ButtonEventKind::Released,
        }
    }

    /// The level a pressed button reads at.
    pub fn pressed_level(&self) -> Level {
        match self {
            Polarity::ActiveHigh => Level::High,
            Polarity::ActiveLow => Level::Low,
        }
    }
}
