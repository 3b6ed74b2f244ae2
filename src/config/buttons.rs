//! Button wiring configuration

use serde::Deserialize;
use std::collections::HashSet;

use crate::domain::button::Polarity;
use crate::domain::foundation::ButtonId;

use super::error::ValidationError;

/// One GPIO pin and the button wired to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMapping {
    pub pin: u32,
    pub button: ButtonId,
}

/// Button wiring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ButtonsConfig {
    /// Comma-separated `<pin>:<button>` pairs (BCM numbering)
    #[serde(default = "default_pins")]
    pub pins: String,

    /// Which level means "pressed"
    #[serde(default)]
    pub polarity: Polarity,
}

impl ButtonsConfig {
    /// Parse the pin map.
    pub fn pin_map(&self) -> Result<Vec<PinMapping>, ValidationError> {
        let mut mappings = Vec::new();
        let mut pins = HashSet::new();
        let mut buttons = HashSet::new();

        for entry in self.pins.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let invalid = || ValidationError::InvalidPinMapping(entry.to_string());
            let (pin, button) = entry.split_once(':').ok_or_else(invalid)?;
            let pin: u32 = pin.trim().parse().map_err(|_| invalid())?;
            let button: ButtonId = button.parse().map_err(|_| invalid())?;

            if !pins.insert(pin) {
                return Err(ValidationError::DuplicatePin(pin));
            }
            if !buttons.insert(button) {
                return Err(ValidationError::DuplicateButton(button.value()));
            }
            mappings.push(PinMapping { pin, button });
        }

        if mappings.is_empty() {
            return Err(ValidationError::NoButtonsConfigured);
        }
        Ok(mappings)
    }

    /// Validate button configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pin_map().map(|_| ())
    }
}

impl Default for ButtonsConfig {
    fn default() -> Self {
        Self {
            pins: default_pins(),
            polarity: Polarity::default(),
        }
    }
}

fn default_pins() -> String {
    "18:1,19:2".to_string()
}
