//! Debounce configuration

use serde::Deserialize;
use std::time::Duration;

/// Debounce configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DebounceSettings {
    /// Minimum spacing between accepted transitions of one button
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Emit RELEASED events; when off only presses are reported
    #[serde(default = "default_emit_released")]
    pub emit_released: bool,
}

impl DebounceSettings {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for DebounceSettings {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            emit_released: default_emit_released(),
        }
    }
}

fn default_window_ms() -> u64 {
    50
}

fn default_emit_released() -> bool {
    true
}
