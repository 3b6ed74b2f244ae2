//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the core to external systems:
//! - `gpio` - Event sources (sysfs polling, simulated)
//! - `websocket` - Viewer sessions, registry and broadcast fan-out
//! - `http` - Status and manual trigger endpoints

pub mod gpio;
pub mod http;
pub mod websocket;

pub use gpio::{SimulatedSource, SysfsGpioSource};
pub use websocket::{Broadcaster, ClientRegistry};
