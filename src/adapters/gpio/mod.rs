//! Event source adapters.
//!
//! - [`sysfs`] - Linux GPIO sysfs polling source
//! - [`simulated`] - In-process source for development and tests

pub mod simulated;
pub mod sysfs;

pub use simulated::SimulatedSource;
pub use sysfs::SysfsGpioSource;
