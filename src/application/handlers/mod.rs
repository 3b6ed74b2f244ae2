//! Application handlers.

mod button_input;

pub use button_input::ButtonInputHandler;
