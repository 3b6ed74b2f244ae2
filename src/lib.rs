//! Button Relay - GPIO button events pushed to websocket viewers
//!
//! This crate debounces raw edges from physical buttons and fans the
//! accepted press/release events out to every connected viewer, in order,
//! while viewers come and go.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
