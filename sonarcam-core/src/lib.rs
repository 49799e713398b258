#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod capture;
pub mod command;
pub mod config;
pub mod controller;
pub mod jpeg;
pub mod ranging;
pub mod wire;

#[cfg(test)]
mod testing;

pub use capture::{Camera, CaptureFailure, Frame, capture_frame};
pub use command::{CommandRecognizer, LineAssembler};
pub use config::*;
pub use controller::{Controller, ControllerState, CycleOutcome};
pub use ranging::{Hcsr04, NO_ECHO_CM, Rangefinder, pulse_to_distance_cm};
pub use wire::{ResponseHeader, build_and_send, encode_distance};
