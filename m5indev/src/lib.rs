//! Input devices for embedded GUI toolkits.
//!
//! Physical lines are conditioned by a [`button::ButtonChannel`], either an interrupt driven
//! [`button::DebouncedButton`] or a hardware [`pulse_counter::PulseEdgeCounter`]. Channels are grouped into host
//! devices: a [`keypad::KeypadDevice`], a [`multi_button::MultiButtonDevice`] or a three-button
//! [`encoder::ButtonEncoder`]. The I2C NavKey is driven by [`navkey::NavKeyDevice`] and shows up as a keypad
//! plus an encoder.
//!
//! Every device implements [`Indev`] for toolkits with a refresh callback and [`InputDevice`] for async
//! firmware.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

pub mod button;
pub mod config;
pub mod debounce;
pub mod encoder;
pub mod error;
pub mod event;
pub mod i2c;
pub mod indev;
pub mod input_device;
pub mod keypad;
pub mod multi_button;
pub mod navkey;
pub mod pulse_counter;

pub use error::Error;
pub use event::Event;
pub use indev::{Area, Indev, IndevData, IndevHandle, IndevState, IndevType, Key, Point};
pub use input_device::InputDevice;
