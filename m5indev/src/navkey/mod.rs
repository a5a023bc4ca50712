//! I2C NavKey: a 5-way navigation switch with a rotary ring, behind a register interface.
pub mod device;
pub mod protocol;
pub mod registers;

pub use device::{NavEncoder, NavKeyDevice, NavKeypad, SharedNavKey};
pub use protocol::{Bounds, NavKey, Signal, Status, TriState};
