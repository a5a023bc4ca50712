//! Async surface of the input devices.
//!
//! Hosts with a refresh callback use [`crate::Indev::read`]. Firmware built around an async executor can instead
//! await [`InputDevice::read_event`] and forward the events wherever they are needed.
//!
//! # Example
//! ```rust
//! let mut keypad = KeypadDevice::<_, 4>::new(PollConfig::default());
//! keypad.add_key(Key::ENTER, enter_button)?;
//!
//! loop {
//!     let event = keypad.read_event().await;
//!     EVENT_CHANNEL.send(event).await;
//! }
//! ```
use crate::event::Event;

/// The trait for input devices.
#[allow(async_fn_in_trait)]
pub trait InputDevice {
    /// Wait until the device reports an event.
    ///
    /// Implementations poll the hardware, then sleep for their configured poll interval when nothing changed.
    async fn read_event(&mut self) -> Event;
}
