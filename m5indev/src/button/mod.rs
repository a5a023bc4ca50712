//! Conditioned button lines.
//!
//! A [`ButtonChannel`] owns one physical line and one conditioning strategy, either the interrupt driven
//! [`DebouncedButton`] or the hardware [`crate::pulse_counter::PulseEdgeCounter`]. The devices only see the
//! `pressed` state.
use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;

pub mod debounced;

pub use debounced::DebouncedButton;

/// A single conditioned button line.
pub trait ButtonChannel {
    /// Whether the button is pressed right now.
    fn is_pressed(&mut self) -> bool;
}

impl<B: ButtonChannel + ?Sized> ButtonChannel for &mut B {
    fn is_pressed(&mut self) -> bool {
        (**self).is_pressed()
    }
}

/// Buttons shared with an interrupt handler live in a blocking mutex, the poller reads them through a reference.
impl<M: RawMutex, B: ButtonChannel> ButtonChannel for &Mutex<M, RefCell<B>> {
    fn is_pressed(&mut self) -> bool {
        self.lock(|button| button.borrow_mut().is_pressed())
    }
}
