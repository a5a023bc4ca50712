//! Interrupt driven debounced button.
//!
//! Call [`DebouncedButton::on_edge`] from the pin's edge interrupt. The handler spins on the line until the
//! debouncer reaches consensus or the time budget runs out, with interrupts masked for the duration.
//!
//! The poll side and the interrupt side must not run concurrently on the same button. Share it through a
//! blocking mutex:
//!
//! ```rust
//! static BUTTON_A: Mutex<CriticalSectionRawMutex, RefCell<Option<DebouncedButton<Input<'static>>>>> =
//!     Mutex::new(RefCell::new(None));
//!
//! #[interrupt]
//! fn GPIO() {
//!     BUTTON_A.lock(|b| {
//!         if let Some(b) = b.borrow_mut().as_mut() {
//!             b.on_edge();
//!         }
//!     });
//! }
//! ```
use embedded_hal::digital::InputPin;

use super::ButtonChannel;
use crate::config::DebounceConfig;
use crate::debounce::{DebouncerTrait, ShiftRegisterDebouncer, Transition};

pub struct DebouncedButton<P: InputPin, const L: usize = 4> {
    pin: P,
    debouncer: ShiftRegisterDebouncer<L>,
    config: DebounceConfig,
}

impl<P: InputPin, const L: usize> DebouncedButton<P, L> {
    pub fn new(pin: P, config: DebounceConfig) -> Self {
        Self {
            pin,
            debouncer: ShiftRegisterDebouncer::new(),
            config,
        }
    }

    /// Handle an edge notification of the line.
    ///
    /// Returns the transition if the stable state changed. Bounce timeouts and unreadable samples are reported
    /// as no change.
    pub fn on_edge(&mut self) -> Option<Transition> {
        let low_active = self.config.low_active;
        if self.config.bypass {
            let pressed = match self.pin.is_low() {
                Ok(low) => low == low_active,
                Err(_) => return None,
            };
            return self.debouncer.force(pressed);
        }

        let pin = &mut self.pin;
        // The debouncer expects an open switch to read as 1
        let outcome = self.debouncer.settle(self.config.budget, || {
            pin.is_high().ok().map(|high| if low_active { high } else { !high })
        });
        let transition = outcome.transition();
        if let Some(t) = transition {
            debug!("Debounced button: {:?}", t);
        }
        transition
    }

    /// Returns a reference to the pin. Can be used to clear the interrupt.
    pub fn pin(&mut self) -> &mut P {
        &mut self.pin
    }

    /// Consumes the button, returning the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin, const L: usize> ButtonChannel for DebouncedButton<P, L> {
    fn is_pressed(&mut self) -> bool {
        self.debouncer.is_pressed()
    }
}
