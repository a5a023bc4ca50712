pub mod shift_register;

pub use shift_register::ShiftRegisterDebouncer;

/// A stable transition reported by a debouncer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    Pressed,
    Released,
}

impl Transition {
    pub fn pressed(self) -> bool {
        matches!(self, Transition::Pressed)
    }
}

impl From<bool> for Transition {
    fn from(pressed: bool) -> Self {
        if pressed { Transition::Pressed } else { Transition::Released }
    }
}

/// Outcome of one debounce round
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettleOutcome {
    /// The line settled. Carries the transition if the stable state changed.
    Settled(Option<Transition>),
    /// The line kept bouncing for the whole time budget, stable state untouched.
    TimedOut,
    /// The line could not be sampled, stable state untouched.
    SampleFailed,
}

impl SettleOutcome {
    /// The transition to report, if any. Timeouts and failed samples count as "no change this round".
    pub fn transition(self) -> Option<Transition> {
        match self {
            SettleOutcome::Settled(t) => t,
            SettleOutcome::TimedOut | SettleOutcome::SampleFailed => None,
        }
    }
}

pub trait DebouncerTrait {
    /// Feed one raw level sample. `high` is the electrical level of the line.
    ///
    /// Returns a transition only when the stable state changes.
    fn sample(&mut self, high: bool) -> Option<Transition>;

    /// The current stable state
    fn is_pressed(&self) -> bool;
}
