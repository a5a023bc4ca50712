//! Shift-register debouncer.
//!
//! Raw samples are shifted into an `L` bit register. The stable state only moves when all `L` samples agree:
//! all ones means the switch is open (released), all zeros means it is closed (pressed).
use embassy_time::{Duration, Instant};

use super::{DebouncerTrait, SettleOutcome, Transition};

pub struct ShiftRegisterDebouncer<const L: usize = 4> {
    /// Last `L` samples, newest in bit 0
    register: u8,
    /// Debounced state, `true` when pressed
    stable: bool,
    /// Last state that was reported
    previous: bool,
}

impl<const L: usize> Default for ShiftRegisterDebouncer<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const L: usize> ShiftRegisterDebouncer<L> {
    const MASK: u8 = {
        assert!(L >= 4 && L <= 8, "debounce register width must be between 4 and 8");
        ((1u16 << L) - 1) as u8
    };

    /// Create a debouncer that starts released.
    pub fn new() -> Self {
        Self {
            register: Self::MASK,
            stable: false,
            previous: false,
        }
    }

    /// Shift a sample in, returns the pressed state if the register reached consensus.
    fn shift(&mut self, high: bool) -> Option<bool> {
        self.register = ((self.register << 1) | high as u8) & Self::MASK;
        if self.register == Self::MASK {
            Some(false)
        } else if self.register == 0 {
            Some(true)
        } else {
            None
        }
    }

    /// Report the stable state if it differs from the last reported one.
    ///
    /// This also filters the case of two edge interrupts of the same polarity in a row.
    fn report(&mut self) -> Option<Transition> {
        if self.stable != self.previous {
            self.previous = self.stable;
            Some(Transition::from(self.stable))
        } else {
            None
        }
    }

    /// Set the stable state directly, without filtering.
    pub fn force(&mut self, pressed: bool) -> Option<Transition> {
        self.register = if pressed { 0 } else { Self::MASK };
        self.stable = pressed;
        self.report()
    }

    /// Run one debounce round after an edge notification.
    ///
    /// `read` returns the raw line level (`None` if the line can't be read) and is called back to back until
    /// the register reaches consensus or `budget` runs out. Interrupts are masked for the whole round and
    /// restored on every exit path.
    pub fn settle(&mut self, budget: Duration, mut read: impl FnMut() -> Option<bool>) -> SettleOutcome {
        critical_section::with(|_| {
            let start = Instant::now();
            loop {
                if start.elapsed() > budget {
                    trace!("Debounce timeout, register: {:b}", self.register);
                    return SettleOutcome::TimedOut;
                }

                let Some(high) = read() else {
                    return SettleOutcome::SampleFailed;
                };

                if let Some(pressed) = self.shift(high) {
                    self.stable = pressed;
                    return SettleOutcome::Settled(self.report());
                }
            }
        })
    }
}

impl<const L: usize> DebouncerTrait for ShiftRegisterDebouncer<L> {
    fn sample(&mut self, high: bool) -> Option<Transition> {
        if let Some(pressed) = self.shift(high) {
            self.stable = pressed;
        }
        self.report()
    }

    fn is_pressed(&self) -> bool {
        self.stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init_log() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    #[test]
    fn test_press_then_release() {
        let mut debouncer: ShiftRegisterDebouncer<4> = ShiftRegisterDebouncer::new();

        // Line pulled low for L samples: pressed exactly once
        let events: Vec<_> = (0..4).filter_map(|_| debouncer.sample(false)).collect();
        assert_eq!(events.as_slice(), &[Transition::Pressed]);
        assert!(debouncer.is_pressed());

        // Back high: released on the L-th sample, not before
        assert_eq!(debouncer.sample(true), None);
        assert_eq!(debouncer.sample(true), None);
        assert_eq!(debouncer.sample(true), None);
        assert_eq!(debouncer.sample(true), Some(Transition::Released));
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn test_zeros_then_ones_reports_each_edge_once() {
        let mut debouncer: ShiftRegisterDebouncer<8> = ShiftRegisterDebouncer::new();

        let mut pressed = 0;
        let mut released = 0;
        for high in [false; 8].into_iter().chain([true; 8]) {
            match debouncer.sample(high) {
                Some(Transition::Pressed) => pressed += 1,
                Some(Transition::Released) => released += 1,
                None => {}
            }
        }
        assert_eq!(pressed, 1);
        assert_eq!(released, 1);
    }

    #[test]
    fn test_bounce_does_not_change_state() {
        let mut debouncer: ShiftRegisterDebouncer<4> = ShiftRegisterDebouncer::new();

        for high in [false, true, false, false, true, false, true, true, false, true] {
            assert_eq!(debouncer.sample(high), None);
        }
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn test_repeated_settle_is_silent() {
        let mut debouncer: ShiftRegisterDebouncer<4> = ShiftRegisterDebouncer::new();

        // Released is the initial state, settling there again reports nothing
        for _ in 0..12 {
            assert_eq!(debouncer.sample(true), None);
        }
    }

    #[test]
    fn test_settle_reaches_consensus() {
        let mut debouncer: ShiftRegisterDebouncer<4> = ShiftRegisterDebouncer::new();
        let mut levels = [false, true, false, false, false, false].into_iter();

        let outcome = debouncer.settle(Duration::from_millis(2), || levels.next());
        assert_eq!(outcome, SettleOutcome::Settled(Some(Transition::Pressed)));
        // Stopped right at consensus
        assert_eq!(levels.next(), None);

        // Second edge interrupt with the same level: settled, nothing to report
        let outcome = debouncer.settle(Duration::from_millis(2), || Some(false));
        assert_eq!(outcome, SettleOutcome::Settled(None));
        assert_eq!(outcome.transition(), None);
    }

    #[test]
    fn test_settle_sample_failure_keeps_state() {
        let mut debouncer: ShiftRegisterDebouncer<4> = ShiftRegisterDebouncer::new();
        let mut reads = 0;
        let outcome = debouncer.settle(Duration::from_millis(2), || {
            reads += 1;
            if reads < 3 { Some(false) } else { None }
        });
        assert_eq!(outcome, SettleOutcome::SampleFailed);
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn test_force() {
        let mut debouncer: ShiftRegisterDebouncer<4> = ShiftRegisterDebouncer::new();
        assert_eq!(debouncer.force(true), Some(Transition::Pressed));
        assert_eq!(debouncer.force(true), None);
        // Register follows the forced state: one opposite sample is not enough
        assert_eq!(debouncer.sample(true), None);
        assert!(debouncer.is_pressed());
    }
}
