use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Input line whose level is set by the test. Clones share the level.
#[derive(Clone)]
pub struct TestLine {
    high: Rc<Cell<bool>>,
}

impl TestLine {
    /// Idle line of a low-active switch
    pub fn new() -> Self {
        Self {
            high: Rc::new(Cell::new(true)),
        }
    }

    pub fn set_high(&self, high: bool) {
        self.high.set(high);
    }
}

impl ErrorType for TestLine {
    type Error = core::convert::Infallible;
}

impl InputPin for TestLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high.get())
    }
}
