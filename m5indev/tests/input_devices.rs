pub mod common;

use core::cell::RefCell;
use std::cell::Cell;
use std::rc::Rc;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use m5indev::button::DebouncedButton;
use m5indev::config::{DebounceConfig, EncoderConfig, PollConfig, PulseCounterConfig};
use m5indev::debounce::Transition;
use m5indev::encoder::ButtonEncoder;
use m5indev::keypad::KeypadDevice;
use m5indev::multi_button::MultiButtonDevice;
use m5indev::pulse_counter::{PulseCounterUnit, PulseEdgeCounter, UnitPool};
use m5indev::{Error, Event, Indev, IndevData, IndevState, Key};

use crate::common::TestLine;

type SharedButton = Mutex<NoopRawMutex, RefCell<DebouncedButton<TestLine>>>;

fn shared_button(line: &TestLine) -> SharedButton {
    Mutex::new(RefCell::new(DebouncedButton::new(line.clone(), DebounceConfig::default())))
}

fn edge(button: &SharedButton) -> Option<Transition> {
    button.lock(|b| b.borrow_mut().on_edge())
}

#[test]
fn test_keypad_over_debounced_buttons() {
    let (prev, next) = (TestLine::new(), TestLine::new());
    let (prev_button, next_button) = (shared_button(&prev), shared_button(&next));

    let mut keypad: KeypadDevice<_, 2> = KeypadDevice::new(PollConfig::default());
    keypad.add_key(Key::PREV, &prev_button).unwrap();
    keypad.add_key(Key::NEXT, &next_button).unwrap();

    let mut data = IndevData::default();
    keypad.read(&mut data);
    assert_eq!(data.state, IndevState::Released);

    // The line moves, but the button only follows on the edge notification
    next.set_high(false);
    keypad.read(&mut data);
    assert_eq!(data.state, IndevState::Released);

    assert_eq!(edge(&next_button), Some(Transition::Pressed));
    keypad.read(&mut data);
    assert_eq!((data.key, data.state), (Key::NEXT, IndevState::Pressed));

    next.set_high(true);
    assert_eq!(edge(&next_button), Some(Transition::Released));
    assert_eq!(keypad.poll(), Some(Event::key(Key::NEXT, false)));
}

/// Counter unit counting the edges of a test line
struct EdgeCounterUnit {
    edges: Rc<Cell<i16>>,
    cleared_at: i16,
}

impl PulseCounterUnit for EdgeCounterUnit {
    type Error = ();

    fn configure(&mut self, _unit: u8, _config: &PulseCounterConfig) -> Result<(), ()> {
        self.cleared_at = self.edges.get();
        Ok(())
    }

    fn count(&mut self) -> Result<i16, ()> {
        Ok(self.edges.get() - self.cleared_at)
    }

    fn clear(&mut self) -> Result<(), ()> {
        self.cleared_at = self.edges.get();
        Ok(())
    }
}

#[test]
fn test_multi_button_over_pulse_counters() {
    let mut pool: UnitPool<2> = UnitPool::new();
    let config = PulseCounterConfig {
        max_count: 4,
        ..Default::default()
    };
    let edges = [Rc::new(Cell::new(0)), Rc::new(Cell::new(0))];
    let counters = edges.each_ref().map(|edges| {
        let unit = EdgeCounterUnit {
            edges: edges.clone(),
            cleared_at: 0,
        };
        PulseEdgeCounter::allocate(&mut pool, unit, config).unwrap()
    });
    assert_eq!(pool.available(), 0);
    let third = EdgeCounterUnit {
        edges: Rc::new(Cell::new(0)),
        cleared_at: 0,
    };
    assert_eq!(PulseEdgeCounter::allocate(&mut pool, third, config).err(), Some(Error::ResourceExhausted));

    let mut device = MultiButtonDevice::new(counters, PollConfig::default());
    assert_eq!(device.poll(), None);

    // Press button 1
    edges[1].set(1);
    assert_eq!(device.poll(), Some(Event::button(1, true)));

    // Many clicks on button 0 run past max_count: the clear must not flip the state
    for clicks in 1..=3 {
        edges[0].set(clicks * 2 - 1);
        assert_eq!(device.poll(), Some(Event::button(0, true)));
        edges[0].set(clicks * 2);
        assert_eq!(device.poll(), Some(Event::button(0, false)));
    }
    edges[0].set(7);
    assert_eq!(device.poll(), Some(Event::button(0, true)));
    assert_eq!(device.poll(), None);

    // Release button 1
    edges[1].set(2);
    assert_eq!(device.poll(), Some(Event::button(1, false)));
}

#[test]
fn test_encoder_over_debounced_buttons() {
    let (left, ok, right) = (TestLine::new(), TestLine::new(), TestLine::new());
    let (left_button, ok_button, right_button) = (shared_button(&left), shared_button(&ok), shared_button(&right));
    let mut encoder = ButtonEncoder::new(
        &left_button,
        &ok_button,
        &right_button,
        EncoderConfig { step: 2 },
        PollConfig::default(),
    )
    .unwrap();

    right.set_high(false);
    edge(&right_button);
    let mut data = IndevData::default();
    let mut total = 0;
    for _ in 0..5 {
        encoder.read(&mut data);
        total += data.enc_diff;
    }
    assert_eq!(total, 2);

    right.set_high(true);
    edge(&right_button);
    ok.set_high(false);
    edge(&ok_button);
    encoder.read(&mut data);
    assert_eq!((data.enc_diff, data.state), (0, IndevState::Pressed));
}
