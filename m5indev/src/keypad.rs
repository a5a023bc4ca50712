//! Keypad made of individual buttons, one host key code per button.
//!
//! At most one key is reported active. When several buttons are down, the first registered one wins and the
//! keypad ignores the others until it is released.
use embassy_time::Timer;
use heapless::Vec;

use crate::button::ButtonChannel;
use crate::config::PollConfig;
use crate::error::Error;
use crate::event::Event;
use crate::indev::{Indev, IndevData, IndevHandle, IndevType, Key};
use crate::input_device::InputDevice;

pub struct KeypadDevice<B: ButtonChannel, const N: usize> {
    /// Registered keys, in registration order
    keys: Vec<(Key, B), N>,
    /// Key currently pressed, or the last pressed one
    current_key: Key,
    /// Index of the held key in `keys`
    held: Option<usize>,
    pressed: bool,
    changed: bool,
    poll_config: PollConfig,
}

impl<B: ButtonChannel, const N: usize> KeypadDevice<B, N> {
    pub fn new(poll_config: PollConfig) -> Self {
        Self {
            keys: Vec::new(),
            current_key: Key::default(),
            held: None,
            pressed: false,
            changed: false,
            poll_config,
        }
    }

    /// Register a button sending `key`.
    pub fn add_key(&mut self, key: Key, button: B) -> Result<(), Error> {
        self.keys.push((key, button)).map_err(|_| {
            error!("Keypad is full, {} keys max", N);
            Error::CapacityExceeded
        })
    }

    /// Scan the buttons and update the keypad state.
    pub fn update(&mut self) {
        if let Some(idx) = self.held {
            if !self.keys[idx].1.is_pressed() {
                debug!("Keypad: key {:?} released", self.current_key);
                self.held = None;
                self.pressed = false;
                self.changed = true;
            }
            return;
        }

        if let Some(idx) = self.keys.iter_mut().position(|(_, button)| button.is_pressed()) {
            self.current_key = self.keys[idx].0;
            debug!("Keypad: key {:?} pressed", self.current_key);
            self.held = Some(idx);
            self.pressed = true;
            self.changed = true;
        }
    }

    /// Update, then return the pending change if there is one. The change is consumed.
    pub fn poll(&mut self) -> Option<Event> {
        self.update();
        self.take_changed().then(|| Event::key(self.current_key, self.pressed))
    }

    /// Read and clear the changed flag.
    pub fn take_changed(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }

    pub fn current_key(&self) -> Key {
        self.current_key
    }

    pub fn pressed(&self) -> bool {
        self.pressed
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Attach a host focus group to this keypad.
    pub fn set_group<H: IndevHandle>(&mut self, group: &H::Group, handle: &mut H) {
        debug!("Keypad: focus group attached, {} keys", self.keys.len());
        handle.set_group(group);
    }
}

impl<B: ButtonChannel, const N: usize> Indev for KeypadDevice<B, N> {
    fn device_type(&self) -> IndevType {
        IndevType::Keypad
    }

    fn read(&mut self, data: &mut IndevData) {
        self.update();
        data.key = self.current_key;
        data.state = self.pressed.into();
        if self.take_changed() {
            debug!("Key reader: key {:?}, state {:?}", data.key, data.state);
        }
    }
}

impl<B: ButtonChannel, const N: usize> InputDevice for KeypadDevice<B, N> {
    async fn read_event(&mut self) -> Event {
        loop {
            if let Some(event) = self.poll() {
                return event;
            }
            Timer::after(self.poll_config.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use embassy_futures::block_on;

    use super::*;
    use crate::button::test_button::TestButton;
    use crate::indev::IndevState;
    use crate::indev::test_handle::RecordingHandle;

    #[ctor::ctor]
    fn init_log() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    #[test]
    fn test_press_and_release() {
        let (up, down) = (Cell::new(false), Cell::new(false));
        let mut keypad: KeypadDevice<_, 4> = KeypadDevice::new(PollConfig::default());
        keypad.add_key(Key::UP, TestButton::new(&up)).unwrap();
        keypad.add_key(Key::DOWN, TestButton::new(&down)).unwrap();

        assert_eq!(keypad.poll(), None);

        down.set(true);
        assert_eq!(keypad.poll(), Some(Event::key(Key::DOWN, true)));
        // Held, nothing new
        assert_eq!(keypad.poll(), None);

        down.set(false);
        assert_eq!(keypad.poll(), Some(Event::key(Key::DOWN, false)));
        assert_eq!(keypad.poll(), None);
        // The last key stays current after release
        assert_eq!(keypad.current_key(), Key::DOWN);
    }

    #[test]
    fn test_first_registered_wins() {
        let (a, b, c) = (Cell::new(false), Cell::new(true), Cell::new(true));
        let mut keypad: KeypadDevice<_, 3> = KeypadDevice::new(PollConfig::default());
        keypad.add_key(Key::LEFT, TestButton::new(&a)).unwrap();
        keypad.add_key(Key::ENTER, TestButton::new(&b)).unwrap();
        keypad.add_key(Key::RIGHT, TestButton::new(&c)).unwrap();

        assert_eq!(keypad.poll(), Some(Event::key(Key::ENTER, true)));

        // A lower index press while a key is held is ignored
        a.set(true);
        assert_eq!(keypad.poll(), None);
        assert_eq!(keypad.current_key(), Key::ENTER);

        b.set(false);
        assert_eq!(keypad.poll(), Some(Event::key(Key::ENTER, false)));
        assert_eq!(keypad.poll(), Some(Event::key(Key::LEFT, true)));
    }

    #[test]
    fn test_capacity() {
        let mut keypad: KeypadDevice<TestButton, 1> = KeypadDevice::new(PollConfig::default());
        keypad.add_key(Key::ESC, TestButton::default()).unwrap();
        assert_eq!(keypad.add_key(Key::DEL, TestButton::default()), Err(Error::CapacityExceeded));
        assert_eq!(keypad.len(), 1);
    }

    #[test]
    fn test_host_read() {
        let enter = Cell::new(true);
        let mut keypad: KeypadDevice<_, 2> = KeypadDevice::new(PollConfig::default());
        keypad.add_key(Key::ENTER, TestButton::new(&enter)).unwrap();
        assert_eq!(keypad.device_type(), IndevType::Keypad);

        let mut data = IndevData::default();
        keypad.read(&mut data);
        assert_eq!(data.key, Key::ENTER);
        assert_eq!(data.state, IndevState::Pressed);
        // The read consumed the change
        assert!(!keypad.take_changed());

        enter.set(false);
        keypad.read(&mut data);
        assert_eq!(data.key, Key::ENTER);
        assert_eq!(data.state, IndevState::Released);
    }

    #[test]
    fn test_read_event() {
        let next = Cell::new(true);
        let mut keypad: KeypadDevice<_, 2> = KeypadDevice::new(PollConfig::default());
        keypad.add_key(Key::NEXT, TestButton::new(&next)).unwrap();

        let event = block_on(keypad.read_event());
        assert_eq!(event, Event::key(Key::NEXT, true));
    }

    #[test]
    fn test_set_group() {
        let mut keypad: KeypadDevice<TestButton, 2> = KeypadDevice::new(PollConfig::default());
        keypad.add_key(Key::ENTER, TestButton::default()).unwrap();
        let mut handle = RecordingHandle::default();

        keypad.set_group(&3, &mut handle);
        assert_eq!(handle.group, Some(3));
        assert!(handle.points.is_empty());
    }
}
