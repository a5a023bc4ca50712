//! NavKey registered with the host as two devices: a keypad for the four directions and the center key, and an
//! encoder for the rotary ring.
//!
//! Each view is registered on its own, so focus groups are attached to them independently through
//! [`NavKeypad::set_group`] and [`NavEncoder::set_group`].
//!
//! Both views share one peripheral. The status register clears on read, so the two views share one poll per
//! host refresh cycle: a view only triggers a new poll once it has consumed the current one.
use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Timer;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::protocol::{self, NavKey, Signal};
use crate::config::{CenterKeyRouting, NavKeyConfig, PollConfig};
use crate::error::Error;
use crate::event::Event;
use crate::indev::{Indev, IndevData, IndevHandle, IndevType, Key};
use crate::input_device::InputDevice;

#[derive(Clone, Copy, PartialEq, Eq)]
enum View {
    Keypad = 0,
    Encoder = 1,
}

pub struct NavKeyDevice<I2C, D> {
    navkey: NavKey<I2C, D>,
    config: NavKeyConfig,
    poll_config: PollConfig,

    // Keypad view
    key: Key,
    key_pressed: bool,
    key_changed: bool,

    // Encoder view
    /// Counter value at the last poll
    last_value: i32,
    /// Movement not reported yet
    diff: i32,
    enc_pressed: bool,
    enc_changed: bool,
    /// The counter moved but its value couldn't be read yet
    value_pending: bool,
    /// Wrap arounds seen since the last value read, kept across failed reads
    pending_wraps: i32,

    /// Number of complete polls
    cycle: u32,
    /// Poll each view consumed last
    seen: [u32; 2],
}

impl<I2C: I2c, D: DelayNs> NavKeyDevice<I2C, D> {
    /// Initialize the peripheral, write the counter bounds and read the starting counter value.
    pub fn new(i2c: I2C, delay: D, config: NavKeyConfig, poll_config: PollConfig) -> Result<Self, Error> {
        let mut device = Self {
            navkey: NavKey::new(i2c, config.address, delay, config.reset_delay_us),
            config,
            poll_config,
            key: config.keymap.up,
            key_pressed: false,
            key_changed: false,
            last_value: 0,
            diff: 0,
            enc_pressed: false,
            enc_changed: false,
            value_pending: false,
            pending_wraps: 0,
            cycle: 0,
            seen: [0; 2],
        };
        device.reinit()?;
        Ok(device)
    }

    /// Reset the peripheral, write the counter bounds again and take the counter value as the new reference.
    ///
    /// Needed after a transport failure left the peripheral in an unknown state. Movement not reported yet is
    /// kept.
    pub fn reinit(&mut self) -> Result<(), Error> {
        self.navkey.init()?;
        self.navkey.set_bounds(self.config.min, self.config.max, self.config.step)?;
        self.last_value = self.navkey.read_value()?;
        self.value_pending = false;
        self.pending_wraps = 0;
        Ok(())
    }

    /// Poll the peripheral once and fold the status into both views.
    ///
    /// The status register clears on read. If the value read that follows fails, the counter movement and its
    /// wrap arounds are kept and the value is read again by the next update.
    pub fn update(&mut self) -> Result<(), Error> {
        let status = *self.navkey.read_status()?;

        if let Some((signal, pressed)) = status.key_event() {
            self.apply_key(signal, pressed);
        }

        if status.encoder_event().is_some() {
            self.value_pending = true;
            self.pending_wraps = self.pending_wraps.saturating_add(status.wraps());
        }
        if self.value_pending {
            let value = self.navkey.read_value()?;
            let modulus = self.navkey.bounds().modulus();
            let diff = protocol::wrapped_diff(self.last_value, value, self.pending_wraps, modulus);
            self.last_value = value;
            self.value_pending = false;
            self.pending_wraps = 0;
            if diff != 0 {
                self.diff = self.diff.saturating_add(diff);
                self.enc_changed = true;
                debug!("NavKey: value {}, diff {}", value, diff);
            }
        }

        self.cycle = self.cycle.wrapping_add(1);
        Ok(())
    }

    fn apply_key(&mut self, signal: Signal, pressed: bool) {
        let keymap = &self.config.keymap;
        let key = match signal {
            Signal::Up => Some(keymap.up),
            Signal::Down => Some(keymap.down),
            Signal::Left => Some(keymap.left),
            Signal::Right => Some(keymap.right),
            Signal::Center => Some(keymap.center),
            Signal::CenterDouble => keymap.center_double,
            Signal::Rotation | Signal::Bound => None,
        };

        if signal == Signal::Center {
            if self.config.center != CenterKeyRouting::KeypadOnly && self.enc_pressed != pressed {
                self.enc_pressed = pressed;
                self.enc_changed = true;
            }
            if self.config.center == CenterKeyRouting::EncoderOnly {
                return;
            }
        }

        let Some(key) = key else {
            debug!("NavKey: unmapped {:?}", signal);
            return;
        };
        if key != self.key || pressed != self.key_pressed {
            self.key = key;
            self.key_pressed = pressed;
            self.key_changed = true;
            debug!("NavKey: key {:?} {}", key, if pressed { "pressed" } else { "released" });
        }
    }

    /// Poll unless the other view hasn't consumed the last poll yet.
    fn refresh(&mut self, view: View) -> Result<(), Error> {
        let idx = view as usize;
        if self.seen[idx] == self.cycle {
            self.update()?;
        }
        self.seen[idx] = self.cycle;
        Ok(())
    }

    fn take_key(&mut self) -> Option<Event> {
        core::mem::take(&mut self.key_changed).then(|| Event::key(self.key, self.key_pressed))
    }

    fn take_encoder(&mut self) -> Option<Event> {
        let changed = core::mem::take(&mut self.enc_changed);
        let diff = self.take_diff();
        changed.then(|| Event::encoder(diff, self.enc_pressed))
    }

    fn take_diff(&mut self) -> i16 {
        let diff = self.diff.clamp(i16::MIN as i32, i16::MAX as i32);
        self.diff -= diff;
        if self.diff != 0 {
            // Large movements are spread over the following reads
            self.enc_changed = true;
        }
        diff as i16
    }

    /// Keypad view: refresh, then return the key change if there is one.
    pub fn poll_keypad(&mut self) -> Result<Option<Event>, Error> {
        self.refresh(View::Keypad)?;
        Ok(self.take_key())
    }

    /// Encoder view: refresh, then return the movement or center change if there is one.
    pub fn poll_encoder(&mut self) -> Result<Option<Event>, Error> {
        self.refresh(View::Encoder)?;
        Ok(self.take_encoder())
    }

    /// Fill a keypad read record. Errors are logged, the last state is reported.
    pub fn read_keypad(&mut self, data: &mut IndevData) {
        if let Err(e) = self.refresh(View::Keypad) {
            error!("NavKey keypad read failed: {:?}", e);
        }
        data.key = self.key;
        data.state = self.key_pressed.into();
        if core::mem::take(&mut self.key_changed) {
            debug!("NavKey key reader: key {:?}, state {:?}", data.key, data.state);
        }
    }

    /// Fill an encoder read record. Errors are logged, the last state is reported.
    pub fn read_encoder(&mut self, data: &mut IndevData) {
        if let Err(e) = self.refresh(View::Encoder) {
            error!("NavKey encoder read failed: {:?}", e);
        }
        let changed = core::mem::take(&mut self.enc_changed);
        data.enc_diff = self.take_diff();
        data.state = self.enc_pressed.into();
        if changed {
            debug!("NavKey encoder reader: diff {}, state {:?}", data.enc_diff, data.state);
        }
    }

    /// Attach a host focus group to the keypad view.
    pub fn set_keypad_group<H: IndevHandle>(&mut self, group: &H::Group, handle: &mut H) {
        handle.set_group(group);
    }

    /// Attach a host focus group to the encoder view.
    pub fn set_encoder_group<H: IndevHandle>(&mut self, group: &H::Group, handle: &mut H) {
        handle.set_group(group);
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn key_pressed(&self) -> bool {
        self.key_pressed
    }

    pub fn encoder_pressed(&self) -> bool {
        self.enc_pressed
    }

    /// Counter value at the last poll
    pub fn value(&self) -> i32 {
        self.last_value
    }

    /// Protocol driver, for direct register access
    pub fn navkey(&mut self) -> &mut NavKey<I2C, D> {
        &mut self.navkey
    }

    /// Consumes the device, returning the bus and the delay.
    pub fn release(self) -> (I2C, D) {
        self.navkey.release()
    }
}

/// Device shared by its two host views.
pub type SharedNavKey<M, I2C, D> = Mutex<M, RefCell<NavKeyDevice<I2C, D>>>;

/// Keypad view of a shared [`NavKeyDevice`].
pub struct NavKeypad<'a, M: RawMutex, I2C, D>(&'a SharedNavKey<M, I2C, D>);

impl<'a, M: RawMutex, I2C, D> NavKeypad<'a, M, I2C, D> {
    pub fn new(device: &'a SharedNavKey<M, I2C, D>) -> Self {
        Self(device)
    }
}

impl<M: RawMutex, I2C: I2c, D: DelayNs> NavKeypad<'_, M, I2C, D> {
    /// Attach a host focus group to this view.
    pub fn set_group<H: IndevHandle>(&mut self, group: &H::Group, handle: &mut H) {
        self.0.lock(|device| device.borrow_mut().set_keypad_group(group, handle))
    }
}

impl<M: RawMutex, I2C: I2c, D: DelayNs> Indev for NavKeypad<'_, M, I2C, D> {
    fn device_type(&self) -> IndevType {
        IndevType::Keypad
    }

    fn read(&mut self, data: &mut IndevData) {
        self.0.lock(|device| device.borrow_mut().read_keypad(data))
    }
}

/// Encoder view of a shared [`NavKeyDevice`].
pub struct NavEncoder<'a, M: RawMutex, I2C, D>(&'a SharedNavKey<M, I2C, D>);

impl<'a, M: RawMutex, I2C, D> NavEncoder<'a, M, I2C, D> {
    pub fn new(device: &'a SharedNavKey<M, I2C, D>) -> Self {
        Self(device)
    }
}

impl<M: RawMutex, I2C: I2c, D: DelayNs> NavEncoder<'_, M, I2C, D> {
    /// Attach a host focus group to this view.
    pub fn set_group<H: IndevHandle>(&mut self, group: &H::Group, handle: &mut H) {
        self.0.lock(|device| device.borrow_mut().set_encoder_group(group, handle))
    }
}

impl<M: RawMutex, I2C: I2c, D: DelayNs> Indev for NavEncoder<'_, M, I2C, D> {
    fn device_type(&self) -> IndevType {
        IndevType::Encoder
    }

    fn read(&mut self, data: &mut IndevData) {
        self.0.lock(|device| device.borrow_mut().read_encoder(data))
    }
}

impl<I2C: I2c, D: DelayNs> InputDevice for NavKeyDevice<I2C, D> {
    /// Key changes are returned before encoder changes of the same poll.
    async fn read_event(&mut self) -> Event {
        loop {
            if let Some(event) = self.take_key().or_else(|| self.take_encoder()) {
                return event;
            }
            if let Err(e) = self.update() {
                error!("NavKey poll failed: {:?}", e);
            }
            if let Some(event) = self.take_key().or_else(|| self.take_encoder()) {
                return event;
            }
            Timer::after(self.poll_config.interval).await;
        }
    }
}
