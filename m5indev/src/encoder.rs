//! Encoder built from three buttons: decrement, confirm and increment.
//!
//! Holding a direction button accumulates one raw count per update. The host sees one step every `step`
//! counts, the remainder is kept for the next read. Releasing both direction buttons drops the remainder.
//!
//! Steps are counted in updates, so the async surface waits one poll interval before every update.
use embassy_time::Timer;

use crate::button::ButtonChannel;
use crate::config::{EncoderConfig, PollConfig};
use crate::error::Error;
use crate::event::Event;
use crate::indev::{Indev, IndevData, IndevHandle, IndevType};
use crate::input_device::InputDevice;

pub struct ButtonEncoder<D: ButtonChannel, C: ButtonChannel, I: ButtonChannel> {
    decrement: D,
    confirm: C,
    increment: I,
    /// Raw counts not reported yet
    accumulator: i32,
    step: i32,
    /// Confirm button state
    pressed: bool,
    changed: bool,
    /// Confirm button changed since the last poll
    confirm_changed: bool,
    poll_config: PollConfig,
}

impl<D: ButtonChannel, C: ButtonChannel, I: ButtonChannel> ButtonEncoder<D, C, I> {
    pub fn new(
        decrement: D,
        confirm: C,
        increment: I,
        config: EncoderConfig,
        poll_config: PollConfig,
    ) -> Result<Self, Error> {
        if config.step == 0 {
            return Err(Error::InvalidStep);
        }
        Ok(Self {
            decrement,
            confirm,
            increment,
            accumulator: 0,
            step: config.step as i32,
            pressed: false,
            changed: false,
            confirm_changed: false,
            poll_config,
        })
    }

    /// Sample the three buttons.
    pub fn update(&mut self) {
        let mut delta = 0;
        let mut idle = true;
        if self.decrement.is_pressed() {
            delta -= 1;
            idle = false;
        }
        if self.increment.is_pressed() {
            delta += 1;
            idle = false;
        }

        if idle {
            self.accumulator = 0;
        } else {
            self.accumulator = self.accumulator.saturating_add(delta);
        }
        if delta != 0 {
            self.changed = true;
        }

        let pressed = self.confirm.is_pressed();
        if pressed != self.pressed {
            self.pressed = pressed;
            self.changed = true;
            self.confirm_changed = true;
        }
    }

    /// Take the whole steps out of the accumulator.
    ///
    /// Truncates toward zero on both sides, the remainder stays for later reads.
    pub fn diff(&mut self) -> i16 {
        let steps = self.accumulator / self.step;
        self.accumulator -= steps * self.step;
        steps.clamp(i16::MIN as i32, i16::MAX as i32) as i16
    }

    /// Raw counts waiting for the next step
    pub fn remainder(&self) -> i32 {
        self.accumulator
    }

    pub fn pressed(&self) -> bool {
        self.pressed
    }

    /// Read and clear the changed flag.
    pub fn take_changed(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }

    /// Update, then return a whole step or a confirm change, if any.
    ///
    /// Counts that don't make a full step yet produce no event.
    pub fn poll(&mut self) -> Option<Event> {
        self.update();
        let diff = self.diff();
        self.changed = false;
        let confirm_changed = core::mem::take(&mut self.confirm_changed);
        (confirm_changed || diff != 0).then(|| Event::encoder(diff, self.pressed))
    }

    /// Attach a host focus group to this encoder.
    pub fn set_group<H: IndevHandle>(&mut self, group: &H::Group, handle: &mut H) {
        handle.set_group(group);
    }
}

impl<D: ButtonChannel, C: ButtonChannel, I: ButtonChannel> Indev for ButtonEncoder<D, C, I> {
    fn device_type(&self) -> IndevType {
        IndevType::Encoder
    }

    fn read(&mut self, data: &mut IndevData) {
        self.update();
        data.enc_diff = self.diff();
        data.state = self.pressed.into();
        self.confirm_changed = false;
        if self.take_changed() {
            debug!(
                "Encoder reader: diff {} (remainder {}), state {:?}",
                data.enc_diff, self.accumulator, data.state
            );
        }
    }
}

impl<D: ButtonChannel, C: ButtonChannel, I: ButtonChannel> InputDevice for ButtonEncoder<D, C, I> {
    async fn read_event(&mut self) -> Event {
        loop {
            Timer::after(self.poll_config.interval).await;
            if let Some(event) = self.poll() {
                return event;
            }
        }
    }
}
