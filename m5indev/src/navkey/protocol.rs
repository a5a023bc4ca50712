//! I2C NavKey protocol: reset, counter bounds, status decoding and counter reads.
//!
//! The peripheral is polled, its interrupt line is not used.
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::registers::*;
use crate::error::Error;
use crate::i2c::RegisterClient;

/// State of one status signal since the last status read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriState {
    /// Pressed, or the positive direction for rotation and bounds
    Pressed,
    /// Released, or the negative direction for rotation and bounds
    Released,
    #[default]
    Unchanged,
}

impl TriState {
    /// The press bit wins if both bits are set.
    pub fn from_bits(press: bool, release: bool) -> Self {
        if press {
            TriState::Pressed
        } else if release {
            TriState::Released
        } else {
            TriState::Unchanged
        }
    }

    /// `Some(pressed)` unless unchanged
    pub fn event(self) -> Option<bool> {
        match self {
            TriState::Pressed => Some(true),
            TriState::Released => Some(false),
            TriState::Unchanged => None,
        }
    }
}

/// Signals decoded from the status register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    Up,
    Down,
    Left,
    Right,
    Center,
    CenterDouble,
    /// Pressed when the counter incremented, released when it decremented
    Rotation,
    /// Pressed when the counter went past max, released when it went past min
    Bound,
}

impl Signal {
    /// Key signals, in the order they are looked at
    pub const KEYS: [Signal; 6] = [
        Signal::Up,
        Signal::Down,
        Signal::Left,
        Signal::Right,
        Signal::Center,
        Signal::CenterDouble,
    ];

    /// Encoder signals, in the order they are looked at
    pub const ENCODER: [Signal; 2] = [Signal::Rotation, Signal::Bound];
}

/// Decoded status register. Every read replaces all signals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status([TriState; 8]);

impl Status {
    pub fn decode(flags: u16) -> Self {
        let bit = |mask: u16| flags & mask != 0;
        Self([
            TriState::from_bits(bit(UPP), bit(UPR)),
            TriState::from_bits(bit(DNP), bit(DNR)),
            TriState::from_bits(bit(LTP), bit(LTR)),
            TriState::from_bits(bit(RTP), bit(RTR)),
            TriState::from_bits(bit(CTRP), bit(CTRR)),
            TriState::from_bits(bit(CTRDP), false),
            TriState::from_bits(bit(RINC), bit(RDEC)),
            TriState::from_bits(bit(RMAX), bit(RMIN)),
        ])
    }

    pub fn get(&self, signal: Signal) -> TriState {
        self.0[signal as usize]
    }

    fn first_event(&self, signals: &[Signal]) -> Option<(Signal, bool)> {
        signals
            .iter()
            .find_map(|&signal| self.get(signal).event().map(|pressed| (signal, pressed)))
    }

    /// First key signal that changed, with its pressed state
    pub fn key_event(&self) -> Option<(Signal, bool)> {
        self.first_event(&Signal::KEYS)
    }

    /// First encoder signal that changed
    pub fn encoder_event(&self) -> Option<(Signal, bool)> {
        self.first_event(&Signal::ENCODER)
    }

    /// Counter movement between two reads, compensating the hardware wrap around.
    ///
    /// Going past max wraps the counter to min: the raw difference is off by minus one modulus. Going past min
    /// is the mirror case.
    pub fn wrapped_diff(&self, previous: i32, current: i32, modulus: i32) -> i32 {
        wrapped_diff(previous, current, self.wraps(), modulus)
    }

    /// Wrap around seen by this status: 1 past max, -1 past min
    pub fn wraps(&self) -> i32 {
        match self.get(Signal::Bound) {
            TriState::Pressed => 1,
            TriState::Released => -1,
            TriState::Unchanged => 0,
        }
    }
}

/// Counter movement from `previous` to `current` with `wraps` wrap arounds in between, positive past max.
///
/// Equal values always give 0.
pub fn wrapped_diff(previous: i32, current: i32, wraps: i32, modulus: i32) -> i32 {
    if current == previous {
        return 0;
    }
    current
        .wrapping_sub(previous)
        .wrapping_add(wraps.wrapping_mul(modulus))
}

/// Counter bounds mirrored from the peripheral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds {
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

impl Bounds {
    /// Number of values in the wrapping range
    pub fn modulus(&self) -> i32 {
        self.max.wrapping_sub(self.min).wrapping_add(1)
    }
}

/// Driver for the I2C NavKey peripheral.
pub struct NavKey<I2C, D> {
    client: RegisterClient<I2C>,
    delay: D,
    reset_delay_us: u32,
    bounds: Bounds,
    status: Status,
    value: i32,
}

impl<I2C: I2c, D: DelayNs> NavKey<I2C, D> {
    /// Create the driver. Nothing is sent to the peripheral until [`NavKey::init`].
    pub fn new(i2c: I2C, address: u8, delay: D, reset_delay_us: u32) -> Self {
        Self {
            client: RegisterClient::new(i2c, address),
            delay,
            reset_delay_us,
            bounds: Bounds { min: 0, max: 0, step: 1 },
            status: Status::default(),
            value: 0,
        }
    }

    /// Reset the peripheral and wait until it's ready again.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.client.write_u8(GCONF, GCONF_RESET)?;
        self.delay.delay_us(self.reset_delay_us);
        self.status = Status::default();
        Ok(())
    }

    /// Reset, then configure an integer counter that wraps at its bounds.
    pub fn init(&mut self) -> Result<(), Error> {
        self.reset()?;
        self.client.write_u8(GCONF, GCONF_WRAPE)?;
        info!("NavKey at {:#x} initialized", self.client.address());
        Ok(())
    }

    /// Write the counter bounds and step.
    pub fn set_bounds(&mut self, min: i32, max: i32, step: i32) -> Result<(), Error> {
        if min > max {
            return Err(Error::InvalidBounds { min, max });
        }
        if step <= 0 {
            return Err(Error::InvalidStep);
        }
        self.client.write_i32(CMAX, max)?;
        self.client.write_i32(CMIN, min)?;
        self.client.write_i32(ISTEP, step)?;
        self.bounds = Bounds { min, max, step };
        info!("NavKey bounds: [{}, {}], step {}", min, max, step);
        Ok(())
    }

    /// Read and decode the status register. The peripheral clears it on read.
    pub fn read_status(&mut self) -> Result<&Status, Error> {
        let flags = self.client.read_u16(ISTATUS)?;
        self.status = Status::decode(flags);
        if flags != 0 {
            trace!("NavKey status: {:#x}", flags);
        }
        Ok(&self.status)
    }

    /// Read the counter value.
    pub fn read_value(&mut self) -> Result<i32, Error> {
        self.value = self.client.read_i32(CVAL)?;
        Ok(self.value)
    }

    /// Status decoded by the last [`NavKey::read_status`]
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Counter value from the last [`NavKey::read_value`]
    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn key_event(&self) -> Option<(Signal, bool)> {
        self.status.key_event()
    }

    pub fn encoder_event(&self) -> Option<(Signal, bool)> {
        self.status.encoder_event()
    }

    /// Counter movement from `previous` to `current`, corrected with the last status.
    pub fn wrapped_diff(&self, previous: i32, current: i32) -> i32 {
        self.status.wrapped_diff(previous, current, self.bounds.modulus())
    }

    /// Consumes the driver, returning the bus and the delay.
    pub fn release(self) -> (I2C, D) {
        (self.client.release(), self.delay)
    }
}
