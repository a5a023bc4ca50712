//! Buttons read through a hardware pulse counter.
//!
//! The counter unit increments on both edges of the line, so the parity of the count is the button state. Edge
//! counting and glitch filtering happen in hardware, the poll side only reads the count: no interrupt is needed.
//!
//! Counter units are a scarce resource. They are handed out by an explicit [`UnitPool`] which is passed to
//! whoever builds the buttons.
use crate::button::ButtonChannel;
use crate::config::PulseCounterConfig;
use crate::error::Error;

/// A claimed counter unit. Returned to its pool with [`UnitPool::release`].
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnitId(u8);

impl UnitId {
    pub fn index(&self) -> u8 {
        self.0
    }
}

/// Tracks which of the `N` hardware counter units are in use.
pub struct UnitPool<const N: usize> {
    in_use: u32,
}

impl<const N: usize> Default for UnitPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> UnitPool<N> {
    pub const fn new() -> Self {
        assert!(N <= 32, "at most 32 counter units are supported");
        Self { in_use: 0 }
    }

    /// Allocate the lowest free unit.
    pub fn allocate(&mut self) -> Result<UnitId, Error> {
        match (0..N).find(|i| self.in_use & (1 << i) == 0) {
            Some(i) => {
                self.in_use |= 1 << i;
                debug!("Pulse counter unit {} allocated", i);
                Ok(UnitId(i as u8))
            }
            None => {
                error!("No pulse counter unit left, {} in use", N);
                Err(Error::ResourceExhausted)
            }
        }
    }

    /// Claim a specific unit. Fails if it's out of range or already in use.
    pub fn claim(&mut self, index: u8) -> Result<UnitId, Error> {
        let i = index as usize;
        if i >= N || self.in_use & (1 << i) != 0 {
            error!("Pulse counter unit {} is not available", index);
            return Err(Error::ResourceExhausted);
        }
        self.in_use |= 1 << i;
        Ok(UnitId(index))
    }

    /// Give a unit back to the pool.
    pub fn release(&mut self, id: UnitId) {
        self.in_use &= !(1 << id.0);
        debug!("Pulse counter unit {} released", id.0);
    }

    /// Number of free units
    pub fn available(&self) -> usize {
        N - self.in_use.count_ones() as usize
    }
}

/// Hardware pulse counter unit watching one line.
pub trait PulseCounterUnit {
    type Error: core::fmt::Debug;

    /// Set the unit up to count both edges of its line with the glitch filter enabled, then clear and start it.
    fn configure(&mut self, unit: u8, config: &PulseCounterConfig) -> Result<(), Self::Error>;

    /// Read the signed count.
    fn count(&mut self) -> Result<i16, Self::Error>;

    /// Reset the count to zero.
    fn clear(&mut self) -> Result<(), Self::Error>;
}

/// Button state derived from the parity of a pulse counter.
pub struct PulseEdgeCounter<U: PulseCounterUnit> {
    unit: U,
    id: UnitId,
    config: PulseCounterConfig,
    /// Flipped whenever an odd count is cleared, so clearing never changes the observed parity
    parity_offset: bool,
    /// Last observed state, reported when the unit can't be read
    pressed: bool,
}

impl<U: PulseCounterUnit> PulseEdgeCounter<U> {
    /// Configure `unit` as counter `id`.
    pub fn new(mut unit: U, id: UnitId, config: PulseCounterConfig) -> Result<Self, (Error, UnitId)> {
        if unit.configure(id.index(), &config).is_err() {
            error!("Pulse counter unit {} configuration failed", id.index());
            return Err((Error::Counter, id));
        }
        Ok(Self {
            unit,
            id,
            config,
            parity_offset: false,
            pressed: false,
        })
    }

    /// Take a unit from `pool` and configure it. The unit goes back to the pool if configuration fails.
    pub fn allocate<const N: usize>(pool: &mut UnitPool<N>, unit: U, config: PulseCounterConfig) -> Result<Self, Error> {
        let id = pool.allocate()?;
        Self::new(unit, id, config).map_err(|(e, id)| {
            pool.release(id);
            e
        })
    }

    /// Read the raw count. The count is cleared once its magnitude exceeds `max_count`.
    pub fn count(&mut self) -> Result<i16, Error> {
        let count = self.unit.count().map_err(|_| Error::Counter)?;
        if count.unsigned_abs() > self.config.max_count.unsigned_abs() {
            self.clear_after_read(count)?;
        }
        Ok(count)
    }

    /// Reset the count to zero, keeping the observed state.
    pub fn clear(&mut self) -> Result<(), Error> {
        let count = self.unit.count().map_err(|_| Error::Counter)?;
        self.clear_after_read(count)
    }

    /// `count` must be the value read right before the clear.
    fn clear_after_read(&mut self, count: i16) -> Result<(), Error> {
        self.unit.clear().map_err(|_| Error::Counter)?;
        if Self::odd(count) {
            self.parity_offset = !self.parity_offset;
        }
        debug!("Pulse counter unit {} cleared at {}", self.id.index(), count);
        Ok(())
    }

    fn odd(count: i16) -> bool {
        count.rem_euclid(2) == 1
    }

    /// Read the button state from the counter parity.
    pub fn pressed(&mut self) -> Result<bool, Error> {
        let count = self.unit.count().map_err(|_| Error::Counter)?;
        let pressed = Self::odd(count) ^ self.parity_offset;
        if count.unsigned_abs() > self.config.max_count.unsigned_abs() {
            self.clear_after_read(count)?;
        }
        self.pressed = pressed;
        Ok(pressed)
    }

    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// Returns a reference to the counter unit.
    pub fn unit(&mut self) -> &mut U {
        &mut self.unit
    }

    /// Consumes the counter, returning the unit and its id so the id can be released.
    pub fn into_parts(self) -> (U, UnitId) {
        (self.unit, self.id)
    }
}

impl<U: PulseCounterUnit> ButtonChannel for PulseEdgeCounter<U> {
    fn is_pressed(&mut self) -> bool {
        match self.pressed() {
            Ok(pressed) => pressed,
            Err(e) => {
                error!("Pulse counter unit {} read failed: {:?}", self.id.index(), e);
                self.pressed
            }
        }
    }
}
