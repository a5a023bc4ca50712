//! Register access to a single I2C device.
//!
//! Registers are 1, 2 or 4 bytes wide. Multi-byte values are big-endian, 4-byte values are signed. A failed
//! transaction is returned as [`Error::Transport`], there is no retry at this level.
use embedded_hal::i2c::{I2c, SevenBitAddress};

use crate::error::Error;

pub struct RegisterClient<I2C> {
    i2c: I2C,
    address: SevenBitAddress,
    /// Register address followed by up to 4 data bytes
    buf: [u8; 5],
}

impl<I2C: I2c> RegisterClient<I2C> {
    pub fn new(i2c: I2C, address: SevenBitAddress) -> Self {
        Self { i2c, address, buf: [0; 5] }
    }

    fn read<const N: usize>(&mut self, reg: u8) -> Result<[u8; N], Error> {
        let mut data = [0u8; N];
        self.i2c
            .write_read(self.address, &[reg], &mut data)
            .map_err(Error::transport)?;
        Ok(data)
    }

    fn write(&mut self, reg: u8, data: &[u8]) -> Result<(), Error> {
        let len = data.len() + 1;
        self.buf[0] = reg;
        self.buf[1..len].copy_from_slice(data);
        self.i2c.write(self.address, &self.buf[..len]).map_err(Error::transport)
    }

    pub fn read_u8(&mut self, reg: u8) -> Result<u8, Error> {
        self.read::<1>(reg).map(|[b]| b)
    }

    pub fn write_u8(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        self.write(reg, &[value])
    }

    pub fn read_u16(&mut self, reg: u8) -> Result<u16, Error> {
        self.read::<2>(reg).map(u16::from_be_bytes)
    }

    pub fn write_u16(&mut self, reg: u8, value: u16) -> Result<(), Error> {
        self.write(reg, &value.to_be_bytes())
    }

    pub fn read_i32(&mut self, reg: u8) -> Result<i32, Error> {
        self.read::<4>(reg).map(i32::from_be_bytes)
    }

    pub fn write_i32(&mut self, reg: u8, value: i32) -> Result<(), Error> {
        self.write(reg, &value.to_be_bytes())
    }

    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Consumes the client, returning the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}
