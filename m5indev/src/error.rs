use core::fmt;

use embedded_hal::i2c::ErrorKind;

/// Errors reported by the input devices and their hardware glue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// An I2C transaction failed. The peripheral should be considered unresponsive until it is initialized again.
    Transport(ErrorKind),
    /// No free pulse counter unit is left.
    ResourceExhausted,
    /// A fixed-capacity list is full.
    CapacityExceeded,
    /// Encoder bounds where `min > max`.
    InvalidBounds { min: i32, max: i32 },
    /// Quantization step of zero.
    InvalidStep,
    /// The pulse counter hardware rejected a configuration or read.
    Counter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(kind) => write!(f, "i2c transport error: {kind}"),
            Error::ResourceExhausted => f.write_str("no pulse counter unit available"),
            Error::CapacityExceeded => f.write_str("device capacity exceeded"),
            Error::InvalidBounds { min, max } => write!(f, "invalid encoder bounds [{min}, {max}]"),
            Error::InvalidStep => f.write_str("step must be greater than zero"),
            Error::Counter => f.write_str("pulse counter hardware error"),
        }
    }
}

impl core::error::Error for Error {}

impl Error {
    pub(crate) fn transport<E: embedded_hal::i2c::Error>(e: E) -> Self {
        Error::Transport(e.kind())
    }
}
