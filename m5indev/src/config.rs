//! Tunable configurations for the input devices.
//!
//! Every config is a small `Copy` struct with sensible defaults, so boards only override what differs.
use embassy_time::Duration;

use crate::indev::Key;

/// Config for the shift-register debouncer.
#[derive(Clone, Copy, Debug)]
pub struct DebounceConfig {
    /// Maximum time a settle round may spin before it gives up.
    pub budget: Duration,
    /// The line reads low when the switch is closed
    pub low_active: bool,
    /// Skip filtering and take the raw level on every edge
    pub bypass: bool,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            budget: Duration::from_millis(2),
            low_active: true,
            bypass: false,
        }
    }
}

/// Config for a hardware pulse counter unit.
#[derive(Clone, Copy, Debug)]
pub struct PulseCounterConfig {
    /// Glitch filter threshold, in peripheral clock cycles
    pub filter: u16,
    /// The count is cleared once its magnitude exceeds this value
    pub max_count: i16,
    /// Hardware high limit of the counter
    pub high_limit: i16,
    /// Hardware low limit of the counter
    pub low_limit: i16,
}

impl Default for PulseCounterConfig {
    fn default() -> Self {
        Self {
            filter: 1023,
            max_count: 1000,
            high_limit: i16::MAX,
            low_limit: -i16::MAX,
        }
    }
}

/// Config for the three-button encoder.
#[derive(Clone, Copy, Debug)]
pub struct EncoderConfig {
    /// Number of polls a direction button has to be seen pressed to produce one step.
    pub step: u16,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self { step: 3 }
    }
}

/// Which host view the NavKey center key feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CenterKeyRouting {
    /// Center drives the keypad enter key and the encoder's pressed state
    Both,
    /// Center only reaches the keypad view
    KeypadOnly,
    /// Center only reaches the encoder view
    EncoderOnly,
}

/// Host key codes emitted by the NavKey keypad view.
#[derive(Clone, Copy, Debug)]
pub struct NavKeyKeymap {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
    pub center: Key,
    /// Double click on the center key. `None` drops the event.
    pub center_double: Option<Key>,
}

impl Default for NavKeyKeymap {
    fn default() -> Self {
        Self {
            up: Key::UP,
            down: Key::DOWN,
            left: Key::LEFT,
            right: Key::RIGHT,
            center: Key::ENTER,
            center_double: None,
        }
    }
}

/// Config for the I2C NavKey peripheral.
#[derive(Clone, Copy, Debug)]
pub struct NavKeyConfig {
    /// 7-bit I2C address
    pub address: u8,
    /// Lower bound of the rotary value
    pub min: i32,
    /// Upper bound of the rotary value
    pub max: i32,
    /// Increment per detent
    pub step: i32,
    /// Time the peripheral needs after a reset before it accepts register access
    pub reset_delay_us: u32,
    pub center: CenterKeyRouting,
    pub keymap: NavKeyKeymap,
}

impl Default for NavKeyConfig {
    fn default() -> Self {
        Self {
            address: crate::navkey::registers::DEFAULT_ADDRESS,
            min: 0,
            max: 15,
            step: 1,
            reset_delay_us: 400,
            center: CenterKeyRouting::Both,
            keymap: NavKeyKeymap::default(),
        }
    }
}

/// Poll cadence used by the async [`crate::InputDevice`] implementations.
#[derive(Clone, Copy, Debug)]
pub struct PollConfig {
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        // Keeps idle devices from busy looping
        Self {
            interval: Duration::from_millis(20),
        }
    }
}
