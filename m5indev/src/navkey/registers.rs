//! I2C NavKey register map.

/// Address with no address pads soldered
pub const DEFAULT_ADDRESS: u8 = 0x10;

// ============================================================================
// Registers
// ============================================================================
/// General configuration, 1 byte
pub const GCONF: u8 = 0x00;
/// Interrupt status, 2 bytes, cleared on read
pub const ISTATUS: u8 = 0x06;
/// Counter value, 4 bytes signed
pub const CVAL: u8 = 0x0A;
/// Counter max, 4 bytes signed
pub const CMAX: u8 = 0x0E;
/// Counter min, 4 bytes signed
pub const CMIN: u8 = 0x12;
/// Increment step, 4 bytes signed
pub const ISTEP: u8 = 0x16;

// ============================================================================
// GCONF flags
// ============================================================================
/// Counter data type: 0 for integer, 1 for float
pub const GCONF_DTYPE: u8 = 1 << 0;
/// Wrap the counter at its bounds instead of saturating
pub const GCONF_WRAPE: u8 = 1 << 1;
/// Rotation direction
pub const GCONF_DIRE: u8 = 1 << 2;
/// Reset the board
pub const GCONF_RESET: u8 = 1 << 7;

// ============================================================================
// ISTATUS flags
// ============================================================================
pub const UPR: u16 = 1 << 0;
pub const UPP: u16 = 1 << 1;
pub const DNR: u16 = 1 << 2;
pub const DNP: u16 = 1 << 3;
pub const RTR: u16 = 1 << 4;
pub const RTP: u16 = 1 << 5;
pub const LTR: u16 = 1 << 6;
pub const LTP: u16 = 1 << 7;
pub const CTRR: u16 = 1 << 8;
pub const CTRP: u16 = 1 << 9;
pub const CTRDP: u16 = 1 << 10;
/// Counter incremented
pub const RINC: u16 = 1 << 11;
/// Counter decremented
pub const RDEC: u16 = 1 << 12;
/// Counter went past max
pub const RMAX: u16 = 1 << 13;
/// Counter went past min
pub const RMIN: u16 = 1 << 14;
