//! Host GUI toolkit boundary.
//!
//! The toolkit owns device registration, widgets and focus groups. This module only describes what
//! crosses the boundary: the read record filled on every refresh, and the driver handle the toolkit hands
//! back after registration.

/// Kind of input device, as registered with the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndevType {
    Keypad,
    Button,
    Encoder,
}

/// Pressed state reported to the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndevState {
    Pressed,
    #[default]
    Released,
}

impl From<bool> for IndevState {
    fn from(pressed: bool) -> Self {
        if pressed { IndevState::Pressed } else { IndevState::Released }
    }
}

/// Host key code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Key(pub u32);

impl Key {
    pub const HOME: Key = Key(2);
    pub const END: Key = Key(3);
    pub const BACKSPACE: Key = Key(8);
    pub const NEXT: Key = Key(9);
    pub const ENTER: Key = Key(10);
    pub const PREV: Key = Key(11);
    pub const UP: Key = Key(17);
    pub const DOWN: Key = Key(18);
    pub const RIGHT: Key = Key(19);
    pub const LEFT: Key = Key(20);
    pub const ESC: Key = Key(27);
    pub const DEL: Key = Key(127);
}

/// Screen coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Screen area of a host object, corners inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x1: i16,
    pub y1: i16,
    pub x2: i16,
    pub y2: i16,
}

impl Area {
    pub const fn new(x1: i16, y1: i16, x2: i16, y2: i16) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Center of the area, the point a button press is simulated at.
    pub fn center(&self) -> Point {
        // Widen first, corners may sit near i16 limits
        let x = (self.x1 as i32 + self.x2 as i32).div_euclid(2);
        let y = (self.y1 as i32 + self.y2 as i32).div_euclid(2);
        Point::new(x as i16, y as i16)
    }
}

/// The record a host read callback fills.
///
/// Only the field matching the device type is meaningful: `key` for keypads, `btn_id` for buttons and
/// `enc_diff` for encoders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndevData {
    pub key: Key,
    pub btn_id: u32,
    pub enc_diff: i16,
    pub state: IndevState,
}

/// A device the host can read on its refresh cycle.
///
/// `read` runs the device update and fills `data`. It never fails: hardware errors are logged and the last
/// known state is reported.
///
/// Devices are single owner. Calling `read` from two contexts at once is not supported, the caller must make
/// sure only one poller is active.
pub trait Indev {
    fn device_type(&self) -> IndevType;

    fn read(&mut self, data: &mut IndevData);
}

/// Driver handle returned by the host when a device is registered.
///
/// The devices keep no reference to it; they only push configuration through it when asked to.
pub trait IndevHandle {
    /// Focus group type of the host toolkit
    type Group: ?Sized;

    /// Attach a focus group to a keypad or encoder device.
    fn set_group(&mut self, group: &Self::Group);

    /// Set the points pressed on behalf of each physical button of a button device.
    fn set_button_points(&mut self, points: &[Point]);
}
