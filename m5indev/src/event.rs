use crate::indev::Key;

/// Event produced by an input device.
///
/// One event is returned per poll at most. Devices that see several changes between two polls report them one
/// by one on the following polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A keypad key changed state
    Key { key: Key, pressed: bool },
    /// A button of a multi-button device changed state
    Button { id: u8, pressed: bool },
    /// An encoder moved, or its confirm button changed state
    Encoder { diff: i16, pressed: bool },
}

impl Event {
    pub fn key(key: Key, pressed: bool) -> Self {
        Event::Key { key, pressed }
    }

    pub fn button(id: u8, pressed: bool) -> Self {
        Event::Button { id, pressed }
    }

    pub fn encoder(diff: i16, pressed: bool) -> Self {
        Event::Encoder { diff, pressed }
    }

    /// Pressed state carried by the event
    pub fn pressed(&self) -> bool {
        match self {
            Event::Key { pressed, .. } | Event::Button { pressed, .. } | Event::Encoder { pressed, .. } => *pressed,
        }
    }
}
