//! Fixed group of anonymous buttons, reported to the host as button ids.
//!
//! Every line is compared against the last known state on each update. Lines that changed are marked pending
//! and reported one per update, lowest index first. Simultaneous changes are serialized over the following
//! polls, ordered by index rather than by time of occurrence.
use embassy_time::Timer;

use crate::button::ButtonChannel;
use crate::config::PollConfig;
use crate::event::Event;
use crate::indev::{Area, Indev, IndevData, IndevHandle, IndevType, Point};
use crate::input_device::InputDevice;

pub struct MultiButtonDevice<B: ButtonChannel, const N: usize> {
    buttons: [B; N],
    /// Last known pressed state, one bit per line
    state: u32,
    /// Changes not reported yet, one bit per line
    left: u32,
    /// Button id reported last
    active: u8,
    pressed: bool,
    changed: bool,
    /// Host objects linked to each button
    linked: [Option<Area>; N],
    /// Points pressed on behalf of each button
    points: [Point; N],
    poll_config: PollConfig,
}

impl<B: ButtonChannel, const N: usize> MultiButtonDevice<B, N> {
    pub fn new(buttons: [B; N], poll_config: PollConfig) -> Self {
        const { assert!(N > 0 && N <= 32, "between 1 and 32 buttons are supported") };
        Self {
            buttons,
            state: 0,
            left: 0,
            active: 0,
            pressed: false,
            changed: false,
            linked: [None; N],
            points: [Point::ORIGIN; N],
            poll_config,
        }
    }

    /// Sample all lines, then report at most one pending change.
    pub fn update(&mut self) {
        for (i, button) in self.buttons.iter_mut().enumerate() {
            let mask = 1 << i;
            let pressed = button.is_pressed();
            if pressed != (self.state & mask != 0) {
                self.state ^= mask;
                self.left |= mask;
            }
        }

        if self.left == 0 {
            self.changed = false;
            return;
        }

        let i = self.left.trailing_zeros();
        let mask = 1 << i;
        self.left &= !mask;
        self.active = i as u8;
        self.pressed = self.state & mask != 0;
        self.changed = true;
        debug!("Button {} {}", self.active, if self.pressed { "pressed" } else { "released" });
    }

    /// Update, then return the change reported by this update, if any.
    pub fn poll(&mut self) -> Option<Event> {
        self.update();
        self.take_changed().then(|| Event::button(self.active, self.pressed))
    }

    /// Read and clear the changed flag.
    pub fn take_changed(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }

    /// Button id reported last
    pub fn active_button(&self) -> u8 {
        self.active
    }

    pub fn pressed(&self) -> bool {
        self.pressed
    }

    /// Number of changes waiting to be reported
    pub fn pending(&self) -> u32 {
        self.left.count_ones()
    }

    /// Link every button to a host object and push the points to `handle`.
    ///
    /// An unlinked button presses the screen origin.
    pub fn set_linked_buttons<H: IndevHandle>(&mut self, areas: [Option<Area>; N], handle: &mut H) {
        self.linked = areas;
        self.update_points(handle);
    }

    /// Link button `id` to a host object and push the points to `handle`. Ids out of range are ignored.
    pub fn set_linked_button<H: IndevHandle>(&mut self, id: usize, area: Option<Area>, handle: &mut H) {
        match self.linked.get_mut(id) {
            Some(slot) => *slot = area,
            None => {
                warn!("Button {} does not exist, {} buttons", id, N);
                return;
            }
        }
        self.update_points(handle);
    }

    /// Recompute the points from the linked objects and push them to `handle`.
    pub fn update_points<H: IndevHandle>(&mut self, handle: &mut H) {
        for (point, linked) in self.points.iter_mut().zip(self.linked.iter()) {
            *point = linked.map(|area| area.center()).unwrap_or(Point::ORIGIN);
        }
        handle.set_button_points(&self.points);
    }

    pub fn points(&self) -> &[Point; N] {
        &self.points
    }
}

impl<B: ButtonChannel, const N: usize> Indev for MultiButtonDevice<B, N> {
    fn device_type(&self) -> IndevType {
        IndevType::Button
    }

    fn read(&mut self, data: &mut IndevData) {
        self.update();
        data.btn_id = self.active as u32;
        data.state = self.pressed.into();
        if self.take_changed() {
            debug!("Button reader: id {}, state {:?}", data.btn_id, data.state);
        }
    }
}

impl<B: ButtonChannel, const N: usize> InputDevice for MultiButtonDevice<B, N> {
    async fn read_event(&mut self) -> Event {
        loop {
            if let Some(event) = self.poll() {
                return event;
            }
            Timer::after(self.poll_config.interval).await;
        }
    }
}
