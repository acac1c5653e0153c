//! Keyboard LED mask.

use bitflags::bitflags;

bitflags! {
    /// Keyboard LEDs, in the layout of the `SetLeds` payload byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Leds: u8 {
        const SCROLL_LOCK = 1 << 0;
        const NUM_LOCK = 1 << 1;
        const CAPS_LOCK = 1 << 2;
    }
}

impl Leds {
    /// The state after flipping every LED in `requested`. Other LEDs keep their state.
    pub fn toggled(self, requested: Leds) -> Leds {
        self.symmetric_difference(requested)
    }
}
