//! Hold switch support.
//!
//! Some boards of this family have a "hold" slider that locks the keys. This
//! one does not, so initialization always reports it as unsupported.

/// Errors returned by `HoldSwitch::init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldSwitchError {
    /// The board has no hold switch.
    Unsupported,
}

/// Handle to the board's hold switch.
#[derive(Debug)]
pub struct HoldSwitch {
    _private: (),
}

impl HoldSwitch {
    /// Initializes the hold switch.
    pub fn init() -> Result<Self, HoldSwitchError> {
        log::debug!("hold switch: not present on this board");
        Err(HoldSwitchError::Unsupported)
    }
}
