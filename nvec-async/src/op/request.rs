//! Request and response frames.

use super::{Payload, Status};

/// Main command category of a request.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    /// System status and configuration.
    System = 0x01,
    /// Battery gauge.
    Battery = 0x02,
    /// EC-owned GPIO lines.
    Gpio = 0x03,
    /// Sleep state control.
    Sleep = 0x04,
    /// Keyboard scanner.
    Keyboard = 0x05,
    /// Auxiliary (PS/2 style) devices.
    AuxDevice = 0x06,
    /// EC control.
    Control = 0x07,
    /// OEM specific category 0.
    Oem0 = 0x0D,
    /// OEM specific category 1.
    Oem1 = 0x0E,
}

impl From<RequestType> for u8 {
    fn from(val: RequestType) -> Self {
        val as u8
    }
}

/// Sub-commands of the `Keyboard` request category.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardSubtype {
    /// Arms the keyboard as a wake source.
    ConfigureWake = 0x03,
    /// Reports the key that woke the system once it resumes.
    ConfigureWakeKeyReport = 0x04,
    /// Programs the keyboard LEDs. One payload byte carries the LED mask.
    SetLeds = 0xED,
    /// Starts keyboard scanning.
    Enable = 0xF4,
    /// Stops keyboard scanning.
    Disable = 0xF5,
    /// Resets the keyboard scanner.
    Reset = 0xFF,
}

impl From<KeyboardSubtype> for u8 {
    fn from(val: KeyboardSubtype) -> Self {
        val as u8
    }
}

/// First payload byte of `ConfigureWake`: enable wake.
pub const WAKE_ACTION_ENABLE: u8 = 0x01;
/// Second payload byte of `ConfigureWake`: any key press wakes.
pub const WAKE_EVENT_ANY_KEY_PRESS: u8 = 0x01;
/// Payload byte of `ConfigureWakeKeyReport`: report the wake key.
pub const WAKE_KEY_REPORT_ENABLE: u8 = 0x01;

/// The payload does not fit in a single EC frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadOverflow;

/// A request frame sent to the embedded controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Main command category.
    pub request_type: RequestType,
    /// Category specific sub-command.
    pub subtype: u8,
    /// Command arguments.
    pub payload: Payload,
}

impl Request {
    /// Creates a request, copying `payload` into the frame.
    pub fn new(
        request_type: RequestType,
        subtype: u8,
        payload: &[u8],
    ) -> Result<Self, PayloadOverflow> {
        let payload = Payload::from_slice(payload).map_err(|_| PayloadOverflow)?;
        Ok(Self {
            request_type,
            subtype,
            payload,
        })
    }

    /// Creates a `Keyboard` category request.
    pub fn keyboard(subtype: KeyboardSubtype, payload: &[u8]) -> Result<Self, PayloadOverflow> {
        Self::new(RequestType::Keyboard, subtype.into(), payload)
    }
}

/// The controller's answer to a `Request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Outcome reported by the controller.
    pub status: Status,
    /// Response data, if the command returns any.
    pub payload: Payload,
}

impl Response {
    /// A successful response without data.
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            payload: Payload::new(),
        }
    }
}
