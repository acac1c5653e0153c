//! Unsolicited event frames.

use super::{Payload, PayloadOverflow};

/// Kinds of events the controller can deliver.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// Scan Code Set 1 bytes from the keyboard scanner.
    Keyboard = 0,
    AuxDevice0 = 1,
    AuxDevice1 = 2,
    AuxDevice2 = 3,
    AuxDevice3 = 4,
    System = 5,
}

impl From<EventType> for u8 {
    fn from(val: EventType) -> Self {
        val as u8
    }
}

/// Handle for an event registration, issued by `EcTransport::register_for_events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationId(pub u8);

/// An event delivered by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// What produced the event.
    pub event_type: EventType,
    /// Raw event bytes.
    pub payload: Payload,
}

impl Event {
    /// A keyboard event carrying `bytes`.
    ///
    /// Fails if `bytes` does not fit in a single frame.
    pub fn keyboard(bytes: &[u8]) -> Result<Self, PayloadOverflow> {
        let payload = Payload::from_slice(bytes).map_err(|_| PayloadOverflow)?;
        Ok(Self {
            event_type: EventType::Keyboard,
            payload,
        })
    }
}
