//! Error types for the keyboard driver.

use core::fmt::{self, Debug};

use nvec_async::op::PayloadOverflow;
use nvec_async::EcError;

use crate::scancode::DecodeError;

/// Errors returned by a running `KeyboardDriver`.
pub enum KeyboardError<TERR> {
    /// Talking to the embedded controller failed.
    Ec(EcError<TERR>),
    /// The event did not decode to a key.
    Decode(DecodeError),
    /// The controller delivered an event without scan code bytes.
    EmptyEvent,
    /// No event arrived before the timeout.
    Timeout,
    /// The driver was stopped.
    Stopped,
}

impl<TERR: Debug> Debug for KeyboardError<TERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ec(err) => write!(f, "Ec({err:?})"),
            Self::Decode(err) => write!(f, "Decode({err:?})"),
            Self::EmptyEvent => write!(f, "EmptyEvent"),
            Self::Timeout => write!(f, "Timeout"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

impl<TERR: PartialEq> PartialEq for KeyboardError<TERR> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ec(a), Self::Ec(b)) => a == b,
            (Self::Decode(a), Self::Decode(b)) => a == b,
            (Self::EmptyEvent, Self::EmptyEvent)
            | (Self::Timeout, Self::Timeout)
            | (Self::Stopped, Self::Stopped) => true,
            _ => false,
        }
    }
}

impl<TERR> From<EcError<TERR>> for KeyboardError<TERR> {
    fn from(err: EcError<TERR>) -> Self {
        KeyboardError::Ec(err)
    }
}

impl<TERR> From<PayloadOverflow> for KeyboardError<TERR> {
    fn from(err: PayloadOverflow) -> Self {
        KeyboardError::Ec(err.into())
    }
}

impl<TERR> From<DecodeError> for KeyboardError<TERR> {
    fn from(err: DecodeError) -> Self {
        KeyboardError::Decode(err)
    }
}

/// Errors returned by `KeyboardDriver::init`.
///
/// Every resource acquired before the failure has been released when this
/// error is returned.
pub enum InitError<TERR, TWAKEERR> {
    /// The controller could not be opened or refused a setup request.
    Ec(EcError<TERR>),
    /// The wake source could not be registered or enabled.
    Wake(TWAKEERR),
}

impl<TERR: Debug, TWAKEERR: Debug> Debug for InitError<TERR, TWAKEERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ec(err) => write!(f, "Ec({err:?})"),
            Self::Wake(err) => write!(f, "Wake({err:?})"),
        }
    }
}

impl<TERR, TWAKEERR> From<EcError<TERR>> for InitError<TERR, TWAKEERR> {
    fn from(err: EcError<TERR>) -> Self {
        InitError::Ec(err)
    }
}

impl<TERR, TWAKEERR> From<PayloadOverflow> for InitError<TERR, TWAKEERR> {
    fn from(err: PayloadOverflow) -> Self {
        InitError::Ec(err.into())
    }
}
