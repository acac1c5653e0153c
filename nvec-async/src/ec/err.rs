//! Error types for EC requests.

use core::fmt::{self, Debug};

use crate::op::{PayloadOverflow, Status};

/// The main error type for EC requests.
pub enum EcError<TERR> {
    /// The transport failed to deliver the request or the answer.
    Transport(TERR),
    /// The controller answered with a non-success status.
    Status(Status),
    /// The request payload did not fit in a frame.
    Overflow,
}

impl<TERR: Debug> Debug for EcError<TERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "Transport({err:?})"),
            Self::Status(status) => write!(f, "Status({status:?})"),
            Self::Overflow => write!(f, "Overflow"),
        }
    }
}

impl<TERR: PartialEq> PartialEq for EcError<TERR> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Transport(a), Self::Transport(b)) => a == b,
            (Self::Status(a), Self::Status(b)) => a == b,
            (Self::Overflow, Self::Overflow) => true,
            _ => false,
        }
    }
}

impl<TERR> From<PayloadOverflow> for EcError<TERR> {
    fn from(_: PayloadOverflow) -> Self {
        EcError::Overflow
    }
}
