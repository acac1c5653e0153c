//! Status codes returned by the controller.

/// Outcome of a request, as reported in the response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Timeout,
    ParityError,
    Unavailable,
    InvalidCommand,
    InvalidSize,
    InvalidParameter,
    UnsupportedConfiguration,
    ChecksumFailure,
    WriteFailure,
    ReadFailure,
    Overflow,
    Underflow,
    InvalidData,
    /// A code this crate does not know about.
    Unknown(u8),
}

impl Status {
    /// Returns `true` if the controller accepted the request.
    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

impl From<u8> for Status {
    fn from(code: u8) -> Self {
        match code {
            0x00 => Status::Success,
            0x01 => Status::Timeout,
            0x02 => Status::ParityError,
            0x03 => Status::Unavailable,
            0x04 => Status::InvalidCommand,
            0x05 => Status::InvalidSize,
            0x06 => Status::InvalidParameter,
            0x07 => Status::UnsupportedConfiguration,
            0x08 => Status::ChecksumFailure,
            0x09 => Status::WriteFailure,
            0x0A => Status::ReadFailure,
            0x0B => Status::Overflow,
            0x0C => Status::Underflow,
            0x0D => Status::InvalidData,
            other => Status::Unknown(other),
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => 0x00,
            Status::Timeout => 0x01,
            Status::ParityError => 0x02,
            Status::Unavailable => 0x03,
            Status::InvalidCommand => 0x04,
            Status::InvalidSize => 0x05,
            Status::InvalidParameter => 0x06,
            Status::UnsupportedConfiguration => 0x07,
            Status::ChecksumFailure => 0x08,
            Status::WriteFailure => 0x09,
            Status::ReadFailure => 0x0A,
            Status::Overflow => 0x0B,
            Status::Underflow => 0x0C,
            Status::InvalidData => 0x0D,
            Status::Unknown(code) => code,
        }
    }
}
