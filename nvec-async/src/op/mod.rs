//! Protocol values and frames exchanged with the embedded controller.

mod event;
mod request;
mod status;

pub use event::*;
pub use request::*;
pub use status::*;

/// Largest payload a single EC frame can carry.
pub const MAX_PAYLOAD: usize = 30;

/// Payload bytes of a request, response or event frame.
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD>;
