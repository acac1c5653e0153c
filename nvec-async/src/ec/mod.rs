//! The transport contract between a board driver and the embedded controller.

pub(crate) mod err;

pub use err::EcError;

use crate::op::{Event, EventType, RegistrationId, Request, Response};

/// A channel to the embedded controller.
///
/// Implementations own the physical link and the controller's request queue.
/// All methods take `&self`: the controller serialises requests itself, and a
/// driver typically has one task blocked in `wait_event` while another issues
/// requests.
#[allow(async_fn_in_trait)]
pub trait EcTransport {
    /// Transport level error.
    type Error: core::fmt::Debug;

    /// Opens a session with the controller.
    async fn open(&self) -> Result<(), Self::Error>;

    /// Closes the session opened by `open`.
    fn close(&self);

    /// Sends `request` and waits for the matching response.
    ///
    /// A response with a non-success status is still `Ok`; see `request` for
    /// a variant that checks the status.
    async fn send_request(&self, request: &Request) -> Result<Response, Self::Error>;

    /// Subscribes to `events`, buffering at most `depth` undelivered events.
    fn register_for_events(
        &self,
        events: &[EventType],
        depth: u8,
    ) -> Result<RegistrationId, Self::Error>;

    /// Cancels a subscription made with `register_for_events`.
    fn unregister_for_events(&self, registration: RegistrationId);

    /// Waits until the controller delivers an event for `registration`.
    async fn wait_event(&self, registration: RegistrationId) -> Result<Event, Self::Error>;

    /// Sends `request` and fails unless the controller reports success.
    async fn request(&self, request: &Request) -> Result<Response, EcError<Self::Error>> {
        let response = self
            .send_request(request)
            .await
            .map_err(EcError::Transport)?;
        if !response.status.is_success() {
            log::warn!(
                "EC rejected request {:?}/{:#04x}: {:?}",
                request.request_type,
                request.subtype,
                response.status
            );
            return Err(EcError::Status(response.status));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::{KeyboardSubtype, Payload, Status};
    use core::cell::Cell;
    use embassy_futures::block_on;

    struct FixedStatus {
        status: Cell<Status>,
        fail: Cell<bool>,
    }

    impl EcTransport for FixedStatus {
        type Error = &'static str;

        async fn open(&self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn close(&self) {}

        async fn send_request(&self, _request: &Request) -> Result<Response, Self::Error> {
            if self.fail.get() {
                return Err("link down");
            }
            Ok(Response {
                status: self.status.get(),
                payload: Payload::new(),
            })
        }

        fn register_for_events(
            &self,
            _events: &[EventType],
            _depth: u8,
        ) -> Result<RegistrationId, Self::Error> {
            Ok(RegistrationId(0))
        }

        fn unregister_for_events(&self, _registration: RegistrationId) {}

        async fn wait_event(&self, _registration: RegistrationId) -> Result<Event, Self::Error> {
            core::future::pending().await
        }
    }

    #[test]
    fn request_checks_status() {
        let ec = FixedStatus {
            status: Cell::new(Status::Success),
            fail: Cell::new(false),
        };
        let request = Request::keyboard(KeyboardSubtype::Enable, &[]).unwrap();

        assert!(block_on(ec.request(&request)).is_ok());

        ec.status.set(Status::InvalidCommand);
        assert_eq!(
            block_on(ec.request(&request)),
            Err(EcError::Status(Status::InvalidCommand))
        );

        ec.fail.set(true);
        assert_eq!(
            block_on(ec.request(&request)),
            Err(EcError::Transport("link down"))
        );
    }
}
