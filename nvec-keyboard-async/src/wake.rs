//! Wake-on-keypress sources.
//!
//! On this board the controller raises a GPIO line when a key is pressed
//! while the system sleeps. The driver registers that line with a debounce
//! interval and enables it before asking the controller to arm key wake.

use core::convert::Infallible;
use core::fmt::Debug;

use embassy_time::{Duration, Timer};
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

/// Debounce interval of the wake line.
pub const DEBOUNCE: Duration = Duration::from_millis(5);

/// A hardware signal that can resume the system from a low power state.
pub trait WakeSource {
    /// Error raised while setting up the source.
    type Error: Debug;

    /// Claims the source, filtering glitches shorter than `debounce`.
    fn register(&mut self, debounce: Duration) -> Result<(), Self::Error>;

    /// Starts reporting wake events. Only valid after `register`.
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Releases the source. Safe to call whether or not `enable` succeeded.
    fn unregister(&mut self);
}

/// Placeholder for drivers configured without a wake source.
pub enum NoWakeSource {}

impl WakeSource for NoWakeSource {
    type Error = Infallible;

    fn register(&mut self, _debounce: Duration) -> Result<(), Self::Error> {
        match *self {}
    }

    fn enable(&mut self) -> Result<(), Self::Error> {
        match *self {}
    }

    fn unregister(&mut self) {
        match *self {}
    }
}

/// Errors of a `PinWakeSource`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinWakeError<E> {
    /// Reading or waiting on the pin failed.
    Pin(E),
    /// `register` was called twice.
    AlreadyRegistered,
    /// The source was used before `register`.
    NotRegistered,
    /// `wait_for_wake` was called while the source is disabled.
    Disabled,
}

/// A wake source on an active-low GPIO input.
pub struct PinWakeSource<P> {
    pin: P,
    debounce: Option<Duration>,
    enabled: bool,
}

impl<P, E> PinWakeSource<P>
where
    P: InputPin<Error = E> + Wait<Error = E>,
    E: Debug,
{
    /// Creates a new `PinWakeSource`.
    ///
    /// # Arguments
    ///
    /// * `pin` - The wake line from the controller, low while a key is pressed.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            debounce: None,
            enabled: false,
        }
    }

    /// Returns `true` between a successful `enable` and `unregister`.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Waits for the line to fall, then checks it again after the debounce
    /// interval.
    ///
    /// # Returns
    ///
    /// `true` if the line is still asserted, `false` for a glitch.
    pub async fn wait_for_wake(&mut self) -> Result<bool, PinWakeError<E>> {
        let debounce = self.debounce.ok_or(PinWakeError::NotRegistered)?;
        if !self.enabled {
            return Err(PinWakeError::Disabled);
        }
        self.pin
            .wait_for_falling_edge()
            .await
            .map_err(PinWakeError::Pin)?;
        Timer::after(debounce).await;
        self.pin.is_low().map_err(PinWakeError::Pin)
    }

    /// Releases the pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P, E> WakeSource for PinWakeSource<P>
where
    P: InputPin<Error = E> + Wait<Error = E>,
    E: Debug,
{
    type Error = PinWakeError<E>;

    fn register(&mut self, debounce: Duration) -> Result<(), Self::Error> {
        if self.debounce.is_some() {
            return Err(PinWakeError::AlreadyRegistered);
        }
        self.debounce = Some(debounce);
        log::trace!("wake pin registered, debounce {} ms", debounce.as_millis());
        Ok(())
    }

    fn enable(&mut self) -> Result<(), Self::Error> {
        if self.debounce.is_none() {
            return Err(PinWakeError::NotRegistered);
        }
        self.enabled = true;
        Ok(())
    }

    fn unregister(&mut self) {
        self.enabled = false;
        self.debounce = None;
        log::trace!("wake pin unregistered");
    }
}
