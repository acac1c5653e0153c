//! Core implementation of the NVEC keyboard driver.

use core::cell::Cell;
use core::convert::Infallible;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Sender;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};
use nvec_async::op::{
    Event, EventType, KeyboardSubtype, RegistrationId, Request, WAKE_ACTION_ENABLE,
    WAKE_EVENT_ANY_KEY_PRESS, WAKE_KEY_REPORT_ENABLE,
};
use nvec_async::{EcError, EcTransport};

use crate::err::{InitError, KeyboardError};
use crate::leds::Leds;
use crate::scancode::{self, DecodedKeyEvent};
use crate::wake::{NoWakeSource, WakeSource, DEBOUNCE};

/// Configuration for the keyboard driver.
#[derive(Debug, Clone)]
pub struct KeyboardConfig {
    /// Debounce interval passed to the wake source.
    pub debounce: Duration,
    /// Number of undelivered events the controller may buffer.
    pub event_depth: u8,
    /// Ask the controller to report the key that woke the system.
    pub report_wake_key: bool,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE,
            event_depth: 1,
            report_wake_key: true,
        }
    }
}

/// Items produced by `KeyboardDriver::run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMessage {
    /// A decoded key event.
    Key(DecodedKeyEvent),
    /// The pump has ended. Nothing follows.
    Closed,
}

/// Open EC session, closed on drop.
struct Session<'a, T: EcTransport> {
    ec: &'a T,
}

impl<'a, T: EcTransport> Session<'a, T> {
    async fn open(ec: &'a T) -> Result<Self, T::Error> {
        ec.open().await?;
        log::trace!("keyboard: EC session opened");
        Ok(Self { ec })
    }
}

impl<T: EcTransport> Drop for Session<'_, T> {
    fn drop(&mut self) {
        self.ec.close();
        log::trace!("keyboard: EC session closed");
    }
}

/// Keyboard event registration, cancelled on drop.
struct Subscription<'a, T: EcTransport> {
    ec: &'a T,
    id: RegistrationId,
}

impl<'a, T: EcTransport> Subscription<'a, T> {
    fn register(ec: &'a T, depth: u8) -> Result<Self, T::Error> {
        let id = ec.register_for_events(&[EventType::Keyboard], depth)?;
        log::trace!("keyboard: registered for events as {id:?}");
        Ok(Self { ec, id })
    }
}

impl<T: EcTransport> Drop for Subscription<'_, T> {
    fn drop(&mut self) {
        self.ec.unregister_for_events(self.id);
        log::trace!("keyboard: event registration {:?} cancelled", self.id);
    }
}

/// Registered and enabled wake source, unregistered on drop.
struct ArmedWake<W: WakeSource> {
    source: W,
}

impl<W: WakeSource> ArmedWake<W> {
    fn arm(mut source: W, debounce: Duration) -> Result<Self, W::Error> {
        source.register(debounce)?;
        let mut armed = Self { source };
        armed.source.enable()?;
        Ok(armed)
    }
}

impl<W: WakeSource> Drop for ArmedWake<W> {
    fn drop(&mut self) {
        self.source.unregister();
    }
}

/// A controller for the keyboard behind the NVEC embedded controller.
///
/// All operations take `&self`, so one task can pump events with `run` or
/// `next_key` while another toggles LEDs. Dropping the driver releases the
/// event registration, the wake source and the EC session, in that order.
pub struct KeyboardDriver<'a, T: EcTransport, W: WakeSource = NoWakeSource> {
    // Fields drop in declaration order, the reverse of `init`.
    subscription: Subscription<'a, T>,
    wake: Option<ArmedWake<W>>,
    session: Session<'a, T>,
    leds: Mutex<CriticalSectionRawMutex, Leds>,
    stop: Signal<CriticalSectionRawMutex, ()>,
    stopped: BlockingMutex<CriticalSectionRawMutex, Cell<bool>>,
}

impl<'a, T: EcTransport> KeyboardDriver<'a, T, NoWakeSource> {
    /// Initializes the keyboard without a wake source.
    pub async fn without_wake(
        ec: &'a T,
        config: &KeyboardConfig,
    ) -> Result<Self, InitError<T::Error, Infallible>> {
        Self::init(ec, None, config).await
    }
}

impl<'a, T: EcTransport, W: WakeSource> KeyboardDriver<'a, T, W> {
    /// Initializes the keyboard.
    ///
    /// Opens the EC session, starts keyboard scanning, arms `wake` (when
    /// given) and registers for keyboard events. On failure everything
    /// acquired so far is released in reverse order.
    ///
    /// # Arguments
    ///
    /// * `ec` - The embedded controller transport.
    /// * `wake` - An optional wake-on-keypress source.
    /// * `config` - Driver configuration.
    pub async fn init(
        ec: &'a T,
        wake: Option<W>,
        config: &KeyboardConfig,
    ) -> Result<Self, InitError<T::Error, W::Error>> {
        let session = Session::open(ec).await.map_err(|err| {
            log::warn!("Error opening EC session: {err:?}");
            InitError::Ec(EcError::Transport(err))
        })?;

        let enable = Request::keyboard(KeyboardSubtype::Enable, &[])?;
        ec.request(&enable).await.map_err(|err| {
            log::warn!("Error enabling keyboard scanning: {err:?}");
            err
        })?;

        let wake = match wake {
            Some(source) => Some(Self::arm_wake(ec, source, config).await?),
            None => None,
        };

        let subscription = Subscription::register(ec, config.event_depth).map_err(|err| {
            log::warn!("Error registering for keyboard events: {err:?}");
            InitError::Ec(EcError::Transport(err))
        })?;

        log::debug!(
            "keyboard: initialized, wake on keypress {}",
            if wake.is_some() { "on" } else { "off" }
        );

        Ok(Self {
            subscription,
            wake,
            session,
            leds: Mutex::new(Leds::empty()),
            stop: Signal::new(),
            stopped: BlockingMutex::new(Cell::new(false)),
        })
    }

    async fn arm_wake(
        ec: &T,
        source: W,
        config: &KeyboardConfig,
    ) -> Result<ArmedWake<W>, InitError<T::Error, W::Error>> {
        let armed = ArmedWake::arm(source, config.debounce).map_err(|err| {
            log::warn!("Error setting up wake source: {err:?}");
            InitError::Wake(err)
        })?;

        let configure = Request::keyboard(
            KeyboardSubtype::ConfigureWake,
            &[WAKE_ACTION_ENABLE, WAKE_EVENT_ANY_KEY_PRESS],
        )?;
        ec.request(&configure).await.map_err(|err| {
            log::warn!("Error enabling keyboard wake: {err:?}");
            err
        })?;

        if config.report_wake_key {
            let report =
                Request::keyboard(KeyboardSubtype::ConfigureWakeKeyReport, &[WAKE_KEY_REPORT_ENABLE])?;
            ec.request(&report).await.map_err(|err| {
                log::warn!("Error enabling wake key reporting: {err:?}");
                err
            })?;
        }

        Ok(armed)
    }

    fn ec(&self) -> &'a T {
        self.session.ec
    }

    /// Returns `true` once `stop` has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped.lock(|stopped| stopped.get())
    }

    /// Stops the driver.
    ///
    /// A task blocked in `next_key` returns promptly with
    /// `KeyboardError::Stopped`, and every later call fails the same way. A
    /// running `run` pump returns `Ok(())`, also when it is blocked on a full
    /// channel.
    pub fn stop(&self) {
        self.stopped.lock(|stopped| stopped.set(true));
        self.stop.signal(());
        log::debug!("keyboard: stop requested");
    }

    /// The wake source, if one was armed.
    pub fn wake_source(&mut self) -> Option<&mut W> {
        self.wake.as_mut().map(|armed| &mut armed.source)
    }

    /// The LED state last confirmed by the controller.
    pub async fn leds(&self) -> Leds {
        *self.leds.lock().await
    }

    /// Waits for the next key event.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Give up after this long. `None` waits until an event
    ///   arrives or the driver is stopped.
    pub async fn next_key(
        &self,
        timeout: Option<Duration>,
    ) -> Result<DecodedKeyEvent, KeyboardError<T::Error>> {
        if self.is_stopped() {
            return Err(KeyboardError::Stopped);
        }

        let event = match timeout {
            Some(timeout) => with_timeout(timeout, self.wait_event())
                .await
                .map_err(|_| KeyboardError::Timeout)??,
            None => self.wait_event().await?,
        };

        // Stopped while the event was in flight.
        if self.is_stopped() {
            return Err(KeyboardError::Stopped);
        }

        if event.payload.is_empty() {
            log::warn!("Received keyboard event with no scan codes");
            return Err(KeyboardError::EmptyEvent);
        }
        log::trace!("keyboard: EC payload {:02x?}", event.payload.as_slice());

        scancode::decode(&event.payload).map_err(|err| {
            log::debug!(
                "Dropping keyboard payload {:02x?}: {err:?}",
                event.payload.as_slice()
            );
            KeyboardError::Decode(err)
        })
    }

    async fn wait_event(&self) -> Result<Event, KeyboardError<T::Error>> {
        let event = self.ec().wait_event(self.subscription.id);
        match select(self.stop.wait(), event).await {
            Either::First(()) => Err(KeyboardError::Stopped),
            Either::Second(event) => event.map_err(|err| {
                log::warn!("Could not receive scan code: {err:?}");
                KeyboardError::Ec(EcError::Transport(err))
            }),
        }
    }

    /// Flips every LED in `requested` and programs the result.
    ///
    /// The new state is kept only if the controller accepts it. Concurrent
    /// calls are serialized.
    ///
    /// # Returns
    ///
    /// The LED state now shown by the keyboard.
    pub async fn toggle_leds(&self, requested: Leds) -> Result<Leds, KeyboardError<T::Error>> {
        if self.is_stopped() {
            return Err(KeyboardError::Stopped);
        }

        let mut leds = self.leds.lock().await;
        let next = leds.toggled(requested);
        log::debug!("keyboard: LED state {:?} -> {:?}", *leds, next);

        let request = Request::keyboard(KeyboardSubtype::SetLeds, &[next.bits()])?;
        self.ec().request(&request).await.map_err(|err| {
            log::warn!("Error setting keyboard LEDs: {err:?}");
            err
        })?;

        *leds = next;
        Ok(next)
    }

    /// Power state hook. The controller keeps scanning on its own, so there
    /// is nothing to do.
    pub fn power(&self, power_down: bool) -> Result<(), KeyboardError<T::Error>> {
        log::debug!("keyboard: power {}", if power_down { "down" } else { "up" });
        Ok(())
    }

    /// Forwards key events into `sender` until the driver is stopped.
    ///
    /// Events that do not decode are logged and skipped. `KeyMessage::Closed`
    /// is sent before returning, also when the transport fails. Once the
    /// driver is stopped the pump no longer waits for channel space, so
    /// `Closed` is dropped if the channel is full.
    pub async fn run<M: RawMutex, const N: usize>(
        &self,
        sender: Sender<'_, M, KeyMessage, N>,
    ) -> Result<(), KeyboardError<T::Error>> {
        let result = loop {
            match self.next_key(None).await {
                Ok(key) => {
                    if !self.forward(&sender, KeyMessage::Key(key)).await {
                        break Ok(());
                    }
                }
                Err(KeyboardError::Decode(_) | KeyboardError::EmptyEvent) => continue,
                Err(KeyboardError::Stopped) => break Ok(()),
                Err(err) => break Err(err),
            }
        };

        if sender.try_send(KeyMessage::Closed).is_err()
            && !self.forward(&sender, KeyMessage::Closed).await
        {
            log::debug!("keyboard: channel full, pump closed without notice");
        }
        result
    }

    /// Sends `message` unless the driver is stopped first.
    async fn forward<M: RawMutex, const N: usize>(
        &self,
        sender: &Sender<'_, M, KeyMessage, N>,
        message: KeyMessage,
    ) -> bool {
        if self.is_stopped() {
            return false;
        }
        match select(self.stop.wait(), sender.send(message)).await {
            Either::First(()) => false,
            Either::Second(()) => true,
        }
    }

    /// Stops the driver and releases its resources.
    pub fn deinit(self) {
        self.stop();
        drop(self);
    }
}

impl<T: EcTransport, W: WakeSource> Drop for KeyboardDriver<'_, T, W> {
    fn drop(&mut self) {
        log::debug!("keyboard: releasing");
    }
}
