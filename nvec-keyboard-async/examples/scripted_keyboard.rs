//! Runs the keyboard driver on the host against a controller that replays a
//! canned typing session.

use core::cell::Cell;

use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use nvec_async::op::{Event, EventType, RegistrationId, Request, Response};
use nvec_async::EcTransport;
use nvec_keyboard_async::keyboard::{KeyMessage, KeyboardConfig, KeyboardDriver};
use nvec_keyboard_async::leds::Leds;
use static_cell::StaticCell;
use tracing_subscriber::filter::LevelFilter;

const SCROLL_LOCK: u32 = 0x46;
const ESCAPE: u32 = 0x01;

/// "hi", Scroll Lock twice, an extended arrow with a fake shift, a line
/// noise frame, Pause and finally Escape.
const SCRIPT: &[&[u8]] = &[
    &[0x23],
    &[0xA3],
    &[0x17],
    &[0x97],
    &[0x46],
    &[0xC6],
    &[0x46],
    &[0xC6],
    &[0xE0, 0x2A, 0xE0, 0x4B],
    &[0xE0, 0xCB, 0xE0, 0xAA],
    &[0x10, 0x11, 0x12],
    &[0xE1, 0x1D, 0x45, 0xE1, 0x9D, 0xC5],
    &[0x01],
];

/// A controller that accepts every request and replays `SCRIPT` as
/// keyboard events.
struct ScriptedEc {
    next: Cell<usize>,
}

#[derive(Debug)]
struct Offline;

impl EcTransport for ScriptedEc {
    type Error = Offline;

    async fn open(&self) -> Result<(), Self::Error> {
        println!("ec: open");
        Ok(())
    }

    fn close(&self) {
        println!("ec: close");
    }

    async fn send_request(&self, request: &Request) -> Result<Response, Self::Error> {
        println!(
            "ec: request {:?}/{:#04x} {:02x?}",
            request.request_type,
            request.subtype,
            request.payload.as_slice()
        );
        Ok(Response::success())
    }

    fn register_for_events(
        &self,
        events: &[EventType],
        depth: u8,
    ) -> Result<RegistrationId, Self::Error> {
        println!("ec: register {events:?}, depth {depth}");
        Ok(RegistrationId(0))
    }

    fn unregister_for_events(&self, registration: RegistrationId) {
        println!("ec: unregister {registration:?}");
    }

    async fn wait_event(&self, _registration: RegistrationId) -> Result<Event, Self::Error> {
        let index = self.next.get();
        let Some(bytes) = SCRIPT.get(index) else {
            return core::future::pending().await;
        };
        Timer::after(Duration::from_millis(50)).await;
        self.next.set(index + 1);
        Event::keyboard(bytes).map_err(|_| Offline)
    }
}

type Driver = KeyboardDriver<'static, ScriptedEc>;

static EC: StaticCell<ScriptedEc> = StaticCell::new();
static DRIVER: StaticCell<Driver> = StaticCell::new();
static KEYS: Channel<CriticalSectionRawMutex, KeyMessage, 4> = Channel::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // Driver diagnostics go through `log`, forwarded by the subscriber.
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();
    log::info!("Logger initialized");

    let ec: &'static ScriptedEc = EC.init(ScriptedEc { next: Cell::new(0) });

    let driver = match KeyboardDriver::without_wake(ec, &KeyboardConfig::default()).await {
        Ok(driver) => driver,
        Err(err) => {
            println!("keyboard init failed: {err:?}");
            std::process::exit(1);
        }
    };
    let driver: &'static Driver = DRIVER.init(driver);

    spawner.must_spawn(pump(driver));
    spawner.must_spawn(consume(driver));
}

#[embassy_executor::task]
async fn pump(driver: &'static Driver) {
    if let Err(err) = driver.run(KEYS.sender()).await {
        println!("pump ended: {err:?}");
    }
}

#[embassy_executor::task]
async fn consume(driver: &'static Driver) {
    loop {
        let key = match KEYS.receive().await {
            KeyMessage::Key(key) => key,
            KeyMessage::Closed => break,
        };
        println!(
            "key {:#06x} {:?} (bytes {:02x?})",
            key.scan_code,
            key.flags,
            key.bytes().as_slice()
        );

        if key.scan_code == SCROLL_LOCK && key.is_make() {
            match driver.toggle_leds(Leds::SCROLL_LOCK).await {
                Ok(leds) => println!("leds now {leds:?}"),
                Err(err) => println!("led update failed: {err:?}"),
            }
        }
        if key.scan_code == ESCAPE && key.is_make() {
            driver.stop();
        }
    }
    println!("keyboard closed");
    std::process::exit(0);
}
