#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::Duration;
use nvec_async::op::{Event, EventType, Payload, RegistrationId, Request, Response, Status};
use nvec_async::EcTransport;
use nvec_keyboard_async::wake::WakeSource;

pub const REGISTRATION: RegistrationId = RegistrationId(7);

/// Everything the driver did to the controller and the wake source, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open,
    Close,
    Request(u8, Vec<u8>),
    Register(Vec<EventType>, u8),
    Unregister(RegistrationId),
    WakeRegister(Duration),
    WakeEnable,
    WakeUnregister,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkDown;

pub struct MockEc {
    log: CallLog,
    events: Channel<CriticalSectionRawMutex, Result<Event, LinkDown>, 8>,
    statuses: RefCell<HashMap<u8, Status>>,
    broken_requests: RefCell<HashSet<u8>>,
    fail_open: Cell<bool>,
    fail_register: Cell<bool>,
}

impl MockEc {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            events: Channel::new(),
            statuses: RefCell::new(HashMap::new()),
            broken_requests: RefCell::new(HashSet::new()),
            fail_open: Cell::new(false),
            fail_register: Cell::new(false),
        }
    }

    pub fn push_event(&self, bytes: &[u8]) {
        let event = Event::keyboard(bytes).expect("event too long");
        self.events.try_send(Ok(event)).expect("event queue full");
    }

    pub fn push_link_error(&self) {
        self.events.try_send(Err(LinkDown)).expect("event queue full");
    }

    /// Answers requests with `subtype` with `status`.
    pub fn set_status(&self, subtype: u8, status: Status) {
        self.statuses.borrow_mut().insert(subtype, status);
    }

    /// Fails requests with `subtype` at the transport level.
    pub fn break_request(&self, subtype: u8) {
        self.broken_requests.borrow_mut().insert(subtype);
    }

    pub fn fail_open(&self) {
        self.fail_open.set(true);
    }

    pub fn fail_register(&self) {
        self.fail_register.set(true);
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl EcTransport for MockEc {
    type Error = LinkDown;

    async fn open(&self) -> Result<(), Self::Error> {
        if self.fail_open.get() {
            return Err(LinkDown);
        }
        self.record(Call::Open);
        Ok(())
    }

    fn close(&self) {
        self.record(Call::Close);
    }

    async fn send_request(&self, request: &Request) -> Result<Response, Self::Error> {
        self.record(Call::Request(request.subtype, request.payload.to_vec()));
        if self.broken_requests.borrow().contains(&request.subtype) {
            return Err(LinkDown);
        }
        let status = self
            .statuses
            .borrow()
            .get(&request.subtype)
            .copied()
            .unwrap_or(Status::Success);
        Ok(Response {
            status,
            payload: Payload::new(),
        })
    }

    fn register_for_events(
        &self,
        events: &[EventType],
        depth: u8,
    ) -> Result<RegistrationId, Self::Error> {
        if self.fail_register.get() {
            return Err(LinkDown);
        }
        self.record(Call::Register(events.to_vec(), depth));
        Ok(REGISTRATION)
    }

    fn unregister_for_events(&self, registration: RegistrationId) {
        self.record(Call::Unregister(registration));
    }

    async fn wait_event(&self, registration: RegistrationId) -> Result<Event, Self::Error> {
        assert_eq!(registration, REGISTRATION);
        self.events.receive().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeFault {
    Register,
    Enable,
}

pub struct MockWake {
    log: CallLog,
    fault: Option<WakeFault>,
}

impl MockWake {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fault: None,
        }
    }

    pub fn failing(log: &CallLog, fault: WakeFault) -> Self {
        Self {
            log: log.clone(),
            fault: Some(fault),
        }
    }
}

impl WakeSource for MockWake {
    type Error = WakeFault;

    fn register(&mut self, debounce: Duration) -> Result<(), Self::Error> {
        if self.fault == Some(WakeFault::Register) {
            return Err(WakeFault::Register);
        }
        self.log.borrow_mut().push(Call::WakeRegister(debounce));
        Ok(())
    }

    fn enable(&mut self) -> Result<(), Self::Error> {
        if self.fault == Some(WakeFault::Enable) {
            return Err(WakeFault::Enable);
        }
        self.log.borrow_mut().push(Call::WakeEnable);
        Ok(())
    }

    fn unregister(&mut self) {
        self.log.borrow_mut().push(Call::WakeUnregister);
    }
}
