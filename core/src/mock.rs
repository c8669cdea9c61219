//! Hardware doubles for unit tests
//!
//! Doubles that tests need to inspect after handing them to a component
//! share their state through `Rc`, so keep a clone before moving one in.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embedded_hal::digital;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{self, ErrorKind, Operation};
use embedded_io::ErrorKind as IoErrorKind;
use hal_abstractions::{AnalogInput, DateTime, LogStore, OpenMode, PowerControl, WallClock};

/// Bus and delay activity, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(u8, Vec<u8>),
    Read(u8, usize),
    DelayMs(u32),
}

#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn take(&self) -> Vec<Event> {
        self.0.borrow_mut().drain(..).collect()
    }
}

pub struct MockI2c {
    events: EventLog,
    response: [u8; 7],
    pub fail_writes: bool,
    pub fail_reads: bool,
}

impl MockI2c {
    pub fn new(events: EventLog, response: [u8; 7]) -> Self {
        Self {
            events,
            response,
            fail_writes: false,
            fail_reads: false,
        }
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl i2c::I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if self.fail_writes {
                        return Err(ErrorKind::Other);
                    }
                    self.events.push(Event::Write(address, bytes.to_vec()));
                }
                Operation::Read(buf) => {
                    if self.fail_reads {
                        return Err(ErrorKind::Other);
                    }
                    let n = buf.len().min(self.response.len());
                    buf[..n].copy_from_slice(&self.response[..n]);
                    self.events.push(Event::Read(address, buf.len()));
                }
            }
        }
        Ok(())
    }
}

pub struct MockDelay {
    events: EventLog,
}

impl MockDelay {
    pub fn new(events: EventLog) -> Self {
        Self { events }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, _ns: u32) {}

    async fn delay_ms(&mut self, ms: u32) {
        self.events.push(Event::DelayMs(ms));
    }
}

pub struct MockAdc {
    raw: Option<u16>,
    full_scale: u16,
}

impl MockAdc {
    pub fn new(raw: u16, full_scale: u16) -> Self {
        Self {
            raw: Some(raw),
            full_scale,
        }
    }

    pub fn failing() -> Self {
        Self {
            raw: None,
            full_scale: 4095,
        }
    }
}

impl AnalogInput for MockAdc {
    type Error = ();

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        self.raw.ok_or(())
    }

    fn full_scale(&self) -> u16 {
        self.full_scale
    }
}

/// In-memory file store
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Vec<(String, String)>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn contents(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }

    pub fn lines(&self, name: &str) -> Vec<&str> {
        self.contents(name)
            .map(|c| c.lines().collect())
            .unwrap_or_default()
    }
}

impl LogStore for MemoryStore {
    type Error = IoErrorKind;

    fn write_file(&mut self, name: &str, mode: OpenMode, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(IoErrorKind::Other);
        }
        let text = core::str::from_utf8(data).map_err(|_| IoErrorKind::InvalidData)?;
        match self.files.iter_mut().find(|(n, _)| n == name) {
            Some((_, content)) => match mode {
                OpenMode::Truncate => *content = text.into(),
                OpenMode::Append => content.push_str(text),
            },
            None => self.files.push((name.into(), text.into())),
        }
        Ok(())
    }
}

pub struct MockClock {
    now: Option<DateTime>,
}

impl MockClock {
    pub fn at(now: DateTime) -> Self {
        Self { now: Some(now) }
    }

    pub fn failing() -> Self {
        Self { now: None }
    }
}

impl WallClock for MockClock {
    type Error = ();

    fn now(&mut self) -> Result<DateTime, Self::Error> {
        self.now.ok_or(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockPower(Rc<RefCell<Vec<bool>>>);

impl MockPower {
    pub fn calls(&self) -> Vec<bool> {
        self.0.borrow().clone()
    }
}

impl PowerControl for MockPower {
    fn set_low_power(&mut self, enabled: bool) {
        self.0.borrow_mut().push(enabled);
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockPin {
    level: Rc<Cell<bool>>,
    history: Rc<RefCell<Vec<bool>>>,
}

impl MockPin {
    pub fn is_high(&self) -> bool {
        self.level.get()
    }

    pub fn history(&self) -> Vec<bool> {
        self.history.borrow().clone()
    }

    fn set(&mut self, high: bool) {
        self.level.set(high);
        self.history.borrow_mut().push(high);
    }
}

impl digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}
