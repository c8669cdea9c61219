//! Platform-agnostic core logic for the battery-aware environmental logger
//!
//! This crate contains the logger's behaviour: supply voltage gating, the
//! DHT20 driver, CSV record formatting, the log writer, indicator policy and
//! cycle timing. It has NO hardware dependencies; boards plug in through
//! `embedded-hal`, `embedded-hal-async` and the `hal-abstractions` traits.
//!
//! ## Cycle
//!
//! ```text
//! timer fires ─► read voltage ─► >= threshold? ─yes─► DHT20 trigger
//!                                     │                  │ 100 ms
//!                                     no                 ▼
//!                                     │             DHT20 read ─► append CSV line
//!                                     ▼                                │
//!                           request low power ◄──────── idle ◄─────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(warnings)]

#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod log_writer;
pub mod power;
pub mod record;
pub mod schedule;
pub mod sensor;
pub mod voltage;

#[cfg(test)]
mod mock;

pub use config::LoggerConfig;
pub use controller::{CycleController, CycleOutcome, Parts};
pub use hal_abstractions::DateTime;
pub use log_writer::{LogWriter, StoreError};
pub use power::Indicators;
pub use record::LogRecord;
pub use schedule::{Fire, Schedule};
pub use sensor::{Dht20, SensorError, SensorSample};
pub use voltage::{VoltageError, VoltageMonitor};
