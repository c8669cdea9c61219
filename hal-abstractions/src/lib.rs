//! Hardware abstraction traits for the environmental data logger
//!
//! This crate defines the seams between the platform-agnostic logger logic
//! and a concrete board. BSPs implement these traits; `logger-core` only
//! ever sees the traits.
//!
//! Buses that already have a standard trait (I2C, delays, GPIO outputs) use
//! `embedded-hal` / `embedded-hal-async` directly and are not repeated here.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod analog;
pub mod clock;
pub mod power;
pub mod storage;

pub use analog::AnalogInput;
pub use clock::{DateTime, WallClock};
pub use power::PowerControl;
pub use storage::{LogStore, OpenMode};
