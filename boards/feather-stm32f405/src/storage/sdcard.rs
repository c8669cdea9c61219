//! CSV log store on a FAT-formatted microSD card
//!
//! The card sits alone on SPI2 behind a blocking shared-bus `SpiDevice`,
//! which owns chip select. Cards must be initialized at or below 400 kHz;
//! once the card answers, the bus is raised to the working frequency.
//!
//! Every write opens the volume, the root directory and the file, writes,
//! and closes all three again. Nothing stays open between cycles, so a
//! power loss can at worst cut the record being written.

use core::cell::RefCell;
use defmt::{info, warn};
use embassy_embedded_hal::shared_bus::blocking::spi::SpiDevice;
use embassy_stm32::gpio::Output;
use embassy_stm32::mode::Blocking;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Delay;
use embedded_sdmmc::{Mode, SdCard, VolumeIdx, VolumeManager};
use hal_abstractions::{LogStore, OpenMode};

use super::StorageError;
use crate::time::RtcClock;

/// SPI clock while the card is brought up
pub const SD_SPI_INIT_FREQ: Hertz = Hertz(400_000);

/// SPI clock after a successful card init
pub const SD_SPI_WORK_FREQ: Hertz = Hertz(8_000_000);

pub type SpiBus = Spi<'static, Blocking>;
pub type SharedSpiBus = Mutex<CriticalSectionRawMutex, RefCell<SpiBus>>;
type SdSpi = SpiDevice<'static, CriticalSectionRawMutex, SpiBus, Output<'static>>;
type Card = SdCard<SdSpi, Delay>;

/// SPI configuration for card initialization
pub fn init_spi_config() -> spi::Config {
    let mut config = spi::Config::default();
    config.frequency = SD_SPI_INIT_FREQ;
    config
}

pub struct SdCardStore {
    volume_mgr: VolumeManager<Card, RtcClock>,
}

impl SdCardStore {
    /// Probe the card and set up the volume manager.
    ///
    /// A missing or unresponsive card is not fatal: the driver retries
    /// initialization on the next access, and writes fail until then.
    pub fn new(bus: &'static SharedSpiBus, cs: Output<'static>) -> Self {
        let card = SdCard::new(SpiDevice::new(bus, cs), Delay);

        match card.num_bytes() {
            Ok(size) => {
                info!("SD card ready: {} MiB", size / (1024 * 1024));
                let mut config = spi::Config::default();
                config.frequency = SD_SPI_WORK_FREQ;
                let raised = bus.lock(|bus| bus.borrow_mut().set_config(&config));
                if raised.is_err() {
                    warn!("SD SPI clock left at init frequency");
                }
            }
            Err(e) => warn!("SD card not ready: {:?}", e),
        }

        Self {
            volume_mgr: VolumeManager::new(card, RtcClock),
        }
    }
}

impl LogStore for SdCardStore {
    type Error = StorageError;

    fn write_file(&mut self, name: &str, mode: OpenMode, data: &[u8]) -> Result<(), StorageError> {
        let mode = match mode {
            OpenMode::Truncate => Mode::ReadWriteCreateOrTruncate,
            OpenMode::Append => Mode::ReadWriteCreateOrAppend,
        };

        let volume = self.volume_mgr.open_volume(VolumeIdx(0))?;
        let root = volume.open_root_dir()?;
        let file = root.open_file_in_dir(name, mode)?;
        file.write(data)?;
        // Directory and volume close on drop
        file.close()?;
        Ok(())
    }
}
