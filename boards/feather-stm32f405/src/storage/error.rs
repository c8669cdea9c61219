//! SD card storage error types

use defmt::{warn, Format};
use embedded_sdmmc::SdCardError;

/// SD card / FAT operation errors
#[derive(Debug, Clone, Copy, Format)]
pub enum StorageError {
    /// Card did not respond or rejected a command
    Card,
    /// No usable FAT volume in partition 0
    NoVolume,
    /// File name is not a valid 8.3 name
    BadFileName,
    /// No free clusters left
    DiskFull,
    /// Too many volumes, directories or files open at once
    Busy,
    /// Any other filesystem failure
    Filesystem,
}

impl From<embedded_sdmmc::Error<SdCardError>> for StorageError {
    fn from(e: embedded_sdmmc::Error<SdCardError>) -> Self {
        use embedded_sdmmc::Error;

        warn!("SD card error: {:?}", e);
        match e {
            Error::DeviceError(_) => Self::Card,
            Error::FormatError(_) | Error::NoSuchVolume => Self::NoVolume,
            Error::FilenameError(_) => Self::BadFileName,
            Error::DiskFull => Self::DiskFull,
            Error::TooManyOpenVolumes | Error::TooManyOpenDirs | Error::TooManyOpenFiles => {
                Self::Busy
            }
            _ => Self::Filesystem,
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Card => write!(f, "SD card error"),
            Self::NoVolume => write!(f, "No FAT volume"),
            Self::BadFileName => write!(f, "Invalid file name"),
            Self::DiskFull => write!(f, "Disk full"),
            Self::Busy => write!(f, "Too many open handles"),
            Self::Filesystem => write!(f, "Filesystem error"),
        }
    }
}

impl core::error::Error for StorageError {}

impl embedded_io::Error for StorageError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Self::Card => embedded_io::ErrorKind::NotConnected,
            Self::NoVolume => embedded_io::ErrorKind::NotFound,
            Self::BadFileName => embedded_io::ErrorKind::InvalidInput,
            Self::DiskFull => embedded_io::ErrorKind::OutOfMemory,
            Self::Busy | Self::Filesystem => embedded_io::ErrorKind::Other,
        }
    }
}
