//! Log storage on the microSD card

mod error;
mod sdcard;

pub use error::StorageError;
pub use sdcard::{init_spi_config, SdCardStore, SharedSpiBus};
