#![no_std]
//! SD card attachment for a shared SPI bus.
//!
//! [`SdCard`] binds a chip-select line on an initialized
//! [`spi_bus::SpiBus`] to a vendor SD/MMC-over-SPI driver. It owns no
//! protocol logic: card identification, sector transfer, and the FAT
//! volume all live behind the [`SdHostDriver`] seam. This layer sequences
//! the lifecycle (attach, probe, transfer, mount, release) and enforces
//! the bounds and readiness checks in front of every vendor call.

mod card;
mod error;
mod host;

pub use card::{
    ControlOp, SdCard, DEFAULT_FREQ_KHZ, FREQ_MAX_KHZ, FREQ_MIN_KHZ,
    MOUNT_POINT_MAX,
};
pub use error::SdError;
pub use host::{CardInfo, SdHostDriver};
