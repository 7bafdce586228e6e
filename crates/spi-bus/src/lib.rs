#![no_std]
//! Shared SPI bus lifecycle management.
//!
//! A [`SpiBus`] owns the physical bus configuration and the vendor driver
//! that brings the bus up and down. Peripheral attachments (SD card, LCD
//! transport) hold a reference-counted [`BusHandle`] and verify bus
//! readiness through it immediately before acquiring their own vendor
//! resources. The bus is initialized exactly once, stays up while any
//! handle is live, and can be explicitly released when all handles have
//! been dropped.

mod bus;
mod config;
mod error;
mod handle;
mod vendor;

pub use bus::SpiBus;
pub use config::{
    BusConfig, DmaMode, Gpio, HostId, FRAME_TRANSFER_BYTES, GPIO_MAX,
};
pub use error::BusError;
pub use handle::BusHandle;
pub use vendor::{ErrCode, SpiHostDriver};
