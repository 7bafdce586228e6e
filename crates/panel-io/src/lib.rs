#![no_std]
//! LCD panel-I/O transport over a shared SPI bus.
//!
//! [`PanelBus`] binds data/command and chip-select lines on an
//! initialized [`spi_bus::SpiBus`] to a vendor panel-I/O driver.
//! Construction is initialization for this attachment: the vendor handle
//! is created inline, since there is no identification phase analogous
//! to an SD card's. The created handle is handed to a higher-level panel
//! driver; this layer issues no command or pixel transfers itself.

mod bus;
mod config;
mod error;
mod vendor;

pub use bus::PanelBus;
pub use config::{PanelConfig, PanelFlags, DEFAULT_PCLK_HZ, PCLK_MAX_HZ};
pub use error::PanelError;
pub use vendor::PanelIoDriver;
