#![no_std]
//! Board support for a XIAO ESP32-S3 wired to an ST7789 240x240 panel
//! and a micro-SD slot on the shared SPI bus.
//!
//! Owns the board's pin map and hands out member-crate objects
//! pre-configured with it. The vendor drivers are still supplied by the
//! caller, so the same presets drive real hardware and host tests alike.

use embassy_sync::blocking_mutex::raw::RawMutex;
use panel_io::{PanelBus, PanelConfig, PanelError, PanelIoDriver};
use sdspi::{SdCard, SdError, SdHostDriver, DEFAULT_FREQ_KHZ};
use spi_bus::{
    BusConfig, BusHandle, DmaMode, Gpio, HostId, SpiHostDriver,
    FRAME_TRANSFER_BYTES,
};

/// Shared bus data-in line.
pub const BUS_MISO: Gpio = Gpio::at(8);
/// Shared bus data-out line.
pub const BUS_MOSI: Gpio = Gpio::at(9);
/// Shared bus clock line.
pub const BUS_SCLK: Gpio = Gpio::at(7);

/// SD card chip select.
pub const SD_CS: Gpio = Gpio::at(44);

/// LCD data/command select.
pub const LCD_DC: Gpio = Gpio::at(2);
/// LCD chip select.
pub const LCD_CS: Gpio = Gpio::at(1);
/// Backlight line; PWM control is the caller's business.
pub const BACKLIGHT: Gpio = Gpio::at(3);

/// Pixel clock the ST7789 runs at on this board.
pub const LCD_PCLK_HZ: u32 = 80_000_000;

pub const SCREEN_WIDTH: u16 = 240;
pub const SCREEN_HEIGHT: u16 = 240;

/// Configuration of the shared SPI bus, sized for one full RGB565
/// frame per transfer.
pub fn shared_bus_config() -> BusConfig {
    BusConfig {
        miso: BUS_MISO,
        mosi: BUS_MOSI,
        sclk: BUS_SCLK,
        host: HostId::Spi2,
        dma: DmaMode::Auto,
        max_transfer: FRAME_TRANSFER_BYTES,
    }
}

/// SD card attachment on the board's chip-select line.
pub fn sd_card<'bus, M, V, H>(
    bus: BusHandle<'bus, M, V>,
    driver: H,
) -> Result<SdCard<'bus, M, V, H>, SdError>
where
    M: RawMutex,
    V: SpiHostDriver,
    H: SdHostDriver,
{
    SdCard::new(bus, driver, SD_CS, DEFAULT_FREQ_KHZ)
}

/// Panel transport configuration for the board's wiring.
pub fn display_config() -> PanelConfig {
    PanelConfig::new(LCD_DC, Some(LCD_CS)).with_pclk_hz(LCD_PCLK_HZ)
}

/// LCD transport attachment on the board's D/C and chip-select lines.
pub fn display_bus<'bus, M, V, P>(
    bus: BusHandle<'bus, M, V>,
    driver: P,
) -> Result<PanelBus<'bus, M, V, P>, PanelError>
where
    M: RawMutex,
    V: SpiHostDriver,
    P: PanelIoDriver,
{
    PanelBus::new(bus, driver, display_config())
}
