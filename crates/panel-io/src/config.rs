use bitflags::bitflags;
use spi_bus::Gpio;

use crate::error::PanelError;

/// Default pixel clock.
pub const DEFAULT_PCLK_HZ: u32 = 40_000_000;
/// Fastest pixel clock the SPI peripheral supports.
pub const PCLK_MAX_HZ: u32 = 80_000_000;
/// Transactions queued ahead in the vendor driver.
const DEFAULT_QUEUE_DEPTH: usize = 10;

bitflags! {
    /// Fine-tuning flags for the panel transport.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PanelFlags: u8 {
        /// D/C line low means data, high means command (inverted).
        const DC_LOW_ON_DATA = 1 << 0;
        /// Transmit on eight data lines to mimic Intel 8080 timing.
        const OCTAL_MODE = 1 << 1;
        /// Transmit least-significant bit first.
        const LSB_FIRST = 1 << 2;
        /// Swap data byte order in 16-bit color mode.
        const SWAP_COLOR_BYTES = 1 << 3;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PanelFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "PanelFlags({=u8:b})", self.bits());
    }
}

/// Configuration of a panel-I/O attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    /// Data/command select line.
    pub dc: Gpio,
    /// Chip select, or `None` if the panel is permanently selected.
    pub cs: Option<Gpio>,
    /// Traditional SPI mode (0..=3).
    pub spi_mode: u8,
    /// Pixel clock in Hz.
    pub pclk_hz: u32,
    /// Bit-width of a panel command.
    pub cmd_bits: u8,
    /// Bit-width of a panel command parameter.
    pub param_bits: u8,
    /// Transaction queue depth in the vendor driver.
    pub queue_depth: usize,
    pub flags: PanelFlags,
}

impl PanelConfig {
    /// Config with the conventional defaults: mode 0, 40 MHz, 8-bit
    /// command and parameter widths.
    pub fn new(dc: Gpio, cs: Option<Gpio>) -> Self {
        Self {
            dc,
            cs,
            spi_mode: 0,
            pclk_hz: DEFAULT_PCLK_HZ,
            cmd_bits: 8,
            param_bits: 8,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            flags: PanelFlags::empty(),
        }
    }

    pub fn with_spi_mode(mut self, mode: u8) -> Self {
        self.spi_mode = mode;
        self
    }

    pub fn with_pclk_hz(mut self, hz: u32) -> Self {
        self.pclk_hz = hz;
        self
    }

    pub fn with_bit_widths(mut self, cmd: u8, param: u8) -> Self {
        self.cmd_bits = cmd;
        self.param_bits = param;
        self
    }

    pub fn with_flags(mut self, flags: PanelFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Check every numeric parameter before any vendor call.
    pub(crate) fn validate(&self) -> Result<(), PanelError> {
        if self.spi_mode > 3 {
            return Err(PanelError::InvalidSpiMode(self.spi_mode));
        }
        if self.pclk_hz == 0 || self.pclk_hz > PCLK_MAX_HZ {
            return Err(PanelError::InvalidPixelClock(self.pclk_hz));
        }
        if !(1..=32).contains(&self.cmd_bits) {
            return Err(PanelError::InvalidBitWidth(self.cmd_bits));
        }
        if !(1..=32).contains(&self.param_bits) {
            return Err(PanelError::InvalidBitWidth(self.param_bits));
        }
        Ok(())
    }
}
