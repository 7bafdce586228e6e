use crate::error::BusError;

/// Highest addressable GPIO number on the target package.
pub const GPIO_MAX: u8 = 48;

/// Default transfer-size cap: one full 240x240 RGB565 frame plus command
/// overhead, sized so a framebuffer flush fits in a single DMA transaction.
pub const FRAME_TRANSFER_BYTES: usize = 240 * 240 * 2 + 8;

/// A validated GPIO number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gpio(u8);

impl Gpio {
    /// Validate a raw pin number against the package's GPIO range.
    pub fn new(n: u8) -> Result<Self, BusError> {
        if n > GPIO_MAX {
            return Err(BusError::InvalidPin(n));
        }
        Ok(Self(n))
    }

    /// Construct a known-good pin, for board constants.
    ///
    /// Panics if `n` is out of range; in const context the panic happens
    /// at compile time.
    pub const fn at(n: u8) -> Self {
        assert!(n <= GPIO_MAX);
        Self(n)
    }

    /// The raw pin number.
    pub const fn number(self) -> u8 {
        self.0
    }
}

/// User-visible SPI host peripherals.
///
/// The discriminants match the platform's host indices; host 0 is reserved
/// for internal flash and is not selectable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum HostId {
    Spi2 = 1,
    Spi3 = 2,
}

impl HostId {
    /// Validate a raw host index.
    pub fn from_index(n: u8) -> Result<Self, BusError> {
        match n {
            1 => Ok(Self::Spi2),
            2 => Ok(Self::Spi3),
            _ => Err(BusError::InvalidHost(n)),
        }
    }

    /// The platform host index.
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl Default for HostId {
    fn default() -> Self {
        Self::Spi2
    }
}

/// DMA channel selection for bus transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaMode {
    /// Let the driver pick a free channel.
    #[default]
    Auto,
    /// No DMA; transfers are limited to the peripheral FIFO size.
    Disabled,
}

/// Physical configuration of a shared SPI bus.
///
/// Immutable after construction; only the owning [`SpiBus`](crate::SpiBus)
/// initialization state changes over the bus's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    pub miso: Gpio,
    pub mosi: Gpio,
    pub sclk: Gpio,
    pub host: HostId,
    pub dma: DmaMode,
    /// Largest single transfer the bus must accommodate, in bytes.
    pub max_transfer: usize,
}

impl BusConfig {
    /// Validate the three data-line pins and build a config with default
    /// host, DMA, and transfer-size settings.
    pub fn new(miso: u8, mosi: u8, sclk: u8) -> Result<Self, BusError> {
        Ok(Self {
            miso: Gpio::new(miso)?,
            mosi: Gpio::new(mosi)?,
            sclk: Gpio::new(sclk)?,
            host: HostId::default(),
            dma: DmaMode::default(),
            max_transfer: FRAME_TRANSFER_BYTES,
        })
    }

    pub fn with_host(mut self, host: HostId) -> Self {
        self.host = host;
        self
    }

    pub fn with_dma(mut self, dma: DmaMode) -> Self {
        self.dma = dma;
        self
    }

    pub fn with_max_transfer(mut self, bytes: usize) -> Self {
        self.max_transfer = bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_range_is_enforced() {
        assert!(Gpio::new(0).is_ok());
        assert!(Gpio::new(GPIO_MAX).is_ok());
        assert_eq!(Gpio::new(GPIO_MAX + 1), Err(BusError::InvalidPin(49)));
    }

    #[test]
    fn host_index_round_trips() {
        assert_eq!(HostId::from_index(1), Ok(HostId::Spi2));
        assert_eq!(HostId::from_index(2), Ok(HostId::Spi3));
        assert_eq!(HostId::from_index(0), Err(BusError::InvalidHost(0)));
        assert_eq!(HostId::Spi2.index(), 1);
    }

    #[test]
    fn config_rejects_bad_pins() {
        assert_eq!(
            BusConfig::new(8, 9, 200),
            Err(BusError::InvalidPin(200))
        );
        let cfg = BusConfig::new(8, 9, 7).unwrap();
        assert_eq!(cfg.host, HostId::Spi2);
        assert_eq!(cfg.max_transfer, FRAME_TRANSFER_BYTES);
    }
}
