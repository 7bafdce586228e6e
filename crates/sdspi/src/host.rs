use spi_bus::{ErrCode, Gpio, HostId};

/// Geometry reported by the card-identification sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CardInfo {
    /// Total number of addressable blocks.
    pub block_count: u32,
    /// Block size in bytes, almost always 512. Must be nonzero.
    pub block_size: u32,
}

/// Vendor SD/MMC-over-SPI driver.
///
/// The implementation owns the SD command/response state machine, the
/// sector transfer path, and the FAT volume layer. `probe` must report
/// nonzero geometry on success.
pub trait SdHostDriver {
    /// Opaque per-slot device handle.
    type Device;

    /// Acquire a device slot on `host` with the given chip select and
    /// clock.
    fn attach(
        &mut self,
        host: HostId,
        cs: Gpio,
        freq_khz: u32,
    ) -> Result<Self::Device, ErrCode>;

    /// Run card identification and report the card's geometry.
    fn probe(&mut self, device: &mut Self::Device)
        -> Result<CardInfo, ErrCode>;

    /// Read `count` whole sectors starting at `start` into `buf`.
    fn read_sectors(
        &mut self,
        device: &mut Self::Device,
        start: u32,
        count: u32,
        buf: &mut [u8],
    ) -> Result<(), ErrCode>;

    /// Write `count` whole sectors starting at `start` from `buf`.
    fn write_sectors(
        &mut self,
        device: &mut Self::Device,
        start: u32,
        count: u32,
        buf: &[u8],
    ) -> Result<(), ErrCode>;

    /// Mount the card's FAT volume at `path`.
    fn mount(
        &mut self,
        device: &mut Self::Device,
        path: &str,
    ) -> Result<(), ErrCode>;

    /// Unmount a previously mounted volume.
    fn unmount(
        &mut self,
        device: &mut Self::Device,
        path: &str,
    ) -> Result<(), ErrCode>;

    /// Release the device slot.
    fn detach(&mut self, device: Self::Device) -> Result<(), ErrCode>;
}
