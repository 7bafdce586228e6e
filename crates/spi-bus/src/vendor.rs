use crate::config::{BusConfig, Gpio, HostId};

/// Raw status code returned by a failed vendor driver call.
///
/// Preserved verbatim so callers can diagnose the underlying SDK failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ErrCode(pub i32);

impl core::fmt::Display for ErrCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "vendor status 0x{:x}", self.0)
    }
}

/// Vendor SPI master driver.
///
/// The implementation owns all transaction framing and DMA mechanics; this
/// layer only sequences the calls. Mock implementations back the host
/// tests.
pub trait SpiHostDriver {
    /// Acquire the physical bus for `host` with the given line
    /// configuration.
    fn bus_initialize(
        &mut self,
        host: HostId,
        config: &BusConfig,
    ) -> Result<(), ErrCode>;

    /// Tear the bus down and release its DMA and IO resources.
    fn bus_free(&mut self, host: HostId) -> Result<(), ErrCode>;

    /// Enable the input pull-up on a data line.
    fn enable_pullup(&mut self, pin: Gpio) -> Result<(), ErrCode>;
}
