use embassy_sync::blocking_mutex::raw::RawMutex;
use spi_bus::{BusHandle, SpiHostDriver};

use crate::config::PanelConfig;
use crate::error::PanelError;
use crate::vendor::PanelIoDriver;

/// LCD transport attached to a shared SPI bus.
///
/// Construction validates the configuration, verifies the bus is
/// initialized immediately before the vendor acquisition, and creates
/// the vendor panel-I/O handle. There is no separate `init` step.
pub struct PanelBus<'bus, M, V, P>
where
    M: RawMutex,
    V: SpiHostDriver,
    P: PanelIoDriver,
{
    bus: BusHandle<'bus, M, V>,
    driver: P,
    config: PanelConfig,
    io: Option<P::Io>,
}

impl<'bus, M, V, P> PanelBus<'bus, M, V, P>
where
    M: RawMutex,
    V: SpiHostDriver,
    P: PanelIoDriver,
{
    /// Create the attachment and its vendor panel-I/O handle.
    ///
    /// Parameter validation runs first, without touching the bus; an
    /// uninitialized bus then fails with [`PanelError::Bus`]
    /// (`NotReady`) before any vendor call.
    pub fn new(
        bus: BusHandle<'bus, M, V>,
        mut driver: P,
        config: PanelConfig,
    ) -> Result<Self, PanelError> {
        config.validate()?;

        let host = bus.ensure_ready()?;
        let io = driver
            .new_panel_io(host, &config)
            .map_err(PanelError::CreateFailed)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "panel io up: host={} dc={} pclk={}",
            host,
            config.dc,
            config.pclk_hz,
        );

        Ok(Self { bus, driver, config, io: Some(io) })
    }

    /// The vendor panel-I/O handle, for the higher-level panel driver.
    pub fn io(&self) -> Option<&P::Io> {
        self.io.as_ref()
    }

    pub fn io_mut(&mut self) -> Option<&mut P::Io> {
        self.io.as_mut()
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Whether the vendor handle is still held.
    pub fn is_attached(&self) -> bool {
        self.io.is_some()
    }

    /// Delete the vendor panel-I/O handle.
    ///
    /// Idempotent: a second call does nothing. The handle is dropped
    /// even when the vendor call fails, so it is never deleted twice.
    pub fn release(&mut self) -> Result<(), PanelError> {
        let Some(io) = self.io.take() else {
            return Ok(());
        };
        self.driver
            .delete_panel_io(io)
            .map_err(PanelError::ReleaseFailed)
    }

    /// The owning bus handle.
    pub fn bus(&self) -> &BusHandle<'bus, M, V> {
        &self.bus
    }
}

impl<M, V, P> Drop for PanelBus<'_, M, V, P>
where
    M: RawMutex,
    V: SpiHostDriver,
    P: PanelIoDriver,
{
    fn drop(&mut self) {
        let _ = self.release();
    }
}
