use spi_bus::{ErrCode, HostId};

use crate::config::PanelConfig;

/// Vendor LCD panel-I/O driver.
///
/// The implementation owns transaction queueing and the D/C line
/// signalling; the handle it creates is consumed by a higher-level panel
/// driver.
pub trait PanelIoDriver {
    /// Opaque panel-I/O handle.
    type Io;

    /// Create a panel-I/O handle bound to `host` and the configured
    /// lines.
    fn new_panel_io(
        &mut self,
        host: HostId,
        config: &PanelConfig,
    ) -> Result<Self::Io, ErrCode>;

    /// Delete a panel-I/O handle.
    fn delete_panel_io(&mut self, io: Self::Io) -> Result<(), ErrCode>;
}
