use embassy_sync::blocking_mutex::raw::RawMutex;
use portable_atomic::Ordering;

use crate::bus::SpiBus;
use crate::config::HostId;
use crate::error::BusError;
use crate::vendor::SpiHostDriver;

/// Reference-counted handle to a shared [`SpiBus`].
///
/// Dropping a handle decrements the bus's user count. The bus is **not**
/// torn down on drop; call [`SpiBus::release`] explicitly once all
/// handles are gone. The lifetime parameter ties every attachment to the
/// bus it was built against, so a handle can never dangle.
pub struct BusHandle<'a, M: RawMutex, V: SpiHostDriver> {
    bus: &'a SpiBus<M, V>,
}

impl<'a, M: RawMutex, V: SpiHostDriver> BusHandle<'a, M, V> {
    /// Only called by [`SpiBus::acquire`], which increments the count.
    pub(crate) fn new(bus: &'a SpiBus<M, V>) -> Self {
        Self { bus }
    }

    /// The host peripheral this bus is bound to.
    pub fn host(&self) -> HostId {
        self.bus.config().host
    }

    /// Whether the bus has been initialized.
    pub fn is_initialized(&self) -> bool {
        self.bus.is_initialized()
    }

    /// Readiness probe for attachments.
    ///
    /// Called immediately before an attachment's first vendor resource
    /// acquisition; fails with [`BusError::NotReady`] on an uninitialized
    /// bus so no vendor call is issued against a dead bus.
    pub fn ensure_ready(&self) -> Result<HostId, BusError> {
        if !self.bus.is_initialized() {
            return Err(BusError::NotReady);
        }
        Ok(self.bus.config().host)
    }

    /// The owning bus.
    pub fn bus(&self) -> &SpiBus<M, V> {
        self.bus
    }
}

impl<M: RawMutex, V: SpiHostDriver> Drop for BusHandle<'_, M, V> {
    fn drop(&mut self) {
        self.bus.users().fetch_sub(1, Ordering::Release);
    }
}
