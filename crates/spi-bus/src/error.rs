use crate::vendor::ErrCode;

/// Errors raised by bus configuration and lifecycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// A pin number lies outside the package's GPIO range.
    InvalidPin(u8),
    /// A host index does not name a user-selectable SPI peripheral.
    InvalidHost(u8),
    /// The bus has not been initialized yet.
    NotReady,
    /// The bus is still referenced by `n` attachment handles.
    InUse(usize),
    /// The vendor bus-acquisition call failed; the bus is left
    /// uninitialized.
    InitFailed(ErrCode),
    /// The vendor teardown call failed; the bus remains initialized.
    ReleaseFailed(ErrCode),
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BusError::InvalidPin(n) => {
                write!(f, "pin {} outside GPIO range", n)
            }
            BusError::InvalidHost(n) => {
                write!(f, "host index {} not selectable", n)
            }
            BusError::NotReady => write!(f, "bus not initialized"),
            BusError::InUse(n) => {
                write!(f, "bus still held by {} attachment(s)", n)
            }
            BusError::InitFailed(code) => {
                write!(f, "bus initialization failed: {}", code)
            }
            BusError::ReleaseFailed(code) => {
                write!(f, "bus teardown failed: {}", code)
            }
        }
    }
}
