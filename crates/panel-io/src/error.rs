use spi_bus::{BusError, ErrCode};

/// Errors raised by panel-I/O attachment operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// SPI mode outside 0..=3.
    InvalidSpiMode(u8),
    /// Pixel clock zero or above the peripheral limit.
    InvalidPixelClock(u32),
    /// Command or parameter bit-width outside 1..=32.
    InvalidBitWidth(u8),
    /// The underlying bus refused the operation.
    #[from]
    Bus(BusError),
    /// The vendor panel-I/O create call failed.
    CreateFailed(ErrCode),
    /// Deleting the vendor handle failed; the handle is still considered
    /// released.
    ReleaseFailed(ErrCode),
}

impl core::fmt::Display for PanelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PanelError::InvalidSpiMode(mode) => {
                write!(f, "invalid SPI mode: {}", mode)
            }
            PanelError::InvalidPixelClock(hz) => {
                write!(f, "invalid pixel clock: {} Hz", hz)
            }
            PanelError::InvalidBitWidth(bits) => {
                write!(f, "invalid command/parameter width: {} bits", bits)
            }
            PanelError::Bus(err) => write!(f, "bus error: {}", err),
            PanelError::CreateFailed(code) => {
                write!(f, "panel I/O creation failed: {}", code)
            }
            PanelError::ReleaseFailed(code) => {
                write!(f, "panel I/O release failed: {}", code)
            }
        }
    }
}
