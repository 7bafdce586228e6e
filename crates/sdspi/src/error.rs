use spi_bus::{BusError, ErrCode};

/// Errors raised by SD card attachment operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SdError {
    /// The requested clock lies outside the supported SPI range.
    InvalidClock(u32),
    /// The mount point is empty or exceeds the stored-path bound.
    InvalidMountPoint,
    /// The underlying bus refused the operation.
    #[from]
    Bus(BusError),
    /// The card has not been initialized.
    NotReady,
    /// A block transfer would run past the card's known geometry.
    OutOfRange { start: u32, blocks: u32 },
    /// Slot attach or card identification failed.
    CardInit(ErrCode),
    /// A sector transfer or unmount call failed.
    Io(ErrCode),
    /// The FAT volume could not be mounted.
    MountFailed(ErrCode),
    /// A volume is already mounted on this card.
    AlreadyMounted,
    /// No volume is mounted.
    NotMounted,
    /// Releasing the vendor device slot failed; the slot is still
    /// considered released.
    ReleaseFailed(ErrCode),
}

impl core::fmt::Display for SdError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SdError::InvalidClock(khz) => {
                write!(f, "unsupported SPI clock: {} kHz", khz)
            }
            SdError::InvalidMountPoint => write!(f, "invalid mount point"),
            SdError::Bus(err) => write!(f, "bus error: {}", err),
            SdError::NotReady => write!(f, "card not initialized"),
            SdError::OutOfRange { start, blocks } => {
                write!(
                    f,
                    "transfer of {} block(s) at {} exceeds card geometry",
                    blocks, start
                )
            }
            SdError::CardInit(code) => {
                write!(f, "card initialization failed: {}", code)
            }
            SdError::Io(code) => write!(f, "card I/O failed: {}", code),
            SdError::MountFailed(code) => {
                write!(f, "mount failed: {}", code)
            }
            SdError::AlreadyMounted => write!(f, "volume already mounted"),
            SdError::NotMounted => write!(f, "no volume mounted"),
            SdError::ReleaseFailed(code) => {
                write!(f, "slot release failed: {}", code)
            }
        }
    }
}
