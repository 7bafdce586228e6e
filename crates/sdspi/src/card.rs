use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::String;
use num_enum::FromPrimitive;
use spi_bus::{BusHandle, Gpio, SpiHostDriver};

use crate::error::SdError;
use crate::host::{CardInfo, SdHostDriver};

/// Default device clock once identification has completed.
pub const DEFAULT_FREQ_KHZ: u32 = 20_000;
/// Slowest clock the identification sequence supports.
pub const FREQ_MIN_KHZ: u32 = 400;
/// Fastest clock supported in SPI mode.
pub const FREQ_MAX_KHZ: u32 = 40_000;
/// Longest mount point stored on the attachment.
pub const MOUNT_POINT_MAX: usize = 32;

/// Control opcodes recognized by [`SdCard::control`].
///
/// The discriminants follow the block-device calling convention the
/// attachment is consumed through; anything else collapses to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ControlOp {
    BlockCount = 4,
    BlockSize = 5,
    #[num_enum(default)]
    Unknown = 0,
}

struct Session<D> {
    device: D,
    info: CardInfo,
    mount: Option<String<MOUNT_POINT_MAX>>,
}

/// SD card attached to a shared SPI bus via its own chip-select line.
///
/// Construction touches no hardware; [`init`](SdCard::init) acquires the
/// vendor device slot and runs card identification. The attachment's
/// initialized state is distinct from the bus's own flag, and both are
/// required before any transfer.
pub struct SdCard<'bus, M, V, H>
where
    M: RawMutex,
    V: SpiHostDriver,
    H: SdHostDriver,
{
    bus: BusHandle<'bus, M, V>,
    driver: H,
    cs: Gpio,
    freq_khz: u32,
    session: Option<Session<H::Device>>,
}

impl<'bus, M, V, H> SdCard<'bus, M, V, H>
where
    M: RawMutex,
    V: SpiHostDriver,
    H: SdHostDriver,
{
    /// Create an attachment bound to `cs` on the handle's bus.
    ///
    /// Fails with [`SdError::InvalidClock`] if `freq_khz` lies outside
    /// the supported SPI range. The bus need not be initialized yet.
    pub fn new(
        bus: BusHandle<'bus, M, V>,
        driver: H,
        cs: Gpio,
        freq_khz: u32,
    ) -> Result<Self, SdError> {
        if !(FREQ_MIN_KHZ..=FREQ_MAX_KHZ).contains(&freq_khz) {
            return Err(SdError::InvalidClock(freq_khz));
        }
        Ok(Self { bus, driver, cs, freq_khz, session: None })
    }

    /// Acquire the device slot and identify the card.
    ///
    /// Idempotent: succeeds without touching hardware if already
    /// initialized. Fails with [`SdError::Bus`] (`NotReady`) before any
    /// vendor call if the bus is down. A failed identification releases
    /// the just-acquired slot before the error is raised.
    pub fn init(&mut self) -> Result<(), SdError> {
        if self.session.is_some() {
            return Ok(());
        }

        let host = self.bus.ensure_ready()?;

        let mut device = self
            .driver
            .attach(host, self.cs, self.freq_khz)
            .map_err(SdError::CardInit)?;

        let info = match self.driver.probe(&mut device) {
            Ok(info) => info,
            Err(code) => {
                let _ = self.driver.detach(device);
                return Err(SdError::CardInit(code));
            }
        };

        #[cfg(feature = "defmt")]
        defmt::info!(
            "sd card ready: {} blocks of {} bytes",
            info.block_count,
            info.block_size,
        );

        self.session = Some(Session { device, info, mount: None });
        Ok(())
    }

    /// Read whole blocks starting at `start_block` into `buf`.
    ///
    /// Transfers `buf.len() / block_size` blocks; trailing bytes beyond
    /// the last whole block are ignored, and a buffer shorter than one
    /// block succeeds without touching the bus. The range is checked
    /// against the card geometry before any vendor call; on a vendor
    /// failure the buffer contents are undefined.
    pub fn read_blocks(
        &mut self,
        start_block: u32,
        buf: &mut [u8],
    ) -> Result<(), SdError> {
        let session = self.session.as_mut().ok_or(SdError::NotReady)?;
        let count = Self::bounded_count(session, start_block, buf.len())?;
        if count == 0 {
            return Ok(());
        }
        let len = (count * session.info.block_size) as usize;
        self.driver
            .read_sectors(
                &mut session.device,
                start_block,
                count,
                &mut buf[..len],
            )
            .map_err(SdError::Io)
    }

    /// Write whole blocks starting at `start_block` from `buf`.
    ///
    /// Same block-count and bounds rules as
    /// [`read_blocks`](SdCard::read_blocks).
    pub fn write_blocks(
        &mut self,
        start_block: u32,
        buf: &[u8],
    ) -> Result<(), SdError> {
        let session = self.session.as_mut().ok_or(SdError::NotReady)?;
        let count = Self::bounded_count(session, start_block, buf.len())?;
        if count == 0 {
            return Ok(());
        }
        let len = (count * session.info.block_size) as usize;
        self.driver
            .write_sectors(
                &mut session.device,
                start_block,
                count,
                &buf[..len],
            )
            .map_err(SdError::Io)
    }

    /// Total number of addressable blocks.
    pub fn block_count(&self) -> Result<u32, SdError> {
        self.session
            .as_ref()
            .map(|s| s.info.block_count)
            .ok_or(SdError::NotReady)
    }

    /// Block size in bytes.
    pub fn block_size(&self) -> Result<u32, SdError> {
        self.session
            .as_ref()
            .map(|s| s.info.block_size)
            .ok_or(SdError::NotReady)
    }

    /// Answer a control query.
    ///
    /// The two recognized opcodes return the recorded geometry; every
    /// other opcode returns 0. Never fails; before `init` every opcode
    /// returns 0.
    pub fn control(&self, op: u8) -> u32 {
        let Some(session) = self.session.as_ref() else {
            return 0;
        };
        match ControlOp::from(op) {
            ControlOp::BlockCount => session.info.block_count,
            ControlOp::BlockSize => session.info.block_size,
            ControlOp::Unknown => 0,
        }
    }

    /// Mount the card's FAT volume at `path`.
    pub fn mount(&mut self, path: &str) -> Result<(), SdError> {
        let session = self.session.as_mut().ok_or(SdError::NotReady)?;
        if session.mount.is_some() {
            return Err(SdError::AlreadyMounted);
        }
        if path.is_empty() {
            return Err(SdError::InvalidMountPoint);
        }
        let mut point = String::new();
        point.push_str(path).map_err(|_| SdError::InvalidMountPoint)?;

        self.driver
            .mount(&mut session.device, path)
            .map_err(SdError::MountFailed)?;
        session.mount = Some(point);

        #[cfg(feature = "defmt")]
        defmt::info!("sd volume mounted at {=str}", path);

        Ok(())
    }

    /// Unmount the card's volume.
    ///
    /// Fails with [`SdError::NotMounted`] if nothing is mounted. On a
    /// vendor failure the mount state is kept so the caller can retry.
    pub fn unmount(&mut self) -> Result<(), SdError> {
        let session = self.session.as_mut().ok_or(SdError::NotReady)?;
        let point = session.mount.take().ok_or(SdError::NotMounted)?;

        if let Err(code) =
            self.driver.unmount(&mut session.device, point.as_str())
        {
            session.mount = Some(point);
            return Err(SdError::Io(code));
        }
        Ok(())
    }

    /// Whether `init` has completed successfully.
    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a volume is currently mounted.
    pub fn is_mounted(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.mount.is_some())
    }

    /// Recorded card geometry, if identified.
    pub fn info(&self) -> Option<&CardInfo> {
        self.session.as_ref().map(|s| &s.info)
    }

    /// Release the vendor device slot.
    ///
    /// Idempotent: a second call does nothing. A mounted volume is
    /// unmounted best-effort first. The session is cleared even when a
    /// vendor call fails, so the slot is never freed twice.
    pub fn release(&mut self) -> Result<(), SdError> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        if let Some(point) = session.mount.take() {
            let _ =
                self.driver.unmount(&mut session.device, point.as_str());
        }
        self.driver
            .detach(session.device)
            .map_err(SdError::ReleaseFailed)
    }

    fn bounded_count(
        session: &Session<H::Device>,
        start_block: u32,
        buf_len: usize,
    ) -> Result<u32, SdError> {
        let count = (buf_len as u32) / session.info.block_size;
        let end = start_block
            .checked_add(count)
            .ok_or(SdError::OutOfRange { start: start_block, blocks: count })?;
        if end > session.info.block_count {
            return Err(SdError::OutOfRange {
                start: start_block,
                blocks: count,
            });
        }
        Ok(count)
    }
}

impl<M, V, H> Drop for SdCard<'_, M, V, H>
where
    M: RawMutex,
    V: SpiHostDriver,
    H: SdHostDriver,
{
    fn drop(&mut self) {
        let _ = self.release();
    }
}
