use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicUsize, Ordering};

use crate::config::BusConfig;
use crate::error::BusError;
use crate::handle::BusHandle;
use crate::vendor::SpiHostDriver;

struct Inner<V> {
    vendor: V,
    initialized: bool,
}

/// A shared SPI bus: physical configuration plus initialization state.
///
/// The configuration is immutable after construction. `init` brings the
/// bus up exactly once; attachments obtain reference-counted
/// [`BusHandle`]s via [`acquire`](SpiBus::acquire), and
/// [`release`](SpiBus::release) tears the bus down once no handles
/// remain.
pub struct SpiBus<M: RawMutex, V: SpiHostDriver> {
    config: BusConfig,
    state: Mutex<M, RefCell<Inner<V>>>,
    users: AtomicUsize,
}

impl<M: RawMutex, V: SpiHostDriver> SpiBus<M, V> {
    /// Create an uninitialized bus. No hardware is touched.
    pub const fn new(config: BusConfig, vendor: V) -> Self {
        Self {
            config,
            state: Mutex::new(RefCell::new(Inner {
                vendor,
                initialized: false,
            })),
            users: AtomicUsize::new(0),
        }
    }

    /// Bring the bus up.
    ///
    /// Idempotent: a second call on an initialized bus succeeds without
    /// re-acquiring the vendor resource. On success the data-in line has
    /// its pull-up enabled (hardware workaround for card-detect floating
    /// reads). On any vendor failure the bus is left uninitialized with
    /// no partial state: a failed pull-up unwinds the acquisition.
    pub fn init(&self) -> Result<(), BusError> {
        self.state.lock(|cell| {
            let mut inner = cell.borrow_mut();
            if inner.initialized {
                return Ok(());
            }

            inner
                .vendor
                .bus_initialize(self.config.host, &self.config)
                .map_err(BusError::InitFailed)?;

            if let Err(code) = inner.vendor.enable_pullup(self.config.miso)
            {
                let _ = inner.vendor.bus_free(self.config.host);
                return Err(BusError::InitFailed(code));
            }

            inner.initialized = true;

            #[cfg(feature = "defmt")]
            defmt::info!(
                "spi bus up: host={} sclk={} mosi={} miso={}",
                self.config.host,
                self.config.sclk,
                self.config.mosi,
                self.config.miso,
            );

            Ok(())
        })
    }

    /// Acquire a reference-counted handle to this bus.
    ///
    /// Permitted on an uninitialized bus; attachments re-check readiness
    /// through the handle before acquiring their own vendor resources.
    pub fn acquire(&self) -> BusHandle<'_, M, V> {
        self.users.fetch_add(1, Ordering::Acquire);
        BusHandle::new(self)
    }

    /// Tear the bus down.
    ///
    /// Fails with [`BusError::InUse`] while any handle is live. A no-op
    /// on an already-uninitialized bus. On vendor failure the bus remains
    /// initialized and the status code is surfaced. A released bus may be
    /// re-initialized with [`init`](SpiBus::init).
    pub fn release(&self) -> Result<(), BusError> {
        self.state.lock(|cell| {
            let mut inner = cell.borrow_mut();
            if !inner.initialized {
                return Ok(());
            }

            let n = self.users.load(Ordering::Acquire);
            if n > 0 {
                return Err(BusError::InUse(n));
            }

            inner
                .vendor
                .bus_free(self.config.host)
                .map_err(BusError::ReleaseFailed)?;
            inner.initialized = false;

            #[cfg(feature = "defmt")]
            defmt::info!("spi bus down: host={}", self.config.host);

            Ok(())
        })
    }

    /// Whether `init` has completed successfully.
    pub fn is_initialized(&self) -> bool {
        self.state.lock(|cell| cell.borrow().initialized)
    }

    /// The bus configuration.
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Number of live attachment handles.
    pub fn user_count(&self) -> usize {
        self.users.load(Ordering::Relaxed)
    }

    pub(crate) fn users(&self) -> &AtomicUsize {
        &self.users
    }
}
