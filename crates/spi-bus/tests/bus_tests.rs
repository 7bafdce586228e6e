use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use spi_bus::{
    BusConfig, BusError, ErrCode, Gpio, HostId, SpiBus, SpiHostDriver,
};

// ---------------------------------------------------------------------------
// Mock vendor driver
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockCounts {
    init_calls: AtomicUsize,
    free_calls: AtomicUsize,
    pullup_pins: Mutex<Vec<u8>>,
}

/// Mock SPI host driver with injectable one-shot failures.
struct MockSpiHost {
    counts: Arc<MockCounts>,
    fail_init: Arc<AtomicBool>,
    fail_pullup: Arc<AtomicBool>,
    fail_free: Arc<AtomicBool>,
}

impl SpiHostDriver for MockSpiHost {
    fn bus_initialize(
        &mut self,
        _host: HostId,
        _config: &BusConfig,
    ) -> Result<(), ErrCode> {
        self.counts.init_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_init.swap(false, Ordering::SeqCst) {
            return Err(ErrCode(0x103));
        }
        Ok(())
    }

    fn bus_free(&mut self, _host: HostId) -> Result<(), ErrCode> {
        self.counts.free_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_free.swap(false, Ordering::SeqCst) {
            return Err(ErrCode(0x105));
        }
        Ok(())
    }

    fn enable_pullup(&mut self, pin: Gpio) -> Result<(), ErrCode> {
        if self.fail_pullup.swap(false, Ordering::SeqCst) {
            return Err(ErrCode(0x102));
        }
        self.counts.pullup_pins.lock().unwrap().push(pin.number());
        Ok(())
    }
}

struct Harness {
    counts: Arc<MockCounts>,
    fail_init: Arc<AtomicBool>,
    fail_pullup: Arc<AtomicBool>,
    fail_free: Arc<AtomicBool>,
}

fn make_bus() -> (SpiBus<NoopRawMutex, MockSpiHost>, Harness) {
    let harness = Harness {
        counts: Arc::new(MockCounts::default()),
        fail_init: Arc::new(AtomicBool::new(false)),
        fail_pullup: Arc::new(AtomicBool::new(false)),
        fail_free: Arc::new(AtomicBool::new(false)),
    };
    let vendor = MockSpiHost {
        counts: harness.counts.clone(),
        fail_init: harness.fail_init.clone(),
        fail_pullup: harness.fail_pullup.clone(),
        fail_free: harness.fail_free.clone(),
    };
    let config = BusConfig::new(8, 9, 7).unwrap();
    (SpiBus::new(config, vendor), harness)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn out_of_range_pins_are_rejected_before_any_vendor_call() {
    assert_eq!(BusConfig::new(49, 9, 7), Err(BusError::InvalidPin(49)));
    assert_eq!(BusConfig::new(8, 255, 7), Err(BusError::InvalidPin(255)));
    assert_eq!(HostId::from_index(3), Err(BusError::InvalidHost(3)));
}

#[test]
fn init_brings_bus_up_and_applies_data_in_pullup() {
    let (bus, h) = make_bus();

    bus.init().unwrap();
    assert!(bus.is_initialized());
    assert_eq!(h.counts.init_calls.load(Ordering::SeqCst), 1);
    // Pull-up lands on the data-in (MISO) line, after acquisition.
    assert_eq!(*h.counts.pullup_pins.lock().unwrap(), vec![8]);
}

#[test]
fn double_init_is_idempotent_and_does_not_reacquire() {
    let (bus, h) = make_bus();

    bus.init().unwrap();
    bus.init().unwrap();
    assert_eq!(h.counts.init_calls.load(Ordering::SeqCst), 1);
    assert_eq!(*h.counts.pullup_pins.lock().unwrap(), vec![8]);
}

#[test]
fn failed_init_leaves_bus_uninitialized_and_retryable() {
    let (bus, h) = make_bus();
    h.fail_init.store(true, Ordering::SeqCst);

    assert_eq!(bus.init(), Err(BusError::InitFailed(ErrCode(0x103))));
    assert!(!bus.is_initialized());
    assert!(h.counts.pullup_pins.lock().unwrap().is_empty());

    // The vendor driver is still in place; a retry succeeds.
    bus.init().unwrap();
    assert!(bus.is_initialized());
    assert_eq!(h.counts.init_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn failed_pullup_unwinds_the_acquisition() {
    let (bus, h) = make_bus();
    h.fail_pullup.store(true, Ordering::SeqCst);

    assert_eq!(bus.init(), Err(BusError::InitFailed(ErrCode(0x102))));
    assert!(!bus.is_initialized());
    assert_eq!(h.counts.init_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.counts.free_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn handles_gate_release() {
    let (bus, h) = make_bus();
    bus.init().unwrap();

    let handle = bus.acquire();
    assert_eq!(bus.user_count(), 1);
    assert_eq!(bus.release(), Err(BusError::InUse(1)));
    assert_eq!(h.counts.free_calls.load(Ordering::SeqCst), 0);

    drop(handle);
    assert_eq!(bus.user_count(), 0);
    bus.release().unwrap();
    assert!(!bus.is_initialized());
    assert_eq!(h.counts.free_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn release_is_idempotent_when_idle() {
    let (bus, h) = make_bus();

    // Never initialized: nothing to tear down.
    bus.release().unwrap();
    assert_eq!(h.counts.free_calls.load(Ordering::SeqCst), 0);

    bus.init().unwrap();
    bus.release().unwrap();
    bus.release().unwrap();
    assert_eq!(h.counts.free_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn released_bus_can_be_reinitialized() {
    let (bus, h) = make_bus();

    bus.init().unwrap();
    bus.release().unwrap();
    bus.init().unwrap();
    assert!(bus.is_initialized());
    assert_eq!(h.counts.init_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn failed_teardown_keeps_bus_initialized() {
    let (bus, h) = make_bus();
    bus.init().unwrap();
    h.fail_free.store(true, Ordering::SeqCst);

    assert_eq!(
        bus.release(),
        Err(BusError::ReleaseFailed(ErrCode(0x105)))
    );
    assert!(bus.is_initialized());
}

#[test]
fn ensure_ready_tracks_initialization() {
    let (bus, _h) = make_bus();

    let handle = bus.acquire();
    assert_eq!(handle.ensure_ready(), Err(BusError::NotReady));

    bus.init().unwrap();
    assert_eq!(handle.ensure_ready(), Ok(HostId::Spi2));
    assert_eq!(handle.host(), HostId::Spi2);
}

#[test]
fn user_count_follows_acquire_and_drop() {
    let (bus, _h) = make_bus();

    let h1 = bus.acquire();
    let h2 = bus.acquire();
    assert_eq!(bus.user_count(), 2);
    drop(h1);
    assert_eq!(bus.user_count(), 1);
    drop(h2);
    assert_eq!(bus.user_count(), 0);
}
