// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project
//! Baseline snapshot + change detection.
//!
//! The monitor owns one private copy of the identifier (`this_id`) and a
//! borrowed view of the live one (`next_id`). A notification only means
//! "maybe"; the bytes decide:
//!   - same bytes: nothing happens, however often the host fires
//!   - new bytes: they become the baseline, get pushed into the entropy
//!     pool as a vm-fork reseed, and exactly one uevent goes out
use log::{debug, trace};

use crate::GenId;
use crate::host::{EntropySink, Platform};
use crate::mem::GenIdRegion;
use crate::uevent::ChangeEvent;

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChangeOutcome {
    Unchanged,
    Changed,
}

#[derive(Debug)]
pub struct GenIdMonitor<'a> {
    next_id: GenIdRegion<'a>,
    this_id: GenId,
}

impl<'a> GenIdMonitor<'a> {
    /// Takes the first snapshot and seeds the pool with it as boot-time
    /// device randomness.
    pub fn initialize<E: EntropySink + ?Sized>(next_id: GenIdRegion<'a>, entropy: &E) -> Self {
        let this_id = next_id.read();
        entropy.add_device_randomness(&this_id);
        Self { next_id, this_id }
    }

    /// Handles one "the identifier may have changed" signal.
    ///
    /// Must not run concurrently with itself; `&mut self` enforces that.
    pub fn on_change_signal<E, P>(&mut self, entropy: &E, host: &P) -> ChangeOutcome
    where
        E: EntropySink + ?Sized,
        P: Platform + ?Sized,
    {
        let old_id = self.this_id;
        let new_id = self.next_id.read();
        if old_id == new_id {
            trace!("[vmgenid] notification without a new id");
            return ChangeOutcome::Unchanged;
        }

        self.this_id = new_id;
        entropy.add_vmfork_randomness(&self.this_id);
        host.emit_event(&ChangeEvent::new_vmgenid());
        debug!("[vmgenid] generation id changed");
        ChangeOutcome::Changed
    }

    /// The last recorded identifier.
    pub fn generation_id(&self) -> GenId {
        self.this_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acpi::{AcpiObject, AcpiStatus, NotifyKind};
    use crate::host::RegionMapper;
    use crate::mem::MemremapFlags;
    use core::cell::{RefCell, UnsafeCell};
    use core::ptr::NonNull;

    #[derive(Default)]
    struct Pool {
        boot: RefCell<Vec<GenId>>,
        fork: RefCell<Vec<GenId>>,
    }

    impl EntropySink for Pool {
        fn add_device_randomness(&self, id: &GenId) {
            self.boot.borrow_mut().push(*id);
        }
        fn add_vmfork_randomness(&self, id: &GenId) {
            self.fork.borrow_mut().push(*id);
        }
    }

    #[derive(Default)]
    struct Events(RefCell<Vec<ChangeEvent>>);

    unsafe impl RegionMapper for Events {
        fn memremap(&self, _: u64, _: usize, _: MemremapFlags) -> Option<NonNull<u8>> {
            None
        }
    }

    impl Platform for Events {
        fn evaluate(&self, _: &str) -> Result<AcpiObject, AcpiStatus> {
            Err(AcpiStatus::AE_NOT_FOUND)
        }
        fn install_notify_handler(&self, _: NotifyKind) -> Result<(), AcpiStatus> {
            Ok(())
        }
        fn emit_event(&self, event: &ChangeEvent) {
            self.0.borrow_mut().push(*event);
        }
    }

    struct HostId(UnsafeCell<GenId>);

    impl HostId {
        fn new(id: GenId) -> Self {
            Self(UnsafeCell::new(id))
        }
        fn region(&self) -> GenIdRegion<'_> {
            unsafe { GenIdRegion::new(NonNull::new(self.0.get()).unwrap()) }
        }
        fn rewrite(&self, id: GenId) {
            unsafe { self.0.get().write_volatile(id) }
        }
    }

    const P: GenId = *b"\x8e\x1d\xc4\x02\x5a\x77\x43\x90\xb1\x0c\xfe\x21\x6d\x34\xa8\x5f";

    #[test]
    fn initialize_snapshots_and_seeds_once() {
        let host = HostId::new(P);
        let pool = Pool::default();
        let mon = GenIdMonitor::initialize(host.region(), &pool);

        assert_eq!(mon.generation_id(), P);
        assert_eq!(*pool.boot.borrow(), vec![P]);
        assert!(pool.fork.borrow().is_empty());
    }

    #[test]
    fn spurious_signals_do_nothing() {
        let host = HostId::new(P);
        let pool = Pool::default();
        let events = Events::default();
        let mut mon = GenIdMonitor::initialize(host.region(), &pool);

        for _ in 0..5 {
            assert_eq!(mon.on_change_signal(&pool, &events), ChangeOutcome::Unchanged);
        }
        assert!(pool.fork.borrow().is_empty());
        assert!(events.0.borrow().is_empty());
        assert_eq!(pool.boot.borrow().len(), 1);
    }

    #[test]
    fn one_change_one_reseed_one_event() {
        let host = HostId::new([0; 16]);
        let pool = Pool::default();
        let events = Events::default();
        let mut mon = GenIdMonitor::initialize(host.region(), &pool);

        host.rewrite(P);
        assert_eq!(mon.on_change_signal(&pool, &events), ChangeOutcome::Changed);
        assert_eq!(mon.generation_id(), P);
        assert_eq!(*pool.fork.borrow(), vec![P]);
        assert_eq!(*events.0.borrow(), vec![ChangeEvent::new_vmgenid()]);
    }

    #[test]
    fn duplicate_signal_after_change_is_unchanged() {
        let host = HostId::new([0; 16]);
        let pool = Pool::default();
        let events = Events::default();
        let mut mon = GenIdMonitor::initialize(host.region(), &pool);

        host.rewrite(P);
        assert_eq!(mon.on_change_signal(&pool, &events), ChangeOutcome::Changed);
        assert_eq!(mon.on_change_signal(&pool, &events), ChangeOutcome::Unchanged);
        assert_eq!(pool.fork.borrow().len(), 1);
        assert_eq!(events.0.borrow().len(), 1);
    }

    #[test]
    fn change_back_to_an_earlier_id_still_counts() {
        let host = HostId::new([1; 16]);
        let pool = Pool::default();
        let events = Events::default();
        let mut mon = GenIdMonitor::initialize(host.region(), &pool);

        host.rewrite([2; 16]);
        assert_eq!(mon.on_change_signal(&pool, &events), ChangeOutcome::Changed);
        host.rewrite([1; 16]);
        assert_eq!(mon.on_change_signal(&pool, &events), ChangeOutcome::Changed);
        assert_eq!(*pool.fork.borrow(), vec![[2; 16], [1; 16]]);
        assert_eq!(events.0.borrow().len(), 2);
    }

    #[test]
    fn single_byte_flip_is_detected() {
        let host = HostId::new(P);
        let pool = Pool::default();
        let events = Events::default();
        let mut mon = GenIdMonitor::initialize(host.region(), &pool);

        let mut flipped = P;
        flipped[15] ^= 1;
        host.rewrite(flipped);
        assert_eq!(mon.on_change_signal(&pool, &events), ChangeOutcome::Changed);
        assert_eq!(mon.generation_id(), flipped);
    }
}
