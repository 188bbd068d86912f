// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project
//! What the hosting kernel has to provide. One [`Platform`] value stands for
//! one device and its ACPI companion; it also owns every mapping made
//! through it, so mappings live exactly as long as the device does.
use core::ptr::NonNull;

use crate::GenId;
use crate::acpi::{AcpiObject, AcpiStatus, NotifyKind};
use crate::mem::MemremapFlags;
use crate::uevent::ChangeEvent;

/// Maps physical memory into the kernel's address space.
///
/// # Safety
/// A pointer returned by [`RegionMapper::memremap`] must stay valid for
/// reads of `len` bytes for as long as `self` is alive. Callers never
/// unmap it; that is the implementor's job on teardown.
pub unsafe trait RegionMapper {
    /// Returns `None` when the range cannot be mapped with `flags`.
    fn memremap(&self, phys: u64, len: usize, flags: MemremapFlags) -> Option<NonNull<u8>>;
}

/// Device-model services for one attached device.
pub trait Platform: RegionMapper {
    /// Evaluates `method` on the device's ACPI companion.
    fn evaluate(&self, method: &str) -> Result<AcpiObject, AcpiStatus>;

    /// Starts routing firmware notifications of `kind` to the driver.
    ///
    /// Once this succeeds the host calls [`crate::VmGenId::notify`] for every
    /// notification, one at a time. Until [`crate::probe`] returns the host
    /// has no `VmGenId` to call, so notifications in that window may be
    /// dropped; `probe` re-reads the id once after arming to pick up any
    /// change they announced.
    fn install_notify_handler(&self, kind: NotifyKind) -> Result<(), AcpiStatus>;

    /// Broadcasts a uevent for the device.
    fn emit_event(&self, event: &ChangeEvent);
}

/// The entropy pool.
pub trait EntropySink {
    /// Mixes in device-specific data at boot. Not credited as entropy and
    /// does not force a reseed.
    fn add_device_randomness(&self, id: &GenId);

    /// The VM has been forked or cloned: mix `id` in and reseed right away.
    fn add_vmfork_randomness(&self, id: &GenId);
}
