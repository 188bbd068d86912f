// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project
//! Probe and notify glue. The host matches a device against [`DRIVER`],
//! calls [`probe`], keeps the returned [`VmGenId`] for as long as the device
//! is attached, and forwards every firmware notification to
//! [`VmGenId::notify`].
use core::fmt;

use log::debug;
use spin::Mutex;

use crate::GenId;
use crate::acpi::ids::{self, VMGENID_ACPI_IDS};
use crate::error::Error;
use crate::host::{EntropySink, Platform};
use crate::monitor::{ChangeOutcome, GenIdMonitor};

/// Static description of the driver, for the host's matching tables.
#[derive(Debug)]
pub struct DriverInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub acpi_ids: &'static [&'static str],
}

pub static DRIVER: DriverInfo = DriverInfo {
    name: "vmgenid",
    description: "Virtual Machine Generation ID",
    acpi_ids: &VMGENID_ACPI_IDS,
};

/// One attached generation id device.
pub struct VmGenId<'a, P: ?Sized, E: ?Sized> {
    platform: &'a P,
    entropy: &'a E,
    monitor: Mutex<GenIdMonitor<'a>>,
}

/// Attaches to the device whose ACPI hardware id is `hid`.
///
/// On success the identifier has been read once and fed to `entropy`, and
/// the platform routes device notifications to the returned value.
pub fn probe<'a, P, E>(
    hid: &str,
    platform: &'a P,
    entropy: &'a E,
) -> Result<VmGenId<'a, P, E>, Error>
where
    P: Platform + ?Sized,
    E: EntropySink + ?Sized,
{
    if !ids::matches(hid) {
        return Err(Error::NoDevice);
    }
    let dev = add_acpi(platform, entropy).inspect_err(|e| {
        if !matches!(e, Error::Registration(_)) {
            debug!("[vmgenid] probe of {} failed: {}", hid, e);
        }
    })?;
    debug!("[vmgenid] attached {}", hid);
    Ok(dev)
}

#[cfg(feature = "acpi")]
fn add_acpi<'a, P, E>(platform: &'a P, entropy: &'a E) -> Result<VmGenId<'a, P, E>, Error>
where
    P: Platform + ?Sized,
    E: EntropySink + ?Sized,
{
    use crate::acpi::{NotifyKind, addr};
    use crate::mem::map_genid_region;
    use log::error;

    let phys = addr::resolve(platform)?;
    let region = map_genid_region(platform, phys)?;
    let monitor = GenIdMonitor::initialize(region, entropy);

    let dev = VmGenId {
        platform,
        entropy,
        monitor: Mutex::new(monitor),
    };

    if let Err(status) = platform.install_notify_handler(NotifyKind::Device) {
        error!("[vmgenid] Failed to install acpi notify handler: {}", status);
        return Err(Error::Registration(status));
    }

    // Notifications raised between the first snapshot and the handler going
    // live had nobody to deliver to.
    if dev.notify(0) == ChangeOutcome::Changed {
        debug!("[vmgenid] id moved while the handler was being installed");
    }
    Ok(dev)
}

#[cfg(not(feature = "acpi"))]
fn add_acpi<'a, P, E>(_platform: &'a P, _entropy: &'a E) -> Result<VmGenId<'a, P, E>, Error>
where
    P: Platform + ?Sized,
    E: EntropySink + ?Sized,
{
    Err(Error::AcpiDisabled)
}

impl<'a, P, E> VmGenId<'a, P, E>
where
    P: Platform + ?Sized,
    E: EntropySink + ?Sized,
{
    /// Firmware notification handler. `_event` carries nothing useful; the
    /// identifier itself is re-read.
    ///
    /// The host delivers notifications for one device one at a time; the
    /// per-device lock backs that up if it ever does not.
    pub fn notify(&self, _event: u32) -> ChangeOutcome {
        self.monitor
            .lock()
            .on_change_signal(self.entropy, self.platform)
    }

    /// The identifier as of the last notification (or probe).
    pub fn generation_id(&self) -> GenId {
        self.monitor.lock().generation_id()
    }
}

impl<P: ?Sized, E: ?Sized> fmt::Debug for VmGenId<'_, P, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("VmGenId");
        match self.monitor.try_lock() {
            Some(monitor) => d.field("monitor", &*monitor),
            None => d.field("monitor", &format_args!("<locked>")),
        };
        d.finish_non_exhaustive()
    }
}
