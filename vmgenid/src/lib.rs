// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project
//! Virtual Machine Generation ID.
//!
//! The hypervisor exposes a 16-byte identifier through ACPI and rewrites it
//! whenever the virtual machine is forked, cloned or restored from a
//! snapshot. This crate watches that identifier and shepherds every change
//! into the entropy pool and out to userspace as a `KOBJ_CHANGE` event.
//!
//! Layout:
//!   - [`acpi`]: firmware object model, device ids, `ADDR` resolution
//!   - [`mem`]: the mapped identifier region
//!   - [`monitor`]: baseline snapshot and change detection
//!   - [`driver`]: probe + notify glue handed to the host
//!   - [`host`]: capabilities the host has to provide
#![cfg_attr(not(test), no_std)]

pub mod acpi;
pub mod arch;
pub mod driver;
pub mod error;
pub mod host;
pub mod mem;
pub mod monitor;
pub mod uevent;

pub use driver::{DRIVER, VmGenId, probe};
pub use error::{Error, Malformed};
pub use host::{EntropySink, Platform, RegionMapper};
pub use monitor::{ChangeOutcome, GenIdMonitor};

/// Size in bytes of the generation identifier.
pub const VMGENID_SIZE: usize = 16;

/// One snapshot of the generation identifier.
pub type GenId = [u8; VMGENID_SIZE];
