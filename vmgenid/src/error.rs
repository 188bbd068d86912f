// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project
use thiserror::Error;

use crate::acpi::{AcpiStatus, ObjectType};

/// Probe-time failures. Every variant means the device is left unattached;
/// nothing is retried.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("device is not a generation id counter")]
    NoDevice,

    #[error("ACPI support is disabled")]
    AcpiDisabled,

    #[error("evaluating ADDR failed: {status}")]
    Resolution { status: AcpiStatus },

    #[error("malformed ADDR descriptor: {0}")]
    MalformedDescriptor(Malformed),

    #[error("cannot map {len} bytes at phys {phys:#x}")]
    Mapping { phys: u64, len: usize },

    #[error("failed to install acpi notify handler: {0}")]
    Registration(AcpiStatus),
}

/// What exactly was wrong with the object `ADDR` returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    #[error("expected a package, got {0:?}")]
    NotPackage(ObjectType),

    #[error("expected 2 package elements, got {0}")]
    ElementCount(usize),

    #[error("element {index} is {ty:?}, not an integer")]
    NotInteger { index: usize, ty: ObjectType },
}

impl From<Malformed> for Error {
    fn from(m: Malformed) -> Self {
        Error::MalformedDescriptor(m)
    }
}
