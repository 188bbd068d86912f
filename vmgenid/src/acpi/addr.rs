// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project
// src/acpi/addr.rs
use log::debug;

use crate::acpi::{AcpiObject, PackageElement};
use crate::error::{Error, Malformed};
use crate::host::Platform;

/// Method on the device companion that returns the identifier's address.
pub const ADDR_METHOD: &str = "ADDR";

/// Joins the two halves of an `ADDR` package. Only the low 32 bits of `lo`
/// count; `hi` supplies bits 32..=63.
pub const fn combine(lo: u64, hi: u64) -> u64 {
    (lo & 0xFFFF_FFFF) | (hi << 32)
}

/// Checks the shape of an `ADDR` result: a package of exactly two integers.
pub fn parse(obj: &AcpiObject) -> Result<u64, Malformed> {
    let elements = match obj {
        AcpiObject::Package(elements) => elements,
        other => return Err(Malformed::NotPackage(other.object_type())),
    };
    if elements.len() != 2 {
        return Err(Malformed::ElementCount(elements.len()));
    }

    let mut halves = [0u64; 2];
    for (index, el) in elements.iter().enumerate() {
        match el {
            PackageElement::Integer(v) => halves[index] = *v,
            other => {
                return Err(Malformed::NotInteger {
                    index,
                    ty: other.object_type(),
                });
            }
        }
    }
    Ok(combine(halves[0], halves[1]))
}

/// Evaluates `ADDR` and returns the physical address of the identifier.
pub fn resolve<P: Platform + ?Sized>(platform: &P) -> Result<u64, Error> {
    let obj = platform.evaluate(ADDR_METHOD).map_err(|status| {
        debug!("[vmgenid] evaluating {} failed: {}", ADDR_METHOD, status);
        Error::Resolution { status }
    })?;
    let phys = parse(&obj)?;
    debug!("[vmgenid] {} -> phys {:#x}", ADDR_METHOD, phys);
    Ok(phys)
}
