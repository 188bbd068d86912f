// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project
//! ACPI-facing pieces: what the firmware hands back when a method is
//! evaluated, the ids we bind to, and the `ADDR` resolution itself.
pub mod addr;
pub mod ids;

use core::fmt;

use heapless::Vec as HVec;

/// Largest package we are prepared to receive from a method evaluation.
pub const MAX_PACKAGE_ELEMENTS: usize = 8;

/// Object types as ACPICA numbers them (`ACPI_TYPE_*`).
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ObjectType {
    Integer = 1,
    String = 2,
    Buffer = 3,
    Package = 4,
}

/// One element of an evaluated package. Nested aggregates are only
/// described by their type; nothing here ever needs to look inside them.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PackageElement {
    Integer(u64),
    Other(ObjectType),
}

impl PackageElement {
    pub fn object_type(&self) -> ObjectType {
        match self {
            PackageElement::Integer(_) => ObjectType::Integer,
            PackageElement::Other(ty) => *ty,
        }
    }
}

/// Result of evaluating a firmware method.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AcpiObject {
    Integer(u64),
    String,
    Buffer,
    Package(HVec<PackageElement, MAX_PACKAGE_ELEMENTS>),
}

impl AcpiObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            AcpiObject::Integer(_) => ObjectType::Integer,
            AcpiObject::String => ObjectType::String,
            AcpiObject::Buffer => ObjectType::Buffer,
            AcpiObject::Package(_) => ObjectType::Package,
        }
    }
}

/// An ACPICA exception code (`acpi_status`). Zero is `AE_OK` and never
/// appears inside an error.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct AcpiStatus(pub u32);

impl AcpiStatus {
    pub const AE_ERROR: Self = Self(0x0001);
    pub const AE_NO_MEMORY: Self = Self(0x0004);
    pub const AE_NOT_FOUND: Self = Self(0x0005);
    pub const AE_ALREADY_EXISTS: Self = Self(0x0007);
    pub const AE_TYPE: Self = Self(0x0008);
    pub const AE_BAD_PARAMETER: Self = Self(0x1001);

    pub const fn name(&self) -> Option<&'static str> {
        Some(match self.0 {
            0x0001 => "AE_ERROR",
            0x0004 => "AE_NO_MEMORY",
            0x0005 => "AE_NOT_FOUND",
            0x0007 => "AE_ALREADY_EXISTS",
            0x0008 => "AE_TYPE",
            0x1001 => "AE_BAD_PARAMETER",
            _ => return None,
        })
    }
}

impl fmt::Display for AcpiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "AE_{:#06x}", self.0),
        }
    }
}

impl fmt::Debug for AcpiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AcpiStatus({self})")
    }
}

/// Which notifications a handler is installed for (`ACPI_*_NOTIFY`). Only
/// device notifications carry generation changes.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NotifyKind {
    Device = 0x2,
}
