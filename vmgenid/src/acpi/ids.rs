// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project

/// ACPI hardware ids the driver binds to. `VM_GEN_COUNTER` is the legacy
/// spelling some hypervisors still use.
pub const VMGENID_ACPI_IDS: [&str; 2] = ["VMGENCTR", "VM_GEN_COUNTER"];

/// Exact, case-sensitive match against [`VMGENID_ACPI_IDS`].
pub fn matches(hid: &str) -> bool {
    VMGENID_ACPI_IDS.iter().any(|id| *id == hid)
}
