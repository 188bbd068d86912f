// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project
pub mod region;

pub use region::GenIdRegion;

use bitflags::bitflags;
use log::debug;

use crate::VMGENID_SIZE;
use crate::error::Error;
use crate::host::RegionMapper;

bitflags! {
    /// Requested memory type for a mapping (`MEMREMAP_*`).
    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct MemremapFlags: u32 {
        /// Write-back cacheable.
        const WB = 1 << 0;
        /// Write-through.
        const WT = 1 << 1;
        /// Write-combining.
        const WC = 1 << 2;
        /// Uncached.
        const UC = 1 << 3;
    }
}

/// Maps the 16-byte identifier at `phys`, write-back cacheable. The view
/// borrows `mapper`, which keeps the mapping alive.
pub fn map_genid_region<M: RegionMapper + ?Sized>(
    mapper: &M,
    phys: u64,
) -> Result<GenIdRegion<'_>, Error> {
    let Some(ptr) = mapper.memremap(phys, VMGENID_SIZE, MemremapFlags::WB) else {
        debug!("[vmgenid] memremap({:#x}, {}) failed", phys, VMGENID_SIZE);
        return Err(Error::Mapping {
            phys,
            len: VMGENID_SIZE,
        });
    };
    // SAFETY: RegionMapper guarantees VMGENID_SIZE readable bytes for as long
    // as `mapper` is borrowed, which bounds the region's lifetime.
    Ok(unsafe { GenIdRegion::new(ptr.cast()) })
}
