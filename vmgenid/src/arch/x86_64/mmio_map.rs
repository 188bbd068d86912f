// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project
//! [`RegionMapper`] on top of x86_64 4-level page tables.
//!
//! Firmware regions get their own VA window (not the HHDM), mapped in 4 KiB
//! pages: present, read-only, NX, global. The memory type comes from the
//! [`MemremapFlags`] the caller asked for.
use core::ptr::NonNull;
use core::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use spin::Mutex;
use x86_64::structures::paging::{
    FrameAllocator, Mapper, Page, PageTableFlags as F, PhysFrame, Size4KiB,
};
use x86_64::{PhysAddr, VirtAddr};

use crate::host::RegionMapper;
use crate::mem::MemremapFlags;

const PAGE_SIZE: u64 = 0x1000;

fn align_down(x: u64, a: u64) -> u64 {
    x & !(a - 1)
}

fn align_up(x: u64, a: u64) -> Option<u64> {
    Some(x.checked_add(a - 1)? & !(a - 1))
}

/// Leaf flags for a read-only mapping of the requested memory type.
/// Tried in the order WB, WT, UC; write-combining would need PAT, so it is
/// refused.
pub fn leaf_flags(flags: MemremapFlags) -> Option<F> {
    let base = F::PRESENT | F::NO_EXECUTE | F::GLOBAL;
    if flags.contains(MemremapFlags::WB) {
        Some(base)
    } else if flags.contains(MemremapFlags::WT) {
        Some(base | F::WRITE_THROUGH)
    } else if flags.contains(MemremapFlags::UC) {
        Some(base | F::WRITE_THROUGH | F::NO_CACHE)
    } else {
        None
    }
}

pub struct PageTableMapper<M, A> {
    tables: Mutex<(M, A)>,
    next_va: AtomicU64,
    window_end: u64,
}

impl<M, A> PageTableMapper<M, A>
where
    M: Mapper<Size4KiB>,
    A: FrameAllocator<Size4KiB>,
{
    /// # Safety
    /// - `mapper` must edit the page tables of the address space the returned
    ///   pointers are used in.
    /// - `[window, window + window_len)` must be canonical and not used by
    ///   anything else.
    pub const unsafe fn new(mapper: M, frames: A, window: VirtAddr, window_len: u64) -> Self {
        Self {
            tables: Mutex::new((mapper, frames)),
            next_va: AtomicU64::new(window.as_u64()),
            window_end: window.as_u64().saturating_add(window_len),
        }
    }

    /// Gives the page tables back. Mappings made so far stay in place.
    pub fn into_inner(self) -> (M, A) {
        self.tables.into_inner()
    }

    fn map_pages(&self, pa0: u64, va0: u64, pages: u64, flags: F) -> Option<()> {
        let mut guard = self.tables.lock();
        let (mapper, frames) = &mut *guard;

        for i in 0..pages {
            let pa = pa0 + i * PAGE_SIZE;
            let va = va0 + i * PAGE_SIZE;
            let frame = PhysFrame::<Size4KiB>::containing_address(PhysAddr::new(pa));
            let page = Page::<Size4KiB>::containing_address(VirtAddr::try_new(va).ok()?);
            // SAFETY: the page lies in our private window and the frame is
            // device memory the firmware told us about.
            let res = unsafe {
                mapper.map_to_with_table_flags(
                    page,
                    frame,
                    flags,
                    F::PRESENT | F::WRITABLE,
                    frames,
                )
            };
            match res {
                // The entry was non-present before, so no TLB can hold it.
                Ok(flush) => flush.ignore(),
                Err(e) => {
                    debug!("[mmio] map {:#x} -> {:#x} failed: {:?}", va, pa, e);
                    for j in 0..i {
                        let done =
                            Page::<Size4KiB>::containing_address(VirtAddr::new(va0 + j * PAGE_SIZE));
                        if let Ok((_, flush)) = mapper.unmap(done) {
                            flush.flush();
                        }
                    }
                    return None;
                }
            }
        }
        Some(())
    }
}

// SAFETY: pages handed out are never unmapped while `self` is alive, and
// `new` obliges the caller to use the live address space.
unsafe impl<M, A> RegionMapper for PageTableMapper<M, A>
where
    M: Mapper<Size4KiB>,
    A: FrameAllocator<Size4KiB>,
{
    fn memremap(&self, phys: u64, len: usize, flags: MemremapFlags) -> Option<NonNull<u8>> {
        if len == 0 {
            return None;
        }
        let pte = leaf_flags(flags)?;

        let end = phys.checked_add(len as u64)?;
        let pa0 = align_down(phys, PAGE_SIZE);
        let pend = align_up(end, PAGE_SIZE)?;
        PhysAddr::try_new(pend - 1).ok()?;
        let size = pend - pa0;

        let Ok(va0) = self.next_va.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |va| {
            va.checked_add(size).filter(|&end| end <= self.window_end)
        }) else {
            debug!("[mmio] window exhausted mapping {:#x}+{:#x}", phys, len);
            return None;
        };

        if self.map_pages(pa0, va0, size / PAGE_SIZE, pte).is_none() {
            // Only the most recent reservation can be handed back.
            let _ = self.next_va.compare_exchange(
                va0 + size,
                va0,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );
            return None;
        }
        NonNull::new((va0 + (phys - pa0)) as *mut u8)
    }
}
