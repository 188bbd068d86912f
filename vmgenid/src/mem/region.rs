// SPDX-License-Identifier: JOSSL-1.0
// Copyright (C) 2025 The Jotunheim Project
use core::fmt;
use core::ptr::NonNull;

use volatile::VolatilePtr;
use volatile::access::ReadOnly;

use crate::GenId;

/// Read-only view onto the host-owned identifier. The host may rewrite the
/// bytes at any moment; every [`GenIdRegion::read`] goes to memory.
#[derive(Clone, Copy)]
pub struct GenIdRegion<'a> {
    ptr: VolatilePtr<'a, GenId, ReadOnly>,
}

// SAFETY: the view never writes and the bytes belong to the host, so reading
// them has no thread affinity.
unsafe impl Send for GenIdRegion<'_> {}

impl<'a> GenIdRegion<'a> {
    /// # Safety
    /// `ptr` must stay valid for reads of the whole identifier for `'a`.
    pub unsafe fn new(ptr: NonNull<GenId>) -> Self {
        Self {
            ptr: unsafe { VolatilePtr::new_read_only(ptr) },
        }
    }

    /// One bounded 16-byte read. A host that rewrites the identifier
    /// without finishing before it notifies can hand us a torn value; that
    /// is its contract to keep, not ours.
    pub fn read(&self) -> GenId {
        self.ptr.read()
    }
}

impl fmt::Debug for GenIdRegion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenIdRegion")
            .field("addr", &self.ptr.as_raw_ptr())
            .finish()
    }
}
