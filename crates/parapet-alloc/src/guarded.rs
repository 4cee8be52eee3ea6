// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! The guarded page allocator.

use std::collections::HashMap;
use std::sync::Mutex;

use parapet_crypto::{ct_copy, ct_equal, scramble, wipe};
use parapet_mem::{self as mem, Prot, Region};

use crate::error::AllocError;
use crate::traits::Allocator;

/// One live guarded allocation.
///
/// All regions are views into the same mapping:
///
/// ```text
/// region:  [ pre | inner                      | post ]
/// inner:         [ canary | data              ]
/// ```
#[derive(Clone, Copy)]
struct Guarded {
    region: Region,
    pre: Region,
    inner: Region,
    post: Region,
    data: Region,
    canary_len: usize,
}

/// Page-level allocator with guard pages, canary, and mlocked inner region.
///
/// Tracks allocations in an address-keyed map guarded by a mutex; page
/// syscalls are performed outside the map lock.
pub struct PageAllocator {
    allocations: Mutex<HashMap<usize, Guarded>>,
}

impl PageAllocator {
    /// Creates an empty allocator.
    pub fn new() -> Self {
        Self {
            allocations: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live allocations. Test and diagnostics hook.
    pub fn live_allocations(&self) -> usize {
        self.allocations.lock().expect("allocator map poisoned").len()
    }

    fn build(user_size: usize) -> Result<Guarded, AllocError> {
        let page = mem::page_size();
        let inner_len = user_size
            .checked_next_multiple_of(page)
            .ok_or(AllocError::Mem(parapet_mem::MemError::Alloc))?;
        let total = inner_len
            .checked_add(2 * page)
            .ok_or(AllocError::Mem(parapet_mem::MemError::Alloc))?;

        let region = mem::alloc(total)?;
        let pre = region.subregion(0, page);
        let inner = region.subregion(page, inner_len);
        let post = region.subregion(page + inner_len, page);
        let canary_len = inner_len - user_size;
        let data = inner.subregion(canary_len, user_size);

        Ok(Guarded {
            region,
            pre,
            inner,
            post,
            data,
            canary_len,
        })
    }

    /// Releases a half-constructed allocation after a syscall failure.
    /// Nothing sensitive has been written yet, so no wiping is required.
    fn release_unarmed(guarded: &Guarded) {
        let _ = unsafe { mem::free(guarded.region) };
    }

    /// Looks up the allocation owning `data`, without removing it.
    fn lookup(&self, data: Region) -> Option<Guarded> {
        let map = self.allocations.lock().expect("allocator map poisoned");
        map.get(&data.addr()).copied()
    }

    /// Canary bytes of the allocation owning `data`. Tamper-test hook.
    #[cfg(test)]
    pub(crate) fn canary_region(&self, data: Region) -> Option<Region> {
        self.lookup(data)
            .map(|g| g.inner.subregion(0, g.canary_len))
    }
}

impl Default for PageAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Allocator for PageAllocator {
    fn alloc(&self, user_size: usize) -> Result<Region, AllocError> {
        if user_size == 0 {
            return Err(AllocError::NullAlloc);
        }

        let guarded = Self::build(user_size)?;

        if let Err(e) = mem::lock(guarded.inner) {
            Self::release_unarmed(&guarded);
            return Err(e.into());
        }

        // One random signature: both guards carry it, the canary its prefix.
        {
            let pre = unsafe { guarded.pre.as_mut_slice() };
            scramble(pre);

            let post = unsafe { guarded.post.as_mut_slice() };
            ct_copy(post, pre);

            if guarded.canary_len > 0 {
                let canary_region = guarded.inner.subregion(0, guarded.canary_len);
                let canary = unsafe { canary_region.as_mut_slice() };
                ct_copy(canary, pre);
            }
        }

        for guard in [guarded.pre, guarded.post] {
            if let Err(e) = mem::protect(guard, Prot::NoAccess) {
                let _ = mem::unlock(guarded.inner);
                Self::release_unarmed(&guarded);
                return Err(e.into());
            }
        }

        self.allocations
            .lock()
            .expect("allocator map poisoned")
            .insert(guarded.data.addr(), guarded);

        Ok(guarded.data)
    }

    fn protect(&self, data: Region, read_only: bool) -> Result<(), AllocError> {
        let Some(guarded) = self.lookup(data) else {
            panic!("protect() on a region not owned by this allocator");
        };

        let prot = if read_only { Prot::ReadOnly } else { Prot::ReadWrite };
        mem::protect(guarded.inner, prot)?;

        Ok(())
    }

    fn free(&self, data: Region) -> Result<(), AllocError> {
        let guarded = {
            let mut map = self.allocations.lock().expect("allocator map poisoned");
            map.remove(&data.addr())
        }
        .ok_or(AllocError::NotOwnedByAllocator)?;

        // Open the whole mapping so guards and canary become readable.
        mem::protect(guarded.region, Prot::ReadWrite)?;

        wipe(unsafe { guarded.data.as_mut_slice() });

        let intact = {
            let pre = unsafe { guarded.pre.as_slice() };
            let post = unsafe { guarded.post.as_slice() };
            let canary_region = guarded.inner.subregion(0, guarded.canary_len);
            let canary = unsafe { canary_region.as_slice() };

            ct_equal(pre, post) && ct_equal(&pre[..guarded.canary_len], canary)
        };

        // Release unconditionally; a corrupted allocation must still go away.
        wipe(unsafe { guarded.region.as_mut_slice() });
        mem::unlock(guarded.inner)?;
        unsafe { mem::free(guarded.region) }?;

        if !intact {
            return Err(AllocError::BufferOverflow);
        }

        Ok(())
    }
}
