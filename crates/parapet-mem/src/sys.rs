// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Syscall wrappers for page-granular memory management.

use core::ptr;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::error::MemError;
use crate::region::{Prot, Region};

static PAGE_SIZE: AtomicUsize = AtomicUsize::new(0);

/// Returns the system page size, cached after the first query.
pub fn page_size() -> usize {
    let cached = PAGE_SIZE.load(Ordering::Relaxed);
    if cached != 0 {
        return cached;
    }

    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize;
    PAGE_SIZE.store(size, Ordering::Relaxed);
    size
}

/// Maps `len` bytes of anonymous, private, read-write memory.
///
/// `len` must be a non-zero multiple of the page size.
pub fn alloc(len: usize) -> Result<Region, MemError> {
    debug_assert!(len > 0 && len % page_size() == 0);

    let ptr = unsafe {
        libc::mmap(
            ptr::null_mut(),
            len,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };

    if ptr == libc::MAP_FAILED {
        return Err(MemError::Alloc);
    }

    Ok(unsafe { Region::from_raw(ptr.cast::<u8>(), len) })
}

/// Pins the region into RAM and excludes it from core dumps.
///
/// `MADV_DONTDUMP` is advisory and Linux-only; its failure is ignored.
/// `mlock` failure is not.
pub fn lock(region: Region) -> Result<(), MemError> {
    #[cfg(target_os = "linux")]
    unsafe {
        libc::madvise(region.as_ptr().cast(), region.len(), libc::MADV_DONTDUMP);
    }

    let rc = unsafe { libc::mlock(region.as_ptr().cast(), region.len()) };
    if rc != 0 {
        return Err(MemError::Lock);
    }

    Ok(())
}

/// Unpins the region.
pub fn unlock(region: Region) -> Result<(), MemError> {
    let rc = unsafe { libc::munlock(region.as_ptr().cast(), region.len()) };
    if rc != 0 {
        return Err(MemError::Unlock);
    }

    Ok(())
}

/// Changes the protection of the region.
pub fn protect(region: Region, prot: Prot) -> Result<(), MemError> {
    let flags = match prot {
        Prot::NoAccess => libc::PROT_NONE,
        Prot::ReadOnly => libc::PROT_READ,
        Prot::ReadWrite => libc::PROT_READ | libc::PROT_WRITE,
    };

    let rc = unsafe { libc::mprotect(region.as_ptr().cast(), region.len(), flags) };
    if rc != 0 {
        return Err(MemError::Protect);
    }

    Ok(())
}

/// Unmaps the region.
///
/// # Safety
///
/// `region` must cover an entire mapping previously returned by [`alloc`]
/// and no live reference may point into it.
pub unsafe fn free(region: Region) -> Result<(), MemError> {
    let rc = unsafe { libc::munmap(region.as_ptr().cast(), region.len()) };
    if rc != 0 {
        return Err(MemError::Free);
    }

    Ok(())
}
