// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! The allocator seam shared by the page and slab variants.

use parapet_mem::Region;

use crate::error::AllocError;

/// A provider of guarded byte regions for sensitive data.
///
/// `alloc` returns the user-visible data region; the surrounding machinery
/// (guards, canaries, locking) is internal to the allocator. The returned
/// region stays valid until passed back to `free` on the same allocator.
pub trait Allocator: Send + Sync {
    /// Allocates a region of exactly `user_size` bytes, readable and
    /// writable, wiped, and excluded from swap and core dumps.
    fn alloc(&self, user_size: usize) -> Result<Region, AllocError>;

    /// Flips the protection of the allocation owning `data`.
    ///
    /// May be a no-op where page protection cannot be applied at the
    /// object's granularity (see `SlabAllocator`).
    ///
    /// # Panics
    ///
    /// Panics if `data` does not belong to this allocator; passing a foreign
    /// region here is a programmer error, not an input error.
    fn protect(&self, data: Region, read_only: bool) -> Result<(), AllocError>;

    /// Wipes, verifies and releases the allocation owning `data`.
    ///
    /// On [`AllocError::BufferOverflow`] the memory has nonetheless been
    /// wiped and released; the error reports the violated invariant.
    fn free(&self, data: Region) -> Result<(), AllocError>;
}
