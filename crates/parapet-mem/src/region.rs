// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Region - a view onto a page-aligned mapping.

/// Page protection mode.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Prot {
    /// PROT_NONE: any access faults.
    NoAccess,
    /// PROT_READ.
    ReadOnly,
    /// PROT_READ | PROT_WRITE.
    ReadWrite,
}

/// A contiguous run of mapped bytes.
///
/// A `Region` is a plain (pointer, length) pair. It does not own the mapping;
/// ownership and release ordering are the caller's responsibility. Subregions
/// created with [`Region::subregion`] alias the parent mapping.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Region {
    ptr: *mut u8,
    len: usize,
}

// Safety: Region is an address range, not an access path. All dereferencing
// goes through the unsafe slice accessors whose callers uphold aliasing.
unsafe impl Send for Region {}
unsafe impl Sync for Region {}

impl Region {
    /// Creates a region from a raw pointer and length.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live mapping of at least `len` bytes.
    pub const unsafe fn from_raw(ptr: *mut u8, len: usize) -> Self {
        Self { ptr, len }
    }

    /// Base address of the region.
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr
    }

    /// Base address as an integer, for address-keyed lookups.
    pub fn addr(&self) -> usize {
        self.ptr as usize
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the region is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A sub-view of `len` bytes starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the region. Carving a region outside
    /// its mapping is a programmer error, never an input error.
    pub fn subregion(&self, offset: usize, len: usize) -> Region {
        assert!(
            offset.checked_add(len).is_some_and(|end| end <= self.len),
            "subregion out of bounds"
        );

        Region {
            ptr: unsafe { self.ptr.add(offset) },
            len,
        }
    }

    /// Borrows the region as a byte slice.
    ///
    /// # Safety
    ///
    /// The region must be mapped readable and no mutable borrow may alias it.
    pub unsafe fn as_slice(&self) -> &[u8] {
        unsafe { core::slice::from_raw_parts(self.ptr, self.len) }
    }

    /// Borrows the region as a mutable byte slice.
    ///
    /// # Safety
    ///
    /// The region must be mapped writable and no other borrow may alias it.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn as_mut_slice(&self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.ptr, self.len) }
    }
}

impl core::fmt::Debug for Region {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Addresses only; contents may be secret.
        f.debug_struct("Region").field("len", &self.len).finish_non_exhaustive()
    }
}
