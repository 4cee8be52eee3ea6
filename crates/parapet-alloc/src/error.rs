// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for parapet-alloc.

use thiserror::Error;

use parapet_mem::MemError;

/// Errors from the guarded allocators.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum AllocError {
    /// A zero-length allocation was requested.
    #[error("allocation of zero bytes requested")]
    NullAlloc,

    /// The address is not tracked by this allocator: double free or a
    /// pointer that never came from it.
    #[error("address not owned by allocator")]
    NotOwnedByAllocator,

    /// Canary verification failed at free: the allocation was overrun.
    /// The memory has still been wiped and released.
    #[error("buffer overflow detected: canary mismatch")]
    BufferOverflow,

    /// An OS memory primitive failed.
    #[error("memory primitive failed: {0}")]
    Mem(#[from] MemError),
}
