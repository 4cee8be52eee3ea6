// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for parapet-mem.

use thiserror::Error;

/// Errors from page syscalls.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum MemError {
    #[error("mmap failed")]
    Alloc = 0,

    #[error("mlock failed")]
    Lock = 1,

    #[error("mprotect failed")]
    Protect = 2,

    #[error("munlock failed")]
    Unlock = 3,

    #[error("munmap failed")]
    Free = 4,
}
