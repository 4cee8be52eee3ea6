// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! parapet_mem - Page-granular OS memory primitives.
//!
//! Thin façade over `mmap`, `mlock`, `mprotect` and `munmap` plus a one-time
//! hardening of the process against core dumps (`prctl(PR_SET_DUMPABLE, 0)`
//! and `setrlimit(RLIMIT_CORE, 0)`).
//!
//! Every operation maps to exactly one syscall family and surfaces failures
//! as a [`MemError`] variant. No retries are attempted; the caller decides.
//!
//! Unix is the supported platform. Guard pages and page locking have no
//! portable equivalent, so there is no fallback backend.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod error;
mod harden;
mod region;

#[cfg(unix)]
mod sys;

pub use error::MemError;
pub use harden::{HardenStatus, harden_status};
pub use region::{Prot, Region};

#[cfg(unix)]
pub use sys::{alloc, free, lock, page_size, protect, unlock};
