// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! parapet_alloc - Guarded allocators for sensitive byte regions.
//!
//! # Guarded page allocator
//!
//! [`PageAllocator`] hands out byte regions that sit inside an mlocked inner
//! area bracketed by two `PROT_NONE` guard pages:
//!
//! ```text
//! | pre guard | canary ........ data | post guard |
//! |  1 page   |   inner (page multiple)  |  1 page |
//! ```
//!
//! The data slice is right-aligned against the post guard, so a forward
//! overrun faults immediately. A backward overrun lands in the canary, which
//! is checked on free. Both guards carry the same per-allocation random
//! signature; the canary is its prefix.
//!
//! # Slab allocator
//!
//! [`SlabAllocator`] packs many small secrets into single guarded pages to
//! keep page overhead down, at the cost of per-object page protection: its
//! `protect` is a no-op, so read-only enforcement falls back to the owning
//! container's state machine. Requests too large for its size classes are
//! delegated to the page allocator.
//!
//! Both implement [`Allocator`]; [`default_allocator`] returns the shared
//! process-wide page allocator.

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod error;
mod guarded;
mod slab;
mod traits;

pub use error::AllocError;
pub use guarded::PageAllocator;
pub use slab::{MIN_CANARY_SIZE, SlabAllocator, SlabConfig};
pub use traits::Allocator;

use std::sync::{Arc, LazyLock};

static DEFAULT: LazyLock<Arc<PageAllocator>> = LazyLock::new(|| {
    // First touch of the allocator hardens the process against core dumps.
    let _ = parapet_mem::harden_status();
    Arc::new(PageAllocator::new())
});

/// Returns the process-wide default (page) allocator.
pub fn default_allocator() -> Arc<dyn Allocator> {
    DEFAULT.clone()
}
