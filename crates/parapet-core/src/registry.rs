// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Process-global registry of live buffers.
//!
//! Every buffer registers itself on creation so that [`purge`](crate::purge)
//! can reach allocations whose handles are parked in arbitrary threads. The
//! registry holds weak references only; it never keeps a buffer alive.

use std::sync::{LazyLock, Mutex, Weak};

use crate::buffer::BufferInner;

static REGISTRY: LazyLock<Mutex<Vec<Weak<BufferInner>>>> =
    LazyLock::new(|| Mutex::new(Vec::new()));

pub(crate) fn register(inner: Weak<BufferInner>) {
    let mut entries = lock_registry();

    entries.retain(|entry| entry.strong_count() > 0);
    entries.push(inner);
}

pub(crate) fn deregister(inner: &Weak<BufferInner>) {
    let mut entries = lock_registry();

    entries.retain(|entry| entry.strong_count() > 0 && !entry.ptr_eq(inner));
}

/// Removes and returns every buffer still reachable through the registry.
pub(crate) fn drain() -> Vec<std::sync::Arc<BufferInner>> {
    let mut entries = lock_registry();
    let live = entries.iter().filter_map(Weak::upgrade).collect();

    entries.clear();
    live
}

/// Returns the number of live buffers known to the registry.
pub fn live_buffers() -> usize {
    lock_registry()
        .iter()
        .filter(|entry| entry.upgrade().is_some_and(|inner| inner.is_alive()))
        .count()
}

fn lock_registry() -> std::sync::MutexGuard<'static, Vec<Weak<BufferInner>>> {
    match REGISTRY.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
