// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Buffer - a guarded allocation with a mutability state machine.
//!
//! A buffer is born mutable, can be frozen read-only and thawed back, and
//! ends destroyed: wiped, unmapped and unusable. Every access goes through
//! [`Buffer::open`] or [`Buffer::open_mut`], which hand out a slice view
//! under the buffer's lock; a destroyed buffer always presents an empty
//! slice, so stale handles degrade to no-ops instead of faults.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use parapet_alloc::{Allocator, default_allocator};
use parapet_crypto::{ct_copy, ct_equal, scramble, wipe};
use parapet_mem::Region;

use crate::error::CoreError;
use crate::registry;

/// A protected byte buffer backed by a guarded allocation.
///
/// `Buffer` is an owning handle; dropping it destroys the allocation. It is
/// `Send + Sync`, with all state transitions serialized behind an internal
/// lock.
pub struct Buffer {
    inner: Arc<BufferInner>,
}

pub(crate) struct BufferInner {
    allocator: Arc<dyn Allocator>,
    state: RwLock<BufferState>,
}

struct BufferState {
    alive: bool,
    mutable: bool,
    // Stale once `alive` is false; never dereferenced after that point.
    data: Region,
}

impl Buffer {
    /// Allocates a new mutable buffer of `size` zeroed bytes.
    pub fn new(size: usize) -> Result<Self, CoreError> {
        Self::with_allocator(default_allocator(), size)
    }

    /// Allocates a new mutable buffer from a specific allocator.
    pub fn with_allocator(
        allocator: Arc<dyn Allocator>,
        size: usize,
    ) -> Result<Self, CoreError> {
        Self::build(allocator, size, true)
    }

    /// A buffer invisible to the purge registry. Used for coffer halves,
    /// which are torn down through their coffer rather than the registry.
    pub(crate) fn unregistered(size: usize) -> Result<Self, CoreError> {
        Self::build(default_allocator(), size, false)
    }

    fn build(
        allocator: Arc<dyn Allocator>,
        size: usize,
        register: bool,
    ) -> Result<Self, CoreError> {
        if size == 0 {
            return Err(CoreError::NullBuffer);
        }

        let data = allocator.alloc(size)?;
        let inner = Arc::new(BufferInner {
            allocator,
            state: RwLock::new(BufferState {
                alive: true,
                mutable: true,
                data,
            }),
        });

        if register {
            registry::register(Arc::downgrade(&inner));
        }

        Ok(Self { inner })
    }

    /// Moves `src` into a new immutable buffer, wiping `src` afterwards.
    pub fn from_bytes(src: &mut [u8]) -> Result<Self, CoreError> {
        let buffer = Self::new(src.len())?;

        buffer.open_mut(|data| ct_copy(data, src));
        wipe(src);
        buffer.freeze()?;

        Ok(buffer)
    }

    /// Creates a new immutable buffer filled with cryptographically random
    /// bytes.
    pub fn random(size: usize) -> Result<Self, CoreError> {
        let buffer = Self::new(size)?;

        buffer.open_mut(scramble);
        buffer.freeze()?;

        Ok(buffer)
    }

    /// Reads the contents under the buffer's lock.
    ///
    /// The closure receives an empty slice if the buffer was destroyed.
    pub fn open<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let state = self.inner.read_state();

        if state.alive {
            f(unsafe { state.data.as_slice() })
        } else {
            f(&[])
        }
    }

    /// Mutates the contents under the buffer's lock.
    ///
    /// The closure receives an empty slice if the buffer was destroyed or is
    /// frozen; writing through a frozen mapping would fault.
    pub fn open_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let state = self.inner.write_state();

        if state.alive && state.mutable {
            f(unsafe { state.data.as_mut_slice() })
        } else {
            f(&mut [])
        }
    }

    /// Marks the buffer read-only. Idempotent; a no-op once destroyed.
    pub fn freeze(&self) -> Result<(), CoreError> {
        let mut state = self.inner.write_state();

        if state.alive && state.mutable {
            self.inner.allocator.protect(state.data, true)?;
            state.mutable = false;
        }

        Ok(())
    }

    /// Marks the buffer writable again. Idempotent; a no-op once destroyed.
    pub fn melt(&self) -> Result<(), CoreError> {
        let mut state = self.inner.write_state();

        if state.alive && !state.mutable {
            self.inner.allocator.protect(state.data, false)?;
            state.mutable = true;
        }

        Ok(())
    }

    /// Copies `src` into the buffer starting at `offset`, in constant time.
    ///
    /// Bytes past the end of the buffer are dropped. A no-op on destroyed or
    /// frozen buffers.
    pub fn copy_at(&self, offset: usize, src: &[u8]) {
        self.open_mut(|data| {
            if offset < data.len() {
                ct_copy(&mut data[offset..], src);
            }
        });
    }

    /// Moves `src` into the buffer at `offset`, wiping `src` afterwards.
    ///
    /// `src` is wiped even when the buffer cannot accept the write; the
    /// caller handed the bytes over either way.
    pub fn move_at(&self, offset: usize, src: &mut [u8]) {
        self.copy_at(offset, src);
        wipe(src);
    }

    /// Overwrites the contents with cryptographically random bytes.
    pub fn scramble(&self) {
        self.open_mut(scramble);
    }

    /// Overwrites the contents with zeroes.
    pub fn wipe(&self) {
        self.open_mut(wipe);
    }

    /// Length in bytes; zero once destroyed.
    pub fn size(&self) -> usize {
        let state = self.inner.read_state();

        if state.alive { state.data.len() } else { 0 }
    }

    /// Returns true until the buffer is destroyed.
    pub fn is_alive(&self) -> bool {
        self.inner.is_alive()
    }

    /// Returns true while the buffer accepts writes.
    pub fn is_mutable(&self) -> bool {
        let state = self.inner.read_state();

        state.alive && state.mutable
    }

    /// Compares two buffers' contents in constant time.
    ///
    /// Destroyed buffers compare unequal to everything, including each other.
    pub fn equal_to(&self, other: &Buffer) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return self.is_alive();
        }

        // Lock in address order so concurrent comparisons cannot deadlock.
        let (first, second) = if Arc::as_ptr(&self.inner) < Arc::as_ptr(&other.inner) {
            (&self.inner, &other.inner)
        } else {
            (&other.inner, &self.inner)
        };

        let a = first.read_state();
        let b = second.read_state();

        if !a.alive || !b.alive {
            return false;
        }

        unsafe { ct_equal(a.data.as_slice(), b.data.as_slice()) }
    }

    /// Deep-copies the buffer, preserving its mutability.
    pub fn try_clone(&self) -> Result<Buffer, CoreError> {
        let state = self.inner.read_state();

        if !state.alive {
            return Err(CoreError::BufferExpired);
        }

        let copy = Self::with_allocator(Arc::clone(&self.inner.allocator), state.data.len())?;

        copy.open_mut(|data| ct_copy(data, unsafe { state.data.as_slice() }));

        if !state.mutable {
            copy.freeze()?;
        }

        Ok(copy)
    }

    /// Wipes the contents and releases the allocation.
    ///
    /// Idempotent. Returns [`AllocError::BufferOverflow`] wrapped in
    /// [`CoreError::Alloc`] if the allocator found its canaries disturbed;
    /// the memory is released either way.
    ///
    /// [`AllocError::BufferOverflow`]: parapet_alloc::AllocError::BufferOverflow
    pub fn destroy(&self) -> Result<(), CoreError> {
        let result = self.inner.destroy();

        registry::deregister(&Arc::downgrade(&self.inner));
        result
    }

    /// Consumes the buffer into an encrypted [`Enclave`](crate::Enclave),
    /// destroying it.
    pub fn seal(self) -> Result<crate::Enclave, CoreError> {
        crate::Enclave::seal(self)
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        // A purge may briefly hold a second strong reference; the allocation
        // is released by whichever side still sees it alive.
        if Arc::strong_count(&self.inner) == 1 {
            let _ = self.destroy();
        }
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read_state();

        f.debug_struct("Buffer")
            .field("len", &state.data.len())
            .field("alive", &state.alive)
            .field("mutable", &state.mutable)
            .finish_non_exhaustive()
    }
}

impl BufferInner {
    pub(crate) fn is_alive(&self) -> bool {
        self.read_state().alive
    }

    /// Wipes and frees the allocation. Idempotent.
    pub(crate) fn destroy(&self) -> Result<(), CoreError> {
        let mut state = self.write_state();

        self.destroy_locked(&mut state)
    }

    /// Best-effort destroy that refuses to block; used during teardown where
    /// a wedged holder must not stall the rest of the purge.
    pub(crate) fn destroy_nonblocking(&self) -> Result<(), CoreError> {
        let Ok(mut state) = self.state.try_write() else {
            return Ok(());
        };

        self.destroy_locked(&mut state)
    }

    fn destroy_locked(&self, state: &mut BufferState) -> Result<(), CoreError> {
        if !state.alive {
            return Ok(());
        }

        state.alive = false;
        state.mutable = false;

        // free() re-opens frozen mappings, wipes, and verifies canaries.
        self.allocator.free(state.data)?;

        Ok(())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, BufferState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, BufferState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for BufferInner {
    fn drop(&mut self) {
        let _ = self.destroy();
    }
}
