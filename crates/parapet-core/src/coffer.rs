// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Coffer - a 32-byte secret split across two rotating halves.
//!
//! The stored value never exists in memory as a whole. It is kept as
//! `value = hash(right) XOR left`, and a background thread refreshes both
//! halves on a fixed interval without changing the value, so a memory
//! snapshot of either half goes stale within one rekey tick.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::thread;
use std::time::Duration;

use parapet_crypto::{KEY_SIZE, hash, wipe};

use crate::buffer::Buffer;
use crate::error::CoreError;

/// How often the background thread re-derives the halves.
pub const DEFAULT_REKEY_INTERVAL: Duration = Duration::from_millis(500);

/// Lower bound on the rekey interval; shorter requests are clamped.
pub const MIN_REKEY_INTERVAL: Duration = Duration::from_millis(1);

/// A split secret with a rekeying background thread.
///
/// Dropping the last handle destroys the halves and ends the thread on its
/// next tick.
pub struct Coffer {
    inner: Arc<CofferInner>,
}

struct CofferInner {
    state: RwLock<CofferState>,
}

struct CofferState {
    left: Buffer,
    right: Buffer,
    scratch: Buffer,
    destroyed: bool,
}

impl Coffer {
    /// Creates a coffer holding a fresh uniformly random value, rekeying
    /// every [`DEFAULT_REKEY_INTERVAL`].
    pub fn new() -> Result<Self, CoreError> {
        Self::with_interval(DEFAULT_REKEY_INTERVAL)
    }

    /// Creates a coffer with a custom rekey interval.
    pub fn with_interval(interval: Duration) -> Result<Self, CoreError> {
        let interval = interval.max(MIN_REKEY_INTERVAL);

        let left = Buffer::unregistered(KEY_SIZE)?;
        let right = Buffer::unregistered(KEY_SIZE)?;
        let scratch = Buffer::unregistered(KEY_SIZE)?;

        // Random halves make the implicit value uniformly random.
        left.scramble();
        right.scramble();

        let mut h = right.open(|r| hash(r));

        left.open_mut(|l| {
            for (l, h) in l.iter_mut().zip(&h) {
                *l ^= h;
            }
        });
        wipe(&mut h);

        let inner = Arc::new(CofferInner {
            state: RwLock::new(CofferState {
                left,
                right,
                scratch,
                destroyed: false,
            }),
        });

        spawn_rekey_thread(Arc::downgrade(&inner), interval);

        Ok(Self { inner })
    }

    /// Reassembles the value into a fresh immutable [`Buffer`].
    ///
    /// The caller owns the view and should destroy it as soon as the value
    /// has been used.
    pub fn view(&self) -> Result<Buffer, CoreError> {
        let state = self.inner.read_state();

        if state.destroyed || !state.left.is_alive() || !state.right.is_alive() {
            return Err(CoreError::CofferExpired);
        }

        let view = Buffer::new(KEY_SIZE)?;

        // Assemble the value directly inside the guarded view.
        view.open_mut(|out| {
            let mut h = state.right.open(|r| hash(r));

            state.left.open(|l| {
                for (i, out) in out.iter_mut().enumerate() {
                    *out = h[i] ^ l[i];
                }
            });

            wipe(&mut h);
        });

        view.freeze()?;

        Ok(view)
    }

    /// Replaces both halves with fresh material, preserving the value.
    pub fn rekey(&self) -> Result<(), CoreError> {
        let state = self.inner.write_state();

        if state.destroyed {
            return Err(CoreError::CofferExpired);
        }

        rekey_halves(&state);

        Ok(())
    }

    /// Destroys the halves. Idempotent; subsequent views fail with
    /// [`CoreError::CofferExpired`].
    pub fn destroy(&self) {
        let mut state = self.inner.write_state();

        if state.destroyed {
            return;
        }

        state.destroyed = true;

        let _ = state.left.destroy();
        let _ = state.right.destroy();
        let _ = state.scratch.destroy();
    }

    /// Snapshots the raw halves, for verifying rotation in tests.
    #[cfg(test)]
    pub(crate) fn halves(&self) -> (Vec<u8>, Vec<u8>) {
        let state = self.inner.read_state();
        let left = state.left.open(<[u8]>::to_vec);
        let right = state.right.open(<[u8]>::to_vec);

        (left, right)
    }
}

impl std::fmt::Debug for Coffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read_state();

        f.debug_struct("Coffer")
            .field("destroyed", &state.destroyed)
            .finish_non_exhaustive()
    }
}

impl CofferInner {
    fn read_state(&self) -> RwLockReadGuard<'_, CofferState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CofferState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// One rekey step under the coffer's write lock.
///
/// With `h = hash(right)`, folding random material `s` into `right` moves the
/// hash from `h_old` to `h_new`; XORing `h_old ^ h_new` into `left` cancels
/// the movement, so `hash(right) XOR left` is unchanged.
fn rekey_halves(state: &CofferState) {
    state.scratch.scramble();

    let mut h_old = state.right.open(|r| hash(r));

    state.scratch.open(|s| {
        state.right.open_mut(|r| {
            for (r, s) in r.iter_mut().zip(s) {
                *r ^= s;
            }
        });
    });

    let mut h_new = state.right.open(|r| hash(r));

    state.left.open_mut(|l| {
        for (i, l) in l.iter_mut().enumerate() {
            *l ^= h_old[i] ^ h_new[i];
        }
    });

    wipe(&mut h_old);
    wipe(&mut h_new);
}

fn spawn_rekey_thread(coffer: Weak<CofferInner>, interval: Duration) {
    thread::spawn(move || {
        loop {
            thread::sleep(interval);

            let Some(inner) = coffer.upgrade() else {
                break;
            };
            let state = inner.write_state();

            if state.destroyed {
                break;
            }

            rekey_halves(&state);
        }
    });
}
