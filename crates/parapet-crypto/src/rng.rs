// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! CSPRNG fill backed by a seeded ChaCha generator.
//!
//! Each thread owns a `StdRng` seeded from the OS entropy source. The
//! generator is re-seeded after [`RESEED_AFTER_FILLS`] fills so a leaked
//! generator state has a bounded window. Seeding failure is retried once;
//! a second failure is unrecoverable and panics, since every security
//! property downstream assumes unpredictable bytes.

use core::cell::RefCell;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

const RESEED_AFTER_FILLS: u32 = 1024;

struct ThreadRng {
    rng: StdRng,
    fills: u32,
}

thread_local! {
    static THREAD_RNG: RefCell<Option<ThreadRng>> = const { RefCell::new(None) };
}

#[cold]
#[inline(never)]
fn seed_rng() -> StdRng {
    let mut seed = [0u8; 32];

    if getrandom::fill(&mut seed).is_err() {
        // One retry; the OS source may have been momentarily unavailable.
        getrandom::fill(&mut seed).expect("OS entropy source failed twice");
    }

    StdRng::from_seed(seed)
}

/// Fills `out` with cryptographically secure random bytes.
///
/// # Panics
///
/// Panics if the OS entropy source fails twice in a row while (re)seeding.
pub fn scramble(out: &mut [u8]) {
    THREAD_RNG.with(|cell| {
        let mut slot = cell.borrow_mut();
        let state = slot.get_or_insert_with(|| ThreadRng {
            rng: seed_rng(),
            fills: 0,
        });

        if state.fills >= RESEED_AFTER_FILLS {
            state.rng = seed_rng();
            state.fills = 0;
        }

        state.rng.fill_bytes(out);
        state.fills += 1;
    });
}
