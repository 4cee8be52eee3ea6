// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! One-time process hardening against core dumps.
//!
//! `prctl(PR_SET_DUMPABLE, 0)` blocks core dumps and ptrace attachment;
//! `setrlimit(RLIMIT_CORE, 0)` caps dump size as a second line. Both are
//! attempted exactly once per process; later calls return the cached result.

use core::sync::atomic::{AtomicU8, Ordering};

/// Result of the one-time hardening attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardenStatus {
    /// Whether `prctl(PR_SET_DUMPABLE, 0)` succeeded.
    ///
    /// Reversible by other code calling `prctl(PR_SET_DUMPABLE, 1)`.
    pub prctl_succeeded: bool,

    /// Whether `setrlimit(RLIMIT_CORE, 0)` succeeded.
    ///
    /// Does not block ptrace, but is harder to revert than prctl.
    pub rlimit_succeeded: bool,
}

impl HardenStatus {
    /// True if at least one protection took effect.
    pub fn is_hardened(&self) -> bool {
        self.prctl_succeeded || self.rlimit_succeeded
    }
}

const STATE_UNINIT: u8 = 0;
const STATE_IN_PROGRESS: u8 = 1;
const STATE_DONE: u8 = 2;

static INIT_STATE: AtomicU8 = AtomicU8::new(STATE_UNINIT);
static PRCTL_SUCCEEDED: AtomicU8 = AtomicU8::new(0);
static RLIMIT_SUCCEEDED: AtomicU8 = AtomicU8::new(0);

/// Returns the process hardening status, performing the syscalls on first call.
///
/// Thread-safe: if several threads race here, one performs the syscalls while
/// the rest spin-wait for the cached result.
#[inline]
pub fn harden_status() -> HardenStatus {
    // Fast path: already initialized
    if INIT_STATE.load(Ordering::Acquire) == STATE_DONE {
        return HardenStatus {
            prctl_succeeded: PRCTL_SUCCEEDED.load(Ordering::Relaxed) != 0,
            rlimit_succeeded: RLIMIT_SUCCEEDED.load(Ordering::Relaxed) != 0,
        };
    }

    init_slow();
    harden_status()
}

#[cold]
#[inline(never)]
fn init_slow() {
    match INIT_STATE.compare_exchange(
        STATE_UNINIT,
        STATE_IN_PROGRESS,
        Ordering::Acquire,
        Ordering::Relaxed,
    ) {
        Ok(_) => {
            let prctl_ok = prctl_set_not_dumpable();
            let rlimit_ok = setrlimit_core_zero();

            PRCTL_SUCCEEDED.store(prctl_ok as u8, Ordering::Relaxed);
            RLIMIT_SUCCEEDED.store(rlimit_ok as u8, Ordering::Relaxed);
            INIT_STATE.store(STATE_DONE, Ordering::Release);
        }
        Err(_) => {
            while INIT_STATE.load(Ordering::Acquire) != STATE_DONE {
                core::hint::spin_loop();
            }
        }
    }
}

#[cfg(target_os = "linux")]
fn prctl_set_not_dumpable() -> bool {
    unsafe { libc::prctl(libc::PR_SET_DUMPABLE, 0, 0, 0, 0) == 0 }
}

#[cfg(not(target_os = "linux"))]
fn prctl_set_not_dumpable() -> bool {
    // prctl is Linux-only
    false
}

#[cfg(target_os = "linux")]
fn setrlimit_core_zero() -> bool {
    let limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    unsafe { libc::setrlimit(libc::RLIMIT_CORE, &limit) == 0 }
}

#[cfg(not(target_os = "linux"))]
fn setrlimit_core_zero() -> bool {
    // RLIMIT_CORE handling is Linux-specific here
    false
}
