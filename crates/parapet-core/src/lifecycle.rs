// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Process-wide teardown: purge, exit and purging panics.

use crate::registry;
use crate::sessionkey;

/// Wipes every live buffer and rotates the session key.
///
/// Runs under the session key's write lock, so sealing and opening enclaves
/// block until the purge completes. Buffers whose lock is held elsewhere are
/// skipped rather than waited on; per-buffer failures never stop the sweep.
/// Enclaves sealed before the purge become permanently undecryptable.
pub fn purge() {
    sessionkey::rotate_with(|| {
        for buffer in registry::drain() {
            let _ = buffer.destroy_nonblocking();
        }
    });
}

/// Purges and terminates the process with `code`.
pub fn exit(code: i32) -> ! {
    purge();
    std::process::exit(code);
}

/// Purges, then panics with `msg`.
///
/// For unrecoverable states where secrets must not outlive the failure.
pub fn panic_with(msg: &str) -> ! {
    purge();
    panic!("{}", msg);
}
