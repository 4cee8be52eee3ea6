// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! The process-global session key backing every enclave.

use std::sync::{LazyLock, RwLock, RwLockWriteGuard};

use crate::buffer::Buffer;
use crate::coffer::Coffer;
use crate::error::CoreError;

/// Session key length in bytes.
pub const KEY_LEN: usize = parapet_crypto::KEY_SIZE;

static SESSION: LazyLock<RwLock<Coffer>> = LazyLock::new(|| RwLock::new(fresh_coffer()));

/// Reassembles the current session key into a caller-owned view.
pub(crate) fn view() -> Result<Buffer, CoreError> {
    let session = match SESSION.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    session.view()
}

/// Destroys the session key and installs a fresh one.
///
/// `before` runs under the session write lock, so no enclave can be sealed
/// or opened while it executes.
pub(crate) fn rotate_with(before: impl FnOnce()) {
    let mut session: RwLockWriteGuard<'_, Coffer> = match SESSION.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    before();

    session.destroy();
    *session = fresh_coffer();
}

fn fresh_coffer() -> Coffer {
    match Coffer::new() {
        Ok(coffer) => coffer,
        Err(_) => {
            // Without a session key no secret can be protected; stopping the
            // process is the only safe continuation.
            eprintln!("parapet: failed to initialize the session key");
            std::process::abort();
        }
    }
}
