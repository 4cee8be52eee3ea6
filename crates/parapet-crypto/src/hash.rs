// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Fixed-output hashing.

use crate::HASH_SIZE;

/// Hashes `input` to a fixed 32-byte BLAKE3 digest.
pub fn hash(input: &[u8]) -> [u8; HASH_SIZE] {
    *blake3::hash(input).as_bytes()
}
