// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Constant-time helpers and non-elidable wiping.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Overwrites `out` with zeroes in a way the optimizer cannot remove.
pub fn wipe(out: &mut [u8]) {
    out.zeroize();
}

/// Copies `min(|dst|, |src|)` bytes from `src` into `dst`.
///
/// The copy touches every byte of the copied prefix unconditionally; no
/// data-dependent branching.
pub fn ct_copy(dst: &mut [u8], src: &[u8]) {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
}

/// Constant-time equality.
///
/// Returns `false` for length mismatches. Lengths are not treated as secret;
/// only the content comparison is constant-time.
pub fn ct_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.ct_eq(b).into()
}
