// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for constant-time helpers and wipe.

use crate::{ct_copy, ct_equal, wipe};

// =============================================================================
// wipe()
// =============================================================================

#[test]
fn test_wipe_zeroes_everything() {
    let mut buf = [0xFFu8; 64];

    wipe(&mut buf);

    assert!(buf.iter().all(|&b| b == 0));
}

#[test]
fn test_wipe_empty_is_noop() {
    let mut buf: [u8; 0] = [];

    wipe(&mut buf);
}

// =============================================================================
// ct_copy()
// =============================================================================

#[test]
fn test_ct_copy_equal_lengths() {
    let src = [1u8, 2, 3, 4];
    let mut dst = [0u8; 4];

    ct_copy(&mut dst, &src);

    assert_eq!(dst, src);
}

#[test]
fn test_ct_copy_shorter_source() {
    let src = [9u8, 9];
    let mut dst = [0u8; 4];

    ct_copy(&mut dst, &src);

    assert_eq!(dst, [9, 9, 0, 0]);
}

#[test]
fn test_ct_copy_shorter_destination() {
    let src = [7u8; 8];
    let mut dst = [0u8; 3];

    ct_copy(&mut dst, &src);

    assert_eq!(dst, [7, 7, 7]);
}

// =============================================================================
// ct_equal()
// =============================================================================

#[test]
fn test_ct_equal_matches() {
    assert!(ct_equal(&[1, 2, 3], &[1, 2, 3]));
}

#[test]
fn test_ct_equal_detects_difference() {
    assert!(!ct_equal(&[1, 2, 3], &[1, 2, 4]));
}

#[test]
fn test_ct_equal_length_mismatch_is_false() {
    assert!(!ct_equal(&[1, 2, 3], &[1, 2]));
}

#[test]
fn test_ct_equal_empty_slices_match() {
    assert!(ct_equal(&[], &[]));
}
