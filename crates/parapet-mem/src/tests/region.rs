// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for Region views.

use crate::region::Region;

fn stack_region(buf: &mut [u8]) -> Region {
    unsafe { Region::from_raw(buf.as_mut_ptr(), buf.len()) }
}

// =============================================================================
// subregion()
// =============================================================================

#[test]
fn test_subregion_full_range() {
    let mut buf = [0u8; 64];
    let region = stack_region(&mut buf);
    let sub = region.subregion(0, 64);

    assert_eq!(sub.addr(), region.addr());
    assert_eq!(sub.len(), 64);
}

#[test]
fn test_subregion_offsets_address() {
    let mut buf = [0u8; 64];
    let region = stack_region(&mut buf);
    let sub = region.subregion(16, 32);

    assert_eq!(sub.addr(), region.addr() + 16);
    assert_eq!(sub.len(), 32);
}

#[test]
fn test_subregion_empty_tail() {
    let mut buf = [0u8; 64];
    let region = stack_region(&mut buf);
    let sub = region.subregion(64, 0);

    assert!(sub.is_empty());
}

#[test]
#[should_panic(expected = "subregion out of bounds")]
fn test_subregion_past_end_panics() {
    let mut buf = [0u8; 64];
    let region = stack_region(&mut buf);

    let _ = region.subregion(32, 33);
}

#[test]
#[should_panic(expected = "subregion out of bounds")]
fn test_subregion_overflowing_panics() {
    let mut buf = [0u8; 64];
    let region = stack_region(&mut buf);

    let _ = region.subregion(usize::MAX, 2);
}

// =============================================================================
// slices / Debug
// =============================================================================

#[test]
fn test_slices_alias_source() {
    let mut buf = [0u8; 8];
    let region = stack_region(&mut buf);

    unsafe { region.as_mut_slice()[3] = 0x99 };

    assert_eq!(buf[3], 0x99);
}

#[test]
fn test_debug_hides_contents() {
    let mut buf = [0xAAu8; 8];
    let region = stack_region(&mut buf);
    let rendered = format!("{region:?}");

    assert!(!rendered.contains("170"));
    assert!(!rendered.contains("aa"));
}
