// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for the split-key coffer.

use std::time::Duration;

use serial_test::serial;

use crate::coffer::Coffer;
use crate::error::CoreError;

fn value_of(coffer: &Coffer) -> Vec<u8> {
    let view = coffer.view().expect("Failed to view()");
    let value = view.open(<[u8]>::to_vec);

    view.destroy().expect("Failed to destroy()");
    value
}

// =============================================================================
// view()
// =============================================================================

#[test]
#[serial(core)]
fn test_view_is_a_frozen_32_byte_buffer() {
    let coffer = Coffer::new().expect("Failed to new()");
    let view = coffer.view().expect("Failed to view()");

    assert_eq!(view.size(), 32);
    assert!(!view.is_mutable());

    view.destroy().expect("Failed to destroy()");
}

#[test]
#[serial(core)]
fn test_independent_coffers_hold_distinct_values() {
    let a = Coffer::new().expect("Failed to new()");
    let b = Coffer::new().expect("Failed to new()");

    assert_ne!(value_of(&a), value_of(&b));
}

// =============================================================================
// rekey()
// =============================================================================

#[test]
#[serial(core)]
fn test_value_survives_a_hundred_rekeys() {
    let coffer = Coffer::new().expect("Failed to new()");
    let before = value_of(&coffer);
    let (left_before, right_before) = coffer.halves();

    for _ in 0..100 {
        coffer.rekey().expect("Failed to rekey()");
    }

    let (left_after, right_after) = coffer.halves();

    assert_eq!(value_of(&coffer), before);
    assert_ne!(left_before, left_after);
    assert_ne!(right_before, right_after);
}

#[test]
#[serial(core)]
fn test_background_thread_rotates_the_halves() {
    let coffer = Coffer::with_interval(Duration::from_millis(5)).expect("Failed to new()");
    let before = value_of(&coffer);
    let halves_before = coffer.halves();

    std::thread::sleep(Duration::from_millis(100));

    assert_ne!(coffer.halves(), halves_before);
    assert_eq!(value_of(&coffer), before);
}

#[test]
#[serial(core)]
fn test_zero_interval_is_clamped() {
    let coffer = Coffer::with_interval(Duration::ZERO).expect("Failed to new()");
    let before = value_of(&coffer);

    std::thread::sleep(Duration::from_millis(20));

    assert_eq!(value_of(&coffer), before);
}

// =============================================================================
// destroy()
// =============================================================================

#[test]
#[serial(core)]
fn test_destroyed_coffer_refuses_views_and_rekeys() {
    let coffer = Coffer::new().expect("Failed to new()");

    coffer.destroy();
    coffer.destroy();

    assert!(matches!(coffer.view(), Err(CoreError::CofferExpired)));
    assert!(matches!(coffer.rekey(), Err(CoreError::CofferExpired)));
}
