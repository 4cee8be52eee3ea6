// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for process hardening.

use serial_test::serial;

use crate::harden::harden_status;

#[test]
#[serial(mem)]
fn test_harden_status_is_stable_across_calls() {
    let first = harden_status();
    let second = harden_status();

    assert_eq!(first, second);
}

#[cfg(target_os = "linux")]
#[test]
#[serial(mem)]
fn test_harden_succeeds_on_linux() {
    let status = harden_status();

    assert!(status.prctl_succeeded);
    assert!(status.rlimit_succeeded);
    assert!(status.is_hardened());
}

#[test]
#[serial(mem)]
fn test_harden_status_from_many_threads_agrees() {
    let baseline = harden_status();

    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(harden_status))
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("Failed to join thread"), baseline);
    }
}
