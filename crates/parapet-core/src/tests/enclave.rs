// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for sealing and opening enclaves.

use serial_test::serial;

use parapet_crypto::{CryptoError, OVERHEAD};

use crate::buffer::Buffer;
use crate::enclave::Enclave;
use crate::error::CoreError;

// =============================================================================
// new()
// =============================================================================

#[test]
#[serial(core)]
fn test_seal_then_open_roundtrip() {
    let mut secret = *b"yellow submarine";
    let enclave = Enclave::new(&mut secret).expect("Failed to new()");

    assert_eq!(secret, [0u8; 16], "Source should be wiped after sealing");
    assert_eq!(enclave.size(), 16);
    assert_eq!(enclave.ciphertext().len(), 16 + OVERHEAD);

    let buffer = enclave.open().expect("Failed to open()");

    assert!(!buffer.is_mutable());
    assert!(buffer.open(|data| data == b"yellow submarine"));

    buffer.destroy().expect("Failed to destroy()");
}

#[test]
#[serial(core)]
fn test_empty_payload_fails() {
    assert!(matches!(
        Enclave::new(&mut []),
        Err(CoreError::NullEnclave)
    ));
}

#[test]
#[serial(core)]
fn test_same_plaintext_seals_to_distinct_ciphertexts() {
    let mut first = *b"attack at dawn";
    let mut second = *b"attack at dawn";

    let a = Enclave::new(&mut first).expect("Failed to new()");
    let b = Enclave::new(&mut second).expect("Failed to new()");

    assert_ne!(a.ciphertext(), b.ciphertext());
}

// =============================================================================
// seal()
// =============================================================================

#[test]
#[serial(core)]
fn test_seal_consumes_and_destroys_the_buffer() {
    let buffer = Buffer::new(32).expect("Failed to new()");

    buffer.copy_at(0, &[0x3C; 32]);

    let enclave = buffer.seal().expect("Failed to seal()");
    let reopened = enclave.open().expect("Failed to open()");

    assert!(reopened.open(|data| data == [0x3C; 32]));

    reopened.destroy().expect("Failed to destroy()");
}

#[test]
#[serial(core)]
fn test_seal_accepts_a_frozen_buffer() {
    let buffer = Buffer::new(8).expect("Failed to new()");

    buffer.copy_at(0, b"8 bytes!");
    buffer.freeze().expect("Failed to freeze()");

    let enclave = buffer.seal().expect("Failed to seal()");

    assert_eq!(enclave.size(), 8);
}

#[test]
#[serial(core)]
fn test_seal_of_destroyed_buffer_fails() {
    let buffer = Buffer::new(8).expect("Failed to new()");

    buffer.destroy().expect("Failed to destroy()");

    assert!(matches!(
        Enclave::seal(buffer),
        Err(CoreError::BufferExpired)
    ));
}

// =============================================================================
// open()
// =============================================================================

#[test]
#[serial(core)]
fn test_tampered_ciphertext_fails_to_open() {
    let mut secret = *b"do not touch";
    let enclave = Enclave::new(&mut secret).expect("Failed to new()");

    let mut ct = enclave.ciphertext().to_vec();
    let last = ct.len() - 1;
    ct[last] ^= 0x01;

    let tampered = Enclave::from_ciphertext(ct);

    assert!(matches!(
        tampered.open(),
        Err(CoreError::Crypto(CryptoError::DecryptionFailed))
    ));

    // The untampered original still opens
    let buffer = enclave.open().expect("Failed to open()");
    buffer.destroy().expect("Failed to destroy()");
}

#[test]
#[serial(core)]
fn test_open_returns_independent_buffers() {
    let mut secret = *b"twice is fine";
    let enclave = Enclave::new(&mut secret).expect("Failed to new()");

    let a = enclave.open().expect("Failed to open()");
    let b = enclave.open().expect("Failed to open()");

    assert!(a.equal_to(&b));

    a.destroy().expect("Failed to destroy()");
    b.destroy().expect("Failed to destroy()");
}
