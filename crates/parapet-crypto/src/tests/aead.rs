// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Tests for encrypt/decrypt.

use proptest::prelude::*;

use crate::error::CryptoError;
use crate::{OVERHEAD, decrypt, encrypt, scramble};

fn random_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    scramble(&mut key);
    key
}

// =============================================================================
// encrypt()
// =============================================================================

#[test]
fn test_encrypt_adds_fixed_overhead() {
    let key = random_key();
    let ct = encrypt(b"yellow submarine", &key).expect("Failed to encrypt()");

    assert_eq!(ct.len(), 16 + OVERHEAD);
}

#[test]
fn test_encrypt_rejects_short_key() {
    let result = encrypt(b"data", &[0u8; 16]);

    assert_eq!(result, Err(CryptoError::InvalidKeyLength));
}

#[test]
fn test_encrypt_rejects_long_key() {
    let result = encrypt(b"data", &[0u8; 64]);

    assert_eq!(result, Err(CryptoError::InvalidKeyLength));
}

#[test]
fn test_encrypt_same_plaintext_yields_distinct_ciphertexts() {
    let key = random_key();

    let a = encrypt(b"repeated message", &key).expect("Failed to encrypt()");
    let b = encrypt(b"repeated message", &key).expect("Failed to encrypt()");

    // Fresh random nonce per call
    assert_ne!(a, b);
}

// =============================================================================
// decrypt()
// =============================================================================

#[test]
fn test_decrypt_roundtrip() {
    let key = random_key();
    let ct = encrypt(b"yellow submarine", &key).expect("Failed to encrypt()");

    let mut out = [0u8; 16];
    let n = decrypt(&ct, &key, &mut out).expect("Failed to decrypt()");

    assert_eq!(n, 16);
    assert_eq!(&out, b"yellow submarine");
}

#[test]
fn test_decrypt_into_oversized_output() {
    let key = random_key();
    let ct = encrypt(b"short", &key).expect("Failed to encrypt()");

    let mut out = [0xFFu8; 64];
    let n = decrypt(&ct, &key, &mut out).expect("Failed to decrypt()");

    assert_eq!(n, 5);
    assert_eq!(&out[..5], b"short");
    // Bytes past n are untouched
    assert!(out[5..].iter().all(|&b| b == 0xFF));
}

#[test]
fn test_decrypt_rejects_undersized_output() {
    let key = random_key();
    let ct = encrypt(b"sixteen byte msg", &key).expect("Failed to encrypt()");

    let mut out = [0u8; 8];
    let result = decrypt(&ct, &key, &mut out);

    assert_eq!(result, Err(CryptoError::BufferTooSmall));
}

#[test]
fn test_decrypt_rejects_wrong_key() {
    let key = random_key();
    let other = random_key();
    let ct = encrypt(b"secret", &key).expect("Failed to encrypt()");

    let mut out = [0u8; 6];
    let result = decrypt(&ct, &other, &mut out);

    assert_eq!(result, Err(CryptoError::DecryptionFailed));
}

#[test]
fn test_decrypt_rejects_short_key() {
    let key = random_key();
    let ct = encrypt(b"secret", &key).expect("Failed to encrypt()");

    let mut out = [0u8; 6];
    let result = decrypt(&ct, &key[..16], &mut out);

    assert_eq!(result, Err(CryptoError::InvalidKeyLength));
}

#[test]
fn test_decrypt_rejects_truncated_ciphertext() {
    let key = random_key();
    let mut out = [0u8; 16];

    let result = decrypt(&[0u8; OVERHEAD - 1], &key, &mut out);

    assert_eq!(result, Err(CryptoError::DecryptionFailed));
}

#[test]
fn test_decrypt_rejects_flipped_bit() {
    let key = random_key();
    let mut ct = encrypt(b"integrity matters", &key).expect("Failed to encrypt()");

    let last = ct.len() - 1;
    ct[last] ^= 0x01;

    let mut out = [0u8; 17];
    let result = decrypt(&ct, &key, &mut out);

    assert_eq!(result, Err(CryptoError::DecryptionFailed));
}

#[test]
fn test_decrypt_rejects_flipped_nonce_bit() {
    let key = random_key();
    let mut ct = encrypt(b"integrity matters", &key).expect("Failed to encrypt()");

    ct[0] ^= 0x80;

    let mut out = [0u8; 17];
    let result = decrypt(&ct, &key, &mut out);

    assert_eq!(result, Err(CryptoError::DecryptionFailed));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_roundtrip_any_plaintext(plaintext in proptest::collection::vec(any::<u8>(), 1..512)) {
        let key = random_key();
        let ct = encrypt(&plaintext, &key).unwrap();

        prop_assert_eq!(ct.len(), plaintext.len() + OVERHEAD);

        let mut out = vec![0u8; plaintext.len()];
        let n = decrypt(&ct, &key, &mut out).unwrap();

        prop_assert_eq!(n, plaintext.len());
        prop_assert_eq!(out, plaintext);
    }

    #[test]
    fn prop_tampering_any_byte_fails(
        plaintext in proptest::collection::vec(any::<u8>(), 1..128),
        flip in any::<u8>(),
        pos_seed in any::<usize>(),
    ) {
        let key = random_key();
        let mut ct = encrypt(&plaintext, &key).unwrap();

        let pos = pos_seed % ct.len();
        let flip = if flip == 0 { 1 } else { flip };
        ct[pos] ^= flip;

        let mut out = vec![0u8; plaintext.len()];
        prop_assert_eq!(decrypt(&ct, &key, &mut out), Err(CryptoError::DecryptionFailed));
    }
}
