// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! XChaCha20-Poly1305 AEAD with a random nonce prepended to the ciphertext.
//!
//! Wire layout: `nonce (24) ‖ body ‖ tag (16)`, so every ciphertext is
//! exactly `plaintext + OVERHEAD` bytes. The nonce is drawn fresh per call;
//! with a 192-bit nonce, random generation is collision-safe.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use zeroize::Zeroizing;

use crate::ct::ct_copy;
use crate::error::CryptoError;
use crate::rng::scramble;
use crate::{KEY_SIZE, NONCE_SIZE, OVERHEAD};

/// Encrypts `plaintext` under `key`, returning `nonce ‖ ciphertext ‖ tag`.
///
/// The result is `|plaintext| + OVERHEAD` bytes.
///
/// # Errors
///
/// [`CryptoError::InvalidKeyLength`] unless `|key| == 32`.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if key.len() != KEY_SIZE {
        return Err(CryptoError::InvalidKeyLength);
    }

    let mut nonce = [0u8; NONCE_SIZE];
    scramble(&mut nonce);

    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    let body = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut out = Vec::with_capacity(plaintext.len() + OVERHEAD);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&body);

    Ok(out)
}

/// Decrypts `ciphertext` (as produced by [`encrypt`]) into `out`.
///
/// Writes the plaintext into `out[..n]` and returns `n`, where
/// `n = |ciphertext| - OVERHEAD`. Intermediate plaintext copies are wiped
/// before returning on every path.
///
/// # Errors
///
/// - [`CryptoError::InvalidKeyLength`] unless `|key| == 32`
/// - [`CryptoError::BufferTooSmall`] if `|out| < n`
/// - [`CryptoError::DecryptionFailed`] on truncated or tampered input, or a
///   key other than the one that sealed it
pub fn decrypt(ciphertext: &[u8], key: &[u8], out: &mut [u8]) -> Result<usize, CryptoError> {
    if key.len() != KEY_SIZE {
        return Err(CryptoError::InvalidKeyLength);
    }

    if ciphertext.len() < OVERHEAD {
        return Err(CryptoError::DecryptionFailed);
    }

    let n = ciphertext.len() - OVERHEAD;
    if out.len() < n {
        return Err(CryptoError::BufferTooSmall);
    }

    let (nonce, body) = ciphertext.split_at(NONCE_SIZE);

    let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(XNonce::from_slice(nonce), body)
            .map_err(|_| CryptoError::DecryptionFailed)?,
    );

    ct_copy(&mut out[..n], &plaintext);

    Ok(n)
}
