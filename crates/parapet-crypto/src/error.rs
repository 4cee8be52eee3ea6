// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for parapet-crypto.

use thiserror::Error;

use crate::KEY_SIZE;

/// Errors from the crypto façade.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum CryptoError {
    /// The supplied key is not exactly [`KEY_SIZE`](crate::KEY_SIZE) bytes.
    #[error("invalid key length: expected {KEY_SIZE} bytes")]
    InvalidKeyLength,

    /// The decrypt target cannot hold the plaintext.
    #[error("output buffer too small for plaintext")]
    BufferTooSmall,

    /// AEAD sealing failed.
    #[error("encryption failed")]
    EncryptionFailed,

    /// AEAD authentication failed: wrong key, rotated session key, or
    /// tampered ciphertext.
    #[error("decryption failed: authentication error")]
    DecryptionFailed,
}
