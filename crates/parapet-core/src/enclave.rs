// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Enclave - an authenticated ciphertext under the session key.
//!
//! Enclaves are the at-rest form for secrets the process is not actively
//! using. Sealing encrypts and wipes the plaintext source; opening decrypts
//! into a fresh immutable [`Buffer`]. Rotating the session key with
//! [`purge`](crate::purge) makes every prior enclave permanently
//! undecryptable.

use parapet_crypto::{OVERHEAD, decrypt, encrypt, wipe};

use crate::buffer::Buffer;
use crate::error::CoreError;
use crate::sessionkey;

/// An immutable encrypted container.
///
/// Holds `nonce || body || tag`; the ciphertext itself needs no guarding and
/// lives on the ordinary heap.
#[derive(Clone)]
pub struct Enclave {
    ct: Vec<u8>,
}

impl Enclave {
    /// Seals `src` under the session key, wiping `src` afterwards.
    pub fn new(src: &mut [u8]) -> Result<Self, CoreError> {
        if src.is_empty() {
            return Err(CoreError::NullEnclave);
        }

        let key = sessionkey::view()?;
        let result = key.open(|k| encrypt(src, k));
        let _ = key.destroy();
        wipe(src);

        Ok(Self { ct: result? })
    }

    /// Seals a buffer's contents, consuming and destroying the buffer.
    pub fn seal(buffer: Buffer) -> Result<Self, CoreError> {
        if !buffer.is_alive() {
            return Err(CoreError::BufferExpired);
        }

        buffer.melt()?;

        let enclave = buffer.open_mut(Self::new)?;

        buffer.destroy()?;

        Ok(enclave)
    }

    /// Decrypts the enclave into a fresh immutable [`Buffer`].
    ///
    /// Fails with [`CryptoError::DecryptionFailed`] if the session key has
    /// rotated since sealing or the ciphertext was tampered with.
    ///
    /// [`CryptoError::DecryptionFailed`]: parapet_crypto::CryptoError::DecryptionFailed
    pub fn open(&self) -> Result<Buffer, CoreError> {
        let buffer = Buffer::new(self.size())?;
        let key = sessionkey::view()?;
        let result = key.open(|k| buffer.open_mut(|out| decrypt(&self.ct, k, out)));
        let _ = key.destroy();

        match result {
            Ok(_) => {
                buffer.freeze()?;
                Ok(buffer)
            }
            Err(err) => {
                let _ = buffer.destroy();
                Err(err.into())
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn from_ciphertext(ct: Vec<u8>) -> Self {
        Self { ct }
    }

    /// The raw ciphertext, including nonce and tag.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ct
    }

    /// Plaintext length in bytes.
    pub fn size(&self) -> usize {
        self.ct.len() - OVERHEAD
    }
}

impl std::fmt::Debug for Enclave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enclave")
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}
