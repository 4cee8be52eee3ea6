// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for buffers, coffers and enclaves.

use parapet_alloc::AllocError;
use parapet_crypto::CryptoError;
use thiserror::Error;

/// Errors returned by [`Buffer`](crate::Buffer), [`Coffer`](crate::Coffer)
/// and [`Enclave`](crate::Enclave) operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A zero-length buffer was requested.
    #[error("buffers must hold at least one byte")]
    NullBuffer,

    /// A zero-length payload was sealed.
    #[error("enclaves must hold at least one byte")]
    NullEnclave,

    /// The buffer was destroyed before the operation ran.
    #[error("buffer has been destroyed")]
    BufferExpired,

    /// The coffer was destroyed before the operation ran.
    #[error("coffer has been destroyed")]
    CofferExpired,

    /// The underlying allocator failed or detected tampering.
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// Sealing or opening an enclave failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
