// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! parapet_crypto - Crypto primitives for the Parapet stack.
//!
//! Provides the small set of operations the guarded containers consume:
//!
//! - [`scramble`]: CSPRNG fill from a seeded ChaCha generator
//! - [`wipe`]: zeroization the optimizer cannot elide
//! - [`ct_copy`] / [`ct_equal`]: constant-time copy and comparison
//! - [`hash`]: fixed 32-byte BLAKE3 digest
//! - [`encrypt`] / [`decrypt`]: XChaCha20-Poly1305 with a random nonce
//!   prepended to the ciphertext
//!
//! Key size is fixed at 32 bytes. Ciphertext overhead is always
//! [`OVERHEAD`] = nonce (24) + tag (16) bytes.

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod aead;
mod ct;
mod error;
mod hash;
mod rng;

pub use aead::{decrypt, encrypt};
pub use ct::{ct_copy, ct_equal, wipe};
pub use error::CryptoError;
pub use hash::hash;
pub use rng::scramble;

/// AEAD key size in bytes.
pub const KEY_SIZE: usize = 32;

/// Nonce size in bytes (extended nonce for XChaCha20).
pub const NONCE_SIZE: usize = 24;

/// Authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Fixed ciphertext expansion: prepended nonce plus appended tag.
pub const OVERHEAD: usize = NONCE_SIZE + TAG_SIZE;

/// Hash output size in bytes.
pub const HASH_SIZE: usize = 32;
