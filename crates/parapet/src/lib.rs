// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! parapet - Guarded memory for secrets.
//!
//! Keeps sensitive bytes in page-guarded, canary-backed, mlocked
//! allocations, encrypts them at rest under a rotating split session key,
//! and tears everything down on purge, exit, panic or termination signal.
//!
//! ```no_run
//! use parapet::{Buffer, Enclave};
//!
//! # fn main() -> Result<(), parapet::CoreError> {
//! let mut password = *b"hunter2!";
//!
//! // Seal wipes the source; the plaintext now only exists encrypted.
//! let enclave = Enclave::new(&mut password)?;
//!
//! // Decrypt into a frozen guarded buffer when needed.
//! let buffer = enclave.open()?;
//! buffer.open(|data| {
//!     // use the secret
//!     assert_eq!(data, b"hunter2!");
//! });
//! buffer.destroy()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

#[cfg(test)]
mod tests;

mod stream;
mod views;

pub use parapet_alloc::{AllocError, Allocator, default_allocator};
pub use parapet_core::{
    Buffer, Coffer, CoreError, DEFAULT_REKEY_INTERVAL, Enclave, KEY_LEN,
    MIN_REKEY_INTERVAL, exit, live_buffers, panic_with, purge,
};
pub use parapet_crypto::CryptoError;
pub use stream::Stream;
pub use views::TypedView;

#[cfg(unix)]
pub use parapet_core::catch_signal;
