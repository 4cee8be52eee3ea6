// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! parapet_core - Protected buffers, the rotating session key, and enclaves.
//!
//! # Buffer
//!
//! [`Buffer`] wraps one guarded allocation with a mutability state machine:
//! created mutable, frozen read-only with [`Buffer::freeze`], thawed with
//! [`Buffer::melt`], and terminally wiped with [`Buffer::destroy`]. Dropping
//! the last handle destroys the buffer; explicit destroy is idempotent.
//!
//! # Coffer and the session key
//!
//! [`Coffer`] holds a 32-byte value as two halves with the invariant
//! `value = hash(right) XOR left`, so neither half alone reveals it. A
//! background thread re-derives both halves at a fixed interval without
//! changing the value. The process-global session key is a Coffer consumed
//! by [`Enclave`].
//!
//! # Enclave
//!
//! [`Enclave`] is an immutable authenticated ciphertext of a payload under
//! the session key: long-lived secrets sit encrypted, not in plaintext.
//! [`purge`] rotates the session key, which permanently invalidates every
//! enclave sealed before it.
//!
//! # Lifecycle
//!
//! All live buffers sit in a process-global registry. [`purge`] wipes them
//! all and installs a fresh session key; [`exit`] does so and terminates;
//! [`panic_with`] purges before propagating. [`catch_signal`] wires a
//! termination-signal handler into the same teardown.

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod buffer;
mod coffer;
mod enclave;
mod error;
mod lifecycle;
mod registry;
mod sessionkey;

#[cfg(unix)]
mod signals;

pub use buffer::Buffer;
pub use coffer::{Coffer, DEFAULT_REKEY_INTERVAL, MIN_REKEY_INTERVAL};
pub use enclave::Enclave;
pub use error::CoreError;
pub use lifecycle::{exit, panic_with, purge};
pub use registry::live_buffers;
pub use sessionkey::KEY_LEN;

#[cfg(unix)]
pub use signals::catch_signal;
