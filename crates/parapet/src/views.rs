// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Typed little-endian views over buffers.
//!
//! Bounds-checked reads and writes of fixed-width integers at arbitrary
//! offsets. Reads return `None` and writes are silent no-ops when the buffer
//! is destroyed, frozen (writes only), or too small for the access; a stale
//! handle can never fault.
//!
//! Values read out of a buffer live on the caller's stack; wipe them once
//! used if they are themselves secret.

use parapet_core::Buffer;
use parapet_crypto::wipe;

/// Little-endian integer access into a [`Buffer`].
pub trait TypedView {
    /// Reads `N` bytes at `offset`.
    fn read_array<const N: usize>(&self, offset: usize) -> Option<[u8; N]>;

    /// Writes `bytes` at `offset` if the buffer is writable and large enough.
    fn write_array<const N: usize>(&self, offset: usize, bytes: [u8; N]);

    /// Reads a `u16` stored little-endian at `offset`.
    fn read_u16_le(&self, offset: usize) -> Option<u16> {
        self.read_array(offset).map(u16::from_le_bytes)
    }

    /// Reads a `u32` stored little-endian at `offset`.
    fn read_u32_le(&self, offset: usize) -> Option<u32> {
        self.read_array(offset).map(u32::from_le_bytes)
    }

    /// Reads a `u64` stored little-endian at `offset`.
    fn read_u64_le(&self, offset: usize) -> Option<u64> {
        self.read_array(offset).map(u64::from_le_bytes)
    }

    /// Writes `value` little-endian at `offset`.
    fn write_u16_le(&self, offset: usize, value: u16) {
        self.write_array(offset, value.to_le_bytes());
    }

    /// Writes `value` little-endian at `offset`.
    fn write_u32_le(&self, offset: usize, value: u32) {
        self.write_array(offset, value.to_le_bytes());
    }

    /// Writes `value` little-endian at `offset`.
    fn write_u64_le(&self, offset: usize, value: u64) {
        self.write_array(offset, value.to_le_bytes());
    }
}

impl TypedView for Buffer {
    fn read_array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        self.open(|data| {
            let end = offset.checked_add(N)?;
            let bytes = data.get(offset..end)?;
            let mut out = [0u8; N];

            out.copy_from_slice(bytes);
            Some(out)
        })
    }

    fn write_array<const N: usize>(&self, offset: usize, mut bytes: [u8; N]) {
        self.open_mut(|data| {
            if let Some(end) = offset.checked_add(N)
                && let Some(dst) = data.get_mut(offset..end)
            {
                dst.copy_from_slice(&bytes);
            }
        });

        wipe(&mut bytes);
    }
}
