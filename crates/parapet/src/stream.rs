// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Stream - an in-memory FIFO of sealed chunks.
//!
//! Bytes written into a stream are split into chunks and sealed into
//! enclaves immediately, so buffered data sits encrypted under the session
//! key rather than in plaintext. Reads decrypt from the front; an unread
//! tail is re-sealed and pushed back, keeping at most one chunk of
//! plaintext live at a time.

use std::collections::VecDeque;

use parapet_core::{Buffer, Enclave};
use parapet_crypto::wipe;

/// Upper bound on the plaintext size of one sealed chunk.
const CHUNK_SIZE: usize = 4096;

/// A FIFO pipeline of encrypted chunks.
#[derive(Default)]
pub struct Stream {
    chunks: VecDeque<Enclave>,
}

impl Stream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seals `src` into the stream, wiping it afterwards.
    ///
    /// Never fails: a chunk that cannot be sealed is wiped and dropped
    /// rather than left in plaintext.
    pub fn write(&mut self, src: &mut [u8]) {
        for chunk in src.chunks_mut(CHUNK_SIZE) {
            match Enclave::new(chunk) {
                Ok(enclave) => self.chunks.push_back(enclave),
                Err(_) => wipe(chunk),
            }
        }
    }

    /// Reads up to `buf.len()` bytes from the front of the stream.
    ///
    /// A partially consumed chunk has its unread tail re-sealed to the
    /// front, so the next read continues where this one stopped. Returns
    /// the number of bytes copied into `buf`.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut filled = 0;

        while filled < buf.len() {
            let Some(enclave) = self.chunks.pop_front() else {
                break;
            };
            let Ok(buffer) = enclave.open() else {
                // Session key rotated; the rest of the stream is gone too
                break;
            };

            let (taken, tail) = buffer.open(|data| {
                let take = data.len().min(buf.len() - filled);

                buf[filled..filled + take].copy_from_slice(&data[..take]);

                if take < data.len() {
                    (take, Some(data[take..].to_vec()))
                } else {
                    (take, None)
                }
            });

            let _ = buffer.destroy();
            filled += taken;

            if let Some(mut tail) = tail {
                if let Ok(resealed) = Enclave::new(&mut tail) {
                    self.chunks.push_front(resealed);
                }

                break;
            }
        }

        filled
    }

    /// Pops and decrypts one whole chunk.
    ///
    /// Returns `None` when the stream is empty or the front chunk can no
    /// longer be decrypted.
    pub fn next(&mut self) -> Option<Buffer> {
        self.chunks.pop_front()?.open().ok()
    }

    /// Total plaintext bytes currently buffered.
    pub fn size(&self) -> usize {
        self.chunks.iter().map(Enclave::size).sum()
    }
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream")
            .field("chunks", &self.chunks.len())
            .field("size", &self.size())
            .finish()
    }
}
