// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Termination-signal interception with purge-before-exit semantics.
//!
//! The signal handler itself only writes one byte into a self-pipe; the
//! watcher thread does the real work outside async-signal context, running
//! the user handler and then [`exit(0)`](crate::exit), which purges every
//! live secret before the process dies.

use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Once, OnceLock};
use std::thread;

type Handler = Box<dyn FnMut(i32) + Send>;

static PIPE_WRITE_FD: AtomicI32 = AtomicI32::new(-1);
static HANDLER: OnceLock<Mutex<Option<Handler>>> = OnceLock::new();
static INSTALL: Once = Once::new();

/// Registers `handler` to run when SIGINT or SIGTERM arrives.
///
/// After the handler returns, the process purges all secrets and exits with
/// status 0. Calling again replaces the handler; the signal plumbing is
/// installed once.
pub fn catch_signal(handler: impl FnMut(i32) + Send + 'static) -> io::Result<()> {
    let slot = HANDLER.get_or_init(|| Mutex::new(None));

    match slot.lock() {
        Ok(mut guard) => *guard = Some(Box::new(handler)),
        Err(poisoned) => *poisoned.into_inner() = Some(Box::new(handler)),
    }

    let mut outcome = Ok(());

    INSTALL.call_once(|| outcome = install());
    outcome
}

fn install() -> io::Result<()> {
    let mut fds = [0i32; 2];

    if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }

    let [read_fd, write_fd] = fds;

    PIPE_WRITE_FD.store(write_fd, Ordering::SeqCst);

    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();

        action.sa_sigaction = forward_signal as usize;
        action.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut action.sa_mask);

        for signal in [libc::SIGINT, libc::SIGTERM] {
            if libc::sigaction(signal, &action, std::ptr::null_mut()) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
    }

    thread::spawn(move || watch(read_fd));

    Ok(())
}

// Async-signal-safe: a single write(2) on the self-pipe, nothing else.
extern "C" fn forward_signal(signal: libc::c_int) {
    let fd = PIPE_WRITE_FD.load(Ordering::SeqCst);

    if fd >= 0 {
        let byte = signal as u8;

        unsafe { libc::write(fd, (&raw const byte).cast(), 1) };
    }
}

fn watch(read_fd: i32) {
    loop {
        let mut byte = 0u8;
        let n = unsafe { libc::read(read_fd, (&raw mut byte).cast(), 1) };

        if n != 1 {
            if n < 0 && io::Error::last_os_error().kind() == io::ErrorKind::Interrupted {
                continue;
            }

            return;
        }

        if let Some(slot) = HANDLER.get() {
            let mut guard = match slot.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };

            if let Some(handler) = guard.as_mut() {
                handler(i32::from(byte));
            }
        }

        crate::lifecycle::exit(0);
    }
}
