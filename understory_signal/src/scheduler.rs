// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clock and timer capability used by time-based operators.

use alloc::boxed::Box;

/// Handle for a pending timer created by [`Scheduler::set_timeout`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a platform-assigned timer handle.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The platform-assigned handle.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A single-threaded timer host, typically the browser window.
///
/// Callbacks run later, on the host's own turn, never from inside
/// [`set_timeout`](Self::set_timeout). Implementations must not hold internal
/// borrows while running a callback, since callbacks routinely schedule or
/// clear other timers.
pub trait Scheduler {
    /// Current time in milliseconds. Only differences are meaningful.
    fn now(&self) -> u64;

    /// Run `callback` once, `delay_ms` milliseconds from now.
    fn set_timeout(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a pending timer. Unknown or already-fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}
