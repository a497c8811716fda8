// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while subscribing to a signal.

use alloc::string::{String, ToString};

/// Error returned from [`Signal::subscribe`](crate::Signal::subscribe).
///
/// Only resource acquisition can fail. Values flowing through a signal have no
/// error channel: a panic in a user callback unwinds straight through the
/// emitter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// An event source was given an empty (or all-whitespace) list of event names.
    #[error("no event names given")]
    NoEventNames,
    /// The event target refused to register a listener.
    #[error("failed to register listener for `{name}`: {reason}")]
    ListenerRegistration {
        /// Event name that was being registered.
        name: String,
        /// Platform-provided description of the failure.
        reason: String,
    },
}

impl SignalError {
    /// Convenience constructor for [`SignalError::ListenerRegistration`].
    pub fn registration(name: &str, reason: impl ToString) -> Self {
        Self::ListenerRegistration {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
