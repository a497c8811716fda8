// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element tracking options.

use alloc::string::String;

bitflags::bitflags! {
    /// Window events that trigger a visibility check.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct WindowEvents: u8 {
        /// The window (or document) scrolled.
        const SCROLL = 0b0000_0001;
        /// The window was resized.
        const RESIZE = 0b0000_0010;
    }
}

impl WindowEvents {
    const NAMES: [(Self, &'static str); 2] = [(Self::SCROLL, "scroll"), (Self::RESIZE, "resize")];

    /// The DOM event names for this set, space separated (`"scroll resize"`).
    pub fn event_names(self) -> String {
        let mut names = String::new();
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !names.is_empty() {
                    names.push(' ');
                }
                names.push_str(name);
            }
        }
        names
    }
}

impl Default for WindowEvents {
    fn default() -> Self {
        Self::SCROLL | Self::RESIZE
    }
}

/// Options for tracking one element.
///
/// ```
/// use understory_inview::{InViewOptions, WindowEvents};
///
/// let options = InViewOptions::default()
///     .with_throttle(100)
///     .with_events(WindowEvents::SCROLL);
/// assert_eq!(options.throttle, Some(100));
/// assert_eq!(options.events.event_names(), "scroll");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InViewOptions {
    /// Minimum spacing in milliseconds between visibility checks, or `None` to
    /// check on every event. Bursts are coalesced into their first and last
    /// event.
    pub throttle: Option<u64>,
    /// Window events that trigger a check. An empty set makes subscribing fail.
    pub events: WindowEvents,
}

impl InViewOptions {
    /// Throttle visibility checks to one per `interval_ms`.
    #[must_use]
    pub const fn with_throttle(mut self, interval_ms: u64) -> Self {
        self.throttle = Some(interval_ms);
        self
    }

    /// Replace the set of triggering window events.
    #[must_use]
    pub const fn with_events(mut self, events: WindowEvents) -> Self {
        self.events = events;
        self
    }
}
