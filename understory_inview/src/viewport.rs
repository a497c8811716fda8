// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capabilities the host platform provides: the window and the tracked element.

use kurbo::{Rect, Size};
use understory_signal::{EventTarget, Scheduler};

/// Document rendering mode, as reported by `document.compatMode`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompatMode {
    /// Standards mode (`CSS1Compat`): the root element carries the viewport size.
    #[default]
    Standards,
    /// Quirks mode (`BackCompat`): the body carries the viewport size.
    Quirks,
}

/// The global window: geometry queries, event registration, and timers.
///
/// Events named `scroll` and `resize` (see [`WindowEvents`](crate::WindowEvents))
/// must be dispatched through the [`EventTarget`] half. Sizes are in the same
/// client coordinate space as [`ElementRect::bounding_client_rect`].
pub trait ViewportSource: EventTarget + Scheduler {
    /// `innerWidth` × `innerHeight`. A zero height means "unavailable".
    fn inner_size(&self) -> Size;

    /// Rendering mode used to pick the fallback size.
    fn compat_mode(&self) -> CompatMode;

    /// Client size of the root document element.
    fn document_element_client_size(&self) -> Size;

    /// Client size of the document body.
    fn body_client_size(&self) -> Size;
}

/// An element whose on-screen position can be queried.
pub trait ElementRect {
    /// Current bounding box in viewport-relative (client) coordinates.
    fn bounding_client_rect(&self) -> Rect;
}

/// A fixed rectangle.
impl ElementRect for Rect {
    fn bounding_client_rect(&self) -> Rect {
        *self
    }
}
