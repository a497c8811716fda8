// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The visibility pipeline: window events in, visibility changes out.
//!
//! For one element, [`inview_signal`] builds:
//!
//! 1. a synthetic [`ViewportEvent::Initial`] "check now" event,
//! 2. merged with the window's `scroll`/`resize` events,
//! 3. optionally throttled,
//! 4. mapped to `in_view = intersects(element, viewport)`,
//! 5. scanned through [`VisibilityState::transition`], which also yields
//!    `changed`,
//! 6. filtered down to reported transitions.
//!
//! Reporting follows this state machine, starting from
//! [`VisibilityState::Unknown`]:
//!
//! | from        | to          | reported |
//! |-------------|-------------|----------|
//! | `Unknown`   | `InView`    | yes      |
//! | `Unknown`   | `NotInView` | no       |
//! | `InView`    | `NotInView` | yes      |
//! | `NotInView` | `InView`    | yes      |
//! | same        | same        | no       |
//!
//! The `Unknown → NotInView` row is what keeps an element that starts off
//! screen from firing a spurious "not visible" on mount.

use alloc::rc::Rc;

use understory_signal::{Signal, from_event_target, from_single_value};

use crate::{ElementRect, InViewOptions, ViewportSource, intersects, viewport_rect};

/// An event that triggered a visibility check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewportEvent<E> {
    /// Synthetic check performed when tracking starts.
    Initial,
    /// A window event (`scroll`, `resize`) as delivered by the platform.
    Native(E),
}

impl<E> ViewportEvent<E> {
    /// Returns `true` for the synthetic initial check.
    pub const fn is_initial(&self) -> bool {
        matches!(self, Self::Initial)
    }
}

/// Snapshot produced for each reported visibility change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InViewInfo<E> {
    /// Whether the element intersects the viewport.
    pub in_view: bool,
    /// Whether `in_view` differs from the previous check of this subscription.
    /// The first check of a subscription always counts as changed.
    pub changed: bool,
    /// The event that triggered the check.
    pub event: ViewportEvent<E>,
}

/// Last known visibility of a tracked element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VisibilityState {
    /// Not checked yet.
    #[default]
    Unknown,
    /// Intersecting the viewport.
    InView,
    /// Outside the viewport.
    NotInView,
}

impl VisibilityState {
    /// The state after a check that found `in_view`.
    pub const fn from_in_view(in_view: bool) -> Self {
        if in_view { Self::InView } else { Self::NotInView }
    }

    /// The previous `in_view` value, or `None` before the first check.
    pub const fn in_view(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::InView => Some(true),
            Self::NotInView => Some(false),
        }
    }

    /// Apply a check. Returns the next state and whether the transition is
    /// reported to the callback.
    ///
    /// ```
    /// use understory_inview::VisibilityState;
    ///
    /// let (s, reported) = VisibilityState::Unknown.transition(false);
    /// assert_eq!((s, reported), (VisibilityState::NotInView, false));
    /// let (s, reported) = s.transition(true);
    /// assert_eq!((s, reported), (VisibilityState::InView, true));
    /// ```
    pub const fn transition(self, in_view: bool) -> (Self, bool) {
        let next = Self::from_in_view(in_view);
        let reported = match self {
            Self::Unknown => in_view,
            Self::InView | Self::NotInView => !matches!(
                (self, next),
                (Self::InView, Self::InView) | (Self::NotInView, Self::NotInView)
            ),
        };
        (next, reported)
    }
}

/// Scan accumulator: the state after this check, the info it produced, and
/// whether the transition into that state is reported.
#[derive(Clone)]
struct Tracked<E> {
    state: VisibilityState,
    reported: bool,
    info: InViewInfo<E>,
}

/// Build the visibility signal for `element` inside `viewport`.
///
/// Each subscription checks once immediately, then on every configured window
/// event, and emits an [`InViewInfo`] only for transitions the
/// [`VisibilityState`] machine reports. Disposing the subscription removes the
/// window listeners and cancels any pending throttled check.
pub fn inview_signal<V, El>(
    viewport: Rc<V>,
    element: Rc<El>,
    options: &InViewOptions,
) -> Signal<InViewInfo<V::Event>>
where
    V: ViewportSource + 'static,
    V::Event: Clone + 'static,
    El: ElementRect + ?Sized + 'static,
{
    let native = from_event_target(Rc::clone(&viewport), &options.events.event_names())
        .map(ViewportEvent::Native);
    let mut events = from_single_value(ViewportEvent::Initial).merge(&native);
    if let Some(interval_ms) = options.throttle {
        events = events.throttle(interval_ms, Rc::clone(&viewport));
    }

    let checks = events.map(move |event| {
        let in_view = intersects(element.bounding_client_rect(), viewport_rect(&*viewport));
        InViewInfo {
            in_view,
            changed: false,
            event,
        }
    });

    let placeholder = Tracked {
        state: VisibilityState::Unknown,
        reported: false,
        info: InViewInfo {
            in_view: false,
            changed: false,
            event: ViewportEvent::Initial,
        },
    };

    checks
        .scan(placeholder, |prev: &Tracked<V::Event>, info| {
            let changed = prev.state.in_view() != Some(info.in_view);
            let (state, reported) = prev.state.transition(info.in_view);
            Tracked {
                state,
                reported,
                info: InViewInfo { changed, ..info },
            }
        })
        .filter(|tracked| tracked.reported)
        .map(|tracked| {
            tracing::debug!(in_view = tracked.info.in_view, "visibility changed");
            tracked.info
        })
}
