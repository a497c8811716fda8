// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_inview --heading-base-level=0

//! Understory In-View: report when an element enters or leaves the viewport.
//!
//! This crate answers one question for a UI element: is it visible in the
//! window right now, and did that just change? It builds on
//! [`understory_signal`] and is host-agnostic. The window and the element are
//! reached through two capability traits:
//!
//! - [`ViewportSource`]: window size, compat mode fallbacks, `scroll`/`resize`
//!   event registration, and timers.
//! - [`ElementRect`]: the element's bounding box in client coordinates.
//!
//! Visibility is a rectangle test ([`intersects`]) between the element box and
//! [`viewport_rect`], re-evaluated once at mount and then on every configured
//! window event. Only transitions are reported (see [`VisibilityState`]):
//!
//! - an element in view at mount reports `true` once,
//! - an element off screen at mount reports nothing until it scrolls in,
//! - after that, every flip between visible and hidden is reported once.
//!
//! Partial visibility (which edges are showing) is not computed.
//!
//! ## Entry points
//!
//! - [`InView::observe`] / [`InView::observe_bool`]: mount-time helpers that
//!   return a handle; drop it on unmount.
//! - [`inview_signal`]: the underlying [`Signal`](understory_signal::Signal),
//!   for composing with other operators.
//! - [`InViewOptions`]: optional throttling and the set of window events.
//! - [`headless`]: an in-memory window and element for tests and hosts without
//!   a browser.
//!
//! ## Example
//!
//! ```rust
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::{Rect, Size};
//! use understory_inview::headless::{HeadlessElement, HeadlessViewport};
//! use understory_inview::{InView, InViewOptions};
//!
//! let window: Rc<HeadlessViewport> = Rc::new(HeadlessViewport::new(Size::new(800.0, 600.0)));
//! // Starts below the fold.
//! let element = Rc::new(HeadlessElement::new(Rect::new(0.0, 900.0, 200.0, 1000.0)));
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let handle = InView::observe_bool(
//!     Rc::clone(&window),
//!     Rc::clone(&element),
//!     &InViewOptions::default().with_throttle(50),
//!     {
//!         let seen = Rc::clone(&seen);
//!         move |in_view| seen.borrow_mut().push(in_view)
//!     },
//! )
//! .unwrap();
//! assert!(seen.borrow().is_empty());
//!
//! // Scroll the page by 500px.
//! element.offset_y(-500.0);
//! window.scroll(());
//! // Still inside the 50ms window opened by the mount-time check.
//! assert!(seen.borrow().is_empty());
//! window.advance(50);
//! assert_eq!(*seen.borrow(), vec![true]);
//!
//! drop(handle);
//! assert_eq!(window.listener_count(), 0);
//! assert_eq!(window.pending_timers(), 0);
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: enables `std` in `kurbo` and `understory_signal`.
//! - `libm`: floating point support for `kurbo` without `std`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod geometry;
pub mod headless;
mod observer;
mod options;
mod pipeline;
mod viewport;

pub use geometry::{intersects, viewport_rect};
pub use observer::InView;
pub use options::{InViewOptions, WindowEvents};
pub use pipeline::{InViewInfo, ViewportEvent, VisibilityState, inview_signal};
pub use viewport::{CompatMode, ElementRect, ViewportSource};

pub use understory_signal::SignalError;
