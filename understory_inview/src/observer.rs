// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount handle tying a visibility callback to an element's lifetime.

use alloc::rc::Rc;
use core::fmt;

use understory_signal::{Disposable, SignalError};

use crate::{ElementRect, InViewInfo, InViewOptions, ViewportSource, inview_signal};

/// An active visibility subscription for one element.
///
/// Created with [`InView::observe`] or [`InView::observe_bool`] when the
/// element is mounted. Dropping the handle (or calling [`InView::dispose`])
/// removes the window listeners and cancels any pending throttled check.
pub struct InView {
    subscription: Disposable,
}

impl InView {
    /// Start tracking `element` and call `callback` for every reported
    /// visibility change.
    ///
    /// If the element is already in view, `callback` runs before this returns.
    ///
    /// # Errors
    ///
    /// Returns the [`SignalError`] raised while registering window listeners.
    /// Nothing stays registered in that case.
    pub fn observe<V, El, F>(
        viewport: Rc<V>,
        element: Rc<El>,
        options: &InViewOptions,
        callback: F,
    ) -> Result<Self, SignalError>
    where
        V: ViewportSource + 'static,
        V::Event: Clone + 'static,
        El: ElementRect + ?Sized + 'static,
        F: Fn(&InViewInfo<V::Event>) + 'static,
    {
        let subscription =
            inview_signal(viewport, element, options).subscribe_fn(move |info| callback(&info))?;
        tracing::debug!(
            throttle = options.throttle,
            events = options.events.bits(),
            "element mounted"
        );
        Ok(Self { subscription })
    }

    /// Like [`InView::observe`], but the callback only receives the
    /// visibility flag.
    ///
    /// # Errors
    ///
    /// See [`InView::observe`].
    pub fn observe_bool<V, El>(
        viewport: Rc<V>,
        element: Rc<El>,
        options: &InViewOptions,
        callback: impl Fn(bool) + 'static,
    ) -> Result<Self, SignalError>
    where
        V: ViewportSource + 'static,
        V::Event: Clone + 'static,
        El: ElementRect + ?Sized + 'static,
    {
        Self::observe(viewport, element, options, move |info| {
            callback(info.in_view);
        })
    }

    /// Stop tracking. Safe to call more than once.
    pub fn dispose(&self) {
        if !self.subscription.is_disposed() {
            tracing::debug!("element unmounted");
        }
        self.subscription.dispose();
    }

    /// Whether [`InView::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.subscription.is_disposed()
    }
}

impl Drop for InView {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for InView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InView")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
