// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit disposal handles returned from [`Signal::subscribe`](crate::Signal::subscribe).
//!
//! A [`Disposable`] owns a single release hook. Every operator wraps its
//! upstream disposable into its own hook, so disposing the outermost handle
//! tears down the whole chain, synchronously and in one call.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_signal::Disposable;
//!
//! let released = Rc::new(Cell::new(0));
//! let d = Disposable::new({
//!     let released = Rc::clone(&released);
//!     move || released.set(released.get() + 1)
//! });
//!
//! let alias = d.clone();
//! d.dispose();
//! alias.dispose();
//! assert_eq!(released.get(), 1);
//! assert!(alias.is_disposed());
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

type Hook = Box<dyn FnOnce()>;

/// Handle that releases the resources of one subscription.
///
/// Clones share the same hook. The hook runs at most once: it is taken out of
/// the handle before it is called, so re-entrant or repeated calls to
/// [`dispose`](Self::dispose) are no-ops.
#[derive(Clone)]
pub struct Disposable {
    hook: Rc<RefCell<Option<Hook>>>,
}

impl Disposable {
    /// Create a disposable that runs `release` on first disposal.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            hook: Rc::new(RefCell::new(Some(Box::new(release)))),
        }
    }

    /// A disposable with nothing to release.
    pub fn noop() -> Self {
        Self {
            hook: Rc::new(RefCell::new(None)),
        }
    }

    /// Combine several disposables into one.
    ///
    /// Children are released in reverse order. Every child is attempted even
    /// if an earlier one was already disposed. With the `std` feature a child
    /// whose hook panics does not stop the remaining releases; the first panic
    /// is resumed once all children have been visited.
    pub fn composite(children: impl IntoIterator<Item = Self>) -> Self {
        let children: Vec<Self> = children.into_iter().collect();
        Self::new(move || dispose_all(&children))
    }

    /// Run the release hook if it has not run yet.
    pub fn dispose(&self) {
        // The borrow must end before the hook runs: hooks may dispose aliases.
        let hook = self.hook.borrow_mut().take();
        if let Some(hook) = hook {
            tracing::trace!("disposing subscription");
            hook();
        }
    }

    /// Returns `true` once the hook has run, or if there never was one.
    pub fn is_disposed(&self) -> bool {
        self.hook.borrow().is_none()
    }
}

impl Default for Disposable {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(feature = "std")]
fn dispose_all(children: &[Disposable]) {
    use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

    let mut first_panic = None;
    for child in children.iter().rev() {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| child.dispose())) {
            tracing::trace!("release hook panicked; continuing with siblings");
            first_panic.get_or_insert(payload);
        }
    }
    if let Some(payload) = first_panic {
        resume_unwind(payload);
    }
}

#[cfg(not(feature = "std"))]
fn dispose_all(children: &[Disposable]) {
    for child in children.iter().rev() {
        child.dispose();
    }
}
