// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Signal`] type and its stateless and stateful combinators.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use core::mem;

use crate::{Disposable, SignalError};

/// Sink receiving the values of a [`Signal`].
pub type Subscriber<T> = Rc<dyn Fn(T)>;

type SubscribeFn<T> = dyn Fn(Subscriber<T>) -> Result<Disposable, SignalError>;

/// A cold, push-based stream of values.
///
/// A signal is only a recipe: nothing happens until [`subscribe`](Self::subscribe)
/// runs its subscription function. Every subscription builds an independent
/// delivery chain with its own operator state, so subscribing twice to a
/// [`scan`](Self::scan) yields two accumulators.
///
/// Operators never mutate the receiver; they return a new signal that holds a
/// cheap clone of its upstream.
pub struct Signal<T> {
    subscribe_fn: Rc<SubscribeFn<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: Rc::clone(&self.subscribe_fn),
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal").finish_non_exhaustive()
    }
}

impl<T: 'static> Signal<T> {
    /// Build a signal from a raw subscription function.
    ///
    /// The function receives the subscriber and returns the [`Disposable`] that
    /// releases whatever it set up. It may emit synchronously before returning.
    pub fn new(
        subscribe_fn: impl Fn(Subscriber<T>) -> Result<Disposable, SignalError> + 'static,
    ) -> Self {
        Self {
            subscribe_fn: Rc::new(subscribe_fn),
        }
    }

    /// A signal that never emits.
    pub fn never() -> Self {
        Self::new(|_| Ok(Disposable::noop()))
    }

    /// Start delivering values to `subscriber`.
    ///
    /// The chain is built synchronously; values arrive whenever the underlying
    /// source produces them, possibly before this call returns. Dispose the
    /// returned handle to tear the chain down.
    pub fn subscribe(&self, subscriber: Subscriber<T>) -> Result<Disposable, SignalError> {
        tracing::trace!("subscribing");
        (self.subscribe_fn)(subscriber)
    }

    /// [`subscribe`](Self::subscribe) with a plain closure.
    pub fn subscribe_fn(&self, f: impl Fn(T) + 'static) -> Result<Disposable, SignalError> {
        self.subscribe(Rc::new(f))
    }

    /// Emit `f(value)` for every value, one to one.
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> Signal<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Signal::new(move |subscriber: Subscriber<U>| {
            let f = Rc::clone(&f);
            source.subscribe(Rc::new(move |value: T| subscriber(f(value))))
        })
    }

    /// Emit only the values for which `predicate` holds.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Self::new(move |subscriber: Subscriber<T>| {
            let predicate = Rc::clone(&predicate);
            source.subscribe(Rc::new(move |value: T| {
                if predicate(&value) {
                    subscriber(value);
                }
            }))
        })
    }

    /// Emit the running fold of the values.
    ///
    /// Each subscription starts from its own clone of `initial`. For every value
    /// the accumulator is replaced by `reducer(&accumulator, value)` and the new
    /// accumulator is emitted.
    pub fn scan<A>(&self, initial: A, reducer: impl Fn(&A, T) -> A + 'static) -> Signal<A>
    where
        A: Clone + 'static,
    {
        let source = self.clone();
        let reducer = Rc::new(reducer);
        Signal::new(move |subscriber: Subscriber<A>| {
            let reducer = Rc::clone(&reducer);
            let accumulator = RefCell::new(initial.clone());
            source.subscribe(Rc::new(move |value: T| {
                let next = reducer(&accumulator.borrow(), value);
                *accumulator.borrow_mut() = next.clone();
                subscriber(next);
            }))
        })
    }

    /// Interleave the values of `self` and `other` by arrival.
    ///
    /// Equivalent to `merge([self.clone(), other.clone()])`.
    pub fn merge(&self, other: &Self) -> Self {
        merge([self.clone(), other.clone()])
    }
}

/// Forward every value of every input, interleaved by arrival.
///
/// Inputs are subscribed last to first; there is no coordination between them.
/// Disposing the merged subscription disposes every input subscription, see
/// [`Disposable::composite`]. If an input fails to subscribe, or the
/// subscriber panics while an input emits synchronously, the inputs already
/// subscribed are disposed before the error (or panic) propagates.
///
/// ```
/// use core::cell::RefCell;
/// use std::rc::Rc;
/// use understory_signal::{from_single_value, merge};
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let merged = merge([from_single_value(1), from_single_value(2)]);
/// let seen2 = Rc::clone(&seen);
/// let d = merged.subscribe_fn(move |v| seen2.borrow_mut().push(v)).unwrap();
/// d.dispose();
///
/// let mut values = seen.borrow().clone();
/// values.sort();
/// assert_eq!(values, vec![1, 2]);
/// ```
pub fn merge<T: 'static>(signals: impl IntoIterator<Item = Signal<T>>) -> Signal<T> {
    let signals: Vec<Signal<T>> = signals.into_iter().collect();
    Signal::new(move |subscriber: Subscriber<T>| {
        let mut pending = PendingInputs(Vec::with_capacity(signals.len()));
        for signal in signals.iter().rev() {
            pending.0.push(signal.subscribe(Rc::clone(&subscriber))?);
        }
        Ok(Disposable::composite(mem::take(&mut pending.0)))
    })
}

/// Inputs subscribed so far by a merge in progress.
///
/// Released on drop, so an input that fails to subscribe, or a subscriber that
/// panics during a synchronous emission, leaves nothing registered.
struct PendingInputs(Vec<Disposable>);

impl Drop for PendingInputs {
    fn drop(&mut self) {
        if !self.0.is_empty() {
            tracing::trace!(inputs = self.0.len(), "rolling back merge");
            Disposable::composite(mem::take(&mut self.0)).dispose();
        }
    }
}
