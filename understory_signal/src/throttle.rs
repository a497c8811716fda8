// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trailing-edge throttling.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;

use crate::{Disposable, Scheduler, Signal, Subscriber, TimerId};

/// Per-subscription throttle bookkeeping.
#[derive(Default)]
struct ThrottleState {
    /// Arrival time of the most recently forwarded value.
    last: Cell<Option<u64>>,
    /// Timer that will forward the newest suppressed value.
    pending: Cell<Option<TimerId>>,
}

impl<T: 'static> Signal<T> {
    /// Rate-limit the signal to roughly one value per `interval_ms`.
    ///
    /// The first value is forwarded immediately. A value arriving less than
    /// `interval_ms` after the last forwarded one cancels any pending timer and
    /// schedules itself to be forwarded `interval_ms` later, so a burst is
    /// coalesced into its first and its last value. A value forwarded
    /// immediately drops any still-pending older value, so delivery order always
    /// matches arrival order. Disposal cancels the pending timer.
    ///
    /// ```
    /// use core::cell::{Cell, RefCell};
    /// use std::collections::BTreeMap;
    /// use std::rc::Rc;
    /// use understory_signal::{Disposable, Scheduler, Signal, Subscriber, TimerId};
    ///
    /// #[derive(Default)]
    /// struct Clock {
    ///     now: Cell<u64>,
    ///     next: Cell<u64>,
    ///     timers: RefCell<BTreeMap<TimerId, (u64, Box<dyn FnOnce()>)>>,
    /// }
    ///
    /// impl Scheduler for Clock {
    ///     fn now(&self) -> u64 { self.now.get() }
    ///     fn set_timeout(&self, delay: u64, cb: Box<dyn FnOnce()>) -> TimerId {
    ///         let id = TimerId::new(self.next.get());
    ///         self.next.set(id.get() + 1);
    ///         self.timers.borrow_mut().insert(id, (self.now.get() + delay, cb));
    ///         id
    ///     }
    ///     fn clear_timeout(&self, id: TimerId) { self.timers.borrow_mut().remove(&id); }
    /// }
    ///
    /// let clock = Rc::new(Clock::default());
    /// let sink: Rc<RefCell<Option<Subscriber<u32>>>> = Rc::new(RefCell::new(None));
    /// let source = Signal::new({
    ///     let sink = Rc::clone(&sink);
    ///     move |s| { *sink.borrow_mut() = Some(s); Ok(Disposable::noop()) }
    /// });
    ///
    /// let seen = Rc::new(RefCell::new(Vec::new()));
    /// let _d = source
    ///     .throttle(100, Rc::clone(&clock))
    ///     .subscribe_fn({ let seen = Rc::clone(&seen); move |v| seen.borrow_mut().push(v) })
    ///     .unwrap();
    ///
    /// let emit = sink.borrow().clone().unwrap();
    /// for v in 1..=4 {
    ///     emit(v);
    ///     clock.now.set(clock.now.get() + 10);
    /// }
    /// assert_eq!(*seen.borrow(), vec![1]);
    ///
    /// // Only the last suppressed value is still scheduled.
    /// let (_, (_, fire)) = clock.timers.borrow_mut().pop_first().unwrap();
    /// fire();
    /// assert_eq!(*seen.borrow(), vec![1, 4]);
    /// ```
    pub fn throttle<S>(&self, interval_ms: u64, scheduler: Rc<S>) -> Self
    where
        S: Scheduler + ?Sized + 'static,
    {
        let source = self.clone();
        Self::new(move |subscriber: Subscriber<T>| {
            let state = Rc::new(ThrottleState::default());
            let upstream = source.subscribe({
                let state = Rc::clone(&state);
                let scheduler = Rc::clone(&scheduler);
                Rc::new(move |value: T| {
                    let now = scheduler.now();
                    match state.last.get() {
                        Some(last) if now < last.saturating_add(interval_ms) => {
                            if let Some(timer) = state.pending.take() {
                                scheduler.clear_timeout(timer);
                            }
                            let timer = scheduler.set_timeout(
                                interval_ms,
                                Box::new({
                                    let state = Rc::clone(&state);
                                    let subscriber = Rc::clone(&subscriber);
                                    move || {
                                        state.pending.set(None);
                                        state.last.set(Some(now));
                                        subscriber(value);
                                    }
                                }),
                            );
                            tracing::debug!(
                                timer = timer.get(),
                                interval_ms,
                                "throttled value scheduled"
                            );
                            state.pending.set(Some(timer));
                        }
                        _ => {
                            // A newer value supersedes any suppressed one.
                            if let Some(timer) = state.pending.take() {
                                scheduler.clear_timeout(timer);
                            }
                            state.last.set(Some(now));
                            subscriber(value);
                        }
                    }
                })
            })?;

            let scheduler = Rc::clone(&scheduler);
            Ok(Disposable::new(move || {
                if let Some(timer) = state.pending.take() {
                    tracing::trace!(timer = timer.get(), "cancelling throttled value");
                    scheduler.clear_timeout(timer);
                }
                upstream.dispose();
            }))
        })
    }
}
