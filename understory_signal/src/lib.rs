// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_signal --heading-base-level=0

//! Understory Signal: minimal push signals with explicit disposal.
//!
//! This crate provides a small, single-threaded reactive stream abstraction for
//! UI plumbing: turn a raw event source into a derived stream of the values a
//! widget actually cares about.
//!
//! - [`Signal`]: a cold stream. Nothing runs until [`Signal::subscribe`], and
//!   every subscription builds its own delivery chain.
//! - Operators: [`Signal::map`], [`Signal::filter`], [`Signal::scan`],
//!   [`Signal::merge`] / [`merge`], and [`Signal::throttle`].
//! - Sources: [`from_single_value`] and [`from_event_target`].
//! - [`Disposable`]: the handle returned from `subscribe`. Disposing it tears
//!   down the whole upstream chain (listeners, timers) exactly once.
//!
//! Platform access goes through two small capability traits so hosts (and
//! tests) inject their own implementations:
//!
//! - [`EventTarget`]: named event registration, e.g. a browser window.
//! - [`Scheduler`]: a clock plus one-shot timers, used by `throttle`.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::cell::RefCell;
//! use std::rc::Rc;
//! use understory_signal::from_single_value;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let signal = from_single_value(3)
//!     .merge(&from_single_value(4))
//!     .map(|v| v * 10)
//!     .filter(|v| *v > 30)
//!     .scan(0, |acc, v| acc + v);
//!
//! let sink = Rc::clone(&seen);
//! let subscription = signal.subscribe_fn(move |v| sink.borrow_mut().push(v)).unwrap();
//! assert_eq!(*seen.borrow(), vec![40]);
//! subscription.dispose();
//! ```
//!
//! ## Errors and panics
//!
//! Subscribing returns a `Result`: acquiring resources (registering listeners)
//! can fail with a [`SignalError`], and the error is propagated through every
//! operator. Values have no error channel. A panic inside a user callback
//! unwinds synchronously through the emitter and aborts that delivery.
//!
//! ## Threading
//!
//! Signals are `Rc`-based and deliver synchronously on the emitting turn.
//! There is no backpressure, replay, or cross-thread delivery.
//!
//! ## Features
//!
//! - `std` *(default)*: a panicking release hook inside a composite
//!   disposable (such as a merge) no longer prevents its siblings from being
//!   released.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod disposable;
mod error;
mod scheduler;
mod signal;
mod source;
mod throttle;

pub use disposable::Disposable;
pub use error::SignalError;
pub use scheduler::{Scheduler, TimerId};
pub use signal::{Signal, Subscriber, merge};
pub use source::{EventTarget, Listener, ListenerId, from_event_target, from_single_value};
