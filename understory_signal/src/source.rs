// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signal sources: a single synchronous value, or the events of a target.

use alloc::rc::Rc;
use alloc::string::String;
use core::cell::Cell;

use smallvec::SmallVec;

use crate::{Disposable, Signal, SignalError};

/// Handle for a listener registered with [`EventTarget::add_listener`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a platform-assigned listener handle.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The platform-assigned handle.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Shared callback invoked by an [`EventTarget`] for each event.
pub type Listener<E> = Rc<dyn Fn(&E)>;

/// Something that dispatches named events to registered listeners.
///
/// This is the seam to the host platform: a browser window, a document, or a
/// headless stand-in. Targets are shared between independent subscriptions;
/// each registration must be removable on its own without disturbing others.
pub trait EventTarget {
    /// Event payload handed to listeners.
    type Event;

    /// Register `listener` for events named `name`.
    fn add_listener(
        &self,
        name: &str,
        listener: Listener<Self::Event>,
    ) -> Result<ListenerId, SignalError>;

    /// Remove a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// A signal that emits `value` once, synchronously, to every subscriber.
///
/// There is no completion notification: after the value the signal is simply
/// silent. Disposal has nothing to release.
///
/// ```
/// use core::cell::RefCell;
/// use std::rc::Rc;
/// use understory_signal::from_single_value;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let signal = from_single_value(7);
/// for _ in 0..2 {
///     let seen = Rc::clone(&seen);
///     signal.subscribe_fn(move |v| seen.borrow_mut().push(v)).unwrap();
/// }
/// assert_eq!(*seen.borrow(), vec![7, 7]);
/// ```
pub fn from_single_value<T: Clone + 'static>(value: T) -> Signal<T> {
    Signal::new(move |subscriber| {
        subscriber(value.clone());
        Ok(Disposable::noop())
    })
}

/// A signal of the raw events `target` fires for any of `names`.
///
/// `names` is a whitespace-separated list (`"scroll resize"`); every name is
/// registered as its own listener. Each subscription owns its registrations and
/// removes all of them on disposal. After disposal no further events are
/// forwarded, even if the target is mid-dispatch.
///
/// Subscribing fails with [`SignalError::NoEventNames`] when `names` is blank,
/// and with the target's error when a registration is refused. In the latter
/// case the registrations made so far are removed before the error is returned.
pub fn from_event_target<T>(target: Rc<T>, names: &str) -> Signal<T::Event>
where
    T: EventTarget + ?Sized + 'static,
    T::Event: Clone + 'static,
{
    let names: SmallVec<[String; 2]> = names.split_whitespace().map(String::from).collect();
    Signal::new(move |subscriber| {
        if names.is_empty() {
            return Err(SignalError::NoEventNames);
        }

        let live = Rc::new(Cell::new(true));
        let listener: Listener<T::Event> = {
            let live = Rc::clone(&live);
            Rc::new(move |event: &T::Event| {
                if live.get() {
                    subscriber(event.clone());
                }
            })
        };

        let mut ids: SmallVec<[ListenerId; 2]> = SmallVec::new();
        for name in &names {
            match target.add_listener(name, Rc::clone(&listener)) {
                Ok(id) => {
                    tracing::trace!(event = %name, id = id.get(), "listener added");
                    ids.push(id);
                }
                Err(err) => {
                    tracing::warn!(event = %name, %err, "listener registration failed");
                    for id in ids {
                        target.remove_listener(id);
                    }
                    return Err(err);
                }
            }
        }

        let target = Rc::clone(&target);
        Ok(Disposable::new(move || {
            live.set(false);
            for id in ids {
                tracing::trace!(id = id.get(), "listener removed");
                target.remove_listener(id);
            }
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    /// Minimal target: a list of `(id, name, listener)` plus an optional name to refuse.
    #[derive(Default)]
    struct Target {
        listeners: RefCell<Vec<(ListenerId, String, Listener<u32>)>>,
        next: Cell<u64>,
        refuse: Option<&'static str>,
    }

    impl Target {
        fn fire(&self, name: &str, event: u32) {
            let matching: Vec<Listener<u32>> = self
                .listeners
                .borrow()
                .iter()
                .filter(|(_, n, _)| n == name)
                .map(|(_, _, l)| Rc::clone(l))
                .collect();
            for l in matching {
                l(&event);
            }
        }

        fn names(&self) -> Vec<String> {
            self.listeners
                .borrow()
                .iter()
                .map(|(_, n, _)| n.clone())
                .collect()
        }
    }

    impl EventTarget for Target {
        type Event = u32;

        fn add_listener(
            &self,
            name: &str,
            listener: Listener<u32>,
        ) -> Result<ListenerId, SignalError> {
            if self.refuse == Some(name) {
                return Err(SignalError::registration(name, "refused"));
            }
            let id = ListenerId::new(self.next.get());
            self.next.set(self.next.get() + 1);
            self.listeners
                .borrow_mut()
                .push((id, name.to_string(), listener));
            Ok(id)
        }

        fn remove_listener(&self, id: ListenerId) {
            self.listeners.borrow_mut().retain(|(i, _, _)| *i != id);
        }
    }

    fn collect(signal: &Signal<u32>) -> (Rc<RefCell<Vec<u32>>>, Disposable) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let d = signal
            .subscribe_fn({
                let seen = Rc::clone(&seen);
                move |v| seen.borrow_mut().push(v)
            })
            .unwrap();
        (seen, d)
    }

    #[test]
    fn each_name_is_registered_independently() {
        let target = Rc::new(Target::default());
        let signal = from_event_target(Rc::clone(&target), "  scroll   resize ");
        let (seen, d) = collect(&signal);
        assert_eq!(target.names(), vec!["scroll", "resize"]);

        target.fire("scroll", 1);
        target.fire("resize", 2);
        target.fire("click", 3);
        assert_eq!(*seen.borrow(), vec![1, 2]);

        d.dispose();
        assert!(target.names().is_empty());
        target.fire("scroll", 4);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn subscriptions_do_not_share_registrations() {
        let target = Rc::new(Target::default());
        let signal = from_event_target(Rc::clone(&target), "scroll");
        let (a, da) = collect(&signal);
        let (b, _db) = collect(&signal);
        assert_eq!(target.names().len(), 2);

        da.dispose();
        target.fire("scroll", 9);
        assert!(a.borrow().is_empty());
        assert_eq!(*b.borrow(), vec![9]);
        assert_eq!(target.names().len(), 1);
    }

    #[test]
    fn blank_names_are_rejected() {
        let target = Rc::new(Target::default());
        let err = from_event_target(target, " ")
            .subscribe_fn(|_| {})
            .unwrap_err();
        assert_eq!(err, SignalError::NoEventNames);
    }

    #[test]
    fn failed_registration_rolls_back() {
        let target = Rc::new(Target {
            refuse: Some("resize"),
            ..Target::default()
        });
        let err = from_event_target(Rc::clone(&target), "scroll resize")
            .subscribe_fn(|_| {})
            .unwrap_err();
        assert!(matches!(err, SignalError::ListenerRegistration { ref name, .. } if name == "resize"));
        assert!(target.names().is_empty());
    }

    #[test]
    fn disposal_during_dispatch_stops_delivery() {
        let target = Rc::new(Target::default());
        let signal = from_event_target(Rc::clone(&target), "scroll");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let slot: Rc<RefCell<Option<Disposable>>> = Rc::new(RefCell::new(None));

        // The first subscriber disposes the second one; the second is already in
        // the dispatch snapshot but must not see the event.
        let _first = signal
            .subscribe_fn({
                let slot = Rc::clone(&slot);
                move |_| {
                    if let Some(d) = slot.borrow().as_ref() {
                        d.dispose();
                    }
                }
            })
            .unwrap();
        let second = signal
            .subscribe_fn({
                let seen = Rc::clone(&seen);
                move |v| seen.borrow_mut().push(v)
            })
            .unwrap();
        *slot.borrow_mut() = Some(second);

        target.fire("scroll", 1);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn single_value_is_replayed_per_subscription() {
        let signal = from_single_value(5_u32);
        let (a, _) = collect(&signal);
        let (b, _) = collect(&signal);
        assert_eq!(*a.borrow(), vec![5]);
        assert_eq!(*b.borrow(), vec![5]);
    }
}
