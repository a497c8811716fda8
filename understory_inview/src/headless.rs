// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory window and element for hosts without a browser, and for tests.
//!
//! [`HeadlessViewport`] implements [`ViewportSource`] with settable geometry,
//! a listener table, and a manual clock. Nothing happens on its own: call
//! [`dispatch`](HeadlessViewport::dispatch) (or [`scroll`](HeadlessViewport::scroll) /
//! [`resize`](HeadlessViewport::resize)) to fire events and
//! [`advance`](HeadlessViewport::advance) to let time pass.
//!
//! ```
//! use std::rc::Rc;
//! use kurbo::{Rect, Size};
//! use understory_inview::headless::{HeadlessElement, HeadlessViewport};
//! use understory_inview::{InView, InViewOptions};
//!
//! let window: Rc<HeadlessViewport> = Rc::new(HeadlessViewport::new(Size::new(800.0, 600.0)));
//! let element = Rc::new(HeadlessElement::new(Rect::new(0.0, 700.0, 100.0, 750.0)));
//!
//! let handle = InView::observe_bool(
//!     Rc::clone(&window),
//!     Rc::clone(&element),
//!     &InViewOptions::default(),
//!     |in_view| println!("in view: {in_view}"),
//! )
//! .unwrap();
//! assert_eq!(window.listener_count(), 2);
//!
//! element.set_rect(Rect::new(0.0, 500.0, 100.0, 550.0));
//! window.scroll(());
//!
//! drop(handle);
//! assert_eq!(window.listener_count(), 0);
//! ```

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use hashbrown::HashMap;
use kurbo::{Rect, Size};
use understory_signal::{EventTarget, Listener, ListenerId, Scheduler, SignalError, TimerId};

use crate::{CompatMode, ElementRect, ViewportSource};

type Callback = Box<dyn FnOnce()>;

/// A scriptable window.
pub struct HeadlessViewport<E = ()> {
    inner_size: Cell<Size>,
    compat_mode: Cell<CompatMode>,
    document_element_size: Cell<Size>,
    body_size: Cell<Size>,
    listeners: RefCell<HashMap<ListenerId, (String, Listener<E>)>>,
    next_listener: Cell<u64>,
    refused: RefCell<Option<String>>,
    now: Cell<u64>,
    /// Pending timers ordered by `(deadline, id)`.
    timers: RefCell<BTreeMap<(u64, TimerId), Callback>>,
    deadlines: RefCell<HashMap<TimerId, u64>>,
    next_timer: Cell<u64>,
}

impl<E> HeadlessViewport<E> {
    /// A standards-mode window with the given inner size and an empty document.
    pub fn new(inner_size: Size) -> Self {
        Self {
            inner_size: Cell::new(inner_size),
            compat_mode: Cell::new(CompatMode::Standards),
            document_element_size: Cell::new(Size::ZERO),
            body_size: Cell::new(Size::ZERO),
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(1),
            refused: RefCell::new(None),
            now: Cell::new(0),
            timers: RefCell::new(BTreeMap::new()),
            deadlines: RefCell::new(HashMap::new()),
            next_timer: Cell::new(1),
        }
    }

    /// Set `innerWidth`/`innerHeight`.
    pub fn set_inner_size(&self, size: Size) {
        self.inner_size.set(size);
    }

    /// Set the document rendering mode.
    pub fn set_compat_mode(&self, mode: CompatMode) {
        self.compat_mode.set(mode);
    }

    /// Set the root element's client size.
    pub fn set_document_element_client_size(&self, size: Size) {
        self.document_element_size.set(size);
    }

    /// Set the body's client size.
    pub fn set_body_client_size(&self, size: Size) {
        self.body_size.set(size);
    }

    /// Make future registrations for `name` fail, or clear with `None`.
    pub fn refuse_listeners_for(&self, name: Option<&str>) {
        *self.refused.borrow_mut() = name.map(ToString::to_string);
    }

    /// Deliver `event` to every listener registered for `name`, in registration
    /// order. Returns the number of listeners invoked.
    ///
    /// Listeners are snapshotted first, so they may add or remove listeners.
    pub fn dispatch(&self, name: &str, event: &E) -> usize {
        let mut matching: Vec<(ListenerId, Listener<E>)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, (n, _))| n == name)
            .map(|(id, (_, l))| (*id, Rc::clone(l)))
            .collect();
        matching.sort_by_key(|(id, _)| *id);
        for (_, listener) in &matching {
            listener(event);
        }
        matching.len()
    }

    /// Dispatch a `scroll` event.
    pub fn scroll(&self, event: E) -> usize {
        self.dispatch("scroll", &event)
    }

    /// Change the inner size and dispatch a `resize` event.
    pub fn resize(&self, size: Size, event: E) -> usize {
        self.set_inner_size(size);
        self.dispatch("resize", &event)
    }

    /// Number of registered listeners, across all event names.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of timers that have not fired or been cleared.
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Move the clock forward by `ms`, firing due timers in deadline order.
    ///
    /// Timers scheduled by a firing callback run in the same call if they fall
    /// due before the new time.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get().saturating_add(ms);
        loop {
            let due = {
                let mut timers = self.timers.borrow_mut();
                match timers.first_key_value() {
                    Some((&(deadline, id), _)) if deadline <= target => {
                        timers.remove(&(deadline, id)).map(|cb| (deadline, id, cb))
                    }
                    _ => None,
                }
            };
            let Some((deadline, id, callback)) = due else {
                break;
            };
            self.deadlines.borrow_mut().remove(&id);
            self.now.set(deadline);
            callback();
        }
        self.now.set(target);
    }
}

impl<E> fmt::Debug for HeadlessViewport<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessViewport")
            .field("inner_size", &self.inner_size.get())
            .field("compat_mode", &self.compat_mode.get())
            .field("now", &self.now.get())
            .field("listeners", &self.listener_count())
            .field("pending_timers", &self.pending_timers())
            .finish_non_exhaustive()
    }
}

impl<E> EventTarget for HeadlessViewport<E> {
    type Event = E;

    fn add_listener(&self, name: &str, listener: Listener<E>) -> Result<ListenerId, SignalError> {
        if self.refused.borrow().as_deref() == Some(name) {
            return Err(SignalError::registration(name, "registration refused"));
        }
        let id = ListenerId::new(self.next_listener.get());
        self.next_listener.set(id.get() + 1);
        self.listeners
            .borrow_mut()
            .insert(id, (name.to_string(), listener));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(&id);
    }
}

impl<E> Scheduler for HeadlessViewport<E> {
    fn now(&self) -> u64 {
        self.now.get()
    }

    fn set_timeout(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId::new(self.next_timer.get());
        self.next_timer.set(id.get() + 1);
        let deadline = self.now.get().saturating_add(delay_ms);
        self.timers.borrow_mut().insert((deadline, id), callback);
        self.deadlines.borrow_mut().insert(id, deadline);
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        if let Some(deadline) = self.deadlines.borrow_mut().remove(&id) {
            self.timers.borrow_mut().remove(&(deadline, id));
        }
    }
}

impl<E> ViewportSource for HeadlessViewport<E> {
    fn inner_size(&self) -> Size {
        self.inner_size.get()
    }

    fn compat_mode(&self) -> CompatMode {
        self.compat_mode.get()
    }

    fn document_element_client_size(&self) -> Size {
        self.document_element_size.get()
    }

    fn body_client_size(&self) -> Size {
        self.body_size.get()
    }
}

/// An element with a settable client rectangle.
#[derive(Debug, Default)]
pub struct HeadlessElement {
    rect: Cell<Rect>,
}

impl HeadlessElement {
    /// An element at `rect`.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: Cell::new(rect),
        }
    }

    /// Move or resize the element.
    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }

    /// Shift the element vertically, as scrolling the page by `-dy` would.
    pub fn offset_y(&self, dy: f64) {
        let r = self.rect.get();
        self.rect.set(Rect::new(r.x0, r.y0 + dy, r.x1, r.y1 + dy));
    }
}

impl ElementRect for HeadlessElement {
    fn bounding_client_rect(&self) -> Rect {
        self.rect.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn dispatch_reaches_matching_listeners_in_order() {
        let vp: HeadlessViewport<u8> = HeadlessViewport::new(Size::new(10.0, 10.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in [1_u8, 2, 3] {
            let seen = Rc::clone(&seen);
            let name = if tag == 2 { "resize" } else { "scroll" };
            vp.add_listener(
                name,
                Rc::new(move |e: &u8| seen.borrow_mut().push((tag, *e))),
            )
            .unwrap();
        }
        assert_eq!(vp.dispatch("scroll", &9), 2);
        assert_eq!(*seen.borrow(), vec![(1, 9), (3, 9)]);
    }

    #[test]
    fn removed_listeners_stop_receiving() {
        let vp: HeadlessViewport = HeadlessViewport::new(Size::new(10.0, 10.0));
        let hits = Rc::new(Cell::new(0));
        let id = vp
            .add_listener("scroll", {
                let hits = Rc::clone(&hits);
                Rc::new(move |_: &()| hits.set(hits.get() + 1))
            })
            .unwrap();
        vp.scroll(());
        vp.remove_listener(id);
        vp.remove_listener(id);
        assert_eq!(vp.scroll(()), 0);
        assert_eq!(hits.get(), 1);
        assert_eq!(vp.listener_count(), 0);
    }

    #[test]
    fn refused_registration_reports_name() {
        let vp: HeadlessViewport = HeadlessViewport::new(Size::new(10.0, 10.0));
        vp.refuse_listeners_for(Some("resize"));
        let err = vp.add_listener("resize", Rc::new(|_: &()| {})).unwrap_err();
        assert_eq!(err, SignalError::registration("resize", "registration refused"));
        assert!(vp.add_listener("scroll", Rc::new(|_: &()| {})).is_ok());
        vp.refuse_listeners_for(None);
        assert!(vp.add_listener("resize", Rc::new(|_: &()| {})).is_ok());
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let vp: HeadlessViewport = HeadlessViewport::new(Size::new(10.0, 10.0));
        let order = Rc::new(RefCell::new(Vec::new()));
        for (delay, tag) in [(30, 'c'), (10, 'a'), (20, 'b'), (40, 'x')] {
            let order = Rc::clone(&order);
            let id = vp.set_timeout(delay, Box::new(move || order.borrow_mut().push(tag)));
            if tag == 'x' {
                vp.clear_timeout(id);
            }
        }
        vp.advance(25);
        assert_eq!(*order.borrow(), vec!['a', 'b']);
        assert_eq!(vp.now(), 25);
        vp.advance(100);
        assert_eq!(*order.borrow(), vec!['a', 'b', 'c']);
        assert_eq!(vp.pending_timers(), 0);
    }

    #[test]
    fn timers_scheduled_while_firing_run_when_due() {
        let vp: Rc<HeadlessViewport> = Rc::new(HeadlessViewport::new(Size::new(10.0, 10.0)));
        let fired = Rc::new(Cell::new(0));
        {
            let vp2 = Rc::clone(&vp);
            let fired = Rc::clone(&fired);
            vp.set_timeout(
                10,
                Box::new(move || {
                    fired.set(fired.get() + 1);
                    let fired = Rc::clone(&fired);
                    vp2.set_timeout(5, Box::new(move || fired.set(fired.get() + 1)));
                }),
            );
        }
        vp.advance(12);
        assert_eq!(fired.get(), 1);
        vp.advance(3);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn element_offsets_vertically() {
        let el = HeadlessElement::new(Rect::new(0.0, 10.0, 5.0, 20.0));
        el.offset_y(-15.0);
        assert_eq!(el.bounding_client_rect(), Rect::new(0.0, -5.0, 5.0, 5.0));
    }
}
