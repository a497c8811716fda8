// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the intersection test and the reporting state machine.
//!
//! 1. `intersects` is symmetric.
//! 2. Every rectangle intersects itself.
//! 3. Rectangles sharing an edge intersect.
//! 4. A positive gap on either axis means no intersection.
//! 5. The pipeline never reports two equal values in a row, and never starts
//!    with `false`.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Rect, Size};
use proptest::prelude::*;
use understory_inview::headless::{HeadlessElement, HeadlessViewport};
use understory_inview::{InView, InViewOptions, intersects};

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (
        -1_000.0_f64..1_000.0,
        -1_000.0_f64..1_000.0,
        0.0_f64..500.0,
        0.0_f64..500.0,
    )
        .prop_map(|(x, y, w, h)| Rect::new(x, y, x + w, y + h))
}

proptest! {
    #[test]
    fn intersects_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(intersects(a, b), intersects(b, a));
    }

    #[test]
    fn rect_intersects_itself(a in rect_strategy()) {
        prop_assert!(intersects(a, a));
    }

    #[test]
    fn shared_edges_intersect(a in rect_strategy(), w in 0.0_f64..100.0, h in 0.0_f64..100.0) {
        let right = Rect::new(a.x1, a.y0, a.x1 + w, a.y1);
        let below = Rect::new(a.x0, a.y1, a.x1, a.y1 + h);
        prop_assert!(intersects(a, right));
        prop_assert!(intersects(a, below));
    }

    #[test]
    fn positive_gap_separates(
        a in rect_strategy(),
        gap in 0.001_f64..100.0,
        w in 0.0_f64..100.0,
        horizontal in any::<bool>(),
    ) {
        let b = if horizontal {
            Rect::new(a.x1 + gap, a.y0, a.x1 + gap + w, a.y1)
        } else {
            Rect::new(a.x0, a.y1 + gap, a.x1, a.y1 + gap + w)
        };
        prop_assert!(!intersects(a, b));
        prop_assert!(!intersects(b, a));
    }

    #[test]
    fn reports_alternate(start in -800.0_f64..800.0, steps in proptest::collection::vec(-400.0_f64..400.0, 0..40)) {
        let window: Rc<HeadlessViewport> = Rc::new(HeadlessViewport::new(Size::new(400.0, 300.0)));
        let element = Rc::new(HeadlessElement::new(Rect::new(0.0, start, 50.0, start + 50.0)));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _handle = InView::observe_bool(
            Rc::clone(&window),
            Rc::clone(&element),
            &InViewOptions::default(),
            {
                let seen = Rc::clone(&seen);
                move |in_view| seen.borrow_mut().push(in_view)
            },
        )
        .unwrap();

        for dy in steps {
            element.offset_y(dy);
            window.scroll(());
        }

        let seen = seen.borrow();
        if let Some(first) = seen.first() {
            prop_assert!(*first);
        }
        for pair in seen.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
    }
}
