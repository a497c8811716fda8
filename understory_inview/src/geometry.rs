// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport bounds and rectangle intersection.

use kurbo::{Rect, Size};

use crate::{CompatMode, ViewportSource};

/// The visible area of `viewport` in client coordinates.
///
/// The window's inner size is preferred. When its height is unavailable (zero)
/// the document's client box is used instead: the root element's in
/// [`CompatMode::Standards`], the body's in [`CompatMode::Quirks`].
pub fn viewport_rect<V: ViewportSource + ?Sized>(viewport: &V) -> Rect {
    let inner = viewport.inner_size();
    if inner.height != 0.0 && !inner.height.is_nan() {
        return Rect::from_origin_size((0.0, 0.0), inner);
    }
    let fallback: Size = match viewport.compat_mode() {
        CompatMode::Standards => viewport.document_element_client_size(),
        CompatMode::Quirks => viewport.body_client_size(),
    };
    Rect::from_origin_size((0.0, 0.0), fallback)
}

/// Returns `true` unless `a` and `b` are disjoint along some axis.
///
/// Edges are inclusive: rectangles that merely touch intersect. The relation
/// is symmetric.
///
/// ```
/// use kurbo::Rect;
/// use understory_inview::intersects;
///
/// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
/// assert!(intersects(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
/// assert!(!intersects(a, Rect::new(10.5, 0.0, 20.0, 10.0)));
/// ```
pub fn intersects(a: Rect, b: Rect) -> bool {
    !(b.x0 > a.x1 || b.x1 < a.x0 || b.y0 > a.y1 || b.y1 < a.y0)
}
