// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle helpers shared by placement, dragging, and verification.
//!
//! Everything here works on block *origins* (top-left corners). The movable
//! block and the target block always share one size, so the valid region for
//! either origin is the container shrunk by the padding on every side and by
//! the block size on the far side.

use kurbo::{Point, Rect, Size};

/// Returns the rectangle covered by a block whose top-left corner is `origin`.
#[must_use]
pub fn block_rect(origin: Point, block: Size) -> Rect {
    Rect::from_origin_size(origin, block)
}

/// Returns `true` when the interiors of `a` and `b` intersect.
///
/// Rectangles that only share an edge or a corner do not overlap, so two
/// blocks placed side by side with no gap are still considered separate.
#[must_use]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Returns the region a block origin may occupy inside `container`.
///
/// The result spans `[padding, container − padding − block]` on both axes.
/// When the container is too small it is inverted (`x0 > x1` or `y0 > y1`);
/// [`clamp_origin`] resolves that case toward the padding edge.
#[must_use]
pub fn origin_bounds(container: Size, block: Size, padding: f64) -> Rect {
    Rect::new(
        padding,
        padding,
        container.width - block.width - padding,
        container.height - block.height - padding,
    )
}

/// Clamps a block origin into `bounds`.
///
/// The far edge is applied first and the near edge last, so an inverted
/// `bounds` pins the origin to the padding edge instead of panicking the way
/// [`f64::clamp`] would.
#[must_use]
pub fn clamp_origin(origin: Point, bounds: Rect) -> Point {
    Point::new(
        origin.x.min(bounds.x1).max(bounds.x0),
        origin.y.min(bounds.y1).max(bounds.y0),
    )
}

/// Returns `true` if `origin` lies within `bounds`, edges included.
#[must_use]
pub fn origin_in_bounds(origin: Point, bounds: Rect) -> bool {
    origin.x >= bounds.x0 && origin.x <= bounds.x1 && origin.y >= bounds.y0 && origin.y <= bounds.y1
}
