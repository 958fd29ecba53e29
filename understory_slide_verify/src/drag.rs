// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag gesture tracking for the movable block.
//!
//! ## Usage
//!
//! 1) On pointer down, call [`DragGesture::start`] with the pointer position.
//! 2) On each move, call [`DragGesture::classify`]. A [`MoveKind::Drag`]
//!    carries the delta since the last committed position; once the caller
//!    has applied it, it calls [`DragGesture::commit`].
//! 3) On pointer up, call [`DragGesture::finish`], which reports whether the
//!    gesture contained at least one qualifying move.
//!
//! A move qualifies when the pointer is at least [`DRAG_THRESHOLD`] away
//! from either the last committed position or the gesture's first position.
//! Anything smaller is jitter and leaves the gesture untouched.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_slide_verify::{DragGesture, MoveKind};
//!
//! let mut drag = DragGesture::default();
//! drag.start(Point::new(10.0, 20.0));
//!
//! // Half a pixel is jitter.
//! assert_eq!(drag.classify(Point::new(10.5, 20.0)), MoveKind::Jitter);
//!
//! // Five pixels is a drag.
//! let kind = drag.classify(Point::new(15.0, 20.0));
//! assert_eq!(kind, MoveKind::Drag(Vec2::new(5.0, 0.0)));
//! drag.commit(Point::new(15.0, 20.0));
//!
//! assert!(drag.finish());
//! assert!(!drag.is_dragging());
//! ```

use kurbo::{Point, Rect, Vec2};

use crate::config::ScrollMode;
use crate::geometry::clamp_origin;

/// Minimum pointer travel, in pixels, for a move to count as a drag.
pub const DRAG_THRESHOLD: f64 = 1.0;

/// Pointer input delivered to the widget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// The pointer was pressed.
    Down(Point),
    /// The pointer moved while pressed.
    Move(Point),
    /// The pointer was released.
    Up(Point),
}

/// How a pointer move was classified.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveKind {
    /// No gesture is active.
    Inactive,
    /// Below the drag threshold; treated as part of a tap.
    Jitter,
    /// A qualifying move, with the delta since the last committed position.
    Drag(Vec2),
}

/// Tracks one pointer gesture over the movable block.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragGesture {
    /// Position of the pointer down that started the gesture.
    pub first_pos: Option<Point>,
    /// Last position committed by a drag.
    pub last_pos: Option<Point>,
    /// Whether any move in this gesture qualified as a drag.
    pub moved: bool,
}

impl DragGesture {
    /// Start tracking a gesture at `pos`, replacing any gesture in progress.
    pub fn start(&mut self, pos: Point) {
        self.first_pos = Some(pos);
        self.last_pos = Some(pos);
        self.moved = false;
    }

    /// Classify a move to `pos` without committing it.
    ///
    /// A qualifying move marks the gesture as moved even if the caller
    /// decides not to commit it.
    pub fn classify(&mut self, pos: Point) -> MoveKind {
        let (Some(first), Some(last)) = (self.first_pos, self.last_pos) else {
            return MoveKind::Inactive;
        };
        let is_drag = exceeds_threshold(pos, last) || exceeds_threshold(pos, first);
        if is_drag {
            self.moved = true;
            MoveKind::Drag(pos - last)
        } else {
            MoveKind::Jitter
        }
    }

    /// Record `pos` as the position the next delta is measured from.
    pub fn commit(&mut self, pos: Point) {
        if self.first_pos.is_some() {
            self.last_pos = Some(pos);
        }
    }

    /// End the gesture, returning whether it contained a qualifying move.
    pub fn finish(&mut self) -> bool {
        let moved = self.moved;
        *self = Self::default();
        moved
    }

    /// Returns `true` while a gesture is active.
    pub fn is_dragging(&self) -> bool {
        self.first_pos.is_some()
    }
}

fn exceeds_threshold(a: Point, b: Point) -> bool {
    (a - b).hypot() >= DRAG_THRESHOLD
}

/// Moves a block origin by `delta` under `mode`'s axis constraints, then
/// clamps it into `bounds`.
#[must_use]
pub fn apply_drag(mode: ScrollMode, origin: Point, delta: Vec2, bounds: Rect) -> Point {
    let delta = Vec2::new(
        if mode.drags_x() { delta.x } else { 0.0 },
        if mode.drags_y() { delta.y } else { 0.0 },
    );
    clamp_origin(origin + delta, bounds)
}
