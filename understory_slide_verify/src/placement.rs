// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement engine: choose start and target block origins for a layout.
//!
//! Horizontal and vertical modes are closed form: the start block is placed
//! on the near side, pulled back from the far edge when it would leave too
//! little room, and the target is pushed along the scroll axis by the
//! distance seed. Free mode draws the target uniformly and rejects
//! candidates that collide with the start block or sit too close to it.
//!
//! All randomness comes from a caller supplied [`RandomSource`], so a seeded
//! generator reproduces a placement exactly.

use kurbo::{Point, Rect, Size};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{MaxScrollDistance, PlacementAxis, ScrollMode};
use crate::geometry::{block_rect, clamp_origin, origin_bounds, overlaps};

/// Maximum number of target candidates drawn in [`ScrollMode::Free`].
///
/// Once exhausted, the closeness rule is dropped: the last candidate that did
/// not collide with the start block is used, else the corner of the valid range
/// farthest from the start. If even that corner collides, the start block is
/// moved to the opposite end of the x range first. Such placements are marked
/// [`relaxed`](Placement::relaxed).
pub const MAX_FREE_ATTEMPTS: u32 = 64;

/// Fraction of the container used as the minimum center separation in
/// [`ScrollMode::Free`] when avoiding close placements.
const FREE_SEPARATION_DIVISOR: f64 = 5.0;

/// Source of uniformly distributed numbers in `[0, 1)`.
pub trait RandomSource {
    /// Returns the next number in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

impl RandomSource for fastrand::Rng {
    fn next_f64(&mut self) -> f64 {
        self.f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// The container cannot hold both blocks plus padding.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum PlacementError {
    /// The blocks do not fit.
    #[error(
        "blocks of {block:?} with padding {padding} do not fit in a {container:?} container"
    )]
    SizeConflict {
        /// Container size.
        container: Size,
        /// Block size.
        block: Size,
        /// Padding.
        padding: f64,
    },
}

/// Inputs to [`place`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementRequest {
    /// Scroll mode, selecting the placement strategy.
    pub mode: ScrollMode,
    /// Container size.
    pub container: Size,
    /// Block size shared by both blocks.
    pub block: Size,
    /// Inset from the container edges.
    pub padding: f64,
    /// Hint for the start-to-target distance.
    pub max_scroll_distance: MaxScrollDistance,
    /// Enforce a minimum separation between the blocks.
    pub avoid_too_close: bool,
    /// Place the start block randomly; otherwise start from `preferred_start`.
    pub random_location: bool,
    /// Start origin used when `random_location` is off, clamped into range.
    pub preferred_start: Point,
}

impl PlacementRequest {
    /// Checks that two blocks plus padding fit along the placement axis.
    ///
    /// Vertical modes need room for two blocks down the container; the other
    /// modes need room for two blocks across it.
    pub fn check_fits(&self) -> Result<(), PlacementError> {
        let Self {
            container,
            block,
            padding,
            ..
        } = *self;
        let (main, cross, main_block, cross_block) = match self.mode.placement_axis() {
            PlacementAxis::Vertical => (
                container.height,
                container.width,
                block.height,
                block.width,
            ),
            PlacementAxis::Horizontal | PlacementAxis::Free => (
                container.width,
                container.height,
                block.width,
                block.height,
            ),
        };
        let fits = block.width > 0.0
            && block.height > 0.0
            && main >= 2.0 * main_block + 2.0 * padding
            && cross >= cross_block + 2.0 * padding;
        if fits {
            Ok(())
        } else {
            Err(PlacementError::SizeConflict {
                container,
                block,
                padding,
            })
        }
    }

    /// Distance between the two extreme origins along the placement axis.
    ///
    /// Free mode measures along x.
    #[must_use]
    pub fn available_distance(&self) -> f64 {
        match self.mode.placement_axis() {
            PlacementAxis::Vertical => {
                self.container.height - self.block.height - 2.0 * self.padding
            }
            PlacementAxis::Horizontal | PlacementAxis::Free => {
                self.container.width - self.block.width - 2.0 * self.padding
            }
        }
    }

    /// The configured max distance, capped by [`available_distance`](Self::available_distance).
    #[must_use]
    pub fn scroll_distance_seed(&self) -> f64 {
        let available = self.available_distance();
        match self.max_scroll_distance {
            MaxScrollDistance::Derived => available,
            MaxScrollDistance::Fixed(max) => max.min(available),
        }
    }
}

/// Result of a successful placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Origin of the movable block; also the reset snapshot.
    pub start: Point,
    /// Origin of the target block.
    pub target: Point,
    /// Straight-line distance between the two block centers.
    pub real_scroll_distance: f64,
    /// Number of target candidates drawn (always `1` outside Free mode).
    pub attempts: u32,
    /// Free mode gave up on rejection sampling and used the fallback corner.
    pub relaxed: bool,
}

impl Placement {
    /// Rectangle of the start block.
    #[must_use]
    pub fn start_rect(&self, block: Size) -> Rect {
        block_rect(self.start, block)
    }

    /// Rectangle of the target block.
    #[must_use]
    pub fn target_rect(&self, block: Size) -> Rect {
        block_rect(self.target, block)
    }
}

/// Computes start and target origins for `request`.
///
/// Both blocks always land inside `[padding, container − padding]`. The
/// distance seed only biases horizontal and vertical placement; the returned
/// [`Placement::real_scroll_distance`] is the distance actually realized.
pub fn place<R: RandomSource + ?Sized>(
    request: &PlacementRequest,
    rng: &mut R,
) -> Result<Placement, PlacementError> {
    request.check_fits()?;

    let (start, target, attempts, relaxed) = match request.mode.placement_axis() {
        PlacementAxis::Horizontal => {
            let (start, target) = place_linear(request, rng, false);
            (start, target, 1, false)
        }
        PlacementAxis::Vertical => {
            let (start, target) = place_linear(request, rng, true);
            (start, target, 1, false)
        }
        PlacementAxis::Free => place_free(request, rng),
    };

    // Both blocks share a size, so origin distance equals center distance.
    let real_scroll_distance = start.distance(target);
    debug!(
        mode = ?request.mode,
        container = ?request.container,
        block = ?request.block,
        start = ?start,
        target = ?target,
        real_scroll_distance,
        attempts,
        "placed blocks"
    );
    Ok(Placement {
        start,
        target,
        real_scroll_distance,
        attempts,
        relaxed,
    })
}

fn uniform<R: RandomSource + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + rng.next_f64() * (high - low)
}

/// Horizontal placement, or vertical with the axes swapped.
///
/// "Main" is the scroll axis, "cross" the other one.
fn place_linear<R: RandomSource + ?Sized>(
    request: &PlacementRequest,
    rng: &mut R,
    vertical: bool,
) -> (Point, Point) {
    let swap = |x: f64, y: f64| if vertical { (y, x) } else { (x, y) };
    let (main_len, cross_len) = swap(request.container.width, request.container.height);
    let (main_block, cross_block) = swap(request.block.width, request.block.height);
    let (preferred_main, preferred_cross) =
        swap(request.preferred_start.x, request.preferred_start.y);
    let padding = request.padding;

    // The start block leaves room for the target on its far side.
    let main_end = main_len - 2.0 * main_block - padding;
    let cross_end = cross_len - cross_block - padding;

    let (mut main, mut cross) = if request.random_location {
        (
            uniform(rng, padding, main_end),
            uniform(rng, padding, cross_end),
        )
    } else {
        (preferred_main.min(main_end), preferred_cross.min(cross_end))
    };

    if request.avoid_too_close {
        let suitable = (main_len - 2.0 * main_block - 2.0 * padding) / 5.0;
        if main_len - (main + main_block) <= main_block + padding + suitable {
            main = main_len - (main_block + padding + suitable) - main_block;
        }
    }
    main = main.max(padding);
    cross = cross.max(padding);

    let target_main = (main + request.scroll_distance_seed() + main_block)
        .min(main_len - main_block - padding)
        .max(padding);

    let (sx, sy) = swap(main, cross);
    let (tx, ty) = swap(target_main, cross);
    (Point::new(sx, sy), Point::new(tx, ty))
}

fn place_free<R: RandomSource + ?Sized>(
    request: &PlacementRequest,
    rng: &mut R,
) -> (Point, Point, u32, bool) {
    let bounds = origin_bounds(request.container, request.block, request.padding);
    let mut start = if request.random_location {
        Point::new(
            uniform(rng, bounds.x0, bounds.x1),
            uniform(rng, bounds.y0, bounds.y1),
        )
    } else {
        clamp_origin(request.preferred_start, bounds)
    };
    let start_rect = block_rect(start, request.block);
    let min_dx = request.container.width / FREE_SEPARATION_DIVISOR;
    let min_dy = request.container.height / FREE_SEPARATION_DIVISOR;

    let too_close = |target: Point| {
        request.avoid_too_close
            && (target.x - start.x).abs() < min_dx
            && (target.y - start.y).abs() < min_dy
    };

    // Last candidate that only failed the closeness rule.
    let mut separate = None;
    for attempt in 1..=MAX_FREE_ATTEMPTS {
        let target = Point::new(
            uniform(rng, bounds.x0, bounds.x1),
            uniform(rng, bounds.y0, bounds.y1),
        );
        if overlaps(start_rect, block_rect(target, request.block)) {
            continue;
        }
        if !too_close(target) {
            return (start, target, attempt, false);
        }
        separate = Some(target);
    }

    let target = match separate {
        Some(target) => target,
        None => {
            let mut corner = farthest_corner(bounds, start);
            if overlaps(start_rect, block_rect(corner, request.block)) {
                // The size check guarantees a block width between the x extremes.
                start.x = if corner.x >= start.x {
                    bounds.x0
                } else {
                    bounds.x1
                };
                corner = farthest_corner(bounds, start);
            }
            corner
        }
    };
    warn!(
        attempts = MAX_FREE_ATTEMPTS,
        start = ?start,
        target = ?target,
        "free placement did not converge; relaxing the separation rule"
    );
    (start, target, MAX_FREE_ATTEMPTS, true)
}

fn farthest_corner(bounds: Rect, from: Point) -> Point {
    [
        Point::new(bounds.x0, bounds.y0),
        Point::new(bounds.x1, bounds.y0),
        Point::new(bounds.x0, bounds.y1),
        Point::new(bounds.x1, bounds.y1),
    ]
    .into_iter()
    .max_by(|a, b| {
        a.distance_squared(from)
            .total_cmp(&b.distance_squared(from))
    })
    .unwrap_or(Point::new(bounds.x0, bounds.y0))
}
