// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Verification: is the movable block close enough to the target?

use kurbo::{Point, Size};

/// How a block's center is derived from its origin and size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CenterRule {
    /// `origin + size / 2`, the true rectangle center.
    #[default]
    Geometric,
    /// `(origin + size) / 2`.
    ///
    /// Halves every origin difference, which doubles the effective
    /// tolerance. Kept for deployments tuned against that behavior.
    Legacy,
}

impl CenterRule {
    /// Center of the block at `origin`.
    #[must_use]
    pub fn center(self, origin: Point, block: Size) -> Point {
        match self {
            Self::Geometric => Point::new(
                origin.x + block.width / 2.0,
                origin.y + block.height / 2.0,
            ),
            Self::Legacy => Point::new(
                (origin.x + block.width) / 2.0,
                (origin.y + block.height) / 2.0,
            ),
        }
    }
}

/// Distance between the centers of two equally sized blocks.
#[must_use]
pub fn center_distance(start: Point, target: Point, block: Size, rule: CenterRule) -> f64 {
    rule.center(start, block).distance(rule.center(target, block))
}

/// Returns `true` if the block at `start` is within `valid_offset` of the
/// block at `target`, boundary included.
#[must_use]
pub fn verify(
    start: Point,
    target: Point,
    block: Size,
    valid_offset: f64,
    rule: CenterRule,
) -> bool {
    center_distance(start, target, block, rule) <= valid_offset
}
