// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_slide_verify --heading-base-level=0

//! Understory Slide Verify: a headless "drag the piece into place" check.
//!
//! A movable puzzle block and a target silhouette are placed inside a
//! container. The user drags the block; when the pointer is released the
//! widget checks whether the block's center is within a tolerance of the
//! target's center and reports the result.
//!
//! The crate owns the math and the state, not the pixels:
//!
//! - [`placement`]: choose start and target origins for a [`ScrollMode`].
//! - [`drag`]: pointer-down/move/up gesture tracking with a jitter guard.
//! - [`verify`]: center-distance verification.
//! - [`compose`]: the [`RenderPlan`] handed to an imaging backend.
//! - [`SlideVerify`]: the widget shell tying them together.
//!
//! ## Lifecycle
//!
//! Hosts drive the widget in two stages. [`SlideVerify::layout`] resolves the
//! block size once the container size is known; [`SlideVerify::render`]
//! places the blocks if needed and returns a [`RenderPlan`]. Placement is lazy
//! and stable: it only changes on [`SlideVerify::regenerate`], a new
//! background, or a setter that changes the geometry.
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_slide_verify::{Config, PointerEvent, ScrollMode, SlideVerify};
//!
//! let config = Config::default()
//!     .with_scroll_mode(ScrollMode::HorizontalOnly)
//!     .with_block_size(50.0, 50.0)
//!     .with_padding(10.0)
//!     .with_random_block_location(false);
//! let mut widget = SlideVerify::with_rng(config, fastrand::Rng::with_seed(7)).unwrap();
//!
//! widget.set_background(Some(Size::new(600.0, 800.0)));
//! widget.layout(Size::new(300.0, 400.0)).unwrap();
//! let plan = widget.render().unwrap();
//! assert_eq!(plan.movable.rect.origin(), Point::new(10.0, 10.0));
//! assert_eq!(plan.target.rect.origin(), Point::new(240.0, 10.0));
//!
//! // A tap is not a verification attempt.
//! widget.handle_pointer(PointerEvent::Down(Point::new(35.0, 35.0)));
//! let up = widget.handle_pointer(PointerEvent::Up(Point::new(35.0, 35.0)));
//! assert_eq!(up.verified, None);
//! ```
//!
//! ## Randomness
//!
//! Every random draw (start position, target position, rotation) comes from
//! the widget's [`RandomSource`]. [`SlideVerify::new`] seeds a
//! [`fastrand::Rng`] from process entropy; [`SlideVerify::with_rng`] accepts
//! any source, which makes placements reproducible in tests.
//!
//! ## Diagnostics
//!
//! Placement and verification outcomes are reported through `tracing` at
//! `debug`; a size conflict or a non-converging free placement is reported at
//! `warn`; rejected drag moves are reported at `trace`.
//!
//! ## Features
//!
//! - `std` (default): entropy-seeded [`SlideVerify::new`].
//! - `libm`: floating point support for `no_std` builds.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod compose;
pub mod config;
pub mod drag;
pub mod geometry;
pub mod placement;
pub mod verify;
mod widget;

pub use compose::{
    BackgroundOp, BlockRole, BlockVisual, Compositor, RenderPlan, TEXTURE_BLEND, TextureMask,
    rotation_fit,
};
pub use config::{
    BlockShape, Config, ConfigError, Dimension, MaxScrollDistance, PlacementAxis, ScrollMode,
    ShapeAsset, ShapeId,
};
pub use drag::{DRAG_THRESHOLD, DragGesture, MoveKind, PointerEvent, apply_drag};
pub use placement::{
    MAX_FREE_ATTEMPTS, Placement, PlacementError, PlacementRequest, RandomSource, place,
};
pub use verify::{CenterRule, center_distance};
pub use widget::{
    Invalidation, PointerResponse, RANDOM_ROTATE_RANGE, RenderError, ResolvedGeometry,
    SlideVerify, resolve_geometry,
};
