// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`
use kurbo::{Point, Rect, Size};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::compose::{BackgroundOp, BlockRole, RenderPlan, TEXTURE_BLEND, TextureMask, block_visual};
use crate::config::{
    BlockShape, Config, ConfigError, Dimension, MaxScrollDistance, ScrollMode, check_block_size,
    check_length,
};
use crate::drag::{DragGesture, MoveKind, PointerEvent, apply_drag};
use crate::geometry::{block_rect, origin_bounds};
use crate::placement::{Placement, PlacementError, PlacementRequest, RandomSource, place};
use crate::verify::{CenterRule, verify};

/// Upper bound (exclusive) of a randomly rolled rotation, in degrees.
pub const RANDOM_ROTATE_RANGE: f64 = 270.0;

bitflags::bitflags! {
    /// Work a host must redo after a state change.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Invalidation: u8 {
        /// The container may need to be measured again.
        const LAYOUT    = 0b0000_0001;
        /// Blocks will be placed again at the next render.
        const PLACEMENT = 0b0000_0010;
        /// The widget needs to be drawn again.
        const RENDER    = 0b0000_0100;
    }
}

/// Why a render cycle produced nothing.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderError {
    /// [`SlideVerify::layout`] has not succeeded yet.
    #[error("the widget has not been laid out")]
    NotLaidOut,
    /// No background image is available.
    #[error("no background image is available")]
    MissingBackground,
    /// The blocks could not be placed.
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Sizes resolved for one layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedGeometry {
    /// Container size.
    pub container: Size,
    /// Block size shared by both blocks.
    pub block: Size,
    /// Inset from the container edges.
    pub padding: f64,
    /// Effective max scroll distance used as the placement hint.
    pub max_scroll_distance: f64,
}

impl ResolvedGeometry {
    /// Region a block origin may occupy.
    #[must_use]
    pub fn origin_bounds(&self) -> Rect {
        origin_bounds(self.container, self.block, self.padding)
    }
}

/// Resolves block size and max scroll distance for `container`.
///
/// Block size comes from the explicit size on each axis, else (when neither
/// axis is explicit) from the movable shape's intrinsic size, else from the
/// divide factors.
pub fn resolve_geometry(config: &Config, container: Size) -> Result<ResolvedGeometry, ConfigError> {
    check_length("container width", container.width)?;
    check_length("container height", container.height)?;

    let intrinsic = config.movable_shape.intrinsic_size();
    let block = match intrinsic {
        Some(size) if config.block_width == 0.0 && config.block_height == 0.0 => size,
        _ => Size::new(
            explicit_or_divided(config.block_width, container.width, config.block_width_divide),
            explicit_or_divided(
                config.block_height,
                container.height,
                config.block_height_divide,
            ),
        ),
    };
    check_block_size(Dimension::Width, block.width, false)?;
    check_block_size(Dimension::Height, block.height, false)?;

    let request = PlacementRequest {
        mode: config.scroll_mode,
        container,
        block,
        padding: config.padding,
        max_scroll_distance: config.max_scroll_distance,
        avoid_too_close: config.avoid_too_close,
        random_location: config.random_block_location,
        preferred_start: Point::ZERO,
    };
    Ok(ResolvedGeometry {
        container,
        block,
        padding: config.padding,
        max_scroll_distance: match config.max_scroll_distance {
            MaxScrollDistance::Derived => request.available_distance(),
            MaxScrollDistance::Fixed(distance) => distance,
        },
    })
}

fn explicit_or_divided(explicit: f64, container: f64, divide: u32) -> f64 {
    if explicit > 0.0 {
        explicit
    } else {
        (container / f64::from(divide)).floor()
    }
}

/// Outcome of [`SlideVerify::handle_pointer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PointerResponse {
    /// The widget consumed the event.
    pub handled: bool,
    /// The movable block moved and the widget should be drawn again.
    pub needs_redraw: bool,
    /// Result of the verification run by this event, if any.
    pub verified: Option<bool>,
}

impl PointerResponse {
    const IGNORED: Self = Self {
        handled: false,
        needs_redraw: false,
        verified: None,
    };

    const HANDLED: Self = Self {
        handled: true,
        needs_redraw: false,
        verified: None,
    };
}

type VerifyListener = Box<dyn FnMut(bool)>;

/// Headless slider-puzzle verification widget.
///
/// Drive it with a two-stage cycle: [`layout`](Self::layout) once the
/// container size is known, then [`render`](Self::render) to obtain a
/// [`RenderPlan`]. Pointer events go to
/// [`handle_pointer`](Self::handle_pointer); a completed drag is verified and
/// reported both in the returned [`PointerResponse`] and to the listener
/// registered with [`set_verify_listener`](Self::set_verify_listener).
pub struct SlideVerify<R = fastrand::Rng> {
    config: Config,
    rng: R,
    container: Option<Size>,
    background: Option<Size>,
    geometry: Option<ResolvedGeometry>,
    placement: Option<Placement>,
    texture_rect: Rect,
    start: Point,
    rotation: f64,
    gesture: DragGesture,
    needs_placement: bool,
    listener: Option<VerifyListener>,
}

impl<R> fmt::Debug for SlideVerify<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlideVerify")
            .field("config", &self.config)
            .field("container", &self.container)
            .field("background", &self.background)
            .field("geometry", &self.geometry)
            .field("placement", &self.placement)
            .field("start", &self.start)
            .field("rotation", &self.rotation)
            .field("gesture", &self.gesture)
            .field("needs_placement", &self.needs_placement)
            .field("has_listener", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "std")]
impl SlideVerify<fastrand::Rng> {
    /// Creates a widget whose placement and rotation are seeded from the
    /// process entropy.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_rng(config, fastrand::Rng::new())
    }
}

impl<R: RandomSource> SlideVerify<R> {
    /// Creates a widget drawing all randomness from `rng`.
    pub fn with_rng(config: Config, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut widget = Self {
            config,
            rng,
            container: None,
            background: None,
            geometry: None,
            placement: None,
            texture_rect: Rect::ZERO,
            start: Point::ZERO,
            rotation: 0.0,
            gesture: DragGesture::default(),
            needs_placement: true,
            listener: None,
        };
        widget.roll_rotation();
        Ok(widget)
    }

    // --- Layout and render -------------------------------------------------

    /// Resolves the block size and max scroll distance for `container`.
    ///
    /// A changed geometry schedules a new placement for the next render.
    pub fn layout(&mut self, container: Size) -> Result<ResolvedGeometry, ConfigError> {
        let geometry = resolve_geometry(&self.config, container)?;
        self.container = Some(container);
        if self.geometry != Some(geometry) {
            debug!(?geometry, "layout changed");
            self.geometry = Some(geometry);
            self.needs_placement = true;
        }
        Ok(geometry)
    }

    /// Produces the draw plan, placing the blocks first if needed.
    ///
    /// A size conflict is logged, returned, and leaves the placement pending,
    /// so a later render after a larger layout succeeds.
    pub fn render(&mut self) -> Result<RenderPlan, RenderError> {
        let geometry = self.geometry.ok_or(RenderError::NotLaidOut)?;
        let source_size = self.background.ok_or(RenderError::MissingBackground)?;
        let placement = match self.placement {
            Some(placement) if !self.needs_placement => placement,
            _ => self.run_placement(&geometry)?,
        };

        Ok(RenderPlan {
            background: BackgroundOp::fill(source_size, geometry.container),
            target: block_visual(
                BlockRole::Target,
                self.config.target_shape,
                placement.target,
                geometry.block,
                self.rotation,
                None,
            ),
            movable: block_visual(
                BlockRole::Movable,
                self.config.movable_shape,
                self.start,
                geometry.block,
                self.rotation,
                Some(TextureMask {
                    source_rect: self.texture_rect,
                    blend: TEXTURE_BLEND,
                }),
            ),
        })
    }

    fn run_placement(&mut self, geometry: &ResolvedGeometry) -> Result<Placement, RenderError> {
        let request = PlacementRequest {
            mode: self.config.scroll_mode,
            container: geometry.container,
            block: geometry.block,
            padding: geometry.padding,
            max_scroll_distance: self.config.max_scroll_distance,
            avoid_too_close: self.config.avoid_too_close,
            random_location: self.config.random_block_location,
            preferred_start: self.start,
        };
        let placement = place(&request, &mut self.rng).map_err(|err| {
            warn!(%err, "skipping render");
            err
        })?;
        // The texture is sampled on whole pixels.
        let target = block_rect(placement.target, geometry.block);
        self.texture_rect = Rect::from_origin_size(
            Point::new(target.x0.floor(), target.y0.floor()),
            geometry.block,
        );
        self.placement = Some(placement);
        self.start = placement.start;
        self.needs_placement = false;
        self.roll_rotation();
        Ok(placement)
    }

    fn roll_rotation(&mut self) {
        self.rotation = if self.config.random_rotate {
            self.rng.next_f64() * RANDOM_ROTATE_RANGE
        } else {
            self.config.rotate_degree
        };
    }

    // --- Pointer input -----------------------------------------------------

    /// Feeds one pointer event through the drag state machine.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerResponse {
        match event {
            PointerEvent::Down(pos) => {
                if !self.config.block_touchable {
                    trace!(?pos, "block not touchable; passing pointer down through");
                    return PointerResponse::IGNORED;
                }
                self.gesture.start(pos);
                PointerResponse::HANDLED
            }
            PointerEvent::Move(pos) => self.on_move(pos),
            PointerEvent::Up(pos) => self.on_up(pos),
        }
    }

    fn on_move(&mut self, pos: Point) -> PointerResponse {
        let delta = match self.gesture.classify(pos) {
            MoveKind::Inactive => return PointerResponse::IGNORED,
            MoveKind::Jitter => {
                trace!(?pos, "movement below drag threshold; treating as a tap");
                return PointerResponse::HANDLED;
            }
            MoveKind::Drag(delta) => delta,
        };
        let Some(geometry) = self.geometry else {
            return PointerResponse::HANDLED;
        };
        if self.placement.is_none() || !block_rect(self.start, geometry.block).contains(pos) {
            trace!(?pos, "drag outside the movable block");
            return PointerResponse::HANDLED;
        }
        self.start = apply_drag(
            self.config.scroll_mode,
            self.start,
            delta,
            geometry.origin_bounds(),
        );
        self.gesture.commit(pos);
        trace!(start = ?self.start, "dragged block");
        PointerResponse {
            handled: true,
            needs_redraw: true,
            verified: None,
        }
    }

    fn on_up(&mut self, pos: Point) -> PointerResponse {
        if !self.gesture.is_dragging() {
            return PointerResponse::IGNORED;
        }
        if !self.gesture.finish() {
            trace!(?pos, "tap released without a drag; not verifying");
            return PointerResponse::IGNORED;
        }
        let (Some(geometry), Some(placement)) = (self.geometry, self.placement) else {
            return PointerResponse::HANDLED;
        };
        let passed = verify(
            self.start,
            placement.target,
            geometry.block,
            self.config.valid_offset,
            self.config.center_rule,
        );
        debug!(passed, start = ?self.start, target = ?placement.target, "verify finished");
        if let Some(listener) = self.listener.as_mut() {
            listener(passed);
        }
        PointerResponse {
            handled: true,
            needs_redraw: false,
            verified: Some(passed),
        }
    }

    /// Registers the verification listener, replacing any previous one.
    pub fn set_verify_listener(&mut self, listener: impl FnMut(bool) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Removes the verification listener.
    pub fn clear_verify_listener(&mut self) {
        self.listener = None;
    }

    // --- Reset -------------------------------------------------------------

    /// Returns the movable block to where it was placed and re-rolls a random
    /// rotation. The placement itself is kept.
    pub fn reset(&mut self) -> Invalidation {
        if let Some(placement) = self.placement {
            self.start = placement.start;
        }
        self.roll_rotation();
        Invalidation::RENDER
    }

    /// Discards the placement so the next render generates a new puzzle.
    pub fn regenerate(&mut self) -> Invalidation {
        self.needs_placement = true;
        Invalidation::PLACEMENT | Invalidation::RENDER
    }

    // --- Setters -----------------------------------------------------------

    /// Validates and applies a config edit. Nothing changes on error.
    fn update_config(
        &mut self,
        invalidation: Invalidation,
        edit: impl FnOnce(&mut Config),
    ) -> Result<Invalidation, ConfigError> {
        let mut candidate = self.config.clone();
        edit(&mut candidate);
        candidate.validate()?;
        let geometry = match self.container {
            Some(container) if invalidation.contains(Invalidation::LAYOUT) => {
                Some(resolve_geometry(&candidate, container)?)
            }
            _ => self.geometry,
        };
        self.config = candidate;
        self.geometry = geometry;
        if invalidation.contains(Invalidation::PLACEMENT) {
            self.needs_placement = true;
        }
        Ok(invalidation)
    }

    /// Replaces the whole configuration.
    pub fn set_config(&mut self, config: Config) -> Result<Invalidation, ConfigError> {
        let invalidation = self.update_config(Invalidation::all(), |current| *current = config)?;
        self.roll_rotation();
        Ok(invalidation)
    }

    /// Sets the scroll mode; blocks are placed again for the new mode.
    pub fn set_scroll_mode(&mut self, mode: ScrollMode) -> Invalidation {
        self.config.scroll_mode = mode;
        if let (Some(container), Some(geometry)) = (self.container, self.geometry.as_mut()) {
            // Derived distance depends on the placement axis.
            if let Ok(resolved) = resolve_geometry(&self.config, container) {
                *geometry = resolved;
            }
        }
        self.needs_placement = true;
        Invalidation::PLACEMENT | Invalidation::RENDER
    }

    /// Sets an explicit block width.
    pub fn set_block_width(&mut self, width: f64) -> Result<Invalidation, ConfigError> {
        check_block_size(Dimension::Width, width, false)?;
        self.update_config(Invalidation::all(), |c| c.block_width = width)
    }

    /// Sets an explicit block height.
    pub fn set_block_height(&mut self, height: f64) -> Result<Invalidation, ConfigError> {
        check_block_size(Dimension::Height, height, false)?;
        self.update_config(Invalidation::all(), |c| c.block_height = height)
    }

    /// Sets the width divide factor.
    pub fn set_block_width_divide(&mut self, divide: u32) -> Result<Invalidation, ConfigError> {
        self.update_config(Invalidation::all(), |c| c.block_width_divide = divide)
    }

    /// Sets the height divide factor.
    pub fn set_block_height_divide(&mut self, divide: u32) -> Result<Invalidation, ConfigError> {
        self.update_config(Invalidation::all(), |c| c.block_height_divide = divide)
    }

    /// Sets the padding.
    pub fn set_padding(&mut self, padding: f64) -> Result<Invalidation, ConfigError> {
        self.update_config(Invalidation::all(), |c| c.padding = padding)
    }

    /// Sets the max scroll distance hint.
    pub fn set_max_scroll_distance(
        &mut self,
        distance: MaxScrollDistance,
    ) -> Result<Invalidation, ConfigError> {
        self.update_config(Invalidation::all(), |c| c.max_scroll_distance = distance)
    }

    /// Sets the verification tolerance; applies to the next verification.
    pub fn set_valid_offset(&mut self, offset: f64) -> Result<Invalidation, ConfigError> {
        self.update_config(Invalidation::empty(), |c| c.valid_offset = offset)
    }

    /// Sets how verification computes block centers.
    pub fn set_center_rule(&mut self, rule: CenterRule) -> Invalidation {
        self.config.center_rule = rule;
        Invalidation::empty()
    }

    /// Sets whether the block can be dragged.
    pub fn set_block_touchable(&mut self, touchable: bool) -> Invalidation {
        self.config.block_touchable = touchable;
        Invalidation::empty()
    }

    /// Sets whether placement avoids close blocks; applies to the next placement.
    pub fn set_avoid_too_close(&mut self, avoid: bool) -> Invalidation {
        self.config.avoid_too_close = avoid;
        Invalidation::empty()
    }

    /// Sets whether the start block is placed randomly; applies to the next
    /// placement.
    pub fn set_random_block_location(&mut self, random: bool) -> Invalidation {
        self.config.random_block_location = random;
        Invalidation::empty()
    }

    /// Sets the fixed rotation. It is shown immediately unless random
    /// rotation is on.
    pub fn set_rotate_degree(&mut self, degree: f64) -> Result<Invalidation, ConfigError> {
        let invalidation = self.update_config(Invalidation::RENDER, |c| c.rotate_degree = degree)?;
        self.roll_rotation();
        Ok(invalidation)
    }

    /// Turns random rotation on or off, rolling a new rotation.
    pub fn set_random_rotate(&mut self, random: bool) -> Invalidation {
        self.config.random_rotate = random;
        self.roll_rotation();
        Invalidation::RENDER
    }

    /// Sets the movable block's shape.
    ///
    /// A new intrinsic size only affects the block size at the next layout.
    pub fn set_movable_shape(&mut self, shape: BlockShape) -> Invalidation {
        self.config.movable_shape = shape;
        Invalidation::RENDER | Invalidation::LAYOUT
    }

    /// Sets the target silhouette's shape.
    pub fn set_target_shape(&mut self, shape: BlockShape) -> Invalidation {
        self.config.target_shape = shape;
        Invalidation::RENDER
    }

    /// Announces the natural size of the background image, or its absence.
    ///
    /// A new image is a new puzzle: blocks are placed again at the next render.
    pub fn set_background(&mut self, source_size: Option<Size>) -> Invalidation {
        let source_size = source_size.filter(|size| size.width > 0.0 && size.height > 0.0);
        if self.background == source_size {
            return Invalidation::empty();
        }
        self.background = source_size;
        if source_size.is_some() {
            self.needs_placement = true;
            Invalidation::PLACEMENT | Invalidation::RENDER
        } else {
            Invalidation::RENDER
        }
    }

    // --- Getters -----------------------------------------------------------

    /// The current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current scroll mode.
    pub fn scroll_mode(&self) -> ScrollMode {
        self.config.scroll_mode
    }

    /// Geometry from the last successful layout.
    pub fn geometry(&self) -> Option<ResolvedGeometry> {
        self.geometry
    }

    /// Resolved block size from the last successful layout.
    pub fn block_size(&self) -> Option<Size> {
        self.geometry.map(|g| g.block)
    }

    /// Effective max scroll distance from the last successful layout.
    pub fn max_scroll_distance(&self) -> Option<f64> {
        self.geometry.map(|g| g.max_scroll_distance)
    }

    /// The current placement, if blocks have been placed.
    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Center-to-center distance realized by the current placement.
    pub fn real_scroll_distance(&self) -> Option<f64> {
        self.placement.map(|p| p.real_scroll_distance)
    }

    /// Live origin of the movable block.
    pub fn start_position(&self) -> Point {
        self.start
    }

    /// Origin the movable block was placed at; where [`reset`](Self::reset)
    /// returns it.
    pub fn original_start_position(&self) -> Option<Point> {
        self.placement.map(|p| p.start)
    }

    /// Origin of the target block.
    pub fn target_position(&self) -> Option<Point> {
        self.placement.map(|p| p.target)
    }

    /// Rotation currently applied to both block shapes, in degrees.
    pub fn rotation_degree(&self) -> f64 {
        self.rotation
    }

    /// Background texture region masked into the movable block.
    pub fn texture_rect(&self) -> Option<Rect> {
        self.placement.map(|_| self.texture_rect)
    }

    /// Whether a pointer gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// Whether the next render will place the blocks again.
    pub fn needs_placement(&self) -> bool {
        self.needs_placement
    }
}
