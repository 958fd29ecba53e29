// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget configuration: scroll modes, block shapes, and validated options.

use core::fmt;

use kurbo::Size;
use thiserror::Error;

use crate::verify::CenterRule;

/// Constraint profile governing which axes placement and dragging may use.
///
/// The bias modes only bias *placement*: dragging in
/// [`FreeHorizontalBias`](Self::FreeHorizontalBias) and
/// [`FreeVerticalBias`](Self::FreeVerticalBias) moves both axes, exactly like
/// [`Free`](Self::Free).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScrollMode {
    /// Target directly to the right of the start block; drag along x only.
    HorizontalOnly,
    /// Target directly below the start block; drag along y only.
    VerticalOnly,
    /// Target anywhere that does not collide with the start block; free drag.
    #[default]
    Free,
    /// Target placed as in [`HorizontalOnly`](Self::HorizontalOnly); free drag.
    FreeHorizontalBias,
    /// Target placed as in [`VerticalOnly`](Self::VerticalOnly); free drag.
    FreeVerticalBias,
}

/// Placement strategy selected by a [`ScrollMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementAxis {
    /// Closed-form placement along x, target on the start's row.
    Horizontal,
    /// Closed-form placement along y, target on the start's column.
    Vertical,
    /// Rejection sampling over both axes.
    Free,
}

impl ScrollMode {
    /// Which placement algorithm this mode runs.
    #[must_use]
    pub const fn placement_axis(self) -> PlacementAxis {
        match self {
            Self::HorizontalOnly | Self::FreeHorizontalBias => PlacementAxis::Horizontal,
            Self::VerticalOnly | Self::FreeVerticalBias => PlacementAxis::Vertical,
            Self::Free => PlacementAxis::Free,
        }
    }

    /// Whether a drag may move the block along x.
    #[must_use]
    pub const fn drags_x(self) -> bool {
        !matches!(self, Self::VerticalOnly)
    }

    /// Whether a drag may move the block along y.
    #[must_use]
    pub const fn drags_y(self) -> bool {
        !matches!(self, Self::HorizontalOnly)
    }

    /// Numeric code used by attribute files (`1..=5`).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::HorizontalOnly => 1,
            Self::VerticalOnly => 2,
            Self::Free => 3,
            Self::FreeHorizontalBias => 4,
            Self::FreeVerticalBias => 5,
        }
    }
}

impl TryFrom<u8> for ScrollMode {
    type Error = ConfigError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::HorizontalOnly),
            2 => Ok(Self::VerticalOnly),
            3 => Ok(Self::Free),
            4 => Ok(Self::FreeHorizontalBias),
            5 => Ok(Self::FreeVerticalBias),
            other => Err(ConfigError::UnknownScrollMode(other)),
        }
    }
}

/// Opaque handle to a host-owned shape image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShapeId(pub u64);

/// A host-provided shape image used for a block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeAsset {
    /// Host handle for the image.
    pub id: ShapeId,
    /// Natural size of the image, if it has one.
    ///
    /// A positive intrinsic size on the movable shape is used as the block
    /// size when no explicit size is configured.
    pub intrinsic_size: Option<Size>,
}

/// Shape drawn for a block.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum BlockShape {
    /// Built-in puzzle piece, filled; the default movable shape.
    #[default]
    PuzzleShade,
    /// Built-in puzzle piece silhouette; the default target shape.
    PuzzleOutline,
    /// A host asset.
    Custom(ShapeAsset),
}

impl BlockShape {
    /// Intrinsic size of the shape, if it has a positive one.
    ///
    /// Built-in shapes are resolution independent and report `None`.
    #[must_use]
    pub fn intrinsic_size(&self) -> Option<Size> {
        match self {
            Self::Custom(asset) => asset
                .intrinsic_size
                .filter(|size| size.width > 0.0 && size.height > 0.0),
            Self::PuzzleShade | Self::PuzzleOutline => None,
        }
    }
}

/// Upper bound on the start-to-target distance used as a placement hint.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum MaxScrollDistance {
    /// Use all the space available along the placement axis.
    #[default]
    Derived,
    /// A fixed distance in pixels, capped by the available space.
    Fixed(f64),
}

/// Width or height, for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Horizontal extent.
    Width,
    /// Vertical extent.
    Height,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Width => "width",
            Self::Height => "height",
        })
    }
}

/// Invalid configuration, rejected before any state changes.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A block divide factor was zero.
    #[error("block {dimension} divide factor must be greater than zero")]
    ZeroDivide {
        /// Which divide factor.
        dimension: Dimension,
    },
    /// A block size was not a positive, finite number of pixels.
    #[error("block {dimension} must be positive and finite, got {value}")]
    InvalidBlockSize {
        /// Which side of the block.
        dimension: Dimension,
        /// The rejected value.
        value: f64,
    },
    /// A length option was negative or not finite.
    #[error("{field} must be non-negative and finite, got {value}")]
    InvalidLength {
        /// Name of the option.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A rotation was not finite.
    #[error("rotate degree must be finite, got {0}")]
    InvalidRotation(f64),
    /// A scroll mode code outside `1..=5`.
    #[error("unknown scroll mode code {0}")]
    UnknownScrollMode(u8),
}

/// Default padding, in density-independent pixels.
pub const DEFAULT_PADDING_DP: f64 = 5.0;
/// Default verification tolerance, in density-independent pixels.
pub const DEFAULT_VALID_OFFSET_DP: f64 = 1.0;
/// Default number of block widths that fit across the container.
pub const DEFAULT_BLOCK_WIDTH_DIVIDE: u32 = 6;
/// Default number of block heights that fit down the container.
pub const DEFAULT_BLOCK_HEIGHT_DIVIDE: u32 = 4;

/// Configuration for a [`SlideVerify`](crate::SlideVerify) widget.
///
/// All lengths are in device pixels. A block size of `0.0` means "derive it"
/// (from the movable shape's intrinsic size, else from the divide factors).
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Placement and drag constraint profile.
    pub scroll_mode: ScrollMode,
    /// Explicit block width, or `0.0` to derive.
    pub block_width: f64,
    /// Explicit block height, or `0.0` to derive.
    pub block_height: f64,
    /// Derived block width is `floor(container width / block_width_divide)`.
    pub block_width_divide: u32,
    /// Derived block height is `floor(container height / block_height_divide)`.
    pub block_height_divide: u32,
    /// Inset from the container edges that blocks never cross.
    pub padding: f64,
    /// Shape of the movable block.
    pub movable_shape: BlockShape,
    /// Shape of the target silhouette.
    pub target_shape: BlockShape,
    /// Placement hint for the start-to-target distance.
    pub max_scroll_distance: MaxScrollDistance,
    /// Whether pointer input may drag the block at all.
    pub block_touchable: bool,
    /// Tolerance radius for a successful verification.
    pub valid_offset: f64,
    /// Fixed rotation of the block shapes, in degrees.
    pub rotate_degree: f64,
    /// Re-roll the rotation in `[0, 270)` on every placement and reset.
    pub random_rotate: bool,
    /// Place the start block randomly instead of near its previous position.
    pub random_block_location: bool,
    /// Keep start and target from being generated too close together.
    pub avoid_too_close: bool,
    /// How block centers are computed during verification.
    pub center_rule: CenterRule,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_scale_factor(1.0)
    }
}

impl Config {
    /// Default configuration with density-independent lengths scaled by
    /// `scale` device pixels per dp.
    #[must_use]
    pub fn for_scale_factor(scale: f64) -> Self {
        Self {
            scroll_mode: ScrollMode::default(),
            block_width: 0.0,
            block_height: 0.0,
            block_width_divide: DEFAULT_BLOCK_WIDTH_DIVIDE,
            block_height_divide: DEFAULT_BLOCK_HEIGHT_DIVIDE,
            padding: DEFAULT_PADDING_DP * scale,
            movable_shape: BlockShape::PuzzleShade,
            target_shape: BlockShape::PuzzleOutline,
            max_scroll_distance: MaxScrollDistance::Derived,
            block_touchable: true,
            valid_offset: DEFAULT_VALID_OFFSET_DP * scale,
            rotate_degree: 0.0,
            random_rotate: false,
            random_block_location: true,
            avoid_too_close: true,
            center_rule: CenterRule::default(),
        }
    }

    /// Sets the scroll mode.
    #[must_use]
    pub fn with_scroll_mode(mut self, mode: ScrollMode) -> Self {
        self.scroll_mode = mode;
        self
    }

    /// Sets an explicit block size; `0.0` on an axis derives that axis.
    #[must_use]
    pub fn with_block_size(mut self, width: f64, height: f64) -> Self {
        self.block_width = width;
        self.block_height = height;
        self
    }

    /// Sets the divide factors used to derive the block size.
    #[must_use]
    pub fn with_block_divide(mut self, width_divide: u32, height_divide: u32) -> Self {
        self.block_width_divide = width_divide;
        self.block_height_divide = height_divide;
        self
    }

    /// Sets the padding.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the block shapes.
    #[must_use]
    pub fn with_shapes(mut self, movable: BlockShape, target: BlockShape) -> Self {
        self.movable_shape = movable;
        self.target_shape = target;
        self
    }

    /// Sets the max scroll distance hint.
    #[must_use]
    pub fn with_max_scroll_distance(mut self, distance: MaxScrollDistance) -> Self {
        self.max_scroll_distance = distance;
        self
    }

    /// Sets whether the block can be dragged.
    #[must_use]
    pub fn with_block_touchable(mut self, touchable: bool) -> Self {
        self.block_touchable = touchable;
        self
    }

    /// Sets the verification tolerance.
    #[must_use]
    pub fn with_valid_offset(mut self, offset: f64) -> Self {
        self.valid_offset = offset;
        self
    }

    /// Sets a fixed rotation and whether it is re-rolled randomly.
    #[must_use]
    pub fn with_rotation(mut self, degree: f64, random: bool) -> Self {
        self.rotate_degree = degree;
        self.random_rotate = random;
        self
    }

    /// Sets whether the start block is placed randomly.
    #[must_use]
    pub fn with_random_block_location(mut self, random: bool) -> Self {
        self.random_block_location = random;
        self
    }

    /// Sets whether placement avoids generating blocks too close together.
    #[must_use]
    pub fn with_avoid_too_close(mut self, avoid: bool) -> Self {
        self.avoid_too_close = avoid;
        self
    }

    /// Sets how verification computes block centers.
    #[must_use]
    pub fn with_center_rule(mut self, rule: CenterRule) -> Self {
        self.center_rule = rule;
        self
    }

    /// Checks every option, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_width_divide == 0 {
            return Err(ConfigError::ZeroDivide {
                dimension: Dimension::Width,
            });
        }
        if self.block_height_divide == 0 {
            return Err(ConfigError::ZeroDivide {
                dimension: Dimension::Height,
            });
        }
        // Zero is the "derive" value, so only negative sizes are rejected here.
        check_block_size(Dimension::Width, self.block_width, true)?;
        check_block_size(Dimension::Height, self.block_height, true)?;
        check_length("padding", self.padding)?;
        check_length("valid offset", self.valid_offset)?;
        if let MaxScrollDistance::Fixed(distance) = self.max_scroll_distance {
            check_length("max scroll distance", distance)?;
        }
        if !self.rotate_degree.is_finite() {
            return Err(ConfigError::InvalidRotation(self.rotate_degree));
        }
        Ok(())
    }
}

pub(crate) fn check_block_size(
    dimension: Dimension,
    value: f64,
    allow_zero: bool,
) -> Result<(), ConfigError> {
    let ok = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidBlockSize { dimension, value })
    }
}

pub(crate) fn check_length(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidLength { field, value })
    }
}
