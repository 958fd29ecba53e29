// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composition contract: what to draw, not how.
//!
//! [`SlideVerify::render`](crate::SlideVerify::render) produces a
//! [`RenderPlan`], a small plain-data description of the three layers of the
//! widget. Hosts either read the plan directly or implement [`Compositor`]
//! and call [`RenderPlan::replay`], which issues the layers in draw order:
//! background, then the target silhouette, then the movable block on top.
//!
//! Shape images are never touched here. A block visual only says which shape
//! to draw, where, and with which transform; scaling, rotation, and the
//! multiply mask are performed by the host's imaging backend.

use kurbo::{Affine, Point, Rect, Size};
use peniko::{BlendMode, Compose, Mix};

use crate::config::BlockShape;
use crate::geometry::block_rect;

/// Blend used to stamp the background texture into the movable shape.
pub const TEXTURE_BLEND: BlendMode = BlendMode::new(Mix::Multiply, Compose::SrcOver);

/// The background image, stretched to exactly fill the container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundOp {
    /// Natural size of the source image.
    pub source_size: Size,
    /// Destination rectangle, the whole container.
    pub dest: Rect,
    /// Maps source image pixels onto `dest`.
    pub transform: Affine,
}

impl BackgroundOp {
    /// Background stretched from `source_size` onto `container`.
    #[must_use]
    pub fn fill(source_size: Size, container: Size) -> Self {
        Self {
            source_size,
            dest: Rect::from_origin_size(Point::ZERO, container),
            transform: Affine::scale_non_uniform(
                container.width / source_size.width,
                container.height / source_size.height,
            ),
        }
    }
}

/// Background texture masked into the movable block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureMask {
    /// Region of the (container sized) background to sample, captured under
    /// the target block at placement time.
    pub source_rect: Rect,
    /// How the texture combines with the shape.
    pub blend: BlendMode,
}

/// Which block a [`BlockVisual`] draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockRole {
    /// The stationary silhouette.
    Target,
    /// The draggable piece.
    Movable,
}

/// One block, ready to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockVisual {
    /// Which block this is.
    pub role: BlockRole,
    /// Shape to draw.
    pub shape: BlockShape,
    /// Where the block sits in the container.
    pub rect: Rect,
    /// Rotation of the shape, in degrees.
    pub rotation_degrees: f64,
    /// Maps block-sized shape coordinates to block-local coordinates:
    /// rotation about the block center, then a re-scale of the rotated
    /// bounding box back to the block size.
    pub rotation_fit: Affine,
    /// Texture for the movable block; `None` for the undecorated target.
    pub texture: Option<TextureMask>,
}

impl BlockVisual {
    /// Transform from a shape image of `intrinsic` size to container space.
    ///
    /// This scales the image to the block size, applies
    /// [`rotation_fit`](Self::rotation_fit), and moves it to the block origin.
    #[must_use]
    pub fn shape_transform(&self, intrinsic: Size) -> Affine {
        let block = self.rect.size();
        Affine::translate(self.rect.origin().to_vec2())
            * self.rotation_fit
            * Affine::scale_non_uniform(
                block.width / intrinsic.width,
                block.height / intrinsic.height,
            )
    }
}

/// Everything a host needs to draw one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderPlan {
    /// Background layer.
    pub background: BackgroundOp,
    /// Target silhouette, drawn under the movable block.
    pub target: BlockVisual,
    /// Movable block, drawn last.
    pub movable: BlockVisual,
}

impl RenderPlan {
    /// Issues the plan's layers to `compositor` in draw order.
    pub fn replay<C: Compositor + ?Sized>(&self, compositor: &mut C) {
        compositor.draw_background(&self.background);
        compositor.draw_block(&self.target);
        compositor.draw_block(&self.movable);
    }
}

/// Imaging backend that realizes a [`RenderPlan`].
pub trait Compositor {
    /// Draw the background layer.
    fn draw_background(&mut self, op: &BackgroundOp);
    /// Draw a block layer.
    fn draw_block(&mut self, visual: &BlockVisual);
}

/// Rotation about the block center, re-scaled so the rotated bounding box
/// fills the block again.
///
/// Returns the identity for a zero rotation.
#[must_use]
pub fn rotation_fit(block: Size, degrees: f64) -> Affine {
    if degrees == 0.0 {
        return Affine::IDENTITY;
    }
    let bounds = Rect::from_origin_size(Point::ZERO, block);
    let rotate = Affine::rotate_about(degrees.to_radians(), bounds.center());
    let rotated = rotate.transform_rect_bbox(bounds);
    Affine::scale_non_uniform(
        block.width / rotated.width(),
        block.height / rotated.height(),
    ) * Affine::translate(-rotated.origin().to_vec2())
        * rotate
}

pub(crate) fn block_visual(
    role: BlockRole,
    shape: BlockShape,
    origin: Point,
    block: Size,
    rotation_degrees: f64,
    texture: Option<TextureMask>,
) -> BlockVisual {
    BlockVisual {
        role,
        shape,
        rect: block_rect(origin, block),
        rotation_degrees,
        rotation_fit: rotation_fit(block, rotation_degrees),
        texture,
    }
}
