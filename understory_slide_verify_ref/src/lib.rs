// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_slide_verify_ref --heading-base-level=0

//! Understory Slide Verify Reference Compositor.
//!
//! This crate provides a small, stateful implementation of [`Compositor`]
//! that **records** what a [`RenderPlan`](understory_slide_verify::RenderPlan)
//! asks for, resolved to the values a real imaging backend would use:
//! - the full transform from a shape image's own pixels to container space,
//! - the texture region in the background image's own pixels.
//!
//! It does **not** rasterize. It is intended for tests and debugging that
//! want to assert on emitted layers without a GPU or pixel buffers.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{Affine, Rect, Size};
use peniko::BlendMode;
use understory_slide_verify::{BackgroundOp, BlockRole, BlockShape, BlockVisual, Compositor};

/// Nominal size of the built-in puzzle shapes.
pub const BUILTIN_SHAPE_SIZE: Size = Size::new(100.0, 100.0);

/// Background texture sampled into the movable block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureSample {
    /// Sampled region in container coordinates.
    pub container_rect: Rect,
    /// Sampled region in background image pixels, if a background was drawn
    /// earlier in the frame.
    pub image_rect: Option<Rect>,
    /// How the texture combines with the shape.
    pub blend: BlendMode,
}

/// Event recorded by the reference compositor.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Background layer.
    Background {
        /// The background op as received.
        op: BackgroundOp,
    },
    /// Block layer.
    Block {
        /// Which block was drawn.
        role: BlockRole,
        /// Shape drawn.
        shape: BlockShape,
        /// Size the shape image was assumed to have.
        shape_size: Size,
        /// Maps shape image pixels to container coordinates.
        transform: Affine,
        /// Texture masked into the block, if any.
        texture: Option<TextureSample>,
    },
}

/// Reference [`Compositor`] that records resolved draw events.
#[derive(Default, Debug)]
pub struct RefCompositor {
    events: Vec<Event>,
    /// Background of the current frame.
    background: Option<BackgroundOp>,
}

impl RefCompositor {
    /// Returns a slice of recorded events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Background drawn most recently, if any.
    pub fn background(&self) -> Option<&BackgroundOp> {
        self.background.as_ref()
    }

    /// Clears all recorded events and the frame state.
    pub fn clear_events(&mut self) {
        self.events.clear();
        self.background = None;
    }
}

/// Size of the image backing `shape`, falling back to `block` for custom
/// shapes without an intrinsic size.
pub fn shape_size(shape: &BlockShape, block: Size) -> Size {
    match shape {
        BlockShape::PuzzleShade | BlockShape::PuzzleOutline => BUILTIN_SHAPE_SIZE,
        BlockShape::Custom(_) => shape.intrinsic_size().unwrap_or(block),
    }
}

impl Compositor for RefCompositor {
    fn draw_background(&mut self, op: &BackgroundOp) {
        self.background = Some(*op);
        self.events.push(Event::Background { op: *op });
    }

    fn draw_block(&mut self, visual: &BlockVisual) {
        let shape_size = shape_size(&visual.shape, visual.rect.size());
        let texture = visual.texture.map(|texture| TextureSample {
            container_rect: texture.source_rect,
            image_rect: self
                .background
                .map(|bg| bg.transform.inverse().transform_rect_bbox(texture.source_rect)),
            blend: texture.blend,
        });
        self.events.push(Event::Block {
            role: visual.role,
            shape: visual.shape,
            shape_size,
            transform: visual.shape_transform(shape_size),
            texture,
        });
    }
}
