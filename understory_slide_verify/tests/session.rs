// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end sessions against the public `SlideVerify` API.
//!
//! These drive the widget the way a host would: layout, render, a stream of
//! pointer events, then reading the verification result and the render plan.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use understory_slide_verify::{
    BackgroundOp, BlockRole, BlockShape, BlockVisual, CenterRule, Compositor, Config,
    Invalidation, MaxScrollDistance, PointerEvent, PointerResponse, ScrollMode, ShapeAsset,
    ShapeId, SlideVerify,
};

const CONTAINER: Size = Size::new(300.0, 400.0);
const BACKGROUND: Size = Size::new(1200.0, 1600.0);

const ALL_MODES: [ScrollMode; 5] = [
    ScrollMode::HorizontalOnly,
    ScrollMode::VerticalOnly,
    ScrollMode::Free,
    ScrollMode::FreeHorizontalBias,
    ScrollMode::FreeVerticalBias,
];

fn ready(config: Config, seed: u64) -> SlideVerify {
    let mut widget = SlideVerify::with_rng(config, fastrand::Rng::with_seed(seed)).unwrap();
    widget.set_background(Some(BACKGROUND));
    widget.layout(CONTAINER).unwrap();
    widget.render().unwrap();
    widget
}

fn block_center(widget: &SlideVerify) -> Point {
    let block = widget.block_size().unwrap();
    Rect::from_origin_size(widget.start_position(), block).center()
}

/// Drags from the block center toward `target_center` in steps small enough
/// for the pointer to stay over the block.
fn drag_center_to(widget: &mut SlideVerify, target_center: Point) -> PointerResponse {
    const STEPS: u32 = 512;
    let from = block_center(widget);
    let delta = target_center - from;
    widget.handle_pointer(PointerEvent::Down(from));
    let mut to = from;
    for step in 1..=STEPS {
        to = from + delta * (f64::from(step) / f64::from(STEPS));
        widget.handle_pointer(PointerEvent::Move(to));
    }
    widget.handle_pointer(PointerEvent::Up(to))
}

#[test]
fn solving_the_puzzle_passes_in_every_mode() {
    for (seed, mode) in (1_u64..).zip(ALL_MODES) {
        let config = Config::default().with_scroll_mode(mode).with_valid_offset(3.0);
        let mut widget = ready(config, seed);
        let block = widget.block_size().unwrap();
        let target = widget.target_position().unwrap();
        let target_center = Rect::from_origin_size(target, block).center();

        let response = drag_center_to(&mut widget, target_center);

        assert_eq!(response.verified, Some(true), "{mode:?}");
        let placement = widget.placement().unwrap();
        assert!(
            widget.start_position().distance(placement.target) <= 3.0,
            "{mode:?}: {:?} vs {:?}",
            widget.start_position(),
            placement.target
        );
    }
}

#[test]
fn drag_never_leaves_the_padded_container() {
    let corners = [
        Point::new(-1_000.0, -1_000.0),
        Point::new(1_000.0, -1_000.0),
        Point::new(1_000.0, 1_000.0),
        Point::new(-1_000.0, 1_000.0),
    ];
    for mode in ALL_MODES {
        let mut widget = ready(Config::default().with_scroll_mode(mode), 99);
        let bounds = widget.geometry().unwrap().origin_bounds();
        for corner in corners {
            drag_center_to(&mut widget, corner);
            let start = widget.start_position();
            assert!(
                start.x >= bounds.x0 && start.x <= bounds.x1,
                "{mode:?} x {start:?} outside {bounds:?}"
            );
            assert!(
                start.y >= bounds.y0 && start.y <= bounds.y1,
                "{mode:?} y {start:?} outside {bounds:?}"
            );
        }
    }
}

#[test]
fn axis_locked_modes_keep_the_cross_axis() {
    let mut widget = ready(
        Config::default().with_scroll_mode(ScrollMode::VerticalOnly),
        5,
    );
    let original = widget.start_position();
    let center = block_center(&widget);
    drag_center_to(&mut widget, center + kurbo::Vec2::new(10.0, 20.0));
    assert_eq!(widget.start_position().x, original.x);
    assert!((widget.start_position().y - (original.y + 20.0)).abs() < 1e-9);
}

#[test]
fn listener_sees_the_same_result_as_the_response() {
    let mut widget = ready(Config::default(), 21);
    let seen = Rc::new(Cell::new(None));
    let sink = seen.clone();
    widget.set_verify_listener(move |passed| sink.set(Some(passed)));

    let far = Point::new(10_000.0, 10_000.0);
    let response = drag_center_to(&mut widget, far);
    assert_eq!(seen.get(), response.verified);

    // A tap reports nothing.
    seen.set(None);
    let center = block_center(&widget);
    widget.handle_pointer(PointerEvent::Down(center));
    widget.handle_pointer(PointerEvent::Up(center));
    assert_eq!(seen.get(), None);
}

#[test]
fn reset_is_idempotent_and_keeps_the_puzzle() {
    let mut widget = ready(Config::default(), 8);
    let placement = widget.placement().unwrap();
    drag_center_to(&mut widget, Point::new(150.0, 200.0));

    widget.reset();
    let once = (widget.start_position(), widget.target_position());
    widget.reset();
    let twice = (widget.start_position(), widget.target_position());

    assert_eq!(once, twice);
    assert_eq!(once.0, placement.start);
    assert_eq!(widget.original_start_position(), Some(placement.start));
    assert_eq!(once.1, Some(placement.target));
}

#[test]
fn legacy_center_rule_doubles_the_tolerance() {
    let config = Config::default()
        .with_scroll_mode(ScrollMode::HorizontalOnly)
        .with_block_size(50.0, 50.0)
        .with_padding(10.0)
        .with_random_block_location(false)
        .with_valid_offset(2.0);

    // Stop 3px short of the target at (240, 10).
    let short = Point::new(237.0 + 25.0, 35.0);

    let mut geometric = ready(config.clone(), 1);
    assert_eq!(drag_center_to(&mut geometric, short).verified, Some(false));

    let mut legacy = ready(config.with_center_rule(CenterRule::Legacy), 1);
    assert_eq!(drag_center_to(&mut legacy, short).verified, Some(true));
}

#[test]
fn fixed_max_scroll_distance_shortens_the_puzzle() {
    let config = Config::default()
        .with_scroll_mode(ScrollMode::HorizontalOnly)
        .with_block_size(50.0, 50.0)
        .with_padding(10.0)
        .with_random_block_location(false)
        .with_max_scroll_distance(MaxScrollDistance::Fixed(40.0));
    let widget = ready(config, 1);
    assert_eq!(widget.max_scroll_distance(), Some(40.0));
    assert_eq!(widget.start_position(), Point::new(10.0, 10.0));
    // The fixed distance is measured between the start's far edge and the
    // target's origin, so the realized distance is max + block width.
    assert_eq!(widget.real_scroll_distance(), Some(90.0));
}

#[test]
fn custom_shape_drives_block_size_and_plan() {
    let movable = BlockShape::Custom(ShapeAsset {
        id: ShapeId(1),
        intrinsic_size: Some(Size::new(64.0, 48.0)),
    });
    let target = BlockShape::Custom(ShapeAsset {
        id: ShapeId(2),
        intrinsic_size: None,
    });
    let mut widget = ready(Config::default().with_shapes(movable, target), 3);
    assert_eq!(widget.block_size(), Some(Size::new(64.0, 48.0)));

    let plan = widget.render().unwrap();
    assert_eq!(plan.movable.shape, movable);
    assert_eq!(plan.target.shape, target);
    assert_eq!(plan.movable.rect.size(), Size::new(64.0, 48.0));
}

#[test]
fn plan_replays_into_a_compositor() {
    #[derive(Default)]
    struct Capture {
        background: Option<BackgroundOp>,
        blocks: Vec<BlockVisual>,
    }

    impl Compositor for Capture {
        fn draw_background(&mut self, op: &BackgroundOp) {
            self.background = Some(*op);
        }

        fn draw_block(&mut self, visual: &BlockVisual) {
            self.blocks.push(*visual);
        }
    }

    let mut widget = ready(Config::default().with_rotation(30.0, false), 4);
    let plan = widget.render().unwrap();
    let mut capture = Capture::default();
    plan.replay(&mut capture);

    let background = capture.background.unwrap();
    assert_eq!(background.source_size, BACKGROUND);
    assert_eq!(background.dest, Rect::new(0.0, 0.0, 300.0, 400.0));

    let roles: Vec<_> = capture.blocks.iter().map(|b| b.role).collect();
    assert_eq!(roles, [BlockRole::Target, BlockRole::Movable]);
    assert!(capture.blocks.iter().all(|b| b.rotation_degrees == 30.0));
    let texture = capture.blocks[1].texture.unwrap();
    assert_eq!(texture.source_rect, widget.texture_rect().unwrap());
}

#[test]
fn setters_report_what_to_redo() {
    let mut widget = ready(Config::default(), 6);

    assert_eq!(widget.set_padding(12.0).unwrap(), Invalidation::all());
    assert!(widget.needs_placement());
    widget.render().unwrap();

    assert_eq!(widget.set_valid_offset(4.0).unwrap(), Invalidation::empty());
    assert!(!widget.needs_placement());

    assert_eq!(widget.set_random_rotate(true), Invalidation::RENDER);
    assert_eq!(
        widget.set_scroll_mode(ScrollMode::VerticalOnly),
        Invalidation::PLACEMENT | Invalidation::RENDER
    );
    assert_eq!(
        widget.set_background(Some(BACKGROUND)),
        Invalidation::empty(),
        "same background is not a new puzzle"
    );
    assert!(widget.set_background(Some(Size::new(10.0, 10.0))).contains(Invalidation::PLACEMENT));
}

#[test]
fn too_small_container_renders_nothing_until_it_grows() {
    let config = Config::default()
        .with_scroll_mode(ScrollMode::HorizontalOnly)
        .with_block_size(80.0, 50.0);
    let mut widget = SlideVerify::with_rng(config, fastrand::Rng::with_seed(2)).unwrap();
    widget.set_background(Some(BACKGROUND));
    widget.layout(Size::new(150.0, 400.0)).unwrap();
    assert!(widget.render().is_err());
    assert!(widget.placement().is_none());

    // Pointer input without a placement is harmless.
    widget.handle_pointer(PointerEvent::Down(Point::new(20.0, 20.0)));
    widget.handle_pointer(PointerEvent::Move(Point::new(40.0, 20.0)));
    widget.handle_pointer(PointerEvent::Up(Point::new(40.0, 20.0)));
    assert_eq!(widget.start_position(), Point::ZERO);

    widget.layout(CONTAINER).unwrap();
    assert!(widget.render().is_ok());
}

#[test]
fn seeded_widgets_generate_identical_puzzles() {
    let a = ready(Config::default().with_rotation(0.0, true), 77);
    let b = ready(Config::default().with_rotation(0.0, true), 77);
    assert_eq!(a.placement(), b.placement());
    assert_eq!(a.rotation_degree(), b.rotation_degree());
}

#[test]
fn scale_factor_config_scales_padding() {
    let widget = ready(Config::for_scale_factor(2.0), 12);
    let geometry = widget.geometry().unwrap();
    assert_eq!(geometry.padding, 10.0);
    let bounds = geometry.origin_bounds();
    let start = widget.start_position();
    assert!(start.x >= bounds.x0 && start.y >= bounds.y0);
}
