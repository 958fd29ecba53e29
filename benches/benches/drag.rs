// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use understory_slide_verify::{Config, PointerEvent, ScrollMode, SlideVerify};

fn ready_widget(mode: ScrollMode) -> SlideVerify {
    let config = Config::default()
        .with_scroll_mode(mode)
        .with_block_size(50.0, 50.0)
        .with_random_block_location(false);
    let mut widget = SlideVerify::with_rng(config, fastrand::Rng::with_seed(3))
        .expect("bench config is valid");
    widget.set_background(Some(Size::new(600.0, 800.0)));
    widget.layout(Size::new(300.0, 400.0)).expect("bench layout is valid");
    widget.render().expect("bench container fits both blocks");
    widget
}

fn bench_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag/gesture");

    for mode in [ScrollMode::HorizontalOnly, ScrollMode::Free] {
        group.bench_function(format!("{mode:?}/200_moves"), |b| {
            b.iter_batched(
                || ready_widget(mode),
                |mut widget| {
                    let from = widget.start_position() + kurbo::Vec2::new(25.0, 25.0);
                    widget.handle_pointer(PointerEvent::Down(from));
                    let mut to = from;
                    for step in 1..=200 {
                        to = Point::new(from.x + f64::from(step), from.y);
                        black_box(widget.handle_pointer(PointerEvent::Move(to)));
                    }
                    black_box(widget.handle_pointer(PointerEvent::Up(to)))
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut widget = ready_widget(ScrollMode::Free);
    c.bench_function("render/cached_placement", |b| {
        b.iter(|| black_box(widget.render()));
    });
}

criterion_group!(benches, bench_gesture, bench_render);
criterion_main!(benches);
