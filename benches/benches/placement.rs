// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use understory_slide_verify::{MaxScrollDistance, PlacementRequest, ScrollMode, place};

const MODES: [ScrollMode; 5] = [
    ScrollMode::HorizontalOnly,
    ScrollMode::VerticalOnly,
    ScrollMode::Free,
    ScrollMode::FreeHorizontalBias,
    ScrollMode::FreeVerticalBias,
];

fn request(mode: ScrollMode, container: Size) -> PlacementRequest {
    PlacementRequest {
        mode,
        container,
        block: Size::new(
            (container.width / 6.0).floor(),
            (container.height / 4.0).floor(),
        ),
        padding: 5.0,
        max_scroll_distance: MaxScrollDistance::Derived,
        avoid_too_close: true,
        random_location: true,
        preferred_start: Point::ZERO,
    }
}

fn bench_place_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement/mode");
    let container = Size::new(300.0, 400.0);

    for mode in MODES {
        let req = request(mode, container);
        let mut rng = fastrand::Rng::with_seed(0x51de);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{mode:?}")), &req, |b, req| {
            b.iter(|| black_box(place(black_box(req), &mut rng)));
        });
    }

    group.finish();
}

fn bench_free_cramped(c: &mut Criterion) {
    // Containers barely larger than two blocks, where rejection sampling
    // approaches the attempt ceiling.
    let mut group = c.benchmark_group("placement/free_cramped");

    for width in [130.0_f64, 160.0, 220.0, 400.0] {
        let mut req = request(ScrollMode::Free, Size::new(width, 120.0));
        req.block = Size::new(60.0, 50.0);
        let mut rng = fastrand::Rng::with_seed(7);
        group.bench_with_input(BenchmarkId::from_parameter(width), &req, |b, req| {
            b.iter(|| black_box(place(black_box(req), &mut rng)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_place_modes, bench_free_cramped);
criterion_main!(benches);
