//! Dispatch benchmark: routing event paths through handler tries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use panemux::dispatch::{fields, Dispatch};
use panemux::event::{Event, MouseButton};
use panemux::Point;

/// A trie with handlers spread over the usual event categories.
fn populated(depth_handlers: usize) -> Dispatch {
    let d = Dispatch::new();
    for _ in 0..depth_handlers {
        d.on("", |_| false);
        d.on("mo", |_| false);
        d.on("kb/type", |_| false);
        d.on("kb/down", |_| false);
    }
    d.on("mo/down", |rest| fields::<i32>(rest.rsplit_once('/').map_or(rest, |(xy, _)| xy)).is_ok());
    d
}

fn happen_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_happen");

    for handlers in [1usize, 8, 32] {
        let d = populated(handlers);
        group.bench_with_input(BenchmarkId::new("mouse_down", handlers), &d, |b, d| {
            b.iter(|| d.happen(black_box("mo/down/120/45/left")));
        });
        group.bench_with_input(BenchmarkId::new("unmatched", handlers), &d, |b, d| {
            b.iter(|| d.happen(black_box("wi/refresh")));
        });
    }

    group.finish();
}

fn happen_typed_event(c: &mut Criterion) {
    let d = populated(4);
    let event = Event::MouseDown {
        at: Point::new(120, 45),
        button: MouseButton::Left,
    };

    c.bench_function("dispatch_happen_event", |b| {
        b.iter(|| d.happen_event(black_box(&event)));
    });
}

criterion_group!(benches, happen_paths, happen_typed_event);
criterion_main!(benches);
