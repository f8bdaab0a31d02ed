//! Event channel benchmark: queueing throughput and mux fan-out latency.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use panemux::event::{self, Event};
use panemux::layout::{mount, Grid};
use panemux::{env, Point, Rect};
use std::time::Duration;

fn send_then_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_channel");

    for n in [100usize, 10_000] {
        group.bench_with_input(BenchmarkId::new("send_then_drain", n), &n, |b, &n| {
            b.iter(|| {
                let (rx, tx) = event::channel();
                for i in 0..n {
                    tx.send(Event::MouseMove(Point::new(i as i32, 0))).ok();
                }
                tx.close();
                black_box(rx.into_iter().count())
            });
        });
    }

    group.finish();
}

fn mux_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("mux_fan_out");

    for children in [1usize, 4, 16] {
        let (parent, host) = env::pair();
        let (_master, envs) = mount(parent, Grid::with_rows(vec![children]));
        // Settle the initial layout so the benchmark only measures events.
        host.events.send(Event::Resize(Rect::from_size(640, 480))).ok();
        host.draws.recv_timeout(Duration::from_secs(1)).ok();
        for env in &envs {
            env.next_event();
        }

        group.bench_with_input(BenchmarkId::new("key_to_all", children), &envs, |b, envs| {
            b.iter(|| {
                host.events.send(Event::KeyType('x')).ok();
                for env in envs {
                    black_box(env.next_event());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, send_then_drain, mux_fan_out);
criterion_main!(benches);
