//! Benchmarks for the generation controller and gallery.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use videoai::{
    estimate_generation_secs, ControllerConfig, EndTimePolicy, Gallery, GenerationController,
    GenerationRequest, KeyValueStore, ManualClock, MemoryStore, Resolution, SessionState,
    VideoDuration,
};

const T0: i64 = 1_700_000_000_000;

fn running_controller(
    policy: EndTimePolicy,
) -> (GenerationController<MemoryStore, ManualClock>, ManualClock) {
    let clock = ManualClock::new(T0);
    let config = ControllerConfig::default().with_end_time_policy(policy);
    let mut controller = GenerationController::new(MemoryStore::new(), clock.clone(), config);
    let request = GenerationRequest::new("A spaceship flies through the stars")
        .with_duration(VideoDuration::Secs300)
        .with_resolution(Resolution::Uhd2160);
    controller.submit(&request).unwrap();
    (controller, clock)
}

fn bench_estimate(c: &mut Criterion) {
    c.bench_function("estimate_generation_secs", |b| {
        b.iter(|| {
            for resolution in ["1280x720", "1920x1080", "3840x2160", "640x480"] {
                black_box(estimate_generation_secs(black_box(300), resolution));
            }
        })
    });
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    for policy in [EndTimePolicy::Resync, EndTimePolicy::Pinned] {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, &policy| {
            let (mut controller, mut clock) = running_controller(policy);
            b.iter(|| {
                if !controller.is_generating() {
                    (controller, clock) = running_controller(policy);
                }
                clock.advance(1_000);
                black_box(controller.tick().unwrap())
            })
        });
    }
    group.finish();
}

fn bench_pure_tick(c: &mut Criterion) {
    c.bench_function("session_state_tick", |b| {
        let config = ControllerConfig::default();
        let request = GenerationRequest::new("x").with_duration(VideoDuration::Secs300);
        let (state, _) = SessionState::idle().start(&request, T0).unwrap();
        b.iter(|| black_box(state.tick(black_box(T0 + 1_000), &config)))
    });
}

fn bench_resume(c: &mut Criterion) {
    c.bench_function("resume", |b| {
        let (controller, clock) = running_controller(EndTimePolicy::Resync);
        let store = controller.store().clone();
        clock.advance(30_000);
        b.iter(|| {
            let mut reopened =
                GenerationController::new(&store, &clock, ControllerConfig::default());
            black_box(reopened.resume().unwrap())
        })
    });
}

fn bench_gallery(c: &mut Criterion) {
    let mut group = c.benchmark_group("gallery");
    for size in [10usize, 100] {
        group.bench_with_input(BenchmarkId::new("save", size), &size, |b, &size| {
            let store = MemoryStore::new();
            let gallery = Gallery::new(&store);
            for i in 0..size {
                gallery
                    .save("https://cdn.poehali.dev/placeholder.svg", "seed", i as i64)
                    .unwrap();
            }
            let snapshot = store.get("videoGallery").unwrap().unwrap_or_default();
            b.iter(|| {
                store.set("videoGallery", &snapshot).unwrap();
                black_box(
                    gallery
                        .save("https://cdn.poehali.dev/placeholder.svg", "Ocean waves", T0)
                        .unwrap(),
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("delete", size), &size, |b, &size| {
            let store = MemoryStore::new();
            let gallery = Gallery::new(&store);
            for i in 0..size {
                gallery
                    .save("https://cdn.poehali.dev/placeholder.svg", "seed", i as i64)
                    .unwrap();
            }
            let snapshot = store.get("videoGallery").unwrap().unwrap_or_default();
            let middle = (size / 2).to_string();
            b.iter(|| {
                store.set("videoGallery", &snapshot).unwrap();
                black_box(gallery.delete(&middle).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_estimate,
    bench_tick,
    bench_pure_tick,
    bench_resume,
    bench_gallery,
);

criterion_main!(benches);
