//! Benchmarks for pose smoothing performance

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fencing_pose::{
    filters::{exponential::ExponentialPoseFilter, recency_weighted::RecencyWeightedSmoother, NoFilter, PoseFilter},
    pose::{Keypoint, Landmark, Pose},
    stability::StabilityTracker,
    geometry::Point,
};

/// Full-body poses of a fencer swaying on the spot with detector jitter
fn noisy_poses(count: usize) -> Vec<Pose> {
    (0..count)
        .map(|i| {
            let t = i as f64 * 0.1;
            let sway = 10.0 * t.sin();
            let keypoints = Landmark::ALL
                .iter()
                .map(|&name| {
                    let base_x = 250.0 + name.index() as f64 * 12.0;
                    let base_y = 100.0 + name.index() as f64 * 20.0;
                    Keypoint::new(
                        name,
                        base_x + sway + 2.0 * rand::random::<f64>(),
                        base_y + 2.0 * rand::random::<f64>(),
                        0.5 + 0.5 * rand::random::<f64>(),
                    )
                })
                .collect();
            Pose::new(keypoints, i as u64 * 33)
        })
        .collect()
}

fn benchmark_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");

    let test_data = noisy_poses(100);

    let filter_configs = vec![
        ("no_filter", Box::new(NoFilter) as Box<dyn PoseFilter>),
        ("recency_5_3", Box::new(RecencyWeightedSmoother::new(5, 3))),
        ("recency_10_3", Box::new(RecencyWeightedSmoother::new(10, 3))),
        ("exponential_0.5", Box::new(ExponentialPoseFilter::new(0.5))),
        ("exponential_0.8", Box::new(ExponentialPoseFilter::new(0.8))),
    ];

    for (name, mut filter) in filter_configs {
        group.bench_with_input(BenchmarkId::new("single_update", name), &test_data[0], |b, pose| {
            b.iter(|| black_box(filter.apply(black_box(pose))));
        });

        group.bench_with_input(BenchmarkId::new("sequence_100", name), &test_data, |b, data| {
            b.iter(|| {
                filter.reset();
                for pose in data {
                    black_box(filter.apply(black_box(pose)));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_history_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_capacity");
    let test_data = noisy_poses(50);

    for capacity in [3, 5, 10, 20] {
        let mut smoother = RecencyWeightedSmoother::new(capacity, 1);

        group.bench_with_input(BenchmarkId::new("capacity", capacity), &test_data, |b, data| {
            b.iter(|| {
                smoother.reset();
                for pose in data {
                    black_box(smoother.apply(black_box(pose)));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_stability_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("stability_window");

    for window_size in [5, 15, 30] {
        let mut tracker = StabilityTracker::new(window_size, 20.0);

        group.bench_with_input(BenchmarkId::new("window_size", window_size), &window_size, |b, &n| {
            b.iter(|| {
                tracker.reset();
                for i in 0..n {
                    let x = 320.0 + (i as f64 * 0.3).sin() * 3.0;
                    black_box(tracker.update(black_box(Point::new(x, 280.0))));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_filters,
    benchmark_history_capacity,
    benchmark_stability_window
);
criterion_main!(benches);
