//! Tests for smoothing output accuracy comparing with expected values


use fencing_pose::{
    filters::create_filter,
    pose::{Keypoint, Landmark, Pose},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use test_helpers::{assert_pose_finite, create_test_filter, en_garde_pose, shifted_en_garde};

fn knee(x: f64, y: f64, t: u64) -> Pose {
    Pose::new(vec![Keypoint::new(Landmark::LeftKnee, x, y, 0.9)], t)
}

fn knee_x(pose: &Pose) -> f64 {
    pose.keypoint(Landmark::LeftKnee).map_or(f64::NAN, |kp| kp.x)
}

/// Test that filters produce expected output values
#[test]
fn test_smoothing_output_accuracy() {
    // Recency-weighted smoother
    {
        let mut filter = create_filter("recency:3:2").unwrap();

        let out = filter.apply(&knee(3.0, 6.0, 0));
        assert_eq!(knee_x(&out), 3.0, "First pose passes through");

        // Weights 1 and 1/2 over [6, 3]
        let out = filter.apply(&knee(6.0, 9.0, 1));
        assert!((knee_x(&out) - 5.0).abs() < 1e-9);

        // Weights 1, 1/2, 1/3 over [9, 6, 3]
        let out = filter.apply(&knee(9.0, 12.0, 2));
        let expected = (9.0 + 3.0 + 1.0) / (1.0 + 0.5 + 1.0 / 3.0);
        assert!((knee_x(&out) - expected).abs() < 1e-9);

        // Capacity 3: the first pose has dropped out
        let out = filter.apply(&knee(12.0, 15.0, 3));
        let expected = (12.0 + 4.5 + 2.0) / (1.0 + 0.5 + 1.0 / 3.0);
        assert!((knee_x(&out) - expected).abs() < 1e-9);
        assert_eq!(out.timestamp_ms, 3);
    }

    // Exponential filter
    {
        let mut filter = create_filter("exponential:0.5").unwrap();

        assert_eq!(knee_x(&filter.apply(&knee(10.0, 20.0, 0))), 10.0, "First value initializes filter");
        assert_eq!(knee_x(&filter.apply(&knee(20.0, 40.0, 1))), 15.0, "0.5 * 10 + 0.5 * 20 = 15");
        assert_eq!(knee_x(&filter.apply(&knee(30.0, 60.0, 2))), 22.5, "0.5 * 15 + 0.5 * 30 = 22.5");
    }

    // No filter (passthrough)
    {
        let mut filter = create_filter("none").unwrap();
        let pose = en_garde_pose(9);
        assert_eq!(filter.apply(&pose), pose, "NoFilter should pass poses through unchanged");
    }
}

/// Test filter convergence behavior
#[test]
fn test_smoothing_converges_to_constant_input() {
    for name in ["recency", "exponential"] {
        let mut filter = create_test_filter(name).unwrap();

        let mut out = Pose::default();
        for t in 0..50 {
            out = filter.apply(&knee(42.0, 84.0, t));
        }
        assert!((knee_x(&out) - 42.0).abs() < 1e-9, "{name} should settle on 42");
    }
}

/// Test that smoothing reduces jitter on a still fencer
#[test]
fn test_smoothing_reduces_noise() {
    let mut rng = StdRng::seed_from_u64(7);
    let noisy: Vec<Pose> = (0..200)
        .map(|t| shifted_en_garde(rng.gen_range(-4.0..4.0), rng.gen_range(-4.0..4.0), t))
        .collect();

    for name in ["recency", "exponential"] {
        let mut filter = create_test_filter(name).unwrap();

        let mut raw_error = 0.0;
        let mut smoothed_error = 0.0;
        for pose in &noisy {
            let out = filter.apply(pose);
            assert_pose_finite(&out);
            let raw = pose.get(Landmark::RightKnee).unwrap();
            let smooth = out.get(Landmark::RightKnee).unwrap();
            raw_error += (raw.x - 410.0).powi(2) + (raw.y - 360.0).powi(2);
            smoothed_error += (smooth.x - 410.0).powi(2) + (smooth.y - 360.0).powi(2);
        }

        assert!(
            smoothed_error < raw_error * 0.8,
            "{name}: smoothed {smoothed_error:.1} vs raw {raw_error:.1}"
        );
    }
}

/// Test that smoothing follows a fencer who moves
#[test]
fn test_smoothing_tracks_steady_motion() {
    let mut filter = create_test_filter("recency").unwrap();

    let mut out = Pose::default();
    for t in 0..30u32 {
        out = filter.apply(&shifted_en_garde(f64::from(t) * 5.0, 0.0, u64::from(t)));
    }

    // Lags behind the newest position but stays within the last few steps
    let nose = out.get(Landmark::Nose).unwrap();
    let newest = 320.0 + 29.0 * 5.0;
    assert!(nose.x < newest);
    assert!(nose.x > newest - 4.0 * 5.0);
}
