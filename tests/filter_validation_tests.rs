//! Tests for filter and tracker parameter validation

use fencing_pose::{
    filters::{create_filter, exponential::ExponentialPoseFilter, recency_weighted::RecencyWeightedSmoother},
    stability::StabilityTracker,
};

#[test]
#[should_panic(expected = "History capacity must be greater than 0")]
fn test_recency_zero_capacity() {
    let _ = RecencyWeightedSmoother::new(0, 1);
}

#[test]
#[should_panic(expected = "Minimum history must be in 1..=5, got 0")]
fn test_recency_zero_min_history() {
    let _ = RecencyWeightedSmoother::new(5, 0);
}

#[test]
#[should_panic(expected = "Minimum history must be in 1..=3, got 4")]
fn test_recency_min_history_above_capacity() {
    let _ = RecencyWeightedSmoother::new(3, 4);
}

#[test]
#[should_panic(expected = "Alpha must be in (0, 1]")]
fn test_exponential_zero_alpha() {
    let _ = ExponentialPoseFilter::new(0.0);
}

#[test]
#[should_panic(expected = "Alpha must be in (0, 1]")]
fn test_exponential_too_large_alpha() {
    let _ = ExponentialPoseFilter::new(1.5);
}

#[test]
#[should_panic(expected = "Alpha must be in (0, 1]")]
fn test_exponential_nan_alpha() {
    let _ = ExponentialPoseFilter::new(f64::NAN);
}

#[test]
#[should_panic(expected = "Stability window must be greater than 0")]
fn test_stability_zero_window() {
    let _ = StabilityTracker::new(0, 20.0);
}

#[test]
#[should_panic(expected = "Stability scale must be positive")]
fn test_stability_zero_scale() {
    let _ = StabilityTracker::new(15, 0.0);
}

#[test]
fn test_valid_parameters() {
    // These should all succeed
    let _ = RecencyWeightedSmoother::new(1, 1);
    let _ = RecencyWeightedSmoother::new(5, 3);
    let _ = RecencyWeightedSmoother::new(30, 30);
    let _ = ExponentialPoseFilter::new(0.01);
    let _ = ExponentialPoseFilter::new(1.0);
    let _ = StabilityTracker::new(1, 0.5);
}

#[test]
fn test_factory_matches_constructors() {
    let cases = [
        ("none", "NoFilter"),
        ("recency", "RecencyWeightedSmoother"),
        ("recency:8", "RecencyWeightedSmoother"),
        ("recency:8:2", "RecencyWeightedSmoother"),
        ("RECENCY_WEIGHTED:4:4", "RecencyWeightedSmoother"),
        ("exponential", "ExponentialPoseFilter"),
        ("ema:0.25", "ExponentialPoseFilter"),
    ];

    for (spec, expected) in cases {
        let filter = create_filter(spec).unwrap_or_else(|e| panic!("{spec}: {e}"));
        assert_eq!(filter.name(), expected, "{spec}");
    }
}

#[test]
fn test_factory_default_min_history_fits_small_capacity() {
    // recency:2 caps the default minimum at the capacity
    assert!(create_filter("recency:2").is_ok());
    assert!(create_filter("recency:1").is_ok());
}
