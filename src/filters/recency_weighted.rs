use super::PoseFilter;
use crate::pose::{Keypoint, Pose};
use std::collections::VecDeque;

/// Recency-weighted pose smoother.
///
/// Keeps the most recent `capacity` poses, newest first. Once at least
/// `min_history` poses are held, every landmark of the newest pose is
/// replaced by the weighted mean of that landmark across the history, the
/// entry at position `i` (0 = newest) weighing `1 / (i + 1)`.
///
/// History entries that lack a landmark are skipped for that landmark and
/// the remaining weights renormalised. The newest pose always contributes,
/// so a landmark it carries always has a value.
pub struct RecencyWeightedSmoother {
    capacity: usize,
    min_history: usize,
    history: VecDeque<Pose>,
}

impl RecencyWeightedSmoother {
    /// Create a smoother
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or `min_history` is not in `1..=capacity`
    #[must_use]
    pub fn new(capacity: usize, min_history: usize) -> Self {
        assert!(capacity > 0, "History capacity must be greater than 0");
        assert!(
            min_history > 0 && min_history <= capacity,
            "Minimum history must be in 1..={capacity}, got {min_history}"
        );
        Self {
            capacity,
            min_history,
            history: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Number of poses currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Held poses, newest first
    pub fn history(&self) -> impl Iterator<Item = &Pose> {
        self.history.iter()
    }
}

/// Prepend `new_pose` to `history`, truncate it to `capacity` and return the
/// smoothed pose (or `new_pose` itself while fewer than `min_history` poses
/// are available).
pub fn smooth(history: &mut VecDeque<Pose>, new_pose: &Pose, capacity: usize, min_history: usize) -> Pose {
    history.push_front(new_pose.clone());
    history.truncate(capacity);

    if history.len() < min_history {
        return new_pose.clone();
    }

    let keypoints = new_pose
        .keypoints
        .iter()
        .map(|kp| {
            let mut total_weight = 0.0;
            let mut x = 0.0;
            let mut y = 0.0;
            let mut confidence = 0.0;

            for (idx, past) in history.iter().enumerate() {
                if let Some(hist_kp) = past.keypoint(kp.name) {
                    let weight = 1.0 / (idx as f64 + 1.0);
                    x += hist_kp.x * weight;
                    y += hist_kp.y * weight;
                    confidence += hist_kp.confidence * weight;
                    total_weight += weight;
                }
            }

            Keypoint::new(kp.name, x / total_weight, y / total_weight, confidence / total_weight)
        })
        .collect();

    Pose::new(keypoints, new_pose.timestamp_ms)
}

impl PoseFilter for RecencyWeightedSmoother {
    fn apply(&mut self, pose: &Pose) -> Pose {
        smooth(&mut self.history, pose, self.capacity, self.min_history)
    }

    fn reset(&mut self) {
        self.history.clear();
    }

    fn name(&self) -> &str {
        "RecencyWeightedSmoother"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Landmark;

    fn single(x: f64, y: f64, t: u64) -> Pose {
        Pose::new(vec![Keypoint::new(Landmark::LeftKnee, x, y, 0.9)], t)
    }

    #[test]
    fn test_passthrough_until_min_history() {
        let mut smoother = RecencyWeightedSmoother::new(5, 3);

        let p1 = single(10.0, 10.0, 1);
        assert_eq!(smoother.apply(&p1), p1);

        let p2 = single(20.0, 20.0, 2);
        assert_eq!(smoother.apply(&p2), p2);

        // Third pose: weights 1, 1/2, 1/3 over 30, 20, 10
        let out = smoother.apply(&single(30.0, 30.0, 3));
        let expected = (30.0 + 20.0 / 2.0 + 10.0 / 3.0) / (1.0 + 0.5 + 1.0 / 3.0);
        assert!((out.keypoints[0].x - expected).abs() < 1e-9);
        assert_eq!(out.timestamp_ms, 3);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut smoother = RecencyWeightedSmoother::new(5, 3);
        for i in 0..12 {
            smoother.apply(&single(i as f64, 0.0, i));
            assert!(smoother.len() <= 5);
        }
        let newest: Vec<u64> = smoother.history().map(|p| p.timestamp_ms).collect();
        assert_eq!(newest, vec![11, 10, 9, 8, 7]);
    }

    #[test]
    fn test_stationary_signal_does_not_drift() {
        let mut smoother = RecencyWeightedSmoother::new(5, 3);
        let pose = single(123.25, 456.5, 0);
        let mut out = pose.clone();
        for _ in 0..5 {
            out = smoother.apply(&pose);
        }
        assert!((out.keypoints[0].x - 123.25).abs() < 1e-9);
        assert!((out.keypoints[0].y - 456.5).abs() < 1e-9);
        assert!((out.keypoints[0].confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_missing_landmark_skips_and_renormalises() {
        let mut smoother = RecencyWeightedSmoother::new(5, 3);
        smoother.apply(&single(0.0, 0.0, 0));
        // Detector dropped the knee this frame
        smoother.apply(&Pose::new(vec![Keypoint::new(Landmark::Nose, 1.0, 1.0, 0.9)], 1));
        let out = smoother.apply(&single(30.0, 0.0, 2));

        // Contributions: newest (w=1, x=30) and oldest (w=1/3, x=0)
        let expected = 30.0 / (1.0 + 1.0 / 3.0);
        assert_eq!(out.keypoints.len(), 1);
        assert!((out.keypoints[0].x - expected).abs() < 1e-9);
    }

    #[test]
    fn test_landmark_absent_from_newest_stays_absent() {
        let mut smoother = RecencyWeightedSmoother::new(5, 3);
        let full = Pose::new(
            vec![
                Keypoint::new(Landmark::Nose, 1.0, 1.0, 0.9),
                Keypoint::new(Landmark::LeftKnee, 2.0, 2.0, 0.9),
            ],
            0,
        );
        smoother.apply(&full);
        smoother.apply(&full);
        let out = smoother.apply(&Pose::new(vec![Keypoint::new(Landmark::Nose, 1.0, 1.0, 0.9)], 2));
        assert!(out.keypoint(Landmark::LeftKnee).is_none());
        assert!(out.keypoint(Landmark::Nose).is_some());
    }

    #[test]
    fn test_reset() {
        let mut smoother = RecencyWeightedSmoother::new(5, 3);
        for i in 0..4 {
            smoother.apply(&single(i as f64, 0.0, i));
        }
        smoother.reset();
        assert!(smoother.is_empty());
        let p = single(99.0, 0.0, 9);
        assert_eq!(smoother.apply(&p), p);
    }
}
