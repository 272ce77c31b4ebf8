use super::PoseFilter;
use crate::{
    constants::NUM_LANDMARKS,
    pose::{Keypoint, Pose},
};

/// Exponential smoothing applied independently to each landmark
pub struct ExponentialPoseFilter {
    alpha: f64,
    last: [Option<Keypoint>; NUM_LANDMARKS],
}

impl ExponentialPoseFilter {
    /// Create a new filter
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in (0, 1]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self {
            alpha,
            last: [None; NUM_LANDMARKS],
        }
    }
}

impl PoseFilter for ExponentialPoseFilter {
    fn apply(&mut self, pose: &Pose) -> Pose {
        let mut next = [None; NUM_LANDMARKS];

        let keypoints = pose
            .keypoints
            .iter()
            .map(|kp| {
                let filtered = match self.last[kp.name.index()] {
                    Some(last) => Keypoint::new(
                        kp.name,
                        self.alpha * kp.x + (1.0 - self.alpha) * last.x,
                        self.alpha * kp.y + (1.0 - self.alpha) * last.y,
                        self.alpha * kp.confidence + (1.0 - self.alpha) * last.confidence,
                    ),
                    None => *kp,
                };
                next[kp.name.index()] = Some(filtered);
                filtered
            })
            .collect();

        // Landmarks the detector dropped start over when they come back
        self.last = next;

        Pose::new(keypoints, pose.timestamp_ms)
    }

    fn reset(&mut self) {
        self.last = [None; NUM_LANDMARKS];
    }

    fn name(&self) -> &str {
        "ExponentialPoseFilter"
    }
}
