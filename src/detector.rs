//! Boundary to the external pose-estimation model.
//!
//! The model itself is not part of this crate. Anything able to turn the
//! next frame into zero or one [`Pose`] implements [`PoseDetector`]; the
//! session loop awaits it once per iteration. [`ReplayDetector`] plays back
//! a recorded sequence, which is what the CLI and the tests use.

use crate::{config::DetectorConfig, pose::Pose, Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

/// Source of per-frame pose estimates
pub trait PoseDetector {
    /// Detect the pose in the next frame. `Ok(None)` means no subject.
    ///
    /// # Errors
    ///
    /// Returns `Error::Detector` when the model fails on this frame; the
    /// caller skips the frame and keeps going.
    fn detect(&mut self) -> Result<Option<Pose>>;

    /// Whether a finite source has run out of frames
    fn is_exhausted(&self) -> bool {
        false
    }

    /// Get detector name
    fn name(&self) -> &str;
}

/// One recorded detector outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordedFrame {
    /// The model failed on this frame
    Failure { error: String },
    Detected(Pose),
    /// No subject in frame
    Empty,
}

/// Replays a recorded sequence of detector outcomes
pub struct ReplayDetector {
    frames: VecDeque<RecordedFrame>,
    min_pose_score: f64,
}

impl ReplayDetector {
    #[must_use]
    pub fn new(frames: Vec<RecordedFrame>, config: &DetectorConfig) -> Self {
        info!(
            "Replaying {} frames ({} model, max {} pose, min pose score {})",
            frames.len(),
            config.model_type,
            config.max_poses,
            config.min_pose_score
        );
        Self {
            frames: frames.into(),
            min_pose_score: config.min_pose_score,
        }
    }

    /// Parse a YAML sequence of recorded frames
    ///
    /// # Errors
    ///
    /// Returns `Error::Detector` if the document is not a frame sequence
    pub fn from_yaml_str(yaml: &str, config: &DetectorConfig) -> Result<Self> {
        let frames: Vec<RecordedFrame> =
            serde_yaml::from_str(yaml).map_err(|e| Error::Detector(format!("Invalid recording: {e}")))?;
        Ok(Self::new(frames, config))
    }

    /// Load a recording from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P, config: &DetectorConfig) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content, config)
    }

    /// Frames left to replay
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl PoseDetector for ReplayDetector {
    fn detect(&mut self) -> Result<Option<Pose>> {
        match self.frames.pop_front() {
            None | Some(RecordedFrame::Empty) => Ok(None),
            Some(RecordedFrame::Failure { error }) => Err(Error::Detector(error)),
            Some(RecordedFrame::Detected(pose)) => {
                // The live model withholds poses under its own score floor
                if pose.average_confidence() < self.min_pose_score {
                    debug!("Dropping pose with score {:.2}", pose.average_confidence());
                    return Ok(None);
                }
                Ok(Some(pose))
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }

    fn name(&self) -> &str {
        "ReplayDetector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = r"
- keypoints:
    - { name: NOSE, x: 320, y: 100, confidence: 0.9 }
  timestamp_ms: 0
- null
- error: inference timed out
- keypoints:
    - { name: NOSE, x: 320, y: 100, confidence: 0.1 }
  timestamp_ms: 99
";

    #[test]
    fn test_replay_sequence() {
        let mut detector = ReplayDetector::from_yaml_str(RECORDING, &DetectorConfig::default()).unwrap();
        assert_eq!(detector.remaining(), 4);

        let first = detector.detect().unwrap().unwrap();
        assert_eq!(first.keypoints.len(), 1);
        assert!(detector.detect().unwrap().is_none());
        assert!(matches!(detector.detect(), Err(Error::Detector(msg)) if msg == "inference timed out"));
        // Below the minimum pose score
        assert!(detector.detect().unwrap().is_none());

        assert!(detector.is_exhausted());
        assert!(detector.detect().unwrap().is_none());
    }

    #[test]
    fn test_min_pose_score_zero_keeps_everything() {
        let config = DetectorConfig {
            min_pose_score: 0.0,
            ..DetectorConfig::default()
        };
        let mut detector = ReplayDetector::from_yaml_str(RECORDING, &config).unwrap();
        let kept = (0..4).filter_map(|_| detector.detect().ok().flatten()).count();
        assert_eq!(kept, 2);
    }

    #[test]
    fn test_invalid_recording() {
        assert!(ReplayDetector::from_yaml_str("just a string", &DetectorConfig::default()).is_err());
    }
}
