//! Landmark, keypoint and pose types plus the keypoint accessor.
//!
//! A [`Pose`] is what the external detector hands over for one frame: the
//! landmarks it found, each with a position and a confidence. Consumers never
//! index into it directly; they go through [`Pose::get`] (or
//! [`get_keypoint`] with an explicit threshold), which only yields a point
//! when the landmark exists and its confidence is strictly above the
//! threshold.

use crate::{constants::DEFAULT_CONFIDENCE_THRESHOLD, geometry::Point, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The 17 canonical body landmarks, in detector index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Landmark {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Landmark {
    pub const ALL: [Landmark; crate::constants::NUM_LANDMARKS] = [
        Landmark::Nose,
        Landmark::LeftEye,
        Landmark::RightEye,
        Landmark::LeftEar,
        Landmark::RightEar,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
    ];

    /// Detector index of this landmark
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Canonical SCREAMING_SNAKE name, e.g. `LEFT_KNEE`
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Landmark::Nose => "NOSE",
            Landmark::LeftEye => "LEFT_EYE",
            Landmark::RightEye => "RIGHT_EYE",
            Landmark::LeftEar => "LEFT_EAR",
            Landmark::RightEar => "RIGHT_EAR",
            Landmark::LeftShoulder => "LEFT_SHOULDER",
            Landmark::RightShoulder => "RIGHT_SHOULDER",
            Landmark::LeftElbow => "LEFT_ELBOW",
            Landmark::RightElbow => "RIGHT_ELBOW",
            Landmark::LeftWrist => "LEFT_WRIST",
            Landmark::RightWrist => "RIGHT_WRIST",
            Landmark::LeftHip => "LEFT_HIP",
            Landmark::RightHip => "RIGHT_HIP",
            Landmark::LeftKnee => "LEFT_KNEE",
            Landmark::RightKnee => "RIGHT_KNEE",
            Landmark::LeftAnkle => "LEFT_ANKLE",
            Landmark::RightAnkle => "RIGHT_ANKLE",
        }
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Landmark {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|landmark| landmark.as_str() == wanted)
            .ok_or_else(|| Error::UnknownLandmark(s.to_string()))
    }
}

/// One landmark estimate produced by the detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: Landmark,
    pub x: f64,
    pub y: f64,
    /// Detection confidence (0.0-1.0)
    pub confidence: f64,
}

impl Keypoint {
    #[must_use]
    pub const fn new(name: Landmark, x: f64, y: f64, confidence: f64) -> Self {
        Self { name, x, y, confidence }
    }

    /// Whether the confidence is strictly above `threshold`
    #[must_use]
    pub fn is_usable(&self, threshold: f64) -> bool {
        self.confidence > threshold
    }

    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A single-subject pose at one instant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
    /// Capture time in milliseconds, as reported by the frame source
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl Pose {
    #[must_use]
    pub fn new(keypoints: Vec<Keypoint>, timestamp_ms: u64) -> Self {
        Self { keypoints, timestamp_ms }
    }

    /// Raw keypoint for a landmark, regardless of its confidence
    #[must_use]
    pub fn keypoint(&self, landmark: Landmark) -> Option<&Keypoint> {
        self.keypoints.iter().find(|kp| kp.name == landmark)
    }

    /// Usable position of a landmark at the default confidence threshold
    #[must_use]
    pub fn get(&self, landmark: Landmark) -> Option<Point> {
        get_keypoint(self, landmark, DEFAULT_CONFIDENCE_THRESHOLD)
    }

    /// Whether at least one keypoint clears `threshold`
    #[must_use]
    pub fn has_usable_keypoints(&self, threshold: f64) -> bool {
        self.keypoints.iter().any(|kp| kp.is_usable(threshold))
    }

    /// Mean confidence over the keypoints present
    #[must_use]
    pub fn average_confidence(&self) -> f64 {
        if self.keypoints.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.keypoints.iter().map(|kp| kp.confidence).sum();
        sum / self.keypoints.len() as f64
    }
}

/// Resolve a landmark to a usable point.
///
/// Returns `None` when the landmark is missing from the pose or its
/// confidence does not exceed `threshold`.
#[must_use]
pub fn get_keypoint(pose: &Pose, landmark: Landmark, threshold: f64) -> Option<Point> {
    pose.keypoint(landmark)
        .filter(|kp| kp.is_usable(threshold))
        .map(Keypoint::point)
}

/// Resolve a landmark given by name (e.g. `"LEFT_KNEE"`).
///
/// # Errors
///
/// Returns `Error::UnknownLandmark` if the name is not one of the 17 landmarks.
pub fn get_keypoint_by_name(pose: &Pose, name: &str, threshold: f64) -> Result<Option<Point>> {
    let landmark = name.parse::<Landmark>()?;
    Ok(get_keypoint(pose, landmark, threshold))
}
