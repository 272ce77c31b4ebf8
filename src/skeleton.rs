//! Overlay geometry for the presentation layer: skeleton segments, joints
//! and corrective highlights. Nothing here draws; the consumer renders the
//! returned shapes.

use crate::{
    comparator::ComparisonResult,
    constants::HIGHLIGHT_RADIUS,
    geometry::Point,
    metrics::ResolvedPose,
    pose::{get_keypoint, Landmark, Pose},
};
use serde::{Deserialize, Serialize};

/// Skeleton connections: torso, arms, legs
pub const CONNECTIONS: [(Landmark, Landmark); 12] = [
    (Landmark::LeftShoulder, Landmark::RightShoulder),
    (Landmark::LeftShoulder, Landmark::LeftHip),
    (Landmark::RightShoulder, Landmark::RightHip),
    (Landmark::LeftHip, Landmark::RightHip),
    (Landmark::LeftShoulder, Landmark::LeftElbow),
    (Landmark::LeftElbow, Landmark::LeftWrist),
    (Landmark::RightShoulder, Landmark::RightElbow),
    (Landmark::RightElbow, Landmark::RightWrist),
    (Landmark::LeftHip, Landmark::LeftKnee),
    (Landmark::LeftKnee, Landmark::LeftAnkle),
    (Landmark::RightHip, Landmark::RightKnee),
    (Landmark::RightKnee, Landmark::RightAnkle),
];

/// Metrics whose poor score highlights a knee
const KNEE_METRICS: [&str; 4] = ["frontKneeAngle", "backKneeAngle", "backLegAngle", "kneeBend"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Landmark,
    pub to: Landmark,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub landmark: Landmark,
    pub position: Point,
    /// Elbow or wrist of the weapon arm
    pub weapon_arm: bool,
}

/// Circle drawn over a joint that needs attention
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub landmark: Landmark,
    pub center: Point,
    pub radius: f64,
}

/// Segments whose two endpoints are both usable
#[must_use]
pub fn visible_segments(pose: &Pose, threshold: f64) -> Vec<Segment> {
    CONNECTIONS
        .iter()
        .filter_map(|&(from, to)| {
            Some(Segment {
                from,
                to,
                start: get_keypoint(pose, from, threshold)?,
                end: get_keypoint(pose, to, threshold)?,
            })
        })
        .collect()
}

/// Usable joints, flagging the weapon arm
#[must_use]
pub fn visible_joints(pose: &Pose, threshold: f64) -> Vec<Joint> {
    let body = ResolvedPose::new(pose, threshold);
    let side = body.weapon_side();
    Landmark::ALL
        .iter()
        .filter_map(|&landmark| {
            body.point(landmark).map(|position| Joint {
                landmark,
                position,
                weapon_arm: landmark == side.elbow() || landmark == side.wrist(),
            })
        })
        .collect()
}

/// Highlights for the current comparison: a circle on the first usable knee
/// (left, then right) when any knee metric scores below `warning_score`.
#[must_use]
pub fn highlights(pose: &Pose, comparison: &ComparisonResult, threshold: f64, warning_score: f64) -> Vec<Highlight> {
    let knee_needs_work = KNEE_METRICS
        .iter()
        .filter_map(|name| comparison.metric_score(name))
        .any(|score| score < warning_score);
    if !knee_needs_work {
        return Vec::new();
    }

    [Landmark::LeftKnee, Landmark::RightKnee]
        .into_iter()
        .find_map(|landmark| {
            get_keypoint(pose, landmark, threshold).map(|center| Highlight {
                landmark,
                center,
                radius: HIGHLIGHT_RADIUS,
            })
        })
        .into_iter()
        .collect()
}
