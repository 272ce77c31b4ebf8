//! Fencing-specific metrics derived from a (smoothed) pose.
//!
//! The extractor is a pure function of one pose: it detects the en garde
//! stance and the lunge, measures weapon-arm extension and lateral balance,
//! and collects plain-language suggestions. Any metric whose landmarks are
//! not usable is skipped rather than treated as an error.

use crate::{
    config::AnalysisConfig,
    constants::{DEFAULT_BALANCE, DEFAULT_STABILITY},
    geometry::{calculate_angle, inclination_from_vertical, span_ratio, Point},
    pose::{get_keypoint, Landmark, Pose},
};
use serde::{Deserialize, Serialize};

pub const SUGGEST_WIDEN_STANCE: &str = "Widen your stance for better balance";
pub const SUGGEST_EXTEND_ARM: &str = "Extend your weapon arm further";
pub const SUGGEST_CENTER_WEIGHT: &str = "Center your weight for better balance";

/// Body side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    #[must_use]
    pub fn shoulder(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftShoulder,
            Side::Right => Landmark::RightShoulder,
        }
    }

    #[must_use]
    pub fn elbow(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftElbow,
            Side::Right => Landmark::RightElbow,
        }
    }

    #[must_use]
    pub fn wrist(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftWrist,
            Side::Right => Landmark::RightWrist,
        }
    }

    #[must_use]
    pub fn hip(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftHip,
            Side::Right => Landmark::RightHip,
        }
    }

    #[must_use]
    pub fn knee(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftKnee,
            Side::Right => Landmark::RightKnee,
        }
    }

    #[must_use]
    pub fn ankle(self) -> Landmark {
        match self {
            Side::Left => Landmark::LeftAnkle,
            Side::Right => Landmark::RightAnkle,
        }
    }
}

/// All landmarks of a pose resolved once against a confidence threshold
#[derive(Debug, Clone)]
pub struct ResolvedPose {
    points: [Option<Point>; crate::constants::NUM_LANDMARKS],
}

impl ResolvedPose {
    #[must_use]
    pub fn new(pose: &Pose, threshold: f64) -> Self {
        let mut points = [None; crate::constants::NUM_LANDMARKS];
        for landmark in Landmark::ALL {
            points[landmark.index()] = get_keypoint(pose, landmark, threshold);
        }
        Self { points }
    }

    #[must_use]
    pub fn point(&self, landmark: Landmark) -> Option<Point> {
        self.points[landmark.index()]
    }

    /// The leg whose knee sits lower in the image (greater `y`); ties go right
    #[must_use]
    pub fn front_side(&self) -> Option<Side> {
        let left = self.point(Landmark::LeftKnee)?;
        let right = self.point(Landmark::RightKnee)?;
        Some(if left.y > right.y { Side::Left } else { Side::Right })
    }

    /// The right arm when its wrist is usable, otherwise the left
    #[must_use]
    pub fn weapon_side(&self) -> Side {
        if self.point(Landmark::RightWrist).is_some() {
            Side::Right
        } else {
            Side::Left
        }
    }

    fn pair(&self, a: Landmark, b: Landmark) -> Option<(Point, Point)> {
        Some((self.point(a)?, self.point(b)?))
    }

    #[must_use]
    pub fn shoulder_mid(&self) -> Option<Point> {
        self.pair(Landmark::LeftShoulder, Landmark::RightShoulder)
            .map(|(l, r)| l.midpoint(&r))
    }

    #[must_use]
    pub fn hip_mid(&self) -> Option<Point> {
        self.pair(Landmark::LeftHip, Landmark::RightHip).map(|(l, r)| l.midpoint(&r))
    }

    #[must_use]
    pub fn ankle_mid(&self) -> Option<Point> {
        self.pair(Landmark::LeftAnkle, Landmark::RightAnkle)
            .map(|(l, r)| l.midpoint(&r))
    }

    /// Horizontal distance between the shoulders
    #[must_use]
    pub fn shoulder_span(&self) -> Option<f64> {
        self.pair(Landmark::LeftShoulder, Landmark::RightShoulder)
            .map(|(l, r)| (l.x - r.x).abs())
    }

    #[must_use]
    pub fn hip_span(&self) -> Option<f64> {
        self.pair(Landmark::LeftHip, Landmark::RightHip).map(|(l, r)| (l.x - r.x).abs())
    }

    #[must_use]
    pub fn ankle_span(&self) -> Option<f64> {
        self.pair(Landmark::LeftAnkle, Landmark::RightAnkle)
            .map(|(l, r)| (l.x - r.x).abs())
    }

    /// Hip-knee-ankle included angle of one leg
    #[must_use]
    pub fn knee_angle(&self, side: Side) -> Option<f64> {
        let hip = self.point(side.hip())?;
        let knee = self.point(side.knee())?;
        let ankle = self.point(side.ankle())?;
        Some(calculate_angle(&hip, &knee, &ankle))
    }

    /// Shoulder-elbow-wrist included angle of the weapon arm
    #[must_use]
    pub fn weapon_elbow_angle(&self) -> Option<f64> {
        let side = self.weapon_side();
        let shoulder = self.point(side.shoulder())?;
        let elbow = self.point(side.elbow())?;
        let wrist = self.point(side.wrist())?;
        Some(calculate_angle(&shoulder, &elbow, &wrist))
    }

    /// Weapon arm extension: 1 at `target` degrees, falling off linearly
    #[must_use]
    pub fn arm_extension(&self, target: f64) -> Option<f64> {
        let angle = self.weapon_elbow_angle()?;
        Some(1.0 - (angle - target).abs() / target)
    }

    /// Shoulder/hip width ratio
    #[must_use]
    pub fn shoulder_hip_ratio(&self) -> Option<f64> {
        span_ratio(self.shoulder_span()?, self.hip_span()?)
    }

    /// Lateral balance from the horizontal offsets between the shoulder,
    /// hip and ankle midpoints
    #[must_use]
    pub fn balance(&self, scale: f64) -> Option<f64> {
        let shoulder_mid = self.shoulder_mid()?;
        let hip_mid = self.hip_mid()?;
        let ankle_mid = self.ankle_mid()?;

        let upper = (shoulder_mid.x - hip_mid.x).abs() / scale;
        let lower = (hip_mid.x - ankle_mid.x).abs() / scale;
        Some(1.0 - ((upper + lower) / 2.0).min(1.0))
    }
}

/// Metrics derived from one pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FencingMetrics {
    pub en_garde: bool,
    pub lunge: bool,
    /// 0-1, 1 is centred
    pub balance: f64,
    /// Extension derived from the front-thigh inclination while lunging
    pub lunge_extension: Option<f64>,
    /// Extension derived from the weapon arm's elbow angle
    pub arm_extension: Option<f64>,
    /// 0-1, how steady the stance is
    pub stability: f64,
    pub stance_ratio: Option<f64>,
    pub lunge_angle: Option<f64>,
    pub arm_angle: Option<f64>,
    pub suggestions: Vec<String>,
}

impl FencingMetrics {
    /// Single extension value: the arm measurement when present, else the
    /// lunge measurement, else 0.
    #[must_use]
    pub fn extension(&self) -> f64 {
        self.arm_extension.or(self.lunge_extension).unwrap_or(0.0)
    }
}

/// Fencing metric extractor
#[derive(Debug, Clone, Default)]
pub struct MetricExtractor {
    config: AnalysisConfig,
}

impl MetricExtractor {
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Derive metrics from a pose.
    ///
    /// Returns `None` when the pose carries no usable keypoint at all.
    #[must_use]
    pub fn extract(&self, pose: &Pose) -> Option<FencingMetrics> {
        let cfg = &self.config;
        if !pose.has_usable_keypoints(cfg.confidence_threshold) {
            return None;
        }

        let body = ResolvedPose::new(pose, cfg.confidence_threshold);
        let mut metrics = FencingMetrics {
            en_garde: false,
            lunge: false,
            balance: DEFAULT_BALANCE,
            lunge_extension: None,
            arm_extension: None,
            stability: DEFAULT_STABILITY,
            stance_ratio: None,
            lunge_angle: None,
            arm_angle: None,
            suggestions: Vec::new(),
        };

        // En garde: shoulders roughly as wide as hips
        if body.shoulder_span().is_some() && body.hip_span().is_some() {
            metrics.stance_ratio = body.shoulder_hip_ratio();
            match metrics.stance_ratio {
                Some(ratio) if (cfg.stance_ratio_min..=cfg.stance_ratio_max).contains(&ratio) => {
                    metrics.en_garde = true;
                }
                _ => metrics.suggestions.push(SUGGEST_WIDEN_STANCE.to_string()),
            }
        }

        // Lunge: front thigh inclination against the vertical
        let legs_visible = [Landmark::LeftKnee, Landmark::RightKnee, Landmark::LeftAnkle, Landmark::RightAnkle]
            .iter()
            .all(|&landmark| body.point(landmark).is_some());
        if legs_visible {
            if let Some(front) = body.front_side() {
                if let (Some(knee), Some(hip)) = (body.point(front.knee()), body.point(front.hip())) {
                    let angle = inclination_from_vertical(&knee, &hip);
                    metrics.lunge_angle = Some(angle);
                    if angle > cfg.lunge_angle_min && angle < cfg.lunge_angle_max {
                        metrics.lunge = true;
                        metrics.lunge_extension = Some(1.0 - angle / 90.0);
                    }
                }
            }
        }

        // Weapon arm extension
        if let Some(angle) = body.weapon_elbow_angle() {
            metrics.arm_angle = Some(angle);
            metrics.arm_extension = body.arm_extension(cfg.arm_extension_target);
            if angle < cfg.arm_extension_warning {
                metrics.suggestions.push(SUGGEST_EXTEND_ARM.to_string());
            }
        }

        if let Some(balance) = body.balance(cfg.balance_scale) {
            metrics.balance = balance;
            if balance < cfg.balance_warning {
                metrics.suggestions.push(SUGGEST_CENTER_WEIGHT.to_string());
            }
        }

        Some(metrics)
    }
}

/// Extract metrics with the default analysis settings
#[must_use]
pub fn analyze_fencing_pose(pose: &Pose) -> Option<FencingMetrics> {
    MetricExtractor::default().extract(pose)
}
