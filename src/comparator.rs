//! Ideal-pose comparator.
//!
//! Scores a pose against a technique template. Evaluation is table driven:
//! every metric name a template may constrain is looked up in a static
//! registry giving its class (which fixes the normalising divisor), how to
//! measure it from the pose, and how to phrase corrections. Templates only
//! carry data, so new techniques need no code.

use crate::{
    config::{AnalysisConfig, ComparisonConfig},
    constants::{ANGLE_DIVISOR, POSITION_DIVISOR, RATIO_DIVISOR},
    geometry::{calculate_angle, inclination_from_horizontal, span_ratio, Point},
    metrics::ResolvedPose,
    pose::{Landmark, Pose},
    technique::Technique,
    templates::{Constraint, Range, TemplateCatalog},
};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Metric family, which fixes how deviations are normalised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricClass {
    /// Degrees
    Angle,
    /// Dimensionless ratio or 0-1 score
    Ratio,
    /// Normalised 2D position
    Position,
}

impl MetricClass {
    /// Deviation at which a metric scores 0
    #[must_use]
    pub fn divisor(self) -> f64 {
        match self {
            MetricClass::Angle => ANGLE_DIVISOR,
            MetricClass::Ratio => RATIO_DIVISOR,
            MetricClass::Position => POSITION_DIVISOR,
        }
    }
}

/// A measured metric value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Position { x: f64, y: f64 },
    Scalar(f64),
}

/// Everything a metric measurement may need
pub struct MetricContext<'a> {
    pub body: &'a ResolvedPose,
    pub balance_scale: f64,
    pub arm_extension_target: f64,
}

type Measure = fn(&MetricContext<'_>) -> Option<MetricValue>;

/// Correction phrases for one axis of a metric
#[derive(Debug, Clone, Copy)]
pub struct Phrasing {
    pub too_low: &'static str,
    pub too_high: &'static str,
}

/// Registry entry for one metric name
pub struct MetricDefinition {
    pub name: &'static str,
    pub class: MetricClass,
    measure: Measure,
    /// Scalar metrics use the first entry; positions use one per axis (x, y)
    pub phrasing: &'static [Phrasing],
    /// Coaching message and tip used by the feedback generator
    pub message: &'static str,
    pub tip: &'static str,
}

impl MetricDefinition {
    pub fn measure(&self, ctx: &MetricContext<'_>) -> Option<MetricValue> {
        (self.measure)(ctx)
    }
}

const fn phrase(too_low: &'static str, too_high: &'static str) -> Phrasing {
    Phrasing { too_low, too_high }
}

fn scalar(value: Option<f64>) -> Option<MetricValue> {
    value.filter(|v| v.is_finite()).map(MetricValue::Scalar)
}

fn front_knee_angle(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    let front = ctx.body.front_side()?;
    scalar(ctx.body.knee_angle(front))
}

fn back_knee_angle(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    let back = ctx.body.front_side()?.other();
    scalar(ctx.body.knee_angle(back))
}

fn knee_bend(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    let front = ctx.body.front_side()?;
    let a = ctx.body.knee_angle(front)?;
    let b = ctx.body.knee_angle(front.other())?;
    scalar(Some((a + b) / 2.0))
}

fn torso(body: &ResolvedPose) -> Option<f64> {
    Some(inclination_from_horizontal(&body.hip_mid()?, &body.shoulder_mid()?))
}

fn torso_angle(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    scalar(torso(ctx.body))
}

fn body_lean(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    scalar(torso(ctx.body).map(|angle| (90.0 - angle).abs()))
}

fn body_posture(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    scalar(torso(ctx.body).map(|angle| angle / 90.0))
}

fn weapon_arm_angle(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    let side = ctx.body.weapon_side();
    let hip = ctx.body.point(side.hip())?;
    let shoulder = ctx.body.point(side.shoulder())?;
    let elbow = ctx.body.point(side.elbow())?;
    scalar(Some(calculate_angle(&hip, &shoulder, &elbow)))
}

fn elbow_angle(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    scalar(ctx.body.weapon_elbow_angle())
}

fn arm_extension(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    scalar(ctx.body.arm_extension(ctx.arm_extension_target))
}

fn weapon_wrist(body: &ResolvedPose) -> Option<Point> {
    body.point(body.weapon_side().wrist())
}

fn guard_hand_height(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    let hip_mid = ctx.body.hip_mid()?;
    let shoulder_mid = ctx.body.shoulder_mid()?;
    let wrist = weapon_wrist(ctx.body)?;
    scalar(span_ratio(hip_mid.y - wrist.y, hip_mid.y - shoulder_mid.y))
}

fn guard_hand_position(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    let left = ctx.body.point(Landmark::LeftShoulder)?;
    let right = ctx.body.point(Landmark::RightShoulder)?;
    let shoulder_mid = ctx.body.shoulder_mid()?;
    let hip_mid = ctx.body.hip_mid()?;
    let wrist = weapon_wrist(ctx.body)?;

    let x = span_ratio(wrist.x - left.x.min(right.x), (left.x - right.x).abs())?;
    let y = span_ratio(wrist.y - shoulder_mid.y, hip_mid.y - shoulder_mid.y)?;
    (x.is_finite() && y.is_finite()).then_some(MetricValue::Position { x, y })
}

fn feet_distance(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    scalar(span_ratio(ctx.body.ankle_span()?, ctx.body.shoulder_span()?))
}

fn step_length(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    let nose = ctx.body.point(Landmark::Nose)?;
    let ankle_mid = ctx.body.ankle_mid()?;
    scalar(span_ratio(ctx.body.ankle_span()?, ankle_mid.y - nose.y))
}

fn shoulder_hip_alignment(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    scalar(ctx.body.shoulder_hip_ratio())
}

fn balance(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    scalar(ctx.body.balance(ctx.balance_scale))
}

fn weight_distribution(ctx: &MetricContext<'_>) -> Option<MetricValue> {
    let hip_mid = ctx.body.hip_mid()?;
    let left = ctx.body.point(Landmark::LeftAnkle)?;
    let right = ctx.body.point(Landmark::RightAnkle)?;
    scalar(span_ratio(hip_mid.x - left.x.min(right.x), ctx.body.ankle_span()?))
}

const FRONT_KNEE: &[Phrasing] = &[phrase(
    "Your front knee is bending too much, raise your hips slightly",
    "Bend your front knee more for better lunge power",
)];
const BACK_LEG: &[Phrasing] = &[phrase("Straighten your back leg more", "Soften your back knee slightly")];
const TORSO: &[Phrasing] = &[phrase(
    "Keep your torso more upright",
    "Don't lean back, bring your shoulders over your hips",
)];
const ARM_EXTENSION: &[Phrasing] = &[phrase("Extend your weapon arm further", "Relax your arm, don't lock the elbow")];
const ALIGNMENT: &[Phrasing] = &[phrase(
    "Square your shoulders over your hips",
    "Turn your shoulders to match your hips",
)];
const BALANCE: &[Phrasing] = &[phrase(
    "Center your weight for better balance",
    "Center your weight for better balance",
)];

/// Every metric the comparator can measure from keypoints
static REGISTRY: &[MetricDefinition] = &[
    MetricDefinition {
        name: "frontKneeAngle",
        class: MetricClass::Angle,
        measure: front_knee_angle,
        phrasing: FRONT_KNEE,
        message: "Adjust your knee position",
        tip: "Keep your front knee aligned with your ankle",
    },
    MetricDefinition {
        name: "backKneeAngle",
        class: MetricClass::Angle,
        measure: back_knee_angle,
        phrasing: BACK_LEG,
        message: "Adjust your back leg",
        tip: "Push from the back leg while keeping it firm",
    },
    MetricDefinition {
        name: "backLegAngle",
        class: MetricClass::Angle,
        measure: back_knee_angle,
        phrasing: BACK_LEG,
        message: "Adjust your back leg",
        tip: "Push from the back leg while keeping it firm",
    },
    MetricDefinition {
        name: "kneeBend",
        class: MetricClass::Angle,
        measure: knee_bend,
        phrasing: &[phrase("Straighten your knees slightly", "Bend your knees more")],
        message: "Adjust your knee bend",
        tip: "Stay low and springy on the balls of your feet",
    },
    MetricDefinition {
        name: "torsoAngle",
        class: MetricClass::Angle,
        measure: torso_angle,
        phrasing: TORSO,
        message: "Adjust your torso",
        tip: "Keep your shoulders stacked over your hips",
    },
    MetricDefinition {
        name: "bodyLean",
        class: MetricClass::Angle,
        measure: body_lean,
        phrasing: &[phrase(
            "Lean further into the attack",
            "You are leaning too far, keep your balance over your front foot",
        )],
        message: "Adjust your body lean",
        tip: "Drive forward from the back leg, not the shoulders",
    },
    MetricDefinition {
        name: "bodyPosture",
        class: MetricClass::Ratio,
        measure: body_posture,
        phrasing: &[phrase("Stand taller through your torso", "Avoid leaning back")],
        message: "Adjust your posture",
        tip: "Keep your back straight and head up",
    },
    MetricDefinition {
        name: "weaponArmAngle",
        class: MetricClass::Angle,
        measure: weapon_arm_angle,
        phrasing: &[phrase("Raise your weapon arm away from your body", "Lower your weapon arm")],
        message: "Adjust your weapon arm",
        tip: "Keep your elbow in line with your weapon",
    },
    MetricDefinition {
        name: "elbowAngle",
        class: MetricClass::Angle,
        measure: elbow_angle,
        phrasing: &[phrase("Open your elbow slightly", "Bend your elbow more to close the line")],
        message: "Adjust your elbow",
        tip: "Keep the elbow about a hand's width from your side",
    },
    MetricDefinition {
        name: "weaponArmExtension",
        class: MetricClass::Ratio,
        measure: arm_extension,
        phrasing: ARM_EXTENSION,
        message: "Extend your weapon arm",
        tip: "Lead with the point before the body moves",
    },
    MetricDefinition {
        name: "armExtension",
        class: MetricClass::Ratio,
        measure: arm_extension,
        phrasing: ARM_EXTENSION,
        message: "Extend your weapon arm",
        tip: "Lead with the point before the body moves",
    },
    MetricDefinition {
        name: "extension",
        class: MetricClass::Ratio,
        measure: arm_extension,
        phrasing: ARM_EXTENSION,
        message: "Extend your weapon arm",
        tip: "Lead with the point before the body moves",
    },
    MetricDefinition {
        name: "guardHandHeight",
        class: MetricClass::Ratio,
        measure: guard_hand_height,
        phrasing: &[phrase("Raise your guard hand", "Lower your guard hand")],
        message: "Adjust your guard hand height",
        tip: "Keep your hand between chest and shoulder height",
    },
    MetricDefinition {
        name: "guardHandPosition",
        class: MetricClass::Position,
        measure: guard_hand_position,
        phrasing: &[
            phrase("Move your guard hand further out", "Bring your guard hand further in"),
            phrase("Lower your guard hand", "Raise your guard hand"),
        ],
        message: "Adjust your guard position",
        tip: "Move the hand, not the whole arm, to take the line",
    },
    MetricDefinition {
        name: "feetDistance",
        class: MetricClass::Ratio,
        measure: feet_distance,
        phrasing: &[phrase("Widen your stance", "Narrow your stance")],
        message: "Adjust your foot spacing",
        tip: "Keep your feet about shoulder width apart",
    },
    MetricDefinition {
        name: "stepLength",
        class: MetricClass::Ratio,
        measure: step_length,
        phrasing: &[phrase("Take longer steps", "Take shorter steps")],
        message: "Adjust your step length",
        tip: "Small, quick steps keep you balanced",
    },
    MetricDefinition {
        name: "shoulderHipAlignment",
        class: MetricClass::Ratio,
        measure: shoulder_hip_alignment,
        phrasing: ALIGNMENT,
        message: "Align your shoulders and hips",
        tip: "Keep your shoulders and hips on the same line",
    },
    MetricDefinition {
        name: "hipShoulderAlignment",
        class: MetricClass::Ratio,
        measure: shoulder_hip_alignment,
        phrasing: ALIGNMENT,
        message: "Align your shoulders and hips",
        tip: "Keep your shoulders and hips on the same line",
    },
    MetricDefinition {
        name: "balance",
        class: MetricClass::Ratio,
        measure: balance,
        phrasing: BALANCE,
        message: "Improve your balance",
        tip: "Keep your weight evenly distributed between both feet",
    },
    MetricDefinition {
        name: "bodyAlignment",
        class: MetricClass::Ratio,
        measure: balance,
        phrasing: BALANCE,
        message: "Improve your balance",
        tip: "Keep your weight evenly distributed between both feet",
    },
    MetricDefinition {
        name: "weightDistribution",
        class: MetricClass::Ratio,
        measure: weight_distribution,
        phrasing: &[phrase("Shift your weight forward", "Shift your weight back")],
        message: "Adjust your weight distribution",
        tip: "Keep your weight centred between your feet",
    },
];

/// Metrics templates name that need blade, hand or timing data
pub const UNOBSERVABLE_METRICS: &[&str] = &[
    "backFootAngle",
    "forwardMomentum",
    "bladeAngle",
    "wristFlexion",
    "circleDiameter",
    "bladeSpeed",
    "timing",
    "distanceControl",
    "bodyHeight",
    "recovery",
    "jumpHeight",
    "distance",
    "landingStability",
    "preparation",
    "beatStrength",
    "bladeContact",
    "followThrough",
    "pressure",
    "angle",
    "control",
    "circleSize",
    "smoothness",
];

/// Look up a computable metric by name
#[must_use]
pub fn metric_definition(name: &str) -> Option<&'static MetricDefinition> {
    REGISTRY.iter().find(|def| def.name == name)
}

/// Per-metric comparison outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDetail {
    pub current: MetricValue,
    /// Acceptable range as display text
    pub ideal: String,
    /// 0-1
    pub score: f64,
}

/// Outcome of comparing one pose with one template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub technique: Technique,
    /// 0-100
    pub score: f64,
    pub feedback: Vec<String>,
    pub details: BTreeMap<String, MetricDetail>,
}

impl ComparisonResult {
    /// Score of one metric, if it was evaluated
    #[must_use]
    pub fn metric_score(&self, name: &str) -> Option<f64> {
        self.details.get(name).map(|detail| detail.score)
    }
}

fn axis_score(range: &Range, value: f64, divisor: f64) -> f64 {
    (1.0 - range.deviation(value) / divisor).max(0.0)
}

fn ideal_text(class: MetricClass, constraint: &Constraint) -> String {
    match constraint {
        Constraint::Range(range) if class == MetricClass::Angle => format!("{}-{}°", range.min, range.max),
        Constraint::Range(range) => format!("{}-{}", range.min, range.max),
        Constraint::Position { x, y } => format!("x {}-{}, y {}-{}", x.min, x.max, y.min, y.max),
    }
}

fn direction(phrasing: &Phrasing, range: &Range, value: f64) -> &'static str {
    if value < range.min {
        phrasing.too_low
    } else {
        phrasing.too_high
    }
}

/// Score one measured value against a constraint, with its suggestion
fn evaluate(def: &MetricDefinition, value: MetricValue, constraint: &Constraint) -> Option<(f64, &'static str)> {
    let divisor = def.class.divisor();
    match (value, constraint) {
        (MetricValue::Scalar(v), Constraint::Range(range)) => {
            let phrasing = def.phrasing.first()?;
            Some((axis_score(range, v, divisor), direction(phrasing, range, v)))
        }
        (MetricValue::Position { x, y }, Constraint::Position { x: rx, y: ry }) => {
            let sx = axis_score(rx, x, divisor);
            let sy = axis_score(ry, y, divisor);
            let suggestion = if sx <= sy {
                direction(def.phrasing.first()?, rx, x)
            } else {
                direction(def.phrasing.get(1)?, ry, y)
            };
            Some(((sx + sy) / 2.0, suggestion))
        }
        _ => None,
    }
}

/// Compares poses with the templates of a shared catalog
pub struct Comparator {
    catalog: Arc<TemplateCatalog>,
    analysis: AnalysisConfig,
    config: ComparisonConfig,
}

impl Comparator {
    #[must_use]
    pub fn new(catalog: Arc<TemplateCatalog>, analysis: AnalysisConfig, config: ComparisonConfig) -> Self {
        Self {
            catalog,
            analysis,
            config,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Compare a pose with the template of `technique`.
    ///
    /// Returns `None` when the catalog has no such template. Metrics whose
    /// landmarks are unusable are skipped; with none left the score is 0.
    #[must_use]
    pub fn compare(&self, pose: &Pose, technique: Technique) -> Option<ComparisonResult> {
        let body = ResolvedPose::new(pose, self.analysis.confidence_threshold);
        self.compare_resolved(&body, technique)
    }

    /// Compare using a technique identifier such as `"PARRY_4"`.
    ///
    /// Unknown identifiers yield `None`.
    #[must_use]
    pub fn compare_by_id(&self, pose: &Pose, technique_id: &str) -> Option<ComparisonResult> {
        match technique_id.parse::<Technique>() {
            Ok(technique) => self.compare(pose, technique),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    /// Compare an already resolved pose
    #[must_use]
    pub fn compare_resolved(&self, body: &ResolvedPose, technique: Technique) -> Option<ComparisonResult> {
        let Some(template) = self.catalog.get(technique) else {
            warn!("No template for technique {technique}");
            return None;
        };

        let ctx = MetricContext {
            body,
            balance_scale: self.analysis.balance_scale,
            arm_extension_target: self.analysis.arm_extension_target,
        };

        let mut total = 0.0;
        let mut details = BTreeMap::new();
        let mut feedback = Vec::new();

        for (name, constraint) in &template.metrics {
            let Some(def) = metric_definition(name) else {
                trace!("Skipping {name}: not measurable from keypoints");
                continue;
            };
            let Some(value) = def.measure(&ctx) else {
                continue;
            };
            let Some((score, suggestion)) = evaluate(def, value, constraint) else {
                warn!("Constraint for {name} in {technique} does not match its metric class");
                continue;
            };

            if score < self.config.suggestion_threshold {
                feedback.push(suggestion.to_string());
            }
            total += score;
            details.insert(
                name.clone(),
                MetricDetail {
                    current: value,
                    ideal: ideal_text(def.class, constraint),
                    score,
                },
            );
        }

        let score = if details.is_empty() {
            0.0
        } else {
            total / details.len() as f64 * 100.0
        };
        debug!("{technique}: score {score:.1} over {} metrics", details.len());

        Some(ComparisonResult {
            technique,
            score,
            feedback,
            details,
        })
    }
}
