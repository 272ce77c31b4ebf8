//! Ideal-pose template catalog.
//!
//! Each technique maps to a set of acceptable ranges for named metrics. The
//! built-in catalog covers every [`Technique`]; a replacement can be loaded
//! from YAML keyed by technique identifier:
//!
//! ```yaml
//! ENGARDE:
//!   name: En Garde
//!   description: Basic fencing stance
//!   metrics:
//!     frontKneeAngle: { min: 100, max: 130 }
//!     guardHandPosition: { x: { min: 0.5, max: 0.8 }, y: { min: 0.4, max: 0.7 } }
//! ```

use crate::{technique::Technique, Error, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Inclusive acceptable range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance from `value` to the nearest edge of the range, 0 inside it
    #[must_use]
    pub fn deviation(&self, value: f64) -> f64 {
        (self.min - value).max(0.0) + (value - self.max).max(0.0)
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Constraint on one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Constraint {
    /// Normalised 2D position, one range per axis
    Position { x: Range, y: Range },
    Range(Range),
}

impl Constraint {
    fn is_valid(&self) -> bool {
        match self {
            Constraint::Position { x, y } => x.is_valid() && y.is_valid(),
            Constraint::Range(range) => range.is_valid(),
        }
    }
}

/// Named set of metric constraints describing correct form for a technique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealPoseTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub metrics: BTreeMap<String, Constraint>,
}

impl IdealPoseTemplate {
    fn new(name: &str, description: &str, metrics: &[(&str, Constraint)]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            metrics: metrics
                .iter()
                .map(|(metric, constraint)| ((*metric).to_string(), *constraint))
                .collect(),
        }
    }
}

/// Immutable technique -> template catalog
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCatalog {
    templates: BTreeMap<Technique, IdealPoseTemplate>,
}

const fn range(min: f64, max: f64) -> Constraint {
    Constraint::Range(Range::new(min, max))
}

const fn position(x: (f64, f64), y: (f64, f64)) -> Constraint {
    Constraint::Position {
        x: Range::new(x.0, x.1),
        y: Range::new(y.0, y.1),
    }
}

impl TemplateCatalog {
    /// Catalog with a template for every technique
    #[must_use]
    pub fn builtin() -> Self {
        use Technique::*;

        let entries = [
            (
                Engarde,
                IdealPoseTemplate::new(
                    "En Garde",
                    "Basic fencing stance",
                    &[
                        ("frontKneeAngle", range(100.0, 130.0)),
                        ("backKneeAngle", range(150.0, 170.0)),
                        ("torsoAngle", range(80.0, 100.0)),
                        ("weaponArmAngle", range(30.0, 60.0)),
                        ("guardHandHeight", range(0.3, 0.5)),
                        ("feetDistance", range(0.8, 1.2)),
                        ("shoulderHipAlignment", range(0.8, 1.2)),
                    ],
                ),
            ),
            (
                Lunge,
                IdealPoseTemplate::new(
                    "Lunge",
                    "Basic attacking movement",
                    &[
                        ("frontKneeAngle", range(80.0, 100.0)),
                        ("backLegAngle", range(130.0, 170.0)),
                        ("torsoAngle", range(70.0, 90.0)),
                        ("weaponArmExtension", range(0.8, 1.0)),
                        ("backFootAngle", range(45.0, 90.0)),
                        ("hipShoulderAlignment", range(0.9, 1.1)),
                    ],
                ),
            ),
            (
                Fleeche,
                IdealPoseTemplate::new(
                    "Fleche",
                    "Running attack",
                    &[
                        ("bodyLean", range(30.0, 45.0)),
                        ("armExtension", range(0.9, 1.1)),
                        ("backLegAngle", range(160.0, 180.0)),
                        ("forwardMomentum", range(0.7, 1.0)),
                    ],
                ),
            ),
            (
                DisengageAttack,
                IdealPoseTemplate::new(
                    "Disengage Attack",
                    "Blade disengagement followed by attack",
                    &[
                        ("bladeAngle", range(30.0, 60.0)),
                        ("wristFlexion", range(20.0, 40.0)),
                        ("armExtension", range(0.8, 1.0)),
                        ("bodyAlignment", range(0.9, 1.1)),
                    ],
                ),
            ),
            (
                Parry4,
                IdealPoseTemplate::new(
                    "Parry 4",
                    "High outside parry",
                    &[
                        ("weaponArmAngle", range(45.0, 90.0)),
                        ("guardHandPosition", position((0.5, 0.8), (0.4, 0.7))),
                        ("bladeAngle", range(30.0, 60.0)),
                        ("elbowAngle", range(90.0, 120.0)),
                    ],
                ),
            ),
            (
                Parry6,
                IdealPoseTemplate::new(
                    "Parry 6",
                    "High inside parry",
                    &[
                        ("weaponArmAngle", range(90.0, 135.0)),
                        ("guardHandPosition", position((0.2, 0.5), (0.4, 0.7))),
                        ("bladeAngle", range(30.0, 60.0)),
                        ("elbowAngle", range(90.0, 120.0)),
                    ],
                ),
            ),
            (
                Parry8,
                IdealPoseTemplate::new(
                    "Parry 8",
                    "Low outside parry",
                    &[
                        ("weaponArmAngle", range(45.0, 90.0)),
                        ("guardHandPosition", position((0.5, 0.8), (0.6, 0.9))),
                        ("bladeAngle", range(30.0, 60.0)),
                        ("elbowAngle", range(90.0, 120.0)),
                    ],
                ),
            ),
            (
                CircleParry,
                IdealPoseTemplate::new(
                    "Circular Parry",
                    "Circular blade movement to deflect attack",
                    &[
                        ("wristFlexion", range(20.0, 45.0)),
                        ("circleDiameter", range(0.2, 0.4)),
                        ("bladeSpeed", range(0.7, 1.0)),
                    ],
                ),
            ),
            (
                Riposte,
                IdealPoseTemplate::new(
                    "Riposte",
                    "Immediate counterattack after parry",
                    &[
                        ("timing", range(0.0, 0.5)),
                        ("armExtension", range(0.9, 1.1)),
                        ("bodyAlignment", range(0.9, 1.1)),
                        ("bladeAngle", range(20.0, 40.0)),
                    ],
                ),
            ),
            (
                CounterRiposte,
                IdealPoseTemplate::new(
                    "Counter-Riposte",
                    "Counter to a riposte",
                    &[
                        ("timing", range(0.0, 0.3)),
                        ("distanceControl", range(0.8, 1.2)),
                        ("bladeAngle", range(30.0, 60.0)),
                        ("bodyAlignment", range(0.9, 1.1)),
                    ],
                ),
            ),
            (
                Advance,
                IdealPoseTemplate::new(
                    "Advance",
                    "Forward movement",
                    &[
                        ("stepLength", range(0.3, 0.5)),
                        ("kneeBend", range(150.0, 170.0)),
                        ("bodyHeight", range(0.9, 1.1)),
                        ("balance", range(0.8, 1.2)),
                    ],
                ),
            ),
            (
                Retreat,
                IdealPoseTemplate::new(
                    "Retreat",
                    "Backward movement",
                    &[
                        ("stepLength", range(0.3, 0.5)),
                        ("bodyPosture", range(0.9, 1.1)),
                        ("weightDistribution", range(0.4, 0.6)),
                        ("recovery", range(0.8, 1.2)),
                    ],
                ),
            ),
            (
                Balestra,
                IdealPoseTemplate::new(
                    "Balestra",
                    "Forward jump followed by lunge",
                    &[
                        ("jumpHeight", range(0.1, 0.3)),
                        ("distance", range(0.5, 0.8)),
                        ("landingStability", range(0.8, 1.2)),
                        ("preparation", range(0.7, 1.0)),
                    ],
                ),
            ),
            (
                BeatAttack,
                IdealPoseTemplate::new(
                    "Beat Attack",
                    "Hitting opponent's blade before attacking",
                    &[
                        ("beatStrength", range(0.5, 1.0)),
                        ("timing", range(0.1, 0.3)),
                        ("bladeContact", range(0.8, 1.2)),
                        ("followThrough", range(0.7, 1.0)),
                    ],
                ),
            ),
            (
                Bind,
                IdealPoseTemplate::new(
                    "Bind",
                    "Taking opponent's blade from high to low line",
                    &[
                        ("bladeContact", range(0.8, 1.2)),
                        ("pressure", range(0.6, 1.0)),
                        ("angle", range(30.0, 60.0)),
                        ("control", range(0.8, 1.2)),
                    ],
                ),
            ),
            (
                Disengage,
                IdealPoseTemplate::new(
                    "Disengage",
                    "Avoiding opponent's blade",
                    &[
                        ("circleSize", range(0.1, 0.3)),
                        ("timing", range(0.1, 0.4)),
                        ("wristFlexion", range(20.0, 45.0)),
                        ("smoothness", range(0.7, 1.0)),
                    ],
                ),
            ),
            (
                Remise,
                IdealPoseTemplate::new(
                    "Remise",
                    "Immediate renewal of attack",
                    &[
                        ("timing", range(0.0, 0.3)),
                        ("distance", range(0.9, 1.1)),
                        ("bladeAngle", range(20.0, 40.0)),
                        ("extension", range(0.9, 1.1)),
                    ],
                ),
            ),
        ];

        Self {
            templates: entries.into_iter().collect(),
        }
    }

    /// Parse a catalog from YAML keyed by technique identifier.
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if the document does not parse or a
    /// range is inverted or non-finite.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let templates: BTreeMap<Technique, IdealPoseTemplate> =
            serde_yaml::from_str(yaml).map_err(|e| Error::TemplateError(format!("Failed to parse templates: {e}")))?;

        for (technique, template) in &templates {
            if let Some((metric, _)) = template.metrics.iter().find(|(_, constraint)| !constraint.is_valid()) {
                return Err(Error::TemplateError(format!(
                    "Invalid range for {metric} in {technique}: min must not exceed max"
                )));
            }
            if template.metrics.is_empty() {
                warn!("Template {technique} has no metrics and will always score 0");
            }
        }

        Ok(Self { templates })
    }

    /// Load a catalog from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Serialize the catalog to YAML
    ///
    /// # Errors
    ///
    /// Returns `Error::TemplateError` if serialization fails
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(&self.templates)
            .map_err(|e| Error::TemplateError(format!("Failed to serialize templates: {e}")))
    }

    #[must_use]
    pub fn get(&self, technique: Technique) -> Option<&IdealPoseTemplate> {
        self.templates.get(&technique)
    }

    pub fn techniques(&self) -> impl Iterator<Item = Technique> + '_ {
        self.templates.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
