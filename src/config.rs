//! Configuration management for the fencing pose pipeline

use crate::{
    constants::*,
    filters::{
        create_filter, exponential::ExponentialPoseFilter, recency_weighted::RecencyWeightedSmoother, PoseFilter,
    },
    technique::{Technique, Weapon},
    templates::TemplateCatalog,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Knobs handed to the external pose model
    pub detector: DetectorConfig,

    /// Temporal smoothing
    pub smoothing: SmoothingConfig,

    /// Metric extraction thresholds
    pub analysis: AnalysisConfig,

    /// Ideal-pose comparison
    pub comparison: ComparisonConfig,

    /// Coaching feedback
    pub feedback: FeedbackConfig,

    /// Progress tracking
    pub progress: ProgressConfig,

    /// Stance stability measurement
    pub stability: StabilityConfig,

    /// Lighting estimation
    pub environment: EnvironmentConfig,

    /// Session defaults
    pub session: SessionConfig,
}

/// External pose model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Model variant requested from the detector
    pub model_type: String,

    /// Maximum number of subjects to detect
    pub max_poses: usize,

    /// Minimum overall pose score for a detection to be reported
    pub min_pose_score: f64,

    /// Per-keypoint score threshold passed to the model
    pub score_threshold: f64,

    /// Let the model apply its own smoothing
    pub enable_smoothing: bool,

    /// Let the model track the subject between frames
    pub enable_tracking: bool,
}

/// Temporal smoothing parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter type: `recency`, `exponential`, `none` or a full
    /// `name:param` description
    pub filter: String,

    /// Poses kept in the smoothing history
    pub history_capacity: usize,

    /// Poses required before smoothing kicks in
    pub min_history: usize,

    /// Exponential filter alpha value
    pub exponential_alpha: f64,
}

/// Fencing metric extraction thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Keypoints at or below this confidence are unusable (0.0-1.0)
    pub confidence_threshold: f64,

    /// Accepted shoulder/hip width ratio for en garde
    pub stance_ratio_min: f64,
    pub stance_ratio_max: f64,

    /// Front-thigh inclination window for a lunge, exclusive (degrees)
    pub lunge_angle_min: f64,
    pub lunge_angle_max: f64,

    /// Elbow angle of a fully extended weapon arm (degrees)
    pub arm_extension_target: f64,

    /// Elbow angle below which extension is suggested (degrees)
    pub arm_extension_warning: f64,

    /// Horizontal offset normalising the balance measure
    pub balance_scale: f64,

    /// Balance below which centring is suggested
    pub balance_warning: f64,
}

/// Ideal-pose comparison parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Per-metric score below which a correction is suggested
    pub suggestion_threshold: f64,

    /// YAML template catalog replacing the built-in one
    pub template_file: Option<PathBuf>,
}

/// Feedback generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Minimum time between feedback updates
    pub cooldown_ms: u64,

    /// Maximum simultaneous feedback items
    pub max_items: usize,

    /// Overall score below which the generic high-priority item is added
    pub high_priority_score: f64,

    /// Per-metric score below which a medium-priority item is added
    pub metric_warning_score: f64,

    /// Overall score at which good form is acknowledged
    pub encouragement_score: f64,
}

/// Progress tracking parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Improvements reported in a progress snapshot
    pub recent_improvements: usize,
}

/// Stability measurement parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Measure stability from hip motion instead of reporting the default
    pub enabled: bool,

    /// Frames in the rolling window
    pub window_size: usize,

    /// Hip standard deviation at which stability reaches 0
    pub scale: f64,
}

/// Lighting estimation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Minimum time between estimates
    pub update_interval_ms: u64,

    /// Bytes between sampled pixels in an RGBA buffer
    pub sample_stride: usize,

    /// Gain applied to the mean brightness
    pub lighting_gain: f64,
}

/// Session defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Technique selected at session start
    pub technique: Technique,

    /// Weapon selected at session start
    pub weapon: Weapon,

    /// Minimum time between frame-rate updates
    pub fps_update_interval_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_type: "SINGLEPOSE_THUNDER".to_string(),
            max_poses: 1,
            min_pose_score: DEFAULT_CONFIDENCE_THRESHOLD,
            score_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            enable_smoothing: true,
            enable_tracking: true,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "recency".to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            min_history: DEFAULT_MIN_HISTORY,
            exponential_alpha: DEFAULT_EXPONENTIAL_ALPHA,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            stance_ratio_min: STANCE_RATIO_MIN,
            stance_ratio_max: STANCE_RATIO_MAX,
            lunge_angle_min: LUNGE_ANGLE_MIN,
            lunge_angle_max: LUNGE_ANGLE_MAX,
            arm_extension_target: ARM_EXTENSION_TARGET,
            arm_extension_warning: ARM_EXTENSION_WARNING,
            balance_scale: BALANCE_SCALE,
            balance_warning: BALANCE_WARNING,
        }
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            suggestion_threshold: SUGGESTION_THRESHOLD,
            template_file: None,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_FEEDBACK_COOLDOWN_MS,
            max_items: DEFAULT_MAX_FEEDBACK_ITEMS,
            high_priority_score: HIGH_PRIORITY_SCORE,
            metric_warning_score: METRIC_WARNING_SCORE,
            encouragement_score: ENCOURAGEMENT_SCORE,
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            recent_improvements: DEFAULT_RECENT_IMPROVEMENTS,
        }
    }
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_size: DEFAULT_STABILITY_WINDOW,
            scale: DEFAULT_STABILITY_SCALE,
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: ENVIRONMENT_UPDATE_INTERVAL_MS,
            sample_stride: ENVIRONMENT_SAMPLE_STRIDE,
            lighting_gain: LIGHTING_GAIN,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            technique: Technique::default(),
            weapon: Weapon::default(),
            fps_update_interval_ms: FPS_UPDATE_INTERVAL_MS,
        }
    }
}

fn check_unit(value: f64, what: &str) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{what} must be between 0.0 and 1.0")))
    }
}

fn check_positive(value: f64, what: &str) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{what} must be greater than 0")))
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the document does not parse
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create the smoothing filter from configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::FilterError` for an unknown filter or invalid parameters
    pub fn create_filter(&self) -> Result<Box<dyn PoseFilter>> {
        let smoothing = &self.smoothing;
        match smoothing.filter.as_str() {
            "recency" | "recency_weighted" => {
                if smoothing.history_capacity == 0
                    || smoothing.min_history == 0
                    || smoothing.min_history > smoothing.history_capacity
                {
                    return Err(Error::FilterError(format!(
                        "Invalid smoothing history: capacity {}, minimum {}",
                        smoothing.history_capacity, smoothing.min_history
                    )));
                }
                Ok(Box::new(RecencyWeightedSmoother::new(
                    smoothing.history_capacity,
                    smoothing.min_history,
                )))
            }
            "exponential" => {
                if !(smoothing.exponential_alpha > 0.0 && smoothing.exponential_alpha <= 1.0) {
                    return Err(Error::FilterError(format!(
                        "Alpha must be in (0, 1], got {}",
                        smoothing.exponential_alpha
                    )));
                }
                Ok(Box::new(ExponentialPoseFilter::new(smoothing.exponential_alpha)))
            }
            name => create_filter(name),
        }
    }

    /// Load the template catalog: the configured file, else the built-in one
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file cannot be loaded
    pub fn load_templates(&self) -> Result<TemplateCatalog> {
        match &self.comparison.template_file {
            Some(path) => TemplateCatalog::from_file(path),
            None => Ok(TemplateCatalog::builtin()),
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        // Thresholds
        check_unit(self.analysis.confidence_threshold, "Confidence threshold")?;
        check_unit(self.detector.min_pose_score, "Minimum pose score")?;
        check_unit(self.detector.score_threshold, "Detector score threshold")?;
        check_unit(self.analysis.balance_warning, "Balance warning")?;
        check_unit(self.comparison.suggestion_threshold, "Suggestion threshold")?;
        check_unit(self.feedback.metric_warning_score, "Metric warning score")?;

        if self.detector.max_poses != 1 {
            return Err(Error::ConfigError("Only single-subject detection is supported".to_string()));
        }

        // Smoothing
        if self.smoothing.history_capacity == 0 {
            return Err(Error::ConfigError("History capacity must be greater than 0".to_string()));
        }
        if self.smoothing.min_history == 0 || self.smoothing.min_history > self.smoothing.history_capacity {
            return Err(Error::ConfigError(
                "Minimum history must be between 1 and the history capacity".to_string(),
            ));
        }
        if !(self.smoothing.exponential_alpha > 0.0 && self.smoothing.exponential_alpha <= 1.0) {
            return Err(Error::ConfigError("Exponential alpha must be in (0, 1]".to_string()));
        }

        // Analysis
        if self.analysis.stance_ratio_min > self.analysis.stance_ratio_max {
            return Err(Error::ConfigError("Stance ratio minimum exceeds maximum".to_string()));
        }
        if self.analysis.lunge_angle_min >= self.analysis.lunge_angle_max {
            return Err(Error::ConfigError("Lunge angle minimum must be below maximum".to_string()));
        }
        check_positive(self.analysis.arm_extension_target, "Arm extension target")?;
        check_positive(self.analysis.balance_scale, "Balance scale")?;

        // Feedback
        if self.feedback.max_items == 0 {
            return Err(Error::ConfigError("Feedback item cap must be greater than 0".to_string()));
        }
        if !(0.0..=100.0).contains(&self.feedback.high_priority_score)
            || !(0.0..=100.0).contains(&self.feedback.encouragement_score)
        {
            return Err(Error::ConfigError("Feedback score thresholds must be between 0 and 100".to_string()));
        }

        // Stability
        if self.stability.window_size == 0 {
            return Err(Error::ConfigError("Stability window must be greater than 0".to_string()));
        }
        check_positive(self.stability.scale, "Stability scale")?;

        // Environment
        if self.environment.sample_stride == 0 {
            return Err(Error::ConfigError("Sample stride must be greater than 0".to_string()));
        }
        check_positive(self.environment.lighting_gain, "Lighting gain")?;

        if self.session.fps_update_interval_ms == 0 {
            return Err(Error::ConfigError("FPS update interval must be greater than 0".to_string()));
        }

        // Template file must exist when configured
        if let Some(path) = &self.comparison.template_file {
            if !path.exists() {
                return Err(Error::ConfigError(format!("Template file not found: {}", path.display())));
            }
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Fencing Pose Configuration

# External pose model
detector:
  model_type: "SINGLEPOSE_THUNDER"
  max_poses: 1
  min_pose_score: 0.3
  score_threshold: 0.3
  enable_smoothing: true
  enable_tracking: true

# Temporal smoothing
smoothing:
  filter: "recency"
  history_capacity: 5
  min_history: 3
  exponential_alpha: 0.5

# Metric extraction
analysis:
  confidence_threshold: 0.3
  stance_ratio_min: 0.8
  stance_ratio_max: 1.2
  lunge_angle_min: 45.0
  lunge_angle_max: 90.0
  arm_extension_target: 170.0
  arm_extension_warning: 150.0
  balance_scale: 50.0
  balance_warning: 0.7

# Ideal-pose comparison
comparison:
  suggestion_threshold: 0.8
  # template_file: "templates.yaml"

# Coaching feedback
feedback:
  cooldown_ms: 500
  max_items: 3
  high_priority_score: 70.0
  metric_warning_score: 0.7
  encouragement_score: 90.0

# Progress tracking
progress:
  recent_improvements: 5

# Stance stability
stability:
  enabled: true
  window_size: 15
  scale: 20.0

# Lighting estimation
environment:
  update_interval_ms: 5000
  sample_stride: 16
  lighting_gain: 1.2

# Session defaults
session:
  technique: ENGARDE
  weapon: FOIL
  fps_update_interval_ms: 1000
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config = Config::from_yaml_str(EXAMPLE_CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.feedback.cooldown_ms, 500);
        assert_eq!(config.smoothing.history_capacity, 5);
        assert_eq!(config.session.technique, Technique::Engarde);
        assert_eq!(config.session.weapon, Weapon::Foil);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_yaml_str("session:\n  technique: PARRY_6\n").unwrap();
        assert_eq!(config.session.technique, Technique::Parry6);
        assert_eq!(config.session.fps_update_interval_ms, 1000);
        assert_eq!(config.analysis.confidence_threshold, 0.3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.analysis.confidence_threshold = 1.5;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let mut config = Config::default();
        config.smoothing.min_history = 6;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.feedback.max_items = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.detector.max_poses = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_create_filter_from_config() {
        let mut config = Config::default();
        assert_eq!(config.create_filter().unwrap().name(), "RecencyWeightedSmoother");

        config.smoothing.filter = "exponential".to_string();
        assert_eq!(config.create_filter().unwrap().name(), "ExponentialPoseFilter");

        config.smoothing.filter = "none".to_string();
        assert_eq!(config.create_filter().unwrap().name(), "NoFilter");

        config.smoothing.filter = "kalman".to_string();
        assert!(config.create_filter().is_err());
    }

    #[test]
    fn test_create_filter_rejects_bad_history() {
        let mut config = Config::default();
        config.smoothing.history_capacity = 0;
        assert!(matches!(config.create_filter(), Err(Error::FilterError(_))));
    }
}
