//! Constants used throughout the library

/// Number of landmarks produced by the single-person detector
pub const NUM_LANDMARKS: usize = 17;

/// Keypoints at or below this confidence are unusable
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// Pose history capacity for the recency-weighted smoother
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Minimum history length before smoothing kicks in
pub const DEFAULT_MIN_HISTORY: usize = 3;

/// Default exponential smoothing factor for the per-landmark EMA filter
pub const DEFAULT_EXPONENTIAL_ALPHA: f64 = 0.5;

/// Inclusive shoulder/hip width ratio window for the en garde stance
pub const STANCE_RATIO_MIN: f64 = 0.8;
pub const STANCE_RATIO_MAX: f64 = 1.2;

/// Front thigh inclination window (exclusive, degrees) that counts as a lunge
pub const LUNGE_ANGLE_MIN: f64 = 45.0;
pub const LUNGE_ANGLE_MAX: f64 = 90.0;

/// Ideal weapon arm included angle in degrees
pub const ARM_EXTENSION_TARGET: f64 = 170.0;

/// Below this arm angle the extractor asks for more extension
pub const ARM_EXTENSION_WARNING: f64 = 150.0;

/// Horizontal offset (in input units) that maps to a full balance penalty
pub const BALANCE_SCALE: f64 = 50.0;

/// Balance below this value produces a suggestion
pub const BALANCE_WARNING: f64 = 0.7;

/// Balance reported when it cannot be computed
pub const DEFAULT_BALANCE: f64 = 0.5;

/// Stability reported until enough frames have been observed
pub const DEFAULT_STABILITY: f64 = 0.8;

/// Stability tracker window and spread scale
pub const DEFAULT_STABILITY_WINDOW: usize = 15;
pub const DEFAULT_STABILITY_SCALE: f64 = 20.0;

/// Comparator normalisation divisors per metric class
pub const ANGLE_DIVISOR: f64 = 45.0;
pub const RATIO_DIVISOR: f64 = 0.5;
pub const POSITION_DIVISOR: f64 = 0.5;

/// Per-metric score below which the comparator emits a suggestion
pub const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Overall score below which the generic high-priority message is raised
pub const HIGH_PRIORITY_SCORE: f64 = 70.0;

/// Per-metric score below which a medium-priority message is raised
pub const METRIC_WARNING_SCORE: f64 = 0.7;

/// Overall score that earns a low-priority encouragement
pub const ENCOURAGEMENT_SCORE: f64 = 90.0;

/// Feedback cooldown in milliseconds
pub const DEFAULT_FEEDBACK_COOLDOWN_MS: u64 = 500;

/// Maximum number of simultaneous feedback items
pub const DEFAULT_MAX_FEEDBACK_ITEMS: usize = 3;

/// Number of improvements returned in a progress snapshot
pub const DEFAULT_RECENT_IMPROVEMENTS: usize = 5;

/// Interval between FPS counter updates
pub const FPS_UPDATE_INTERVAL_MS: u64 = 1000;

/// Interval between lighting re-estimations
pub const ENVIRONMENT_UPDATE_INTERVAL_MS: u64 = 5000;

/// Byte stride used when sampling RGBA pixels (every 4th pixel)
pub const ENVIRONMENT_SAMPLE_STRIDE: usize = 16;

/// Gain applied to mean brightness when estimating lighting
pub const LIGHTING_GAIN: f64 = 1.2;

/// Radius of the joint highlight drawn by overlay consumers
pub const HIGHLIGHT_RADIUS: f64 = 20.0;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
