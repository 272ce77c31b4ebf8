//! Temporal filtering of per-frame pose estimates.
//!
//! Detector output jitters from frame to frame. A [`PoseFilter`] consumes
//! each raw pose and returns a steadier one carrying the same landmark
//! identities.

/// Recency-weighted average over a short pose history
pub mod recency_weighted;

/// Per-landmark exponential smoothing
pub mod exponential;

use crate::{
    constants::{DEFAULT_EXPONENTIAL_ALPHA, DEFAULT_HISTORY_CAPACITY, DEFAULT_MIN_HISTORY},
    pose::Pose,
    Error, Result,
};

/// Trait for all pose filters
pub trait PoseFilter: Send + Sync {
    /// Feed the newest raw pose and get the filtered pose back
    fn apply(&mut self, pose: &Pose) -> Pose;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes poses through unchanged
pub struct NoFilter;

impl PoseFilter for NoFilter {
    fn apply(&mut self, pose: &Pose) -> Pose {
        pose.clone()
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

fn parse_param<T: std::str::FromStr>(filter_type: &str, value: Option<&str>, default: T) -> Result<T> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::FilterError(format!("Invalid parameter '{raw}' for filter {filter_type}"))),
    }
}

/// Create a pose filter from a `name[:param[:param]]` description.
///
/// Supported forms:
/// - `none`
/// - `recency[:capacity[:min_history]]` (default `recency:5:3`)
/// - `exponential[:alpha]` (default `exponential:0.5`)
///
/// # Errors
///
/// Returns `Error::FilterError` for unknown names or out-of-range parameters.
pub fn create_filter(filter_type: &str) -> Result<Box<dyn PoseFilter>> {
    let mut parts = filter_type.split(':');
    let name = parts.next().unwrap_or_default().trim().to_lowercase();
    let first = parts.next();
    let second = parts.next();

    match name.as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "recency" | "recency_weighted" | "recencyweighted" => {
            let capacity = parse_param(filter_type, first, DEFAULT_HISTORY_CAPACITY)?;
            let min_history = parse_param(filter_type, second, DEFAULT_MIN_HISTORY.min(capacity.max(1)))?;
            if capacity == 0 {
                return Err(Error::FilterError("History capacity must be greater than 0".to_string()));
            }
            if min_history == 0 || min_history > capacity {
                return Err(Error::FilterError(format!(
                    "Minimum history must be in 1..={capacity}, got {min_history}"
                )));
            }
            Ok(Box::new(recency_weighted::RecencyWeightedSmoother::new(capacity, min_history)))
        }
        "exponential" | "ema" => {
            let alpha: f64 = parse_param(filter_type, first, DEFAULT_EXPONENTIAL_ALPHA)?;
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(Error::FilterError(format!("Alpha must be in (0, 1], got {alpha}")));
            }
            Ok(Box::new(exponential::ExponentialPoseFilter::new(alpha)))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {filter_type}"))),
    }
}
