//! Real-time coaching feedback.
//!
//! Turns a comparison into at most a handful of prioritised messages and
//! rate-limits updates: a call arriving within the cooldown window of the
//! last emitted update is dropped, not queued.

use crate::{
    comparator::{metric_definition, ComparisonResult, Comparator},
    config::FeedbackConfig,
    pose::Pose,
    technique::{Technique, Weapon},
};
use log::trace;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const GENERIC_MESSAGE: &str = "Adjust your stance for better balance";
pub const GENERIC_TIP: &str = "Keep your weight evenly distributed between both feet";
pub const ENCOURAGEMENT_MESSAGE: &str = "Good form";
pub const ENCOURAGEMENT_TIP: &str = "Hold this position and stay relaxed";

/// Feedback priority; orders `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub priority: Priority,
    pub message: String,
    pub tip: String,
}

impl FeedbackItem {
    fn new(priority: Priority, message: &str, tip: &str) -> Self {
        Self {
            priority,
            message: message.to_string(),
            tip: tip.to_string(),
        }
    }
}

/// One feedback update for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// 0-100
    pub score: f64,
    /// Highest priority first
    pub items: Vec<FeedbackItem>,
    pub timestamp_ms: u64,
    pub weapon: Weapon,
}

/// Rate-limited feedback generator
pub struct FeedbackGenerator {
    config: FeedbackConfig,
    last_emit: Option<Instant>,
}

impl FeedbackGenerator {
    #[must_use]
    pub fn new(config: FeedbackConfig) -> Self {
        Self {
            config,
            last_emit: None,
        }
    }

    fn cooldown(&self) -> Duration {
        Duration::from_millis(self.config.cooldown_ms)
    }

    /// Whether an update at `now` would be suppressed
    #[must_use]
    pub fn is_cooling_down(&self, now: Instant) -> bool {
        self.last_emit
            .is_some_and(|last| now.saturating_duration_since(last) < self.cooldown())
    }

    /// Compare `pose` with `technique` and build an update, or `None` when
    /// the call falls inside the cooldown window.
    pub fn generate(
        &mut self,
        comparator: &Comparator,
        pose: &Pose,
        technique: Technique,
        weapon: Weapon,
        now: Instant,
    ) -> Option<Feedback> {
        if self.is_cooling_down(now) {
            trace!("Feedback suppressed by cooldown");
            return None;
        }
        let comparison = comparator.compare(pose, technique);
        self.generate_from(comparison.as_ref(), weapon, pose.timestamp_ms, now)
    }

    /// Build an update from an existing comparison, subject to the cooldown.
    ///
    /// A missing comparison (unknown template) scores 0.
    pub fn generate_from(
        &mut self,
        comparison: Option<&ComparisonResult>,
        weapon: Weapon,
        timestamp_ms: u64,
        now: Instant,
    ) -> Option<Feedback> {
        if self.is_cooling_down(now) {
            trace!("Feedback suppressed by cooldown");
            return None;
        }
        self.last_emit = Some(now);
        Some(self.build(comparison, weapon, timestamp_ms))
    }

    /// Build an update without touching the cooldown
    #[must_use]
    pub fn build(&self, comparison: Option<&ComparisonResult>, weapon: Weapon, timestamp_ms: u64) -> Feedback {
        let cfg = &self.config;
        let score = comparison.map_or(0.0, |c| c.score);
        let mut items = Vec::new();

        if score < cfg.high_priority_score {
            items.push(FeedbackItem::new(Priority::High, GENERIC_MESSAGE, GENERIC_TIP));
        }

        if let Some(comparison) = comparison {
            for (name, detail) in &comparison.details {
                if detail.score >= cfg.metric_warning_score {
                    continue;
                }
                let Some(def) = metric_definition(name) else {
                    continue;
                };
                if items.iter().any(|item: &FeedbackItem| item.message == def.message) {
                    continue;
                }
                items.push(FeedbackItem::new(Priority::Medium, def.message, def.tip));
            }
        }

        if items.is_empty() && score >= cfg.encouragement_score {
            items.push(FeedbackItem::new(Priority::Low, ENCOURAGEMENT_MESSAGE, ENCOURAGEMENT_TIP));
        }

        // Stable, so equal priorities keep their order
        items.sort_by(|a, b| b.priority.cmp(&a.priority));
        items.truncate(cfg.max_items);

        Feedback {
            score,
            items,
            timestamp_ms,
            weapon,
        }
    }

    /// Forget the last emission so the next call goes through
    pub fn reset(&mut self) {
        self.last_emit = None;
    }
}

impl Default for FeedbackGenerator {
    fn default() -> Self {
        Self::new(FeedbackConfig::default())
    }
}
