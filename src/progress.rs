//! In-memory progress tracking across the scored frames of a session.

use crate::{
    comparator::{ComparisonResult, MetricDetail},
    constants::DEFAULT_RECENT_IMPROVEMENTS,
    technique::Technique,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One recorded comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub timestamp_ms: u64,
    pub technique: Technique,
    pub score: f64,
    pub details: BTreeMap<String, MetricDetail>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestScore {
    pub score: f64,
    pub timestamp_ms: u64,
}

/// Score gain between two consecutive entries of the same technique
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub technique: Technique,
    pub improvement: f64,
    pub timestamp_ms: u64,
}

/// Read-only view of the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Mean of all recorded scores, 0 when nothing was recorded
    pub overall_score: f64,
    pub last_session: Option<SessionEntry>,
    pub best_scores: BTreeMap<Technique, BestScore>,
    pub recent_improvements: Vec<Improvement>,
    pub total_sessions: usize,
}

/// Append-only progress log
pub struct ProgressTracker {
    sessions: Vec<SessionEntry>,
    score_total: f64,
    best_scores: BTreeMap<Technique, BestScore>,
    improvements: Vec<Improvement>,
    recent_limit: usize,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(recent_limit: usize) -> Self {
        Self {
            sessions: Vec::new(),
            score_total: 0.0,
            best_scores: BTreeMap::new(),
            improvements: Vec::new(),
            recent_limit,
        }
    }

    /// Append a comparison and update the best scores and improvements
    pub fn record(&mut self, comparison: &ComparisonResult, technique: Technique, timestamp_ms: u64) {
        let score = comparison.score;

        if let Some(previous) = self.sessions.last() {
            if previous.technique == technique && score > previous.score {
                let improvement = score - previous.score;
                debug!("{technique} improved by {improvement:.1}");
                self.improvements.push(Improvement {
                    technique,
                    improvement,
                    timestamp_ms,
                });
            }
        }

        let is_best = self.best_scores.get(&technique).map_or(true, |best| score > best.score);
        if is_best {
            self.best_scores.insert(technique, BestScore { score, timestamp_ms });
        }

        self.score_total += score;
        self.sessions.push(SessionEntry {
            timestamp_ms,
            technique,
            score,
            details: comparison.details.clone(),
        });
    }

    #[must_use]
    pub fn overall_score(&self) -> f64 {
        if self.sessions.is_empty() {
            0.0
        } else {
            self.score_total / self.sessions.len() as f64
        }
    }

    #[must_use]
    pub fn best_score(&self, technique: Technique) -> Option<BestScore> {
        self.best_scores.get(&technique).copied()
    }

    /// Every improvement recorded so far, oldest first
    #[must_use]
    pub fn improvements(&self) -> &[Improvement] {
        &self.improvements
    }

    #[must_use]
    pub fn sessions(&self) -> &[SessionEntry] {
        &self.sessions
    }

    #[must_use]
    pub fn get_progress(&self) -> ProgressSnapshot {
        let start = self.improvements.len().saturating_sub(self.recent_limit);
        ProgressSnapshot {
            overall_score: self.overall_score(),
            last_session: self.sessions.last().cloned(),
            best_scores: self.best_scores.clone(),
            recent_improvements: self.improvements[start..].to_vec(),
            total_sessions: self.sessions.len(),
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_IMPROVEMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(score: f64) -> ComparisonResult {
        ComparisonResult {
            technique: Technique::Engarde,
            score,
            feedback: Vec::new(),
            details: BTreeMap::new(),
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = ProgressTracker::default().get_progress();
        assert_eq!(snapshot.overall_score, 0.0);
        assert_eq!(snapshot.total_sessions, 0);
        assert!(snapshot.last_session.is_none());
        assert!(snapshot.best_scores.is_empty());
    }

    #[test]
    fn test_consecutive_improvements_only() {
        let mut tracker = ProgressTracker::default();
        for (i, score) in [50.0, 60.0, 55.0, 70.0].into_iter().enumerate() {
            tracker.record(&scored(score), Technique::Lunge, i as u64);
        }

        let snapshot = tracker.get_progress();
        assert_eq!(snapshot.best_scores[&Technique::Lunge].score, 70.0);
        assert_eq!(snapshot.best_scores[&Technique::Lunge].timestamp_ms, 3);
        let gains: Vec<f64> = snapshot.recent_improvements.iter().map(|i| i.improvement).collect();
        assert_eq!(gains, vec![10.0, 15.0]);
        assert_eq!(snapshot.total_sessions, 4);
        assert!((snapshot.overall_score - 58.75).abs() < 1e-9);
    }

    #[test]
    fn test_cross_technique_is_not_an_improvement() {
        let mut tracker = ProgressTracker::default();
        tracker.record(&scored(40.0), Technique::Engarde, 0);
        tracker.record(&scored(90.0), Technique::Lunge, 1);
        tracker.record(&scored(95.0), Technique::Engarde, 2);
        assert!(tracker.improvements().is_empty());
        assert_eq!(tracker.best_score(Technique::Engarde).unwrap().score, 95.0);
    }

    #[test]
    fn test_equal_score_keeps_first_best() {
        let mut tracker = ProgressTracker::default();
        tracker.record(&scored(80.0), Technique::Engarde, 1);
        tracker.record(&scored(80.0), Technique::Engarde, 2);
        assert_eq!(tracker.best_score(Technique::Engarde).unwrap().timestamp_ms, 1);
        assert!(tracker.improvements().is_empty());
    }

    #[test]
    fn test_recent_improvements_are_limited() {
        let mut tracker = ProgressTracker::new(5);
        for i in 0..10 {
            tracker.record(&scored(i as f64), Technique::Advance, i);
        }
        let snapshot = tracker.get_progress();
        assert_eq!(tracker.improvements().len(), 9);
        assert_eq!(snapshot.recent_improvements.len(), 5);
        assert_eq!(snapshot.recent_improvements[4].timestamp_ms, 9);
        assert_eq!(snapshot.last_session.unwrap().score, 9.0);
    }
}
