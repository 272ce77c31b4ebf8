//! Stance stability from the recent motion of the hips.
//!
//! The hip midpoint of every analysed pose goes into a rolling window. Once
//! the window is full, the spread of those positions turns into a 0-1
//! stability value: a fencer holding still scores close to 1.

use crate::{geometry::Point, metrics::ResolvedPose};
use std::collections::VecDeque;

/// Rolling hip-position window
pub struct StabilityTracker {
    window_size: usize,
    scale: f64,
    x_history: VecDeque<f64>,
    y_history: VecDeque<f64>,
}

impl StabilityTracker {
    /// Create a new tracker
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is zero or `scale` is not positive
    #[must_use]
    pub fn new(window_size: usize, scale: f64) -> Self {
        assert!(window_size > 0, "Stability window must be greater than 0");
        assert!(scale > 0.0, "Stability scale must be positive");
        Self {
            window_size,
            scale,
            x_history: VecDeque::with_capacity(window_size),
            y_history: VecDeque::with_capacity(window_size),
        }
    }

    /// Record the hip midpoint of a pose and return the current stability.
    ///
    /// `None` until the window is full, and for any pose whose hips are not
    /// resolvable. Such a pose leaves the window untouched.
    pub fn update_from(&mut self, body: &ResolvedPose) -> Option<f64> {
        let hip_mid = body.hip_mid()?;
        self.update(hip_mid)
    }

    /// Record a position and return the current stability
    pub fn update(&mut self, position: Point) -> Option<f64> {
        if self.x_history.len() >= self.window_size {
            self.x_history.pop_front();
        }
        if self.y_history.len() >= self.window_size {
            self.y_history.pop_front();
        }

        self.x_history.push_back(position.x);
        self.y_history.push_back(position.y);

        self.stability()
    }

    /// Stability of the current window
    #[must_use]
    pub fn stability(&self) -> Option<f64> {
        if self.x_history.len() < self.window_size {
            return None;
        }

        let spread = (std_dev(&self.x_history) + std_dev(&self.y_history)) / 2.0;
        Some(1.0 - (spread / self.scale).min(1.0))
    }

    /// Reset the tracker
    pub fn reset(&mut self) {
        self.x_history.clear();
        self.y_history.clear();
    }
}

/// Population standard deviation of a window
fn std_dev(data: &VecDeque<f64>) -> f64 {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
