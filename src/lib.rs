//! Fencing pose analysis library for real-time form coaching.
//!
//! This library post-processes per-frame body keypoints produced by an
//! external single-person pose model:
//! - Temporal smoothing of noisy keypoint estimates
//! - Fencing metrics: en garde, lunge, weapon-arm extension, balance, stability
//! - Scoring against ideal-pose templates for 17 techniques
//! - Prioritised, rate-limited coaching feedback and progress tracking
//!
//! The analysis pipeline consists of:
//! 1. Keypoint access with a confidence threshold
//! 2. Recency-weighted smoothing over a short pose history
//! 3. Metric extraction from the smoothed pose
//! 4. Comparison with the selected technique's template
//! 5. Feedback generation, throttled by a cooldown
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use fencing_pose::{
//!     comparator::Comparator,
//!     config::Config,
//!     metrics::analyze_fencing_pose,
//!     pose::{Keypoint, Landmark, Pose},
//!     technique::Technique,
//!     templates::TemplateCatalog,
//! };
//! use std::sync::Arc;
//!
//! let pose = Pose::new(
//!     vec![
//!         Keypoint::new(Landmark::LeftShoulder, 280.0, 160.0, 0.9),
//!         Keypoint::new(Landmark::RightShoulder, 360.0, 160.0, 0.9),
//!         Keypoint::new(Landmark::LeftHip, 285.0, 280.0, 0.9),
//!         Keypoint::new(Landmark::RightHip, 355.0, 280.0, 0.9),
//!     ],
//!     0,
//! );
//!
//! if let Some(metrics) = analyze_fencing_pose(&pose) {
//!     println!("En garde: {}, balance: {:.2}", metrics.en_garde, metrics.balance);
//! }
//!
//! let config = Config::default();
//! let comparator = Comparator::new(
//!     Arc::new(TemplateCatalog::builtin()),
//!     config.analysis.clone(),
//!     config.comparison.clone(),
//! );
//! if let Some(result) = comparator.compare(&pose, Technique::Engarde) {
//!     println!("Score: {:.0}", result.score);
//! }
//! ```
//!
//! ## Using Filters
//!
//! ```no_run
//! use fencing_pose::filters::create_filter;
//! use fencing_pose::pose::{Keypoint, Landmark, Pose};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut filter = create_filter("recency:5:3")?;
//!
//! let pose = Pose::new(vec![Keypoint::new(Landmark::Nose, 320.0, 100.0, 0.9)], 0);
//! let smoothed = filter.apply(&pose);
//! println!("Smoothed nose: {:?}", smoothed.get(Landmark::Nose));
//!
//! filter.reset();
//! # Ok(())
//! # }
//! ```
//!
//! ## Complete Pipeline Example
//!
//! ```no_run
//! use fencing_pose::{
//!     config::Config,
//!     detector::ReplayDetector,
//!     session::{FeedbackUpdate, FencingSession, SessionRunner, StopHandle},
//!     templates::TemplateCatalog,
//! };
//! use std::{sync::Arc, time::Instant};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let session = FencingSession::new(&config, Arc::new(TemplateCatalog::builtin()))?;
//! let mut detector = ReplayDetector::from_file("recording.yaml", &config.detector)?;
//!
//! let stop = StopHandle::new();
//! let mut runner = SessionRunner::new(session);
//! runner.run(&mut detector, &stop, Instant::now, |_, output| {
//!     if let FeedbackUpdate::Updated(feedback) = &output.feedback {
//!         for item in &feedback.items {
//!             println!("{:?}: {}", item.priority, item.message);
//!         }
//!     }
//! });
//!
//! println!("{:?}", runner.session().progress());
//! # Ok(())
//! # }
//! ```

/// Landmarks, keypoints, poses and the keypoint accessor
pub mod pose;

/// Planar geometry helpers
pub mod geometry;

/// Temporal filtering algorithms for smoothing pose estimates
pub mod filters;

/// Fencing metric extraction
pub mod metrics;

/// Stance stability from recent hip motion
pub mod stability;

/// Technique and weapon identifiers
pub mod technique;

/// Ideal-pose template catalog
pub mod templates;

/// Table-driven ideal-pose comparison
pub mod comparator;

/// Rate-limited coaching feedback
pub mod feedback;

/// In-memory progress tracking
pub mod progress;

/// Skeleton overlay geometry
pub mod skeleton;

/// Lighting estimation from frame pixels
pub mod environment;

/// External pose detector boundary
pub mod detector;

/// Per-frame pipeline and frame loop
pub mod session;

/// Error types and result handling
pub mod error;

/// Constants used throughout the library
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
