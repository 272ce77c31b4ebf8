//! Per-frame pipeline and the cancellable frame loop.
//!
//! A [`FencingSession`] owns every piece of mutable state of one camera
//! session: smoother history, stability window, feedback cooldown, progress
//! log, frame-rate counter and the lighting estimate. It is created when the
//! session starts and dropped when it ends.
//!
//! [`SessionRunner`] drives a session from a [`PoseDetector`]: one detection,
//! then one synchronous pipeline pass, then the next iteration. A
//! [`StopHandle`] cancels the loop before the next detection is requested.

use crate::{
    comparator::{ComparisonResult, Comparator},
    config::Config,
    detector::PoseDetector,
    environment::{EnvironmentMonitor, EnvironmentReading},
    feedback::{Feedback, FeedbackGenerator},
    filters::PoseFilter,
    metrics::{FencingMetrics, MetricExtractor, ResolvedPose},
    pose::Pose,
    progress::{ProgressSnapshot, ProgressTracker},
    stability::StabilityTracker,
    technique::{Technique, Weapon},
    templates::TemplateCatalog,
    Result,
};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Frames-per-second counter updated at a fixed cadence
pub struct FpsCounter {
    interval: Duration,
    frames: u32,
    last_update: Option<Instant>,
    fps: u32,
}

impl FpsCounter {
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            frames: 0,
            last_update: None,
            fps: 0,
        }
    }

    /// Count one frame and return the current rate
    pub fn tick(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last_update else {
            self.last_update = Some(now);
            return self.fps;
        };

        self.frames += 1;
        let elapsed = now.saturating_duration_since(last);
        if elapsed >= self.interval {
            let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
            self.fps = (f64::from(self.frames) * 1000.0 / elapsed_ms).round() as u32;
            self.frames = 0;
            self.last_update = Some(now);
        }
        self.fps
    }

    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// What happened to the feedback panel this frame
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackUpdate {
    /// Keep showing the previous feedback
    Unchanged,
    /// No subject in frame: clear the panel
    Cleared,
    Updated(Feedback),
}

/// Result of one pipeline pass
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub smoothed_pose: Option<Pose>,
    pub metrics: Option<FencingMetrics>,
    pub comparison: Option<ComparisonResult>,
    pub feedback: FeedbackUpdate,
    pub fps: u32,
}

/// State of one analysis session
pub struct FencingSession {
    filter: Box<dyn PoseFilter>,
    extractor: MetricExtractor,
    stability: Option<StabilityTracker>,
    comparator: Comparator,
    feedback: FeedbackGenerator,
    progress: ProgressTracker,
    environment: EnvironmentMonitor,
    fps: FpsCounter,
    technique: Technique,
    weapon: Weapon,
}

impl FencingSession {
    /// Start a session
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: &Config, catalog: Arc<TemplateCatalog>) -> Result<Self> {
        config.validate()?;
        let filter = config.create_filter()?;

        info!(
            "Starting session: {} with {}, smoothing with {}",
            config.session.technique,
            config.session.weapon,
            filter.name()
        );

        Ok(Self {
            filter,
            extractor: MetricExtractor::new(config.analysis.clone()),
            stability: config
                .stability
                .enabled
                .then(|| StabilityTracker::new(config.stability.window_size, config.stability.scale)),
            comparator: Comparator::new(catalog, config.analysis.clone(), config.comparison.clone()),
            feedback: FeedbackGenerator::new(config.feedback.clone()),
            progress: ProgressTracker::new(config.progress.recent_improvements),
            environment: EnvironmentMonitor::new(config.environment.clone()),
            fps: FpsCounter::new(config.session.fps_update_interval_ms),
            technique: config.session.technique,
            weapon: config.session.weapon,
        })
    }

    /// Start a session with default settings and the built-in templates
    ///
    /// # Errors
    ///
    /// Returns an error if the default configuration is invalid
    pub fn with_defaults() -> Result<Self> {
        Self::new(&Config::default(), Arc::new(TemplateCatalog::builtin()))
    }

    #[must_use]
    pub fn technique(&self) -> Technique {
        self.technique
    }

    #[must_use]
    pub fn weapon(&self) -> Weapon {
        self.weapon
    }

    /// Select the technique scored from the next frame on
    pub fn set_technique(&mut self, technique: Technique) {
        if technique != self.technique {
            info!("Technique changed to {technique}");
            self.technique = technique;
        }
    }

    /// Select the weapon reported from the next frame on
    pub fn set_weapon(&mut self, weapon: Weapon) {
        if weapon != self.weapon {
            info!("Weapon changed to {weapon}");
            self.weapon = weapon;
        }
    }

    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.get_progress()
    }

    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Feed raw RGBA pixels of the current frame to the lighting estimate
    pub fn observe_frame(&mut self, rgba: &[u8], now: Instant) -> EnvironmentReading {
        self.environment.sample(rgba, now)
    }

    #[must_use]
    pub fn environment(&self) -> EnvironmentReading {
        self.environment.reading()
    }

    /// Run one detector outcome through the pipeline.
    ///
    /// A detector error is logged and the frame skipped; the session stays
    /// usable for the next frame.
    pub fn process_frame(&mut self, detection: Result<Option<Pose>>, now: Instant) -> FrameOutput {
        let fps = self.fps.tick(now);

        let pose = match detection {
            Ok(Some(pose)) => pose,
            Ok(None) => {
                return FrameOutput {
                    smoothed_pose: None,
                    metrics: None,
                    comparison: None,
                    feedback: FeedbackUpdate::Cleared,
                    fps,
                }
            }
            Err(e) => {
                warn!("Skipping frame: {e}");
                return FrameOutput {
                    smoothed_pose: None,
                    metrics: None,
                    comparison: None,
                    feedback: FeedbackUpdate::Unchanged,
                    fps,
                };
            }
        };

        let smoothed = self.filter.apply(&pose);
        let body = ResolvedPose::new(&smoothed, self.extractor.config().confidence_threshold);

        let mut metrics = self.extractor.extract(&smoothed);
        if let (Some(metrics), Some(tracker)) = (metrics.as_mut(), self.stability.as_mut()) {
            if let Some(stability) = tracker.update_from(&body) {
                metrics.stability = stability;
            }
        }

        let comparison = self.comparator.compare_resolved(&body, self.technique);
        if let Some(comparison) = &comparison {
            debug!("Frame {}: {} scored {:.1}", smoothed.timestamp_ms, self.technique, comparison.score);
            self.progress.record(comparison, self.technique, smoothed.timestamp_ms);
        }

        let feedback = match self
            .feedback
            .generate_from(comparison.as_ref(), self.weapon, smoothed.timestamp_ms, now)
        {
            Some(feedback) => FeedbackUpdate::Updated(feedback),
            None => FeedbackUpdate::Unchanged,
        };

        FrameOutput {
            smoothed_pose: Some(smoothed),
            metrics,
            comparison,
            feedback,
            fps,
        }
    }
}

/// Cancels a running frame loop
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop before its next iteration
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counters of one loop run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames: usize,
    pub detector_failures: usize,
}

/// Drives a session from a detector, one frame at a time
pub struct SessionRunner {
    session: FencingSession,
}

impl SessionRunner {
    #[must_use]
    pub fn new(session: FencingSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &FencingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut FencingSession {
        &mut self.session
    }

    /// End the session and hand back its final state
    #[must_use]
    pub fn into_session(self) -> FencingSession {
        self.session
    }

    /// Run until `stop` is raised or the detector is exhausted.
    ///
    /// Each iteration waits for the detector, runs the pipeline and hands
    /// the output to `on_frame`; the next detection is only requested after
    /// that. `clock` supplies the time of each frame.
    pub fn run<D, C, F>(&mut self, detector: &mut D, stop: &StopHandle, mut clock: C, mut on_frame: F) -> RunStats
    where
        D: PoseDetector + ?Sized,
        C: FnMut() -> Instant,
        F: FnMut(&mut FencingSession, &FrameOutput),
    {
        info!("Entering frame loop with {}", detector.name());
        let mut stats = RunStats::default();

        loop {
            if stop.is_stopped() {
                info!("Frame loop stopped");
                break;
            }
            if detector.is_exhausted() {
                info!("Detector has no more frames");
                break;
            }

            let detection = detector.detect();
            if detection.is_err() {
                stats.detector_failures += 1;
            }

            let output = self.session.process_frame(detection, clock());
            stats.frames += 1;
            on_frame(&mut self.session, &output);
        }

        info!(
            "Frame loop finished after {} frames ({} detector failures)",
            stats.frames, stats.detector_failures
        );
        stats
    }
}
