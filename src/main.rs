//! Fencing pose replay tool: runs a recorded pose sequence through the
//! analysis pipeline and prints the resulting progress.

use anyhow::{Context, Result};
use clap::Parser;
use fencing_pose::{
    config::Config,
    detector::ReplayDetector,
    session::{FeedbackUpdate, FencingSession, SessionRunner, StopHandle},
    technique::{Technique, Weapon},
};
use log::{info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded pose sequence to replay (YAML)
    #[arg(short, long)]
    recording: String,

    /// Technique to score against (e.g. ENGARDE, LUNGE, PARRY_4)
    #[arg(short, long)]
    technique: Option<String>,

    /// Weapon (foil, epee, sabre)
    #[arg(short, long)]
    weapon: Option<String>,

    /// Smoothing filter (recency[:capacity[:min_history]], exponential[:alpha], none)
    #[arg(short, long)]
    filter: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Spacing of the synthetic frame clock in milliseconds (1-60000)
    #[arg(long, default_value = "33", value_parser = clap::value_parser!(u64).range(1..=60_000))]
    frame_interval_ms: u64,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Fencing Pose Analysis - replay");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Command line overrides
    if let Some(technique) = &args.technique {
        config.session.technique = technique.parse::<Technique>().context("Invalid --technique")?;
    }
    if let Some(weapon) = &args.weapon {
        config.session.weapon = weapon.parse::<Weapon>().context("Invalid --weapon")?;
    }
    if let Some(filter) = args.filter {
        config.smoothing.filter = filter;
    }

    let catalog = config.load_templates().context("Failed to load templates")?;
    let session = FencingSession::new(&config, Arc::new(catalog)).context("Failed to start session")?;
    let mut detector = ReplayDetector::from_file(&args.recording, &config.detector)
        .with_context(|| format!("Failed to load recording {}", args.recording))?;

    // Synthetic clock so replays are independent of wall time
    let start = Instant::now();
    let interval = Duration::from_millis(args.frame_interval_ms);
    let mut next = start;
    let clock = move || {
        let now = next;
        next = next.checked_add(interval).unwrap_or(next);
        now
    };

    let stop = StopHandle::new();
    let mut runner = SessionRunner::new(session);
    let stats = runner.run(&mut detector, &stop, clock, |_, output| match &output.feedback {
        FeedbackUpdate::Updated(feedback) => {
            info!("Score {:.0}% with {} at {} FPS", feedback.score, feedback.weapon, output.fps);
            for item in &feedback.items {
                info!("  [{:?}] {} - {}", item.priority, item.message, item.tip);
            }
        }
        FeedbackUpdate::Cleared => info!("No fencer in frame"),
        FeedbackUpdate::Unchanged => {}
    });

    info!("Replayed {} frames, {} detector failures", stats.frames, stats.detector_failures);

    let progress = runner.session().progress();
    print!("{}", serde_yaml::to_string(&progress).context("Failed to serialize progress")?);

    Ok(())
}
