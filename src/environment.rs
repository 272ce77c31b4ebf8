//! Capture-environment estimate from raw frame pixels.

use crate::config::EnvironmentConfig;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Bytes per RGBA pixel
const RGBA_STRIDE: usize = 4;

/// Latest environment reading, 1.0 is ideal for both values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReading {
    pub lighting: f64,
    pub contrast: f64,
}

impl Default for EnvironmentReading {
    fn default() -> Self {
        Self {
            lighting: 1.0,
            contrast: 1.0,
        }
    }
}

/// Periodically re-estimates lighting from sampled frame pixels
pub struct EnvironmentMonitor {
    config: EnvironmentConfig,
    reading: EnvironmentReading,
    last_update: Option<Instant>,
}

impl EnvironmentMonitor {
    #[must_use]
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            config,
            reading: EnvironmentReading::default(),
            last_update: None,
        }
    }

    #[must_use]
    pub fn reading(&self) -> EnvironmentReading {
        self.reading
    }

    /// Feed an RGBA frame. The estimate is refreshed at most once per
    /// update interval; other calls return the previous reading.
    pub fn sample(&mut self, rgba: &[u8], now: Instant) -> EnvironmentReading {
        let interval = Duration::from_millis(self.config.update_interval_ms);
        let due = self
            .last_update
            .map_or(true, |last| now.saturating_duration_since(last) > interval);
        if !due {
            return self.reading;
        }

        if let Some(brightness) = average_brightness(rgba, self.config.sample_stride) {
            self.reading = EnvironmentReading {
                lighting: (brightness * self.config.lighting_gain).clamp(0.0, 1.0),
                contrast: 1.0,
            };
            self.last_update = Some(now);
        }
        self.reading
    }
}

impl Default for EnvironmentMonitor {
    fn default() -> Self {
        Self::new(EnvironmentConfig::default())
    }
}

/// Mean of `(r + g + b) / 3` over pixels starting every `stride` bytes,
/// normalised to 0-1. `None` for a buffer without a full pixel.
#[must_use]
pub fn average_brightness(rgba: &[u8], stride: usize) -> Option<f64> {
    let stride = stride.max(RGBA_STRIDE);
    let (total, count) = rgba
        .chunks(stride)
        .filter(|pixel| pixel.len() >= 3)
        .fold((0.0, 0usize), |(total, count), pixel| {
            let sum = f64::from(pixel[0]) + f64::from(pixel[1]) + f64::from(pixel[2]);
            (total + sum / 3.0, count + 1)
        });

    (count > 0).then(|| total / count as f64 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(value: u8, pixels: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            data.extend_from_slice(&[value, value, value, 255]);
        }
        data
    }

    #[test]
    fn test_brightness_sampling() {
        assert_eq!(average_brightness(&frame(255, 8), 16), Some(1.0));
        assert_eq!(average_brightness(&frame(0, 8), 16), Some(0.0));
        assert_eq!(average_brightness(&[], 16), None);
    }

    #[test]
    fn test_stride_skips_pixels() {
        // Every fourth pixel is sampled; only those are bright
        let mut data = frame(0, 8);
        data[0..3].copy_from_slice(&[255, 255, 255]);
        data[16..19].copy_from_slice(&[255, 255, 255]);
        assert_eq!(average_brightness(&data, 16), Some(1.0));
    }

    #[test]
    fn test_lighting_gain_and_clamp() {
        let mut monitor = EnvironmentMonitor::default();
        let reading = monitor.sample(&frame(102, 16), Instant::now());
        assert!((reading.lighting - 0.48).abs() < 1e-9);

        let mut monitor = EnvironmentMonitor::default();
        assert_eq!(monitor.sample(&frame(250, 16), Instant::now()).lighting, 1.0);
    }

    #[test]
    fn test_update_interval() {
        let mut monitor = EnvironmentMonitor::default();
        let start = Instant::now();
        monitor.sample(&frame(255, 4), start);
        let reading = monitor.sample(&frame(0, 4), start + Duration::from_secs(2));
        assert_eq!(reading.lighting, 1.0);
        let reading = monitor.sample(&frame(0, 4), start + Duration::from_millis(5001));
        assert_eq!(reading.lighting, 0.0);
    }

    #[test]
    fn test_empty_frame_keeps_reading() {
        let mut monitor = EnvironmentMonitor::default();
        let start = Instant::now();
        monitor.sample(&frame(0, 4), start);
        let reading = monitor.sample(&[], start + Duration::from_secs(10));
        assert_eq!(reading.lighting, 0.0);
    }
}
