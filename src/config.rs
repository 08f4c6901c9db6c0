//! Configuration parameters for pitch detection.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TunerError, TunerResult};

/// Sample rate assumed by [DetectionConfig::default] (default: 44100 Hz).
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Lowest frequency searched for by default. Sits below the low E string (82.41 Hz).
pub const DEFAULT_MIN_FREQUENCY: f64 = 70.0;

/// Highest frequency searched for by default. Sits above the high E string (329.63 Hz).
pub const DEFAULT_MAX_FREQUENCY: f64 = 400.0;

/// Confidence below which [PitchDetector::detect][crate::detector::PitchDetector::detect]
/// discards an estimate.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;

/// Parameters shared by every call on a [PitchDetector][crate::detector::PitchDetector].
///
/// ```
/// use string_tuner::DetectionConfig;
///
/// let config = DetectionConfig::new(48000.0)
///     .with_frequency_range(60.0, 500.0)
///     .with_min_confidence(0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DetectionConfig {
    /// Sample rate of incoming frames in Hz (default: 44100)
    pub sample_rate: f64,

    /// Lowest accepted fundamental in Hz (default: 70)
    pub min_frequency: f64,

    /// Highest accepted fundamental in Hz (default: 400)
    /// Must stay below `sample_rate / 2`.
    pub max_frequency: f64,

    /// Confidence floor applied by `detect` (default: 0.3)
    /// `detect_with_confidence` reports raw estimates and ignores it.
    pub min_confidence: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl DetectionConfig {
    /// Default guitar band at the given sample rate.
    pub fn new(sample_rate: f64) -> Self {
        DetectionConfig {
            sample_rate,
            min_frequency: DEFAULT_MIN_FREQUENCY,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    pub fn with_frequency_range(mut self, min_frequency: f64, max_frequency: f64) -> Self {
        self.min_frequency = min_frequency;
        self.max_frequency = max_frequency;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Check `0 < min_frequency < max_frequency < sample_rate / 2`, a positive
    /// finite sample rate and a finite confidence floor.
    pub fn validate(&self) -> TunerResult<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(TunerError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }

        // Written so that NaN bounds fail too.
        if !(self.min_frequency > 0.0 && self.min_frequency < self.max_frequency) {
            return Err(TunerError::InvalidFrequencyRange {
                min: self.min_frequency,
                max: self.max_frequency,
            });
        }

        let nyquist = self.nyquist();
        if self.max_frequency >= nyquist {
            return Err(TunerError::AboveNyquist {
                max: self.max_frequency,
                nyquist,
            });
        }

        if !self.min_confidence.is_finite() {
            return Err(TunerError::InvalidConfidence {
                value: self.min_confidence,
            });
        }

        Ok(())
    }

    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Shortest lag searched, `⌊sample_rate / max_frequency⌋`.
    pub fn min_period(&self) -> usize {
        (self.sample_rate / self.max_frequency).floor() as usize
    }

    /// Longest lag searched, `⌊sample_rate / min_frequency⌋`.
    pub fn max_period(&self) -> usize {
        (self.sample_rate / self.min_frequency).floor() as usize
    }

    pub fn contains(&self, frequency: f64) -> bool {
        frequency >= self.min_frequency && frequency <= self.max_frequency
    }
}
