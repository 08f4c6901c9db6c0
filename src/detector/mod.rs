//! Autocorrelation pitch detection for single frames of audio.
//!
//! A frame flows through a fixed pipeline:
//!
//! 1. [preprocess][crate::utils::filters::preprocess]: low-pass smoothing and DC removal.
//! 2. [autocorrelation][internals::autocorrelation]: normalized, computed with an FFT.
//! 3. Peak selection inside the configured band, with a confidence score built
//!    from peak height, dominance over the runner-up, a low-string correction
//!    and harmonic consistency.
//! 4. Parabolic refinement of the winning period.
//!
//! Frames that carry no usable pitch (silence, noise, out-of-band tones,
//! non-finite samples) produce `None`. That is the normal outcome between
//! notes, so it is never reported as an error.

use std::fmt;

use rustfft::FftPlanner;

use crate::config::DetectionConfig;
use crate::error::TunerResult;
use crate::float::Float;
use crate::utils::filters::preprocess;

use internals::{autocorrelation, pitch_from_correlations, Rejection};

pub use internals::PitchEstimate;

pub mod internals;

/// Detects the fundamental of monophonic frames.
///
/// The detector keeps its configuration and a cache of FFT plans, so reuse one
/// instance per input stream. Only the sample rate may change after
/// construction, through [update_sample_rate][PitchDetector::update_sample_rate].
pub struct PitchDetector {
    config: DetectionConfig,
    planner: FftPlanner<f64>,
}

impl fmt::Debug for PitchDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PitchDetector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PitchDetector {
    pub fn new(config: DetectionConfig) -> TunerResult<Self> {
        config.validate()?;
        log::debug!(
            "pitch detector at {} Hz, band {}..={} Hz, confidence floor {}",
            config.sample_rate,
            config.min_frequency,
            config.max_frequency,
            config.min_confidence
        );
        Ok(PitchDetector {
            config,
            planner: FftPlanner::new(),
        })
    }

    /// Detector for the default guitar band at `sample_rate`.
    pub fn with_sample_rate(sample_rate: f64) -> TunerResult<Self> {
        Self::new(DetectionConfig::new(sample_rate))
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f64 {
        self.config.sample_rate
    }

    /// Switch to a new input sample rate, e.g. after the capture device changed.
    /// A rate that would put the band at or above Nyquist is rejected and the
    /// previous rate stays in effect.
    pub fn update_sample_rate(&mut self, sample_rate: f64) -> TunerResult<()> {
        let config = DetectionConfig {
            sample_rate,
            ..self.config
        };
        if let Err(e) = config.validate() {
            log::warn!("keeping sample rate {} Hz: {}", self.config.sample_rate, e);
            return Err(e);
        }
        log::debug!(
            "sample rate changed from {} Hz to {} Hz",
            self.config.sample_rate,
            sample_rate
        );
        self.config = config;
        Ok(())
    }

    /// Fundamental frequency of `frame` in Hz, if one is found with at least
    /// the configured minimum confidence.
    pub fn detect<T: Float>(&mut self, frame: &[T]) -> Option<f64> {
        let estimate = self.detect_with_confidence(frame)?;
        if estimate.confidence < self.config.min_confidence {
            log::trace!(
                "confidence {:.3} below {:.3} for {:.2} Hz",
                estimate.confidence,
                self.config.min_confidence,
                estimate.frequency
            );
            return None;
        }
        Some(estimate.frequency)
    }

    /// Fundamental frequency of `frame` with its confidence. No confidence
    /// floor is applied; callers decide what is trustworthy enough.
    pub fn detect_with_confidence<T: Float>(&mut self, frame: &[T]) -> Option<PitchEstimate> {
        if frame.is_empty() {
            return None;
        }
        if frame.iter().any(|s| !s.to_sample().is_finite()) {
            log::trace!("frame contains non-finite samples");
            return None;
        }

        let correlations = self.correlations(frame);

        let estimate = match pitch_from_correlations(&correlations, &self.config) {
            Ok(estimate) => estimate,
            Err(Rejection::NoPeak) => {
                log::trace!("no periodic peak in band");
                return None;
            }
            Err(Rejection::Suboctave { period }) => {
                log::trace!("peak at lag {} repeats a faster fundamental", period);
                return None;
            }
        };

        if !estimate.frequency.is_finite() || !estimate.confidence.is_finite() {
            log::trace!("non-finite estimate {:?}", estimate);
            return None;
        }
        if !self.config.contains(estimate.frequency) {
            log::trace!("{:.2} Hz is outside the band", estimate.frequency);
            return None;
        }

        Some(estimate)
    }

    /// Normalized autocorrelation of the preprocessed `frame`, one value per
    /// lag in `0..frame.len() / 2`.
    pub fn correlations<T: Float>(&mut self, frame: &[T]) -> Vec<f64> {
        let signal = preprocess(frame);
        let mut correlations = vec![0.0; signal.len() / 2];
        autocorrelation(&signal, &mut self.planner, &mut correlations);
        correlations
    }
}
