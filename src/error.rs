//! Error types for detector and tuner construction.

use thiserror::Error;

/// Result type for configuration operations.
pub type TunerResult<T> = Result<T, TunerError>;

/// Errors raised when a detector or tuner is configured with values it cannot
/// work with. Analysing a frame never produces one of these: a frame without a
/// usable pitch simply yields `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TunerError {
    /// Sample rate is zero, negative or not finite.
    #[error("invalid sample rate: {rate} Hz")]
    InvalidSampleRate {
        /// The rejected sample rate.
        rate: f64,
    },

    /// The detection band is empty or starts at a non-positive frequency.
    #[error("invalid frequency range: {min} Hz to {max} Hz")]
    InvalidFrequencyRange {
        /// Lower bound of the band.
        min: f64,
        /// Upper bound of the band.
        max: f64,
    },

    /// The upper bound of the band is not below the Nyquist frequency.
    #[error("maximum frequency {max} Hz must be below the Nyquist frequency {nyquist} Hz")]
    AboveNyquist {
        /// Upper bound of the band.
        max: f64,
        /// Half the sample rate.
        nyquist: f64,
    },

    /// The confidence floor is not a finite number.
    #[error("invalid confidence threshold: {value}")]
    InvalidConfidence {
        /// The rejected threshold.
        value: f64,
    },

    /// A reference table needs at least one pitch.
    #[error("reference table is empty")]
    EmptyReferenceTable,

    /// A reference pitch has a non-positive or non-finite frequency.
    #[error("invalid reference pitch '{name}': {frequency} Hz")]
    InvalidReferencePitch {
        /// Note name of the offending entry.
        name: String,
        /// Its frequency.
        frequency: f64,
    },
}
