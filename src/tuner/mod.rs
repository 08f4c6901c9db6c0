//! # Tuning analysis
//!
//! Maps a detected frequency onto the nearest entry of a [ReferenceTable] and
//! reports how far off it is in cents:
//!
//! > cents = round(1200 * log2(f / f_ref))
//!
//! 100 cents make a semitone and 1200 an octave. Positive values are sharp,
//! negative values flat.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::detector::PitchEstimate;

pub use reference::{ReferencePitch, ReferenceTable, STANDARD_GUITAR};

pub mod reference;

/// A string counts as in tune within this many cents of its target (default: 5).
pub const DEFAULT_TOLERANCE_CENTS: u32 = 5;

/// Result of comparing one frequency against the reference table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoteAnalysis {
    /// Analysed frequency in Hz.
    pub frequency: f64,
    /// Name of the nearest reference pitch.
    pub note: String,
    /// Frequency of that reference pitch in Hz.
    pub target_frequency: f64,
    /// Rounded deviation from the target; positive is sharp.
    pub cents: i32,
    pub in_tune: bool,
    pub confidence: f64,
}

/// Which way a string has to be turned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TuningDirection {
    /// Below the target; tune up.
    Flat,
    InTune,
    /// Above the target; tune down.
    Sharp,
}

impl NoteAnalysis {
    pub fn direction(&self) -> TuningDirection {
        if self.in_tune {
            TuningDirection::InTune
        } else if self.cents < 0 {
            TuningDirection::Flat
        } else {
            TuningDirection::Sharp
        }
    }
}

impl fmt::Display for NoteAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:+} cents ({:.2} Hz)",
            self.note, self.cents, self.frequency
        )
    }
}

/// Compares frequencies against a fixed reference table.
///
/// ```
/// use string_tuner::TunerEngine;
///
/// let tuner = TunerEngine::new();
/// let analysis = tuner.analyze(111.0);
/// assert_eq!(analysis.note, "A2");
/// assert_eq!(analysis.cents, 16);
/// assert!(!analysis.in_tune);
/// ```
#[derive(Debug, Clone)]
pub struct TunerEngine {
    table: ReferenceTable,
    tolerance_cents: u32,
}

impl Default for TunerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TunerEngine {
    /// Standard guitar tuning with the default tolerance.
    pub fn new() -> Self {
        Self::with_reference_table(ReferenceTable::standard_guitar())
    }

    pub fn with_reference_table(table: ReferenceTable) -> Self {
        TunerEngine {
            table,
            tolerance_cents: DEFAULT_TOLERANCE_CENTS,
        }
    }

    pub fn with_tolerance(mut self, tolerance_cents: u32) -> Self {
        self.tolerance_cents = tolerance_cents;
        self
    }

    pub fn reference_table(&self) -> &ReferenceTable {
        &self.table
    }

    pub fn tolerance_cents(&self) -> u32 {
        self.tolerance_cents
    }

    /// Analyse `frequency` with full confidence.
    pub fn analyze(&self, frequency: f64) -> NoteAnalysis {
        self.analyze_with_confidence(frequency, 1.0)
    }

    pub fn analyze_estimate(&self, estimate: &PitchEstimate) -> NoteAnalysis {
        self.analyze_with_confidence(estimate.frequency, estimate.confidence)
    }

    /// Find the nearest reference pitch and the deviation from it.
    ///
    /// `frequency` is not validated. Zero or negative frequencies land on the
    /// lowest reference with `cents == i32::MIN` and are never in tune.
    pub fn analyze_with_confidence(&self, frequency: f64, confidence: f64) -> NoteAnalysis {
        let reference = self.table.nearest(frequency);
        let cents = cents_between(frequency, reference.frequency);
        NoteAnalysis {
            frequency,
            note: reference.name.clone(),
            target_frequency: reference.frequency,
            cents,
            in_tune: cents.unsigned_abs() <= self.tolerance_cents,
            confidence,
        }
    }
}

/// Rounded cents from `reference` to `frequency`, half away from zero.
/// Out-of-range results saturate; NaN (negative frequencies) reads as
/// infinitely flat.
pub fn cents_between(frequency: f64, reference: f64) -> i32 {
    let cents = (1200.0 * (frequency / reference).log2()).round();
    if cents.is_nan() {
        i32::MIN
    } else {
        cents as i32
    }
}
