//! # String Tuner
//! *string_tuner* estimates the fundamental frequency of a plucked string from
//! short frames of audio and judges it against a table of target pitches.
//! It does no audio I/O of its own: callers hand in frames of `f32` (or `f64`)
//! samples and get plain values back.
//!
//!   * [PitchDetector][detector::PitchDetector] finds the pitch of a frame by
//!     autocorrelation, with a confidence score and sub-sample refinement.
//!   * [TunerEngine][tuner::TunerEngine] maps a frequency to the nearest
//!     reference pitch (standard guitar tuning by default) and reports the
//!     deviation in cents.
//!
//! # Examples
//! ```
//! use string_tuner::{DetectionConfig, PitchDetector, TunerEngine};
//!
//! fn main() {
//!     const SAMPLE_RATE: f64 = 44100.0;
//!     const SIZE: usize = 8192;
//!
//!     // Frame coming from some source (microphone, file, generated, etc...)
//!     let freq = 110.0;
//!     let frame: Vec<f32> = (0..SIZE)
//!         .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / SAMPLE_RATE).sin() as f32)
//!         .collect();
//!
//!     let mut detector = PitchDetector::new(DetectionConfig::new(SAMPLE_RATE)).unwrap();
//!     let tuner = TunerEngine::new();
//!
//!     let estimate = detector.detect_with_confidence(&frame).unwrap();
//!     let analysis = tuner.analyze_estimate(&estimate);
//!
//!     println!("{} (confidence {:.2})", analysis, analysis.confidence);
//!     assert_eq!(analysis.note, "A2");
//!     assert!(analysis.in_tune);
//! }
//! ```

pub use config::DetectionConfig;
pub use detector::{PitchDetector, PitchEstimate};
pub use error::{TunerError, TunerResult};
pub use tuner::{NoteAnalysis, ReferencePitch, ReferenceTable, TunerEngine, TuningDirection};

pub mod config;
pub mod detector;
pub mod error;
pub mod float;
pub mod tuner;
pub mod utils;
