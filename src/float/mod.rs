//! Generic [Float] type which acts as a stand-in for `f32` or `f64` samples.
use rustfft::num_traits::float::FloatCore as NumFloatCore;
use rustfft::FftNum;
use std::fmt::{Debug, Display};

/// Frames are passed in as slices of [Float]s. A [Float] is normally `f32` (what
/// most capture APIs deliver) or `f64`. All analysis runs in `f64`.
pub trait Float: Display + Debug + NumFloatCore + FftNum {
    /// Widen the sample to `f64`. Values that cannot be represented become NaN,
    /// which the detector treats as an unusable frame.
    fn to_sample(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl Float for f64 {}
impl Float for f32 {}
