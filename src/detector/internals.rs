use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rustfft::FftPlanner;

use crate::config::DetectionConfig;
use crate::utils::buffer::{copy_real_to_complex, modulus_squared, new_complex_buffer};
use crate::utils::buffer::{mean, square_sum, subtract};
use crate::utils::peak::{choose_peak, correct_peak, detect_peaks};
use crate::utils::peak::{has_suboctave_twin, score_peak};

/// Mean square below which a centred frame counts as silent (about -200 dBFS).
/// Catches the rounding residue the low-pass leaves on constant input.
pub const SILENCE_POWER: f64 = 1e-20;

/// A frequency estimate and how much it can be trusted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PitchEstimate {
    /// Fundamental frequency in Hz.
    pub frequency: f64,
    /// Score in `[0, 1]`; higher is more trustworthy.
    pub confidence: f64,
}

/// Why a frame produced no estimate. Only used for tracing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// No strict local maximum in the lag range reached the correlation threshold.
    NoPeak,
    /// The best peak at lag `period` is a whole multiple of a shorter period,
    /// so the fundamental lies above the band.
    Suboctave { period: usize },
}

/// Compute the normalized autocorrelation of `signal` into `result`, one value
/// per lag in `0..signal.len() / 2`:
///
/// > r(t) = sum_{i=0}^{N-t-1} x_i*x_{i+t} / sum_{i=0}^{N-1} x_i^2
///
/// where _x_ is `signal` with its mean removed. The denominator does not shrink
/// with the lag, so `r(0) = 1` and longer lags taper off. A silent or
/// non-finite signal yields all zeros.
///
/// `result` must hold at least `signal.len() / 2` values; any beyond that are
/// left untouched.
pub fn autocorrelation(signal: &[f64], planner: &mut FftPlanner<f64>, result: &mut [f64]) {
    let size = signal.len();
    let lags = size / 2;
    assert!(result.len() >= lags);
    let result = &mut result[..lags];
    if lags == 0 {
        return;
    }

    let mut centered = signal.to_vec();
    let offset = mean(&centered);
    subtract(&mut centered, offset);

    let power = square_sum(&centered);
    // Written so that NaN power lands here as well.
    if !(power > SILENCE_POWER * size as f64) {
        result.iter_mut().for_each(|r| *r = 0.0);
        return;
    }

    // Zero padding to `size + lags` keeps the circular correlation from
    // wrapping into any lag we report.
    let fft_len = (size + lags).next_power_of_two();
    let fft = planner.plan_fft_forward(fft_len);
    let inv_fft = planner.plan_fft_inverse(fft_len);

    let mut spectrum = new_complex_buffer(fft_len);
    let mut scratch = new_complex_buffer(
        fft.get_inplace_scratch_len()
            .max(inv_fft.get_inplace_scratch_len()),
    );

    copy_real_to_complex(&centered, &mut spectrum);
    fft.process_with_scratch(&mut spectrum, &mut scratch);
    modulus_squared(&mut spectrum);
    inv_fft.process_with_scratch(&mut spectrum, &mut scratch);

    // rustfft doesn't normalize, so the round trip leaves a factor of `fft_len`.
    let normalization = 1.0 / (fft_len as f64 * power);
    result
        .iter_mut()
        .zip(spectrum.iter())
        .for_each(|(r, s)| *r = s.re * normalization);
}

/// Lags worth searching in a correlation curve of `len` values, leaving one
/// neighbour on each side of every lag.
pub fn lag_range(config: &DetectionConfig, len: usize) -> Option<RangeInclusive<usize>> {
    let start = config.min_period().max(1);
    let end = config.max_period().min(len.checked_sub(2)?);
    if start > end {
        return None;
    }
    Some(start..=end)
}

/// Turn a correlation curve into a pitch: pick the best peak inside the
/// configured band, score it, then refine its period.
pub fn pitch_from_correlations(
    correlations: &[f64],
    config: &DetectionConfig,
) -> Result<PitchEstimate, Rejection> {
    let lags = lag_range(config, correlations.len()).ok_or(Rejection::NoPeak)?;
    let peak = choose_peak(detect_peaks(correlations, lags)).ok_or(Rejection::NoPeak)?;

    if has_suboctave_twin(&peak, correlations) {
        return Err(Rejection::Suboctave {
            period: peak.period,
        });
    }

    let confidence = score_peak(&peak, correlations, config.sample_rate);
    let period = correct_peak(peak.period, correlations);

    Ok(PitchEstimate {
        frequency: config.sample_rate / period,
        confidence,
    })
}
