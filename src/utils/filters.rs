//! Frame conditioning applied before correlation.

use crate::float::Float;
use crate::utils::buffer::{mean, subtract};

/// Feedback coefficient of the smoothing low-pass. Chosen by ear on plucked
/// strings rather than derived from a cutoff frequency.
pub const SMOOTHING_FACTOR: f64 = 0.8;

/// Single-pole IIR low-pass, in place:
///
/// > y_0 = x_0, y_i = a*y_{i-1} + (1-a)*x_i
pub fn low_pass(signal: &mut [f64], alpha: f64) {
    let mut previous = match signal.first() {
        Some(&first) => first,
        None => return,
    };
    signal.iter_mut().skip(1).for_each(|s| {
        *s = alpha * previous + (1.0 - alpha) * *s;
        previous = *s;
    });
}

/// Remove the DC offset from `signal`, leaving it with zero mean.
pub fn remove_dc(signal: &mut [f64]) {
    let offset = mean(signal);
    subtract(signal, offset);
}

/// Smooth `frame` and strip its DC offset. Frames of one sample or fewer are
/// copied through untouched.
pub fn preprocess<T: Float>(frame: &[T]) -> Vec<f64> {
    let mut signal: Vec<f64> = frame.iter().map(|&s| s.to_sample()).collect();
    if signal.len() <= 1 {
        return signal;
    }
    low_pass(&mut signal, SMOOTHING_FACTOR);
    remove_dc(&mut signal);
    signal
}
