use std::ops::RangeInclusive;

/// Correlation a peak must reach before it is considered periodic at all.
pub const CORRELATION_THRESHOLD: f64 = 0.15;

/// Estimates below this frequency get [LOW_FREQUENCY_BOOST] applied to their confidence.
pub const LOW_FREQUENCY_CUTOFF: f64 = 150.0;

/// Autocorrelation under-scores the long periods of low strings; compensate.
pub const LOW_FREQUENCY_BOOST: f64 = 1.1;

/// Weight of harmonic consistency in the confidence score.
pub const HARMONIC_WEIGHT: f64 = 0.2;

/// A harmonic lag counts as consistent when it exceeds its neighbour average by this factor.
pub const HARMONIC_PROMINENCE: f64 = 1.1;

/// Harmonics checked for consistency.
pub const HARMONICS: [usize; 3] = [2, 3, 4];

/// Relative height at half the period above which a peak is treated as the
/// second repetition of a faster fundamental.
pub const SUBOCTAVE_RATIO: f64 = 0.9;

/// Best local maximum of a correlation curve and the runner-up value seen while
/// scanning for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub period: usize,
    pub correlation: f64,
    pub runner_up: f64,
}

struct Point {
    x: f64,
    y: f64,
}

/// Strict local maxima of `arr` with lag inside `lags`. The range must leave a
/// neighbour on both sides (`1 <= start`, `end + 1 < arr.len()`).
pub fn detect_peaks(
    arr: &[f64],
    lags: RangeInclusive<usize>,
) -> impl Iterator<Item = (usize, f64)> + '_ {
    debug_assert!(*lags.start() >= 1 && *lags.end() + 1 < arr.len());
    lags.filter(move |&lag| arr[lag] > arr[lag - 1] && arr[lag] > arr[lag + 1])
        .map(move |lag| (lag, arr[lag]))
}

/// Pick the highest peak, remembering the second highest. Only positive peaks
/// compete, and the winner must reach [CORRELATION_THRESHOLD].
pub fn choose_peak<I: Iterator<Item = (usize, f64)>>(peaks: I) -> Option<Peak> {
    let best = peaks.fold(
        Peak {
            period: 0,
            correlation: 0.0,
            runner_up: 0.0,
        },
        |mut best, (period, value)| {
            if value > best.correlation {
                best.runner_up = best.correlation;
                best.correlation = value;
                best.period = period;
            } else if value > best.runner_up {
                best.runner_up = value;
            }
            best
        },
    );

    if best.period == 0 || best.correlation < CORRELATION_THRESHOLD {
        None
    } else {
        Some(best)
    }
}

/// Fraction of [HARMONICS] whose lag `period / h` stands out from its two
/// neighbours. Harmonics whose lag has no neighbour on both sides count as
/// inconsistent.
pub fn harmonic_consistency(correlations: &[f64], period: usize) -> f64 {
    let consistent = HARMONICS
        .iter()
        .map(|h| period / h)
        .filter(|&idx| idx >= 1 && idx + 1 < correlations.len())
        .filter(|&idx| {
            let neighbours = (correlations[idx - 1] + correlations[idx + 1]) / 2.0;
            correlations[idx] > neighbours * HARMONIC_PROMINENCE
        })
        .count();
    consistent as f64 / HARMONICS.len() as f64
}

/// Confidence in `[0, 1]` for `peak`: its height, discounted when a runner-up
/// comes close, boosted for low strings and for consistent harmonics.
pub fn score_peak(peak: &Peak, correlations: &[f64], sample_rate: f64) -> f64 {
    let mut confidence = peak.correlation;

    if peak.runner_up > 0.0 {
        let dominance = peak.correlation / peak.runner_up / 2.0;
        confidence *= dominance.min(1.0);
    }

    if sample_rate / (peak.period as f64) < LOW_FREQUENCY_CUTOFF {
        confidence *= LOW_FREQUENCY_BOOST;
    }

    confidence *= 1.0 + HARMONIC_WEIGHT * harmonic_consistency(correlations, peak.period);
    confidence.min(1.0)
}

/// True when `peak.period` is a whole multiple of a shorter period that
/// correlates nearly as well. The signal then repeats faster than the band
/// allows and `peak` is only its second, third, ... repetition.
///
/// Each lag `peak.period / k` is checked for a strict local maximum (within one
/// lag) reaching [SUBOCTAVE_RATIO] of the peak. The initial lobe around lag 0
/// decreases monotonically for any in-band signal and never qualifies.
pub fn has_suboctave_twin(peak: &Peak, correlations: &[f64]) -> bool {
    let threshold = SUBOCTAVE_RATIO * peak.correlation;
    let is_twin = |lag: usize| {
        correlations[lag] >= threshold
            && correlations[lag] > correlations[lag - 1]
            && correlations[lag] > correlations[lag + 1]
    };
    (2..=peak.period / 2)
        .map(|k| peak.period / k)
        .take_while(|&lag| lag >= 2)
        .filter(|&lag| lag + 2 < correlations.len())
        .any(|lag| (lag - 1..=lag + 1).any(is_twin))
}

/// Refine `period` to sub-sample precision with a parabola through its
/// neighbours. Falls back to `period` at the edges of `data` or on a flat top.
pub fn correct_peak(period: usize, data: &[f64]) -> f64 {
    if period == 0 || period + 1 >= data.len() {
        return period as f64;
    }
    quadratic_interpolation(
        Point {
            x: (period - 1) as f64,
            y: data[period - 1],
        },
        Point {
            x: period as f64,
            y: data[period],
        },
        Point {
            x: (period + 1) as f64,
            y: data[period + 1],
        },
    )
    .map_or(period as f64, |point| point.x)
}

fn quadratic_interpolation(left: Point, center: Point, right: Point) -> Option<Point> {
    let curvature = 2.0 * center.y - left.y - right.y;
    if curvature == 0.0 {
        return None;
    }
    let shift = 0.5 * (right.y - left.y) / curvature;
    let x = center.x + shift;
    let y = center.y + 0.25 * (right.y - left.y) * shift;
    Some(Point { x, y })
}
