use std::io::Cursor;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use string_tuner::float::Float;
use string_tuner::utils::buffer::new_real_buffer;
use string_tuner::{DetectionConfig, PitchDetector, TunerEngine};

const SAMPLE_RATE: usize = 44100;

const GUITAR_STRINGS: [(&str, f64); 6] = [
    ("E2", 82.41),
    ("A2", 110.00),
    ("D3", 146.83),
    ("G3", 196.00),
    ("B3", 246.94),
    ("E4", 329.63),
];

#[derive(Debug)]
struct Signal<T> {
    sample_rate: usize,
    data: Vec<T>,
}

#[test]
fn sin_guitar_strings() {
    for (name, freq) in GUITAR_STRINGS {
        // Mid-range strings must land within 1 Hz, the outer ones within 2 Hz.
        let tolerance = match name {
            "E2" | "E4" => 2.0,
            _ => 1.0,
        };
        // 8192 samples is about 186 ms at 44.1 kHz.
        pure_frequency(String::from("sin"), freq, 8192, tolerance);
    }
}

#[test]
fn square_guitar_strings() {
    for (_, freq) in GUITAR_STRINGS {
        pure_frequency(String::from("square"), freq, 4096, 2.0);
    }
}

#[test]
fn triangle_guitar_strings() {
    for (_, freq) in GUITAR_STRINGS {
        pure_frequency(String::from("triangle"), freq, 4096, 2.0);
    }
}

#[test]
fn saw_guitar_strings() {
    for (_, freq) in GUITAR_STRINGS {
        pure_frequency(String::from("saw"), freq, 4096, 2.0);
    }
}

#[test]
fn sliding_window_sin() {
    sliding_frequency(String::from("sin"), 146.83);
}

#[test]
fn sliding_window_pluck() {
    sliding_frequency(String::from("pluck"), 196.0);
}

#[test]
fn out_of_band_tones_are_rejected() {
    let mut detector = default_detector();
    // 900 and 1000 Hz first repeat inside the band on their third period.
    for size in [4096, 8192] {
        for freq in [50.0, 500.0, 900.0, 1000.0] {
            let signal = signal_factory::<f32>(String::from("sin"), freq, size, SAMPLE_RATE);
            assert_eq!(detector.detect(&signal), None, "{} Hz, {} samples", freq, size);
            assert_eq!(
                detector.detect_with_confidence(&signal),
                None,
                "{} Hz, {} samples",
                freq,
                size
            );
        }
    }
}

#[test]
fn a2_scenario() {
    let mut detector = default_detector();
    let tuner = TunerEngine::new();
    let signal = sin_wave::<f32>(110.0, 4096, SAMPLE_RATE);

    let frequency = detector.detect(&signal).unwrap();
    println!("Detected {} Hz", frequency);
    assert!((108.0..112.0).contains(&frequency));

    let analysis = tuner.analyze(frequency);
    println!("{}", analysis);
    assert_eq!(analysis.note, "A2");
    // A 4096 sample frame holds barely ten periods; the tapering of the
    // correlation pulls the estimate to about 110.27 Hz, +4 cents.
    assert!((110.1..110.4).contains(&frequency));
    assert_eq!(analysis.cents, 4);
    assert!(analysis.in_tune);
}

#[test]
fn silence_scenario() {
    let mut detector = default_detector();
    assert_eq!(detector.detect(&new_real_buffer::<f32>(4096)), None);
}

#[test]
fn degenerate_frames() {
    let mut detector = default_detector();
    assert_eq!(detector.detect::<f32>(&[]), None);
    assert_eq!(detector.detect(&[0.5f32]), None);
    assert_eq!(detector.detect(&[0.0f32; 4096]), None);
    for dc in [0.3f32, -0.7, 1.0] {
        assert_eq!(detector.detect(&vec![dc; 4096]), None);
        assert_eq!(detector.detect_with_confidence(&vec![dc; 4096]), None);
    }

    let mut signal = sin_wave::<f32>(110.0, 4096, SAMPLE_RATE);
    signal[100] = f32::NAN;
    assert_eq!(detector.detect_with_confidence(&signal), None);
    signal[100] = f32::INFINITY;
    assert_eq!(detector.detect_with_confidence(&signal), None);
}

#[test]
fn noise_is_rejected() {
    let mut rng = StdRng::seed_from_u64(7);
    let noise: Vec<f32> = (0..16384).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let mut detector = default_detector();
    assert_eq!(detector.detect(&noise), None);
}

#[test]
fn detect_is_idempotent() {
    let mut detector = default_detector();
    let signal = pluck_wave::<f32>(246.94, 4096, SAMPLE_RATE);
    let first = detector.detect_with_confidence(&signal);
    let second = detector.detect_with_confidence(&signal);
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(detector.detect(&signal), detector.detect(&signal));
}

#[test]
fn f32_and_f64_frames_agree() {
    let mut detector = default_detector();
    let narrow = sin_wave::<f32>(196.0, 4096, SAMPLE_RATE);
    let wide: Vec<f64> = narrow.iter().map(|&s| s as f64).collect();
    assert_eq!(detector.detect(&narrow), detector.detect(&wide));
}

#[test]
fn follows_sample_rate_changes() {
    const NEW_RATE: usize = 48000;
    let mut detector = default_detector();
    let signal = sin_wave::<f32>(110.0, 8192, NEW_RATE);

    // Read at the wrong rate the tone comes out flat by 44100 / 48000.
    let frequency = detector.detect(&signal).unwrap();
    assert!((frequency - 110.0 * 44100.0 / 48000.0).abs() < 1.0);

    detector.update_sample_rate(NEW_RATE as f64).unwrap();
    let frequency = detector.detect(&signal).unwrap();
    assert!((frequency - 110.0).abs() < 1.0);
}

#[test]
fn low_sample_rate() {
    let mut detector = PitchDetector::with_sample_rate(22050.0).unwrap();
    let signal = sin_wave::<f32>(82.41, 4096, 22050);
    let frequency = detector.detect(&signal).unwrap();
    assert!((frequency - 82.41).abs() < 2.0);
}

#[test]
fn recorded_plucks() {
    let tuner = TunerEngine::new();
    for (name, freq) in GUITAR_STRINGS {
        let wav = pluck_to_wav(freq, 8192, SAMPLE_RATE);
        let signal: Signal<f32> = wav_to_signal(wav);
        assert_eq!(signal.sample_rate, SAMPLE_RATE);

        let mut detector = PitchDetector::with_sample_rate(signal.sample_rate as f64).unwrap();
        let estimate = detector.detect_with_confidence(&signal.data).unwrap();
        let analysis = tuner.analyze_estimate(&estimate);
        println!("{}: {} (confidence {:.3})", name, analysis, analysis.confidence);

        assert_eq!(analysis.note, name);
        assert!(analysis.in_tune);
        assert!(analysis.confidence >= DetectionConfig::default().min_confidence);
    }
}

fn default_detector() -> PitchDetector {
    PitchDetector::new(DetectionConfig::new(SAMPLE_RATE as f64)).unwrap()
}

fn get_chunk<T: Float>(signal: &[T], start: usize, window: usize, output: &mut [T]) {
    let start = match signal.len() > start {
        true => start,
        false => signal.len(),
    };

    let stop = match signal.len() >= start + window {
        true => start + window,
        false => signal.len(),
    };

    output[..stop - start].copy_from_slice(&signal[start..stop]);
    output[stop - start..]
        .iter_mut()
        .for_each(|o| *o = T::zero());
}

/// Encode a plucked note as 16-bit mono `wav` data.
fn pluck_to_wav(freq: f64, size: usize, sample_rate: usize) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for s in pluck_wave::<f64>(freq, size, sample_rate) {
            writer
                .write_sample((s * 0.8 * i16::MAX as f64).round() as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn wav_to_signal<T: Float>(wav: Vec<u8>) -> Signal<T> {
    let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
    let sample_rate = reader.spec().sample_rate as usize;
    let scale = 1.0 / -(i16::MIN as f64);
    let data: Vec<T> = reader
        .samples::<i16>()
        .map(|s| T::from(s.unwrap() as f64 * scale).unwrap())
        .collect();

    Signal { sample_rate, data }
}

fn sin_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let two_pi = 2.0 * std::f64::consts::PI;
    let dx = two_pi * freq / sample_rate as f64;
    for (i, s) in signal.iter_mut().enumerate() {
        let x = i as f64 * dx;
        *s = T::from(x.sin()).unwrap();
    }
    signal
}

fn square_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for (i, s) in signal.iter_mut().enumerate() {
        let x = i as f64 / period;
        let frac = x - x.floor();
        let y = match frac >= 0.5 {
            true => -1.0,
            false => 1.0,
        };
        *s = T::from(y).unwrap();
    }
    signal
}

fn triangle_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for (i, s) in signal.iter_mut().enumerate() {
        let x = i as f64 / period;
        let frac = x - x.floor();
        let y = match frac {
            f if (0.0..0.25).contains(&f) => 4. * f,
            f if (0.25..0.75).contains(&f) => 1. - 4. * (f - 0.25),
            f if (0.75..1.).contains(&f) => -1. + 4. * (f - 0.75),
            _ => panic!("Should be between 0 and 1"),
        };
        *s = T::from(y).unwrap();
    }
    signal
}

fn saw_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    let mut signal = new_real_buffer(size);
    let period = sample_rate as f64 / freq;

    for (i, s) in signal.iter_mut().enumerate() {
        let x = i as f64 / period;
        let frac = x - x.floor();
        *s = T::from(2. * frac - 1.).unwrap();
    }
    signal
}

/// A decaying string: fundamental plus three weaker harmonics.
fn pluck_wave<T: Float>(freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    // (harmonic, amplitude, phase)
    const PARTIALS: [(f64, f64, f64); 4] = [
        (1., 0.6, 0.),
        (2., 0.3, 0.4),
        (3., 0.15, 1.1),
        (4., 0.08, 0.),
    ];
    let two_pi = 2.0 * std::f64::consts::PI;
    let mut signal = new_real_buffer(size);

    for (i, s) in signal.iter_mut().enumerate() {
        let t = i as f64 / sample_rate as f64;
        let envelope = (-3.0 * t).exp();
        let y: f64 = PARTIALS
            .iter()
            .map(|(h, amp, phase)| amp * (two_pi * h * freq * t + phase).sin())
            .sum();
        *s = T::from(envelope * y).unwrap();
    }
    signal
}

fn signal_factory<T: Float>(name: String, freq: f64, size: usize, sample_rate: usize) -> Vec<T> {
    match name.as_ref() {
        "sin" => sin_wave(freq, size, sample_rate),
        "square" => square_wave(freq, size, sample_rate),
        "triangle" => triangle_wave(freq, size, sample_rate),
        "saw" => saw_wave(freq, size, sample_rate),
        "pluck" => pluck_wave(freq, size, sample_rate),
        _ => {
            panic!("Unknown wave function {}", name);
        }
    }
}

fn pure_frequency(wave_name: String, freq_in: f64, size: usize, tolerance: f64) {
    let signal = signal_factory::<f32>(wave_name.clone(), freq_in, size, SAMPLE_RATE);
    let mut detector = default_detector();

    match detector.detect_with_confidence(&signal) {
        Some(pitch) => {
            println!(
                "{} {} Hz: freq: {}; confidence: {}",
                wave_name, freq_in, pitch.frequency, pitch.confidence
            );
            assert!((pitch.frequency - freq_in).abs() <= tolerance);
            assert!(pitch.confidence >= 0.3 && pitch.confidence <= 1.0);
        }
        None => {
            panic!("No pitch found for {} {} Hz", wave_name, freq_in);
        }
    }
}

/// Slide a window over one second of signal and check every chunk.
fn sliding_frequency(wave_name: String, freq_in: f64) {
    const WINDOW: usize = 4096;
    const DELTA_T: usize = WINDOW / 2;
    const SAMPLE_SIZE: usize = SAMPLE_RATE;
    const N_WINDOWS: usize = (SAMPLE_SIZE - WINDOW) / DELTA_T;

    let signal = signal_factory::<f32>(wave_name, freq_in, SAMPLE_SIZE, SAMPLE_RATE);
    let mut chunk = new_real_buffer(WINDOW);
    let mut detector = default_detector();

    for i in 0..N_WINDOWS {
        let t: usize = i * DELTA_T;
        get_chunk(&signal, t, WINDOW, &mut chunk);

        match detector.detect(&chunk) {
            Some(frequency) => {
                println!("Chunk {}: freq: {}", i, frequency);
                assert!((frequency - freq_in).abs() < 1.0);
            }
            None => {
                panic!("No pitch accepted in chunk {}", i);
            }
        }
    }
}
