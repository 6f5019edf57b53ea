//! Property-based tests for the mixing operations.
//!
//! Uses proptest to verify the invariants that hold for any input signal:
//! crossfade length and bounds, quantize blend endpoints, and normalize
//! behavior.

use mezcla_core::{FadeCurve, Signal};
use mezcla_mix::{MixParameters, crossfade, normalize, quantize};
use proptest::prelude::*;

const RATE: u32 = 8000;

fn signal_from(samples: Vec<f32>) -> Signal {
    Signal::new(samples, RATE)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Crossfade output length is always the shorter input length.
    #[test]
    fn crossfade_length_is_min(
        a in prop::collection::vec(-1.0f32..=1.0, 8000..16000),
        b in prop::collection::vec(-1.0f32..=1.0, 8000..16000),
    ) {
        let expected = a.len().min(b.len());
        let out = crossfade(
            &signal_from(a),
            &signal_from(b),
            &MixParameters::new(0.5, RATE),
        ).unwrap();
        prop_assert_eq!(out.len(), expected);
    }

    /// With a linear curve the output never exceeds the combined input
    /// bounds: each sample is a convex combination of the two inputs.
    #[test]
    fn crossfade_linear_is_bounded(
        a in prop::collection::vec(-1.0f32..=1.0, 8000..12000),
        b in prop::collection::vec(-1.0f32..=1.0, 8000..12000),
    ) {
        let out = crossfade(
            &signal_from(a),
            &signal_from(b),
            &MixParameters::new(0.25, RATE),
        ).unwrap();
        for &s in &out.samples {
            prop_assert!((-1.0001..=1.0001).contains(&s), "sample {} escaped", s);
        }
    }

    /// Samples before the fade window equal input A; samples after equal
    /// input B.
    #[test]
    fn crossfade_passes_through_outside_window(
        a in prop::collection::vec(-1.0f32..=1.0, 8000..10000),
        b in prop::collection::vec(-1.0f32..=1.0, 8000..10000),
    ) {
        let common = a.len().min(b.len());
        let fade_len = (0.5 * RATE as f32) as usize;
        let fade_start = (common - fade_len) / 2;

        let out = crossfade(
            &signal_from(a.clone()),
            &signal_from(b.clone()),
            &MixParameters::new(0.5, RATE),
        ).unwrap();

        for i in 0..fade_start {
            prop_assert_eq!(out.samples[i], a[i]);
        }
        for i in (fade_start + fade_len)..common {
            prop_assert_eq!(out.samples[i], b[i]);
        }
    }

    /// An oversized fade is always rejected, never clamped.
    #[test]
    fn crossfade_oversized_fade_errors(
        a in prop::collection::vec(-1.0f32..=1.0, 100..4000),
    ) {
        let signal = signal_from(a);
        // 1 s of fade cannot fit in < 0.5 s of signal
        let result = crossfade(&signal, &signal, &MixParameters::new(1.0, RATE));
        prop_assert!(result.is_err());
    }

    /// quantize with strength 0 is bit-identical to its input for any bpm.
    #[test]
    fn quantize_zero_strength_is_identity(
        samples in prop::collection::vec(-1.0f32..=1.0, 100..8000),
        bpm in 40.0f32..240.0,
    ) {
        let signal = signal_from(samples);
        let out = quantize(&signal, bpm, 0.0).unwrap();
        prop_assert_eq!(out.samples, signal.samples);
    }

    /// quantize output always has the input's length and rate.
    #[test]
    fn quantize_preserves_shape(
        samples in prop::collection::vec(-1.0f32..=1.0, 100..8000),
        bpm in 40.0f32..240.0,
        strength in 0.0f32..=1.0,
    ) {
        let signal = signal_from(samples);
        let out = quantize(&signal, bpm, strength).unwrap();
        prop_assert_eq!(out.len(), signal.len());
        prop_assert_eq!(out.sample_rate, signal.sample_rate);
    }

    /// normalize yields unit peak for any non-silent signal and is
    /// idempotent.
    #[test]
    fn normalize_unit_peak_and_idempotent(
        samples in prop::collection::vec(-1.0f32..=1.0, 1..2000),
    ) {
        let signal = signal_from(samples);
        let once = normalize(&signal);
        if signal.peak() > 0.0 {
            prop_assert!((once.peak() - 1.0).abs() < 1e-5);
        }
        let twice = normalize(&once);
        for (x, y) in once.samples.iter().zip(twice.samples.iter()) {
            prop_assert!((x - y).abs() < 1e-6);
        }
    }

    /// All fade curves keep the crossfade inside ±2 of the input bounds
    /// (equal-power gains can sum above 1, but never past sqrt(2)).
    #[test]
    fn crossfade_curves_never_blow_up(
        a in prop::collection::vec(-1.0f32..=1.0, 8000..9000),
        curve_idx in 0usize..3,
    ) {
        let curve = [FadeCurve::Linear, FadeCurve::EqualPower, FadeCurve::SCurve][curve_idx];
        let params = MixParameters {
            crossfade_duration: 0.5,
            curve,
            sample_rate: RATE,
        };
        let signal = signal_from(a);
        let out = crossfade(&signal, &signal, &params).unwrap();
        for &s in &out.samples {
            prop_assert!(s.abs() <= 2.0);
        }
    }
}
