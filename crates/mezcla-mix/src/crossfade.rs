//! Curve-shaped crossfading of two signals.

use crate::{Error, Result};
use mezcla_codec::resample::convert_rate;
use mezcla_core::{FadeCurve, Signal};
use tracing::debug;

/// Immutable crossfade configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixParameters {
    /// Crossfade duration in seconds. Must be > 0.
    pub crossfade_duration: f32,
    /// Fade ramp shape.
    pub curve: FadeCurve,
    /// Output sample rate in Hz; inputs at other rates are converted.
    pub sample_rate: u32,
}

impl MixParameters {
    /// Parameters with a linear curve at the given rate.
    pub fn new(crossfade_duration: f32, sample_rate: u32) -> Self {
        Self {
            crossfade_duration,
            curve: FadeCurve::Linear,
            sample_rate,
        }
    }
}

/// Crossfade `a` into `b`.
///
/// Both signals are brought to `params.sample_rate` and truncated to the
/// shorter common length. The fade window — `duration * sample_rate`
/// samples — is centered in that length: before it only `a` is audible at
/// full gain, across it `a`'s tail fades out while `b`'s head fades in on
/// the chosen curve, and after it only `b` remains. Samples outside the
/// window pass through unscaled; with the linear curve, two identical
/// signals crossfade back into themselves exactly.
///
/// # Errors
///
/// [`Error::InvalidDuration`] when the duration is not a positive finite
/// number or the implied fade is longer than the common length. The fade is
/// never clamped: a shorter fade than requested would be a musically
/// different mix, and that decision belongs to the caller.
pub fn crossfade(a: &Signal, b: &Signal, params: &MixParameters) -> Result<Signal> {
    let duration = params.crossfade_duration;
    if !(duration.is_finite() && duration > 0.0) {
        return Err(Error::InvalidDuration {
            requested: duration,
            required: 0,
            available: 0,
        });
    }

    let a_samples = rate_matched(a, params.sample_rate)?;
    let b_samples = rate_matched(b, params.sample_rate)?;

    let common_len = a_samples.len().min(b_samples.len());
    let fade_len = (duration * params.sample_rate as f32) as usize;

    if fade_len > common_len {
        return Err(Error::InvalidDuration {
            requested: duration,
            required: fade_len,
            available: common_len,
        });
    }

    let fade_out = params.curve.fade_out(fade_len);
    let fade_in = params.curve.fade_in(fade_len);
    let fade_start = (common_len - fade_len) / 2;
    let fade_end = fade_start + fade_len;

    let mut mixed = Vec::with_capacity(common_len);
    for i in 0..common_len {
        let sample = if i < fade_start {
            a_samples[i]
        } else if i < fade_end {
            a_samples[i] * fade_out[i - fade_start] + b_samples[i] * fade_in[i - fade_start]
        } else {
            b_samples[i]
        };
        mixed.push(sample);
    }

    debug!(
        common_len,
        fade_len,
        fade_start,
        curve = ?params.curve,
        "rendered crossfade"
    );
    Ok(Signal::new(mixed, params.sample_rate))
}

/// Scale a signal to unit peak amplitude. A silent signal passes through.
pub fn normalize(signal: &Signal) -> Signal {
    let peak = signal.peak();
    if peak <= 0.0 {
        return signal.clone();
    }
    Signal::new(
        signal.samples.iter().map(|&s| s / peak).collect(),
        signal.sample_rate,
    )
}

fn rate_matched(signal: &Signal, target_rate: u32) -> Result<Vec<f32>> {
    if signal.sample_rate == target_rate {
        Ok(signal.samples.clone())
    } else {
        Ok(convert_rate(&signal.samples, signal.sample_rate, target_rate)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f32, len: usize, rate: u32) -> Signal {
        Signal::new(vec![value; len], rate)
    }

    #[test]
    fn test_output_length_is_min() {
        let a = constant(0.5, 44100 * 5, 44100);
        let b = constant(0.5, 44100 * 3, 44100);
        let out = crossfade(&a, &b, &MixParameters::new(1.0, 44100)).unwrap();
        assert_eq!(out.len(), 44100 * 3);
    }

    #[test]
    fn test_identical_constants_pass_through() {
        // Two identical 5 s constant signals over a 2 s linear fade: the
        // first and last 1.5 s are the untouched input, and inside the
        // window the complementary gains sum every sample back to the
        // original amplitude.
        let a = constant(0.4, 44100 * 5, 44100);
        let b = constant(0.4, 44100 * 5, 44100);
        let out = crossfade(&a, &b, &MixParameters::new(2.0, 44100)).unwrap();

        assert_eq!(out.len(), 44100 * 5);
        for &i in &[0, 44100, 66149 - 1] {
            assert_eq!(out.samples[i], 0.4, "pre-fade sample {i}");
        }
        for &i in &[44100 * 5 - 1, 44100 * 4, 44100 * 7 / 2 + 1] {
            assert_eq!(out.samples[i], 0.4, "post-fade sample {i}");
        }
        let mid = out.samples[44100 * 5 / 2];
        assert!((mid - 0.4).abs() < 1e-3, "midpoint {mid}");
    }

    #[test]
    fn test_fade_regions() {
        // 5 s signals, 1 s fade → window at [2 s, 3 s]
        let a = constant(0.5, 44100 * 5, 44100);
        let b = constant(0.25, 44100 * 5, 44100);
        let out = crossfade(&a, &b, &MixParameters::new(1.0, 44100)).unwrap();

        // Before the window: pure a
        assert_eq!(out.samples[0], 0.5);
        assert_eq!(out.samples[44100], 0.5);
        // After the window: pure b
        assert_eq!(out.samples[44100 * 4], 0.25);
        assert_eq!(out.samples[44100 * 5 - 1], 0.25);
        // Window midpoint: halfway between the two levels
        let mid = out.samples[44100 * 5 / 2];
        assert!((mid - 0.375).abs() < 1e-3, "fade midpoint {mid}");
    }

    #[test]
    fn test_fade_stays_within_input_bounds() {
        let a = constant(0.9, 44100 * 2, 44100);
        let b = constant(-0.3, 44100 * 2, 44100);
        let out = crossfade(&a, &b, &MixParameters::new(1.0, 44100)).unwrap();
        for &s in &out.samples {
            assert!((-0.3..=0.9).contains(&s), "sample {s} out of bounds");
        }
    }

    #[test]
    fn test_duration_longer_than_material() {
        let a = constant(0.5, 44100 * 3, 44100);
        let b = constant(0.5, 44100 * 3, 44100);
        let result = crossfade(&a, &b, &MixParameters::new(10.0, 44100));
        assert!(matches!(result, Err(Error::InvalidDuration { .. })));
    }

    #[test]
    fn test_nonpositive_duration_rejected() {
        let a = constant(0.5, 44100, 44100);
        for d in [0.0, -1.0, f32::NAN] {
            assert!(crossfade(&a, &a, &MixParameters::new(d, 44100)).is_err());
        }
    }

    #[test]
    fn test_rate_mismatch_is_converted() {
        let a = constant(0.5, 48000 * 2, 48000);
        let b = constant(0.5, 44100 * 2, 44100);
        let out = crossfade(&a, &b, &MixParameters::new(0.5, 44100)).unwrap();
        assert_eq!(out.sample_rate, 44100);
        // Both inputs are 2 s, so the common length is 2 s at 44.1 kHz,
        // within resampler length rounding.
        assert!((out.len() as i64 - 88200).unsigned_abs() < 4);
    }

    #[test]
    fn test_normalize() {
        let signal = Signal::new(vec![0.1, -0.5, 0.25], 44100);
        let normalized = normalize(&signal);
        assert!((normalized.peak() - 1.0).abs() < 1e-6);
        assert!((normalized.samples[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_silence_noop() {
        let silence = Signal::silence(100, 44100);
        assert_eq!(normalize(&silence).samples, silence.samples);
    }
}
