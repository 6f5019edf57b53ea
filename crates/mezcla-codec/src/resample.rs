//! Sample-rate conversion.
//!
//! Rational P/Q resampling via polyphase FIR filtering with a windowed-sinc
//! prototype lowpass, plus windowed-sinc interpolation to an arbitrary
//! output length. Never naive sample-dropping — aliasing products are
//! filtered out before decimation.
//!
//! Reference: P. P. Vaidyanathan, *Multirate Systems and Filter Banks*,
//! Prentice Hall, 1993, Chapter 4 (polyphase representation).

use crate::{Error, Result};
use std::f32::consts::PI;

/// Beyond this reduced P or Q the polyphase filter gets impractically long;
/// [`convert_rate`] switches to direct sinc interpolation instead.
const MAX_POLYPHASE_FACTOR: usize = 512;

/// Half-width (in input samples) of the interpolation kernel used by
/// [`resample_to_len`].
const SINC_HALF_TAPS: usize = 16;

/// Windowed-sinc lowpass FIR coefficients, normalized to unity DC gain.
///
/// `cutoff` is normalized to Nyquist: 1.0 = fs/2. Uses a Blackman window;
/// odd `num_taps` gives a symmetric Type I linear-phase filter.
pub fn design_lowpass(num_taps: usize, cutoff: f32) -> Vec<f32> {
    if num_taps == 0 {
        return Vec::new();
    }

    let m = (num_taps - 1) as f32;
    let mut coeffs: Vec<f32> = (0..num_taps)
        .map(|n| {
            let x = n as f32 - m / 2.0;
            let sinc = if x.abs() < 1e-7 {
                cutoff
            } else {
                (PI * cutoff * x).sin() / (PI * x)
            };
            let window = if num_taps == 1 {
                1.0
            } else {
                let phase = 2.0 * PI * n as f32 / m;
                0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
            };
            sinc * window
        })
        .collect();

    let sum: f32 = coeffs.iter().sum();
    if sum.abs() > 1e-10 {
        for c in &mut coeffs {
            *c /= sum;
        }
    }
    coeffs
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Rational resampling by the factor P/Q using polyphase decomposition.
///
/// Computes exactly the samples of the P-upsampled, lowpass-filtered,
/// Q-downsampled sequence without materializing the upsampled signal. The
/// prototype lowpass cuts at `0.9 / max(P, Q)` normalized (10% guard band)
/// and is split into P sub-filters; output sample m uses sub-filter
/// `(m*Q) mod P` against input samples ending at `floor(m*Q / P)`.
///
/// Output length is `ceil(len * P / Q)`.
pub fn resample(signal: &[f32], p: usize, q: usize) -> Result<Vec<f32>> {
    if p == 0 || q == 0 {
        return Err(Error::Resample(format!(
            "rate factors must be positive, got {p}/{q}"
        )));
    }

    let g = gcd(p, q);
    let (p, q) = (p / g, q / g);
    if p == 1 && q == 1 {
        return Ok(signal.to_vec());
    }

    let num_taps = 4 * p.max(q) * 10 + 1;
    let cutoff = 0.9 / p.max(q) as f32;
    let prototype = design_lowpass(num_taps, cutoff);

    let taps_per_phase = num_taps.div_ceil(p);
    let mut polyphase = vec![vec![0.0f32; taps_per_phase]; p];
    for (tap_idx, &coeff) in prototype.iter().enumerate() {
        polyphase[tap_idx % p][tap_idx / p] = coeff;
    }

    let out_len = (signal.len() * p).div_ceil(q);
    let mut output = Vec::with_capacity(out_len);

    for m in 0..out_len {
        let full_idx = m * q;
        let n = full_idx / p;
        let sub_filter = &polyphase[full_idx % p];

        let mut acc = 0.0f32;
        for (i, &coeff) in sub_filter.iter().enumerate() {
            if n >= i && n - i < signal.len() {
                acc += coeff * signal[n - i];
            }
        }
        // Scale by P to restore unity passband gain after zero-insertion
        output.push(acc * p as f32);
    }

    Ok(output)
}

/// Resample to an exact output length using windowed-sinc interpolation.
///
/// Used where the rate ratio has no small rational form (pitch shifting by
/// irrational factors, odd container rates). Each output sample is a
/// Hann-windowed sinc sum over ±[`SINC_HALF_TAPS`] input samples; when
/// downsampling, the kernel is widened by the rate ratio to act as the
/// anti-aliasing lowpass.
pub fn resample_to_len(signal: &[f32], target_len: usize) -> Vec<f32> {
    if signal.is_empty() || target_len == 0 {
        return Vec::new();
    }
    if signal.len() == target_len {
        return signal.to_vec();
    }

    let pi = std::f64::consts::PI;
    let step = signal.len() as f64 / target_len as f64;
    // When compressing, widen the kernel and lower its cutoff
    let bandwidth = if step > 1.0 { 1.0 / step } else { 1.0 };
    let half_width = if step > 1.0 {
        (SINC_HALF_TAPS as f64 * step).ceil() as isize
    } else {
        SINC_HALF_TAPS as isize
    };

    let mut output = Vec::with_capacity(target_len);
    for m in 0..target_len {
        let center = m as f64 * step;
        let left = center.floor() as isize - half_width + 1;

        let mut acc = 0.0f64;
        for k in left..left + 2 * half_width {
            if k < 0 || k as usize >= signal.len() {
                continue;
            }
            let x = (center - k as f64) * bandwidth;
            let sinc = if x.abs() < 1e-9 {
                1.0
            } else {
                (pi * x).sin() / (pi * x)
            };
            // Hann window over the kernel span
            let t = (center - k as f64) / half_width as f64;
            let window = 0.5 * (1.0 + (pi * t).cos());
            acc += signal[k as usize] as f64 * sinc * bandwidth * window;
        }
        output.push(acc as f32);
    }

    output
}

/// Convert a signal between two sample rates.
///
/// Uses the exact polyphase path when the reduced ratio is small enough and
/// falls back to sinc interpolation for awkward ratios.
pub fn convert_rate(signal: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == 0 || to_rate == 0 {
        return Err(Error::Resample(format!(
            "sample rates must be positive, got {from_rate} -> {to_rate}"
        )));
    }
    if from_rate == to_rate {
        return Ok(signal.to_vec());
    }

    let g = gcd(to_rate as usize, from_rate as usize);
    let p = to_rate as usize / g;
    let q = from_rate as usize / g;

    if p.max(q) <= MAX_POLYPHASE_FACTOR {
        resample(signal, p, q)
    } else {
        let target_len = (signal.len() as u64 * to_rate as u64).div_ceil(from_rate as u64) as usize;
        Ok(resample_to_len(signal, target_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sr: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f32 / sr).sin())
            .collect()
    }

    /// Direct DFT amplitude at a single frequency.
    fn tone_amplitude(signal: &[f32], freq: f32, sr: f32) -> f32 {
        let mut re = 0.0f32;
        let mut im = 0.0f32;
        for (i, &s) in signal.iter().enumerate() {
            let phase = 2.0 * PI * freq * i as f32 / sr;
            re += s * phase.cos();
            im += s * phase.sin();
        }
        2.0 * (re * re + im * im).sqrt() / signal.len() as f32
    }

    #[test]
    fn test_lowpass_symmetry_and_dc() {
        let coeffs = design_lowpass(65, 0.4);
        for i in 0..coeffs.len() / 2 {
            assert!((coeffs[i] - coeffs[coeffs.len() - 1 - i]).abs() < 1e-6);
        }
        let sum: f32 = coeffs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_resample_identity() {
        let signal: Vec<f32> = (0..100).map(|i| i as f32 * 0.01).collect();
        let out = resample(&signal, 3, 3).unwrap();
        assert_eq!(out, signal);
    }

    #[test]
    fn test_resample_length_formula() {
        let signal = vec![0.0f32; 1000];
        for (p, q) in [(2, 1), (1, 2), (160, 147), (147, 160), (3, 7)] {
            let out = resample(&signal, p, q).unwrap();
            assert_eq!(out.len(), (1000 * p).div_ceil(q), "P={p} Q={q}");
        }
    }

    #[test]
    fn test_convert_rate_preserves_tone() {
        // 1 kHz at 44.1 kHz → 48 kHz: tone survives, length scales
        let signal = sine(1000.0, 44100.0, 44100);
        let out = convert_rate(&signal, 44100, 48000).unwrap();
        assert_eq!(out.len(), (44100 * 160usize).div_ceil(147));

        let amp = tone_amplitude(&out[4800..43200], 1000.0, 48000.0);
        assert!(amp > 0.8, "tone amplitude after resample: {amp}");
    }

    #[test]
    fn test_convert_rate_downsample_antialiases() {
        // 20 kHz at 48 kHz is above the 12 kHz Nyquist of a 24 kHz output
        // and must be rejected, not folded back.
        let signal = sine(20000.0, 48000.0, 48000);
        let out = convert_rate(&signal, 48000, 24000).unwrap();
        let mean_abs: f32 = out.iter().map(|x| x.abs()).sum::<f32>() / out.len() as f32;
        assert!(mean_abs < 0.05, "alias energy after downsample: {mean_abs}");
    }

    #[test]
    fn test_resample_to_len_preserves_tone() {
        let signal = sine(440.0, 44100.0, 44100);
        let out = resample_to_len(&signal, 33000);
        assert_eq!(out.len(), 33000);
        let peak = out.iter().fold(0.0f32, |a, &s| a.max(s.abs()));
        assert!(peak > 0.8);
    }

    #[test]
    fn test_zero_factor_rejected() {
        assert!(resample(&[0.0; 10], 0, 1).is_err());
        assert!(convert_rate(&[0.0; 10], 0, 44100).is_err());
    }
}
