//! Time stretching and pitch shifting.
//!
//! The stretcher is a phase vocoder: the signal's STFT is resampled along
//! the time axis, with per-bin phase accumulation keeping partials coherent
//! so duration changes without the pitch moving. Plain resampling would
//! couple the two — that is exactly what [`pitch_shift`] exploits by
//! combining a stretch with a resample back to the original length.
//!
//! Reference: J. L. Flanagan and R. M. Golden, "Phase Vocoder", Bell System
//! Technical Journal 45, 1966; the STFT-resampling formulation follows
//! M. Dolson, "The Phase Vocoder: A Tutorial", Computer Music Journal 10(4),
//! 1986.

use crate::{Error, Result};
use mezcla_analysis::Error as AnalysisError;
use mezcla_analysis::fft::{Fft, Window};
use mezcla_codec::resample::resample_to_len;
use mezcla_core::Signal;
use rustfft::num_complex::Complex;
use std::f32::consts::PI;
use tracing::debug;

const FRAME: usize = 2048;
const HOP: usize = 512;

/// Change a signal's duration by `factor` without altering its pitch.
///
/// `factor` follows playback-rate semantics: 2.0 plays twice as fast
/// (half the duration), 0.5 half as fast (double). The output length is
/// `round(len / factor)` exactly.
///
/// # Errors
///
/// [`Error::InvalidFactor`] for a non-positive or non-finite factor;
/// [`Error::Analysis`] when the signal is shorter than the two STFT frames
/// the vocoder needs.
pub fn time_stretch(signal: &Signal, factor: f32) -> Result<Signal> {
    if !(factor.is_finite() && factor > 0.0) {
        return Err(Error::InvalidFactor(factor));
    }
    if (factor - 1.0).abs() < 1e-6 {
        return Ok(signal.clone());
    }
    if signal.len() < FRAME + HOP {
        return Err(Error::Analysis(AnalysisError::InsufficientData(format!(
            "time stretch needs at least {} samples, got {}",
            FRAME + HOP,
            signal.len()
        ))));
    }

    let target_len = (signal.len() as f64 / factor as f64).round() as usize;

    // Analysis STFT
    let fft = Fft::new(FRAME);
    let window = Window::Hann.coefficients(FRAME);
    let num_frames = (signal.len() - FRAME) / HOP + 1;
    let bins = FRAME / 2 + 1;

    let mut frames: Vec<Vec<Complex<f32>>> = Vec::with_capacity(num_frames);
    let mut buf = vec![0.0f32; FRAME];
    for i in 0..num_frames {
        let start = i * HOP;
        for (j, slot) in buf.iter_mut().enumerate() {
            *slot = signal.samples[start + j] * window[j];
        }
        frames.push(fft.forward(&buf));
    }

    // Expected phase advance per analysis hop, per bin
    let expected: Vec<f32> = (0..bins)
        .map(|k| 2.0 * PI * HOP as f32 * k as f32 / FRAME as f32)
        .collect();

    // Synthesis: walk the frame axis in steps of `factor`, interpolating
    // magnitudes and accumulating phase from the inter-frame differences.
    let mut phase: Vec<f32> = frames[0].iter().map(|c| c.arg()).collect();

    let mut ola = vec![0.0f32; target_len + FRAME];
    let mut window_sum = vec![0.0f32; target_len + FRAME];
    let mut spectrum = vec![Complex::new(0.0f32, 0.0f32); FRAME];

    let mut out_frame = 0usize;
    let mut t = 0.0f64;
    while (t.floor() as usize) + 1 < num_frames {
        let i = t.floor() as usize;
        let frac = (t - i as f64) as f32;

        for k in 0..bins {
            let mag = (1.0 - frac) * frames[i][k].norm() + frac * frames[i + 1][k].norm();
            spectrum[k] = Complex::from_polar(mag, phase[k]);
        }
        // Conjugate mirror for the negative-frequency half
        for k in 1..bins - 1 {
            spectrum[FRAME - k] = spectrum[k].conj();
        }

        fft.inverse_complex(&mut spectrum);

        let out_start = out_frame * HOP;
        for j in 0..FRAME {
            if out_start + j >= ola.len() {
                break;
            }
            ola[out_start + j] += spectrum[j].re * window[j];
            window_sum[out_start + j] += window[j] * window[j];
        }

        for k in 0..bins {
            let mut dphi = frames[i + 1][k].arg() - frames[i][k].arg() - expected[k];
            // Wrap the deviation to (-pi, pi]
            dphi -= 2.0 * PI * (dphi / (2.0 * PI)).round();
            phase[k] += expected[k] + dphi;
        }

        out_frame += 1;
        t += factor as f64;
    }

    let mut samples = vec![0.0f32; target_len];
    for (j, slot) in samples.iter_mut().enumerate() {
        if window_sum[j] > 1e-6 {
            *slot = ola[j] / window_sum[j];
        } else {
            *slot = ola[j];
        }
    }

    debug!(
        factor,
        input_len = signal.len(),
        output_len = samples.len(),
        "time stretch"
    );
    Ok(Signal::new(samples, signal.sample_rate))
}

/// Shift a signal's pitch by `semitones` without changing its duration.
///
/// Positive values raise the pitch. Internally: slow the signal down by the
/// pitch ratio with [`time_stretch`], then sinc-resample the result back to
/// the original length — the resample compresses time and spectrum together,
/// landing at the original duration with the spectrum scaled by the ratio.
pub fn pitch_shift(signal: &Signal, semitones: f32) -> Result<Signal> {
    if !semitones.is_finite() {
        return Err(Error::InvalidFactor(semitones));
    }
    if semitones == 0.0 {
        return Ok(signal.clone());
    }

    let ratio = 2.0f32.powf(semitones / 12.0);
    let stretched = time_stretch(signal, 1.0 / ratio)?;
    let samples = resample_to_len(&stretched.samples, signal.len());
    Ok(Signal::new(samples, signal.sample_rate))
}
