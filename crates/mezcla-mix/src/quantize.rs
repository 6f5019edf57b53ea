//! Quantize a signal toward an idealized beat grid.

use crate::{Error, Result};
use mezcla_analysis::Error as AnalysisError;
use mezcla_core::Signal;

/// Blend a signal with its beat-aligned reconstruction.
///
/// The signal is cut into beat-length segments and each segment `i` is
/// re-placed at exactly `round(i * period)` samples, where `period` is the
/// exact (fractional) beat period at `bpm`. Because segment boundaries in
/// the source can only sit on integer samples, this removes the up-to-a-
/// sample-per-beat drift a fractional period accumulates.
///
/// `strength` selects the blend: `strength * aligned + (1 - strength) *
/// original`. 0.0 returns the input bit-identically; 1.0 returns the full
/// reconstruction. Values outside [0, 1] are clamped.
///
/// # Errors
///
/// [`Error::Analysis`] with `InvalidTempo` when `bpm` is not a positive
/// finite number, or when one beat period is shorter than a single sample.
pub fn quantize(signal: &Signal, bpm: f32, strength: f32) -> Result<Signal> {
    if !(bpm.is_finite() && bpm > 0.0) {
        return Err(Error::Analysis(AnalysisError::InvalidTempo(bpm)));
    }

    let strength = strength.clamp(0.0, 1.0);
    if strength == 0.0 || signal.is_empty() {
        return Ok(signal.clone());
    }

    let period = 60.0 / bpm * signal.sample_rate as f32;
    let seg_len = period.floor() as usize;
    if seg_len == 0 {
        return Err(Error::Analysis(AnalysisError::InvalidTempo(bpm)));
    }

    // Re-place integer-cut segments at the exact fractional grid positions.
    let mut aligned = vec![0.0f32; signal.len()];
    let mut i = 0usize;
    loop {
        let src_start = i * seg_len;
        if src_start >= signal.len() {
            break;
        }
        let dst_start = (i as f32 * period).round() as usize;
        if dst_start >= signal.len() {
            break;
        }

        let copy_len = seg_len
            .min(signal.len() - src_start)
            .min(signal.len() - dst_start);
        aligned[dst_start..dst_start + copy_len]
            .copy_from_slice(&signal.samples[src_start..src_start + copy_len]);
        i += 1;
    }

    let samples = signal
        .samples
        .iter()
        .zip(aligned.iter())
        .map(|(&orig, &snap)| strength * snap + (1.0 - strength) * orig)
        .collect();

    Ok(Signal::new(samples, signal.sample_rate))
}
