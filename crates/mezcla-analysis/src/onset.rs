//! Spectral-flux onset envelope.
//!
//! The onset envelope summarizes how much new spectral energy arrives in
//! each analysis frame. It is the single substrate both the tempo estimator
//! and the beat tracker consume — computing it once per track and reusing
//! it is the expected calling pattern.

use crate::fft::{Fft, Window, magnitudes};
use mezcla_core::Signal;
use tracing::trace;

/// Default analysis frame length in samples.
pub const DEFAULT_FRAME_SIZE: usize = 2048;
/// Default hop between frames in samples.
pub const DEFAULT_HOP: usize = 512;

/// A frame-rate novelty curve derived from a [`Signal`].
///
/// One non-negative value per frame; frame `i` corresponds to time
/// `i * hop / sample_rate`. Derived data: never mutated after creation,
/// always recomputed from a signal.
#[derive(Debug, Clone)]
pub struct OnsetEnvelope {
    /// Novelty value per frame, each ≥ 0.
    pub values: Vec<f32>,
    /// Hop between frames in samples.
    pub hop: usize,
    /// Sample rate of the source signal in Hz.
    pub sample_rate: u32,
}

impl OnsetEnvelope {
    /// Compute the envelope with the default frame size (2048) and hop (512).
    pub fn compute(signal: &Signal) -> Self {
        Self::compute_with(signal, DEFAULT_FRAME_SIZE, DEFAULT_HOP)
    }

    /// Compute the envelope with explicit frame and hop sizes.
    ///
    /// Per frame: Hann window → magnitude spectrum → spectral flux, i.e.
    /// the sum of positive bin-to-bin magnitude increases since the
    /// previous frame. The flux curve is then median-smoothed (window 3)
    /// to knock down single-frame spikes that are not onsets.
    ///
    /// A signal shorter than one frame produces an empty envelope —
    /// "insufficient data" is a value here, not an error.
    pub fn compute_with(signal: &Signal, frame_size: usize, hop: usize) -> Self {
        assert!(frame_size > 0 && hop > 0, "frame and hop must be positive");

        if signal.len() < frame_size {
            return Self {
                values: Vec::new(),
                hop,
                sample_rate: signal.sample_rate,
            };
        }

        let fft = Fft::new(frame_size);
        let window = Window::Hann.coefficients(frame_size);
        let num_frames = (signal.len() - frame_size) / hop + 1;

        let mut prev_mags: Option<Vec<f32>> = None;
        let mut flux = Vec::with_capacity(num_frames);

        let mut frame = vec![0.0f32; frame_size];
        for i in 0..num_frames {
            let start = i * hop;
            for (j, slot) in frame.iter_mut().enumerate() {
                *slot = signal.samples[start + j] * window[j];
            }

            let mags = magnitudes(&fft.forward(&frame));
            let novelty = match &prev_mags {
                // No predecessor: by convention the first frame carries no
                // onset information.
                None => 0.0,
                Some(prev) => mags
                    .iter()
                    .zip(prev.iter())
                    .map(|(&m, &p)| (m - p).max(0.0))
                    .sum(),
            };
            flux.push(novelty);
            prev_mags = Some(mags);
        }

        let values = median3(&flux);
        trace!(frames = values.len(), frame_size, hop, "onset envelope");

        Self {
            values,
            hop,
            sample_rate: signal.sample_rate,
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no full frame fit in the source signal.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Envelope frames per second.
    pub fn frame_rate(&self) -> f32 {
        self.sample_rate as f32 / self.hop as f32
    }

    /// Time in seconds of frame `i`.
    pub fn frame_time(&self, i: usize) -> f32 {
        i as f32 * self.hop as f32 / self.sample_rate as f32
    }
}

/// 3-point median filter; endpoints pass through unchanged.
fn median3(values: &[f32]) -> Vec<f32> {
    if values.len() < 3 {
        return values.to_vec();
    }
    let mut out = Vec::with_capacity(values.len());
    out.push(values[0]);
    for w in values.windows(3) {
        let (a, b, c) = (w[0], w[1], w[2]);
        out.push(a.max(b).min(a.min(b).max(c)));
    }
    out.push(values[values.len() - 1]);
    out
}
