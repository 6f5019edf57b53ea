//! Dominant-tempo estimation.
//!
//! Autocorrelation of the onset envelope over the lag band corresponding to
//! 40–240 BPM, with octave-error correction: a tempo that lands outside the
//! "danceable" 60–180 BPM band is folded toward it when the half- or
//! double-tempo lag carries comparable periodicity strength.

use crate::onset::OnsetEnvelope;
use tracing::debug;

/// Returned when the envelope is too short or carries no periodicity.
pub const FALLBACK_BPM: f32 = 120.0;

/// Lower edge of the searched tempo range.
pub const MIN_BPM: f32 = 40.0;
/// Upper edge of the searched tempo range.
pub const MAX_BPM: f32 = 240.0;

// Octave correction: prefer tempi inside this band...
const PREFERRED_MIN_BPM: f32 = 60.0;
const PREFERRED_MAX_BPM: f32 = 180.0;
// ...when the in-band candidate's strength is at least this fraction of the
// raw winner's.
const OCTAVE_STRENGTH_RATIO: f32 = 0.4;

/// A single dominant tempo, with the analysis context it was derived in.
#[derive(Debug, Clone, Copy)]
pub struct TempoEstimate {
    /// Beats per minute.
    pub bpm: f32,
    /// Envelope hop the estimate was derived at, in samples.
    pub hop: usize,
    /// Source sample rate in Hz.
    pub sample_rate: u32,
}

impl TempoEstimate {
    /// Estimate the dominant tempo of an onset envelope.
    ///
    /// Degenerate input — an empty envelope, an all-silent one, or one too
    /// short to hold a single 40 BPM period — yields [`FALLBACK_BPM`]
    /// rather than an error: a usable default tempo is musically worth
    /// more than a refusal.
    pub fn estimate(envelope: &OnsetEnvelope) -> Self {
        let fallback = Self {
            bpm: FALLBACK_BPM,
            hop: envelope.hop,
            sample_rate: envelope.sample_rate,
        };

        let frame_rate = envelope.frame_rate();
        // Lag bounds: high tempo = short lag
        let lag_min = (60.0 * frame_rate / MAX_BPM).ceil() as usize;
        let lag_max = (60.0 * frame_rate / MIN_BPM).floor() as usize;

        if lag_min == 0 || envelope.len() <= lag_min + 1 {
            return fallback;
        }
        let lag_max = lag_max.min(envelope.len() - 1);

        // Mean-removed autocorrelation so a DC offset in the envelope does
        // not masquerade as periodicity.
        let mean = envelope.values.iter().sum::<f32>() / envelope.len() as f32;
        let centered: Vec<f32> = envelope.values.iter().map(|&v| v - mean).collect();

        let strength_at = |lag: usize| -> f32 {
            centered[..centered.len() - lag]
                .iter()
                .zip(&centered[lag..])
                .map(|(&a, &b)| a * b)
                .sum()
        };

        let mut best_lag = 0usize;
        let mut best_strength = 0.0f32;
        for lag in lag_min..=lag_max {
            let s = strength_at(lag);
            if s > best_strength {
                best_strength = s;
                best_lag = lag;
            }
        }

        if best_lag == 0 || best_strength <= 0.0 {
            return fallback;
        }

        let lag_to_bpm = |lag: usize| 60.0 * frame_rate / lag as f32;
        let mut bpm = lag_to_bpm(best_lag);

        // Octave-error correction. Only engage when the raw winner is
        // outside the preferred band and the folded candidate is inside it.
        if !(PREFERRED_MIN_BPM..=PREFERRED_MAX_BPM).contains(&bpm) {
            let candidates = [best_lag * 2, best_lag / 2];
            for lag in candidates {
                if !(lag_min..=lag_max).contains(&lag) {
                    continue;
                }
                let candidate_bpm = lag_to_bpm(lag);
                if (PREFERRED_MIN_BPM..=PREFERRED_MAX_BPM).contains(&candidate_bpm)
                    && strength_at(lag) >= OCTAVE_STRENGTH_RATIO * best_strength
                {
                    bpm = candidate_bpm;
                    break;
                }
            }
        }

        debug!(bpm, lag = best_lag, "tempo estimate");
        Self {
            bpm,
            hop: envelope.hop,
            sample_rate: envelope.sample_rate,
        }
    }

    /// Beat period in envelope frames at this tempo.
    pub fn period_frames(&self) -> f32 {
        60.0 * self.sample_rate as f32 / (self.hop as f32 * self.bpm)
    }

    /// Beat period in seconds.
    pub fn period_secs(&self) -> f32 {
        60.0 / self.bpm
    }
}
