//! The byte-level pipeline contracts and per-deck state.
//!
//! The functions here are what a surrounding service layer (HTTP routes, a
//! job queue, a CLI) actually calls: raw container bytes in, analysis
//! results or rendered mix bytes out. Track retrieval and persistence stay
//! on the caller's side of the boundary.
//!
//! Per-deck state is explicit: a [`DeckContext`] caches one track's decoded
//! signal and analysis, and the caller owns it — nothing in this crate
//! holds state across calls.

use crate::crossfade::{MixParameters, crossfade};
use crate::stretch::time_stretch;
use crate::{Error, Result};
use mezcla_analysis::{BeatGrid, OnsetEnvelope, SyncResult, TempoEstimate, compute_sync};
use mezcla_codec::{SampleDepth, decode, encode};
use mezcla_core::Signal;
use serde::Serialize;
use tracing::info;

/// Sample rate every track is analyzed and mixed at.
pub const ANALYSIS_SAMPLE_RATE: u32 = 44100;

/// Rhythm analysis of one track.
#[derive(Debug, Clone, Serialize)]
pub struct TrackAnalysis {
    /// Estimated tempo in BPM.
    pub bpm: f32,
    /// Tracked beat positions in seconds.
    pub beat_times: Vec<f32>,
    /// Track duration in seconds.
    pub duration: f32,
}

/// Analyze a raw audio container: tempo, beat positions, duration.
pub fn analyze(raw: &[u8]) -> Result<TrackAnalysis> {
    let signal = decode(raw, ANALYSIS_SAMPLE_RATE)?;
    Ok(analyze_signal(&signal))
}

fn analyze_signal(signal: &Signal) -> TrackAnalysis {
    let envelope = OnsetEnvelope::compute(signal);
    let tempo = TempoEstimate::estimate(&envelope);
    let grid = BeatGrid::track(&envelope, Some(tempo.bpm));

    info!(
        bpm = tempo.bpm,
        beats = grid.len(),
        duration = signal.duration(),
        "analyzed track"
    );

    TrackAnalysis {
        bpm: tempo.bpm,
        beat_times: grid.times,
        duration: signal.duration(),
    }
}

/// Crossfade two raw audio containers into a 16-bit WAV.
///
/// Both inputs are decoded at [`ANALYSIS_SAMPLE_RATE`] and crossfaded with
/// a linear curve over `crossfade_duration` seconds.
pub fn mix(raw_a: &[u8], raw_b: &[u8], crossfade_duration: f32) -> Result<Vec<u8>> {
    mix_with(
        raw_a,
        raw_b,
        &MixParameters::new(crossfade_duration, ANALYSIS_SAMPLE_RATE),
    )
}

/// Crossfade two raw audio containers with explicit [`MixParameters`].
pub fn mix_with(raw_a: &[u8], raw_b: &[u8], params: &MixParameters) -> Result<Vec<u8>> {
    let a = decode(raw_a, params.sample_rate)?;
    let b = decode(raw_b, params.sample_rate)?;
    let mixed = crossfade(&a, &b, params)?;
    Ok(encode(&mixed, SampleDepth::Pcm16)?)
}

/// Tempo ratio and pitch adjustment between two decks.
///
/// Thin re-export of [`mezcla_analysis::compute_sync`] so service layers
/// need only this module.
pub fn sync(bpm_a: f32, bpm_b: f32) -> Result<SyncResult> {
    Ok(compute_sync(bpm_a, bpm_b)?)
}

/// One deck's loaded track: decoded signal plus cached analysis.
///
/// The caller (session layer, CLI) owns these — one per deck — and passes
/// them into mixing calls. Dropping the context releases the decoded
/// buffer; re-loading re-analyzes from scratch.
#[derive(Debug, Clone)]
pub struct DeckContext {
    signal: Signal,
    analysis: TrackAnalysis,
}

impl DeckContext {
    /// Decode and analyze a track for this deck.
    pub fn load(raw: &[u8]) -> Result<Self> {
        let signal = decode(raw, ANALYSIS_SAMPLE_RATE)?;
        let analysis = analyze_signal(&signal);
        Ok(Self { signal, analysis })
    }

    /// The decoded signal.
    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    /// The cached rhythm analysis.
    pub fn analysis(&self) -> &TrackAnalysis {
        &self.analysis
    }

    /// Sync parameters that bring `other` onto this deck's tempo.
    pub fn sync_from(&self, other: &DeckContext) -> Result<SyncResult> {
        sync(self.analysis.bpm, other.analysis.bpm)
    }
}

/// Render a beat-synchronized crossfade of two loaded decks.
///
/// When `beat_sync` is set, deck B is time-stretched by `bpm_a / bpm_b`
/// before the crossfade so both decks share deck A's tempo through the
/// transition. The rendered mix is returned as 16-bit WAV bytes.
pub fn mix_decks(
    a: &DeckContext,
    b: &DeckContext,
    params: &MixParameters,
    beat_sync: bool,
) -> Result<Vec<u8>> {
    let b_signal;
    let b_ref = if beat_sync {
        let sync = a.sync_from(b)?;
        b_signal = time_stretch(&b.signal, sync.ratio)?;
        &b_signal
    } else {
        &b.signal
    };

    let mixed = crossfade(&a.signal, b_ref, params)?;
    Ok(encode(&mixed, SampleDepth::Pcm16)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Click track bytes: decaying bursts on every beat, WAV-encoded.
    fn click_bytes(bpm: f32, duration_secs: f32) -> Vec<u8> {
        let total = (ANALYSIS_SAMPLE_RATE as f32 * duration_secs) as usize;
        let mut samples = vec![0.0f32; total];
        let interval = 60.0 / bpm;

        let mut beat = 0usize;
        loop {
            let pos = (beat as f32 * interval * ANALYSIS_SAMPLE_RATE as f32) as usize;
            if pos >= total {
                break;
            }
            for j in 0..441.min(total - pos) {
                let t = j as f32 / ANALYSIS_SAMPLE_RATE as f32;
                samples[pos + j] = 0.9
                    * (-t * 400.0).exp()
                    * (2.0 * std::f32::consts::PI * 1000.0 * t).sin();
            }
            beat += 1;
        }

        let signal = Signal::new(samples, ANALYSIS_SAMPLE_RATE);
        encode(&signal, SampleDepth::Float32).unwrap()
    }

    #[test]
    fn test_analyze_click_track() {
        let analysis = analyze(&click_bytes(120.0, 8.0)).unwrap();
        assert!((analysis.bpm - 120.0).abs() < 2.0, "bpm {}", analysis.bpm);
        assert!((analysis.duration - 8.0).abs() < 0.01);
        assert!(analysis.beat_times.len() >= 10);
    }

    #[test]
    fn test_analyze_empty_bytes() {
        assert!(analyze(&[]).is_err());
    }

    #[test]
    fn test_mix_length_and_container() {
        let a = click_bytes(120.0, 4.0);
        let b = click_bytes(128.0, 4.0);
        let out = mix(&a, &b, 1.0).unwrap();

        assert_eq!(&out[0..4], b"RIFF");
        // 4 s of mono 16-bit at 44.1 kHz plus the 44-byte header
        assert_eq!(out.len(), 44 + 4 * ANALYSIS_SAMPLE_RATE as usize * 2);
    }

    #[test]
    fn test_mix_rejects_oversized_fade() {
        let a = click_bytes(120.0, 2.0);
        let b = click_bytes(120.0, 2.0);
        assert!(matches!(
            mix(&a, &b, 10.0),
            Err(Error::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_sync_contract() {
        let result = sync(128.0, 120.0).unwrap();
        assert!((result.ratio - 128.0 / 120.0).abs() < 1e-6);
        assert!(sync(0.0, 120.0).is_err());
    }

    #[test]
    fn test_deck_context_caches_analysis() {
        let deck = DeckContext::load(&click_bytes(120.0, 4.0)).unwrap();
        assert!((deck.analysis().bpm - 120.0).abs() < 2.0);
        assert_eq!(deck.signal().sample_rate, ANALYSIS_SAMPLE_RATE);
    }

    #[test]
    fn test_mix_decks_beat_sync() {
        let a = DeckContext::load(&click_bytes(120.0, 4.0)).unwrap();
        let b = DeckContext::load(&click_bytes(126.0, 4.0)).unwrap();

        let out = mix_decks(&a, &b, &MixParameters::new(1.0, ANALYSIS_SAMPLE_RATE), true).unwrap();
        assert_eq!(&out[0..4], b"RIFF");
    }
}
