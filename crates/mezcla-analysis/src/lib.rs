//! Mezcla Analysis - tempo and beat analysis for the mixing engine
//!
//! Everything a two-deck mixer needs to know about rhythm lives here:
//!
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`onset`] - spectral-flux onset envelope, the shared substrate for
//!   tempo and beat estimation
//! - [`tempo`] - dominant-tempo estimation via envelope autocorrelation
//! - [`beat`] - dynamic-programming beat tracking and beat-grid operations
//! - [`xcorr`] - cross-correlation and peak-lag detection
//! - [`sync`] - tempo ratio and beat-grid alignment between two decks
//!
//! Every operation is a deterministic function of its inputs; the crate
//! holds no state and performs no I/O. The usual flow:
//!
//! ```rust,ignore
//! let envelope = OnsetEnvelope::compute(&signal);
//! let tempo = TempoEstimate::estimate(&envelope);
//! let grid = BeatGrid::track(&envelope, Some(tempo.bpm));
//! let sync = sync::compute_sync(tempo_a.bpm, tempo_b.bpm)?;
//! ```
//!
//! Analysis degrades gracefully: a too-short signal yields an empty
//! envelope, tempo estimation falls back to [`tempo::FALLBACK_BPM`], and a
//! beat grid may legitimately hold fewer than two beats. Callers that need
//! a hard failure on missing data check the results explicitly.

pub mod beat;
pub mod fft;
pub mod onset;
pub mod sync;
pub mod tempo;
pub mod xcorr;

pub use beat::{BeatGrid, beat_energies, energy_peaks};
pub use fft::{Fft, Window};
pub use onset::OnsetEnvelope;
pub use sync::{GridAlignment, SyncResult, align_grids, compute_sync};
pub use tempo::TempoEstimate;

/// Error types for analysis operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is too short for the requested operation.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A tempo parameter was zero, negative, or non-finite.
    #[error("invalid tempo: {0} BPM")]
    InvalidTempo(f32),
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;
