//! Mezcla Mix - rendering two analyzed decks into one signal
//!
//! - [`crossfade`] - curve-shaped crossfade of two signals
//! - [`stretch`] - phase-vocoder time stretch and pitch shift
//! - [`quantize`] - blend a signal toward a beat-aligned reconstruction
//! - [`session`] - the byte-level `analyze` / `mix` / `sync` contracts and
//!   the caller-owned per-deck context
//!
//! The analysis crates degrade gracefully; this crate does the opposite.
//! A crossfade that does not fit, or a stretch by a nonsense factor, is a
//! hard error — silently clamping either would change the musical result
//! behind the caller's back.

pub mod crossfade;
pub mod quantize;
pub mod session;
pub mod stretch;

pub use crossfade::{MixParameters, crossfade, normalize};
pub use quantize::quantize;
pub use session::{
    ANALYSIS_SAMPLE_RATE, DeckContext, TrackAnalysis, analyze, mix, mix_decks, mix_with, sync,
};
pub use stretch::{pitch_shift, time_stretch};

/// Error types for mixing operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested crossfade needs more material than the signals hold.
    #[error(
        "crossfade of {requested:.2}s needs {required} samples but only {available} are available"
    )]
    InvalidDuration {
        /// Requested crossfade duration in seconds.
        requested: f32,
        /// Fade length that duration implies, in samples.
        required: usize,
        /// Samples actually available after truncation to the shorter signal.
        available: usize,
    },

    /// A stretch or pitch factor was zero, negative, or non-finite.
    #[error("invalid stretch factor: {0}")]
    InvalidFactor(f32),

    /// Decode/encode failure from the codec layer.
    #[error(transparent)]
    Codec(#[from] mezcla_codec::Error),

    /// Failure from the analysis layer.
    #[error(transparent)]
    Analysis(#[from] mezcla_analysis::Error),
}

/// Convenience result type for mixing operations.
pub type Result<T> = std::result::Result<T, Error>;
