//! Byte-buffer audio codec layer for Mezcla.
//!
//! This crate is the only place the engine touches serialized audio. It has
//! exactly two jobs:
//!
//! - [`decode`] - container bytes (wav/mp3/flac/ogg/aac) → mono [`Signal`]
//!   at a caller-chosen sample rate
//! - [`encode`] - [`Signal`] → uncompressed WAV bytes, byte-exact
//!   reproducible for identical input
//!
//! plus the [`resample`] module backing the rate conversion. No file paths,
//! no network — callers hand in bytes and get bytes back.

pub mod decode;
pub mod encode;
pub mod resample;

pub use decode::decode;
pub use encode::{SampleDepth, encode};
pub use mezcla_core::Signal;

/// Error types for codec operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Container probe or packet decode failure.
    #[error("audio decode error: {0}")]
    Decode(String),

    /// Zero-length input, or a container that decodes to zero frames.
    #[error("input contains no audio")]
    EmptyInput,

    /// Sample-rate conversion failure.
    #[error("resampling error: {0}")]
    Resample(String),

    /// WAV encode failure.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

/// Convenience result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
