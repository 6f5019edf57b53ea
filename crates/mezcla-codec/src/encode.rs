//! [`Signal`] → uncompressed WAV bytes.

use crate::{Error, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use mezcla_core::Signal;
use std::io::Cursor;

/// Output sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleDepth {
    /// 16-bit integer PCM. The interchange default — every player reads it.
    #[default]
    Pcm16,
    /// 32-bit IEEE float. Lossless for the engine's internal representation.
    Float32,
}

/// Encode a mono signal as an in-memory WAV (RIFF) byte buffer.
///
/// The container carries the signal's own sample rate; no lossy step is
/// involved beyond integer quantization when [`SampleDepth::Pcm16`] is
/// chosen. Identical input always produces identical bytes.
///
/// # Errors
///
/// [`Error::EmptyInput`] for an empty signal, [`Error::Wav`] if the writer
/// fails (in-memory writes only fail on allocation pressure).
pub fn encode(signal: &Signal, depth: SampleDepth) -> Result<Vec<u8>> {
    if signal.is_empty() {
        return Err(Error::EmptyInput);
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: signal.sample_rate,
        bits_per_sample: match depth {
            SampleDepth::Pcm16 => 16,
            SampleDepth::Float32 => 32,
        },
        sample_format: match depth {
            SampleDepth::Pcm16 => SampleFormat::Int,
            SampleDepth::Float32 => SampleFormat::Float,
        },
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        match depth {
            SampleDepth::Float32 => {
                for &sample in &signal.samples {
                    writer.write_sample(sample)?;
                }
            }
            SampleDepth::Pcm16 => {
                for &sample in &signal.samples {
                    let quantized = (sample * 32768.0).clamp(-32768.0, 32767.0) as i16;
                    writer.write_sample(quantized)?;
                }
            }
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
