//! Container bytes → mono [`Signal`].

use crate::{Error, Result, resample};
use mezcla_core::Signal;
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Decode an audio container into a mono signal at `target_sample_rate`.
///
/// The container format is sniffed from the bytes (wav, mp3, flac, ogg and
/// aac are enabled). Multi-channel audio is downmixed by averaging the
/// channels of each frame; the result is resampled with the polyphase
/// filter in [`resample`] and finally scaled into [-1, 1] if any decoded
/// sample exceeded full scale.
///
/// # Errors
///
/// [`Error::EmptyInput`] for a zero-length buffer or a container holding no
/// audio frames; [`Error::Decode`] for anything the probe or the packet
/// decoder rejects.
pub fn decode(bytes: &[u8], target_sample_rate: u32) -> Result<Signal> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }
    if target_sample_rate == 0 {
        return Err(Error::Resample("target sample rate must be positive".into()));
    }

    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::Decode(format!("unrecognized container: {e}")))?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::Decode("no audio track in container".into()))?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let source_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::Decode("container does not declare a sample rate".into()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::Decode(format!("unsupported codec: {e}")))?;

    let mut mono: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(Error::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            // A corrupt packet mid-stream is skippable; a hard error is not.
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(Error::Decode(e.to_string())),
        };

        let spec = *decoded.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let samples = sample_buf.samples();
        if channels == 1 {
            mono.extend_from_slice(samples);
        } else {
            for frame in samples.chunks(channels) {
                mono.push(frame.iter().sum::<f32>() / channels as f32);
            }
        }
    }

    if mono.is_empty() {
        return Err(Error::EmptyInput);
    }

    debug!(
        samples = mono.len(),
        source_rate,
        target_sample_rate,
        "decoded container"
    );

    let mut resampled = if source_rate == target_sample_rate {
        mono
    } else {
        resample::convert_rate(&mono, source_rate, target_sample_rate)?
    };

    // Guarantee the [-1, 1] range without touching in-range material, so a
    // decode/encode round trip is transparent for well-formed input.
    let peak = mezcla_core::peak(&resampled);
    if peak > 1.0 {
        for s in &mut resampled {
            *s /= peak;
        }
    }

    Ok(Signal::new(resampled, target_sample_rate))
}
