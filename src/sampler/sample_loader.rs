//! Audio file decoding.
//!
//! Recordings and uploaded files are decoded with Symphonia into an
//! [`AudioBuffer`] at the file's own sample rate, keeping every channel so
//! that slices cut from it stay faithful to the source.

use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use symphonia::core::{
    audio::SampleBuffer as SymphoniaSampleBuffer, codecs::DecoderOptions,
    errors::Error as SymphoniaError, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};

use crate::messages::AudioBuffer;
use crate::sampler::channels::deinterleave;
use crate::sampler::errors::SampleLoadError;

/// Decodes an audio file from disk.
///
/// The file extension, when present, is passed to format detection as a hint.
///
/// # Errors
///
/// - File not found or cannot be opened
/// - Audio format not recognized or corrupted
/// - Missing sample rate or channel information
pub fn decode_audio_file(path: &Path) -> Result<AudioBuffer, SampleLoadError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    log::debug!("Decoding {}", path.display());
    decode_stream(mss, &hint)
}

/// Decodes an in-memory encoded recording, e.g. a microphone capture.
///
/// `extension` is an optional container hint such as `"wav"` or `"ogg"`.
pub fn decode_audio_bytes(
    bytes: Vec<u8>,
    extension: Option<&str>,
) -> Result<AudioBuffer, SampleLoadError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    decode_stream(mss, &hint)
}

fn decode_stream(mss: MediaSourceStream, hint: &Hint) -> Result<AudioBuffer, SampleLoadError> {
    let probed = get_probe().format(
        hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or(SampleLoadError::NoDefaultTrack)?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(SampleLoadError::MissingSampleRate)?;
    let channels = track
        .codec_params
        .channels
        .ok_or(SampleLoadError::MissingChannels)?
        .count();

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut decoded: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(SampleLoadError::Decode(err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let audio_buf = decoder.decode(&packet)?;
        let spec = *audio_buf.spec();
        let duration = audio_buf.capacity() as u64;

        let mut sample_buf = SymphoniaSampleBuffer::<f32>::new(duration, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        decoded.extend_from_slice(sample_buf.samples());
    }

    let buffer = AudioBuffer::new(sample_rate, deinterleave(&decoded, channels))?;
    log::info!(
        "Decoded {} ch@{} Hz, {:.3}s",
        buffer.num_channels(),
        buffer.sample_rate(),
        buffer.duration_s()
    );

    Ok(buffer)
}
