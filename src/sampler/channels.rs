use crate::messages::AudioBuffer;

/// Mixes every channel of `buffer` down to one mono signal.
///
/// Each output frame is the arithmetic mean of that frame across channels, so
/// the result has the same length as the buffer.
pub fn mix_to_mono(buffer: &AudioBuffer) -> Vec<f32> {
    let channels = buffer.channels();
    if let [only] = channels {
        return only.clone();
    }

    let n = channels.len() as f32;
    let mut mono = vec![0.0f32; buffer.len()];
    for data in channels {
        for (out, &sample) in mono.iter_mut().zip(data) {
            *out += sample / n;
        }
    }
    mono
}

/// Splits interleaved samples into one vector per channel.
///
/// A trailing partial frame is dropped.
pub fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    if channels == 0 {
        return Vec::new();
    }

    let frames = samples.len() / channels;
    let mut out: Vec<Vec<f32>> = (0..channels).map(|_| Vec::with_capacity(frames)).collect();
    for frame in samples.chunks_exact(channels) {
        for (data, &sample) in out.iter_mut().zip(frame) {
            data.push(sample);
        }
    }
    out
}
