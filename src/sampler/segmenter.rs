//! Silence-based slicing of a recording into pad-sized sounds.
//!
//! The detector works on a mono mix of the buffer: a short causal moving
//! average of the absolute amplitude (the envelope) is compared against a
//! threshold, silent runs long enough to count as a gap split the signal, and
//! every sufficiently long loud region becomes a [`Segment`]. Segments are
//! widened by a fixed padding so attacks and decays are not clipped.
//!
//! All duration to frame conversions truncate toward zero. Padded segments of
//! neighbouring sounds may overlap; they are never merged.

use crate::messages::AudioBuffer;
use crate::sampler::channels::mix_to_mono;
use crate::sampler::constants::{
    DEFAULT_MIN_SILENCE_S, DEFAULT_MIN_SLICE_S, DEFAULT_PADDING_S, DEFAULT_THRESHOLD,
    ENVELOPE_WINDOW_S,
};
use crate::sampler::errors::InvalidInput;

/// Tuning for [`segment`].
///
/// Override single fields with struct update syntax:
/// `SegmentationConfig { padding_s: 0.1, ..Default::default() }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationConfig {
    /// Envelope level below which a frame is silent (same scale as samples).
    pub threshold: f32,
    /// Shortest silent run, in seconds, that ends a slice.
    pub min_silence_s: f64,
    /// Shortest slice, in seconds before padding, that is kept.
    pub min_slice_s: f64,
    /// Audio kept before and after every slice, in seconds.
    pub padding_s: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_silence_s: DEFAULT_MIN_SILENCE_S,
            min_slice_s: DEFAULT_MIN_SLICE_S,
            padding_s: DEFAULT_PADDING_S,
        }
    }
}

impl SegmentationConfig {
    /// Checks that the threshold and every duration are finite and non-negative.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if !self.threshold.is_finite() {
            return Err(InvalidInput::NonFiniteValue { field: "threshold" });
        }
        if self.threshold < 0.0 {
            return Err(InvalidInput::NegativeThreshold {
                value: self.threshold,
            });
        }

        for (field, value) in [
            ("min_silence_s", self.min_silence_s),
            ("min_slice_s", self.min_slice_s),
            ("padding_s", self.padding_s),
        ] {
            if !value.is_finite() {
                return Err(InvalidInput::NonFiniteValue { field });
            }
            if value < 0.0 {
                return Err(InvalidInput::NegativeDuration { field, value });
            }
        }

        Ok(())
    }
}

/// Half-open frame range `start..end` of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    /// The segment covering a whole buffer of `len` frames.
    pub fn whole(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Widens the segment by `pad` frames on both sides, clamped to `0..len`.
    pub fn padded(self, pad: usize, len: usize) -> Self {
        Self {
            start: self.start.saturating_sub(pad),
            end: self.end.saturating_add(pad).min(len),
        }
    }
}

/// Converts a duration to a frame count, truncating toward zero.
pub fn seconds_to_frames(seconds: f64, sample_rate: u32) -> usize {
    (seconds * f64::from(sample_rate)).floor() as usize
}

/// Causal moving average of `|mono|` over `window` frames.
///
/// The first frames are averaged over the samples seen so far, so the
/// envelope is not biased toward silence at the start of the buffer.
pub fn envelope(mono: &[f32], window: usize) -> Vec<f32> {
    let window = window.max(1);
    let mut sum = 0.0f64;

    mono.iter()
        .enumerate()
        .map(|(i, sample)| {
            sum += f64::from(sample.abs());
            if i >= window {
                sum -= f64::from(mono[i - window].abs());
                // Rounding can leave a tiny negative remainder after a burst.
                sum = sum.max(0.0);
            }
            (sum / (i + 1).min(window) as f64) as f32
        })
        .collect()
}

/// Marks each frame whose envelope is strictly below `threshold`.
pub fn silence_mask(envelope: &[f32], threshold: f32) -> Vec<bool> {
    envelope.iter().map(|&level| level < threshold).collect()
}

/// Finds loud regions in a silence mask.
///
/// A region starts at the first loud frame after silence and runs until a
/// silent run of at least `min_silence` frames begins (or the mask ends);
/// shorter silent runs stay inside the region. Regions shorter than
/// `min_slice` frames are dropped.
pub fn find_regions(silent: &[bool], min_silence: usize, min_slice: usize) -> Vec<Segment> {
    let len = silent.len();
    let mut regions = Vec::new();
    let mut i = 0;

    while i < len {
        while i < len && silent[i] {
            i += 1;
        }
        if i >= len {
            break;
        }

        let start = i;
        let mut end = len;
        while i < len {
            if !silent[i] {
                i += 1;
                continue;
            }

            let gap_start = i;
            while i < len && silent[i] {
                i += 1;
            }
            if i - gap_start >= min_silence {
                end = gap_start;
                break;
            }
        }

        if end - start >= min_slice {
            regions.push(Segment { start, end });
        }
    }

    regions
}

/// Result of silence detection on one buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Padded slices in chronological order; never empty.
    pub segments: Vec<Segment>,
    /// True when no region qualified and `segments` is the whole buffer.
    pub whole_buffer: bool,
}

/// Runs silence detection on `buffer` and reports whether it fell back.
pub fn detect(
    buffer: &AudioBuffer,
    config: &SegmentationConfig,
) -> Result<Detection, InvalidInput> {
    config.validate()?;

    let rate = buffer.sample_rate();
    let len = buffer.len();
    let window = seconds_to_frames(ENVELOPE_WINDOW_S, rate);
    let min_silence = seconds_to_frames(config.min_silence_s, rate);
    let min_slice = seconds_to_frames(config.min_slice_s, rate);
    let pad = seconds_to_frames(config.padding_s, rate);

    let mono = mix_to_mono(buffer);
    let silent = silence_mask(&envelope(&mono, window), config.threshold);

    let segments: Vec<Segment> = find_regions(&silent, min_silence, min_slice)
        .into_iter()
        .map(|region| region.padded(pad, len))
        .collect();

    if segments.is_empty() {
        return Ok(Detection {
            segments: vec![Segment::whole(len)],
            whole_buffer: true,
        });
    }

    Ok(Detection {
        segments,
        whole_buffer: false,
    })
}

/// Detects padded slices in `buffer`.
///
/// # Parameters
/// - `buffer`: Audio to scan; every channel is mixed to mono for detection
/// - `config`: Threshold and durations, validated before any work is done
///
/// # Returns
/// Frame ranges in chronological order. Always at least one segment: when no
/// region qualifies, the whole buffer is returned as a single segment.
///
/// # Errors
/// Returns [`InvalidInput`] if `config` has a non-finite or negative field.
pub fn detect_segments(
    buffer: &AudioBuffer,
    config: &SegmentationConfig,
) -> Result<Vec<Segment>, InvalidInput> {
    Ok(detect(buffer, config)?.segments)
}

/// Copies each segment of `buffer` into its own buffer, in order.
pub fn materialize(buffer: &AudioBuffer, segments: &[Segment]) -> Vec<AudioBuffer> {
    segments
        .iter()
        .map(|segment| buffer.copy_frames(segment.start, segment.end))
        .collect()
}

/// Splits `buffer` on silence into independent slices.
///
/// The slices keep the sample rate and every original (unmixed) channel of the
/// input. They never share storage with the input or with each other.
///
/// # Parameters
/// - `buffer`: Recording to split
/// - `config`: Detection tuning, see [`SegmentationConfig`]
///
/// # Returns
/// The slices in chronological order. Never empty.
///
/// # Errors
/// Returns [`InvalidInput`] if `config` fails [`SegmentationConfig::validate`].
pub fn segment(
    buffer: &AudioBuffer,
    config: &SegmentationConfig,
) -> Result<Vec<AudioBuffer>, InvalidInput> {
    let segments = detect_segments(buffer, config)?;
    Ok(materialize(buffer, &segments))
}
