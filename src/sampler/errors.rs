//! Sampler error types.

use thiserror::Error;

/// Malformed audio buffer or segmentation settings.
///
/// These are caller mistakes and are never clamped away: a bad config would
/// silently corrupt every pad assignment made from its result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    /// The buffer has no channels.
    #[error("audio buffer has no channels")]
    NoChannels,

    /// The buffer sample rate is zero.
    #[error("sample rate must be positive")]
    ZeroSampleRate,

    /// A channel does not have the same length as the first one.
    #[error("channel {channel} has {actual} frames, expected {expected}")]
    ChannelLengthMismatch {
        /// Index of the offending channel.
        channel: usize,
        /// Frame count of channel 0.
        expected: usize,
        /// Frame count of the offending channel.
        actual: usize,
    },

    /// A duration setting is below zero.
    #[error("{field} must not be negative (got {value})")]
    NegativeDuration {
        /// Name of the config field.
        field: &'static str,
        /// Value that was supplied.
        value: f64,
    },

    /// A setting is NaN or infinite.
    #[error("{field} must be finite")]
    NonFiniteValue {
        /// Name of the config field.
        field: &'static str,
    },

    /// The silence threshold is below zero.
    #[error("threshold must not be negative (got {value})")]
    NegativeThreshold {
        /// Value that was supplied.
        value: f32,
    },
}

/// Errors that can occur while loading audio files.
#[derive(Debug, Error)]
pub enum SampleLoadError {
    /// Failed to open the audio file.
    #[error("failed to open file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode the audio file.
    #[error("failed to decode audio file: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// Audio file has no default track.
    #[error("audio file has no default track")]
    NoDefaultTrack,

    /// Audio file is missing sample rate information.
    #[error("audio file is missing a sample rate")]
    MissingSampleRate,

    /// Audio file is missing channel information.
    #[error("audio file is missing channel information")]
    MissingChannels,

    /// Decoded data does not form a valid buffer.
    #[error("decoded audio is invalid: {0}")]
    Invalid(#[from] InvalidInput),
}

/// Errors raised by pad bank operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PadError {
    /// Pad index is outside the grid.
    #[error("pad out of range (expected 0..{}, got {pad})", crate::sampler::constants::NUM_PADS - 1)]
    OutOfRange {
        /// Requested pad index.
        pad: usize,
    },

    /// Pad has no sample assigned.
    #[error("pad {pad} is empty")]
    EmptyPad {
        /// Requested pad index.
        pad: usize,
    },

    /// Trim bounds are not finite numbers.
    #[error("invalid trim region {start_s}..{end_s}")]
    InvalidTrim {
        /// Requested start in seconds.
        start_s: f64,
        /// Requested end in seconds.
        end_s: f64,
    },
}
