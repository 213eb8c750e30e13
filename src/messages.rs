//! Shared value types passed between the sampler engine and Python.
//!
//! [`AudioBuffer`] is the decoded audio every engine stage reads and produces;
//! [`SlicerMessage`] carries the notices the UI shows after a pad operation.

use pyo3::prelude::*;

use crate::sampler::errors::InvalidInput;

/// Decoded audio with one sample vector per channel.
///
/// All channels have the same length and the sample rate is positive; both are
/// checked on construction, so every engine stage can rely on them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, InvalidInput> {
        if sample_rate == 0 {
            return Err(InvalidInput::ZeroSampleRate);
        }

        let expected = channels.first().ok_or(InvalidInput::NoChannels)?.len();
        if let Some((channel, data)) = channels
            .iter()
            .enumerate()
            .find(|(_, data)| data.len() != expected)
        {
            return Err(InvalidInput::ChannelLengthMismatch {
                channel,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// A zero-filled buffer.
    pub fn silent(channels: usize, frames: usize, sample_rate: u32) -> Result<Self, InvalidInput> {
        Self::new(sample_rate, vec![vec![0.0; frames]; channels])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duration_s(&self) -> f64 {
        self.len() as f64 / f64::from(self.sample_rate)
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Copies frames `start..end` (clamped to the buffer) into a new buffer.
    ///
    /// The result owns its samples; editing it never touches `self`.
    pub fn copy_frames(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.len());
        let start = start.min(end);

        Self {
            sample_rate: self.sample_rate,
            channels: self
                .channels
                .iter()
                .map(|data| data[start..end].to_vec())
                .collect(),
        }
    }
}

/// Notice emitted after a pad operation, for the UI to display.
#[derive(Debug, Clone, PartialEq)]
#[pyclass]
pub enum SlicerMessage {
    /// Pads were (re)filled.
    Assigned { count: usize },

    /// More items were produced than there are pads; the rest were dropped.
    Truncated { kept: usize, discarded: usize },

    /// No slice qualified, so the pads got the audio unsliced.
    WholeBuffer(),
}

#[pymethods]
impl SlicerMessage {
    pub fn assigned(&self) -> Option<usize> {
        match self {
            SlicerMessage::Assigned { count } => Some(*count),
            _ => None,
        }
    }

    pub fn truncated(&self) -> Option<(usize, usize)> {
        match self {
            SlicerMessage::Truncated { kept, discarded } => Some((*kept, *discarded)),
            _ => None,
        }
    }

    pub fn whole_buffer(&self) -> bool {
        matches!(self, SlicerMessage::WholeBuffer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_accessors() {
        let whole = SlicerMessage::WholeBuffer();
        assert!(whole.whole_buffer());
        assert_eq!(whole.assigned(), None);
        assert_eq!(whole.truncated(), None);

        let truncated = SlicerMessage::Truncated {
            kept: 16,
            discarded: 2,
        };
        assert!(!truncated.whole_buffer());
        assert_eq!(truncated.truncated(), Some((16, 2)));
        assert_eq!(SlicerMessage::Assigned { count: 3 }.assigned(), Some(3));
    }

    #[test]
    fn test_new_rejects_no_channels() {
        assert_eq!(
            AudioBuffer::new(44_100, Vec::new()),
            Err(InvalidInput::NoChannels)
        );
    }

    #[test]
    fn test_new_rejects_zero_sample_rate() {
        assert_eq!(
            AudioBuffer::new(0, vec![vec![0.0; 4]]),
            Err(InvalidInput::ZeroSampleRate)
        );
    }

    #[test]
    fn test_new_rejects_ragged_channels() {
        let result = AudioBuffer::new(44_100, vec![vec![0.0; 4], vec![0.0; 3]]);
        assert_eq!(
            result,
            Err(InvalidInput::ChannelLengthMismatch {
                channel: 1,
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer::silent(2, 22_050, 44_100).unwrap();
        assert_eq!(buffer.len(), 22_050);
        assert_eq!(buffer.num_channels(), 2);
        assert!((buffer.duration_s() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_copy_frames_is_independent() {
        let source = AudioBuffer::new(10, vec![vec![0.1, 0.2, 0.3, 0.4], vec![1.0, 2.0, 3.0, 4.0]])
            .unwrap();
        let mut copy = source.copy_frames(1, 3);

        assert_eq!(copy.channel(0), &[0.2, 0.3]);
        assert_eq!(copy.channel(1), &[2.0, 3.0]);

        copy.channel_mut(0)[0] = 9.0;
        assert_eq!(source.channel(0)[1], 0.2);
    }

    #[test]
    fn test_copy_frames_clamps_range() {
        let source = AudioBuffer::new(10, vec![vec![0.1, 0.2, 0.3]]).unwrap();

        assert_eq!(source.copy_frames(2, 10).channel(0), &[0.3]);
        assert!(source.copy_frames(5, 10).is_empty());
    }
}
