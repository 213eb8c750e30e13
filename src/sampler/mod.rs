//! Sampler Module
//!
//! This module turns decoded recordings into playable pads. It is organized
//! into sub-modules, each with a specific responsibility:
//!
//! - [`constants`]: Grid layout, segmentation defaults and limits
//! - [`errors`]: Sampler error types
//! - [`channels`]: Channel mixing and interleaving helpers
//! - [`segmenter`]: Silence-based slicing of a buffer
//! - [`sample_loader`]: Audio file decoding
//! - [`pad_bank`]: The 4x4 pad grid, trims and pitch variants
//! - [`waveform`]: Min/max overview for waveform display
//!
//! The [`PadSampler`] struct owns one session's pads and recording and exposes
//! them to Python.

use crate::messages::{AudioBuffer, SlicerMessage};
use crate::sampler::errors::{InvalidInput, PadError, SampleLoadError};
use crate::sampler::pad_bank::PadBank;
use crate::sampler::segmenter::{SegmentationConfig, detect, detect_segments, materialize};
use env_logger::{Builder, Env};
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::collections::VecDeque;
use std::path::Path;

pub(crate) mod channels;
pub(crate) mod constants;
pub(crate) mod errors;
pub(crate) mod pad_bank;
pub(crate) mod sample_loader;
pub(crate) mod segmenter;
pub(crate) mod waveform;

/// Setup and configure the logger for sampler operations
pub fn setup_logger() {
    // Users can override via `RUST_LOG`, e.g. `RUST_LOG=debug` when troubleshooting.
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init()
        .unwrap_or(()); // Ignore initialization errors
}

fn invalid_input(err: InvalidInput) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn pad_error(err: PadError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn load_error(err: SampleLoadError, path: &str) -> PyErr {
    match err {
        SampleLoadError::Io(err) if err.kind() == std::io::ErrorKind::NotFound => {
            PyRuntimeError::new_err(format!("File not found: {path}"))
        }
        err => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Builds a config from optional overrides, defaulting the rest.
fn config_from(
    threshold: Option<f32>,
    min_silence_s: Option<f64>,
    min_slice_s: Option<f64>,
    padding_s: Option<f64>,
) -> SegmentationConfig {
    let defaults = SegmentationConfig::default();
    SegmentationConfig {
        threshold: threshold.unwrap_or(defaults.threshold),
        min_silence_s: min_silence_s.unwrap_or(defaults.min_silence_s),
        min_slice_s: min_slice_s.unwrap_or(defaults.min_slice_s),
        padding_s: padding_s.unwrap_or(defaults.padding_s),
    }
}

fn buffer_from_arrays(
    channels: &[PyReadonlyArray1<'_, f32>],
    sample_rate: u32,
) -> Result<AudioBuffer, InvalidInput> {
    let channels = channels
        .iter()
        .map(|array| array.as_array().to_vec())
        .collect();
    AudioBuffer::new(sample_rate, channels)
}

/// Detects silence-separated slices in raw channel arrays.
///
/// Returns padded `(start, end)` frame ranges; never empty.
#[pyfunction]
#[pyo3(signature = (channels, sample_rate, threshold=None, min_silence_s=None, min_slice_s=None, padding_s=None))]
pub fn detect_slices<'py>(
    channels: Vec<PyReadonlyArray1<'py, f32>>,
    sample_rate: u32,
    threshold: Option<f32>,
    min_silence_s: Option<f64>,
    min_slice_s: Option<f64>,
    padding_s: Option<f64>,
) -> PyResult<Vec<(usize, usize)>> {
    let buffer = buffer_from_arrays(&channels, sample_rate).map_err(invalid_input)?;
    let config = config_from(threshold, min_silence_s, min_slice_s, padding_s);

    let segments = detect_segments(&buffer, &config).map_err(invalid_input)?;
    Ok(segments.iter().map(|s| (s.start, s.end)).collect())
}

/// PadSampler holds one session: the 16 pads and the last recording.
#[pyclass]
pub struct PadSampler {
    bank: PadBank,
    recording: Option<AudioBuffer>,
    messages: VecDeque<SlicerMessage>,
}

impl PadSampler {
    /// Slices `source` on silence and refills the grid with the result.
    ///
    /// Returns the number of pads filled.
    fn slice_into_pads(
        &mut self,
        source: &AudioBuffer,
        config: &SegmentationConfig,
    ) -> Result<usize, InvalidInput> {
        let detection = detect(source, config)?;
        if detection.whole_buffer {
            self.messages.push_back(SlicerMessage::WholeBuffer());
        }

        let assignment = self
            .bank
            .fill_slices(materialize(source, &detection.segments));
        self.report(assignment.assigned, assignment.discarded);
        Ok(assignment.assigned)
    }

    fn report(&mut self, assigned: usize, discarded: usize) {
        if discarded > 0 {
            self.messages.push_back(SlicerMessage::Truncated {
                kept: assigned,
                discarded,
            });
        }
        self.messages
            .push_back(SlicerMessage::Assigned { count: assigned });
    }
}

#[pymethods]
impl PadSampler {
    /// Create a new PadSampler with an empty grid.
    #[new]
    pub fn new() -> PyResult<Self> {
        setup_logger();

        Ok(PadSampler {
            bank: PadBank::new(),
            recording: None,
            messages: VecDeque::new(),
        })
    }

    /// Decode an audio file onto a pad. Returns the sample duration in seconds.
    pub fn load_pad(&mut self, pad: usize, path: String) -> PyResult<f64> {
        let buffer = sample_loader::decode_audio_file(Path::new(&path))
            .map_err(|err| load_error(err, &path))?;
        let duration = buffer.duration_s();
        let name = Path::new(&path)
            .file_name()
            .and_then(|name| name.to_str())
            .map_or_else(|| format!("sound {}", pad + 1), str::to_owned);

        self.bank.assign(pad, name, buffer).map_err(pad_error)?;
        Ok(duration)
    }

    /// Decode an audio file as the current recording.
    pub fn load_recording(&mut self, path: String) -> PyResult<f64> {
        let buffer = sample_loader::decode_audio_file(Path::new(&path))
            .map_err(|err| load_error(err, &path))?;
        let duration = buffer.duration_s();
        self.recording = Some(buffer);
        Ok(duration)
    }

    /// Decode an encoded recording held in memory (e.g. a microphone capture).
    #[pyo3(signature = (data, extension=None))]
    pub fn load_recording_bytes(&mut self, data: Vec<u8>, extension: Option<String>) -> PyResult<f64> {
        let buffer = sample_loader::decode_audio_bytes(data, extension.as_deref())
            .map_err(|err| PyRuntimeError::new_err(err.to_string()))?;
        let duration = buffer.duration_s();
        self.recording = Some(buffer);
        Ok(duration)
    }

    /// Use already decoded channel arrays as the current recording.
    pub fn set_recording<'py>(
        &mut self,
        channels: Vec<PyReadonlyArray1<'py, f32>>,
        sample_rate: u32,
    ) -> PyResult<f64> {
        let buffer = buffer_from_arrays(&channels, sample_rate).map_err(invalid_input)?;
        let duration = buffer.duration_s();
        self.recording = Some(buffer);
        Ok(duration)
    }

    /// Slice the current recording on silence and spread it over the pads.
    #[pyo3(signature = (threshold=None, min_silence_s=None, min_slice_s=None, padding_s=None))]
    pub fn slice_recording(
        &mut self,
        threshold: Option<f32>,
        min_silence_s: Option<f64>,
        min_slice_s: Option<f64>,
        padding_s: Option<f64>,
    ) -> PyResult<usize> {
        let recording = self
            .recording
            .take()
            .ok_or_else(|| PyRuntimeError::new_err("No recording available"))?;
        let config = config_from(threshold, min_silence_s, min_slice_s, padding_s);

        let result = self.slice_into_pads(&recording, &config);
        self.recording = Some(recording);
        result.map_err(invalid_input)
    }

    /// Slice one pad's sample on silence and spread it over the pads.
    #[pyo3(signature = (pad, threshold=None, min_silence_s=None, min_slice_s=None, padding_s=None))]
    pub fn slice_pad(
        &mut self,
        pad: usize,
        threshold: Option<f32>,
        min_silence_s: Option<f64>,
        min_slice_s: Option<f64>,
        padding_s: Option<f64>,
    ) -> PyResult<usize> {
        let source = self.bank.get(pad).map_err(pad_error)?.buffer.clone();
        let config = config_from(threshold, min_silence_s, min_slice_s, padding_s);

        self.slice_into_pads(&source, &config)
            .map_err(invalid_input)
    }

    /// Fill every pad with one pad's sample at rising playback rates.
    pub fn pitch_pad(&mut self, pad: usize) -> PyResult<usize> {
        let assignment = self.bank.fill_pitch_variants(pad).map_err(pad_error)?;
        self.report(assignment.assigned, assignment.discarded);
        Ok(assignment.assigned)
    }

    /// Refill the grid from the pads that hold a sample, keeping their names.
    pub fn fill_from_pads(&mut self) -> usize {
        let assignment = self.bank.fill_from_occupied();
        self.report(assignment.assigned, assignment.discarded);
        assignment.assigned
    }

    /// Fill every pad with a copy of one pad's sample.
    pub fn duplicate_pad(&mut self, pad: usize) -> PyResult<usize> {
        let assignment = self.bank.fill_duplicates(pad).map_err(pad_error)?;
        self.report(assignment.assigned, assignment.discarded);
        Ok(assignment.assigned)
    }

    /// Move a pad's trim bars. Returns the clamped `(start_s, end_s)`.
    pub fn set_trim(&mut self, pad: usize, start_s: f64, end_s: f64) -> PyResult<(f64, f64)> {
        let trim = self
            .bank
            .get_mut(pad)
            .and_then(|p| p.set_trim(start_s, end_s))
            .map_err(pad_error)?;
        Ok((trim.start_s, trim.end_s))
    }

    /// Current `(start_s, end_s)` trim of a pad.
    pub fn trim(&self, pad: usize) -> PyResult<(f64, f64)> {
        let trim = self.bank.get(pad).map_err(pad_error)?.trim;
        Ok((trim.start_s, trim.end_s))
    }

    /// Empty a pad.
    pub fn clear_pad(&mut self, pad: usize) -> PyResult<()> {
        self.bank.clear(pad).map_err(pad_error)?;
        Ok(())
    }

    /// Name of the sample on a pad, or `None` when the pad is empty.
    pub fn pad_name(&self, pad: usize) -> PyResult<Option<String>> {
        match self.bank.get(pad) {
            Ok(p) => Ok(Some(p.name.clone())),
            Err(PadError::EmptyPad { .. }) => Ok(None),
            Err(err) => Err(pad_error(err)),
        }
    }

    pub fn pad_duration(&self, pad: usize) -> PyResult<f64> {
        Ok(self.bank.get(pad).map_err(pad_error)?.buffer.duration_s())
    }

    pub fn playback_rate(&self, pad: usize) -> PyResult<f32> {
        Ok(self.bank.get(pad).map_err(pad_error)?.playback_rate)
    }

    pub fn sample_rate(&self, pad: usize) -> PyResult<u32> {
        Ok(self.bank.get(pad).map_err(pad_error)?.buffer.sample_rate())
    }

    /// Trimmed samples of one channel of a pad, as a fresh numpy array.
    pub fn pad_samples<'py>(
        &self,
        py: Python<'py>,
        pad: usize,
        channel: usize,
    ) -> PyResult<Bound<'py, PyArray1<f32>>> {
        let trimmed = self.bank.get(pad).map_err(pad_error)?.trimmed_buffer();
        if channel >= trimmed.num_channels() {
            return Err(PyValueError::new_err(format!(
                "channel out of range (expected 0..{}, got {channel})",
                trimmed.num_channels() - 1
            )));
        }

        Ok(PyArray1::from_vec(py, trimmed.channel(channel).to_vec()))
    }

    /// Min/max waveform columns of a pad's first channel.
    pub fn pad_peaks(&self, pad: usize, columns: usize) -> PyResult<Vec<(f32, f32)>> {
        let buffer = &self.bank.get(pad).map_err(pad_error)?.buffer;
        Ok(waveform::column_peaks(buffer.channel(0), columns)
            .into_iter()
            .map(|peak| (peak.min, peak.max))
            .collect())
    }

    /// Pads that currently hold a sample.
    pub fn occupied_pads(&self) -> Vec<usize> {
        self.bank.occupied().map(|(index, _)| index).collect()
    }

    #[staticmethod]
    pub fn key_for_pad(pad: usize) -> Option<char> {
        pad_bank::key_for_pad(pad)
    }

    #[staticmethod]
    pub fn pad_for_key(key: char) -> Option<usize> {
        pad_bank::pad_for_key(key)
    }

    /// Pop the oldest pending notice, if any.
    pub fn receive_msg(&mut self) -> Option<SlicerMessage> {
        self.messages.pop_front()
    }
}
