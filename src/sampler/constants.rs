//! Pad grid layout, segmentation defaults and limits.

/// Size of the pad grid (GRID_SIZE x GRID_SIZE).
pub const GRID_SIZE: usize = 4;

/// Total number of pads in the grid.
pub const NUM_PADS: usize = GRID_SIZE.pow(2);

/// Keyboard key bound to each pad, row by row from the top left (AZERTY layout).
pub const KEYBOARD_KEYS: [char; NUM_PADS] = [
    '&', 'é', '"', '\'', 'a', 'z', 'e', 'r', 'q', 's', 'd', 'f', 'w', 'x', 'c', 'v',
];

/// Pad that receives the n-th item of a generated preset.
///
/// The bottom row is filled first so that the first slice sits under the
/// left-most key of the lowest row.
pub const GRID_ORDER: [usize; NUM_PADS] = [12, 13, 14, 15, 8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3];

/// Default amplitude threshold below which the envelope counts as silence.
pub const DEFAULT_THRESHOLD: f32 = 0.02;

/// Default minimum silence (seconds) that splits two slices.
pub const DEFAULT_MIN_SILENCE_S: f64 = 0.12;

/// Default minimum slice length (seconds) before padding.
pub const DEFAULT_MIN_SLICE_S: f64 = 0.05;

/// Default padding (seconds) kept on each side of a slice.
pub const DEFAULT_PADDING_S: f64 = 0.03;

/// Length of the envelope moving-average window in seconds.
pub const ENVELOPE_WINDOW_S: f64 = 0.01;

/// Slowest playback rate produced by the pitch sampler.
pub const PITCH_RATE_MIN: f32 = 0.6;

/// Fastest playback rate produced by the pitch sampler.
pub const PITCH_RATE_MAX: f32 = 1.8;

/// Shortest playable trim region in seconds.
pub const MIN_TRIM_SPAN_S: f64 = 0.01;
