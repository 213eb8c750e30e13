//! Min/max overview of a sample for waveform display.

/// Lowest and highest sample in one display column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnPeak {
    pub min: f32,
    pub max: f32,
}

/// Reduces `samples` to `columns` min/max pairs.
///
/// Each column covers `max(1, len / columns)` consecutive samples starting at
/// `column * step`. Columns past the end of the data are flat at zero.
pub fn column_peaks(samples: &[f32], columns: usize) -> Vec<ColumnPeak> {
    if columns == 0 {
        return Vec::new();
    }

    let step = (samples.len() / columns).max(1);
    (0..columns)
        .map(|column| {
            let start = (column * step).min(samples.len());
            let end = (start + step).min(samples.len());
            let bucket = &samples[start..end];
            if bucket.is_empty() {
                return ColumnPeak { min: 0.0, max: 0.0 };
            }

            bucket.iter().fold(
                ColumnPeak {
                    min: f32::INFINITY,
                    max: f32::NEG_INFINITY,
                },
                |peak, &s| ColumnPeak {
                    min: peak.min.min(s),
                    max: peak.max.max(s),
                },
            )
        })
        .collect()
}
