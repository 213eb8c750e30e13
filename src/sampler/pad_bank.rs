//! The 4x4 pad grid and what each pad holds.

use crate::messages::AudioBuffer;
use crate::sampler::constants::{
    GRID_ORDER, KEYBOARD_KEYS, MIN_TRIM_SPAN_S, NUM_PADS, PITCH_RATE_MAX, PITCH_RATE_MIN,
};
use crate::sampler::errors::PadError;

/// Playable part of a pad's sample, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimRegion {
    pub start_s: f64,
    pub end_s: f64,
}

/// A sample assigned to a pad.
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    pub name: String,
    pub buffer: AudioBuffer,
    pub trim: TrimRegion,
    pub playback_rate: f32,
}

impl Pad {
    /// A pad playing the whole of `buffer` at normal speed.
    pub fn new(name: impl Into<String>, buffer: AudioBuffer) -> Self {
        let trim = TrimRegion {
            start_s: 0.0,
            end_s: buffer.duration_s(),
        };
        Self {
            name: name.into(),
            buffer,
            trim,
            playback_rate: 1.0,
        }
    }

    /// Moves the trim bars.
    ///
    /// The start is clamped into the sample; the end is clamped to the sample
    /// length but kept at least [`MIN_TRIM_SPAN_S`] after the start.
    pub fn set_trim(&mut self, start_s: f64, end_s: f64) -> Result<TrimRegion, PadError> {
        if !start_s.is_finite() || !end_s.is_finite() {
            return Err(PadError::InvalidTrim { start_s, end_s });
        }

        let duration = self.buffer.duration_s();
        let start_s = start_s.clamp(0.0, duration);
        let end_s = end_s.min(duration).max(start_s + MIN_TRIM_SPAN_S);

        self.trim = TrimRegion { start_s, end_s };
        Ok(self.trim)
    }

    /// Copies the trimmed part of the sample.
    pub fn trimmed_buffer(&self) -> AudioBuffer {
        let rate = f64::from(self.buffer.sample_rate());
        let start = (self.trim.start_s * rate).round() as usize;
        let end = (self.trim.end_s * rate).round() as usize;
        self.buffer.copy_frames(start, end)
    }
}

/// Outcome of filling the grid from a list of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub assigned: usize,
    pub discarded: usize,
}

/// The 16 pads of the sampler. Pads are indexed row by row from the top left.
#[derive(Debug, Clone)]
pub struct PadBank {
    pads: Vec<Option<Pad>>,
}

impl Default for PadBank {
    fn default() -> Self {
        Self::new()
    }
}

impl PadBank {
    pub fn new() -> Self {
        Self {
            pads: vec![None; NUM_PADS],
        }
    }

    pub fn get(&self, pad: usize) -> Result<&Pad, PadError> {
        self.pads
            .get(pad)
            .ok_or(PadError::OutOfRange { pad })?
            .as_ref()
            .ok_or(PadError::EmptyPad { pad })
    }

    pub fn get_mut(&mut self, pad: usize) -> Result<&mut Pad, PadError> {
        self.pads
            .get_mut(pad)
            .ok_or(PadError::OutOfRange { pad })?
            .as_mut()
            .ok_or(PadError::EmptyPad { pad })
    }

    /// Puts `buffer` on a single pad, replacing whatever was there.
    pub fn assign(
        &mut self,
        pad: usize,
        name: impl Into<String>,
        buffer: AudioBuffer,
    ) -> Result<(), PadError> {
        let slot = self.pads.get_mut(pad).ok_or(PadError::OutOfRange { pad })?;
        let assigned = Pad::new(name, buffer);
        log::debug!(
            "Pad {pad} <- {} ({:.3}s)",
            assigned.name,
            assigned.buffer.duration_s()
        );
        *slot = Some(assigned);
        Ok(())
    }

    /// Empties a pad, returning what it held.
    pub fn clear(&mut self, pad: usize) -> Result<Option<Pad>, PadError> {
        let slot = self.pads.get_mut(pad).ok_or(PadError::OutOfRange { pad })?;
        Ok(slot.take())
    }

    pub fn clear_all(&mut self) {
        self.pads.iter_mut().for_each(|slot| *slot = None);
    }

    /// Iterates over the pads that hold a sample.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &Pad)> {
        self.pads
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|pad| (index, pad)))
    }

    /// Replaces the whole grid with `items`, laid out in [`GRID_ORDER`].
    ///
    /// # Parameters
    /// - `items`: Pads to place, in the order they should appear on the grid
    ///
    /// # Returns
    /// How many items landed on a pad and how many were dropped because the
    /// grid has only [`NUM_PADS`] pads.
    pub fn fill(&mut self, items: Vec<Pad>) -> Assignment {
        let total = items.len();
        let discarded = total.saturating_sub(NUM_PADS);
        if discarded > 0 {
            log::warn!("{total} sounds for {NUM_PADS} pads, dropping the last {discarded}");
        }

        self.clear_all();
        let mut assigned = 0;
        for (&target, item) in GRID_ORDER.iter().zip(items) {
            self.pads[target] = Some(item);
            assigned += 1;
        }

        log::info!("Filled {assigned} pads");
        Assignment {
            assigned,
            discarded,
        }
    }

    /// Fills the grid with slices named `slice 1`, `slice 2`, ...
    pub fn fill_slices(&mut self, slices: Vec<AudioBuffer>) -> Assignment {
        let items = slices
            .into_iter()
            .enumerate()
            .map(|(i, buffer)| Pad::new(format!("slice {}", i + 1), buffer))
            .collect();
        self.fill(items)
    }

    /// Fills the grid with copies of one pad played at rising speeds.
    pub fn fill_pitch_variants(&mut self, source: usize) -> Result<Assignment, PadError> {
        let buffer = self.get(source)?.buffer.clone();
        let items = pitch_rates(NUM_PADS)
            .into_iter()
            .map(|rate| {
                let mut pad = Pad::new(
                    format!("pitch {}%", (rate * 100.0).round() as i32),
                    buffer.clone(),
                );
                pad.playback_rate = rate;
                pad
            })
            .collect();
        Ok(self.fill(items))
    }

    /// Regathers the occupied pads, in pad order, and refills the grid with them.
    ///
    /// Names are kept; trims and playback rates start over.
    pub fn fill_from_occupied(&mut self) -> Assignment {
        let items = self
            .occupied()
            .map(|(_, pad)| Pad::new(pad.name.clone(), pad.buffer.clone()))
            .collect();
        self.fill(items)
    }

    /// Fills every pad with a copy of one pad, each named `slot N` after the source.
    pub fn fill_duplicates(&mut self, source: usize) -> Result<Assignment, PadError> {
        let buffer = self.get(source)?.buffer.clone();
        let name = format!("slot {}", source + 1);
        let items = (0..NUM_PADS)
            .map(|_| Pad::new(name.clone(), buffer.clone()))
            .collect();
        Ok(self.fill(items))
    }
}

/// `steps` playback rates spread evenly from [`PITCH_RATE_MIN`] to [`PITCH_RATE_MAX`].
pub fn pitch_rates(steps: usize) -> Vec<f32> {
    match steps {
        0 => Vec::new(),
        1 => vec![PITCH_RATE_MIN],
        _ => (0..steps)
            .map(|i| {
                PITCH_RATE_MIN + (i as f32 / (steps - 1) as f32) * (PITCH_RATE_MAX - PITCH_RATE_MIN)
            })
            .collect(),
    }
}

pub fn key_for_pad(pad: usize) -> Option<char> {
    KEYBOARD_KEYS.get(pad).copied()
}

pub fn pad_for_key(key: char) -> Option<usize> {
    KEYBOARD_KEYS.iter().position(|&k| k == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(frames: usize, level: f32) -> AudioBuffer {
        AudioBuffer::new(1000, vec![vec![level; frames]]).unwrap()
    }

    #[test]
    fn test_new_bank_is_empty() {
        let bank = PadBank::new();
        assert_eq!(bank.occupied().count(), 0);
        assert_eq!(bank.get(0), Err(PadError::EmptyPad { pad: 0 }));
        assert_eq!(bank.get(16), Err(PadError::OutOfRange { pad: 16 }));
    }

    #[test]
    fn test_assign_and_clear() {
        let mut bank = PadBank::new();
        bank.assign(5, "kick.wav", tone(100, 0.5)).unwrap();

        let pad = bank.get(5).unwrap();
        assert_eq!(pad.name, "kick.wav");
        assert_eq!(pad.playback_rate, 1.0);
        assert_eq!(pad.trim, TrimRegion { start_s: 0.0, end_s: 0.1 });

        assert!(bank.clear(5).unwrap().is_some());
        assert_eq!(bank.occupied().count(), 0);
        assert!(bank.assign(NUM_PADS, "x", tone(1, 0.0)).is_err());
    }

    #[test]
    fn test_fill_uses_grid_order() {
        let mut bank = PadBank::new();
        bank.assign(0, "old", tone(10, 0.1)).unwrap();

        let result = bank.fill_slices(vec![tone(10, 0.2), tone(10, 0.3), tone(10, 0.4)]);
        assert_eq!(
            result,
            Assignment {
                assigned: 3,
                discarded: 0,
            }
        );

        // Previous contents are gone and the bottom row fills first.
        let names: Vec<(usize, &str)> = bank
            .occupied()
            .map(|(index, pad)| (index, pad.name.as_str()))
            .collect();
        assert_eq!(names, vec![(12, "slice 1"), (13, "slice 2"), (14, "slice 3")]);
    }

    #[test]
    fn test_fill_truncates_to_pad_count() {
        let mut bank = PadBank::new();
        let slices = (0..20).map(|i| tone(10, i as f32 / 100.0)).collect();

        let result = bank.fill_slices(slices);
        assert_eq!(
            result,
            Assignment {
                assigned: NUM_PADS,
                discarded: 4,
            }
        );
        assert_eq!(bank.occupied().count(), NUM_PADS);
        assert_eq!(bank.get(3).unwrap().name, "slice 16");
    }

    #[test]
    fn test_pitch_rates() {
        let rates = pitch_rates(16);
        assert_eq!(rates.len(), 16);
        assert!((rates[0] - 0.6).abs() < 1e-6);
        assert!((rates[15] - 1.8).abs() < 1e-6);
        assert!(rates.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(pitch_rates(1), vec![PITCH_RATE_MIN]);
        assert!(pitch_rates(0).is_empty());
    }

    #[test]
    fn test_fill_pitch_variants() {
        let mut bank = PadBank::new();
        bank.assign(2, "vox", tone(50, 0.5)).unwrap();

        let result = bank.fill_pitch_variants(2).unwrap();
        assert_eq!(result.assigned, NUM_PADS);

        let first = bank.get(GRID_ORDER[0]).unwrap();
        assert_eq!(first.name, "pitch 60%");
        let last = bank.get(GRID_ORDER[NUM_PADS - 1]).unwrap();
        assert_eq!(last.name, "pitch 180%");
        assert!((last.playback_rate - 1.8).abs() < 1e-6);
        assert_eq!(last.buffer.len(), 50);
    }

    #[test]
    fn test_pitch_variants_are_independent() {
        let mut bank = PadBank::new();
        bank.assign(0, "vox", tone(10, 0.5)).unwrap();
        bank.fill_pitch_variants(0).unwrap();

        bank.get_mut(12).unwrap().buffer.channel_mut(0)[0] = -1.0;
        assert_eq!(bank.get(13).unwrap().buffer.channel(0)[0], 0.5);
    }

    #[test]
    fn test_pitch_from_empty_pad() {
        let mut bank = PadBank::new();
        assert_eq!(
            bank.fill_pitch_variants(7),
            Err(PadError::EmptyPad { pad: 7 })
        );
    }

    #[test]
    fn test_fill_from_occupied_keeps_names_in_pad_order() {
        let mut bank = PadBank::new();
        bank.assign(9, "snare", tone(20, 0.2)).unwrap();
        bank.assign(1, "kick", tone(10, 0.1)).unwrap();
        bank.get_mut(9).unwrap().playback_rate = 1.5;

        let result = bank.fill_from_occupied();
        assert_eq!(
            result,
            Assignment {
                assigned: 2,
                discarded: 0,
            }
        );

        let kick = bank.get(12).unwrap();
        assert_eq!(kick.name, "kick");
        assert_eq!(kick.buffer.len(), 10);
        let snare = bank.get(13).unwrap();
        assert_eq!(snare.name, "snare");
        assert_eq!(snare.playback_rate, 1.0);
        assert_eq!(bank.occupied().count(), 2);
    }

    #[test]
    fn test_fill_from_empty_bank() {
        let mut bank = PadBank::new();
        assert_eq!(bank.fill_from_occupied().assigned, 0);
        assert_eq!(bank.occupied().count(), 0);
    }

    #[test]
    fn test_fill_duplicates() {
        let mut bank = PadBank::new();
        bank.assign(4, "clap", tone(30, 0.5)).unwrap();

        let result = bank.fill_duplicates(4).unwrap();
        assert_eq!(result.assigned, NUM_PADS);
        assert!(bank.occupied().all(|(_, pad)| pad.name == "slot 5"));

        // Every copy owns its samples.
        bank.get_mut(0).unwrap().buffer.channel_mut(0)[0] = -1.0;
        assert_eq!(bank.get(1).unwrap().buffer.channel(0)[0], 0.5);

        assert_eq!(
            bank.fill_duplicates(NUM_PADS),
            Err(PadError::OutOfRange { pad: NUM_PADS })
        );
    }

    #[test]
    fn test_set_trim_clamps() {
        let mut pad = Pad::new("x", tone(1000, 0.5));

        assert_eq!(
            pad.set_trim(-0.5, 2.0).unwrap(),
            TrimRegion { start_s: 0.0, end_s: 1.0 }
        );

        let trim = pad.set_trim(0.5, 0.2).unwrap();
        assert_eq!(trim.start_s, 0.5);
        assert!((trim.end_s - 0.51).abs() < 1e-9);

        assert!(matches!(
            pad.set_trim(f64::NAN, 0.5),
            Err(PadError::InvalidTrim { .. })
        ));
    }

    #[test]
    fn test_trimmed_buffer() {
        let samples: Vec<f32> = (0..1000).map(|i| i as f32).collect();
        let mut pad = Pad::new("ramp", AudioBuffer::new(1000, vec![samples]).unwrap());

        assert_eq!(pad.trimmed_buffer().len(), 1000);

        pad.set_trim(0.25, 0.5).unwrap();
        let mut trimmed = pad.trimmed_buffer();
        assert_eq!(trimmed.len(), 250);
        assert_eq!(trimmed.channel(0)[0], 250.0);

        trimmed.channel_mut(0)[0] = -1.0;
        assert_eq!(pad.buffer.channel(0)[250], 250.0);
    }

    #[test]
    fn test_keyboard_mapping() {
        assert_eq!(key_for_pad(0), Some('&'));
        assert_eq!(key_for_pad(15), Some('v'));
        assert_eq!(key_for_pad(16), None);
        assert_eq!(pad_for_key('q'), Some(8));
        assert_eq!(pad_for_key('m'), None);
    }
}
