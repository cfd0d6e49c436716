//! Note names and tanpura string tuning.
//!
//! A tanpura carries four strings: the fifth (pa), two strings tuned an
//! octave above the root (sa1, sa2), and the root itself (sa). The fifth is
//! voiced just below the root, which gives the drone its floor.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const A4_FREQ: f32 = 440.0;

/// Chromatic note names, twelve-tone equal temperament.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

pub const ALL_NOTES: [Note; 12] = [
    Note::C,
    Note::Cs,
    Note::D,
    Note::Ds,
    Note::E,
    Note::F,
    Note::Fs,
    Note::G,
    Note::Gs,
    Note::A,
    Note::As,
    Note::B,
];

impl Note {
    /// Position within the chromatic scale, C = 0 .. B = 11.
    pub fn semitone_index(self) -> i32 {
        match self {
            Note::C => 0,
            Note::Cs => 1,
            Note::D => 2,
            Note::Ds => 3,
            Note::E => 4,
            Note::F => 5,
            Note::Fs => 6,
            Note::G => 7,
            Note::Gs => 8,
            Note::A => 9,
            Note::As => 10,
            Note::B => 11,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        }
    }
}

/// Frequency of a note in a given octave, referenced to A4 = 440 Hz.
pub fn note_frequency(note: Note, octave: i8) -> f32 {
    let semitones_from_a4 =
        (note.semitone_index() - Note::A.semitone_index()) + (octave as i32 - 4) * 12;
    A4_FREQ * 2.0_f32.powf(semitones_from_a4 as f32 / 12.0)
}

/// The four string roles, fixed cardinality.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringId {
    /// The fifth, voiced below the root.
    Pa,
    /// First upper-octave root string.
    Sa1,
    /// Second upper-octave root string.
    Sa2,
    /// The root.
    Sa,
}

impl StringId {
    pub fn label(self) -> &'static str {
        match self {
            StringId::Pa => "Pa (5th)",
            StringId::Sa1 => "Sa (8ve)",
            StringId::Sa2 => "Sa (8ve)",
            StringId::Sa => "Sa (Root)",
        }
    }
}

/// Sequencer rotation order: the fifth opens the cycle, then the two upper
/// roots, then the root. This order defines the drone's rhythmic character;
/// the sequencer indexes this constant and nothing else.
pub const PLUCK_ORDER: [StringId; 4] = [StringId::Pa, StringId::Sa1, StringId::Sa2, StringId::Sa];

/// Per-string volume, read at pluck time. Last value wins; a note already
/// sounding is not reshaped.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StringSetting {
    pub id: StringId,
    pub volume: f32,
}

/// Frequencies for the four strings, in Hz.
///
/// `get` validates the stored value so that a map that is mid-update (or
/// deliberately silent) degrades to a skipped pluck rather than an audible
/// glitch or a panic.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyMap {
    pub pa: f32,
    pub sa1: f32,
    pub sa2: f32,
    pub sa: f32,
}

impl FrequencyMap {
    pub fn get(&self, id: StringId) -> Option<f32> {
        let freq = match id {
            StringId::Pa => self.pa,
            StringId::Sa1 => self.sa1,
            StringId::Sa2 => self.sa2,
            StringId::Sa => self.sa,
        };
        (freq.is_finite() && freq > 0.0).then_some(freq)
    }

    /// A map with no valid entries; every pluck against it is skipped.
    pub fn silent() -> Self {
        Self {
            pa: 0.0,
            sa1: 0.0,
            sa2: 0.0,
            sa: 0.0,
        }
    }
}

/// Resolve the four string frequencies for a key and base octave.
///
/// The upper-root strings sit exactly one octave above the root. The fifth
/// is 7 semitones above the root within the chromatic scale; when that
/// offset stays inside the root's octave the fifth drops one octave, when it
/// wraps it keeps the root's octave number. Either way it lands a fourth
/// below the root.
pub fn resolve_frequencies(key: Note, octave: i8) -> FrequencyMap {
    let root = note_frequency(key, octave);
    let root_index = key.semitone_index();

    let pa_note = ALL_NOTES[((root_index + 7) % 12) as usize];
    let pa_octave = if root_index + 7 >= 12 { octave } else { octave - 1 };
    let pa = note_frequency(pa_note, pa_octave);

    FrequencyMap {
        pa,
        sa1: root * 2.0,
        sa2: root * 2.0,
        sa: root,
    }
}
