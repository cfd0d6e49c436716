use crate::tuning::{resolve_frequencies, FrequencyMap, Note, StringId, StringSetting, PLUCK_ORDER};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const MIN_TEMPO: f32 = 20.0;
pub const MAX_TEMPO: f32 = 200.0;
pub const MIN_PLUCK_DELAY_MS: f32 = 5.0;
pub const MAX_PLUCK_DELAY_MS: f32 = 500.0;

pub const DEFAULT_KEY: Note = Note::C;
pub const DEFAULT_OCTAVE: i8 = 3;
pub const DEFAULT_TEMPO: f32 = 80.0;
pub const DEFAULT_PLUCK_DELAY_MS: f32 = 250.0;
pub const DEFAULT_MASTER_VOLUME: f32 = 0.5;
pub const DEFAULT_STRING_VOLUME: f32 = 0.8;

/// One configuration snapshot, owned by the caller and supplied whole on
/// every change. The engine keeps the latest snapshot only to detect what
/// changed; the caller remains the source of truth.
///
/// Tempo is in cycles per minute, one full four-string rotation per cycle.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub is_playing: bool,
    pub tempo: f32,
    pub pluck_delay_ms: f32,
    pub master_volume: f32,
    pub echo_level: f32,
    pub strings: [StringSetting; 4],
    pub frequencies: FrequencyMap,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            is_playing: false,
            tempo: DEFAULT_TEMPO,
            pluck_delay_ms: DEFAULT_PLUCK_DELAY_MS,
            master_volume: DEFAULT_MASTER_VOLUME,
            echo_level: 0.0,
            strings: PLUCK_ORDER.map(|id| StringSetting {
                id,
                volume: DEFAULT_STRING_VOLUME,
            }),
            frequencies: resolve_frequencies(DEFAULT_KEY, DEFAULT_OCTAVE),
        }
    }
}

impl EngineConfig {
    /// Force every field into its documented range. Out-of-range input is a
    /// degraded request, not an error; the engine clamps on receipt.
    pub fn clamped(mut self) -> Self {
        self.tempo = self.tempo.clamp(MIN_TEMPO, MAX_TEMPO);
        self.pluck_delay_ms = self
            .pluck_delay_ms
            .clamp(MIN_PLUCK_DELAY_MS, MAX_PLUCK_DELAY_MS);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.echo_level = self.echo_level.clamp(0.0, 1.0);
        for setting in &mut self.strings {
            setting.volume = setting.volume.clamp(0.0, 1.0);
        }
        self
    }

    /// Volume of one string, if that string is present in the snapshot.
    pub fn string_volume(&self, id: StringId) -> Option<f32> {
        self.strings
            .iter()
            .find(|setting| setting.id == id)
            .map(|setting| setting.volume)
    }

    /// True when the fields that drive the sequencer's timing are unchanged.
    /// Master volume and echo are deliberately excluded; they retarget the
    /// graph without restarting the rotation.
    pub fn timing_matches(&self, other: &Self) -> bool {
        self.tempo == other.tempo
            && self.pluck_delay_ms == other.pluck_delay_ms
            && self.strings == other.strings
            && self.frequencies == other.frequencies
    }
}
