pub mod dsp;
pub mod engine; // Sequencing, configuration snapshots, and the audio-thread engine
pub mod graph; // Persistent signal graph: voice bus, echo loop, master stage
pub mod tuning; // Note names and tanpura string frequencies
pub mod voice;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
