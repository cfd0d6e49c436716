//! The audio-thread engine and its control surface.
//!
//! `TanpuraEngine` lives on the audio thread and owns the only persistent
//! state in the crate: the lazily-built signal graph and the sequencer. The
//! UI side keeps an [`EngineHandle`]; configuration snapshots and manual
//! plucks flow in through a wait-free queue, pluck notifications flow back
//! out through another. Neither side ever blocks.

pub mod config;
pub mod sequencer;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::graph::DroneGraph;
use crate::tuning::StringId;
use crate::voice::PluckVoice;
use crate::MAX_BLOCK_SIZE;

pub use config::EngineConfig;
pub use sequencer::PluckSequencer;

const CONTROL_QUEUE_SIZE: usize = 64;
const EVENT_QUEUE_SIZE: usize = 256;

pub enum EngineMessage {
    /// Full configuration snapshot; the engine diffs it against the previous
    /// one to decide whether the rotation needs rescheduling.
    SetConfig(EngineConfig),
    /// Immediate pluck, independent of the rotation.
    ManualPluck(StringId),
}

/// Emitted once per dispatched pluck, sequenced or manual, before the voice
/// is spawned. A skipped pluck emits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluckEvent {
    pub string: StringId,
}

/// UI-side endpoint. Sends are fire-and-forget; a full control queue drops
/// the message (snapshots are last-value-wins, the next one catches up).
pub struct EngineHandle {
    control: Producer<EngineMessage>,
    events: Consumer<PluckEvent>,
}

impl EngineHandle {
    pub fn set_config(&mut self, config: EngineConfig) {
        let _ = self.control.push(EngineMessage::SetConfig(config));
    }

    pub fn manual_pluck(&mut self, string: StringId) {
        let _ = self.control.push(EngineMessage::ManualPluck(string));
    }

    /// Drain one pluck notification, if any arrived since the last poll.
    pub fn poll_pluck(&mut self) -> Option<PluckEvent> {
        self.events.pop().ok()
    }
}

pub struct TanpuraEngine {
    sample_rate: f32,
    config: EngineConfig,
    graph: Option<DroneGraph>,
    sequencer: PluckSequencer,
    control: Consumer<EngineMessage>,
    events: Producer<PluckEvent>,
}

impl TanpuraEngine {
    pub fn new(sample_rate: f32) -> (Self, EngineHandle) {
        let (control_tx, control_rx) = RingBuffer::<EngineMessage>::new(CONTROL_QUEUE_SIZE);
        let (event_tx, event_rx) = RingBuffer::<PluckEvent>::new(EVENT_QUEUE_SIZE);

        let engine = Self {
            sample_rate,
            config: EngineConfig::default(),
            graph: None,
            sequencer: PluckSequencer::new(),
            control: control_rx,
            events: event_tx,
        };
        let handle = EngineHandle {
            control: control_tx,
            events: event_rx,
        };

        (engine, handle)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Render one block of mono output. Call from the audio callback.
    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Ok(message) = self.control.pop() {
            match message {
                EngineMessage::SetConfig(config) => self.apply_config(config),
                EngineMessage::ManualPluck(string) => self.pluck(string),
            }
        }

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        let tempo = self.config.tempo;
        let pluck_delay_ms = self.config.pluck_delay_ms;

        // Collect due strings first; plucking needs the engine mutably.
        let mut due: Vec<StringId> = Vec::new();
        self.sequencer
            .advance(out.len(), tempo, pluck_delay_ms, self.sample_rate, |id| {
                due.push(id)
            });
        for string in due {
            self.pluck(string);
        }

        match &mut self.graph {
            Some(graph) => graph.render_block(out),
            None => out.fill(0.0),
        }
    }

    fn apply_config(&mut self, next: EngineConfig) {
        let next = next.clamped();

        // Gain changes retarget the live graph without touching the rotation.
        if let Some(graph) = &mut self.graph {
            graph.set_master_volume(next.master_volume);
            graph.set_echo_level(next.echo_level);
        }

        if next.is_playing != self.config.is_playing {
            if next.is_playing {
                self.sequencer.start();
            } else {
                self.sequencer.stop();
            }
        } else if next.is_playing && !next.timing_matches(&self.config) {
            self.sequencer.reschedule();
        }

        self.config = next;
    }

    /// Dispatch one pluck: look the string up in the current snapshot, notify
    /// the UI, spawn the voice. A failed lookup skips the pluck entirely;
    /// the configuration may legitimately be mid-update.
    fn pluck(&mut self, string: StringId) {
        let Some(frequency) = self.config.frequencies.get(string) else {
            return;
        };
        let Some(volume) = self.config.string_volume(string) else {
            return;
        };

        let _ = self.events.push(PluckEvent { string });

        let voice = PluckVoice::new(frequency, volume, self.sample_rate);
        self.ensure_graph().spawn(voice);
    }

    /// The graph is created on the first sound-producing action and lives
    /// from then on.
    fn ensure_graph(&mut self) -> &mut DroneGraph {
        let sample_rate = self.sample_rate;
        let master = self.config.master_volume;
        let echo = self.config.echo_level;
        self.graph
            .get_or_insert_with(|| DroneGraph::new(sample_rate, master, echo))
    }
}
