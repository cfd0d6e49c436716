//! Application state, audio stream setup, and the event loop.
//!
//! The app owns the configuration snapshot; the engine on the audio thread
//! never mutates it. Every edit re-sends the whole snapshot through the
//! engine handle, and pluck notifications come back to drive the string
//! meters.

use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use rtrb::{Consumer, RingBuffer};

use tanpura_dsp::engine::config::{
    EngineConfig, DEFAULT_KEY, DEFAULT_OCTAVE, MAX_PLUCK_DELAY_MS, MAX_TEMPO,
    MIN_PLUCK_DELAY_MS, MIN_TEMPO,
};
use tanpura_dsp::engine::{EngineHandle, TanpuraEngine};
use tanpura_dsp::tuning::{resolve_frequencies, Note, ALL_NOTES, PLUCK_ORDER};
use tanpura_dsp::MAX_BLOCK_SIZE;

use super::ui;
use super::ui::spectrum::SpectrumAnalyzer;

/// Octaves offered by the UI; the resolver itself accepts any.
const OCTAVES: [i8; 3] = [2, 3, 4];

/// Capacity of the audio sample tap feeding the spectrum display.
const TAP_CAPACITY: usize = 16_384;

/// FFT size for the spectrum pane.
const SPECTRUM_FFT_SIZE: usize = 1_024;

/// How long a string meter takes to fade after a pluck.
const METER_DECAY: Duration = Duration::from_millis(100);

pub struct App {
    pub config: EngineConfig,
    pub key: Note,
    pub octave: i8,
    /// Which string row has focus, as an index into `PLUCK_ORDER`.
    pub selected: usize,
    /// Per-string pluck flash levels in [0, 1], decaying over `METER_DECAY`.
    pub meters: [f32; 4],
    pub sample_rate: f32,
    pub status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            key: DEFAULT_KEY,
            octave: DEFAULT_OCTAVE,
            selected: 0,
            meters: [0.0; 4],
            sample_rate: 0.0,
            status: None,
            should_quit: false,
        }
    }

    /// Acquire the audio device, start the stream, and take over the
    /// terminal until quit.
    pub fn run(mut self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let stream_config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = stream_config.sample_rate().0 as f32;
        let channels = stream_config.channels() as usize;
        self.sample_rate = sample_rate;

        let (mut engine, handle) = TanpuraEngine::new(sample_rate);
        let (mut tap_tx, tap_rx) = RingBuffer::<f32>::new(TAP_CAPACITY);

        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
        let stream = device
            .build_output_stream(
                &stream_config.into(),
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut render_buf[..frames];
                        engine.render_block(block);

                        // Mono to all channels, plus the spectrum tap.
                        let out_off = frames_written * channels;
                        for (i, &sample) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = sample;
                            }
                            let _ = tap_tx.push(sample);
                        }

                        frames_written += frames;
                    }
                },
                |err| eprintln!("audio error: {err}"),
                None,
            )
            .wrap_err("failed to open output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal, handle, tap_rx, &stream);
        ratatui::restore();
        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        mut handle: EngineHandle,
        mut tap_rx: Consumer<f32>,
        stream: &cpal::Stream,
    ) -> EyreResult<()> {
        let mut spectrum = SpectrumAnalyzer::new(SPECTRUM_FFT_SIZE, self.sample_rate);
        let mut tap_window = vec![0.0f32; SPECTRUM_FFT_SIZE];
        let mut last_frame = Instant::now();

        while !self.should_quit {
            // Pluck notifications flash the meters.
            while let Some(event) = handle.poll_pluck() {
                if let Some(index) = PLUCK_ORDER.iter().position(|&s| s == event.string) {
                    self.meters[index] = 1.0;
                }
            }

            let elapsed = last_frame.elapsed();
            last_frame = Instant::now();
            let fade = elapsed.as_secs_f32() / METER_DECAY.as_secs_f32();
            for meter in &mut self.meters {
                *meter = (*meter - fade).max(0.0);
            }

            // Keep the spectrum window rolling over the newest tap samples.
            while let Ok(sample) = tap_rx.pop() {
                tap_window.rotate_left(1);
                *tap_window.last_mut().unwrap() = sample;
            }
            spectrum.update(&tap_window);

            terminal.draw(|frame| ui::render(frame, self, spectrum.data()))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, &mut handle, stream);
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, handle: &mut EngineHandle, stream: &cpal::Stream) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char(' ') => {
                self.config.is_playing = !self.config.is_playing;
                if self.config.is_playing {
                    self.ensure_running(stream);
                }
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(PLUCK_ORDER.len() - 1),
            KeyCode::Enter | KeyCode::Char('p') => {
                self.ensure_running(stream);
                handle.manual_pluck(PLUCK_ORDER[self.selected]);
                return;
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.ensure_running(stream);
                handle.manual_pluck(PLUCK_ORDER[index]);
                return;
            }
            KeyCode::Left => self.adjust_string_volume(-0.05),
            KeyCode::Right => self.adjust_string_volume(0.05),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.config.tempo = (self.config.tempo + 5.0).clamp(MIN_TEMPO, MAX_TEMPO);
            }
            KeyCode::Char('-') => {
                self.config.tempo = (self.config.tempo - 5.0).clamp(MIN_TEMPO, MAX_TEMPO);
            }
            KeyCode::Char(']') => {
                self.config.pluck_delay_ms = (self.config.pluck_delay_ms + 10.0)
                    .clamp(MIN_PLUCK_DELAY_MS, MAX_PLUCK_DELAY_MS);
            }
            KeyCode::Char('[') => {
                self.config.pluck_delay_ms = (self.config.pluck_delay_ms - 10.0)
                    .clamp(MIN_PLUCK_DELAY_MS, MAX_PLUCK_DELAY_MS);
            }
            KeyCode::Char('.') => {
                self.config.master_volume = (self.config.master_volume + 0.05).clamp(0.0, 1.0);
            }
            KeyCode::Char(',') => {
                self.config.master_volume = (self.config.master_volume - 0.05).clamp(0.0, 1.0);
            }
            KeyCode::Char('E') => {
                self.config.echo_level = (self.config.echo_level + 0.05).clamp(0.0, 1.0);
            }
            KeyCode::Char('e') => {
                self.config.echo_level = (self.config.echo_level - 0.05).clamp(0.0, 1.0);
            }
            KeyCode::Char('k') => self.cycle_key(1),
            KeyCode::Char('K') => self.cycle_key(-1),
            KeyCode::Char('o') => self.cycle_octave(),
            _ => return,
        }

        handle.set_config(self.config.clone());
    }

    fn adjust_string_volume(&mut self, delta: f32) {
        let setting = &mut self.config.strings[self.selected];
        setting.volume = (setting.volume + delta).clamp(0.0, 1.0);
    }

    fn cycle_key(&mut self, direction: i32) {
        let index = ALL_NOTES
            .iter()
            .position(|&note| note == self.key)
            .unwrap_or(0) as i32;
        let next = (index + direction).rem_euclid(ALL_NOTES.len() as i32);
        self.key = ALL_NOTES[next as usize];
        self.config.frequencies = resolve_frequencies(self.key, self.octave);
    }

    fn cycle_octave(&mut self) {
        let index = OCTAVES
            .iter()
            .position(|&octave| octave == self.octave)
            .unwrap_or(0);
        self.octave = OCTAVES[(index + 1) % OCTAVES.len()];
        self.config.frequencies = resolve_frequencies(self.key, self.octave);
    }

    /// Host-side recovery for an output that went away or never started: try
    /// to (re)start the stream whenever a pluck is requested. Failure lands
    /// in the status line and the sequence keeps running silently.
    fn ensure_running(&mut self, stream: &cpal::Stream) {
        match stream.play() {
            Ok(()) => self.status = None,
            Err(err) => self.status = Some(format!("audio output unavailable: {err}")),
        }
    }
}
