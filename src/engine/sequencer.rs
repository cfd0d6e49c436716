use crate::tuning::{StringId, PLUCK_ORDER};

/*
Pluck Sequencer
===============

The rotation plucks the four strings in the fixed order

    pa, sa1, sa2, sa        (the fifth opens every cycle)

with three short gaps inside the cycle and one long gap closing it:

    pa --d-- sa1 --d-- sa2 --d-- sa ------main------ pa ...

    d    = pluck_delay_ms                     (the short gap)
    main = 60000/tempo - 3 * d                (whatever the cycle has left)

Tempo is in cycles per minute, so 60000/tempo is the duration of one full
rotation in milliseconds. When the three short gaps alone exceed the cycle
(main would fall under 1 ms) the combination is impossible to honor; we fall
back to using the short gap as the closing gap too. The rhythm degrades, the
loop never stalls.

Scheduling model: one pending tick, counted in samples against the audio
clock. The engine calls `advance` while rendering each block and the
sequencer dispatches every tick that falls inside the block. Exactly one
countdown exists at any time, so cancelling is just overwriting it:

  - `start`      arms a tick that is due immediately; the first pluck fires
                 at the top of the next block, so play feels instant.
  - `stop`       cancels the pending tick and resets the rotation to the
                 cycle opening, so a restart begins on the fifth again.
  - `reschedule` cancels the pending tick and makes a new one due
                 immediately at the *current* rotation position. This is the
                 response to any live timing change: the stale delay is
                 abandoned, the next delay is computed from the new
                 parameters when that tick fires.

Voices start at block granularity; the countdown arithmetic itself is exact
to the sample.
*/

pub fn cycle_duration_ms(tempo: f32) -> f32 {
    60_000.0 / tempo
}

/// The long gap that closes a cycle, with the degraded-mode fallback.
pub fn main_delay_ms(tempo: f32, pluck_delay_ms: f32) -> f32 {
    let short_gaps = pluck_delay_ms * (PLUCK_ORDER.len() as f32 - 1.0);
    let main = cycle_duration_ms(tempo) - short_gaps;
    if main < 1.0 {
        pluck_delay_ms
    } else {
        main
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Stopped,
    Running,
}

pub struct PluckSequencer {
    state: State,
    index: usize,
    samples_until_next: u64,
}

impl PluckSequencer {
    pub fn new() -> Self {
        Self {
            state: State::Stopped,
            index: 0,
            samples_until_next: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn start(&mut self) {
        if self.state == State::Stopped {
            self.state = State::Running;
            self.samples_until_next = 0;
        }
    }

    pub fn stop(&mut self) {
        self.state = State::Stopped;
        self.index = 0;
        self.samples_until_next = 0;
    }

    /// Cancel the pending tick and make a fresh one due immediately at the
    /// current rotation position. No-op while stopped.
    pub fn reschedule(&mut self) {
        if self.state == State::Running {
            self.samples_until_next = 0;
        }
    }

    /// Advance the rotation by `frames` samples, dispatching every tick that
    /// falls inside the span. Tempo and delay are read fresh for each
    /// dispatched tick.
    pub fn advance(
        &mut self,
        frames: usize,
        tempo: f32,
        pluck_delay_ms: f32,
        sample_rate: f32,
        mut trigger: impl FnMut(StringId),
    ) {
        if self.state != State::Running {
            return;
        }

        let mut remaining = frames as u64;
        while remaining > 0 {
            if self.samples_until_next >= remaining {
                self.samples_until_next -= remaining;
                return;
            }
            remaining -= self.samples_until_next;

            trigger(PLUCK_ORDER[self.index]);
            self.index = (self.index + 1) % PLUCK_ORDER.len();

            let wrapped = self.index == 0;
            let delay_ms = if wrapped {
                main_delay_ms(tempo, pluck_delay_ms)
            } else {
                pluck_delay_ms
            };
            self.samples_until_next = ((delay_ms / 1_000.0 * sample_rate).round() as u64).max(1);
        }
    }
}

impl Default for PluckSequencer {
    fn default() -> Self {
        Self::new()
    }
}
