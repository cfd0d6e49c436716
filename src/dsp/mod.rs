//! Low-level DSP primitives used by the voice and graph layers.
//!
//! These components are allocation-free after construction and realtime-safe,
//! so they can live inside voices and the persistent graph. They stay focused
//! on the signal-processing math; orchestration happens in `engine`.

/// Time-domain delay line for the echo loop.
pub mod delay;
/// Pluck envelope: linear attack, exponential decay, self-terminating.
pub mod envelope;
/// Sine oscillator for harmonic partials.
pub mod oscillator;
/// Zipper-free smoothed parameter values.
pub mod smooth;

pub use delay::DelayLine;
pub use envelope::PluckEnvelope;
pub use oscillator::SineOsc;
pub use smooth::SmoothedValue;
