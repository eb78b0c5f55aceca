use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Master playback clock, advanced by the audio output as it consumes samples.
///
/// For sources without an audio track the clock is free-running: the output
/// stream plays silence and that silence still advances the position.
#[derive(Clone)]
pub struct AudioClock {
    /// Current playback position in microseconds
    position_us: Arc<AtomicU64>,
    paused: Arc<AtomicBool>,
    sample_rate: u32,
    channels: u16,
    free_running: bool,
}

impl AudioClock {
    pub fn new(sample_rate: u32, channels: u16, has_audio: bool) -> Self {
        Self {
            position_us: Arc::new(AtomicU64::new(0)),
            paused: Arc::new(AtomicBool::new(true)),
            sample_rate,
            channels,
            free_running: !has_audio,
        }
    }

    /// Current playback position in seconds
    pub fn position(&self) -> f64 {
        self.position_us.load(Ordering::Relaxed) as f64 / 1_000_000.0
    }

    /// Jump to a position in seconds.
    pub fn set_position(&self, seconds: f64) {
        let us = (seconds.max(0.0) * 1_000_000.0) as u64;
        self.position_us.store(us, Ordering::Relaxed);
    }

    /// Advance by a number of interleaved samples.
    pub fn advance_samples(&self, samples: u64) {
        if self.paused.load(Ordering::Relaxed) {
            return;
        }
        let samples_per_second = self.sample_rate as f64 * self.channels as f64;
        let delta_us = (samples as f64 * 1_000_000.0 / samples_per_second) as u64;
        self.position_us.fetch_add(delta_us, Ordering::Relaxed);
    }

    pub fn is_free_running(&self) -> bool {
        self.free_running
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}
