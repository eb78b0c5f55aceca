use rodio::Source;
use std::sync::Arc;
use std::time::Duration;

use super::circular_buffer::CircularBuffer;
use super::clock::AudioClock;

/// Samples pulled from the shared buffer per lock, and per clock update.
const CHUNK: usize = 256;

/// Endless rodio source fed by the decoder thread.
///
/// Underruns play silence. Only real samples move the clock, unless the
/// clock is free-running, in which case silence counts too.
pub struct AudioSource {
    buffer: Arc<CircularBuffer<f32>>,
    clock: AudioClock,
    chunk: [f32; CHUNK],
    filled: usize,
    cursor: usize,
}

impl AudioSource {
    pub fn new(buffer: Arc<CircularBuffer<f32>>, clock: AudioClock) -> Self {
        Self {
            buffer,
            clock,
            chunk: [0.0; CHUNK],
            filled: 0,
            cursor: 0,
        }
    }

    fn refill(&mut self) {
        let count = self.buffer.pop_into(&mut self.chunk);
        if count == 0 {
            self.chunk.fill(0.0);
            self.filled = CHUNK;
        } else {
            self.filled = count;
        }
        self.cursor = 0;

        if count > 0 || self.clock.is_free_running() {
            self.clock.advance_samples(self.filled as u64);
        }
    }
}

impl Iterator for AudioSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.filled {
            self.refill();
        }

        let sample = self.chunk[self.cursor];
        self.cursor += 1;
        Some(sample)
    }
}

impl Source for AudioSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.clock.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.clock.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_buffered_samples_then_silence() {
        let buffer = CircularBuffer::new(1024);
        let clock = AudioClock::new(48000, 2, true);
        buffer.push_slice(&[0.5, -0.5]);

        let mut source = AudioSource::new(buffer, clock);
        assert_eq!(source.next(), Some(0.5));
        assert_eq!(source.next(), Some(-0.5));
        assert_eq!(source.next(), Some(0.0));
    }

    #[test]
    fn silence_advances_only_free_running_clock() {
        let with_audio = AudioClock::new(1000, 2, true);
        with_audio.resume();
        let mut source = AudioSource::new(CircularBuffer::new(16), with_audio.clone());
        for _ in 0..CHUNK {
            source.next();
        }
        assert_eq!(with_audio.position(), 0.0);

        let silent = AudioClock::new(1000, 2, false);
        silent.resume();
        let mut source = AudioSource::new(CircularBuffer::new(16), silent.clone());
        for _ in 0..CHUNK {
            source.next();
        }
        assert!((silent.position() - CHUNK as f64 / 2000.0).abs() < 1e-3);
    }
}
