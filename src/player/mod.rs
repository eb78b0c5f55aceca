mod audio;
mod backend;
mod circular_buffer;
mod clock;
mod decoder;
mod video;

use anyhow::{Context as _, Result};
use crossbeam_channel::{bounded, Sender};
use egui::{Color32, ColorImage, Context, TextureHandle, TextureOptions};
use log::{debug, warn};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use audio::AudioSource;
use circular_buffer::CircularBuffer;
use clock::AudioClock;
use decoder::{probe_media, start_decoder_thread, DecodedVideoFrame, DecoderCommand, DecoderLinks};
use video::VideoFrameQueue;

pub use backend::{FfmpegBackend, FfmpegSession};

/// Seeks on video sources stop this far before the end, so a frame is
/// always decoded after the seek lands.
const SEEK_END_GUARD: f64 = 0.5;
/// Placeholder texture size for sources without video
const BLANK_SIZE: [usize; 2] = [16, 9];
/// Frames buffered in the channel and again in the queue
const FRAME_QUEUE_DEPTH: usize = 30;
/// Audio ring length; the decoder stops filling it at three quarters, which
/// still covers the full frame look-ahead at 24 fps.
const AUDIO_BUFFER_SECONDS: usize = 4;

/// Clamp a seek target to the seekable range of a source.
///
/// Unknown durations (0.0) only clamp at the start.
fn clamp_seek(position: f64, duration: f64, has_video: bool) -> f64 {
    if duration <= 0.0 {
        return position.max(0.0);
    }
    let end = if has_video {
        (duration - SEEK_END_GUARD).max(0.0)
    } else {
        duration
    };
    position.clamp(0.0, end)
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PlayerState {
    Playing,
    Paused,
    /// Reached the end of the stream, or the decoder is gone
    Ended,
}

/// Play state plus the pending seek, which change together.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Playhead {
    state: PlayerState,
    seeking: bool,
    seek_target: f64,
}

impl Playhead {
    fn new() -> Self {
        Self {
            state: PlayerState::Paused,
            seeking: false,
            seek_target: 0.0,
        }
    }

    /// `await_frame` holds the reported position at `target` until `land`.
    fn begin_seek(&mut self, target: f64, await_frame: bool) {
        if self.state == PlayerState::Ended {
            self.state = PlayerState::Paused;
        }
        if await_frame {
            self.seeking = true;
            self.seek_target = target;
        }
    }

    fn land(&mut self) {
        self.seeking = false;
    }

    /// Nothing more will be decoded.
    fn halt(&mut self) {
        self.state = PlayerState::Ended;
        self.seeking = false;
    }

    fn position(&self, clock_time: f64) -> f64 {
        if self.seeking {
            self.seek_target
        } else {
            clock_time
        }
    }

    fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }
}

/// FFmpeg-backed playback of one media file
pub struct VideoPlayer {
    playhead: Playhead,
    decoder_exited: bool,

    video_size: Option<(u32, u32)>,
    duration: f64,

    decoder_handle: Option<JoinHandle<()>>,
    command_sender: Sender<DecoderCommand>,
    stop_flag: Arc<AtomicBool>,

    _output_stream: OutputStream, // Keep alive
    _stream_handle: OutputStreamHandle,
    sink: Sink,
    clock: AudioClock,

    frame_queue: VideoFrameQueue,
    texture: TextureHandle,
}

impl VideoPlayer {
    /// Open a media file, paused at the start
    pub fn open(path: &Path, ctx: &Context, texture_name: &str) -> Result<Self> {
        let info = probe_media(path)?;
        debug!(
            "Probed {}: video {:?}, audio {}, {:.1}s",
            path.display(),
            info.video_size,
            info.has_audio,
            info.duration
        );

        let clock = AudioClock::new(info.sample_rate, info.channels, info.has_audio);

        let (output_stream, stream_handle) =
            OutputStream::try_default().context("No audio output device")?;
        let sink = Sink::try_new(&stream_handle)?;

        let buffer_size =
            info.sample_rate as usize * info.channels as usize * AUDIO_BUFFER_SECONDS;
        let audio_buffer = CircularBuffer::new(buffer_size);

        sink.append(AudioSource::new(audio_buffer.clone(), clock.clone()));
        sink.pause();

        let (video_sender, video_receiver) = bounded(FRAME_QUEUE_DEPTH);
        let frame_queue = VideoFrameQueue::new(video_receiver, FRAME_QUEUE_DEPTH);

        let (command_sender, command_receiver) = bounded(16);

        let stop_flag = Arc::new(AtomicBool::new(false));
        let decoder_handle = start_decoder_thread(
            path,
            DecoderLinks {
                video_sender,
                audio_buffer,
                command_receiver,
                clock: clock.clone(),
                stop_flag: stop_flag.clone(),
            },
        )?;

        let blank_size = info
            .video_size
            .map(|(w, h)| [w as usize, h as usize])
            .unwrap_or(BLANK_SIZE);
        let texture = ctx.load_texture(
            texture_name,
            ColorImage::new(blank_size, Color32::BLACK),
            TextureOptions::LINEAR,
        );

        let mut player = Self {
            playhead: Playhead::new(),
            decoder_exited: false,
            video_size: info.video_size,
            duration: info.duration,
            decoder_handle: Some(decoder_handle),
            command_sender,
            stop_flag,
            _output_stream: output_stream,
            _stream_handle: stream_handle,
            sink,
            clock,
            frame_queue,
            texture,
        };

        // Shows the first frame while paused
        player.seek(0.0);

        Ok(player)
    }

    fn send(&mut self, command: DecoderCommand) {
        if self.command_sender.send(command).is_err() {
            self.decoder_exited = true;
        }
    }

    /// Start or resume playback
    pub fn play(&mut self) {
        if self.playhead.is_playing() {
            return;
        }
        self.playhead.state = PlayerState::Playing;
        // Audio restarts when the pending seek lands
        if !self.playhead.seeking {
            self.sink.play();
        }
        self.send(DecoderCommand::Resume);
    }

    pub fn pause(&mut self) {
        if self.playhead.is_playing() {
            self.playhead.state = PlayerState::Paused;
            self.sink.pause();
            // A pending seek pauses the decoder once its frame lands
            if !self.playhead.seeking {
                self.send(DecoderCommand::Pause);
            }
        }
    }

    /// Seek to position in seconds
    pub fn seek(&mut self, position: f64) {
        let has_video = self.video_size.is_some();
        let position = clamp_seek(position, self.duration, has_video);
        self.clock.set_position(position);
        self.playhead.begin_seek(position, has_video);

        if has_video {
            // Hold audio until the first frame at the new position arrives
            self.sink.pause();
            self.frame_queue.clear();
        }

        self.send(DecoderCommand::Seek(position));
        if self.playhead.seeking && !self.playhead.is_playing() {
            // Decode just far enough to show the landing frame
            self.send(DecoderCommand::Resume);
        }
    }

    pub fn is_seeking(&self) -> bool {
        self.playhead.seeking
    }

    /// Set volume (0.0 to 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume.clamp(0.0, 1.0));
    }

    pub fn volume(&self) -> f32 {
        self.sink.volume()
    }

    fn show_frame(&mut self, frame: &DecodedVideoFrame) {
        let image = ColorImage::from_rgba_unmultiplied(
            [frame.width as usize, frame.height as usize],
            &frame.rgba,
        );
        self.texture.set(image, TextureOptions::LINEAR);
    }

    /// Stop presenting once the decoder thread has gone away.
    fn check_decoder(&mut self) {
        if !self.decoder_exited {
            self.decoder_exited = self
                .decoder_handle
                .as_ref()
                .map_or(true, JoinHandle::is_finished);
        }
        if self.decoder_exited && self.playhead.state != PlayerState::Ended {
            warn!("Decoder stopped, ending playback");
            self.playhead.halt();
            self.sink.pause();
        }
    }

    /// Advance presentation; call once per UI frame
    pub fn update(&mut self, ctx: &Context) {
        self.check_decoder();

        if self.playhead.seeking {
            if let Some(frame) = self.frame_queue.first_frame_after_seek(self.playhead.seek_target) {
                self.show_frame(&frame);
                self.clock.set_position(frame.pts);
                self.playhead.land();
                if self.playhead.is_playing() {
                    self.sink.play();
                } else {
                    self.send(DecoderCommand::Pause);
                }
            }
            ctx.request_repaint();
            return;
        }

        if !self.playhead.is_playing() {
            return;
        }

        let clock_time = self.clock.position();

        if let Some(frame) = self.frame_queue.next_frame(clock_time) {
            self.show_frame(&frame);
        }

        if self.duration > 0.0
            && self.frame_queue.is_drained()
            && clock_time >= self.duration - 0.1
        {
            debug!("End of stream at {clock_time:.2}s");
            self.playhead.state = PlayerState::Ended;
            self.sink.pause();
        }

        ctx.request_repaint();
    }

    pub fn texture(&self) -> &TextureHandle {
        &self.texture
    }

    /// Frame size, `None` for audio-only sources
    pub fn video_size(&self) -> Option<(u32, u32)> {
        self.video_size
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Current playback position in seconds
    pub fn position(&self) -> f64 {
        self.playhead.position(self.clock.position())
    }

    pub fn is_playing(&self) -> bool {
        self.playhead.is_playing()
    }
}

impl Drop for VideoPlayer {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        self.send(DecoderCommand::Stop);

        if let Some(handle) = self.decoder_handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_seeks_stop_short_of_the_end() {
        assert_eq!(clamp_seek(-12.0, 120.0, true), 0.0);
        assert_eq!(clamp_seek(60.0, 120.0, true), 60.0);
        assert_eq!(clamp_seek(500.0, 120.0, true), 120.0 - SEEK_END_GUARD);
        assert_eq!(clamp_seek(5.0, 0.2, true), 0.0);
    }

    #[test]
    fn audio_seeks_reach_the_end() {
        assert_eq!(clamp_seek(500.0, 120.0, false), 120.0);
        assert_eq!(clamp_seek(-1.0, 120.0, false), 0.0);
    }

    #[test]
    fn unknown_duration_only_clamps_at_start() {
        assert_eq!(clamp_seek(900.0, 0.0, true), 900.0);
        assert_eq!(clamp_seek(-3.0, 0.0, false), 0.0);
    }

    #[test]
    fn audio_backlog_outlasts_frame_look_ahead() {
        // Slowest common frame rate
        let look_ahead = (2 * FRAME_QUEUE_DEPTH) as f64 / 24.0;
        let backlog = AUDIO_BUFFER_SECONDS as f64 * 0.75;
        assert!(backlog > look_ahead);
    }

    #[test]
    fn seek_holds_position_until_frame_lands() {
        let mut playhead = Playhead::new();
        playhead.state = PlayerState::Playing;
        playhead.begin_seek(30.0, true);
        assert_eq!(playhead.position(2.0), 30.0);

        playhead.land();
        assert_eq!(playhead.position(29.9), 29.9);
        assert!(playhead.is_playing());
    }

    #[test]
    fn halt_mid_seek_releases_position_and_stops() {
        let mut playhead = Playhead::new();
        playhead.state = PlayerState::Playing;
        playhead.begin_seek(30.0, true);

        playhead.halt();

        assert!(!playhead.seeking);
        assert!(!playhead.is_playing());
        assert_eq!(playhead.position(12.0), 12.0);
    }

    #[test]
    fn seeking_after_end_rearms_playback() {
        let mut playhead = Playhead::new();
        playhead.halt();
        playhead.begin_seek(10.0, false);
        assert_eq!(playhead.state, PlayerState::Paused);
        assert!(!playhead.seeking);
    }
}
