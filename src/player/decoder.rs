use anyhow::{anyhow, bail, Context, Result};
use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use ffmpeg_next::format::Pixel;
use ffmpeg_next::frame::{Audio as AudioFrame, Video as VideoFrame};
use ffmpeg_next::media::Type;
use ffmpeg_next::software::resampling::Context as ResamplerContext;
use ffmpeg_next::software::scaling::{Context as ScalerContext, Flags};
use ffmpeg_next::util::channel_layout::ChannelLayout;
use ffmpeg_next::util::format::sample::Sample;
use ffmpeg_next::codec::decoder;
use ffmpeg_next::{codec, format, Packet, Rational};
use log::{debug, error};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::circular_buffer::CircularBuffer;
use super::clock::AudioClock;

/// Output rate used when the source has no audio stream.
const SILENT_SAMPLE_RATE: u32 = 44100;
const OUTPUT_CHANNELS: u16 = 2;

/// A decoded video frame ready for display
pub struct DecodedVideoFrame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub pts: f64, // seconds
}

/// Commands sent to the decoder thread
pub enum DecoderCommand {
    Seek(f64),
    Pause,
    Resume,
    Stop,
}

/// Media info extracted from the file
pub struct MediaInfo {
    /// Frame size, `None` for audio-only sources
    pub video_size: Option<(u32, u32)>,
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub has_audio: bool,
}

/// Open a media file and extract info without starting decoding
pub fn probe_media(path: &Path) -> Result<MediaInfo> {
    let input = format::input(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let video_size = match input.streams().best(Type::Video) {
        Some(stream) => {
            let decoder = codec::Context::from_parameters(stream.parameters())?
                .decoder()
                .video()?;
            Some((decoder.width(), decoder.height()))
        }
        None => None,
    };

    let audio = match input.streams().best(Type::Audio) {
        Some(stream) => {
            let decoder = codec::Context::from_parameters(stream.parameters())?
                .decoder()
                .audio()?;
            Some(decoder.rate())
        }
        None => None,
    };

    if video_size.is_none() && audio.is_none() {
        bail!("No audio or video stream in {}", path.display());
    }

    let duration = if input.duration() > 0 {
        input.duration() as f64 / ffmpeg_next::ffi::AV_TIME_BASE as f64
    } else {
        0.0
    };

    Ok(MediaInfo {
        video_size,
        duration,
        // Audio is always resampled to stereo at the source rate
        sample_rate: audio.unwrap_or(SILENT_SAMPLE_RATE),
        channels: OUTPUT_CHANNELS,
        has_audio: audio.is_some(),
    })
}

/// Channels shared between a session and its decoder thread
pub struct DecoderLinks {
    pub video_sender: Sender<DecodedVideoFrame>,
    pub audio_buffer: Arc<CircularBuffer<f32>>,
    pub command_receiver: Receiver<DecoderCommand>,
    pub clock: AudioClock,
    pub stop_flag: Arc<AtomicBool>,
}

/// Start the decoder thread
pub fn start_decoder_thread(path: &Path, links: DecoderLinks) -> Result<JoinHandle<()>> {
    let path = path.to_path_buf();
    let name = format!(
        "decoder-{}",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );

    let handle = thread::Builder::new()
        .name(name)
        .spawn(move || {
            if let Err(e) = decode_loop(&path, links) {
                error!("Decoder error for {}: {:#}", path.display(), e);
            }
        })
        .context("Failed to spawn decoder thread")?;

    Ok(handle)
}

/// Copy an RGBA frame into a tightly packed buffer, dropping row padding.
fn packed_rgba(frame: &VideoFrame) -> Vec<u8> {
    let row = frame.width() as usize * 4;
    let height = frame.height() as usize;
    let stride = frame.stride(0);
    let data = frame.data(0);

    if stride == row {
        return data[..row * height].to_vec();
    }

    let mut packed = Vec::with_capacity(row * height);
    for line in data.chunks(stride).take(height) {
        packed.extend_from_slice(&line[..row]);
    }
    packed
}

struct VideoPipe {
    index: usize,
    time_base: Rational,
    decoder: decoder::Video,
    scaler: ScalerContext,
}

struct AudioPipe {
    index: usize,
    decoder: decoder::Audio,
    resampler: ResamplerContext,
}

/// Outcome of draining the command channel
enum Control {
    Continue,
    Exit,
}

fn drain_commands(
    command_receiver: &Receiver<DecoderCommand>,
    clock: &AudioClock,
    paused: &mut bool,
    pending_seek: &mut Option<f64>,
) -> Control {
    loop {
        match command_receiver.try_recv() {
            Ok(DecoderCommand::Stop) => return Control::Exit,
            Ok(DecoderCommand::Pause) => {
                *paused = true;
                clock.pause();
            }
            Ok(DecoderCommand::Resume) => {
                *paused = false;
                clock.resume();
            }
            Ok(DecoderCommand::Seek(target)) => *pending_seek = Some(target),
            Err(TryRecvError::Empty) => return Control::Continue,
            Err(TryRecvError::Disconnected) => return Control::Exit,
        }
    }
}

/// Hold the decoder while the audio ring is backlogged, so unplayed samples
/// are never overwritten. Returns early on a seek or pause so the caller can
/// act on it.
fn throttle_audio(
    audio_buffer: &CircularBuffer<f32>,
    command_receiver: &Receiver<DecoderCommand>,
    clock: &AudioClock,
    paused: &mut bool,
    pending_seek: &mut Option<f64>,
) -> Control {
    while audio_buffer.is_backlogged() {
        if let Control::Exit = drain_commands(command_receiver, clock, paused, pending_seek) {
            return Control::Exit;
        }
        if *paused || pending_seek.is_some() {
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }
    Control::Continue
}

/// Codec rejections drop the packet; the stream carries on.
fn accepted(result: Result<(), ffmpeg_next::Error>, kind: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!("Skipping {kind} packet: {e}");
            false
        }
    }
}

fn decode_loop(path: &Path, links: DecoderLinks) -> Result<()> {
    let DecoderLinks {
        video_sender,
        audio_buffer,
        command_receiver,
        clock,
        stop_flag,
    } = links;

    let mut input = format::input(path)?;

    let mut video = match input.streams().best(Type::Video) {
        Some(stream) => {
            let decoder = codec::Context::from_parameters(stream.parameters())?
                .decoder()
                .video()?;
            let scaler = ScalerContext::get(
                decoder.format(),
                decoder.width(),
                decoder.height(),
                Pixel::RGBA,
                decoder.width(),
                decoder.height(),
                Flags::BILINEAR,
            )?;
            Some(VideoPipe {
                index: stream.index(),
                time_base: stream.time_base(),
                decoder,
                scaler,
            })
        }
        None => None,
    };

    let mut audio = match input.streams().best(Type::Audio) {
        Some(stream) => {
            let decoder = codec::Context::from_parameters(stream.parameters())?
                .decoder()
                .audio()?;
            let resampler = ResamplerContext::get(
                decoder.format(),
                decoder.channel_layout(),
                decoder.rate(),
                Sample::F32(ffmpeg_next::util::format::sample::Type::Packed),
                ChannelLayout::STEREO,
                clock.sample_rate(),
            )?;
            Some(AudioPipe {
                index: stream.index(),
                decoder,
                resampler,
            })
        }
        None => None,
    };

    if video.is_none() && audio.is_none() {
        return Err(anyhow!("No decodable stream"));
    }

    let mut video_frame = VideoFrame::empty();
    let mut audio_frame = AudioFrame::empty();
    let mut rgba_frame = VideoFrame::empty();

    let mut paused = true;
    let mut pending_seek: Option<f64> = None;
    let mut at_eof = false;

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            break;
        }

        if let Control::Exit = drain_commands(&command_receiver, &clock, &mut paused, &mut pending_seek)
        {
            return Ok(());
        }

        if let Some(target) = pending_seek.take() {
            let target_ts = (target * ffmpeg_next::ffi::AV_TIME_BASE as f64) as i64;
            match input.seek(target_ts, ..target_ts) {
                Ok(()) => {
                    if let Some(ref mut pipe) = video {
                        pipe.decoder.flush();
                    }
                    if let Some(ref mut pipe) = audio {
                        pipe.decoder.flush();
                    }
                    // Samples decoded before the seek are stale
                    audio_buffer.clear();
                    clock.set_position(target);
                    at_eof = false;
                    debug!("Decoder seeked to {target:.3}s");
                }
                Err(e) => debug!("Seek to {target:.3}s failed: {e}"),
            }
        }

        // Wait for resume or a seek
        if paused || at_eof {
            thread::sleep(Duration::from_millis(10));
            continue;
        }

        if let Control::Exit = throttle_audio(
            &audio_buffer,
            &command_receiver,
            &clock,
            &mut paused,
            &mut pending_seek,
        ) {
            return Ok(());
        }
        if paused || pending_seek.is_some() {
            continue;
        }

        let mut packet = Packet::empty();
        match packet.read(&mut input) {
            Ok(()) => {
                let stream_index = packet.stream();

                if let Some(ref mut pipe) = video {
                    if stream_index == pipe.index && accepted(pipe.decoder.send_packet(&packet), "video") {
                        'frame_loop: while pipe.decoder.receive_frame(&mut video_frame).is_ok() {
                            if let Err(e) = pipe.scaler.run(&video_frame, &mut rgba_frame) {
                                debug!("Skipping unscalable frame: {e}");
                                continue;
                            }

                            let pts = video_frame.pts().unwrap_or(0);
                            let mut frame = DecodedVideoFrame {
                                rgba: packed_rgba(&rgba_frame),
                                width: rgba_frame.width(),
                                height: rgba_frame.height(),
                                pts: pts as f64 * f64::from(pipe.time_base),
                            };

                            // Seek and stop take priority over a full frame channel
                            loop {
                                if let Control::Exit = drain_commands(
                                    &command_receiver,
                                    &clock,
                                    &mut paused,
                                    &mut pending_seek,
                                ) {
                                    return Ok(());
                                }
                                if pending_seek.is_some() {
                                    break 'frame_loop;
                                }

                                match video_sender.try_send(frame) {
                                    Ok(()) => break,
                                    Err(TrySendError::Full(f)) => {
                                        frame = f;
                                        thread::sleep(Duration::from_millis(1));
                                    }
                                    Err(TrySendError::Disconnected(_)) => return Ok(()),
                                }
                            }
                        }
                    }
                }

                if let Some(ref mut pipe) = audio {
                    if stream_index == pipe.index && accepted(pipe.decoder.send_packet(&packet), "audio") {
                        while pipe.decoder.receive_frame(&mut audio_frame).is_ok() {
                            let mut resampled = AudioFrame::empty();
                            if pipe.resampler.run(&audio_frame, &mut resampled).is_ok() {
                                let data = resampled.data(0);
                                // Packed f32 stereo: the plane is a contiguous f32 array
                                let samples: &[f32] = unsafe {
                                    std::slice::from_raw_parts(
                                        data.as_ptr() as *const f32,
                                        data.len() / 4,
                                    )
                                };

                                audio_buffer.push_slice(samples);
                            }
                        }
                    }
                }
            }
            Err(ffmpeg_next::Error::Eof) => {
                at_eof = true;
            }
            Err(_) => {
                // Skip corrupted packets
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn backlogged_buffer() -> Arc<CircularBuffer<f32>> {
        let buffer = CircularBuffer::new(8);
        buffer.push_slice(&[0.0; 8]);
        buffer
    }

    #[test]
    fn throttle_waits_until_audio_is_played() {
        let buffer = backlogged_buffer();
        let (_tx, rx) = bounded(4);
        let clock = AudioClock::new(48000, 2, true);
        let (mut paused, mut pending_seek) = (false, None);

        let consumer = {
            let buffer = buffer.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                let mut out = [0.0; 4];
                buffer.pop_into(&mut out);
            })
        };

        let control = throttle_audio(&buffer, &rx, &clock, &mut paused, &mut pending_seek);
        consumer.join().unwrap();

        assert!(matches!(control, Control::Continue));
        assert!(!buffer.is_backlogged());
    }

    #[test]
    fn throttle_yields_to_seek() {
        let buffer = backlogged_buffer();
        let (tx, rx) = bounded(4);
        let clock = AudioClock::new(48000, 2, true);
        let (mut paused, mut pending_seek) = (false, None);
        tx.send(DecoderCommand::Seek(30.0)).unwrap();

        let control = throttle_audio(&buffer, &rx, &clock, &mut paused, &mut pending_seek);

        assert!(matches!(control, Control::Continue));
        assert_eq!(pending_seek, Some(30.0));
        assert!(buffer.is_backlogged());
    }

    #[test]
    fn throttle_exits_on_stop() {
        let buffer = backlogged_buffer();
        let (tx, rx) = bounded(4);
        let clock = AudioClock::new(48000, 2, true);
        let (mut paused, mut pending_seek) = (false, None);
        tx.send(DecoderCommand::Stop).unwrap();

        let control = throttle_audio(&buffer, &rx, &clock, &mut paused, &mut pending_seek);
        assert!(matches!(control, Control::Exit));
    }

    #[test]
    fn rejected_packets_are_skipped() {
        assert!(accepted(Ok(()), "video"));
        assert!(!accepted(Err(ffmpeg_next::Error::InvalidData), "audio"));
    }
}
