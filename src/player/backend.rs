use egui::Context;
use log::{info, warn};
use std::path::{Path, PathBuf};

use super::VideoPlayer;
use crate::media::{MediaBackend, MediaSession, Slot};

/// Opens sessions as FFmpeg players whose frames land in egui textures.
pub struct FfmpegBackend {
    ctx: Context,
}

impl FfmpegBackend {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl MediaBackend for FfmpegBackend {
    type Session = FfmpegSession;

    fn open(&mut self, slot: Slot, locator: &Path) -> FfmpegSession {
        let texture_name = format!("video_frame_{slot:?}").to_lowercase();
        let engine = match VideoPlayer::open(locator, &self.ctx, &texture_name) {
            Ok(player) => {
                info!("Opened {}", locator.display());
                Engine::Active(player)
            }
            Err(e) => {
                warn!("Cannot play {}: {:#}", locator.display(), e);
                Engine::Inert { playing: false }
            }
        };

        FfmpegSession {
            locator: locator.to_path_buf(),
            engine,
        }
    }
}

enum Engine {
    Active(VideoPlayer),
    /// Source could not be opened; only remembers play/pause requests.
    Inert { playing: bool },
}

/// A session backed by an FFmpeg player, or an inert stand-in when the
/// source could not be opened.
pub struct FfmpegSession {
    locator: PathBuf,
    engine: Engine,
}

impl FfmpegSession {
    /// The underlying player, `None` for unplayable sources.
    pub fn player(&self) -> Option<&VideoPlayer> {
        match &self.engine {
            Engine::Active(player) => Some(player),
            Engine::Inert { .. } => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut VideoPlayer> {
        match &mut self.engine {
            Engine::Active(player) => Some(player),
            Engine::Inert { .. } => None,
        }
    }

    /// Advance presentation; call once per UI frame.
    pub fn update(&mut self, ctx: &Context) {
        if let Engine::Active(player) = &mut self.engine {
            player.update(ctx);
        }
    }

    pub fn is_seeking(&self) -> bool {
        self.player().is_some_and(VideoPlayer::is_seeking)
    }

    pub fn volume(&self) -> f32 {
        self.player().map(VideoPlayer::volume).unwrap_or(1.0)
    }

    pub fn set_volume(&mut self, volume: f32) {
        if let Some(player) = self.player_mut() {
            player.set_volume(volume);
        }
    }
}

impl MediaSession for FfmpegSession {
    fn locator(&self) -> &Path {
        &self.locator
    }

    fn play(&mut self) {
        match &mut self.engine {
            Engine::Active(player) => player.play(),
            Engine::Inert { playing } => *playing = true,
        }
    }

    fn pause(&mut self) {
        match &mut self.engine {
            Engine::Active(player) => player.pause(),
            Engine::Inert { playing } => *playing = false,
        }
    }

    fn seek(&mut self, position: f64) {
        if let Engine::Active(player) = &mut self.engine {
            player.seek(position);
        }
    }

    fn position(&self) -> f64 {
        self.player().map(VideoPlayer::position).unwrap_or(0.0)
    }

    fn rate(&self) -> f32 {
        let playing = match &self.engine {
            Engine::Active(player) => player.is_playing(),
            Engine::Inert { playing } => *playing,
        };
        if playing {
            1.0
        } else {
            0.0
        }
    }

    fn duration(&self) -> f64 {
        self.player().map(VideoPlayer::duration).unwrap_or(0.0)
    }
}
