use std::path::Path;

/// Which of the two fixed player positions a session occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Left surface, or top in the vertical layout.
    Left,
    /// Right surface, or bottom in the vertical layout.
    Right,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Left, Slot::Right];

    pub fn index(self) -> usize {
        match self {
            Slot::Left => 0,
            Slot::Right => 1,
        }
    }
}

/// One loaded media source.
///
/// Implementations own clamping: `seek` to a position outside the playable
/// range lands on the nearest valid position.
pub trait MediaSession {
    fn locator(&self) -> &Path;

    fn play(&mut self);

    fn pause(&mut self);

    /// Seek to an absolute position in seconds.
    fn seek(&mut self, position: f64);

    /// Current position in seconds.
    fn position(&self) -> f64;

    /// Playback rate, 0.0 while paused or stopped.
    fn rate(&self) -> f32;

    /// Duration in seconds, 0.0 when unknown.
    fn duration(&self) -> f64;

    fn is_playing(&self) -> bool {
        self.rate() != 0.0
    }
}

/// Creates sessions from file locators.
///
/// Opening never fails from the caller's point of view: a source that cannot
/// be played still yields a session, it just never produces output.
pub trait MediaBackend {
    type Session: MediaSession;

    fn open(&mut self, slot: Slot, locator: &Path) -> Self::Session;
}

/// Extensions offered by the file picker: movie and audio content.
pub const MOVIE_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "mkv", "avi", "webm", "flv", "wmv", "mpg", "mpeg", "ts", "3gp",
];

pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "m4a", "aac", "wav", "flac", "ogg", "opus", "aif", "aiff", "wma",
];

/// Check whether a path looks like a movie or audio file by extension.
pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            MOVIE_EXTENSIONS.contains(&ext.as_str()) || AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_movie_and_audio_extensions() {
        assert!(is_media_file(Path::new("/clips/a.mp4")));
        assert!(is_media_file(Path::new("b.MOV")));
        assert!(is_media_file(Path::new("track.flac")));
    }

    #[test]
    fn rejects_other_files() {
        assert!(!is_media_file(Path::new("notes.txt")));
        assert!(!is_media_file(Path::new("no_extension")));
        assert!(!is_media_file(Path::new("/some/dir/")));
    }

    #[test]
    fn slot_indices_are_distinct() {
        assert_eq!(Slot::Left.index(), 0);
        assert_eq!(Slot::Right.index(), 1);
    }
}
