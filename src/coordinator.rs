use std::path::Path;

use log::{debug, info};

use crate::media::{MediaBackend, MediaSession, Slot};

/// A command from the shared transport row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransportCommand {
    TogglePlayPause,
    /// Relative seek in seconds, negative rewinds.
    Skip(f64),
}

/// Drives two independent sessions with one set of transport controls.
pub struct PlaybackCoordinator<B: MediaBackend> {
    backend: B,
    slots: [Option<B::Session>; 2],
}

impl<B: MediaBackend> PlaybackCoordinator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            slots: [None, None],
        }
    }

    /// Load a source into a slot, dropping whatever was there, and start it.
    pub fn load_source(&mut self, slot: Slot, locator: &Path) {
        info!("Loading {} into {:?} slot", locator.display(), slot);
        let mut session = self.backend.open(slot, locator);
        session.play();
        // Previous session drops here, which tears down its engine.
        self.slots[slot.index()] = Some(session);
    }

    /// Pause both sessions if both are playing, otherwise play both.
    pub fn toggle_play_pause(&mut self) {
        let playing = self.is_playing();
        let Some((left, right)) = self.pair_mut() else {
            return;
        };

        if playing {
            debug!("Pausing both sessions");
            left.pause();
            right.pause();
        } else {
            debug!("Playing both sessions");
            left.play();
            right.play();
        }
    }

    /// Move both sessions by `delta` seconds from their own current positions.
    pub fn skip(&mut self, delta: f64) {
        let Some((left, right)) = self.pair_mut() else {
            return;
        };

        debug!("Skipping both sessions by {delta}s");
        for session in [left, right] {
            let target = session.position() + delta;
            session.seek(target);
        }
    }

    pub fn apply(&mut self, command: TransportCommand) {
        match command {
            TransportCommand::TogglePlayPause => self.toggle_play_pause(),
            TransportCommand::Skip(delta) => self.skip(delta),
        }
    }

    pub fn both_loaded(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// True only when both slots are loaded and both report a nonzero rate.
    pub fn is_playing(&self) -> bool {
        match &self.slots {
            [Some(left), Some(right)] => left.rate() != 0.0 && right.rate() != 0.0,
            _ => false,
        }
    }

    pub fn is_loaded(&self, slot: Slot) -> bool {
        self.slots[slot.index()].is_some()
    }

    pub fn session(&self, slot: Slot) -> Option<&B::Session> {
        self.slots[slot.index()].as_ref()
    }

    pub fn session_mut(&mut self, slot: Slot) -> Option<&mut B::Session> {
        self.slots[slot.index()].as_mut()
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn pair_mut(&mut self) -> Option<(&mut B::Session, &mut B::Session)> {
        match &mut self.slots {
            [Some(left), Some(right)] => Some((left, right)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    struct FakeSession {
        locator: PathBuf,
        rate: f32,
        position: f64,
        duration: f64,
        dropped: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl MediaSession for FakeSession {
        fn locator(&self) -> &Path {
            &self.locator
        }

        fn play(&mut self) {
            self.rate = 1.0;
        }

        fn pause(&mut self) {
            self.rate = 0.0;
        }

        fn seek(&mut self, position: f64) {
            self.position = position.clamp(0.0, self.duration);
        }

        fn position(&self) -> f64 {
            self.position
        }

        fn rate(&self) -> f32 {
            self.rate
        }

        fn duration(&self) -> f64 {
            self.duration
        }
    }

    impl Drop for FakeSession {
        fn drop(&mut self) {
            self.dropped.borrow_mut().push(self.locator.clone());
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        dropped: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl MediaBackend for FakeBackend {
        type Session = FakeSession;

        fn open(&mut self, _slot: Slot, locator: &Path) -> FakeSession {
            FakeSession {
                locator: locator.to_path_buf(),
                rate: 0.0,
                position: 0.0,
                duration: 600.0,
                dropped: self.dropped.clone(),
            }
        }
    }

    fn loaded_pair() -> PlaybackCoordinator<FakeBackend> {
        let mut coordinator = PlaybackCoordinator::new(FakeBackend::default());
        coordinator.load_source(Slot::Left, Path::new("a.mp4"));
        coordinator.load_source(Slot::Right, Path::new("b.mp4"));
        coordinator
    }

    fn rates(coordinator: &PlaybackCoordinator<FakeBackend>) -> (f32, f32) {
        (
            coordinator.session(Slot::Left).unwrap().rate(),
            coordinator.session(Slot::Right).unwrap().rate(),
        )
    }

    #[test]
    fn load_autoplays() {
        let mut coordinator = PlaybackCoordinator::new(FakeBackend::default());
        coordinator.load_source(Slot::Left, Path::new("a.mp4"));

        let session = coordinator.session(Slot::Left).unwrap();
        assert_eq!(session.rate(), 1.0);
        assert_eq!(session.locator(), Path::new("a.mp4"));
        assert!(!coordinator.is_loaded(Slot::Right));
        assert!(!coordinator.both_loaded());
    }

    #[test]
    fn toggle_pauses_then_plays_both() {
        let mut coordinator = loaded_pair();
        assert!(coordinator.is_playing());

        coordinator.toggle_play_pause();
        assert_eq!(rates(&coordinator), (0.0, 0.0));
        assert!(!coordinator.is_playing());

        coordinator.toggle_play_pause();
        assert_eq!(rates(&coordinator), (1.0, 1.0));
    }

    #[test]
    fn toggle_with_one_paused_plays_both() {
        let mut coordinator = loaded_pair();
        coordinator.session_mut(Slot::Right).unwrap().pause();
        assert!(!coordinator.is_playing());

        coordinator.toggle_play_pause();
        assert_eq!(rates(&coordinator), (1.0, 1.0));
    }

    #[test]
    fn toggle_ignored_with_single_session() {
        let mut coordinator = PlaybackCoordinator::new(FakeBackend::default());
        coordinator.load_source(Slot::Left, Path::new("a.mp4"));

        coordinator.toggle_play_pause();
        assert_eq!(coordinator.session(Slot::Left).unwrap().rate(), 1.0);
    }

    #[test]
    fn skip_clamps_at_start() {
        let mut coordinator = loaded_pair();
        coordinator.session_mut(Slot::Left).unwrap().seek(10.0);
        coordinator.session_mut(Slot::Right).unwrap().seek(12.0);

        coordinator.apply(TransportCommand::Skip(-300.0));

        assert_eq!(coordinator.session(Slot::Left).unwrap().position(), 0.0);
        assert_eq!(coordinator.session(Slot::Right).unwrap().position(), 0.0);
    }

    #[test]
    fn skip_moves_each_session_from_its_own_position() {
        let mut coordinator = loaded_pair();
        coordinator.session_mut(Slot::Left).unwrap().seek(100.0);
        coordinator.session_mut(Slot::Right).unwrap().seek(40.0);

        coordinator.skip(15.0);

        assert_eq!(coordinator.session(Slot::Left).unwrap().position(), 115.0);
        assert_eq!(coordinator.session(Slot::Right).unwrap().position(), 55.0);
    }

    #[test]
    fn skip_ignored_with_single_session() {
        let mut coordinator = PlaybackCoordinator::new(FakeBackend::default());
        coordinator.load_source(Slot::Right, Path::new("b.mp4"));
        coordinator.session_mut(Slot::Right).unwrap().seek(30.0);

        coordinator.skip(15.0);
        assert_eq!(coordinator.session(Slot::Right).unwrap().position(), 30.0);
    }

    #[test]
    fn reload_drops_only_that_slot() {
        let mut coordinator = loaded_pair();
        coordinator.session_mut(Slot::Right).unwrap().seek(42.0);

        coordinator.load_source(Slot::Left, Path::new("c.mp4"));

        let dropped = coordinator.backend().dropped.borrow().clone();
        assert_eq!(dropped, vec![PathBuf::from("a.mp4")]);
        assert_eq!(
            coordinator.session(Slot::Left).unwrap().locator(),
            Path::new("c.mp4")
        );
        let right = coordinator.session(Slot::Right).unwrap();
        assert_eq!(right.locator(), Path::new("b.mp4"));
        assert_eq!(right.position(), 42.0);
    }
}
