//! Ambient audio session.
//!
//! Explicitly owned playback state for the ambient player - no globally
//! addressable element. Whichever component owns playback lifetime holds
//! this object; everyone else observes through subscriptions. Decoding and
//! streaming are out of scope; this tracks what should be playing, not the
//! samples.
//!
//! Push-based: subscribers register callbacks that are invoked on every
//! state change.

/// One entry in the ambient playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub title: String,
    /// Source locator handed to the actual playback backend
    pub source: String,
}

/// Playback state change, delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    TrackChanged(Track),
    Playing,
    Paused,
    VolumeChanged(f32),
}

/// Owned playback-state object for the ambient player.
pub struct AudioSession {
    tracks: Vec<Track>,
    current: usize,
    playing: bool,
    volume: f32,
    subscribers: Vec<Box<dyn FnMut(AudioEvent) + Send>>,
}

impl AudioSession {
    /// Start paused on the first track at half volume.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            current: 0,
            playing: false,
            volume: 0.5,
            subscribers: Vec::new(),
        }
    }

    /// Register a state-change callback.
    pub fn subscribe(&mut self, callback: impl FnMut(AudioEvent) + Send + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    fn emit(&mut self, event: AudioEvent) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(event.clone());
        }
    }

    pub fn play(&mut self) {
        if self.playing || self.tracks.is_empty() {
            return;
        }
        self.playing = true;
        self.emit(AudioEvent::Playing);
    }

    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.emit(AudioEvent::Paused);
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Set volume, clamped to `[0.0, 1.0]`.
    pub fn set_volume(&mut self, volume: f32) {
        let clamped = volume.clamp(0.0, 1.0);
        if (clamped - self.volume).abs() < f32::EPSILON {
            return;
        }
        self.volume = clamped;
        self.emit(AudioEvent::VolumeChanged(clamped));
    }

    pub fn next_track(&mut self) {
        self.step(1);
    }

    pub fn prev_track(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, direction: isize) {
        if self.tracks.is_empty() {
            return;
        }
        let len = self.tracks.len() as isize;
        self.current = ((self.current as isize + direction).rem_euclid(len)) as usize;
        let track = self.tracks[self.current].clone();
        self.emit(AudioEvent::TrackChanged(track));
    }

    /// Jump to a track by id; `false` if it is not in the playlist.
    pub fn select(&mut self, id: &str) -> bool {
        match self.tracks.iter().position(|t| t.id == id) {
            Some(index) => {
                if index != self.current {
                    self.current = index;
                    let track = self.tracks[index].clone();
                    self.emit(AudioEvent::TrackChanged(track));
                }
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn playlist() -> Vec<Track> {
        ["rain", "waves", "cafe"]
            .into_iter()
            .map(|id| Track {
                id: id.to_string(),
                title: id.to_uppercase(),
                source: format!("ambience/{id}.ogg"),
            })
            .collect()
    }

    fn recording_session() -> (AudioSession, Arc<Mutex<Vec<AudioEvent>>>) {
        let mut session = AudioSession::new(playlist());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        session.subscribe(move |event| {
            sink.lock().expect("lock").push(event);
        });
        (session, events)
    }

    #[test]
    fn test_play_pause_emits_once_each() {
        let (mut session, events) = recording_session();
        session.play();
        session.play(); // already playing: no event
        session.pause();
        assert_eq!(
            *events.lock().expect("lock"),
            vec![AudioEvent::Playing, AudioEvent::Paused]
        );
    }

    #[test]
    fn test_volume_is_clamped() {
        let (mut session, events) = recording_session();
        session.set_volume(1.7);
        assert_eq!(session.volume(), 1.0);
        session.set_volume(-0.3);
        assert_eq!(session.volume(), 0.0);
        assert_eq!(
            *events.lock().expect("lock"),
            vec![
                AudioEvent::VolumeChanged(1.0),
                AudioEvent::VolumeChanged(0.0)
            ]
        );
    }

    #[test]
    fn test_track_navigation_wraps() {
        let (mut session, _) = recording_session();
        assert_eq!(session.current_track().map(|t| t.id.as_str()), Some("rain"));
        session.prev_track();
        assert_eq!(session.current_track().map(|t| t.id.as_str()), Some("cafe"));
        session.next_track();
        assert_eq!(session.current_track().map(|t| t.id.as_str()), Some("rain"));
    }

    #[test]
    fn test_select_by_id() {
        let (mut session, events) = recording_session();
        assert!(session.select("waves"));
        assert!(!session.select("missing"));
        // selecting the current track again emits nothing
        assert!(session.select("waves"));
        let events = events.lock().expect("lock");
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], AudioEvent::TrackChanged(ref t) if t.id == "waves"));
    }

    #[test]
    fn test_empty_playlist_is_inert() {
        let mut session = AudioSession::new(Vec::new());
        session.play();
        assert!(!session.is_playing());
        session.next_track();
        assert_eq!(session.current_track(), None);
    }
}
