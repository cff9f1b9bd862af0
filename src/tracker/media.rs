use crate::models::MediaState;

/// Latest playback state reported by the in-page observer.
#[derive(Debug, Default)]
pub struct MediaSignal {
    playing: bool,
}

impl MediaSignal {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Record `state`; returns true only when the value actually changed.
    pub fn apply(&mut self, state: MediaState) -> bool {
        let playing = state.is_playing();
        if playing == self.playing {
            return false;
        }
        self.playing = playing;
        true
    }
}
