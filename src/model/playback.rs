//! Playback-related types and state management

use std::time::{Duration, Instant};

use crate::media::DEFAULT_VOCAL_VOLUME;

use super::types::PlaybackMode;

/// Metadata about the song currently on the deck
#[derive(Clone, Debug)]
pub struct NowPlaying {
    pub id: String,
    pub title: String,
    pub artist: String,
}

/// Internal timing state for smooth progress bar updates
///
/// Media events arrive a few times per second; rendering happens every
/// 50 ms. Between events the position is extrapolated from the last
/// report while playing.
#[derive(Clone)]
pub struct PlaybackTiming {
    pub position: Duration,
    pub last_update: Instant,
    pub is_playing: bool,
    pub duration: Option<Duration>,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            position: Duration::ZERO,
            last_update: Instant::now(),
            is_playing: false,
            duration: None,
        }
    }
}

impl PlaybackTiming {
    pub fn current_position(&self) -> Duration {
        let position = if self.is_playing {
            self.position + self.last_update.elapsed()
        } else {
            self.position
        };
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    pub fn update_position(&mut self, position: Duration, is_playing: bool) {
        self.position = position;
        self.is_playing = is_playing;
        self.last_update = Instant::now();
    }

    pub fn set_playing(&mut self, is_playing: bool) {
        self.position = self.current_position();
        self.is_playing = is_playing;
        self.last_update = Instant::now();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Settings related to playback (mode, vocal gain)
#[derive(Clone, Copy, Debug)]
pub struct PlaybackSettings {
    pub mode: PlaybackMode,
    pub vocal_volume: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            mode: PlaybackMode::Instrumental,
            vocal_volume: DEFAULT_VOCAL_VOLUME,
        }
    }
}

/// Drift-correction re-entrancy flag.
///
/// A correction pass and a seek alignment must never overlap; whoever
/// holds the flag wins and the other side skips its round.
#[derive(Default)]
pub struct SyncState {
    correcting: bool,
}

impl SyncState {
    /// Claim the flag. Returns false when a correction is already in
    /// flight.
    pub fn try_begin(&mut self) -> bool {
        if self.correcting {
            false
        } else {
            self.correcting = true;
            true
        }
    }

    pub fn end(&mut self) {
        self.correcting = false;
    }
}

/// Complete playback information for rendering the UI
#[derive(Clone)]
pub struct PlaybackInfo {
    pub now_playing: Option<NowPlaying>,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub is_playing: bool,
    pub settings: PlaybackSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_timing_does_not_advance() {
        let mut timing = PlaybackTiming::default();
        timing.update_position(Duration::from_secs(10), false);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(timing.current_position(), Duration::from_secs(10));
    }

    #[test]
    fn playing_timing_extrapolates_and_clamps_to_duration() {
        let mut timing = PlaybackTiming::default();
        timing.duration = Some(Duration::from_secs(10));
        timing.update_position(Duration::from_secs(10), true);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(timing.current_position(), Duration::from_secs(10));
    }

    #[test]
    fn sync_flag_is_exclusive() {
        let mut sync = SyncState::default();
        assert!(sync.try_begin());
        assert!(!sync.try_begin());
        sync.end();
        assert!(sync.try_begin());
    }
}
