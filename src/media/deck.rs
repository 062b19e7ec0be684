//! The synchronized three-element deck

use std::time::Duration;

use anyhow::Result;

use crate::model::PlaybackMode;

use super::{MediaElement, DRIFT_THRESHOLD, GUIDE_VOLUME_FACTOR};

/// The bundle of media elements for one song: the MV track as the
/// timing reference plus the backing and vocal tracks kept aligned
/// to it.
///
/// The primary element is permanently muted — it only supplies the
/// clock. Mode switching decides which of the two secondaries is
/// audible and at what gain.
pub struct MediaDeck {
    primary: Box<dyn MediaElement>,
    backing: Box<dyn MediaElement>,
    vocal: Box<dyn MediaElement>,
    loaded: bool,
}

impl MediaDeck {
    pub fn new(
        primary: Box<dyn MediaElement>,
        backing: Box<dyn MediaElement>,
        vocal: Box<dyn MediaElement>,
    ) -> Self {
        Self {
            primary,
            backing,
            vocal,
            loaded: false,
        }
    }

    /// Load a song's three sources and reset every position to zero.
    /// The current mode must be re-applied by the caller afterwards.
    pub fn load(&mut self, primary_src: &str, backing_src: &str, vocal_src: &str) -> Result<()> {
        self.loaded = false;
        self.primary.load(primary_src)?;
        self.backing.load(backing_src)?;
        self.vocal.load(vocal_src)?;
        self.primary.set_muted(true);
        self.loaded = true;
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Route audibility for the given mode and vocal gain.
    ///
    /// If the deck is playing, secondaries that drifted past the
    /// threshold are snapped back to the primary and restarted, so a
    /// mode switch mid-song comes in aligned.
    pub fn apply_mode(&mut self, mode: PlaybackMode, vocal_volume: f32) {
        self.primary.set_muted(true);
        match mode {
            PlaybackMode::Instrumental => {
                self.backing.set_muted(false);
                self.vocal.set_muted(true);
            }
            PlaybackMode::Guide => {
                self.backing.set_muted(true);
                self.vocal.set_muted(false);
                self.vocal.set_volume(vocal_volume * GUIDE_VOLUME_FACTOR);
            }
            PlaybackMode::Vocal => {
                self.backing.set_muted(true);
                self.vocal.set_muted(false);
                self.vocal.set_volume(vocal_volume);
            }
        }

        if self.is_playing() {
            if self.drift_seconds().abs() > DRIFT_THRESHOLD.as_secs_f64() {
                self.align_secondaries();
            }
            self.start_secondaries();
        }
    }

    /// Start the primary, then the secondaries once the primary has
    /// accepted playback. A rejected start leaves everything paused;
    /// the user can press play again.
    pub fn play_sync(&mut self) {
        if let Err(e) = self.primary.play() {
            tracing::debug!(error = %e, "Primary start rejected");
            return;
        }
        self.start_secondaries();
    }

    pub fn pause(&mut self) {
        self.primary.pause();
        self.backing.pause();
        self.vocal.pause();
    }

    /// Rewind everything to zero and start again.
    pub fn restart(&mut self) {
        self.seek(Duration::ZERO);
        self.play_sync();
    }

    /// Move the primary and force-align the secondaries, no threshold.
    pub fn seek(&mut self, position: Duration) {
        self.primary.set_position(position);
        self.align_secondaries();
    }

    /// Snap both secondaries to the primary position unconditionally.
    pub fn align_secondaries(&mut self) {
        let position = self.primary.position();
        self.backing.set_position(position);
        self.vocal.set_position(position);
    }

    /// One drift-correction pass: snap the secondaries if the vocal
    /// track strayed past the threshold. Returns the drift in seconds
    /// when a correction was applied.
    pub fn correct_drift(&mut self) -> Option<f64> {
        let drift = self.drift_seconds();
        if drift.abs() > DRIFT_THRESHOLD.as_secs_f64() {
            self.align_secondaries();
            Some(drift)
        } else {
            None
        }
    }

    /// Vocal position minus primary position, signed.
    pub fn drift_seconds(&self) -> f64 {
        self.vocal.position().as_secs_f64() - self.primary.position().as_secs_f64()
    }

    pub fn position(&self) -> Duration {
        self.primary.position()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.primary.duration()
    }

    pub fn is_playing(&self) -> bool {
        self.loaded && !self.primary.is_paused()
    }

    pub fn has_ended(&self) -> bool {
        self.loaded && self.primary.has_ended()
    }

    fn start_secondaries(&mut self) {
        if let Err(e) = self.backing.play() {
            tracing::debug!(error = %e, "Backing start rejected");
        }
        if let Err(e) = self.vocal.play() {
            tracing::debug!(error = %e, "Vocal start rejected");
        }
    }

    #[cfg(test)]
    pub(crate) fn primary_mut(&mut self) -> &mut dyn MediaElement {
        self.primary.as_mut()
    }

    #[cfg(test)]
    pub(crate) fn backing_mut(&mut self) -> &mut dyn MediaElement {
        self.backing.as_mut()
    }

    #[cfg(test)]
    pub(crate) fn vocal_mut(&mut self) -> &mut dyn MediaElement {
        self.vocal.as_mut()
    }

    #[cfg(test)]
    pub(crate) fn vocal(&self) -> &dyn MediaElement {
        self.vocal.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn backing(&self) -> &dyn MediaElement {
        self.backing.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::fake_deck;
    use super::*;

    fn loaded_deck() -> MediaDeck {
        let mut deck = fake_deck();
        deck.load("mv.mp4", "backing.mp3", "vocal.mp3").unwrap();
        deck
    }

    #[test]
    fn load_resets_positions_and_mutes_primary() {
        let mut deck = fake_deck();
        deck.primary_mut().set_position(Duration::from_secs(42));
        deck.load("mv.mp4", "backing.mp3", "vocal.mp3").unwrap();

        assert!(deck.is_loaded());
        assert_eq!(deck.position(), Duration::ZERO);
        assert!(!deck.is_playing());
    }

    #[test]
    fn load_propagates_missing_file() {
        let mut deck = fake_deck();
        let err = deck.load("mv.mp4", "missing.mp3", "vocal.mp3");
        assert!(err.is_err());
        assert!(!deck.is_loaded());
    }

    #[test]
    fn instrumental_mode_mutes_vocal_only() {
        let mut deck = loaded_deck();
        deck.apply_mode(PlaybackMode::Instrumental, 1.0);
        assert!(!deck.backing().is_muted());
        assert!(deck.vocal().is_muted());
    }

    #[test]
    fn vocal_mode_mutes_backing_and_restores_full_gain() {
        let mut deck = loaded_deck();
        deck.apply_mode(PlaybackMode::Vocal, 0.8);
        assert!(deck.backing().is_muted());
        assert!(!deck.vocal().is_muted());
        assert!((deck.vocal().volume() - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn guide_mode_scales_vocal_gain() {
        let mut deck = loaded_deck();
        deck.apply_mode(PlaybackMode::Guide, 0.8);
        assert!(deck.backing().is_muted());
        let expected = 0.8 * GUIDE_VOLUME_FACTOR;
        assert!((deck.vocal().volume() - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn mode_switch_while_playing_realigns_drifted_secondaries() {
        let mut deck = loaded_deck();
        deck.play_sync();
        deck.primary_mut().set_position(Duration::from_secs(10));
        deck.vocal_mut().set_position(Duration::from_millis(10_200));

        deck.apply_mode(PlaybackMode::Vocal, 1.0);

        assert_eq!(deck.vocal().position(), Duration::from_secs(10));
        assert_eq!(deck.backing().position(), Duration::from_secs(10));
        assert!(!deck.vocal().is_paused());
    }

    #[test]
    fn drift_within_threshold_is_left_alone() {
        let mut deck = loaded_deck();
        deck.play_sync();
        deck.primary_mut().set_position(Duration::from_secs(10));
        deck.vocal_mut().set_position(Duration::from_millis(10_040));
        deck.backing_mut().set_position(Duration::from_millis(10_040));

        assert!(deck.correct_drift().is_none());
        assert_eq!(deck.vocal().position(), Duration::from_millis(10_040));
    }

    #[test]
    fn drift_beyond_threshold_snaps_both_secondaries() {
        let mut deck = loaded_deck();
        deck.play_sync();
        deck.primary_mut().set_position(Duration::from_secs(10));
        deck.vocal_mut().set_position(Duration::from_millis(9_800));
        deck.backing_mut().set_position(Duration::from_millis(10_300));

        let drift = deck.correct_drift().expect("correction should fire");
        assert!(drift < 0.0);
        assert_eq!(deck.vocal().position(), Duration::from_secs(10));
        assert_eq!(deck.backing().position(), Duration::from_secs(10));
    }

    #[test]
    fn seek_aligns_unconditionally() {
        let mut deck = loaded_deck();
        deck.play_sync();
        // Well inside the drift threshold; an explicit seek must still move them.
        deck.vocal_mut().set_position(Duration::from_millis(10));

        deck.seek(Duration::from_secs(30));

        assert_eq!(deck.position(), Duration::from_secs(30));
        assert_eq!(deck.vocal().position(), Duration::from_secs(30));
        assert_eq!(deck.backing().position(), Duration::from_secs(30));
    }

    #[test]
    fn rejected_primary_start_leaves_secondaries_paused() {
        use super::super::testing::FakeElement;

        let mut primary = FakeElement::new();
        primary.reject_play = true;
        let mut deck = MediaDeck::new(
            Box::new(primary),
            Box::new(FakeElement::new()),
            Box::new(FakeElement::new()),
        );
        deck.load("mv.mp4", "backing.mp3", "vocal.mp3").unwrap();

        deck.play_sync();

        assert!(!deck.is_playing());
        assert!(deck.backing().is_paused());
        assert!(deck.vocal().is_paused());
    }
}
