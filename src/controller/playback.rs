//! Playback control methods

use std::time::Duration;

use crate::model::PlaybackMode;

use super::KaraokeController;

impl KaraokeController {
    /// Space bar: pause when playing, resume otherwise. With nothing
    /// loaded this is a no-op.
    pub async fn toggle_playback(&self) {
        let mut deck_guard = self.deck.lock().await;
        let Some(deck) = deck_guard.as_mut() else {
            return;
        };
        if !deck.is_loaded() {
            return;
        }

        let was_playing = deck.is_playing();
        tracing::debug!(was_playing, "Toggling playback");
        if was_playing {
            deck.pause();
        } else {
            deck.play_sync();
        }
        let is_playing = deck.is_playing();
        let position = deck.position();
        drop(deck_guard);

        let model = self.model.lock().await;
        model.update_playback_position(position, is_playing).await;
    }

    /// Rewind the current song to zero and play it again.
    pub async fn restart(&self) {
        let mut deck_guard = self.deck.lock().await;
        let Some(deck) = deck_guard.as_mut() else {
            return;
        };
        if !deck.is_loaded() {
            return;
        }
        deck.restart();
        let is_playing = deck.is_playing();
        drop(deck_guard);

        let model = self.model.lock().await;
        model.update_playback_position(Duration::ZERO, is_playing).await;
    }

    /// Seek relative to the current position, clamping at zero.
    pub async fn seek_by(&self, delta_secs: i64) {
        let position = {
            let deck_guard = self.deck.lock().await;
            match deck_guard.as_ref() {
                Some(deck) if deck.is_loaded() => deck.position(),
                _ => return,
            }
        };

        let target = if delta_secs < 0 {
            position.saturating_sub(Duration::from_secs(delta_secs.unsigned_abs()))
        } else {
            position + Duration::from_secs(delta_secs as u64)
        };
        self.seek_to(target).await;
    }

    /// Seek the primary and force-align the secondaries. Holds the sync
    /// flag so a drift tick cannot interleave with the alignment.
    pub async fn seek_to(&self, position: Duration) {
        let model = self.model.lock().await;
        let owns_flag = model.try_begin_sync().await;
        drop(model);

        let mut deck_guard = self.deck.lock().await;
        let seeked = match deck_guard.as_mut() {
            Some(deck) if deck.is_loaded() => {
                deck.seek(position);
                Some((deck.position(), deck.is_playing()))
            }
            _ => None,
        };
        drop(deck_guard);

        let Some((applied, is_playing)) = seeked else {
            if owns_flag {
                self.model.lock().await.end_sync().await;
            }
            return;
        };

        tracing::debug!(?position, ?applied, "Seeked");

        let model = self.model.lock().await;
        model.update_playback_position(applied, is_playing).await;
        if owns_flag {
            model.end_sync().await;
        }
    }

    /// Switch the audible source. Takes effect immediately when a song
    /// is loaded, and is remembered for the next load either way.
    pub async fn set_mode(&self, mode: PlaybackMode) {
        let model = self.model.lock().await;
        model.set_mode(mode).await;
        let vocal_volume = model.get_vocal_volume().await;
        drop(model);

        tracing::info!(mode = mode.label(), "Playback mode changed");
        self.reapply_mode(mode, vocal_volume).await;
    }

    pub async fn vocal_volume_up(&self) {
        let model = self.model.lock().await;
        let vocal_volume = model.vocal_volume_up().await;
        let mode = model.get_mode().await;
        drop(model);
        self.reapply_mode(mode, vocal_volume).await;
    }

    pub async fn vocal_volume_down(&self) {
        let model = self.model.lock().await;
        let vocal_volume = model.vocal_volume_down().await;
        let mode = model.get_mode().await;
        drop(model);
        self.reapply_mode(mode, vocal_volume).await;
    }

    async fn reapply_mode(&self, mode: PlaybackMode, vocal_volume: f32) {
        let mut deck_guard = self.deck.lock().await;
        if let Some(deck) = deck_guard.as_mut() {
            if deck.is_loaded() {
                deck.apply_mode(mode, vocal_volume);
            }
        }
    }
}
