//! Queue operations wired to deck loading

use crate::model::{NowPlaying, QueueChange};

use super::KaraokeController;

impl KaraokeController {
    /// Add a song to the queue. Unknown ids are a no-op. If the queue
    /// was empty the song becomes current and starts playing.
    pub async fn enqueue(&self, id: &str) {
        let model = self.model.lock().await;
        if model.catalog().get(id).is_none() {
            tracing::warn!(id, "Enqueue ignored, song not in catalog");
            return;
        }
        let became_current = model.enqueue(id.to_string()).await;
        drop(model);

        tracing::info!(id, became_current, "Song enqueued");
        if became_current {
            self.play_current().await;
        }
    }

    /// Enqueue whatever the song book selection points at.
    pub async fn enqueue_selected(&self) {
        let selected = {
            let model = self.model.lock().await;
            model.selected_result().await
        };
        if let Some(song) = selected {
            self.enqueue(&song.id).await;
        }
    }

    /// Remove the entry at `index` from the queue.
    pub async fn remove_entry(&self, index: usize) {
        let model = self.model.lock().await;
        let change = model.remove_entry(index).await;
        drop(model);

        tracing::debug!(index, ?change, "Queue entry removed");
        match change {
            QueueChange::Emptied => self.stop_playback().await,
            QueueChange::CurrentChanged => self.play_current().await,
            QueueChange::Changed | QueueChange::Untouched => {}
        }
    }

    /// Move a queue entry one slot up or down.
    pub async fn move_entry(&self, from: usize, to: usize) {
        let model = self.model.lock().await;
        let change = model.move_entry(from, to).await;
        if change != QueueChange::Untouched {
            // Keep the sidebar selection on the entry that moved.
            let mut state = model.ui_state.lock().await;
            if state.queue_selected == from {
                state.queue_selected = to;
            }
        }
    }

    /// Move the selected entry to right after the current song.
    pub async fn play_selected_next(&self) {
        let model = self.model.lock().await;
        let Some(current) = model.current_queue_index().await else {
            return;
        };
        let from = model.selected_queue_index().await;
        if from == current {
            return;
        }
        // Removing an earlier entry shifts the slot after current down by one.
        let to = if from < current { current } else { current + 1 };
        let change = model.move_entry(from, to).await;
        if change != QueueChange::Untouched {
            let mut state = model.ui_state.lock().await;
            state.queue_selected = to;
        }
    }

    /// Jump to an arbitrary queue entry and play it.
    pub async fn play_entry(&self, index: usize) {
        let model = self.model.lock().await;
        let selected = model.select_entry(index).await;
        drop(model);
        if selected {
            self.play_current().await;
        }
    }

    pub async fn clear_queue(&self) {
        let model = self.model.lock().await;
        model.clear_queue().await;
        drop(model);
        tracing::info!("Queue cleared");
        self.stop_playback().await;
    }

    /// Step to the next queued song without removing anything.
    pub async fn next_song(&self) {
        let moved = {
            let model = self.model.lock().await;
            model.queue_next().await
        };
        if moved {
            self.play_current().await;
        }
    }

    /// Step back to the previous queued song.
    pub async fn previous_song(&self) {
        let moved = {
            let model = self.model.lock().await;
            model.queue_previous().await
        };
        if moved {
            self.play_current().await;
        }
    }

    /// The current song finished: destructive advance. The finished
    /// entry leaves the queue; whatever slides into its position plays,
    /// or the player idles when the queue ran dry.
    pub async fn handle_song_finished(&self) {
        let next = {
            let model = self.model.lock().await;
            model.complete_current().await
        };
        tracing::info!(?next, "Song finished");
        match next {
            Some(_) => self.play_current().await,
            None => self.stop_playback().await,
        }
    }

    /// Load the current queue entry onto the deck and start it.
    pub async fn play_current(&self) {
        let model = self.model.lock().await;
        let Some(id) = model.current_song_id().await else {
            return;
        };
        let Some(song) = model.catalog().get(&id).cloned() else {
            tracing::warn!(id, "Current queue entry not in catalog, ignoring");
            return;
        };
        let mode = model.get_mode().await;
        let vocal_volume = model.get_vocal_volume().await;
        drop(model);

        let mut deck_guard = self.deck.lock().await;
        let Some(deck) = deck_guard.as_mut() else {
            drop(deck_guard);
            let model = self.model.lock().await;
            model.set_error("Audio backend not ready".to_string()).await;
            return;
        };

        if let Err(e) = deck.load(&song.video_url, &song.backing_url, &song.vocal_url) {
            drop(deck_guard);
            tracing::error!(id = %song.id, error = %e, "Failed to load song");
            let model = self.model.lock().await;
            model.set_error(Self::format_error(&e)).await;
            return;
        }

        deck.apply_mode(mode, vocal_volume);
        deck.play_sync();
        let duration = deck.duration();
        let is_playing = deck.is_playing();
        drop(deck_guard);

        tracing::info!(id = %song.id, title = %song.title, "Now playing");

        let model = self.model.lock().await;
        model
            .set_now_playing(
                Some(NowPlaying {
                    id: song.id.clone(),
                    title: song.title.clone(),
                    artist: song.artist.clone(),
                }),
                duration,
            )
            .await;
        model.set_playing(is_playing).await;
    }

    /// Pause the deck and clear the now-playing display.
    pub async fn stop_playback(&self) {
        let mut deck_guard = self.deck.lock().await;
        if let Some(deck) = deck_guard.as_mut() {
            deck.pause();
        }
        drop(deck_guard);

        let model = self.model.lock().await;
        model.set_now_playing(None, None).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::Mutex;

    use crate::media::testing::fake_deck;
    use crate::media::MediaEvent;
    use crate::model::{AppModel, Catalog};

    use super::*;

    const CATALOG: &str = r#"[
        {"id": "A", "title": "Alpha", "artist": "Ann",
         "videoUrl": "a/mv.mp4", "backingUrl": "a/backing.mp3", "vocalUrl": "a/vocal.mp3"},
        {"id": "B", "title": "Beta", "artist": "Ben",
         "videoUrl": "b/mv.mp4", "backingUrl": "b/backing.mp3", "vocalUrl": "b/vocal.mp3"},
        {"id": "C", "title": "Gamma", "artist": "Cam",
         "videoUrl": "c/mv.mp4", "backingUrl": "c/backing.mp3", "vocalUrl": "c/vocal.mp3"}
    ]"#;

    fn controller() -> KaraokeController {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let model = Arc::new(Mutex::new(AppModel::new(catalog)));
        let deck = Arc::new(Mutex::new(Some(fake_deck())));
        KaraokeController::new(model, deck)
    }

    #[tokio::test]
    async fn enqueue_into_empty_queue_starts_playback() {
        let controller = controller();
        controller.enqueue("A").await;

        let model = controller.model.lock().await;
        assert_eq!(model.current_song_id().await.as_deref(), Some("A"));
        assert!(model.is_playing().await);
        let info = model.get_playback_info().await;
        assert_eq!(info.now_playing.unwrap().title, "Alpha");
        drop(model);

        let deck = controller.deck.lock().await;
        assert!(deck.as_ref().unwrap().is_playing());
    }

    #[tokio::test]
    async fn unknown_id_is_a_noop() {
        let controller = controller();
        controller.enqueue("nope").await;

        let model = controller.model.lock().await;
        assert_eq!(model.queue_len().await, 0);
        assert!(model.current_song_id().await.is_none());
    }

    #[tokio::test]
    async fn completion_advances_to_next_queued_song() {
        let controller = controller();
        controller.enqueue("A").await;
        controller.enqueue("B").await;
        controller.enqueue("C").await;

        controller.on_media_event(MediaEvent::Ended).await;

        let model = controller.model.lock().await;
        let view = model.get_queue_view().await;
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.current, Some(0));
        assert_eq!(model.current_song_id().await.as_deref(), Some("B"));
        let info = model.get_playback_info().await;
        assert_eq!(info.now_playing.unwrap().id, "B");
        assert!(info.is_playing);
    }

    #[tokio::test]
    async fn completion_of_last_song_idles() {
        let controller = controller();
        controller.enqueue("A").await;

        controller.on_media_event(MediaEvent::Ended).await;

        let model = controller.model.lock().await;
        assert_eq!(model.queue_len().await, 0);
        assert!(model.current_song_id().await.is_none());
        let info = model.get_playback_info().await;
        assert!(info.now_playing.is_none());
        assert!(!info.is_playing);
        drop(model);

        let deck = controller.deck.lock().await;
        assert!(!deck.as_ref().unwrap().is_playing());
    }

    #[tokio::test]
    async fn removing_last_entry_stops_playback() {
        let controller = controller();
        controller.enqueue("A").await;
        controller.remove_entry(0).await;

        let model = controller.model.lock().await;
        assert!(model.current_song_id().await.is_none());
        drop(model);

        let deck = controller.deck.lock().await;
        assert!(!deck.as_ref().unwrap().is_playing());
    }

    #[tokio::test]
    async fn time_update_corrects_excessive_drift() {
        let controller = controller();
        controller.enqueue("A").await;

        {
            let mut deck = controller.deck.lock().await;
            let deck = deck.as_mut().unwrap();
            deck.primary_mut().set_position(Duration::from_secs(20));
            deck.vocal_mut().set_position(Duration::from_millis(20_500));
        }

        controller
            .on_media_event(MediaEvent::TimeUpdate {
                position: Duration::from_secs(20),
            })
            .await;

        let deck = controller.deck.lock().await;
        let deck = deck.as_ref().unwrap();
        assert_eq!(deck.vocal().position(), Duration::from_secs(20));
        assert_eq!(deck.backing().position(), Duration::from_secs(20));
    }
}
