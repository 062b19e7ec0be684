//! Media event listener driving drift correction and song completion

use tokio::sync::mpsc::UnboundedReceiver;

use crate::media::{MediaDeck, MediaEvent};

use super::KaraokeController;

impl KaraokeController {
    /// Consume deck ticker events until the channel closes or the app
    /// quits.
    pub fn start_media_event_listener(&self, mut rx: UnboundedReceiver<MediaEvent>) {
        let controller = self.clone();
        tracing::info!("Starting media event listener");

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let should_quit = {
                    let model = controller.model.lock().await;
                    model.should_quit().await
                };
                if should_quit {
                    tracing::debug!("Media event listener shutting down");
                    break;
                }

                controller.on_media_event(event).await;
            }
        });
    }

    pub(crate) async fn on_media_event(&self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate { position } => {
                tracing::trace!(?position, "MediaEvent::TimeUpdate");
                // A tick can race a user pause; trust the deck, not the event.
                let is_playing = {
                    let deck_guard = self.deck.lock().await;
                    deck_guard.as_ref().map(MediaDeck::is_playing).unwrap_or(false)
                };
                {
                    let model = self.model.lock().await;
                    model.update_playback_position(position, is_playing).await;
                }
                self.drift_tick().await;
            }
            MediaEvent::Ended => {
                tracing::debug!("MediaEvent::Ended");
                self.handle_song_finished().await;
            }
        }
    }

    /// One correction pass per time update. The re-entrancy flag keeps
    /// corrections and seek alignments from overlapping; a tick that
    /// loses the flag skips its round.
    async fn drift_tick(&self) {
        let acquired = {
            let model = self.model.lock().await;
            model.try_begin_sync().await
        };
        if !acquired {
            return;
        }

        {
            let mut deck_guard = self.deck.lock().await;
            if let Some(deck) = deck_guard.as_mut() {
                if deck.is_loaded() {
                    if let Some(drift) = deck.correct_drift() {
                        tracing::debug!(drift_secs = drift, "Drift corrected");
                    }
                }
            }
        }

        let model = self.model.lock().await;
        model.end_sync().await;
    }
}
