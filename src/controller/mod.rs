//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and manages the media deck.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: Playback control methods (transport, mode, volume, seek)
//! - `queue`: Queue operations wired to deck loading
//! - `player_events`: Media event listener (drift ticks, song completion)

mod input;
mod playback;
mod queue;
mod player_events;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::media::MediaDeck;
use crate::model::AppModel;

#[derive(Clone)]
pub struct KaraokeController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) deck: Arc<Mutex<Option<MediaDeck>>>,
}

impl KaraokeController {
    pub fn new(model: Arc<Mutex<AppModel>>, deck: Arc<Mutex<Option<MediaDeck>>>) -> Self {
        Self { model, deck }
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        let error_str = format!("{error:#}");

        if error_str.contains("No such file") || error_str.contains("failed to open") {
            format!("Media file missing: {error_str}")
        } else if error_str.contains("failed to decode") {
            format!("Unplayable media: {error_str}")
        } else {
            format!("Error: {error_str}")
        }
    }
}
