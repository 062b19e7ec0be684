//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists)
//! - `layout`: Top bar and queue sidebar
//! - `content`: Song book table rendering
//! - `progress`: Progress bar rendering
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod layout;
mod content;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{PlaybackInfo, QueueView, UiState};

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        playback: &PlaybackInfo,
        ui_state: &UiState,
        queue: &QueueView,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + mode
                Constraint::Min(0),    // Song book + queue
                Constraint::Length(3), // Progress bar with playback info
            ])
            .split(frame.area());

        // Top bar: Search + Mode
        layout::render_top_bar(frame, chunks[0], ui_state, playback.settings.mode);

        // Middle: Song book and queue sidebar
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(62), // Song book
                Constraint::Percentage(38), // Queue
            ])
            .split(chunks[1]);

        let current_playing_id = playback.now_playing.as_ref().map(|s| s.id.as_str());
        content::render_song_book(frame, main_chunks[0], ui_state, current_playing_id);
        layout::render_queue_sidebar(frame, main_chunks[1], ui_state, queue);

        // Bottom: Progress bar with song info and controls
        progress::render_progress_bar(frame, chunks[2], playback, queue.rows.len());

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
