//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use super::catalog::{Catalog, Song};
use super::playback::{NowPlaying, PlaybackInfo, PlaybackSettings, PlaybackTiming, SyncState};
use super::queue::{QueueChange, QueueState};
use super::types::{ActiveSection, PlaybackMode, QueueRow, QueueView, UiState};

const VOLUME_STEP: f32 = 0.05;

/// Main application model containing all state
pub struct AppModel {
    catalog: Catalog,
    queue: Arc<Mutex<QueueState>>,
    now_playing: Arc<Mutex<Option<NowPlaying>>>,
    timing: Arc<Mutex<PlaybackTiming>>,
    settings: Arc<Mutex<PlaybackSettings>>,
    sync: Arc<Mutex<SyncState>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(catalog: Catalog) -> Self {
        let mut ui_state = UiState::default();
        // The song book shows the full catalog until a search narrows it.
        ui_state.results = catalog.songs().to_vec();

        Self {
            catalog,
            queue: Arc::new(Mutex::new(QueueState::new())),
            now_playing: Arc::new(Mutex::new(None)),
            timing: Arc::new(Mutex::new(PlaybackTiming::default())),
            settings: Arc::new(Mutex::new(PlaybackSettings::default())),
            sync: Arc::new(Mutex::new(SyncState::default())),
            ui_state: Arc::new(Mutex::new(ui_state)),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    /// The catalog is immutable after load, so no lock is needed.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // ========================================================================
    // Queue
    // ========================================================================

    pub async fn enqueue(&self, id: String) -> bool {
        let mut queue = self.queue.lock().await;
        queue.enqueue(id)
    }

    pub async fn remove_entry(&self, index: usize) -> QueueChange {
        let mut queue = self.queue.lock().await;
        let change = queue.remove_at(index);
        drop(queue);
        self.clamp_queue_selection().await;
        change
    }

    pub async fn move_entry(&self, from: usize, to: usize) -> QueueChange {
        let mut queue = self.queue.lock().await;
        queue.move_to(from, to)
    }

    pub async fn clear_queue(&self) {
        let mut queue = self.queue.lock().await;
        queue.clear();
        drop(queue);
        self.clamp_queue_selection().await;
    }

    pub async fn complete_current(&self) -> Option<usize> {
        let mut queue = self.queue.lock().await;
        let next = queue.complete_current();
        drop(queue);
        self.clamp_queue_selection().await;
        next
    }

    pub async fn select_entry(&self, index: usize) -> bool {
        let mut queue = self.queue.lock().await;
        queue.select(index)
    }

    pub async fn queue_next(&self) -> bool {
        let mut queue = self.queue.lock().await;
        queue.next()
    }

    pub async fn queue_previous(&self) -> bool {
        let mut queue = self.queue.lock().await;
        queue.previous()
    }

    pub async fn current_song_id(&self) -> Option<String> {
        let queue = self.queue.lock().await;
        queue.current_id().map(str::to_string)
    }

    pub async fn current_queue_index(&self) -> Option<usize> {
        self.queue.lock().await.current_index()
    }

    pub async fn queue_len(&self) -> usize {
        self.queue.lock().await.len()
    }

    /// Snapshot of the queue for rendering, ids resolved against the
    /// catalog. Unknown ids render as their raw id, like the original.
    pub async fn get_queue_view(&self) -> QueueView {
        let queue = self.queue.lock().await;
        let rows = queue
            .entries()
            .iter()
            .map(|id| match self.catalog.get(id) {
                Some(song) => QueueRow {
                    id: id.clone(),
                    title: song.title.clone(),
                    artist: song.artist.clone(),
                },
                None => QueueRow {
                    id: id.clone(),
                    title: id.clone(),
                    artist: String::new(),
                },
            })
            .collect();
        QueueView {
            rows,
            current: queue.current_index(),
        }
    }

    // ========================================================================
    // Playback state
    // ========================================================================

    pub async fn set_now_playing(&self, song: Option<NowPlaying>, duration: Option<Duration>) {
        *self.now_playing.lock().await = song;
        let mut timing = self.timing.lock().await;
        timing.reset();
        timing.duration = duration;
    }

    pub async fn update_playback_position(&self, position: Duration, is_playing: bool) {
        let mut timing = self.timing.lock().await;
        timing.update_position(position, is_playing);
    }

    pub async fn set_playing(&self, is_playing: bool) {
        let mut timing = self.timing.lock().await;
        timing.set_playing(is_playing);
    }

    pub async fn is_playing(&self) -> bool {
        self.timing.lock().await.is_playing
    }

    pub async fn get_playback_info(&self) -> PlaybackInfo {
        let now_playing = self.now_playing.lock().await.clone();
        let timing = self.timing.lock().await;
        let settings = *self.settings.lock().await;

        PlaybackInfo {
            now_playing,
            position: timing.current_position(),
            duration: timing.duration,
            is_playing: timing.is_playing,
            settings,
        }
    }

    pub async fn get_mode(&self) -> PlaybackMode {
        self.settings.lock().await.mode
    }

    pub async fn set_mode(&self, mode: PlaybackMode) {
        self.settings.lock().await.mode = mode;
    }

    pub async fn get_vocal_volume(&self) -> f32 {
        self.settings.lock().await.vocal_volume
    }

    pub async fn vocal_volume_up(&self) -> f32 {
        let mut settings = self.settings.lock().await;
        settings.vocal_volume = (settings.vocal_volume + VOLUME_STEP).min(1.0);
        settings.vocal_volume
    }

    pub async fn vocal_volume_down(&self) -> f32 {
        let mut settings = self.settings.lock().await;
        settings.vocal_volume = (settings.vocal_volume - VOLUME_STEP).max(0.0);
        settings.vocal_volume
    }

    // ========================================================================
    // Drift-correction flag
    // ========================================================================

    pub async fn try_begin_sync(&self) -> bool {
        self.sync.lock().await.try_begin()
    }

    pub async fn end_sync(&self) {
        self.sync.lock().await.end();
    }

    // ========================================================================
    // UI state
    // ========================================================================

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    pub async fn append_to_search(&self, c: char) {
        let mut state = self.ui_state.lock().await;
        state.search_query.push(c);
    }

    pub async fn backspace_search(&self) {
        let mut state = self.ui_state.lock().await;
        state.search_query.pop();
    }

    /// Clear the query and show the full catalog again.
    pub async fn reset_search(&self) {
        let mut state = self.ui_state.lock().await;
        state.search_query.clear();
        state.results = self.catalog.songs().to_vec();
        state.result_selected = 0;
    }

    pub async fn set_results(&self, results: Vec<Song>) {
        let mut state = self.ui_state.lock().await;
        state.results = results;
        state.result_selected = 0;
    }

    pub async fn selected_result(&self) -> Option<Song> {
        let state = self.ui_state.lock().await;
        state.results.get(state.result_selected).cloned()
    }

    pub async fn selected_queue_index(&self) -> usize {
        self.ui_state.lock().await.queue_selected
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::SongBook => {
                if state.result_selected > 0 {
                    state.result_selected -= 1;
                }
            }
            ActiveSection::Queue => {
                if state.queue_selected > 0 {
                    state.queue_selected -= 1;
                }
            }
            ActiveSection::Search => {}
        }
    }

    pub async fn move_selection_down(&self) {
        let queue_len = self.queue_len().await;
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::SongBook => {
                if state.result_selected < state.results.len().saturating_sub(1) {
                    state.result_selected += 1;
                }
            }
            ActiveSection::Queue => {
                if state.queue_selected < queue_len.saturating_sub(1) {
                    state.queue_selected += 1;
                }
            }
            ActiveSection::Search => {}
        }
    }

    async fn clamp_queue_selection(&self) {
        let queue_len = self.queue_len().await;
        let mut state = self.ui_state.lock().await;
        state.queue_selected = state.queue_selected.min(queue_len.saturating_sub(1));
    }

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > 5 {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}
