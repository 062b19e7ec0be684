//! Core type definitions for the application

use std::time::Instant;

use super::catalog::Song;

/// Which audio source is audible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    #[default]
    Instrumental,
    Guide,
    Vocal,
}

impl PlaybackMode {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackMode::Instrumental => "Instrumental",
            PlaybackMode::Guide => "Guide",
            PlaybackMode::Vocal => "Vocal",
        }
    }
}

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    SongBook,
    Queue,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::SongBook,
            ActiveSection::SongBook => ActiveSection::Queue,
            ActiveSection::Queue => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Queue,
            ActiveSection::SongBook => ActiveSection::Search,
            ActiveSection::Queue => ActiveSection::SongBook,
        }
    }
}

/// One row of the queue sidebar, resolved against the catalog.
#[derive(Clone, Debug)]
pub struct QueueRow {
    pub id: String,
    pub title: String,
    pub artist: String,
}

/// Snapshot of the queue for rendering.
#[derive(Clone, Debug, Default)]
pub struct QueueView {
    pub rows: Vec<QueueRow>,
    pub current: Option<usize>,
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    pub results: Vec<Song>,
    pub result_selected: usize,
    pub queue_selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::SongBook,
            search_query: String::new(),
            results: vec![], // filled with the full catalog at startup
            result_selected: 0,
            queue_selected: 0,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}
