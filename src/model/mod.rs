//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (enums, UI state, etc.)
//! - `catalog`: The song catalog (load, lookup, search)
//! - `queue`: Play queue state and operations
//! - `playback`: Playback-related state (now playing, timing, settings, sync flag)
//! - `app_model`: Main application model with state management methods

mod types;
mod catalog;
mod queue;
mod playback;
mod app_model;

// Re-export all public types for convenient access
pub use types::{ActiveSection, PlaybackMode, QueueRow, QueueView, UiState};

pub use catalog::{Catalog, Song};

pub use queue::QueueChange;

pub use playback::{NowPlaying, PlaybackInfo, PlaybackSettings};

pub use app_model::AppModel;
