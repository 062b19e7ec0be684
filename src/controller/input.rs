//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{ActiveSection, PlaybackMode};

use super::KaraokeController;

const SEEK_STEP_SECS: i64 = 5;

impl KaraokeController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    model.clear_error().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        let ui_state = model.get_ui_state().await;

        // Handle search input when in search section
        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        model.cycle_section_backward().await;
                    } else {
                        model.cycle_section_forward().await;
                    }
                    return Ok(());
                }
                KeyCode::Enter => {
                    let results = model.catalog().search(&ui_state.search_query);
                    tracing::debug!(query = %ui_state.search_query, hits = results.len(), "Search");
                    model.set_results(results).await;
                    model.set_active_section(ActiveSection::SongBook).await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.reset_search().await;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    // Q still quits even in search mode when Ctrl is pressed
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                        return Ok(());
                    }
                    model.append_to_search(c).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Song book: pick songs into the queue
        if ui_state.active_section == ActiveSection::SongBook {
            match key.code {
                KeyCode::Up => {
                    model.move_selection_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.move_selection_down().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    drop(model);
                    self.enqueue_selected().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Queue sidebar: play, remove, reorder
        if ui_state.active_section == ActiveSection::Queue {
            match key.code {
                KeyCode::Up => {
                    model.move_selection_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.move_selection_down().await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    let index = model.selected_queue_index().await;
                    drop(model);
                    self.play_entry(index).await;
                    return Ok(());
                }
                KeyCode::Delete | KeyCode::Char('x') | KeyCode::Char('X') => {
                    let index = model.selected_queue_index().await;
                    drop(model);
                    self.remove_entry(index).await;
                    return Ok(());
                }
                KeyCode::Char('[') => {
                    let index = model.selected_queue_index().await;
                    drop(model);
                    if index > 0 {
                        self.move_entry(index, index - 1).await;
                    }
                    return Ok(());
                }
                KeyCode::Char(']') => {
                    let index = model.selected_queue_index().await;
                    drop(model);
                    self.move_entry(index, index + 1).await;
                    return Ok(());
                }
                KeyCode::Char('f') | KeyCode::Char('F') => {
                    drop(model);
                    self.play_selected_next().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            // Restart the current song
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.restart().await;
            }
            // Next / previous queue entry
            KeyCode::Char('n') | KeyCode::Char('N') => {
                drop(model);
                self.next_song().await;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                drop(model);
                self.previous_song().await;
            }
            // Clear the queue
            KeyCode::Char('c') | KeyCode::Char('C') => {
                drop(model);
                self.clear_queue().await;
            }
            // Playback modes
            KeyCode::Char('i') | KeyCode::Char('I') => {
                drop(model);
                self.set_mode(PlaybackMode::Instrumental).await;
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                drop(model);
                self.set_mode(PlaybackMode::Guide).await;
            }
            KeyCode::Char('v') | KeyCode::Char('V') => {
                drop(model);
                self.set_mode(PlaybackMode::Vocal).await;
            }
            // Vocal volume
            KeyCode::Char('+') | KeyCode::Char('=') => {
                drop(model);
                self.vocal_volume_up().await;
            }
            KeyCode::Char('-') => {
                drop(model);
                self.vocal_volume_down().await;
            }
            // Seek backward / forward
            KeyCode::Char(',') => {
                drop(model);
                self.seek_by(-SEEK_STEP_SECS).await;
            }
            KeyCode::Char('.') => {
                drop(model);
                self.seek_by(SEEK_STEP_SECS).await;
            }
            // Focus search
            KeyCode::Char('/') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            // Show help popup
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }
}
