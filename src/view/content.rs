//! Song book rendering (the catalog / search results table)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, UiState};

use super::utils::{calculate_num_width, render_scrollable_list, truncate_string};

pub fn render_song_book(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    current_playing_id: Option<&str>,
) {
    let is_focused = ui_state.active_section == ActiveSection::SongBook;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    if ui_state.results.is_empty() {
        let message = if ui_state.search_query.is_empty() {
            "The catalog is empty"
        } else {
            "No matching songs\n\nEsc in the search box shows the full catalog"
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Song Book ")
                    .padding(Padding::horizontal(1))
                    .border_style(border_style),
            );
        frame.render_widget(empty, area);
        return;
    }

    let content_width = (area.width as usize).saturating_sub(4);
    let num_width = calculate_num_width(ui_state.results.len()).max(4);
    let remaining = content_width.saturating_sub(num_width + 6);
    let artist_width = remaining / 3;
    let title_width = remaining.saturating_sub(artist_width);

    let items: Vec<ListItem> = ui_state
        .results
        .iter()
        .enumerate()
        .map(|(i, song)| {
            let is_selected = i == ui_state.result_selected;
            let is_playing = current_playing_id == Some(song.id.as_str());

            let text = format!(
                " {:<num_width$}  {}  {}",
                song.id,
                truncate_string(&song.artist, artist_width),
                truncate_string(&song.title, title_width),
            );

            let style = if is_selected && is_focused {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if is_playing {
                Style::default().fg(Color::Cyan)
            } else if is_selected {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let title = format!(" Song Book ({}) ", ui_state.results.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    render_scrollable_list(frame, area, items, ui_state.result_selected, block);
}
