//! Layout rendering (top bar, queue sidebar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, PlaybackMode, QueueView, UiState};

use super::utils::{render_scrollable_list, truncate_string};

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, mode: PlaybackMode) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(22), // Playback mode
        ])
        .split(area);

    let search_style = if ui_state.active_section == ActiveSection::Search {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if ui_state.search_query.is_empty() {
        "Type to search..."
    } else {
        &ui_state.search_query
    };

    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .padding(Padding::horizontal(1))
                .border_style(if ui_state.active_section == ActiveSection::Search {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                }),
        );
    frame.render_widget(search, chunks[0]);

    let mode_widget = Paragraph::new(format!("🎤 {}", mode.label()))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Mode "));
    frame.render_widget(mode_widget, chunks[1]);
}

pub fn render_queue_sidebar(frame: &mut Frame, area: Rect, ui_state: &UiState, queue: &QueueView) {
    let is_focused = ui_state.active_section == ActiveSection::Queue;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    if queue.rows.is_empty() {
        let empty = Paragraph::new("Queue is empty\n\nPick songs from the song book")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Queue ")
                    .padding(Padding::horizontal(1))
                    .border_style(border_style),
            );
        frame.render_widget(empty, area);
        return;
    }

    let name_width = (area.width as usize).saturating_sub(6);
    let items: Vec<ListItem> = queue
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let is_current = queue.current == Some(i);
            let marker = if is_current { "▶ " } else { "  " };
            let label = if row.artist.is_empty() {
                row.title.clone()
            } else {
                format!("{} - {}", row.title, row.artist)
            };
            let text = format!("{}{}", marker, truncate_string(&label, name_width));

            let style = if i == ui_state.queue_selected && is_focused {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let title = format!(" Queue ({}) ", queue.rows.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    render_scrollable_list(frame, area, items, ui_state.queue_selected, block);
}
