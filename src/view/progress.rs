//! Progress bar rendering

use std::time::Duration;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::PlaybackInfo;

use super::utils::format_duration;

pub fn render_progress_bar(frame: &mut Frame, area: Rect, playback: &PlaybackInfo, queue_len: usize) {
    let status_text = match &playback.now_playing {
        None => " No song playing".to_string(),
        Some(song) if playback.is_playing => {
            format!(" ▶ {} | {}", song.title, song.artist)
        }
        Some(song) => format!("⏸  {} | {}", song.title, song.artist),
    };

    let duration = playback.duration.unwrap_or(Duration::ZERO);
    let time_str = format!(
        "{} / {}",
        format_duration(playback.position),
        format_duration(duration)
    );

    let progress_ratio = if duration > Duration::ZERO {
        (playback.position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let title = format!("{} ", status_text);
    let controls_info = format!(
        " Mode: {} | Vocal: {:.0}% | Queued: {} ",
        playback.settings.mode.label(),
        playback.settings.vocal_volume * 100.0,
        queue_len,
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(progress_ratio)
        .label(time_str);

    frame.render_widget(gauge, area);
}
