// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Render the player panel.
//!
//! Shows the current track with its rating, the stream title reported by
//! `mpv` when it differs, elapsed and remaining time, the position in the
//! queue, the volume and a progress bar.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    model::{Rating, TrackInfo},
    player::PlayerState,
    render::icons::{ICON_PAUSE, ICON_PLAY, ICON_STOP, THUMB_DOWN, THUMB_UP},
    theme::Theme,
    util::format::format_time,
};

/// mpv allows the volume to go above 100%.
const MAX_VOLUME: f64 = 130.0;

pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 5])
        .split(inner_area);

    if let Some(track) = &app.now_playing {
        draw_now_playing(f, rows[0], app, track);

        if let Some(name) = app
            .player_track_name
            .as_deref()
            .filter(|name| *name != track.track_title)
        {
            f.render_widget(
                Paragraph::new(format!("    {}", name)).fg(app.theme.table_time_fg),
                rows[1],
            );
        }

        draw_queue_position(f, rows[3], app, track);
    }

    draw_volume(f, rows[2], app);

    let gauge = progress_gauge(&app.theme, app.player_position.unwrap_or(0.0));
    f.render_widget(gauge, rows[4]);
}

fn draw_now_playing(f: &mut Frame, area: Rect, app: &App, track: &TrackInfo) {
    let theme = &app.theme;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let accent = bold.fg(theme.accent_colour);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(area);

    let icon = match app.audio_player.state() {
        PlayerState::Playing => ICON_PLAY,
        PlayerState::Paused => ICON_PAUSE,
        PlayerState::Stopped => ICON_STOP,
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", icon), bold.fg(Color::White)),
        Span::styled(track.track_title.as_str(), accent),
        Span::raw(" from "),
        Span::styled(track.album_title.as_str(), accent),
        Span::raw(" by "),
        Span::styled(track.artist_name.as_str(), accent),
    ];
    match track.rating {
        Rating::Like => spans.push(Span::raw(format!("  {}", THUMB_UP))),
        Rating::Dislike => spans.push(Span::raw(format!("  {}", THUMB_DOWN))),
        Rating::Neutral => {}
    }
    f.render_widget(Paragraph::new(Line::from(spans)), columns[0]);

    let duration = app.player_duration.unwrap_or(0);
    let time = app.player_time.unwrap_or(0);
    let plain = bold.fg(Color::White);

    let times = Line::from(vec![
        Span::styled(format_time(time), accent),
        Span::styled(" / ", plain),
        Span::styled(format_time(duration), accent),
        Span::styled(" (-", plain),
        Span::styled(format_time(duration.saturating_sub(time)), accent),
        Span::styled(")", plain),
    ]);
    f.render_widget(Paragraph::new(times).alignment(Alignment::Right), columns[1]);
}

/// Shows where the playing track sits in the queue, if it came from there.
fn draw_queue_position(f: &mut Frame, area: Rect, app: &App, track: &TrackInfo) {
    let queued = app
        .queue
        .current()
        .is_some_and(|current| current.durable_id == track.durable_id);
    if !queued {
        return;
    }

    let text = format!("    {} of {} in queue", app.queue.position(), app.queue.len());
    f.render_widget(Paragraph::new(text).fg(app.theme.table_time_fg), area);
}

fn draw_volume(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(21), Constraint::Length(5)])
        .split(area);

    let ratio = (f64::from(app.volume.unwrap_or(0)) / MAX_VOLUME).clamp(0.0, 1.0);
    f.render_widget(progress_gauge(&app.theme, ratio), columns[1]);

    let label = Paragraph::new(format!(" {}%", (ratio * MAX_VOLUME) as u16))
        .alignment(Alignment::Right)
        .fg(Color::White);
    f.render_widget(label, columns[2]);
}

fn progress_gauge(theme: &Theme, ratio: f64) -> Gauge<'static> {
    Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.accent_colour)
                .bg(theme.gauge_track_colour),
        )
        .ratio(ratio.clamp(0.0, 1.0))
        .label("")
        .use_unicode(true)
}
