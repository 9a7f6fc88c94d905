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

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    components::song_table::SongTableView, render::Render, theme::Theme,
    util::format::format_duration,
};

impl SongTableView {
    /// Draws a one line header describing what is shown, followed by the
    /// track table.
    ///
    /// `playlist_name` is the display name of the current playlist, when the
    /// view is in playlist mode.
    pub(crate) fn draw(&mut self, f: &mut Frame, area: Rect, playlist_name: Option<&str>, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(area);

        let title = match (self.in_playlist_mode, &self.search_query) {
            (true, _) => format!("Playlist: {}", playlist_name.unwrap_or("?")),
            (false, Some(query)) => format!("Search: {}", query),
            (false, None) => "Library".to_string(),
        };

        let mut summary = format!(
            "  {} tracks, {}",
            self.table.len(),
            format_duration(self.table.total_duration())
        );
        if self.table.selection_len() > 0 {
            summary.push_str(&format!(", {} selected", self.table.selection_len()));
        }

        let header = Line::from(vec![
            Span::styled(
                title,
                Style::default()
                    .fg(theme.accent_colour)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(summary, Style::default().fg(theme.table_time_fg)),
        ]);
        f.render_widget(Paragraph::new(header), chunks[0]);

        self.table.draw(f, chunks[1], theme);
    }
}
