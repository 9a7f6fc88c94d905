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
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding},
};

use crate::{
    components::playlists::PlaylistList,
    model::{PlaylistId, PlaylistKind},
    render::icons::{ICON_DYNAMIC, ICON_LIBRARY, ICON_STATIC},
    theme::Theme,
};

impl PlaylistList {
    /// Draws the sidebar. The entry for `current`, the playlist shown in the
    /// song table (or the library when `None`), is emphasised.
    pub(crate) fn draw(
        &mut self,
        f: &mut Frame,
        area: Rect,
        current: Option<PlaylistId>,
        focused: bool,
        theme: &Theme,
    ) {
        let entry_style = |is_current: bool| {
            if is_current {
                Style::default()
                    .fg(theme.accent_colour)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.table_track_fg)
            }
        };

        let library = ListItem::new(Line::from(vec![
            Span::raw(format!("{} ", ICON_LIBRARY)),
            Span::styled("Library", entry_style(current.is_none())),
        ]));

        let playlists = self.playlists.iter().map(|playlist| {
            let icon = match playlist.kind {
                PlaylistKind::Static => ICON_STATIC,
                PlaylistKind::Dynamic => ICON_DYNAMIC,
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", icon)),
                Span::styled(
                    playlist.name.as_str(),
                    entry_style(current.is_some() && playlist.id == current),
                ),
            ]))
        });

        let border_colour = if focused {
            theme.accent_colour
        } else {
            theme.border_colour
        };

        let list = List::new(std::iter::once(library).chain(playlists))
            .block(
                Block::default()
                    .borders(Borders::RIGHT)
                    .border_style(Style::default().fg(border_colour))
                    .padding(Padding::horizontal(1)),
            )
            .highlight_style(Style::default().bg(theme.highlight_bg).fg(Color::White));

        f.render_stateful_widget(list, area, &mut self.list_state);
    }
}
