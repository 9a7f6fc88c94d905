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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. Components draw themselves; this
//! module owns the layout and the parts of the screen that are not
//! components.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called after
//! every event.

mod commander;
pub(crate) mod icons;
mod player;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::{
    App, Focus,
    render::{commander::draw_commander, player::draw_player},
    theme::Theme,
};

const SIDEBAR_WIDTH: u16 = 24;

pub(crate) trait Render {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme);
}

/// Renders the user interface to the terminal frame.
///
/// The screen is split into the playlist sidebar and the song table, with
/// the player and the status line along the bottom.
///
/// The application state is borrowed mutably so that components can keep
/// their scroll positions and page sizes up to date.
pub(crate) fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(area);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(outer[0]);

    let shown_playlist = app
        .song_table
        .current_playlist_id
        .filter(|_| app.song_table.in_playlist_mode);

    app.playlist_list.draw(
        f,
        main[0],
        shown_playlist,
        app.focus == Focus::Sidebar,
        &app.theme,
    );

    let playlist_name = app.current_playlist_name().map(str::to_string);
    app.song_table
        .draw(f, main[1], playlist_name.as_deref(), &app.theme);

    draw_player(f, outer[1], app);

    draw_commander(f, outer[2], app);
}
