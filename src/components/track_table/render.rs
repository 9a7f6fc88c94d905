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

//! UI rendering logic for the track table.
//!
//! This module handles the visual representation of track data, including
//! column layout, selection highlighting, and theme application using the
//! Ratatui widget system.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Cell, Row, Table},
};

use crate::{
    components::track_table::TrackTable,
    model::Rating,
    render::{
        Render,
        icons::{THUMB_DOWN, THUMB_UP},
    },
    theme::Theme,
    util::format::format_time,
};

/// Header row plus its bottom margin.
const HEADER_HEIGHT: u16 = 2;

impl Render for TrackTable {
    fn draw(&mut self, f: &mut Frame, area: Rect, theme: &Theme) {
        self.page_size = usize::from(area.height.saturating_sub(HEADER_HEIGHT).max(1));

        let rows = self.tracks.iter().map(|item| {
            let selection_indicator = if self.selection.contains(&item.track_id) {
                Line::from("+").style(Style::default().fg(Color::Black).bg(theme.accent_colour))
            } else {
                Line::from("")
            };

            let time = format_time(u64::try_from(item.duration).unwrap_or(0));

            let track_number = item
                .track_number
                .map(|n| format!("{:02}", n))
                .unwrap_or_default();

            let year = item.year.map(|y| y.to_string()).unwrap_or_default();

            let rating = match item.rating {
                Rating::Like => THUMB_UP,
                Rating::Neutral => "",
                Rating::Dislike => THUMB_DOWN,
            };

            Row::new(vec![
                Cell::from(selection_indicator),
                Cell::from(Line::from(time).style(Style::default().fg(theme.table_time_fg)).alignment(Alignment::Right)),
                Cell::from(""),
                Cell::from(Line::from(item.artist_name.as_str()).style(Style::default().fg(theme.table_artist_fg))),
                Cell::from(Line::from(item.album_title.as_str()).style(Style::default().fg(theme.table_album_fg))),
                Cell::from(Line::from(year).style(Style::default().fg(theme.table_year_fg))),
                Cell::from(Line::from(track_number).style(Style::default().fg(theme.table_track_number_fg)).alignment(Alignment::Right)),
                Cell::from(Line::from(item.track_title.as_str()).style(Style::default().fg(theme.table_track_fg))),
                Cell::from(Line::from(item.play_count.to_string()).style(Style::default().fg(theme.table_time_fg)).alignment(Alignment::Right)),
                Cell::from(Line::from(rating)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Length(6),
                Constraint::Length(1),
                Constraint::Percentage(20),
                Constraint::Percentage(25),
                Constraint::Length(4),
                Constraint::Length(5),
                Constraint::Percentage(55),
                Constraint::Length(5),
                Constraint::Length(2),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from(""),
                Cell::from(Line::from("Time").alignment(Alignment::Right)),
                Cell::from(""),
                Cell::from("Artist"),
                Cell::from("Album"),
                Cell::from("Year"),
                Cell::from(Line::from("Track").alignment(Alignment::Right)),
                Cell::from("Title"),
                Cell::from(Line::from("Plays").alignment(Alignment::Right)),
                Cell::from(""),
            ])
            .style(Style::default().bold().fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(Style::default().bg(theme.highlight_bg).fg(Color::White))
        .block(Block::default());

        f.render_stateful_widget(table, area, &mut self.table_state);
    }
}
