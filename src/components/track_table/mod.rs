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

//! Interactive track table widget and state management.
//!
//! This module provides a reusable table component for displaying and
//! selecting tracks. The highlighted row is tracked by the Ratatui
//! [`TableState`], while the multi-row selection is kept separately as a set
//! of track ids so it survives scrolling.

mod event;
mod render;

use std::collections::HashSet;

use ratatui::widgets::TableState;

use crate::model::{Rating, TrackInfo};

/// Rows moved by a page when the table has not been drawn yet.
const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum TrackTableAction {
    /// The highlighted row, by index, was activated.
    ActivateCurrent(usize),
}

pub(crate) struct TrackTable {
    tracks: Vec<TrackInfo>,
    selection: HashSet<i64>,
    table_state: TableState,
    page_size: usize,
}

impl TrackTable {
    pub(crate) fn new() -> Self {
        Self {
            tracks: vec![],
            selection: HashSet::new(),
            table_state: TableState::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Replaces the table contents, clearing the selection and highlighting
    /// the first row.
    pub(crate) fn set_tracks(&mut self, tracks: Vec<TrackInfo>) {
        self.tracks = tracks;
        self.selection.clear();
        *self.table_state.offset_mut() = 0;
        self.table_state
            .select(if self.tracks.is_empty() { None } else { Some(0) });
    }

    pub(crate) fn tracks(&self) -> &[TrackInfo] {
        &self.tracks
    }

    pub(crate) fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Total running time of every track in the table, in seconds.
    pub(crate) fn total_duration(&self) -> u64 {
        self.tracks
            .iter()
            .map(|t| u64::try_from(t.duration).unwrap_or(0))
            .sum()
    }

    pub(crate) fn highlighted(&self) -> Option<usize> {
        self.table_state.selected().filter(|&i| i < self.tracks.len())
    }

    pub(crate) fn highlighted_track(&self) -> Option<&TrackInfo> {
        self.highlighted().and_then(|i| self.tracks.get(i))
    }

    pub(crate) fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// The selected tracks in table order, or the highlighted track when
    /// nothing is selected.
    pub(crate) fn selected_tracks(&self) -> Vec<&TrackInfo> {
        if self.selection.is_empty() {
            return self.highlighted_track().into_iter().collect();
        }

        self.tracks
            .iter()
            .filter(|t| self.selection.contains(&t.track_id))
            .collect()
    }

    /// Records a new rating on every row for the given file.
    pub(crate) fn update_rating(&mut self, durable_id: i64, rating: Rating) {
        for track in self.tracks.iter_mut().filter(|t| t.durable_id == durable_id) {
            track.rating = rating;
        }
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn goto(&mut self, index: usize) {
        if !self.tracks.is_empty() {
            self.table_state.select(Some(index.min(self.tracks.len() - 1)));
        }
    }

    fn goto_next(&mut self) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_previous(&mut self) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    fn goto_first(&mut self) {
        self.goto(0);
    }

    fn goto_last(&mut self) {
        self.goto(self.tracks.len().saturating_sub(1));
    }

    fn goto_high(&mut self) {
        self.goto(self.table_state.offset());
    }

    fn goto_middle(&mut self) {
        let visible = self.page_size.min(self.tracks.len().saturating_sub(self.table_state.offset()));
        self.goto(self.table_state.offset() + visible.saturating_sub(1) / 2);
    }

    fn goto_low(&mut self) {
        self.goto(self.table_state.offset() + self.page_size.saturating_sub(1));
    }

    fn move_by(&mut self, delta: isize) {
        let current = self.table_state.selected().unwrap_or(0);
        self.goto(current.saturating_add_signed(delta));
    }

    fn goto_page_forward(&mut self) {
        self.move_by(self.page_size as isize);
    }

    fn goto_page_back(&mut self) {
        self.move_by(-(self.page_size as isize));
    }

    fn goto_half_page_forward(&mut self) {
        self.move_by((self.page_size / 2) as isize);
    }

    fn goto_half_page_back(&mut self) {
        self.move_by(-((self.page_size / 2) as isize));
    }

    fn toggle_select_current(&mut self) {
        if let Some(track) = self.highlighted_track() {
            let track_id = track.track_id;
            if !self.selection.insert(track_id) {
                self.selection.remove(&track_id);
            }
        }
    }

    fn select_all(&mut self) {
        self.selection.extend(self.tracks.iter().map(|t| t.track_id));
    }

    fn select_inverse(&mut self) {
        for track in self.tracks.iter() {
            let track_id = track.track_id;
            if !self.selection.insert(track_id) {
                self.selection.remove(&track_id);
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn test_track(id: i64) -> TrackInfo {
    TrackInfo {
        track_id: id,
        durable_id: id * 100,
        track_number: Some(id),
        track_title: format!("Track {}", id),
        artist_name: "Artist".to_string(),
        album_title: "Album".to_string(),
        duration: 60,
        genre: None,
        year: None,
        bitrate: None,
        filename: format!("/music/{}.mp3", id),
        play_count: 0,
        rating: Rating::Neutral,
        last_played: None,
    }
}
