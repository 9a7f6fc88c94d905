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

//! Playlist sidebar.
//!
//! The sidebar lists a "Library" entry followed by every playlist. Activating
//! an entry switches the song table view to it.

mod render;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use ratatui::widgets::ListState;

use crate::{
    backend::PlaylistBackend,
    components::song_table::SongTableView,
    model::{Playlist, PlaylistId},
};

pub(crate) struct PlaylistList {
    playlists: Vec<Playlist>,
    list_state: ListState,
}

impl PlaylistList {
    pub(crate) fn new() -> Self {
        Self {
            playlists: vec![],
            list_state: ListState::default().with_selected(Some(0)),
        }
    }

    /// Replaces the listed playlists, keeping the highlighted playlist if it
    /// still exists.
    pub(crate) fn set_playlists(&mut self, playlists: Vec<Playlist>) {
        let highlighted = self.highlighted_playlist_id();
        self.playlists = playlists;

        let index = highlighted
            .and_then(|id| self.playlists.iter().position(|p| p.id == Some(id)))
            .map_or(0, |i| i + 1);
        self.list_state.select(Some(index));
    }

    pub(crate) fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub(crate) fn find(&self, id: PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == Some(id))
    }

    /// The highlighted playlist, or `None` when the library entry is
    /// highlighted.
    pub(crate) fn highlighted_playlist_id(&self) -> Option<PlaylistId> {
        let index = self.list_state.selected()?.checked_sub(1)?;
        self.playlists.get(index).and_then(|p| p.id)
    }

    fn entry_count(&self) -> usize {
        self.playlists.len() + 1
    }

    fn goto_next(&mut self) {
        let i = self.list_state.selected().map_or(0, |i| (i + 1) % self.entry_count());
        self.list_state.select(Some(i));
    }

    fn goto_previous(&mut self) {
        let i = match self.list_state.selected() {
            Some(0) | None => self.entry_count() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Shows the highlighted entry in the song table view.
    pub(crate) fn activate(
        &self,
        view: &mut SongTableView,
        backend: &mut impl PlaylistBackend,
    ) -> Result<()> {
        match self.highlighted_playlist_id() {
            Some(id) => view.show_playlist(id, backend),
            None => view.show_library(backend),
        }
    }

    /// Handles a key event, returning `false` if the key was not used.
    pub(crate) fn process_event(
        &mut self,
        event: &Event,
        view: &mut SongTableView,
        backend: &mut impl PlaylistBackend,
    ) -> Result<bool> {
        let Event::Key(key_event) = event else {
            return Ok(false);
        };

        match key_event.code {
            KeyCode::Char('j') | KeyCode::Down => self.goto_next(),
            KeyCode::Char('k') | KeyCode::Up => self.goto_previous(),
            KeyCode::Char('g') | KeyCode::Home => self.list_state.select(Some(0)),
            KeyCode::Char('G') | KeyCode::End => self.list_state.select(Some(self.entry_count() - 1)),
            KeyCode::Enter => self.activate(view, backend)?,
            _ => return Ok(false),
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    #[derive(Default)]
    struct RecordingBackend {
        selected: Vec<PlaylistId>,
        cleared: usize,
    }

    impl PlaylistBackend for RecordingBackend {
        fn set_current_playlist(&mut self, id: PlaylistId) -> Result<()> {
            self.selected.push(id);
            Ok(())
        }

        fn clear_current_playlist(&mut self) -> Result<()> {
            self.cleared += 1;
            Ok(())
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn playlist(id: i64, name: &str) -> Playlist {
        Playlist {
            id: Some(PlaylistId(id)),
            ..Playlist::new_static(name)
        }
    }

    #[test]
    fn test_enter_shows_playlist_or_library() {
        let mut list = PlaylistList::new();
        list.set_playlists(vec![playlist(4, "Chill"), playlist(9, "Road trip")]);

        let mut view = SongTableView::new();
        let mut backend = RecordingBackend::default();

        list.process_event(&key(KeyCode::Char('j')), &mut view, &mut backend).unwrap();
        list.process_event(&key(KeyCode::Char('j')), &mut view, &mut backend).unwrap();
        list.process_event(&key(KeyCode::Enter), &mut view, &mut backend).unwrap();

        assert!(view.in_playlist_mode);
        assert_eq!(view.current_playlist_id, Some(PlaylistId(9)));
        assert_eq!(backend.selected, vec![PlaylistId(9)]);

        list.process_event(&key(KeyCode::Char('j')), &mut view, &mut backend).unwrap();
        list.process_event(&key(KeyCode::Enter), &mut view, &mut backend).unwrap();

        assert!(!view.in_playlist_mode);
        assert_eq!(backend.cleared, 1);
    }

    #[test]
    fn test_highlight_survives_reload() {
        let mut list = PlaylistList::new();
        list.set_playlists(vec![playlist(4, "Chill"), playlist(9, "Road trip")]);
        list.goto_previous();
        assert_eq!(list.highlighted_playlist_id(), Some(PlaylistId(9)));

        list.set_playlists(vec![
            playlist(2, "Ambient"),
            playlist(4, "Chill"),
            playlist(9, "Road trip"),
        ]);
        assert_eq!(list.highlighted_playlist_id(), Some(PlaylistId(9)));

        list.set_playlists(vec![playlist(2, "Ambient")]);
        assert_eq!(list.highlighted_playlist_id(), None);
    }

    #[test]
    fn test_unhandled_key() {
        let mut list = PlaylistList::new();
        let mut view = SongTableView::new();
        let mut backend = RecordingBackend::default();
        assert!(!list.process_event(&key(KeyCode::Char('x')), &mut view, &mut backend).unwrap());
        assert!(list.find(PlaylistId(1)).is_none());
    }
}
