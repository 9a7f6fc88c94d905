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

//! The main song table view.
//!
//! The view shows one of three lists of songs: the whole library, the
//! contents of a single playlist, or the results of a search. Switching
//! between them goes through the [`PlaylistBackend`], which fetches the
//! matching tracks in the background; the tracks arrive later as events and
//! are applied here.

mod render;

use anyhow::Result;
use log::debug;

use crate::{
    backend::PlaylistBackend,
    components::track_table::TrackTable,
    model::{PlaylistId, TrackInfo},
};

pub(crate) struct SongTableView {
    /// Whether the view is showing a playlist rather than the library.
    pub(crate) in_playlist_mode: bool,
    pub(crate) current_playlist_id: Option<PlaylistId>,
    /// The query behind the displayed search results, if any.
    pub(crate) search_query: Option<String>,
    pub(crate) table: TrackTable,
}

impl SongTableView {
    pub(crate) fn new() -> Self {
        Self {
            in_playlist_mode: false,
            current_playlist_id: None,
            search_query: None,
            table: TrackTable::new(),
        }
    }

    /// Switches the view to a playlist.
    ///
    /// The view enters playlist mode and records the playlist as current
    /// before the backend is asked, exactly once, to select it. The playlist
    /// id is not validated.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, if any. The view has already switched to
    /// the playlist at that point.
    pub(crate) fn show_playlist(
        &mut self,
        playlist_id: PlaylistId,
        backend: &mut impl PlaylistBackend,
    ) -> Result<()> {
        self.in_playlist_mode = true;
        self.current_playlist_id = Some(playlist_id);
        backend.set_current_playlist(playlist_id)
    }

    /// Switches the view back to the whole library.
    pub(crate) fn show_library(&mut self, backend: &mut impl PlaylistBackend) -> Result<()> {
        self.in_playlist_mode = false;
        self.current_playlist_id = None;
        self.search_query = None;
        backend.clear_current_playlist()
    }

    pub(crate) fn show_search_results(&mut self, query: String, tracks: Vec<TrackInfo>) {
        self.in_playlist_mode = false;
        self.current_playlist_id = None;
        self.search_query = Some(query);
        self.table.set_tracks(tracks);
    }

    /// Applies the tracks of a playlist.
    ///
    /// The tracks are dropped, returning `false`, unless `playlist_id` is
    /// still the current playlist.
    pub(crate) fn apply_playlist_tracks(
        &mut self,
        playlist_id: PlaylistId,
        tracks: Vec<TrackInfo>,
    ) -> bool {
        if !self.in_playlist_mode || self.current_playlist_id != Some(playlist_id) {
            debug!("Dropping tracks for playlist {}, no longer current", playlist_id);
            return false;
        }

        self.search_query = None;
        self.table.set_tracks(tracks);
        true
    }

    /// Applies the whole library, unless a playlist or search results are
    /// being shown.
    pub(crate) fn apply_library_tracks(&mut self, tracks: Vec<TrackInfo>) -> bool {
        if self.in_playlist_mode || self.search_query.is_some() {
            return false;
        }

        self.table.set_tracks(tracks);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::track_table::test_track;
    use anyhow::bail;

    #[derive(Debug, PartialEq)]
    enum Call {
        Set(PlaylistId),
        Clear,
    }

    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<Call>,
        fail: bool,
    }

    impl PlaylistBackend for RecordingBackend {
        fn set_current_playlist(&mut self, id: PlaylistId) -> Result<()> {
            self.calls.push(Call::Set(id));
            if self.fail {
                bail!("worker gone");
            }
            Ok(())
        }

        fn clear_current_playlist(&mut self) -> Result<()> {
            self.calls.push(Call::Clear);
            Ok(())
        }
    }

    #[test]
    fn test_show_playlist() {
        for value in [i64::MIN, -1, 0, 1, 42, i64::MAX] {
            let id = PlaylistId(value);
            let mut view = SongTableView::new();
            let mut backend = RecordingBackend::default();

            view.show_playlist(id, &mut backend).unwrap();

            assert!(view.in_playlist_mode);
            assert_eq!(view.current_playlist_id, Some(id));
            assert_eq!(backend.calls, vec![Call::Set(id)]);
        }
    }

    #[test]
    fn test_show_playlist_replaces_previous_playlist() {
        let mut view = SongTableView::new();
        let mut backend = RecordingBackend::default();

        view.show_playlist(PlaylistId(1), &mut backend).unwrap();
        view.show_playlist(PlaylistId(2), &mut backend).unwrap();

        assert_eq!(view.current_playlist_id, Some(PlaylistId(2)));
        assert_eq!(
            backend.calls,
            vec![Call::Set(PlaylistId(1)), Call::Set(PlaylistId(2))]
        );
    }

    #[test]
    fn test_show_playlist_updates_view_before_backend_error() {
        let mut view = SongTableView::new();
        let mut backend = RecordingBackend {
            fail: true,
            ..RecordingBackend::default()
        };

        assert!(view.show_playlist(PlaylistId(3), &mut backend).is_err());

        assert!(view.in_playlist_mode);
        assert_eq!(view.current_playlist_id, Some(PlaylistId(3)));
        assert_eq!(backend.calls, vec![Call::Set(PlaylistId(3))]);
    }

    #[test]
    fn test_show_library_leaves_playlist_mode() {
        let mut view = SongTableView::new();
        let mut backend = RecordingBackend::default();

        view.show_playlist(PlaylistId(5), &mut backend).unwrap();
        view.show_library(&mut backend).unwrap();

        assert!(!view.in_playlist_mode);
        assert_eq!(view.current_playlist_id, None);
        assert_eq!(backend.calls, vec![Call::Set(PlaylistId(5)), Call::Clear]);
    }

    #[test]
    fn test_stale_playlist_tracks_are_dropped() {
        let mut view = SongTableView::new();
        let mut backend = RecordingBackend::default();

        view.show_playlist(PlaylistId(1), &mut backend).unwrap();
        view.show_playlist(PlaylistId(2), &mut backend).unwrap();

        assert!(!view.apply_playlist_tracks(PlaylistId(1), vec![test_track(1)]));
        assert_eq!(view.table.len(), 0);

        assert!(view.apply_playlist_tracks(PlaylistId(2), vec![test_track(2), test_track(3)]));
        assert_eq!(view.table.len(), 2);

        view.show_library(&mut backend).unwrap();
        assert!(!view.apply_playlist_tracks(PlaylistId(2), vec![]));
        assert_eq!(view.table.len(), 2);
    }

    #[test]
    fn test_library_tracks_only_apply_in_library_mode() {
        let mut view = SongTableView::new();
        let mut backend = RecordingBackend::default();

        assert!(view.apply_library_tracks(vec![test_track(1)]));

        view.show_search_results("genre:jazz".to_string(), vec![test_track(2), test_track(3)]);
        assert!(!view.apply_library_tracks(vec![test_track(1)]));
        assert_eq!(view.table.len(), 2);

        view.show_playlist(PlaylistId(1), &mut backend).unwrap();
        assert!(!view.apply_library_tracks(vec![test_track(1)]));
    }

    #[test]
    fn test_search_results_leave_playlist_mode() {
        let mut view = SongTableView::new();
        let mut backend = RecordingBackend::default();

        view.show_playlist(PlaylistId(1), &mut backend).unwrap();
        view.show_search_results("floyd".to_string(), vec![test_track(1)]);

        assert!(!view.in_playlist_mode);
        assert_eq!(view.current_playlist_id, None);
        assert!(!view.apply_playlist_tracks(PlaylistId(1), vec![]));
    }
}
