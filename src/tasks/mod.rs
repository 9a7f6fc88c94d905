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

//! Asynchronous application task processing.
//!
//! This module implements the command pattern used to offload tasks such as
//! potentially blocking database queries from the main UI thread. It provides
//! a dedicated worker loop that translates [`AppTask`] requests into database
//! operations and broadcasts the results back to the application via
//! [`AppEvent`]s.
//!
//! Only actions that may block, or may take more than a trivial amount of time
//! to process, should be implemented as tasks. Other actions are likely more
//! suited to events.

mod handlers;

use anyhow::{Context, Result};
use log::{debug, error};
use rusqlite::Connection;
use std::{
    sync::{
        Arc,
        atomic::AtomicBool,
        mpsc::{Receiver, Sender},
    },
    thread,
};

use crate::{
    config::AppConfig,
    db,
    events::AppEvent,
    model::{Playlist, PlaylistId, Rating, TrackInfo},
};

#[derive(Debug)]
pub(crate) enum AppTask {
    /// Rebuilds the catalog from the given media directories.
    ScanCatalog(Vec<String>),

    LoadLibrary,
    Search(String),

    LoadPlaylists,
    LoadPlaylistTracks(PlaylistId),
    CreatePlaylist(Playlist),
    DeletePlaylist(PlaylistId),
    /// Appends tracks, by durable id, to the static playlist with the given
    /// name.
    AddTracksToPlaylist(String, Vec<i64>),
    RemoveTracksFromPlaylist(PlaylistId, Vec<i64>),

    PlayTrack(TrackInfo),
    RateTrack(TrackInfo, Rating),
}

/// Spawns a background thread to process application tasks.
///
/// This worker thread initializes its own database connection and enters
/// a blocking loop, listening for incoming [`AppTask`]s. A failing task is
/// reported as [`AppEvent::Error`] and the loop carries on.
///
/// # Arguments
///
/// * `config` - The application configuration, naming the database file.
/// * `scanning` - Flag raised while a library scan is in progress, cleared by
///   the worker when the scan ends.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_task_worker(
    config: AppConfig,
    scanning: Arc<AtomicBool>,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) {
    thread::spawn(move || {
        let mut conn = match db::init_db(&config.database_file)
            .with_context(|| format!("Failed to initialise database {}", config.database_file))
        {
            Ok(conn) => conn,
            Err(e) => {
                error!("{:#}", e);
                let _ = event_tx.send(AppEvent::FatalError(format!("{:#}", e)));
                return;
            }
        };

        while let Ok(task) = task_rx.recv() {
            debug!("Processing task {:?}", task);

            let mut ctx = TaskContext {
                scanning: &scanning,
                event_tx: &event_tx,
                conn: &mut conn,
            };

            if let Err(e) = handle_task(task, &mut ctx) {
                error!("Task failed: {:#}", e);
                let _ = event_tx.send(AppEvent::Error(format!("{:#}", e)));
            }
        }

        debug!("Task worker finished");
    });
}

/// Bundles shared resources required by task handlers to simplify resource
/// passing when invoking those handler functions.
pub(crate) struct TaskContext<'a> {
    scanning: &'a AtomicBool,
    event_tx: &'a Sender<AppEvent>,
    conn: &'a mut Connection,
}

/// Orchestrates the execution of a single task.
///
/// The handler for each task sends its result back through the application
/// event channel.
fn handle_task(task: AppTask, ctx: &mut TaskContext) -> Result<()> {
    match task {
        AppTask::ScanCatalog(dirs) => handlers::scan_catalog(ctx, &dirs),

        AppTask::LoadLibrary => handlers::load_library(ctx),
        AppTask::Search(query) => handlers::search(ctx, &query),

        AppTask::LoadPlaylists => handlers::load_playlists(ctx),
        AppTask::LoadPlaylistTracks(id) => handlers::load_playlist_tracks(ctx, id),
        AppTask::CreatePlaylist(playlist) => handlers::create_playlist(ctx, playlist),
        AppTask::DeletePlaylist(id) => handlers::delete_playlist(ctx, id),
        AppTask::AddTracksToPlaylist(name, ids) => handlers::add_tracks_to_playlist(ctx, &name, &ids),
        AppTask::RemoveTracksFromPlaylist(id, ids) => {
            handlers::remove_tracks_from_playlist(ctx, id, &ids)
        }

        AppTask::PlayTrack(track) => handlers::play_track(ctx, track),
        AppTask::RateTrack(track, rating) => handlers::rate_track(ctx, track, rating),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_test_track, test_connection};
    use crate::model::PlaylistKind;
    use std::sync::{atomic::Ordering, mpsc};

    struct Fixture {
        scanning: AtomicBool,
        conn: Connection,
        event_tx: Sender<AppEvent>,
        event_rx: Receiver<AppEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            let conn = test_connection();
            insert_test_track(&conn, "Pink Floyd", "Animals", "Dogs", Some(1977), Some("Rock"));
            insert_test_track(&conn, "Miles Davis", "Kind of Blue", "So What", Some(1959), Some("Jazz"));

            let (event_tx, event_rx) = mpsc::channel();
            Self {
                scanning: AtomicBool::new(false),
                conn,
                event_tx,
                event_rx,
            }
        }

        fn run(&mut self, task: AppTask) -> Result<()> {
            let mut ctx = TaskContext {
                scanning: &self.scanning,
                event_tx: &self.event_tx,
                conn: &mut self.conn,
            };
            handle_task(task, &mut ctx)
        }

        fn events(&self) -> Vec<AppEvent> {
            self.event_rx.try_iter().collect()
        }
    }

    #[test]
    fn test_search_sends_results() {
        let mut fixture = Fixture::new();
        fixture.run(AppTask::Search("genre:jazz".to_string())).unwrap();

        let events = fixture.events();
        assert!(matches!(
            events.as_slice(),
            [AppEvent::SearchResultsReady(query, tracks)] if query == "genre:jazz" && tracks.len() == 1
        ));
    }

    #[test]
    fn test_invalid_search_is_an_error() {
        let mut fixture = Fixture::new();
        assert!(fixture.run(AppTask::Search("(".to_string())).is_err());
        assert!(fixture.events().is_empty());
    }

    #[test]
    fn test_create_and_fill_playlist() {
        let mut fixture = Fixture::new();
        fixture
            .run(AppTask::CreatePlaylist(Playlist::new_static("Mix")))
            .unwrap();

        let durable_ids: Vec<i64> = db::fetch_all_tracks(&fixture.conn)
            .unwrap()
            .iter()
            .map(|t| t.durable_id)
            .collect();
        fixture
            .run(AppTask::AddTracksToPlaylist("mix".to_string(), durable_ids))
            .unwrap();

        let events = fixture.events();
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::PlaylistsLoaded(playlists) if playlists.len() == 1
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::Status(message) if message == "Added 2 tracks to Mix"
        )));
    }

    #[test]
    fn test_add_to_missing_playlist_is_an_error() {
        let mut fixture = Fixture::new();
        let err = fixture
            .run(AppTask::AddTracksToPlaylist("Nope".to_string(), vec![1]))
            .unwrap_err();
        assert_eq!(err.to_string(), "No playlist named Nope");
    }

    #[test]
    fn test_scan_clears_flag_and_reports() {
        let mut fixture = Fixture::new();
        fixture.scanning.store(true, Ordering::SeqCst);

        fixture.run(AppTask::ScanCatalog(vec![])).unwrap();

        assert!(!fixture.scanning.load(Ordering::SeqCst));
        let events = fixture.events();
        assert!(matches!(events.first(), Some(AppEvent::ScanStarted)));
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::ScanFinished { count: 0, errors } if errors.is_empty()
        )));
        assert!(events.iter().any(|e| matches!(e, AppEvent::LibraryLoaded(tracks) if tracks.is_empty())));
    }

    #[test]
    fn test_play_track_counts_play() {
        let mut fixture = Fixture::new();
        let track = db::fetch_all_tracks(&fixture.conn).unwrap().remove(0);
        let track_id = track.track_id;

        fixture.run(AppTask::PlayTrack(track)).unwrap();

        assert_eq!(db::fetch_track_info(&fixture.conn, track_id).unwrap().play_count, 1);
        assert!(matches!(
            fixture.events().as_slice(),
            [AppEvent::PlayTrack(t)] if t.play_count == 1 && t.last_played.is_some()
        ));
    }

    #[test]
    fn test_dynamic_playlist_is_redefined_by_name() {
        let mut fixture = Fixture::new();
        fixture
            .run(AppTask::CreatePlaylist(Playlist::new_dynamic("Era", "year:1970s")))
            .unwrap();
        fixture
            .run(AppTask::CreatePlaylist(Playlist::new_dynamic("era", "year:1950s")))
            .unwrap();

        let events = fixture.events();
        let last_tracks = events.iter().rev().find_map(|e| match e {
            AppEvent::PlaylistTracksLoaded(_, tracks) => Some(tracks),
            _ => None,
        });
        assert_eq!(last_tracks.map(|t| t[0].track_title.as_str()), Some("So What"));
        assert_eq!(crate::db::playlists::count(&fixture.conn).unwrap(), 1);
    }

    #[test]
    fn test_dynamic_playlist_cannot_replace_static() {
        let mut fixture = Fixture::new();
        fixture
            .run(AppTask::CreatePlaylist(Playlist::new_static("Mix")))
            .unwrap();

        let err = fixture
            .run(AppTask::CreatePlaylist(Playlist::new_dynamic("mix", "year:1970s")))
            .unwrap_err();

        assert_eq!(err.to_string(), "Playlist 'Mix' is static, choose another name");
        let found = crate::db::playlists::find_by_name(&fixture.conn, "Mix")
            .unwrap()
            .unwrap();
        assert_eq!(found.kind, PlaylistKind::Static);
        assert!(found.query.is_empty());
        assert_eq!(crate::db::playlists::count(&fixture.conn).unwrap(), 1);
    }

    #[test]
    fn test_invalid_dynamic_query_is_rejected() {
        let mut fixture = Fixture::new();
        let err = fixture
            .run(AppTask::CreatePlaylist(Playlist::new_dynamic("Bad", "mood:calm")))
            .unwrap_err();

        assert!(format!("{:#}", err).starts_with("Invalid query for playlist 'Bad'"));
        assert_eq!(crate::db::playlists::count(&fixture.conn).unwrap(), 0);
    }
}
