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

//! Application logic, event handling, and command dispatching.
//!
//! This module acts as the central hub for the "Controller" logic of the
//! application. Every input (key presses, worker replies, player updates and
//! ticks) arrives as an [`AppEvent`] on a single channel, is applied to the
//! [`App`] state, and the user interface is redrawn.
//!
//! # Organization
//!
//! * `handlers`: State updates for worker and player events.
//! * `key_handlers`: Routing of key presses by focus.
//! * `commands`: Execution of commands entered on the command line.

mod commands;
mod handlers;
mod key_handlers;

use handlers::*;

use std::io::Stdout;

use anyhow::{Result, anyhow};
use crossterm::event::KeyEvent;
use log::{error, info};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App,
    commander::Command,
    model::{Playlist, PlaylistId, Rating, TrackInfo},
    player::PlayerState,
    render::draw,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    RunCommand(Command),

    ScanStarted,
    ScanProgress(usize),
    ScanFinished { count: usize, errors: Vec<String> },
    ScanFailed(String),

    LibraryLoaded(Vec<TrackInfo>),
    SearchResultsReady(String, Vec<TrackInfo>),

    PlaylistsLoaded(Vec<Playlist>),
    PlaylistTracksLoaded(PlaylistId, Vec<TrackInfo>),
    PlaylistDeleted(PlaylistId),

    TrackRated(i64, Rating),

    PlayTrack(TrackInfo),

    PlayerStateChanged(PlayerState),
    TitleChanged(String),
    DurationChanged(u64),
    TimeChanged(f64),
    VolumeChanged(u32),
    TrackFinished,

    Tick,

    Status(String),
    Error(String),
    FatalError(String),

    ExitApplication,
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until an exit event is received or the event channel
/// is closed.
///
/// # Errors
///
/// Returns an error if drawing fails, or a worker reports a fatal error.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::ExitApplication => {
                info!("Exiting");
                break;
            }
            AppEvent::FatalError(message) => return Err(anyhow!(message)),
            event => {
                if let Err(e) = handle_event(app, event) {
                    error!("{:#}", e);
                    app.set_error(format!("{:#}", e));
                }
            }
        }

        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

/// Applies a single event to the application state.
fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => key_handlers::process_key_event(app, key)?,
        AppEvent::RunCommand(command) => commands::run_command(app, command)?,

        AppEvent::ScanStarted => handle_scan_started(app),
        AppEvent::ScanProgress(count) => handle_scan_progress(app, count),
        AppEvent::ScanFinished { count, errors } => handle_scan_finished(app, count, errors)?,
        AppEvent::ScanFailed(message) => handle_scan_failed(app, message),

        AppEvent::LibraryLoaded(tracks) => handle_library_loaded(app, tracks),
        AppEvent::SearchResultsReady(query, tracks) => handle_search_results_ready(app, query, tracks),

        AppEvent::PlaylistsLoaded(playlists) => handle_playlists_loaded(app, playlists),
        AppEvent::PlaylistTracksLoaded(id, tracks) => handle_playlist_tracks_loaded(app, id, tracks),
        AppEvent::PlaylistDeleted(id) => handle_playlist_deleted(app, id)?,

        AppEvent::TrackRated(durable_id, rating) => handle_track_rated(app, durable_id, rating),

        AppEvent::PlayTrack(track) => handle_play_track(app, track)?,

        AppEvent::PlayerStateChanged(state) => handle_player_state_changed(app, state),
        AppEvent::TitleChanged(title) => handle_title_changed(app, title),
        AppEvent::DurationChanged(duration) => handle_duration_changed(app, duration),
        AppEvent::TimeChanged(secs) => handle_time_changed(app, secs),
        AppEvent::VolumeChanged(volume) => handle_volume_changed(app, volume),
        AppEvent::TrackFinished => handle_track_finished(app)?,

        AppEvent::Status(message) => app.set_status(message),
        AppEvent::Error(message) => app.set_error(message),

        AppEvent::Tick | AppEvent::FatalError(_) | AppEvent::ExitApplication => {}
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        backend::Backend, components::track_table::test_track, config::AppConfig,
        player::AudioPlayer, tasks::AppTask,
    };
    use std::sync::mpsc::{self, Receiver};

    pub(crate) struct TestApp {
        pub(crate) app: App,
        pub(crate) task_rx: Receiver<AppTask>,
    }

    impl TestApp {
        pub(crate) fn new() -> Self {
            let (task_tx, task_rx) = mpsc::channel();
            let (command_tx, command_rx) = mpsc::channel();
            // Player commands are not inspected, the receiver only needs to
            // stay alive.
            std::mem::forget(command_rx);

            let app = App::from_parts(
                AppConfig::default(),
                Backend::new(task_tx),
                AudioPlayer::with_sender(command_tx),
            );
            Self { app, task_rx }
        }

        pub(crate) fn tasks(&self) -> Vec<AppTask> {
            self.task_rx.try_iter().collect()
        }
    }

    #[test]
    fn test_stale_playlist_tracks_are_ignored() {
        let mut test = TestApp::new();
        let app = &mut test.app;

        app.song_table.show_playlist(PlaylistId(1), &mut app.backend).unwrap();
        app.song_table.show_playlist(PlaylistId(2), &mut app.backend).unwrap();

        handle_event(app, AppEvent::PlaylistTracksLoaded(PlaylistId(1), vec![test_track(1)])).unwrap();
        assert_eq!(app.song_table.table.len(), 0);

        handle_event(app, AppEvent::PlaylistTracksLoaded(PlaylistId(2), vec![test_track(2)])).unwrap();
        assert_eq!(app.song_table.table.len(), 1);
    }

    #[test]
    fn test_deleting_current_playlist_shows_library() {
        let mut test = TestApp::new();
        let app = &mut test.app;

        app.song_table.show_playlist(PlaylistId(3), &mut app.backend).unwrap();
        handle_event(app, AppEvent::PlaylistDeleted(PlaylistId(3))).unwrap();

        assert!(!app.song_table.in_playlist_mode);
        assert_eq!(app.backend.current_playlist_id(), None);
        assert!(matches!(test.tasks().last(), Some(AppTask::LoadLibrary)));
    }

    #[test]
    fn test_track_finished_plays_next_in_queue() {
        let mut test = TestApp::new();
        let app = &mut test.app;

        app.queue.play_from(vec![test_track(1), test_track(2)], 0);
        handle_event(app, AppEvent::TrackFinished).unwrap();

        let tasks = test.tasks();
        assert!(matches!(tasks.as_slice(), [AppTask::PlayTrack(t)] if t.track_id == 2));

        let app = &mut test.app;
        handle_event(app, AppEvent::TrackFinished).unwrap();
        assert!(app.now_playing.is_none());
        assert!(test.tasks().is_empty());
    }

    #[test]
    fn test_scan_events_update_catalog_and_status() {
        let mut test = TestApp::new();
        let app = &mut test.app;

        handle_event(app, AppEvent::ScanStarted).unwrap();
        handle_event(app, AppEvent::ScanProgress(25)).unwrap();
        assert_eq!(app.catalog.summary().as_deref(), Some("Scanning... 25 files"));

        handle_event(
            app,
            AppEvent::ScanFinished {
                count: 30,
                errors: vec!["/music/bad.mp3: unreadable".to_string()],
            },
        )
        .unwrap();
        assert_eq!(
            app.catalog.summary().as_deref(),
            Some("Scan finished, 30 tracks, 1 skipped")
        );
    }

    #[test]
    fn test_worker_errors_are_shown() {
        let mut test = TestApp::new();
        let app = &mut test.app;

        handle_event(app, AppEvent::Error("unknown search field 'mood'".to_string())).unwrap();

        let status = app.status.as_ref().unwrap();
        assert!(status.is_error);
        assert_eq!(status.text, "unknown search field 'mood'");
    }

    #[test]
    fn test_scan_finished_reloads_shown_playlist() {
        let mut test = TestApp::new();
        let app = &mut test.app;
        app.song_table.show_playlist(PlaylistId(5), &mut app.backend).unwrap();
        test.tasks();

        handle_event(&mut test.app, AppEvent::ScanFinished { count: 1, errors: vec![] }).unwrap();

        let tasks = test.tasks();
        assert!(matches!(tasks.as_slice(), [AppTask::LoadPlaylistTracks(PlaylistId(5))]));
    }
}
