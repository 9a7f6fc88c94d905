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

use anyhow::{Result, bail};
use log::info;

use crate::{
    App,
    commander::Command,
    config,
    events::AppEvent,
    model::{Playlist, PlaylistKind},
};

/// Executes a command entered on the command line.
///
/// # Errors
///
/// Returns an error, shown on the status line, if the command cannot be
/// carried out in the current state.
pub(super) fn run_command(app: &mut App, command: Command) -> Result<()> {
    info!("Running command {:?}", command);

    match command {
        Command::Quit => app.event_tx.send(AppEvent::ExitApplication)?,

        Command::Scan => scan(app)?,
        Command::AddMediaDir(dir) => add_media_dir(app, &dir)?,

        Command::Find(query) => app.backend.search(&query)?,
        Command::Library => app.song_table.show_library(&mut app.backend)?,

        Command::NewPlaylist(name) => app.backend.create_playlist(Playlist::new_static(name))?,
        Command::NewDynamicPlaylist { name, query } => {
            app.backend.create_playlist(Playlist::new_dynamic(name, query))?
        }
        Command::DeletePlaylist => delete_playlist(app)?,

        Command::AddToPlaylist(name) => add_to_playlist(app, &name)?,
        Command::RemoveFromPlaylist => remove_from_playlist(app)?,

        Command::Shuffle => {
            app.queue.shuffle();
            app.set_status(format!("Shuffled {} tracks", app.queue.len()));
        }
    }

    Ok(())
}

fn scan(app: &mut App) -> Result<()> {
    if app.config.media_dirs.is_empty() {
        bail!("No media directories, add one with lib <dir>");
    }

    if app.backend.scan_library(&app.config.media_dirs)? {
        app.set_status("Scan started".to_string());
    } else {
        app.set_status("Scan already in progress".to_string());
    }

    Ok(())
}

fn add_media_dir(app: &mut App, dir: &str) -> Result<()> {
    if !app.config.add_media_dir(dir)? {
        app.set_status(format!("{} is already in the library", dir));
        return Ok(());
    }

    config::save_config(&app.config)?;
    app.set_status(format!("Added {}, run scan to update the library", dir));

    Ok(())
}

fn delete_playlist(app: &mut App) -> Result<()> {
    let Some(id) = app.song_table.current_playlist_id else {
        bail!("No playlist selected");
    };

    app.backend.delete_playlist(id)
}

fn add_to_playlist(app: &mut App, name: &str) -> Result<()> {
    let durable_ids: Vec<i64> = app
        .song_table
        .table
        .selected_tracks()
        .iter()
        .map(|t| t.durable_id)
        .collect();

    if durable_ids.is_empty() {
        bail!("No tracks selected");
    }

    app.backend.add_tracks_to_playlist(name, durable_ids)?;
    app.song_table.table.clear_selection();

    Ok(())
}

fn remove_from_playlist(app: &mut App) -> Result<()> {
    let Some(id) = app
        .song_table
        .current_playlist_id
        .filter(|_| app.song_table.in_playlist_mode)
    else {
        bail!("No playlist selected");
    };

    match app.playlist_list.find(id).map(|p| p.kind) {
        Some(PlaylistKind::Static) => {}
        Some(PlaylistKind::Dynamic) => bail!("Tracks cannot be removed from a dynamic playlist"),
        None => bail!("No playlist selected"),
    }

    let durable_ids: Vec<i64> = app
        .song_table
        .table
        .selected_tracks()
        .iter()
        .map(|t| t.durable_id)
        .collect();

    if durable_ids.is_empty() {
        bail!("No tracks selected");
    }

    app.backend.remove_tracks_from_playlist(id, durable_ids)?;
    app.song_table.table.clear_selection();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::track_table::test_track, events::tests::TestApp, model::PlaylistId,
        tasks::AppTask,
    };
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn playlists() -> Vec<Playlist> {
        vec![
            Playlist {
                id: Some(PlaylistId(1)),
                ..Playlist::new_static("Mix")
            },
            Playlist {
                id: Some(PlaylistId(2)),
                ..Playlist::new_dynamic("Old", "year:<1980")
            },
        ]
    }

    #[test]
    fn test_scan_without_media_dirs() {
        let mut test = TestApp::new();

        let err = run_command(&mut test.app, Command::Scan).unwrap_err();

        assert_eq!(err.to_string(), "No media directories, add one with lib <dir>");
        assert!(test.tasks().is_empty());
    }

    #[test]
    fn test_second_scan_reports_in_progress() {
        let mut test = TestApp::new();
        test.app.config.media_dirs = vec!["/music".to_string()];

        run_command(&mut test.app, Command::Scan).unwrap();
        run_command(&mut test.app, Command::Scan).unwrap();

        assert_eq!(test.app.status.as_ref().unwrap().text, "Scan already in progress");
        assert_eq!(test.tasks().len(), 1);
    }

    #[test]
    fn test_add_missing_media_dir() {
        let mut test = TestApp::new();

        let result = run_command(
            &mut test.app,
            Command::AddMediaDir("/no/such/playworks/dir".to_string()),
        );

        assert!(result.is_err());
        assert!(test.app.config.media_dirs.is_empty());
    }

    #[test]
    fn test_find_sends_search() {
        let mut test = TestApp::new();

        run_command(&mut test.app, Command::Find("artist:beck".to_string())).unwrap();

        let tasks = test.tasks();
        assert!(matches!(tasks.as_slice(), [AppTask::Search(q)] if q == "artist:beck"));
    }

    #[test]
    fn test_new_dynamic_playlist() {
        let mut test = TestApp::new();

        run_command(
            &mut test.app,
            Command::NewDynamicPlaylist {
                name: "Loved".to_string(),
                query: "rating:like".to_string(),
            },
        )
        .unwrap();

        let tasks = test.tasks();
        assert!(matches!(
            tasks.as_slice(),
            [AppTask::CreatePlaylist(p)] if p.name == "Loved" && p.kind == PlaylistKind::Dynamic
        ));
    }

    #[test]
    fn test_delete_needs_current_playlist() {
        let mut test = TestApp::new();

        assert!(run_command(&mut test.app, Command::DeletePlaylist).is_err());

        let app = &mut test.app;
        app.song_table.show_playlist(PlaylistId(4), &mut app.backend).unwrap();
        test.tasks();

        run_command(&mut test.app, Command::DeletePlaylist).unwrap();
        let tasks = test.tasks();
        assert!(matches!(tasks.as_slice(), [AppTask::DeletePlaylist(PlaylistId(4))]));
    }

    #[test]
    fn test_add_selected_tracks_to_playlist() {
        let mut test = TestApp::new();
        let app = &mut test.app;
        app.song_table.table.set_tracks(vec![test_track(1), test_track(2), test_track(3)]);
        // Select the first and last rows.
        for code in [KeyCode::Char(' '), KeyCode::Char('j'), KeyCode::Char(' ')] {
            app.song_table.table.process_event(&key(code));
        }

        run_command(app, Command::AddToPlaylist("Mix".to_string())).unwrap();

        assert_eq!(test.app.song_table.table.selection_len(), 0);
        let tasks = test.tasks();
        match tasks.as_slice() {
            [AppTask::AddTracksToPlaylist(name, ids)] => {
                assert_eq!(name, "Mix");
                let mut ids = ids.clone();
                ids.sort();
                assert_eq!(ids, vec![100, 300]);
            }
            other => panic!("unexpected tasks {:?}", other),
        }
    }

    #[test]
    fn test_add_highlighted_track_when_nothing_selected() {
        let mut test = TestApp::new();
        test.app.song_table.table.set_tracks(vec![test_track(5)]);

        run_command(&mut test.app, Command::AddToPlaylist("Mix".to_string())).unwrap();

        let tasks = test.tasks();
        assert!(matches!(tasks.as_slice(), [AppTask::AddTracksToPlaylist(_, ids)] if *ids == vec![500]));
    }

    #[test]
    fn test_remove_from_static_playlist() {
        let mut test = TestApp::new();
        let app = &mut test.app;
        app.playlist_list.set_playlists(playlists());
        app.song_table.show_playlist(PlaylistId(1), &mut app.backend).unwrap();
        app.song_table
            .apply_playlist_tracks(PlaylistId(1), vec![test_track(1), test_track(2)]);
        test.tasks();

        run_command(&mut test.app, Command::RemoveFromPlaylist).unwrap();

        let tasks = test.tasks();
        assert!(matches!(
            tasks.as_slice(),
            [AppTask::RemoveTracksFromPlaylist(PlaylistId(1), ids)] if *ids == vec![100]
        ));
    }

    #[test]
    fn test_remove_from_dynamic_playlist_fails() {
        let mut test = TestApp::new();
        let app = &mut test.app;
        app.playlist_list.set_playlists(playlists());
        app.song_table.show_playlist(PlaylistId(2), &mut app.backend).unwrap();
        app.song_table
            .apply_playlist_tracks(PlaylistId(2), vec![test_track(1)]);
        test.tasks();

        let err = run_command(&mut test.app, Command::RemoveFromPlaylist).unwrap_err();

        assert_eq!(err.to_string(), "Tracks cannot be removed from a dynamic playlist");
        assert!(test.tasks().is_empty());
    }

    #[test]
    fn test_quit() {
        let mut test = TestApp::new();

        run_command(&mut test.app, Command::Quit).unwrap();

        assert!(matches!(test.app.event_rx.try_recv(), Ok(AppEvent::ExitApplication)));
    }
}
