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

//! Keyboard routing.
//!
//! Keys go to the command line first when it is open, then to the focused
//! component, and finally to the global bindings.

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent};

use crate::{
    App, Focus, components::TrackTableAction, events::AppEvent, player::PlaybackAction,
};

const FINE_VOLUME_DELTA: i32 = 1;
const VOLUME_DELTA: i32 = 5;

const FINE_SEEK_DELTA: i32 = 5;
const SEEK_DELTA: i32 = 20;

/// Maps keyboard input to application actions and playback commands.
///
/// # Errors
///
/// Returns an error if a request fails to send to a background worker.
pub(super) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let event = Event::Key(key);

    if app.commander.handle_event(&event, &app.event_tx) {
        return Ok(());
    }

    let handled = match app.focus {
        Focus::Sidebar => {
            app.playlist_list
                .process_event(&event, &mut app.song_table, &mut app.backend)?
        }
        Focus::Table => match app.song_table.table.process_event(&event) {
            Some(Some(TrackTableAction::ActivateCurrent(index))) => {
                play_from_table(app, index)?;
                true
            }
            Some(None) => true,
            None => false,
        },
    };

    if !handled {
        process_global_key_event(app, key)?;
    }

    Ok(())
}

/// Replaces the queue with the tracks in the song table and starts playing
/// from `index`.
fn play_from_table(app: &mut App, index: usize) -> Result<()> {
    let tracks = app.song_table.table.tracks().to_vec();
    if let Some(track) = app.queue.play_from(tracks, index).cloned() {
        app.backend.play_track(track)?;
    }

    Ok(())
}

fn toggle_playback(app: &mut App) -> Result<()> {
    let Some((index, filename)) = app
        .song_table
        .table
        .highlighted()
        .zip(app.song_table.table.highlighted_track().map(|t| t.filename.clone()))
    else {
        return Ok(());
    };

    match app.audio_player.playback_action(&filename) {
        PlaybackAction::Play => play_from_table(app, index)?,
        PlaybackAction::Pause | PlaybackAction::Resume => {
            app.audio_player.toggle_playback(&filename)?;
        }
    }

    Ok(())
}

fn play_previous(app: &mut App) -> Result<()> {
    if let Some(track) = app.queue.previous().cloned() {
        app.backend.play_track(track)?;
    }

    Ok(())
}

fn play_next(app: &mut App) -> Result<()> {
    if let Some(track) = app.queue.next().cloned() {
        app.backend.play_track(track)?;
    }

    Ok(())
}

fn rate_highlighted(app: &mut App) -> Result<()> {
    if let Some(track) = app.song_table.table.highlighted_track() {
        let rating = track.rating.cycle();
        app.backend.rate_track(track.clone(), rating)?;
    }

    Ok(())
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') => app.event_tx.send(AppEvent::ExitApplication)?,

        KeyCode::Tab | KeyCode::BackTab => {
            app.focus = match app.focus {
                Focus::Sidebar => Focus::Table,
                Focus::Table => Focus::Sidebar,
            }
        }

        KeyCode::Char('p') => toggle_playback(app)?,
        KeyCode::Char('n') => play_next(app)?,
        KeyCode::Char('b') => play_previous(app)?,
        KeyCode::Char('r') => rate_highlighted(app)?,

        KeyCode::Char(',') => app.audio_player.seek(-FINE_SEEK_DELTA)?,
        KeyCode::Char('.') => app.audio_player.seek(FINE_SEEK_DELTA)?,
        KeyCode::Char('<') => app.audio_player.seek(-SEEK_DELTA)?,
        KeyCode::Char('>') => app.audio_player.seek(SEEK_DELTA)?,
        KeyCode::Char('s') => app.audio_player.stop()?,
        KeyCode::Char('-') => app.audio_player.adjust_volume(-FINE_VOLUME_DELTA)?,
        KeyCode::Char('=') => app.audio_player.adjust_volume(FINE_VOLUME_DELTA)?,
        KeyCode::Char('_') => app.audio_player.adjust_volume(-VOLUME_DELTA)?,
        KeyCode::Char('+') => app.audio_player.adjust_volume(VOLUME_DELTA)?,
        KeyCode::Char('m') => app.audio_player.toggle_mute()?,

        // Clear the queue, but if the audio is playing keep it playing
        KeyCode::Char('c') => app.queue.clear(),

        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::track_table::test_track, events::tests::TestApp, model::PlaylistId,
        tasks::AppTask,
    };
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        process_key_event(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    #[test]
    fn test_enter_in_table_plays_and_queues() {
        let mut test = TestApp::new();
        let app = &mut test.app;
        app.song_table.table.set_tracks(vec![test_track(1), test_track(2), test_track(3)]);

        press(app, KeyCode::Char('j'));
        press(app, KeyCode::Enter);

        assert_eq!(app.queue.len(), 3);
        assert_eq!(app.queue.current().map(|t| t.track_id), Some(2));
        let tasks = test.tasks();
        assert!(matches!(tasks.as_slice(), [AppTask::PlayTrack(t)] if t.track_id == 2));
    }

    #[test]
    fn test_sidebar_enter_selects_playlist() {
        let mut test = TestApp::new();
        let app = &mut test.app;
        app.playlist_list.set_playlists(vec![crate::model::Playlist {
            id: Some(PlaylistId(8)),
            ..crate::model::Playlist::new_static("Mix")
        }]);

        press(app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Sidebar);
        press(app, KeyCode::Char('j'));
        press(app, KeyCode::Enter);

        assert!(app.song_table.in_playlist_mode);
        assert_eq!(app.song_table.current_playlist_id, Some(PlaylistId(8)));
        assert_eq!(app.backend.current_playlist_id(), Some(PlaylistId(8)));
        let tasks = test.tasks();
        assert!(matches!(tasks.as_slice(), [AppTask::LoadPlaylistTracks(PlaylistId(8))]));
    }

    #[test]
    fn test_rate_cycles_rating() {
        let mut test = TestApp::new();
        let app = &mut test.app;
        app.song_table.table.set_tracks(vec![test_track(1)]);

        press(app, KeyCode::Char('r'));

        let tasks = test.tasks();
        assert!(matches!(
            tasks.as_slice(),
            [AppTask::RateTrack(t, crate::model::Rating::Like)] if t.track_id == 1
        ));
    }

    #[test]
    fn test_commander_takes_keys_first() {
        let mut test = TestApp::new();
        let app = &mut test.app;
        app.song_table.table.set_tracks(vec![test_track(1), test_track(2)]);

        press(app, KeyCode::Char(':'));
        press(app, KeyCode::Char('j'));

        assert_eq!(app.song_table.table.highlighted(), Some(0));
        assert_eq!(app.commander.input.value(), "j");
    }
}
