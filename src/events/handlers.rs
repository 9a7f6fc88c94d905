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

use anyhow::Result;
use log::{debug, info};

use crate::{
    App, Focus,
    backend::PlaylistBackend,
    model::{Playlist, PlaylistId, Rating, TrackInfo},
    player::PlayerState,
};

pub(super) fn handle_scan_started(app: &mut App) {
    app.catalog.begin_scan();
}

pub(super) fn handle_scan_progress(app: &mut App, count: usize) {
    app.catalog.update_scan(count);
}

pub(super) fn handle_scan_finished(app: &mut App, count: usize, errors: Vec<String>) -> Result<()> {
    info!("Library scan finished with {} tracks", count);
    app.catalog.finish_scan(count, errors);
    app.status = None;

    // Static playlist entries may now resolve to different tracks.
    if let Some(id) = app
        .backend
        .current_playlist_id()
        .filter(|_| app.song_table.in_playlist_mode)
    {
        app.backend.set_current_playlist(id)?;
    }

    Ok(())
}

pub(super) fn handle_scan_failed(app: &mut App, message: String) {
    app.catalog.fail_scan();
    app.set_error(format!("Scan failed: {}", message));
}

pub(super) fn handle_library_loaded(app: &mut App, tracks: Vec<TrackInfo>) {
    if !app.song_table.apply_library_tracks(tracks) {
        debug!("Library loaded while another list is shown");
    }
}

pub(super) fn handle_search_results_ready(app: &mut App, query: String, tracks: Vec<TrackInfo>) {
    app.set_status(format!("{} tracks match", tracks.len()));
    app.song_table.show_search_results(query, tracks);
    app.focus = Focus::Table;
}

pub(super) fn handle_playlists_loaded(app: &mut App, playlists: Vec<Playlist>) {
    app.playlist_list.set_playlists(playlists);
}

pub(super) fn handle_playlist_tracks_loaded(app: &mut App, id: PlaylistId, tracks: Vec<TrackInfo>) {
    app.song_table.apply_playlist_tracks(id, tracks);
}

pub(super) fn handle_playlist_deleted(app: &mut App, id: PlaylistId) -> Result<()> {
    if app.song_table.current_playlist_id == Some(id) {
        app.song_table.show_library(&mut app.backend)?;
    }

    Ok(())
}

pub(super) fn handle_track_rated(app: &mut App, durable_id: i64, rating: Rating) {
    app.song_table.table.update_rating(durable_id, rating);
    if let Some(track) = app.now_playing.as_mut().filter(|t| t.durable_id == durable_id) {
        track.rating = rating;
    }
}

pub(super) fn handle_play_track(app: &mut App, track: TrackInfo) -> Result<()> {
    app.audio_player.play_file(&track.filename)?;
    app.player_time = Some(0);
    app.player_position = Some(0.0);
    app.now_playing = Some(track);

    Ok(())
}

pub(super) fn handle_player_state_changed(app: &mut App, state: PlayerState) {
    app.audio_player.set_state(state);
}

pub(super) fn handle_title_changed(app: &mut App, title: String) {
    app.player_track_name = Some(title);
}

pub(super) fn handle_duration_changed(app: &mut App, duration: u64) {
    app.player_duration = Some(duration);
}

pub(super) fn handle_volume_changed(app: &mut App, volume: u32) {
    app.volume = Some(volume);
}

pub(super) fn handle_time_changed(app: &mut App, seconds: f64) {
    app.player_time = Some(seconds as u64);
    if let Some(duration) = app.player_duration.filter(|&d| d > 0) {
        app.player_position = Some(seconds / duration as f64);
    }
}

/// Moves on to the next track in the queue, if there is one.
pub(super) fn handle_track_finished(app: &mut App) -> Result<()> {
    app.player_time = app.player_duration;

    match app.queue.next().cloned() {
        Some(track) => app.backend.play_track(track)?,
        None => {
            debug!("End of queue");
            app.now_playing = None;
        }
    }

    Ok(())
}
