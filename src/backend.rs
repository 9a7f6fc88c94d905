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

//! Front end of the background task worker.
//!
//! [`Backend`] is the single place the user interface goes through to ask for
//! data. It remembers which playlist is selected and whether a library scan
//! is running, and otherwise forwards requests as [`AppTask`]s.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
};

use anyhow::Result;
use log::{debug, warn};

use crate::{
    model::{Playlist, PlaylistId, Rating, TrackInfo},
    tasks::AppTask,
};

/// Playlist selection, as seen by the views.
pub(crate) trait PlaylistBackend {
    /// Selects a playlist and requests its tracks.
    fn set_current_playlist(&mut self, id: PlaylistId) -> Result<()>;

    /// Forgets the selected playlist and requests the whole library.
    fn clear_current_playlist(&mut self) -> Result<()>;
}

pub(crate) struct Backend {
    task_tx: Sender<AppTask>,
    current_playlist_id: Option<PlaylistId>,
    scanning: Arc<AtomicBool>,
}

impl Backend {
    pub(crate) fn new(task_tx: Sender<AppTask>) -> Self {
        Self {
            task_tx,
            current_playlist_id: None,
            scanning: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The flag shared with the task worker, raised while a scan runs.
    pub(crate) fn scan_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.scanning)
    }

    pub(crate) fn current_playlist_id(&self) -> Option<PlaylistId> {
        self.current_playlist_id
    }

    /// Starts a scan of the given media directories.
    ///
    /// Returns `false`, without starting anything, if a scan is already
    /// running.
    pub(crate) fn scan_library(&self, dirs: &[String]) -> Result<bool> {
        if self
            .scanning
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Library scan already in progress");
            return Ok(false);
        }

        if let Err(e) = self.task_tx.send(AppTask::ScanCatalog(dirs.to_vec())) {
            self.scanning.store(false, Ordering::SeqCst);
            return Err(e.into());
        }

        Ok(true)
    }

    pub(crate) fn load_library(&self) -> Result<()> {
        self.task_tx.send(AppTask::LoadLibrary)?;
        Ok(())
    }

    pub(crate) fn search(&self, query: &str) -> Result<()> {
        self.task_tx.send(AppTask::Search(query.to_string()))?;
        Ok(())
    }

    pub(crate) fn load_playlists(&self) -> Result<()> {
        self.task_tx.send(AppTask::LoadPlaylists)?;
        Ok(())
    }

    pub(crate) fn create_playlist(&self, playlist: Playlist) -> Result<()> {
        self.task_tx.send(AppTask::CreatePlaylist(playlist))?;
        Ok(())
    }

    pub(crate) fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        self.task_tx.send(AppTask::DeletePlaylist(id))?;
        Ok(())
    }

    pub(crate) fn add_tracks_to_playlist(&self, name: &str, durable_ids: Vec<i64>) -> Result<()> {
        self.task_tx
            .send(AppTask::AddTracksToPlaylist(name.to_string(), durable_ids))?;
        Ok(())
    }

    pub(crate) fn remove_tracks_from_playlist(
        &self,
        id: PlaylistId,
        durable_ids: Vec<i64>,
    ) -> Result<()> {
        self.task_tx
            .send(AppTask::RemoveTracksFromPlaylist(id, durable_ids))?;
        Ok(())
    }

    pub(crate) fn play_track(&self, track: TrackInfo) -> Result<()> {
        self.task_tx.send(AppTask::PlayTrack(track))?;
        Ok(())
    }

    pub(crate) fn rate_track(&self, track: TrackInfo, rating: Rating) -> Result<()> {
        self.task_tx.send(AppTask::RateTrack(track, rating))?;
        Ok(())
    }
}

impl PlaylistBackend for Backend {
    fn set_current_playlist(&mut self, id: PlaylistId) -> Result<()> {
        debug!("Current playlist is now {}", id);
        self.current_playlist_id = Some(id);
        self.task_tx.send(AppTask::LoadPlaylistTracks(id))?;
        Ok(())
    }

    fn clear_current_playlist(&mut self) -> Result<()> {
        debug!("Current playlist cleared");
        self.current_playlist_id = None;
        self.load_library()
    }
}
