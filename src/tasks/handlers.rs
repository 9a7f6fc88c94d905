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

use std::sync::atomic::Ordering;

use anyhow::{Context, Result, bail};
use log::{info, warn};

use crate::{
    db::{self, playlists, scan},
    events::AppEvent,
    model::{Playlist, PlaylistId, PlaylistKind, Rating, TrackInfo},
    query,
    tasks::TaskContext,
};

pub(super) fn scan_catalog(ctx: &mut TaskContext, dirs: &[String]) -> Result<()> {
    ctx.event_tx.send(AppEvent::ScanStarted)?;

    let event_tx = ctx.event_tx;
    let result = scan::process_music_library(ctx.conn, dirs, |count| {
        let _ = event_tx.send(AppEvent::ScanProgress(count));
    });

    ctx.scanning.store(false, Ordering::SeqCst);

    match result {
        Ok(summary) => {
            for error in &summary.errors {
                warn!("Skipped during scan: {}", error);
            }
            ctx.event_tx.send(AppEvent::ScanFinished {
                count: summary.count,
                errors: summary.errors,
            })?;
        }
        Err(e) => {
            warn!("Scan failed: {:#}", e);
            ctx.event_tx.send(AppEvent::ScanFailed(format!("{:#}", e)))?;
        }
    }

    load_library(ctx)
}

pub(super) fn load_library(ctx: &mut TaskContext) -> Result<()> {
    let tracks = db::fetch_all_tracks(ctx.conn)?;
    ctx.event_tx.send(AppEvent::LibraryLoaded(tracks))?;

    Ok(())
}

pub(super) fn search(ctx: &mut TaskContext, query: &str) -> Result<()> {
    let results = db::search(ctx.conn, query)?;
    ctx.event_tx
        .send(AppEvent::SearchResultsReady(query.to_string(), results))?;

    Ok(())
}

pub(super) fn load_playlists(ctx: &mut TaskContext) -> Result<()> {
    let playlists = playlists::find_all(ctx.conn)?;
    ctx.event_tx.send(AppEvent::PlaylistsLoaded(playlists))?;

    Ok(())
}

pub(super) fn load_playlist_tracks(ctx: &mut TaskContext, id: PlaylistId) -> Result<()> {
    let tracks = playlists::fetch_tracks(ctx.conn, id)?;
    ctx.event_tx.send(AppEvent::PlaylistTracksLoaded(id, tracks))?;

    Ok(())
}

/// Creates a playlist. A dynamic playlist whose name is already taken has its
/// query redefined instead.
pub(super) fn create_playlist(ctx: &mut TaskContext, playlist: Playlist) -> Result<()> {
    let status = match playlist.kind {
        PlaylistKind::Static => {
            playlists::insert(ctx.conn, &playlist)?;
            format!("Created playlist {}", playlist.name)
        }
        PlaylistKind::Dynamic => {
            query::compile(&playlist.query)
                .with_context(|| format!("Invalid query for playlist '{}'", playlist.name))?;

            // Only a dynamic playlist may be redefined, a static one keeps its entries.
            let existing = playlists::find_by_name(ctx.conn, &playlist.name)?;
            if let Some(existing) = existing.filter(|p| p.kind == PlaylistKind::Static) {
                bail!("Playlist '{}' is static, choose another name", existing.name);
            }

            let id = playlists::upsert(ctx.conn, &playlist)?;
            // Redefining the query changes the tracks of a playlist that may
            // be on screen.
            load_playlist_tracks(ctx, id)?;
            format!("Saved dynamic playlist {}", playlist.name)
        }
    };

    info!(
        "{}, {} playlists in total",
        status,
        playlists::count(ctx.conn)?
    );
    ctx.event_tx.send(AppEvent::Status(status))?;

    load_playlists(ctx)
}

pub(super) fn delete_playlist(ctx: &mut TaskContext, id: PlaylistId) -> Result<()> {
    if playlists::delete(ctx.conn, id)? {
        info!("Deleted playlist {}", id);
        ctx.event_tx.send(AppEvent::PlaylistDeleted(id))?;
    }

    load_playlists(ctx)
}

pub(super) fn add_tracks_to_playlist(
    ctx: &mut TaskContext,
    name: &str,
    durable_ids: &[i64],
) -> Result<()> {
    let Some(playlist) = playlists::find_by_name(ctx.conn, name)? else {
        bail!("No playlist named {}", name);
    };
    let Some(id) = playlist.id else {
        bail!("No playlist named {}", name);
    };

    let added = playlists::add_tracks(ctx.conn, id, durable_ids)?;
    ctx.event_tx.send(AppEvent::Status(format!(
        "Added {} tracks to {}",
        added, playlist.name
    )))?;

    // The playlist may be on screen, in which case it needs reloading.
    load_playlist_tracks(ctx, id)
}

pub(super) fn remove_tracks_from_playlist(
    ctx: &mut TaskContext,
    id: PlaylistId,
    durable_ids: &[i64],
) -> Result<()> {
    let removed = playlists::remove_tracks(ctx.conn, id, durable_ids)?;
    ctx.event_tx
        .send(AppEvent::Status(format!("Removed {} tracks", removed)))?;

    load_playlist_tracks(ctx, id)
}

/// Records the play and hands the track, with its updated statistics, to the
/// player.
pub(super) fn play_track(ctx: &mut TaskContext, track: TrackInfo) -> Result<()> {
    db::increment_play_count(ctx.conn, track.durable_id)?;

    // The track may have gone in a rescan, in which case play what we have.
    let track = db::fetch_track_info(ctx.conn, track.track_id)
        .ok()
        .filter(|t| t.durable_id == track.durable_id)
        .unwrap_or(track);

    ctx.event_tx.send(AppEvent::PlayTrack(track))?;

    Ok(())
}

pub(super) fn rate_track(ctx: &mut TaskContext, track: TrackInfo, rating: Rating) -> Result<()> {
    db::update_rating(ctx.conn, track.durable_id, rating)?;
    ctx.event_tx.send(AppEvent::TrackRated(track.durable_id, rating))?;

    Ok(())
}
