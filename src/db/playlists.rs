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

//! Playlist persistence.
//!
//! Static playlists store an ordered list of durable track ids, so membership
//! survives a full rescan of the library. Dynamic playlists store a search
//! query that is evaluated each time the playlist is loaded.

use anyhow::{Context, Result, bail};
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    db::{self, TRACK_INFO_SELECT},
    model::{Playlist, PlaylistId, PlaylistKind, TrackInfo},
};

const PLAYLIST_COLUMNS: &str = "SELECT id, name, description, query, kind FROM playlists";

/// Inserts a new playlist, returning its id.
///
/// # Errors
///
/// Returns an error if a playlist with the same name (ignoring case) already
/// exists.
pub(crate) fn insert(conn: &Connection, playlist: &Playlist) -> Result<PlaylistId> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO playlists (name, description, query, kind) VALUES (?, ?, ?, ?)",
    )?;
    stmt.execute(params![
        playlist.name,
        playlist.description,
        playlist.query,
        playlist.kind
    ])
    .with_context(|| format!("Failed to create playlist '{}'", playlist.name))?;

    let id = PlaylistId(conn.last_insert_rowid());
    debug!("Created {} playlist '{}' with id {}", playlist.kind.as_str(), playlist.name, id);

    Ok(id)
}

pub(crate) fn find_by_id(conn: &Connection, id: PlaylistId) -> Result<Option<Playlist>> {
    let sql = format!("{} WHERE id = ?", PLAYLIST_COLUMNS);
    let mut stmt = conn.prepare_cached(&sql)?;
    let playlist = stmt.query_row([id], Playlist::from_row).optional()?;

    Ok(playlist)
}

/// Finds a playlist by name, ignoring case.
pub(crate) fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Playlist>> {
    let sql = format!("{} WHERE name = ?", PLAYLIST_COLUMNS);
    let mut stmt = conn.prepare_cached(&sql)?;
    let playlist = stmt.query_row([name], Playlist::from_row).optional()?;

    Ok(playlist)
}

/// Fetches every playlist, sorted by name.
pub(crate) fn find_all(conn: &Connection) -> Result<Vec<Playlist>> {
    let sql = format!("{} ORDER BY name", PLAYLIST_COLUMNS);
    let mut stmt = conn.prepare_cached(&sql)?;
    let results = stmt
        .query_map([], Playlist::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

/// Replaces the stored definition of a playlist.
///
/// Returns `false` if no playlist has the given id. Changing a static
/// playlist into a dynamic one keeps its stored entries, they are simply not
/// used while the playlist is dynamic.
pub(crate) fn update(conn: &Connection, id: PlaylistId, playlist: &Playlist) -> Result<bool> {
    let mut stmt = conn.prepare_cached(
        "UPDATE playlists SET name = ?, description = ?, query = ?, kind = ? WHERE id = ?",
    )?;
    let changed = stmt.execute(params![
        playlist.name,
        playlist.description,
        playlist.query,
        playlist.kind,
        id
    ])?;

    Ok(changed > 0)
}

/// Inserts the playlist, or updates the existing playlist with the same name.
pub(crate) fn upsert(conn: &Connection, playlist: &Playlist) -> Result<PlaylistId> {
    match find_by_name(conn, &playlist.name)?.and_then(|p| p.id) {
        Some(id) => {
            update(conn, id, playlist)?;
            Ok(id)
        }
        None => insert(conn, playlist),
    }
}

/// Deletes a playlist together with its entries.
pub(crate) fn delete(conn: &Connection, id: PlaylistId) -> Result<bool> {
    let mut stmt = conn.prepare_cached("DELETE FROM playlists WHERE id = ?")?;
    let changed = stmt.execute([id])?;

    Ok(changed > 0)
}

pub(crate) fn count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM playlists", [], |row| row.get(0))?;
    Ok(count)
}

/// Appends tracks to the end of a static playlist.
///
/// Returns the number of entries added.
///
/// # Errors
///
/// Returns an error if the playlist does not exist or is dynamic.
pub(crate) fn add_tracks(conn: &mut Connection, id: PlaylistId, durable_ids: &[i64]) -> Result<usize> {
    let playlist = require_static(conn, id)?;

    let tx = conn.transaction()?;
    {
        let next_position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM playlist_tracks WHERE playlist_id = ?",
            [id],
            |row| row.get(0),
        )?;

        let mut stmt = tx.prepare_cached(
            "INSERT INTO playlist_tracks (playlist_id, position, durable_id) VALUES (?, ?, ?)",
        )?;
        for (offset, durable_id) in (0_i64..).zip(durable_ids) {
            stmt.execute(params![id, next_position + offset, durable_id])?;
        }
    }
    tx.commit().context("Failed to commit transaction")?;

    debug!("Added {} tracks to playlist '{}'", durable_ids.len(), playlist.name);

    Ok(durable_ids.len())
}

/// Removes every entry for the given tracks from a static playlist, then
/// renumbers the remaining entries so positions stay contiguous.
///
/// Returns the number of entries removed.
///
/// # Errors
///
/// Returns an error if the playlist does not exist or is dynamic.
pub(crate) fn remove_tracks(conn: &mut Connection, id: PlaylistId, durable_ids: &[i64]) -> Result<usize> {
    require_static(conn, id)?;

    let tx = conn.transaction()?;
    let removed = {
        let remaining: Vec<i64> = {
            let mut stmt = tx.prepare_cached(
                "SELECT durable_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY position",
            )?;
            let rows = stmt
                .query_map([id], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let kept: Vec<i64> = remaining
            .iter()
            .copied()
            .filter(|durable_id| !durable_ids.contains(durable_id))
            .collect();

        tx.execute("DELETE FROM playlist_tracks WHERE playlist_id = ?", [id])?;

        let mut stmt = tx.prepare_cached(
            "INSERT INTO playlist_tracks (playlist_id, position, durable_id) VALUES (?, ?, ?)",
        )?;
        for (position, durable_id) in (0_i64..).zip(&kept) {
            stmt.execute(params![id, position, durable_id])?;
        }

        remaining.len() - kept.len()
    };
    tx.commit().context("Failed to commit transaction")?;

    Ok(removed)
}

/// Fetches the tracks of a playlist.
///
/// Static playlist entries are returned in playlist order; entries whose file
/// is no longer in the library are skipped. Dynamic playlists run their
/// stored query, an empty query matching the whole library.
///
/// # Errors
///
/// Returns an error if the playlist does not exist, or a dynamic playlist's
/// query is invalid.
pub(crate) fn fetch_tracks(conn: &Connection, id: PlaylistId) -> Result<Vec<TrackInfo>> {
    let playlist = find_by_id(conn, id)?.with_context(|| format!("Playlist {} not found", id))?;

    match playlist.kind {
        PlaylistKind::Dynamic => db::search(conn, &playlist.query)
            .with_context(|| format!("Invalid query for playlist '{}'", playlist.name)),

        PlaylistKind::Static => {
            let sql = format!(
                "{} JOIN playlist_tracks pt ON pt.durable_id = tr.durable_id
                 WHERE pt.playlist_id = ?
                 ORDER BY pt.position",
                TRACK_INFO_SELECT
            );

            let mut stmt = conn.prepare_cached(&sql)?;
            let results = stmt
                .query_map([id], TrackInfo::from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(results)
        }
    }
}

fn require_static(conn: &Connection, id: PlaylistId) -> Result<Playlist> {
    let playlist = find_by_id(conn, id)?.with_context(|| format!("Playlist {} not found", id))?;
    if playlist.kind == PlaylistKind::Dynamic {
        bail!("Playlist '{}' is dynamic, its tracks come from its query", playlist.name);
    }

    Ok(playlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_test_track, test_connection};

    fn durable_id(conn: &Connection, track_id: i64) -> i64 {
        db::fetch_track_info(conn, track_id).unwrap().durable_id
    }

    fn titles(tracks: &[TrackInfo]) -> Vec<&str> {
        tracks.iter().map(|t| t.track_title.as_str()).collect()
    }

    #[test]
    fn test_insert_and_find() {
        let conn = test_connection();
        let mut playlist = Playlist::new_static("My Playlist");
        playlist.description = "Test description".to_string();

        let id = insert(&conn, &playlist).unwrap();
        assert_eq!(id, PlaylistId(1));

        let found = find_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(found.id, Some(id));
        assert_eq!(found.name, "My Playlist");
        assert_eq!(found.description, "Test description");
        assert_eq!(found.kind, PlaylistKind::Static);
        assert_eq!(found.query, "");

        assert!(find_by_id(&conn, PlaylistId(999)).unwrap().is_none());
        assert!(find_by_name(&conn, "my playlist").unwrap().is_some());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let conn = test_connection();
        insert(&conn, &Playlist::new_static("Road Trip")).unwrap();
        assert!(insert(&conn, &Playlist::new_static("ROAD TRIP")).is_err());
    }

    #[test]
    fn test_update() {
        let conn = test_connection();
        let id = insert(&conn, &Playlist::new_static("Initial Name")).unwrap();

        let mut updated = Playlist::new_dynamic("Updated Name", "genre:jazz");
        updated.description = "Updated Desc".to_string();
        assert!(update(&conn, id, &updated).unwrap());

        let found = find_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(found.name, "Updated Name");
        assert_eq!(found.description, "Updated Desc");
        assert_eq!(found.kind, PlaylistKind::Dynamic);
        assert_eq!(found.query, "genre:jazz");

        assert!(!update(&conn, PlaylistId(42), &updated).unwrap());
    }

    #[test]
    fn test_find_all_sorted_and_count() {
        let conn = test_connection();
        insert(&conn, &Playlist::new_static("Playlist C")).unwrap();
        insert(&conn, &Playlist::new_dynamic("Playlist A", "")).unwrap();
        insert(&conn, &Playlist::new_static("Playlist B")).unwrap();

        let names: Vec<String> = find_all(&conn).unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Playlist A", "Playlist B", "Playlist C"]);
        assert_eq!(count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_upsert() {
        let conn = test_connection();
        let id = upsert(&conn, &Playlist::new_static("Upsert Test")).unwrap();
        assert_eq!(id, PlaylistId(1));

        let mut updated = Playlist::new_dynamic("Upsert Test", ".*");
        updated.description = "Updated".to_string();
        assert_eq!(upsert(&conn, &updated).unwrap(), id);

        let found = find_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(found.description, "Updated");
        assert_eq!(found.kind, PlaylistKind::Dynamic);
        assert_eq!(count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_static_playlist_tracks_in_order() {
        let mut conn = test_connection();
        let a = insert_test_track(&conn, "Air", "Moon Safari", "La Femme d'Argent", None, None);
        let b = insert_test_track(&conn, "Air", "Moon Safari", "Sexy Boy", None, None);
        let c = insert_test_track(&conn, "Air", "Moon Safari", "All I Need", None, None);

        let (a, b, c) = (durable_id(&conn, a), durable_id(&conn, b), durable_id(&conn, c));

        let id = insert(&conn, &Playlist::new_static("Mix")).unwrap();
        assert_eq!(add_tracks(&mut conn, id, &[c, a]).unwrap(), 2);
        add_tracks(&mut conn, id, &[b]).unwrap();

        let tracks = fetch_tracks(&conn, id).unwrap();
        assert_eq!(titles(&tracks), vec!["All I Need", "La Femme d'Argent", "Sexy Boy"]);

        let removed = remove_tracks(&mut conn, id, &[a]).unwrap();
        assert_eq!(removed, 1);

        let tracks = fetch_tracks(&conn, id).unwrap();
        assert_eq!(titles(&tracks), vec!["All I Need", "Sexy Boy"]);

        // Positions are contiguous again, so appending lands at the end.
        add_tracks(&mut conn, id, &[a]).unwrap();
        let tracks = fetch_tracks(&conn, id).unwrap();
        assert_eq!(titles(&tracks), vec!["All I Need", "Sexy Boy", "La Femme d'Argent"]);
    }

    #[test]
    fn test_dynamic_playlist_runs_query() {
        let mut conn = test_connection();
        insert_test_track(&conn, "Miles Davis", "Kind of Blue", "So What", Some(1959), Some("Jazz"));
        insert_test_track(&conn, "Air", "Moon Safari", "Sexy Boy", Some(1998), Some("Electronic"));

        let id = insert(&conn, &Playlist::new_dynamic("Jazz", "genre:jazz")).unwrap();
        assert_eq!(titles(&fetch_tracks(&conn, id).unwrap()), vec!["So What"]);

        let everything = insert(&conn, &Playlist::new_dynamic("Everything", "")).unwrap();
        assert_eq!(fetch_tracks(&conn, everything).unwrap().len(), 2);

        assert!(add_tracks(&mut conn, id, &[1]).is_err());
        assert!(remove_tracks(&mut conn, id, &[1]).is_err());
    }

    #[test]
    fn test_invalid_dynamic_query_is_an_error() {
        let conn = test_connection();
        let id = insert(&conn, &Playlist::new_dynamic("Broken", "(genre:jazz")).unwrap();
        assert!(fetch_tracks(&conn, id).is_err());
    }

    #[test]
    fn test_delete_cascades_entries() {
        let mut conn = test_connection();
        let track = insert_test_track(&conn, "Air", "Moon Safari", "Sexy Boy", None, None);
        let track = durable_id(&conn, track);
        let id = insert(&conn, &Playlist::new_static("Gone")).unwrap();
        add_tracks(&mut conn, id, &[track]).unwrap();

        assert!(delete(&conn, id).unwrap());
        assert!(!delete(&conn, id).unwrap());

        let entries: i64 = conn
            .query_row("SELECT COUNT(*) FROM playlist_tracks", [], |r| r.get(0))
            .unwrap();
        assert_eq!(entries, 0);
        assert!(fetch_tracks(&conn, id).is_err());
    }

    #[test]
    fn test_membership_survives_rebuild() {
        let mut conn = test_connection();
        let track = insert_test_track(&conn, "Air", "Moon Safari", "Sexy Boy", None, None);
        let track = durable_id(&conn, track);
        let id = insert(&conn, &Playlist::new_static("Keepers")).unwrap();
        add_tracks(&mut conn, id, &[track]).unwrap();

        conn.execute_batch("DELETE FROM tracks; DELETE FROM albums; DELETE FROM artists;")
            .unwrap();
        assert!(fetch_tracks(&conn, id).unwrap().is_empty());

        insert_test_track(&conn, "Air", "Moon Safari", "Sexy Boy", None, None);
        assert_eq!(titles(&fetch_tracks(&conn, id).unwrap()), vec!["Sexy Boy"]);
    }
}
