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

//! Data access layer.
//!
//! This module handles all interactions with the SQLite database, including
//! schema creation and fetching track metadata. It uses cached statements
//! to optimize frequently executed queries.
//!
//! # Tables
//!
//! * `artists` - Stores unique album artist names.
//! * `albums` - Groups tracks under titles, linked to artists.
//! * `tracks` - Individual audio files with metadata and file paths.
//! * `track_stats` - Play counts and ratings, keyed by durable track id so
//!   they survive a rescan of the library.
//! * `playlists` - Static and dynamic playlist definitions.
//! * `playlist_tracks` - Ordered membership of static playlists, also keyed
//!   by durable track id.
//!
//! # Performance
//!
//! Most functions in this module use [`rusqlite::Connection::prepare_cached`]
//! to reduce SQL parsing overhead.

mod model;
pub(crate) mod playlists;
pub(crate) mod scan;

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{Connection, params};

use crate::{
    model::{Rating, TrackInfo},
    query,
};

/// Columns and joins producing rows for [`TrackInfo::from_row`].
pub(crate) const TRACK_INFO_SELECT: &str = "
    SELECT tr.id, tr.durable_id, tr.track_number, tr.title, tr.artist, al.title,
           tr.duration, tr.genre, tr.year, tr.bitrate, tr.filename,
           COALESCE(st.play_count, 0), COALESCE(st.rating, 0), st.last_played
    FROM tracks tr
    JOIN albums al ON tr.album_id = al.id
    JOIN artists ar ON al.artist_id = ar.id
    LEFT JOIN track_stats st ON st.durable_id = tr.durable_id
";

const TRACK_INFO_ORDER: &str = " ORDER BY ar.name, al.title, tr.track_number, tr.title";

/// Opens a connection to the SQLite database and configures performance settings.
///
/// This function performs the following setup:
/// * **WAL Mode**: Enables Write-Ahead Logging for better concurrency.
/// * **Performance Tuning**: Sets synchronous mode to `NORMAL` and increases the cache size.
/// * **Constraints**: Enforces foreign key integrity.
/// * **Schema**: Executes [`create_schema`] to ensure all tables and indices exist.
///
/// # Arguments
///
/// * `path` - The file system path to the SQLite database file.
///
/// # Errors
///
/// Returns an error if:
/// * The database file cannot be opened.
/// * The initial PRAGMA configurations fail.
/// * The schema initialization fails.
pub(crate) fn init_db(path: &str) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Failed to open database {}", path))?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        anyhow::bail!(
            "Failed to switch to WAL mode. Current mode: {}",
            journal_mode
        );
    }

    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA cache_size = -64000; -- Use 64MB of RAM for cache
    ",
    )?;

    conn.set_prepared_statement_cache_capacity(100);

    create_schema(&conn)?;

    debug!("Opened database {}", path);

    Ok(conn)
}

/// Create the database schema.
///
/// This function creates the catalog, statistics and playlist tables if they
/// do not already exist.
///
/// It also sets up:
///
/// * **Foreign Key Constraints**: Automated cleanup via `ON DELETE CASCADE`.
/// * **Performance Indices**: Indices on foreign keys to optimize join operations.
/// * **Uniqueness Constraints**: Prevention of duplicate artists, albums, track
///   files or playlist names.
///
/// This operation is wrapped in a single SQL transaction to ensure the schema
/// is updated atomically.
///
/// # Errors
///
/// Returns an error if the transaction fails, if there are permission issues
/// with the database file, or if the SQL syntax is invalid.
pub(crate) fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL COLLATE NOCASE UNIQUE
        );

        CREATE TABLE IF NOT EXISTS albums (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            artist_id INTEGER NOT NULL,
            title TEXT NOT NULL COLLATE NOCASE,
            UNIQUE (artist_id, title),
            FOREIGN KEY (artist_id) REFERENCES artists (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_albums_artist_id ON albums (artist_id);

        CREATE TABLE IF NOT EXISTS tracks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            durable_id INTEGER NOT NULL UNIQUE,
            album_id INTEGER NOT NULL,
            track_number INTEGER,
            title TEXT NOT NULL COLLATE NOCASE,
            artist TEXT NOT NULL COLLATE NOCASE,
            duration INTEGER NOT NULL,
            genre TEXT,
            year INTEGER,
            bitrate INTEGER,
            sample_rate INTEGER,
            channels INTEGER,
            file_size INTEGER NOT NULL DEFAULT 0,
            filename TEXT NOT NULL UNIQUE,
            FOREIGN KEY (album_id) REFERENCES albums (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_tracks_album_id ON tracks (album_id);

        CREATE TABLE IF NOT EXISTS track_stats (
            durable_id INTEGER PRIMARY KEY,
            play_count INTEGER NOT NULL DEFAULT 0,
            rating INTEGER NOT NULL DEFAULT 0,
            last_played INTEGER
        );

        CREATE TABLE IF NOT EXISTS playlists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL COLLATE NOCASE UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            query TEXT NOT NULL DEFAULT '',
            kind TEXT NOT NULL DEFAULT 'static' CHECK (kind IN ('static', 'dynamic'))
        );

        CREATE TABLE IF NOT EXISTS playlist_tracks (
            playlist_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            durable_id INTEGER NOT NULL,
            PRIMARY KEY (playlist_id, position),
            FOREIGN KEY (playlist_id) REFERENCES playlists (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_playlist_tracks_durable_id ON playlist_tracks (durable_id);

        COMMIT;",
    )
    .context("Failed to create schema")
}

/// Fetches every track in the library, ordered by album artist, album and
/// track number.
///
/// # Errors
///
/// Returns an error if the SQL query fails or if there is a type mismatch
/// when mapping the database rows to the [`TrackInfo`] struct.
pub(crate) fn fetch_all_tracks(conn: &Connection) -> Result<Vec<TrackInfo>> {
    let sql = format!("{}{}", TRACK_INFO_SELECT, TRACK_INFO_ORDER);

    let mut stmt = conn.prepare_cached(&sql)?;
    let results = stmt
        .query_map([], TrackInfo::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

/// Fetches track information.
///
/// This function looks up the track with the given id by joining the
/// `tracks`, `albums`, `artists` and `track_stats` tables.
///
/// # Errors
///
/// Returns an error if the database connection fails, the query is
/// malformed, or no such track exists.
pub(crate) fn fetch_track_info(conn: &Connection, track_id: i64) -> Result<TrackInfo> {
    let sql = format!("{} WHERE tr.id = ?", TRACK_INFO_SELECT);

    let mut stmt = conn.prepare_cached(&sql)?;
    let result = stmt
        .query_one([track_id], TrackInfo::from_row)
        .with_context(|| format!("Track {} not found", track_id))?;

    Ok(result)
}

/// Searches the library using the query language.
///
/// An empty query returns every track.
///
/// # Errors
///
/// Returns an error if the query cannot be compiled or the SQL query fails.
pub(crate) fn search(conn: &Connection, text: &str) -> Result<Vec<TrackInfo>> {
    let Some(compiled) = query::compile(text)? else {
        return fetch_all_tracks(conn);
    };

    let sql = format!(
        "{} WHERE {}{}",
        TRACK_INFO_SELECT, compiled.where_clause, TRACK_INFO_ORDER
    );

    debug!("Search '{}' compiled to: {}", text, compiled.where_clause);

    let mut stmt = conn.prepare_cached(&sql)?;
    let results = stmt
        .query_map(
            rusqlite::params_from_iter(compiled.params.iter()),
            TrackInfo::from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}

pub(crate) fn count_tracks(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM tracks", [], |row| row.get(0))?;
    Ok(count)
}

/// Increments the play count of a track and records when it was played.
pub(crate) fn increment_play_count(conn: &Connection, durable_id: i64) -> Result<()> {
    let sql = "
        INSERT INTO track_stats (durable_id, play_count, last_played)
        VALUES (?1, 1, unixepoch())
        ON CONFLICT (durable_id)
        DO UPDATE SET play_count = play_count + 1, last_played = unixepoch()";

    let mut stmt = conn.prepare_cached(sql)?;
    stmt.execute(params![durable_id])?;

    Ok(())
}

pub(crate) fn update_rating(conn: &Connection, durable_id: i64, rating: Rating) -> Result<()> {
    let sql = "
        INSERT INTO track_stats (durable_id, rating)
        VALUES (?1, ?2)
        ON CONFLICT (durable_id)
        DO UPDATE SET rating = ?2";

    let mut stmt = conn.prepare_cached(sql)?;
    stmt.execute(params![durable_id, rating])?;

    Ok(())
}

/// Opens an in-memory database with the full schema, for tests.
#[cfg(test)]
pub(crate) fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    create_schema(&conn).unwrap();
    conn
}

/// Inserts a track (and its album and artist as needed), for tests.
///
/// Returns the new track id. The durable id is derived from the filename.
#[cfg(test)]
pub(crate) fn insert_test_track(
    conn: &Connection,
    artist: &str,
    album: &str,
    title: &str,
    year: Option<i64>,
    genre: Option<&str>,
) -> i64 {
    conn.execute("INSERT OR IGNORE INTO artists (name) VALUES (?)", [artist])
        .unwrap();
    let artist_id: i64 = conn
        .query_row("SELECT id FROM artists WHERE name = ?", [artist], |r| r.get(0))
        .unwrap();

    conn.execute(
        "INSERT OR IGNORE INTO albums (artist_id, title) VALUES (?, ?)",
        params![artist_id, album],
    )
    .unwrap();
    let album_id: i64 = conn
        .query_row(
            "SELECT id FROM albums WHERE artist_id = ? AND title = ?",
            params![artist_id, album],
            |r| r.get(0),
        )
        .unwrap();

    let filename = format!("/music/{}/{}/{}.mp3", artist, album, title);
    let durable_id = scan::durable_id(&filename);

    conn.execute(
        "INSERT INTO tracks (durable_id, album_id, track_number, title, artist, duration, genre, year, bitrate, filename)
         VALUES (?, ?, NULL, ?, ?, 200, ?, ?, 320, ?)",
        params![durable_id, album_id, title, artist, genre, year, filename],
    )
    .unwrap();

    conn.last_insert_rowid()
}
