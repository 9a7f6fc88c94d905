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

//! Media library indexing and database persistence.
//!
//! This module handles the discovery of audio files on the local filesystem
//! and the management of associated database records.
//!
//! It utilizes `WalkDir` for efficient directory traversal and `Lofty` for
//! metadata extraction.
//!
//! # Database Schema
//!
//! The library is organized into a three-tier hierarchy stored in SQLite:
//! 1. **Artists**: Album artists, or the track artist when a file has no
//!    album artist tag.
//! 2. **Albums**: Collections of tracks associated with an artist.
//! 3. **Tracks**: Individual audio files with paths and metadata.
//!
//! # Performance
//!
//! Large library scans are performed within an atomic SQLite transaction to
//! maximize write throughput and ensure database integrity. Internal caching
//! is used during processing to minimize redundant database lookups for
//! existing artist and album entries.

use anyhow::{Context, Result};
use log::{info, warn};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use rusqlite::{Connection, Transaction, params};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;
use xxhash_rust::xxh3::xxh3_64;

use crate::db;

const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "flac", "ogg", "opus", "m4a", "wav"];

/// Number of imported files between progress notifications.
const PROGRESS_INTERVAL: usize = 25;

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Outcome of a library scan.
#[derive(Debug, Default)]
pub(crate) struct ScanSummary {
    /// Number of tracks in the catalog after the scan.
    pub(crate) count: usize,
    /// Files and directories that could not be read, with the reason.
    pub(crate) errors: Vec<String>,
}

/// Metadata extracted from a single audio file.
struct TrackMetadata {
    album_artist: String,
    artist: String,
    album: String,
    title: String,
    track_number: Option<u32>,
    year: Option<i64>,
    genre: Option<String>,
    duration: i64,
    bitrate: Option<u32>,
    sample_rate: Option<u32>,
    channels: Option<u8>,
    file_size: i64,
}

/// Derives the durable id of a track from its path.
///
/// The id is stable for as long as the file does not move, which lets play
/// statistics and playlist entries outlive a rescan of the library.
pub(crate) fn durable_id(filename: &str) -> i64 {
    xxh3_64(filename.as_bytes()) as i64
}

/// Recursively scans the media directories for audio files and rebuilds the
/// catalog.
///
/// This performs a full library rebuild by clearing all existing catalog
/// records and re-indexing every directory. Play statistics and playlists are
/// left untouched. Metadata is extracted from file tags and normalized via an
/// internal cache to prevent duplicate entries.
///
/// Files that cannot be read, and media directories that do not exist, are
/// recorded in the returned summary and otherwise skipped.
///
/// # Arguments
///
/// * `conn` - A mutable reference to the SQLite database connection.
/// * `dirs` - The media directories to scan.
/// * `progress` - Called periodically with the number of files imported so
///   far.
///
/// # Errors
///
/// Returns an error if the transaction fails or if database constraints are
/// violated during insertion.
pub(crate) fn process_music_library(
    conn: &mut Connection,
    dirs: &[String],
    mut progress: impl FnMut(usize),
) -> Result<ScanSummary> {
    let mut artist_cache: HashMap<String, i64> = HashMap::new();
    let mut album_cache: HashMap<(i64, String), i64> = HashMap::new();

    let mut summary = ScanSummary::default();
    let mut imported = 0;

    let tx = conn.transaction()?;

    tx.execute("DELETE FROM tracks", [])?;
    tx.execute("DELETE FROM albums", [])?;
    tx.execute("DELETE FROM artists", [])?;

    tx.execute(
        "DELETE FROM sqlite_sequence WHERE name IN ('artists', 'albums', 'tracks')",
        [],
    )?;

    for dir in dirs {
        let root = Path::new(dir);
        if !root.is_dir() {
            warn!("Skipping media directory {}: not a directory", dir);
            summary.errors.push(format!("{}: not a directory", dir));
            continue;
        }

        info!("Scanning {}", dir);

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping entry in {}: {}", dir, e);
                    summary.errors.push(e.to_string());
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !is_audio_file(path) {
                continue;
            }

            let Some(filename) = path.to_str() else {
                summary.errors.push(format!("{}: path is not valid UTF-8", path.display()));
                continue;
            };

            let metadata = match read_metadata(path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Skipping {}: {:#}", filename, e);
                    summary.errors.push(format!("{}: {:#}", filename, e));
                    continue;
                }
            };

            let artist_id = artist_id(&tx, &mut artist_cache, &metadata.album_artist)?;
            let album_id = album_id(&tx, &mut album_cache, artist_id, &metadata.album)?;

            tx.execute(
                "INSERT OR IGNORE INTO tracks (durable_id, album_id, track_number, title, artist, duration, genre, year, bitrate, sample_rate, channels, file_size, filename)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    durable_id(filename),
                    album_id,
                    metadata.track_number,
                    metadata.title,
                    metadata.artist,
                    metadata.duration,
                    metadata.genre,
                    metadata.year,
                    metadata.bitrate,
                    metadata.sample_rate,
                    metadata.channels,
                    metadata.file_size,
                    filename
                ],
            )?;

            imported += 1;
            if imported % PROGRESS_INTERVAL == 0 {
                progress(imported);
            }
        }
    }

    tx.commit().context("Failed to commit transaction")?;

    summary.count = usize::try_from(db::count_tracks(conn)?).unwrap_or_default();

    info!(
        "Scan finished: {} tracks, {} skipped",
        summary.count,
        summary.errors.len()
    );

    Ok(summary)
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

fn read_metadata(path: &Path) -> Result<TrackMetadata> {
    let tagged_file = Probe::open(path)
        .and_then(|p| p.read())
        .context("Failed to read audio file")?;

    let file_size = fs::metadata(path)
        .map(|m| i64::try_from(m.len()).unwrap_or(i64::MAX))
        .unwrap_or_default();

    let properties = tagged_file.properties();
    let duration = i64::try_from(properties.duration().as_secs()).unwrap_or(-1);

    let file_stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

    let mut metadata = TrackMetadata {
        album_artist: UNKNOWN_ARTIST.to_string(),
        artist: UNKNOWN_ARTIST.to_string(),
        album: UNKNOWN_ALBUM.to_string(),
        title: file_stem,
        track_number: None,
        year: None,
        genre: None,
        duration,
        bitrate: properties.audio_bitrate(),
        sample_rate: properties.sample_rate(),
        channels: properties.channels(),
        file_size,
    };

    // Untagged files are still imported, under the fallback names.
    let Some(tag) = tag else {
        return Ok(metadata);
    };

    if let Some(artist) = tag.artist() {
        metadata.artist = artist.to_string();
    }
    metadata.album_artist = tag_text(tag, &ItemKey::AlbumArtist).unwrap_or_else(|| metadata.artist.clone());

    if let Some(album) = tag.album() {
        metadata.album = album.to_string();
    }
    if let Some(title) = tag.title() {
        metadata.title = title.to_string();
    }

    metadata.track_number = tag.track();
    metadata.genre = tag.genre().map(|g| g.to_string()).filter(|g| !g.is_empty());
    metadata.year = tag_text(tag, &ItemKey::Year)
        .or_else(|| tag_text(tag, &ItemKey::RecordingDate))
        .and_then(|date| parse_year(&date));

    Ok(metadata)
}

fn tag_text(tag: &Tag, key: &ItemKey) -> Option<String> {
    tag.get(*key)
        .and_then(|item| item.value().text())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the year from a date such as `1977`, `1977-01-23` or
/// `1977-01-23T10:00:00`.
fn parse_year(date: &str) -> Option<i64> {
    date.get(..4)?.parse().ok()
}

fn artist_id(tx: &Transaction, cache: &mut HashMap<String, i64>, name: &str) -> Result<i64> {
    if let Some(&id) = cache.get(name) {
        return Ok(id);
    }

    tx.execute("INSERT OR IGNORE INTO artists (name) VALUES (?)", params![name])?;
    let id: i64 = tx.query_row("SELECT id FROM artists WHERE name = ?", params![name], |r| r.get(0))?;
    cache.insert(name.to_string(), id);

    Ok(id)
}

fn album_id(
    tx: &Transaction,
    cache: &mut HashMap<(i64, String), i64>,
    artist_id: i64,
    title: &str,
) -> Result<i64> {
    let key = (artist_id, title.to_string());
    if let Some(&id) = cache.get(&key) {
        return Ok(id);
    }

    tx.execute(
        "INSERT OR IGNORE INTO albums (artist_id, title) VALUES (?, ?)",
        params![artist_id, title],
    )?;
    let id: i64 = tx.query_row(
        "SELECT id FROM albums WHERE artist_id = ? AND title = ?",
        params![artist_id, title],
        |r| r.get(0),
    )?;
    cache.insert(key, id);

    Ok(id)
}
