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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application, tracks and
//! playlists, representing the underlying data schema used for library
//! management and playback.

pub(crate) mod catalog;
pub(crate) mod queue;

use std::fmt;

/// A display-ready track, joined with its album, artist and play statistics.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrackInfo {
    pub(crate) track_id: i64,
    /// Hash of the file path, stable across library rescans.
    pub(crate) durable_id: i64,
    pub(crate) track_number: Option<i64>,
    pub(crate) track_title: String,
    pub(crate) artist_name: String,
    pub(crate) album_title: String,
    pub(crate) duration: i64,
    pub(crate) genre: Option<String>,
    pub(crate) year: Option<i64>,
    pub(crate) bitrate: Option<i64>,
    pub(crate) filename: String,
    pub(crate) play_count: i64,
    pub(crate) rating: Rating,
    pub(crate) last_played: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub(crate) enum Rating {
    Like,
    #[default]
    Neutral,
    Dislike,
}

impl Rating {
    /// The next rating in the order neutral, like, dislike.
    pub(crate) fn cycle(self) -> Self {
        match self {
            Rating::Neutral => Rating::Like,
            Rating::Like => Rating::Dislike,
            Rating::Dislike => Rating::Neutral,
        }
    }
}

/// Opaque identifier of a playlist.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub(crate) struct PlaylistId(pub(crate) i64);

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub(crate) enum PlaylistKind {
    /// An explicit, ordered list of tracks.
    #[default]
    Static,
    /// A stored search query, evaluated every time the playlist is loaded.
    Dynamic,
}

impl PlaylistKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            PlaylistKind::Static => "static",
            PlaylistKind::Dynamic => "dynamic",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Playlist {
    pub(crate) id: Option<PlaylistId>,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) query: String,
    pub(crate) kind: PlaylistKind,
}

impl Playlist {
    pub(crate) fn new_static(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn new_dynamic(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            kind: PlaylistKind::Dynamic,
            ..Self::default()
        }
    }
}
