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

//! Database row mapping for domain models.
//!
//! This module provides the conversion logic between raw SQLite result rows
//! and high-level domain models, ensuring type-safe extraction of model
//! attributes from database queries.

use rusqlite::{
    Result, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};

use crate::{
    model::{Playlist, PlaylistId, PlaylistKind, Rating, TrackInfo},
    query::Param,
};

impl TrackInfo {
    /// Maps an SQLite row to a [`TrackInfo`] instance.
    ///
    /// This is a helper function designed to be used with
    /// [`rusqlite::Statement::query_map`] over [`super::TRACK_INFO_SELECT`].
    ///
    /// # Errors
    ///
    /// Returns a [`rusqlite::Error`] if:
    /// * The row does not contain enough columns.
    /// * The data in a column cannot be converted to the required Rust type.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            track_id: row.get(0)?,
            durable_id: row.get(1)?,
            track_number: row.get(2)?,
            track_title: row.get(3)?,
            artist_name: row.get(4)?,
            album_title: row.get(5)?,
            duration: row.get(6)?,
            genre: row.get(7)?,
            year: row.get(8)?,
            bitrate: row.get(9)?,
            filename: row.get(10)?,
            play_count: row.get(11)?,
            rating: row.get(12)?,
            last_played: row.get(13)?,
        })
    }
}

impl Playlist {
    /// Maps an `id, name, description, query, kind` row to a [`Playlist`].
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(PlaylistId(row.get(0)?)),
            name: row.get(1)?,
            description: row.get(2)?,
            query: row.get(3)?,
            kind: row.get(4)?,
        })
    }
}

impl ToSql for Rating {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        let val = match self {
            Rating::Like => 1,
            Rating::Neutral => 0,
            Rating::Dislike => -1,
        };
        Ok(ToSqlOutput::from(val))
    }
}

impl FromSql for Rating {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_i64()? {
            1 => Ok(Rating::Like),
            0 => Ok(Rating::Neutral),
            -1 => Ok(Rating::Dislike),
            other => Err(FromSqlError::OutOfRange(other)),
        }
    }
}

impl ToSql for PlaylistKind {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PlaylistKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "static" => Ok(PlaylistKind::Static),
            "dynamic" => Ok(PlaylistKind::Dynamic),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for PlaylistId {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl ToSql for Param {
    fn to_sql(&self) -> Result<ToSqlOutput<'_>> {
        match self {
            Param::Text(text) => Ok(ToSqlOutput::from(text.as_str())),
            Param::Integer(value) => Ok(ToSqlOutput::from(*value)),
            Param::Real(value) => Ok(ToSqlOutput::from(*value)),
        }
    }
}
