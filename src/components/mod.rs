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

//! Interactive user interface components.
//!
//! Each component keeps its own state and handles its own key events, with
//! rendering kept in a separate `render` sub-module.

pub(crate) mod playlists;
pub(crate) mod song_table;
pub(crate) mod track_table;

pub(crate) use playlists::PlaylistList;
pub(crate) use song_table::SongTableView;
pub(crate) use track_table::TrackTableAction;
