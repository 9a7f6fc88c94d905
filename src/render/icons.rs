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

//! Unicode symbols for the TUI.
//!
//! Where a symbol also has an emoji presentation, Variation Selector-15
//! (`\u{FE0E}`) asks the terminal for the monochrome text form so the theme
//! colours apply.

// Media controls
pub(crate) const ICON_PLAY: &str = "\u{25B6}";
pub(crate) const ICON_PAUSE: &str = "\u{23F8}";
pub(crate) const ICON_STOP: &str = "\u{23F9}";

// Sidebar entries
pub(crate) const ICON_LIBRARY: &str = "\u{266B}";
pub(crate) const ICON_STATIC: &str = "\u{2261}";
pub(crate) const ICON_DYNAMIC: &str = "\u{2699}\u{FE0E}";

pub(crate) const THUMB_UP: &str = "\u{1F44D}";
pub(crate) const THUMB_DOWN: &str = "\u{1F44E}";
