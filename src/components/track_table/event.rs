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

//! Input handling and event processing for the track table.
//!
//! This module maps raw terminal keyboard events to table navigation and
//! selection, returning a [`TrackTableAction`] for anything the table cannot
//! handle by itself.

use crossterm::event::{Event, KeyCode, KeyModifiers};

use crate::components::track_table::{TrackTable, TrackTableAction};

impl TrackTable {
    /// Handles a key event.
    ///
    /// Returns `None` when the key is not one the table reacts to, otherwise
    /// the key was consumed and any resulting action is returned.
    pub(crate) fn process_event(&mut self, event: &Event) -> Option<Option<TrackTableAction>> {
        let Event::Key(key_event) = event else {
            return None;
        };

        match (key_event.code, key_event.modifiers) {
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => self.goto_next(),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => self.goto_previous(),
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => self.goto_first(),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => self.goto_last(),

            (KeyCode::Char('H'), _) => self.goto_high(),
            (KeyCode::Char('M'), _) => self.goto_middle(),
            (KeyCode::Char('L'), _) => self.goto_low(),

            (KeyCode::Char('f'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => {
                self.goto_page_forward()
            }
            (KeyCode::Char('b'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => {
                self.goto_page_back()
            }
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => self.goto_half_page_forward(),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.goto_half_page_back(),

            (KeyCode::Char('a'), KeyModifiers::CONTROL) => self.select_all(),
            (KeyCode::Char('t'), KeyModifiers::CONTROL) => self.select_inverse(),
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => self.clear_selection(),

            (KeyCode::Char(' '), _) => {
                self.toggle_select_current();
                self.goto_next();
            }

            (KeyCode::Backspace, _) => {
                self.toggle_select_current();
                self.goto_previous();
            }

            (KeyCode::Enter, _) => {
                return Some(self.highlighted().map(TrackTableAction::ActivateCurrent));
            }

            _ => return None,
        }

        Some(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::track_table::test_track;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_enter_activates_highlighted_row() {
        let mut table = TrackTable::new();
        table.set_tracks(vec![test_track(1), test_track(2)]);

        assert_eq!(table.process_event(&key(KeyCode::Char('j'))), Some(None));
        assert_eq!(
            table.process_event(&key(KeyCode::Enter)),
            Some(Some(TrackTableAction::ActivateCurrent(1)))
        );
    }

    #[test]
    fn test_space_selects_and_advances() {
        let mut table = TrackTable::new();
        table.set_tracks(vec![test_track(1), test_track(2)]);

        table.process_event(&key(KeyCode::Char(' ')));
        assert_eq!(table.selection_len(), 1);
        assert_eq!(table.highlighted(), Some(1));
    }

    #[test]
    fn test_unhandled_keys_pass_through() {
        let mut table = TrackTable::new();
        assert_eq!(table.process_event(&key(KeyCode::Char('p'))), None);
        assert_eq!(table.process_event(&key(KeyCode::Enter)), Some(None));
    }
}
