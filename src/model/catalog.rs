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

//! Media catalog scan status.
//!
//! This module tracks the progress of a library scan so it can be shown in
//! the status line while the background worker rebuilds the catalog.

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum CatalogStatus {
    Idle,
    Scanning,
    Finished,
}

pub(crate) struct Catalog {
    pub(crate) status: CatalogStatus,
    pub(crate) count: usize,
    pub(crate) errors: Vec<String>,
}

impl Catalog {
    pub(crate) fn new() -> Self {
        Self {
            status: CatalogStatus::Idle,
            count: 0,
            errors: vec![],
        }
    }

    pub(crate) fn begin_scan(&mut self) {
        self.status = CatalogStatus::Scanning;
        self.count = 0;
        self.errors.clear();
    }

    pub(crate) fn update_scan(&mut self, count: usize) {
        if self.status == CatalogStatus::Scanning {
            self.count = count;
        }
    }

    pub(crate) fn finish_scan(&mut self, count: usize, errors: Vec<String>) {
        self.status = CatalogStatus::Finished;
        self.count = count;
        self.errors = errors;
    }

    pub(crate) fn fail_scan(&mut self) {
        self.status = CatalogStatus::Idle;
    }

    /// Short human readable summary for the status line, if there is anything
    /// worth showing.
    pub(crate) fn summary(&self) -> Option<String> {
        match self.status {
            CatalogStatus::Idle => None,
            CatalogStatus::Scanning => Some(format!("Scanning... {} files", self.count)),
            CatalogStatus::Finished if self.errors.is_empty() => {
                Some(format!("Scan finished, {} tracks", self.count))
            }
            CatalogStatus::Finished => Some(format!(
                "Scan finished, {} tracks, {} skipped",
                self.count,
                self.errors.len()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_lifecycle() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.summary(), None);

        catalog.begin_scan();
        catalog.update_scan(25);
        assert_eq!(catalog.summary().as_deref(), Some("Scanning... 25 files"));

        catalog.finish_scan(40, vec!["/music/broken.mp3".to_string()]);
        assert_eq!(catalog.status, CatalogStatus::Finished);
        assert_eq!(
            catalog.summary().as_deref(),
            Some("Scan finished, 40 tracks, 1 skipped")
        );
    }

    #[test]
    fn test_progress_ignored_when_not_scanning() {
        let mut catalog = Catalog::new();
        catalog.update_scan(10);
        assert_eq!(catalog.count, 0);
    }
}
