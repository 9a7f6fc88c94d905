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

//! Application configuration.
//!
//! This module manages the application configuration file. A missing or
//! unreadable configuration file is replaced by the defaults.

use std::path::Path;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "playworks";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    pub media_dirs: Vec<String>,
    pub database_file: String,
    pub log_file: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            media_dirs: vec![],
            database_file: "playworks.db".to_string(),
            log_file: "playworks.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Adds a media directory, which must exist.
    ///
    /// Returns `false` if the directory was already configured.
    pub fn add_media_dir(&mut self, dir: &str) -> Result<bool> {
        if !Path::new(dir).is_dir() {
            bail!("{} is not a directory", dir);
        }

        if self.media_dirs.iter().any(|d| d == dir) {
            return Ok(false);
        }

        self.media_dirs.push(dir.to_string());
        Ok(true)
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub fn save_config(cfg: &AppConfig) -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, None, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.media_dirs.is_empty());
        assert_eq!(config.database_file, "playworks.db");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_add_media_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();

        let mut config = AppConfig::default();
        assert!(config.add_media_dir(&path).unwrap());
        assert!(!config.add_media_dir(&path).unwrap());
        assert_eq!(config.media_dirs, vec![path]);
    }

    #[test]
    fn test_add_missing_media_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope").to_string_lossy().to_string();

        let mut config = AppConfig::default();
        let err = config.add_media_dir(&missing).unwrap_err();
        assert!(err.to_string().ends_with("is not a directory"));
        assert!(config.media_dirs.is_empty());
    }

    #[test]
    fn test_store_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playworks.toml");

        let config = AppConfig {
            media_dirs: vec!["/music".to_string()],
            log_level: "debug".to_string(),
            ..AppConfig::default()
        };
        confy::store_path(&path, &config).unwrap();

        let loaded: AppConfig = confy::load_path(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
