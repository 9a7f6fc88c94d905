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

//! Logging setup.
//!
//! The terminal is owned by the user interface, so log records are appended
//! to the configured log file instead. `RUST_LOG` overrides the configured
//! level.

use std::fs::OpenOptions;

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

use crate::config::AppConfig;

pub(crate) fn init_logging(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file))?;

    Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to initialise logging")
}
