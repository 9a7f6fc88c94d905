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

//! Command-line input logic and state management.
//!
//! This module implements a command-line component: `:` opens a text input,
//! and when a command is submitted it is parsed into a [`Command`] and
//! dispatched to the application as an event.

use std::sync::mpsc::Sender;

use crossterm::event::{Event, KeyCode};
use log::debug;
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::events::AppEvent;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Quit,
    Scan,
    AddMediaDir(String),
    Find(String),
    Library,
    NewPlaylist(String),
    NewDynamicPlaylist { name: String, query: String },
    DeletePlaylist,
    AddToPlaylist(String),
    RemoveFromPlaylist,
    Shuffle,
}

/// Parses a command line.
///
/// Returns a message suitable for the status line if the command is unknown
/// or its arguments are missing.
pub(crate) fn parse_command(buffer: &str) -> Result<Command, String> {
    let buffer = buffer.trim();
    let (name, args) = match buffer.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (buffer, ""),
    };

    let required = |usage: &str| {
        if args.is_empty() {
            Err(format!("Usage: {}", usage))
        } else {
            Ok(args.to_string())
        }
    };

    let command = match name {
        "q" => Command::Quit,
        "scan" => Command::Scan,
        "lib" => Command::AddMediaDir(required("lib <directory>")?),
        "find" => Command::Find(required("find <query>")?),
        "library" => Command::Library,
        "newpl" => Command::NewPlaylist(required("newpl <name>")?),
        "newdyn" => {
            let usage = "Usage: newdyn <name> <query>";
            let (name, query) = args
                .split_once(char::is_whitespace)
                .ok_or_else(|| usage.to_string())?;
            Command::NewDynamicPlaylist {
                name: name.to_string(),
                query: query.trim().to_string(),
            }
        }
        "delpl" => Command::DeletePlaylist,
        "add" => Command::AddToPlaylist(required("add <playlist>")?),
        "rm" => Command::RemoveFromPlaylist,
        "shuffle" => Command::Shuffle,
        other => return Err(format!("Unknown command: {}", other)),
    };

    Ok(command)
}

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Handles a key event, returning `true` if the commander consumed it.
    ///
    /// A submitted command is sent as [`AppEvent::RunCommand`], or as
    /// [`AppEvent::Error`] if it could not be parsed.
    pub(crate) fn handle_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> bool {
        let Event::Key(key_event) = event else {
            return false;
        };

        if !self.active {
            if key_event.code == KeyCode::Char(':') {
                self.active = true;
                return true;
            }
            return false;
        }

        match key_event.code {
            KeyCode::Esc => {
                self.active = false;
                self.input.reset();
            }

            KeyCode::Enter => {
                let buffer = self.input.value().trim().to_string();
                self.input.reset();
                self.active = false;

                if !buffer.is_empty() {
                    debug!("Running command '{}'", buffer);
                    let event = match parse_command(&buffer) {
                        Ok(command) => AppEvent::RunCommand(command),
                        Err(message) => AppEvent::Error(message),
                    };
                    let _ = event_tx.send(event);
                }
            }

            // Delegate all other key events to the managed input component.
            _ => {
                self.input.handle_event(event);
            }
        }

        true
    }
}
