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

//! # Playworks.
//!
//! A terminal music library with static and query-driven playlists.
//!
//! This application coordinates a TUI frontend built with `ratatui` and a
//! background processing layer.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** owns the [`App`] state, manages the terminal
//!   lifecycle and renders the UI.
//! * The **Task Worker** owns the database connection and runs library scans,
//!   searches and playlist updates.
//! * The **Player Worker** drives `mpv` and reports playback progress.
//! * **Input and Tick Threads** capture key presses and periodic refreshes.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern so that the
//! terminal state is restored even when the run fails. All communication
//! between the UI and the workers goes over `std::sync::mpsc` channels.

mod backend;
mod commander;
mod components;
mod config;
mod db;
mod events;
mod logging;
mod model;
mod player;
mod query;
mod render;
mod tasks;
mod theme;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use crate::{
    backend::Backend,
    commander::Commander,
    components::{PlaylistList, SongTableView},
    config::AppConfig,
    events::{AppEvent, process_events},
    model::{TrackInfo, catalog::Catalog, queue::Queue},
    player::AudioPlayer,
    tasks::AppTask,
    theme::Theme,
};

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Sidebar,
    Table,
}

/// A message for the status line.
#[derive(Debug, Clone)]
pub(crate) struct StatusMessage {
    pub(crate) text: String,
    pub(crate) is_error: bool,
}

/// Application state.
pub(crate) struct App {
    pub(crate) config: AppConfig,

    pub(crate) theme: Theme,
    pub(crate) focus: Focus,

    pub(crate) event_tx: Sender<AppEvent>,
    pub(crate) event_rx: Receiver<AppEvent>,

    pub(crate) backend: Backend,
    pub(crate) audio_player: AudioPlayer,

    pub(crate) queue: Queue,
    pub(crate) catalog: Catalog,

    pub(crate) song_table: SongTableView,
    pub(crate) playlist_list: PlaylistList,

    pub(crate) commander: Commander,
    pub(crate) status: Option<StatusMessage>,

    pub(crate) now_playing: Option<TrackInfo>,
    pub(crate) player_track_name: Option<String>,
    pub(crate) player_duration: Option<u64>,
    pub(crate) player_time: Option<u64>,
    pub(crate) player_position: Option<f64>,
    pub(crate) volume: Option<u32>,
}

impl App {
    /// Create a new instance of application state, starting the audio player.
    pub(crate) fn new(config: AppConfig, task_tx: Sender<AppTask>) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let audio_player = AudioPlayer::new(event_tx.clone())?;

        Ok(Self::with_channel(
            config,
            event_tx,
            event_rx,
            Backend::new(task_tx),
            audio_player,
        ))
    }

    /// Assembles application state around an existing backend and player.
    #[cfg(test)]
    pub(crate) fn from_parts(config: AppConfig, backend: Backend, audio_player: AudioPlayer) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self::with_channel(config, event_tx, event_rx, backend, audio_player)
    }

    fn with_channel(
        config: AppConfig,
        event_tx: Sender<AppEvent>,
        event_rx: Receiver<AppEvent>,
        backend: Backend,
        audio_player: AudioPlayer,
    ) -> Self {
        Self {
            config,
            theme: Theme::default(),
            focus: Focus::Table,
            event_tx,
            event_rx,
            backend,
            audio_player,
            queue: Queue::new(),
            catalog: Catalog::new(),
            song_table: SongTableView::new(),
            playlist_list: PlaylistList::new(),
            commander: Commander::new(),
            status: None,
            now_playing: None,
            player_track_name: None,
            player_duration: None,
            player_time: None,
            player_position: None,
            volume: None,
        }
    }

    pub(crate) fn set_status(&mut self, text: String) {
        self.status = Some(StatusMessage {
            text,
            is_error: false,
        });
    }

    pub(crate) fn set_error(&mut self, text: String) {
        warn!("{}", text);
        self.status = Some(StatusMessage {
            text,
            is_error: true,
        });
    }

    /// Name of the playlist currently shown in the song table, if any.
    pub(crate) fn current_playlist_name(&self) -> Option<&str> {
        self.song_table
            .current_playlist_id
            .filter(|_| self.song_table.in_playlist_mode)
            .and_then(|id| self.playlist_list.find(id))
            .map(|p| p.name.as_str())
    }
}

/// The entry point of the application.
///
/// Sets up logging and the communication channels, initializes the
/// application state, manages the terminal lifecycle, and returns an error if
/// any part of the execution fails.
fn main() -> Result<()> {
    let config = config::load_config();

    logging::init_logging(&config).context("Failed to initialise logging")?;
    info!("Starting with {} media directories", config.media_dirs.len());

    let (task_tx, task_rx) = mpsc::channel();

    let mut app = App::new(config, task_tx).context("Failed to initialise application")?;

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app, task_rx);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    if let Some(hex) = Theme::to_hex(app.theme.background_colour) {
        util::term::set_terminal_bg(&hex);
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Best-effort, failures are ignored.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg();
    terminal.show_cursor().ok();
}

/// Starts the background workers and enters the main event loop.
///
/// This spawns the task worker that owns the database, a thread translating
/// key presses to events, and a tick thread that sets the minimum redraw
/// rate. The playlists and library are then requested so the first frames
/// have something to show.
///
/// # Errors
///
/// Returns an error if the event loop fails or a worker reports a fatal
/// error.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    task_rx: Receiver<AppTask>,
) -> Result<()> {
    tasks::spawn_task_worker(
        app.config.clone(),
        app.backend.scan_flag(),
        task_rx,
        app.event_tx.clone(),
    );

    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                if tx_keys.send(AppEvent::Key(key)).is_err() {
                    break;
                }
            }
        }
    });

    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(Duration::from_millis(250));
        }
    });

    app.backend.load_playlists()?;
    app.backend.load_library()?;

    process_events(terminal, app)
}
