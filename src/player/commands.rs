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

//! The `mpv` playback worker.
//!
//! The worker owns the `mpv` handle. It alternates between draining
//! [`AudioPlayerCommand`]s sent by [`AudioPlayer`] and waiting briefly for
//! `mpv` events, which it turns into [`AppEvent`]s for the main loop.

use anyhow::{Context, Result};
use log::{debug, error, info};
use mpv::{EndFileReason, Format, MpvHandler};
use std::{
    sync::mpsc::{Receiver, Sender, TryRecvError},
    thread,
};

use crate::{
    events::AppEvent,
    player::{AudioPlayer, PlayerState},
};

/// Longest wait for an `mpv` event before checking for commands again, in
/// seconds.
const EVENT_WAIT: f64 = 0.05;

/// Properties observed on the `mpv` handle.
const OBSERVED: [&str; 6] = [
    "media-title",
    "duration",
    "pause",
    "time-pos",
    "volume",
    "idle-active",
];

#[derive(Debug)]
pub(crate) enum AudioPlayerCommand {
    PlayFile(String),
    TogglePause,
    Seek(i32),
    Stop,
    AdjustVolume(i32),
    ToggleMute,
}

/// Spawns the audio worker thread.
///
/// A worker failure, including failure to start `mpv`, is reported as a
/// fatal application event. The worker ends quietly when the player handle
/// is dropped.
///
/// # Arguments
///
/// * `command_rx` - The receiving end of the player command channel.
/// * `event_tx` - The channel used to report playback changes and failures.
pub(crate) fn spawn_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) {
    thread::spawn(move || {
        let result = PlayerWorker::new(event_tx.clone()).and_then(|mut worker| worker.run(&command_rx));

        if let Err(e) = result {
            error!("Player worker failed: {:#}", e);
            let _ = event_tx.send(AppEvent::FatalError(format!("Player worker failed: {:#}", e)));
        }
    });
}

struct PlayerWorker {
    handler: MpvHandler,
    event_tx: Sender<AppEvent>,
    is_paused: bool,
    is_idle: bool,
    state: PlayerState,
}

impl PlayerWorker {
    /// Starts `mpv` without video output and observes the properties the
    /// player panel shows.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - The channel the worker reports playback changes on.
    ///
    /// # Errors
    ///
    /// Returns an error if `mpv` cannot be created or refuses an option or
    /// property observer.
    fn new(event_tx: Sender<AppEvent>) -> Result<Self> {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create mpv builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to disable video output")?;
        let mut handler = builder.build().context("Failed to build mpv handler")?;

        for name in OBSERVED {
            match name {
                "media-title" => handler.observe_property::<&str>(name, 0),
                "pause" | "idle-active" => handler.observe_property::<bool>(name, 0),
                _ => handler.observe_property::<f64>(name, 0),
            }
            .with_context(|| format!("Failed to observe {}", name))?;
        }

        info!("Player worker started");

        Ok(Self {
            handler,
            event_tx,
            is_paused: false,
            is_idle: true,
            state: PlayerState::Stopped,
        })
    }

    /// Alternates between draining pending commands and waiting for `mpv`
    /// events, until the command channel disconnects.
    ///
    /// # Arguments
    ///
    /// * `command_rx` - The receiving end of the player command channel.
    ///
    /// # Errors
    ///
    /// Returns an error if a command fails or an event cannot be sent.
    fn run(&mut self, command_rx: &Receiver<AudioPlayerCommand>) -> Result<()> {
        loop {
            loop {
                match command_rx.try_recv() {
                    Ok(command) => self.execute(command)?,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        debug!("Player handle dropped, stopping worker");
                        return Ok(());
                    }
                }
            }

            self.poll_event()?;
        }
    }

    /// Sends a single command to `mpv`.
    ///
    /// # Errors
    ///
    /// Returns an error if `mpv` rejects the command.
    fn execute(&mut self, command: AudioPlayerCommand) -> Result<()> {
        debug!("Player command {:?}", command);

        match command {
            AudioPlayerCommand::PlayFile(filename) => {
                self.handler
                    .command(&["loadfile", &filename, "replace"])
                    .with_context(|| format!("Failed to load {}", filename))?;
                self.handler.set_property("pause", false)?;
            }
            AudioPlayerCommand::TogglePause => self.handler.command(&["cycle", "pause"])?,
            AudioPlayerCommand::Seek(delta) => {
                self.handler
                    .command(&["seek", &delta.to_string(), "relative"])?
            }
            AudioPlayerCommand::Stop => self.handler.command(&["stop"])?,
            AudioPlayerCommand::AdjustVolume(delta) => {
                self.handler.command(&["add", "volume", &delta.to_string()])?
            }
            AudioPlayerCommand::ToggleMute => self.handler.command(&["cycle", "mute"])?,
        }

        Ok(())
    }

    /// Waits for one `mpv` event and forwards what it means to the main loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the main loop has gone away.
    fn poll_event(&mut self) -> Result<()> {
        let Some(mpv_event) = self.handler.wait_event(EVENT_WAIT) else {
            return Ok(());
        };

        let app_event = match mpv_event {
            mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
                ("media-title", Format::Str(title)) => Some(AppEvent::TitleChanged(title.to_string())),
                ("duration", Format::Double(duration)) => Some(AppEvent::DurationChanged(duration as u64)),
                ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                    Some(AppEvent::TimeChanged(seconds))
                }
                ("volume", Format::Double(volume)) => {
                    Some(AppEvent::VolumeChanged(volume.round() as u32))
                }
                ("pause", Format::Flag(paused)) => {
                    self.is_paused = paused;
                    None
                }
                ("idle-active", Format::Flag(idle)) => {
                    self.is_idle = idle;
                    None
                }
                _ => None,
            },
            mpv::Event::EndFile(Ok(EndFileReason::MPV_END_FILE_REASON_EOF)) => {
                Some(AppEvent::TrackFinished)
            }
            _ => None,
        };

        let state = AudioPlayer::player_state(self.is_paused, self.is_idle);
        if state != self.state {
            self.state = state;
            self.send(AppEvent::PlayerStateChanged(state))?;
        }

        if let Some(event) = app_event {
            self.send(event)?;
        }

        Ok(())
    }

    fn send(&self, event: AppEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .context("Failed to send player event")
    }
}
