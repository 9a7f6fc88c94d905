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

//! Playback queue management.
//!
//! The queue is filled from whatever the song table is showing when a track
//! is activated. Tracks already played are kept so playback can step
//! backwards; the last played track is the current one.

use std::collections::VecDeque;

use rand::{rng, seq::SliceRandom};

use crate::model::TrackInfo;

pub(crate) struct Queue {
    queued: VecDeque<TrackInfo>,
    played: Vec<TrackInfo>,
}

impl Queue {
    pub(crate) fn new() -> Self {
        Self {
            queued: VecDeque::new(),
            played: Vec::new(),
        }
    }

    /// Replaces the queue with `tracks` and makes the track at `index` the
    /// current one.
    pub(crate) fn play_from(&mut self, tracks: Vec<TrackInfo>, index: usize) -> Option<&TrackInfo> {
        self.clear();
        if index >= tracks.len() {
            return None;
        }

        let mut tracks = tracks;
        self.queued = tracks.split_off(index).into();
        self.played = tracks;

        self.next()
    }

    pub(crate) fn shuffle(&mut self) {
        let mut rng = rng();
        let slice = self.queued.make_contiguous();
        slice.shuffle(&mut rng);
    }

    pub(crate) fn clear(&mut self) {
        self.queued.clear();
        self.played.clear();
    }

    pub(crate) fn current(&self) -> Option<&TrackInfo> {
        self.played.last()
    }

    /// Advances to the next queued track, returning `None` at the end of the
    /// queue.
    pub(crate) fn next(&mut self) -> Option<&TrackInfo> {
        let track = self.queued.pop_front()?;
        self.played.push(track);
        self.played.last()
    }

    pub(crate) fn previous(&mut self) -> Option<&TrackInfo> {
        if self.played.len() > 1 {
            if let Some(track) = self.played.pop() {
                self.queued.push_front(track);
            }
        }

        self.played.last()
    }

    /// One-based position of the current track, zero when nothing has played.
    pub(crate) fn position(&self) -> usize {
        self.played.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.played.len() + self.queued.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rating;

    fn track(id: i64) -> TrackInfo {
        TrackInfo {
            track_id: id,
            durable_id: id * 100,
            track_number: Some(id),
            track_title: format!("Track {}", id),
            artist_name: "Artist".to_string(),
            album_title: "Album".to_string(),
            duration: 180,
            genre: None,
            year: None,
            bitrate: None,
            filename: format!("/music/{}.mp3", id),
            play_count: 0,
            rating: Rating::Neutral,
            last_played: None,
        }
    }

    fn tracks(n: i64) -> Vec<TrackInfo> {
        (1..=n).map(track).collect()
    }

    #[test]
    fn test_play_from_middle() {
        let mut queue = Queue::new();
        let current = queue.play_from(tracks(5), 2).map(|t| t.track_id);
        assert_eq!(current, Some(3));
        assert_eq!(queue.len(), 5);

        assert_eq!(queue.position(), 3);

        assert_eq!(queue.next().map(|t| t.track_id), Some(4));
        assert_eq!(queue.previous().map(|t| t.track_id), Some(3));
        assert_eq!(queue.previous().map(|t| t.track_id), Some(2));
        assert_eq!(queue.position(), 2);
    }

    #[test]
    fn test_play_from_out_of_range() {
        let mut queue = Queue::new();
        assert!(queue.play_from(tracks(2), 2).is_none());
        assert_eq!(queue.len(), 0);
        assert!(queue.current().is_none());
        assert_eq!(queue.position(), 0);
    }

    #[test]
    fn test_next_at_end_returns_none() {
        let mut queue = Queue::new();
        queue.play_from(tracks(2), 1);
        assert!(queue.next().is_none());
        assert_eq!(queue.current().map(|t| t.track_id), Some(2));
    }

    #[test]
    fn test_previous_stays_on_first_track() {
        let mut queue = Queue::new();
        queue.play_from(tracks(3), 0);
        assert_eq!(queue.previous().map(|t| t.track_id), Some(1));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_shuffle_keeps_current_and_membership() {
        let mut queue = Queue::new();
        queue.play_from(tracks(20), 4);
        queue.shuffle();

        assert_eq!(queue.current().map(|t| t.track_id), Some(5));
        assert_eq!(queue.len(), 20);

        let mut remaining = vec![];
        while let Some(track) = queue.next() {
            remaining.push(track.track_id);
        }
        remaining.sort();
        assert_eq!(remaining, (6..=20).collect::<Vec<_>>());
    }
}
