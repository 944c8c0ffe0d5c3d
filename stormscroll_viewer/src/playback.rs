// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

/// A running fixed-interval timer.
///
/// Time is fed in with [`IntervalTimer::accumulate`]; each full interval
/// yields one fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalTimer {
    interval: Duration,
    pending: Duration,
}

impl IntervalTimer {
    /// Creates a timer firing every `interval`; zero is bumped to 1 ms.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            pending: Duration::ZERO,
        }
    }

    /// Firing interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time accumulated toward the next fire.
    #[must_use]
    pub fn pending(&self) -> Duration {
        self.pending
    }

    /// Adds `dt` and returns `true` if a fire is due.
    ///
    /// Only one fire is consumed per call; call again with
    /// `Duration::ZERO` to drain backlog.
    pub fn accumulate(&mut self, dt: Duration) -> bool {
        self.pending = self.pending.saturating_add(dt);
        if self.pending >= self.interval {
            self.pending -= self.interval;
            true
        } else {
            false
        }
    }
}

/// Outcome of advancing playback time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackTick {
    /// Number of index steps taken.
    pub steps: usize,
    /// Playback reached the end and paused during this advance.
    pub finished: bool,
}

impl PlaybackTick {
    /// `true` if the displayed index changed.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.steps > 0
    }
}

/// Playback position and timer for one viewer.
///
/// `timer` is present exactly while playing. The index always stays within
/// `[0, len - 1]` (or 0 for an empty sequence).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackState {
    current_index: usize,
    len: usize,
    timer: Option<IntervalTimer>,
}

impl PlaybackState {
    /// Creates paused playback at index 0 over `len` timestamps.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            current_index: 0,
            len,
            timer: None,
        }
    }

    /// Number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if there are no timestamps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Displayed index.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Last valid index.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    /// `true` while the timer runs.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    /// The running timer, if playing.
    #[must_use]
    pub fn timer(&self) -> Option<&IntervalTimer> {
        self.timer.as_ref()
    }

    /// Starts the timer. No-op (returns `false`) if already playing or empty.
    pub fn play(&mut self, interval: Duration) -> bool {
        if self.timer.is_some() || self.len == 0 {
            return false;
        }
        self.timer = Some(IntervalTimer::new(interval));
        true
    }

    /// Stops the timer. Returns `true` if it was running.
    pub fn pause(&mut self) -> bool {
        self.timer.take().is_some()
    }

    /// Pauses and rewinds to index 0.
    pub fn reset(&mut self) {
        self.timer = None;
        self.current_index = 0;
    }

    /// Pauses and moves to `index`, clamped into the valid range.
    ///
    /// Returns the index actually selected.
    pub fn seek(&mut self, index: isize) -> usize {
        self.timer = None;
        self.current_index = usize::try_from(index).map_or(0, |i| i.min(self.last_index()));
        self.current_index
    }

    /// Advances playback time by `dt`.
    ///
    /// Each timer fire steps one index. A fire at the last index pauses
    /// instead of stepping, so playback never wraps.
    pub fn advance(&mut self, dt: Duration) -> PlaybackTick {
        let mut tick = PlaybackTick::default();
        let mut budget = dt;
        while let Some(timer) = self.timer.as_mut() {
            if !timer.accumulate(budget) {
                break;
            }
            budget = Duration::ZERO;
            if self.current_index >= self.last_index() {
                self.timer = None;
                tick.finished = true;
                break;
            }
            self.current_index += 1;
            tick.steps += 1;
        }
        tick
    }
}
