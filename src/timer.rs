//! Focus timer state machine.
//!
//! The timer itself never schedules anything; [`crate::FocusTicker`] drives
//! [`FocusTimer::tick`] once per second while the timer is running.
use serde::{Deserialize, Serialize};

use crate::parse_leading_int;

/// Default session length in minutes.
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

/// Longest session that can be configured.
pub const MAX_FOCUS_MINUTES: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerPhase {
    /// Not running, full duration remaining
    Idle,
    Running,
    /// Stopped part-way through a session
    Paused,
    /// Counted down to zero
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusTimer {
    duration_minutes: u32,
    remaining_seconds: u32,
    is_running: bool,
    pending_minutes_input: String,
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_MINUTES)
    }
}

impl FocusTimer {
    /// Creates an idle timer. `minutes` is clamped to `1..=MAX_FOCUS_MINUTES`.
    pub fn new(minutes: u32) -> Self {
        let minutes = minutes.clamp(1, MAX_FOCUS_MINUTES);
        Self {
            duration_minutes: minutes,
            remaining_seconds: minutes * 60,
            is_running: false,
            pending_minutes_input: minutes.to_string(),
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn pending_minutes_input(&self) -> &str {
        &self.pending_minutes_input
    }

    fn full_seconds(&self) -> u32 {
        self.duration_minutes * 60
    }

    pub fn phase(&self) -> TimerPhase {
        if self.is_running {
            TimerPhase::Running
        } else if self.remaining_seconds == 0 {
            TimerPhase::Expired
        } else if self.remaining_seconds == self.full_seconds() {
            TimerPhase::Idle
        } else {
            TimerPhase::Paused
        }
    }

    /// Start/pause button. An expired timer is reloaded before it starts.
    ///
    /// Returns whether the timer is running afterwards.
    pub fn toggle(&mut self) -> bool {
        if self.remaining_seconds == 0 {
            self.remaining_seconds = self.full_seconds();
        }
        self.is_running = !self.is_running;
        self.is_running
    }

    /// Advances one second. Returns `true` if this tick expired the session.
    pub fn tick(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.is_running = false;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.is_running = false;
        self.remaining_seconds = self.full_seconds();
    }

    pub fn set_pending_minutes_input(&mut self, input: impl Into<String>) {
        self.pending_minutes_input = input.into();
    }

    /// Commits the pending input as the new duration.
    ///
    /// Non-numeric or non-positive input is ignored and `None` is returned.
    /// Otherwise the value is clamped, the countdown reloaded and stopped.
    pub fn apply_pending_minutes(&mut self) -> Option<u32> {
        let minutes = parse_leading_int(&self.pending_minutes_input).filter(|m| *m > 0)?;
        let limited = minutes.min(MAX_FOCUS_MINUTES as i64) as u32;

        self.duration_minutes = limited;
        self.remaining_seconds = limited * 60;
        self.is_running = false;
        Some(limited)
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_running {
            "Pause"
        } else if self.remaining_seconds == 0 {
            "Restart"
        } else {
            "Start focus session"
        }
    }
}
