//! Scatter/chase schedule and per-level difficulty
//!
//! The schedule walks a fixed list of alternating scatter/chase steps. A
//! frightened override pauses it: the remaining time of the current step is
//! saved on entry and restored when the override expires.

use serde::{Deserialize, Serialize};

use crate::level_speed_multiplier;

/// Global ghost behaviour ordered by the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlobalMode {
    Scatter,
    Chase,
}

/// Difficulty values derived from the level number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub speed_multiplier: f32,
    pub scatter_ms: u64,
    pub short_scatter_ms: u64,
    pub chase_ms: u64,
    pub frightened_ms: u64,
}

impl Difficulty {
    pub fn for_level(level: u32) -> Self {
        let steps = level.saturating_sub(1) as u64;
        Self {
            speed_multiplier: level_speed_multiplier(level),
            scatter_ms: 7000u64.saturating_sub(500 * steps).max(3000),
            short_scatter_ms: 5000u64.saturating_sub(500 * steps).max(2000),
            chase_ms: 20_000,
            frightened_ms: 7000u64.saturating_sub(800 * steps).max(2000),
        }
    }
}

/// One schedule entry; `None` duration lasts forever
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeStep {
    pub mode: GlobalMode,
    pub duration_ms: Option<u64>,
}

/// The eight-step schedule for a level
pub fn mode_steps(level: u32) -> [ModeStep; 8] {
    let d = Difficulty::for_level(level);
    let scatter = |ms| ModeStep {
        mode: GlobalMode::Scatter,
        duration_ms: Some(ms),
    };
    let chase = ModeStep {
        mode: GlobalMode::Chase,
        duration_ms: Some(d.chase_ms),
    };
    [
        scatter(d.scatter_ms),
        chase,
        scatter(d.scatter_ms),
        chase,
        scatter(d.short_scatter_ms),
        chase,
        scatter(d.short_scatter_ms),
        ModeStep {
            mode: GlobalMode::Chase,
            duration_ms: None,
        },
    ]
}

/// What the scheduler did on an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleEvent {
    /// A new scatter or chase step started
    Entered(GlobalMode),
    /// The frightened override expired and the paused step resumed
    FrightenedEnded,
}

/// Scatter/chase timer with frightened pause/resume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeScheduler {
    steps: [ModeStep; 8],
    index: usize,
    /// Absolute time at which the current step (or the override) ends
    deadline_ms: Option<u64>,
    paused: bool,
    /// Remaining time of the paused step; `None` for the unbounded step
    saved_remaining_ms: Option<u64>,
    frightened_ms: u64,
}

impl ModeScheduler {
    pub fn new(level: u32, now_ms: u64) -> Self {
        let steps = mode_steps(level);
        Self {
            deadline_ms: steps[0].duration_ms.map(|d| now_ms + d),
            steps,
            index: 0,
            paused: false,
            saved_remaining_ms: None,
            frightened_ms: Difficulty::for_level(level).frightened_ms,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_mode(&self) -> GlobalMode {
        self.steps[self.index].mode
    }

    /// True while a frightened override is active
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Time left on the current scatter/chase step, ignoring any override
    pub fn step_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        if self.paused {
            self.saved_remaining_ms
        } else {
            self.deadline_ms.map(|d| d.saturating_sub(now_ms))
        }
    }

    /// Start (or extend) the frightened override
    pub fn enter_frightened(&mut self, now_ms: u64) {
        if !self.paused {
            self.saved_remaining_ms = self.deadline_ms.map(|d| d.saturating_sub(now_ms));
            self.paused = true;
        }
        self.deadline_ms = Some(now_ms + self.frightened_ms);
    }

    /// Drop an active override without waiting for it to expire
    pub fn cancel_frightened(&mut self, now_ms: u64) -> bool {
        if !self.paused {
            return false;
        }
        self.exit_frightened(now_ms);
        true
    }

    fn exit_frightened(&mut self, now_ms: u64) {
        self.deadline_ms = self.saved_remaining_ms.map(|r| now_ms + r);
        self.saved_remaining_ms = None;
        self.paused = false;
    }

    /// Advance when the deadline has been reached
    pub fn update(&mut self, now_ms: u64) -> Option<ScheduleEvent> {
        let deadline = self.deadline_ms?;
        if now_ms < deadline {
            return None;
        }
        if self.paused {
            self.exit_frightened(now_ms);
            return Some(ScheduleEvent::FrightenedEnded);
        }
        if self.index + 1 >= self.steps.len() {
            self.deadline_ms = None;
            return None;
        }
        self.index += 1;
        let step = self.steps[self.index];
        self.deadline_ms = step.duration_ms.map(|d| now_ms + d);
        Some(ScheduleEvent::Entered(step.mode))
    }
}
