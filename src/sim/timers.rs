//! One-shot deferred tasks owned by a match
//!
//! Every delayed transition (ghost release, level advance, message dismissal)
//! is an explicit entry here so a match can cancel all of them on teardown.

use serde::{Deserialize, Serialize};

use super::ghost::GhostId;
use crate::error::MatchError;

/// Upper bound on outstanding tasks for one match
pub const MAX_PENDING_TIMERS: usize = 64;

/// Handle returned by [`Timers::schedule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// Deferred work items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Send a ghost that is waiting at home back out
    ReleaseGhost(GhostId),
    /// Start the next level after the transition freeze
    AdvanceLevel,
    /// Clear the transient on-screen message
    DismissMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    id: TimerId,
    at_ms: u64,
    task: Task,
}

/// Pending one-shot timers, fired in (time, id) order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    entries: Vec<Entry>,
    next_id: u32,
}

impl Timers {
    /// Schedule `task` to fire once at `at_ms`
    pub fn schedule(&mut self, at_ms: u64, task: Task) -> Result<TimerId, MatchError> {
        if self.entries.len() >= MAX_PENDING_TIMERS {
            return Err(MatchError::Timer(format!(
                "{MAX_PENDING_TIMERS} timers already pending, cannot schedule {task:?}"
            )));
        }
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry { id, at_ms, task });
        Ok(id)
    }

    /// Cancel one timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every timer whose task matches
    pub fn cancel_where(&mut self, pred: impl Fn(&Task) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(&e.task));
        before - self.entries.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_pending(&self, task: Task) -> bool {
        self.entries.iter().any(|e| e.task == task)
    }

    /// Remove and return the tasks due at `now_ms`
    pub fn take_due(&mut self, now_ms: u64) -> Vec<Task> {
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|e| {
            if e.at_ms <= now_ms {
                due.push(e.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|e| (e.at_ms, e.id));
        due.into_iter().map(|e| e.task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_time_order() {
        let mut timers = Timers::default();
        timers.schedule(300, Task::AdvanceLevel).unwrap();
        timers.schedule(100, Task::DismissMessage).unwrap();
        timers.schedule(100, Task::ReleaseGhost(GhostId::Inky)).unwrap();

        assert!(timers.take_due(99).is_empty());
        assert_eq!(
            timers.take_due(200),
            vec![Task::DismissMessage, Task::ReleaseGhost(GhostId::Inky)]
        );
        assert_eq!(timers.pending(), 1);
        assert_eq!(timers.take_due(300), vec![Task::AdvanceLevel]);
        assert!(timers.take_due(10_000).is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::default();
        let a = timers.schedule(100, Task::AdvanceLevel).unwrap();
        timers.schedule(100, Task::ReleaseGhost(GhostId::Pinky)).unwrap();
        timers.schedule(100, Task::ReleaseGhost(GhostId::Clyde)).unwrap();

        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert_eq!(
            timers.cancel_where(|t| matches!(t, Task::ReleaseGhost(_))),
            2
        );
        assert!(timers.take_due(100).is_empty());
    }

    #[test]
    fn test_capacity_is_a_match_error() {
        let mut timers = Timers::default();
        for i in 0..MAX_PENDING_TIMERS {
            timers.schedule(i as u64, Task::DismissMessage).unwrap();
        }
        let err = timers.schedule(0, Task::AdvanceLevel).unwrap_err();
        assert!(matches!(err, MatchError::Timer(_)));
        assert_eq!(timers.cancel_all(), MAX_PENDING_TIMERS);
        assert!(timers.schedule(0, Task::AdvanceLevel).is_ok());
    }
}
