//! Feed-rate bookkeeping around inserted maintenance motion.
//!
//! Inserted maneuver moves run at fixed maintenance speeds, which leave
//! the machine's modal feed rate pointing at the wrong value for the
//! toolpath that follows. This manager remembers the last feed rate an
//! original move set explicitly and guarantees exactly one restore
//! before original-speed motion resumes: either an emitted feed-only
//! command, or the resuming move's own `F` word.

use tracing::debug;

use crate::error::{PlannerError, PlannerResult};

#[derive(Debug, Default)]
pub struct FeedRateManager {
    last_explicit: Option<f64>,
    restore_pending: bool,
}

impl FeedRateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the feed rate carried by an original move, if any.
    pub fn note_move(&mut self, f: Option<f64>) {
        if let Some(rate) = f {
            self.last_explicit = Some(rate);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.restore_pending
    }

    /// Mark that maintenance-speed motion has been emitted. Marking
    /// while a restore is already pending is a fatal inconsistency.
    pub fn mark_maintenance(&mut self) -> PlannerResult<()> {
        if self.restore_pending {
            return Err(PlannerError::FeedRestorePending);
        }
        self.restore_pending = true;
        Ok(())
    }

    /// Settle a pending restore ahead of original-speed motion.
    ///
    /// Returns the rate to emit as a feed-only command, or `None` when
    /// nothing is pending, the upcoming move carries its own `F`, or no
    /// rate has been seen yet. The pending flag is cleared either way.
    pub fn take_restore(&mut self, upcoming_f: Option<f64>) -> Option<f64> {
        if !self.restore_pending {
            return None;
        }
        self.restore_pending = false;
        if upcoming_f.is_some() {
            // The resuming move restores the speed itself.
            return None;
        }
        if self.last_explicit.is_none() {
            debug!("no feed rate seen yet; maintenance speed stays modal");
        }
        self.last_explicit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_emitted_exactly_once() {
        let mut feed = FeedRateManager::new();
        feed.note_move(Some(1800.0));
        feed.mark_maintenance().unwrap();
        assert_eq!(feed.take_restore(None), Some(1800.0));
        // Settled: nothing further to restore.
        assert_eq!(feed.take_restore(None), None);
    }

    #[test]
    fn test_resuming_move_with_f_satisfies_restore() {
        let mut feed = FeedRateManager::new();
        feed.note_move(Some(1800.0));
        feed.mark_maintenance().unwrap();
        assert_eq!(feed.take_restore(Some(2400.0)), None);
        assert!(!feed.is_pending());
    }

    #[test]
    fn test_double_mark_is_fatal() {
        let mut feed = FeedRateManager::new();
        feed.mark_maintenance().unwrap();
        assert!(matches!(
            feed.mark_maintenance(),
            Err(PlannerError::FeedRestorePending)
        ));
    }

    #[test]
    fn test_nothing_to_restore_without_a_remembered_rate() {
        let mut feed = FeedRateManager::new();
        feed.mark_maintenance().unwrap();
        assert_eq!(feed.take_restore(None), None);
        assert!(!feed.is_pending());
        // The invariant resets after settling.
        feed.mark_maintenance().unwrap();
    }

    #[test]
    fn test_remembers_latest_rate() {
        let mut feed = FeedRateManager::new();
        feed.note_move(Some(1200.0));
        feed.note_move(None);
        feed.note_move(Some(3000.0));
        feed.mark_maintenance().unwrap();
        assert_eq!(feed.take_restore(None), Some(3000.0));
    }
}
