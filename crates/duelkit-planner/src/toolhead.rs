//! Toolhead position and activation state.

use duelkit_core::{Point, ToolheadId};
use duelkit_settings::MachineProfile;

use crate::error::{PlannerError, PlannerResult};

/// Last known position of both heads plus the active head id.
///
/// At most one head is active at a time; the inactive head is assumed
/// stationary at its last recorded position. Resolving a move with no
/// active head is a fatal inconsistency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolheadTracker {
    left: Point,
    right: Point,
    active: Option<ToolheadId>,
}

impl ToolheadTracker {
    /// Both heads start at their canonical park positions with no head
    /// active yet.
    pub fn new(profile: &MachineProfile) -> Self {
        Self {
            left: profile.park_position(ToolheadId::Left),
            right: profile.park_position(ToolheadId::Right),
            active: None,
        }
    }

    pub fn activate(&mut self, id: ToolheadId) {
        self.active = Some(id);
    }

    pub fn active_id(&self) -> PlannerResult<ToolheadId> {
        self.active.ok_or(PlannerError::NoActiveToolhead)
    }

    pub fn position_of(&self, id: ToolheadId) -> Point {
        match id {
            ToolheadId::Left => self.left,
            ToolheadId::Right => self.right,
        }
    }

    pub fn set_position(&mut self, id: ToolheadId, p: Point) {
        match id {
            ToolheadId::Left => self.left = p,
            ToolheadId::Right => self.right = p,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_parked_with_no_active_head() {
        let tracker = ToolheadTracker::new(&MachineProfile::default());
        assert_eq!(tracker.position_of(ToolheadId::Left), Point::new(1.0, 159.0));
        assert_eq!(tracker.position_of(ToolheadId::Right), Point::new(164.0, 1.0));
        assert!(matches!(
            tracker.active_id(),
            Err(PlannerError::NoActiveToolhead)
        ));
    }

    #[test]
    fn test_activate_and_move() {
        let mut tracker = ToolheadTracker::new(&MachineProfile::default());
        tracker.activate(ToolheadId::Right);
        assert_eq!(tracker.active_id().unwrap(), ToolheadId::Right);
        tracker.set_position(ToolheadId::Right, Point::new(80.0, 40.0));
        assert_eq!(tracker.position_of(ToolheadId::Right), Point::new(80.0, 40.0));
        // The other head is untouched.
        assert_eq!(tracker.position_of(ToolheadId::Left), Point::new(1.0, 159.0));
    }
}
