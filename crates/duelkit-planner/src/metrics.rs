//! Maneuver counters, read at end of run for diagnostics and tests.

use duelkit_core::ToolheadId;

/// The avoidance strategy applied to one unsafe move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManeuverKind {
    Simple,
    Backup,
    Segmented,
}

/// Per-head maneuver tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManeuverCounts {
    pub simple: u32,
    pub backup: u32,
    pub segmented: u32,
}

/// Counters for both heads. Mutated only by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AvoidanceMetrics {
    pub left: ManeuverCounts,
    pub right: ManeuverCounts,
}

impl AvoidanceMetrics {
    pub fn record(&mut self, head: ToolheadId, kind: ManeuverKind) {
        let counts = match head {
            ToolheadId::Left => &mut self.left,
            ToolheadId::Right => &mut self.right,
        };
        match kind {
            ManeuverKind::Simple => counts.simple += 1,
            ManeuverKind::Backup => counts.backup += 1,
            ManeuverKind::Segmented => counts.segmented += 1,
        }
    }

    pub fn simple(&self) -> u32 {
        self.left.simple + self.right.simple
    }

    pub fn backup(&self) -> u32 {
        self.left.backup + self.right.backup
    }

    pub fn segmented(&self) -> u32 {
        self.left.segmented + self.right.segmented
    }

    pub fn total(&self) -> u32 {
        self.simple() + self.backup() + self.segmented()
    }
}

impl std::fmt::Display for AvoidanceMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} simple, {} backup, {} segmented",
            self.simple(),
            self.backup(),
            self.segmented()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_per_head() {
        let mut metrics = AvoidanceMetrics::default();
        metrics.record(ToolheadId::Left, ManeuverKind::Simple);
        metrics.record(ToolheadId::Left, ManeuverKind::Segmented);
        metrics.record(ToolheadId::Right, ManeuverKind::Backup);
        assert_eq!(metrics.left.simple, 1);
        assert_eq!(metrics.left.segmented, 1);
        assert_eq!(metrics.right.backup, 1);
        assert_eq!(metrics.total(), 3);
    }

    #[test]
    fn test_display_summary() {
        let mut metrics = AvoidanceMetrics::default();
        metrics.record(ToolheadId::Right, ManeuverKind::Simple);
        assert_eq!(metrics.to_string(), "1 simple, 0 backup, 0 segmented");
    }
}
