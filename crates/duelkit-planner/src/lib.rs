//! Collision-avoidance planner for dual-toolhead printers.
//!
//! Two toolheads share one X travel axis; this crate rewrites a stream
//! of parsed G-code commands so the heads never collide, while leaving
//! the toolpath otherwise untouched. The [`AvoidancePlanner`] owns all
//! run state: the geometry predicates, both head positions, feed-rate
//! and Z-lift bookkeeping, and the maneuver counters.
//!
//! Reprocessing is stable: output fed back through the planner comes out
//! byte-identical, with no new maneuvers inserted.

pub mod error;
pub mod feedrate;
pub mod geometry;
pub mod metrics;
pub mod planner;
pub mod splitter;
pub mod toolhead;
pub mod zlift;

pub use error::{PlannerError, PlannerResult};
pub use feedrate::FeedRateManager;
pub use geometry::{Geometry, Rect};
pub use metrics::{AvoidanceMetrics, ManeuverCounts, ManeuverKind};
pub use planner::AvoidancePlanner;
pub use splitter::{split_at_y, MoveSplit};
pub use toolhead::ToolheadTracker;
pub use zlift::ZLiftManager;
