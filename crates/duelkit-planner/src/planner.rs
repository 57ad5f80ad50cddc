//! The avoidance planner: one pass over the command stream.
//!
//! The planner consumes classified commands in order, checks every
//! linear move of the active head against the inactive head's footprint,
//! and rewrites unsafe moves using one of three strategies:
//!
//! - **simple shuffle** when the active head is still on its own side of
//!   the shared zone: move the inactive head to its other park row, then
//!   run the original move unchanged;
//! - **segmented move** when the active head sits inside a clearance
//!   band and the move crosses out of it: run the move up to the band
//!   boundary, back the active head off, shuffle, return, then run the
//!   remainder;
//! - **backup-and-resume** otherwise: back the active head off, shuffle,
//!   return to the pre-move position, then run the original move.
//!
//! Every toolchange token the planner forwards or inserts carries the
//! marker comment, so feeding the output through again swaps head state
//! without re-emitting parking and leaves the stream byte-identical.

use tracing::debug;

use duelkit_core::{
    format_axis, format_extrusion, Command, GcodeLine, GcodeParser, GcodeSink, MoveParams, Point,
    ToolheadId, MARKER,
};
use duelkit_settings::MachineProfile;

use crate::error::PlannerResult;
use crate::feedrate::FeedRateManager;
use crate::geometry::Geometry;
use crate::metrics::{AvoidanceMetrics, ManeuverKind};
use crate::splitter::split_at_y;
use crate::toolhead::ToolheadTracker;
use crate::zlift::ZLiftManager;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Strategy {
    Simple,
    Segmented(f64),
    Backup,
}

/// Rewrites one command stream. All mutable state lives here for the
/// duration of a single run.
pub struct AvoidancePlanner<'a> {
    profile: &'a MachineProfile,
    sink: &'a mut dyn GcodeSink,
    geometry: Geometry,
    tracker: ToolheadTracker,
    feed: FeedRateManager,
    zlift: ZLiftManager,
    metrics: AvoidanceMetrics,
    annotate: bool,
}

impl<'a> AvoidancePlanner<'a> {
    pub fn new(profile: &'a MachineProfile, sink: &'a mut dyn GcodeSink) -> Self {
        let mut tracker = ToolheadTracker::new(profile);
        // Runs begin with T0 selected at its park position, matching the
        // machine's post-homing state.
        tracker.activate(ToolheadId::Left);
        Self {
            geometry: Geometry::new(profile),
            tracker,
            feed: FeedRateManager::new(),
            zlift: ZLiftManager::new(profile.z_lift),
            metrics: AvoidanceMetrics::default(),
            annotate: false,
            profile,
            sink,
        }
    }

    /// Wrap inserted maneuver blocks in begin/end comment lines.
    pub fn with_annotations(mut self, enabled: bool) -> Self {
        self.annotate = enabled;
        self
    }

    pub fn metrics(&self) -> AvoidanceMetrics {
        self.metrics
    }

    /// Rewrite a whole document.
    pub fn play(&mut self, input: &str) -> PlannerResult<()> {
        for line in GcodeParser::parse_all(input) {
            self.process_line(&line)?;
        }
        debug!(metrics = %self.metrics, "stream rewritten");
        Ok(())
    }

    /// Process one input line, emitting zero or more output lines.
    pub fn process_line(&mut self, line: &GcodeLine) -> PlannerResult<()> {
        match Command::classify(line)? {
            Command::Toolchange {
                head,
                already_handled,
            } => self.on_toolchange(line, head, already_handled),
            Command::Move(params) => self.on_move(line, params),
            Command::Other => self.emit(&line.raw),
        }
    }

    fn on_toolchange(
        &mut self,
        line: &GcodeLine,
        head: ToolheadId,
        already_handled: bool,
    ) -> PlannerResult<()> {
        let active = self.tracker.active_id()?;
        if head == active {
            debug!(head = %head, line = line.line_number, "redundant toolchange to the active head");
        } else if already_handled {
            // A previous pass already emitted the parking motion; only
            // the activation state changes.
            debug!(head = %head, "toolchange carries the marker; swapping state only");
            self.tracker.activate(head);
        } else {
            debug!(from = %active, to = %head, "toolchange: parking the active head");
            self.begin_block("toolchange park")?;
            self.drain()?;
            self.mark_maintenance_speed()?;
            self.park_active(active)?;
            self.end_block("toolchange park")?;
            self.tracker.activate(head);
        }
        self.forward_toolchange(line, already_handled)
    }

    fn on_move(&mut self, line: &GcodeLine, params: MoveParams) -> PlannerResult<()> {
        let active = self.tracker.active_id()?;
        let current = self.tracker.position_of(active);
        let target = Point::new(
            params.x.unwrap_or(current.x),
            params.y.unwrap_or(current.y),
        );
        let inactive = self.tracker.position_of(active.other());

        // Checks run in fixed order; either one makes the move unsafe.
        let overlap_dest = self.geometry.overlaps(inactive, target);
        let overlap_sweep = self.geometry.sweep_overlaps(current, target, inactive);

        if !overlap_dest && !overlap_sweep {
            self.emit_print_move(&line.raw, params.f)?;
            self.tracker.set_position(active, target);
            return Ok(());
        }
        debug!(
            head = %active, %current, %target, overlap_dest, overlap_sweep,
            "move conflicts with the inactive toolhead"
        );

        match self.select_strategy(active, current, target, inactive) {
            Strategy::Simple => self.run_simple(line, params, active)?,
            Strategy::Segmented(boundary) => {
                self.run_segmented(line, params, active, current, target, boundary)?
            }
            Strategy::Backup => self.run_backup(line, params, active, current)?,
        }
        self.tracker.set_position(active, target);
        Ok(())
    }

    /// One selection procedure for both heads, parameterized by which is
    /// active.
    fn select_strategy(
        &self,
        active: ToolheadId,
        current: Point,
        target: Point,
        inactive: Point,
    ) -> Strategy {
        let own_side = match active {
            ToolheadId::Left => current.x < self.profile.backoff_x(ToolheadId::Left),
            ToolheadId::Right => current.x > self.profile.backoff_x(ToolheadId::Right),
        };
        if own_side {
            // The active head cannot block the inactive head's shuffle
            // column yet, so a shuffle alone clears the move.
            return Strategy::Simple;
        }
        let (band_low, band_high) = self.profile.clearance_band();
        // The row the inactive head would shuffle onto. A split only
        // helps when the shuffle lands on the row the active head is
        // leaving; otherwise the first partial move could sweep the
        // inactive head's current footprint.
        let shuffle_row = self.profile.other_row(inactive.y);
        if current.y < band_low && target.y > band_low && shuffle_row == self.profile.y_low_row {
            return Strategy::Segmented(band_low);
        }
        if current.y > band_high && target.y < band_high && shuffle_row == self.profile.y_high_row {
            return Strategy::Segmented(band_high);
        }
        Strategy::Backup
    }

    fn run_simple(
        &mut self,
        line: &GcodeLine,
        params: MoveParams,
        active: ToolheadId,
    ) -> PlannerResult<()> {
        self.metrics.record(active, ManeuverKind::Simple);
        debug!(head = %active, "simple shuffle");
        self.begin_block("simple shuffle")?;
        self.drain()?;
        self.zlift.raise(&mut *self.sink)?;
        self.mark_maintenance_speed()?;
        self.shuffle_inactive(active)?;
        self.zlift.lower(&mut *self.sink)?;
        self.emit_print_move(&line.raw, params.f)?;
        self.end_block("simple shuffle")
    }

    fn run_segmented(
        &mut self,
        line: &GcodeLine,
        params: MoveParams,
        active: ToolheadId,
        current: Point,
        target: Point,
        boundary: f64,
    ) -> PlannerResult<()> {
        self.metrics.record(active, ManeuverKind::Segmented);
        debug!(head = %active, boundary, "segmented move");
        let split = split_at_y(current, target, boundary, params.e);
        let word = move_word(line);
        self.begin_block("segmented move")?;
        self.drain()?;
        self.emit_print_move(&format_move(word, split.mid, split.first_e, params.f), params.f)?;
        self.zlift.raise(&mut *self.sink)?;
        self.mark_maintenance_speed()?;
        self.backoff_active(active)?;
        self.shuffle_inactive(active)?;
        self.go_to(split.mid, self.profile.speeds.travel)?;
        self.zlift.lower(&mut *self.sink)?;
        self.emit_print_move(&format_move(word, target, split.second_e, params.f), params.f)?;
        self.end_block("segmented move")
    }

    fn run_backup(
        &mut self,
        line: &GcodeLine,
        params: MoveParams,
        active: ToolheadId,
        current: Point,
    ) -> PlannerResult<()> {
        self.metrics.record(active, ManeuverKind::Backup);
        debug!(head = %active, "backup shuffle");
        self.begin_block("backup shuffle")?;
        self.drain()?;
        self.zlift.raise(&mut *self.sink)?;
        self.mark_maintenance_speed()?;
        self.backoff_active(active)?;
        self.shuffle_inactive(active)?;
        self.go_to(current, self.profile.speeds.travel)?;
        self.zlift.lower(&mut *self.sink)?;
        self.emit_print_move(&line.raw, params.f)?;
        self.end_block("backup shuffle")
    }

    // Maneuver primitives. Each ends on a drain so the controller
    // finishes the inserted motion before the stream continues.

    /// Park the active head: X first, then Y, so the sweep stays
    /// axis-aligned and clear of the other head's park column.
    fn park_active(&mut self, head: ToolheadId) -> PlannerResult<()> {
        let park = self.profile.park_position(head);
        let speed = format_axis(self.profile.speeds.park);
        self.emit(&format!("G0 X{} F{}", format_axis(park.x), speed))?;
        self.emit(&format!("G0 Y{} F{}", format_axis(park.y), speed))?;
        self.drain()?;
        self.tracker.set_position(head, park);
        Ok(())
    }

    fn backoff_active(&mut self, head: ToolheadId) -> PlannerResult<()> {
        let x = self.profile.backoff_x(head);
        self.emit(&format!(
            "G0 X{} F{}",
            format_axis(x),
            format_axis(self.profile.speeds.backoff)
        ))?;
        self.drain()
    }

    /// Select the inactive head, toggle it to its other park row, then
    /// hand control back to the active head. Both toolchange tokens
    /// carry the marker so a later pass only swaps state.
    fn shuffle_inactive(&mut self, active: ToolheadId) -> PlannerResult<()> {
        let inactive = active.other();
        let pos = self.tracker.position_of(inactive);
        let row = self.profile.other_row(pos.y);
        self.emit(&format!("{} ; {}", inactive.token(), MARKER))?;
        self.emit(&format!(
            "G0 Y{} F{}",
            format_axis(row),
            format_axis(self.profile.speeds.shuffle)
        ))?;
        self.drain()?;
        self.emit(&format!("{} ; {}", active.token(), MARKER))?;
        self.tracker.set_position(inactive, Point::new(pos.x, row));
        debug!(head = %inactive, row, "shuffled inactive toolhead");
        Ok(())
    }

    fn go_to(&mut self, p: Point, speed: f64) -> PlannerResult<()> {
        self.emit(&format!(
            "G0 X{} Y{} F{}",
            format_axis(p.x),
            format_axis(p.y),
            format_axis(speed)
        ))?;
        self.drain()
    }

    fn drain(&mut self) -> PlannerResult<()> {
        self.emit("M400")
    }

    /// Emit a move that resumes original-speed motion, settling any
    /// pending feed-rate restore first.
    fn emit_print_move(&mut self, text: &str, f: Option<f64>) -> PlannerResult<()> {
        if let Some(rate) = self.feed.take_restore(f) {
            self.emit(&format!("G1 F{}", format_axis(rate)))?;
        }
        self.feed.note_move(f);
        self.emit(text)
    }

    fn mark_maintenance_speed(&mut self) -> PlannerResult<()> {
        if self.feed.is_pending() {
            // Maintenance speed is already modal; the outstanding
            // restore covers this maneuver too.
            debug!("feed-rate restore already pending");
            return Ok(());
        }
        self.feed.mark_maintenance()
    }

    fn forward_toolchange(&mut self, line: &GcodeLine, already_handled: bool) -> PlannerResult<()> {
        if already_handled {
            self.emit(&line.raw)
        } else {
            self.emit(&format!("{} ; {}", line.raw.trim(), MARKER))
        }
    }

    fn begin_block(&mut self, name: &str) -> PlannerResult<()> {
        if self.annotate {
            self.emit(&format!("; {MARKER} begin {name}"))?;
        }
        Ok(())
    }

    fn end_block(&mut self, name: &str) -> PlannerResult<()> {
        if self.annotate {
            self.emit(&format!("; {MARKER} end {name}"))?;
        }
        Ok(())
    }

    fn emit(&mut self, text: &str) -> PlannerResult<()> {
        self.sink.write_line(text)?;
        Ok(())
    }
}

fn move_word(line: &GcodeLine) -> &'static str {
    match line.command {
        Some(('G', code)) if code == 0.0 => "G0",
        _ => "G1",
    }
}

fn format_move(word: &str, target: Point, e: Option<f64>, f: Option<f64>) -> String {
    let mut text = format!(
        "{} X{} Y{}",
        word,
        format_axis(target.x),
        format_axis(target.y)
    );
    if let Some(e) = e {
        text.push_str(&format!(" E{}", format_extrusion(e)));
    }
    if let Some(f) = f {
        text.push_str(&format!(" F{}", format_axis(f)));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use duelkit_core::StreamWriter;

    fn planner_with<'a>(
        profile: &'a MachineProfile,
        writer: &'a mut StreamWriter<Vec<u8>>,
    ) -> AvoidancePlanner<'a> {
        AvoidancePlanner::new(profile, writer)
    }

    #[test]
    fn test_strategy_simple_on_own_side() {
        let profile = MachineProfile::default();
        let mut writer = StreamWriter::new(Vec::new());
        let planner = planner_with(&profile, &mut writer);
        let strategy = planner.select_strategy(
            ToolheadId::Left,
            Point::new(10.0, 10.0),
            Point::new(150.0, 10.0),
            Point::new(164.0, 1.0),
        );
        assert_eq!(strategy, Strategy::Simple);
    }

    #[test]
    fn test_strategy_threshold_is_exclusive() {
        let profile = MachineProfile::default();
        let mut writer = StreamWriter::new(Vec::new());
        let planner = planner_with(&profile, &mut writer);
        // Exactly on the backoff line no longer counts as the own side.
        let strategy = planner.select_strategy(
            ToolheadId::Left,
            Point::new(profile.backoff_x(ToolheadId::Left), 80.0),
            Point::new(150.0, 80.0),
            Point::new(164.0, 1.0),
        );
        assert_ne!(strategy, Strategy::Simple);
    }

    #[test]
    fn test_strategy_segmented_needs_opposite_row_and_crossing() {
        let profile = MachineProfile::default();
        let mut writer = StreamWriter::new(Vec::new());
        let planner = planner_with(&profile, &mut writer);
        let (band_low, band_high) = profile.clearance_band();

        // Low band, inactive on the high row, crossing up: split low.
        assert_eq!(
            planner.select_strategy(
                ToolheadId::Left,
                Point::new(140.0, 30.0),
                Point::new(140.0, 130.0),
                Point::new(164.0, 159.0),
            ),
            Strategy::Segmented(band_low)
        );
        // High band, inactive on the low row, crossing down: split high.
        assert_eq!(
            planner.select_strategy(
                ToolheadId::Left,
                Point::new(130.0, 130.0),
                Point::new(130.0, 30.0),
                Point::new(164.0, 1.0),
            ),
            Strategy::Segmented(band_high)
        );
        // Inactive on the same row as the band: splitting cannot clear
        // the first partial move, so back up instead.
        assert_eq!(
            planner.select_strategy(
                ToolheadId::Left,
                Point::new(140.0, 30.0),
                Point::new(140.0, 130.0),
                Point::new(164.0, 1.0),
            ),
            Strategy::Backup
        );
        // No crossing: nothing to split at.
        assert_eq!(
            planner.select_strategy(
                ToolheadId::Left,
                Point::new(140.0, 30.0),
                Point::new(120.0, 40.0),
                Point::new(164.0, 159.0),
            ),
            Strategy::Backup
        );
    }

    #[test]
    fn test_strategy_backup_in_middle_band() {
        let profile = MachineProfile::default();
        let mut writer = StreamWriter::new(Vec::new());
        let planner = planner_with(&profile, &mut writer);
        assert_eq!(
            planner.select_strategy(
                ToolheadId::Left,
                Point::new(130.0, 80.0),
                Point::new(150.0, 30.0),
                Point::new(164.0, 1.0),
            ),
            Strategy::Backup
        );
    }

    #[test]
    fn test_redundant_toolchange_forwards_marked() {
        let profile = MachineProfile::default();
        let mut writer = StreamWriter::new(Vec::new());
        {
            let mut planner = planner_with(&profile, &mut writer);
            planner.play("T0\n").unwrap();
        }
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, "T0 ; duelkit\n");
    }

    #[test]
    fn test_marked_toolchange_swaps_without_parking() {
        let profile = MachineProfile::default();
        let mut writer = StreamWriter::new(Vec::new());
        {
            let mut planner = planner_with(&profile, &mut writer);
            planner.play("T1 ; duelkit\n").unwrap();
            assert_eq!(planner.tracker.active_id().unwrap(), ToolheadId::Right);
        }
        let out = String::from_utf8(writer.into_inner()).unwrap();
        // No park motion, no drain: the line passes through untouched.
        assert_eq!(out, "T1 ; duelkit\n");
    }

    #[test]
    fn test_genuine_toolchange_parks_then_forwards() {
        let profile = MachineProfile::default();
        let mut writer = StreamWriter::new(Vec::new());
        {
            let mut planner = planner_with(&profile, &mut writer);
            planner.play("T1\n").unwrap();
            assert_eq!(
                planner.tracker.position_of(ToolheadId::Left),
                profile.park_position(ToolheadId::Left)
            );
        }
        let out = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(out, "M400\nG0 X1 F15000\nG0 Y159 F15000\nM400\nT1 ; duelkit\n");
    }

    #[test]
    fn test_format_move_with_all_params() {
        assert_eq!(
            format_move("G1", Point::new(150.0, 55.0), Some(4.5), Some(1200.0)),
            "G1 X150 Y55 E4.5 F1200"
        );
        assert_eq!(format_move("G0", Point::new(119.5, 80.0), None, None), "G0 X119.5 Y80");
    }
}
