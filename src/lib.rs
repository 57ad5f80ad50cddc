//! # duelkit
//!
//! A G-code post-processor for printers with two independently-moving
//! toolheads sharing a single X travel axis. duelkit rewrites a sliced
//! toolpath so the heads never collide, inserting shuffle, backoff and
//! split maneuvers while preserving the original motion everywhere else.
//!
//! ## Architecture
//!
//! The workspace is organized as three crates plus this facade:
//!
//! 1. **duelkit-core** - G-code line model, parser, stream writer
//! 2. **duelkit-planner** - geometry, maneuver strategies, run state
//! 3. **duelkit-settings** - machine profile loading and validation
//! 4. **duelkit** - library facade and the command-line binary
//!
//! Rewriting is a single forward pass and is stable under reprocessing:
//! feeding duelkit's output back through produces identical output.

pub use duelkit_core::{
    format_axis, format_extrusion, normalize_line, Command, GcodeLine, GcodeParser, GcodeSink,
    MoveParams, Point, StreamWriter, ToolheadId, Word, MARKER,
};
pub use duelkit_planner::{
    split_at_y, AvoidanceMetrics, AvoidancePlanner, FeedRateManager, Geometry, ManeuverCounts,
    ManeuverKind, MoveSplit, PlannerError, PlannerResult, Rect, ToolheadTracker, ZLiftManager,
};
pub use duelkit_settings::{MachineProfile, MaintenanceSpeeds, SettingsError, SettingsResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support
/// - Debug-level detail when `verbose` is set
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(default_level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
