//! Z lift bracketing around inserted maneuvers.

use std::io;

use duelkit_core::{format_axis, GcodeSink};

/// Emits a relative lift/lower pair around maneuver motion, so inserted
/// travel never drags a nozzle across printed material. Nested raises
/// deduplicate: the lift is applied at most once until lowered.
#[derive(Debug)]
pub struct ZLiftManager {
    magnitude: f64,
    lifted: bool,
}

impl ZLiftManager {
    /// A zero or negative magnitude disables lifting entirely.
    pub fn new(magnitude: f64) -> Self {
        Self {
            magnitude,
            lifted: false,
        }
    }

    pub fn raise(&mut self, sink: &mut dyn GcodeSink) -> io::Result<()> {
        if self.magnitude <= 0.0 || self.lifted {
            return Ok(());
        }
        sink.write_line("G91")?;
        sink.write_line(&format!("G0 Z{}", format_axis(self.magnitude)))?;
        sink.write_line("G90")?;
        self.lifted = true;
        Ok(())
    }

    pub fn lower(&mut self, sink: &mut dyn GcodeSink) -> io::Result<()> {
        if !self.lifted {
            return Ok(());
        }
        sink.write_line("G91")?;
        sink.write_line(&format!("G0 Z{}", format_axis(-self.magnitude)))?;
        sink.write_line("G90")?;
        self.lifted = false;
        Ok(())
    }
}
