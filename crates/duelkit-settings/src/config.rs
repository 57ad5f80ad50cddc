//! Machine profile for a dual-toolhead printer.
//!
//! Defaults describe the reference machine: a 165×160 bed, T0 homed to
//! the back-left corner, T1 to the front-right, MiniAB-class toolheads.
//! Every field can be overridden from a TOML or JSON profile file;
//! partial files inherit the remaining defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use duelkit_core::{Point, ToolheadId};

use crate::error::{SettingsError, SettingsResult};

/// Speeds used for inserted maintenance motion (mm/min).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceSpeeds {
    /// Park moves at a toolchange.
    pub park: f64,
    /// X backoff of the active head.
    pub backoff: f64,
    /// Y shuffle of the inactive head.
    pub shuffle: f64,
    /// Return travel back onto the toolpath.
    pub travel: f64,
}

impl Default for MaintenanceSpeeds {
    fn default() -> Self {
        Self {
            park: 15000.0,
            backoff: 15000.0,
            shuffle: 15000.0,
            travel: 15000.0,
        }
    }
}

/// Full machine description, read-only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineProfile {
    /// Usable bed extent along X (mm).
    pub bed_x: f64,
    /// Usable bed extent along Y (mm).
    pub bed_y: f64,
    /// Front park row.
    pub y_low_row: f64,
    /// Back park row.
    pub y_high_row: f64,
    /// Left park column (T0 home side).
    pub x_low: f64,
    /// Right park column (T1 home side).
    pub x_high: f64,
    /// Toolhead body width along X (mm).
    pub toolhead_width: f64,
    /// Toolhead body depth along Y (mm).
    pub toolhead_height: f64,
    /// Extra clearance padding applied all around the body (mm).
    pub clearance: f64,
    /// Extra X distance beyond one footprint width kept between a
    /// backed-off head and the other head's shuffle column (mm).
    pub backoff_margin: f64,
    /// Speeds for inserted motion.
    pub speeds: MaintenanceSpeeds,
    /// Z lift applied around maneuvers (mm); zero or negative disables.
    pub z_lift: f64,
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self {
            bed_x: 165.0,
            bed_y: 160.0,
            y_low_row: 1.0,
            y_high_row: 159.0,
            x_low: 1.0,
            x_high: 164.0,
            toolhead_width: 40.0,
            toolhead_height: 53.0,
            clearance: 0.25,
            backoff_margin: 5.0,
            speeds: MaintenanceSpeeds::default(),
            z_lift: 0.4,
        }
    }
}

impl MachineProfile {
    /// Footprint width: body plus clearance on both sides.
    pub fn footprint_width(&self) -> f64 {
        self.toolhead_width + 2.0 * self.clearance
    }

    /// Footprint height: body plus clearance on both sides.
    pub fn footprint_height(&self) -> f64 {
        self.toolhead_height + 2.0 * self.clearance
    }

    /// Canonical park point for a head: T0 back-left, T1 front-right.
    pub fn park_position(&self, head: ToolheadId) -> Point {
        match head {
            ToolheadId::Left => Point::new(self.x_low, self.y_high_row),
            ToolheadId::Right => Point::new(self.x_high, self.y_low_row),
        }
    }

    /// X a head retreats to when backing off, one footprint width plus
    /// the backoff margin out from the far rail. Doubles as the
    /// threshold for the simple-shuffle strategy: a head on its own side
    /// of this line cannot block the other head's shuffle column.
    pub fn backoff_x(&self, head: ToolheadId) -> f64 {
        let reach = self.footprint_width() + self.backoff_margin;
        match head {
            ToolheadId::Left => self.bed_x - reach,
            ToolheadId::Right => reach,
        }
    }

    /// The Y interval strictly clear of both park rows.
    ///
    /// Anchored on the rows (not the bed extremes) with one clearance
    /// margin added, so a head sitting exactly on a band boundary is
    /// strictly separated from a row-parked head even under the
    /// boundary-inclusive overlap test. Reprocessed output depends on
    /// that separation being strict.
    pub fn clearance_band(&self) -> (f64, f64) {
        let reach = self.footprint_height() + 2.0 * self.clearance;
        (self.y_low_row + reach, self.y_high_row - reach)
    }

    /// The park row farther from `y`; shuffling always toggles a head to
    /// the opposite row.
    pub fn other_row(&self, y: f64) -> f64 {
        if (y - self.y_low_row).abs() <= (y - self.y_high_row).abs() {
            self.y_high_row
        } else {
            self.y_low_row
        }
    }

    /// Load a profile from a TOML or JSON file, selected by extension,
    /// and validate it.
    pub fn load(path: &Path) -> SettingsResult<Self> {
        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let profile: Self = match extension.as_str() {
            "toml" => toml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            other => return Err(SettingsError::UnknownExtension(other.to_string())),
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Reject profiles the planner cannot operate safely.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.bed_x <= 0.0 || self.bed_y <= 0.0 {
            return Err(SettingsError::Validation(
                "bed extents must be positive".to_string(),
            ));
        }
        if self.toolhead_width <= 0.0 || self.toolhead_height <= 0.0 {
            return Err(SettingsError::Validation(
                "toolhead dimensions must be positive".to_string(),
            ));
        }
        if self.clearance < 0.0 || self.backoff_margin < 0.0 {
            return Err(SettingsError::Validation(
                "clearance and backoff margin must not be negative".to_string(),
            ));
        }
        if !(0.0..=self.bed_y).contains(&self.y_low_row)
            || !(0.0..=self.bed_y).contains(&self.y_high_row)
            || self.y_low_row >= self.y_high_row
        {
            return Err(SettingsError::Validation(
                "park rows must lie on the bed with the low row in front".to_string(),
            ));
        }
        if !(0.0..=self.bed_x).contains(&self.x_low)
            || !(0.0..=self.bed_x).contains(&self.x_high)
            || self.x_low >= self.x_high
        {
            return Err(SettingsError::Validation(
                "park columns must lie on the bed with the low column on the left".to_string(),
            ));
        }
        let (band_low, band_high) = self.clearance_band();
        if band_low >= band_high {
            return Err(SettingsError::Validation(
                "toolheads too tall: no Y band clears both park rows".to_string(),
            ));
        }
        // A backed-off head must sit strictly clear of the other head's
        // shuffle column, or maneuvers would themselves collide.
        let half_w = self.footprint_width() / 2.0;
        if self.backoff_x(ToolheadId::Left) + half_w >= self.x_high - half_w {
            return Err(SettingsError::Validation(
                "left backoff position blocks the right shuffle column".to_string(),
            ));
        }
        if self.backoff_x(ToolheadId::Right) - half_w <= self.x_low + half_w {
            return Err(SettingsError::Validation(
                "right backoff position blocks the left shuffle column".to_string(),
            ));
        }
        Ok(())
    }
}
