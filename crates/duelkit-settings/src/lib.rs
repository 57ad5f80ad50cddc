//! Machine profile configuration for duelkit.
//!
//! Provides the read-only machine description a rewrite run works from:
//! bed geometry, park rows and positions, toolhead footprint size,
//! backoff offsets, maintenance speeds, and the optional Z lift.
//! Profiles load from TOML or JSON files selected by extension and are
//! validated before use.

pub mod config;
pub mod error;

pub use config::{MachineProfile, MaintenanceSpeeds};
pub use error::{SettingsError, SettingsResult};
