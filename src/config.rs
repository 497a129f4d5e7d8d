// Match configuration and runtime settings.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::schedule::formation::{find_formation, DEFAULT_FORMATION_ID};

pub const DEFAULT_HALF_DURATION_MINUTES: f64 = 20.0;
pub const DEFAULT_SLOT_INTERVAL_MINUTES: f64 = 2.5;
pub const DEFAULT_MIN_MINUTES_PER_PLAYER: f64 = 15.0;

/// Upper bound on slots per half, keeps a mistyped interval from building a huge grid
pub const MAX_SLOTS_PER_HALF: usize = 500;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("unknown formation: {0}")]
    UnknownFormation(String),

    #[error("formation has no positions")]
    EmptyFormation,

    #[error("position `{0}` appears more than once")]
    DuplicatePosition(String),

    #[error("{slots} slots per half exceeds the limit of {limit}")]
    TooManySlots { slots: usize, limit: usize },
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Plan configuration
// ---------------------------------------------------------------------------

/// The scalar match parameters plus the active formation's position order.
///
/// Instances are only built through [`PlanConfig::new`] or
/// [`PlanConfig::with_positions`], so every engine function may assume
/// positive, finite durations and a non-empty, duplicate-free position list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanConfig {
    pub half_duration_minutes: f64,
    pub slot_interval_minutes: f64,
    pub min_minutes_per_player: f64,
    pub formation_id: String,
    pub positions: Vec<String>,
}

impl PlanConfig {
    /// Builds a configuration for one of the built-in formations
    pub fn new(
        half_duration_minutes: f64,
        slot_interval_minutes: f64,
        min_minutes_per_player: f64,
        formation_id: &str,
    ) -> Result<Self, ConfigError> {
        let formation = find_formation(formation_id)
            .ok_or_else(|| ConfigError::UnknownFormation(formation_id.to_string()))?;
        let positions = formation.positions.iter().map(|p| p.to_string()).collect();
        Self::with_positions(
            half_duration_minutes,
            slot_interval_minutes,
            min_minutes_per_player,
            formation_id,
            positions,
        )
    }

    /// Builds a configuration for an arbitrary ordered position list
    pub fn with_positions(
        half_duration_minutes: f64,
        slot_interval_minutes: f64,
        min_minutes_per_player: f64,
        formation_id: &str,
        positions: Vec<String>,
    ) -> Result<Self, ConfigError> {
        if !half_duration_minutes.is_finite() || half_duration_minutes <= 0.0 {
            return Err(invalid("halfDurationMinutes", "must be a positive number"));
        }
        if !slot_interval_minutes.is_finite() || slot_interval_minutes <= 0.0 {
            return Err(invalid("slotIntervalMinutes", "must be a positive number"));
        }
        if !min_minutes_per_player.is_finite() || min_minutes_per_player < 0.0 {
            return Err(invalid("minMinutesPerPlayer", "must be zero or more"));
        }

        let slots = (half_duration_minutes / slot_interval_minutes).ceil() as usize;
        if slots > MAX_SLOTS_PER_HALF {
            return Err(ConfigError::TooManySlots {
                slots,
                limit: MAX_SLOTS_PER_HALF,
            });
        }

        if positions.is_empty() {
            return Err(ConfigError::EmptyFormation);
        }
        let mut seen = HashSet::new();
        for position in &positions {
            if !seen.insert(position.as_str()) {
                return Err(ConfigError::DuplicatePosition(position.clone()));
            }
        }

        Ok(PlanConfig {
            half_duration_minutes,
            slot_interval_minutes,
            min_minutes_per_player,
            formation_id: formation_id.to_string(),
            positions,
        })
    }

    /// Index of a position in the formation order
    pub fn position_index(&self, position: &str) -> Option<usize> {
        self.positions.iter().position(|p| p == position)
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        let formation: &[&str] = find_formation(DEFAULT_FORMATION_ID)
            .map(|f| f.positions)
            .unwrap_or_default();
        PlanConfig {
            half_duration_minutes: DEFAULT_HALF_DURATION_MINUTES,
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
            min_minutes_per_player: DEFAULT_MIN_MINUTES_PER_PLAYER,
            formation_id: DEFAULT_FORMATION_ID.to_string(),
            positions: formation.iter().map(|p| p.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Runtime settings for the binary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub state_path: PathBuf,
    pub out_dir: PathBuf,
}

impl Settings {
    /// Reads settings from the environment; `port_arg` is the optional CLI port
    pub fn from_env(port_arg: Option<&str>) -> Self {
        let port = port_arg.and_then(|p| p.parse::<u16>().ok()).unwrap_or(8080);
        let state_path = std::env::var("PLANNER_STATE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("plan.json"));
        let out_dir = std::env::var("PLANNER_OUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        Settings {
            port,
            state_path,
            out_dir,
        }
    }
}
