use serde::Serialize;
use tracing::{debug, warn};

use crate::config::PlanConfig;
use crate::error::PlanError;
use crate::parser::{parse_players, Roster};
use super::cascade::{cascade, CascadeMode};
use super::grid::AssignmentGrid;
use super::reshape::reshape;
use super::slot_utils::parse_slot_key;
use super::state::PlanState;
use super::timeline::{build_timeline, TimelineEvent};
use super::types::{Half, SlotTime};
use super::validate::{evaluate, Evaluation};

/// A substitution plan being edited: configuration, roster and grid
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub title: String,
    config: PlanConfig,
    roster: Roster,
    grid: AssignmentGrid,
}

/// Derived results of one recomputation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub evaluation: Evaluation,
    pub timeline: Vec<TimelineEvent>,
}

impl Default for Plan {
    fn default() -> Self {
        let config = PlanConfig::default();
        let grid = AssignmentGrid::for_config(&config);
        Plan {
            title: String::new(),
            config,
            roster: Roster::default(),
            grid,
        }
    }
}

impl Plan {
    /// Loads a saved plan. Missing cells stay empty; cells outside the
    /// configuration and unreadable keys are skipped.
    pub fn from_state(state: &PlanState) -> Result<Self, PlanError> {
        let config = PlanConfig::new(
            state.half_duration_minutes,
            state.slot_interval_minutes,
            state.min_minutes_per_player,
            &state.formation_id,
        )?;
        let roster: Roster = state.players.iter().collect();
        let mut grid = AssignmentGrid::for_config(&config);

        for (position, cells) in &state.positions {
            for (raw_key, player) in cells {
                let Some(key) = parse_slot_key(raw_key) else {
                    warn!("Skipping unreadable slot key {:?} for {}", raw_key, position);
                    continue;
                };
                if grid.contains(position, &key) {
                    grid.assign(position, key.half, key.time, player)?;
                } else if !player.is_empty() {
                    debug!("Dropping {} at {} {}: outside the current grid", player, position, key);
                }
            }
        }

        Ok(Plan {
            title: state.title.trim().to_string(),
            config,
            roster,
            grid,
        })
    }

    pub fn to_state(&self) -> PlanState {
        let positions = self
            .config
            .positions
            .iter()
            .map(|position| {
                let cells = self
                    .grid
                    .series(position)
                    .map(|(key, player)| (key.to_string(), player.to_string()))
                    .collect();
                (position.clone(), cells)
            })
            .collect();

        PlanState {
            title: self.title.clone(),
            half_duration_minutes: self.config.half_duration_minutes,
            min_minutes_per_player: self.config.min_minutes_per_player,
            slot_interval_minutes: self.config.slot_interval_minutes,
            players: self.roster.players().to_vec(),
            formation_id: self.config.formation_id.clone(),
            positions,
        }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn grid(&self) -> &AssignmentGrid {
        &self.grid
    }

    /// Assigns a player to one cell and cascades it forward according to `mode`.
    /// Returns the number of cells written.
    pub fn assign(
        &mut self,
        position: &str,
        half: Half,
        time: SlotTime,
        player: &str,
        mode: CascadeMode,
    ) -> Result<usize, PlanError> {
        if player.trim().is_empty() {
            self.grid.clear_cell(position, half, time)?;
        } else {
            self.grid.assign(position, half, time, player)?;
        }
        let player = self.grid.get(position, half, time).to_string();
        let cascaded = match mode.overwrite() {
            Some(overwrite) => cascade(&mut self.grid, position, half, time, &player, overwrite),
            None => 0,
        };
        debug!(
            "Assigned {:?} at {} {}-{} ({:?}, {} cascaded)",
            player, position, half, time, mode, cascaded
        );
        Ok(1 + cascaded)
    }

    /// Switches configuration, keeping every cell the new grid still has
    pub fn set_config(&mut self, config: PlanConfig) {
        if config == self.config {
            return;
        }
        self.grid = reshape(&self.grid, &self.config, &config);
        debug!(
            "Reshaped grid to formation {} with {} cells",
            config.formation_id,
            self.grid.len()
        );
        self.config = config;
    }

    /// Switches formation, keeping the current durations
    pub fn set_formation(&mut self, formation_id: &str) -> Result<(), PlanError> {
        let config = PlanConfig::new(
            self.config.half_duration_minutes,
            self.config.slot_interval_minutes,
            self.config.min_minutes_per_player,
            formation_id,
        )?;
        self.set_config(config);
        Ok(())
    }

    pub fn set_roster(&mut self, text: &str) {
        self.roster = parse_players(text);
    }

    /// Recomputes flags, totals and the timeline from scratch
    pub fn report(&self) -> PlanReport {
        let evaluation = evaluate(&self.grid, &self.config, &self.roster);
        let timeline = build_timeline(&self.grid, &self.config, &evaluation);
        PlanReport {
            evaluation,
            timeline,
        }
    }

    /// Resets to an empty plan with default settings
    pub fn clear(&mut self) {
        *self = Plan::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_state() -> PlanState {
        let mut gk = BTreeMap::new();
        gk.insert("1-0".to_string(), "Alice".to_string());
        gk.insert("1-5".to_string(), "Alice".to_string());
        gk.insert("2-10".to_string(), "Bob".to_string());
        let mut positions = BTreeMap::new();
        positions.insert("GK".to_string(), gk);
        PlanState {
            title: "Cup final".to_string(),
            half_duration_minutes: 15.0,
            min_minutes_per_player: 10.0,
            slot_interval_minutes: 5.0,
            players: vec!["Alice".to_string(), "Bob".to_string()],
            formation_id: "2-3-1".to_string(),
            positions,
        }
    }

    #[test]
    fn from_state_fills_missing_cells() {
        let plan = Plan::from_state(&sample_state()).unwrap();
        assert_eq!(plan.grid().len(), 7 * 2 * 3);
        assert_eq!(plan.grid().get("GK", Half::First, SlotTime::new(5.0)), "Alice");
        assert_eq!(plan.grid().get("ST", Half::First, SlotTime::ZERO), "");
        assert_eq!(plan.title, "Cup final");
    }

    #[test]
    fn state_round_trips() {
        let plan = Plan::from_state(&sample_state()).unwrap();
        let state = plan.to_state();
        assert_eq!(state.positions.len(), 7);
        assert_eq!(state.positions["GK"]["2-10"], "Bob");
        assert_eq!(state.positions["LD"]["1-0"], "");
        assert_eq!(Plan::from_state(&state).unwrap(), plan);
    }

    #[test]
    fn from_state_skips_bad_keys_and_foreign_cells() {
        let mut state = sample_state();
        state.positions.get_mut("GK").unwrap().insert("bogus".into(), "Carl".into());
        state.positions.get_mut("GK").unwrap().insert("1-20".into(), "Carl".into());
        let mut old = BTreeMap::new();
        old.insert("1-0".to_string(), "Dee".to_string());
        state.positions.insert("LW".to_string(), old);

        let plan = Plan::from_state(&state).unwrap();
        assert_eq!(plan.grid().assigned_count("Carl"), 0);
        assert_eq!(plan.grid().assigned_count("Dee"), 0);
    }

    #[test]
    fn from_state_rejects_bad_config() {
        let mut state = sample_state();
        state.slot_interval_minutes = 0.0;
        assert!(matches!(Plan::from_state(&state), Err(PlanError::Config(_))));
        let mut state = sample_state();
        state.formation_id = "1-1-1".into();
        assert!(Plan::from_state(&state).is_err());
    }

    #[test]
    fn assign_with_cascade_modes() {
        let mut plan = Plan::from_state(&sample_state()).unwrap();
        let written = plan
            .assign("ST", Half::First, SlotTime::ZERO, "Bob", CascadeMode::FillGaps)
            .unwrap();
        assert_eq!(written, 3);
        assert_eq!(plan.grid().get("ST", Half::First, SlotTime::new(10.0)), "Bob");

        let written = plan
            .assign("GK", Half::First, SlotTime::ZERO, "Carl", CascadeMode::None)
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(plan.grid().get("GK", Half::First, SlotTime::new(5.0)), "Alice");

        plan.assign("GK", Half::First, SlotTime::ZERO, "Carl", CascadeMode::Overwrite)
            .unwrap();
        assert_eq!(plan.grid().get("GK", Half::First, SlotTime::new(5.0)), "Carl");
    }

    #[test]
    fn assigning_nobody_clears_cells() {
        let mut plan = Plan::from_state(&sample_state()).unwrap();
        plan.assign("GK", Half::First, SlotTime::ZERO, "Alice", CascadeMode::Overwrite)
            .unwrap();
        assert_eq!(plan.grid().assigned_count("Alice"), 3);

        plan.assign("GK", Half::First, SlotTime::new(5.0), "  ", CascadeMode::None)
            .unwrap();
        assert_eq!(plan.grid().get("GK", Half::First, SlotTime::new(5.0)), "");
        assert_eq!(plan.grid().get("GK", Half::First, SlotTime::new(10.0)), "Alice");

        plan.assign("GK", Half::First, SlotTime::ZERO, "", CascadeMode::Overwrite)
            .unwrap();
        assert_eq!(plan.grid().assigned_count("Alice"), 0);
        assert!(plan
            .assign("LW", Half::First, SlotTime::ZERO, "", CascadeMode::None)
            .is_err());
    }

    #[test]
    fn assign_outside_grid_is_an_error() {
        let mut plan = Plan::default();
        let err = plan
            .assign("LW", Half::First, SlotTime::ZERO, "Bob", CascadeMode::None)
            .unwrap_err();
        assert!(matches!(err, PlanError::UnknownCell { .. }));
    }

    #[test]
    fn set_formation_reshapes() {
        let mut plan = Plan::from_state(&sample_state()).unwrap();
        plan.assign("LM", Half::First, SlotTime::ZERO, "Bob", CascadeMode::None).unwrap();
        plan.set_formation("4-4-2").unwrap();
        assert_eq!(plan.config().positions.len(), 11);
        // GK survives, LM survives, 2-3-1 only positions are gone
        assert_eq!(plan.grid().get("GK", Half::First, SlotTime::ZERO), "Alice");
        assert_eq!(plan.grid().get("LM", Half::First, SlotTime::ZERO), "Bob");
        assert_eq!(plan.grid().positions().count(), 11);
        assert!(plan.set_formation("nope").is_err());
    }

    #[test]
    fn report_totals_follow_roster() {
        let mut plan = Plan::from_state(&sample_state()).unwrap();
        plan.set_roster("Bob\nCarl\nAlice\n");
        let report = plan.report();
        assert_eq!(report.evaluation.player_count, 3);
        assert_eq!(report.evaluation.player("Alice").unwrap().total_minutes, 10.0);
        assert_eq!(report.evaluation.player("Bob").unwrap().total_minutes, 5.0);
        assert!(report.evaluation.player("Carl").unwrap().under_minimum);
        // two starts, two separators, GK vacated in the first half and filled in the second
        assert_eq!(report.timeline.len(), 6);
    }

    #[test]
    fn clear_resets_everything() {
        let mut plan = Plan::from_state(&sample_state()).unwrap();
        plan.clear();
        assert_eq!(plan, Plan::default());
        assert_eq!(plan.to_state().half_duration_minutes, 20.0);
        assert!(plan.roster().is_empty());
    }
}
