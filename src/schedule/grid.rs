use std::collections::BTreeMap;

use crate::config::PlanConfig;
use crate::error::PlanError;
use super::slot_utils::slot_keys;
use super::types::{Half, SlotKey, SlotTime};

/// The player assigned to every (position, half, slot) cell.
/// An empty string means the cell is unassigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentGrid {
    cells: BTreeMap<String, BTreeMap<SlotKey, String>>, // position -> slot -> player
}

impl AssignmentGrid {
    /// Creates a grid holding an empty cell for every key of the configuration
    pub fn for_config(config: &PlanConfig) -> Self {
        let keys = slot_keys(config);
        let cells = config
            .positions
            .iter()
            .map(|position| {
                let series = keys.iter().map(|&key| (key, String::new())).collect();
                (position.clone(), series)
            })
            .collect();
        AssignmentGrid { cells }
    }

    /// Player at a cell, `""` when unassigned or outside the grid
    pub fn get(&self, position: &str, half: Half, time: SlotTime) -> &str {
        self.cells
            .get(position)
            .and_then(|series| series.get(&SlotKey { half, time }))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn contains(&self, position: &str, key: &SlotKey) -> bool {
        self.cells
            .get(position)
            .map(|series| series.contains_key(key))
            .unwrap_or(false)
    }

    /// Assigns a player to an existing cell
    pub fn assign(
        &mut self,
        position: &str,
        half: Half,
        time: SlotTime,
        player: &str,
    ) -> Result<(), PlanError> {
        let key = SlotKey { half, time };
        let cell = self
            .cells
            .get_mut(position)
            .and_then(|series| series.get_mut(&key))
            .ok_or_else(|| PlanError::UnknownCell {
                position: position.to_string(),
                key: key.to_string(),
            })?;
        *cell = player.trim().to_string();
        Ok(())
    }

    pub fn clear_cell(
        &mut self,
        position: &str,
        half: Half,
        time: SlotTime,
    ) -> Result<(), PlanError> {
        self.assign(position, half, time, "")
    }

    /// Mutable access used by cascade and reshape; no new keys are created
    pub(crate) fn cell_mut(&mut self, position: &str, key: &SlotKey) -> Option<&mut String> {
        self.cells.get_mut(position)?.get_mut(key)
    }

    pub(crate) fn insert(&mut self, position: &str, key: SlotKey, player: String) {
        self.cells
            .entry(position.to_string())
            .or_default()
            .insert(key, player);
    }

    /// Cells of one position, ordered by half then time
    pub fn series(&self, position: &str) -> impl Iterator<Item = (&SlotKey, &str)> {
        self.cells
            .get(position)
            .into_iter()
            .flat_map(|series| series.iter().map(|(k, v)| (k, v.as_str())))
    }

    pub fn positions(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cells holding `player`
    pub fn assigned_count(&self, player: &str) -> usize {
        self.cells
            .values()
            .flat_map(BTreeMap::values)
            .filter(|p| !p.is_empty() && p.as_str() == player)
            .count()
    }
}
