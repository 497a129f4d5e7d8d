use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::config::PlanConfig;
use crate::parser::Roster;
use super::grid::AssignmentGrid;
use super::slot_utils::slot_times;
use super::types::{CellFlags, Half, PlayerAggregate, SlotKey, SlotTime};

/// Everything derived from one pass over the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub cells: BTreeMap<String, BTreeMap<SlotKey, CellFlags>>, // position -> slot -> flags
    /// One entry per roster player, in roster order
    pub players: Vec<PlayerAggregate>,
    pub player_count: usize,
    /// Names placed on the grid that are not on the roster
    pub unrostered: Vec<String>,
}

impl Evaluation {
    pub fn flags(&self, position: &str, half: Half, time: SlotTime) -> CellFlags {
        self.cells
            .get(position)
            .and_then(|series| series.get(&SlotKey { half, time }))
            .copied()
            .unwrap_or_default()
    }

    pub fn warning_count(&self) -> usize {
        self.count_cells(|f| f.is_warning)
    }

    pub fn error_count(&self) -> usize {
        self.count_cells(|f| f.is_error)
    }

    pub fn players_under_minimum(&self) -> impl Iterator<Item = &PlayerAggregate> {
        self.players.iter().filter(|p| p.under_minimum)
    }

    pub fn player(&self, name: &str) -> Option<&PlayerAggregate> {
        self.players.iter().find(|p| p.name == name)
    }

    fn count_cells(&self, pred: impl Fn(&CellFlags) -> bool) -> usize {
        self.cells
            .values()
            .flat_map(BTreeMap::values)
            .filter(|f| pred(f))
            .count()
    }
}

/// Derives cell flags and per-player totals from the grid.
///
/// Walks each (half, position) series in time order. A cell is a change when
/// its player differs from the previous slot's, with an empty player before
/// the first slot. Empty cells are warnings and take no further part. A
/// player claimed by a second position at the same (half, slot) marks both
/// cells as errors. Only positions of the current formation are visited.
pub fn evaluate(grid: &AssignmentGrid, config: &PlanConfig, roster: &Roster) -> Evaluation {
    let times = slot_times(config);
    let mut cells: BTreeMap<String, BTreeMap<SlotKey, CellFlags>> = BTreeMap::new();
    // (player, slot) -> first position that claimed it
    let mut claims: HashMap<(&str, SlotKey), &str> = HashMap::new();
    // cells per player; minutes are count * interval
    let mut cell_counts: HashMap<&str, usize> = HashMap::new();
    let mut positions_played: HashMap<&str, BTreeSet<usize>> = HashMap::new();

    for half in Half::ALL {
        for (position_index, position) in config.positions.iter().enumerate() {
            let mut previous_player = "";
            for &time in &times {
                let key = SlotKey { half, time };
                let player = grid.get(position, half, time);

                let mut flags = CellFlags {
                    is_change: player != previous_player,
                    ..CellFlags::default()
                };
                previous_player = player;

                if player.is_empty() {
                    flags.is_warning = true;
                    cells.entry(position.clone()).or_default().insert(key, flags);
                    continue;
                }

                match claims.entry((player, key)) {
                    Entry::Vacant(claim) => {
                        claim.insert(position.as_str());
                    }
                    Entry::Occupied(claim) => {
                        let first = *claim.get();
                        flags.is_error = true;
                        if let Some(first_flags) =
                            cells.get_mut(first).and_then(|series| series.get_mut(&key))
                        {
                            first_flags.is_error = true;
                        }
                    }
                }
                cells.entry(position.clone()).or_default().insert(key, flags);

                *cell_counts.entry(player).or_insert(0) += 1;
                positions_played.entry(player).or_default().insert(position_index);
            }
        }
    }

    let players = roster
        .players()
        .iter()
        .map(|name| {
            let cells_played = cell_counts.get(name.as_str()).copied().unwrap_or(0);
            let total_minutes = cells_played as f64 * config.slot_interval_minutes;
            let positions = positions_played
                .get(name.as_str())
                .map(|indices| indices.iter().map(|&i| config.positions[i].clone()).collect())
                .unwrap_or_default();
            PlayerAggregate {
                name: name.clone(),
                total_minutes,
                positions_played: positions,
                under_minimum: total_minutes < config.min_minutes_per_player,
            }
        })
        .collect();

    let mut unrostered: Vec<String> = cell_counts
        .keys()
        .filter(|name| !roster.contains(name))
        .map(|name| name.to_string())
        .collect();
    unrostered.sort();

    Evaluation {
        cells,
        players,
        player_count: roster.len(),
        unrostered,
    }
}
