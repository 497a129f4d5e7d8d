use serde::{Deserialize, Serialize};

use super::grid::AssignmentGrid;
use super::types::{Half, SlotKey, SlotTime};

/// How an assignment spreads to later slots of the same position and half
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeMode {
    /// Only the chosen cell changes
    #[default]
    None,
    /// Later empty cells take the player (shift held)
    FillGaps,
    /// Every later cell takes the player (ctrl held)
    Overwrite,
}

impl CascadeMode {
    /// Maps held modifiers to a mode; ctrl wins over shift
    pub fn from_modifiers(shift: bool, ctrl: bool) -> Self {
        if ctrl {
            CascadeMode::Overwrite
        } else if shift {
            CascadeMode::FillGaps
        } else {
            CascadeMode::None
        }
    }

    /// The `overwrite` flag for [`cascade`], or `None` when nothing cascades
    pub fn overwrite(self) -> Option<bool> {
        match self {
            CascadeMode::None => None,
            CascadeMode::FillGaps => Some(false),
            CascadeMode::Overwrite => Some(true),
        }
    }
}

/// Propagates `player` to every slot after `from_time` for one position and half.
///
/// Empty cells always take the player; occupied cells only when `overwrite`
/// is set. The slot at `from_time`, earlier slots, other positions and the
/// other half are untouched. Returns the number of cells changed.
pub fn cascade(
    grid: &mut AssignmentGrid,
    position: &str,
    half: Half,
    from_time: SlotTime,
    player: &str,
    overwrite: bool,
) -> usize {
    let later: Vec<SlotKey> = grid
        .series(position)
        .map(|(key, _)| *key)
        .filter(|key| key.half == half && key.time > from_time)
        .collect();

    let mut changed = 0;
    for key in later {
        if let Some(cell) = grid.cell_mut(position, &key) {
            if (cell.is_empty() || overwrite) && cell.as_str() != player {
                *cell = player.to_string();
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanConfig;

    fn setup() -> (PlanConfig, AssignmentGrid) {
        let positions = vec!["GK".to_string(), "ST".to_string()];
        let config = PlanConfig::with_positions(20.0, 5.0, 0.0, "custom", positions).unwrap();
        let mut grid = AssignmentGrid::for_config(&config);
        grid.assign("GK", Half::First, SlotTime::ZERO, "P1").unwrap();
        grid.assign("GK", Half::First, SlotTime::new(15.0), "P2").unwrap();
        (config, grid)
    }

    fn series(grid: &AssignmentGrid, position: &str, half: Half) -> Vec<String> {
        [0.0, 5.0, 10.0, 15.0]
            .iter()
            .map(|&t| grid.get(position, half, SlotTime::new(t)).to_string())
            .collect()
    }

    #[test]
    fn fill_gaps_keeps_occupied_cells() {
        let (_, mut grid) = setup();
        let changed = cascade(&mut grid, "GK", Half::First, SlotTime::ZERO, "P1", false);
        assert_eq!(changed, 2);
        assert_eq!(series(&grid, "GK", Half::First), vec!["P1", "P1", "P1", "P2"]);
    }

    #[test]
    fn overwrite_replaces_everything_downstream() {
        let (_, mut grid) = setup();
        let changed = cascade(&mut grid, "GK", Half::First, SlotTime::ZERO, "P1", true);
        assert_eq!(changed, 3);
        assert_eq!(series(&grid, "GK", Half::First), vec!["P1", "P1", "P1", "P1"]);
    }

    #[test]
    fn earlier_slots_other_positions_and_half_untouched() {
        let (_, mut grid) = setup();
        grid.assign("GK", Half::First, SlotTime::new(5.0), "P3").unwrap();
        cascade(&mut grid, "GK", Half::First, SlotTime::new(5.0), "P4", true);
        assert_eq!(series(&grid, "GK", Half::First), vec!["P1", "P3", "P4", "P4"]);
        assert_eq!(series(&grid, "ST", Half::First), vec!["", "", "", ""]);
        assert_eq!(series(&grid, "GK", Half::Second), vec!["", "", "", ""]);
    }

    #[test]
    fn cascade_from_last_slot_is_a_no_op() {
        let (_, mut grid) = setup();
        let before = grid.clone();
        assert_eq!(cascade(&mut grid, "GK", Half::First, SlotTime::new(15.0), "P9", true), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn cascading_empty_player_with_overwrite_clears() {
        let (_, mut grid) = setup();
        cascade(&mut grid, "GK", Half::First, SlotTime::ZERO, "", true);
        assert_eq!(series(&grid, "GK", Half::First), vec!["P1", "", "", ""]);
    }

    #[test]
    fn unknown_position_changes_nothing() {
        let (_, mut grid) = setup();
        let before = grid.clone();
        assert_eq!(cascade(&mut grid, "CM", Half::First, SlotTime::ZERO, "P1", true), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn modifiers_map_to_modes() {
        assert_eq!(CascadeMode::from_modifiers(false, false), CascadeMode::None);
        assert_eq!(CascadeMode::from_modifiers(true, false), CascadeMode::FillGaps);
        assert_eq!(CascadeMode::from_modifiers(false, true), CascadeMode::Overwrite);
        assert_eq!(CascadeMode::from_modifiers(true, true), CascadeMode::Overwrite);
        assert_eq!(CascadeMode::FillGaps.overwrite(), Some(false));
        assert_eq!(CascadeMode::None.overwrite(), None);
    }
}
