use crate::config::PlanConfig;
use super::grid::AssignmentGrid;
use super::slot_utils::slot_keys;

/// Rebuilds the grid for a new configuration.
///
/// Every key of `new` keeps the value it had in `grid` and defaults to empty
/// otherwise; keys outside `new` are dropped. `old` is the configuration the
/// grid was built for and only bounds which prior keys count as present.
pub fn reshape(grid: &AssignmentGrid, old: &PlanConfig, new: &PlanConfig) -> AssignmentGrid {
    let old_keys = slot_keys(old);
    let new_keys = slot_keys(new);
    let mut reshaped = AssignmentGrid::default();
    for position in &new.positions {
        let known = old.position_index(position).is_some();
        for &key in &new_keys {
            let player = if known && old_keys.binary_search(&key).is_ok() {
                grid.get(position, key.half, key.time).to_string()
            } else {
                String::new()
            };
            reshaped.insert(position, key, player);
        }
    }
    reshaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::{Half, SlotKey, SlotTime};

    fn config(half: f64, interval: f64, positions: &[&str]) -> PlanConfig {
        PlanConfig::with_positions(
            half,
            interval,
            0.0,
            "custom",
            positions.iter().map(|p| p.to_string()).collect(),
        )
        .unwrap()
    }

    fn sample(config: &PlanConfig) -> AssignmentGrid {
        let mut grid = AssignmentGrid::for_config(config);
        grid.assign("GK", Half::First, SlotTime::ZERO, "Alice").unwrap();
        grid.assign("GK", Half::First, SlotTime::new(10.0), "Bob").unwrap();
        grid.assign("ST", Half::Second, SlotTime::new(5.0), "Carl").unwrap();
        grid
    }

    #[test]
    fn growing_keeps_values_and_adds_empty_cells() {
        let old = config(15.0, 5.0, &["GK", "ST"]);
        let new = config(25.0, 5.0, &["GK", "ST"]);
        let grown = reshape(&sample(&old), &old, &new);
        assert_eq!(grown.len(), 2 * 2 * 5);
        assert_eq!(grown.get("GK", Half::First, SlotTime::new(10.0)), "Bob");
        assert_eq!(grown.get("GK", Half::First, SlotTime::new(20.0)), "");
    }

    #[test]
    fn round_trip_through_more_slots_restores_grid() {
        let old = config(15.0, 5.0, &["GK", "ST"]);
        let new = config(15.0, 2.5, &["GK", "ST"]);
        let grid = sample(&old);
        let back = reshape(&reshape(&grid, &old, &new), &new, &old);
        assert_eq!(back, grid);
    }

    #[test]
    fn shrinking_drops_obsolete_cells() {
        let old = config(15.0, 5.0, &["GK", "ST"]);
        let new = config(10.0, 5.0, &["GK"]);
        let shrunk = reshape(&sample(&old), &old, &new);
        assert_eq!(shrunk.len(), 4);
        assert_eq!(shrunk.get("GK", Half::First, SlotTime::ZERO), "Alice");
        assert_eq!(shrunk.positions().collect::<Vec<_>>(), vec!["GK"]);
        assert!(!shrunk.contains("GK", &SlotKey::new(Half::First, 10.0)));
    }

    #[test]
    fn formation_switch_discards_old_positions() {
        let old = config(15.0, 5.0, &["GK", "ST"]);
        let new = config(15.0, 5.0, &["GK", "LD", "RD"]);
        let switched = reshape(&sample(&old), &old, &new);
        assert_eq!(switched.assigned_count("Carl"), 0);
        assert_eq!(switched.assigned_count("Alice"), 1);
        assert_eq!(switched.get("LD", Half::First, SlotTime::ZERO), "");
    }

    #[test]
    fn reshape_is_idempotent() {
        let old = config(15.0, 5.0, &["GK", "ST"]);
        let new = config(20.0, 2.5, &["GK", "ST", "CM"]);
        let once = reshape(&sample(&old), &old, &new);
        let twice = reshape(&once, &new, &new);
        assert_eq!(once, twice);
    }
}
