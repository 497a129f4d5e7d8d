use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::config::PlanConfig;
use super::grid::AssignmentGrid;
use super::slot_utils::slot_times;
use super::types::{Half, SlotKey, SlotTime};
use super::validate::Evaluation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Starter {
    pub position: String,
    pub player: String,
}

/// One line of the substitution narrative.
///
/// Starters without a player are shown as `(empty)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineEvent {
    HalfStart {
        half: Half,
        starters: Vec<Starter>,
    },
    /// A player already on the field switches position
    Moved {
        half: Half,
        time: SlotTime,
        player: String,
        from: String,
        to: String,
        out: Option<String>,
    },
    /// A player comes on at a position
    Entered {
        half: Half,
        time: SlotTime,
        player: String,
        position: String,
        out: Option<String>,
    },
    /// A position is left unassigned. Reported on its own rather than as a
    /// player coming in with an empty name.
    Vacated {
        half: Half,
        time: SlotTime,
        position: String,
        out: Option<String>,
    },
    Separator {
        half: Half,
    },
}

fn write_out(f: &mut fmt::Formatter<'_>, out: &Option<String>) -> fmt::Result {
    match out {
        Some(player) => write!(f, ", {} out", player),
        None => Ok(()),
    }
}

impl fmt::Display for TimelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineEvent::HalfStart { half, starters } => {
                write!(f, "{} half start: ", half.label())?;
                for (i, starter) in starters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    let player = if starter.player.is_empty() {
                        "(empty)"
                    } else {
                        starter.player.as_str()
                    };
                    write!(f, "{} at {}", player, starter.position)?;
                }
                Ok(())
            }
            TimelineEvent::Moved { time, player, from, to, out, .. } => {
                write!(f, "{}: {} moves from {} to {}", time, player, from, to)?;
                write_out(f, out)
            }
            TimelineEvent::Entered { time, player, position, out, .. } => {
                write!(f, "{}: {} in at {}", time, player, position)?;
                write_out(f, out)
            }
            TimelineEvent::Vacated { time, position, out, .. } => {
                write!(f, "{}: {} left empty", time, position)?;
                write_out(f, out)
            }
            TimelineEvent::Separator { .. } => Ok(()),
        }
    }
}

/// Builds the substitution narrative for both halves.
///
/// Each half opens with the starters at slot 0, followed by one event per
/// changed cell in slot order and then formation order, and closes with a
/// separator. Change flags come from `evaluation`; slot 0 changes are
/// covered by the starters line.
pub fn build_timeline(
    grid: &AssignmentGrid,
    config: &PlanConfig,
    evaluation: &Evaluation,
) -> Vec<TimelineEvent> {
    let times = slot_times(config);

    // (player, slot) -> position; with a double booking the later position wins
    let mut whereabouts: HashMap<(&str, SlotKey), &str> = HashMap::new();
    for half in Half::ALL {
        for &time in &times {
            for position in &config.positions {
                let player = grid.get(position, half, time);
                if !player.is_empty() {
                    whereabouts.insert((player, SlotKey { half, time }), position.as_str());
                }
            }
        }
    }

    let mut events = Vec::new();
    for half in Half::ALL {
        let starters = config
            .positions
            .iter()
            .map(|position| Starter {
                position: position.clone(),
                player: grid.get(position, half, SlotTime::ZERO).to_string(),
            })
            .collect();
        events.push(TimelineEvent::HalfStart { half, starters });

        for pair in times.windows(2) {
            let (previous_time, time) = (pair[0], pair[1]);
            let now = SlotKey { half, time };
            let before = SlotKey { half, time: previous_time };

            for position in &config.positions {
                if !evaluation.flags(position, half, time).is_change {
                    continue;
                }
                let player = grid.get(position, half, time);
                let previous_player = grid.get(position, half, previous_time);

                let out = if !previous_player.is_empty()
                    && !whereabouts.contains_key(&(previous_player, now))
                {
                    Some(previous_player.to_string())
                } else {
                    None
                };

                let event = if player.is_empty() {
                    TimelineEvent::Vacated {
                        half,
                        time,
                        position: position.clone(),
                        out,
                    }
                } else if let Some(from) = whereabouts.get(&(player, before)) {
                    TimelineEvent::Moved {
                        half,
                        time,
                        player: player.to_string(),
                        from: from.to_string(),
                        to: position.clone(),
                        out,
                    }
                } else {
                    TimelineEvent::Entered {
                        half,
                        time,
                        player: player.to_string(),
                        position: position.clone(),
                        out,
                    }
                };
                events.push(event);
            }
        }

        events.push(TimelineEvent::Separator { half });
    }
    events
}

/// Renders events as text lines, separators as blank lines
pub fn timeline_lines(events: &[TimelineEvent]) -> Vec<String> {
    events.iter().map(|e| e.to_string()).collect()
}
