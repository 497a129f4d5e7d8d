use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{
    DEFAULT_HALF_DURATION_MINUTES, DEFAULT_MIN_MINUTES_PER_PLAYER, DEFAULT_SLOT_INTERVAL_MINUTES,
};
use crate::parser::{parse_players, Roster};
use super::formation::DEFAULT_FORMATION_ID;

/// Saved and shared shape of a plan.
///
/// `positions` maps a position to `"{half}-{time}"` keys and player names.
/// The aliases accept files written by the browser version of the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanState {
    #[serde(default)]
    pub title: String,
    #[serde(alias = "timePerHalf", default = "default_half_duration")]
    pub half_duration_minutes: f64,
    #[serde(alias = "minTimePerPlayer", default = "default_min_minutes")]
    pub min_minutes_per_player: f64,
    #[serde(alias = "schedulingInterval", default = "default_slot_interval")]
    pub slot_interval_minutes: f64,
    #[serde(default, deserialize_with = "players_from_list_or_text")]
    pub players: Vec<String>,
    #[serde(default = "default_formation_id")]
    pub formation_id: String,
    #[serde(default)]
    pub positions: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for PlanState {
    fn default() -> Self {
        PlanState {
            title: String::new(),
            half_duration_minutes: DEFAULT_HALF_DURATION_MINUTES,
            min_minutes_per_player: DEFAULT_MIN_MINUTES_PER_PLAYER,
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
            players: Vec::new(),
            formation_id: default_formation_id(),
            positions: BTreeMap::new(),
        }
    }
}

fn default_half_duration() -> f64 {
    DEFAULT_HALF_DURATION_MINUTES
}

fn default_min_minutes() -> f64 {
    DEFAULT_MIN_MINUTES_PER_PLAYER
}

fn default_slot_interval() -> f64 {
    DEFAULT_SLOT_INTERVAL_MINUTES
}

fn default_formation_id() -> String {
    DEFAULT_FORMATION_ID.to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlayersField {
    List(Vec<String>),
    Text(String),
}

fn players_from_list_or_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let roster: Roster = match PlayersField::deserialize(deserializer)? {
        PlayersField::List(names) => names.into(),
        PlayersField::Text(text) => parse_players(&text),
    };
    Ok(roster.into())
}
