use crate::config::PlanConfig;
use super::types::{Half, SlotKey, SlotTime};

/// Calculates the slot times of one half.
/// Slot n starts at n * interval and slots continue while they start before
/// the end of the half. Both halves share the same sequence.
pub fn slot_times(config: &PlanConfig) -> Vec<SlotTime> {
    let mut times = Vec::new();
    let mut index = 0u32;
    loop {
        let minutes = f64::from(index) * config.slot_interval_minutes;
        if minutes >= config.half_duration_minutes {
            break;
        }
        times.push(SlotTime::new(minutes));
        index += 1;
    }
    times
}

/// Every (half, slot) pair of the configuration, first half first
pub fn slot_keys(config: &PlanConfig) -> Vec<SlotKey> {
    let times = slot_times(config);
    Half::ALL
        .iter()
        .flat_map(|&half| times.iter().map(move |&time| SlotKey { half, time }))
        .collect()
}

/// Parses a `"{half}-{time}"` key such as `"1-2.5"`
pub fn parse_slot_key(key: &str) -> Option<SlotKey> {
    let (half, time) = key.trim().split_once('-')?;
    let half = Half::from_number(half.parse().ok()?)?;
    let minutes: f64 = time.parse().ok()?;
    if !minutes.is_finite() || minutes < 0.0 {
        return None;
    }
    Some(SlotKey::new(half, minutes))
}

/// Formats a minute count the way slot headers show it ("0", "2.5", "17.5")
pub fn format_minutes(minutes: f64) -> String {
    SlotTime::new(minutes).to_string()
}
