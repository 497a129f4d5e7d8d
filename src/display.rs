use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;

use crate::schedule::{format_minutes, slot_times, timeline_lines, Half, Plan, PlanReport, SlotKey};

/// A player placed at several positions in the same slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleBooking {
    pub slot: SlotKey,
    pub player: String,
    pub positions: Vec<String>,
}

/// Groups error-flagged cells by slot and player
pub fn double_bookings(plan: &Plan, report: &PlanReport) -> Vec<DoubleBooking> {
    let config = plan.config();
    let mut grouped: BTreeMap<(SlotKey, String), Vec<String>> = BTreeMap::new();
    for half in Half::ALL {
        for time in slot_times(config) {
            for position in &config.positions {
                if report.evaluation.flags(position, half, time).is_error {
                    let player = plan.grid().get(position, half, time).to_string();
                    grouped
                        .entry((SlotKey { half, time }, player))
                        .or_default()
                        .push(position.clone());
                }
            }
        }
    }
    grouped
        .into_iter()
        .map(|((slot, player), positions)| DoubleBooking { slot, player, positions })
        .collect()
}

/// Renders the report as text lines
pub fn format_report(plan: &Plan, report: &PlanReport) -> Vec<String> {
    let config = plan.config();
    let evaluation = &report.evaluation;
    let mut lines = Vec::new();

    let title = if plan.title.is_empty() { "Substitution plan" } else { plan.title.as_str() };
    lines.push(format!("** {} **", title));
    lines.push(format!(
        "Formation {}, {} min halves, {} min slots, minimum {} min per player",
        config.formation_id,
        format_minutes(config.half_duration_minutes),
        format_minutes(config.slot_interval_minutes),
        format_minutes(config.min_minutes_per_player),
    ));

    lines.push(String::new());
    lines.push(format!("=== Players ({} players) ===", evaluation.player_count));
    for aggregate in &evaluation.players {
        let minutes = format_minutes(aggregate.total_minutes);
        let mut line = format!("  {}: {} minutes", aggregate.name, minutes);
        if !aggregate.positions_played.is_empty() {
            line.push_str(&format!(" ({})", aggregate.positions_played.join(", ")));
        }
        if aggregate.under_minimum {
            line.push_str(" [UNDER MINIMUM]");
        }
        lines.push(line);
    }
    if !evaluation.unrostered.is_empty() {
        lines.push(format!("  Not on roster: {}", evaluation.unrostered.join(", ")));
    }

    lines.push(String::new());
    lines.push(format!("Unassigned cells: {}", evaluation.warning_count()));
    let bookings = double_bookings(plan, report);
    if !bookings.is_empty() {
        lines.push(format!("Double-booked players ({}):", bookings.len()));
        for booking in &bookings {
            lines.push(format!(
                "  - {} at {} ({} half, {} min)",
                booking.player,
                booking.positions.join(", "),
                booking.slot.half.label(),
                booking.slot.time,
            ));
        }
    }

    lines.push(String::new());
    lines.push("=== Timeline ===".to_string());
    lines.extend(timeline_lines(&report.timeline));
    lines
}

/// Prints the report in a readable format
pub fn print_plan_report(plan: &Plan, report: &PlanReport) {
    for line in format_report(plan, report) {
        println!("{}", line);
    }
}

/// Writes the report to a file, stamped with the generation time
pub fn write_report_to_file(
    plan: &Plan,
    report: &PlanReport,
    filename: &Path,
) -> Result<(), std::io::Error> {
    let mut file = File::create(filename)?;
    writeln!(file, "Generated {}", Local::now().format("%Y-%m-%d %H:%M"))?;
    for line in format_report(plan, report) {
        writeln!(file, "{}", line)?;
    }
    Ok(())
}
