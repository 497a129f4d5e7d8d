use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::schedule::{format_minutes, slot_times, Half, Plan, PlanReport};

/// Writes the plan as CSV: one row per position and half with a column per
/// slot, then a blank row and the per-player totals.
pub fn write_plan_csv<W: Write>(
    plan: &Plan,
    report: &PlanReport,
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);

    let config = plan.config();
    let times = slot_times(config);

    let mut header = vec!["Position".to_string(), "Half".to_string()];
    header.extend(times.iter().map(|t| t.to_string()));
    wtr.write_record(&header)?;

    for half in Half::ALL {
        for position in &config.positions {
            let mut row = vec![position.clone(), half.to_string()];
            row.extend(times.iter().map(|&t| plan.grid().get(position, half, t).to_string()));
            wtr.write_record(&row)?;
        }
    }

    wtr.write_record([""])?;
    wtr.write_record(["Player", "Minutes", "Positions", "Under minimum"])?;
    for aggregate in &report.evaluation.players {
        let minutes = format_minutes(aggregate.total_minutes);
        let positions = aggregate.positions_played.join(" ");
        let under = if aggregate.under_minimum { "Yes" } else { "No" };
        wtr.write_record([aggregate.name.as_str(), minutes.as_str(), positions.as_str(), under])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the plan to a CSV file, replacing any previous export
pub fn export_plan_to_csv(plan: &Plan, csv_path: &Path) -> Result<(), csv::Error> {
    let file = std::fs::File::create(csv_path)?;
    write_plan_csv(plan, &plan.report(), file)
}
