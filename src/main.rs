use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use substitution_planner::config::Settings;
use substitution_planner::display::{print_plan_report, write_report_to_file};
use substitution_planner::export::export_plan_to_csv;
use substitution_planner::schedule::Plan;
use substitution_planner::store::PlanStore;
use substitution_planner::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Web mode: serve the editor and the JSON API
    if args.len() > 1 && args[1] == "web" {
        let settings = Settings::from_env(args.get(2).map(String::as_str));
        let store = PlanStore::new(settings.state_path.clone());
        let plan = Plan::from_state(&store.load()?)?;

        println!("Starting web server on port {}...", settings.port);
        println!("Plan file: {}", settings.state_path.display());
        println!("Access the site at http://localhost:{}", settings.port);

        web::start_server(settings.port, AppState::new(plan, store)).await?;
        return Ok(());
    }

    // CLI mode: report on a saved plan
    let settings = Settings::from_env(None);
    let state_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.state_path.clone());

    println!("Loading plan from {}...", state_path.display());
    let state = PlanStore::new(state_path.clone()).load()?;
    let plan = Plan::from_state(&state)?;
    info!(
        "Loaded plan with {} players in formation {}",
        plan.roster().len(),
        plan.config().formation_id
    );

    let report = plan.report();
    println!();
    print_plan_report(&plan, &report);

    println!("\n=== Writing Plan to Files ===");
    std::fs::create_dir_all(&settings.out_dir)?;
    let report_path = settings.out_dir.join("substitution_plan.txt");
    let csv_path = settings.out_dir.join("substitution_plan.csv");
    write_report_to_file(&plan, &report, &report_path)?;
    export_plan_to_csv(&plan, &csv_path)?;
    println!("Plan saved to:");
    println!("  - {}", report_path.display());
    println!("  - {}", csv_path.display());

    Ok(())
}
