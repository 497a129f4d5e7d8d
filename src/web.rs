use std::sync::{Mutex, MutexGuard};

use actix_files::Files;
use actix_web::{error, middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PlanConfig;
use crate::display::format_report;
use crate::export::write_plan_csv;
use crate::schedule::formation::FORMATIONS;
use crate::schedule::{
    timeline_lines, CascadeMode, Evaluation, Half, Plan, PlanState, SlotTime, TimelineEvent,
};
use crate::store::PlanStore;

// The plan being edited lives in memory; /api/save writes it to the store
pub struct AppState {
    pub plan: Mutex<Plan>,
    pub store: PlanStore,
}

impl AppState {
    pub fn new(plan: Plan, store: PlanStore) -> Self {
        AppState {
            plan: Mutex::new(plan),
            store,
        }
    }

    fn plan(&self) -> Result<MutexGuard<'_, Plan>> {
        self.plan
            .lock()
            .map_err(|_| error::ErrorInternalServerError("plan state unavailable"))
    }
}

#[derive(Deserialize)]
pub struct AssignRequest {
    position: String,
    half: Half,
    time: f64,
    #[serde(default)]
    player: String,
    /// Shift held: fill later empty slots
    #[serde(default)]
    shift: bool,
    /// Ctrl held: overwrite later slots
    #[serde(default)]
    ctrl: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRequest {
    half_duration_minutes: f64,
    slot_interval_minutes: f64,
    min_minutes_per_player: f64,
    formation_id: String,
}

#[derive(Deserialize)]
pub struct RosterRequest {
    players: String,
}

#[derive(Serialize)]
pub struct ReportResponse {
    title: String,
    config: PlanConfig,
    evaluation: Evaluation,
    timeline: Vec<TimelineEvent>,
    lines: Vec<String>,
}

#[derive(Serialize)]
pub struct FormationInfo {
    id: &'static str,
    positions: &'static [&'static str],
}

fn bad_request(message: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "success": false,
        "error": message.to_string()
    }))
}

// Malformed bodies get the same reply shape as rejected edits
fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    warn!("Rejected request body: {}", err);
    let response = bad_request(&err);
    error::InternalError::from_response(err, response).into()
}

fn report_response(plan: &Plan) -> HttpResponse {
    let report = plan.report();
    let lines = timeline_lines(&report.timeline);
    HttpResponse::Ok().json(ReportResponse {
        title: plan.title.clone(),
        config: plan.config().clone(),
        evaluation: report.evaluation,
        timeline: report.timeline,
        lines,
    })
}

// Current plan in its saved shape
async fn get_plan(state: web::Data<AppState>) -> Result<HttpResponse> {
    let plan = state.plan()?;
    Ok(HttpResponse::Ok().json(plan.to_state()))
}

// Replace the plan, e.g. from a shared link
async fn put_plan(
    req: web::Json<PlanState>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    match Plan::from_state(&req) {
        Ok(loaded) => {
            let mut plan = state.plan()?;
            *plan = loaded;
            info!("Loaded plan {:?} ({} players)", plan.title, plan.roster().len());
            Ok(report_response(&plan))
        }
        Err(e) => {
            warn!("Rejected plan: {}", e);
            Ok(bad_request(e))
        }
    }
}

async fn assign(
    req: web::Json<AssignRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mode = CascadeMode::from_modifiers(req.shift, req.ctrl);
    let mut plan = state.plan()?;
    match plan.assign(&req.position, req.half, SlotTime::new(req.time), &req.player, mode) {
        Ok(_) => Ok(report_response(&plan)),
        Err(e) => Ok(bad_request(e)),
    }
}

async fn set_config(
    req: web::Json<ConfigRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let config = match PlanConfig::new(
        req.half_duration_minutes,
        req.slot_interval_minutes,
        req.min_minutes_per_player,
        &req.formation_id,
    ) {
        Ok(config) => config,
        Err(e) => return Ok(bad_request(e)),
    };
    let mut plan = state.plan()?;
    plan.set_config(config);
    Ok(report_response(&plan))
}

async fn set_roster(
    req: web::Json<RosterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut plan = state.plan()?;
    plan.set_roster(&req.players);
    Ok(report_response(&plan))
}

async fn get_report(state: web::Data<AppState>) -> Result<HttpResponse> {
    let plan = state.plan()?;
    Ok(report_response(&plan))
}

async fn get_report_text(state: web::Data<AppState>) -> Result<HttpResponse> {
    let plan = state.plan()?;
    let text = format_report(&plan, &plan.report()).join("\n");
    Ok(HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(text))
}

async fn save(state: web::Data<AppState>) -> Result<HttpResponse> {
    let snapshot = state.plan()?.to_state();
    state
        .store
        .save(&snapshot)
        .map_err(|e| error::ErrorInternalServerError(format!("Failed to save plan: {}", e)))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "message": "Saved!"})))
}

// Drops the saved file; the plan being edited is kept
async fn forget_saved(state: web::Data<AppState>) -> Result<HttpResponse> {
    state
        .store
        .clear()
        .map_err(|e| error::ErrorInternalServerError(format!("Failed to remove plan: {}", e)))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "message": "Removed!"})))
}

async fn clear(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut plan = state.plan()?;
    plan.clear();
    Ok(report_response(&plan))
}

async fn export_csv(state: web::Data<AppState>) -> Result<HttpResponse> {
    let plan = state.plan()?;
    let mut body = Vec::new();
    write_plan_csv(&plan, &plan.report(), &mut body)
        .map_err(|e| error::ErrorInternalServerError(format!("Failed to export plan: {}", e)))?;
    Ok(HttpResponse::Ok().content_type("text/csv").body(body))
}

async fn get_formations() -> Result<HttpResponse> {
    let formations: Vec<FormationInfo> = FORMATIONS
        .iter()
        .map(|f| FormationInfo {
            id: f.id,
            positions: f.positions,
        })
        .collect();
    Ok(HttpResponse::Ok().json(formations))
}

/// Registers the API routes; shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/api/plan", web::get().to(get_plan))
        .route("/api/plan", web::put().to(put_plan))
        .route("/api/assign", web::post().to(assign))
        .route("/api/config", web::post().to(set_config))
        .route("/api/roster", web::post().to(set_roster))
        .route("/api/report", web::get().to(get_report))
        .route("/api/report.txt", web::get().to(get_report_text))
        .route("/api/save", web::post().to(save))
        .route("/api/save", web::delete().to(forget_saved))
        .route("/api/clear", web::post().to(clear))
        .route("/api/export.csv", web::get().to(export_csv))
        .route("/api/formations", web::get().to(get_formations));
}

pub async fn start_server(port: u16, app_state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(app_state);
    let serve_static = std::path::Path::new("static").is_dir();
    if !serve_static {
        info!("No static/ directory, serving the API only");
    }

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
            .configure(|cfg| {
                if serve_static {
                    cfg.service(Files::new("/", "static").index_file("index.html"));
                }
            })
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
