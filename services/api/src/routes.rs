use crate::infra::{deserialize_optional_date, AppState};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use immigration_tracker::deadlines::{
    documents, transitions, DeadlinePlan, ImmigrationPhase, ImmigrationStatus, StudentProfile,
    TransitionSuggestion,
};
use immigration_tracker::error::AppError;
use immigration_tracker::profiles::{BindingView, DeploymentProfile};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize)]
pub(crate) struct ProfilesResponse {
    pub(crate) report: String,
    pub(crate) active_profiles: Vec<DeploymentProfile>,
    pub(crate) selected: Option<BindingView>,
    pub(crate) ignored_profiles: Vec<DeploymentProfile>,
    pub(crate) registered: Vec<BindingView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransitionsResponse {
    pub(crate) status: ImmigrationStatus,
    pub(crate) label: &'static str,
    pub(crate) phase: ImmigrationPhase,
    pub(crate) terminal: bool,
    pub(crate) requires_immediate_action: bool,
    pub(crate) can_work: bool,
    pub(crate) recommended: ImmigrationStatus,
    pub(crate) next_statuses: &'static [ImmigrationStatus],
    pub(crate) suggestions: Vec<TransitionSuggestion>,
    pub(crate) required_documents: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeadlinePlanRequest {
    #[serde(flatten)]
    pub(crate) profile: StudentProfile,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn api_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/profiles", get(profiles_endpoint))
        .route("/api/v1/profiles/:profile/binding", get(binding_endpoint))
        .route("/api/v1/deadlines", post(deadlines_endpoint))
        .route(
            "/api/v1/statuses/:status/transitions",
            get(transitions_endpoint),
        )
        .route(
            "/api/v1/statuses/:status/transitions/:target",
            get(transition_check_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn profiles_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<ProfilesResponse> {
    let resolution = state.resolver.resolve();
    let registered = state
        .resolver
        .registry()
        .bindings()
        .iter()
        .map(|binding| binding.view())
        .collect();

    Json(ProfilesResponse {
        report: resolution.report.to_string(),
        active_profiles: resolution.active_profiles,
        selected: resolution.selected,
        ignored_profiles: resolution.ignored_profiles,
        registered,
    })
}

pub(crate) async fn binding_endpoint(
    Extension(state): Extension<AppState>,
    Path(profile): Path<String>,
) -> Result<Json<BindingView>, AppError> {
    let binding = state
        .resolver
        .require_binding(&DeploymentProfile::new(profile))?;
    Ok(Json(binding.view()))
}

pub(crate) async fn transitions_endpoint(
    Path(status): Path<String>,
) -> Result<Json<TransitionsResponse>, AppError> {
    let status: ImmigrationStatus = status.parse()?;
    Ok(Json(TransitionsResponse {
        status,
        label: status.label(),
        phase: status.phase(),
        terminal: transitions::is_terminal_status(status),
        requires_immediate_action: transitions::requires_immediate_action(status),
        can_work: transitions::can_work(status),
        recommended: transitions::recommended_next_status(status),
        next_statuses: transitions::next_statuses(status),
        suggestions: transitions::transition_suggestions(status),
        required_documents: documents::required_documents(status),
    }))
}

pub(crate) async fn transition_check_endpoint(
    Path((status, target)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let from: ImmigrationStatus = status.parse()?;
    let to: ImmigrationStatus = target.parse()?;
    transitions::validate_transition(from, to)?;
    Ok(Json(json!({ "from": from, "to": to, "valid": true })))
}

pub(crate) async fn deadlines_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DeadlinePlanRequest>,
) -> Json<DeadlinePlan> {
    let DeadlinePlanRequest { profile, today } = payload;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    Json(state.planner.plan(&profile, today))
}
