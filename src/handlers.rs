use crate::daily_values;
use crate::errors::AppError;
use crate::intake::build_report;
use crate::models::{
    ActiveRequest, DailyValueEntry, FactPatch, IntakeReport, NewFact, NewSupplement,
    NutritionFact, SearchQuery, SupplementPatch, SupplementView,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use tracing::warn;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let registry = state.registry.lock().await;
    let supplements: Vec<SupplementView> = registry
        .list()
        .iter()
        .map(|supplement| registry.view(supplement))
        .collect();
    let report = build_report(registry.active_supplements());
    Html(render_index(&supplements, &report))
}

pub async fn list_supplements(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<SupplementView>> {
    let registry = state.registry.lock().await;
    let supplements = registry
        .search(&query.q)
        .into_iter()
        .map(|supplement| registry.view(supplement))
        .collect();
    Json(supplements)
}

pub async fn create_supplement(
    State(state): State<AppState>,
    Json(payload): Json<NewSupplement>,
) -> Result<(StatusCode, Json<SupplementView>), AppError> {
    let mut registry = state.registry.lock().await;
    let supplement = registry.add(payload).inspect_err(log_rejected)?;
    Ok((StatusCode::CREATED, Json(registry.view(&supplement))))
}

pub async fn get_supplement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SupplementView>, AppError> {
    let registry = state.registry.lock().await;
    let supplement = registry.get(&id)?;
    Ok(Json(registry.view(supplement)))
}

pub async fn update_supplement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<SupplementPatch>,
) -> Result<Json<SupplementView>, AppError> {
    let mut registry = state.registry.lock().await;
    let supplement = registry.update(&id, patch).inspect_err(log_rejected)?;
    Ok(Json(registry.view(&supplement)))
}

pub async fn delete_supplement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.registry.lock().await.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_active(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ActiveRequest>,
) -> Result<Json<SupplementView>, AppError> {
    let mut registry = state.registry.lock().await;
    registry.set_active(&id, payload.active)?;
    let supplement = registry.get(&id)?;
    Ok(Json(registry.view(supplement)))
}

pub async fn add_fact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<NewFact>,
) -> Result<(StatusCode, Json<NutritionFact>), AppError> {
    let fact = state
        .registry
        .lock()
        .await
        .add_fact(&id, payload)
        .inspect_err(log_rejected)?;
    Ok((StatusCode::CREATED, Json(fact)))
}

pub async fn update_fact(
    State(state): State<AppState>,
    Path((id, fact_id)): Path<(String, String)>,
    Json(patch): Json<FactPatch>,
) -> Result<Json<NutritionFact>, AppError> {
    let fact = state
        .registry
        .lock()
        .await
        .update_fact(&id, &fact_id, patch)
        .inspect_err(log_rejected)?;
    Ok(Json(fact))
}

pub async fn delete_fact(
    State(state): State<AppState>,
    Path((id, fact_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state.registry.lock().await.delete_fact(&id, &fact_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_intake(State(state): State<AppState>) -> Json<IntakeReport> {
    let registry = state.registry.lock().await;
    Json(build_report(registry.active_supplements()))
}

pub async fn get_daily_values() -> Json<Vec<DailyValueEntry>> {
    Json(daily_values::entries())
}

fn log_rejected(err: &AppError) {
    if let AppError::BadRequest(message) = err {
        warn!("rejected input: {message}");
    }
}
