use super::models::DashboardContext;
use super::services::load_dashboard;
use crate::common::errors::BusinessResult;
use crate::common::state::AppState;
use axum::extract::State;
use axum::response::Json;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(get_dashboard))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Farm totals over fields with a crop", body = DashboardContext),
        (status = 422, description = "No field carries a crop yet")
    ),
    tag = "dashboard",
    summary = "Dashboard"
)]
pub async fn get_dashboard(State(state): State<AppState>) -> BusinessResult<Json<DashboardContext>> {
    Ok(Json(load_dashboard(&state.db).await?))
}
