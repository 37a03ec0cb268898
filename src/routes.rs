use crate::common::state::AppState;
use crate::config::Config;
use crate::{crops, dashboard, fields, operations};
use axum::Router;
use sea_orm::DatabaseConnection;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

pub fn build_router(db: &DatabaseConnection, config: &Config) -> Router {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Farm API", description = "Fields, crops and the operations carried out on them"),
        tags(
            (name = "dashboard", description = "Farm-wide totals"),
            (name = "crops", description = "Crop types and their economics"),
            (name = "fields", description = "Land parcels"),
            (name = "operations", description = "Management actions on fields")
        )
    )]
    struct ApiDoc;

    let app_state: AppState = AppState::new(db.clone(), config.clone());

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(crate::common::views::router(&app_state)) // Root routes
        .nest("/api/dashboard", dashboard::views::router(&app_state))
        .nest("/api/crops", crops::views::router(&app_state))
        .nest(
            "/api/fields",
            fields::views::router(&app_state).merge(operations::views::field_router(&app_state)),
        )
        .nest("/api/operations", operations::views::router(&app_state))
        .split_for_parts();

    router.merge(Scalar::with_url("/api/docs", api))
}
