use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, instrument};

use super::dto::{MealPlanRequest, PlanResult, ReplaceIngredientRequest};
use super::services::{self, Impact, ReplaceOutcome};
use crate::error::ApiError;
use crate::export::{render_markdown, ExportOptions};
use crate::session::SessionView;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plan/request", put(update_request))
        .route("/plan/generate", post(generate))
        .route("/plan/ingredients/:id/remove", post(remove_ingredient))
        .route("/plan/ingredients/:id/replace", post(replace_ingredient))
        .route("/plan/export", get(export_plan))
}

#[instrument(skip(state, body))]
pub async fn update_request(
    State(state): State<AppState>,
    Json(body): Json<MealPlanRequest>,
) -> Result<Json<SessionView>, ApiError> {
    body.validate()?;
    let mut session = state.session.write().await;
    session.request = body;
    Ok(Json(SessionView::of(&session)))
}

#[instrument(skip(state))]
pub async fn generate(State(state): State<AppState>) -> Result<Json<PlanResult>, ApiError> {
    let plan = services::generate_plan(&state).await?;
    Ok(Json(plan))
}

#[instrument(skip(state))]
pub async fn remove_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlanResult>, ApiError> {
    let plan = services::remove_ingredient(&state, &id).await?;
    Ok(Json(plan))
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplaceResponse {
    Replaced { plan: PlanResult },
    NeedsConfirmation { impact: Impact, warning: String },
}

#[instrument(skip(state, body))]
pub async fn replace_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReplaceIngredientRequest>,
) -> Result<Json<ReplaceResponse>, ApiError> {
    let outcome =
        services::replace_ingredient(&state, &id, &body.new_name, body.confirmed).await?;
    let response = match outcome {
        ReplaceOutcome::Replaced(plan) => ReplaceResponse::Replaced { plan },
        ReplaceOutcome::NeedsConfirmation(verdict) => ReplaceResponse::NeedsConfirmation {
            impact: verdict.impact,
            warning: verdict.warning,
        },
    };
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn export_plan(
    State(state): State<AppState>,
    Query(options): Query<ExportOptions>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    debug!(
        page_size = ?options.page_size,
        margin_in = options.margin_in,
        image_quality = options.image_quality,
        "exporting current plan"
    );
    let content = {
        let session = state.session.read().await;
        let plan = session.plan.as_ref().ok_or(ApiError::NoPlan)?;
        render_markdown(plan, session.request.budget)
    };
    let bytes = state.exporter.export(&content, &options).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/markdown; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"MyMealPlan.md\""),
    );
    Ok((headers, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_response_serializes_tagged() {
        let gated = ReplaceResponse::NeedsConfirmation {
            impact: Impact::High,
            warning: "Different macros.".into(),
        };
        let json = serde_json::to_string(&gated).unwrap();
        assert!(json.contains(r#""status":"needs_confirmation""#));
        assert!(json.contains(r#""impact":"high""#));
    }
}
