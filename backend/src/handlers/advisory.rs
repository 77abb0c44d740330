//! HTTP handlers for advisory and weekly plan endpoints

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{AdvisoryResult, FarmerContext, Language, WeatherSnapshot, WeeklyPlan};
use validator::Validate;

use crate::error::AppResult;
use crate::AppState;

/// Body for advisory and refresh requests
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRequest {
    #[validate]
    pub context: FarmerContext,
    #[validate]
    pub weather: WeatherSnapshot,
    #[serde(default)]
    pub language: Language,
}

/// Body for weekly plan requests
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlanRequest {
    #[validate]
    pub context: FarmerContext,
    #[serde(default)]
    pub language: Language,
}

/// Get an advisory, degrading to saved data or a placeholder
pub async fn get_advisory(
    State(state): State<AppState>,
    Json(input): Json<AdvisoryRequest>,
) -> AppResult<Json<AdvisoryResult>> {
    input.validate()?;
    let result = state
        .advisory
        .get_advisory(&input.context, &input.weather, input.language)
        .await;
    Ok(Json(result))
}

/// Refresh the advisory with new weather; 409 while offline
pub async fn refresh_advisory(
    State(state): State<AppState>,
    Json(input): Json<AdvisoryRequest>,
) -> AppResult<Json<AdvisoryResult>> {
    input.validate()?;
    let result = state
        .advisory
        .refresh_advisory(&input.context, &input.weather, input.language)
        .await?;
    Ok(Json(result))
}

/// The saved advisory without fetching; 404 when nothing is saved
pub async fn get_cached_advisory(
    State(state): State<AppState>,
) -> AppResult<Json<AdvisoryResult>> {
    Ok(Json(state.advisory.get_cached_advisory()?))
}

/// Generate a weekly plan; `null` when none is available
pub async fn get_weekly_plan(
    State(state): State<AppState>,
    Json(input): Json<WeeklyPlanRequest>,
) -> AppResult<Json<Option<WeeklyPlan>>> {
    input.validate()?;
    let plan = state
        .advisory
        .get_weekly_plan(&input.context, input.language)
        .await;
    Ok(Json(plan))
}

/// The saved weekly plan, without fetching
pub async fn get_cached_weekly_plan(State(state): State<AppState>) -> Json<Option<WeeklyPlan>> {
    Json(state.advisory.get_cached_weekly_plan())
}
