//! Handler for `GET /users/:user_id/stats`.

use axum::{
  Json,
  extract::{Path, State},
};
use fitplan_core::{planner::Planner, stats::StatsView, store::PlanStore};
use uuid::Uuid;

use crate::error::ApiError;

pub async fn handler<S>(
  State(planner): State<Planner<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<StatsView>, ApiError>
where
  S: PlanStore,
{
  Ok(Json(planner.get_stats(user_id).await?))
}
