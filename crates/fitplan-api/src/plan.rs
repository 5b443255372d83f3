//! Handler for `POST /users/:user_id/plan`.
//!
//! Body: `{"months": 1, "frequency_per_week": 3}`. Replaces the user's future,
//! incomplete assignments with a freshly drawn plan and returns 201 with the
//! new assignments.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use fitplan_core::{
  assignment::AssignmentView,
  planner::Planner,
  schedule::PlanRequest,
  store::PlanStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct PlanCreated {
  pub status:   &'static str,
  pub workouts: Vec<AssignmentView>,
}

/// `POST /users/:user_id/plan`
pub async fn generate<S>(
  State(planner): State<Planner<S>>,
  Path(user_id): Path<Uuid>,
  Json(request): Json<PlanRequest>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlanStore,
{
  let workouts = planner.generate_plan(user_id, request, None).await?;
  Ok((StatusCode::CREATED, Json(PlanCreated { status: "plan_created", workouts })))
}
