//! Handlers for `/users/:user_id/workouts` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/users/:user_id/workouts` | Full schedule, oldest first |
//! | `PATCH` | `/users/:user_id/workouts/complete` | Body: [`CompleteBody`] |

use axum::{
  Json,
  extract::{Path, State},
};
use fitplan_core::{
  assignment::AssignmentView,
  planner::Planner,
  schedule::calendar_day,
  store::PlanStore,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users/:user_id/workouts`
pub async fn list<S>(
  State(planner): State<Planner<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<AssignmentView>>, ApiError>
where
  S: PlanStore,
{
  Ok(Json(planner.get_schedule(user_id).await?))
}

// ─── Complete ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CompleteBody {
  pub workout_id: Uuid,
  /// The day the assignment was scheduled for, e.g. `"2026-02-07"`. A time of
  /// day, if present, is ignored.
  pub date:       String,
}

/// `PATCH /users/:user_id/workouts/complete`
pub async fn complete<S>(
  State(planner): State<Planner<S>>,
  Path(user_id): Path<Uuid>,
  Json(body): Json<CompleteBody>,
) -> Result<Json<Value>, ApiError>
where
  S: PlanStore,
{
  let day = calendar_day(&body.date)?;
  planner.mark_done(user_id, body.workout_id, day).await?;
  Ok(Json(json!({
    "status":     "success",
    "message":    "workout marked as completed",
    "workout_id": body.workout_id,
  })))
}
