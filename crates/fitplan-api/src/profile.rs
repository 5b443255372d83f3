//! Handlers for `/users/:user_id/profile`.
//!
//! `PATCH` accepts any subset of `name`, `last_name`, `weight`, `height`,
//! `goal` and `difficulty`; other keys are rejected with 422.

use axum::{
  Json,
  extract::{Path, State},
};
use fitplan_core::{
  planner::Planner,
  store::PlanStore,
  user::{ProfileUpdate, User},
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /users/:user_id/profile`
pub async fn get_one<S>(
  State(planner): State<Planner<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: PlanStore,
{
  Ok(Json(planner.get_profile(user_id).await?))
}

/// `PATCH /users/:user_id/profile`
pub async fn update<S>(
  State(planner): State<Planner<S>>,
  Path(user_id): Path<Uuid>,
  Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, ApiError>
where
  S: PlanStore,
{
  Ok(Json(planner.update_profile(user_id, update).await?))
}
