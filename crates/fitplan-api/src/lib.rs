//! JSON REST API for the fitplan engine.
//!
//! Exposes an axum [`Router`] backed by a [`Planner`] over any
//! [`fitplan_core::store::PlanStore`]. The user is identified by the path;
//! authentication, TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", fitplan_api::api_router(planner.clone()))
//! ```

pub mod error;
pub mod plan;
pub mod profile;
pub mod stats;
pub mod workouts;

use axum::{
  Router,
  routing::{get, patch, post},
};
use fitplan_core::{planner::Planner, store::PlanStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `planner`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(planner: Planner<S>) -> Router<()>
where
  S: PlanStore + 'static,
{
  Router::new()
    // Profile
    .route(
      "/users/{user_id}/profile",
      get(profile::get_one::<S>).patch(profile::update::<S>),
    )
    // Scheduler
    .route("/users/{user_id}/plan", post(plan::generate::<S>))
    // Schedule reader and completion tracker
    .route("/users/{user_id}/workouts", get(workouts::list::<S>))
    .route("/users/{user_id}/workouts/complete", patch(workouts::complete::<S>))
    // Stats
    .route("/users/{user_id}/stats", get(stats::handler::<S>))
    .with_state(planner)
}

#[cfg(test)]
mod tests;
