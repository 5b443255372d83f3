//! [`Planner`], the assignment and progress engine.
//!
//! Orchestrates the four engine operations (plan regeneration, completion
//! marking, statistics and schedule reads) plus profile access on top of any
//! [`PlanStore`].

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  assignment::{AssignmentView, NewAssignment},
  catalog::Workout,
  schedule::{PlanRequest, draw_plan, with_plan_rng},
  stats::StatsView,
  store::PlanStore,
  user::{ProfileUpdate, User},
};

/// Shared engine handle. Cloning is cheap; the store is reference-counted.
pub struct Planner<S> {
  store: Arc<S>,
}

impl<S> Clone for Planner<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store) }
  }
}

impl<S: PlanStore> Planner<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  async fn require_user(&self, user_id: Uuid) -> Result<User> {
    self
      .store
      .get_user(user_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::UserNotFound(user_id))
  }

  // ── Scheduler ─────────────────────────────────────────────────────────

  /// Replace the user's future, incomplete plan with a freshly drawn one.
  ///
  /// Sessions start tomorrow, relative to `as_of` (defaults to now). History
  /// (completed assignments and anything scheduled up to today) is left
  /// untouched. Returns the new assignments in generation order.
  pub async fn generate_plan(
    &self,
    user_id: Uuid,
    request: PlanRequest,
    as_of: Option<DateTime<Utc>>,
  ) -> Result<Vec<AssignmentView>> {
    request.validate()?;

    let user = self.require_user(user_id).await?;
    let eligible = self
      .store
      .eligible_workouts(user.goal, user.difficulty)
      .await
      .map_err(Error::store)?;
    if eligible.is_empty() {
      return Err(Error::NoEligibleWorkouts {
        goal:       user.goal,
        difficulty: user.difficulty,
      });
    }

    debug_assert!(eligible.iter().all(|w| w.matches(user.goal, user.difficulty)));

    let today = as_of.unwrap_or_else(Utc::now).date_naive();
    let first_day = today
      .succ_opt()
      .ok_or_else(|| Error::InvalidPlanRequest(format!("no day follows {today}")))?;

    // The draw runs inside the store's transaction, against the rows that
    // survive it, so a concurrent completion cannot slip in between.
    let pool = eligible.clone();
    let replaced = self
      .store
      .replace_future_plan(user_id, today, move |kept| {
        let sessions =
          with_plan_rng(|rng| draw_plan(&pool, request, first_day, kept, rng))?;
        Ok(
          sessions
            .into_iter()
            .map(|s| NewAssignment {
              workout_id:     s.workout.workout_id,
              scheduled_date: s.scheduled_date,
            })
            .collect(),
        )
      })
      .await
      .map_err(Error::store)??;

    let by_id: HashMap<Uuid, &Workout> = eligible.iter().map(|w| (w.workout_id, w)).collect();
    let views: Vec<AssignmentView> = replaced
      .inserted
      .iter()
      .filter_map(|a| {
        by_id
          .get(&a.workout_id)
          .map(|w| AssignmentView::planned(w, a.scheduled_date))
      })
      .collect();

    info!(
      %user_id,
      eligible = eligible.len(),
      removed = replaced.removed,
      created = views.len(),
      "regenerated workout plan"
    );
    Ok(views)
  }

  // ── Completion tracker ────────────────────────────────────────────────

  /// Mark the user's assignment of `workout_id` scheduled on `day` as done.
  /// Marking an already-done assignment again succeeds.
  pub async fn mark_done(&self, user_id: Uuid, workout_id: Uuid, day: NaiveDate) -> Result<()> {
    let matched = self
      .store
      .mark_done(user_id, workout_id, day)
      .await
      .map_err(Error::store)?;

    if !matched {
      warn!(%user_id, %workout_id, %day, "no assignment to mark done");
      return Err(Error::AssignmentNotFound { user_id, workout_id, day });
    }

    debug!(%user_id, %workout_id, %day, "assignment marked done");
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn get_stats(&self, user_id: Uuid) -> Result<StatsView> {
    let schedule = self.get_schedule(user_id).await?;
    Ok(StatsView::from_schedule(&schedule))
  }

  /// The user's full history and future plan, ascending by scheduled date.
  pub async fn get_schedule(&self, user_id: Uuid) -> Result<Vec<AssignmentView>> {
    self.require_user(user_id).await?;
    self
      .store
      .list_assignments(user_id)
      .await
      .map_err(Error::store)
  }

  // ── Profile ───────────────────────────────────────────────────────────

  pub async fn get_profile(&self, user_id: Uuid) -> Result<User> {
    self.require_user(user_id).await
  }

  /// Apply `update` to the profile. Goal and difficulty changes only affect
  /// plans generated afterwards.
  pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> Result<User> {
    if update.is_empty() {
      return self.require_user(user_id).await;
    }
    self
      .store
      .update_profile(user_id, update)
      .await
      .map_err(Error::store)?
      .ok_or(Error::UserNotFound(user_id))
  }
}
