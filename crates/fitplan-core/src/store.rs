//! The `PlanStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `fitplan-store-sqlite`).
//! The [`Planner`](crate::planner::Planner) and the HTTP layer depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  assignment::{AssignmentView, KeptSlots, NewAssignment, PlanReplacement},
  catalog::{Difficulty, Exercise, Goal, NewExercise, NewWorkout, Workout},
  user::{NewUser, ProfileUpdate, User},
};

/// Abstraction over the relational store holding users, the workout catalog
/// and the assignment ledger.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PlanStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a user. Accounts normally come from the account
  /// subsystem; this exists for seeding and tests.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Overwrite the fields present in `update` and return the updated user, or
  /// `None` if the user does not exist.
  fn update_profile(
    &self,
    user_id: Uuid,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Catalog ───────────────────────────────────────────────────────────

  fn add_exercise(
    &self,
    input: NewExercise,
  ) -> impl Future<Output = Result<Exercise, Self::Error>> + Send + '_;

  /// Persist a template. Every id in `exercise_ids` must already exist.
  fn add_workout(
    &self,
    input: NewWorkout,
  ) -> impl Future<Output = Result<Workout, Self::Error>> + Send + '_;

  /// All templates tagged with exactly this goal and difficulty, exercises
  /// included.
  fn eligible_workouts(
    &self,
    goal: Goal,
    difficulty: Difficulty,
  ) -> impl Future<Output = Result<Vec<Workout>, Self::Error>> + Send + '_;

  // ── Ledger ────────────────────────────────────────────────────────────

  /// Atomically replace the user's future plan.
  ///
  /// In a single transaction that excludes every other writer: read the
  /// slots of the rows that are kept (completed, or scheduled on or before
  /// `today`), call `draw` with them, delete every incomplete assignment of
  /// the user scheduled after `today`, then insert the drawn sessions as
  /// incomplete assignments.
  ///
  /// If `draw` fails, the transaction is rolled back and its error is
  /// returned in the inner `Result`. The outer `Result` carries backend
  /// failures, which also leave the ledger untouched.
  fn replace_future_plan<F>(
    &self,
    user_id: Uuid,
    today: NaiveDate,
    draw: F,
  ) -> impl Future<Output = Result<crate::Result<PlanReplacement>, Self::Error>> + Send + '_
  where
    F: FnOnce(&KeptSlots) -> crate::Result<Vec<NewAssignment>> + Send + 'static;

  /// Mark the user's assignment of `workout_id` on `day` as done.
  ///
  /// Returns `false` if no such assignment exists. An assignment that is
  /// already done still counts as matched.
  fn mark_done(
    &self,
    user_id: Uuid,
    workout_id: Uuid,
    day: NaiveDate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Every assignment of the user joined with its template, ascending by
  /// scheduled date.
  fn list_assignments(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AssignmentView>, Self::Error>> + Send + '_;
}
