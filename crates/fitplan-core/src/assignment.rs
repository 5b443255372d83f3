//! Assignment ledger types.
//!
//! An assignment says "this user performs this template on this calendar day".
//! Its identity is the `(user, workout, day)` triple; the only mutable bit is
//! the completion flag, which moves from `false` to `true` and never back.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Difficulty, Exercise, Goal, Workout};

/// A ledger row to be written by a plan regeneration. New rows always start
/// out incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAssignment {
  pub workout_id:     Uuid,
  pub scheduled_date: NaiveDate,
}

/// `(workout_id, day)` pairs held by the rows a regeneration keeps: completed
/// assignments and anything scheduled up to today.
pub type KeptSlots = HashSet<(Uuid, NaiveDate)>;

/// Outcome of replacing a user's future plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReplacement {
  /// Incomplete future rows that were deleted.
  pub removed:  usize,
  /// Rows that were inserted, in draw order.
  pub inserted: Vec<NewAssignment>,
}

/// A ledger row joined with its template, the read model returned by the
/// schedule reader and by plan generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentView {
  pub workout_id:     Uuid,
  pub title:          String,
  pub description:    String,
  pub goal:           Goal,
  pub difficulty:     Difficulty,
  pub scheduled_date: NaiveDate,
  pub is_done:        bool,
  pub exercises:      Vec<Exercise>,
}

impl AssignmentView {
  /// A fresh, incomplete assignment of `workout` on `scheduled_date`.
  pub fn planned(workout: &Workout, scheduled_date: NaiveDate) -> Self {
    Self {
      workout_id: workout.workout_id,
      title: workout.title.clone(),
      description: workout.description.clone(),
      goal: workout.goal,
      difficulty: workout.difficulty,
      scheduled_date,
      is_done: false,
      exercises: workout.exercises.clone(),
    }
  }
}
