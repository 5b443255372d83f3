//! Catalog types: the immutable workout templates and their exercises.
//!
//! The engine only ever reads the catalog. Templates are matched to users by
//! exact equality on both the [`Goal`] and the [`Difficulty`] tag.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Tags ────────────────────────────────────────────────────────────────────

/// What a user is training for (weight loss, strength, ...). The catalog and
/// the account subsystem agree on the numbering; the engine treats it as an
/// opaque categorical tag.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Goal(pub u8);

/// How hard a template is, or how hard a user wants their plan to be.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Difficulty(pub u8);

impl fmt::Display for Goal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Exercise ────────────────────────────────────────────────────────────────

/// A single exercise of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub exercise_id: Uuid,
  pub title:       String,
  pub description: String,
  pub sets:        u32,
  pub reps:        u32,
  /// Rest between sets, in seconds.
  pub rest:        u32,
}

/// Input to [`crate::store::PlanStore::add_exercise`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewExercise {
  pub title:       String,
  #[serde(default)]
  pub description: String,
  pub sets:        u32,
  pub reps:        u32,
  #[serde(default)]
  pub rest:        u32,
}

// ─── Workout ─────────────────────────────────────────────────────────────────

/// A workout template: a tagged, ordered list of exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
  pub workout_id:  Uuid,
  pub title:       String,
  pub description: String,
  pub goal:        Goal,
  pub difficulty:  Difficulty,
  pub exercises:   Vec<Exercise>,
}

impl Workout {
  /// Whether this template is eligible for a user with these tags.
  pub fn matches(&self, goal: Goal, difficulty: Difficulty) -> bool {
    self.goal == goal && self.difficulty == difficulty
  }
}

/// Input to [`crate::store::PlanStore::add_workout`]. Exercises are referenced
/// by id and keep the order given here.
#[derive(Debug, Clone)]
pub struct NewWorkout {
  pub title:        String,
  pub description:  String,
  pub goal:         Goal,
  pub difficulty:   Difficulty,
  pub exercise_ids: Vec<Uuid>,
}
