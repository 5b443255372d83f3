//! Error types for `fitplan-core`.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{Difficulty, Goal};

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("no workouts match goal {goal} and difficulty {difficulty}")]
  NoEligibleWorkouts { goal: Goal, difficulty: Difficulty },

  #[error("no assignment of workout {workout_id} on {day} for user {user_id}")]
  AssignmentNotFound {
    user_id:    Uuid,
    workout_id: Uuid,
    day:        NaiveDate,
  },

  #[error("invalid plan request: {0}")]
  InvalidPlanRequest(String),

  #[error("invalid date: {0:?}")]
  InvalidDate(String),

  /// Every eligible template is already held by a surviving assignment on
  /// this day.
  #[error("every eligible workout is already scheduled on {0}")]
  ScheduleConflict(NaiveDate),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
