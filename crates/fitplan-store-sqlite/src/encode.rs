//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and scheduled days as
//! `YYYY-MM-DD`, so that text order equals chronological order. UUIDs are
//! stored as hyphenated lowercase strings. Tags and counts are integers.

use chrono::{DateTime, NaiveDate, Utc};
use fitplan_core::{
  assignment::AssignmentView,
  catalog::{Difficulty, Exercise, Goal, Workout},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DAY_FORMAT: &str = "%Y-%m-%d";

pub fn encode_day(day: NaiveDate) -> String { day.format(DAY_FORMAT).to_string() }

pub fn decode_day(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DAY_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Integers ────────────────────────────────────────────────────────────────

fn decode_tag(column: &str, v: i64) -> Result<u8> {
  u8::try_from(v).map_err(|_| Error::Decode(format!("{column} out of range: {v}")))
}

fn decode_count(column: &str, v: i64) -> Result<u32> {
  u32::try_from(v).map_err(|_| Error::Decode(format!("{column} out of range: {v}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub email:      String,
  pub name:       String,
  pub last_name:  String,
  pub weight:     f64,
  pub height:     f64,
  pub goal:       i64,
  pub difficulty: i64,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      email:      self.email,
      name:       self.name,
      last_name:  self.last_name,
      weight:     self.weight as f32,
      height:     self.height as f32,
      goal:       Goal(decode_tag("goal", self.goal)?),
      difficulty: Difficulty(decode_tag("difficulty", self.difficulty)?),
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `exercises` row.
#[derive(Clone)]
pub struct RawExercise {
  pub exercise_id: String,
  pub title:       String,
  pub description: String,
  pub sets:        i64,
  pub reps:        i64,
  pub rest:        i64,
}

impl RawExercise {
  pub fn into_exercise(self) -> Result<Exercise> {
    Ok(Exercise {
      exercise_id: decode_uuid(&self.exercise_id)?,
      title:       self.title,
      description: self.description,
      sets:        decode_count("sets", self.sets)?,
      reps:        decode_count("reps", self.reps)?,
      rest:        decode_count("rest", self.rest)?,
    })
  }
}

fn decode_exercises(raws: Vec<RawExercise>) -> Result<Vec<Exercise>> {
  raws.into_iter().map(RawExercise::into_exercise).collect()
}

/// Raw values of a `workouts` row plus its ordered exercises.
pub struct RawWorkout {
  pub workout_id:  String,
  pub title:       String,
  pub description: String,
  pub goal:        i64,
  pub difficulty:  i64,
  pub exercises:   Vec<RawExercise>,
}

impl RawWorkout {
  pub fn into_workout(self) -> Result<Workout> {
    Ok(Workout {
      workout_id:  decode_uuid(&self.workout_id)?,
      title:       self.title,
      description: self.description,
      goal:        Goal(decode_tag("goal", self.goal)?),
      difficulty:  Difficulty(decode_tag("difficulty", self.difficulty)?),
      exercises:   decode_exercises(self.exercises)?,
    })
  }
}

/// Raw values of a `user_workouts` row joined with its template.
pub struct RawAssignment {
  pub workout_id:     String,
  pub title:          String,
  pub description:    String,
  pub goal:           i64,
  pub difficulty:     i64,
  pub scheduled_date: String,
  pub is_done:        bool,
  pub exercises:      Vec<RawExercise>,
}

impl RawAssignment {
  pub fn into_view(self) -> Result<AssignmentView> {
    Ok(AssignmentView {
      workout_id:     decode_uuid(&self.workout_id)?,
      title:          self.title,
      description:    self.description,
      goal:           Goal(decode_tag("goal", self.goal)?),
      difficulty:     Difficulty(decode_tag("difficulty", self.difficulty)?),
      scheduled_date: decode_day(&self.scheduled_date)?,
      is_done:        self.is_done,
      exercises:      decode_exercises(self.exercises)?,
    })
  }
}
