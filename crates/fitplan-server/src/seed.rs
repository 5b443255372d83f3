//! JSON seed import for the workout catalog and user accounts.
//!
//! The seeder is the only writer of the catalog. A seed file looks like:
//!
//! ```json
//! {
//!   "workouts": [
//!     { "title": "Leg day", "goal": 1, "difficulty": 2,
//!       "exercises": [ { "title": "Squat", "sets": 4, "reps": 8, "rest": 120 } ] }
//!   ],
//!   "users": [ { "email": "a@example.com", "goal": 1, "difficulty": 2 } ]
//! }
//! ```

use fitplan_core::{
  catalog::{Difficulty, Goal, NewExercise, NewWorkout},
  store::PlanStore,
  user::NewUser,
};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct SeedFile {
  #[serde(default)]
  pub workouts: Vec<SeedWorkout>,
  #[serde(default)]
  pub users:    Vec<NewUser>,
}

/// A workout template with its exercises inlined, in session order.
#[derive(Debug, Deserialize)]
pub struct SeedWorkout {
  pub title:       String,
  #[serde(default)]
  pub description: String,
  pub goal:        Goal,
  pub difficulty:  Difficulty,
  #[serde(default)]
  pub exercises:   Vec<NewExercise>,
}

/// Counts of what an import wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
  pub workouts:  usize,
  pub exercises: usize,
  pub users:     usize,
}

impl SeedFile {
  pub fn from_json(json: &str) -> serde_json::Result<Self> { serde_json::from_str(json) }
}

/// Write every workout, exercise and user in `seed` to `store`.
///
/// Stops at the first store error; rows written before it remain.
pub async fn import<S: PlanStore>(store: &S, seed: SeedFile) -> Result<SeedReport, S::Error> {
  let mut report = SeedReport::default();

  for workout in seed.workouts {
    let mut exercise_ids = Vec::with_capacity(workout.exercises.len());
    for exercise in workout.exercises {
      exercise_ids.push(store.add_exercise(exercise).await?.exercise_id);
      report.exercises += 1;
    }

    let created = store
      .add_workout(NewWorkout {
        title: workout.title,
        description: workout.description,
        goal: workout.goal,
        difficulty: workout.difficulty,
        exercise_ids,
      })
      .await?;
    debug!(workout_id = %created.workout_id, title = %created.title, "seeded workout");
    report.workouts += 1;
  }

  for user in seed.users {
    let created = store.add_user(user).await?;
    debug!(user_id = %created.user_id, email = %created.email, "seeded user");
    report.users += 1;
  }

  info!(
    workouts = report.workouts,
    exercises = report.exercises,
    users = report.users,
    "seed import complete"
  );
  Ok(report)
}

#[cfg(test)]
mod tests {
  use fitplan_store_sqlite::SqliteStore;

  use super::*;

  const SEED: &str = r#"{
    "workouts": [
      {
        "title": "Leg day",
        "description": "Lower body",
        "goal": 1,
        "difficulty": 2,
        "exercises": [
          { "title": "Squat", "sets": 4, "reps": 8, "rest": 120 },
          { "title": "Lunge", "description": "Walking", "sets": 3, "reps": 12 }
        ]
      },
      { "title": "Mobility", "goal": 2, "difficulty": 1 }
    ],
    "users": [
      { "email": "a@example.com", "name": "Ada", "weight": 61.5, "goal": 1, "difficulty": 2 },
      { "email": "b@example.com" }
    ]
  }"#;

  #[test]
  fn parses_optional_fields_with_defaults() {
    let seed = SeedFile::from_json(SEED).unwrap();
    assert_eq!(seed.workouts.len(), 2);
    assert_eq!(seed.workouts[0].exercises[1].rest, 0);
    assert_eq!(seed.workouts[0].exercises[1].description, "Walking");
    assert!(seed.workouts[1].exercises.is_empty());
    assert_eq!(seed.workouts[1].description, "");

    assert_eq!(seed.users[0].weight, 61.5);
    assert_eq!(seed.users[1].goal, Goal(0));
    assert_eq!(seed.users[1].name, "");
  }

  #[test]
  fn empty_object_is_an_empty_seed() {
    let seed = SeedFile::from_json("{}").unwrap();
    assert!(seed.workouts.is_empty());
    assert!(seed.users.is_empty());
  }

  #[test]
  fn workout_without_tags_is_rejected() {
    assert!(SeedFile::from_json(r#"{ "workouts": [ { "title": "x" } ] }"#).is_err());
  }

  #[tokio::test]
  async fn import_writes_catalog_in_order() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let report = import(&store, SeedFile::from_json(SEED).unwrap())
      .await
      .unwrap();
    assert_eq!(report, SeedReport { workouts: 2, exercises: 2, users: 2 });

    let legs = store.eligible_workouts(Goal(1), Difficulty(2)).await.unwrap();
    assert_eq!(legs.len(), 1);
    let titles: Vec<_> = legs[0].exercises.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Squat", "Lunge"]);

    let mobility = store.eligible_workouts(Goal(2), Difficulty(1)).await.unwrap();
    assert_eq!(mobility.len(), 1);
    assert!(mobility[0].exercises.is_empty());
  }

  #[tokio::test]
  async fn duplicate_user_email_fails_the_import() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let seed = SeedFile::from_json(
      r#"{ "users": [ { "email": "a@example.com" }, { "email": "a@example.com" } ] }"#,
    )
    .unwrap();
    assert!(import(&store, seed).await.is_err());
  }
}
