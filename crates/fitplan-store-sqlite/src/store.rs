//! [`SqliteStore`]: the SQLite implementation of [`PlanStore`].

use std::{collections::HashMap, path::Path};

use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use tracing::debug;
use uuid::Uuid;

use fitplan_core::{
  assignment::{AssignmentView, KeptSlots, NewAssignment, PlanReplacement},
  catalog::{Difficulty, Exercise, Goal, NewExercise, NewWorkout, Workout},
  store::PlanStore,
  user::{NewUser, ProfileUpdate, User},
};

use crate::{
  Result,
  encode::{
    RawAssignment, RawExercise, RawUser, RawWorkout, decode_day, decode_uuid, encode_day,
    encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row readers ─────────────────────────────────────────────────────────────

const USER_COLUMNS: &str =
  "user_id, email, name, last_name, weight, height, goal, difficulty, created_at";

fn read_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:    row.get(0)?,
    email:      row.get(1)?,
    name:       row.get(2)?,
    last_name:  row.get(3)?,
    weight:     row.get(4)?,
    height:     row.get(5)?,
    goal:       row.get(6)?,
    difficulty: row.get(7)?,
    created_at: row.get(8)?,
  })
}

fn select_user(
  conn: &rusqlite::Connection,
  user_id: &str,
) -> rusqlite::Result<Option<RawUser>> {
  conn
    .query_row(
      &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
      rusqlite::params![user_id],
      read_user,
    )
    .optional()
}

/// The exercises of one template, in template order.
fn select_exercises(
  conn: &rusqlite::Connection,
  workout_id: &str,
) -> rusqlite::Result<Vec<RawExercise>> {
  let mut stmt = conn.prepare(
    "SELECT e.exercise_id, e.title, e.description, e.sets, e.reps, e.rest
     FROM exercises e
     JOIN workout_exercises we ON we.exercise_id = e.exercise_id
     WHERE we.workout_id = ?1
     ORDER BY we.position",
  )?;
  let rows = stmt
    .query_map(rusqlite::params![workout_id], |row| {
      Ok(RawExercise {
        exercise_id: row.get(0)?,
        title:       row.get(1)?,
        description: row.get(2)?,
        sets:        row.get(3)?,
        reps:        row.get(4)?,
        rest:        row.get(5)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Slots of the rows a regeneration as of `today` keeps.
fn select_kept_slots(
  conn:    &rusqlite::Connection,
  user_id: &str,
  today:   &str,
) -> tokio_rusqlite::Result<KeptSlots> {
  let mut stmt = conn.prepare(
    "SELECT workout_id, scheduled_date FROM user_workouts
     WHERE user_id = ?1 AND (is_done = 1 OR scheduled_date <= ?2)",
  )?;
  let rows = stmt
    .query_map(rusqlite::params![user_id, today], |row| {
      Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  rows
    .iter()
    .map(|(workout_id, day)| Ok((decode_uuid(workout_id)?, decode_day(day)?)))
    .collect::<Result<KeptSlots>>()
    .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A fitplan store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    debug!("schema initialised");
    Ok(())
  }
}

// ─── PlanStore impl ──────────────────────────────────────────────────────────

impl PlanStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      email:      input.email,
      name:       input.name,
      last_name:  input.last_name,
      weight:     input.weight,
      height:     input.height,
      goal:       input.goal,
      difficulty: input.difficulty,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(user.user_id);
    let email      = user.email.clone();
    let name       = user.name.clone();
    let last_name  = user.last_name.clone();
    let weight     = f64::from(user.weight);
    let height     = f64::from(user.height);
    let goal       = i64::from(user.goal.0);
    let difficulty = i64::from(user.difficulty.0);
    let at_str     = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             user_id, email, name, last_name, weight, height,
             goal, difficulty, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str, email, name, last_name, weight, height, goal, difficulty, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| Ok(select_user(conn, &id_str)?))
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> Result<Option<User>> {
    let id_str     = encode_uuid(user_id);
    let weight     = update.weight.map(f64::from);
    let height     = update.height.map(f64::from);
    let goal       = update.goal.map(|g| i64::from(g.0));
    let difficulty = update.difficulty.map(|d| i64::from(d.0));
    let ProfileUpdate { name, last_name, .. } = update;

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users SET
             name       = COALESCE(?2, name),
             last_name  = COALESCE(?3, last_name),
             weight     = COALESCE(?4, weight),
             height     = COALESCE(?5, height),
             goal       = COALESCE(?6, goal),
             difficulty = COALESCE(?7, difficulty)
           WHERE user_id = ?1",
          rusqlite::params![id_str, name, last_name, weight, height, goal, difficulty],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_user(conn, &id_str)?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Catalog ───────────────────────────────────────────────────────────────

  async fn add_exercise(&self, input: NewExercise) -> Result<Exercise> {
    let exercise = Exercise {
      exercise_id: Uuid::new_v4(),
      title:       input.title,
      description: input.description,
      sets:        input.sets,
      reps:        input.reps,
      rest:        input.rest,
    };

    let id_str      = encode_uuid(exercise.exercise_id);
    let title       = exercise.title.clone();
    let description = exercise.description.clone();
    let sets        = i64::from(exercise.sets);
    let reps        = i64::from(exercise.reps);
    let rest        = i64::from(exercise.rest);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO exercises (exercise_id, title, description, sets, reps, rest)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, title, description, sets, reps, rest],
        )?;
        Ok(())
      })
      .await?;

    Ok(exercise)
  }

  async fn add_workout(&self, input: NewWorkout) -> Result<Workout> {
    let workout_id   = Uuid::new_v4();
    let id_str       = encode_uuid(workout_id);
    let exercise_ids: Vec<String> =
      input.exercise_ids.iter().copied().map(encode_uuid).collect();
    let title        = input.title;
    let description  = input.description;
    let goal         = i64::from(input.goal.0);
    let difficulty   = i64::from(input.difficulty.0);

    let raw: RawWorkout = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO workouts (workout_id, title, description, goal, difficulty)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, title, description, goal, difficulty],
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO workout_exercises (workout_id, exercise_id, position)
             VALUES (?1, ?2, ?3)",
          )?;
          for (position, exercise_id) in exercise_ids.iter().enumerate() {
            stmt.execute(rusqlite::params![id_str, exercise_id, position as i64])?;
          }
        }
        let exercises = select_exercises(&tx, &id_str)?;
        tx.commit()?;

        Ok(RawWorkout { workout_id: id_str, title, description, goal, difficulty, exercises })
      })
      .await?;

    raw.into_workout()
  }

  async fn eligible_workouts(&self, goal: Goal, difficulty: Difficulty) -> Result<Vec<Workout>> {
    let goal       = i64::from(goal.0);
    let difficulty = i64::from(difficulty.0);

    let raws: Vec<RawWorkout> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT workout_id, title, description, goal, difficulty
           FROM workouts
           WHERE goal = ?1 AND difficulty = ?2
           ORDER BY title",
        )?;
        let mut rows = stmt
          .query_map(rusqlite::params![goal, difficulty], |row| {
            Ok(RawWorkout {
              workout_id:  row.get(0)?,
              title:       row.get(1)?,
              description: row.get(2)?,
              goal:        row.get(3)?,
              difficulty:  row.get(4)?,
              exercises:   Vec::new(),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        for raw in &mut rows {
          raw.exercises = select_exercises(conn, &raw.workout_id)?;
        }
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWorkout::into_workout).collect()
  }

  // ── Ledger ────────────────────────────────────────────────────────────────

  async fn replace_future_plan<F>(
    &self,
    user_id: Uuid,
    today:   NaiveDate,
    draw:    F,
  ) -> Result<fitplan_core::Result<PlanReplacement>>
  where
    F: FnOnce(&KeptSlots) -> fitplan_core::Result<Vec<NewAssignment>> + Send + 'static,
  {
    let user_id_str = encode_uuid(user_id);
    let today_str   = encode_day(today);

    let outcome = self
      .conn
      .call(move |conn| {
        // IMMEDIATE takes the write lock up front, so no other writer can
        // interleave between reading the kept rows and the inserts.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let kept = select_kept_slots(&tx, &user_id_str, &today_str)?;
        let sessions = match draw(&kept) {
          Ok(sessions) => sessions,
          // Dropping `tx` rolls back.
          Err(e) => return Ok(Err(e)),
        };

        let removed = tx.execute(
          "DELETE FROM user_workouts
           WHERE user_id = ?1 AND is_done = 0 AND scheduled_date > ?2",
          rusqlite::params![user_id_str, today_str],
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO user_workouts (user_id, workout_id, scheduled_date, is_done)
             VALUES (?1, ?2, ?3, 0)",
          )?;
          for s in &sessions {
            stmt.execute(rusqlite::params![
              user_id_str,
              encode_uuid(s.workout_id),
              encode_day(s.scheduled_date),
            ])?;
          }
        }

        tx.commit()?;
        Ok(Ok(PlanReplacement { removed, inserted: sessions }))
      })
      .await?;

    if let Ok(replaced) = &outcome {
      debug!(
        %user_id,
        removed = replaced.removed,
        inserted = replaced.inserted.len(),
        "future plan replaced"
      );
    }
    Ok(outcome)
  }

  async fn mark_done(&self, user_id: Uuid, workout_id: Uuid, day: NaiveDate) -> Result<bool> {
    let user_id_str    = encode_uuid(user_id);
    let workout_id_str = encode_uuid(workout_id);
    let day_str        = encode_day(day);

    // SQLite counts rows matched by the WHERE clause, so re-marking a done
    // assignment still reports one row.
    let matched = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE user_workouts SET is_done = 1
           WHERE user_id = ?1 AND workout_id = ?2 AND scheduled_date = ?3",
          rusqlite::params![user_id_str, workout_id_str, day_str],
        )?)
      })
      .await?;

    Ok(matched > 0)
  }

  async fn list_assignments(&self, user_id: Uuid) -> Result<Vec<AssignmentView>> {
    let user_id_str = encode_uuid(user_id);

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT uw.workout_id, w.title, w.description, w.goal, w.difficulty,
                  uw.scheduled_date, uw.is_done
           FROM user_workouts uw
           JOIN workouts w ON w.workout_id = uw.workout_id
           WHERE uw.user_id = ?1
           ORDER BY uw.scheduled_date ASC, w.title ASC",
        )?;
        let mut rows = stmt
          .query_map(rusqlite::params![user_id_str], |row| {
            Ok(RawAssignment {
              workout_id:     row.get(0)?,
              title:          row.get(1)?,
              description:    row.get(2)?,
              goal:           row.get(3)?,
              difficulty:     row.get(4)?,
              scheduled_date: row.get(5)?,
              is_done:        row.get(6)?,
              exercises:      Vec::new(),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        // Most rows share a handful of templates; load each exercise list once.
        let mut by_workout: HashMap<String, Vec<RawExercise>> = HashMap::new();
        for raw in &mut rows {
          if !by_workout.contains_key(&raw.workout_id) {
            let exercises = select_exercises(conn, &raw.workout_id)?;
            by_workout.insert(raw.workout_id.clone(), exercises);
          }
          raw.exercises = by_workout[&raw.workout_id].clone();
        }
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_view).collect()
  }
}
