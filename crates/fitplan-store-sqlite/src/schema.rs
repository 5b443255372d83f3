//! SQL schema for the fitplan SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL DEFAULT '',
    last_name   TEXT NOT NULL DEFAULT '',
    weight      REAL NOT NULL DEFAULT 0,
    height      REAL NOT NULL DEFAULT 0,
    goal        INTEGER NOT NULL,
    difficulty  INTEGER NOT NULL,
    created_at  TEXT NOT NULL      -- ISO 8601 UTC
);

-- Catalog tables are written only by seeding; the engine never mutates them.
CREATE TABLE IF NOT EXISTS exercises (
    exercise_id TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    sets        INTEGER NOT NULL,
    reps        INTEGER NOT NULL,
    rest        INTEGER NOT NULL DEFAULT 0   -- seconds
);

CREATE TABLE IF NOT EXISTS workouts (
    workout_id  TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    goal        INTEGER NOT NULL,
    difficulty  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS workout_exercises (
    workout_id  TEXT NOT NULL REFERENCES workouts(workout_id),
    exercise_id TEXT NOT NULL REFERENCES exercises(exercise_id),
    position    INTEGER NOT NULL,
    PRIMARY KEY (workout_id, exercise_id)
);

-- The assignment ledger. Rows are inserted and deleted only by plan
-- regeneration; the only UPDATE ever issued flips is_done from 0 to 1.
CREATE TABLE IF NOT EXISTS user_workouts (
    user_id        TEXT NOT NULL REFERENCES users(user_id),
    workout_id     TEXT NOT NULL REFERENCES workouts(workout_id),
    scheduled_date TEXT NOT NULL,              -- YYYY-MM-DD
    is_done        INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, workout_id, scheduled_date)
);

CREATE INDEX IF NOT EXISTS workouts_tags_idx      ON workouts(goal, difficulty);
CREATE INDEX IF NOT EXISTS user_workouts_date_idx ON user_workouts(user_id, scheduled_date);

PRAGMA user_version = 1;
";
