//! Adherence statistics derived from a user's assignment history.

use std::{
  cmp::Reverse,
  collections::{BTreeMap, HashMap},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assignment::AssignmentView;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsView {
  /// Completed assignments.
  pub total_workouts:   u32,
  /// All assignments, whatever their status or date.
  pub total_assigned:   u32,
  /// Percentage of assignments completed, to one decimal place.
  pub completion_rate:  f64,
  /// Exercises performed, counting each exercise of a template once per
  /// completed assignment.
  pub total_exercises:  u32,
  pub current_streak:   u32,
  /// Title of the most often completed template.
  pub favorite_workout: Option<String>,
}

impl StatsView {
  pub fn from_schedule(schedule: &[AssignmentView]) -> Self {
    let done: Vec<&AssignmentView> = schedule.iter().filter(|a| a.is_done).collect();
    let total_exercises = done.iter().map(|a| a.exercises.len() as u32).sum();

    Self {
      total_workouts: done.len() as u32,
      total_assigned: schedule.len() as u32,
      completion_rate: completion_rate(done.len() as u64, schedule.len() as u64),
      total_exercises,
      current_streak: current_streak(schedule),
      favorite_workout: favorite_workout(&done),
    }
  }
}

/// `done / assigned` as a percentage rounded half-up to one decimal, or `0.0`
/// when nothing is assigned. Rounded in integer tenths so that halves are
/// never lost to binary floating point.
pub fn completion_rate(done: u64, assigned: u64) -> f64 {
  if assigned == 0 {
    return 0.0;
  }
  let tenths = (2 * done * 1000 + assigned) / (2 * assigned);
  tenths as f64 / 10.0
}

/// Number of consecutive scheduled days, counted backward from the latest day
/// with a completed assignment, on which every assignment was completed. Days
/// without any assignment are rest days and do not break the streak.
pub fn current_streak(schedule: &[AssignmentView]) -> u32 {
  let Some(latest) = schedule
    .iter()
    .filter(|a| a.is_done)
    .map(|a| a.scheduled_date)
    .max()
  else {
    return 0;
  };

  let mut days: BTreeMap<NaiveDate, bool> = BTreeMap::new();
  for a in schedule {
    *days.entry(a.scheduled_date).or_insert(true) &= a.is_done;
  }

  days
    .range(..=latest)
    .rev()
    .take_while(|(_, all_done)| **all_done)
    .count() as u32
}

/// The template completed most often. Ties go to the one completed on the
/// latest day, then to the alphabetically first title.
fn favorite_workout(done: &[&AssignmentView]) -> Option<String> {
  let mut tally: HashMap<Uuid, (u32, NaiveDate, &str)> = HashMap::new();
  for a in done {
    let entry = tally
      .entry(a.workout_id)
      .or_insert((0, a.scheduled_date, a.title.as_str()));
    entry.0 += 1;
    entry.1 = entry.1.max(a.scheduled_date);
  }

  tally
    .into_values()
    .max_by_key(|&(count, latest, title)| (count, latest, Reverse(title)))
    .map(|(_, _, title)| title.to_owned())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{Difficulty, Exercise, Goal};

  fn exercise(title: &str) -> Exercise {
    Exercise {
      exercise_id: Uuid::new_v4(),
      title:       title.into(),
      description: String::new(),
      sets:        3,
      reps:        10,
      rest:        60,
    }
  }

  fn row(workout_id: Uuid, title: &str, date: &str, is_done: bool, n_ex: usize) -> AssignmentView {
    AssignmentView {
      workout_id,
      title: title.into(),
      description: String::new(),
      goal: Goal(1),
      difficulty: Difficulty(2),
      scheduled_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
      is_done,
      exercises: (0..n_ex).map(|i| exercise(&format!("ex{i}"))).collect(),
    }
  }

  #[test]
  fn completion_rate_rounds_to_one_decimal() {
    assert_eq!(completion_rate(1, 3), 33.3);
    assert_eq!(completion_rate(2, 3), 66.7);
    assert_eq!(completion_rate(1, 8), 12.5);
    assert_eq!(completion_rate(1, 16), 6.3);
    assert_eq!(completion_rate(4, 4), 100.0);
    assert_eq!(completion_rate(0, 5), 0.0);
  }

  #[test]
  fn completion_rate_of_empty_history_is_zero() {
    assert_eq!(completion_rate(0, 0), 0.0);
  }

  #[test]
  fn empty_schedule_gives_zeroed_stats() {
    let stats = StatsView::from_schedule(&[]);
    assert_eq!(stats.total_workouts, 0);
    assert_eq!(stats.total_assigned, 0);
    assert_eq!(stats.completion_rate, 0.0);
    assert_eq!(stats.total_exercises, 0);
    assert_eq!(stats.current_streak, 0);
    assert!(stats.favorite_workout.is_none());

    let json = serde_json::to_value(&stats).unwrap();
    assert!(json["favorite_workout"].is_null());
  }

  #[test]
  fn exercises_are_counted_once_per_completed_assignment() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let schedule = vec![
      row(a, "A", "2026-01-01", true, 3),
      row(b, "B", "2026-01-04", true, 2),
      row(a, "A", "2026-01-08", true, 3),
      row(b, "B", "2026-01-11", false, 2),
    ];

    let stats = StatsView::from_schedule(&schedule);
    assert_eq!(stats.total_workouts, 3);
    assert_eq!(stats.total_assigned, 4);
    assert_eq!(stats.total_exercises, 8);
    assert_eq!(stats.completion_rate, 75.0);
    assert_eq!(stats.favorite_workout.as_deref(), Some("A"));
  }

  #[test]
  fn favorite_tie_goes_to_latest_completion() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let schedule = vec![
      row(a, "A", "2026-01-01", true, 1),
      row(b, "B", "2026-01-02", true, 1),
    ];
    let done: Vec<&AssignmentView> = schedule.iter().collect();
    assert_eq!(favorite_workout(&done).as_deref(), Some("B"));

    let same_day = vec![
      row(a, "Zumba", "2026-01-05", true, 1),
      row(b, "Abs", "2026-01-05", true, 1),
    ];
    let done: Vec<&AssignmentView> = same_day.iter().collect();
    assert_eq!(favorite_workout(&done).as_deref(), Some("Abs"));
  }

  #[test]
  fn streak_skips_rest_days_and_stops_at_a_miss() {
    let w = Uuid::new_v4();
    let schedule = vec![
      row(w, "W", "2026-01-01", true, 1),
      row(w, "W", "2026-01-03", false, 1),
      row(w, "W", "2026-01-06", true, 1),
      row(w, "W", "2026-01-10", true, 1),
      row(w, "W", "2026-01-13", true, 1),
      row(w, "W", "2026-01-17", false, 1),
    ];
    assert_eq!(current_streak(&schedule), 3);
  }

  #[test]
  fn streak_needs_every_assignment_of_a_day() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let schedule = vec![
      row(a, "A", "2026-01-01", true, 1),
      row(a, "A", "2026-01-02", true, 1),
      row(b, "B", "2026-01-02", false, 1),
      row(a, "A", "2026-01-03", true, 1),
    ];
    assert_eq!(current_streak(&schedule), 1);
  }

  #[test]
  fn streak_is_zero_without_completions() {
    let w = Uuid::new_v4();
    let schedule = vec![row(w, "W", "2026-01-01", false, 1)];
    assert_eq!(current_streak(&schedule), 0);
  }
}
