//! Plan drawing: the scheduling algorithm behind plan regeneration.
//!
//! A plan of `frequency_per_week * 4 * months` sessions is laid out from the
//! first day onward. Session `i` lands `floor(i * 7 / frequency_per_week)` days
//! after the first day, so the shape of a plan depends only on the request.
//! Which template fills each session is drawn uniformly at random, with
//! replacement, from the shuffled set of eligible templates.

use std::{
  collections::HashSet,
  sync::{LazyLock, Mutex, PoisonError},
};

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, catalog::Workout};

/// A month is modelled as exactly four weeks.
pub const WEEKS_PER_MONTH: u32 = 4;

/// Longest plan that may be requested in one go.
///
/// The session layout itself works for any positive month count. This bound
/// only keeps a single request from allocating and inserting an unbounded
/// number of rows, and keeps `total_sessions` far from `u32` overflow.
pub const MAX_MONTHS: u32 = 24;

/// More than one session a day would put two sessions on the same day offset.
pub const MAX_FREQUENCY_PER_WEEK: u32 = 7;

// ─── Request ─────────────────────────────────────────────────────────────────

/// How long and how dense a regenerated plan should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
  pub months:             u32,
  pub frequency_per_week: u32,
}

impl PlanRequest {
  pub fn validate(&self) -> Result<()> {
    if !(1..=MAX_MONTHS).contains(&self.months) {
      return Err(Error::InvalidPlanRequest(format!(
        "months must be between 1 and {MAX_MONTHS}, got {}",
        self.months
      )));
    }
    if !(1..=MAX_FREQUENCY_PER_WEEK).contains(&self.frequency_per_week) {
      return Err(Error::InvalidPlanRequest(format!(
        "frequency_per_week must be between 1 and {MAX_FREQUENCY_PER_WEEK}, got {}",
        self.frequency_per_week
      )));
    }
    Ok(())
  }

  pub fn total_sessions(&self) -> u32 {
    self.frequency_per_week * WEEKS_PER_MONTH * self.months
  }

  /// Day offset of session `index` from the first day of the plan.
  ///
  /// Equal to `floor(index * (7 / frequency_per_week))`, computed in integers
  /// so that no rounding error creeps in for large indices.
  pub fn session_offset(&self, index: u32) -> u64 {
    u64::from(index) * 7 / u64::from(self.frequency_per_week)
  }
}

// ─── Drawing ─────────────────────────────────────────────────────────────────

/// One drawn session of a plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedSession<'a> {
  pub workout:        &'a Workout,
  pub scheduled_date: NaiveDate,
}

/// Draw a plan starting on `first_day`.
///
/// `taken` holds `(workout_id, day)` pairs of ledger rows that survive the
/// regeneration; a draw never lands on one of them. Fails with
/// [`Error::ScheduleConflict`] if every eligible template is taken on some day
/// of the plan.
pub fn draw_plan<'a, R>(
  eligible: &'a [Workout],
  request: PlanRequest,
  first_day: NaiveDate,
  taken: &HashSet<(Uuid, NaiveDate)>,
  rng: &mut R,
) -> Result<Vec<PlannedSession<'a>>>
where
  R: Rng + ?Sized,
{
  request.validate()?;

  let mut pool: Vec<&Workout> = eligible.iter().collect();
  pool.shuffle(rng);

  let mut sessions = Vec::with_capacity(request.total_sessions() as usize);
  for index in 0..request.total_sessions() {
    let scheduled_date = first_day
      .checked_add_days(Days::new(request.session_offset(index)))
      .ok_or_else(|| {
        Error::InvalidPlanRequest(format!("plan runs past the calendar from {first_day}"))
      })?;

    let candidates: Vec<&Workout> = pool
      .iter()
      .copied()
      .filter(|w| !taken.contains(&(w.workout_id, scheduled_date)))
      .collect();

    let workout = candidates
      .choose(rng)
      .copied()
      .ok_or(Error::ScheduleConflict(scheduled_date))?;

    sessions.push(PlannedSession { workout, scheduled_date });
  }

  Ok(sessions)
}

// ─── Randomness ──────────────────────────────────────────────────────────────

static PLAN_RNG: LazyLock<Mutex<StdRng>> =
  LazyLock::new(|| Mutex::new(StdRng::from_entropy()));

/// Run `f` with the process-wide plan generator.
///
/// The generator is seeded from the OS once, on first use, and shared by every
/// regeneration afterwards. Do not hold on to it across an `.await`.
pub fn with_plan_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
  let mut rng = PLAN_RNG.lock().unwrap_or_else(PoisonError::into_inner);
  f(&mut rng)
}

// ─── Calendar days ───────────────────────────────────────────────────────────

/// Parse the calendar day out of a client-supplied date, discarding any
/// time-of-day component.
///
/// Accepts `2026-02-07`, RFC 3339 timestamps (the day is taken in the offset
/// the timestamp was written in) and `2026-02-07 18:30:00` / `2026-02-07T18:30:00`.
pub fn calendar_day(input: &str) -> Result<NaiveDate> {
  let s = input.trim();

  if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return Ok(day);
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.date_naive());
  }
  for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
      return Ok(dt.date());
    }
  }

  Err(Error::InvalidDate(input.to_owned()))
}
