//! User profile as seen by the engine.
//!
//! Accounts are owned by an external subsystem. The engine reads the goal and
//! difficulty tags and offers a narrow, explicit profile update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Difficulty, Goal};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub email:      String,
  pub name:       String,
  pub last_name:  String,
  /// Kilograms.
  pub weight:     f32,
  /// Centimetres.
  pub height:     f32,
  pub goal:       Goal,
  pub difficulty: Difficulty,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::PlanStore::add_user`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub email:      String,
  #[serde(default)]
  pub name:       String,
  #[serde(default)]
  pub last_name:  String,
  #[serde(default)]
  pub weight:     f32,
  #[serde(default)]
  pub height:     f32,
  #[serde(default)]
  pub goal:       Goal,
  #[serde(default)]
  pub difficulty: Difficulty,
}

impl NewUser {
  /// Convenience constructor with an empty profile apart from the tags.
  pub fn new(email: impl Into<String>, goal: Goal, difficulty: Difficulty) -> Self {
    Self {
      email: email.into(),
      name: String::new(),
      last_name: String::new(),
      weight: 0.0,
      height: 0.0,
      goal,
      difficulty,
    }
  }
}

/// The fields a user may change on their own profile. Absent fields keep their
/// current value; any other key is rejected when deserialising.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
  pub name:       Option<String>,
  pub last_name:  Option<String>,
  pub weight:     Option<f32>,
  pub height:     Option<f32>,
  pub goal:       Option<Goal>,
  pub difficulty: Option<Difficulty>,
}

impl ProfileUpdate {
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}
