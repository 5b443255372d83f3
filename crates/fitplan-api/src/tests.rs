//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode},
};
use fitplan_core::{
  catalog::{Difficulty, Goal, NewExercise, NewWorkout},
  planner::Planner,
  store::PlanStore,
  user::{NewUser, User},
};
use fitplan_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::api_router;

async fn app() -> (Router, User) {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");

  let squat = store
    .add_exercise(NewExercise {
      title:       "Squat".into(),
      description: String::new(),
      sets:        4,
      reps:        8,
      rest:        120,
    })
    .await
    .unwrap();
  store
    .add_workout(NewWorkout {
      title:        "Leg day".into(),
      description:  "Lower body".into(),
      goal:         Goal(1),
      difficulty:   Difficulty(2),
      exercise_ids: vec![squat.exercise_id],
    })
    .await
    .unwrap();
  let user = store
    .add_user(NewUser::new("api@example.com", Goal(1), Difficulty(2)))
    .await
    .unwrap();

  (api_router(Planner::new(Arc::new(store))), user)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let request = match body {
    Some(b) => builder
      .header("content-type", "application/json")
      .body(Body::from(b.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
  };
  (status, value)
}

#[tokio::test]
async fn generate_then_read_schedule() {
  let (app, user) = app().await;
  let id = user.user_id;

  let (status, body) = send(
    &app,
    Method::POST,
    &format!("/users/{id}/plan"),
    Some(json!({ "months": 1, "frequency_per_week": 2 })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["status"], "plan_created");
  let workouts = body["workouts"].as_array().unwrap();
  assert_eq!(workouts.len(), 8);
  assert_eq!(workouts[0]["title"], "Leg day");
  assert_eq!(workouts[0]["exercises"][0]["rest"], 120);

  let (status, schedule) = send(&app, Method::GET, &format!("/users/{id}/workouts"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(schedule.as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn complete_and_read_stats() {
  let (app, user) = app().await;
  let id = user.user_id;

  let (_, body) = send(
    &app,
    Method::POST,
    &format!("/users/{id}/plan"),
    Some(json!({ "months": 1, "frequency_per_week": 1 })),
  )
  .await;
  let first = &body["workouts"][0];
  let date = format!("{}T19:30:00Z", first["scheduled_date"].as_str().unwrap());

  let (status, done) = send(
    &app,
    Method::PATCH,
    &format!("/users/{id}/workouts/complete"),
    Some(json!({ "workout_id": first["workout_id"], "date": date })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(done["status"], "success");

  let (status, stats) = send(&app, Method::GET, &format!("/users/{id}/stats"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(stats["total_workouts"], 1);
  assert_eq!(stats["total_assigned"], 4);
  assert_eq!(stats["completion_rate"], 25.0);
  assert_eq!(stats["total_exercises"], 1);
  assert_eq!(stats["favorite_workout"], "Leg day");
}

#[tokio::test]
async fn completing_an_unscheduled_day_is_not_found() {
  let (app, user) = app().await;
  let id = user.user_id;

  let (status, body) = send(
    &app,
    Method::PATCH,
    &format!("/users/{id}/workouts/complete"),
    Some(json!({ "workout_id": Uuid::new_v4(), "date": "2026-02-07" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("no assignment"));
}

#[tokio::test]
async fn malformed_date_is_a_bad_request() {
  let (app, user) = app().await;
  let (status, _) = send(
    &app,
    Method::PATCH,
    &format!("/users/{}/workouts/complete", user.user_id),
    Some(json!({ "workout_id": Uuid::new_v4(), "date": "yesterday" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_plan_request_is_a_bad_request() {
  let (app, user) = app().await;
  let (status, _) = send(
    &app,
    Method::POST,
    &format!("/users/{}/plan", user.user_id),
    Some(json!({ "months": 1, "frequency_per_week": 9 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn no_eligible_workouts_is_not_found() {
  let (app, user) = app().await;
  let id = user.user_id;

  let (status, _) = send(
    &app,
    Method::PATCH,
    &format!("/users/{id}/profile"),
    Some(json!({ "difficulty": 5 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send(
    &app,
    Method::POST,
    &format!("/users/{id}/plan"),
    Some(json!({ "months": 1, "frequency_per_week": 3 })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("no workouts match"));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
  let (app, _) = app().await;
  let missing = Uuid::new_v4();

  for uri in [
    format!("/users/{missing}/profile"),
    format!("/users/{missing}/workouts"),
    format!("/users/{missing}/stats"),
  ] {
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
  }
}

#[tokio::test]
async fn profile_update_applies_known_fields_and_rejects_others() {
  let (app, user) = app().await;
  let id = user.user_id;

  let (status, updated) = send(
    &app,
    Method::PATCH,
    &format!("/users/{id}/profile"),
    Some(json!({ "name": "Dana", "weight": 70.5 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["name"], "Dana");
  assert_eq!(updated["weight"], 70.5);
  assert_eq!(updated["goal"], 1);

  let (status, _) = send(
    &app,
    Method::PATCH,
    &format!("/users/{id}/profile"),
    Some(json!({ "email": "new@example.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

  let (_, profile) = send(&app, Method::GET, &format!("/users/{id}/profile"), None).await;
  assert_eq!(profile["email"], "api@example.com");
}
