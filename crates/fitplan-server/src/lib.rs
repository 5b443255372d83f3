//! Server assembly for fitplan: configuration, the HTTP application and the
//! catalog seeder. The binary in `main.rs` wires these together.

pub mod seed;

use std::path::{Path, PathBuf};

use axum::Router;
use fitplan_core::{planner::Planner, store::PlanStore};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FITPLAN_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

/// Load [`ServerConfig`] from an optional TOML file at `path`, overridden by
/// `FITPLAN_*` environment variables.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  build_config(config::File::from(path).required(false))
}

fn build_config<F>(file: F) -> Result<ServerConfig, config::ConfigError>
where
  F: config::Source + Send + Sync + 'static,
{
  config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080_i64)?
    .set_default("store_path", "fitplan.db")?
    .add_source(file)
    .add_source(config::Environment::with_prefix("FITPLAN"))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ──────────────────────────────────────────────────────────────

/// The full HTTP application: the JSON API under `/api`, with request tracing
/// and CORS open to any origin.
pub fn app<S>(planner: Planner<S>) -> Router
where
  S: PlanStore + 'static,
{
  Router::new()
    .nest("/api", fitplan_api::api_router(planner))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
  };
  use fitplan_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn config_defaults_apply_without_a_file() {
    let cfg = build_config(config::File::from_str("", config::FileFormat::Toml)).unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("fitplan.db"));
  }

  #[test]
  fn config_file_overrides_defaults() {
    let toml = r#"
      host = "0.0.0.0"
      port = 9000
      store_path = "/var/lib/fitplan/plan.db"
    "#;
    let cfg = build_config(config::File::from_str(toml, config::FileFormat::Toml)).unwrap();
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/fitplan/plan.db"));
  }

  #[test]
  fn tilde_is_expanded_only_as_a_prefix() {
    let plain = Path::new("data/fitplan.db");
    assert_eq!(expand_tilde(plain), plain);

    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/fitplan.db")),
        PathBuf::from(home).join("fitplan.db")
      );
    }
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = app(Planner::new(Arc::new(store)));

    let uri = "/api/users/00000000-0000-0000-0000-000000000000/stats";
    let response = app
      .clone()
      .oneshot(Request::get(uri).body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("user not found"));

    let response = app
      .oneshot(Request::get(uri.trim_start_matches("/api")).body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    assert!(bytes.is_empty());
  }

  #[tokio::test]
  async fn cross_origin_requests_are_allowed() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = app(Planner::new(Arc::new(store)));
    let uri = "/api/users/00000000-0000-0000-0000-000000000000/stats";

    let preflight = Request::builder()
      .method(Method::OPTIONS)
      .uri(uri)
      .header(header::ORIGIN, "https://app.example.com")
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
      .body(Body::empty())
      .unwrap();
    let response = app.clone().oneshot(preflight).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let get = Request::get(uri)
      .header(header::ORIGIN, "https://app.example.com")
      .body(Body::empty())
      .unwrap();
    let response = app.oneshot(get).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
  }
}
