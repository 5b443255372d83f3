//! fitplan server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API over HTTP.
//!
//! # Seeding
//!
//! To load the workout catalog and user accounts from a JSON file and exit:
//!
//! ```
//! cargo run -p fitplan-server -- --seed catalog.json
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use fitplan_core::planner::Planner;
use fitplan_server::{expand_tilde, load_config, seed};
use fitplan_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Fitplan assignment and progress server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Import a JSON seed file into the store and exit.
  #[arg(long, value_name = "FILE")]
  seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = load_config(&cli.config).context("failed to load configuration")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: import a seed file and exit.
  if let Some(seed_path) = cli.seed {
    let json = tokio::fs::read_to_string(&seed_path)
      .await
      .with_context(|| format!("failed to read seed file {seed_path:?}"))?;
    let seed_file = seed::SeedFile::from_json(&json)
      .with_context(|| format!("failed to parse seed file {seed_path:?}"))?;
    seed::import(&store, seed_file)
      .await
      .context("seed import failed")?;
    return Ok(());
  }

  let app = fitplan_server::app(Planner::new(Arc::new(store)));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
