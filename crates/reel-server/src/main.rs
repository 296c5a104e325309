//! Reel server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) and `REEL_*`
//! environment variables, opens the SQLite store and either serves the API
//! or runs one of the maintenance commands.
//!
//! ```text
//! reel serve
//! reel whitelist add editor@studio.example
//! reel whitelist revoke editor@studio.example
//! reel export --out public/projects.json
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::Utc;
use clap::{Parser, Subcommand};
use reel_core::whitelist::{WhitelistEntry, WhitelistStore};
use reel_server::{ServerConfig, export_projects, load_config};
use reel_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Reel portfolio server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API and uploaded media (default).
  Serve,
  /// Manage the admin allow-list.
  #[command(subcommand)]
  Whitelist(WhitelistCommand),
  /// Write all projects as JSON for static site builds.
  Export {
    #[arg(short, long, default_value = "projects.json")]
    out: PathBuf,
  },
}

#[derive(Subcommand)]
enum WhitelistCommand {
  /// Grant admin access to an email (stored exactly as given).
  Add {
    email: String,
    #[arg(long, default_value = "admin")]
    role:  String,
  },
  /// Deactivate an entry. Entries are never deleted.
  Revoke { email: String },
  /// Print every entry.
  List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = load_config(&cli.config)?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(cfg).await,
    Command::Whitelist(cmd) => whitelist(&cfg, cmd).await,
    Command::Export { out } => export(&cfg, out).await,
  }
}

async fn open_store(cfg: &ServerConfig) -> anyhow::Result<SqliteStore> {
  SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))
}

async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
  let store = open_store(&cfg).await?;
  tokio::fs::create_dir_all(&cfg.media_root)
    .await
    .with_context(|| format!("failed to create media root {:?}", cfg.media_root))?;

  let app = reel_server::app(&cfg, Arc::new(store));
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

async fn whitelist(cfg: &ServerConfig, cmd: WhitelistCommand) -> anyhow::Result<()> {
  let store = open_store(cfg).await?;
  match cmd {
    WhitelistCommand::Add { email, role } => {
      let entry = WhitelistEntry { email: email.clone(), role, active: true, added_date: Utc::now() };
      store.put_entry(entry).await.context("failed to write whitelist entry")?;
      println!("Authorized {email}");
    }
    WhitelistCommand::Revoke { email } => {
      let found = store
        .set_active(&email, false)
        .await
        .context("failed to update whitelist entry")?;
      if !found {
        anyhow::bail!("no whitelist entry for {email}");
      }
      println!("Revoked {email}");
    }
    WhitelistCommand::List => {
      let entries = store.list_entries().await.context("failed to list whitelist")?;
      for e in entries {
        let status = if e.active { "active" } else { "revoked" };
        println!("{}\t{}\t{}\t{}", e.email, e.role, status, e.added_date.to_rfc3339());
      }
    }
  }
  Ok(())
}

/// On failure an empty array is still written so a static build has a file
/// to read, and the error is returned for a non-zero exit.
async fn export(cfg: &ServerConfig, out: PathBuf) -> anyhow::Result<()> {
  let result = match open_store(cfg).await {
    Ok(store) => export_projects(Arc::new(store), &out).await,
    Err(e) => Err(e),
  };
  match result {
    Ok(count) => {
      tracing::info!(count, out = %out.display(), "exported projects");
      Ok(())
    }
    Err(e) => {
      tokio::fs::write(&out, "[]")
        .await
        .with_context(|| format!("failed to write {}", out.display()))?;
      Err(e)
    }
  }
}
