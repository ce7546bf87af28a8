//! quad-portal server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), builds the
//! in-memory backend from the configured seed file, and serves the portal
//! over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for a seed user's `password_hash`:
//!
//! ```
//! cargo run -p quad-portal --bin portal -- --hash-password
//! ```

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use quad_portal::{
  AppState, ServerConfig,
  auth::AuthConfig,
  chain::PortalChain,
  handlers::error_done::{ErrorDoneHandler, NullForwarder},
};
use quad_profile::ProfileService;
use quad_store_mem::{MemStore, Seed};
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Quad portal server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
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

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("QUAD"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Build the backend, seeded if configured.
  let (store, auth) = match &server_cfg.seed_path {
    Some(path) => {
      let seed = Seed::from_path(path)
        .with_context(|| format!("failed to read seed file {path:?}"))?;
      let accounts: HashMap<String, String> = seed
        .users
        .iter()
        .filter_map(|u| {
          u.password_hash.as_ref().map(|h| (u.eid.clone(), h.clone()))
        })
        .collect();
      let store =
        MemStore::from_seed(&seed).context("failed to build store from seed")?;
      tracing::info!(
        users = seed.users.len(),
        sign_ins = accounts.len(),
        "seeded in-memory store"
      );
      (store, AuthConfig { accounts })
    }
    None => {
      tracing::warn!("no seed_path configured; starting with an empty store");
      (MemStore::new(), AuthConfig::default())
    }
  };

  // Build application state.
  let store = Arc::new(store);
  let state = AppState {
    service: Arc::new(ProfileService::new(
      store.clone(),
      store.clone(),
      server_cfg.base_url.clone(),
    )),
    store,
    auth: Arc::new(auth),
    config: Arc::new(server_cfg.clone()),
    chain: Arc::new(PortalChain::new().with(ErrorDoneHandler::new(NullForwarder))),
  };

  let app = quad_portal::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
