//! HTTP surface for the Quad profile platform.
//!
//! Exposes an axum [`Router`] combining the portal handler chain (the
//! "error reported" acknowledgement responder) with the JSON/HTML profile
//! endpoints, backed by any type implementing both `quad-core` collaborator
//! traits. Transport and TLS concerns are the caller's responsibility.

pub mod auth;
pub mod chain;
pub mod error;
pub mod handlers;
pub mod profile;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::{Path, State},
  http::{Method, StatusCode},
  response::{IntoResponse, Response},
  routing::{get, post, put},
};
use quad_core::{authority::ProfileAuthority, directory::DirectoryStore};
use quad_profile::ProfileService;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use chain::{PortalChain, PortalRequest};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:     String,
  pub port:     u16,
  /// Absolute server URL used for the computed profile-image links.
  pub base_url: String,
  /// Optional JSON seed file for the in-memory backend.
  pub seed_path: Option<PathBuf>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:   Arc<S>,
  pub service: Arc<ProfileService<S, S>>,
  pub auth:    Arc<AuthConfig>,
  pub config:  Arc<ServerConfig>,
  pub chain:   Arc<PortalChain>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the portal.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  Router::new()
    // Profile API
    .route("/profile/{user_id}/full",        get(profile::full::<S>))
    .route("/profile/{user_id}/minimal",     get(profile::minimal::<S>))
    .route("/profile/{user_id}/academic",    get(profile::academic::<S>))
    .route("/profile/{user_id}/legacy",      get(profile::legacy::<S>))
    .route("/profile/{user_id}/formatted",   get(profile::formatted::<S>))
    .route("/profile/{user_id}/connections", get(profile::connections::<S>))
    .route("/profile/{user_id}/exists",      get(profile::exists::<S>))
    .route("/profile/{user_id}",             post(profile::create::<S>))
    .route("/profile",                       put(profile::save::<S>))
    // Portal handler chain; GET and POST are dispatched identically.
    .route(
      "/portal/{*path}",
      get(portal_dispatch::<S>).post(portal_dispatch::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Route a portal URL through the handler chain.
async fn portal_dispatch<S>(
  State(state): State<AppState<S>>,
  method: Method,
  Path(path): Path<String>,
) -> Response
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  let absolute = format!("/{path}");
  let request = PortalRequest::new(&method, &absolute);
  match state.chain.dispatch(&request) {
    Ok(Some(response)) => response,
    Ok(None) => StatusCode::NOT_FOUND.into_response(),
    Err(e) => Error::from(e).into_response(),
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
