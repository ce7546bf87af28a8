//! HTTP Basic-auth: credential verification plus viewer resolution.
//!
//! The portal is the session/identity provider for the profile layer: a
//! verified alias is resolved through the directory to the canonical viewer
//! uuid, which the handlers pass into the profile service.

use std::collections::HashMap;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use quad_core::{authority::ProfileAuthority, directory::DirectoryStore};
use uuid::Uuid;

use crate::{AppState, error::Error};

/// Credentials accepted by this portal instance.
#[derive(Clone, Default)]
pub struct AuthConfig {
  /// alias → argon2 PHC string, e.g. `$argon2id$v=19$…`
  pub accounts: HashMap<String, String>,
}

/// The authenticated viewer. Present in a handler signature means the
/// request carried valid credentials for a known directory account.
pub struct Viewer(pub Uuid);

/// Decode and verify the Authorization header; returns the verified alias.
pub fn verify_credentials(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<String, Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (alias, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let stored_hash = config.accounts.get(alias).ok_or(Error::Unauthorized)?;
  let parsed_hash =
    PasswordHash::new(stored_hash).map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(alias.to_string())
}

/// Verify credentials and resolve the alias to the canonical viewer uuid.
pub async fn verify_viewer<D: DirectoryStore>(
  headers: &HeaderMap,
  config: &AuthConfig,
  directory: &D,
) -> Result<Uuid, Error> {
  let alias = verify_credentials(headers, config)?;
  directory
    .resolve_user(&alias)
    .await
    .map_err(|e| Error::Profile(quad_core::Error::directory(e)))?
    // Valid credentials for an alias the directory no longer knows — a
    // deprovisioned account — stay unauthorized.
    .ok_or(Error::Unauthorized)
}

impl<S> FromRequestParts<AppState<S>> for Viewer
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let viewer =
      verify_viewer(&parts.headers, &state.auth, state.store.as_ref()).await?;
    Ok(Viewer(viewer))
  }
}
