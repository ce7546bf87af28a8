//! Handlers for `/profile` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profile/:user_id/full` | Gated full view |
//! | `GET`  | `/profile/:user_id/minimal` | Identity + thumbnail + status |
//! | `GET`  | `/profile/:user_id/academic` | Staff/student categories |
//! | `GET`  | `/profile/:user_id/legacy` | Old-schema view |
//! | `GET`  | `/profile/:user_id/formatted` | Full view rendered as HTML |
//! | `GET`  | `/profile/:user_id/connections` | Empty list when gated |
//! | `GET`  | `/profile/:user_id/exists` | No auth required |
//! | `POST` | `/profile/:user_id` | Create-by-id (self only) |
//! | `PUT`  | `/profile` | Save (body: the view; self only) |
//!
//! `user_id` may be the canonical uuid or the human-friendly alias; an
//! unresolvable identifier is a 404, not an error.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::{Html, IntoResponse},
};
use quad_core::{
  authority::{Connection, ProfileAuthority},
  directory::DirectoryStore,
  view::ProfileView,
};
use serde_json::json;

use crate::{AppState, auth::Viewer, error::Error};

fn not_found(user_id: &str) -> Error {
  Error::NotFound(format!("user {user_id} not found"))
}

// ─── Views ────────────────────────────────────────────────────────────────────

/// `GET /profile/:user_id/full`
pub async fn full<S>(
  State(state): State<AppState<S>>,
  Viewer(viewer): Viewer,
  Path(user_id): Path<String>,
) -> Result<Json<ProfileView>, Error>
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  let view = state.service.full_view(Some(viewer), &user_id).await?;
  view.map(Json).ok_or_else(|| not_found(&user_id))
}

/// `GET /profile/:user_id/minimal`
pub async fn minimal<S>(
  State(state): State<AppState<S>>,
  Viewer(viewer): Viewer,
  Path(user_id): Path<String>,
) -> Result<Json<ProfileView>, Error>
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  let view = state.service.minimal_view(Some(viewer), &user_id).await?;
  view.map(Json).ok_or_else(|| not_found(&user_id))
}

/// `GET /profile/:user_id/academic`
pub async fn academic<S>(
  State(state): State<AppState<S>>,
  Viewer(viewer): Viewer,
  Path(user_id): Path<String>,
) -> Result<Json<ProfileView>, Error>
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  let view = state.service.academic_view(Some(viewer), &user_id).await?;
  view.map(Json).ok_or_else(|| not_found(&user_id))
}

/// `GET /profile/:user_id/legacy`
pub async fn legacy<S>(
  State(state): State<AppState<S>>,
  Viewer(viewer): Viewer,
  Path(user_id): Path<String>,
) -> Result<Json<ProfileView>, Error>
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  let view = state.service.legacy_view(Some(viewer), &user_id).await?;
  view.map(Json).ok_or_else(|| not_found(&user_id))
}

/// `GET /profile/:user_id/formatted` — the full view as an HTML fragment.
pub async fn formatted<S>(
  State(state): State<AppState<S>>,
  Viewer(viewer): Viewer,
  Path(user_id): Path<String>,
) -> Result<Html<String>, Error>
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  let view = state
    .service
    .full_view(Some(viewer), &user_id)
    .await?
    .ok_or_else(|| not_found(&user_id))?;
  Ok(Html(quad_profile::html::render(&view)))
}

// ─── Connections ──────────────────────────────────────────────────────────────

/// `GET /profile/:user_id/connections`
pub async fn connections<S>(
  State(state): State<AppState<S>>,
  Viewer(viewer): Viewer,
  Path(user_id): Path<String>,
) -> Result<Json<Vec<Connection>>, Error>
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  let list = state.service.connections(Some(viewer), &user_id).await?;
  list.map(Json).ok_or_else(|| not_found(&user_id))
}

// ─── Existence ────────────────────────────────────────────────────────────────

/// `GET /profile/:user_id/exists` — anonymous probe.
pub async fn exists<S>(
  State(state): State<AppState<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, Error>
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  let exists = state.service.user_exists(&user_id).await?;
  Ok(Json(json!({ "exists": exists })))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /profile/:user_id` — create-by-id. 201 when a record was created,
/// 200 with `created: false` when one already existed.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Viewer(viewer): Viewer,
  Path(user_id): Path<String>,
) -> Result<impl IntoResponse, Error>
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  let created = state.service.create_for(Some(viewer), &user_id).await?;
  let status = if created { StatusCode::CREATED } else { StatusCode::OK };
  Ok((status, Json(json!({ "created": created }))))
}

/// `PUT /profile` — save the view in the body onto the viewer's own record.
pub async fn save<S>(
  State(state): State<AppState<S>>,
  Viewer(viewer): Viewer,
  Json(view): Json<ProfileView>,
) -> Result<Json<serde_json::Value>, Error>
where
  S: DirectoryStore + ProfileAuthority + Clone + Send + Sync + 'static,
{
  let saved = state.service.save(Some(viewer), &view).await?;
  Ok(Json(json!({ "saved": saved })))
}
