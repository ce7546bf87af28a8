//! Portal error type and axum `IntoResponse` implementation.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::chain::HandlerError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("forbidden: {0}")]
  Forbidden(String),
  #[error("not found: {0}")]
  NotFound(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error(transparent)]
  Handler(#[from] HandlerError),
  #[error("profile error: {0}")]
  Profile(#[source] quad_core::Error),
}

/// Hard authorization failures become 401/403; everything unexpected is a
/// plain 500. Soft misses never reach this type — handlers turn them into
/// 404s or `false` payloads themselves.
impl From<quad_core::Error> for Error {
  fn from(e: quad_core::Error) -> Self {
    match e {
      quad_core::Error::Unauthenticated => Error::Unauthorized,
      quad_core::Error::NotProfileOwner(_) => Error::Forbidden(e.to_string()),
      other => Error::Profile(other),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"quad\""),
        );
        res
      }
      Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
      Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::Handler(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
      }
      Error::Profile(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
      }
    }
  }
}
