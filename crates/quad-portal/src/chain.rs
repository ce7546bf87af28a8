//! The portal handler chain.
//!
//! Inbound portal URLs are dispatched through an ordered list of handlers.
//! Each handler inspects the request and either claims it (terminating the
//! chain with a response) or passes. The chain itself is synchronous — the
//! fragment it hosts has no suspension points — and the HTTP glue wraps it
//! in an async route.

use axum::{http::Method, response::Response};
use thiserror::Error;

// ─── Request ─────────────────────────────────────────────────────────────────

/// A portal request, with the path pre-split into segments.
///
/// The path is absolute, so `parts[0]` is always the empty segment before
/// the leading slash and the routing marker lives at `parts[1]`.
pub struct PortalRequest<'a> {
  pub method: &'a Method,
  pub path:   &'a str,
  pub parts:  Vec<&'a str>,
}

impl<'a> PortalRequest<'a> {
  /// Split an absolute portal path into segments.
  pub fn new(method: &'a Method, path: &'a str) -> Self {
    debug_assert!(path.starts_with('/'), "portal paths are absolute");
    Self { method, path, parts: path.split('/').collect() }
  }
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// What a handler decided about a request.
#[derive(Debug)]
pub enum Outcome {
  /// The handler produced the response; stop the chain.
  Handled(Response),
  /// Not this handler's URL; try the next one.
  Next,
}

/// Any failure inside a handler, wrapped once with the original cause
/// preserved as the source.
#[derive(Debug, Error)]
#[error("portal handler failed: {0}")]
pub struct HandlerError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl HandlerError {
  pub fn new(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
    Self(cause.into())
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// One element of the portal dispatch chain.
///
/// Handlers see GET and POST alike; a handler that cares about the method
/// inspects `request.method` itself.
pub trait PortalHandler: Send + Sync {
  fn handle(&self, request: &PortalRequest<'_>) -> Result<Outcome, HandlerError>;
}

// ─── Chain ───────────────────────────────────────────────────────────────────

/// An ordered handler chain; the first handler to claim a request wins.
#[derive(Default)]
pub struct PortalChain {
  handlers: Vec<Box<dyn PortalHandler>>,
}

impl PortalChain {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a handler to the end of the chain.
  pub fn with(mut self, handler: impl PortalHandler + 'static) -> Self {
    self.handlers.push(Box::new(handler));
    self
  }

  /// Run the chain. `Ok(None)` means no handler claimed the request and the
  /// caller should answer 404.
  pub fn dispatch(
    &self,
    request: &PortalRequest<'_>,
  ) -> Result<Option<Response>, HandlerError> {
    for handler in &self.handlers {
      match handler.handle(request)? {
        Outcome::Handled(response) => return Ok(Some(response)),
        Outcome::Next => {}
      }
    }
    Ok(None)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use axum::{http::StatusCode, response::IntoResponse};

  use super::*;

  /// Claims paths whose marker equals `marker`; counts how often it ran.
  struct MarkerHandler {
    marker: &'static str,
    calls:  &'static AtomicUsize,
  }

  impl PortalHandler for MarkerHandler {
    fn handle(&self, request: &PortalRequest<'_>) -> Result<Outcome, HandlerError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if request.parts.len() >= 2 && request.parts[1] == self.marker {
        Ok(Outcome::Handled(StatusCode::NO_CONTENT.into_response()))
      } else {
        Ok(Outcome::Next)
      }
    }
  }

  struct FailingHandler;

  impl PortalHandler for FailingHandler {
    fn handle(&self, _: &PortalRequest<'_>) -> Result<Outcome, HandlerError> {
      Err(HandlerError::new("boom"))
    }
  }

  #[test]
  fn first_claiming_handler_stops_the_chain() {
    static FIRST: AtomicUsize = AtomicUsize::new(0);
    static SECOND: AtomicUsize = AtomicUsize::new(0);
    let chain = PortalChain::new()
      .with(MarkerHandler { marker: "one", calls: &FIRST })
      .with(MarkerHandler { marker: "two", calls: &SECOND });

    let method = Method::GET;
    let request = PortalRequest::new(&method, "/one/extra");
    let response = chain.dispatch(&request).unwrap().expect("handled");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(FIRST.load(Ordering::SeqCst), 1);
    assert_eq!(SECOND.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn unclaimed_requests_fall_off_the_end() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    let chain =
      PortalChain::new().with(MarkerHandler { marker: "one", calls: &CALLS });

    let method = Method::GET;
    let request = PortalRequest::new(&method, "/something-else");
    assert!(chain.dispatch(&request).unwrap().is_none());
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn handler_failures_short_circuit() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    let chain = PortalChain::new()
      .with(FailingHandler)
      .with(MarkerHandler { marker: "one", calls: &CALLS });

    let method = Method::GET;
    let request = PortalRequest::new(&method, "/one");
    let err = chain.dispatch(&request).unwrap_err();
    assert!(std::error::Error::source(&err).is_some(), "cause must be preserved");
    assert_eq!(CALLS.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn paths_split_with_leading_empty_segment() {
    let method = Method::GET;
    let request = PortalRequest::new(&method, "/error-reported/site");
    assert_eq!(request.parts, vec!["", "error-reported", "site"]);
  }
}
